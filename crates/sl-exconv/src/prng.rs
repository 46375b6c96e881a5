// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

//! Seeded pseudorandom streams driving the code structure.
//!
//! Both streams are pure functions of a 128-bit seed, so two parties (or
//! two implementations) holding the same seed derive the same code.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::{
    constants::{
        COEFF_BUFFER_BYTES, COEFF_STREAM_ID, MAX_ACCUMULATOR_WIDTH,
        SAMPLER_BUFFER_WORDS, SAMPLER_STREAM_ID,
    },
    Block, ExConvError,
};

/// ChaCha20 keyed by `seed || !seed` on the given stream.
pub fn keyed_rng(seed: Block, stream: u64) -> ChaCha20Rng {
    let mut key = [0u8; 32];
    key[..16].copy_from_slice(&seed.to_le_bytes());
    key[16..].copy_from_slice(&(!seed).to_le_bytes());

    let mut rng = ChaCha20Rng::from_seed(key);
    rng.set_stream(stream);
    rng
}

/// Pseudorandom accumulator coefficients.
///
/// Every position reads a window of `ceil(width / 8)` bytes at the cursor,
/// then the cursor moves forward by one byte, so consecutive windows
/// overlap. When the cursor passes `COEFF_BUFFER_BYTES - window` the whole
/// buffer is regenerated from the continuing keystream and the cursor
/// restarts at zero.
pub struct CoefficientStream {
    rng: ChaCha20Rng,
    buffer: Box<[u8; COEFF_BUFFER_BYTES]>,
    pos: usize,
    window: usize,
    width: usize,
}

impl CoefficientStream {
    /// Create a stream of `width`-bit coefficients keyed by `seed`.
    pub fn new(seed: Block, width: usize) -> Result<Self, ExConvError> {
        if width > MAX_ACCUMULATOR_WIDTH {
            return Err(ExConvError::AccumulatorTooWide { width });
        }

        let mut rng = keyed_rng(seed, COEFF_STREAM_ID);
        let mut buffer = Box::new([0u8; COEFF_BUFFER_BYTES]);
        rng.fill_bytes(&mut buffer[..]);

        Ok(Self {
            rng,
            buffer,
            pos: 0,
            window: width.div_ceil(8),
            width,
        })
    }

    /// Coefficient bits per position.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Bytes per coefficient window.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Last cursor position that still has a whole window in the buffer.
    fn last_pos(&self) -> usize {
        COEFF_BUFFER_BYTES - self.window
    }

    fn refill(&mut self) {
        #[cfg(feature = "tracing")]
        tracing::trace!("refilling accumulator coefficient buffer");

        self.rng.fill_bytes(&mut self.buffer[..]);
        self.pos = 0;
    }

    /// Coefficient window of the next position, little-endian bit order.
    pub fn next_coeffs(&mut self) -> &[u8] {
        if self.pos > self.last_pos() {
            self.refill();
        }

        let start = self.pos;
        self.pos += 1;

        &self.buffer[start..start + self.window]
    }

    /// Coefficient bits of the next position packed into a word, bit `b`
    /// set iff coefficient `b` is one. The number of bits is the width the
    /// stream was created with.
    pub fn next_bits(&mut self) -> u64 {
        let width = self.width;
        let mut word = [0u8; 8];
        let coeffs = self.next_coeffs();
        word[..coeffs.len()].copy_from_slice(coeffs);

        let bits = u64::from_le_bytes(word);
        if width == MAX_ACCUMULATOR_WIDTH {
            bits
        } else {
            bits & ((1u64 << width) - 1)
        }
    }
}

/// Deterministic, infinite sequence of indices in `[0, modulus)`.
///
/// Only restartable by constructing a new sampler from the same seed.
pub struct ExpanderSampler {
    rng: ChaCha20Rng,
    modulus: u64,
    vals: Box<[u64; SAMPLER_BUFFER_WORDS]>,
    idx: usize,
}

impl ExpanderSampler {
    /// # Panics
    /// Panics if `modulus` is zero.
    pub fn new(seed: Block, modulus: u64) -> Self {
        assert!(modulus > 0, "sampler domain must be non empty");

        let mut sampler = Self {
            rng: keyed_rng(seed, SAMPLER_STREAM_ID),
            modulus,
            vals: Box::new([0u64; SAMPLER_BUFFER_WORDS]),
            idx: 0,
        };
        sampler.refill();

        sampler
    }

    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    fn refill(&mut self) {
        self.rng.fill(&mut self.vals[..]);
        let m = self.modulus;
        self.vals.iter_mut().for_each(|v| *v %= m);
        self.idx = 0;
    }

    /// Next index.
    #[inline]
    pub fn get(&mut self) -> u64 {
        if self.idx == SAMPLER_BUFFER_WORDS {
            self.refill();
        }

        let v = self.vals[self.idx];
        self.idx += 1;
        v
    }
}

impl Iterator for ExpanderSampler {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        Some(self.get())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (usize::MAX, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_is_deterministic() {
        let seed = Block::from_u64s(1, 2);
        let mut a = CoefficientStream::new(seed, 24).unwrap();
        let mut b = CoefficientStream::new(seed, 24).unwrap();
        let mut c = CoefficientStream::new(!seed, 24).unwrap();

        let mut differ = false;
        for _ in 0..3 * COEFF_BUFFER_BYTES {
            let (x, y, z) = (a.next_bits(), b.next_bits(), c.next_bits());
            assert_eq!(x, y);
            differ |= x != z;
        }
        assert!(differ);
    }

    #[test]
    fn windows_overlap_by_all_but_one_byte() {
        let mut s = CoefficientStream::new(Block::ONE, 24).unwrap();
        let w0 = s.next_coeffs().to_vec();
        let w1 = s.next_coeffs().to_vec();

        assert_eq!(w0.len(), 3);
        assert_eq!(w0[1..], w1[..2]);
    }

    #[test]
    fn refill_boundary() {
        let seed = Block::from_u64s(7, 7);
        let width = 29;
        let window = 4;
        let mut s = CoefficientStream::new(seed, width).unwrap();

        let mut rng = keyed_rng(seed, COEFF_STREAM_ID);
        let mut first = vec![0u8; COEFF_BUFFER_BYTES];
        let mut second = vec![0u8; COEFF_BUFFER_BYTES];
        rng.fill_bytes(&mut first);
        rng.fill_bytes(&mut second);

        let per_buffer = COEFF_BUFFER_BYTES - window + 1;
        for p in 0..per_buffer {
            assert_eq!(s.next_coeffs(), &first[p..p + window]);
        }
        // The next read starts over at the head of a fresh buffer.
        assert_eq!(s.next_coeffs(), &second[..window]);
    }

    #[test]
    fn next_bits_masks_width() {
        let mut s = CoefficientStream::new(Block::ZERO, 5).unwrap();
        for _ in 0..100 {
            assert!(s.next_bits() < 32);
        }

        let mut s = CoefficientStream::new(Block::ZERO, 0).unwrap();
        assert_eq!(s.window(), 0);
        assert_eq!(s.next_bits(), 0);
    }

    #[test]
    fn too_wide() {
        assert_eq!(
            CoefficientStream::new(Block::ZERO, 65).err(),
            Some(ExConvError::AccumulatorTooWide { width: 65 })
        );
    }

    #[test]
    fn sampler_stays_in_range_and_replays() {
        let seed = Block::from_u64s(3, 4);
        let a: Vec<u64> = ExpanderSampler::new(seed, 37).take(1000).collect();
        let b: Vec<u64> = ExpanderSampler::new(seed, 37).take(1000).collect();

        assert_eq!(a, b);
        assert!(a.iter().all(|&v| v < 37));
        // every residue shows up in a thousand draws
        assert!((0..37).all(|r| a.contains(&r)));
    }

    #[test]
    fn sampler_and_stream_do_not_share_keystream() {
        let seed = Block::from_u64s(5, 6);
        let mut s = CoefficientStream::new(seed, 64).unwrap();
        let mut e = keyed_rng(seed, SAMPLER_STREAM_ID);

        assert_ne!(s.next_bits(), e.next_u64());
    }
}
