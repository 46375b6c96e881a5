// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

//! Convolutional accumulator.
//!
//! For every position `i` in increasing order the accumulator adds `x[i]`
//! to each of the next `width` positions whose coefficient bit is set, and
//! then unconditionally to position `i + 1 + width`, which is finally
//! multiplied by the context constant.
//!
//! The `RANGE_CHECK` parameter selects between the wrapping step (indices
//! reduced modulo the vector length) and the plain step, which is only
//! valid while `i + 1 + width < x.len()`.

use crate::{
    coeff_ctx::CoeffCtx,
    constants::MAX_ACCUMULATOR_WIDTH,
    prng::CoefficientStream,
    Block, ExConvError,
};

/// `x[j] += x[i]`
#[inline(always)]
fn add_into<C: CoeffCtx>(x: &mut [C::Elem], j: usize, i: usize, ctx: &C) {
    let v = ctx.plus(&x[j], &x[i]);
    x[j] = v;
}

#[inline(always)]
fn next_index<const RANGE_CHECK: bool>(j: usize, size: usize) -> usize {
    let j = j + 1;
    if RANGE_CHECK && j >= size {
        j - size
    } else {
        j
    }
}

/// Final, ungated step: `x[j] = κ·(x[j] + x[i])`.
#[inline(always)]
fn close<C: CoeffCtx>(x: &mut [C::Elem], j: usize, i: usize, ctx: &C) {
    let v = ctx.plus(&x[j], &x[i]);
    x[j] = ctx.mul_const(&v);
}

/// Apply eight coefficient bits of position `i`, starting at `j`.
/// Returns the index following the last one touched.
#[inline(always)]
pub fn acc_one8<C: CoeffCtx, const RANGE_CHECK: bool>(
    x: &mut [C::Elem],
    i: usize,
    j: usize,
    coeff: u8,
    ctx: &C,
) -> usize {
    let size = x.len();

    if !RANGE_CHECK || j + 8 < size {
        for p in 0..8 {
            if (coeff >> p) & 1 == 1 {
                add_into(x, j + p, i, ctx);
            }
        }

        j + 8
    } else {
        let mut j = j;
        let mut b = coeff;
        for _ in 0..8 {
            if b & 1 == 1 {
                add_into(x, j, i, ctx);
            }
            b >>= 1;
            j = next_index::<RANGE_CHECK>(j, size);
        }

        j
    }
}

/// Accumulator of a given coefficient width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Accumulator {
    width: usize,
    mix_twice: bool,
}

impl Accumulator {
    /// Create an accumulator reading `width` coefficient bits per
    /// position.
    pub fn new(width: usize, mix_twice: bool) -> Result<Self, ExConvError> {
        if width > MAX_ACCUMULATOR_WIDTH {
            return Err(ExConvError::AccumulatorTooWide { width });
        }

        Ok(Self { width, mix_twice })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn mix_twice(&self) -> bool {
        self.mix_twice
    }

    /// One accumulator step at position `i` driven by the coefficient
    /// bytes `coeffs` (at least `ceil(width / 8)` of them, little-endian
    /// bit order).
    pub fn acc_one_gen<C: CoeffCtx, const RANGE_CHECK: bool>(
        &self,
        x: &mut [C::Elem],
        i: usize,
        coeffs: &[u8],
        ctx: &C,
    ) {
        let size = x.len();
        let mut j = next_index::<RANGE_CHECK>(i, size);

        let full = self.width / 8;
        for &c in &coeffs[..full] {
            j = acc_one8::<C, RANGE_CHECK>(x, i, j, c, ctx);
            if RANGE_CHECK && j >= size {
                j -= size;
            }
        }

        let rest = self.width % 8;
        if rest > 0 {
            let mut b = coeffs[full];
            for _ in 0..rest {
                if b & 1 == 1 {
                    add_into(x, j, i, ctx);
                }
                b >>= 1;
                j = next_index::<RANGE_CHECK>(j, size);
            }
        }

        close(x, j, i, ctx);
    }

    /// Same step as [`Self::acc_one_gen`] with the width fixed at compile
    /// time. The coefficients are loaded as one word and consumed eight
    /// bits at a time.
    pub(crate) fn acc_one<C: CoeffCtx, const RANGE_CHECK: bool, const AW: usize>(
        &self,
        x: &mut [C::Elem],
        i: usize,
        coeffs: &[u8],
        ctx: &C,
    ) {
        debug_assert_eq!(AW, self.width);

        let size = x.len();
        let bytes = AW.div_ceil(8);
        let mut word = [0u8; 8];
        word[..bytes].copy_from_slice(&coeffs[..bytes]);
        let mut bits = u64::from_le_bytes(word);

        let mut j = next_index::<RANGE_CHECK>(i, size);

        for _ in 0..AW / 8 {
            j = acc_one8::<C, RANGE_CHECK>(x, i, j, bits as u8, ctx);
            if RANGE_CHECK && j >= size {
                j -= size;
            }
            bits >>= 8;
        }

        for _ in 0..AW % 8 {
            if bits & 1 == 1 {
                add_into(x, j, i, ctx);
            }
            bits >>= 1;
            j = next_index::<RANGE_CHECK>(j, size);
        }

        close(x, j, i, ctx);
    }

    /// One sweep over the whole of `x` with coefficients from a
    /// [`CoefficientStream`] keyed by `seed`. Indices wrap around the end
    /// of `x`.
    ///
    /// `AW == 0` selects the generic step, any other value the fixed-width
    /// step, which requires `AW == self.width()`.
    pub fn accumulate_fixed<C: CoeffCtx, const AW: usize>(
        &self,
        x: &mut [C::Elem],
        ctx: &C,
        seed: Block,
    ) -> Result<(), ExConvError> {
        if AW != 0 && AW != self.width {
            return Err(ExConvError::AccumulatorWidthMismatch {
                width: self.width,
                fixed: AW,
            });
        }

        let size = x.len();
        if size == 0 {
            return Ok(());
        }

        let mut stream = CoefficientStream::new(seed, self.width)?;

        // positions whose window ends before the last element
        let main = size.saturating_sub(self.width + 1);

        for i in 0..size {
            let coeffs = stream.next_coeffs();

            match (AW, i < main) {
                (0, true) => self.acc_one_gen::<C, false>(x, i, coeffs, ctx),
                (0, false) => self.acc_one_gen::<C, true>(x, i, coeffs, ctx),
                (_, true) => self.acc_one::<C, false, AW>(x, i, coeffs, ctx),
                (_, false) => self.acc_one::<C, true, AW>(x, i, coeffs, ctx),
            }
        }

        Ok(())
    }

    /// Full accumulation of `x`: one sweep keyed by `seed` and, when
    /// mixing twice, a second sweep keyed by `!seed`.
    pub fn accumulate<C: CoeffCtx>(
        &self,
        x: &mut [C::Elem],
        ctx: &C,
        seed: Block,
    ) -> Result<(), ExConvError> {
        self.sweep(x, ctx, seed)?;

        if self.mix_twice {
            self.sweep(x, ctx, !seed)?;
        }

        Ok(())
    }

    fn sweep<C: CoeffCtx>(
        &self,
        x: &mut [C::Elem],
        ctx: &C,
        seed: Block,
    ) -> Result<(), ExConvError> {
        match self.width {
            24 => self.accumulate_fixed::<C, 24>(x, ctx, seed),
            _ => self.accumulate_fixed::<C, 0>(x, ctx, seed),
        }
    }
}
