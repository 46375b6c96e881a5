// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

//! Bit-by-bit model of the encoder used to cross check the optimized
//! paths. Written independently of `accumulator`, `expander` and
//! `CoefficientStream`: it unpacks coefficients one bit at a time,
//! reduces every index with `%` and manages its own keystream buffer.

use rand::RngCore;

use crate::{
    coeff_ctx::CoeffCtx,
    constants::{
        COEFF_BUFFER_BYTES, COEFF_STREAM_ID, EXPANDER_LANES,
        REGULAR_SAMPLER_DOMAIN,
    },
    prng::{keyed_rng, ExpanderSampler},
    Block,
};

/// Panics with the index and both values when `a != b`.
pub fn assert_same<C: CoeffCtx>(ctx: &C, idx: usize, a: &C::Elem, b: &C::Elem) {
    assert!(
        ctx.eq(a, b),
        "mismatch at {}: {} != {}",
        idx,
        ctx.fmt_elem(a),
        ctx.fmt_elem(b)
    );
}

pub fn assert_same_vec<C: CoeffCtx>(ctx: &C, a: &[C::Elem], b: &[C::Elem]) {
    assert_eq!(a.len(), b.len());
    for (idx, (a, b)) in a.iter().zip(b).enumerate() {
        assert_same(ctx, idx, a, b);
    }
}

/// One accumulator step at `i`, coefficient bits taken from `coeffs`.
pub fn acc_one<C: CoeffCtx>(
    x: &mut [C::Elem],
    i: usize,
    width: usize,
    coeffs: &[u8],
    ctx: &C,
) {
    let n = x.len();
    let mut j = i + 1;

    for a in 0..width {
        let bit = (coeffs[a / 8] >> (a % 8)) & 1;
        if bit == 1 {
            x[j % n] = ctx.plus(&x[j % n], &x[i]);
        }
        j += 1;
    }

    x[j % n] = ctx.plus(&x[j % n], &x[i]);
    x[j % n] = ctx.mul_const(&x[j % n]);
}

/// One or two sweeps over `x` (seed, then `!seed`).
pub fn accumulate<C: CoeffCtx>(
    x: &mut [C::Elem],
    width: usize,
    mix_twice: bool,
    seed: Block,
    ctx: &C,
) {
    let rounds = if mix_twice { 2 } else { 1 };
    let window = width.div_ceil(8);

    for r in 0..rounds {
        let seed = if r == 1 { !seed } else { seed };
        let mut rng = keyed_rng(seed, COEFF_STREAM_ID);
        let mut buffer = vec![0u8; COEFF_BUFFER_BYTES];
        rng.fill_bytes(&mut buffer);
        let mut cursor = 0;

        for i in 0..x.len() {
            if cursor + window > COEFF_BUFFER_BYTES {
                rng.fill_bytes(&mut buffer);
                cursor = 0;
            }

            let coeffs = buffer[cursor..cursor + window].to_vec();
            acc_one(x, i, width, &coeffs, ctx);
            cursor += 1;
        }
    }
}

/// Expander index rows in draw order: lane groups of eight message
/// positions, strata first, then full-domain picks; the tail one position
/// at a time.
pub fn expander_rows(
    message_size: usize,
    code_size: usize,
    weight: usize,
    regular: bool,
    seed: Block,
) -> Vec<Vec<usize>> {
    let (reg_count, step) = if regular {
        let reg_count = weight.div_ceil(2);
        (reg_count, code_size / reg_count)
    } else {
        (0, 0)
    };

    let mut reg =
        ExpanderSampler::new(seed ^ REGULAR_SAMPLER_DOMAIN, step.max(1) as u64);
    let mut full = ExpanderSampler::new(seed, code_size as u64);

    let mut rows = vec![Vec::with_capacity(weight); message_size];
    let main = message_size / EXPANDER_LANES * EXPANDER_LANES;

    let mut i = 0;
    while i < main {
        for s in 0..reg_count {
            for p in 0..EXPANDER_LANES {
                rows[i + p].push(reg.get() as usize + step * s);
            }
        }
        for _ in reg_count..weight {
            for p in 0..EXPANDER_LANES {
                rows[i + p].push(full.get() as usize);
            }
        }
        i += EXPANDER_LANES;
    }

    for row in rows.iter_mut().skip(main) {
        for s in 0..reg_count {
            row.push(reg.get() as usize + step * s);
        }
        for _ in reg_count..weight {
            row.push(full.get() as usize);
        }
    }

    rows
}

/// `y[i] (+)= sum of x[idx]` over the row of `i`.
pub fn expand<C: CoeffCtx>(
    rows: &[Vec<usize>],
    x: &[C::Elem],
    y: &mut [C::Elem],
    add: bool,
    ctx: &C,
) {
    for (i, row) in rows.iter().enumerate() {
        if !add {
            y[i] = ctx.zero();
        }
        for &idx in row {
            y[i] = ctx.plus(&y[i], &x[idx]);
        }
    }
}
