// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

//! Sparse expander.
//!
//! Every message position is the sum of `weight` accumulated codeword
//! positions sampled from the seed. A regular expander draws
//! `ceil(weight / 2)` of them from disjoint strata of the source domain,
//! one per stratum, which bounds how often a source can be reused; the
//! remaining picks (all of them for an irregular expander) are drawn from
//! the whole domain.
//!
//! Message positions are processed in lane groups of eight. Inside a group
//! each stratum draws one index per lane, then each full-domain pick does.
//! The last `k % 8` positions are processed one at a time.

use crate::{
    coeff_ctx::CoeffCtx,
    constants::{EXPANDER_LANES, REGULAR_SAMPLER_DOMAIN, REGULAR_SPLIT_DIVISOR},
    error::check_len,
    prng::ExpanderSampler,
    Block, ExConvError,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExpanderCode {
    message_size: usize,
    code_size: usize,
    weight: usize,
    regular: bool,
    seed: Block,
}

/// Index source for one expansion: both samplers and the strata layout.
struct Samplers {
    reg: Option<ExpanderSampler>,
    full: ExpanderSampler,
    reg_count: usize,
    step: usize,
    weight: usize,
}

impl Samplers {
    /// Push the sources of a group of rows, in lane order.
    #[inline(always)]
    fn draw_group(&mut self, mut emit: impl FnMut(usize, usize), lanes: usize) {
        if let Some(reg) = self.reg.as_mut() {
            for s in 0..self.reg_count {
                let offset = self.step * s;
                for p in 0..lanes {
                    emit(p, reg.get() as usize + offset);
                }
            }
        }

        for _ in self.reg_count..self.weight {
            for p in 0..lanes {
                emit(p, self.full.get() as usize);
            }
        }
    }
}

impl ExpanderCode {
    /// Expander from a `code_size` source domain onto `message_size`
    /// positions.
    pub fn new(
        message_size: usize,
        code_size: usize,
        weight: usize,
        regular: bool,
        seed: Block,
    ) -> Result<Self, ExConvError> {
        let code = Self {
            message_size,
            code_size,
            weight,
            regular,
            seed,
        };

        let strata = code.reg_count().max(1);
        if weight > 0 && code_size < strata {
            return Err(ExConvError::ExpanderDomainTooSmall {
                domain: code_size,
                strata,
            });
        }

        Ok(code)
    }

    pub fn message_size(&self) -> usize {
        self.message_size
    }

    /// Size of the source domain.
    pub fn code_size(&self) -> usize {
        self.code_size
    }

    pub fn weight(&self) -> usize {
        self.weight
    }

    pub fn is_regular(&self) -> bool {
        self.regular
    }

    /// Number of stratified picks per message position.
    pub fn reg_count(&self) -> usize {
        if self.regular {
            self.weight.div_ceil(REGULAR_SPLIT_DIVISOR)
        } else {
            0
        }
    }

    /// Width of one stratum, zero for an irregular expander.
    pub fn step(&self) -> usize {
        match self.reg_count() {
            0 => 0,
            reg_count => self.code_size / reg_count,
        }
    }

    fn samplers(&self) -> Samplers {
        let reg_count = self.reg_count();
        let step = self.step();

        Samplers {
            reg: (reg_count > 0).then(|| {
                ExpanderSampler::new(
                    self.seed ^ REGULAR_SAMPLER_DOMAIN,
                    step as u64,
                )
            }),
            full: ExpanderSampler::new(self.seed, self.code_size.max(1) as u64),
            reg_count,
            step,
            weight: self.weight,
        }
    }

    /// Expand `input` (the accumulated source vector) into `output`.
    ///
    /// With `ADD` the sums are added to the existing contents of `output`,
    /// otherwise `output` is overwritten.
    pub fn expand<C: CoeffCtx, const ADD: bool>(
        &self,
        input: &[C::Elem],
        output: &mut [C::Elem],
        ctx: &C,
    ) -> Result<(), ExConvError> {
        check_len(self.code_size, input.len())?;
        check_len(self.message_size, output.len())?;

        if !ADD {
            output.fill(ctx.zero());
        }

        let mut samplers = self.samplers();
        let main = self.message_size / EXPANDER_LANES * EXPANDER_LANES;
        let (head, tail) = output.split_at_mut(main);

        for group in head.chunks_exact_mut(EXPANDER_LANES) {
            samplers.draw_group(
                |p, idx| group[p] = ctx.plus(&group[p], &input[idx]),
                EXPANDER_LANES,
            );
        }

        for y in tail.iter_mut() {
            samplers.draw_group(|_, idx| *y = ctx.plus(&*y, &input[idx]), 1);
        }

        Ok(())
    }

    /// Sampled source indices of every message position, in draw order.
    pub fn rows(&self) -> Vec<Vec<usize>> {
        let mut rows = vec![Vec::with_capacity(self.weight); self.message_size];
        let mut samplers = self.samplers();
        let main = self.message_size / EXPANDER_LANES * EXPANDER_LANES;
        let (head, tail) = rows.split_at_mut(main);

        for group in head.chunks_exact_mut(EXPANDER_LANES) {
            samplers.draw_group(|p, idx| group[p].push(idx), EXPANDER_LANES);
        }

        for row in tail.iter_mut() {
            samplers.draw_group(|_, idx| row.push(idx), 1);
        }

        rows
    }
}
