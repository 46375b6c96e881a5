// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

//! Expand-convolute code: a seeded accumulator followed by a sparse
//! expander, used as the dual encoder that compresses a noisy length `n`
//! vector into `k` pseudorandom correlations.

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::{
    accumulator::Accumulator, coeff_ctx::CoeffCtx, error::check_len,
    expander::ExpanderCode, params::ExConvParams, Block, ExConvError,
};

/// A configured ExConv code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExConvCode {
    params: ExConvParams,
    accumulator: Accumulator,
    expander: ExpanderCode,
}

impl ExConvCode {
    /// Build a code from validated parameters.
    pub fn new(params: ExConvParams) -> Result<Self, ExConvError> {
        params.validate()?;

        let accumulator =
            Accumulator::new(params.accumulator_width, params.mix_twice)?;
        let expander = ExpanderCode::new(
            params.message_size,
            params.parity_size(),
            params.expander_weight,
            params.regular_expander,
            params.seed,
        )?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            k = params.message_size,
            n = params.code_size,
            bw = params.expander_weight,
            aw = params.accumulator_width,
            systematic = params.systematic,
            regular = params.regular_expander,
            mix_twice = params.mix_twice,
            "configured ExConv code"
        );

        Ok(Self {
            params,
            accumulator,
            expander,
        })
    }

    /// Code with message size `k`, code size `n` (`0` for `2k`), expander
    /// weight `bw` and accumulator width `aw`. Remaining parameters take
    /// their defaults.
    pub fn config(
        k: usize,
        n: usize,
        bw: usize,
        aw: usize,
        systematic: bool,
    ) -> Result<Self, ExConvError> {
        Self::new(
            ExConvParams::new(k, n)
                .with_expander_weight(bw)
                .with_accumulator_width(aw)
                .with_systematic(systematic),
        )
    }

    pub fn params(&self) -> &ExConvParams {
        &self.params
    }

    pub fn message_size(&self) -> usize {
        self.params.message_size
    }

    pub fn code_size(&self) -> usize {
        self.params.code_size
    }

    /// Length of the accumulated part of a codeword.
    pub fn parity_size(&self) -> usize {
        self.params.parity_size()
    }

    pub fn is_systematic(&self) -> bool {
        self.params.systematic
    }

    pub fn seed(&self) -> Block {
        self.params.seed
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn expander(&self) -> &ExpanderCode {
        &self.expander
    }

    /// Accumulate a length `n` codeword in place. Only the parity part,
    /// `codeword[acc_offset..]`, is touched.
    pub fn accumulate<C: CoeffCtx>(
        &self,
        codeword: &mut [C::Elem],
        ctx: &C,
    ) -> Result<(), ExConvError> {
        check_len(self.code_size(), codeword.len())?;

        let offset = self.params.acc_offset();
        self.accumulator
            .accumulate(&mut codeword[offset..], ctx, self.params.seed)
    }

    /// Expand an accumulated length `n` codeword into its message. A
    /// systematic code starts from the prefix `codeword[..k]`.
    pub fn expand<C: CoeffCtx>(
        &self,
        codeword: &[C::Elem],
        ctx: &C,
    ) -> Result<Vec<C::Elem>, ExConvError> {
        check_len(self.code_size(), codeword.len())?;

        let mut message = if self.params.systematic {
            codeword[..self.message_size()].to_vec()
        } else {
            vec![ctx.zero(); self.message_size()]
        };
        self.expand_add(codeword, &mut message, ctx)?;

        Ok(message)
    }

    /// Add the expander sums of an accumulated length `n` codeword into
    /// `message`. The systematic prefix is not added.
    pub fn expand_add<C: CoeffCtx>(
        &self,
        codeword: &[C::Elem],
        message: &mut [C::Elem],
        ctx: &C,
    ) -> Result<(), ExConvError> {
        check_len(self.code_size(), codeword.len())?;

        let parity = &codeword[self.params.acc_offset()..];
        self.expander.expand::<C, true>(parity, message, ctx)
    }

    /// Split a systematic codeword into its message prefix and parity
    /// suffix.
    pub fn split_systematic<'a, E>(
        &self,
        codeword: &'a mut [E],
    ) -> Result<(&'a mut [E], &'a mut [E]), ExConvError> {
        if !self.params.systematic {
            return Err(ExConvError::NotSystematic);
        }
        check_len(self.code_size(), codeword.len())?;

        Ok(codeword.split_at_mut(self.message_size()))
    }

    /// Dual-encode `codeword` in place: accumulate, then expand. The
    /// message ends up in `codeword[..k]`, the rest is scratch.
    pub fn dual_encode_in_place<C: CoeffCtx>(
        &self,
        codeword: &mut [C::Elem],
        ctx: &C,
    ) -> Result<(), ExConvError> {
        check_len(self.code_size(), codeword.len())?;

        #[cfg(feature = "tracing")]
        tracing::trace!(n = codeword.len(), "dual encode");

        let seed = self.params.seed;

        if self.params.systematic {
            let (message, parity) = self.split_systematic(codeword)?;
            self.accumulator.accumulate(parity, ctx, seed)?;
            self.expander.expand::<C, true>(parity, message, ctx)
        } else {
            self.accumulator.accumulate(codeword, ctx, seed)?;

            let mut message = vec![ctx.zero(); self.message_size()];
            self.expander.expand::<C, false>(codeword, &mut message, ctx)?;
            codeword[..message.len()].copy_from_slice(&message);

            Ok(())
        }
    }

    /// Dual-encode a length `n` codeword into its length `k` message.
    pub fn dual_encode<C: CoeffCtx>(
        &self,
        mut codeword: Vec<C::Elem>,
        ctx: &C,
    ) -> Result<Vec<C::Elem>, ExConvError> {
        self.dual_encode_in_place(&mut codeword, ctx)?;
        codeword.truncate(self.message_size());

        Ok(codeword)
    }

    /// Dual-encode independent codewords in parallel, truncating each to
    /// its message. On error the vectors are left in an unspecified state.
    #[cfg(feature = "rayon")]
    pub fn dual_encode_many<C: CoeffCtx + Sync>(
        &self,
        codewords: &mut [Vec<C::Elem>],
        ctx: &C,
    ) -> Result<(), ExConvError> {
        let k = self.message_size();

        codewords.par_iter_mut().try_for_each(|codeword| {
            self.dual_encode_in_place(codeword, ctx)?;
            codeword.truncate(k);
            Ok(())
        })
    }
}
