// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

use crate::{
    constants::{
        DEFAULT_ACCUMULATOR_WIDTH, DEFAULT_EXPANDER_WEIGHT, DEFAULT_SEED,
        MAX_ACCUMULATOR_WIDTH,
    },
    Block, ExConvError,
};

/// Parameters of an ExConv code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExConvParams {
    /// Message size `k`
    pub message_size: usize,
    /// Code size `n`
    pub code_size: usize,
    /// Expander sources per message position
    pub expander_weight: usize,
    /// Accumulator coefficient bits per position, at most 64
    pub accumulator_width: usize,
    /// The first `k` codeword positions are the message itself
    pub systematic: bool,
    /// Stratify half of the expander picks
    pub regular_expander: bool,
    /// Run a second accumulator sweep keyed by `!seed`
    pub mix_twice: bool,
    /// Seed of the accumulator coefficients and expander samplers
    pub seed: Block,
}

impl ExConvParams {
    /// Default parameters for message size `k` and code size `n`.
    /// `n == 0` selects `n = 2k`.
    pub fn new(message_size: usize, code_size: usize) -> Self {
        let code_size = if code_size == 0 {
            2 * message_size
        } else {
            code_size
        };

        Self {
            message_size,
            code_size,
            expander_weight: DEFAULT_EXPANDER_WEIGHT,
            accumulator_width: DEFAULT_ACCUMULATOR_WIDTH,
            systematic: true,
            regular_expander: true,
            mix_twice: true,
            seed: DEFAULT_SEED,
        }
    }

    pub fn with_expander_weight(mut self, weight: usize) -> Self {
        self.expander_weight = weight;
        self
    }

    pub fn with_accumulator_width(mut self, width: usize) -> Self {
        self.accumulator_width = width;
        self
    }

    pub fn with_systematic(mut self, systematic: bool) -> Self {
        self.systematic = systematic;
        self
    }

    pub fn with_regular_expander(mut self, regular: bool) -> Self {
        self.regular_expander = regular;
        self
    }

    pub fn with_mix_twice(mut self, mix_twice: bool) -> Self {
        self.mix_twice = mix_twice;
        self
    }

    pub fn with_seed(mut self, seed: Block) -> Self {
        self.seed = seed;
        self
    }

    /// Offset of the accumulated part of a codeword.
    pub fn acc_offset(&self) -> usize {
        if self.systematic {
            self.message_size
        } else {
            0
        }
    }

    /// Length of the accumulated part of a codeword.
    pub fn parity_size(&self) -> usize {
        self.code_size.saturating_sub(self.acc_offset())
    }

    /// Check size relations and widths. The expander domain is checked
    /// when the expander is built.
    pub fn validate(&self) -> Result<(), ExConvError> {
        if self.message_size == 0 {
            return Err(ExConvError::EmptyMessage);
        }

        if self.code_size < self.message_size
            || (self.systematic && self.code_size == self.message_size)
        {
            return Err(ExConvError::CodeTooShort {
                message_size: self.message_size,
                code_size: self.code_size,
            });
        }

        if self.accumulator_width > MAX_ACCUMULATOR_WIDTH {
            return Err(ExConvError::AccumulatorTooWide {
                width: self.accumulator_width,
            });
        }

        Ok(())
    }
}
