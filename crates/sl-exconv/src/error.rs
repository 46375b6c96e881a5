// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

use thiserror::Error;

/// ExConv configuration and usage errors.
///
/// All of them are precondition violations: the encode is aborted and
/// nothing is written to the caller's buffers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExConvError {
    /// Message size is zero
    #[error("Message size must be non zero")]
    EmptyMessage,

    /// Code is shorter than the message, or leaves no parity positions
    #[error("Code size {code_size} is too short for message size {message_size}")]
    CodeTooShort {
        message_size: usize,
        code_size: usize,
    },

    /// Accumulator coefficients of one position must fit a u64
    #[error("Accumulator width {width} exceeds 64 bits")]
    AccumulatorTooWide { width: usize },

    /// Fixed-width sweep requested for an accumulator of another width
    #[error("Fixed accumulator width {fixed} does not match width {width}")]
    AccumulatorWidthMismatch { width: usize, fixed: usize },

    /// Expander source domain cannot hold one index per stratum
    #[error("Expander domain of size {domain} cannot be split into {strata} strata")]
    ExpanderDomainTooSmall { domain: usize, strata: usize },

    /// Supplied vector does not have the configured length
    #[error("Invalid vector length {actual}, expected {expected}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Systematic-only operation on a non-systematic code
    #[error("Operation requires a systematic code")]
    NotSystematic,
}

/// Fails with [`ExConvError::LengthMismatch`] unless `actual == expected`.
pub(crate) fn check_len(
    expected: usize,
    actual: usize,
) -> Result<(), ExConvError> {
    if expected != actual {
        return Err(ExConvError::LengthMismatch { expected, actual });
    }

    Ok(())
}
