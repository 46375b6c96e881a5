// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

//! Expand-convolute (ExConv) linear code.
//!
//! The dual encoder of an ExConv code maps a length `n` vector to a length
//! `k` vector in two seeded passes: a convolutional accumulator that runs
//! over the codeword in place, followed by a sparse expander that sums
//! `weight` accumulated positions into each message position. Encoding is
//! generic over the element type through [`CoeffCtx`].
//!
//! ```ignore
//! let code = ExConvCode::config(1024, 2048, 7, 24, true)?;
//! let message = code.dual_encode(noisy, &Gf128Ctx)?;
//! ```

pub mod accumulator;
pub mod block;
pub mod coeff_ctx;
pub mod constants;
pub mod error;
pub mod exconv;
pub mod expander;
pub mod params;
pub mod prng;

#[cfg(test)]
mod reference;

pub use accumulator::Accumulator;
pub use block::Block;
pub use coeff_ctx::{ArrayCtx, CoeffCtx, Gf128Ctx, Gf2Ctx, IntegerCtx};
pub use error::ExConvError;
pub use exconv::ExConvCode;
pub use expander::ExpanderCode;
pub use params::ExConvParams;
pub use prng::{CoefficientStream, ExpanderSampler};
