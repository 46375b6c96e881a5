// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

use crate::Block;

/// Seed used when none is configured.
pub const DEFAULT_SEED: Block =
    Block::from_u64s(9996754675674599, 56756745976768754);

/// XORed into the code seed to key the stratified (regular) expander
/// sampler, separating it from the full-domain sampler.
pub const REGULAR_SAMPLER_DOMAIN: Block =
    Block::from_u64s(342342134, 23421341);

/// Default number of expander sources per message position.
pub const DEFAULT_EXPANDER_WEIGHT: usize = 7;

/// Default number of accumulator coefficient bits per position.
pub const DEFAULT_ACCUMULATOR_WIDTH: usize = 24;

/// Widest accumulator; all coefficient bits of one position fit a `u64`.
pub const MAX_ACCUMULATOR_WIDTH: usize = 64;

/// A regular expander draws `ceil(weight / REGULAR_SPLIT_DIVISOR)` of its
/// sources from disjoint strata and the rest from the full domain.
pub const REGULAR_SPLIT_DIVISOR: usize = 2;

/// Message positions expanded together in one lane group.
pub const EXPANDER_LANES: usize = 8;

/// Size of a PRNG block in bytes.
pub const BLOCK_BYTES: usize = 16;

/// Blocks in the accumulator coefficient buffer.
pub const COEFF_BUFFER_BLOCKS: usize = 256;

/// Bytes in the accumulator coefficient buffer.
pub const COEFF_BUFFER_BYTES: usize = COEFF_BUFFER_BLOCKS * BLOCK_BYTES;

/// 64-bit words in the expander sampler buffer.
pub const SAMPLER_BUFFER_WORDS: usize = 256;

/// ChaCha stream id of the accumulator coefficient stream.
pub const COEFF_STREAM_ID: u64 = 0;

/// ChaCha stream id of the expander index samplers.
pub const SAMPLER_STREAM_ID: u64 = 1;
