// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

use std::fmt;
use std::ops::{BitXor, BitXorAssign, Not};

/// Low 64 bits of the reduction polynomial x^128 + x^7 + x^2 + x + 1.
const GF128_REDUCTION: u128 = 0x87;

/// A 128-bit value. Used as PRNG seed and as element of GF(2^128).
///
/// Bit `i` of the inner `u128` is the coefficient of x^i. Byte
/// conversions are little-endian.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Block(pub u128);

impl Block {
    /// All zero block
    pub const ZERO: Block = Block(0);

    /// Block with value one
    pub const ONE: Block = Block(1);

    /// Build a block from its high and low 64-bit halves.
    pub const fn from_u64s(hi: u64, lo: u64) -> Self {
        Block(((hi as u128) << 64) | lo as u128)
    }

    /// High 64 bits
    pub const fn hi(&self) -> u64 {
        (self.0 >> 64) as u64
    }

    /// Low 64 bits
    pub const fn lo(&self) -> u64 {
        self.0 as u64
    }

    pub const fn to_le_bytes(&self) -> [u8; 16] {
        self.0.to_le_bytes()
    }

    pub const fn from_le_bytes(bytes: [u8; 16]) -> Self {
        Block(u128::from_le_bytes(bytes))
    }

    /// Multiply by `x` in GF(2^128) modulo x^128 + x^7 + x^2 + x + 1.
    pub const fn mul_x(&self) -> Self {
        let carry = self.0 >> 127;
        Block((self.0 << 1) ^ (carry * GF128_REDUCTION))
    }

    /// Multiplies `self` and `rhs` in GF(2^128) modulo
    /// x^128 + x^7 + x^2 + x + 1.
    ///
    /// Right-to-left shift-and-add: `rhs` is multiplied by x once per bit
    /// of `self`, so the product never leaves 128 bits.
    pub fn gf128_mul(&self, rhs: &Block) -> Block {
        let mut acc = 0u128;
        let mut b = *rhs;
        let mut a = self.0;

        while a != 0 {
            if a & 1 == 1 {
                acc ^= b.0;
            }
            a >>= 1;
            b = b.mul_x();
        }

        Block(acc)
    }
}

impl From<u128> for Block {
    fn from(v: u128) -> Self {
        Block(v)
    }
}

impl From<[u8; 16]> for Block {
    fn from(bytes: [u8; 16]) -> Self {
        Block::from_le_bytes(bytes)
    }
}

impl Not for Block {
    type Output = Block;

    fn not(self) -> Block {
        Block(!self.0)
    }
}

impl BitXor for Block {
    type Output = Block;

    fn bitxor(self, rhs: Block) -> Block {
        Block(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Block {
    fn bitxor_assign(&mut self, rhs: Block) {
        self.0 ^= rhs.0;
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Block({:032x})", self.0)
    }
}
