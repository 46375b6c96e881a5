// Copyright (c) Silence Laboratories Pte. Ltd. All Rights Reserved.
// This software is licensed under the Silence Laboratories License Agreement.

//! Coefficient contexts.
//!
//! A context fixes the algebra the encoder runs in: how two codeword
//! elements are added and what the code's normalization constant does to
//! an element. Contexts carry no state, the encoder is monomorphized over
//! them.

use std::fmt::{self, Debug};
use std::marker::PhantomData;

use rand::{Rng, RngCore};

use crate::Block;

/// Algebraic operations over the codeword element type.
pub trait CoeffCtx {
    /// Codeword element
    type Elem: Copy + PartialEq + Debug + Send + Sync;

    /// Additive identity.
    fn zero(&self) -> Self::Elem;

    /// Returns `a + b`.
    fn plus(&self, a: &Self::Elem, b: &Self::Elem) -> Self::Elem;

    /// Returns `κ·a` for the code-intrinsic constant κ of this context.
    fn mul_const(&self, a: &Self::Elem) -> Self::Elem;

    fn eq(&self, a: &Self::Elem, b: &Self::Elem) -> bool {
        a == b
    }

    /// Printable form of an element, used in consistency reports.
    fn fmt_elem(&self, a: &Self::Elem) -> String;

    /// Uniformly random element.
    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> Self::Elem;
}

/// Integers modulo 2^w, κ = 2.
pub struct IntegerCtx<T>(PhantomData<T>);

impl<T> IntegerCtx<T> {
    pub const fn new() -> Self {
        IntegerCtx(PhantomData)
    }
}

impl<T> Default for IntegerCtx<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for IntegerCtx<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for IntegerCtx<T> {}

impl<T> Debug for IntegerCtx<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IntegerCtx<{}>", std::any::type_name::<T>())
    }
}

macro_rules! impl_integer_ctx {
    ($($t:ty),*) => {
        $(
            impl CoeffCtx for IntegerCtx<$t> {
                type Elem = $t;

                fn zero(&self) -> $t {
                    0
                }

                fn plus(&self, a: &$t, b: &$t) -> $t {
                    a.wrapping_add(*b)
                }

                fn mul_const(&self, a: &$t) -> $t {
                    a.wrapping_shl(1)
                }

                fn fmt_elem(&self, a: &$t) -> String {
                    a.to_string()
                }

                fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> $t {
                    rng.gen()
                }
            }
        )*
    }
}

impl_integer_ctx!(u8, u16, u32, u64, u128);

/// GF(2^128) over [`Block`], κ = x.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gf128Ctx;

impl CoeffCtx for Gf128Ctx {
    type Elem = Block;

    fn zero(&self) -> Block {
        Block::ZERO
    }

    fn plus(&self, a: &Block, b: &Block) -> Block {
        *a ^ *b
    }

    fn mul_const(&self, a: &Block) -> Block {
        a.mul_x()
    }

    fn fmt_elem(&self, a: &Block) -> String {
        a.to_string()
    }

    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> Block {
        Block(rng.gen())
    }
}

/// Byte arrays with per-byte GF(2^8) arithmetic (modulus 0x11d), κ = x.
#[derive(Clone, Copy, Debug, Default)]
pub struct ArrayCtx<const N: usize>;

/// Multiply a GF(2^8) element by x modulo x^8 + x^4 + x^3 + x^2 + 1.
#[inline(always)]
fn gf256_mul_x(b: u8) -> u8 {
    (b << 1) ^ ((b >> 7) * 0x1d)
}

impl<const N: usize> CoeffCtx for ArrayCtx<N> {
    type Elem = [u8; N];

    fn zero(&self) -> [u8; N] {
        [0u8; N]
    }

    fn plus(&self, a: &[u8; N], b: &[u8; N]) -> [u8; N] {
        let mut c = *a;
        c.iter_mut().zip(b).for_each(|(c, b)| *c ^= b);
        c
    }

    fn mul_const(&self, a: &[u8; N]) -> [u8; N] {
        a.map(gf256_mul_x)
    }

    fn fmt_elem(&self, a: &[u8; N]) -> String {
        let bytes: Vec<String> = a.iter().map(|b| b.to_string()).collect();
        format!("{{{}}}", bytes.join(" "))
    }

    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> [u8; N] {
        let mut a = [0u8; N];
        rng.fill_bytes(&mut a);
        a
    }
}

/// Single bits, GF(2). κ = 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gf2Ctx;

impl CoeffCtx for Gf2Ctx {
    type Elem = bool;

    fn zero(&self) -> bool {
        false
    }

    fn plus(&self, a: &bool, b: &bool) -> bool {
        a ^ b
    }

    fn mul_const(&self, a: &bool) -> bool {
        *a
    }

    fn fmt_elem(&self, a: &bool) -> String {
        (*a as u8).to_string()
    }

    fn sample<R: RngCore + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen()
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    #[test]
    fn integer_wraps() {
        let ctx = IntegerCtx::<u8>::new();
        assert_eq!(ctx.plus(&250, &10), 4);
        assert_eq!(ctx.mul_const(&0x81), 0x02);
        assert_eq!(ctx.zero(), 0);

        let ctx = IntegerCtx::<u32>::new();
        assert_eq!(ctx.plus(&u32::MAX, &1), 0);
        assert_eq!(ctx.mul_const(&7), 14);
        assert_eq!(ctx.fmt_elem(&42), "42");
    }

    #[test]
    fn integer_plus_is_commutative_group() {
        fn prop(a: u64, b: u64, c: u64) -> bool {
            let ctx = IntegerCtx::<u64>::new();
            ctx.plus(&a, &b) == ctx.plus(&b, &a)
                && ctx.plus(&ctx.plus(&a, &b), &c)
                    == ctx.plus(&a, &ctx.plus(&b, &c))
                && ctx.plus(&a, &ctx.zero()) == a
        }

        quickcheck(prop as fn(u64, u64, u64) -> bool)
    }

    #[test]
    fn gf128_mul_const_is_linear() {
        fn prop(a: u64, b: u64) -> bool {
            let ctx = Gf128Ctx;
            let a = Block::from_u64s(a, b);
            let b = Block::from_u64s(b, a.lo().rotate_left(13));

            ctx.mul_const(&ctx.plus(&a, &b))
                == ctx.plus(&ctx.mul_const(&a), &ctx.mul_const(&b))
        }

        quickcheck(prop as fn(u64, u64) -> bool)
    }

    #[test]
    fn array_is_bytewise() {
        let ctx = ArrayCtx::<4>;
        let a = [1u8, 2, 0x80, 0xff];
        let b = [1u8, 3, 0x80, 0x0f];

        assert_eq!(ctx.plus(&a, &b), [0, 1, 0, 0xf0]);
        assert_eq!(ctx.plus(&a, &a), ctx.zero());
        assert_eq!(ctx.mul_const(&a), [2, 4, 0x1d, 0xe3]);
        assert_eq!(ctx.fmt_elem(&a), "{1 2 128 255}");
    }

    #[test]
    fn array_mul_const_is_linear() {
        fn prop(a: u32, b: u32) -> bool {
            let ctx = ArrayCtx::<4>;
            let (a, b) = (a.to_le_bytes(), b.to_le_bytes());

            ctx.mul_const(&ctx.plus(&a, &b))
                == ctx.plus(&ctx.mul_const(&a), &ctx.mul_const(&b))
        }

        quickcheck(prop as fn(u32, u32) -> bool)
    }

    #[test]
    fn gf2_is_xor() {
        let ctx = Gf2Ctx;
        assert!(!ctx.plus(&true, &true));
        assert!(ctx.plus(&true, &false));
        assert!(ctx.mul_const(&true));
        assert!(!ctx.mul_const(&false));
        assert_eq!(ctx.fmt_elem(&true), "1");
    }
}
