//! Multi-lane words for batched compression.
//!
//! `Wide` is the portable form, an array of scalar words with every operation
//! applied lane by lane. On x86_64 the `sse2` module provides 128-bit register
//! forms for the native lane counts.

use std::array;
use std::ops::{BitAnd, BitXor, Not};

use crate::word::{LaneWord, Word};

#[cfg(target_arch = "x86_64")]
pub mod sse2;

/// `N` independent scalar words processed in lockstep.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wide<W, const N: usize>(pub [W; N]);

impl<W: Word, const N: usize> BitXor for Wide<W, N> {
    type Output = Self;

    #[inline(always)]
    fn bitxor(self, rhs: Self) -> Self {
        Wide(array::from_fn(|i| self.0[i] ^ rhs.0[i]))
    }
}

impl<W: Word, const N: usize> BitAnd for Wide<W, N> {
    type Output = Self;

    #[inline(always)]
    fn bitand(self, rhs: Self) -> Self {
        Wide(array::from_fn(|i| self.0[i] & rhs.0[i]))
    }
}

impl<W: Word, const N: usize> Not for Wide<W, N> {
    type Output = Self;

    #[inline(always)]
    fn not(self) -> Self {
        Wide(array::from_fn(|i| !self.0[i]))
    }
}

impl<W: Word, const N: usize> LaneWord for Wide<W, N> {
    type Scalar = W;

    const LANES: usize = N;

    #[inline(always)]
    fn splat(x: W) -> Self {
        Wide([x; N])
    }

    #[inline(always)]
    fn gather<F: FnMut(usize) -> W>(f: F) -> Self {
        Wide(array::from_fn(f))
    }

    #[inline(always)]
    fn lane(&self, i: usize) -> W {
        self.0[i]
    }

    #[inline(always)]
    fn rotr(self, n: u32) -> Self {
        Wide(array::from_fn(|i| self.0[i].rotr(n)))
    }

    #[inline(always)]
    fn rotl(self, n: u32) -> Self {
        Wide(array::from_fn(|i| self.0[i].rotl(n)))
    }

    #[inline(always)]
    fn shr(self, n: u32) -> Self {
        Wide(array::from_fn(|i| self.0[i].shr(n)))
    }

    #[inline(always)]
    fn wrapping_add(self, rhs: Self) -> Self {
        Wide(array::from_fn(|i| self.0[i].wrapping_add(rhs.0[i])))
    }
}
