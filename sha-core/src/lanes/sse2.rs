//! SSE2 lane words. SSE2 is part of the x86_64 baseline, so every intrinsic
//! used here is available on any x86_64 target.

use std::arch::x86_64::*;
use std::fmt::{self, Debug, Formatter};
use std::ops::{BitAnd, BitXor, Not};

use crate::word::LaneWord;

macro_rules! impl_sse2 {
    ($name:ident, $scalar:ty, $lanes:expr, $bits:expr, $set1:ident, $add:ident, $srl:ident, $sll:ident) => {
        #[derive(Clone, Copy)]
        #[repr(transparent)]
        pub struct $name(__m128i);

        impl $name {
            #[inline(always)]
            fn to_array(self) -> [$scalar; $lanes] {
                let mut out = [0 as $scalar; $lanes];
                unsafe { _mm_storeu_si128(out.as_mut_ptr() as *mut __m128i, self.0) };
                out
            }

            #[inline(always)]
            fn from_array(words: [$scalar; $lanes]) -> Self {
                $name(unsafe { _mm_loadu_si128(words.as_ptr() as *const __m128i) })
            }
        }

        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.to_array()).finish()
            }
        }

        impl BitXor for $name {
            type Output = Self;

            #[inline(always)]
            fn bitxor(self, rhs: Self) -> Self {
                $name(unsafe { _mm_xor_si128(self.0, rhs.0) })
            }
        }

        impl BitAnd for $name {
            type Output = Self;

            #[inline(always)]
            fn bitand(self, rhs: Self) -> Self {
                $name(unsafe { _mm_and_si128(self.0, rhs.0) })
            }
        }

        impl Not for $name {
            type Output = Self;

            #[inline(always)]
            fn not(self) -> Self {
                $name(unsafe { _mm_xor_si128(self.0, _mm_set1_epi32(-1)) })
            }
        }

        impl LaneWord for $name {
            type Scalar = $scalar;

            const LANES: usize = $lanes;

            #[inline(always)]
            fn splat(x: $scalar) -> Self {
                $name(unsafe { $set1(x as _) })
            }

            #[inline(always)]
            fn gather<F: FnMut(usize) -> $scalar>(f: F) -> Self {
                Self::from_array(std::array::from_fn(f))
            }

            #[inline(always)]
            fn lane(&self, i: usize) -> $scalar {
                self.to_array()[i]
            }

            // Shift counts of `$bits` or more clear the lane, so a zero rotation
            // still yields the input.
            #[inline(always)]
            fn rotr(self, n: u32) -> Self {
                unsafe {
                    let right = _mm_cvtsi32_si128(n as i32);
                    let left = _mm_cvtsi32_si128(($bits - n) as i32);
                    $name(_mm_or_si128($srl(self.0, right), $sll(self.0, left)))
                }
            }

            #[inline(always)]
            fn rotl(self, n: u32) -> Self {
                unsafe {
                    let left = _mm_cvtsi32_si128(n as i32);
                    let right = _mm_cvtsi32_si128(($bits - n) as i32);
                    $name(_mm_or_si128($sll(self.0, left), $srl(self.0, right)))
                }
            }

            #[inline(always)]
            fn shr(self, n: u32) -> Self {
                $name(unsafe { $srl(self.0, _mm_cvtsi32_si128(n as i32)) })
            }

            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                $name(unsafe { $add(self.0, rhs.0) })
            }
        }
    };
}

impl_sse2!(U32x4, u32, 4, 32u32, _mm_set1_epi32, _mm_add_epi32, _mm_srl_epi32, _mm_sll_epi32);
impl_sse2!(U64x2, u64, 2, 64u32, _mm_set1_epi64x, _mm_add_epi64, _mm_srl_epi64, _mm_sll_epi64);
