use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{BitAnd, BitXor, Not};

use byteorder::{BigEndian, ByteOrder};

/// A word the round functions operate on, possibly holding several independent lanes.
///
/// Every operation acts on each lane separately; there is never a carry or a
/// rotation across lane boundaries.
pub trait LaneWord:
    Copy + Debug + Send + Sync + BitXor<Output = Self> + BitAnd<Output = Self> + Not<Output = Self>
{
    /// The scalar word held in every lane.
    type Scalar: Word;

    /// Number of lanes.
    const LANES: usize;

    /// Broadcast `x` into every lane.
    fn splat(x: Self::Scalar) -> Self;

    /// Build a word whose lane `i` is `f(i)`.
    fn gather<F: FnMut(usize) -> Self::Scalar>(f: F) -> Self;

    /// Extract lane `i`.
    fn lane(&self, i: usize) -> Self::Scalar;

    fn rotr(self, n: u32) -> Self;
    fn rotl(self, n: u32) -> Self;
    fn shr(self, n: u32) -> Self;
    fn wrapping_add(self, rhs: Self) -> Self;
}

/// A scalar SHA word, `u32` or `u64`.
pub trait Word: LaneWord<Scalar = Self> + Default + Eq + Ord + Hash + 'static {
    const BITS: u32;
    const BYTES: usize;

    /// The 128-bit native lane word for this width (four `u32` or two `u64` lanes).
    type Native: LaneWord<Scalar = Self>;

    fn read_be(bytes: &[u8]) -> Self;
    fn write_be(self, out: &mut [u8]);
    fn byteswap(self) -> Self;
    fn from_u128(x: u128) -> Self;
}

macro_rules! impl_word {
    ($t:ty, $bytes:expr, $read:ident, $write:ident, $native:ty) => {
        impl LaneWord for $t {
            type Scalar = $t;

            const LANES: usize = 1;

            #[inline(always)]
            fn splat(x: $t) -> Self {
                x
            }

            #[inline(always)]
            fn gather<F: FnMut(usize) -> $t>(mut f: F) -> Self {
                f(0)
            }

            #[inline(always)]
            fn lane(&self, i: usize) -> $t {
                debug_assert_eq!(i, 0);
                *self
            }

            #[inline(always)]
            fn rotr(self, n: u32) -> Self {
                self.rotate_right(n)
            }

            #[inline(always)]
            fn rotl(self, n: u32) -> Self {
                self.rotate_left(n)
            }

            #[inline(always)]
            fn shr(self, n: u32) -> Self {
                self >> n
            }

            #[inline(always)]
            fn wrapping_add(self, rhs: Self) -> Self {
                <$t>::wrapping_add(self, rhs)
            }
        }

        impl Word for $t {
            const BITS: u32 = $bytes * 8;
            const BYTES: usize = $bytes;

            type Native = $native;

            #[inline(always)]
            fn read_be(bytes: &[u8]) -> Self {
                BigEndian::$read(bytes)
            }

            #[inline(always)]
            fn write_be(self, out: &mut [u8]) {
                BigEndian::$write(out, self)
            }

            #[inline(always)]
            fn byteswap(self) -> Self {
                self.swap_bytes()
            }

            #[inline(always)]
            fn from_u128(x: u128) -> Self {
                x as $t
            }
        }
    };
}

#[cfg(target_arch = "x86_64")]
impl_word!(u32, 4, read_u32, write_u32, crate::lanes::sse2::U32x4);
#[cfg(target_arch = "x86_64")]
impl_word!(u64, 8, read_u64, write_u64, crate::lanes::sse2::U64x2);

#[cfg(not(target_arch = "x86_64"))]
impl_word!(u32, 4, read_u32, write_u32, crate::lanes::Wide<u32, 4>);
#[cfg(not(target_arch = "x86_64"))]
impl_word!(u64, 8, read_u64, write_u64, crate::lanes::Wide<u64, 2>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalar_rotations() {
        assert_eq!(LaneWord::rotr(0x0000_0001u32, 1), 0x8000_0000);
        assert_eq!(LaneWord::rotl(0x8000_0000u32, 1), 0x0000_0001);
        assert_eq!(LaneWord::rotr(0x1u64, 61), 0x8);
        assert_eq!(LaneWord::shr(0xffff_ffffu32, 10), 0x003f_ffff);
    }

    #[test]
    fn test_scalar_add_wraps() {
        assert_eq!(LaneWord::wrapping_add(u32::MAX, 2u32), 1);
        assert_eq!(LaneWord::wrapping_add(u64::MAX, 1u64), 0);
    }

    #[test]
    fn test_big_endian_roundtrip() {
        let mut out = [0u8; 8];
        0x0102_0304_0506_0708u64.write_be(&mut out);
        assert_eq!(out, [1, 2, 3, 4, 5, 6, 7, 8]);
        assert_eq!(u32::read_be(&out[4..]), 0x0506_0708);
        assert_eq!(42u32.byteswap(), 0x2a00_0000);
    }
}
