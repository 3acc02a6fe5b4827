//! Per-variant parameters.
//!
//! Every SHA-1/SHA-2 variant is a zero sized descriptor type implementing
//! [`Variant`]. The engine in [`crate::algorithm`] is generic over it, so the
//! strength/digest pairing is fixed at compile time.

#![allow(non_camel_case_types)]

use std::fmt::Debug;
use std::hash::Hash;

use lazy_static::lazy_static;

use crate::consts::*;
use crate::schedule::{pad_schedules, PadSchedules};
use crate::word::Word;

/// Rotation and shift amounts for the SHA-2 sigma functions.
///
/// Each `big` entry lists three right rotations; each `small` entry lists two
/// right rotations followed by a right shift.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotations {
    pub big0: [u32; 3],
    pub big1: [u32; 3],
    pub small0: [u32; 3],
    pub small1: [u32; 3],
}

pub const ROTATIONS_256: Rotations = Rotations {
    big0: [2, 13, 22],
    big1: [6, 11, 25],
    small0: [7, 18, 3],
    small1: [17, 19, 10],
};

pub const ROTATIONS_512: Rotations = Rotations {
    big0: [28, 34, 39],
    big1: [14, 18, 41],
    small0: [1, 8, 7],
    small1: [19, 61, 6],
};

/// Round function family.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Family {
    Sha1,
    Sha2(Rotations),
}

/// Compile-time description of one hash variant.
pub trait Variant: Copy + Clone + Debug + Default + Eq + Send + Sync + 'static {
    type Word: Word;
    type State: Copy
        + Debug
        + Eq
        + Hash
        + Send
        + Sync
        + AsRef<[Self::Word]>
        + AsMut<[Self::Word]>;
    type Block: Copy + Debug + Eq + Send + Sync + AsRef<[u8]> + AsMut<[u8]>;
    type Half: Copy + Debug + Eq + Send + Sync + AsRef<[u8]> + AsMut<[u8]>;
    type Digest: Copy
        + Debug
        + Eq
        + Ord
        + Hash
        + Send
        + Sync
        + AsRef<[u8]>
        + AsMut<[u8]>
        + for<'a> TryFrom<&'a [u8]>;

    const NAME: &'static str;
    const FAMILY: Family;
    const ROUNDS: usize;
    const K: &'static [Self::Word];
    const H: Self::State;
    const DIGEST_BITS: usize;

    /// All-zero values of the fixed-size byte types.
    const EMPTY_BLOCK: Self::Block;
    const EMPTY_HALF: Self::Half;
    const EMPTY_DIGEST: Self::Digest;

    const WORD_BYTES: usize = <Self::Word as Word>::BYTES;
    const BLOCK_BYTES: usize = BLOCK_WORDS * Self::WORD_BYTES;
    const HALF_BYTES: usize = Self::BLOCK_BYTES / 2;
    const DIGEST_BYTES: usize = Self::DIGEST_BITS / 8;
    const STATE_BYTES: usize = Self::STATE_WORDS * Self::WORD_BYTES;
    const STATE_WORDS: usize = match Self::FAMILY {
        Family::Sha1 => 5,
        Family::Sha2(_) => 8,
    };

    /// Width of the trailing big-endian length field in bytes (8 or 16).
    const COUNT_BYTES: usize = 2 * Self::WORD_BYTES;
    const BLOCK_BITS: u128 = (Self::BLOCK_BYTES as u128) * 8;

    /// Largest message length in bits the length field can carry, less one block.
    const LIMIT_BITS: u128 = if Self::COUNT_BYTES == 8 {
        u64::MAX as u128 - Self::BLOCK_BITS
    } else {
        u128::MAX - Self::BLOCK_BITS
    };

    /// Expanded schedules of the padding block that follows exactly `n` whole blocks.
    fn pad_schedules() -> &'static PadSchedules<Self::Word>;
}

lazy_static! {
    static ref PADS_160: PadSchedules<u32> = pad_schedules::<Sha160>();
    static ref PADS_256: PadSchedules<u32> = pad_schedules::<Sha256_256>();
    static ref PADS_512: PadSchedules<u64> = pad_schedules::<Sha512_512>();
}

macro_rules! variant {
    (
        $(#[$attr:meta])*
        $name:ident, $word:ty, $state_words:expr, $digest_bits:expr, $block_bytes:expr,
        $family:expr, $rounds:expr, $k:expr, $h:expr, $pads:ident
    ) => {
        $(#[$attr])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        pub struct $name;

        impl Variant for $name {
            type Word = $word;
            type State = [$word; $state_words];
            type Block = [u8; $block_bytes];
            type Half = [u8; $block_bytes / 2];
            type Digest = [u8; $digest_bits / 8];

            const NAME: &'static str = stringify!($name);
            const FAMILY: Family = $family;
            const ROUNDS: usize = $rounds;
            const K: &'static [$word] = &$k;
            const H: Self::State = $h;
            const DIGEST_BITS: usize = $digest_bits;

            const EMPTY_BLOCK: Self::Block = [0u8; $block_bytes];
            const EMPTY_HALF: Self::Half = [0u8; $block_bytes / 2];
            const EMPTY_DIGEST: Self::Digest = [0u8; $digest_bits / 8];

            fn pad_schedules() -> &'static PadSchedules<$word> {
                &$pads
            }
        }
    };
}

variant!(
    /// SHA-1 (160 bit).
    Sha160, u32, 5, 160, 64, Family::Sha1, 80, K160, H160, PADS_160
);
variant!(
    /// SHA-224.
    Sha256_224, u32, 8, 224, 64, Family::Sha2(ROTATIONS_256), 64, K256, H256_224, PADS_256
);
variant!(
    /// SHA-256.
    Sha256_256, u32, 8, 256, 64, Family::Sha2(ROTATIONS_256), 64, K256, H256, PADS_256
);
variant!(
    /// SHA-512/224.
    Sha512_224, u64, 8, 224, 128, Family::Sha2(ROTATIONS_512), 80, K512, H512_224, PADS_512
);
variant!(
    /// SHA-512/256.
    Sha512_256, u64, 8, 256, 128, Family::Sha2(ROTATIONS_512), 80, K512, H512_256, PADS_512
);
variant!(
    /// SHA-384.
    Sha512_384, u64, 8, 384, 128, Family::Sha2(ROTATIONS_512), 80, K512, H384, PADS_512
);
variant!(
    /// SHA-512.
    Sha512_512, u64, 8, 512, 128, Family::Sha2(ROTATIONS_512), 80, K512, H512, PADS_512
);

#[cfg(test)]
mod tests {
    use super::*;

    fn check_shape<V: Variant>(block: usize, digest: usize, count: usize, rounds: usize) {
        assert_eq!(V::BLOCK_BYTES, block, "{}", V::NAME);
        assert_eq!(V::EMPTY_BLOCK.as_ref().len(), block);
        assert_eq!(V::EMPTY_HALF.as_ref().len(), block / 2);
        assert_eq!(V::DIGEST_BYTES, digest);
        assert_eq!(V::EMPTY_DIGEST.as_ref().len(), digest);
        assert_eq!(V::COUNT_BYTES, count);
        assert_eq!(V::K.len(), rounds);
        assert_eq!(V::ROUNDS, rounds);
        assert_eq!(V::H.as_ref().len(), V::STATE_WORDS);
        assert!(V::DIGEST_BYTES <= V::STATE_BYTES);
    }

    #[test]
    fn test_variant_shapes() {
        check_shape::<Sha160>(64, 20, 8, 80);
        check_shape::<Sha256_224>(64, 28, 8, 64);
        check_shape::<Sha256_256>(64, 32, 8, 64);
        check_shape::<Sha512_224>(128, 28, 16, 80);
        check_shape::<Sha512_256>(128, 32, 16, 80);
        check_shape::<Sha512_384>(128, 48, 16, 80);
        check_shape::<Sha512_512>(128, 64, 16, 80);
    }

    #[test]
    fn test_limit_bits() {
        assert_eq!(Sha256_256::LIMIT_BITS, u64::MAX as u128 - 512);
        assert_eq!(Sha160::LIMIT_BITS, u64::MAX as u128 - 512);
        assert_eq!(Sha512_512::LIMIT_BITS, u128::MAX - 1024);
    }

    #[test]
    fn test_truncated_variants_have_distinct_initial_state() {
        assert_ne!(Sha256_224::H, Sha256_256::H);
        assert_ne!(Sha512_224::H, Sha512_512::H);
        assert_ne!(Sha512_256::H, Sha512_512::H);
        assert_ne!(Sha512_384::H, Sha512_512::H);
    }
}
