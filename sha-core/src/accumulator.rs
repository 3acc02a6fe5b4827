use std::fmt;
use std::io;

use crate::algorithm::{Algorithm, IMPL};
use crate::compress::compress;
use crate::error::{check_length, Result};
use crate::platform::Implementation;
use crate::schedule::write_count;
use crate::variant::Variant;

/// Incremental hasher.
///
/// Bytes are buffered until a whole block is available, then compressed.
/// `finalize` consumes the accumulator, so nothing can be written after it.
#[derive(Clone)]
pub struct Accumulator<V: Variant> {
    state: V::State,
    bits: u128,
    buffer: V::Block,
}

impl<V: Variant> Default for Accumulator<V> {
    fn default() -> Self {
        Accumulator {
            state: V::H,
            bits: 0,
            buffer: V::EMPTY_BLOCK,
        }
    }
}

impl<V: Variant> fmt::Debug for Accumulator<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Accumulator<{}> {{ ... }}", V::NAME)
    }
}

impl<V: Variant> Accumulator<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resume from a midstate that has already absorbed `blocks` whole blocks.
    pub fn with_state(state: V::State, blocks: u128) -> Result<Self> {
        let bits = check_length(V::LIMIT_BITS, blocks.checked_mul(V::BLOCK_BITS))?;

        Ok(Accumulator {
            state,
            bits,
            buffer: V::EMPTY_BLOCK,
        })
    }

    /// The chaining state after the whole blocks compressed so far.
    pub fn state(&self) -> &V::State {
        &self.state
    }

    /// Whole blocks compressed so far.
    pub fn blocks(&self) -> u128 {
        self.bits / V::BLOCK_BITS
    }

    /// Bytes written so far, including buffered ones.
    pub fn bytes(&self) -> u128 {
        self.bits / 8
    }

    fn buffered(&self) -> usize {
        (self.bytes() % V::BLOCK_BYTES as u128) as usize
    }

    /// Append `data`. A write that would exceed the length limit is rejected
    /// and leaves the accumulator unchanged.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        let added = (data.len() as u128).checked_mul(8);
        let bits = check_length(
            V::LIMIT_BITS,
            added.and_then(|added| self.bits.checked_add(added)),
        )?;

        let mut data = data;
        let used = self.buffered();
        if used > 0 {
            let take = (V::BLOCK_BYTES - used).min(data.len());
            self.buffer.as_mut()[used..used + take].copy_from_slice(&data[..take]);
            data = &data[take..];

            if used + take < V::BLOCK_BYTES {
                self.bits = bits;
                return Ok(());
            }
            compress::<V>(&mut self.state, &self.buffer);
        }

        let mut chunks = data.chunks_exact(V::BLOCK_BYTES);
        for chunk in &mut chunks {
            self.buffer.as_mut().copy_from_slice(chunk);
            compress::<V>(&mut self.state, &self.buffer);
        }

        let rest = chunks.remainder();
        self.buffer.as_mut()[..rest.len()].copy_from_slice(rest);
        self.bits = bits;

        Ok(())
    }

    /// Pad, compress the final block(s) and return the digest.
    pub fn finalize(self) -> V::Digest {
        Algorithm::<V>::normalize(&self.finish(*IMPL))
    }

    /// The hash of [`finalize`](Self::finalize)'s digest.
    pub fn finalize_double(self) -> V::Digest {
        Algorithm::<V>::hash_digest(&self.finalize())
    }

    pub(crate) fn finish(mut self, implementation: Implementation) -> V::State {
        let used = self.buffered();
        if used == 0 {
            let blocks = self.blocks();
            implementation.pad::<V>(&mut self.state, blocks);
            return self.state;
        }

        let (blocks, count) = pad_tail::<V>(&self.buffer.as_ref()[..used], self.bits);
        for block in &blocks[..count] {
            compress::<V>(&mut self.state, block);
        }
        self.state
    }
}

impl<V: Variant> io::Write for Accumulator<V> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        Accumulator::<V>::write(self, buf).map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Pad the trailing `tail` bytes (at most one block) of a message of `bits`
/// total bits into one or two final blocks. Returns the blocks and how many
/// of them are used.
pub(crate) fn pad_tail<V: Variant>(tail: &[u8], bits: u128) -> ([V::Block; 2], usize) {
    debug_assert!(tail.len() <= V::BLOCK_BYTES);

    let mut blocks = [V::EMPTY_BLOCK; 2];
    for (i, byte) in tail.iter().enumerate() {
        blocks[i / V::BLOCK_BYTES].as_mut()[i % V::BLOCK_BYTES] = *byte;
    }
    let end = tail.len();
    blocks[end / V::BLOCK_BYTES].as_mut()[end % V::BLOCK_BYTES] = 0x80;

    let count = if end + 1 + V::COUNT_BYTES <= V::BLOCK_BYTES {
        1
    } else {
        2
    };
    write_count::<V>(blocks[count - 1].as_mut(), bits);

    (blocks, count)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;

    use crate::error::Error;
    use crate::variant::{Sha160, Sha256_256, Sha512_512};
    use crate::TEST_SEED;

    fn check_random_chunking<V: Variant>(rng: &mut XorShiftRng) {
        let data = (0..rng.gen_range(0..1000)).map(|_| rng.gen()).collect::<Vec<u8>>();
        let expected = Algorithm::<V>::hash(&data).expect("hash failed");

        let mut accumulator = Accumulator::<V>::new();
        let mut rest = &data[..];
        while !rest.is_empty() {
            let (chunk, tail) = rest.split_at(rng.gen_range(0..=rest.len()));
            accumulator.write(chunk).expect("write failed");
            rest = tail;
        }
        assert_eq!(accumulator.finalize(), expected, "{} len {}", V::NAME, data.len());
    }

    #[test]
    fn test_random_chunking_matches_single_write() {
        let rng = &mut XorShiftRng::from_seed(TEST_SEED);
        for _ in 0..50 {
            check_random_chunking::<Sha160>(rng);
            check_random_chunking::<Sha256_256>(rng);
            check_random_chunking::<Sha512_512>(rng);
        }
    }

    #[test]
    fn test_pad_tail_one_or_two_blocks() {
        let (_, count) = pad_tail::<Sha256_256>(&[0u8; 55], 55 * 8);
        assert_eq!(count, 1);

        let (blocks, count) = pad_tail::<Sha256_256>(&[1u8; 56], 56 * 8);
        assert_eq!(count, 2);
        assert_eq!(blocks[0][56], 0x80);
        assert_eq!(&blocks[1][56..], &448u64.to_be_bytes());

        let (blocks, count) = pad_tail::<Sha512_512>(&[1u8; 128], 1024);
        assert_eq!(count, 2);
        assert_eq!(blocks[1][0], 0x80);
        assert_eq!(&blocks[1][112..], &1024u128.to_be_bytes());
    }

    #[test]
    fn test_counters_track_writes() {
        let mut accumulator = Accumulator::<Sha160>::new();
        accumulator.write(&[0u8; 70]).expect("write failed");
        assert_eq!(accumulator.bytes(), 70);
        assert_eq!(accumulator.blocks(), 1);
        assert_eq!(accumulator.buffered(), 6);
    }

    #[test]
    fn test_overflowing_write_leaves_accumulator_unchanged() {
        let limit_blocks = Sha256_256::LIMIT_BITS / Sha256_256::BLOCK_BITS;
        let mut accumulator =
            Accumulator::<Sha256_256>::with_state(Sha256_256::H, limit_blocks).expect("within limit");

        accumulator.write(&[0u8; 63]).expect("63 bytes fit below the limit");
        let before = *accumulator.state();

        let err = accumulator.write(&[0u8; 1]).expect_err("must overflow");
        assert!(matches!(err, Error::LengthOverflow { .. }));
        assert_eq!(accumulator.state(), &before);
        assert_eq!(accumulator.bytes(), limit_blocks * 64 + 63);
    }

    #[test]
    fn test_whole_block_messages_finalize() {
        use sha2::Digest;

        for blocks in 0..7 {
            let data = vec![0x3cu8; blocks * 64];
            let mut accumulator = Accumulator::<Sha256_256>::new();
            accumulator.write(&data).expect("write failed");
            assert_eq!(accumulator.buffered(), 0);

            let expected = sha2::Sha256::digest(&data);
            assert_eq!(&accumulator.finalize()[..], expected.as_slice(), "{} blocks", blocks);

            let data = vec![0xc3u8; blocks * 128];
            let mut accumulator = Accumulator::<Sha512_512>::new();
            accumulator.write(&data).expect("write failed");

            let expected = sha2::Sha512::digest(&data);
            assert_eq!(&accumulator.finalize()[..], expected.as_slice(), "{} blocks", blocks);
        }
    }

    #[test]
    fn test_with_state_rejects_oversized_midstate() {
        let too_many = Sha256_256::LIMIT_BITS / Sha256_256::BLOCK_BITS + 1;
        assert!(Accumulator::<Sha256_256>::with_state(Sha256_256::H, too_many).is_err());
        assert!(Accumulator::<Sha512_512>::with_state(Sha512_512::H, u128::MAX).is_err());
    }
}
