use std::marker::PhantomData;

use lazy_static::lazy_static;
use log::trace;

use crate::accumulator::{pad_tail, Accumulator};
use crate::consts::MAX_STATE_WORDS;
use crate::error::{check_length, Result};
use crate::merkle;
use crate::platform::Implementation;
use crate::schedule::Buffer;
use crate::variant::Variant;
use crate::word::Word;

lazy_static! {
    pub(crate) static ref IMPL: Implementation = Implementation::detect();
}

/// Hash functions of one variant.
///
/// All functions are associated; the type only names the variant.
#[derive(Clone, Copy, Debug, Default)]
pub struct Algorithm<V: Variant>(PhantomData<V>);

impl<V: Variant> Algorithm<V> {
    /// Hash an arbitrary message.
    pub fn hash(data: &[u8]) -> Result<V::Digest> {
        let mut accumulator = Accumulator::<V>::new();
        accumulator.write(data)?;
        Ok(accumulator.finalize())
    }

    pub fn hash_block(block: &V::Block) -> V::Digest {
        Self::normalize(&Self::block_state(*IMPL, block))
    }

    pub fn hash_half(half: &V::Half) -> V::Digest {
        Self::hash_short(half.as_ref())
    }

    /// Hash the block made of `left` followed by `right`.
    pub fn hash_halves(left: &V::Half, right: &V::Half) -> V::Digest {
        Self::hash_block(&Self::join(left, right))
    }

    pub fn double_hash(data: &[u8]) -> Result<V::Digest> {
        Self::hash(data).map(|digest| Self::hash_digest(&digest))
    }

    pub fn double_hash_block(block: &V::Block) -> V::Digest {
        Self::hash_digest(&Self::hash_block(block))
    }

    pub fn double_hash_half(half: &V::Half) -> V::Digest {
        Self::hash_digest(&Self::hash_half(half))
    }

    pub fn double_hash_halves(left: &V::Half, right: &V::Half) -> V::Digest {
        Self::hash_digest(&Self::hash_halves(left, right))
    }

    /// Double hash of the concatenation of two digests, one Merkle tree node.
    pub fn double_hash_digests(left: &V::Digest, right: &V::Digest) -> V::Digest {
        let mut pair = [0u8; 2 * MAX_STATE_WORDS * 8];
        let size = V::DIGEST_BYTES;
        pair[..size].copy_from_slice(left.as_ref());
        pair[size..2 * size].copy_from_slice(right.as_ref());

        Self::hash_digest(&Self::hash_short(&pair[..2 * size]))
    }

    /// Replace `digests` with the next level up of the Merkle tree.
    pub fn merkle_hash(digests: &mut Vec<V::Digest>) {
        merkle::merkle_hash::<V>(*IMPL, digests)
    }

    /// Reduce `digests` to the Merkle root. Empty input gives the all-zero
    /// digest and a single digest is its own root.
    pub fn merkle_root(digests: Vec<V::Digest>) -> V::Digest {
        merkle::merkle_root::<V>(*IMPL, digests)
    }

    /// Hash a batch of messages.
    ///
    /// Messages of equal length are compressed side by side in lanes.
    pub fn hash_many(messages: &[&[u8]]) -> Result<Vec<V::Digest>> {
        Ok(Self::batch(*IMPL, messages)?
            .iter()
            .map(Self::normalize)
            .collect())
    }

    pub fn double_hash_many(messages: &[&[u8]]) -> Result<Vec<V::Digest>> {
        let digests = Self::hash_many(messages)?;
        Ok(Self::digest_batch(*IMPL, &digests))
    }

    /// Compress `blocks` in order into `state`. No padding is applied.
    pub fn accumulate(state: &mut V::State, blocks: &[V::Block]) {
        for block in blocks {
            crate::compress::compress::<V>(state, block);
        }
    }

    /// Pad a state that has absorbed exactly `blocks` whole blocks and
    /// return its digest.
    pub fn finalize_state(mut state: V::State, blocks: u128) -> Result<V::Digest> {
        check_length(V::LIMIT_BITS, blocks.checked_mul(V::BLOCK_BITS))?;
        IMPL.pad::<V>(&mut state, blocks);
        Ok(Self::normalize(&state))
    }

    /// The hash of [`finalize_state`](Self::finalize_state)'s digest.
    pub fn finalize_double_state(state: V::State, blocks: u128) -> Result<V::Digest> {
        Self::finalize_state(state, blocks).map(|digest| Self::hash_digest(&digest))
    }

    /// Big-endian serialization of `state`, truncated to the digest width.
    pub fn normalize(state: &V::State) -> V::Digest {
        let mut bytes = [0u8; MAX_STATE_WORDS * 8];
        Self::serialize(state, &mut bytes);

        let mut digest = V::EMPTY_DIGEST;
        digest.as_mut().copy_from_slice(&bytes[..V::DIGEST_BYTES]);
        digest
    }

    /// Hash of the full big-endian serialization of `state`.
    pub fn hash_state(state: &V::State) -> V::Digest {
        let mut bytes = [0u8; MAX_STATE_WORDS * 8];
        Self::serialize(state, &mut bytes);
        Self::hash_short(&bytes[..V::STATE_BYTES])
    }

    /// Compress a single block into `state`.
    pub fn compress(state: &mut V::State, block: &V::Block) {
        crate::compress::compress::<V>(state, block)
    }

    /// The expanded message schedule of `block`; the first `V::ROUNDS` words are used.
    pub fn schedule(block: &V::Block) -> Buffer<V::Word> {
        crate::schedule::schedule::<V>(block)
    }

    pub(crate) fn hash_digest(digest: &V::Digest) -> V::Digest {
        Self::hash_short(digest.as_ref())
    }

    fn serialize(state: &V::State, bytes: &mut [u8]) {
        for (word, out) in state.as_ref().iter().zip(bytes.chunks_exact_mut(V::WORD_BYTES)) {
            word.write_be(out);
        }
    }

    fn join(left: &V::Half, right: &V::Half) -> V::Block {
        let mut block = V::EMPTY_BLOCK;
        let (head, tail) = block.as_mut().split_at_mut(V::HALF_BYTES);
        head.copy_from_slice(left.as_ref());
        tail.copy_from_slice(right.as_ref());
        block
    }

    pub(crate) fn block_state(implementation: Implementation, block: &V::Block) -> V::State {
        let mut state = V::H;
        crate::compress::compress::<V>(&mut state, block);
        implementation.pad::<V>(&mut state, 1);
        state
    }

    /// Hash a message of at most one block.
    fn hash_short(message: &[u8]) -> V::Digest {
        let mut state = V::H;
        let (blocks, count) = pad_tail::<V>(message, message.len() as u128 * 8);
        for block in &blocks[..count] {
            crate::compress::compress::<V>(&mut state, block);
        }
        Self::normalize(&state)
    }

    /// Chaining states of a batch of messages after padding.
    pub(crate) fn batch(implementation: Implementation, messages: &[&[u8]]) -> Result<Vec<V::State>> {
        let length = match messages.first() {
            Some(first) => first.len(),
            None => return Ok(Vec::new()),
        };
        for message in messages {
            check_length(V::LIMIT_BITS, (message.len() as u128).checked_mul(8))?;
        }

        if messages.iter().any(|message| message.len() != length) {
            trace!("mixed message lengths, hashing {} messages one by one", messages.len());
            return messages
                .iter()
                .map(|message| {
                    let mut accumulator = Accumulator::<V>::new();
                    accumulator.write(message)?;
                    Ok(accumulator.finish(implementation))
                })
                .collect();
        }

        Ok(Self::batch_equal(implementation, messages))
    }

    /// Chaining states of a batch of messages that all have the same length,
    /// known to be within the length limit.
    pub(crate) fn batch_equal(implementation: Implementation, messages: &[&[u8]]) -> Vec<V::State> {
        let length = messages.first().map_or(0, |first| first.len());
        debug_assert!(messages.iter().all(|message| message.len() == length));

        let whole = length / V::BLOCK_BYTES;
        let bits = length as u128 * 8;
        let mut states = vec![V::H; messages.len()];

        let mut blocks = vec![V::EMPTY_BLOCK; messages.len()];
        for i in 0..whole {
            let range = i * V::BLOCK_BYTES..(i + 1) * V::BLOCK_BYTES;
            for (block, message) in blocks.iter_mut().zip(messages) {
                block.as_mut().copy_from_slice(&message[range.clone()]);
            }
            let refs = blocks.iter().collect::<Vec<_>>();
            implementation.compress::<V>(&mut states, &refs);
        }

        let tails = messages
            .iter()
            .map(|message| pad_tail::<V>(&message[whole * V::BLOCK_BYTES..], bits))
            .collect::<Vec<_>>();
        let count = tails.first().map_or(0, |(_, count)| *count);
        for i in 0..count {
            let refs = tails.iter().map(|(blocks, _)| &blocks[i]).collect::<Vec<_>>();
            implementation.compress::<V>(&mut states, &refs);
        }

        states
    }

    /// Hash a batch of digests, all of the same width.
    pub(crate) fn digest_batch(implementation: Implementation, digests: &[V::Digest]) -> Vec<V::Digest> {
        let messages = digests.iter().map(|digest| digest.as_ref()).collect::<Vec<&[u8]>>();
        Self::batch_equal(implementation, &messages)
            .iter()
            .map(Self::normalize)
            .collect()
    }
}
