//! Pairwise Merkle tree reduction.
//!
//! Each level concatenates neighbouring digests and double hashes the pair;
//! a trailing odd digest is paired with itself.

use crate::algorithm::Algorithm;
use crate::platform::Implementation;
use crate::variant::Variant;

pub(crate) fn merkle_hash<V: Variant>(implementation: Implementation, digests: &mut Vec<V::Digest>) {
    if digests.is_empty() {
        return;
    }
    if digests.len() % 2 == 1 {
        if let Some(last) = digests.last().copied() {
            digests.push(last);
        }
    }

    let size = V::DIGEST_BYTES;
    let mut pairs: Vec<u8> = Vec::with_capacity(digests.len() * size);
    for digest in digests.iter() {
        pairs.extend_from_slice(digest.as_ref());
    }
    let messages = pairs.chunks_exact(2 * size).collect::<Vec<_>>();

    // Every pair has the same length, so the whole level runs through the lanes.
    let states = Algorithm::<V>::batch_equal(implementation, &messages);
    let hashes = states.iter().map(Algorithm::<V>::normalize).collect::<Vec<_>>();

    *digests = Algorithm::<V>::digest_batch(implementation, &hashes);
}

pub(crate) fn merkle_root<V: Variant>(implementation: Implementation, mut digests: Vec<V::Digest>) -> V::Digest {
    if digests.is_empty() {
        return V::EMPTY_DIGEST;
    }
    while digests.len() > 1 {
        merkle_hash::<V>(implementation, &mut digests);
    }
    digests[0]
}
