use crate::consts::{MAX_ROUNDS, MAX_STATE_WORDS};
use crate::schedule::{big_sigma, expand, load, schedule, Buffer};
use crate::variant::{Family, Variant};
use crate::word::LaneWord;

#[inline(always)]
fn choice<L: LaneWord>(x: L, y: L, z: L) -> L {
    (x & y) ^ (!x & z)
}

#[inline(always)]
fn parity<L: LaneWord>(x: L, y: L, z: L) -> L {
    x ^ y ^ z
}

#[inline(always)]
fn majority<L: LaneWord>(x: L, y: L, z: L) -> L {
    (x & y) ^ (x & z) ^ (y & z)
}

/// Run all rounds of `V` over an expanded `buffer` and add the result into `state`.
#[inline]
pub fn rounds<V, L>(state: &mut [L], buffer: &[L])
where
    V: Variant,
    L: LaneWord<Scalar = V::Word>,
{
    debug_assert_eq!(state.len(), V::STATE_WORDS);
    debug_assert!(buffer.len() >= V::ROUNDS);

    match V::FAMILY {
        Family::Sha1 => {
            let (mut a, mut b, mut c, mut d, mut e) = (state[0], state[1], state[2], state[3], state[4]);

            for i in 0..V::ROUNDS {
                let f = match i / 20 {
                    0 => choice(b, c, d),
                    2 => majority(b, c, d),
                    _ => parity(b, c, d),
                };
                let t = a
                    .rotl(5)
                    .wrapping_add(f)
                    .wrapping_add(e)
                    .wrapping_add(L::splat(V::K[i]))
                    .wrapping_add(buffer[i]);

                e = d;
                d = c;
                c = b.rotl(30);
                b = a;
                a = t;
            }

            summarize(state, &[a, b, c, d, e]);
        }
        Family::Sha2(r) => {
            let (mut a, mut b, mut c, mut d) = (state[0], state[1], state[2], state[3]);
            let (mut e, mut f, mut g, mut h) = (state[4], state[5], state[6], state[7]);

            for i in 0..V::ROUNDS {
                let t1 = h
                    .wrapping_add(big_sigma(e, r.big1))
                    .wrapping_add(choice(e, f, g))
                    .wrapping_add(L::splat(V::K[i]))
                    .wrapping_add(buffer[i]);
                let t2 = big_sigma(a, r.big0).wrapping_add(majority(a, b, c));

                h = g;
                g = f;
                f = e;
                e = d.wrapping_add(t1);
                d = c;
                c = b;
                b = a;
                a = t1.wrapping_add(t2);
            }

            summarize(state, &[a, b, c, d, e, f, g, h]);
        }
    }
}

#[inline(always)]
fn summarize<L: LaneWord>(state: &mut [L], registers: &[L]) {
    for (s, r) in state.iter_mut().zip(registers) {
        *s = s.wrapping_add(*r);
    }
}

/// Compress one block into `state`.
#[inline]
pub fn compress<V: Variant>(state: &mut V::State, block: &V::Block) {
    let buffer = schedule::<V>(block);
    rounds::<V, V::Word>(state.as_mut(), &buffer);
}

/// Compress an already expanded schedule into `state`.
#[inline]
pub fn compress_scheduled<V: Variant>(state: &mut V::State, buffer: &Buffer<V::Word>) {
    rounds::<V, V::Word>(state.as_mut(), buffer);
}

/// Compress `L::LANES` independent blocks, one per state, in lockstep.
///
/// Lane `i` of the result is bit-identical to `compress(&mut states[i], blocks[i])`.
pub fn compress_lanes<V, L>(states: &mut [V::State], blocks: &[&V::Block])
where
    V: Variant,
    L: LaneWord<Scalar = V::Word>,
{
    debug_assert_eq!(states.len(), L::LANES);
    debug_assert_eq!(blocks.len(), L::LANES);

    let zero = L::splat(V::Word::default());

    let mut buffer = [zero; MAX_ROUNDS];
    load::<V, L>(&mut buffer, blocks);
    expand::<V, L>(&mut buffer);

    let mut registers = [zero; MAX_STATE_WORDS];
    for (j, register) in registers.iter_mut().take(V::STATE_WORDS).enumerate() {
        *register = L::gather(|lane| states[lane].as_ref()[j]);
    }

    rounds::<V, L>(&mut registers[..V::STATE_WORDS], &buffer);

    for (lane, state) in states.iter_mut().enumerate() {
        for (word, register) in state.as_mut().iter_mut().zip(registers.iter()) {
            *word = register.lane(lane);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    use crate::lanes::Wide;
    use crate::schedule::big_sigma_canonical;
    use crate::variant::{Sha160, Sha256_224, Sha256_256, Sha512_256, Sha512_512};
    use crate::word::Word;

    // Reference SHA-256 rounds written with the textbook sigma functions only.
    fn canonical_sha256(state: &mut [u32; 8], block: &[u8; 64]) {
        let w = schedule::<Sha256_256>(block);
        let r = crate::variant::ROTATIONS_256;
        let mut v = *state;
        for i in 0..64 {
            let [a, b, c, d, e, f, g, h] = v;
            let t1 = h
                .wrapping_add(big_sigma_canonical(e, r.big1))
                .wrapping_add((e & f) ^ (!e & g))
                .wrapping_add(crate::consts::K256[i])
                .wrapping_add(w[i]);
            let t2 = big_sigma_canonical(a, r.big0).wrapping_add((a & b) ^ (a & c) ^ (b & c));
            v = [t1.wrapping_add(t2), a, b, c, d.wrapping_add(t1), e, f, g];
        }
        for (s, x) in state.iter_mut().zip(v.iter()) {
            *s = s.wrapping_add(*x);
        }
    }

    fn check_lanes<V, L>(seed: &[u8])
    where
        V: Variant,
        L: LaneWord<Scalar = V::Word>,
    {
        let mut blocks = vec![V::EMPTY_BLOCK; L::LANES];
        let mut states = vec![V::H; L::LANES];
        for (lane, block) in blocks.iter_mut().enumerate() {
            for (j, byte) in block.as_mut().iter_mut().enumerate() {
                *byte = seed[(lane * 31 + j) % seed.len()] ^ lane as u8;
            }
        }
        for (lane, state) in states.iter_mut().enumerate() {
            state.as_mut()[lane % V::STATE_WORDS] = V::Word::from_u128(lane as u128 * 0x9e37);
        }

        let mut expected = states.clone();
        for (state, block) in expected.iter_mut().zip(blocks.iter()) {
            compress::<V>(state, block);
        }

        let refs = blocks.iter().collect::<Vec<_>>();
        compress_lanes::<V, L>(&mut states, &refs);
        assert_eq!(states, expected, "{} x{}", V::NAME, L::LANES);
    }

    proptest! {
        #[test]
        fn nested_rounds_match_canonical_rounds(block in prop::array::uniform32(any::<u8>())) {
            let mut full = [0u8; 64];
            full[..32].copy_from_slice(&block);
            full[32..].copy_from_slice(&block);

            let mut expected = crate::consts::H256;
            canonical_sha256(&mut expected, &full);

            let mut state = crate::consts::H256;
            compress::<Sha256_256>(&mut state, &full);
            prop_assert_eq!(state, expected);
        }

        #[test]
        fn lane_compression_matches_scalar(seed in prop::collection::vec(any::<u8>(), 1..300)) {
            check_lanes::<Sha256_256, u32>(&seed);
            check_lanes::<Sha256_256, Wide<u32, 2>>(&seed);
            check_lanes::<Sha256_256, Wide<u32, 4>>(&seed);
            check_lanes::<Sha256_256, Wide<u32, 8>>(&seed);
            check_lanes::<Sha256_256, Wide<u32, 16>>(&seed);
            check_lanes::<Sha256_256, <u32 as Word>::Native>(&seed);
            check_lanes::<Sha256_224, Wide<u32, 4>>(&seed);
            check_lanes::<Sha160, Wide<u32, 8>>(&seed);
            check_lanes::<Sha160, <u32 as Word>::Native>(&seed);
            check_lanes::<Sha512_512, Wide<u64, 2>>(&seed);
            check_lanes::<Sha512_512, Wide<u64, 4>>(&seed);
            check_lanes::<Sha512_512, Wide<u64, 8>>(&seed);
            check_lanes::<Sha512_512, <u64 as Word>::Native>(&seed);
            check_lanes::<Sha512_256, Wide<u64, 2>>(&seed);
        }
    }

    #[test]
    fn test_compress_single_block_abc() {
        // "abc" fits in one padded block.
        let mut block = [0u8; 64];
        block[..3].copy_from_slice(b"abc");
        block[3] = 0x80;
        block[63] = 24;

        let mut state = crate::consts::H256;
        compress::<Sha256_256>(&mut state, &block);
        assert_eq!(
            state,
            [
                0xba7816bf, 0x8f01cfea, 0x414140de, 0x5dae2223, 0xb00361a3, 0x96177a9c, 0xb410ff61,
                0xf20015ad
            ]
        );
    }
}
