use crate::consts::{BLOCK_WORDS, MAX_ROUNDS};
use crate::variant::{Family, Variant};
use crate::word::{LaneWord, Word};

/// Round input buffer, sized for the longest variant. Only the first
/// `V::ROUNDS` entries are meaningful.
pub type Buffer<L> = [L; MAX_ROUNDS];

/// Number of whole-block message lengths (0 through 4 blocks) with a cached pad schedule.
pub const PAD_CACHE_BLOCKS: usize = 5;

pub type PadSchedules<W> = [Buffer<W>; PAD_CACHE_BLOCKS];

/// Little sigma: two right rotations and a right shift.
#[inline(always)]
pub fn small_sigma<L: LaneWord>(x: L, r: [u32; 3]) -> L {
    x.rotr(r[0]) ^ x.rotr(r[1]) ^ x.shr(r[2])
}

/// Big sigma in its textbook form.
#[inline(always)]
pub fn big_sigma_canonical<L: LaneWord>(x: L, r: [u32; 3]) -> L {
    x.rotr(r[0]) ^ x.rotr(r[1]) ^ x.rotr(r[2])
}

/// Big sigma with nested rotations, `rotr(rotr(rotr(x, C - B) ^ x, B - A) ^ x, A)`.
///
/// Requires `A < B < C`, which holds for every SHA-2 rotation set.
#[inline(always)]
pub fn big_sigma<L: LaneWord>(x: L, r: [u32; 3]) -> L {
    let [a, b, c] = r;
    (((x.rotr(c - b) ^ x).rotr(b - a)) ^ x).rotr(a)
}

/// Decode the 16 big-endian message words of one block per lane into `buffer`.
#[inline]
pub fn load<V, L>(buffer: &mut [L], blocks: &[&V::Block])
where
    V: Variant,
    L: LaneWord<Scalar = V::Word>,
{
    debug_assert_eq!(blocks.len(), L::LANES);

    let size = V::WORD_BYTES;
    for (i, word) in buffer.iter_mut().take(BLOCK_WORDS).enumerate() {
        *word = L::gather(|lane| {
            V::Word::read_be(&blocks[lane].as_ref()[i * size..(i + 1) * size])
        });
    }
}

/// Expand the first 16 words of `buffer` across the remaining rounds.
#[inline]
pub fn expand<V, L>(buffer: &mut [L])
where
    V: Variant,
    L: LaneWord<Scalar = V::Word>,
{
    debug_assert!(buffer.len() >= V::ROUNDS);

    match V::FAMILY {
        Family::Sha1 => {
            for i in BLOCK_WORDS..V::ROUNDS {
                buffer[i] = (buffer[i - 3] ^ buffer[i - 8] ^ buffer[i - 14] ^ buffer[i - 16]).rotl(1);
            }
        }
        Family::Sha2(r) => {
            for i in BLOCK_WORDS..V::ROUNDS {
                buffer[i] = small_sigma(buffer[i - 2], r.small1)
                    .wrapping_add(buffer[i - 7])
                    .wrapping_add(small_sigma(buffer[i - 15], r.small0))
                    .wrapping_add(buffer[i - 16]);
            }
        }
    }
}

/// Scalar schedule of a single block.
pub fn schedule<V: Variant>(block: &V::Block) -> Buffer<V::Word> {
    let mut buffer = [V::Word::default(); MAX_ROUNDS];
    load::<V, V::Word>(&mut buffer, &[block]);
    expand::<V, V::Word>(&mut buffer);
    buffer
}

/// Write the big-endian message bit count into the trailing length field of `block`.
pub(crate) fn write_count<V: Variant>(block: &mut [u8], bits: u128) {
    let count = bits.to_be_bytes();
    let at = block.len() - V::COUNT_BYTES;
    block[at..].copy_from_slice(&count[count.len() - V::COUNT_BYTES..]);
}

/// The padding block that follows a message of exactly `blocks` whole blocks.
pub(crate) fn pad_block<V: Variant>(blocks: u128) -> V::Block {
    let mut block = V::EMPTY_BLOCK;
    block.as_mut()[0] = 0x80;
    write_count::<V>(block.as_mut(), blocks * V::BLOCK_BITS);
    block
}

/// Schedules of the padding block for messages of 0 through 4 whole blocks.
///
/// Only block size, length-field width and schedule recurrence matter, so
/// truncated variants share their parent's table.
pub fn pad_schedules<V: Variant>() -> PadSchedules<V::Word> {
    let mut pads = [[V::Word::default(); MAX_ROUNDS]; PAD_CACHE_BLOCKS];
    for (blocks, pad) in pads.iter_mut().enumerate() {
        *pad = schedule::<V>(&pad_block::<V>(blocks as u128));
    }
    pads
}
