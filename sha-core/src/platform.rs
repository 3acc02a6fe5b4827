use log::{debug, warn};

use crate::compress::{compress, compress_lanes, compress_scheduled};
use crate::lanes::Wide;
use crate::schedule::{pad_block, PAD_CACHE_BLOCKS};
use crate::settings::Settings;
use crate::variant::Variant;
use crate::word::{LaneWord, Word};

#[cfg(target_arch = "x86_64")]
cpufeatures::new!(cpuid_sse2, "sse2");

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Platform {
    Portable,
    #[cfg(target_arch = "x86_64")]
    Sse2,
}

/// Number of independent blocks compressed in lockstep.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Lanes {
    One = 1,
    Two = 2,
    Four = 4,
    Eight = 8,
    Sixteen = 16,
}

impl Lanes {
    pub fn from_count(count: usize) -> Option<Self> {
        match count {
            1 => Some(Lanes::One),
            2 => Some(Lanes::Two),
            4 => Some(Lanes::Four),
            8 => Some(Lanes::Eight),
            16 => Some(Lanes::Sixteen),
            _ => None,
        }
    }

    pub fn count(self) -> usize {
        self as usize
    }
}

type Native<V> = <<V as Variant>::Word as Word>::Native;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Implementation {
    platform: Platform,
    lanes: Lanes,
    cache_padding: bool,
}

impl Implementation {
    /// The implementation configured by [`crate::SETTINGS`].
    pub fn detect() -> Self {
        Self::from_settings(&crate::settings::SETTINGS)
    }

    pub fn from_settings(settings: &Settings) -> Self {
        #[cfg(target_arch = "x86_64")]
        let platform = if settings.native {
            Self::sse2_if_supported().map_or(Platform::Portable, |i| i.platform)
        } else {
            Platform::Portable
        };
        #[cfg(not(target_arch = "x86_64"))]
        let platform = Platform::Portable;

        let implementation = Implementation {
            platform,
            ..Self::portable()
        }
        .with_lanes(settings.lanes)
        .with_cache_padding(settings.cache_padding);

        debug!("sha-core implementation: {:?}", implementation);
        implementation
    }

    /// Scalar compression on every target, padding schedules cached.
    pub fn portable() -> Self {
        Implementation {
            platform: Platform::Portable,
            lanes: Lanes::One,
            cache_padding: true,
        }
    }

    #[cfg(target_arch = "x86_64")]
    pub fn sse2_if_supported() -> Option<Self> {
        if cpuid_sse2::get() {
            return Some(Implementation {
                platform: Platform::Sse2,
                ..Self::portable()
            });
        }

        warn!("sse2 not available, falling back");
        None
    }

    /// Request `count` lanes. Unsupported counts fall back to the scalar path.
    pub fn with_lanes(self, count: usize) -> Self {
        let lanes = Lanes::from_count(count).unwrap_or_else(|| {
            warn!("unsupported lane count {}, using scalar compression", count);
            Lanes::One
        });
        if lanes == Lanes::Sixteen {
            debug!("16 lanes apply to 32-bit words only, 64-bit variants compress scalar");
        }

        Implementation { lanes, ..self }
    }

    pub fn with_cache_padding(self, cache_padding: bool) -> Self {
        Implementation {
            cache_padding,
            ..self
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    pub fn lanes(&self) -> usize {
        self.lanes.count()
    }

    pub fn cache_padding(&self) -> bool {
        self.cache_padding
    }

    /// Lane count actually used for `V`.
    pub fn lanes_for<V: Variant>(&self) -> usize {
        match self.lanes {
            Lanes::Sixteen if V::WORD_BYTES == 8 => 1,
            lanes => lanes.count(),
        }
    }

    /// Compress `blocks[i]` into `states[i]` for every `i`.
    ///
    /// Full groups of lanes are compressed together and the remainder one at
    /// a time. The result is identical to compressing each pair on its own.
    #[inline]
    pub fn compress<V: Variant>(self, states: &mut [V::State], blocks: &[&V::Block]) {
        assert_eq!(states.len(), blocks.len(), "one block per state");

        let lanes = self.lanes_for::<V>();
        let split = match lanes {
            1 => 0,
            _ => states.len() - states.len() % lanes,
        };

        let (wide_states, rest_states) = states.split_at_mut(split);
        let (wide_blocks, rest_blocks) = blocks.split_at(split);

        for (states, blocks) in wide_states.chunks_mut(lanes).zip(wide_blocks.chunks(lanes)) {
            self.compress_group::<V>(states, blocks);
        }
        for (state, block) in rest_states.iter_mut().zip(rest_blocks) {
            compress::<V>(state, block);
        }
    }

    #[inline]
    fn compress_group<V: Variant>(self, states: &mut [V::State], blocks: &[&V::Block]) {
        #[cfg(target_arch = "x86_64")]
        {
            if self.platform == Platform::Sse2 && states.len() == <Native<V> as LaneWord>::LANES {
                compress_lanes::<V, Native<V>>(states, blocks);
                return;
            }
        }

        match states.len() {
            2 => compress_lanes::<V, Wide<V::Word, 2>>(states, blocks),
            4 => compress_lanes::<V, Wide<V::Word, 4>>(states, blocks),
            8 => compress_lanes::<V, Wide<V::Word, 8>>(states, blocks),
            16 => compress_lanes::<V, Wide<V::Word, 16>>(states, blocks),
            _ => {
                for (state, block) in states.iter_mut().zip(blocks) {
                    compress::<V>(state, block);
                }
            }
        }
    }

    /// Compress the padding block that follows exactly `blocks` whole blocks.
    #[inline]
    pub fn pad<V: Variant>(self, state: &mut V::State, blocks: u128) {
        if self.cache_padding && blocks < PAD_CACHE_BLOCKS as u128 {
            compress_scheduled::<V>(state, &V::pad_schedules()[blocks as usize]);
        } else {
            compress::<V>(state, &pad_block::<V>(blocks));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::variant::{Sha256_256, Sha512_512};

    #[test]
    fn test_unsupported_lanes_fall_back_to_scalar() {
        for count in [0, 3, 5, 32] {
            assert_eq!(Implementation::portable().with_lanes(count).lanes(), 1);
        }
        for count in [1, 2, 4, 8, 16] {
            assert_eq!(Implementation::portable().with_lanes(count).lanes(), count);
        }
    }

    #[test]
    fn test_sixteen_lanes_only_for_32_bit_words() {
        let implementation = Implementation::portable().with_lanes(16);
        assert_eq!(implementation.lanes_for::<Sha256_256>(), 16);
        assert_eq!(implementation.lanes_for::<Sha512_512>(), 1);
    }

    #[test]
    fn test_settings_select_lanes_and_padding() {
        let settings = Settings {
            lanes: 8,
            native: false,
            cache_padding: false,
        };
        let implementation = Implementation::from_settings(&settings);
        assert_eq!(implementation.platform(), Platform::Portable);
        assert_eq!(implementation.lanes(), 8);
        assert!(!implementation.cache_padding());
    }

    #[test]
    fn test_cached_pad_matches_built_pad() {
        let cached = Implementation::portable();
        let built = cached.with_cache_padding(false);

        for blocks in 0..7u128 {
            let mut a = Sha256_256::H;
            let mut b = Sha256_256::H;
            cached.pad::<Sha256_256>(&mut a, blocks);
            built.pad::<Sha256_256>(&mut b, blocks);
            assert_eq!(a, b, "blocks {}", blocks);
        }
    }
}
