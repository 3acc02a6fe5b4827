//! A Merkle-Damgard engine for [SHA-1 and SHA-2][1].
//!
//! One generic compression core serves every variant. Independent blocks can
//! be compressed side by side in lanes, which the Merkle reducer and the batch
//! functions use.
//!
//! [1]: https://csrc.nist.gov/publications/detail/fips/180/4/final

#![deny(clippy::all, clippy::perf, clippy::correctness, rust_2018_idioms)]
#![warn(clippy::unwrap_used)]
#![allow(clippy::unreadable_literal)]

mod accumulator;
mod algorithm;
mod compress;
mod error;
mod merkle;
mod platform;
mod settings;

pub mod consts;
pub mod lanes;
pub mod schedule;
pub mod variant;
pub mod word;

pub use accumulator::Accumulator;
pub use algorithm::Algorithm;
pub use compress::compress_lanes;
pub use error::{Error, Result};
pub use platform::{Implementation, Lanes, Platform};
pub use settings::{Settings, SETTINGS};

pub type Sha1 = Algorithm<variant::Sha160>;
pub type Sha224 = Algorithm<variant::Sha256_224>;
pub type Sha256 = Algorithm<variant::Sha256_256>;
pub type Sha384 = Algorithm<variant::Sha512_384>;
pub type Sha512 = Algorithm<variant::Sha512_512>;
#[allow(non_camel_case_types)]
pub type Sha512_224 = Algorithm<variant::Sha512_224>;
#[allow(non_camel_case_types)]
pub type Sha512_256 = Algorithm<variant::Sha512_256>;

pub const TEST_SEED: [u8; 16] = [
    0x59, 0x62, 0xbe, 0x5d, 0x76, 0x3d, 0x31, 0x8d, 0x17, 0xdb, 0x37, 0x32, 0x54, 0x06, 0xbc, 0xe5,
];
