#![deny(clippy::all, clippy::perf, clippy::correctness, rust_2018_idioms)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::needless_collect)]

pub mod hash_fn;
pub mod measure;
pub mod metadata;

pub use hash_fn::HashFn;
pub use measure::{measure, measure_repeated, FuncMeasurement};
pub use metadata::Metadata;
