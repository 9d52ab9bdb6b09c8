//! Track loading and mix export
//!
//! WAV decoding into normalized [`AudioBuffer`](spatial_mix::AudioBuffer)s
//! and encoding of mix results, both through `hound`.

pub mod error;
pub mod loader;
pub mod writer;

pub use error::*;
pub use loader::*;
pub use writer::*;
