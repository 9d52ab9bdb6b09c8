//! Spatial Mixer
//!
//! Mixes a small set of mono or stereo tracks into one stereo buffer.
//!
//! Key features:
//! - Pan laws mapping a [-1, 1] position to left/right gains
//! - Virtual silence padding to the longest track
//! - Overlay partitioned across rayon workers on disjoint output slices
//! - AVX SIMD hard clipping to [-1.0, 1.0]

pub mod align;
pub mod clamping;
pub mod error;
pub mod mixer;
pub mod pan;
pub mod types;

pub use align::*;
pub use clamping::*;
pub use error::*;
pub use mixer::*;
pub use pan::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mixer_config() {
        let mixer = SpatialMixer::default();
        assert_eq!(mixer.config().pan_law, PanLaw::Balance);
        assert_eq!(mixer.config().chunk_frames, 4096);
    }
}
