//! Error types for buffer construction and mixing

use thiserror::Error;

/// Result type for mix operations
pub type Result<T> = std::result::Result<T, MixError>;

/// Errors surfaced by [`mix`](crate::mix) before any summation happens
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MixError {
    /// No tracks were supplied
    #[error("mix request contains no tracks")]
    EmptyMixRequest,

    /// Number of pan values differs from the number of tracks
    #[error("mix request has {tracks} tracks but {pans} pan values")]
    TrackCountMismatch { tracks: usize, pans: usize },

    /// Tracks do not share one sample rate
    #[error("track {track} has sample rate {found} Hz, expected {expected} Hz")]
    RateMismatch {
        track: usize,
        expected: u32,
        found: u32,
    },

    /// Pan value outside [-1.0, 1.0] (NaN included)
    #[error("pan value {value} for track {track} is outside [-1.0, 1.0]")]
    InvalidParameter { track: usize, value: f32 },
}

/// Errors raised while constructing an [`AudioBuffer`](crate::AudioBuffer)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BufferError {
    #[error("sample rate must be positive")]
    ZeroSampleRate,

    #[error("unsupported channel count {0} (expected 1 or 2)")]
    UnsupportedChannels(u16),

    #[error("{samples} samples is not a multiple of {channels} channels")]
    MisalignedSamples { samples: usize, channels: usize },
}
