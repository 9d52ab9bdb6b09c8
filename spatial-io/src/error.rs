//! Decode and encode errors, each naming the file involved

use spatial_mix::BufferError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("cannot open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decode {}: {source}", .path.display())]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },

    #[error("{}: unsupported sample format ({bits}-bit {kind})", .path.display())]
    UnsupportedFormat {
        path: PathBuf,
        bits: u16,
        kind: &'static str,
    },

    #[error("{}: {source}", .path.display())]
    InvalidBuffer {
        path: PathBuf,
        #[source]
        source: BufferError,
    },

    #[error("{} has sample rate {found} Hz, expected {expected} Hz", .path.display())]
    RateMismatch {
        path: PathBuf,
        expected: u32,
        found: u32,
    },
}

impl DecodeError {
    /// File the error refers to
    pub fn path(&self) -> &Path {
        match self {
            DecodeError::Io { path, .. }
            | DecodeError::Wav { path, .. }
            | DecodeError::UnsupportedFormat { path, .. }
            | DecodeError::InvalidBuffer { path, .. }
            | DecodeError::RateMismatch { path, .. } => path.as_path(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("cannot create {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode {}: {source}", .path.display())]
    Wav {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
}
