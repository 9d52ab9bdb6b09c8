//! WAV track loader
//!
//! Integer PCM is normalized by 2^(bits-1) into [-1.0, 1.0]; float data is
//! taken as is. Only mono and stereo files are accepted.

use crate::error::DecodeError;
use hound::{SampleFormat as WavSampleFormat, WavReader};
use log::{debug, info};
use rayon::prelude::*;
use spatial_mix::{AudioBuffer, ChannelLayout, SampleFormat};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Decode WAV data from any reader; `path` only labels errors
pub fn decode_wav<R: Read>(reader: R, path: &Path) -> Result<AudioBuffer, DecodeError> {
    let wav_error = |source| DecodeError::Wav {
        path: path.to_path_buf(),
        source,
    };

    let reader = WavReader::new(reader).map_err(wav_error)?;
    let spec = reader.spec();

    let layout = ChannelLayout::from_count(spec.channels).map_err(|source| {
        DecodeError::InvalidBuffer {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let (format, samples) = match (spec.sample_format, spec.bits_per_sample) {
        (WavSampleFormat::Float, 32) => {
            let samples = reader
                .into_samples::<f32>()
                .collect::<Result<Vec<_>, _>>()
                .map_err(wav_error)?;
            (SampleFormat::Float32, samples)
        }
        (WavSampleFormat::Int, bits @ (8 | 16 | 24 | 32)) => {
            let scale = 1.0 / (1u64 << (bits - 1)) as f64;
            let samples = reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| (v as f64 * scale) as f32))
                .collect::<Result<Vec<_>, _>>()
                .map_err(wav_error)?;
            let format = match bits {
                8 | 16 => SampleFormat::Int16,
                24 => SampleFormat::Int24,
                _ => SampleFormat::Int32,
            };
            (format, samples)
        }
        (sample_format, bits) => {
            return Err(DecodeError::UnsupportedFormat {
                path: path.to_path_buf(),
                bits,
                kind: match sample_format {
                    WavSampleFormat::Float => "float",
                    WavSampleFormat::Int => "integer",
                },
            });
        }
    };

    let buffer = AudioBuffer::new(spec.sample_rate, layout, format, samples).map_err(
        |source| DecodeError::InvalidBuffer {
            path: path.to_path_buf(),
            source,
        },
    )?;

    debug!(
        "Decoded {}: {:?} {:?}, {} frames at {} Hz",
        path.display(),
        layout,
        format,
        buffer.frames(),
        buffer.sample_rate()
    );

    Ok(buffer)
}

/// Load one WAV file
pub fn load_track(path: impl AsRef<Path>) -> Result<AudioBuffer, DecodeError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let buffer = decode_wav(BufReader::new(file), path)?;
    info!(
        "Loaded {} ({:.2}s, {} ch)",
        path.display(),
        buffer.duration().as_secs_f64(),
        buffer.channels()
    );
    Ok(buffer)
}

/// Load tracks concurrently, keeping input order
///
/// On failure the error names the first failing path in input order. All
/// returned tracks share one sample rate; a deviating file is reported as
/// `RateMismatch`.
pub fn load_tracks<P>(paths: &[P]) -> Result<Vec<AudioBuffer>, DecodeError>
where
    P: AsRef<Path> + Sync,
{
    let decoded: Vec<Result<AudioBuffer, DecodeError>> =
        paths.par_iter().map(load_track).collect();
    let tracks = decoded.into_iter().collect::<Result<Vec<_>, _>>()?;

    if let Some(expected) = tracks.first().map(AudioBuffer::sample_rate) {
        for (path, track) in paths.iter().zip(&tracks) {
            if track.sample_rate() != expected {
                return Err(DecodeError::RateMismatch {
                    path: path.as_ref().to_path_buf(),
                    expected,
                    found: track.sample_rate(),
                });
            }
        }
    }

    Ok(tracks)
}
