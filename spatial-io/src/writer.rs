//! WAV encoder for mix results

use crate::error::EncodeError;
use hound::{SampleFormat as WavSampleFormat, WavSpec, WavWriter};
use log::{info, warn};
use spatial_mix::{AudioBuffer, SampleFormat};
use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

/// Output sample encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Pcm16,
    Pcm24,
    Pcm32,
    Float32,
}

impl OutputFormat {
    pub fn bits_per_sample(self) -> u16 {
        match self {
            OutputFormat::Pcm16 => 16,
            OutputFormat::Pcm24 => 24,
            OutputFormat::Pcm32 | OutputFormat::Float32 => 32,
        }
    }

    fn wav_spec(self, buffer: &AudioBuffer) -> WavSpec {
        WavSpec {
            channels: buffer.channels() as u16,
            sample_rate: buffer.sample_rate(),
            bits_per_sample: self.bits_per_sample(),
            sample_format: match self {
                OutputFormat::Float32 => WavSampleFormat::Float,
                _ => WavSampleFormat::Int,
            },
        }
    }
}

impl From<SampleFormat> for OutputFormat {
    fn from(format: SampleFormat) -> Self {
        if format.is_float() {
            return OutputFormat::Float32;
        }
        match format.bits_per_sample() {
            16 => OutputFormat::Pcm16,
            24 => OutputFormat::Pcm24,
            _ => OutputFormat::Pcm32,
        }
    }
}

/// Scale a normalized sample to a `bits`-wide integer, rounding and
/// saturating at the integer range
#[inline]
fn quantize(sample: f32, bits: u16) -> i32 {
    let full_scale = (1i64 << (bits - 1)) as f64;
    (sample as f64 * full_scale)
        .round()
        .clamp(-full_scale, full_scale - 1.0) as i32
}

/// Encode `buffer` as WAV into `writer`; `path` only labels errors
pub fn encode_wav<W: Write + Seek>(
    buffer: &AudioBuffer,
    writer: W,
    format: OutputFormat,
    path: &Path,
) -> Result<(), EncodeError> {
    let wav_error = |source| EncodeError::Wav {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = WavWriter::new(writer, format.wav_spec(buffer)).map_err(wav_error)?;

    match format {
        OutputFormat::Float32 => {
            for &sample in buffer.samples() {
                writer.write_sample(sample).map_err(wav_error)?;
            }
        }
        OutputFormat::Pcm16 | OutputFormat::Pcm24 | OutputFormat::Pcm32 => {
            let bits = format.bits_per_sample();
            for &sample in buffer.samples() {
                writer
                    .write_sample(quantize(sample, bits))
                    .map_err(wav_error)?;
            }
        }
    }

    writer.finalize().map_err(wav_error)
}

/// Drop the partially written file at `path` if encoding failed
fn remove_on_error<T>(path: &Path, result: Result<T, EncodeError>) -> Result<T, EncodeError> {
    if result.is_err() {
        if let Err(e) = std::fs::remove_file(path) {
            warn!("Could not remove partial output {}: {}", path.display(), e);
        }
    }
    result
}

/// Write `buffer` to a WAV file at `destination`
///
/// A failed encode removes the file instead of leaving a truncated WAV.
pub fn write_audio(
    buffer: &AudioBuffer,
    destination: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<(), EncodeError> {
    let path = destination.as_ref();
    let file = File::create(path).map_err(|source| EncodeError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    remove_on_error(path, encode_wav(buffer, BufWriter::new(file), format, path))?;

    info!(
        "Wrote {} ({:?}, {} frames at {} Hz)",
        path.display(),
        format,
        buffer.frames(),
        buffer.sample_rate()
    );
    Ok(())
}
