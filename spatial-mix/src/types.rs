//! Audio data types

use crate::error::BufferError;
use std::fmt;
use std::time::Duration;

/// Source sample encoding
///
/// Samples are always held as normalized `f32`; the format only records
/// what the track was decoded from so the writer can encode back in kind.
/// Variants are ordered by resolution.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SampleFormat {
    Int16 = 1,
    Int24 = 2,
    Int32 = 3,
    Float32 = 4,
}

impl SampleFormat {
    pub fn bits_per_sample(self) -> u16 {
        match self {
            SampleFormat::Int16 => 16,
            SampleFormat::Int24 => 24,
            SampleFormat::Int32 => 32,
            SampleFormat::Float32 => 32,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, SampleFormat::Float32)
    }
}

/// Channel layout of a track (the mixer only accepts mono and stereo)
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelLayout {
    Mono = 1,
    Stereo = 2,
}

impl ChannelLayout {
    pub fn channel_count(self) -> usize {
        self as usize
    }

    pub fn from_count(channels: u16) -> Result<Self, BufferError> {
        match channels {
            1 => Ok(ChannelLayout::Mono),
            2 => Ok(ChannelLayout::Stereo),
            n => Err(BufferError::UnsupportedChannels(n)),
        }
    }
}

/// One decoded track: interleaved `f32` samples in [-1.0, 1.0]
///
/// Immutable once constructed. `samples.len()` is always a multiple of
/// the channel count.
#[derive(Clone, PartialEq)]
pub struct AudioBuffer {
    sample_rate: u32,
    layout: ChannelLayout,
    format: SampleFormat,
    samples: Vec<f32>,
}

impl AudioBuffer {
    pub fn new(
        sample_rate: u32,
        layout: ChannelLayout,
        format: SampleFormat,
        samples: Vec<f32>,
    ) -> Result<Self, BufferError> {
        if sample_rate == 0 {
            return Err(BufferError::ZeroSampleRate);
        }

        let channels = layout.channel_count();
        if samples.len() % channels != 0 {
            return Err(BufferError::MisalignedSamples {
                samples: samples.len(),
                channels,
            });
        }

        Ok(Self {
            sample_rate,
            layout,
            format,
            samples,
        })
    }

    /// Mono `Float32` buffer
    pub fn mono(sample_rate: u32, samples: Vec<f32>) -> Result<Self, BufferError> {
        Self::new(sample_rate, ChannelLayout::Mono, SampleFormat::Float32, samples)
    }

    /// Stereo `Float32` buffer from interleaved L/R samples
    pub fn stereo(sample_rate: u32, samples: Vec<f32>) -> Result<Self, BufferError> {
        Self::new(sample_rate, ChannelLayout::Stereo, SampleFormat::Float32, samples)
    }

    /// Caller guarantees a non-zero rate and an even sample count
    pub(crate) fn stereo_unchecked(
        sample_rate: u32,
        format: SampleFormat,
        samples: Vec<f32>,
    ) -> Self {
        debug_assert!(sample_rate > 0 && samples.len() % 2 == 0);
        Self {
            sample_rate,
            layout: ChannelLayout::Stereo,
            format,
            samples,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn channels(&self) -> usize {
        self.layout.channel_count()
    }

    pub fn format(&self) -> SampleFormat {
        self.format
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Number of frames (samples per channel)
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration(&self) -> Duration {
        let nanos = self.frames() as u128 * 1_000_000_000 / self.sample_rate as u128;
        Duration::from_nanos(nanos as u64)
    }

    /// Left/right view of one frame
    ///
    /// Mono frames are duplicated to both sides; frames past the end read
    /// as silence.
    #[inline]
    pub fn frame(&self, index: usize) -> (f32, f32) {
        match self.layout {
            ChannelLayout::Mono => match self.samples.get(index) {
                Some(&s) => (s, s),
                None => (0.0, 0.0),
            },
            ChannelLayout::Stereo => {
                let i = index * 2;
                if i + 1 < self.samples.len() {
                    (self.samples[i], self.samples[i + 1])
                } else {
                    (0.0, 0.0)
                }
            }
        }
    }
}

impl fmt::Debug for AudioBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AudioBuffer")
            .field("sample_rate", &self.sample_rate)
            .field("layout", &self.layout)
            .field("format", &self.format)
            .field("frames", &self.frames())
            .finish()
    }
}

/// Tracks and their raw pan values, paired by index
///
/// Built fresh for every mix. Pan values are validated by the mixer, not
/// here, so a bad request is reported with the offending track index.
#[derive(Debug, Clone, Default)]
pub struct MixRequest {
    tracks: Vec<AudioBuffer>,
    pans: Vec<f32>,
}

impl MixRequest {
    pub fn new(tracks: Vec<AudioBuffer>, pans: Vec<f32>) -> Self {
        Self { tracks, pans }
    }

    /// Append one track with its pan
    pub fn with_track(mut self, track: AudioBuffer, pan: f32) -> Self {
        self.tracks.push(track);
        self.pans.push(pan);
        self
    }

    pub fn tracks(&self) -> &[AudioBuffer] {
        &self.tracks
    }

    pub fn pans(&self) -> &[f32] {
        &self.pans
    }

    pub fn into_parts(self) -> (Vec<AudioBuffer>, Vec<f32>) {
        (self.tracks, self.pans)
    }
}

/// Mix statistics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixStats {
    pub tracks: usize,
    pub frames: usize,
    /// Samples that were outside [-1.0, 1.0] (or NaN) before clipping
    pub clipped_samples: usize,
    /// Absolute peak of the summed signal before clipping
    pub peak: f32,
}

/// Stereo output of one mix
#[derive(Debug, Clone)]
pub struct MixResult {
    buffer: AudioBuffer,
    stats: MixStats,
}

impl MixResult {
    pub(crate) fn new(buffer: AudioBuffer, stats: MixStats) -> Self {
        Self { buffer, stats }
    }

    pub fn buffer(&self) -> &AudioBuffer {
        &self.buffer
    }

    pub fn stats(&self) -> MixStats {
        self.stats
    }

    pub fn into_buffer(self) -> AudioBuffer {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_rejects_misaligned_samples() {
        let err = AudioBuffer::stereo(48000, vec![0.1, 0.2, 0.3]).unwrap_err();
        assert_eq!(
            err,
            BufferError::MisalignedSamples {
                samples: 3,
                channels: 2
            }
        );
    }

    #[test]
    fn test_buffer_rejects_zero_rate() {
        assert_eq!(
            AudioBuffer::mono(0, vec![0.0]).unwrap_err(),
            BufferError::ZeroSampleRate
        );
    }

    #[test]
    fn test_channel_layout_from_count() {
        assert_eq!(ChannelLayout::from_count(1), Ok(ChannelLayout::Mono));
        assert_eq!(ChannelLayout::from_count(2), Ok(ChannelLayout::Stereo));
        assert_eq!(
            ChannelLayout::from_count(6),
            Err(BufferError::UnsupportedChannels(6))
        );
    }

    #[test]
    fn test_frames_and_duration() {
        let mono = AudioBuffer::mono(44100, vec![0.0; 44100]).unwrap();
        assert_eq!(mono.frames(), 44100);
        assert_eq!(mono.duration(), Duration::from_secs(1));

        let stereo = AudioBuffer::stereo(48000, vec![0.0; 48000 * 3]).unwrap();
        assert_eq!(stereo.frames(), 24000);
        assert_eq!(stereo.duration(), Duration::from_millis(500));
    }

    #[test]
    fn test_frame_view() {
        let mono = AudioBuffer::mono(48000, vec![0.25, -0.5]).unwrap();
        assert_eq!(mono.frame(0), (0.25, 0.25));
        assert_eq!(mono.frame(1), (-0.5, -0.5));
        assert_eq!(mono.frame(2), (0.0, 0.0));

        let stereo = AudioBuffer::stereo(48000, vec![0.1, 0.2, 0.3, 0.4]).unwrap();
        assert_eq!(stereo.frame(1), (0.3, 0.4));
        assert_eq!(stereo.frame(5), (0.0, 0.0));
    }

    #[test]
    fn test_sample_format_ordering() {
        assert!(SampleFormat::Float32 > SampleFormat::Int32);
        assert!(SampleFormat::Int24 > SampleFormat::Int16);
        assert_eq!(SampleFormat::Int24.bits_per_sample(), 24);
        assert!(SampleFormat::Float32.is_float());
        assert!(!SampleFormat::Int32.is_float());
    }

    #[test]
    fn test_mix_request_builder() {
        let a = AudioBuffer::mono(48000, vec![0.0; 4]).unwrap();
        let b = AudioBuffer::stereo(48000, vec![0.0; 4]).unwrap();
        let request = MixRequest::default().with_track(a, -0.5).with_track(b, 0.5);

        assert_eq!(request.tracks().len(), 2);
        assert_eq!(request.pans(), &[-0.5, 0.5]);
    }
}
