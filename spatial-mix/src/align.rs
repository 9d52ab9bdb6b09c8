//! Length alignment of tracks with a common sample rate
//!
//! Padding is virtual: shorter tracks are never copied or extended, reads
//! past a track's own end are treated as silence by the overlay.

use crate::error::{MixError, Result};
use crate::types::AudioBuffer;

/// Borrowed view of N tracks aligned to the longest one
#[derive(Debug)]
pub struct AlignedTracks<'a> {
    tracks: &'a [AudioBuffer],
    sample_rate: u32,
    frames: usize,
}

impl<'a> AlignedTracks<'a> {
    /// Fails with `EmptyMixRequest` for zero tracks and `RateMismatch` when
    /// any track's rate differs from the first track's.
    pub fn new(tracks: &'a [AudioBuffer]) -> Result<Self> {
        let first = tracks.first().ok_or(MixError::EmptyMixRequest)?;
        let sample_rate = first.sample_rate();

        if let Some((track, buffer)) = tracks
            .iter()
            .enumerate()
            .find(|(_, b)| b.sample_rate() != sample_rate)
        {
            return Err(MixError::RateMismatch {
                track,
                expected: sample_rate,
                found: buffer.sample_rate(),
            });
        }

        let frames = tracks.iter().map(AudioBuffer::frames).max().unwrap_or(0);

        Ok(Self {
            tracks,
            sample_rate,
            frames,
        })
    }

    pub fn tracks(&self) -> &'a [AudioBuffer] {
        self.tracks
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Aligned length in frames (the longest track's length)
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Silence frames appended to `track` to reach the aligned length
    pub fn padding(&self, track: usize) -> usize {
        self.tracks
            .get(track)
            .map_or(0, |b| self.frames - b.frames())
    }

    /// Left/right samples of `track` at `frame`, silence beyond its end
    #[inline]
    pub fn sample(&self, track: usize, frame: usize) -> (f32, f32) {
        self.tracks[track].frame(frame)
    }
}
