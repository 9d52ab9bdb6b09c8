//! Spatial mixer: validation, overlay and output assembly

use crate::align::AlignedTracks;
use crate::clamping::*;
use crate::error::{MixError, Result};
use crate::pan::{PanGains, PanLaw, PanValue};
use crate::types::*;
use log::{debug, warn};
use rayon::prelude::*;

const DEFAULT_CHUNK_FRAMES: usize = 4096;
const DEFAULT_PARALLEL_THRESHOLD: usize = 65536;

/// Mixer configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixConfig {
    pub pan_law: PanLaw,
    /// Output frames handled by one worker slice, capped at `usize::MAX / 2`
    pub chunk_frames: usize,
    /// Output length (frames) from which slices are mixed on the rayon pool.
    /// `0` always splits, `usize::MAX` never does.
    pub parallel_threshold: usize,
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            pan_law: PanLaw::default(),
            chunk_frames: DEFAULT_CHUNK_FRAMES,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }
}

/// Stateless stereo mixer
///
/// Each call to [`SpatialMixer::mix`] works only on the request it is given.
#[derive(Debug, Clone, Default)]
pub struct SpatialMixer {
    config: MixConfig,
}

impl SpatialMixer {
    pub fn new(config: MixConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MixConfig {
        &self.config
    }

    /// Pan, align and sum all tracks into one hard-clipped stereo buffer
    ///
    /// Every check runs before the output is allocated; on error nothing
    /// is mixed.
    pub fn mix(&self, request: MixRequest) -> Result<MixResult> {
        let (tracks, pans) = request.into_parts();

        if tracks.is_empty() {
            return Err(MixError::EmptyMixRequest);
        }
        if tracks.len() != pans.len() {
            return Err(MixError::TrackCountMismatch {
                tracks: tracks.len(),
                pans: pans.len(),
            });
        }

        let aligned = AlignedTracks::new(&tracks)?;
        let gains = self.track_gains(&pans)?;

        debug!(
            "Mixing {} tracks: {} frames at {} Hz, {:?} law, gains {:?}",
            tracks.len(),
            aligned.frames(),
            aligned.sample_rate(),
            self.config.pan_law,
            gains
        );

        let mut output = vec![0.0f32; aligned.frames() * 2];
        let chunk_frames = self.config.chunk_frames.clamp(1, usize::MAX / 2);
        let chunk = chunk_frames * 2;
        let parallel = aligned.frames() >= self.config.parallel_threshold;

        if parallel {
            output
                .par_chunks_mut(chunk)
                .enumerate()
                .for_each(|(i, slice)| overlay(&aligned, &gains, i * chunk_frames, slice));
        } else {
            output
                .chunks_mut(chunk)
                .enumerate()
                .for_each(|(i, slice)| overlay(&aligned, &gains, i * chunk_frames, slice));
        }

        let clip = if parallel {
            let clip = clip_stats_parallel(&output, chunk);
            hard_clip_parallel(&mut output, chunk);
            clip
        } else {
            let clip = clip_stats(&output);
            hard_clip(&mut output);
            clip
        };

        if clip.clipped > 0 {
            warn!(
                "Mix exceeded full scale: {} samples hard clipped (peak {:.3})",
                clip.clipped, clip.peak
            );
        }

        let stats = MixStats {
            tracks: tracks.len(),
            frames: aligned.frames(),
            clipped_samples: clip.clipped,
            peak: clip.peak,
        };

        let format = output_format(&tracks);
        Ok(MixResult::new(
            AudioBuffer::stereo_unchecked(aligned.sample_rate(), format, output),
            stats,
        ))
    }

    fn track_gains(&self, pans: &[f32]) -> Result<Vec<PanGains>> {
        pans.iter()
            .enumerate()
            .map(|(track, &value)| {
                PanValue::new(value)
                    .map(|pan| self.config.pan_law.gains(pan))
                    .ok_or(MixError::InvalidParameter { track, value })
            })
            .collect()
    }
}

/// Mix with the default configuration
pub fn mix(request: MixRequest) -> Result<MixResult> {
    SpatialMixer::default().mix(request)
}

/// Add every track's panned contribution into one interleaved stereo slice
///
/// `slice` covers output frames `start..start + slice.len() / 2`. Tracks
/// shorter than the slice contribute nothing past their own end, which is
/// what silence padding amounts to.
fn overlay(aligned: &AlignedTracks<'_>, gains: &[PanGains], start: usize, slice: &mut [f32]) {
    let slice_frames = slice.len() / 2;

    for (track, g) in aligned.tracks().iter().zip(gains) {
        let end = track.frames().min(start + slice_frames);
        if end <= start {
            continue;
        }
        let frames = end - start;
        let out = &mut slice[..frames * 2];

        match track.layout() {
            ChannelLayout::Mono => {
                let src = &track.samples()[start..end];
                for (dst, &s) in out.chunks_exact_mut(2).zip(src) {
                    dst[0] += s * g.left;
                    dst[1] += s * g.right;
                }
            }
            ChannelLayout::Stereo => {
                let src = &track.samples()[start * 2..end * 2];
                for (dst, lr) in out.chunks_exact_mut(2).zip(src.chunks_exact(2)) {
                    dst[0] += lr[0] * g.left;
                    dst[1] += lr[1] * g.right;
                }
            }
        }
    }
}

/// Highest-resolution input format; independent of track order
fn output_format(tracks: &[AudioBuffer]) -> SampleFormat {
    tracks
        .iter()
        .map(AudioBuffer::format)
        .max()
        .unwrap_or(SampleFormat::Float32)
}
