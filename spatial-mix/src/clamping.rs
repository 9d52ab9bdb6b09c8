//! Hard clipping of summed samples to [-1.0, 1.0]
//!
//! Out-of-range values are truncated to the boundary, never rescaled.
//! NaN becomes 0.0. The AVX path processes 8 floats per iteration; the
//! scalar path is the reference and handles the tail.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use rayon::prelude::*;

/// Hard clip with AVX
///
/// # Safety
/// Requires AVX CPU support.
#[target_feature(enable = "avx")]
#[cfg(target_arch = "x86_64")]
pub unsafe fn hard_clip_avx(buffer: &mut [f32]) {
    let min_val = _mm256_set1_ps(-1.0);
    let max_val = _mm256_set1_ps(1.0);

    let len = buffer.len();
    let ptr = buffer.as_mut_ptr();
    let mut i = 0;

    while i + 8 <= len {
        let mut val = _mm256_loadu_ps(ptr.add(i));

        // NaN lanes compare unequal to themselves and are masked to 0.0
        let nan_mask = _mm256_cmp_ps(val, val, _CMP_EQ_OQ);
        val = _mm256_and_ps(val, nan_mask);

        val = _mm256_min_ps(val, max_val);
        val = _mm256_max_ps(val, min_val);

        _mm256_storeu_ps(ptr.add(i), val);
        i += 8;
    }

    hard_clip_scalar(&mut buffer[i..]);
}

/// Portable hard clip
pub fn hard_clip_scalar(buffer: &mut [f32]) {
    for sample in buffer.iter_mut() {
        *sample = clip_sample(*sample);
    }
}

#[inline]
pub fn clip_sample(sample: f32) -> f32 {
    if sample.is_nan() {
        0.0
    } else {
        sample.clamp(-1.0, 1.0)
    }
}

/// Hard clip with runtime CPU detection
pub fn hard_clip(buffer: &mut [f32]) {
    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx") {
            unsafe {
                hard_clip_avx(buffer);
            }
            return;
        }
    }

    hard_clip_scalar(buffer);
}

/// Hard clip disjoint `chunk`-sized slices on the rayon pool
pub fn hard_clip_parallel(buffer: &mut [f32], chunk: usize) {
    buffer
        .par_chunks_mut(chunk.max(1))
        .for_each(hard_clip);
}

/// Pre-clip measurements of a summed buffer
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClipStats {
    /// Samples outside [-1.0, 1.0], NaN included
    pub clipped: usize,
    /// Largest absolute finite sample value
    pub peak: f32,
}

impl ClipStats {
    fn merge(self, other: ClipStats) -> ClipStats {
        ClipStats {
            clipped: self.clipped + other.clipped,
            peak: self.peak.max(other.peak),
        }
    }
}

pub fn clip_stats(buffer: &[f32]) -> ClipStats {
    buffer.iter().fold(ClipStats::default(), |acc, &s| {
        if s.is_nan() {
            ClipStats {
                clipped: acc.clipped + 1,
                ..acc
            }
        } else {
            let abs = s.abs();
            ClipStats {
                clipped: acc.clipped + usize::from(abs > 1.0),
                peak: acc.peak.max(abs),
            }
        }
    })
}

pub fn clip_stats_parallel(buffer: &[f32], chunk: usize) -> ClipStats {
    buffer
        .par_chunks(chunk.max(1))
        .map(clip_stats)
        .reduce(ClipStats::default, ClipStats::merge)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_in_range() {
        let mut buffer = vec![0.5, -0.5, 0.0, 0.9, -0.9, 1.0, -1.0];
        let expected = buffer.clone();

        hard_clip(&mut buffer);

        assert_eq!(buffer, expected, "In-range values should not change");
    }

    #[test]
    fn test_clip_out_of_range() {
        let mut buffer = vec![1.5, -1.5, 2.0, -2.0];
        hard_clip(&mut buffer);

        assert_eq!(buffer, vec![1.0, -1.0, 1.0, -1.0]);
    }

    #[test]
    fn test_clip_nan() {
        let mut buffer = vec![f32::NAN, 0.5, f32::NAN, -0.5];
        hard_clip(&mut buffer);

        assert_eq!(buffer, vec![0.0, 0.5, 0.0, -0.5]);
    }

    #[test]
    fn test_clip_large_buffer() {
        let mut buffer: Vec<f32> = (0..10000)
            .map(|i| ((i as f32) / 100.0).sin() * 1.5)
            .collect();

        hard_clip(&mut buffer);

        for sample in &buffer {
            assert!(
                (-1.0..=1.0).contains(sample),
                "Sample {} out of range",
                sample
            );
        }
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_avx_vs_scalar() {
        if !is_x86_feature_detected!("avx") {
            return;
        }

        // 1027 leaves a scalar tail after the 8-wide loop
        let mut buffer_avx: Vec<f32> = (0..1027)
            .map(|i| ((i as f32) / 10.0).sin() * 2.0)
            .collect();
        buffer_avx[100] = f32::NAN;
        buffer_avx[1026] = f32::NAN;
        let mut buffer_scalar = buffer_avx.clone();

        unsafe {
            hard_clip_avx(&mut buffer_avx);
        }
        hard_clip_scalar(&mut buffer_scalar);

        assert_eq!(buffer_avx, buffer_scalar);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut parallel: Vec<f32> = (0..5000).map(|i| (i as f32 * 0.37).cos() * 1.8).collect();
        let mut sequential = parallel.clone();

        hard_clip_parallel(&mut parallel, 333);
        hard_clip(&mut sequential);

        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_clip_stats() {
        let buffer = vec![0.5, -1.5, 1.0, f32::NAN, 2.25, -0.1];
        let stats = clip_stats(&buffer);

        assert_eq!(stats.clipped, 3);
        assert_eq!(stats.peak, 2.25);
        assert_eq!(clip_stats_parallel(&buffer, 2), stats);
    }

    #[test]
    fn test_clip_stats_empty() {
        assert_eq!(clip_stats(&[]), ClipStats::default());
        assert_eq!(clip_stats_parallel(&[], 16), ClipStats::default());
    }
}
