//! Stereo audio buffers for file-level leveling.
//!
//! [`StereoSamples`] holds a pair of `Vec<f32>` buffers (left/right channels)
//! and provides conversion utilities (interleaved, span views). [`Waveform`]
//! bundles the samples with the sample rate and bit depth they were decoded
//! from, which is everything the leveler needs to know about a recording.

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::error::ConfigurationError;
use crate::math;

/// A pair of stereo audio buffers (left and right channels).
///
/// This is the interchange type for stereo audio data in dynlevel.
/// Each channel is a `Vec<f32>` of equal length.
///
/// # Example
///
/// ```rust
/// use dynlevel_core::StereoSamples;
///
/// let samples = StereoSamples::new(vec![1.0; 1024], vec![0.5; 1024]);
/// assert_eq!(samples.len(), 1024);
/// assert_eq!(samples.to_interleaved()[..2], [1.0, 0.5]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct StereoSamples {
    /// Left channel samples.
    pub left: Vec<f32>,
    /// Right channel samples.
    pub right: Vec<f32>,
}

impl StereoSamples {
    /// Create new stereo samples from left and right channels.
    ///
    /// Channel lengths are not checked here; [`Waveform::validate`] reports a
    /// mismatch as a configuration error before any processing.
    pub fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        Self { left, right }
    }

    /// Create `frames` frames of digital silence.
    pub fn silence(frames: usize) -> Self {
        Self {
            left: vec![0.0; frames],
            right: vec![0.0; frames],
        }
    }

    /// Create stereo samples from mono by duplicating to both channels.
    pub fn from_mono(mono: Vec<f32>) -> Self {
        Self {
            left: mono.clone(),
            right: mono,
        }
    }

    /// Get the number of samples per channel.
    pub fn len(&self) -> usize {
        self.left.len()
    }

    /// Check if the buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Borrow both channels over the half-open frame range `[start, end)`.
    pub fn span(&self, start: usize, end: usize) -> (&[f32], &[f32]) {
        (&self.left[start..end], &self.right[start..end])
    }

    /// Sample peak across both channels (linear).
    pub fn peak(&self) -> f32 {
        math::peak(&self.left).max(math::peak(&self.right))
    }

    /// Convert to interleaved format (L, R, L, R, ...).
    pub fn to_interleaved(&self) -> Vec<f32> {
        let mut interleaved = Vec::with_capacity(self.left.len() * 2);
        for (l, r) in self.left.iter().zip(self.right.iter()) {
            interleaved.push(*l);
            interleaved.push(*r);
        }
        interleaved
    }

    /// Create from interleaved format (L, R, L, R, ...).
    ///
    /// A trailing unpaired sample is dropped.
    pub fn from_interleaved(interleaved: &[f32]) -> Self {
        let len = interleaved.len() / 2;
        let mut left = Vec::with_capacity(len);
        let mut right = Vec::with_capacity(len);

        for chunk in interleaved.chunks_exact(2) {
            left.push(chunk[0]);
            right.push(chunk[1]);
        }

        Self { left, right }
    }
}

/// A decoded stereo recording.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    /// Channel data.
    pub samples: StereoSamples,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth of the source encoding (16, 24, 32).
    pub bit_depth: u16,
}

impl Waveform {
    /// Create a waveform from channel data.
    pub fn new(samples: StereoSamples, sample_rate: u32, bit_depth: u16) -> Self {
        Self {
            samples,
            sample_rate,
            bit_depth,
        }
    }

    /// Number of stereo frames.
    pub fn frames(&self) -> usize {
        self.samples.len()
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }

    /// Create a waveform with the same format but different channel data.
    pub fn with_samples(&self, samples: StereoSamples) -> Self {
        Self {
            samples,
            sample_rate: self.sample_rate,
            bit_depth: self.bit_depth,
        }
    }

    /// Check that the buffer is usable stereo audio.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.sample_rate == 0 {
            return Err(ConfigurationError::InvalidSampleRate(self.sample_rate));
        }
        if self.samples.left.len() != self.samples.right.len() {
            return Err(ConfigurationError::ChannelMismatch {
                left: self.samples.left.len(),
                right: self.samples.right.len(),
            });
        }
        Ok(())
    }
}
