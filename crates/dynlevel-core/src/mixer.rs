//! Crossfaded application of block gains.
//!
//! Each block's gain applies on its own span, except in a transition region
//! at the tail of every block that has a successor. There the gain moves from
//! the block's own value to its successor's along a [`RampShape`]:
//!
//! ```text
//!        block k-1            block k
//!  |----------------|----------------------|
//!             |<-F->|B
//!   g(k-1) ....\    |
//!               \___|_______ g(k)
//! ```
//!
//! `F = round(fraction * block_len)`, capped at the length of the preceding
//! block. Output samples are hard-limited to `[-1.0, 1.0]`.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use core::f64::consts::PI;

use crate::error::ConfigurationError;
use crate::math::hard_clip;
use crate::segment::Segmentation;
use crate::solver::GainCurve;
use crate::waveform::{StereoSamples, Waveform};

/// Output ceiling for leveled samples.
const CLIP_LEVEL: f64 = 1.0;

/// Shape of the weight that fades out the preceding block's gain.
///
/// Both shapes fall monotonically from exactly 1 at `t = 0` to exactly 0 at
/// `t = 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RampShape {
    /// Straight line, `w = 1 - t`.
    Linear,
    /// Raised cosine, `w = (1 + cos(pi * t)) / 2`, flat at both ends.
    #[default]
    Cosine,
}

impl RampShape {
    /// Weight of the outgoing gain at position `t` in `[0, 1]`.
    ///
    /// `t` outside the range is clamped.
    #[inline]
    pub fn weight(self, t: f64) -> f64 {
        if t <= 0.0 {
            return 1.0;
        }
        if t >= 1.0 {
            return 0.0;
        }
        match self {
            Self::Linear => 1.0 - t,
            Self::Cosine => 0.5 * (1.0 + libm::cos(PI * t)),
        }
    }

    /// Lowercase name, as used in settings files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Cosine => "cosine",
        }
    }
}

/// Result of applying a gain curve.
#[derive(Debug, Clone, PartialEq)]
pub struct MixOutput {
    /// The gained and limited waveform.
    pub waveform: Waveform,
    /// Channel samples that had to be limited.
    pub clipped_samples: usize,
}

/// Applies per-block gains with crossfaded transitions.
#[derive(Debug, Clone, Copy)]
pub struct CrossfadeMixer {
    fraction: f64,
    ramp: RampShape,
}

impl CrossfadeMixer {
    /// Create a mixer whose transitions span `fraction` of a block.
    pub fn new(fraction: f64, ramp: RampShape) -> Result<Self, ConfigurationError> {
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ConfigurationError::InvalidCrossfade(fraction));
        }
        Ok(Self { fraction, ramp })
    }

    /// Transition fraction of a block.
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// Ramp shape.
    pub fn ramp(&self) -> RampShape {
        self.ramp
    }

    /// Nominal transition length in frames for blocks of `block_len`.
    pub fn fade_len(&self, block_len: usize) -> usize {
        libm::round(self.fraction * block_len as f64) as usize
    }

    /// Per-frame gain over the whole segmentation.
    pub fn gain_envelope(&self, segmentation: &Segmentation, curve: &GainCurve) -> Vec<f64> {
        let mut envelope = Vec::with_capacity(segmentation.frames());
        self.for_each_gain(segmentation, curve, |_, gain| envelope.push(gain));
        envelope
    }

    /// Apply `curve` to `waveform`, producing a new waveform.
    ///
    /// Frames past the end of `segmentation` are copied through unchanged.
    pub fn apply(
        &self,
        waveform: &Waveform,
        segmentation: &Segmentation,
        curve: &GainCurve,
    ) -> MixOutput {
        let input = &waveform.samples;
        let mut output = input.clone();
        let mut clipped_samples = 0;

        self.for_each_gain(segmentation, curve, |frame, gain| {
            let (l, l_clipped) = hard_clip(f64::from(input.left[frame]) * gain, CLIP_LEVEL);
            let (r, r_clipped) = hard_clip(f64::from(input.right[frame]) * gain, CLIP_LEVEL);
            output.left[frame] = l as f32;
            output.right[frame] = r as f32;
            clipped_samples += usize::from(l_clipped) + usize::from(r_clipped);
        });

        MixOutput {
            waveform: waveform.with_samples(output),
            clipped_samples,
        }
    }

    /// Apply one uniform linear gain to every sample.
    pub fn apply_uniform(waveform: &Waveform, gain: f64) -> MixOutput {
        let mut clipped_samples = 0;
        let mut scale = |channel: &[f32]| -> Vec<f32> {
            channel
                .iter()
                .map(|&s| {
                    let (v, clipped) = hard_clip(f64::from(s) * gain, CLIP_LEVEL);
                    clipped_samples += usize::from(clipped);
                    v as f32
                })
                .collect()
        };
        let left = scale(&waveform.samples.left);
        let right = scale(&waveform.samples.right);

        MixOutput {
            waveform: waveform.with_samples(StereoSamples::new(left, right)),
            clipped_samples,
        }
    }

    /// Walk every frame in order with the gain that applies to it.
    fn for_each_gain(
        &self,
        segmentation: &Segmentation,
        curve: &GainCurve,
        mut f: impl FnMut(usize, f64),
    ) {
        let fade = self.fade_len(segmentation.block_len());
        let spans = segmentation.spans();

        for (k, span) in spans.iter().enumerate() {
            let own = curve.linear(k);
            let region = if k + 1 < spans.len() {
                fade.min(span.len())
            } else {
                0
            };
            let region_start = span.end - region;

            for frame in span.start..region_start {
                f(frame, own);
            }

            if region > 0 {
                let next = curve.linear(k + 1);
                for frame in region_start..span.end {
                    let t = (frame - region_start) as f64 / region as f64;
                    let w = self.ramp.weight(t);
                    f(frame, w * own + (1.0 - w) * next);
                }
            }
        }
    }
}
