//! ITU-R BS.1770-4 integrated loudness meter for stereo spans.
//!
//! # Algorithm
//!
//! 1. K-weight each channel ([`KWeighting`]), starting from zero filter state.
//! 2. Compute channel mean squares over 400 ms windows with 75% overlap.
//! 3. Sum the channel mean squares (stereo weights are 1.0 each).
//! 4. Absolute gate: drop windows at or below -70 LUFS.
//! 5. Relative gate: drop windows at or below the gated mean minus 10 LU.
//! 6. `LUFS = -0.691 + 10 * log10(mean power of surviving windows)`.
//!
//! When no window survives the absolute gate the loudness is undefined and
//! the meter returns `None` rather than `-inf`.
//!
//! # Example
//!
//! ```rust
//! use dynlevel_core::LoudnessMeter;
//!
//! let meter = LoudnessMeter::new(48000);
//! let sine: Vec<f32> = (0..48000)
//!     .map(|i| (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 48000.0).sin())
//!     .collect();
//!
//! // Full-scale 1 kHz in one channel reads about -3 LUFS.
//! let lufs = meter.measure(&sine, &vec![0.0; 48000]).unwrap();
//! assert!((lufs - (-3.01)).abs() < 0.1);
//! ```

#[cfg(not(feature = "std"))]
use alloc::{vec, vec::Vec};

use crate::biquad::KWeighting;
use crate::math::{lufs_to_power, power_to_lufs};
use crate::segment::Segmentation;
use crate::waveform::Waveform;

/// Absolute gate threshold in LUFS.
pub const ABSOLUTE_GATE_LUFS: f64 = -70.0;

/// Relative gate offset in LU below the absolutely gated loudness.
pub const RELATIVE_GATE_LU: f64 = -10.0;

/// Gating window duration in seconds.
pub const WINDOW_SECS: f64 = 0.4;

/// Hops per gating window (75% overlap).
const HOPS_PER_WINDOW: usize = 4;

/// Channel weights for left and right.
const CHANNEL_WEIGHTS: [f64; 2] = [1.0, 1.0];

/// BS.1770 integrated loudness meter.
///
/// The meter is stateless between calls: every span is filtered from zero
/// state, so measurements of different blocks are independent and can be
/// taken in any order.
#[derive(Debug, Clone)]
pub struct LoudnessMeter {
    sample_rate: u32,
    hop_len: usize,
    weighting: KWeighting,
}

impl LoudnessMeter {
    /// Create a meter for audio at `sample_rate` Hz.
    pub fn new(sample_rate: u32) -> Self {
        let window = libm::round(WINDOW_SECS * f64::from(sample_rate)) as usize;
        let hop_len = (window / HOPS_PER_WINDOW).max(1);
        Self {
            sample_rate,
            hop_len,
            weighting: KWeighting::new(f64::from(sample_rate)),
        }
    }

    /// Sample rate the K-weighting was designed for.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Gating window length in frames.
    pub fn window_len(&self) -> usize {
        self.hop_len * HOPS_PER_WINDOW
    }

    /// Integrated loudness of a stereo span in LUFS.
    ///
    /// Returns `None` for silence (nothing survives the absolute gate) and
    /// for empty spans. Extra frames in the longer channel are ignored.
    pub fn measure(&self, left: &[f32], right: &[f32]) -> Option<f64> {
        let powers = self.window_powers(left, right);
        gated_loudness(&powers)
    }

    /// Integrated loudness of a whole waveform.
    pub fn measure_waveform(&self, waveform: &Waveform) -> Option<f64> {
        self.measure(&waveform.samples.left, &waveform.samples.right)
    }

    /// Loudness of every block of `segmentation`, in block order.
    pub fn measure_blocks(
        &self,
        waveform: &Waveform,
        segmentation: &Segmentation,
    ) -> Vec<Option<f64>> {
        segmentation
            .spans()
            .iter()
            .map(|span| {
                let (left, right) = waveform.samples.span(span.start, span.end);
                self.measure(left, right)
            })
            .collect()
    }

    /// Mean square power of each 400 ms gating window.
    ///
    /// A span shorter than one window is measured as a single window.
    pub fn window_powers(&self, left: &[f32], right: &[f32]) -> Vec<f64> {
        let frames = left.len().min(right.len());
        if frames == 0 {
            return Vec::new();
        }

        let hop_sums = self.hop_energy(&left[..frames], &right[..frames]);
        let window_len = self.window_len();

        if frames < window_len {
            let total: f64 = hop_sums.iter().sum();
            return vec![total / frames as f64];
        }

        // Only hops that are complete take part in full windows.
        let complete_hops = frames / self.hop_len;
        let windows = complete_hops + 1 - HOPS_PER_WINDOW;
        (0..windows)
            .map(|w| {
                let energy: f64 = hop_sums[w..w + HOPS_PER_WINDOW].iter().sum();
                energy / window_len as f64
            })
            .collect()
    }

    /// Weighted K-filtered energy summed per hop (the final hop may be partial).
    fn hop_energy(&self, left: &[f32], right: &[f32]) -> Vec<f64> {
        let mut filters = [self.weighting.clone(), self.weighting.clone()];
        let mut sums = Vec::with_capacity(left.len() / self.hop_len + 1);

        for (l_hop, r_hop) in left.chunks(self.hop_len).zip(right.chunks(self.hop_len)) {
            let mut energy = [0.0_f64; 2];
            for (&l, &r) in l_hop.iter().zip(r_hop) {
                let kl = filters[0].process(f64::from(l));
                let kr = filters[1].process(f64::from(r));
                energy[0] += kl * kl;
                energy[1] += kr * kr;
            }
            sums.push(CHANNEL_WEIGHTS[0] * energy[0] + CHANNEL_WEIGHTS[1] * energy[1]);
        }

        sums
    }
}

/// Two-stage gated loudness over precomputed window powers.
///
/// Returns `None` if no window passes the absolute gate.
pub fn gated_loudness(powers: &[f64]) -> Option<f64> {
    let absolute = lufs_to_power(ABSOLUTE_GATE_LUFS);

    let (sum, count) = mean_above(powers, absolute);
    if count == 0 {
        return None;
    }

    let ungated = power_to_lufs(sum / count as f64)?;
    let relative = lufs_to_power(ungated + RELATIVE_GATE_LU).max(absolute);

    let (sum, count) = mean_above(powers, relative);
    if count == 0 {
        return None;
    }
    power_to_lufs(sum / count as f64)
}

fn mean_above(powers: &[f64], threshold: f64) -> (f64, usize) {
    powers
        .iter()
        .filter(|&&p| p > threshold)
        .fold((0.0, 0), |(sum, count), &p| (sum + p, count + 1))
}
