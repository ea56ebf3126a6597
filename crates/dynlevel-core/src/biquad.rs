//! Biquad (bi-quadratic) filter structure and the BS.1770 K-weighting cascade.
//!
//! The K-weighting coefficients are derived from the analog prototype given in
//! ITU-R BS.1770-4 via a pre-warped bilinear transform, so any sample rate is
//! supported. At 48 kHz they reproduce the reference table of the standard.

use core::f64::consts::PI;
use libm::{pow, tan};

/// Pre-filter (high-frequency shelf) center frequency in Hz.
const SHELF_F0: f64 = 1681.974450955533;
/// Pre-filter shelf gain in dB.
const SHELF_GAIN_DB: f64 = 3.999843853973347;
/// Pre-filter shelf quality factor.
const SHELF_Q: f64 = 0.7071752369554196;
/// Highest shelf design frequency as a fraction of the sample rate. Below
/// about 3.4 kHz the nominal shelf frequency sits at or past Nyquist.
const SHELF_MAX_FRACTION: f64 = 0.45;
/// Exponent relating the band gain `Vb` to the high gain `Vh` of the shelf.
const SHELF_VB_EXPONENT: f64 = 0.4996667741545416;

/// RLB high-pass corner frequency in Hz.
const HIGHPASS_F0: f64 = 38.13547087602444;
/// RLB high-pass quality factor.
const HIGHPASS_Q: f64 = 0.5003270373238773;

/// Generic biquad filter coefficients and state.
///
/// Implements the Direct Form I biquad structure:
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
///
/// Runs in `f64`: loudness measurement integrates millions of squared
/// samples and the 38 Hz high-pass poles sit very close to the unit circle.
#[derive(Debug, Clone)]
pub struct Biquad {
    /// Feedforward coefficients
    b0: f64,
    b1: f64,
    b2: f64,

    /// Feedback coefficients
    a1: f64,
    a2: f64,

    /// Input delay line: x[n-1], x[n-2]
    x1: f64,
    x2: f64,

    /// Output delay line: y[n-1], y[n-2]
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    ///
    /// Initial state: `y[n] = x[n]` (no filtering)
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Creates a biquad from a `(b0, b1, b2, a0, a1, a2)` coefficient tuple.
    pub fn from_coefficients(coefficients: (f64, f64, f64, f64, f64, f64)) -> Self {
        let (b0, b1, b2, a0, a1, a2) = coefficients;
        let mut biquad = Self::new();
        biquad.set_coefficients(b0, b1, b2, a0, a1, a2);
        biquad
    }

    /// Sets the biquad coefficients.
    ///
    /// # Arguments
    ///
    /// * `b0, b1, b2` - Feedforward coefficients
    /// * `a0, a1, a2` - Feedback coefficients (a0 is typically 1.0)
    ///
    /// Note: This function normalizes by a0 internally.
    pub fn set_coefficients(&mut self, b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Returns the normalized coefficients as `(b0, b1, b2, a1, a2)`.
    pub fn coefficients(&self) -> (f64, f64, f64, f64, f64) {
        (self.b0, self.b1, self.b2, self.a1, self.a2)
    }

    /// Processes a single sample through the biquad filter.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    /// Clears the filter state (delay lines).
    ///
    /// Useful for resetting the filter without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

/// Calculates the K-weighting pre-filter (high shelf) coefficients.
///
/// The shelf frequency is clamped below Nyquist for low sample rates.
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn k_shelf_coefficients(sample_rate: f64) -> (f64, f64, f64, f64, f64, f64) {
    let f0 = SHELF_F0.min(SHELF_MAX_FRACTION * sample_rate);
    let k = tan(PI * f0 / sample_rate);
    let vh = pow(10.0, SHELF_GAIN_DB / 20.0);
    let vb = pow(vh, SHELF_VB_EXPONENT);
    let k2 = k * k;

    let b0 = vh + vb * k / SHELF_Q + k2;
    let b1 = 2.0 * (k2 - vh);
    let b2 = vh - vb * k / SHELF_Q + k2;
    let a0 = 1.0 + k / SHELF_Q + k2;
    let a1 = 2.0 * (k2 - 1.0);
    let a2 = 1.0 - k / SHELF_Q + k2;

    (b0, b1, b2, a0, a1, a2)
}

/// Calculates the K-weighting RLB high-pass coefficients.
///
/// # Returns
///
/// (b0, b1, b2, a0, a1, a2) coefficients
pub fn k_highpass_coefficients(sample_rate: f64) -> (f64, f64, f64, f64, f64, f64) {
    let k = tan(PI * HIGHPASS_F0 / sample_rate);
    let k2 = k * k;
    let a0 = 1.0 + k / HIGHPASS_Q + k2;

    (
        a0,
        -2.0 * a0,
        a0,
        a0,
        2.0 * (k2 - 1.0),
        1.0 - k / HIGHPASS_Q + k2,
    )
}

/// Two-stage K-weighting filter for a single channel.
///
/// Stage one is the high-frequency shelf modelling the acoustic effect of the
/// head, stage two the revised low-frequency B-curve high-pass.
#[derive(Debug, Clone)]
pub struct KWeighting {
    shelf: Biquad,
    highpass: Biquad,
}

impl KWeighting {
    /// Designs the K-weighting cascade for the given sample rate.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            shelf: Biquad::from_coefficients(k_shelf_coefficients(sample_rate)),
            highpass: Biquad::from_coefficients(k_highpass_coefficients(sample_rate)),
        }
    }

    /// Filters one sample through both stages.
    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        self.highpass.process(self.shelf.process(input))
    }

    /// Clears both stages.
    pub fn clear(&mut self) {
        self.shelf.clear();
        self.highpass.clear();
    }
}
