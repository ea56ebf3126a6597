//! Level conversion helpers shared by the meter, solver and mixer.
//!
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`power_to_lufs`] / [`lufs_to_power`] - Convert between K-weighted mean
//!   square power and LUFS
//!
//! # Sample Utilities
//!
//! - [`hard_clip`] - Hard limiting to the representable range
//! - [`peak`] / [`peak_dbfs`] - Sample peak measurement

use libm::{log10, pow};

/// Offset applied when converting mean square power to LUFS.
///
/// `LUFS = -0.691 + 10 * log10(power)`
pub const LUFS_OFFSET: f64 = -0.691;

/// Floor returned by [`linear_to_db`] and [`peak_dbfs`] for zero input.
pub const SILENCE_DB: f64 = -200.0;

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → ~0.501, +6 dB → ~1.995)
///
/// # Example
/// ```rust
/// use dynlevel_core::db_to_linear;
///
/// assert_eq!(db_to_linear(0.0), 1.0);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f64) -> f64 {
    pow(10.0, db / 20.0)
}

/// Convert linear gain to decibels.
///
/// Values at or below zero map to [`SILENCE_DB`].
///
/// # Example
/// ```rust
/// use dynlevel_core::linear_to_db;
///
/// assert!(linear_to_db(1.0).abs() < 1e-12);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// ```
#[inline]
pub fn linear_to_db(linear: f64) -> f64 {
    if linear <= 0.0 {
        return SILENCE_DB;
    }
    20.0 * log10(linear)
}

/// Convert K-weighted mean square power to LUFS.
///
/// Returns `None` for zero (or negative) power, where loudness is undefined.
#[inline]
pub fn power_to_lufs(power: f64) -> Option<f64> {
    if power > 0.0 && power.is_finite() {
        Some(LUFS_OFFSET + 10.0 * log10(power))
    } else {
        None
    }
}

/// Convert LUFS to K-weighted mean square power.
#[inline]
pub fn lufs_to_power(lufs: f64) -> f64 {
    pow(10.0, (lufs - LUFS_OFFSET) / 10.0)
}

/// Hard clip to ±threshold range.
///
/// Returns the limited value and whether limiting took place.
#[inline]
pub fn hard_clip(x: f64, threshold: f64) -> (f64, bool) {
    if x > threshold {
        (threshold, true)
    } else if x < -threshold {
        (-threshold, true)
    } else {
        (x, false)
    }
}

/// Sample peak (maximum absolute value) of a buffer.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0_f32, |acc, s| acc.max(s.abs()))
}

/// Sample peak of a buffer in dBFS.
pub fn peak_dbfs(samples: &[f32]) -> f64 {
    linear_to_db(f64::from(peak(samples)))
}
