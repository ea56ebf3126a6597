//! Settings validation.
//!
//! Every problem in a settings file is collected, so a user fixing a profile
//! sees all of them at once.
//!
//! # Example
//!
//! ```rust
//! use dynlevel_config::{LevelerSettings, validate_settings};
//!
//! let mut settings = LevelerSettings::default();
//! assert!(validate_settings(&settings).is_ok());
//!
//! settings.loudness = 3.0;
//! assert!(validate_settings(&settings).is_err());
//! ```

use thiserror::Error;

use crate::LevelerSettings;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside its allowed range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Name of the setting.
        param: String,
        /// The value that was out of range.
        value: f64,
        /// Minimum allowed value.
        min: f64,
        /// Maximum allowed value.
        max: f64,
    },

    /// Value that must be below zero.
    #[error("parameter '{param}' must be negative, got {value}")]
    MustBeNegative {
        /// Name of the setting.
        param: String,
        /// The offending value.
        value: f64,
    },

    /// NaN or infinite value.
    #[error("parameter '{param}' must be finite, got {value}")]
    NotFinite {
        /// Name of the setting.
        param: String,
        /// The offending value.
        value: f64,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

fn check_finite(errors: &mut Vec<ValidationError>, param: &str, value: f64) -> bool {
    if value.is_finite() {
        return true;
    }
    errors.push(ValidationError::NotFinite {
        param: param.to_string(),
        value,
    });
    false
}

fn check_range(errors: &mut Vec<ValidationError>, param: &str, value: f64, min: f64, max: f64) {
    if !(min..=max).contains(&value) {
        errors.push(ValidationError::OutOfRange {
            param: param.to_string(),
            value,
            min,
            max,
        });
    }
}

/// Validate leveling settings.
///
/// - `division` at least 1 second
/// - `loudness` finite and negative
/// - `maxgain` finite and not negative
/// - `crossfade` in `[0, 1]`
pub fn validate_settings(settings: &LevelerSettings) -> ValidationResult<()> {
    let mut errors = Vec::new();

    if settings.division < 1 {
        errors.push(ValidationError::OutOfRange {
            param: "division".to_string(),
            value: f64::from(settings.division),
            min: 1.0,
            max: f64::from(u32::MAX),
        });
    }

    if check_finite(&mut errors, "loudness", settings.loudness) && settings.loudness >= 0.0 {
        errors.push(ValidationError::MustBeNegative {
            param: "loudness".to_string(),
            value: settings.loudness,
        });
    }

    if check_finite(&mut errors, "maxgain", settings.maxgain) {
        check_range(&mut errors, "maxgain", settings.maxgain, 0.0, f64::MAX);
    }

    if check_finite(&mut errors, "crossfade", settings.crossfade) {
        check_range(&mut errors, "crossfade", settings.crossfade, 0.0, 1.0);
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
