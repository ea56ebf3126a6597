//! Leveling settings file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use dynlevel_core::{LevelerConfig, RampShape};

use crate::error::ConfigError;
use crate::validation::{ValidationResult, validate_settings};

/// Crossfade ramp shape as written in settings files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ramp {
    /// Raised cosine.
    #[default]
    Cosine,
    /// Straight line.
    Linear,
}

impl From<Ramp> for RampShape {
    fn from(ramp: Ramp) -> Self {
        match ramp {
            Ramp::Cosine => RampShape::Cosine,
            Ramp::Linear => RampShape::Linear,
        }
    }
}

impl From<RampShape> for Ramp {
    fn from(shape: RampShape) -> Self {
        match shape {
            RampShape::Cosine => Ramp::Cosine,
            RampShape::Linear => Ramp::Linear,
        }
    }
}

/// User-facing leveling settings.
///
/// Missing keys take their defaults, so a settings file only needs the
/// values it changes.
///
/// # TOML Format
///
/// ```toml
/// division = 8
/// loudness = -16.0
/// maxgain = 2.0
/// crossfade = 0.6
/// nophase2 = false
/// quiet = false
/// ramp = "cosine"
/// shift_phase2 = false
/// normalize = false
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelerSettings {
    /// Block length in whole seconds.
    pub division: u32,
    /// Target loudness in LUFS (negative).
    pub loudness: f64,
    /// Per-block gain bound in dB.
    pub maxgain: f64,
    /// Crossfade length as a fraction of a block.
    pub crossfade: f64,
    /// Skip the second pass.
    pub nophase2: bool,
    /// Suppress progress and diagnostics.
    pub quiet: bool,
    /// Crossfade ramp shape.
    pub ramp: Ramp,
    /// Shift the second pass's blocks by half a block.
    pub shift_phase2: bool,
    /// Normalize the integrated loudness of the result to the target.
    pub normalize: bool,
}

impl Default for LevelerSettings {
    fn default() -> Self {
        Self {
            division: 8,
            loudness: -16.0,
            maxgain: 2.0,
            crossfade: 0.6,
            nophase2: false,
            quiet: false,
            ramp: Ramp::Cosine,
            shift_phase2: false,
            normalize: false,
        }
    }
}

impl LevelerSettings {
    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Convert the settings to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the settings to a TOML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Check every setting against its allowed range.
    pub fn validate(&self) -> ValidationResult<()> {
        validate_settings(self)
    }

    /// Block length actually used: odd divisions are rounded up to even.
    pub fn effective_division(&self) -> u32 {
        if self.division % 2 == 1 {
            self.division.saturating_add(1)
        } else {
            self.division
        }
    }

    /// Validate and convert into a core [`LevelerConfig`].
    pub fn to_leveler_config(&self) -> Result<LevelerConfig, ConfigError> {
        self.validate()?;

        let division = self.effective_division();
        if division != self.division {
            tracing::warn!(
                "division must be even, using {} s instead of {} s",
                division,
                self.division
            );
        }

        let config = LevelerConfig {
            division_seconds: f64::from(division),
            target_lufs: self.loudness,
            max_gain_db: self.maxgain,
            crossfade: self.crossfade,
            ramp: self.ramp.into(),
            skip_phase2: self.nophase2,
            phase2_shift: self.shift_phase2,
            normalize_output: self.normalize,
            quiet: self.quiet,
        };
        dynlevel_core::Leveler::new(config)?;
        Ok(config)
    }
}
