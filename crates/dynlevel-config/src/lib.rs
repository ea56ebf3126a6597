//! Settings and profile management for dynlevel.
//!
//! # Features
//!
//! - **Settings**: [`LevelerSettings`] read from and written to TOML, with the
//!   same defaults as the command line
//! - **Validation**: every out-of-range setting reported at once
//! - **Profiles**: named settings, including built-in factory profiles
//!
//! # Example
//!
//! ```rust
//! use dynlevel_config::{LevelerSettings, find_profile};
//!
//! let settings = LevelerSettings::from_toml("loudness = -23.0").unwrap();
//! let config = settings.to_leveler_config().unwrap();
//! assert_eq!(config.target_lufs, -23.0);
//!
//! let podcast = find_profile("podcast").unwrap();
//! assert_eq!(podcast.settings.loudness, -16.0);
//! ```

mod error;
mod profile;
mod settings;

/// Settings validation.
pub mod validation;

/// Factory profiles bundled with the library.
pub mod factory_profiles;

pub use error::ConfigError;
pub use factory_profiles::{factory_profile_names, factory_profiles, get_factory_profile};
pub use profile::{Profile, find_profile};
pub use settings::{LevelerSettings, Ramp};
pub use validation::{ValidationError, ValidationResult, validate_settings};
