//! Named leveling profiles.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::factory_profiles::get_factory_profile;
use crate::settings::LevelerSettings;

/// A named set of leveling settings.
///
/// # TOML Format
///
/// ```toml
/// name = "Podcast"
/// description = "Spoken word for podcast feeds"
///
/// [settings]
/// loudness = -16.0
/// maxgain = 2.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    /// Name of the profile.
    pub name: String,

    /// Optional description of the profile.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// The settings the profile applies.
    #[serde(default)]
    pub settings: LevelerSettings,
}

impl Profile {
    /// Create a profile with default settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            settings: LevelerSettings::default(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Replace the settings.
    pub fn with_settings(mut self, settings: LevelerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Load a profile from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load a profile from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Convert the profile to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save the profile to a TOML file.
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
}

/// Resolve a profile by factory name, then as a TOML file path.
pub fn find_profile(name_or_path: &str) -> Result<Profile, ConfigError> {
    if let Some(profile) = get_factory_profile(name_or_path) {
        return Ok(profile);
    }

    let path = Path::new(name_or_path);
    if path.is_file() {
        return Profile::load(path);
    }

    Err(ConfigError::ProfileNotFound(name_or_path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn parse_with_partial_settings() {
        let profile = Profile::from_toml(
            r#"
name = "Audiobook"

[settings]
loudness = -18.0
division = 12
"#,
        )
        .unwrap();

        assert_eq!(profile.name, "Audiobook");
        assert_eq!(profile.description, None);
        assert_eq!(profile.settings.loudness, -18.0);
        assert_eq!(profile.settings.division, 12);
        assert_eq!(profile.settings.maxgain, 2.0);
    }

    #[test]
    fn missing_settings_table_is_default() {
        let profile = Profile::from_toml("name = \"Plain\"").unwrap();
        assert_eq!(profile.settings, LevelerSettings::default());
    }

    #[test]
    fn save_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("profile.toml");
        let profile = Profile::new("Mine")
            .with_description("custom")
            .with_settings(LevelerSettings {
                loudness: -20.0,
                ..LevelerSettings::default()
            });

        profile.save(&path).unwrap();
        assert_eq!(Profile::load(&path).unwrap(), profile);
    }

    #[test]
    fn find_factory_then_file() {
        assert_eq!(find_profile("broadcast").unwrap().settings.loudness, -23.0);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        Profile::new("Custom").save(&path).unwrap();
        assert_eq!(find_profile(path.to_str().unwrap()).unwrap().name, "Custom");

        assert!(matches!(
            find_profile("no-such-profile"),
            Err(ConfigError::ProfileNotFound(_))
        ));
    }
}
