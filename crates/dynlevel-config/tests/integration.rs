//! Integration tests for dynlevel-config.
//!
//! These tests verify end-to-end functionality across modules.

use dynlevel_config::{
    ConfigError, LevelerSettings, Profile, Ramp, factory_profiles, find_profile,
};
use dynlevel_core::{Leveler, LoudnessMeter, RampShape, StereoSamples, Waveform};
use tempfile::TempDir;

/// Every factory profile produces a configuration the core accepts.
#[test]
fn factory_profiles_build_levelers() {
    for profile in factory_profiles() {
        let config = profile
            .settings
            .to_leveler_config()
            .expect("factory settings should convert");
        assert!(Leveler::new(config).is_ok(), "{}", profile.name);
    }
}

/// A saved profile levels audio to its target.
#[test]
fn profile_file_drives_leveling() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("voice.toml");
    Profile::new("Voice")
        .with_settings(LevelerSettings {
            division: 2,
            loudness: -20.0,
            maxgain: 10.0,
            crossfade: 0.3,
            ramp: Ramp::Linear,
            ..LevelerSettings::default()
        })
        .save(&path)
        .unwrap();

    let profile = find_profile(path.to_str().unwrap()).unwrap();
    let config = profile.settings.to_leveler_config().unwrap();
    assert_eq!(config.ramp, RampShape::Linear);

    let sr = 48000;
    let tone: Vec<f32> = (0..sr * 6)
        .map(|i| 0.05 * (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / sr as f32).sin())
        .collect();
    let input = Waveform::new(StereoSamples::from_mono(tone), sr as u32, 24);

    let leveled = Leveler::new(config).unwrap().run(&input).unwrap();
    let lufs = LoudnessMeter::new(sr as u32)
        .measure_waveform(&leveled.waveform)
        .unwrap();
    assert!((lufs - (-20.0)).abs() < 0.5, "{lufs} LUFS");
}

/// Invalid settings in a profile file surface as validation errors.
#[test]
fn invalid_profile_settings_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    std::fs::write(
        &path,
        "name = \"Bad\"\n[settings]\nloudness = 4.0\ncrossfade = 3.0\n",
    )
    .unwrap();

    let profile = Profile::load(&path).unwrap();
    let err = profile.settings.to_leveler_config().unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
    assert!(err.to_string().contains("loudness"), "got: {err}");
}

/// Malformed TOML is a parse error, not a panic.
#[test]
fn malformed_profile_is_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "name = \n").unwrap();

    assert!(matches!(
        Profile::load(&path),
        Err(ConfigError::TomlParse(_))
    ));
}
