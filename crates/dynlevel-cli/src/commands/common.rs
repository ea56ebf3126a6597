//! Shared CLI helpers used across multiple commands.

use dynlevel_config::{ConfigError, Profile, find_profile};
use std::path::{Path, PathBuf};

/// Load a profile by factory name or TOML path.
pub fn load_profile(name: &str) -> anyhow::Result<Profile> {
    match find_profile(name) {
        Ok(profile) => Ok(profile),
        Err(ConfigError::ProfileNotFound(_)) => anyhow::bail!(
            "Profile '{}' not found. Use 'dynlevel profiles' to see available profiles.",
            name
        ),
        Err(e) => Err(anyhow::anyhow!("{}", e)),
    }
}

/// `<dir>/<stem>_new.wav` next to the input.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    input.with_file_name(format!("{stem}_new.wav"))
}

/// Loudness for display, with a marker for gated-out silence.
pub fn format_lufs(lufs: Option<f64>) -> String {
    match lufs {
        Some(v) => format!("{v:>7.2} LUFS"),
        None => "   silent   ".to_string(),
    }
}

/// `m:ss.s` timestamp.
pub fn format_time(secs: f64) -> String {
    let minutes = (secs / 60.0).floor();
    format!("{}:{:04.1}", minutes as u64, secs - minutes * 60.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_appends_suffix() {
        assert_eq!(
            default_output_path(Path::new("/audio/show.wav")),
            PathBuf::from("/audio/show_new.wav")
        );
        assert_eq!(
            default_output_path(Path::new("take")),
            PathBuf::from("take_new.wav")
        );
    }

    #[test]
    fn lufs_formatting() {
        assert_eq!(format_lufs(Some(-16.0)), " -16.00 LUFS");
        assert!(format_lufs(None).contains("silent"));
    }

    #[test]
    fn time_formatting() {
        assert_eq!(format_time(0.0), "0:00.0");
        assert_eq!(format_time(83.5), "1:23.5");
    }

    #[test]
    fn unknown_profile_hint() {
        let err = load_profile("definitely-not-a-profile").unwrap_err();
        assert!(err.to_string().contains("dynlevel profiles"));
    }
}
