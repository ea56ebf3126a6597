//! Factory profiles bundled with dynlevel.
//!
//! These profiles are always available without external files and cover the
//! common delivery targets.

use crate::Profile;

/// TOML content for factory profiles, embedded at compile time.
static FACTORY_PROFILES_TOML: &[(&str, &str)] = &[
    ("podcast", PODCAST_PROFILE),
    ("broadcast", BROADCAST_PROFILE),
    ("streaming", STREAMING_PROFILE),
    ("gentle", GENTLE_PROFILE),
];

/// Spoken-word podcast delivery.
const PODCAST_PROFILE: &str = r#"
name = "Podcast"
description = "Spoken word at -16 LUFS with moderate per-block correction"

[settings]
division = 8
loudness = -16.0
maxgain = 2.0
crossfade = 0.6
"#;

/// EBU R128 broadcast delivery.
const BROADCAST_PROFILE: &str = r#"
name = "Broadcast"
description = "EBU R128 programme loudness of -23 LUFS"

[settings]
division = 10
loudness = -23.0
maxgain = 3.0
crossfade = 0.6
normalize = true
"#;

/// Music and video streaming platforms.
const STREAMING_PROFILE: &str = r#"
name = "Streaming"
description = "Streaming platforms at -14 LUFS"

[settings]
division = 8
loudness = -14.0
maxgain = 2.0
crossfade = 0.6
normalize = true
"#;

/// Light touch for material that is nearly even already.
const GENTLE_PROFILE: &str = r#"
name = "Gentle"
description = "Long blocks and small gain steps for subtle correction"

[settings]
division = 20
loudness = -16.0
maxgain = 1.0
crossfade = 0.8
shift_phase2 = true
"#;

/// All factory profiles.
///
/// # Example
///
/// ```rust
/// use dynlevel_config::factory_profiles;
///
/// for profile in factory_profiles() {
///     println!("{}: {}", profile.name, profile.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_profiles() -> Vec<Profile> {
    FACTORY_PROFILES_TOML
        .iter()
        .filter_map(|(_, toml)| Profile::from_toml(toml).ok())
        .collect()
}

/// Get a factory profile by identifier or display name (case-insensitive).
pub fn get_factory_profile(name: &str) -> Option<Profile> {
    let name_lower = name.to_lowercase();

    FACTORY_PROFILES_TOML
        .iter()
        .filter_map(|(id, toml)| Some((id, Profile::from_toml(toml).ok()?)))
        .find(|(id, profile)| **id == name_lower || profile.name.to_lowercase() == name_lower)
        .map(|(_, profile)| profile)
}

/// Identifiers of all factory profiles.
pub fn factory_profile_names() -> Vec<&'static str> {
    FACTORY_PROFILES_TOML.iter().map(|(name, _)| *name).collect()
}
