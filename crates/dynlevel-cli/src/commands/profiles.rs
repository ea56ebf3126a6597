//! Profile listing command.

use dynlevel_config::{factory_profile_names, get_factory_profile};

pub fn run() -> anyhow::Result<()> {
    println!("Factory profiles:\n");

    for id in factory_profile_names() {
        let Some(profile) = get_factory_profile(id) else {
            continue;
        };
        let s = &profile.settings;
        println!(
            "  {:<10} {}",
            id,
            profile.description.as_deref().unwrap_or("")
        );
        println!(
            "  {:<10} loudness {} LUFS, division {} s, maxgain {} dB, crossfade {}{}{}",
            "",
            s.loudness,
            s.division,
            s.maxgain,
            s.crossfade,
            if s.shift_phase2 { ", shifted phase 2" } else { "" },
            if s.normalize { ", normalized" } else { "" }
        );
    }

    println!("\nUse with: dynlevel level INPUT --profile <NAME|PATH>");
    Ok(())
}
