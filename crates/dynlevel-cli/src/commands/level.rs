//! File-based leveling command.

use super::common::{default_output_path, format_lufs, format_time, load_profile};
use anyhow::Context;
use clap::{Args, ValueEnum};
use dynlevel_config::{LevelerSettings, Ramp};
use dynlevel_core::{Leveler, LevelingReport, PhaseReport, Progress};
use dynlevel_io::{WavSpec, read_waveform, write_wav_stereo};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

#[derive(Args)]
pub struct LevelArgs {
    /// Input WAV file (stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file [default: <INPUT>_new.wav]
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Block length in seconds (odd values are rounded up to even)
    #[arg(short, long)]
    division: Option<u32>,

    /// Target loudness in LUFS
    #[arg(short, long, allow_negative_numbers = true)]
    loudness: Option<f64>,

    /// Maximum gain change per block and pass, in dB
    #[arg(short, long)]
    maxgain: Option<f64>,

    /// Skip the second leveling pass
    #[arg(short = 'p', long)]
    nophase2: bool,

    /// Suppress progress and report output
    #[arg(short, long)]
    pub quiet: bool,

    /// Crossfade length as a fraction of a block (0 to 1)
    #[arg(short = 'x', long)]
    crossfade: Option<f64>,

    /// Crossfade ramp shape
    #[arg(long, value_enum)]
    ramp: Option<RampArg>,

    /// Shift the second pass's blocks by half a block
    #[arg(long)]
    shift_phase2: bool,

    /// Normalize the integrated loudness of the result to the target
    #[arg(long)]
    normalize: bool,

    /// Profile name or TOML file to start from
    #[arg(long)]
    profile: Option<String>,

    /// Output bit depth (16, 24, or 32)
    #[arg(long, default_value = "24")]
    bit_depth: u16,
}

#[derive(Clone, Copy, ValueEnum)]
enum RampArg {
    Cosine,
    Linear,
}

impl From<RampArg> for Ramp {
    fn from(ramp: RampArg) -> Self {
        match ramp {
            RampArg::Cosine => Ramp::Cosine,
            RampArg::Linear => Ramp::Linear,
        }
    }
}

impl LevelArgs {
    /// Profile (or default) settings with command-line overrides applied.
    fn settings(&self) -> anyhow::Result<LevelerSettings> {
        let mut settings = match &self.profile {
            Some(name) => load_profile(name)?.settings,
            None => LevelerSettings::default(),
        };

        if let Some(division) = self.division {
            settings.division = division;
        }
        if let Some(loudness) = self.loudness {
            settings.loudness = loudness;
        }
        if let Some(maxgain) = self.maxgain {
            settings.maxgain = maxgain;
        }
        if let Some(crossfade) = self.crossfade {
            settings.crossfade = crossfade;
        }
        if let Some(ramp) = self.ramp {
            settings.ramp = ramp.into();
        }
        settings.nophase2 |= self.nophase2;
        settings.quiet |= self.quiet;
        settings.shift_phase2 |= self.shift_phase2;
        settings.normalize |= self.normalize;

        Ok(settings)
    }
}

pub fn run(args: LevelArgs) -> anyhow::Result<()> {
    let settings = args.settings()?;
    let config = settings.to_leveler_config()?;
    let quiet = settings.quiet;
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));

    if !quiet {
        println!("Reading {}...", args.input.display());
    }
    let input = read_waveform(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    if !quiet {
        println!(
            "  {} frames, {} Hz, {} bit, {:.2}s",
            input.frames(),
            input.sample_rate,
            input.bit_depth,
            input.duration_secs()
        );
        println!("\nSettings:");
        println!("  Division:  {} s", config.division_seconds);
        println!("  Loudness:  {:.1} LUFS", config.target_lufs);
        println!("  Max gain:  {:.1} dB", config.max_gain_db);
        println!(
            "  Crossfade: {:.2} ({})",
            config.crossfade,
            config.ramp.name()
        );
        println!(
            "  Phase 2:   {}",
            match (config.skip_phase2, config.phase2_shift) {
                (true, _) => "off",
                (false, true) => "on, shifted half a block",
                (false, false) => "on",
            }
        );
        if config.normalize_output {
            println!("  Normalize: on");
        }
        println!();
    }

    let leveler = Leveler::new(config)?;

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(0)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("##-"),
    );

    let leveled = leveler.run_with_progress(&input, |progress: Progress| {
        if progress.block == 1 {
            pb.set_length(progress.blocks as u64);
            pb.set_message(format!("Phase {}", progress.phase.number()));
        }
        pb.set_position(progress.block as u64);
    })?;
    pb.finish_and_clear();

    if !quiet {
        print_report(&leveled.report, input.sample_rate);
    }

    let out_spec = WavSpec {
        channels: 2,
        sample_rate: input.sample_rate,
        bits_per_sample: args.bit_depth,
    };
    if !quiet {
        println!("\nWriting {}...", output_path.display());
    }
    write_wav_stereo(&output_path, &leveled.waveform.samples, out_spec)
        .with_context(|| format!("failed to write {}", output_path.display()))?;
    if !quiet {
        tracing::info!(
            "leveled {} -> {}",
            args.input.display(),
            output_path.display()
        );
        println!("Done!");
    }

    Ok(())
}

fn print_phase(phase: &PhaseReport, sample_rate: u32) {
    println!("Phase {}:", phase.phase.number());
    for block in &phase.blocks {
        let start = block.span.start as f64 / f64::from(sample_rate);
        let end = block.span.end as f64 / f64::from(sample_rate);
        println!(
            "  {:>4}  {:>8} - {:<8} {}  {:+6.2} dB{}",
            block.span.index,
            format_time(start),
            format_time(end),
            format_lufs(block.loudness),
            block.gain.gain_db,
            if block.gain.saturated {
                "  (saturated)"
            } else {
                ""
            }
        );
    }
    println!(
        "  {} block(s) saturated, {} silent, {} sample(s) clipped",
        phase.saturated_blocks().len(),
        phase.silent_blocks(),
        phase.clipped_samples
    );
}

fn print_report(report: &LevelingReport, sample_rate: u32) {
    for phase in report.phases() {
        print_phase(phase, sample_rate);
    }

    println!("\nResult:");
    if let Some(gain_db) = report.normalization_gain_db {
        println!(
            "  Normalization: {:+.2} dB ({} sample(s) clipped)",
            gain_db, report.normalization_clipped
        );
    }
    println!("  Loudness: {}", format_lufs(report.output_loudness).trim());
    println!("  Peak:     {:.2} dBFS", report.peak_dbfs);
    println!("  Clipped:  {} sample(s)", report.clipped_samples());
}
