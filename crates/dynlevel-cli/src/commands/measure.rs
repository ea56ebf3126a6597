//! Loudness measurement command.

use super::common::{format_lufs, format_time};
use anyhow::Context;
use clap::Args;
use dynlevel_core::{BlockSegmenter, LoudnessMeter, peak_dbfs};
use dynlevel_io::read_waveform;
use std::path::PathBuf;

#[derive(Args)]
pub struct MeasureArgs {
    /// Input WAV file (stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Block length in seconds
    #[arg(short, long, default_value = "8")]
    division: f64,
}

pub fn run(args: MeasureArgs) -> anyhow::Result<()> {
    let waveform = read_waveform(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    waveform.validate()?;

    let segmentation =
        BlockSegmenter::new(args.division)?.segment(waveform.frames(), waveform.sample_rate);
    let meter = LoudnessMeter::new(waveform.sample_rate);
    let sample_rate = f64::from(waveform.sample_rate);

    println!("{}", args.input.display());
    println!(
        "  {} frames, {} Hz, {} bit, {:.2}s",
        waveform.frames(),
        waveform.sample_rate,
        waveform.bit_depth,
        waveform.duration_secs()
    );
    println!(
        "  Integrated: {}",
        format_lufs(meter.measure_waveform(&waveform)).trim()
    );
    let peak = peak_dbfs(&waveform.samples.left).max(peak_dbfs(&waveform.samples.right));
    println!("  Peak:       {peak:.2} dBFS");

    println!("\nBlocks ({} s):", args.division);
    for (span, lufs) in segmentation
        .spans()
        .iter()
        .zip(meter.measure_blocks(&waveform, &segmentation))
    {
        println!(
            "  {:>4}  {:>8} - {:<8} {}",
            span.index,
            format_time(span.start as f64 / sample_rate),
            format_time(span.end as f64 / sample_rate),
            format_lufs(lufs)
        );
    }

    Ok(())
}
