//! Two-phase leveling pipeline.
//!
//! Phase 1 measures every block of the input, solves a bounded gain per block
//! and applies it with crossfades. Phase 2 repeats the same steps on the
//! phase-1 output to tighten blocks the first pass could not fully correct.
//! An optional final pass normalizes the integrated loudness of the result.

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

use crate::error::{ConfigurationError, DegenerateInput, LevelError};
use crate::math::{db_to_linear, peak_dbfs};
use crate::meter::LoudnessMeter;
use crate::mixer::{CrossfadeMixer, MixOutput, RampShape};
use crate::segment::{BlockSegmenter, BlockSpan, Segmentation};
use crate::solver::{BlockGain, GainCurve, GainSolver};
use crate::waveform::Waveform;

/// Parameters of a leveling run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelerConfig {
    /// Block length in seconds.
    pub division_seconds: f64,
    /// Target loudness in LUFS.
    pub target_lufs: f64,
    /// Per-block gain bound in dB, applied to each phase separately.
    pub max_gain_db: f64,
    /// Transition length as a fraction of a block, in `[0, 1]`.
    pub crossfade: f64,
    /// Shape of the crossfade ramp.
    pub ramp: RampShape,
    /// Run phase 1 only.
    pub skip_phase2: bool,
    /// Shift the phase-2 block grid by half a block.
    pub phase2_shift: bool,
    /// Scale the result so its integrated loudness equals the target.
    pub normalize_output: bool,
    /// Suppress diagnostic events.
    pub quiet: bool,
}

impl Default for LevelerConfig {
    fn default() -> Self {
        Self {
            division_seconds: 8.0,
            target_lufs: -16.0,
            max_gain_db: 2.0,
            crossfade: 0.6,
            ramp: RampShape::Cosine,
            skip_phase2: false,
            phase2_shift: false,
            normalize_output: false,
            quiet: false,
        }
    }
}

/// Leveling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Correction of the input.
    First,
    /// Correction of the phase-1 output.
    Second,
}

impl Phase {
    /// 1-based pass number.
    pub fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
        }
    }
}

/// Emitted after each block measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Pass being measured.
    pub phase: Phase,
    /// Blocks measured so far in this pass (1-based).
    pub block: usize,
    /// Blocks in this pass.
    pub blocks: usize,
}

/// Diagnostics for one block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    /// Frame range of the block.
    pub span: BlockSpan,
    /// Measured loudness before this pass's gain, `None` when gated out.
    pub loudness: Option<f64>,
    /// Gain solved for the block.
    pub gain: BlockGain,
}

/// What happened during one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseReport {
    /// Which pass.
    pub phase: Phase,
    /// Nominal block length in frames.
    pub block_len: usize,
    /// Per-block diagnostics in order.
    pub blocks: Vec<Block>,
    /// Channel samples limited while applying this pass.
    pub clipped_samples: usize,
}

impl PhaseReport {
    /// Measured loudness per block.
    pub fn loudness(&self) -> Vec<Option<f64>> {
        self.blocks.iter().map(|b| b.loudness).collect()
    }

    /// Indices of blocks whose gain hit the bound.
    pub fn saturated_blocks(&self) -> Vec<usize> {
        self.blocks
            .iter()
            .filter(|b| b.gain.saturated)
            .map(|b| b.span.index)
            .collect()
    }

    /// Number of blocks with no defined loudness.
    pub fn silent_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.loudness.is_none()).count()
    }
}

/// Summary of a leveling run.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelingReport {
    /// First pass.
    pub phase1: PhaseReport,
    /// Second pass, unless skipped.
    pub phase2: Option<PhaseReport>,
    /// Uniform gain applied by output normalization, in dB.
    pub normalization_gain_db: Option<f64>,
    /// Channel samples limited by output normalization.
    pub normalization_clipped: usize,
    /// Integrated loudness of the result.
    pub output_loudness: Option<f64>,
    /// Sample peak of the result in dBFS.
    pub peak_dbfs: f64,
}

impl LevelingReport {
    /// Reports of the passes that ran, in order.
    pub fn phases(&self) -> impl Iterator<Item = &PhaseReport> {
        core::iter::once(&self.phase1).chain(self.phase2.as_ref())
    }

    /// Channel samples limited over the whole run.
    pub fn clipped_samples(&self) -> usize {
        self.phases().map(|p| p.clipped_samples).sum::<usize>() + self.normalization_clipped
    }

    /// Blocks saturated in any pass.
    pub fn saturated_count(&self) -> usize {
        self.phases().map(|p| p.saturated_blocks().len()).sum()
    }
}

/// A leveled waveform and its report.
#[derive(Debug, Clone, PartialEq)]
pub struct Leveled {
    /// The output audio.
    pub waveform: Waveform,
    /// What was done to it.
    pub report: LevelingReport,
}

/// Block-wise loudness leveler.
///
/// ## Example
///
/// ```rust
/// use dynlevel_core::{Leveler, LevelerConfig, StereoSamples, Waveform};
///
/// let frames = 48000 * 4;
/// let tone: Vec<f32> = (0..frames)
///     .map(|i| 0.05 * (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 48000.0).sin())
///     .collect();
/// let input = Waveform::new(StereoSamples::from_mono(tone), 48000, 24);
///
/// let config = LevelerConfig {
///     division_seconds: 1.0,
///     target_lufs: -23.0,
///     max_gain_db: 12.0,
///     ..LevelerConfig::default()
/// };
/// let leveled = Leveler::new(config).unwrap().run(&input).unwrap();
///
/// assert_eq!(leveled.waveform.frames(), frames);
/// assert!((leveled.report.output_loudness.unwrap() - (-23.0)).abs() < 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct Leveler {
    config: LevelerConfig,
    segmenter: BlockSegmenter,
    solver: GainSolver,
    mixer: CrossfadeMixer,
}

impl Leveler {
    /// Validate `config` and build the pipeline.
    pub fn new(config: LevelerConfig) -> Result<Self, ConfigurationError> {
        Ok(Self {
            segmenter: BlockSegmenter::new(config.division_seconds)?,
            solver: GainSolver::new(config.target_lufs, config.max_gain_db)?,
            mixer: CrossfadeMixer::new(config.crossfade, config.ramp)?,
            config,
        })
    }

    /// The configuration in use.
    pub fn config(&self) -> &LevelerConfig {
        &self.config
    }

    /// Level `waveform`.
    pub fn run(&self, waveform: &Waveform) -> Result<Leveled, LevelError> {
        self.run_with_progress(waveform, |_| {})
    }

    /// Level `waveform`, reporting each measured block to `progress`.
    pub fn run_with_progress(
        &self,
        waveform: &Waveform,
        mut progress: impl FnMut(Progress),
    ) -> Result<Leveled, LevelError> {
        waveform.validate()?;
        let frames = waveform.frames();
        if frames == 0 {
            return Err(DegenerateInput::Empty.into());
        }

        let sample_rate = waveform.sample_rate;
        let meter = LoudnessMeter::new(sample_rate);

        let segmentation = self.segmenter.segment(frames, sample_rate);
        let loudness = measure_blocks(&meter, waveform, &segmentation, Phase::First, &mut progress);
        if loudness.iter().all(Option::is_none) {
            return Err(DegenerateInput::Silent {
                blocks: loudness.len(),
            }
            .into());
        }
        let (phase1, mut current) = self.correct(Phase::First, waveform, &segmentation, &loudness);

        let phase2 = if self.config.skip_phase2 {
            None
        } else {
            let segmentation = if self.config.phase2_shift {
                let offset = segmentation.block_len() / 2;
                self.segmenter.segment_shifted(frames, sample_rate, offset)
            } else {
                segmentation
            };
            let loudness =
                measure_blocks(&meter, &current, &segmentation, Phase::Second, &mut progress);
            let (report, output) = self.correct(Phase::Second, &current, &segmentation, &loudness);
            current = output;
            Some(report)
        };

        let mut output_loudness = meter.measure_waveform(&current);
        let mut normalization_gain_db = None;
        let mut normalization_clipped = 0;
        if self.config.normalize_output {
            if let Some(measured) = output_loudness {
                let gain_db = self.config.target_lufs - measured;
                let MixOutput {
                    waveform,
                    clipped_samples,
                } = CrossfadeMixer::apply_uniform(&current, db_to_linear(gain_db));
                current = waveform;
                normalization_gain_db = Some(gain_db);
                normalization_clipped = clipped_samples;
                output_loudness = meter.measure_waveform(&current);

                #[cfg(feature = "tracing")]
                if !self.config.quiet {
                    tracing::debug!("normalize: {gain_db:+.2} dB, {clipped_samples} clipped");
                }
            }
        }

        let peak = peak_dbfs(&current.samples.left).max(peak_dbfs(&current.samples.right));

        Ok(Leveled {
            waveform: current,
            report: LevelingReport {
                phase1,
                phase2,
                normalization_gain_db,
                normalization_clipped,
                output_loudness,
                peak_dbfs: peak,
            },
        })
    }

    /// Solve and apply gains for one pass.
    fn correct(
        &self,
        phase: Phase,
        waveform: &Waveform,
        segmentation: &Segmentation,
        loudness: &[Option<f64>],
    ) -> (PhaseReport, Waveform) {
        let curve: GainCurve = self.solver.solve(loudness);
        let MixOutput {
            waveform,
            clipped_samples,
        } = self.mixer.apply(waveform, segmentation, &curve);

        let blocks: Vec<Block> = segmentation
            .spans()
            .iter()
            .zip(loudness)
            .zip(curve.gains())
            .map(|((&span, &loudness), &gain)| Block {
                span,
                loudness,
                gain,
            })
            .collect();

        #[cfg(feature = "tracing")]
        if !self.config.quiet {
            tracing::debug!(
                "phase {}: {} blocks, {} saturated, {} clipped",
                phase.number(),
                blocks.len(),
                curve.saturated_blocks().len(),
                clipped_samples
            );
        }

        let report = PhaseReport {
            phase,
            block_len: segmentation.block_len(),
            blocks,
            clipped_samples,
        };
        (report, waveform)
    }
}

fn measure_blocks(
    meter: &LoudnessMeter,
    waveform: &Waveform,
    segmentation: &Segmentation,
    phase: Phase,
    progress: &mut impl FnMut(Progress),
) -> Vec<Option<f64>> {
    let blocks = segmentation.len();
    segmentation
        .spans()
        .iter()
        .map(|span| {
            let (left, right) = waveform.samples.span(span.start, span.end);
            let loudness = meter.measure(left, right);
            progress(Progress {
                phase,
                block: span.index + 1,
                blocks,
            });
            loudness
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::waveform::StereoSamples;

    fn tone(frames: usize, amplitude: f32) -> Waveform {
        let samples: Vec<f32> = (0..frames)
            .map(|i| amplitude * libm::sinf(core::f32::consts::TAU * 1000.0 * i as f32 / 8000.0))
            .collect();
        Waveform::new(StereoSamples::from_mono(samples), 8000, 16)
    }

    fn config() -> LevelerConfig {
        LevelerConfig {
            division_seconds: 1.0,
            target_lufs: -20.0,
            max_gain_db: 6.0,
            crossfade: 0.25,
            ..LevelerConfig::default()
        }
    }

    #[test]
    fn default_config_matches_cli_defaults() {
        let config = LevelerConfig::default();
        assert_eq!(config.division_seconds, 8.0);
        assert_eq!(config.target_lufs, -16.0);
        assert_eq!(config.max_gain_db, 2.0);
        assert_eq!(config.crossfade, 0.6);
        assert_eq!(config.ramp, RampShape::Cosine);
        assert!(Leveler::new(config).is_ok());
    }

    #[test]
    fn invalid_config_rejected() {
        let bad = LevelerConfig {
            crossfade: 2.0,
            ..config()
        };
        assert_eq!(
            Leveler::new(bad).unwrap_err(),
            ConfigurationError::InvalidCrossfade(2.0)
        );
    }

    #[test]
    fn empty_input() {
        let leveler = Leveler::new(config()).unwrap();
        let empty = Waveform::new(StereoSamples::silence(0), 8000, 16);
        assert_eq!(
            leveler.run(&empty).unwrap_err(),
            LevelError::DegenerateInput(DegenerateInput::Empty)
        );
    }

    #[test]
    fn mismatched_channels() {
        let leveler = Leveler::new(config()).unwrap();
        let input = Waveform::new(StereoSamples::new(vec![0.0; 10], vec![0.0; 9]), 8000, 16);
        assert!(matches!(
            leveler.run(&input),
            Err(LevelError::Configuration(ConfigurationError::ChannelMismatch { .. }))
        ));
    }

    #[test]
    fn low_sample_rate_input_is_leveled() {
        let rate = 3000;
        let samples: Vec<f32> = (0..10 * rate as usize)
            .map(|i| 0.1 * libm::sinf(core::f32::consts::TAU * 400.0 * i as f32 / rate as f32))
            .collect();
        let input = Waveform::new(StereoSamples::from_mono(samples), rate, 16);
        let leveler = Leveler::new(LevelerConfig {
            division_seconds: 2.0,
            ..config()
        })
        .unwrap();

        let leveled = leveler.run(&input).unwrap();
        assert_eq!(leveled.report.phase1.blocks.len(), 5);
        assert_eq!(leveled.report.phase1.silent_blocks(), 0);
        let lufs = leveled.report.output_loudness.unwrap();
        assert!((lufs - (-20.0)).abs() < 0.5, "got {lufs}");
    }

    #[test]
    fn all_silent_input() {
        let leveler = Leveler::new(config()).unwrap();
        let silent = Waveform::new(StereoSamples::silence(24000), 8000, 16);
        assert_eq!(
            leveler.run(&silent).unwrap_err(),
            LevelError::DegenerateInput(DegenerateInput::Silent { blocks: 3 })
        );
    }

    #[test]
    fn progress_covers_both_phases() {
        let leveler = Leveler::new(config()).unwrap();
        let mut events = Vec::new();
        leveler
            .run_with_progress(&tone(24000, 0.1), |p| events.push(p))
            .unwrap();

        assert_eq!(events.len(), 6);
        assert_eq!(events[0], Progress { phase: Phase::First, block: 1, blocks: 3 });
        assert_eq!(events[5], Progress { phase: Phase::Second, block: 3, blocks: 3 });
    }

    #[test]
    fn skip_phase2() {
        let leveler = Leveler::new(LevelerConfig {
            skip_phase2: true,
            ..config()
        })
        .unwrap();
        let leveled = leveler.run(&tone(24000, 0.1)).unwrap();
        assert!(leveled.report.phase2.is_none());
        assert_eq!(leveled.report.phases().count(), 1);
    }

    #[test]
    fn shifted_phase2_has_lead_in() {
        let leveler = Leveler::new(LevelerConfig {
            phase2_shift: true,
            ..config()
        })
        .unwrap();
        let leveled = leveler.run(&tone(24000, 0.1)).unwrap();
        let phase2 = leveled.report.phase2.unwrap();
        assert_eq!(phase2.blocks[0].span.end, 4000);
        assert_eq!(phase2.blocks.len(), 3);
    }

    #[test]
    fn normalization_hits_target() {
        let leveler = Leveler::new(LevelerConfig {
            max_gain_db: 1.0,
            normalize_output: true,
            ..config()
        })
        .unwrap();
        let leveled = leveler.run(&tone(24000, 0.01)).unwrap();
        let report = leveled.report;
        assert!(report.normalization_gain_db.unwrap() > 0.0);
        assert!((report.output_loudness.unwrap() - (-20.0)).abs() < 0.01);
    }

    #[test]
    fn input_is_not_modified() {
        let input = tone(16000, 0.05);
        let copy = input.clone();
        let leveled = Leveler::new(config()).unwrap().run(&input).unwrap();
        assert_eq!(input, copy);
        assert_ne!(leveled.waveform, input);
    }
}
