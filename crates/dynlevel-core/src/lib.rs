//! Dynlevel Core - block-wise loudness leveling for stereo audio
//!
//! This crate measures perceived loudness per time block (ITU-R BS.1770-4)
//! and applies bounded, crossfaded gain corrections so that every block
//! approaches a target loudness.
//!
//! # Core Abstractions
//!
//! ## Measurement
//!
//! - [`LoudnessMeter`] - Gated integrated loudness in LUFS
//! - [`KWeighting`] - The two-stage BS.1770 pre-filter
//!
//! ## Leveling Stages
//!
//! - [`BlockSegmenter`] - Splits a waveform into fixed-duration blocks
//! - [`GainSolver`] - Bounded per-block gain toward the target
//! - [`CrossfadeMixer`] - Applies block gains with smooth transitions
//!
//! ## Pipeline
//!
//! - [`Leveler`] - Two passes of measure, solve and mix, plus optional
//!   output normalization
//! - [`LevelingReport`] - Per-block loudness, saturation and clipping
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible (it needs `alloc`). Disable the default
//! `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! dynlevel-core = { version = "0.1", default-features = false }
//! ```
//!
//! Enable the `tracing` feature for `debug!` events from the pipeline.

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod error;
pub mod leveler;
pub mod math;
pub mod meter;
pub mod mixer;
pub mod segment;
pub mod solver;
pub mod waveform;

pub use biquad::{Biquad, KWeighting};
pub use error::{ConfigurationError, DegenerateInput, LevelError};
pub use leveler::{
    Block, Leveled, Leveler, LevelerConfig, LevelingReport, Phase, PhaseReport, Progress,
};
pub use math::{db_to_linear, linear_to_db, lufs_to_power, peak_dbfs, power_to_lufs};
pub use meter::LoudnessMeter;
pub use mixer::{CrossfadeMixer, MixOutput, RampShape};
pub use segment::{BlockSegmenter, BlockSpan, Segmentation};
pub use solver::{BlockGain, GainCurve, GainSolver};
pub use waveform::{StereoSamples, Waveform};
