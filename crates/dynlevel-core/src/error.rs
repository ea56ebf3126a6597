//! Error taxonomy for leveling runs.
//!
//! Only two things can stop a run: a configuration that cannot be honoured
//! ([`ConfigurationError`]) and input that has nothing to level
//! ([`DegenerateInput`]). Gain saturation and sample clipping are conditions,
//! not errors, and are reported through [`LevelingReport`](crate::LevelingReport).

/// Invalid leveling parameters or non-stereo input.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// Crossfade fraction outside `[0, 1]` (or not finite).
    InvalidCrossfade(f64),
    /// Block division not strictly positive (or not finite).
    InvalidDivision(f64),
    /// Maximum gain negative or not finite.
    InvalidMaxGain(f64),
    /// Target loudness not finite.
    InvalidTarget(f64),
    /// Sample rate of zero.
    InvalidSampleRate(u32),
    /// Left and right channels differ in length.
    ChannelMismatch {
        /// Frames in the left channel.
        left: usize,
        /// Frames in the right channel.
        right: usize,
    },
}

/// Input that cannot be meaningfully leveled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DegenerateInput {
    /// The waveform holds no samples.
    Empty,
    /// No block produced a defined loudness measurement.
    Silent {
        /// Number of blocks that were measured.
        blocks: usize,
    },
}

/// Errors that can occur during a leveling run.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelError {
    /// The configuration or input format was rejected before processing.
    Configuration(ConfigurationError),
    /// The input has nothing to level.
    DegenerateInput(DegenerateInput),
}

impl From<ConfigurationError> for LevelError {
    fn from(err: ConfigurationError) -> Self {
        Self::Configuration(err)
    }
}

impl From<DegenerateInput> for LevelError {
    fn from(err: DegenerateInput) -> Self {
        Self::DegenerateInput(err)
    }
}

impl core::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidCrossfade(v) => write!(f, "crossfade {v} is outside [0, 1]"),
            Self::InvalidDivision(v) => write!(f, "block division {v} s must be positive"),
            Self::InvalidMaxGain(v) => write!(f, "maximum gain {v} dB must be finite and >= 0"),
            Self::InvalidTarget(v) => write!(f, "target loudness {v} LUFS must be finite"),
            Self::InvalidSampleRate(v) => write!(f, "invalid sample rate {v} Hz"),
            Self::ChannelMismatch { left, right } => write!(
                f,
                "input is not stereo: left has {left} frames, right has {right}"
            ),
        }
    }
}

impl core::fmt::Display for DegenerateInput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Empty => write!(f, "waveform contains no samples"),
            Self::Silent { blocks } => {
                write!(f, "all {blocks} block(s) are silent below the -70 LUFS gate")
            }
        }
    }
}

impl core::fmt::Display for LevelError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Configuration(err) => write!(f, "configuration error: {err}"),
            Self::DegenerateInput(err) => write!(f, "degenerate input: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigurationError {}

#[cfg(feature = "std")]
impl std::error::Error for DegenerateInput {}

#[cfg(feature = "std")]
impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Configuration(err) => Some(err),
            Self::DegenerateInput(err) => Some(err),
        }
    }
}
