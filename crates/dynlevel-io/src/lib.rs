//! WAV file I/O for dynlevel.
//!
//! This crate provides:
//!
//! - **Metadata**: [`read_wav_info`] reads the header without decoding samples
//! - **Stereo I/O**: [`read_wav_stereo`] and [`write_wav_stereo`]
//! - **Waveforms**: [`read_waveform`] and [`write_waveform`] bridge files and
//!   [`dynlevel_core::Waveform`]
//!
//! Only two-channel files are accepted; the leveler works on stereo material.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dynlevel_core::{Leveler, LevelerConfig};
//! use dynlevel_io::{read_waveform, write_waveform};
//!
//! let input = read_waveform("episode.wav")?;
//! let leveled = Leveler::new(LevelerConfig::default())?.run(&input)?;
//! write_waveform("episode_new.wav", &leveled.waveform)?;
//! ```

mod wav;

pub use wav::{
    StereoSamples, WavFormat, WavInfo, WavSpec, read_wav_info, read_wav_stereo, read_waveform,
    write_wav_stereo, write_waveform,
};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The file does not have exactly two channels.
    #[error("Unsupported channel count: {0} (only stereo files can be leveled)")]
    UnsupportedChannels(u16),

    /// The requested bit depth cannot be written.
    #[error("Unsupported bit depth: {0} (expected 16, 24 or 32)")]
    UnsupportedBitDepth(u16),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
