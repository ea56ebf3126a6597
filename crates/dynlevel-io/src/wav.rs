//! WAV file reading and writing.

use crate::{Error, Result};
use dynlevel_core::Waveform;
use hound::{SampleFormat, WavReader, WavWriter};
use std::io::Read;
use std::path::Path;

pub use dynlevel_core::StereoSamples;

/// Bit depths accepted for output.
const WRITABLE_BIT_DEPTHS: [u16; 3] = [16, 24, 32];

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len()); // total across all channels
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    let format = match spec.sample_format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    };

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format,
    })
}

/// WAV file specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Number of audio channels.
    pub channels: u16,
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample (16 and 24 are PCM, 32 is float).
    pub bits_per_sample: u16,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 48000,
            bits_per_sample: 24,
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: spec.channels,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: if spec.bits_per_sample == 32 {
                SampleFormat::Float
            } else {
                SampleFormat::Int
            },
        }
    }
}

/// Full-scale value for integer PCM of `bits` bits.
fn pcm_scale(bits: u16) -> f32 {
    (1i64 << (bits - 1)) as f32
}

fn decode_samples<R: Read>(reader: WavReader<R>) -> Result<Vec<f32>> {
    let spec = reader.spec();
    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let max_val = pcm_scale(spec.bits_per_sample);
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

/// Read a stereo WAV file and return its channels along with the spec.
///
/// Integer PCM is scaled by `2^(bits - 1)`; float data is read as-is. Files
/// with any channel count other than two are rejected with
/// [`Error::UnsupportedChannels`].
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav_stereo("input.wav")?;
/// println!("Loaded {} frames at {} Hz", samples.len(), spec.sample_rate);
/// ```
pub fn read_wav_stereo<P: AsRef<Path>>(path: P) -> Result<(StereoSamples, WavSpec)> {
    let reader = WavReader::open(path.as_ref())?;
    let spec = WavSpec::from(reader.spec());
    if spec.channels != 2 {
        return Err(Error::UnsupportedChannels(spec.channels));
    }

    let interleaved = decode_samples(reader)?;
    let stereo = StereoSamples::from_interleaved(&interleaved);

    tracing::debug!(
        "read {}: {} frames, {} Hz, {} bit",
        path.as_ref().display(),
        stereo.len(),
        spec.sample_rate,
        spec.bits_per_sample
    );

    Ok((stereo, spec))
}

/// Write stereo samples to a WAV file.
///
/// 32-bit output is IEEE float; 16 and 24-bit output is integer PCM with
/// samples clamped to the representable range.
///
/// # Example
/// ```ignore
/// let samples = StereoSamples::silence(48000);
/// write_wav_stereo("output.wav", &samples, WavSpec::default())?;
/// ```
pub fn write_wav_stereo<P: AsRef<Path>>(
    path: P,
    samples: &StereoSamples,
    spec: WavSpec,
) -> Result<()> {
    if !WRITABLE_BIT_DEPTHS.contains(&spec.bits_per_sample) {
        return Err(Error::UnsupportedBitDepth(spec.bits_per_sample));
    }

    let mut stereo_spec = spec;
    stereo_spec.channels = 2;

    let hound_spec = hound::WavSpec::from(stereo_spec);
    let mut writer = WavWriter::create(path.as_ref(), hound_spec)?;

    if spec.bits_per_sample == 32 {
        for (l, r) in samples.left.iter().zip(samples.right.iter()) {
            writer.write_sample(*l)?;
            writer.write_sample(*r)?;
        }
    } else {
        let max_val = pcm_scale(spec.bits_per_sample);
        for (l, r) in samples.left.iter().zip(samples.right.iter()) {
            let int_l = (*l * max_val).clamp(-max_val, max_val - 1.0) as i32;
            let int_r = (*r * max_val).clamp(-max_val, max_val - 1.0) as i32;
            writer.write_sample(int_l)?;
            writer.write_sample(int_r)?;
        }
    }

    writer.finalize()?;

    tracing::debug!(
        "wrote {}: {} frames, {} bit",
        path.as_ref().display(),
        samples.len(),
        spec.bits_per_sample
    );
    Ok(())
}

/// Read a stereo WAV file into a [`Waveform`].
pub fn read_waveform<P: AsRef<Path>>(path: P) -> Result<Waveform> {
    let (samples, spec) = read_wav_stereo(path)?;
    Ok(Waveform::new(samples, spec.sample_rate, spec.bits_per_sample))
}

/// Write a [`Waveform`] at its own sample rate and bit depth.
pub fn write_waveform<P: AsRef<Path>>(path: P, waveform: &Waveform) -> Result<()> {
    let spec = WavSpec {
        channels: 2,
        sample_rate: waveform.sample_rate,
        bits_per_sample: waveform.bit_depth,
    };
    write_wav_stereo(path, &waveform.samples, spec)
}
