//! Integration tests for dynlevel-io WAV I/O.

use dynlevel_core::{Leveler, LevelerConfig, LoudnessMeter, Waveform};
use dynlevel_io::{
    Error, StereoSamples, WavFormat, WavSpec, read_wav_info, read_wav_stereo, read_waveform,
    write_wav_stereo, write_waveform,
};
use tempfile::NamedTempFile;

/// Generate a sine wave at the given sample rate.
fn sine_wave(sample_rate: u32, freq_hz: f32, amplitude: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|i| {
            amplitude * (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// WAV roundtrip tests
// ---------------------------------------------------------------------------

#[test]
fn wav_roundtrip_across_rates_and_depths() {
    for sr in [44100, 48000, 96000] {
        for (bits, tolerance) in [(16, 1e-4), (24, 1e-6), (32, 0.0)] {
            let left = sine_wave(sr, 440.0, 0.8, sr as usize / 10);
            let right = sine_wave(sr, 660.0, 0.5, sr as usize / 10);
            let samples = StereoSamples::new(left, right);
            let spec = WavSpec {
                channels: 2,
                sample_rate: sr,
                bits_per_sample: bits,
            };

            let file = NamedTempFile::new().unwrap();
            write_wav_stereo(file.path(), &samples, spec).unwrap();

            let (loaded, loaded_spec) = read_wav_stereo(file.path()).unwrap();
            assert_eq!(loaded_spec, spec);
            assert_eq!(loaded.len(), samples.len());
            for (a, b) in samples.left.iter().zip(loaded.left.iter()) {
                assert!(
                    (a - b).abs() <= tolerance,
                    "{sr} Hz / {bits} bit: {a} vs {b}"
                );
            }
        }
    }
}

#[test]
fn wav_info_reports_format() {
    let file = NamedTempFile::new().unwrap();
    let spec = WavSpec {
        channels: 2,
        sample_rate: 44100,
        bits_per_sample: 32,
    };
    write_wav_stereo(file.path(), &StereoSamples::silence(44100 * 2), spec).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.sample_rate, 44100);
    assert_eq!(info.bits_per_sample, 32);
    assert_eq!(info.format, WavFormat::IeeeFloat);
    assert_eq!(info.num_frames, 88200);
    assert!((info.duration_secs - 2.0).abs() < 1e-9);
}

#[test]
fn missing_file_is_an_error() {
    let err = read_waveform("/nonexistent/path/input.wav").unwrap_err();
    assert!(matches!(err, Error::Wav(_) | Error::Io(_)), "{err}");
}

#[test]
fn multichannel_file_rejected() {
    let file = NamedTempFile::new().unwrap();
    let spec = hound::WavSpec {
        channels: 4,
        sample_rate: 48000,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(file.path(), spec).unwrap();
    for _ in 0..400 {
        writer.write_sample(0.0_f32).unwrap();
    }
    writer.finalize().unwrap();

    let err = read_waveform(file.path()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedChannels(4)));
    assert!(err.to_string().contains("stereo"));
}

// ---------------------------------------------------------------------------
// File-level leveling
// ---------------------------------------------------------------------------

#[test]
fn level_file_roundtrip() {
    let sr = 48000;
    let tone = sine_wave(sr, 1000.0, 0.05, sr as usize * 6);
    let input = Waveform::new(StereoSamples::from_mono(tone), sr, 24);

    let in_file = NamedTempFile::new().unwrap();
    write_waveform(in_file.path(), &input).unwrap();
    let loaded = read_waveform(in_file.path()).unwrap();
    assert_eq!(loaded.frames(), input.frames());

    let config = LevelerConfig {
        division_seconds: 2.0,
        target_lufs: -20.0,
        max_gain_db: 10.0,
        ..LevelerConfig::default()
    };
    let leveled = Leveler::new(config).unwrap().run(&loaded).unwrap();

    let out_file = NamedTempFile::new().unwrap();
    write_waveform(out_file.path(), &leveled.waveform).unwrap();
    let reread = read_waveform(out_file.path()).unwrap();

    let lufs = LoudnessMeter::new(sr).measure_waveform(&reread).unwrap();
    assert!((lufs - (-20.0)).abs() < 0.5, "{lufs} LUFS");
    assert_eq!(reread.bit_depth, 24);
}
