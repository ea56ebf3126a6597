//! Property-based tests for dynlevel-core.
//!
//! Tests segmentation coverage, gain bounds, crossfade envelope limits and
//! meter stability using proptest for randomized input generation.

use dynlevel_core::{
    BlockSegmenter, CrossfadeMixer, GainSolver, LoudnessMeter, RampShape, StereoSamples, Waveform,
    db_to_linear,
};
use proptest::prelude::*;

fn ramp(variant: usize) -> RampShape {
    if variant % 2 == 0 {
        RampShape::Cosine
    } else {
        RampShape::Linear
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Blocks are contiguous, cover every frame exactly once, and are at
    /// least one nominal block long unless the waveform is shorter than that.
    #[test]
    fn segmentation_covers_waveform(
        frames in 1usize..200_000,
        division in 0.01f64..10.0,
        sample_rate in prop::sample::select(vec![8000u32, 22050, 44100, 48000, 96000]),
    ) {
        let seg = BlockSegmenter::new(division).unwrap().segment(frames, sample_rate);
        let block_len = seg.block_len();

        prop_assert!(!seg.is_empty());
        let mut next = 0;
        for (i, span) in seg.spans().iter().enumerate() {
            prop_assert_eq!(span.index, i);
            prop_assert_eq!(span.start, next);
            prop_assert!(span.len() >= block_len.min(frames));
            prop_assert!(span.len() < 2 * block_len || seg.len() == 1);
            next = span.end;
        }
        prop_assert_eq!(next, frames);
    }

    /// Shifted segmentations also tile the waveform.
    #[test]
    fn shifted_segmentation_covers_waveform(
        frames in 1usize..50_000,
        block_len in 1usize..5000,
        offset in 0usize..5000,
    ) {
        let segmenter = BlockSegmenter::new(block_len as f64 / 1000.0).unwrap();
        let seg = segmenter.segment_shifted(frames, 1000, offset);

        let mut next = 0;
        for span in seg.spans() {
            prop_assert_eq!(span.start, next);
            prop_assert!(!span.is_empty());
            next = span.end;
        }
        prop_assert_eq!(next, frames);
    }

    /// Every solved gain lies within the configured bound.
    #[test]
    fn gains_respect_bound(
        target in -40.0f64..-5.0,
        max_gain in 0.0f64..24.0,
        measured in prop::collection::vec(prop::option::of(-90.0f64..10.0), 1..64),
    ) {
        let curve = GainSolver::new(target, max_gain).unwrap().solve(&measured);
        let lo = db_to_linear(-max_gain);
        let hi = db_to_linear(max_gain);

        prop_assert_eq!(curve.len(), measured.len());
        for (gain, lufs) in curve.gains().iter().zip(&measured) {
            prop_assert!(gain.gain_db.abs() <= max_gain);
            prop_assert!(gain.gain >= lo * (1.0 - 1e-12) && gain.gain <= hi * (1.0 + 1e-12));
            if lufs.is_none() {
                prop_assert_eq!(gain.gain, 1.0);
            }
        }
    }

    /// The envelope has one gain per frame and never leaves the range of
    /// the block gains.
    #[test]
    fn envelope_within_gain_range(
        frames in 1usize..20_000,
        fraction in 0.0f64..=1.0,
        variant in 0usize..2,
        measured in prop::collection::vec(-40.0f64..-5.0, 20),
    ) {
        let seg = BlockSegmenter::new(1.0).unwrap().segment(frames, 1000);
        let loudness: Vec<Option<f64>> = measured.iter().take(seg.len()).copied().map(Some).collect();
        let curve = GainSolver::new(-20.0, 12.0).unwrap().solve(&loudness);
        let mixer = CrossfadeMixer::new(fraction, ramp(variant)).unwrap();

        let envelope = mixer.gain_envelope(&seg, &curve);
        let lo = curve.gains().iter().map(|g| g.gain).fold(f64::INFINITY, f64::min);
        let hi = curve.gains().iter().map(|g| g.gain).fold(0.0, f64::max);

        prop_assert_eq!(envelope.len(), frames);
        for &g in &envelope {
            prop_assert!(g >= lo - 1e-9 && g <= hi + 1e-9, "{} outside [{}, {}]", g, lo, hi);
        }
    }

    /// Applying gains never produces samples outside [-1, 1].
    #[test]
    fn output_is_limited(
        input in prop::collection::vec(-1.0f32..=1.0, 2..4000),
        gain_db in -24.0f64..24.0,
    ) {
        let waveform = Waveform::new(StereoSamples::from_mono(input), 1000, 24);
        let seg = BlockSegmenter::new(0.5).unwrap().segment(waveform.frames(), 1000);
        let loudness = vec![Some(-20.0 - gain_db); seg.len()];
        let curve = GainSolver::new(-20.0, 24.0).unwrap().solve(&loudness);
        let out = CrossfadeMixer::new(0.3, RampShape::Cosine)
            .unwrap()
            .apply(&waveform, &seg, &curve);

        prop_assert_eq!(out.waveform.frames(), waveform.frames());
        prop_assert!(out.waveform.samples.peak() <= 1.0);
    }

    /// Ramp weights stay in [0, 1] and never increase.
    #[test]
    fn ramp_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0, variant in 0usize..2) {
        let shape = ramp(variant);
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let (w_lo, w_hi) = (shape.weight(lo), shape.weight(hi));
        prop_assert!((0.0..=1.0).contains(&w_lo));
        prop_assert!(w_hi <= w_lo + 1e-15);
    }

    /// The meter returns a finite loudness or `None` for any bounded input.
    #[test]
    fn meter_is_finite(
        input in prop::collection::vec(-1.0f32..=1.0, 0..20_000),
    ) {
        let meter = LoudnessMeter::new(48000);
        if let Some(lufs) = meter.measure(&input, &input) {
            prop_assert!(lufs.is_finite());
            prop_assert!(lufs < 10.0);
        }
    }
}
