//! Property-based tests for wavetab-core.
//!
//! Table normalization and truncation bounds, oscillator streaming and
//! equivalence, and filter block continuity at random split points.

use std::sync::Arc;

use proptest::prelude::*;
use wavetab_core::{
    Biquad, Filter, MAX_DETUNE_CENTS, ModulatedAllpass, Oscillator, OscillatorKind,
    OscillatorParams, RealTimeResamplingOscillator, ResamplingOscillator, StandardOscillator,
    SynthConfig, WaveTable, WaveType, build_oscillator, partial_count, reachable_len,
};

fn wave_strategy() -> impl Strategy<Value = WaveType> {
    prop::sample::select(WaveType::ALL.to_vec())
}

fn small_config() -> SynthConfig {
    SynthConfig::new(44100.0, 1024).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every table peaks at exactly 1.0 after normalization.
    #[test]
    fn table_is_normalized(wave in wave_strategy(), freq in 20.0f64..20000.0) {
        let table = WaveTable::build(wave, freq, &small_config()).unwrap();
        prop_assert!((table.peak() - 1.0).abs() < 1e-12, "peak {}", table.peak());
    }

    /// Partial count never exceeds Nyquist/frequency nor half the table.
    #[test]
    fn partial_count_bounds(freq in 1.0f64..22000.0, log2_size in 4u32..14) {
        let config = SynthConfig::new(44100.0, 1 << log2_size).unwrap();
        let n = partial_count(freq, &config);
        prop_assert!(n <= config.max_partials());
        prop_assert!(n as f64 <= 22050.0 / freq);
        prop_assert!(n >= 1);
        prop_assert!(n == config.max_partials() || (n + 1) as f64 > 22050.0 / freq);
    }

    /// Rendering in two calls continues the waveform exactly.
    #[test]
    fn standard_split_render(split in 0usize..2048, detune in -100.0f64..100.0) {
        let table = Arc::new(WaveTable::build(WaveType::Triangle, 110.0, &small_config()).unwrap());
        let params = OscillatorParams::new(110.0).with_detune(detune);

        let mut whole = vec![0.0; 2048];
        StandardOscillator::with_table(Arc::clone(&table), params).unwrap().render(&mut whole);

        let mut parts = vec![0.0; 2048];
        let mut osc = StandardOscillator::with_table(table, params).unwrap();
        let (a, b) = parts.split_at_mut(split);
        osc.render(a);
        osc.render(b);
        prop_assert_eq!(whole, parts);
    }

    /// The offline and real-time resampling oscillators agree wherever the
    /// offline one produces output.
    #[test]
    fn resampling_variants_agree(
        detune in -200.0f64..200.0,
        freq in 30.0f64..2000.0,
        level in -1.0f64..1.0,
        len in 2usize..4096,
    ) {
        let table = Arc::new(WaveTable::build(WaveType::Sawtooth, freq, &small_config()).unwrap());
        let params = OscillatorParams::new(freq).with_detune(detune).with_level(level);

        let mut offline = vec![0.0; len];
        let mut resampling = ResamplingOscillator::with_table(Arc::clone(&table), params).unwrap();
        resampling.render(&mut offline);

        let mut realtime = vec![0.0; len];
        RealTimeResamplingOscillator::with_table(table, params).unwrap().render(&mut realtime);

        let reachable = reachable_len(len, params.playback_rate());
        prop_assert_eq!(resampling.rendered_len(), reachable);
        for i in 0..reachable {
            prop_assert!((offline[i] - realtime[i]).abs() < 1e-9, "sample {}", i);
        }
    }

    /// A silent oscillator leaves any buffer untouched.
    #[test]
    fn zero_level_leaves_buffer(
        contents in prop::collection::vec(-10.0f64..10.0, 1..512),
        kind in prop::sample::select(OscillatorKind::ALL.to_vec()),
    ) {
        let table = Arc::new(WaveTable::build(WaveType::Square, 220.0, &small_config()).unwrap());
        let params = OscillatorParams::new(220.0).with_detune(5.0).with_level(0.0);
        let mut buffer = contents.clone();
        build_oscillator(kind, table, params).unwrap().render(&mut buffer);
        prop_assert_eq!(buffer, contents);
    }

    /// Any accepted detune renders finite samples, and anything beyond the
    /// bound is rejected up front.
    #[test]
    fn detune_is_finite_or_rejected(
        detune in -1.0e6f64..1.0e6,
        kind in prop::sample::select(OscillatorKind::ALL.to_vec()),
        len in 0usize..64,
    ) {
        let table = Arc::new(WaveTable::build(WaveType::Sawtooth, 440.0, &small_config()).unwrap());
        let params = OscillatorParams::new(440.0).with_detune(detune);
        match build_oscillator(kind, table, params) {
            Ok(mut osc) => {
                prop_assert!(detune.abs() <= MAX_DETUNE_CENTS);
                let mut buffer = vec![0.0; len];
                osc.render(&mut buffer);
                prop_assert!(buffer.iter().all(|s| s.is_finite()));
            }
            Err(_) => prop_assert!(detune.abs() > MAX_DETUNE_CENTS),
        }
    }

    /// Biquad allpass history carries across any block boundary.
    #[test]
    fn biquad_split_continuity(
        split in 0usize..512,
        f0 in 20.0f64..20000.0,
        q in 0.1f64..10.0,
        input in prop::collection::vec(-1.0f64..=1.0, 512),
    ) {
        let mut whole = Biquad::allpass(44100.0, f0, q).unwrap();
        let mut expected = vec![0.0; 512];
        whole.process_block(&input, &mut expected).unwrap();

        let mut parts = Biquad::allpass(44100.0, f0, q).unwrap();
        let mut actual = vec![0.0; 512];
        let (a, b) = actual.split_at_mut(split);
        parts.process_block(&input[..split], a).unwrap();
        parts.process_block(&input[split..], b).unwrap();
        prop_assert_eq!(expected, actual);
    }

    /// The modulated allpass keeps both its history and its modulator phase
    /// across block boundaries, and its output stays finite.
    #[test]
    fn modulated_allpass_split_continuity(
        split in 0usize..512,
        offset in 0.0f64..=1.0,
        amplitude in 0.0f64..=1.0,
        rate in 0.0f64..96000.0,
        input in prop::collection::vec(-1.0f64..=1.0, 512),
    ) {
        let mut whole = ModulatedAllpass::new(44100.0, offset, amplitude, rate).unwrap();
        let mut expected = vec![0.0; 512];
        whole.process_block(&input, &mut expected).unwrap();
        prop_assert!(expected.iter().all(|y| y.is_finite()));

        let mut parts = ModulatedAllpass::new(44100.0, offset, amplitude, rate).unwrap();
        let mut actual = vec![0.0; 512];
        let (a, b) = actual.split_at_mut(split);
        parts.process_block(&input[..split], a).unwrap();
        parts.process_block(&input[split..], b).unwrap();
        prop_assert_eq!(expected, actual);
    }
}
