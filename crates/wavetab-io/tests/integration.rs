//! Integration tests for wavetab-io WAV, PCM and mipmap export.

use std::sync::Arc;

use tempfile::{NamedTempFile, TempDir};
use wavetab_core::{
    Oscillator, OscillatorParams, ResamplingOscillator, StandardOscillator, SynthConfig,
    WaveTable, WaveType, partial_count,
};
use wavetab_io::{
    MIDI_NOTE_COUNT, Mipmap, MipmapLayout, PCM_SCALE, WavFormat, WavSpec, read_pcm, read_wav,
    read_wav_info, write_pcm, write_wav, write_wav_spec,
};

fn render_saw(seconds: f64) -> Vec<f64> {
    let config = SynthConfig::default();
    let table = Arc::new(WaveTable::build(WaveType::Sawtooth, 43.65, &config).unwrap());
    let mut buffer = vec![0.0; (seconds * config.sample_rate) as usize];
    let base = OscillatorParams::new(43.65).with_level(0.5);
    StandardOscillator::with_table(Arc::clone(&table), base)
        .unwrap()
        .render(&mut buffer);
    ResamplingOscillator::with_table(table, base.with_detune(3.0))
        .unwrap()
        .render(&mut buffer);
    buffer
}

// ---------------------------------------------------------------------------
// WAV
// ---------------------------------------------------------------------------

#[test]
fn wav_roundtrip_32_bit_int() {
    let samples = render_saw(0.25);
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &samples, 44100).unwrap();

    let (loaded, spec) = read_wav(file.path()).unwrap();
    assert_eq!(spec, WavSpec::default());
    assert_eq!(loaded.len(), samples.len());
    for (a, b) in samples.iter().zip(&loaded) {
        assert!((a - b).abs() <= 1.0 / PCM_SCALE, "{a} vs {b}");
    }
}

#[test]
fn wav_info_reports_header() {
    let file = NamedTempFile::new().unwrap();
    write_wav(file.path(), &vec![0.0; 22050], 44100).unwrap();

    let info = read_wav_info(file.path()).unwrap();
    assert_eq!(info.channels, 1);
    assert_eq!(info.sample_rate, 44100);
    assert_eq!(info.bits_per_sample, 32);
    assert_eq!(info.num_frames, 22050);
    assert!((info.duration_secs - 0.5).abs() < 1e-12);
    assert_eq!(info.format, WavFormat::Pcm);
}

#[test]
fn wav_float_roundtrip() {
    let samples = vec![0.25, -0.75, 1.5];
    let file = NamedTempFile::new().unwrap();
    let spec = WavSpec {
        sample_rate: 48000,
        bits_per_sample: 32,
        format: WavFormat::IeeeFloat,
    };
    write_wav_spec(file.path(), &samples, spec).unwrap();

    // Float files are not clamped
    let (loaded, loaded_spec) = read_wav(file.path()).unwrap();
    assert_eq!(loaded_spec, spec);
    assert_eq!(loaded, samples);
}

#[test]
fn wav_16_bit_roundtrip() {
    let samples = render_saw(0.05);
    let file = NamedTempFile::new().unwrap();
    let spec = WavSpec {
        bits_per_sample: 16,
        ..WavSpec::default()
    };
    write_wav_spec(file.path(), &samples, spec).unwrap();

    let (loaded, _) = read_wav(file.path()).unwrap();
    for (a, b) in samples.iter().zip(&loaded) {
        assert!((a - b).abs() <= 1.0 / 32767.0);
    }
}

#[test]
fn wav_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(read_wav(dir.path().join("missing.wav")).is_err());
}

// ---------------------------------------------------------------------------
// Raw PCM
// ---------------------------------------------------------------------------

#[test]
fn pcm_roundtrip() {
    let samples = render_saw(0.1);
    let file = NamedTempFile::new().unwrap();
    write_pcm(file.path(), &samples).unwrap();

    assert_eq!(
        std::fs::metadata(file.path()).unwrap().len(),
        4 * samples.len() as u64
    );
    let loaded = read_pcm(file.path()).unwrap();
    assert_eq!(loaded.len(), samples.len());
    for (a, b) in samples.iter().zip(&loaded) {
        assert!((a - b).abs() <= 1.0 / PCM_SCALE);
    }
}

// ---------------------------------------------------------------------------
// Mipmaps
// ---------------------------------------------------------------------------

#[test]
fn mipmap_full_layout_order() {
    let config = SynthConfig::new(44100.0, 256).unwrap();
    let mipmap = Mipmap::build(&config, MipmapLayout::Full).unwrap();
    assert_eq!(mipmap.len(), 4 * MIDI_NOTE_COUNT);

    for (i, table) in mipmap.tables().iter().enumerate() {
        assert_eq!(table.wave(), WaveType::ALL[i / MIDI_NOTE_COUNT]);
        assert_eq!(table.len(), 256);
        assert!((table.peak() - 1.0).abs() < 1e-12);
    }

    // Partials fall as the notes rise
    let saw_low = mipmap.table(WaveType::Sawtooth, 0).unwrap();
    let saw_high = mipmap.table(WaveType::Sawtooth, 127).unwrap();
    assert_eq!(saw_low.num_partials(), 128);
    assert_eq!(saw_high.num_partials(), 1);
    assert_eq!(
        saw_high.num_partials(),
        partial_count(saw_high.frequency(), &config)
    );
}

#[test]
fn mipmap_single_sine_export() {
    let config = SynthConfig::new(44100.0, 256).unwrap();
    let mipmap = Mipmap::build(&config, MipmapLayout::SingleSine).unwrap();
    assert_eq!(mipmap.len(), 1 + 3 * MIDI_NOTE_COUNT);
    assert_eq!(mipmap.tables()[0].wave(), WaveType::Sine);
    assert_eq!(mipmap.tables()[1].wave(), WaveType::Triangle);

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wavetable.data");
    mipmap.write_pcm(&path).unwrap();

    let loaded = read_pcm(&path).unwrap();
    let samples = mipmap.samples();
    assert_eq!(loaded.len(), mipmap.len() * 256);
    assert_eq!(loaded.len(), samples.len());
    for (a, b) in samples.iter().zip(&loaded) {
        assert!((a - b).abs() <= 1.0 / PCM_SCALE);
    }
}

#[test]
fn mipmap_rejects_notes_above_nyquist() {
    // At 16 kHz the top notes sit above the 8 kHz Nyquist
    let config = SynthConfig::new(16000.0, 256).unwrap();
    assert!(Mipmap::build(&config, MipmapLayout::Full).is_err());
}
