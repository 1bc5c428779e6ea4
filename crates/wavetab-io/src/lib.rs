//! File output for the wavetab synth.
//!
//! This crate provides:
//!
//! - **WAV file I/O**: [`write_wav`] writes mono 32-bit integer files,
//!   [`read_wav`] loads them back (integer or float)
//! - **Raw PCM**: [`write_pcm`] and [`read_pcm`] for headerless little-endian
//!   `i32` sample dumps
//! - **Mipmaps**: [`Mipmap`] builds one band-limited table per MIDI note for
//!   every wave type and exports the series as raw PCM
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use wavetab_core::{Oscillator, StandardOscillator, OscillatorParams, SynthConfig, WaveType};
//! use wavetab_io::write_wav;
//!
//! let config = SynthConfig::default();
//! let mut osc = StandardOscillator::new(WaveType::Sawtooth, OscillatorParams::new(43.65), &config)?;
//! let mut buffer = vec![0.0; 4 * 44100];
//! osc.render(&mut buffer);
//! write_wav("saw.wav", &buffer, 44100)?;
//! ```

mod mipmap;
mod pcm;
mod wav;

pub use mipmap::{MIDI_NOTE_COUNT, Mipmap, MipmapLayout};
pub use pcm::{PCM_SCALE, decode_pcm, encode_pcm, read_pcm, write_pcm};
pub use wav::{WavFormat, WavInfo, WavSpec, read_wav, read_wav_info, write_wav, write_wav_spec};

/// Error types for file I/O.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// The requested sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// A raw PCM file whose length is not a whole number of samples.
    #[error("PCM data length {0} is not a multiple of 4 bytes")]
    MisalignedPcm(usize),

    /// Table synthesis failed.
    #[error("Synthesis error: {0}")]
    Core(#[from] wavetab_core::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for file I/O.
pub type Result<T> = std::result::Result<T, Error>;
