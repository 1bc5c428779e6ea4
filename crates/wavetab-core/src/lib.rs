//! Wavetab Core - band-limited wavetables, detuning oscillators and IIR allpass filters
//!
//! This crate holds the numerical core of the wavetab toolkit. Everything here
//! is a deterministic loop over caller-owned buffers: no I/O, no global state.
//!
//! # Core Abstractions
//!
//! ## Tables
//!
//! - [`WaveTable`] - One normalized, band-limited cycle (sine, triangle, sawtooth, square)
//! - [`SynthConfig`] - Sample rate, table size and damping policy
//! - [`partial_count`] / [`lanczos_sigma`] - Nyquist truncation and Gibbs damping
//!
//! ## Oscillators
//!
//! All three accumulate into the output buffer, so layers mix by rendering in turn:
//!
//! - [`StandardOscillator`] - Detune by recomputing the playback frequency
//! - [`ResamplingOscillator`] - Detune by resampling an undetuned render (offline)
//! - [`RealTimeResamplingOscillator`] - The same resampling, one sample at a time
//!
//! ## Filters
//!
//! - [`Filter`] - Object-safe trait with block processing and carried state
//! - [`Biquad`] - Second-order IIR, with [`BiquadCoefficients::allpass`]
//! - [`ModulatedAllpass`] - First-order allpass with a sine-swept coefficient
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build against `alloc` only:
//!
//! ```toml
//! [dependencies]
//! wavetab-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use wavetab_core::{
//!     Biquad, Filter, Oscillator, OscillatorParams, StandardOscillator, SynthConfig, WaveTable,
//!     WaveType,
//! };
//!
//! let config = SynthConfig::default();
//! let table = Arc::new(WaveTable::build(WaveType::Sawtooth, 43.65, &config)?);
//!
//! // Two layers, one slightly detuned
//! let mut buffer = vec![0.0; 4410];
//! for detune in [0.0, 3.0] {
//!     let params = OscillatorParams::new(43.65).with_detune(detune).with_level(0.5);
//!     StandardOscillator::with_table(Arc::clone(&table), params)?.render(&mut buffer);
//! }
//!
//! let mut allpass = Biquad::allpass(config.sample_rate, 1000.0, 0.707)?;
//! allpass.process_in_place(&mut buffer);
//! # Ok::<(), wavetab_core::Error>(())
//! ```
//!
//! # Features
//!
//! - `std` (default) - Link the standard library
//! - `tracing` - Debug-level events from table and filter construction
//! - `serde` - Serialize [`SynthConfig`], [`WaveType`], [`OscillatorKind`] and [`OscillatorParams`]

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod biquad;
pub mod config;
pub mod error;
pub mod filter;
pub mod math;
pub mod modulated_allpass;
pub mod oscillator;
pub mod wavetable;

pub use biquad::{Biquad, BiquadCoefficients};
pub use config::{DEFAULT_SAMPLE_RATE, DEFAULT_TABLE_SIZE, SynthConfig};
pub use error::{Error, Result};
pub use filter::Filter;
pub use math::{cents_to_ratio, hz_to_omega, lerp, midi_to_freq};
pub use modulated_allpass::ModulatedAllpass;
pub use oscillator::{
    Oscillator, OscillatorKind, OscillatorParams, RealTimeResamplingOscillator,
    MAX_DETUNE_CENTS, ResamplingOscillator, StandardOscillator, build_oscillator, reachable_len,
};
pub use wavetable::{WaveTable, WaveType, build, lanczos_sigma, partial_count};
