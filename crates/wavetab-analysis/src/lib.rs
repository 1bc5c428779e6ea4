//! Wavetab Analysis - response and comparison tools for wavetab filters and renders
//!
//! - [`freqz`] - Frequency response from coefficients (via `rustfft`)
//! - [`phase`] - Phase unwrapping
//! - [`compare`] - Sample-level buffer comparison, normalization and tail trimming
//!
//! ## Example
//!
//! ```rust
//! use wavetab_analysis::biquad_response;
//! use wavetab_core::BiquadCoefficients;
//!
//! let coefficients = BiquadCoefficients::allpass(44100.0, 1000.0, 0.707).unwrap();
//! let response = biquad_response(&coefficients, 4096, 44100.0);
//!
//! // Allpass: flat magnitude, phase through -π at the center frequency
//! assert!(response.magnitude().iter().all(|m| (m - 1.0).abs() < 1e-9));
//! let crossing = response.phase_crossing(-std::f64::consts::PI).unwrap();
//! assert!((crossing - 1000.0).abs() < 10.0);
//! ```

pub mod compare;
pub mod freqz;
pub mod phase;

pub use compare::{difference, max_abs_diff, normalize, peak, rms, snr_db, trim_tail};
pub use freqz::{
    FrequencyResponse, allpass_snapshot_response, biquad_response, freqz, lerp_response,
};
pub use phase::{unwrap_phase, unwrap_phase_tol};
