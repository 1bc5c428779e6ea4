//! Mathematical helpers shared by the table builder, oscillators and filters.
//!
//! All functions are allocation-free and use `libm` so they work in `no_std`.
//!
//! - [`lerp`] - Linear interpolation
//! - [`sinc`] - Normalized sinc, `sin(πx)/(πx)`
//! - [`cents_to_ratio`] - Detune in cents to a frequency ratio
//! - [`midi_to_freq`] - MIDI note number to Hz (A4 = 440 Hz)
//! - [`hz_to_omega`] - Frequency to angular frequency

use core::f64::consts::{PI, TAU};
use libm::{pow, sin};

/// Linear interpolation between two values.
///
/// Written as `(1 - t)·a + t·b` so `t = 0` and `t = 1` reproduce the
/// endpoints exactly.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (1.0 - t) * a + t * b
}

/// Normalized sinc function: `sin(πx) / (πx)`, with `sinc(0) = 1`.
///
/// # Example
/// ```rust
/// use wavetab_core::math::sinc;
///
/// assert_eq!(sinc(0.0), 1.0);
/// assert!(sinc(1.0).abs() < 1e-12);
/// ```
#[inline]
pub fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        sin(px) / px
    }
}

/// Convert a detune amount in cents to a frequency ratio, `2^(cents/1200)`.
///
/// # Example
/// ```rust
/// use wavetab_core::math::cents_to_ratio;
///
/// assert!((cents_to_ratio(1200.0) - 2.0).abs() < 1e-12);
/// assert_eq!(cents_to_ratio(0.0), 1.0);
/// ```
#[inline]
pub fn cents_to_ratio(cents: f64) -> f64 {
    pow(2.0, cents / 1200.0)
}

/// Convert a MIDI note number to a frequency in Hz (note 69 = A4 = 440 Hz).
#[inline]
pub fn midi_to_freq(note: u8) -> f64 {
    440.0 * pow(2.0, (f64::from(note) - 69.0) / 12.0)
}

/// Convert frequency in Hz to angular frequency in radians per sample.
#[inline]
pub fn hz_to_omega(freq_hz: f64, sample_rate: f64) -> f64 {
    TAU * freq_hz / sample_rate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(0.25, -0.75, 0.0), 0.25);
        assert_eq!(lerp(0.25, -0.75, 1.0), -0.75);
        assert!((lerp(0.0, 1.0, 0.3) - 0.3).abs() < 1e-15);
    }

    #[test]
    fn test_sinc_zeros() {
        for n in 1..8 {
            assert!(sinc(f64::from(n)).abs() < 1e-12, "sinc({n}) should vanish");
        }
        assert!((sinc(0.5) - 2.0 / PI).abs() < 1e-12);
    }

    #[test]
    fn test_cents_to_ratio() {
        assert!((cents_to_ratio(100.0) - 1.059463359).abs() < 1e-8);
        assert!((cents_to_ratio(-1200.0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_midi_to_freq() {
        assert!((midi_to_freq(69) - 440.0).abs() < 1e-9);
        assert!((midi_to_freq(81) - 880.0).abs() < 1e-9);
        // F1, the bass note used throughout the listening tests
        assert!((midi_to_freq(29) - 43.6535).abs() < 1e-3);
    }

    #[test]
    fn test_hz_to_omega() {
        assert!((hz_to_omega(11025.0, 44100.0) - PI / 2.0).abs() < 1e-12);
    }
}
