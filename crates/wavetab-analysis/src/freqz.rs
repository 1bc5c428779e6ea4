//! Frequency response of digital filters from their coefficients.
//!
//! [`freqz`] evaluates `H(e^jw) = B(e^jw) / A(e^jw)` on an evenly spaced grid
//! over `[0, fs/2)` by zero-padding both coefficient vectors to `2·n` and
//! taking their FFTs, the same grid `scipy.signal.freqz` uses.

use rustfft::{FftPlanner, num_complex::Complex};
use wavetab_core::{BiquadCoefficients, ModulatedAllpass};

use crate::phase::unwrap_phase;

/// Complex response of a filter sampled on a frequency grid.
#[derive(Debug, Clone)]
pub struct FrequencyResponse {
    /// Grid frequencies in Hz, `k · fs / 2n`
    pub frequencies: Vec<f64>,
    /// `H` at each grid frequency
    pub response: Vec<Complex<f64>>,
}

impl FrequencyResponse {
    /// Number of grid points.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// True when the grid is empty.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// `|H|` at each grid point.
    pub fn magnitude(&self) -> Vec<f64> {
        self.response.iter().map(|h| h.norm()).collect()
    }

    /// `20·log10|H|`, floored at -200 dB.
    pub fn magnitude_db(&self) -> Vec<f64> {
        self.response
            .iter()
            .map(|h| 20.0 * h.norm().max(1e-10).log10())
            .collect()
    }

    /// Wrapped phase in radians, (-π, π].
    pub fn phase(&self) -> Vec<f64> {
        self.response.iter().map(|h| h.arg()).collect()
    }

    /// Phase with 2π jumps removed, starting from the DC bin.
    pub fn unwrapped_phase(&self) -> Vec<f64> {
        unwrap_phase(&self.phase())
    }

    /// `|H|` at `freq_hz`, linearly interpolated between grid points.
    ///
    /// Frequencies outside the grid clamp to the first or last point.
    pub fn magnitude_at(&self, freq_hz: f64) -> f64 {
        interpolate(&self.frequencies, &self.magnitude(), freq_hz)
    }

    /// Unwrapped phase at `freq_hz`, linearly interpolated between grid points.
    pub fn phase_at(&self, freq_hz: f64) -> f64 {
        interpolate(&self.frequencies, &self.unwrapped_phase(), freq_hz)
    }

    /// First frequency where the unwrapped phase falls to `target` radians.
    ///
    /// Returns `None` if the phase never reaches it on the grid.
    pub fn phase_crossing(&self, target: f64) -> Option<f64> {
        let phase = self.unwrapped_phase();
        phase.windows(2).enumerate().find_map(|(i, w)| {
            let (p0, p1) = (w[0], w[1]);
            if (p0 - target) * (p1 - target) <= 0.0 && p0 != p1 {
                let t = (target - p0) / (p1 - p0);
                let (f0, f1) = (self.frequencies[i], self.frequencies[i + 1]);
                Some(f0 + t * (f1 - f0))
            } else {
                None
            }
        })
    }
}

fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    match xs.len() {
        0 => 0.0,
        1 => ys[0],
        n => {
            if x <= xs[0] {
                return ys[0];
            }
            if x >= xs[n - 1] {
                return ys[n - 1];
            }
            let i = xs.partition_point(|&f| f <= x) - 1;
            let t = (x - xs[i]) / (xs[i + 1] - xs[i]);
            ys[i] + t * (ys[i + 1] - ys[i])
        }
    }
}

/// Evaluate the response of `b / a` on `num_points` frequencies in `[0, fs/2)`.
///
/// An empty `a` is treated as `[1.0]` (FIR).
///
/// # Arguments
/// * `b` - Numerator (feedforward) coefficients
/// * `a` - Denominator (feedback) coefficients
/// * `num_points` - Grid size
/// * `sample_rate` - Sample rate in Hz, used to label the grid
///
/// # Example
///
/// ```rust
/// use wavetab_analysis::freqz;
///
/// // Two-point average: unity at DC, a null at Nyquist
/// let response = freqz(&[0.5, 0.5], &[1.0], 512, 44100.0);
/// assert!((response.magnitude()[0] - 1.0).abs() < 1e-12);
/// assert!(response.magnitude_at(22000.0) < 0.01);
/// ```
pub fn freqz(b: &[f64], a: &[f64], num_points: usize, sample_rate: f64) -> FrequencyResponse {
    if num_points == 0 {
        return FrequencyResponse {
            frequencies: Vec::new(),
            response: Vec::new(),
        };
    }
    let a: &[f64] = if a.is_empty() { &[1.0] } else { a };

    // Grid of 2n points; longer coefficient sets get a proportionally finer FFT
    let mut size = 2 * num_points;
    while size < b.len().max(a.len()) {
        size += 2 * num_points;
    }
    let step = size / (2 * num_points);

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(size);
    let spectrum = |coeffs: &[f64]| {
        let mut buffer: Vec<Complex<f64>> = coeffs.iter().map(|&c| Complex::new(c, 0.0)).collect();
        buffer.resize(size, Complex::new(0.0, 0.0));
        fft.process(&mut buffer);
        buffer
    };
    let num = spectrum(b);
    let den = spectrum(a);

    let frequencies = (0..num_points)
        .map(|k| k as f64 * sample_rate / (2.0 * num_points as f64))
        .collect();
    let response = (0..num_points)
        .map(|k| num[k * step] / den[k * step])
        .collect();

    FrequencyResponse {
        frequencies,
        response,
    }
}

/// Response of a biquad coefficient set.
pub fn biquad_response(
    coefficients: &BiquadCoefficients,
    num_points: usize,
    sample_rate: f64,
) -> FrequencyResponse {
    freqz(&coefficients.b(), &coefficients.a(), num_points, sample_rate)
}

/// Response of a modulated allpass frozen at its current coefficient.
pub fn allpass_snapshot_response(filter: &ModulatedAllpass, num_points: usize) -> FrequencyResponse {
    let (b, a) = filter.coefficients();
    freqz(&b, &a, num_points, filter.sample_rate())
}

/// Response of the two-tap linear-interpolation filter `[1 - α, α]`.
///
/// Reading a buffer at a fixed fractional offset `α` with linear
/// interpolation applies exactly this filter, which is why resampling-based
/// detune dulls the upper harmonics.
pub fn lerp_response(alpha: f64, num_points: usize, sample_rate: f64) -> FrequencyResponse {
    freqz(&[1.0 - alpha, alpha], &[1.0], num_points, sample_rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_grid() {
        let response = freqz(&[1.0], &[1.0], 4, 8000.0);
        assert_eq!(response.frequencies, vec![0.0, 1000.0, 2000.0, 3000.0]);
        assert!(response.magnitude().iter().all(|&m| (m - 1.0).abs() < 1e-12));
    }

    #[test]
    fn test_pure_delay_phase() {
        // z^-1: phase -w
        let response = freqz(&[0.0, 1.0], &[], 64, 2.0 * PI);
        let unwrapped = response.unwrapped_phase();
        for (f, p) in response.frequencies.iter().zip(&unwrapped) {
            assert!((p + f).abs() < 1e-9, "phase {p} at w={f}");
        }
    }

    #[test]
    fn test_lerp_response_half_sample() {
        let response = lerp_response(0.5, 1024, 44100.0);
        assert!((response.magnitude_at(0.0) - 1.0).abs() < 1e-12);
        // Linear phase, half a sample of delay: -π/4 at fs/4
        assert!((response.phase_at(11025.0) + PI / 4.0).abs() < 1e-9);
        // cos(w/2) roll-off
        assert!((response.magnitude_at(11025.0) - (PI / 4.0).cos()).abs() < 1e-9);
    }

    #[test]
    fn test_lerp_endpoints_are_flat() {
        for alpha in [0.0, 1.0] {
            let response = lerp_response(alpha, 256, 44100.0);
            assert!(response.magnitude().iter().all(|&m| (m - 1.0).abs() < 1e-12));
        }
    }

    #[test]
    fn test_empty_grid() {
        assert!(freqz(&[1.0], &[1.0], 0, 44100.0).is_empty());
    }

    #[test]
    fn test_long_numerator_uses_finer_fft() {
        let b = vec![0.1; 40];
        let response = freqz(&b, &[1.0], 8, 16.0);
        assert_eq!(response.len(), 8);
        assert!((response.magnitude()[0] - 4.0).abs() < 1e-12);
    }
}
