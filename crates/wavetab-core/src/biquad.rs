//! Biquad (bi-quadratic) filter and its allpass specialization.
//!
//! Coefficient calculation uses the RBJ Audio EQ Cookbook formulas.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use libm::{cos, sin};

use crate::error::{Error, Result, ensure_positive};
use crate::filter::Filter;
use crate::math::hz_to_omega;

/// Raw biquad coefficients `{b0, b1, b2, a0, a1, a2}`.
///
/// `a0` is kept as given; [`Biquad`] divides by it per sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward, current input.
    pub b0: f64,
    /// Feedforward, one sample back.
    pub b1: f64,
    /// Feedforward, two samples back.
    pub b2: f64,
    /// Output normalization.
    pub a0: f64,
    /// Feedback, one sample back.
    pub a1: f64,
    /// Feedback, two samples back.
    pub a2: f64,
}

impl Default for BiquadCoefficients {
    /// Passthrough: `y[n] = x[n]`.
    fn default() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a0: 1.0,
            a1: 0.0,
            a2: 0.0,
        }
    }
}

impl BiquadCoefficients {
    /// Allpass coefficients centered on `frequency`.
    ///
    /// ```text
    /// w0 = 2π·f0/fs,  α = sin(w0) / 2Q
    /// b0 = 1 - α   b1 = -2cos(w0)   b2 = 1 + α
    /// a0 = 1 + α   a1 = -2cos(w0)   a2 = 1 - α
    /// ```
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `frequency` - Center frequency in Hz, where the phase reaches -π
    /// * `q` - Quality factor; higher values make the phase turn sharper
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] unless `0 < frequency < sample_rate / 2`
    /// and `q > 0`, all finite.
    pub fn allpass(sample_rate: f64, frequency: f64, q: f64) -> Result<Self> {
        ensure_positive("sample_rate", sample_rate)?;
        ensure_positive("frequency", frequency)?;
        ensure_positive("q", q)?;
        if frequency >= sample_rate / 2.0 {
            return Err(Error::invalid(
                "frequency",
                alloc::format!(
                    "{frequency} Hz must be below Nyquist ({} Hz)",
                    sample_rate / 2.0
                ),
            ));
        }

        let w0 = hz_to_omega(frequency, sample_rate);
        let cos_w0 = cos(w0);
        let alpha = sin(w0) / (2.0 * q);

        Ok(Self {
            b0: 1.0 - alpha,
            b1: -2.0 * cos_w0,
            b2: 1.0 + alpha,
            a0: 1.0 + alpha,
            a1: -2.0 * cos_w0,
            a2: 1.0 - alpha,
        })
    }

    /// Feedforward taps `[b0, b1, b2]`.
    pub fn b(&self) -> [f64; 3] {
        [self.b0, self.b1, self.b2]
    }

    /// Feedback taps `[a0, a1, a2]`.
    pub fn a(&self) -> [f64; 3] {
        [self.a0, self.a1, self.a2]
    }
}

/// Second-order IIR filter, Direct Form I.
///
/// ```text
/// y[n] = (b0·x[n] + b1·x[n-1] + b2·x[n-2] - a1·y[n-1] - a2·y[n-2]) / a0
/// ```
///
/// The last two inputs and outputs persist across calls; only
/// [`clear`](Self::clear) (or [`Filter::reset`]) zeroes them.
///
/// # Example
///
/// ```rust
/// use wavetab_core::{Biquad, Filter};
///
/// let mut allpass = Biquad::allpass(44100.0, 2000.0, 0.5).unwrap();
///
/// let input: Vec<f64> = (0..64).map(|i| if i == 0 { 1.0 } else { 0.0 }).collect();
/// let mut output = vec![0.0; 64];
/// allpass.process_block(&input, &mut output).unwrap();
///
/// // An allpass impulse response starts at b0/a0
/// let c = allpass.coefficients();
/// assert!((output[0] - c.b0 / c.a0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coefficients: BiquadCoefficients,

    /// Input delay line: x[n-1], x[n-2]
    x1: f64,
    x2: f64,

    /// Output delay line: y[n-1], y[n-2]
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Create a filter with the given coefficients and empty history.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if any coefficient is non-finite or `a0`
    /// is zero.
    pub fn new(coefficients: BiquadCoefficients) -> Result<Self> {
        let mut biquad = Self::default();
        biquad.set_coefficients(coefficients)?;
        Ok(biquad)
    }

    /// Allpass biquad; see [`BiquadCoefficients::allpass`].
    pub fn allpass(sample_rate: f64, frequency: f64, q: f64) -> Result<Self> {
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, frequency, q, "biquad allpass");

        Self::new(BiquadCoefficients::allpass(sample_rate, frequency, q)?)
    }

    /// Replace the coefficients, keeping the delay history.
    pub fn set_coefficients(&mut self, coefficients: BiquadCoefficients) -> Result<()> {
        let all = [
            coefficients.b0,
            coefficients.b1,
            coefficients.b2,
            coefficients.a0,
            coefficients.a1,
            coefficients.a2,
        ];
        if all.iter().any(|c| !c.is_finite()) {
            return Err(Error::invalid("coefficients", "must be finite"));
        }
        if coefficients.a0 == 0.0 {
            return Err(Error::invalid("a0", "must be non-zero"));
        }
        self.coefficients = coefficients;
        Ok(())
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coefficients
    }

    /// Zero the delay lines.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Filter for Biquad {
    #[inline]
    fn process(&mut self, input: f64) -> f64 {
        let c = &self.coefficients;
        let output = (c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2)
            / c.a0;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = output;

        output
    }

    fn reset(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::f64::consts::PI;
    use alloc::vec::Vec;
    use libm::{atan2, sqrt};

    /// Direct evaluation of H(e^jw) = B(e^jw) / A(e^jw).
    fn response(c: &BiquadCoefficients, frequency: f64, sample_rate: f64) -> (f64, f64) {
        let w = hz_to_omega(frequency, sample_rate);
        let eval = |t: [f64; 3]| {
            let re = t[0] + t[1] * cos(w) + t[2] * cos(2.0 * w);
            let im = -t[1] * sin(w) - t[2] * sin(2.0 * w);
            (re, im)
        };
        let (br, bi) = eval(c.b());
        let (ar, ai) = eval(c.a());
        let denom = ar * ar + ai * ai;
        let re = (br * ar + bi * ai) / denom;
        let im = (bi * ar - br * ai) / denom;
        (sqrt(re * re + im * im), atan2(im, re))
    }

    fn noise(len: usize) -> Vec<f64> {
        let mut state = 0x2545_f491_u32;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                f64::from(state) / f64::from(u32::MAX) * 2.0 - 1.0
            })
            .collect()
    }

    #[test]
    fn test_passthrough() {
        let mut biquad = Biquad::default();
        for i in 0..10 {
            let input = f64::from(i) * 0.1;
            assert_eq!(biquad.process(input), input);
        }
    }

    #[test]
    fn test_allpass_coefficients() {
        let c = BiquadCoefficients::allpass(44100.0, 1000.0, 0.707).unwrap();
        let w0 = hz_to_omega(1000.0, 44100.0);
        let alpha = sin(w0) / (2.0 * 0.707);
        assert!((c.b0 - (1.0 - alpha)).abs() < 1e-15);
        assert!((c.b2 - (1.0 + alpha)).abs() < 1e-15);
        assert_eq!(c.b0, c.a2);
        assert_eq!(c.b1, c.a1);
        assert_eq!(c.b2, c.a0);
        assert!((c.a1 + 2.0 * cos(w0)).abs() < 1e-15);
    }

    #[test]
    fn test_allpass_unity_magnitude() {
        for (f0, q) in [(100.0, 0.5), (1000.0, 0.707), (5000.0, 2.0), (15000.0, 10.0)] {
            let c = BiquadCoefficients::allpass(44100.0, f0, q).unwrap();
            let mut f = 10.0;
            while f < 22050.0 {
                let (mag, _) = response(&c, f, 44100.0);
                assert!((mag - 1.0).abs() < 1e-9, "|H({f})| = {mag} for f0={f0}, q={q}");
                f *= 1.3;
            }
        }
    }

    #[test]
    fn test_allpass_phase_crosses_minus_pi_at_center() {
        let c = BiquadCoefficients::allpass(44100.0, 1000.0, 0.707).unwrap();
        // At f0 the response is exactly -1
        let (mag, phase) = response(&c, 1000.0, 44100.0);
        assert!((mag - 1.0).abs() < 1e-9);
        assert!((phase.abs() - PI).abs() < 1e-6, "phase at f0 = {phase}");

        // Below f0 the phase lags by less than π, above by more (wrapped positive)
        let (_, below) = response(&c, 900.0, 44100.0);
        let (_, above) = response(&c, 1100.0, 44100.0);
        assert!(below < 0.0 && below > -PI);
        assert!(above > 0.0);
    }

    #[test]
    fn test_impulse_response_matches_recursion() {
        let mut biquad = Biquad::allpass(44100.0, 3000.0, 1.5).unwrap();
        let c = biquad.coefficients();
        let y0 = biquad.process(1.0);
        let y1 = biquad.process(0.0);
        let y2 = biquad.process(0.0);
        assert!((y0 - c.b0 / c.a0).abs() < 1e-15);
        assert!((y1 - (c.b1 - c.a1 * y0) / c.a0).abs() < 1e-15);
        assert!((y2 - (c.b2 - c.a1 * y1 - c.a2 * y0) / c.a0).abs() < 1e-15);
    }

    #[test]
    fn test_block_continuity() {
        let input = noise(2048);

        let mut whole = Biquad::allpass(44100.0, 440.0, 0.9).unwrap();
        let mut expected = vec![0.0; 2048];
        whole.process_block(&input, &mut expected).unwrap();

        let mut split = Biquad::allpass(44100.0, 440.0, 0.9).unwrap();
        let mut actual = vec![0.0; 2048];
        let (a, b) = actual.split_at_mut(1024);
        split.process_block(&input[..1024], a).unwrap();
        split.process_block(&input[1024..], b).unwrap();

        assert_eq!(expected, actual);
    }

    #[test]
    fn test_first_two_samples_use_history() {
        let mut biquad = Biquad::allpass(44100.0, 1000.0, 1.0).unwrap();
        let mut first = [0.0; 3];
        biquad.process_block(&[0.5, -0.25, 0.125], &mut first).unwrap();

        let mut carried = [0.0; 2];
        biquad.process_block(&[0.0, 0.0], &mut carried).unwrap();
        // Zero input still rings from the carried history
        assert!(carried[0] != 0.0 && carried[1] != 0.0);

        biquad.clear();
        let mut silent = [1.0; 2];
        biquad.process_block(&[0.0, 0.0], &mut silent).unwrap();
        assert_eq!(silent, [0.0, 0.0]);
    }

    #[test]
    fn test_rejects_bad_parameters() {
        assert!(BiquadCoefficients::allpass(44100.0, 0.0, 0.7).is_err());
        assert!(BiquadCoefficients::allpass(44100.0, 22050.0, 0.7).is_err());
        assert!(BiquadCoefficients::allpass(44100.0, 1000.0, 0.0).is_err());
        assert!(BiquadCoefficients::allpass(0.0, 1000.0, 0.7).is_err());
        assert!(BiquadCoefficients::allpass(44100.0, f64::NAN, 0.7).is_err());

        let zero_a0 = BiquadCoefficients {
            a0: 0.0,
            ..BiquadCoefficients::default()
        };
        assert!(Biquad::new(zero_a0).is_err());
    }
}
