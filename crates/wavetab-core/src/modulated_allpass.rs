//! First-order allpass with a sinusoidally modulated coefficient.
//!
//! ```text
//! y[n] = c[n]·x[n] + x[n-1] - c[n]·y[n-1]
//! ```
//!
//! With `b0 = a1 = c` and `b1 = a0 = 1` the filter is allpass for any `c`
//! in (-1, 1); only its phase delay depends on `c`. Sweeping `c` at audio or
//! sub-audio rates therefore modulates the delay without touching the
//! magnitude of a static input spectrum.
//!
//! # Safety band
//!
//! The coefficient is kept inside `[M_MIN, M_MAX] = [-0.05, 0.82]`. Near
//! `c = 0` the pole and zero cancel, and large `c` stretches the delay at DC.
//! The user-facing `offset ∈ [0, 1]` is scaled into the band and the
//! modulation amplitude is clamped at construction so that
//! `offset + amplitude` does not exceed `M_MAX`.

use core::f64::consts::TAU;
use libm::{floor, sin};

use crate::error::{Error, Result, ensure_finite, ensure_positive};
use crate::filter::Filter;

/// Lowest coefficient value the modulator may produce.
pub const M_MIN: f64 = -0.05;

/// Highest coefficient value the modulator may produce.
pub const M_MAX: f64 = 0.82;

/// Sine modulator with a normalized phase accumulator.
#[derive(Debug, Clone)]
struct SineModulator {
    /// Current phase position [0.0, 1.0)
    phase: f64,
    /// Phase increment per sample
    phase_inc: f64,
}

impl SineModulator {
    fn new(sample_rate: f64, rate: f64) -> Self {
        Self {
            phase: 0.0,
            phase_inc: rate / sample_rate,
        }
    }

    /// Current value in [-1, 1], then advance one sample.
    #[inline]
    fn next(&mut self) -> f64 {
        let value = sin(TAU * self.phase);
        self.phase += self.phase_inc;
        self.phase -= floor(self.phase);
        value
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

/// Time-varying first-order allpass.
///
/// The coefficient is recomputed from the modulator before every output
/// sample, and the modulator phase carries over between blocks.
///
/// # Example
///
/// ```rust
/// use wavetab_core::{Filter, ModulatedAllpass, modulated_allpass::{M_MAX, M_MIN}};
///
/// let mut apf = ModulatedAllpass::new(44100.0, 0.5, 1.0, 64000.0).unwrap();
/// // Amplitude was clamped so offset + amplitude stays inside the band
/// assert!(apf.offset() + apf.amplitude() <= M_MAX + 1e-12);
///
/// let input = vec![0.25; 256];
/// let mut output = vec![0.0; 256];
/// apf.process_block(&input, &mut output).unwrap();
/// assert!((M_MIN..=M_MAX).contains(&apf.coefficient()));
/// ```
#[derive(Debug, Clone)]
pub struct ModulatedAllpass {
    sample_rate: f64,
    /// Offset scaled into the band, `offset · (M_MAX - M_MIN)`
    offset: f64,
    /// Modulation depth after the stability clamp
    amplitude: f64,
    rate: f64,
    modulator: SineModulator,
    /// b0 == a1
    coefficient: f64,
    /// x[n-1]
    x1: f64,
    /// y[n-1]
    y1: f64,
}

impl ModulatedAllpass {
    /// Create a filter.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `offset` - Center of the sweep in [0, 1], scaled into the safety band
    /// * `amplitude` - Modulation depth; clamped to `M_MAX - offset`
    /// * `rate` - Modulation frequency in Hz
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] for an offset outside [0, 1], a negative
    /// amplitude or rate, or any non-finite argument.
    pub fn new(sample_rate: f64, offset: f64, amplitude: f64, rate: f64) -> Result<Self> {
        ensure_positive("sample_rate", sample_rate)?;
        if !(0.0..=1.0).contains(&ensure_finite("offset", offset)?) {
            return Err(Error::invalid("offset", "must be within [0, 1]"));
        }
        if ensure_finite("amplitude", amplitude)? < 0.0 {
            return Err(Error::invalid("amplitude", "must not be negative"));
        }
        if ensure_finite("rate", rate)? < 0.0 {
            return Err(Error::invalid("rate", "must not be negative"));
        }

        let offset = offset * (M_MAX - M_MIN);
        let amplitude = amplitude.min(M_MAX - offset);

        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, offset, amplitude, rate, "modulated allpass");

        Ok(Self {
            sample_rate,
            offset,
            amplitude,
            rate,
            modulator: SineModulator::new(sample_rate, rate),
            coefficient: M_MIN + offset,
            x1: 0.0,
            y1: 0.0,
        })
    }

    /// Offset after scaling into the band.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Modulation depth after the stability clamp.
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    /// Modulation frequency in Hz.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Coefficient used for the most recent sample (`b0 == a1`).
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Snapshot of the current transfer function as `([b0, b1], [a0, a1])`.
    pub fn coefficients(&self) -> ([f64; 2], [f64; 2]) {
        ([self.coefficient, 1.0], [1.0, self.coefficient])
    }

    #[inline]
    fn next_coefficient(&mut self) -> f64 {
        let c = M_MIN + self.offset + self.amplitude * self.modulator.next();
        c.clamp(M_MIN, M_MAX)
    }
}

impl Filter for ModulatedAllpass {
    #[inline]
    fn process(&mut self, input: f64) -> f64 {
        let c = self.next_coefficient();
        self.coefficient = c;

        let output = c * input + self.x1 - c * self.y1;
        self.x1 = input;
        self.y1 = output;
        output
    }

    /// Clears the history and restarts the modulator.
    fn reset(&mut self) {
        self.modulator.reset();
        self.coefficient = M_MIN + self.offset;
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}
