//! Oscillator layer and filter entries of a patch.

use serde::{Deserialize, Serialize};
use wavetab_core::{
    Biquad, Filter, ModulatedAllpass, OscillatorKind, OscillatorParams, WaveType,
};

/// One oscillator layer: a wave played by one oscillator variant.
///
/// ```toml
/// [[layers]]
/// wave = "sawtooth"
/// kind = "resampling"
/// frequency = 43.65
/// detune = 3.0
/// level = 0.5
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    /// Waveform of the layer's table.
    #[serde(default)]
    pub wave: WaveType,

    /// Detuning strategy.
    #[serde(default)]
    pub kind: OscillatorKind,

    /// Fundamental in Hz; the table is band-limited for it.
    pub frequency: f64,

    /// Pitch offset in cents.
    #[serde(default)]
    pub detune: f64,

    /// Linear output level.
    #[serde(default = "default_level")]
    pub level: f64,
}

fn default_level() -> f64 {
    1.0
}

impl LayerConfig {
    /// A standard, undetuned, full-level layer.
    pub fn new(wave: WaveType, frequency: f64) -> Self {
        Self {
            wave,
            kind: OscillatorKind::Standard,
            frequency,
            detune: 0.0,
            level: default_level(),
        }
    }

    /// Set the oscillator variant.
    pub fn with_kind(mut self, kind: OscillatorKind) -> Self {
        self.kind = kind;
        self
    }

    /// Set the detune in cents.
    pub fn with_detune(mut self, detune: f64) -> Self {
        self.detune = detune;
        self
    }

    /// Set the output level.
    pub fn with_level(mut self, level: f64) -> Self {
        self.level = level;
        self
    }

    /// Oscillator parameters for this layer.
    pub fn params(&self) -> OscillatorParams {
        OscillatorParams::new(self.frequency)
            .with_detune(self.detune)
            .with_level(self.level)
    }
}

/// One filter in a patch's chain, tagged by `type`.
///
/// ```toml
/// [[filters]]
/// type = "biquad_allpass"
/// frequency = 18000.0
/// q = 0.1
///
/// [[filters]]
/// type = "modulated_allpass"
/// offset = 0.5
/// amplitude = 1.0
/// rate = 64000.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterConfig {
    /// Second-order allpass centered on `frequency` Hz.
    BiquadAllpass {
        /// Center frequency in Hz, where the phase passes -π.
        frequency: f64,
        /// Quality factor.
        #[serde(default = "default_q")]
        q: f64,
    },
    /// First-order allpass with a sine-modulated coefficient.
    ModulatedAllpass {
        /// Coefficient offset, fraction of the safe range in `[0, 1]`.
        offset: f64,
        /// Modulation depth.
        amplitude: f64,
        /// Modulation rate in Hz.
        rate: f64,
    },
}

fn default_q() -> f64 {
    core::f64::consts::FRAC_1_SQRT_2
}

impl FilterConfig {
    /// Tag used in patch files.
    pub fn name(&self) -> &'static str {
        match self {
            FilterConfig::BiquadAllpass { .. } => "biquad_allpass",
            FilterConfig::ModulatedAllpass { .. } => "modulated_allpass",
        }
    }

    /// Construct the filter at `sample_rate`.
    pub fn build(&self, sample_rate: f64) -> wavetab_core::Result<Box<dyn Filter + Send>> {
        Ok(match *self {
            FilterConfig::BiquadAllpass { frequency, q } => {
                Box::new(Biquad::allpass(sample_rate, frequency, q)?)
            }
            FilterConfig::ModulatedAllpass {
                offset,
                amplitude,
                rate,
            } => Box::new(ModulatedAllpass::new(sample_rate, offset, amplitude, rate)?),
        })
    }
}
