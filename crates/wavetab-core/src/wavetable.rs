//! Band-limited wavetable construction by additive synthesis.
//!
//! A [`WaveTable`] holds one normalized cycle of a waveform. Harmonic waves
//! (triangle, sawtooth, square) are summed partial by partial, stopping at
//! the last harmonic that still fits below Nyquist for the frequency the
//! table is built for, so playing the table back at that frequency cannot
//! alias.
//!
//! # Partial truncation
//!
//! ```text
//! num_partials = min(floor(nyquist / frequency), table_size / 2)
//! ```
//!
//! # Gibbs damping
//!
//! Truncating a Fourier series rings near discontinuities. When damping is
//! enabled, partial `k` of `N` is scaled by the Lanczos sigma factor
//! `sinc(kπ / 2N)` with the normalized sinc `sin(πx)/(πx)`.
//!
//! Two properties of this weighting are known and kept as-is:
//!
//! - With a single partial left (the top few MIDI notes) the sigma factor is
//!   negative, so those tables come out phase-inverted relative to the rest
//!   of a series.
//! - The denominator depends on each table's own partial count, so the same
//!   harmonic is weighted differently in adjacent tables of a series.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::string::ToString;
use alloc::vec;
use alloc::vec::Vec;
use core::f64::consts::{PI, TAU};
use core::fmt;
use core::str::FromStr;
use libm::{fabs, floor, sin};

use crate::config::SynthConfig;
use crate::error::{Error, Result, ensure_positive};
use crate::math::{lerp, sinc};

/// Waveform shapes the table builder can synthesize.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WaveType {
    /// Single sine cycle, no harmonics.
    Sine,
    /// Odd harmonics with alternating sign, falling as `1/k²`.
    Triangle,
    /// All harmonics, falling as `1/k`.
    #[default]
    #[cfg_attr(feature = "serde", serde(alias = "saw"))]
    Sawtooth,
    /// Odd harmonics, falling as `1/k`.
    Square,
}

impl WaveType {
    /// All wave types in export order (numeric codes 0..=3).
    pub const ALL: [WaveType; 4] = [
        WaveType::Sine,
        WaveType::Triangle,
        WaveType::Sawtooth,
        WaveType::Square,
    ];

    /// Lowercase name used in patches and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            WaveType::Sine => "sine",
            WaveType::Triangle => "triangle",
            WaveType::Sawtooth => "sawtooth",
            WaveType::Square => "square",
        }
    }

    /// Numeric code, the position in [`WaveType::ALL`].
    pub fn code(self) -> u8 {
        match self {
            WaveType::Sine => 0,
            WaveType::Triangle => 1,
            WaveType::Sawtooth => 2,
            WaveType::Square => 3,
        }
    }

    /// Whether partial `k` (1-based) belongs to this wave's series.
    #[inline]
    fn has_partial(self, k: usize) -> bool {
        match self {
            WaveType::Sine => k == 1,
            WaveType::Sawtooth => true,
            WaveType::Triangle | WaveType::Square => k % 2 == 1,
        }
    }
}

impl fmt::Display for WaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for WaveType {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        WaveType::ALL
            .get(code as usize)
            .copied()
            .ok_or_else(|| Error::UnknownWaveType(code.to_string()))
    }
}

impl FromStr for WaveType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sine" | "sin" => Ok(WaveType::Sine),
            "triangle" | "tri" => Ok(WaveType::Triangle),
            "sawtooth" | "saw" => Ok(WaveType::Sawtooth),
            "square" | "sqr" => Ok(WaveType::Square),
            _ => Err(Error::UnknownWaveType(s.to_string())),
        }
    }
}

/// Number of partials synthesized for a harmonic table at `frequency`.
///
/// `min(floor(nyquist / frequency), table_size / 2)`. Returns 0 when even the
/// fundamental is above Nyquist.
///
/// # Example
///
/// ```rust
/// use wavetab_core::{SynthConfig, partial_count};
///
/// // F1 at 44.1 kHz with 4096-sample tables
/// assert_eq!(partial_count(43.65, &SynthConfig::default()), 505);
/// // Very low notes are capped by the table resolution
/// assert_eq!(partial_count(8.0, &SynthConfig::default()), 2048);
/// ```
pub fn partial_count(frequency: f64, config: &SynthConfig) -> usize {
    let by_nyquist = floor(config.nyquist() / frequency);
    if by_nyquist.is_nan() || by_nyquist < 1.0 {
        return 0;
    }
    (by_nyquist as usize).min(config.max_partials())
}

/// Lanczos sigma factor for partial `k` of a series truncated at
/// `num_partials`: `sinc(kπ / (2·num_partials))` with the normalized sinc.
#[inline]
pub fn lanczos_sigma(k: usize, num_partials: usize) -> f64 {
    sinc(k as f64 * PI / (2.0 * num_partials as f64))
}

/// One normalized, band-limited cycle of a waveform.
///
/// Immutable once built. Share it between oscillators with an
/// [`Arc`](alloc::sync::Arc).
///
/// # Example
///
/// ```rust
/// use wavetab_core::{SynthConfig, WaveTable, WaveType};
///
/// let table = WaveTable::build(WaveType::Sawtooth, 43.65, &SynthConfig::default()).unwrap();
/// assert_eq!(table.len(), 4096);
/// assert_eq!(table.num_partials(), 505);
/// assert!((table.peak() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct WaveTable {
    samples: Vec<f64>,
    wave: WaveType,
    frequency: f64,
    num_partials: usize,
    config: SynthConfig,
}

impl WaveTable {
    /// Synthesize a table for `wave`, band-limited for `frequency` Hz.
    ///
    /// The frequency is ignored for [`WaveType::Sine`].
    pub fn build(wave: WaveType, frequency: f64, config: &SynthConfig) -> Result<Self> {
        config.validate()?;
        let size = config.table_size;
        let mask = size - 1;

        let num_partials = match wave {
            WaveType::Sine => 1,
            WaveType::Triangle | WaveType::Sawtooth | WaveType::Square => {
                ensure_positive("frequency", frequency)?;
                let n = partial_count(frequency, config);
                if n == 0 {
                    return Err(Error::invalid(
                        "frequency",
                        alloc::format!(
                            "{frequency} Hz is above Nyquist ({} Hz), no partials fit",
                            config.nyquist()
                        ),
                    ));
                }
                n
            }
        };

        // sin(2πk·i/N) == sine[(k·i) mod N]: one cycle serves every partial.
        let sine: Vec<f64> = (0..size)
            .map(|i| sin(TAU * i as f64 / size as f64))
            .collect();

        let samples = match wave {
            WaveType::Sine => sine,
            WaveType::Triangle | WaveType::Sawtooth | WaveType::Square => {
                let mut table = vec![0.0; size];
                let mut alt = -1.0;
                for k in (1..=num_partials).filter(|&k| wave.has_partial(k)) {
                    let kf = k as f64;
                    let denominator = if wave == WaveType::Triangle {
                        alt = -alt;
                        alt * kf * kf * PI
                    } else {
                        kf * PI
                    };
                    let sigma = if config.damping {
                        lanczos_sigma(k, num_partials)
                    } else {
                        1.0
                    };
                    let gain = sigma / denominator;

                    let mut phase = 0usize;
                    for sample in &mut table {
                        *sample -= gain * sine[phase];
                        phase = (phase + k) & mask;
                    }
                }
                table
            }
        };

        let mut table = Self {
            samples,
            wave,
            frequency,
            num_partials,
            config: *config,
        };
        table.normalize()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            wave = wave.name(),
            frequency,
            partials = num_partials,
            size,
            "wavetable built"
        );

        Ok(table)
    }

    fn normalize(&mut self) -> Result<()> {
        let peak = self.peak();
        if peak == 0.0 || !peak.is_finite() {
            return Err(Error::DegenerateTable {
                frequency: self.frequency,
            });
        }
        for sample in &mut self.samples {
            *sample /= peak;
        }
        Ok(())
    }

    /// The table's samples.
    #[inline]
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Table length in samples (a power of two).
    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a built table; present for API symmetry with slices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    fn mask(&self) -> usize {
        self.samples.len() - 1
    }

    /// The wave type the table was built for.
    pub fn wave(&self) -> WaveType {
        self.wave
    }

    /// The fundamental the table was band-limited for, in Hz.
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Number of partials summed (1 for sine).
    pub fn num_partials(&self) -> usize {
        self.num_partials
    }

    /// Sample rate the table was band-limited against.
    pub fn sample_rate(&self) -> f64 {
        self.config.sample_rate
    }

    /// The configuration used to build the table.
    pub fn config(&self) -> &SynthConfig {
        &self.config
    }

    /// Largest absolute sample value.
    pub fn peak(&self) -> f64 {
        self.samples
            .iter()
            .fold(0.0, |peak: f64, &sample| peak.max(fabs(sample)))
    }

    /// Read at a fractional table position with linear interpolation.
    ///
    /// The integer part and its successor are wrapped to the table length, so
    /// any position, including negative ones, maps into the cycle.
    #[inline]
    pub fn read(&self, position: f64) -> f64 {
        let base = floor(position);
        let alpha = position - base;
        let index = base as i64 as usize;
        let mask = self.mask();
        let left = self.samples[index & mask];
        let right = self.samples[index.wrapping_add(1) & mask];
        lerp(left, right, alpha)
    }
}

impl AsRef<[f64]> for WaveTable {
    fn as_ref(&self) -> &[f64] {
        &self.samples
    }
}

/// Build a table; shorthand for [`WaveTable::build`].
pub fn build(wave: WaveType, frequency: f64, config: &SynthConfig) -> Result<WaveTable> {
    WaveTable::build(wave, frequency, config)
}
