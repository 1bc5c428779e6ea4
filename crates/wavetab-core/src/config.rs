//! Engine configuration shared by table construction and playback.

use crate::error::{Error, Result, ensure_positive};

/// Default sample rate in Hz.
pub const DEFAULT_SAMPLE_RATE: f64 = 44100.0;

/// Default table size in samples.
pub const DEFAULT_TABLE_SIZE: usize = 4096;

/// Sample rate, table resolution and damping policy for table synthesis.
///
/// Every [`WaveTable`](crate::WaveTable) remembers the configuration it was
/// built with, and oscillators play a table back at its own sample rate.
///
/// # Example
///
/// ```rust
/// use wavetab_core::SynthConfig;
///
/// let config = SynthConfig::new(48000.0, 2048).unwrap();
/// assert_eq!(config.nyquist(), 24000.0);
/// assert_eq!(config.max_partials(), 1024);
///
/// assert!(SynthConfig::new(48000.0, 1000).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SynthConfig {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Table length in samples; must be a power of two.
    pub table_size: usize,
    /// Apply Lanczos sigma damping to attenuate Gibbs ringing.
    pub damping: bool,
}

impl Default for SynthConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE,
            table_size: DEFAULT_TABLE_SIZE,
            damping: true,
        }
    }
}

impl SynthConfig {
    /// Create a validated configuration with damping enabled.
    pub fn new(sample_rate: f64, table_size: usize) -> Result<Self> {
        let config = Self {
            sample_rate,
            table_size,
            damping: true,
        };
        config.validate()?;
        Ok(config)
    }

    /// Enable or disable Gibbs damping.
    pub fn with_damping(mut self, damping: bool) -> Self {
        self.damping = damping;
        self
    }

    /// Check the sample rate and table size.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("sample_rate", self.sample_rate)?;
        if !self.table_size.is_power_of_two() {
            return Err(Error::TableSizeNotPowerOfTwo(self.table_size));
        }
        Ok(())
    }

    /// Half the sample rate.
    #[inline]
    pub fn nyquist(&self) -> f64 {
        self.sample_rate / 2.0
    }

    /// Upper bound on synthesized partials imposed by the table resolution.
    #[inline]
    pub fn max_partials(&self) -> usize {
        self.table_size / 2
    }
}
