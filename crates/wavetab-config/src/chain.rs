//! Filter chain management.
//!
//! [`FilterChain`] runs a series of filters in order and is itself a
//! [`Filter`], so a whole chain can stand anywhere a single filter can.
//!
//! # Example
//!
//! ```rust
//! use wavetab_config::{FilterChain, FilterConfig};
//! use wavetab_core::Filter;
//!
//! let mut chain = FilterChain::from_configs(
//!     &[
//!         FilterConfig::BiquadAllpass { frequency: 1000.0, q: 0.707 },
//!         FilterConfig::ModulatedAllpass { offset: 0.5, amplitude: 1.0, rate: 2.0 },
//!     ],
//!     44100.0,
//! )
//! .unwrap();
//!
//! let output = chain.process(0.5);
//! assert!(output.is_finite());
//! ```

use wavetab_core::Filter;

use crate::error::ConfigError;
use crate::layer::FilterConfig;
use crate::patch::Patch;

/// An entry in the filter chain.
struct ChainEntry {
    filter: Box<dyn Filter + Send>,
    name: &'static str,
}

/// Filters processed in series.
///
/// An empty chain passes samples through unchanged.
pub struct FilterChain {
    entries: Vec<ChainEntry>,
    sample_rate: f64,
}

impl FilterChain {
    /// Create a new empty chain.
    pub fn new(sample_rate: f64) -> Self {
        Self {
            entries: Vec::new(),
            sample_rate,
        }
    }

    /// Build a chain from filter configurations, in order.
    pub fn from_configs(configs: &[FilterConfig], sample_rate: f64) -> Result<Self, ConfigError> {
        let mut chain = Self::new(sample_rate);
        for config in configs {
            chain.add_filter_config(config)?;
        }
        Ok(chain)
    }

    /// Build the chain a patch describes, at the patch's sample rate.
    pub fn from_patch(patch: &Patch) -> Result<Self, ConfigError> {
        Self::from_configs(&patch.filters, patch.sample_rate)
    }

    /// Construct a filter from its configuration and append it.
    pub fn add_filter_config(&mut self, config: &FilterConfig) -> Result<(), ConfigError> {
        let filter = config.build(self.sample_rate)?;
        self.push(config.name(), filter);
        Ok(())
    }

    /// Append an already constructed filter.
    pub fn push(&mut self, name: &'static str, filter: Box<dyn Filter + Send>) {
        self.entries.push(ChainEntry { filter, name });
    }

    /// Number of filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the chain has no filters.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sample rate the filters were built for.
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Filter names in processing order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|e| e.name).collect()
    }
}

impl Filter for FilterChain {
    fn process(&mut self, input: f64) -> f64 {
        self.entries
            .iter_mut()
            .fold(input, |x, entry| entry.filter.process(x))
    }

    fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.filter.reset();
        }
    }
}

impl std::fmt::Debug for FilterChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterChain")
            .field("filters", &self.names())
            .field("sample_rate", &self.sample_rate)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavetab_core::Biquad;

    #[test]
    fn test_empty_chain_passes_through() {
        let mut chain = FilterChain::new(44100.0);
        assert!(chain.is_empty());
        assert_eq!(chain.process(0.25), 0.25);
    }

    #[test]
    fn test_chain_matches_filters_in_series() {
        let configs = [
            FilterConfig::BiquadAllpass {
                frequency: 500.0,
                q: 0.5,
            },
            FilterConfig::BiquadAllpass {
                frequency: 5000.0,
                q: 2.0,
            },
        ];
        let mut chain = FilterChain::from_configs(&configs, 44100.0).unwrap();
        assert_eq!(chain.names(), vec!["biquad_allpass", "biquad_allpass"]);

        let mut first = Biquad::allpass(44100.0, 500.0, 0.5).unwrap();
        let mut second = Biquad::allpass(44100.0, 5000.0, 2.0).unwrap();
        for n in 0..256 {
            let x = if n % 37 == 0 { 1.0 } else { -0.1 };
            assert_eq!(chain.process(x), second.process(first.process(x)));
        }
    }

    #[test]
    fn test_reset_clears_every_filter() {
        let configs = [FilterConfig::BiquadAllpass {
            frequency: 1000.0,
            q: 0.707,
        }];
        let mut chain = FilterChain::from_configs(&configs, 44100.0).unwrap();
        let impulse: Vec<f64> = (0..64).map(|n| if n == 0 { 1.0 } else { 0.0 }).collect();

        let mut a = impulse.clone();
        chain.process_in_place(&mut a);
        chain.reset();
        let mut b = impulse;
        chain.process_in_place(&mut b);
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let configs = [FilterConfig::BiquadAllpass {
            frequency: 1000.0,
            q: 0.0,
        }];
        assert!(matches!(
            FilterChain::from_configs(&configs, 44100.0),
            Err(ConfigError::Core(_))
        ));
    }
}
