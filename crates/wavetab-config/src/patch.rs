//! Patch file format and rendering.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use wavetab_core::{
    DEFAULT_SAMPLE_RATE, DEFAULT_TABLE_SIZE, Filter, SynthConfig, WaveTable, build_oscillator,
};

use crate::chain::FilterChain;
use crate::error::ConfigError;
use crate::layer::{FilterConfig, LayerConfig};
use crate::validation::validate_patch;

/// A renderable sound: oscillator layers mixed into one buffer, then run
/// through a filter chain.
///
/// Patches are stored as TOML files. They can be loaded from files, created
/// programmatically, and saved to disk.
///
/// # TOML Format
///
/// ```toml
/// name = "Detuned Resampling"
/// description = "Dry sawtooth plus a 3-cent resampled copy"
/// sample_rate = 44100.0
/// table_size = 4096
/// damping = true
/// duration = 4.0
///
/// [[layers]]
/// wave = "sawtooth"
/// frequency = 43.65
/// level = 0.5
///
/// [[layers]]
/// wave = "sawtooth"
/// kind = "resampling"
/// frequency = 43.65
/// detune = 3.0
/// level = 0.5
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Patch {
    /// Name of the patch.
    pub name: String,

    /// Optional description of the patch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sample rate in Hz the tables are band-limited against.
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    /// Table length; a power of two.
    #[serde(default = "default_table_size")]
    pub table_size: usize,

    /// Lanczos sigma damping of the table partials.
    #[serde(default = "default_damping")]
    pub damping: bool,

    /// Render length in seconds.
    #[serde(default = "default_duration")]
    pub duration: f64,

    /// Oscillator layers, rendered in order into the same buffer.
    #[serde(default)]
    pub layers: Vec<LayerConfig>,

    /// Filters applied in order to the mixed layers.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
}

fn default_sample_rate() -> f64 {
    DEFAULT_SAMPLE_RATE
}

fn default_table_size() -> usize {
    DEFAULT_TABLE_SIZE
}

fn default_damping() -> bool {
    true
}

fn default_duration() -> f64 {
    4.0
}

impl Patch {
    /// Create a new empty patch with default engine settings.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            sample_rate: default_sample_rate(),
            table_size: default_table_size(),
            damping: default_damping(),
            duration: default_duration(),
            layers: Vec::new(),
            filters: Vec::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the sample rate.
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Set the table size.
    pub fn with_table_size(mut self, table_size: usize) -> Self {
        self.table_size = table_size;
        self
    }

    /// Enable or disable table damping.
    pub fn with_damping(mut self, damping: bool) -> Self {
        self.damping = damping;
        self
    }

    /// Set the render length in seconds.
    pub fn with_duration(mut self, duration: f64) -> Self {
        self.duration = duration;
        self
    }

    /// Add an oscillator layer.
    pub fn with_layer(mut self, layer: LayerConfig) -> Self {
        self.layers.push(layer);
        self
    }

    /// Add a filter to the end of the chain.
    pub fn with_filter(mut self, filter: FilterConfig) -> Self {
        self.filters.push(filter);
        self
    }

    /// Engine settings for this patch (not validated).
    pub fn synth_config(&self) -> SynthConfig {
        SynthConfig {
            sample_rate: self.sample_rate,
            table_size: self.table_size,
            damping: self.damping,
        }
    }

    /// Number of samples [`Patch::render`] produces.
    pub fn num_samples(&self) -> usize {
        let n = (self.duration * self.sample_rate).round();
        if n.is_finite() && n > 0.0 { n as usize } else { 0 }
    }

    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        let patch: Patch = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), name = %patch.name, "loaded patch");
        Ok(patch)
    }

    /// Load a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the patch to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        tracing::debug!(path = %path.display(), name = %self.name, "saved patch");
        Ok(())
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every setting, layer and filter.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Ok(validate_patch(self)?)
    }

    /// Render [`Patch::num_samples`] samples.
    pub fn render(&self) -> Result<Vec<f64>, ConfigError> {
        self.validate()?;
        let mut buffer = vec![0.0; self.num_samples()];
        self.mix_into(&mut buffer)?;
        Ok(buffer)
    }

    /// Render into `buffer`, accumulating onto its contents.
    ///
    /// Every layer is rendered from its start into the whole buffer, then the
    /// filter chain runs over the mix. Layers with the same wave and
    /// frequency share one table.
    pub fn render_into(&self, buffer: &mut [f64]) -> Result<(), ConfigError> {
        self.validate()?;
        self.mix_into(buffer)
    }

    fn mix_into(&self, buffer: &mut [f64]) -> Result<(), ConfigError> {
        let config = self.synth_config();

        let mut tables: Vec<Arc<WaveTable>> = Vec::new();
        for layer in &self.layers {
            let cached = tables
                .iter()
                .find(|t| t.wave() == layer.wave && t.frequency() == layer.frequency);
            let table = match cached {
                Some(table) => Arc::clone(table),
                None => {
                    let table = Arc::new(WaveTable::build(layer.wave, layer.frequency, &config)?);
                    tables.push(Arc::clone(&table));
                    table
                }
            };
            build_oscillator(layer.kind, table, layer.params())?.render(buffer);
        }

        let mut chain = FilterChain::from_patch(self)?;
        chain.process_in_place(buffer);

        tracing::debug!(
            patch = %self.name,
            layers = self.layers.len(),
            tables = tables.len(),
            filters = chain.len(),
            samples = buffer.len(),
            "rendered patch"
        );
        Ok(())
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// True when the patch has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for Patch {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
