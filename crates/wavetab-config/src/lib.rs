//! Patch files for the wavetab synth.
//!
//! A [`Patch`] is a TOML description of a sound: engine settings, oscillator
//! layers mixed into one buffer, and a chain of filters run over the mix.
//!
//! # Features
//!
//! - **Patches**: Load, save and render TOML patch files
//! - **Filter Chains**: [`FilterChain`] builds the filters a patch names
//! - **Validation**: Every problem in a patch reported before rendering
//! - **Factory Patches**: The detuning and allpass comparison set
//!
//! # Example
//!
//! ```rust,no_run
//! use wavetab_config::{FilterConfig, LayerConfig, Patch};
//! use wavetab_core::{OscillatorKind, WaveType};
//!
//! let patch = Patch::new("Fat Saw")
//!     .with_description("Two sawtooths, one detuned by resampling")
//!     .with_layer(LayerConfig::new(WaveType::Sawtooth, 43.65).with_level(0.5))
//!     .with_layer(
//!         LayerConfig::new(WaveType::Sawtooth, 43.65)
//!             .with_kind(OscillatorKind::Resampling)
//!             .with_detune(3.0)
//!             .with_level(0.5),
//!     )
//!     .with_filter(FilterConfig::BiquadAllpass { frequency: 8040.0, q: 1.0 });
//!
//! patch.save("patches/fat_saw.toml").unwrap();
//! let samples = patch.render().unwrap();
//! ```

mod chain;
mod error;
mod layer;
mod patch;

/// Patch validation.
pub mod validation;

/// Factory patches bundled with the library.
pub mod factory_patches;

pub use chain::FilterChain;
pub use error::ConfigError;
pub use factory_patches::{
    FACTORY_PATCH_NAMES, factory_patch_names, factory_patches, get_factory_patch,
    is_factory_patch,
};
pub use layer::{FilterConfig, LayerConfig};
pub use patch::Patch;
pub use validation::{
    MAX_RENDER_SAMPLES, ValidationError, ValidationResult, validate_filter, validate_layer,
    validate_patch,
};
