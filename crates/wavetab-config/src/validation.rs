//! Patch validation.
//!
//! Checks run before any table is synthesized, so a bad patch fails with
//! every problem listed instead of stopping at the first layer that breaks.
//!
//! # Example
//!
//! ```rust
//! use wavetab_config::{LayerConfig, Patch, validate_patch};
//! use wavetab_core::WaveType;
//!
//! let patch = Patch::new("ok").with_layer(LayerConfig::new(WaveType::Sawtooth, 110.0));
//! assert!(validate_patch(&patch).is_ok());
//!
//! let above_nyquist = Patch::new("bad").with_layer(LayerConfig::new(WaveType::Square, 30000.0));
//! assert!(validate_patch(&above_nyquist).is_err());
//! ```

use thiserror::Error;
use wavetab_core::{SynthConfig, WaveType, partial_count};

use crate::layer::{FilterConfig, LayerConfig};
use crate::patch::Patch;

/// Longest render a patch may request, in samples (about 101 minutes at
/// 44.1 kHz).
pub const MAX_RENDER_SAMPLES: usize = 1 << 28;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// The patch has no name.
    #[error("patch name is empty")]
    EmptyName,

    /// The patch has nothing to render.
    #[error("patch has no layers")]
    NoLayers,

    /// Render length is not a positive number of seconds.
    #[error("duration must be positive and finite, got {0}")]
    InvalidDuration(f64),

    /// `duration · sample_rate` exceeds [`MAX_RENDER_SAMPLES`].
    #[error("render of {seconds} s at {sample_rate} Hz exceeds {max} samples")]
    RenderTooLong {
        /// Requested duration in seconds.
        seconds: f64,
        /// Patch sample rate in Hz.
        sample_rate: f64,
        /// The sample limit.
        max: usize,
    },

    /// A patch component was rejected by the synthesis layer.
    #[error("{context}: {source}")]
    Invalid {
        /// Which part of the patch failed, e.g. `layer 2`.
        context: String,
        /// Underlying error.
        #[source]
        source: wavetab_core::Error,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Check one layer against the engine settings it will be rendered with.
///
/// Harmonic waves need at least one partial below Nyquist.
pub fn validate_layer(layer: &LayerConfig, config: &SynthConfig) -> wavetab_core::Result<()> {
    layer.params().validate()?;
    if layer.wave != WaveType::Sine && partial_count(layer.frequency, config) == 0 {
        return Err(wavetab_core::Error::invalid(
            "frequency",
            format!(
                "{} Hz is above the Nyquist frequency of {} Hz",
                layer.frequency,
                config.nyquist()
            ),
        ));
    }
    Ok(())
}

/// Check that a filter can be constructed at `sample_rate`.
pub fn validate_filter(filter: &FilterConfig, sample_rate: f64) -> wavetab_core::Result<()> {
    filter.build(sample_rate).map(|_| ())
}

/// Validate a whole patch, collecting every problem.
pub fn validate_patch(patch: &Patch) -> ValidationResult<()> {
    let mut errors = Vec::new();
    let invalid = |context: String, source| ValidationError::Invalid { context, source };

    if patch.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if !patch.duration.is_finite() || patch.duration <= 0.0 {
        errors.push(ValidationError::InvalidDuration(patch.duration));
    }

    let config = patch.synth_config();
    let engine_ok = match config.validate() {
        Ok(()) => true,
        Err(e) => {
            errors.push(invalid("engine".to_string(), e));
            false
        }
    };

    let duration_ok = patch.duration.is_finite() && patch.duration > 0.0;
    if engine_ok && duration_ok && patch.duration * patch.sample_rate > MAX_RENDER_SAMPLES as f64 {
        errors.push(ValidationError::RenderTooLong {
            seconds: patch.duration,
            sample_rate: patch.sample_rate,
            max: MAX_RENDER_SAMPLES,
        });
    }

    if patch.layers.is_empty() {
        errors.push(ValidationError::NoLayers);
    }
    if engine_ok {
        for (i, layer) in patch.layers.iter().enumerate() {
            if let Err(e) = validate_layer(layer, &config) {
                errors.push(invalid(format!("layer {i} ({})", layer.wave), e));
            }
        }
        for (i, filter) in patch.filters.iter().enumerate() {
            if let Err(e) = validate_filter(filter, patch.sample_rate) {
                errors.push(invalid(format!("filter {i} ({})", filter.name()), e));
            }
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wavetab_core::OscillatorKind;

    fn saw_patch() -> Patch {
        Patch::new("Test").with_layer(LayerConfig::new(WaveType::Sawtooth, 43.65))
    }

    #[test]
    fn test_valid_patch() {
        let patch = saw_patch()
            .with_layer(
                LayerConfig::new(WaveType::Sawtooth, 43.65)
                    .with_kind(OscillatorKind::Resampling)
                    .with_detune(3.0),
            )
            .with_filter(FilterConfig::BiquadAllpass {
                frequency: 18000.0,
                q: 0.1,
            });
        assert_eq!(validate_patch(&patch), Ok(()));
    }

    #[test]
    fn test_single_error_is_not_wrapped() {
        let patch = Patch::new("Empty");
        assert_eq!(validate_patch(&patch), Err(ValidationError::NoLayers));
    }

    #[test]
    fn test_collects_every_error() {
        let patch = Patch::new(" ")
            .with_duration(0.0)
            .with_layer(LayerConfig::new(WaveType::Triangle, -1.0))
            .with_filter(FilterConfig::ModulatedAllpass {
                offset: 1.5,
                amplitude: 0.1,
                rate: 1.0,
            });
        let Err(ValidationError::Multiple(errors)) = validate_patch(&patch) else {
            panic!("expected several errors");
        };
        assert_eq!(errors.len(), 4);
        assert_eq!(errors[0], ValidationError::EmptyName);
        assert_eq!(errors[1], ValidationError::InvalidDuration(0.0));
        assert!(errors[2].to_string().starts_with("layer 0 (triangle)"));
        assert!(errors[3].to_string().starts_with("filter 0 (modulated_allpass)"));
    }

    #[test]
    fn test_sine_ignores_nyquist() {
        let config = SynthConfig::default();
        let sine = LayerConfig::new(WaveType::Sine, 30000.0);
        assert!(validate_layer(&sine, &config).is_ok());
        let saw = LayerConfig::new(WaveType::Sawtooth, 30000.0);
        assert!(validate_layer(&saw, &config).is_err());
    }

    #[test]
    fn test_bad_engine_skips_component_checks() {
        let patch = saw_patch().with_table_size(1000);
        let err = validate_patch(&patch).unwrap_err();
        assert!(matches!(err, ValidationError::Invalid { ref context, .. } if context == "engine"));
    }

    #[test]
    fn test_render_length_limit() {
        let limit = MAX_RENDER_SAMPLES as f64 / 44100.0;
        assert!(validate_patch(&saw_patch().with_duration(limit / 2.0)).is_ok());

        let err = validate_patch(&saw_patch().with_duration(limit * 2.0)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::RenderTooLong {
                seconds: limit * 2.0,
                sample_rate: 44100.0,
                max: MAX_RENDER_SAMPLES,
            }
        );
    }
}
