//! Error types for table construction, oscillator setup and filtering.
//!
//! Every variant is an invalid-argument condition: the core performs no I/O,
//! so a failure always means the caller passed something unusable.

#[cfg(not(feature = "std"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std as alloc;

use alloc::string::String;

/// Errors raised by the core DSP layer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A wave type name or numeric code did not match any known wave.
    #[error("unknown wave type: {0}")]
    UnknownWaveType(String),

    /// An oscillator kind name did not match any known variant.
    #[error("unknown oscillator kind: {0}")]
    UnknownOscillatorKind(String),

    /// Table sizes must be a non-zero power of two (lookups use bitmasks).
    #[error("table size {0} is not a power of two")]
    TableSizeNotPowerOfTwo(usize),

    /// Input and output blocks passed to a filter differ in length.
    #[error("buffer length mismatch: input has {input} samples, output has {output}")]
    BufferLengthMismatch {
        /// Length of the input block.
        input: usize,
        /// Length of the output block.
        output: usize,
    },

    /// A numeric parameter is out of its valid domain.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// Synthesis produced a table with no energy, so it cannot be normalized.
    #[error("table synthesized for {frequency} Hz is all zeros")]
    DegenerateTable {
        /// Requested fundamental in Hz.
        frequency: f64,
    },
}

impl Error {
    /// Create an [`Error::InvalidParameter`].
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

/// Convenience result type for core operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Reject NaN and infinities for a named parameter.
pub(crate) fn ensure_finite(name: &'static str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(Error::invalid(name, alloc::format!("must be finite, got {value}")))
    }
}

/// Reject non-finite and non-positive values for a named parameter.
pub(crate) fn ensure_positive(name: &'static str, value: f64) -> Result<f64> {
    ensure_finite(name, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(Error::invalid(name, alloc::format!("must be positive, got {value}")))
    }
}
