//! Phase unwrapping.
//!
//! Phase values from an FFT are wrapped to (-π, π]. Unwrapping reconstructs
//! the continuous phase curve by removing the 2π jumps between neighbors.

use std::f64::consts::{PI, TAU};

/// Unwrap with the standard π tolerance.
///
/// # Arguments
/// * `phase` - Wrapped phase values in radians
///
/// # Returns
/// Unwrapped (continuous) phase values
pub fn unwrap_phase(phase: &[f64]) -> Vec<f64> {
    unwrap_phase_tol(phase, PI)
}

/// Unwrap, correcting any step larger than `tolerance`.
///
/// A step is corrected by the whole number of turns nearest to it, so a jump
/// of several multiples of 2π is removed in one go.
pub fn unwrap_phase_tol(phase: &[f64], tolerance: f64) -> Vec<f64> {
    let Some(&first) = phase.first() else {
        return Vec::new();
    };

    let mut unwrapped = Vec::with_capacity(phase.len());
    unwrapped.push(first);

    let mut correction = 0.0;
    for w in phase.windows(2) {
        let diff = w[1] - w[0];
        if diff.abs() > tolerance {
            correction -= TAU * (diff / TAU).round();
        }
        unwrapped.push(w[1] + correction);
    }

    unwrapped
}
