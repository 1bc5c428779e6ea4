//! Sample-level comparison of rendered buffers.

/// Largest absolute difference over the common length of two buffers.
///
/// # Example
///
/// ```rust
/// use wavetab_analysis::compare::max_abs_diff;
///
/// assert_eq!(max_abs_diff(&[1.0, 2.0, 3.0], &[1.0, 2.5]), 0.5);
/// ```
pub fn max_abs_diff(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// `a - b` over the common length.
pub fn difference(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b).map(|(x, y)| x - y).collect()
}

/// Root mean square; 0 for an empty buffer.
pub fn rms(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    (signal.iter().map(|x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
}

/// Largest absolute sample.
pub fn peak(signal: &[f64]) -> f64 {
    signal.iter().fold(0.0, |p: f64, x| p.max(x.abs()))
}

/// Scale `signal` in place so its peak is 1.0.
///
/// Returns the peak found before scaling. A silent buffer is left as is.
pub fn normalize(signal: &mut [f64]) -> f64 {
    let p = peak(signal);
    if p > 0.0 && p.is_finite() {
        for x in signal.iter_mut() {
            *x /= p;
        }
    }
    p
}

/// Zero the tail a resampling render at `playback_rate` cannot reach.
///
/// Everything from index `floor(len / playback_rate)` on is cleared; a rate
/// at or below 1 leaves the buffer untouched. Returns the number of samples
/// kept.
pub fn trim_tail(signal: &mut [f64], playback_rate: f64) -> usize {
    let len = signal.len();
    let keep = (len as f64 / playback_rate).floor();
    let keep = if keep.is_nan() || keep >= len as f64 {
        len
    } else {
        keep.max(0.0) as usize
    };
    signal[keep..].fill(0.0);
    keep
}

/// Signal-to-noise ratio of `test` against `reference` in dB.
///
/// Infinite when the two are identical.
pub fn snr_db(reference: &[f64], test: &[f64]) -> f64 {
    let signal = rms(reference);
    let noise = rms(&difference(reference, test));
    if noise == 0.0 {
        f64::INFINITY
    } else {
        20.0 * (signal / noise).log10()
    }
}
