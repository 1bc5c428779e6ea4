//! Headerless little-endian `i32` sample files.
//!
//! The layout is the bare sample array a firmware build can embed directly:
//! four bytes per sample, no header, samples scaled by [`PCM_SCALE`].

use crate::{Error, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Full-scale integer value, `2^31 - 1`.
pub const PCM_SCALE: f64 = 2147483647.0;

/// Encode samples as little-endian `i32`.
///
/// Samples are clamped to [-1, 1], scaled by [`PCM_SCALE`] and truncated
/// toward zero.
///
/// # Example
///
/// ```rust
/// use wavetab_io::encode_pcm;
///
/// let bytes = encode_pcm(&[1.0, -0.5]);
/// assert_eq!(bytes.len(), 8);
/// assert_eq!(&bytes[..4], &i32::MAX.to_le_bytes());
/// ```
pub fn encode_pcm(samples: &[f64]) -> Vec<u8> {
    samples
        .iter()
        .flat_map(|&s| ((s.clamp(-1.0, 1.0) * PCM_SCALE) as i32).to_le_bytes())
        .collect()
}

/// Decode little-endian `i32` bytes back to samples in [-1, 1].
pub fn decode_pcm(bytes: &[u8]) -> Result<Vec<f64>> {
    if bytes.len() % 4 != 0 {
        return Err(Error::MisalignedPcm(bytes.len()));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f64::from(i32::from_le_bytes([c[0], c[1], c[2], c[3]])) / PCM_SCALE)
        .collect())
}

/// Write samples to a raw PCM file.
pub fn write_pcm<P: AsRef<Path>>(path: P, samples: &[f64]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&encode_pcm(samples))?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), samples = samples.len(), "wrote PCM");
    Ok(())
}

/// Read a raw PCM file written by [`write_pcm`].
pub fn read_pcm<P: AsRef<Path>>(path: P) -> Result<Vec<f64>> {
    decode_pcm(&std::fs::read(path)?)
}
