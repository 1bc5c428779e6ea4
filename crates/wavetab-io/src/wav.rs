//! WAV file reading and writing.
//!
//! Rendered audio is written as mono, 32-bit signed integer PCM by default:
//! each sample is clamped to [-1, 1] and scaled by `2^31 - 1`, truncating
//! toward zero.

use crate::{Error, Result};
use hound::{SampleFormat, WavReader, WavWriter};
use std::path::Path;

/// WAV audio encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WavFormat {
    /// Linear PCM (integer samples).
    #[default]
    Pcm,
    /// IEEE 754 floating-point samples.
    IeeeFloat,
}

/// WAV file metadata extracted without loading sample data.
#[derive(Debug, Clone)]
pub struct WavInfo {
    /// Number of audio channels (1 = mono, 2 = stereo).
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Bit depth per sample.
    pub bits_per_sample: u16,
    /// Total number of sample frames (samples per channel).
    pub num_frames: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
    /// Audio encoding format.
    pub format: WavFormat,
}

/// Read WAV metadata without loading sample data.
pub fn read_wav_info<P: AsRef<Path>>(path: P) -> Result<WavInfo> {
    let reader = WavReader::open(path)?;
    let spec = reader.spec();
    let total_samples = u64::from(reader.len());
    let num_frames = total_samples / u64::from(spec.channels.max(1));
    let duration_secs = num_frames as f64 / f64::from(spec.sample_rate);

    Ok(WavInfo {
        channels: spec.channels,
        sample_rate: spec.sample_rate,
        bits_per_sample: spec.bits_per_sample,
        num_frames,
        duration_secs,
        format: format_of(spec.sample_format),
    })
}

/// Mono WAV output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    /// Sample rate in Hz (e.g., 44100, 48000).
    pub sample_rate: u32,
    /// Bit depth per sample: 8, 16, 24 or 32 for PCM, 32 for float.
    pub bits_per_sample: u16,
    /// Sample encoding.
    pub format: WavFormat,
}

impl Default for WavSpec {
    fn default() -> Self {
        Self {
            sample_rate: 44100,
            bits_per_sample: 32,
            format: WavFormat::Pcm,
        }
    }
}

impl WavSpec {
    /// 32-bit integer PCM at `sample_rate`.
    pub fn new(sample_rate: u32) -> Self {
        Self {
            sample_rate,
            ..Self::default()
        }
    }

    /// Largest integer sample value, `2^(bits-1) - 1`.
    fn int_scale(self) -> f64 {
        ((1_i64 << (self.bits_per_sample - 1)) - 1) as f64
    }

    fn check(self) -> Result<()> {
        match (self.format, self.bits_per_sample) {
            (WavFormat::Pcm, 8 | 16 | 24 | 32) | (WavFormat::IeeeFloat, 32) => Ok(()),
            (format, bits) => Err(Error::UnsupportedFormat(format!(
                "{bits}-bit {format:?}"
            ))),
        }
    }
}

impl From<hound::WavSpec> for WavSpec {
    fn from(spec: hound::WavSpec) -> Self {
        Self {
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            format: format_of(spec.sample_format),
        }
    }
}

impl From<WavSpec> for hound::WavSpec {
    fn from(spec: WavSpec) -> Self {
        hound::WavSpec {
            channels: 1,
            sample_rate: spec.sample_rate,
            bits_per_sample: spec.bits_per_sample,
            sample_format: match spec.format {
                WavFormat::Pcm => SampleFormat::Int,
                WavFormat::IeeeFloat => SampleFormat::Float,
            },
        }
    }
}

fn format_of(format: SampleFormat) -> WavFormat {
    match format {
        SampleFormat::Float => WavFormat::IeeeFloat,
        SampleFormat::Int => WavFormat::Pcm,
    }
}

/// Read a WAV file and return samples as f64 along with its format.
///
/// Integer samples are divided by `2^(bits-1) - 1`, the inverse of
/// [`write_wav`]. Multi-channel files are mixed down to mono by averaging
/// channels.
///
/// # Example
/// ```ignore
/// let (samples, spec) = read_wav("saw.wav")?;
/// println!("Loaded {} samples at {} Hz", samples.len(), spec.sample_rate);
/// ```
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<(Vec<f64>, WavSpec)> {
    let reader = WavReader::open(path)?;
    let hound_spec = reader.spec();
    let spec = WavSpec::from(hound_spec);
    let channels = usize::from(hound_spec.channels.max(1));

    let samples: Vec<f64> = match hound_spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<std::result::Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let scale = spec.int_scale();
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| f64::from(v) / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?
        }
    };

    let mono_samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f64>() / channels as f64)
            .collect()
    } else {
        samples
    };

    Ok((mono_samples, spec))
}

/// Write mono 32-bit integer samples to a WAV file.
///
/// # Example
/// ```ignore
/// let samples = vec![0.0; 44100]; // 1 second of silence
/// write_wav("silence.wav", &samples, 44100)?;
/// ```
pub fn write_wav<P: AsRef<Path>>(path: P, samples: &[f64], sample_rate: u32) -> Result<()> {
    write_wav_spec(path, samples, WavSpec::new(sample_rate))
}

/// Write mono samples to a WAV file in the given format.
///
/// Integer formats clamp to [-1, 1] and truncate toward zero after scaling.
pub fn write_wav_spec<P: AsRef<Path>>(path: P, samples: &[f64], spec: WavSpec) -> Result<()> {
    spec.check()?;
    let path = path.as_ref();
    let mut writer = WavWriter::create(path, hound::WavSpec::from(spec))?;

    match spec.format {
        WavFormat::IeeeFloat => {
            for &sample in samples {
                writer.write_sample(sample as f32)?;
            }
        }
        WavFormat::Pcm => {
            let scale = spec.int_scale();
            for &sample in samples {
                writer.write_sample((sample.clamp(-1.0, 1.0) * scale) as i32)?;
            }
        }
    }

    writer.finalize()?;
    tracing::debug!(
        path = %path.display(),
        samples = samples.len(),
        sample_rate = spec.sample_rate,
        bits = spec.bits_per_sample,
        "wrote WAV"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_spec() {
        let spec = WavSpec::default();
        assert_eq!(spec.sample_rate, 44100);
        assert_eq!(spec.bits_per_sample, 32);
        assert_eq!(spec.format, WavFormat::Pcm);
        assert_eq!(spec.int_scale(), 2147483647.0);
    }

    #[test]
    fn test_rejects_unsupported_format() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            bits_per_sample: 16,
            format: WavFormat::IeeeFloat,
            ..WavSpec::default()
        };
        let err = write_wav_spec(file.path(), &[0.0], spec).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn test_full_scale_is_clamped() {
        let file = NamedTempFile::new().unwrap();
        write_wav(file.path(), &[1.0, 2.0, -3.0, -1.0], 44100).unwrap();

        let reader = WavReader::open(file.path()).unwrap();
        let raw: Vec<i32> = reader.into_samples::<i32>().map(|s| s.unwrap()).collect();
        assert_eq!(raw, vec![i32::MAX, i32::MAX, -i32::MAX, -i32::MAX]);
    }

    #[test]
    fn test_truncates_toward_zero() {
        let file = NamedTempFile::new().unwrap();
        let spec = WavSpec {
            bits_per_sample: 16,
            ..WavSpec::default()
        };
        // 0.5 * 32767 = 16383.5, -0.5 * 32767 = -16383.5
        write_wav_spec(file.path(), &[0.5, -0.5], spec).unwrap();

        let reader = WavReader::open(file.path()).unwrap();
        let raw: Vec<i32> = reader.into_samples::<i32>().map(|s| s.unwrap()).collect();
        assert_eq!(raw, vec![16383, -16383]);
    }
}
