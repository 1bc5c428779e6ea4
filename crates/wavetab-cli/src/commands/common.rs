//! Shared CLI helpers used across multiple commands.

use clap::{Args, ValueEnum};
use std::path::{Path, PathBuf};
use wavetab_config::{Patch, get_factory_patch};
use wavetab_core::{OscillatorKind, SynthConfig, WaveType};

/// Wave types for CLI
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliWave {
    Sine,
    #[value(alias = "tri")]
    Triangle,
    #[default]
    #[value(alias = "saw")]
    Sawtooth,
    Square,
}

impl From<CliWave> for WaveType {
    fn from(w: CliWave) -> Self {
        match w {
            CliWave::Sine => WaveType::Sine,
            CliWave::Triangle => WaveType::Triangle,
            CliWave::Sawtooth => WaveType::Sawtooth,
            CliWave::Square => WaveType::Square,
        }
    }
}

/// Oscillator variants for CLI
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliKind {
    #[default]
    Standard,
    Resampling,
    #[value(alias = "realtime")]
    RealTimeResampling,
}

impl From<CliKind> for OscillatorKind {
    fn from(k: CliKind) -> Self {
        match k {
            CliKind::Standard => OscillatorKind::Standard,
            CliKind::Resampling => OscillatorKind::Resampling,
            CliKind::RealTimeResampling => OscillatorKind::RealTimeResampling,
        }
    }
}

/// Output file formats
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Mono 32-bit integer WAV
    #[default]
    Wav,
    /// Headerless little-endian i32
    Pcm,
}

/// Table synthesis flags shared by the commands that build tables.
#[derive(Args, Clone, Copy, Debug)]
pub struct EngineArgs {
    /// Sample rate in Hz
    #[arg(long, default_value = "44100")]
    pub sample_rate: u32,

    /// Table length (power of two)
    #[arg(long, default_value = "4096")]
    pub table_size: usize,

    /// Disable Lanczos sigma damping
    #[arg(long)]
    pub no_damping: bool,
}

impl EngineArgs {
    /// Validated engine settings.
    pub fn config(&self) -> anyhow::Result<SynthConfig> {
        Ok(SynthConfig::new(f64::from(self.sample_rate), self.table_size)?
            .with_damping(!self.no_damping))
    }
}

/// Write `samples` in `format`.
pub fn write_output(
    path: &Path,
    samples: &[f64],
    format: OutputFormat,
    sample_rate: u32,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Wav => wavetab_io::write_wav(path, samples, sample_rate)?,
        OutputFormat::Pcm => wavetab_io::write_pcm(path, samples)?,
    }
    Ok(())
}

/// Load a patch by factory name or file path.
pub fn load_patch(name: &str) -> anyhow::Result<Patch> {
    if let Some(patch) = get_factory_patch(name) {
        return Ok(patch);
    }

    let path = PathBuf::from(name);
    if path.exists() {
        return Patch::load(&path).map_err(|e| anyhow::anyhow!("{}", e));
    }

    anyhow::bail!(
        "Patch '{}' not found. Use 'wavetab patches list' to see available patches.",
        name
    )
}

/// Sample rate of a patch as a WAV header value.
pub fn wav_rate(sample_rate: f64) -> anyhow::Result<u32> {
    if sample_rate.fract() != 0.0 || sample_rate < 1.0 || sample_rate > f64::from(u32::MAX) {
        anyhow::bail!("sample rate {} cannot be stored in a WAV header", sample_rate);
    }
    Ok(sample_rate as u32)
}
