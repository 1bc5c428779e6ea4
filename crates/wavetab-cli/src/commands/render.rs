//! Render command: a patch, or one oscillator described by flags.

use clap::Args;
use std::path::PathBuf;
use wavetab_analysis::{peak, rms};
use wavetab_config::{LayerConfig, Patch};

use super::common::{CliKind, CliWave, EngineArgs, OutputFormat, load_patch, wav_rate, write_output};

#[derive(Args)]
pub struct RenderArgs {
    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Factory patch name or patch file; the oscillator flags are ignored
    #[arg(short, long)]
    patch: Option<String>,

    /// Wave type
    #[arg(long, value_enum, default_value = "sawtooth")]
    wave: CliWave,

    /// Oscillator variant
    #[arg(long, value_enum, default_value = "standard")]
    kind: CliKind,

    /// Frequency in Hz
    #[arg(long, default_value = "43.65")]
    freq: f64,

    /// Detune in cents
    #[arg(long, default_value = "0.0", allow_hyphen_values = true)]
    detune: f64,

    /// Output level
    #[arg(long, default_value = "1.0")]
    level: f64,

    /// Duration in seconds (overrides the patch's)
    #[arg(short, long)]
    duration: Option<f64>,

    #[command(flatten)]
    engine: EngineArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "wav")]
    format: OutputFormat,
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let mut patch = match &args.patch {
        Some(name) => load_patch(name)?,
        None => {
            let layer = LayerConfig::new(args.wave.into(), args.freq)
                .with_kind(args.kind.into())
                .with_detune(args.detune)
                .with_level(args.level);
            Patch::new("Command Line")
                .with_sample_rate(f64::from(args.engine.sample_rate))
                .with_table_size(args.engine.table_size)
                .with_damping(!args.engine.no_damping)
                .with_layer(layer)
        }
    };
    if let Some(duration) = args.duration {
        patch.duration = duration;
    }

    println!("Rendering '{}'", patch.name);
    for layer in &patch.layers {
        println!(
            "  {:8} {:20} {:>9.3} Hz {:>+7.2} cents  level {:.3}",
            layer.wave.name(),
            layer.kind.name(),
            layer.frequency,
            layer.detune,
            layer.level
        );
    }
    for filter in &patch.filters {
        println!("  filter: {}", filter.name());
    }

    let samples = patch.render()?;
    let sample_rate = wav_rate(patch.sample_rate)?;
    write_output(&args.output, &samples, args.format, sample_rate)?;

    println!();
    println!(
        "Wrote {} samples ({:.2}s at {} Hz) to {}",
        samples.len(),
        samples.len() as f64 / patch.sample_rate,
        sample_rate,
        args.output.display()
    );
    println!("  Peak: {:.4}, RMS: {:.4}", peak(&samples), rms(&samples));
    if peak(&samples) > 1.0 {
        tracing::warn!("output exceeds full scale and was clipped on export");
    }
    Ok(())
}
