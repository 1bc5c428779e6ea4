//! Single table export.

use clap::Args;
use std::path::PathBuf;
use wavetab_core::{WaveTable, WaveType};

use super::common::{CliWave, EngineArgs, OutputFormat, write_output};

#[derive(Args)]
pub struct TableArgs {
    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Wave type
    #[arg(long, value_enum, default_value = "sawtooth")]
    wave: CliWave,

    /// Frequency the table is band-limited for, in Hz
    #[arg(long, default_value = "43.65")]
    freq: f64,

    #[command(flatten)]
    engine: EngineArgs,

    /// Output format
    #[arg(long, value_enum, default_value = "pcm")]
    format: OutputFormat,
}

pub fn run(args: TableArgs) -> anyhow::Result<()> {
    let config = args.engine.config()?;
    let wave = WaveType::from(args.wave);
    let table = WaveTable::build(wave, args.freq, &config)?;

    write_output(&args.output, table.samples(), args.format, args.engine.sample_rate)?;

    println!("Table: {} at {:.3} Hz", wave, args.freq);
    println!("  Size:     {}", table.len());
    println!("  Partials: {}", table.num_partials());
    println!("  Damping:  {}", if config.damping { "on" } else { "off" });
    println!("Wrote {}", args.output.display());
    Ok(())
}
