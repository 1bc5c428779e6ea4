//! Mipmap export: one table per MIDI note for every wave type.

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use wavetab_io::{MIDI_NOTE_COUNT, Mipmap, MipmapLayout};

use super::common::EngineArgs;

/// Table layouts for CLI
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum CliLayout {
    /// 128 tables for every wave type
    #[default]
    Full,
    /// One sine table, then 128 each for triangle, sawtooth and square
    SingleSine,
}

impl From<CliLayout> for MipmapLayout {
    fn from(l: CliLayout) -> Self {
        match l {
            CliLayout::Full => MipmapLayout::Full,
            CliLayout::SingleSine => MipmapLayout::SingleSine,
        }
    }
}

#[derive(Args)]
pub struct MipmapArgs {
    /// Output raw PCM file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Table layout
    #[arg(long, value_enum, default_value = "full")]
    layout: CliLayout,

    #[command(flatten)]
    engine: EngineArgs,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

pub fn run(args: MipmapArgs) -> anyhow::Result<()> {
    let config = args.engine.config()?;
    let layout = MipmapLayout::from(args.layout);

    let pb = if args.quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(layout.table_count() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tables ({eta})")?
            .progress_chars("##-"),
    );

    let mipmap = Mipmap::build_with(&config, layout, |done, _| pb.set_position(done as u64))?;
    pb.finish_and_clear();

    mipmap.write_pcm(&args.output)?;

    println!(
        "Wrote {} tables x {} samples ({} notes per wave) to {}",
        mipmap.len(),
        config.table_size,
        MIDI_NOTE_COUNT,
        args.output.display()
    );
    Ok(())
}
