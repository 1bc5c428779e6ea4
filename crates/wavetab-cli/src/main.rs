//! wavetab CLI - render, inspect and export band-limited wavetables.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "wavetab")]
#[command(author, version, about = "Band-limited wavetable synth", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a patch or a single oscillator to a file
    Render(commands::render::RenderArgs),

    /// Export one band-limited table
    Table(commands::table::TableArgs),

    /// Export a table per MIDI note for every wave type
    Mipmap(commands::mipmap::MipmapArgs),

    /// Print the frequency response of a filter
    Response(commands::response::ResponseArgs),

    /// Compare frequency detuning with resampling detuning
    Compare(commands::compare::CompareArgs),

    /// List, show and export factory patches
    Patches(commands::patches::PatchesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Table(args) => commands::table::run(args),
        Commands::Mipmap(args) => commands::mipmap::run(args),
        Commands::Response(args) => commands::response::run(args),
        Commands::Compare(args) => commands::compare::run(args),
        Commands::Patches(args) => commands::patches::run(args),
    }
}
