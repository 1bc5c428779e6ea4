//! Patch commands: list, show and export.

use clap::{Args, Subcommand};
use std::path::PathBuf;
use wavetab_config::{Patch, factory_patch_names, factory_patches};

use super::common::load_patch;

#[derive(Args)]
pub struct PatchesArgs {
    #[command(subcommand)]
    command: PatchesCommand,
}

#[derive(Subcommand)]
enum PatchesCommand {
    /// List factory patches
    List,

    /// Show details of a patch
    Show {
        /// Patch name or path
        name: String,
    },

    /// Write a patch to a TOML file for editing
    Export {
        /// Patch name or path
        name: String,

        /// Destination file
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Check a patch file without rendering it
    Validate {
        /// Patch name or path
        name: String,
    },
}

pub fn run(args: PatchesArgs) -> anyhow::Result<()> {
    match args.command {
        PatchesCommand::List => list_patches(),
        PatchesCommand::Show { name } => show_patch(&name),
        PatchesCommand::Export {
            name,
            output,
            force,
        } => export_patch(&name, output, force),
        PatchesCommand::Validate { name } => validate_patch(&name),
    }
}

fn list_patches() -> anyhow::Result<()> {
    println!("Factory Patches:");
    println!("================");
    for (id, patch) in factory_patch_names().iter().zip(factory_patches()) {
        let desc = patch.description.as_deref().unwrap_or("");
        println!("  {:20} - {}", id, desc);
    }
    Ok(())
}

fn show_patch(name: &str) -> anyhow::Result<()> {
    let patch = load_patch(name)?;
    print_patch(&patch);
    Ok(())
}

fn print_patch(patch: &Patch) {
    println!("Patch: {}", patch.name);
    if let Some(desc) = &patch.description {
        println!("  {}", desc);
    }
    println!();
    println!("  Sample rate: {} Hz", patch.sample_rate);
    println!("  Table size:  {}", patch.table_size);
    println!("  Damping:     {}", if patch.damping { "on" } else { "off" });
    println!("  Duration:    {} s", patch.duration);
    println!();
    println!("  Layers:");
    for (i, layer) in patch.layers.iter().enumerate() {
        println!(
            "    {}. {} ({}) {} Hz, {:+} cents, level {}",
            i + 1,
            layer.wave,
            layer.kind,
            layer.frequency,
            layer.detune,
            layer.level
        );
    }
    if !patch.filters.is_empty() {
        println!("  Filters:");
        for (i, filter) in patch.filters.iter().enumerate() {
            println!("    {}. {:?}", i + 1, filter);
        }
    }
}

fn export_patch(name: &str, output: PathBuf, force: bool) -> anyhow::Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "'{}' already exists. Use --force to overwrite.",
            output.display()
        );
    }
    let patch = load_patch(name)?;
    patch.save(&output)?;
    println!("Exported '{}' to {}", patch.name, output.display());
    Ok(())
}

fn validate_patch(name: &str) -> anyhow::Result<()> {
    let patch = load_patch(name)?;
    patch.validate()?;
    println!(
        "'{}' is valid: {} layer(s), {} filter(s), {} samples",
        patch.name,
        patch.layers.len(),
        patch.filters.len(),
        patch.num_samples()
    );
    Ok(())
}
