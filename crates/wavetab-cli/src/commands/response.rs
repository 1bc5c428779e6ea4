//! Filter frequency response command.

use clap::{Args, Subcommand};
use std::f64::consts::PI;
use std::fmt::Write as _;
use std::path::PathBuf;
use wavetab_analysis::{
    FrequencyResponse, allpass_snapshot_response, biquad_response, lerp_response,
};
use wavetab_core::{BiquadCoefficients, Filter, ModulatedAllpass};

#[derive(Args)]
pub struct ResponseArgs {
    #[command(subcommand)]
    command: ResponseCommand,

    /// Number of frequency points
    #[arg(long, default_value = "512", global = true)]
    points: usize,

    /// Sample rate in Hz
    #[arg(long, default_value = "44100", global = true)]
    sample_rate: f64,

    /// Write `frequency,magnitude_db,phase` rows to a CSV file
    #[arg(long, global = true)]
    csv: Option<PathBuf>,
}

#[derive(Subcommand)]
enum ResponseCommand {
    /// Second-order allpass
    Biquad {
        /// Center frequency in Hz
        #[arg(long, default_value = "8040.0")]
        freq: f64,

        /// Quality factor
        #[arg(short, long, default_value = "1.0")]
        q: f64,
    },

    /// First-order modulated allpass, frozen after a number of samples
    Modulated {
        /// Coefficient offset in [0, 1]
        #[arg(long, default_value = "0.5")]
        offset: f64,

        /// Modulation depth
        #[arg(long, default_value = "1.0")]
        amplitude: f64,

        /// Modulation rate in Hz
        #[arg(long, default_value = "64000.0")]
        rate: f64,

        /// Samples to run before taking the snapshot
        #[arg(long, default_value = "0")]
        at: usize,
    },

    /// Linear interpolation at a fixed fractional offset
    Lerp {
        /// Fractional offset in [0, 1]
        #[arg(long, default_value = "0.5")]
        alpha: f64,
    },
}

pub fn run(args: ResponseArgs) -> anyhow::Result<()> {
    let response = match args.command {
        ResponseCommand::Biquad { freq, q } => {
            let coefficients = BiquadCoefficients::allpass(args.sample_rate, freq, q)?;
            println!("Biquad allpass: f0 = {:.1} Hz, Q = {:.3}", freq, q);
            let response = biquad_response(&coefficients, args.points, args.sample_rate);
            match response.phase_crossing(-PI) {
                Some(f) => println!("  Phase crosses -pi at {:.1} Hz", f),
                None => println!("  Phase never reaches -pi on the grid"),
            }
            response
        }
        ResponseCommand::Modulated {
            offset,
            amplitude,
            rate,
            at,
        } => {
            let mut filter = ModulatedAllpass::new(args.sample_rate, offset, amplitude, rate)?;
            for _ in 0..at {
                filter.process(0.0);
            }
            println!(
                "Modulated allpass: offset {:.3}, amplitude {:.3}, rate {:.1} Hz",
                offset, amplitude, rate
            );
            println!("  Coefficient after {} samples: {:.6}", at, filter.coefficient());
            allpass_snapshot_response(&filter, args.points)
        }
        ResponseCommand::Lerp { alpha } => {
            if !(0.0..=1.0).contains(&alpha) {
                anyhow::bail!("alpha must be in [0, 1], got {}", alpha);
            }
            println!("Linear interpolation: alpha = {:.3}", alpha);
            lerp_response(alpha, args.points, args.sample_rate)
        }
    };

    print_summary(&response);

    if let Some(path) = &args.csv {
        std::fs::write(path, to_csv(&response))?;
        println!("Wrote {} points to {}", response.len(), path.display());
    }
    Ok(())
}

fn print_summary(response: &FrequencyResponse) {
    let magnitude = response.magnitude_db();
    let (min, max) = magnitude
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &m| (lo.min(m), hi.max(m)));
    println!("  Magnitude: {:.3} dB to {:.3} dB", min, max);

    if let Some(&last) = response.unwrapped_phase().last() {
        println!("  Phase at {:.1} Hz: {:.4} rad", response.frequencies[response.len() - 1], last);
    }
}

fn to_csv(response: &FrequencyResponse) -> String {
    let mut csv = String::from("frequency,magnitude_db,phase\n");
    let magnitude = response.magnitude_db();
    let phase = response.unwrapped_phase();
    for ((f, m), p) in response.frequencies.iter().zip(&magnitude).zip(&phase) {
        let _ = writeln!(csv, "{f},{m},{p}");
    }
    csv
}
