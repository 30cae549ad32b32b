use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    fit::{self, FitArgs},
    scan::{self, ScanArgs},
    synth::{self, SynthArgs},
};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "lumi-sim", about = "Tracks-per-BC luminosity estimation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a deterministic synthetic tracks-per-BC dataset.
    Synth(SynthArgs),
    /// Fit the mean interaction count to a tracks-per-BC dataset.
    Fit(FitArgs),
    /// Export Poisson-mixture model curves for a list of test mu values.
    Scan(ScanArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    match cli.command {
        Command::Synth(args) => synth::run(&args),
        Command::Fit(args) => fit::run(&args),
        Command::Scan(args) => scan::run(&args),
    }
}
