use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use lumi_fit::hash::stable_hash_string;
use lumi_pmf::InteractionPmfTable;
use lumi_sim::generator;

use super::{load_mixture_config, load_source, stamp_provenance, write_json};

#[derive(Args, Debug)]
pub struct SynthArgs {
    /// True mean interaction count to simulate.
    #[arg(long)]
    pub mu: f64,
    /// Number of bunch crossings to generate.
    #[arg(long, default_value_t = 10_000)]
    pub events: usize,
    /// Deterministic master seed.
    #[arg(long)]
    pub seed: u64,
    /// YAML description of the single-interaction track PMF.
    #[arg(long)]
    pub source: Option<PathBuf>,
    /// YAML mixture configuration (track range, interaction cap).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output directory for the dataset.
    #[arg(long)]
    pub out: PathBuf,
}

/// Generates a synthetic dataset and writes it as `data.json`.
pub fn run(args: &SynthArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let source_spec = load_source(args.source.as_deref())?;
    let config = load_mixture_config(args.config.as_deref())?;
    let source = source_spec.build()?;
    let table = InteractionPmfTable::build(&source, &config)?;

    let mut dataset = generator::generate(&table, args.mu, args.events, args.seed)?;
    dataset.provenance.source_hash = stable_hash_string(&table.base().as_slice())?;
    stamp_provenance(&mut dataset.provenance);

    let data_path = args.out.join("data.json");
    write_json(&data_path, &dataset)?;
    if let Some(source_path) = &args.source {
        fs::copy(source_path, args.out.join("source.yaml")).ok();
    }

    println!(
        "generated {} bunch crossings at mu = {} ({} overflow) -> {}",
        args.events,
        args.mu,
        dataset.overflow,
        data_path.display()
    );
    Ok(())
}
