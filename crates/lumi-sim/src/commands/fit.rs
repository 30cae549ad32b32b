use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use lumi_fit::{fit_tracks_per_bc, serde::report_to_json};
use lumi_pmf::InteractionPmfTable;
use lumi_sim::TracksDataset;

use super::{load_fit_opts, load_mixture_config, load_source, stamp_provenance};

#[derive(Args, Debug)]
pub struct FitArgs {
    /// Tracks-per-BC dataset produced by `lumi-sim synth` or hand-assembled
    /// from measured data.
    #[arg(long)]
    pub data: PathBuf,
    /// YAML description of the single-interaction track PMF.
    #[arg(long)]
    pub source: Option<PathBuf>,
    /// YAML mixture configuration (track range, interaction cap).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// YAML minimizer options.
    #[arg(long)]
    pub opts: Option<PathBuf>,
    /// Output directory for the fit report.
    #[arg(long)]
    pub out: PathBuf,
}

/// Fits `(mu, norm)` to the dataset and writes `fit_report.json`.
pub fn run(args: &FitArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let dataset: TracksDataset = serde_json::from_str(&fs::read_to_string(&args.data)?)?;
    let source_spec = load_source(args.source.as_deref())?;
    let config = load_mixture_config(args.config.as_deref())?;
    let opts = load_fit_opts(args.opts.as_deref())?;
    let source = source_spec.build()?;
    let table = InteractionPmfTable::build(&source, &config)?;

    let mut report = fit_tracks_per_bc(&table, &dataset.counts, &opts)?;
    report.provenance.seed = dataset.provenance.seed;
    stamp_provenance(&mut report.provenance);

    let report_path = args.out.join("fit_report.json");
    fs::write(&report_path, report_to_json(&report)?)?;

    println!("{}", report.summary());
    if let Some(mu_true) = dataset.mu_true {
        println!("true mu was {mu_true}");
    }
    println!("report written to {}", report_path.display());
    Ok(())
}
