use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Args;
use lumi_pmf::InteractionPmfTable;

use super::{load_mixture_config, load_source};

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Test mu values to export model curves for.
    #[arg(long, value_delimiter = ',', default_values_t = vec![24.0, 27.0, 30.0])]
    pub mus: Vec<f64>,
    /// YAML description of the single-interaction track PMF.
    #[arg(long)]
    pub source: Option<PathBuf>,
    /// YAML mixture configuration (track range, interaction cap).
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Output directory for the scan table.
    #[arg(long)]
    pub out: PathBuf,
}

/// Exports the normalized tracks-per-BC model curve for each test mu as a
/// CSV table, one row per track bin and one column per mu.
pub fn run(args: &ScanArgs) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&args.out)?;
    let source_spec = load_source(args.source.as_deref())?;
    let config = load_mixture_config(args.config.as_deref())?;
    let source = source_spec.build()?;
    let table = InteractionPmfTable::build(&source, &config)?;

    let mut curves = Vec::with_capacity(args.mus.len());
    for &mu in &args.mus {
        let curve = table.poisson_mixture(mu)?.normalized()?;
        curves.push(curve);
    }

    let scan_path = args.out.join("scan.csv");
    let mut writer = csv::Writer::from_path(&scan_path)?;
    let mut header = vec!["tracks".to_string()];
    header.extend(args.mus.iter().map(|mu| format!("mu_{mu}")));
    writer.write_record(&header)?;
    for bin in 0..config.track_bins() {
        let mut record = vec![bin.to_string()];
        record.extend(curves.iter().map(|curve| curve.prob(bin).to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!(
        "scan over {} mu values written to {}",
        args.mus.len(),
        scan_path.display()
    );
    Ok(())
}
