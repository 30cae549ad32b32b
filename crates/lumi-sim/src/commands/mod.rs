pub mod fit;
pub mod scan;
pub mod synth;

use std::error::Error;
use std::fs;
use std::path::Path;

use lumi_core::ReportProvenance;
use lumi_fit::FitOpts;
use lumi_pmf::MixtureConfig;
use lumi_sim::SourceSpec;
use serde::Serialize;

pub(crate) fn load_source(path: Option<&Path>) -> Result<SourceSpec, Box<dyn Error>> {
    match path {
        Some(path) => Ok(serde_yaml::from_str(&fs::read_to_string(path)?)?),
        None => Ok(SourceSpec::default()),
    }
}

pub(crate) fn load_mixture_config(path: Option<&Path>) -> Result<MixtureConfig, Box<dyn Error>> {
    match path {
        Some(path) => Ok(serde_yaml::from_str(&fs::read_to_string(path)?)?),
        None => Ok(MixtureConfig::default()),
    }
}

pub(crate) fn load_fit_opts(path: Option<&Path>) -> Result<FitOpts, Box<dyn Error>> {
    match path {
        Some(path) => Ok(serde_yaml::from_str(&fs::read_to_string(path)?)?),
        None => Ok(FitOpts::default()),
    }
}

/// Stamps generation metadata shared by every artifact this CLI writes.
pub(crate) fn stamp_provenance(provenance: &mut ReportProvenance) {
    provenance.created_at = chrono::Utc::now().to_rfc3339();
    provenance
        .tool_versions
        .insert("lumi-sim".to_string(), env!("CARGO_PKG_VERSION").to_string());
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
