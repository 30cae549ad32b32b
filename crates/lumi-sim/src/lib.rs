#![deny(missing_docs)]
#![doc = "Synthetic tracks-per-BC data generation and source-PMF specifications for the lumi CLI."]

pub mod generator;
pub mod source_spec;

pub use generator::{generate, TracksDataset};
pub use source_spec::SourceSpec;
