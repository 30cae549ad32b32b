#![deny(missing_docs)]
#![doc = "Core error, provenance and RNG types shared by the lumi luminosity-estimation crates."]

pub mod errors;
pub mod provenance;
pub mod rng;

pub use errors::{ErrorInfo, LumiError};
pub use provenance::{ReportProvenance, SchemaVersion};
pub use rng::{derive_substream_seed, RngHandle};
