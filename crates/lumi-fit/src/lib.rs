#![deny(missing_docs)]
#![doc = "Chi-square estimation of the mean interactions per bunch crossing from a tracks-per-BC histogram."]

pub mod hash;
pub mod least_squares;
pub mod model;
pub mod report;
pub mod serde;

pub use least_squares::{minimize, FitOpts, LeastSquaresOutcome};
pub use model::{FitStart, TracksPerBcModel};
pub use report::{fit_tracks_per_bc, FitReport, FitUncertainties};
