#![deny(missing_docs)]
#![doc = "Discrete PMFs, convolution and Poisson-weighted interaction mixtures for per-bunch-crossing track counts."]

pub mod convolve;
pub mod discretize;
pub mod mixture;
pub mod pmf;
pub mod poisson;

pub use convolve::convolve;
pub use discretize::discretize;
pub use mixture::{InteractionPmfTable, MixtureConfig};
pub use pmf::{DiscretePmf, NORMALIZATION_TOLERANCE};
pub use poisson::{log_weight, poisson_weights};
