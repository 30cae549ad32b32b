//! Discrete convolution of integer-valued PMFs.

use lumi_core::errors::ErrorInfo;
use lumi_core::LumiError;

use crate::pmf::DiscretePmf;

/// PMF of the sum of two independent integer-valued random variables.
///
/// `out[k] = sum_{i=0..=k} a[i] * b[k-i]` for `k` in `0..len(a)`. The output
/// keeps the input length, so mass that would land beyond `max_value` is
/// silently dropped (an accepted approximation, not an error). The result is
/// not renormalized; callers normalize afterwards.
///
/// Inputs must have equal length. A mismatch indicates a configuration bug
/// (e.g. a track range changed between table entries) and is fatal.
pub fn convolve(a: &DiscretePmf, b: &DiscretePmf) -> Result<DiscretePmf, LumiError> {
    if a.len() != b.len() {
        return Err(LumiError::Pmf(
            ErrorInfo::new("length-mismatch", "convolution inputs must have equal length")
                .with_context("left", a.len().to_string())
                .with_context("right", b.len().to_string())
                .with_hint("build all PMFs from a single MixtureConfig"),
        ));
    }

    let left = a.as_slice();
    let right = b.as_slice();
    let mut out = vec![0.0; left.len()];
    for (k, slot) in out.iter_mut().enumerate() {
        let mut acc = 0.0;
        for i in 0..=k {
            acc += left[i] * right[k - i];
        }
        *slot = acc;
    }
    DiscretePmf::from_probabilities(out)
}
