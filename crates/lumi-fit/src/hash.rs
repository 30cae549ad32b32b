//! Canonical hashing helpers for fit artifacts.

use lumi_core::errors::ErrorInfo;
use lumi_core::LumiError;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::serde::to_canonical_json_bytes;

/// Computes a stable hexadecimal hash for the provided serialisable payload.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, LumiError> {
    let bytes = to_canonical_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{:x}", digest))
}

/// Rounds a floating point value to the canonical precision used in hashed
/// payloads, so that sub-tolerance float noise does not change report hashes.
pub fn round_f64(value: f64) -> f64 {
    let scaled = (value * 1e9).round();
    scaled / 1e9
}

/// Converts an error into the canonical serde family with a code.
pub(crate) fn serde_error(code: &str, err: impl ToString) -> LumiError {
    LumiError::Serde(ErrorInfo::new(code, err.to_string()))
}
