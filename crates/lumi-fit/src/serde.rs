//! Canonical JSON serde helpers for fit reports.

use lumi_core::LumiError;
use serde::Serialize;

use crate::hash::serde_error;
use crate::report::FitReport;

/// Serialises a payload to canonical JSON bytes.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, LumiError> {
    serde_json::to_vec(value).map_err(|err| serde_error("canonical-serialize", err))
}

/// Serialises a fit report to pretty JSON.
pub fn report_to_json(report: &FitReport) -> Result<String, LumiError> {
    serde_json::to_string_pretty(report).map_err(|err| serde_error("fit-report-serialize", err))
}

/// Restores a fit report from JSON.
pub fn report_from_json(json: &str) -> Result<FitReport, LumiError> {
    serde_json::from_str(json).map_err(|err| serde_error("fit-report-deserialize", err))
}
