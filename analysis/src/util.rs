//! Shared helpers used by more than one analyzer.

use serde::{Deserialize, Serialize};

/// Resolves the peak value an analyzer should report given both candidate
/// readings, per the Open Question resolved in §9: true peak is preferred
/// whenever the probe produced one, with sample peak as the only fallback
/// (never averaged, never the stricter of the two).
#[must_use]
pub fn resolve_peak(sample_peak_dbfs: Option<f64>, true_peak_dbtp: Option<f64>) -> Option<f64> {
    true_peak_dbtp.or(sample_peak_dbfs)
}

/// Generic pass/fail summary returned by every analyzer's `quick_check`.
///
/// Analyzers have heterogeneous full-result shapes (per §4.2), but the
/// short form the orchestrator uses for a cheap pre-flight pass is uniform:
/// a status label, whether it should gate further processing, and an
/// optional human-readable note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortResult {
    pub status: String,
    pub passed: bool,
    pub note: Option<String>,
}

impl ShortResult {
    #[must_use]
    pub fn ok(status: impl Into<String>) -> Self {
        Self { status: status.into(), passed: true, note: None }
    }

    #[must_use]
    pub fn failing(status: impl Into<String>, note: impl Into<String>) -> Self {
        Self { status: status.into(), passed: false, note: Some(note.into()) }
    }

    #[must_use]
    pub fn unknown(note: impl Into<String>) -> Self {
        Self { status: "UNKNOWN".to_string(), passed: false, note: Some(note.into()) }
    }
}
