//! Closed vocabularies shared by more than one component.
//!
//! Per spec §9 ("Closed vocabularies... new values require an explicit
//! version bump; parsers treat unknown values as errors"), these are plain
//! enums rather than open strings, and derive `strum`'s `EnumString`/
//! `Display` so (de)serialization from config/report text round-trips
//! through a closed match rather than silently accepting anything.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Severity ladder used by validation violations, problems, and fatal errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

/// Closed category table for fatal, user-visible errors (spec §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ErrorCategory {
    Ingestion,
    Analysis,
    Compliance,
    Lineage,
    Inference,
}

/// Closed category table for orchestrator-level problems (spec §4.13).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum ProblemCategory {
    Loudness,
    Dynamics,
    Spectral,
    Stereo,
    Temporal,
    Codec,
    Translation,
    Integrity,
}

/// A fatal, user-visible error shape (spec §7): `{ code, category, severity,
/// description, recommendation }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FatalError {
    pub code: &'static str,
    pub category: ErrorCategory,
    pub severity: Severity,
    pub description: String,
    pub recommendation: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn severity_orders_info_below_critical() {
        assert!(Severity::Info < Severity::Critical);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn severity_round_trips_through_display_and_from_str() {
        for s in [Severity::Info, Severity::Warning, Severity::Error, Severity::Critical] {
            let rendered = s.to_string();
            assert_eq!(Severity::from_str(&rendered).unwrap(), s);
        }
    }

    #[test]
    fn unknown_category_string_is_rejected() {
        assert!(ErrorCategory::from_str("NOT_A_CATEGORY").is_err());
    }
}
