//! Closed violation/issue shapes for the chain-order validator (C10) and the
//! lineage tracker's integrity check (C11).

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use sondeck_core::LineageNodeId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

/// A structured, non-fatal violation: a forbidden stage sequence, a
/// platform-compliance failure, or a cumulative-risk boundary crossing.
/// Shared across the chain-order validator (C10) and the compliance
/// validator so both report the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub severity: ViolationSeverity,
    pub context: String,
    pub description: String,
}

impl Serialize for ViolationSeverity {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ViolationSeverity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// A detected problem with the lineage graph's shape itself, independent of
/// the metrics carried by any individual node.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DataIntegrityIssue {
    #[strum(to_string = "duplicate lineage node id: {0}")]
    DuplicateId(LineageNodeId),
    #[strum(to_string = "orphan parent reference from {child} to missing parent {parent}")]
    OrphanParent { child: LineageNodeId, parent: LineageNodeId },
    #[strum(to_string = "cycle detected in lineage graph, starting at {0}")]
    Cycle(LineageNodeId),
}
