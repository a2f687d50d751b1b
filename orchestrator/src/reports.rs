//! Report content contract, vocabulary sanitizer, and the Reports
//! Repository trait (spec §4.15). Persistence itself is out of scope; this
//! module specifies the trait plus a `HashMap`-backed in-memory
//! implementation purely so the pipeline is exercisable in tests, the same
//! role `MockProbeAdapter` plays for the Probe Adapter contract (§4.1).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sondeck_core::LineageNodeId;
use sondeck_lineage::{LineageTree, NodeState};
use strum::{Display, EnumString};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    Analysis,
    Mixing,
    Editing,
    Mastering,
    Conversion,
    Delivery,
}

/// A job report's content contract (spec §4.15). `confidence` is a
/// caller-supplied `"NN%"` string, validated on construction rather than
/// reconstructed from a float so the exact rendering a report shows a user
/// is what gets persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub report_type: ReportType,
    pub summary: String,
    pub changes_applied: Vec<String>,
    pub rationale: String,
    pub impact_assessment: String,
    pub confidence: String,
    pub limitations: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReportError {
    #[error("confidence must be formatted as \"NN%\" with NN in 0..=100")]
    InvalidConfidenceFormat,
    #[error("report content uses forbidden vocabulary")]
    ForbiddenVocabulary,
}

/// Validates the `"NN%"` confidence format without assuming any particular
/// float rendering produced it.
fn validate_confidence_format(confidence: &str) -> Result<(), ReportError> {
    let digits = confidence.strip_suffix('%').ok_or(ReportError::InvalidConfidenceFormat)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReportError::InvalidConfidenceFormat);
    }
    match digits.parse::<u32>() {
        Ok(value) if value <= 100 => Ok(()),
        _ => Err(ReportError::InvalidConfidenceFormat),
    }
}

/// Manipulation-implying terms a report must never use, each paired with
/// an approved, non-deceptive substitute. The domain concern is a report
/// that frames a processing decision as fooling or hiding something from
/// the listener rather than describing what the processing actually does.
const FORBIDDEN_VOCABULARY: &[(&str, &str)] = &[
    ("trick the ear", "create the impression"),
    ("trick the listener", "create the impression for the listener"),
    ("fool the listener", "create the impression for the listener"),
    ("deceive", "shape the perception of"),
    ("hide the", "reduce the audibility of the"),
    ("conceal", "reduce the audibility of"),
    ("disguise", "blend"),
    ("cheat", "work around"),
    ("manipulate the listener", "shape the listener's perception"),
];

fn find_forbidden_terms(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    FORBIDDEN_VOCABULARY.iter().filter(|(term, _)| lower.contains(term)).map(|(term, _)| *term).collect()
}

fn sanitize_text(text: &str) -> String {
    let mut result = text.to_string();
    for (term, substitute) in FORBIDDEN_VOCABULARY {
        let lower_result = result.to_lowercase();
        if let Some(start) = lower_result.find(term) {
            let end = start + term.len();
            result.replace_range(start..end, substitute);
        }
    }
    result
}

impl Report {
    /// Validates the confidence format and scans every text field for
    /// forbidden vocabulary.
    pub fn validate(&self) -> Result<(), ReportError> {
        validate_confidence_format(&self.confidence)?;

        let mut fields: Vec<&str> = vec![&self.summary, &self.rationale, &self.impact_assessment];
        fields.extend(self.changes_applied.iter().map(String::as_str));
        if let Some(limitations) = &self.limitations {
            fields.push(limitations);
        }

        if fields.iter().any(|text| !find_forbidden_terms(text).is_empty()) {
            return Err(ReportError::ForbiddenVocabulary);
        }
        Ok(())
    }

    /// Replaces every forbidden term across all text fields with its
    /// approved substitute, leaving everything else untouched.
    #[must_use]
    pub fn sanitized(&self) -> Self {
        Self {
            report_type: self.report_type,
            summary: sanitize_text(&self.summary),
            changes_applied: self.changes_applied.iter().map(|c| sanitize_text(c)).collect(),
            rationale: sanitize_text(&self.rationale),
            impact_assessment: sanitize_text(&self.impact_assessment),
            confidence: self.confidence.clone(),
            limitations: self.limitations.as_deref().map(sanitize_text),
        }
    }
}

/// One lineage node's position in an asset's ancestry, with the report ids
/// filed against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageReportNode {
    pub node_id: LineageNodeId,
    pub state: NodeState,
    pub report_ids: Vec<Uuid>,
}

/// An asset's full ancestry, root first, each node annotated with the
/// report ids filed against it (spec §4.15/§4.11).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLineageReport {
    pub asset_id: LineageNodeId,
    pub chain: Vec<LineageReportNode>,
}

#[async_trait]
pub trait ReportsRepository: Send + Sync {
    async fn put_report(&self, asset_id: LineageNodeId, report: Report) -> Result<Uuid, ReportError>;
    async fn get_report(&self, report_id: Uuid) -> Option<Report>;
    async fn get_asset_lineage(&self, tree: &LineageTree, asset_id: LineageNodeId) -> Option<AssetLineageReport>;
}

/// `HashMap`-backed implementation provided purely so the trait and the
/// validator/sanitizer pipeline are exercisable in tests.
#[derive(Default)]
pub struct InMemoryReportsRepository {
    reports: Mutex<HashMap<Uuid, Report>>,
    by_asset: Mutex<HashMap<LineageNodeId, Vec<Uuid>>>,
}

impl InMemoryReportsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReportsRepository for InMemoryReportsRepository {
    async fn put_report(&self, asset_id: LineageNodeId, report: Report) -> Result<Uuid, ReportError> {
        report.validate()?;
        let id = Uuid::new_v4();
        self.reports.lock().expect("reports mutex poisoned").insert(id, report);
        self.by_asset.lock().expect("by_asset mutex poisoned").entry(asset_id).or_default().push(id);
        Ok(id)
    }

    async fn get_report(&self, report_id: Uuid) -> Option<Report> {
        self.reports.lock().expect("reports mutex poisoned").get(&report_id).cloned()
    }

    async fn get_asset_lineage(&self, tree: &LineageTree, asset_id: LineageNodeId) -> Option<AssetLineageReport> {
        let mut idx = tree.idx_of(asset_id)?;
        let by_asset = self.by_asset.lock().expect("by_asset mutex poisoned");

        let mut chain = Vec::new();
        loop {
            let node = tree.node(idx);
            chain.push(LineageReportNode {
                node_id: node.id,
                state: tree.state_of(idx),
                report_ids: by_asset.get(&node.id).cloned().unwrap_or_default(),
            });
            match node.parent_id.and_then(|parent_id| tree.idx_of(parent_id)) {
                Some(parent_idx) => idx = parent_idx,
                None => break,
            }
        }
        chain.reverse();

        Some(AssetLineageReport { asset_id, chain })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sondeck_lineage::{build_lineage_tree, LineageNode};

    fn sample_report() -> Report {
        Report {
            report_type: ReportType::Mastering,
            summary: "Applied gentle limiting to control peaks.".to_string(),
            changes_applied: vec!["raised integrated loudness by 1.2 LU".to_string()],
            rationale: "target platform requires -14 LUFS".to_string(),
            impact_assessment: "no audible artifacts introduced".to_string(),
            confidence: "92%".to_string(),
            limitations: None,
        }
    }

    #[test]
    fn well_formed_report_validates() {
        assert!(sample_report().validate().is_ok());
    }

    #[test]
    fn malformed_confidence_is_rejected() {
        let mut report = sample_report();
        report.confidence = "92".to_string();
        assert_eq!(report.validate(), Err(ReportError::InvalidConfidenceFormat));

        report.confidence = "150%".to_string();
        assert_eq!(report.validate(), Err(ReportError::InvalidConfidenceFormat));
    }

    #[test]
    fn forbidden_vocabulary_is_rejected_and_then_sanitized() {
        let mut report = sample_report();
        report.rationale = "this is designed to trick the ear into perceiving more loudness".to_string();
        assert_eq!(report.validate(), Err(ReportError::ForbiddenVocabulary));

        let sanitized = report.sanitized();
        assert!(sanitized.validate().is_ok());
        assert!(sanitized.rationale.contains("create the impression"));
    }

    #[tokio::test]
    async fn put_then_get_report_round_trips() {
        let repo = InMemoryReportsRepository::new();
        let asset_id = LineageNodeId::new();
        let id = repo.put_report(asset_id, sample_report()).await.unwrap();
        let fetched = repo.get_report(id).await.unwrap();
        assert_eq!(fetched.report_type, ReportType::Mastering);
    }

    #[tokio::test]
    async fn asset_lineage_walks_parent_chain_root_first_with_report_ids() {
        let root_id = LineageNodeId::new();
        let child_id = LineageNodeId::new();
        let nodes = vec![
            LineageNode { id: root_id, parent_id: None, metrics: None, operations: Vec::new(), created_at: chrono::Utc::now(), sample_rate_hz: Some(48_000) },
            LineageNode { id: child_id, parent_id: Some(root_id), metrics: None, operations: Vec::new(), created_at: chrono::Utc::now(), sample_rate_hz: Some(48_000) },
        ];
        let tree = build_lineage_tree(nodes).unwrap();

        let repo = InMemoryReportsRepository::new();
        repo.put_report(child_id, sample_report()).await.unwrap();

        let lineage = repo.get_asset_lineage(&tree, child_id).await.unwrap();
        assert_eq!(lineage.chain.len(), 2);
        assert_eq!(lineage.chain[0].node_id, root_id);
        assert_eq!(lineage.chain[1].node_id, child_id);
        assert_eq!(lineage.chain[1].report_ids.len(), 1);
    }
}
