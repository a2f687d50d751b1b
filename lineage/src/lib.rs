//! Cumulative processing risk (C9), stage-order validation (C10), and an
//! arena-based asset lineage tracker with delta/pattern analysis (C11).

pub mod chain_order;
pub mod cumulative_risk;
pub mod delta;
pub mod errors;
pub mod stage;
pub mod tracker;

pub use chain_order::{validate_chain, validate_proposed_preset, ProposedPresetValidation, ValidationStatus};
pub use cumulative_risk::{
    calculate_risk, category_counts, category_over_limits, evaluate_proposed_job, CategoryOverLimit, HeadroomFlags,
    PresetCategory, ProcessingChainEntry, ProposedJobEvaluation, RiskLevel, RiskReport,
};
pub use delta::{calculate_delta, infer_transformation, DeltaSeverity, LineageMetric, MetricDelta, MetricSnapshot, TransformationInference, TransformationPattern};
pub use errors::{DataIntegrityIssue, ValidationViolation, ViolationSeverity};
pub use stage::{build_optimal_order, Stage, NON_REPEATABLE, SAFE_ORDER};
pub use tracker::{analyze_lineage_health, build_lineage_tree, validate_integrity, EdgeHealth, EdgeReport, HealthReport, LineageNode, LineagePattern, LineageTree, NodeIdx, NodeState, QualityTrend};
