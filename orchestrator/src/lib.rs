//! The orchestrator crate ties every other crate together (spec §4.13-§4.15):
//! analyzer fan-out and problem identification (C13), a batch pressure-test
//! harness (C14), and the reports repository contract (C15), plus the
//! process-wide configuration (§6) and fatal ingestion-error taxonomy (§7)
//! that sit in front of all of it.

pub mod bundle;
pub mod cancellation;
pub mod config;
pub mod errors;
pub mod orchestrate;
pub mod pressure_test;
pub mod problems;
pub mod reports;
pub mod signals;

pub use bundle::{AnalyzerOptions, AnalyzerOutcome, MeasurementBundle, NormalizationInfo};
pub use cancellation::CancellationToken;
pub use config::Settings;
pub use errors::{IngestionError, IngestionResult};
pub use orchestrate::{analyze_audio, analyze_audio_with_normalization, AnalysisReport, OrchestrationError};
pub use pressure_test::{run as run_pressure_test, sample_catalog, scan_catalog, ConfidenceTier, FileOutcome, PressureTestConfig, PressureTestError, PressureTestReport};
pub use problems::{identify_problems, Problem, ProblemCode};
pub use reports::{AssetLineageReport, InMemoryReportsRepository, LineageReportNode, Report, ReportError, ReportType, ReportsRepository};
pub use signals::{risk_scores, signal_vector};
