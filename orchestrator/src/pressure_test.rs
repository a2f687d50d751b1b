//! Batch pressure-testing harness (spec §4.14): scans a catalog directory,
//! optionally samples it, runs the full orchestrator over every file, and
//! aggregates outcomes for a human reviewing model behavior at scale.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sondeck_classifier::{classify, StyleTag};
use sondeck_decision::{decide, weighted_confidence};
use sondeck_probe::ProbeAdapter;
use strum::{Display, EnumIter, EnumString};
use walkdir::WalkDir;

use crate::bundle::AnalyzerOptions;
use crate::cancellation::CancellationToken;
use crate::orchestrate::{analyze_audio, OrchestrationError};
use crate::signals::{risk_scores, signal_vector};

/// The allowlisted audio container extensions (spec §6), matched
/// case-insensitively.
const ACCEPTED_EXTENSIONS: &[&str] = &["wav", "mp3", "flac", "aac", "m4a", "ogg", "aiff"];

#[must_use]
fn has_accepted_extension(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ACCEPTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// Walks `dir` and returns every accepted audio file, sorted for a stable
/// starting order before any sampling is applied.
#[must_use]
pub fn scan_catalog(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| has_accepted_extension(path))
        .collect();
    files.sort();
    files
}

/// Samples `count` files from `catalog` uniformly without replacement,
/// seeded so the same `(catalog, count, seed)` always yields the same
/// sample. Returns the full catalog, sorted, if `count` exceeds its size.
#[must_use]
pub fn sample_catalog(catalog: &[PathBuf], count: usize, seed: u64) -> Vec<PathBuf> {
    if count >= catalog.len() {
        let mut all = catalog.to_vec();
        all.sort();
        return all;
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sampled: Vec<PathBuf> = catalog.choose_multiple(&mut rng, count).cloned().collect();
    sampled.sort();
    sampled
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum ConfidenceTier {
    High,
    Good,
    Moderate,
    Low,
    #[strum(serialize = "VERY_LOW")]
    VeryLow,
}

impl ConfidenceTier {
    #[must_use]
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence >= 0.85 {
            Self::High
        } else if confidence >= 0.70 {
            Self::Good
        } else if confidence >= 0.55 {
            Self::Moderate
        } else if confidence >= 0.40 {
            Self::Low
        } else {
            Self::VeryLow
        }
    }

    #[must_use]
    pub const fn is_low(self) -> bool {
        matches!(self, Self::Low | Self::VeryLow)
    }
}

/// One file's run through C13 -> C3 -> C4.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub style: StyleTag,
    pub confidence: f64,
    pub tier: ConfidenceTier,
    pub applied_rule_ids: Vec<&'static str>,
    pub analysis_time_ms: u64,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PressureTestError {
    #[error("analysis was cancelled for {0:?}")]
    Cancelled(PathBuf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PressureTestReport {
    pub files_scanned: usize,
    pub files_sampled: usize,
    pub outcomes: Vec<FileOutcome>,
    pub style_distribution: HashMap<StyleTag, usize>,
    pub confidence_tier_distribution: HashMap<ConfidenceTier, usize>,
    pub rule_application_frequency: HashMap<&'static str, usize>,
    pub low_confidence_files: Vec<PathBuf>,
    pub mean_confidence: f64,
    pub mean_analysis_time_ms: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureTestConfig {
    pub sample_size: Option<usize>,
    pub seed: u64,
    pub max_probe_concurrency: usize,
}

impl Default for PressureTestConfig {
    fn default() -> Self {
        Self { sample_size: None, seed: 0, max_probe_concurrency: 17 }
    }
}

/// Runs the full catalog (or a seeded sample of it) through the
/// orchestrator, classifier, and decision engine, and aggregates the
/// results. Files are processed in sorted-path order so the report is
/// byte-reproducible given the same catalog snapshot and seed.
pub async fn run(probe: Arc<dyn ProbeAdapter>, catalog_dir: &Path, config: PressureTestConfig) -> Result<PressureTestReport, PressureTestError> {
    let scanned = scan_catalog(catalog_dir);
    let files_scanned = scanned.len();
    let sampled = match config.sample_size {
        Some(n) => sample_catalog(&scanned, n, config.seed),
        None => scanned,
    };
    let files_sampled = sampled.len();

    let mut outcomes = Vec::with_capacity(sampled.len());
    for path in sampled {
        let report = analyze_audio(Arc::clone(&probe), &path, AnalyzerOptions::default(), config.max_probe_concurrency, CancellationToken::new())
            .await
            .map_err(|OrchestrationError::Cancelled| PressureTestError::Cancelled(path.clone()))?;

        let signals = signal_vector(&report.bundle);
        let risks = risk_scores(&report.bundle);
        let classification = classify(signals);
        let decision_bundle = decide(signals, &risks, classification.clone());
        let confidence = weighted_confidence(&risks, decision_bundle.risk_weights);

        outcomes.push(FileOutcome {
            path,
            style: classification.primary,
            confidence,
            tier: ConfidenceTier::from_confidence(confidence),
            applied_rule_ids: decision_bundle.applied_rules.iter().filter(|r| !r.suppressed).map(|r| r.rule_id).collect(),
            analysis_time_ms: report.analysis_time_ms,
        });
    }

    Ok(aggregate(files_scanned, files_sampled, outcomes))
}

fn aggregate(files_scanned: usize, files_sampled: usize, outcomes: Vec<FileOutcome>) -> PressureTestReport {
    let mut style_distribution = HashMap::new();
    let mut confidence_tier_distribution = HashMap::new();
    let mut rule_application_frequency: HashMap<&'static str, usize> = HashMap::new();
    let mut low_confidence_files = Vec::new();

    for outcome in &outcomes {
        *style_distribution.entry(outcome.style).or_insert(0) += 1;
        *confidence_tier_distribution.entry(outcome.tier).or_insert(0) += 1;
        for rule_id in &outcome.applied_rule_ids {
            *rule_application_frequency.entry(*rule_id).or_insert(0) += 1;
        }
        if outcome.tier.is_low() {
            low_confidence_files.push(outcome.path.clone());
        }
    }

    let count = outcomes.len().max(1) as f64;
    let mean_confidence = outcomes.iter().map(|o| o.confidence).sum::<f64>() / count;
    let mean_analysis_time_ms = outcomes.iter().map(|o| o.analysis_time_ms as f64).sum::<f64>() / count;

    PressureTestReport {
        files_scanned,
        files_sampled,
        outcomes,
        style_distribution,
        confidence_tier_distribution,
        rule_application_frequency,
        low_confidence_files,
        mean_confidence,
        mean_analysis_time_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn confidence_tier_boundaries_match_the_frozen_thresholds() {
        assert_eq!(ConfidenceTier::from_confidence(0.9), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_confidence(0.85), ConfidenceTier::High);
        assert_eq!(ConfidenceTier::from_confidence(0.7), ConfidenceTier::Good);
        assert_eq!(ConfidenceTier::from_confidence(0.55), ConfidenceTier::Moderate);
        assert_eq!(ConfidenceTier::from_confidence(0.4), ConfidenceTier::Low);
        assert_eq!(ConfidenceTier::from_confidence(0.39), ConfidenceTier::VeryLow);
    }

    #[test]
    fn sample_catalog_is_deterministic_for_a_fixed_seed() {
        let catalog: Vec<PathBuf> = (0..20).map(|i| PathBuf::from(format!("/catalog/track-{i}.wav"))).collect();
        let first = sample_catalog(&catalog, 5, 42);
        let second = sample_catalog(&catalog, 5, 42);
        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
    }

    #[test]
    fn sample_catalog_differs_across_seeds() {
        let catalog: Vec<PathBuf> = (0..20).map(|i| PathBuf::from(format!("/catalog/track-{i}.wav"))).collect();
        let a = sample_catalog(&catalog, 5, 1);
        let b = sample_catalog(&catalog, 5, 2);
        assert_ne!(a, b);
    }

    #[test]
    fn sample_larger_than_catalog_returns_the_whole_sorted_catalog() {
        let catalog: Vec<PathBuf> = (0..3).map(|i| PathBuf::from(format!("/catalog/track-{i}.wav"))).collect();
        let sampled = sample_catalog(&catalog, 50, 7);
        assert_eq!(sampled.len(), 3);
    }

    #[test]
    fn extension_allowlist_rejects_unsupported_containers() {
        assert!(has_accepted_extension(Path::new("/catalog/track.wav")));
        assert!(has_accepted_extension(Path::new("/catalog/track.FLAC")));
        assert!(!has_accepted_extension(Path::new("/catalog/track.txt")));
        assert!(!has_accepted_extension(Path::new("/catalog/track")));
    }
}
