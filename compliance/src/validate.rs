//! Compliance Validator (spec §4.12, C12): per-metric range checks against
//! the frozen platform table.

use sondeck_lineage::{ValidationViolation, ViolationSeverity};
use strum::{Display, EnumString};

use crate::platforms::{standard_for, PlatformId, PlatformStandard, PLATFORM_STANDARDS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ComplianceStatus {
    Unknown,
    Compliant,
    Warning,
    NonCompliant,
}

/// The measured values a compliance check runs against a platform's
/// standard; any field may be absent if the asset wasn't measured for it.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasuredMetrics {
    pub integrated_loudness: Option<f64>,
    pub true_peak: Option<f64>,
    pub loudness_range: Option<f64>,
    pub short_term_max: Option<f64>,
    pub dialog_loudness: Option<f64>,
}

fn check_integrated_loudness(measured: Option<f64>, standard: &PlatformStandard, violations: &mut Vec<ValidationViolation>) -> ComplianceStatus {
    let Some(value) = measured else { return ComplianceStatus::Unknown };
    let il = &standard.integrated_loudness;

    if let (Some(target), Some(tolerance)) = (il.target, il.tolerance) {
        let diff = (value - target).abs();
        return if diff <= tolerance {
            ComplianceStatus::Compliant
        } else if diff <= tolerance * 2.0 {
            violations.push(ValidationViolation {
                severity: ViolationSeverity::Warning,
                context: format!("{:?} integratedLoudness", standard.id),
                description: format!("integrated loudness {value} LUFS is {diff:.1} dB from target {target} (tolerance {tolerance})"),
            });
            ComplianceStatus::Warning
        } else {
            violations.push(ValidationViolation {
                severity: ViolationSeverity::Error,
                context: format!("{:?} integratedLoudness", standard.id),
                description: format!("integrated loudness {value} LUFS is {diff:.1} dB from target {target} (tolerance {tolerance})"),
            });
            ComplianceStatus::NonCompliant
        };
    }

    if il.min.is_some_and(|min| value < min) || il.max.is_some_and(|max| value > max) {
        violations.push(ValidationViolation {
            severity: ViolationSeverity::Error,
            context: format!("{:?} integratedLoudness", standard.id),
            description: format!("integrated loudness {value} LUFS outside allowed range"),
        });
        return ComplianceStatus::NonCompliant;
    }

    ComplianceStatus::Compliant
}

fn check_true_peak(measured: Option<f64>, standard: &PlatformStandard, violations: &mut Vec<ValidationViolation>) -> ComplianceStatus {
    let Some(value) = measured else { return ComplianceStatus::Unknown };
    if value <= standard.true_peak.max {
        ComplianceStatus::Compliant
    } else {
        violations.push(ValidationViolation {
            severity: ViolationSeverity::Critical,
            context: format!("{:?} truePeak", standard.id),
            description: format!("true peak {value} dBTP exceeds ceiling {}", standard.true_peak.max),
        });
        ComplianceStatus::NonCompliant
    }
}

fn check_loudness_range(measured: Option<f64>, standard: &PlatformStandard, violations: &mut Vec<ValidationViolation>) -> ComplianceStatus {
    let Some(value) = measured else { return ComplianceStatus::Unknown };
    let lra = &standard.loudness_range;
    if lra.min.is_some_and(|min| value < min) || lra.max.is_some_and(|max| value > max) {
        violations.push(ValidationViolation {
            severity: ViolationSeverity::Warning,
            context: format!("{:?} loudnessRange", standard.id),
            description: format!("loudness range {value} LU outside recommended bounds"),
        });
        ComplianceStatus::Warning
    } else {
        ComplianceStatus::Compliant
    }
}

/// The worst-case result across every metric checked for one platform.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformComplianceResult {
    pub platform: PlatformId,
    pub status: ComplianceStatus,
    pub violations: Vec<ValidationViolation>,
}

/// Runs `metrics` against `platform`'s frozen standard, returning the
/// worst-per-metric status and the violations that produced it.
#[must_use]
pub fn validate(metrics: &MeasuredMetrics, platform: PlatformId) -> PlatformComplianceResult {
    let standard = standard_for(platform);
    let mut violations = Vec::new();

    let statuses = [
        check_integrated_loudness(metrics.integrated_loudness, standard, &mut violations),
        check_true_peak(metrics.true_peak, standard, &mut violations),
        check_loudness_range(metrics.loudness_range, standard, &mut violations),
    ];

    let status = statuses.into_iter().max().unwrap_or(ComplianceStatus::Unknown);

    PlatformComplianceResult { platform, status, violations }
}

/// Minimal set of gain/limit/compress deltas needed to bring `metrics` into
/// compliance with `platform`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComplianceAdjustments {
    pub gain_db: f64,
    pub limit_reduction_db: f64,
    pub compress_lra_by: f64,
}

/// Computes the minimal corrective deltas for `platform`.
#[must_use]
pub fn calculate_adjustments(metrics: &MeasuredMetrics, platform: PlatformId) -> ComplianceAdjustments {
    let standard = standard_for(platform);
    let mut adjustments = ComplianceAdjustments::default();

    if let (Some(value), Some(target)) = (metrics.integrated_loudness, standard.integrated_loudness.target) {
        adjustments.gain_db = target - value;
    }

    if let Some(value) = metrics.true_peak {
        let projected_peak = value + adjustments.gain_db;
        if projected_peak > standard.true_peak.max {
            adjustments.limit_reduction_db = projected_peak - standard.true_peak.max;
        }
    }

    if let (Some(value), Some(max)) = (metrics.loudness_range, standard.loudness_range.max) {
        if value > max {
            adjustments.compress_lra_by = value - max;
        }
    }

    adjustments
}

/// Every platform `metrics` already satisfies without any adjustment.
#[must_use]
pub fn find_compliant_platforms(metrics: &MeasuredMetrics) -> Vec<PlatformId> {
    PLATFORM_STANDARDS
        .iter()
        .filter(|standard| validate(metrics, standard.id).status == ComplianceStatus::Compliant)
        .map(|standard| standard.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn on_target_loudness_is_compliant() {
        let metrics = MeasuredMetrics { integrated_loudness: Some(-14.0), true_peak: Some(-1.5), loudness_range: Some(7.0), ..Default::default() };
        let result = validate(&metrics, PlatformId::Spotify);
        assert_eq!(result.status, ComplianceStatus::Compliant);
    }

    #[test]
    fn clipped_true_peak_is_critical_non_compliant() {
        let metrics = MeasuredMetrics { integrated_loudness: Some(-14.0), true_peak: Some(0.2), ..Default::default() };
        let result = validate(&metrics, PlatformId::Spotify);
        assert_eq!(result.status, ComplianceStatus::NonCompliant);
        assert!(result.violations.iter().any(|v| v.severity == ViolationSeverity::Critical));
    }

    #[test]
    fn missing_metrics_are_unknown_not_compliant_or_non_compliant() {
        let result = validate(&MeasuredMetrics::default(), PlatformId::Spotify);
        assert_eq!(result.status, ComplianceStatus::Unknown);
    }

    #[test]
    fn calculate_adjustments_targets_the_platform_loudness() {
        let metrics = MeasuredMetrics { integrated_loudness: Some(-10.0), true_peak: Some(-1.0), ..Default::default() };
        let adjustments = calculate_adjustments(&metrics, PlatformId::Spotify);
        assert_eq!(adjustments.gain_db, -4.0);
    }

    #[test]
    fn find_compliant_platforms_excludes_non_compliant_ones() {
        let metrics = MeasuredMetrics { integrated_loudness: Some(-27.0), true_peak: Some(-2.0), loudness_range: Some(10.0), ..Default::default() };
        let platforms = find_compliant_platforms(&metrics);
        assert!(platforms.contains(&PlatformId::Netflix));
        assert!(!platforms.contains(&PlatformId::Spotify));
    }
}
