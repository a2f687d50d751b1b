//! Multi-platform loudness/peak/LRA compliance validation (spec §4.12, C12)
//! against a frozen platform-standards table.

pub mod platforms;
pub mod validate;

pub use platforms::{
    standard_for, DialogLoudnessStandard, IntegratedLoudnessStandard, LoudnessRangeStandard, NormalizationPolicy, PlatformCategory, PlatformId,
    PlatformStandard, TruePeakStandard, PLATFORM_STANDARDS,
};
pub use validate::{calculate_adjustments, find_compliant_platforms, validate, ComplianceAdjustments, ComplianceStatus, MeasuredMetrics, PlatformComplianceResult};
