//! Frozen per-platform loudness/peak/LRA standards table (spec §3, §4.12).

use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum PlatformId {
    Spotify,
    AppleMusic,
    YoutubeMusic,
    AmazonMusic,
    Netflix,
    BroadcastEbuR128,
    Podcast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PlatformCategory {
    Streaming,
    Broadcast,
    Podcast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum NormalizationPolicy {
    AlwaysNormalize,
    NormalizeDown,
    NoNormalization,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IntegratedLoudnessStandard {
    pub target: Option<f64>,
    pub tolerance: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TruePeakStandard {
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LoudnessRangeStandard {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub recommended: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DialogLoudnessStandard {
    pub target: f64,
    pub tolerance: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformStandard {
    pub id: PlatformId,
    pub category: PlatformCategory,
    pub integrated_loudness: IntegratedLoudnessStandard,
    pub true_peak: TruePeakStandard,
    pub loudness_range: LoudnessRangeStandard,
    pub short_term_max: Option<f64>,
    pub dialog_loudness: Option<DialogLoudnessStandard>,
    pub normalization_policy: NormalizationPolicy,
    pub notes: &'static str,
}

/// Frozen per-platform table. Adding a platform or changing a threshold is a
/// version bump, never a runtime configuration load.
pub const PLATFORM_STANDARDS: &[PlatformStandard] = &[
    PlatformStandard {
        id: PlatformId::Spotify,
        category: PlatformCategory::Streaming,
        integrated_loudness: IntegratedLoudnessStandard { target: Some(-14.0), tolerance: Some(1.0), min: None, max: None },
        true_peak: TruePeakStandard { max: -1.0 },
        loudness_range: LoudnessRangeStandard { min: None, max: None, recommended: Some(8.0) },
        short_term_max: None,
        dialog_loudness: None,
        normalization_policy: NormalizationPolicy::NormalizeDown,
        notes: "Spotify normalizes down to -14 LUFS, never up.",
    },
    PlatformStandard {
        id: PlatformId::AppleMusic,
        category: PlatformCategory::Streaming,
        integrated_loudness: IntegratedLoudnessStandard { target: Some(-16.0), tolerance: Some(1.0), min: None, max: None },
        true_peak: TruePeakStandard { max: -1.0 },
        loudness_range: LoudnessRangeStandard { min: None, max: None, recommended: Some(8.0) },
        short_term_max: None,
        dialog_loudness: None,
        normalization_policy: NormalizationPolicy::AlwaysNormalize,
        notes: "Sound Check applies Apple's -16 LUFS target in both directions.",
    },
    PlatformStandard {
        id: PlatformId::YoutubeMusic,
        category: PlatformCategory::Streaming,
        integrated_loudness: IntegratedLoudnessStandard { target: Some(-14.0), tolerance: Some(1.0), min: None, max: None },
        true_peak: TruePeakStandard { max: -1.0 },
        loudness_range: LoudnessRangeStandard::new_empty(),
        short_term_max: None,
        dialog_loudness: None,
        normalization_policy: NormalizationPolicy::NormalizeDown,
        notes: "YouTube normalizes down only; louder masters lose level, never gain it.",
    },
    PlatformStandard {
        id: PlatformId::AmazonMusic,
        category: PlatformCategory::Streaming,
        integrated_loudness: IntegratedLoudnessStandard { target: Some(-14.0), tolerance: Some(1.0), min: None, max: None },
        true_peak: TruePeakStandard { max: -2.0 },
        loudness_range: LoudnessRangeStandard::new_empty(),
        short_term_max: None,
        dialog_loudness: None,
        normalization_policy: NormalizationPolicy::AlwaysNormalize,
        notes: "Amazon's -2 dBTP ceiling is stricter than most streaming peers.",
    },
    PlatformStandard {
        id: PlatformId::Netflix,
        category: PlatformCategory::Broadcast,
        integrated_loudness: IntegratedLoudnessStandard { target: Some(-27.0), tolerance: Some(2.0), min: None, max: None },
        true_peak: TruePeakStandard { max: -2.0 },
        loudness_range: LoudnessRangeStandard { min: None, max: Some(18.0), recommended: None },
        short_term_max: Some(-20.0),
        dialog_loudness: Some(DialogLoudnessStandard { target: -27.0, tolerance: 2.0 }),
        normalization_policy: NormalizationPolicy::AlwaysNormalize,
        notes: "Netflix's delivery spec centers on dialog-gated loudness, not music LUFS.",
    },
    PlatformStandard {
        id: PlatformId::BroadcastEbuR128,
        category: PlatformCategory::Broadcast,
        integrated_loudness: IntegratedLoudnessStandard { target: Some(-23.0), tolerance: Some(0.5), min: None, max: None },
        true_peak: TruePeakStandard { max: -1.0 },
        loudness_range: LoudnessRangeStandard { min: None, max: Some(20.0), recommended: None },
        short_term_max: Some(-18.0),
        dialog_loudness: None,
        normalization_policy: NormalizationPolicy::AlwaysNormalize,
        notes: "EBU R128 as adopted by most European broadcasters.",
    },
    PlatformStandard {
        id: PlatformId::Podcast,
        category: PlatformCategory::Podcast,
        integrated_loudness: IntegratedLoudnessStandard { target: Some(-16.0), tolerance: Some(2.0), min: None, max: None },
        true_peak: TruePeakStandard { max: -1.0 },
        loudness_range: LoudnessRangeStandard::new_empty(),
        short_term_max: None,
        dialog_loudness: Some(DialogLoudnessStandard { target: -16.0, tolerance: 2.0 }),
        normalization_policy: NormalizationPolicy::NoNormalization,
        notes: "Apple Podcasts Connect's -16 LUFS mono-equivalent guideline.",
    },
];

impl LoudnessRangeStandard {
    const fn new_empty() -> Self {
        Self { min: None, max: None, recommended: None }
    }
}

#[must_use]
pub fn standard_for(id: PlatformId) -> &'static PlatformStandard {
    PLATFORM_STANDARDS.iter().find(|p| p.id == id).expect("PLATFORM_STANDARDS covers every PlatformId variant")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn every_platform_id_has_exactly_one_standard() {
        use strum::IntoEnumIterator;
        for id in PlatformId::iter() {
            assert_eq!(PLATFORM_STANDARDS.iter().filter(|p| p.id == id).count(), 1);
        }
    }
}
