//! Cumulative Risk (spec §4.9, C9): bounds how much processing an asset has
//! accumulated across jobs, independent of any single job's own measurements.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::stage::Stage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingChainEntry {
    pub stage: Stage,
    pub preset_id: String,
    pub applied_at: DateTime<Utc>,
}

/// Groups presets by purpose rather than pipeline position — orthogonal to
/// [`Stage`], which models where in the chain a job runs. Two presets can
/// share a category (e.g. `master-standard` and `master-streaming` are both
/// [`PresetCategory::Mastering`]) while applying at different stages, or
/// even the same stage, of the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PresetCategory {
    Analysis,
    Restoration,
    GainStaging,
    Eq,
    Dynamics,
    Limiting,
    Mastering,
    Stereo,
    Dither,
    FormatConversion,
}

/// Base weight contributed by a known preset, independent of its stage's
/// repeat-penalty weight. Presets not in this table fall back to
/// [`DEFAULT_PRESET_WEIGHT`].
const PRESET_WEIGHTS: &[(&str, f64)] = &[
    ("restoration-light", 3.0),
    ("restoration-heavy", 9.0),
    ("gain-staging-standard", 2.0),
    ("eq-surgical", 4.0),
    ("eq-tonal-shaping", 6.0),
    ("dynamics-gentle", 5.0),
    ("dynamics-aggressive", 10.0),
    ("limiting-transparent", 6.0),
    ("limiting-loud", 12.0),
    ("stereo-widen", 5.0),
    ("dither-standard", 1.0),
    ("format-conversion-standard", 1.0),
    ("master-standard", 20.0),
    ("master-streaming", 22.0),
];
const DEFAULT_PRESET_WEIGHT: f64 = 5.0;

/// Which category each known preset belongs to. Presets not in this table
/// have no category and are excluded from category-keyed accounting.
const PRESET_CATEGORIES: &[(&str, PresetCategory)] = &[
    ("restoration-light", PresetCategory::Restoration),
    ("restoration-heavy", PresetCategory::Restoration),
    ("gain-staging-standard", PresetCategory::GainStaging),
    ("eq-surgical", PresetCategory::Eq),
    ("eq-tonal-shaping", PresetCategory::Eq),
    ("dynamics-gentle", PresetCategory::Dynamics),
    ("dynamics-aggressive", PresetCategory::Dynamics),
    ("limiting-transparent", PresetCategory::Limiting),
    ("limiting-loud", PresetCategory::Limiting),
    ("stereo-widen", PresetCategory::Stereo),
    ("dither-standard", PresetCategory::Dither),
    ("format-conversion-standard", PresetCategory::FormatConversion),
    ("master-standard", PresetCategory::Mastering),
    ("master-streaming", PresetCategory::Mastering),
];

/// Per-stage weight used only for the repeat penalty, not the base score.
const STAGE_REPEAT_WEIGHT: &[(Stage, f64)] = &[
    (Stage::Analysis, 0.0),
    (Stage::Restoration, 4.0),
    (Stage::GainStaging, 3.0),
    (Stage::Eq, 4.0),
    (Stage::Dynamics, 6.0),
    (Stage::Limiting, 8.0),
    (Stage::Stereo, 5.0),
    (Stage::Dither, 2.0),
    (Stage::FormatConversion, 2.0),
];

/// How many times a stage may recur in a chain before repeats start being
/// penalized.
const STAGE_RECOMMENDED_MAX: &[(Stage, u32)] = &[
    (Stage::Analysis, u32::MAX),
    (Stage::Restoration, 2),
    (Stage::GainStaging, 3),
    (Stage::Eq, 3),
    (Stage::Dynamics, 2),
    (Stage::Limiting, 1),
    (Stage::Stereo, 2),
    (Stage::Dither, 1),
    (Stage::FormatConversion, 1),
];

/// Per-category weight used only for the category repeat penalty.
const CATEGORY_REPEAT_WEIGHT: &[(PresetCategory, f64)] = &[
    (PresetCategory::Analysis, 0.0),
    (PresetCategory::Restoration, 4.0),
    (PresetCategory::GainStaging, 3.0),
    (PresetCategory::Eq, 4.0),
    (PresetCategory::Dynamics, 6.0),
    (PresetCategory::Limiting, 8.0),
    (PresetCategory::Mastering, 10.0),
    (PresetCategory::Stereo, 5.0),
    (PresetCategory::Dither, 2.0),
    (PresetCategory::FormatConversion, 2.0),
];

/// How many times a category may recur in a chain before repeats start
/// being penalized.
const CATEGORY_RECOMMENDED_MAX: &[(PresetCategory, u32)] = &[
    (PresetCategory::Analysis, u32::MAX),
    (PresetCategory::Restoration, 2),
    (PresetCategory::GainStaging, 3),
    (PresetCategory::Eq, 3),
    (PresetCategory::Dynamics, 2),
    (PresetCategory::Limiting, 1),
    (PresetCategory::Mastering, 1),
    (PresetCategory::Stereo, 2),
    (PresetCategory::Dither, 1),
    (PresetCategory::FormatConversion, 1),
];

const REPEAT_MULTIPLIER: f64 = 1.5;
const ACCUMULATION_WEIGHT: f64 = 0.5;

fn preset_weight(preset_id: &str) -> f64 {
    PRESET_WEIGHTS.iter().find(|(id, _)| *id == preset_id).map_or(DEFAULT_PRESET_WEIGHT, |(_, w)| *w)
}

fn preset_category(preset_id: &str) -> Option<PresetCategory> {
    PRESET_CATEGORIES.iter().find(|(id, _)| *id == preset_id).map(|(_, category)| *category)
}

fn stage_repeat_weight(stage: Stage) -> f64 {
    STAGE_REPEAT_WEIGHT.iter().find(|(s, _)| *s == stage).map_or(0.0, |(_, w)| *w)
}

fn stage_recommended_max(stage: Stage) -> u32 {
    STAGE_RECOMMENDED_MAX.iter().find(|(s, _)| *s == stage).map_or(u32::MAX, |(_, max)| *max)
}

fn category_repeat_weight(category: PresetCategory) -> f64 {
    CATEGORY_REPEAT_WEIGHT.iter().find(|(c, _)| *c == category).map_or(0.0, |(_, w)| *w)
}

fn category_recommended_max(category: PresetCategory) -> u32 {
    CATEGORY_RECOMMENDED_MAX.iter().find(|(c, _)| *c == category).map_or(u32::MAX, |(_, max)| *max)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, PartialOrd, Ord)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Pristine,
    Low,
    Moderate,
    High,
    Excessive,
}

fn risk_level(score: f64) -> RiskLevel {
    if score < 10.0 {
        RiskLevel::Pristine
    } else if score < 25.0 {
        RiskLevel::Low
    } else if score < 50.0 {
        RiskLevel::Moderate
    } else if score < 75.0 {
        RiskLevel::High
    } else {
        RiskLevel::Excessive
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadroomFlags {
    pub can_add_eq: bool,
    pub can_add_dynamics: bool,
    pub can_add_mastering: bool,
    pub can_add_stereo: bool,
    pub can_add_normalization: bool,
}

fn headroom_flags(score: f64, category_counts: &HashMap<PresetCategory, u32>) -> HeadroomFlags {
    let remaining = 100.0 - score;
    let mastering_at_limit = category_counts.get(&PresetCategory::Mastering).copied().unwrap_or(0)
        >= category_recommended_max(PresetCategory::Mastering);
    HeadroomFlags {
        can_add_eq: remaining > 10.0,
        can_add_dynamics: remaining > 15.0,
        can_add_mastering: remaining > 20.0 && !mastering_at_limit,
        can_add_stereo: remaining > 10.0,
        can_add_normalization: remaining > 5.0,
    }
}

/// One category's count exceeding its recommended maximum.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CategoryOverLimit {
    pub category: PresetCategory,
    pub count: u32,
    pub max_recommended: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskReport {
    pub score: f64,
    pub level: RiskLevel,
    pub headroom: HeadroomFlags,
    pub category_counts: HashMap<PresetCategory, u32>,
    pub category_over_limits: Vec<CategoryOverLimit>,
}

fn repeat_penalty(history: &[ProcessingChainEntry]) -> f64 {
    let mut penalty = 0.0;
    for &(stage, max) in STAGE_RECOMMENDED_MAX {
        let count = history.iter().filter(|e| e.stage == stage).count() as u32;
        if count > max {
            let excess = f64::from(count - max);
            penalty += excess * stage_repeat_weight(stage) * REPEAT_MULTIPLIER;
        }
    }
    penalty
}

/// Counts how many chain entries fall into each preset category. Entries
/// whose preset has no category (see [`PRESET_CATEGORIES`]) are excluded.
#[must_use]
pub fn category_counts(history: &[ProcessingChainEntry]) -> HashMap<PresetCategory, u32> {
    let mut counts = HashMap::new();
    for entry in history {
        if let Some(category) = preset_category(&entry.preset_id) {
            *counts.entry(category).or_insert(0) += 1;
        }
    }
    counts
}

/// The category-keyed counterpart of [`repeat_penalty`]: an additional
/// penalty applied once a category recurs past its recommended maximum,
/// independent of which stages its presets happen to run at.
fn category_repeat_penalty(counts: &HashMap<PresetCategory, u32>) -> f64 {
    let mut penalty = 0.0;
    for (&category, &count) in counts {
        let max = category_recommended_max(category);
        if count > max {
            let excess = f64::from(count - max);
            penalty += excess * category_repeat_weight(category) * REPEAT_MULTIPLIER;
        }
    }
    penalty
}

/// Categories whose count in `history` exceeds their recommended maximum.
#[must_use]
pub fn category_over_limits(history: &[ProcessingChainEntry]) -> Vec<CategoryOverLimit> {
    let counts = category_counts(history);
    let mut over_limits: Vec<CategoryOverLimit> = counts
        .into_iter()
        .filter_map(|(category, count)| {
            let max_recommended = category_recommended_max(category);
            (count > max_recommended).then_some(CategoryOverLimit { category, count, max_recommended })
        })
        .collect();
    over_limits.sort_by_key(|entry| entry.category.to_string());
    over_limits
}

/// Computes the cumulative processing risk for an asset's chain history.
#[must_use]
pub fn calculate_risk(history: &[ProcessingChainEntry], accumulation_score: Option<f64>) -> RiskReport {
    let base: f64 = history.iter().map(|e| preset_weight(&e.preset_id)).sum();
    let stage_repeat = repeat_penalty(history);
    let counts = category_counts(history);
    let category_repeat = category_repeat_penalty(&counts);
    let score = (base + stage_repeat + category_repeat + ACCUMULATION_WEIGHT * accumulation_score.unwrap_or(0.0))
        .clamp(0.0, 100.0);

    RiskReport {
        score,
        level: risk_level(score),
        headroom: headroom_flags(score, &counts),
        category_over_limits: category_over_limits(history),
        category_counts: counts,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProposedJobEvaluation {
    pub crosses_level_boundary: bool,
    pub exceeds_stage_recommended_max: bool,
    pub projected_score_delta: f64,
}

/// Evaluates the effect of appending `proposed` to `history` without
/// mutating either.
#[must_use]
pub fn evaluate_proposed_job(history: &[ProcessingChainEntry], proposed: &ProcessingChainEntry) -> ProposedJobEvaluation {
    let before = calculate_risk(history, None);
    let mut projected_history = history.to_vec();
    projected_history.push(proposed.clone());
    let after = calculate_risk(&projected_history, None);

    let count_after = projected_history.iter().filter(|e| e.stage == proposed.stage).count() as u32;

    ProposedJobEvaluation {
        crosses_level_boundary: before.level != after.level,
        exceeds_stage_recommended_max: count_after > stage_recommended_max(proposed.stage),
        projected_score_delta: after.score - before.score,
    }
}
