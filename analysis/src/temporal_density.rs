//! Temporal density mapper (spec §4.2): buckets windowed short-term
//! loudness into sections and locates the "hook" — the highest-energy
//! section that isn't the intro or the outro.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

const MIN_SECTION_WINDOWS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum SectionType {
    Intro,
    Verse,
    Build,
    Chorus,
    Breakdown,
    Outro,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub start_window: usize,
    pub end_window: usize,
    pub mean_loudness_lufs: f64,
    pub percentile_bucket: u8,
    pub section_type: SectionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalDensityResult {
    pub sections: Vec<Section>,
    pub hook_section_index: Option<usize>,
}

/// Buckets each window into a percentile quartile (0-3, low to high
/// short-term loudness) then merges adjacent same-bucket runs shorter than
/// `MIN_SECTION_WINDOWS` into the neighbor with the larger run.
#[must_use]
pub(crate) fn bucket_sections(loudness_per_window: &[Option<f64>]) -> Vec<(usize, usize, u8, f64)> {
    let values: Vec<f64> = loudness_per_window.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    if values.is_empty() {
        return Vec::new();
    }
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return Vec::new();
    }
    let min = finite.iter().copied().fold(f64::MAX, f64::min);
    let max = finite.iter().copied().fold(f64::MIN, f64::max);
    let span = (max - min).max(f64::EPSILON);

    let buckets: Vec<u8> = values
        .iter()
        .map(|v| {
            if v.is_finite() {
                // louder window -> higher bucket
                let normalized = (v - min) / span;
                ((normalized * 3.99).floor() as u8).min(3)
            } else {
                0
            }
        })
        .collect();

    let mut raw_runs: Vec<(usize, usize, u8)> = Vec::new();
    let mut start = 0;
    for i in 1..=buckets.len() {
        if i == buckets.len() || buckets[i] != buckets[start] {
            raw_runs.push((start, i - 1, buckets[start]));
            start = i;
        }
    }

    let mut merged: Vec<(usize, usize, u8)> = Vec::new();
    for run in raw_runs {
        let len = run.1 - run.0 + 1;
        if len < MIN_SECTION_WINDOWS && !merged.is_empty() {
            let last = merged.last_mut().unwrap();
            last.1 = run.1;
        } else {
            merged.push(run);
        }
    }

    merged
        .into_iter()
        .map(|(s, e, bucket)| {
            let mean = values[s..=e].iter().copied().filter(|v| v.is_finite()).sum::<f64>()
                / (e - s + 1).max(1) as f64;
            (s, e, bucket, mean)
        })
        .collect()
}

/// Classifies a section by (energy level, trend, position), a simplified
/// version of the ladder described in §4.2's temporal density mapper.
#[must_use]
pub(crate) fn classify_section_type(index: usize, total: usize, bucket: u8) -> SectionType {
    if index == 0 {
        return SectionType::Intro;
    }
    if index == total.saturating_sub(1) {
        return SectionType::Outro;
    }
    match bucket {
        0 => SectionType::Breakdown,
        1 => SectionType::Verse,
        2 => SectionType::Build,
        _ => SectionType::Chorus,
    }
}

#[must_use]
pub(crate) fn find_hook(sections: &[Section]) -> Option<usize> {
    if sections.len() < 3 {
        return None;
    }
    sections[1..sections.len() - 1]
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.percentile_bucket.cmp(&b.percentile_bucket))
        .map(|(i, _)| i + 1)
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path, window_ms: u32) -> AnalysisResult<TemporalDensityResult> {
    let reading = probe.probe(path, ProbeRequest::WindowedStats { window_ms }).await?;
    let ProbeReading::WindowedStats(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let runs = bucket_sections(&r.short_term_lufs_per_window);
    let total = runs.len();
    let sections: Vec<Section> = runs
        .into_iter()
        .enumerate()
        .map(|(i, (s, e, bucket, mean))| Section {
            start_window: s,
            end_window: e,
            mean_loudness_lufs: mean,
            percentile_bucket: bucket,
            section_type: classify_section_type(i, total, bucket),
        })
        .collect();

    let hook_section_index = find_hook(&sections);
    Ok(TemporalDensityResult { sections, hook_section_index })
}

#[must_use]
pub fn quick_check(result: &TemporalDensityResult) -> ShortResult {
    if result.sections.is_empty() {
        ShortResult::unknown("temporal density could not be measured")
    } else {
        ShortResult::ok(format!("{}_SECTIONS", result.sections.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_runs_are_merged_into_neighbors() {
        let windows = vec![Some(20.0), Some(20.0), Some(20.0), Some(4.0), Some(20.0), Some(20.0)];
        let runs = bucket_sections(&windows);
        assert!(runs.iter().all(|(s, e, ..)| e - s + 1 >= MIN_SECTION_WINDOWS || runs.len() == 1));
    }

    #[test]
    fn intro_and_outro_are_first_and_last() {
        assert_eq!(classify_section_type(0, 5, 3), SectionType::Intro);
        assert_eq!(classify_section_type(4, 5, 3), SectionType::Outro);
    }

    #[test]
    fn hook_requires_at_least_three_sections() {
        let sections = vec![
            Section { start_window: 0, end_window: 1, mean_loudness_lufs: -10.0, percentile_bucket: 1, section_type: SectionType::Intro },
            Section { start_window: 2, end_window: 3, mean_loudness_lufs: -5.0, percentile_bucket: 3, section_type: SectionType::Outro },
        ];
        assert_eq!(find_hook(&sections), None);
    }
}
