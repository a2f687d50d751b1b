//! Macro-dynamics shape classifier (spec §4.2): classifies the overall
//! loudness arc of a track from macro-windowed short-term loudness.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

const DEFAULT_MACRO_WINDOW_MS: u32 = 16_000;
const FLAT_RANGE_LU: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MacroShape {
    Flat,
    Crescendo,
    Decrescendo,
    Arc,
    InvertedArc,
    DoubleArc,
    SteppedUp,
    SteppedDown,
    Bookend,
    FrontLoaded,
    BackLoaded,
    Fluctuating,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroDynamicsResult {
    pub macro_window_means_lufs: Vec<f64>,
    pub range_lu: Option<f64>,
    pub shape: MacroShape,
}

fn thirds_means(values: &[f64]) -> (f64, f64, f64) {
    let n = values.len();
    let third = (n / 3).max(1);
    let first = &values[..third.min(n)];
    let last_start = n.saturating_sub(third);
    let last = &values[last_start..];
    let mid_start = third.min(n);
    let mid_end = last_start.max(mid_start);
    let mid = &values[mid_start..mid_end];

    let mean = |s: &[f64]| if s.is_empty() { 0.0 } else { s.iter().sum::<f64>() / s.len() as f64 };
    (mean(first), mean(mid), mean(last))
}

fn sign_flip_count(values: &[f64]) -> usize {
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    diffs.windows(2).filter(|w| w[0] * w[1] < 0.0).count()
}

/// Decision ladder over range, slope between thirds, peak position, and
/// flip count (spec §4.2). Operates on per-macro-window short-term
/// loudness values, where higher means louder.
#[must_use]
pub(crate) fn classify_shape(values: &[f64]) -> MacroShape {
    if values.len() < 3 {
        return MacroShape::Unknown;
    }
    let min = values.iter().copied().fold(f64::MAX, f64::min);
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let range = max - min;
    if range < FLAT_RANGE_LU {
        return MacroShape::Flat;
    }

    let (first, mid, last) = thirds_means(values);
    let flips = sign_flip_count(values);
    let peak_pos = values
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0, |(i, _)| i);
    let trough_pos = values
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
        .map_or(0, |(i, _)| i);
    let relative_peak = peak_pos as f64 / (values.len() - 1).max(1) as f64;
    let relative_trough = trough_pos as f64 / (values.len() - 1).max(1) as f64;

    if flips >= values.len().saturating_sub(2) && values.len() > 4 {
        return MacroShape::Fluctuating;
    }

    if first > mid + FLAT_RANGE_LU && last > mid + FLAT_RANGE_LU && (first - last).abs() < FLAT_RANGE_LU {
        return MacroShape::Bookend;
    }
    if last < first - FLAT_RANGE_LU && last < mid - FLAT_RANGE_LU && relative_trough > 0.66 {
        return MacroShape::BackLoaded;
    }
    if first > mid + FLAT_RANGE_LU && first > last + FLAT_RANGE_LU && relative_peak < 0.34 {
        return MacroShape::FrontLoaded;
    }

    if first < mid && mid < last {
        if relative_peak > 0.6 && (last - first) / range.max(f64::EPSILON) > 0.5 {
            return MacroShape::Crescendo;
        }
        return MacroShape::SteppedUp;
    }
    if first > mid && mid > last {
        if relative_trough > 0.6 {
            return MacroShape::Decrescendo;
        }
        return MacroShape::SteppedDown;
    }
    if mid > first && mid > last {
        return MacroShape::Arc;
    }
    if mid < first && mid < last {
        return MacroShape::InvertedArc;
    }
    if flips >= 3 {
        return MacroShape::DoubleArc;
    }
    MacroShape::Fluctuating
}

pub async fn analyze(
    probe: &dyn ProbeAdapter,
    path: &Path,
    macro_window_ms: Option<u32>,
) -> AnalysisResult<MacroDynamicsResult> {
    let window_ms = macro_window_ms.unwrap_or(DEFAULT_MACRO_WINDOW_MS);
    let reading = probe.probe(path, ProbeRequest::WindowedStats { window_ms }).await?;
    let ProbeReading::WindowedStats(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    // None windows are dropped rather than interpolated, since a shape
    // classifier over a partial series is still meaningful but a fabricated
    // value is not.
    let values: Vec<f64> = r.short_term_lufs_per_window.iter().filter_map(|v| *v).collect();
    let shape = classify_shape(&values);
    let range_lu = if values.is_empty() {
        None
    } else {
        Some(values.iter().copied().fold(f64::MIN, f64::max) - values.iter().copied().fold(f64::MAX, f64::min))
    };

    Ok(MacroDynamicsResult { macro_window_means_lufs: values, range_lu, shape })
}

#[must_use]
pub fn quick_check(result: &MacroDynamicsResult) -> ShortResult {
    match result.shape {
        MacroShape::Unknown => ShortResult::unknown("macro-dynamics shape could not be classified"),
        other => ShortResult::ok(other.to_string()),
    }
}
