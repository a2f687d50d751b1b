//! Silence / leading-trailing-silence analyzer (supplement, §4.2). Feeds
//! `InvalidInput::ZeroDuration` detection and trim recommendations.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

const DEFAULT_THRESHOLD_DB: f64 = -60.0;
const DEFAULT_MIN_DUR_SEC: f64 = 0.3;
const EXCESSIVE_SILENCE_SEC: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SilenceResult {
    pub leading_silence_sec: Option<f64>,
    pub trailing_silence_sec: Option<f64>,
    pub silent_fraction: Option<f64>,
    pub is_entirely_silent: bool,
    pub recommend_trim: bool,
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<SilenceResult> {
    let reading = probe
        .probe(path, ProbeRequest::SilenceDetect { threshold_db: DEFAULT_THRESHOLD_DB, min_dur_sec: DEFAULT_MIN_DUR_SEC })
        .await?;
    let ProbeReading::SilenceDetect(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let is_entirely_silent = r.silent_fraction.is_some_and(|f| f >= 0.999);
    let recommend_trim = r.leading_silence_sec.is_some_and(|s| s > EXCESSIVE_SILENCE_SEC)
        || r.trailing_silence_sec.is_some_and(|s| s > EXCESSIVE_SILENCE_SEC);

    Ok(SilenceResult {
        leading_silence_sec: r.leading_silence_sec,
        trailing_silence_sec: r.trailing_silence_sec,
        silent_fraction: r.silent_fraction,
        is_entirely_silent,
        recommend_trim,
    })
}

#[must_use]
pub fn quick_check(result: &SilenceResult) -> ShortResult {
    if result.is_entirely_silent {
        ShortResult::failing("ENTIRELY_SILENT", "asset contains no audible signal")
    } else if result.recommend_trim {
        ShortResult::failing("EXCESS_SILENCE", "leading or trailing silence exceeds the trim threshold")
    } else {
        ShortResult::ok("NO_EXCESS_SILENCE")
    }
}
