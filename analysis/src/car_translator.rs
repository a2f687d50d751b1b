//! Car system translator (spec §4.2): predicts how the mix will behave on
//! small, resonance-prone car speaker systems.

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::crest::stress_index as limiter_stress_index;
use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

const BOOM_BAND: (f64, f64) = (80.0, 120.0);
const MUD_BAND: (f64, f64) = (120.0, 200.0);
const BOX_BAND: (f64, f64) = (200.0, 300.0);
const SUB_BAND: (f64, f64) = (20.0, 120.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TranslationStatus {
    Excellent,
    Good,
    Boomy,
    Muddy,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarTranslationResult {
    pub boom_ratio: Option<f64>,
    pub mud_ratio: Option<f64>,
    pub box_ratio: Option<f64>,
    pub status: TranslationStatus,
    /// Risk, in `[0,1]`, that a car system's compressor/limiter will visibly
    /// pump in response to sustained low-frequency energy in this mix.
    pub pumping_risk: f64,
    pub limiter_stress_sub_index: f64,
}

#[must_use]
pub(crate) fn classify_status(boom_ratio: Option<f64>, mud_ratio: Option<f64>) -> TranslationStatus {
    match (boom_ratio, mud_ratio) {
        (None, _) | (_, None) => TranslationStatus::Unknown,
        (Some(boom), Some(mud)) if boom > 0.30 => {
            if mud > 0.25 {
                TranslationStatus::Muddy
            } else {
                TranslationStatus::Boomy
            }
        }
        (Some(_), Some(mud)) if mud > 0.30 => TranslationStatus::Muddy,
        (Some(boom), Some(mud)) if boom < 0.15 && mud < 0.15 => TranslationStatus::Excellent,
        _ => TranslationStatus::Good,
    }
}

#[must_use]
pub(crate) fn pumping_risk(sustained_lf_fraction: f64, crest_factor_db: Option<f64>) -> f64 {
    let lf_term = sustained_lf_fraction.clamp(0.0, 1.0);
    let crest_term = crest_factor_db.map_or(0.3, |c| ((12.0 - c) / 12.0).clamp(0.0, 1.0));
    (0.6 * lf_term + 0.4 * crest_term).clamp(0.0, 1.0)
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<CarTranslationResult> {
    let boom = probe.probe(path, ProbeRequest::BandStats { low_hz: BOOM_BAND.0, high_hz: BOOM_BAND.1 }).await?;
    let ProbeReading::BandStats(boom) = boom else { return Err(AnalysisError::WrongReadingKind) };
    let mud = probe.probe(path, ProbeRequest::BandStats { low_hz: MUD_BAND.0, high_hz: MUD_BAND.1 }).await?;
    let ProbeReading::BandStats(mud) = mud else { return Err(AnalysisError::WrongReadingKind) };
    let box_band = probe.probe(path, ProbeRequest::BandStats { low_hz: BOX_BAND.0, high_hz: BOX_BAND.1 }).await?;
    let ProbeReading::BandStats(box_band) = box_band else { return Err(AnalysisError::WrongReadingKind) };
    let sub = probe.probe(path, ProbeRequest::BandStats { low_hz: SUB_BAND.0, high_hz: SUB_BAND.1 }).await?;
    let ProbeReading::BandStats(sub) = sub else { return Err(AnalysisError::WrongReadingKind) };
    let overall = probe.probe(path, ProbeRequest::OverallStats).await?;
    let ProbeReading::OverallStats(overall) = overall else { return Err(AnalysisError::WrongReadingKind) };
    let format = probe.probe(path, ProbeRequest::FormatInfo).await?;
    let ProbeReading::FormatInfo(format) = format else { return Err(AnalysisError::WrongReadingKind) };

    let status = classify_status(boom.energy_ratio, mud.energy_ratio);
    let risk = pumping_risk(sub.energy_ratio.unwrap_or(0.0), overall.crest_factor_db);
    let stress_sub = limiter_stress_index(overall.crest_factor_db, sub.energy_ratio.unwrap_or(0.0), format.duration_sec);

    Ok(CarTranslationResult {
        boom_ratio: boom.energy_ratio,
        mud_ratio: mud.energy_ratio,
        box_ratio: box_band.energy_ratio,
        status,
        pumping_risk: risk,
        limiter_stress_sub_index: stress_sub,
    })
}

#[must_use]
pub fn quick_check(result: &CarTranslationResult) -> ShortResult {
    match result.status {
        TranslationStatus::Unknown => ShortResult::unknown("band energy could not be measured"),
        TranslationStatus::Muddy => ShortResult::failing(result.status.to_string(), "low-mids will read muddy on car systems"),
        other => ShortResult::ok(other.to_string()),
    }
}
