//! Channel topology detection (spec §4.2).

use std::path::Path;

use serde::{Deserialize, Serialize};
use sondeck_probe::{ProbeAdapter, ProbeReading, ProbeRequest};
use strum::{Display, EnumString};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::util::ShortResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Topology {
    Mono,
    Stereo,
    DualMono,
    MidSide,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TopologyResult {
    pub correlation: Option<f64>,
    pub mid_side_energy_ratio: Option<f64>,
    pub topology: Topology,
}

#[must_use]
pub(crate) fn classify_topology(correlation: Option<f64>, mid_side_energy_ratio: Option<f64>, channels: Option<u16>) -> Topology {
    if channels == Some(1) {
        return Topology::Mono;
    }
    let Some(corr) = correlation else {
        return Topology::Unknown;
    };
    if corr > 0.999 {
        Topology::DualMono
    } else if let Some(ratio) = mid_side_energy_ratio {
        if ratio < 0.5 {
            Topology::MidSide
        } else {
            Topology::Stereo
        }
    } else {
        Topology::Stereo
    }
}

pub async fn analyze(probe: &dyn ProbeAdapter, path: &Path) -> AnalysisResult<TopologyResult> {
    let format = probe.probe(path, ProbeRequest::FormatInfo).await?;
    let ProbeReading::FormatInfo(format) = format else {
        return Err(AnalysisError::WrongReadingKind);
    };
    let reading = probe.probe(path, ProbeRequest::PhaseCorrelation).await?;
    let ProbeReading::PhaseCorrelation(r) = reading else {
        return Err(AnalysisError::WrongReadingKind);
    };

    let topology = classify_topology(r.correlation, r.mid_side_energy_ratio, format.channels);
    Ok(TopologyResult {
        correlation: r.correlation,
        mid_side_energy_ratio: r.mid_side_energy_ratio,
        topology,
    })
}

#[must_use]
pub fn quick_check(result: &TopologyResult) -> ShortResult {
    match result.topology {
        Topology::Unknown => ShortResult::unknown("channel topology could not be determined"),
        other => ShortResult::ok(other.to_string()),
    }
}
