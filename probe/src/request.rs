use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of probe requests every analyzer in C2 is built from
/// (spec §4.1). Adding a new kind is a breaking, versioned change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProbeRequest {
    FormatInfo,
    OverallStats,
    BandStats { low_hz: f64, high_hz: f64 },
    LoudnessR128,
    PhaseCorrelation,
    SpectralStats,
    WindowedStats { window_ms: u32 },
    SilenceDetect { threshold_db: f64, min_dur_sec: f64 },
}

impl fmt::Display for ProbeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FormatInfo => write!(f, "format-info"),
            Self::OverallStats => write!(f, "overall-stats"),
            Self::BandStats { low_hz, high_hz } => {
                write!(f, "band-stats{{{low_hz}-{high_hz}Hz}}")
            }
            Self::LoudnessR128 => write!(f, "loudness-r128"),
            Self::PhaseCorrelation => write!(f, "phase-correlation"),
            Self::SpectralStats => write!(f, "spectral-stats"),
            Self::WindowedStats { window_ms } => write!(f, "windowed-stats{{{window_ms}ms}}"),
            Self::SilenceDetect { threshold_db, min_dur_sec } => {
                write!(f, "silence-detect{{{threshold_db}dB,{min_dur_sec}s}}")
            }
        }
    }
}
