use serde::{Deserialize, Serialize};

/// Result of a single [`ProbeRequest`](crate::ProbeRequest).
///
/// Per §4.1(a), a reading is a typed struct per request kind with numeric
/// fields nullable where the probe could not determine the value; the
/// adapter never produces a partially-populated variant of the wrong kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProbeReading {
    FormatInfo(FormatInfo),
    OverallStats(OverallStats),
    BandStats(BandStats),
    LoudnessR128(LoudnessR128),
    PhaseCorrelation(PhaseCorrelation),
    SpectralStats(SpectralStats),
    WindowedStats(WindowedStats),
    SilenceDetect(SilenceDetect),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FormatInfo {
    pub sample_rate_hz: Option<u32>,
    pub channels: Option<u16>,
    pub duration_sec: Option<f64>,
    pub bit_depth: Option<u16>,
    pub codec_known: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct OverallStats {
    pub sample_peak_dbfs: Option<f64>,
    pub true_peak_dbtp: Option<f64>,
    pub rms_dbfs: Option<f64>,
    pub dc_offset: Option<f64>,
    pub crest_factor_db: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BandStats {
    pub low_hz: f64,
    pub high_hz: f64,
    pub energy_ratio: Option<f64>,
    pub left_right_correlation: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct LoudnessR128 {
    pub integrated_lufs: Option<f64>,
    pub momentary_max_lufs: Option<f64>,
    pub short_term_max_lufs: Option<f64>,
    pub loudness_range_lu: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct PhaseCorrelation {
    pub correlation: Option<f64>,
    pub mid_side_energy_ratio: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SpectralStats {
    pub spectral_centroid_hz: Option<f64>,
    pub spectral_flux: Option<f64>,
    pub sibilance_energy_ratio: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WindowedStats {
    pub window_ms: u32,
    pub crest_factor_db_per_window: Vec<Option<f64>>,
    pub short_term_lufs_per_window: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SilenceDetect {
    pub leading_silence_sec: Option<f64>,
    pub trailing_silence_sec: Option<f64>,
    pub silent_fraction: Option<f64>,
}
