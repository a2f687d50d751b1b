//! The frozen superset signal vector (spec §4.3, §9 Open Question): the
//! union of every decision-relevant signal a style profile may reference.
//! Implementers must not special-case per-variant subsets — a profile that
//! doesn't care about a signal simply omits it from its expected ranges,
//! and a missing input signal contributes neutral weight 1 to every
//! profile rather than being treated as an error.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[strum(serialize_all = "camelCase")]
pub enum SignalKind {
    Bpm,
    CrestFactorDb,
    TransientSharpness,
    LoudnessRangeLu,
    SpectralCentroidHz,
    StereoWidth,
    LowEndMonoCorrelation,
    SibilanceRatio,
    SubBassEnergyRatio,
    MacroDynamicsRangeLu,
}

/// A fully-populated signal has a value for every [`SignalKind`]; any
/// entry may be `None` when the upstream analyzer could not measure it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalVector {
    pub bpm: Option<f64>,
    pub crest_factor_db: Option<f64>,
    pub transient_sharpness: Option<f64>,
    pub loudness_range_lu: Option<f64>,
    pub spectral_centroid_hz: Option<f64>,
    pub stereo_width: Option<f64>,
    pub low_end_mono_correlation: Option<f64>,
    pub sibilance_ratio: Option<f64>,
    pub sub_bass_energy_ratio: Option<f64>,
    pub macro_dynamics_range_lu: Option<f64>,
}

impl SignalVector {
    #[must_use]
    pub fn get(&self, kind: SignalKind) -> Option<f64> {
        match kind {
            SignalKind::Bpm => self.bpm,
            SignalKind::CrestFactorDb => self.crest_factor_db,
            SignalKind::TransientSharpness => self.transient_sharpness,
            SignalKind::LoudnessRangeLu => self.loudness_range_lu,
            SignalKind::SpectralCentroidHz => self.spectral_centroid_hz,
            SignalKind::StereoWidth => self.stereo_width,
            SignalKind::LowEndMonoCorrelation => self.low_end_mono_correlation,
            SignalKind::SibilanceRatio => self.sibilance_ratio,
            SignalKind::SubBassEnergyRatio => self.sub_bass_energy_ratio,
            SignalKind::MacroDynamicsRangeLu => self.macro_dynamics_range_lu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn get_reads_back_the_field_it_names() {
        let signals = SignalVector { bpm: Some(140.0), ..Default::default() };
        assert_eq!(signals.get(SignalKind::Bpm), Some(140.0));
        assert_eq!(signals.get(SignalKind::CrestFactorDb), None);
    }
}
