//! Registry of analyzer identities (spec §4.2, §4.13): the orchestrator
//! fans out one task per variant and keys its `Measurement Bundle` by name.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumCount, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum AnalyzerName {
    Loudness,
    Headroom,
    LimiterStress,
    TransientSharpness,
    DcOffset,
    ChannelTopology,
    LowEndMonoCompat,
    SpectralBalance,
    GainReduction,
    CodecStress,
    MonoFoldDown,
    CarTranslation,
    TemporalDensity,
    MacroDynamics,
    SamplePeak,
    StereoWidth,
    Silence,
    SpectralFlux,
    Sibilance,
}
