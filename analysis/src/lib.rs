//! Functional analyzer modules over probe readings (spec §4.2).
//!
//! Each module exposes an `analyze` async function (consuming a
//! `&dyn ProbeAdapter`), a `quick_check` pure function producing a generic
//! [`util::ShortResult`], and a crate-private `classify_status`/equivalent
//! pure ladder so the classification logic is independently unit-testable
//! without a probe round-trip. Analyzers never consume each other's
//! outputs — the orchestrator composes them.

pub mod car_translator;
pub mod codec_stress;
pub mod crest;
pub mod dc_offset;
pub mod errors;
pub mod fold_down;
pub mod gain_reduction;
pub mod headroom;
pub mod loudness;
pub mod macro_dynamics;
pub mod mono_compat;
pub mod sample_peak;
pub mod sibilance;
pub mod silence;
pub mod spectral_balance;
pub mod spectral_flux;
pub mod stereo_width;
pub mod suite;
pub mod temporal_density;
pub mod topology;
pub mod transient;
pub mod util;

pub use errors::{AnalysisError, AnalysisResult};
pub use suite::AnalyzerName;
pub use util::ShortResult;
