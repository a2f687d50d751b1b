//! Style classification: a weighted-likelihood fit of a signal vector
//! against a frozen table of production-style profiles (spec §4.3).

pub mod classify;
pub mod profile;
pub mod signals;

pub use classify::{classify, Classification};
pub use profile::{RiskKind, RiskWeightVector, StyleProfile, StyleTag, STYLE_PROFILES};
pub use signals::{SignalKind, SignalVector};
