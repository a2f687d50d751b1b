//! Typed, uniform access to raw measurements from an external audio probe.
//!
//! Every measurement the analysis suite needs is expressed as one of a
//! closed set of [`ProbeRequest`]s; the [`ProbeAdapter`] trait is the only
//! seam through which a real probe implementation plugs in. This crate
//! ships no subprocess-spawning implementation of its own — that belongs to
//! an external collaborator — only the contract, a concurrency/timeout
//! wrapper, and (behind `test-util`) a deterministic mock.

mod adapter;
mod bounded;
pub mod errors;
pub mod reading;
pub mod request;

#[cfg(any(test, feature = "test-util"))]
pub mod mock;

pub use adapter::ProbeAdapter;
pub use bounded::BoundedProbeAdapter;
pub use errors::{ProbeError, ProbeResult};
pub use reading::ProbeReading;
pub use request::ProbeRequest;

#[cfg(any(test, feature = "test-util"))]
pub use mock::MockProbeAdapter;
