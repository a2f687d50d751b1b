use std::path::Path;

use async_trait::async_trait;

use crate::errors::ProbeResult;
use crate::reading::ProbeReading;
use crate::request::ProbeRequest;

/// Trait used to implement your own probe.
///
/// The real implementation shells out to an external measurement tool; this
/// crate only defines the seam (spec §4.1/§6 "Audio Probe is opaque"). An
/// implementer must guarantee: results are fully parsed (unknown fields are
/// `None`, never a partial struct), failures surface as [`ProbeError`], and
/// calls are safe to invoke concurrently.
///
/// [`ProbeError`]: crate::ProbeError
#[async_trait]
pub trait ProbeAdapter: Send + Sync {
    /// Runs a single probe request against `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the probe cannot be reached, times out, or
    /// returns a result it cannot parse for the given `request`.
    async fn probe(&self, path: &Path, request: ProbeRequest) -> ProbeResult<ProbeReading>;
}
