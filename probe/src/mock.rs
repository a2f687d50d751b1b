//! Deterministic test double for [`ProbeAdapter`], keyed by `(path, request)`.
//!
//! This is the seam the spec's "Audio Probe is opaque" boundary maps onto:
//! no real subprocess is spawned here, so analyzer and orchestrator tests
//! can program exact readings (or failures) without touching the filesystem
//! or an external tool.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::adapter::ProbeAdapter;
use crate::errors::{ProbeError, ProbeResult};
use crate::reading::ProbeReading;
use crate::request::ProbeRequest;

type ProgrammedKey = (PathBuf, ProbeRequestKey);

/// `ProbeRequest` carries `f64`/`u32` fields so it isn't `Hash`/`Eq`; this
/// key is a lossless stand-in built from its `Display` rendering, which is
/// already a 1:1 textual encoding of every variant's fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ProbeRequestKey(String);

impl From<ProbeRequest> for ProbeRequestKey {
    fn from(request: ProbeRequest) -> Self {
        Self(request.to_string())
    }
}

#[derive(Default)]
pub struct MockProbeAdapter {
    programmed: Mutex<HashMap<ProgrammedKey, ProbeResult<ProbeReading>>>,
    delay: Option<Duration>,
}

impl MockProbeAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an artificial delay before every `probe` call returns, useful
    /// for exercising timeout/cancellation paths.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Programs the reading (or error) that will be returned for the given
    /// `(path, request)` pair. Later calls with the same key overwrite the
    /// earlier programming.
    pub fn program(&mut self, path: PathBuf, request: ProbeRequest, result: ProbeResult<ProbeReading>) {
        self.programmed
            .get_mut()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert((path, request.into()), result);
    }
}

#[async_trait]
impl ProbeAdapter for MockProbeAdapter {
    async fn probe(&self, path: &Path, request: ProbeRequest) -> ProbeResult<ProbeReading> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let key = (path.to_path_buf(), request.into());
        self.programmed
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&key)
            .cloned()
            .unwrap_or_else(|| {
                Err(ProbeError::Unparseable {
                    request,
                    reason: format!("no reading programmed for {}", path.display()),
                })
            })
    }
}
