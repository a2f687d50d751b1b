use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::adapter::ProbeAdapter;
use crate::errors::{ProbeError, ProbeResult};
use crate::reading::ProbeReading;
use crate::request::ProbeRequest;

/// Wraps an inner [`ProbeAdapter`] with a global concurrency cap and a
/// per-call timeout, matching the `maxProbeConcurrency` / `PROBE_TIMEOUT_MS`
/// contract of §5/§6. The adapter itself never retries; callers that want
/// retry behavior implement it above this layer.
pub struct BoundedProbeAdapter<A> {
    inner: A,
    semaphore: Arc<tokio::sync::Semaphore>,
    timeout: Duration,
}

impl<A: ProbeAdapter> BoundedProbeAdapter<A> {
    #[must_use]
    pub fn new(inner: A, max_concurrency: usize, timeout: Duration) -> Self {
        Self {
            inner,
            semaphore: Arc::new(tokio::sync::Semaphore::new(max_concurrency.max(1))),
            timeout,
        }
    }
}

#[async_trait]
impl<A: ProbeAdapter> ProbeAdapter for BoundedProbeAdapter<A> {
    async fn probe(&self, path: &Path, request: ProbeRequest) -> ProbeResult<ProbeReading> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| ProbeError::LimiterClosed)?;

        match tokio::time::timeout(self.timeout, self.inner.probe(path, request)).await {
            Ok(result) => result,
            Err(_) => Err(ProbeError::Timeout {
                elapsed_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
                request,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockProbeAdapter;
    use crate::reading::FormatInfo;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    #[tokio::test]
    async fn bounded_adapter_delegates_to_inner() {
        let mut mock = MockProbeAdapter::new();
        let path = PathBuf::from("/tmp/asset.wav");
        mock.program(
            path.clone(),
            ProbeRequest::FormatInfo,
            Ok(ProbeReading::FormatInfo(FormatInfo {
                sample_rate_hz: Some(44_100),
                channels: Some(2),
                duration_sec: Some(12.0),
                bit_depth: Some(24),
                codec_known: true,
            })),
        );
        let bounded = BoundedProbeAdapter::new(mock, 4, Duration::from_millis(500));

        let reading = bounded.probe(&path, ProbeRequest::FormatInfo).await.unwrap();
        assert_eq!(
            reading,
            ProbeReading::FormatInfo(FormatInfo {
                sample_rate_hz: Some(44_100),
                channels: Some(2),
                duration_sec: Some(12.0),
                bit_depth: Some(24),
                codec_known: true,
            })
        );
    }

    #[tokio::test]
    async fn bounded_adapter_times_out_on_slow_inner() {
        let mock = MockProbeAdapter::new().with_delay(Duration::from_millis(50));
        let bounded = BoundedProbeAdapter::new(mock, 4, Duration::from_millis(1));

        let result = bounded
            .probe(Path::new("/tmp/asset.wav"), ProbeRequest::OverallStats)
            .await;
        assert!(matches!(result, Err(ProbeError::Timeout { .. })));
    }
}
