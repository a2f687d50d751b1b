use thiserror::Error;

use crate::request::ProbeRequest;

/// Errors surfaced by a [`ProbeAdapter`](crate::ProbeAdapter) call.
///
/// Per the contract in §4.1/§6: probe failures are typed, never folded into
/// default values, and the adapter itself never retries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("probe timed out after {elapsed_ms}ms for {request}")]
    Timeout { elapsed_ms: u64, request: ProbeRequest },

    #[error("probe could not parse a result for {request}: {reason}")]
    Unparseable { request: ProbeRequest, reason: String },

    #[error("probe process failed for {request}: {reason}")]
    ProcessFailed { request: ProbeRequest, reason: String },

    #[error("probe was asked to read a file that does not exist")]
    FileNotFound,

    #[error("probe concurrency limiter was closed")]
    LimiterClosed,
}

pub type ProbeResult<T> = Result<T, ProbeError>;
