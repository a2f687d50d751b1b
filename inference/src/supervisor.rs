//! Inference supervisor (spec §4.7, C7): wraps a caller-supplied async
//! inference call with a timeout, output validation, failure recording, and
//! a circuit breaker so one misbehaving model can't wedge a batch run.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::Mutex;
use strum::{Display, EnumString};
use tokio::time::timeout;

use crate::errors::{FailureKind, InferenceError};
use crate::model_id::ModelId;

/// How long a circuit stays open before the supervisor allows a probe call
/// through again.
pub const CIRCUIT_BREAK_DURATION_MS: u64 = 60_000;

/// Failures within this trailing window count toward escalation decisions.
const FAILURE_WINDOW: Duration = Duration::from_secs(300);

/// Failure-count thresholds driving both the circuit state machine and the
/// escalation ladder (spec §4.7/§6 defaults).
pub const LOG_AFTER: usize = 1;
pub const FALLBACK_AFTER: usize = 1;
pub const ALERT_AFTER: usize = 3;
pub const CIRCUIT_BREAK_AFTER: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Escalation {
    None,
    Log,
    Fallback,
    Alert,
    CircuitBreak,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum FallbackStrategy {
    UseDefault,
    UseCached,
    UseConservative,
    SkipMl,
    Reject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "PascalCase")]
pub enum CircuitState {
    Healthy,
    Recovering,
    Degraded,
    CircuitBroken,
}

#[derive(Debug, Clone)]
struct FailureEvent {
    at: DateTime<Utc>,
    kind: FailureKind,
}

#[derive(Debug, Default)]
struct ModelState {
    failures: Mutex<VecDeque<FailureEvent>>,
    tripped_at: Mutex<Option<DateTime<Utc>>>,
}

impl ModelState {
    fn prune(&self, now: DateTime<Utc>) {
        let mut failures = self.failures.lock();
        while failures.front().is_some_and(|f| now.signed_duration_since(f.at).to_std().unwrap_or_default() > FAILURE_WINDOW) {
            failures.pop_front();
        }
    }

    fn record_failure(&self, kind: FailureKind, now: DateTime<Utc>) -> usize {
        self.prune(now);
        let mut failures = self.failures.lock();
        failures.push_back(FailureEvent { at: now, kind });
        failures.len()
    }

    fn record_success(&self, now: DateTime<Utc>) {
        self.failures.lock().clear();
        *self.tripped_at.lock() = None;
        let _ = now;
    }

    /// `Healthy → Recovering (1+ failures) → Degraded (>=ALERT_AFTER) →
    /// CircuitBroken (>=CIRCUIT_BREAK_AFTER, for `CIRCUIT_BREAK_DURATION_MS`)
    /// → Healthy (auto-reset)`, per spec §4.7.
    fn circuit_state(&self, now: DateTime<Utc>) -> CircuitState {
        if let Some(tripped_at) = *self.tripped_at.lock() {
            let elapsed = now.signed_duration_since(tripped_at).to_std().unwrap_or_default();
            if elapsed < Duration::from_millis(CIRCUIT_BREAK_DURATION_MS) {
                return CircuitState::CircuitBroken;
            }
            *self.tripped_at.lock() = None;
            self.failures.lock().clear();
            return CircuitState::Healthy;
        }

        self.prune(now);
        match self.failures.lock().len() {
            0 => CircuitState::Healthy,
            n if n >= CIRCUIT_BREAK_AFTER => CircuitState::CircuitBroken,
            n if n >= ALERT_AFTER => CircuitState::Degraded,
            _ => CircuitState::Recovering,
        }
    }
}

const CRITICAL_THRESHOLD: usize = 10;

fn escalation_for(consecutive_failures: usize) -> Escalation {
    match consecutive_failures {
        0 => Escalation::None,
        n if n >= CRITICAL_THRESHOLD => Escalation::Critical,
        n if n >= CIRCUIT_BREAK_AFTER => Escalation::CircuitBreak,
        n if n >= ALERT_AFTER => Escalation::Alert,
        n if n >= FALLBACK_AFTER => Escalation::Fallback,
        n if n >= LOG_AFTER => Escalation::Log,
        _ => Escalation::None,
    }
}

fn validate_output(value: f64) -> Result<(), FailureKind> {
    if value.is_nan() {
        Err(FailureKind::NanOutput)
    } else if !value.is_finite() {
        Err(FailureKind::UndefinedOutput)
    } else {
        Ok(())
    }
}

/// The outcome of a supervised inference call: either the model's output, or
/// a description of how the supervisor handled its failure.
#[derive(Debug, Clone)]
pub enum Supervised<T> {
    Ok(T),
    Failed { error_kind: FailureKind, escalation: Escalation, circuit_state: CircuitState, fallback: FallbackStrategy },
}

/// Tracks per-model failure history and circuit-breaker state across calls.
#[derive(Debug, Default, Clone)]
pub struct InferenceSupervisor {
    models: Arc<DashMap<ModelId, ModelState>>,
    call_timeout: Duration,
}

impl InferenceSupervisor {
    #[must_use]
    pub fn new(call_timeout: Duration) -> Self {
        Self { models: Arc::new(DashMap::new()), call_timeout }
    }

    fn fallback_for(escalation: Escalation) -> FallbackStrategy {
        match escalation {
            Escalation::None | Escalation::Log => FallbackStrategy::UseDefault,
            Escalation::Fallback => FallbackStrategy::UseCached,
            Escalation::Alert => FallbackStrategy::UseConservative,
            Escalation::CircuitBreak | Escalation::Critical => FallbackStrategy::SkipMl,
        }
    }

    /// Runs `call`, a caller-supplied async inference closure, under a
    /// timeout and validates its numeric output, recording the outcome
    /// against `model`'s circuit-breaker state.
    pub async fn supervise<F, Fut>(&self, model: &ModelId, now: DateTime<Utc>, call: F) -> Supervised<f64>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<f64, InferenceError>>,
    {
        let state = self.models.entry(model.clone()).or_default();

        if state.circuit_state(now) == CircuitState::CircuitBroken {
            return Supervised::Failed {
                error_kind: FailureKind::ModelUnavailable,
                escalation: Escalation::CircuitBreak,
                circuit_state: CircuitState::CircuitBroken,
                fallback: FallbackStrategy::SkipMl,
            };
        }
        drop(state);

        let outcome = timeout(self.call_timeout, call()).await;

        let (kind, value) = match outcome {
            Err(_) => (Some(FailureKind::Timeout), None),
            Ok(Err(err)) => (Some(err.kind()), None),
            Ok(Ok(value)) => (validate_output(value).err(), Some(value)),
        };

        let state = self.models.entry(model.clone()).or_default();

        let Some(kind) = kind else {
            state.record_success(now);
            return Supervised::Ok(value.expect("Ok variant always carries a value"));
        };

        let consecutive_failures = state.record_failure(kind, now);
        let escalation = escalation_for(consecutive_failures);
        if escalation == Escalation::CircuitBreak {
            *state.tripped_at.lock() = Some(now);
        }
        let circuit_state = state.circuit_state(now);

        Supervised::Failed { error_kind: kind, escalation, circuit_state, fallback: Self::fallback_for(escalation) }
    }
}
