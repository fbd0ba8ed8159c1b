use crate::actors::messages::{RemoteFailure, RemoteOutcome, RemotePayload};
use async_trait::async_trait;
use std::time::Duration;

/// Defines the public interface for the remote classification service.
///
/// This trait abstracts the transport, allowing the orchestrator to be driven by
/// the HTTP client in production and by scripted fakes in tests. Implementations
/// never return an error: every problem is reported as [`RemoteOutcome::Failure`].
#[async_trait]
pub trait RemoteClassifier: Send + Sync + 'static {
    /// Submits one payload and returns the outcome of that single attempt.
    async fn classify_remote(&self, payload: &RemotePayload) -> RemoteOutcome;

    /// Checks whether the service is reachable.
    async fn health_check(&self) -> Result<(), RemoteFailure>;
}

/// Defines the delay used to pad the latency of locally computed results.
///
/// Pausing must suspend the current task only, never the thread.
#[async_trait]
pub trait LatencySimulator: Send + Sync + 'static {
    /// Suspends the caller for the simulated duration.
    async fn pause(&self);

    /// Upper bound of a single pause.
    fn max_pause(&self) -> Duration;
}
