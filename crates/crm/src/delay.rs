use std::time::Duration;

use async_trait::async_trait;

/// Waits between delivery attempts.
///
/// Implementations must yield rather than block the worker thread.
#[async_trait]
pub trait RetryDelay: Send + Sync {
    async fn wait(&self, delay: Duration);
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TokioDelay;

#[async_trait]
impl RetryDelay for TokioDelay {
    async fn wait(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}

/// Returns immediately. Used by tests and dry runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopDelay;

#[async_trait]
impl RetryDelay for NoopDelay {
    async fn wait(&self, _delay: Duration) {}
}
