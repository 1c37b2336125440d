use async_trait::async_trait;
use std::time::Duration;

/// Suspends the polling loops between attempts.
///
/// Swapped out in tests so polling runs without real timers.
#[async_trait]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer backed by the tokio runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
