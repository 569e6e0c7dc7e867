//! Sleeping between attempts.

use async_trait::async_trait;
use std::time::Duration;

/// Waits for a duration. Swapped for a recorder in tests.
#[async_trait(?Send)]
pub trait Delay: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real timer: tokio natively, a blocking sleep inside a Spin component.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDelay;

#[async_trait(?Send)]
impl Delay for SystemDelay {
    async fn sleep(&self, duration: Duration) {
        if duration.is_zero() {
            return;
        }

        #[cfg(not(target_arch = "wasm32"))]
        tokio::time::sleep(duration).await;

        #[cfg(target_arch = "wasm32")]
        std::thread::sleep(duration);
    }
}
