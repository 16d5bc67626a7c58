//! When the page counts as settled around a capture.
//!
//! All timing lives behind [`SettleSignal`] so the orchestrator never sleeps
//! on its own, and tests can swap in [`Immediate`].

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::config::Config;

#[async_trait]
pub trait SettleSignal: Send + Sync {
    /// Resolves once export-mode changes are visible and safe to capture.
    async fn before_capture(&self);
    /// Resolves once the capture has released the page and restoring may start.
    async fn after_capture(&self);
}

/// Fixed pauses on either side of the capture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedDelay {
    pub before: Duration,
    pub after: Duration,
}

impl FixedDelay {
    pub fn from_config(config: &Config) -> Self {
        Self {
            before: config.settle_before_capture,
            after: config.settle_after_capture,
        }
    }
}

impl Default for FixedDelay {
    fn default() -> Self {
        Self {
            before: Duration::from_millis(2000),
            after: Duration::from_millis(2000),
        }
    }
}

#[async_trait]
impl SettleSignal for FixedDelay {
    async fn before_capture(&self) {
        debug!(delay_ms = self.before.as_millis() as u64, "waiting for export mode to settle");
        tokio::time::sleep(self.before).await;
    }

    async fn after_capture(&self) {
        debug!(delay_ms = self.after.as_millis() as u64, "waiting before restoring page");
        tokio::time::sleep(self.after).await;
    }
}

/// The tree is mutated synchronously, so it is settled as soon as it is changed.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

#[async_trait]
impl SettleSignal for Immediate {
    async fn before_capture(&self) {}
    async fn after_capture(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_fixed_delay_waits_configured_durations() {
        let policy = FixedDelay {
            before: Duration::from_millis(2000),
            after: Duration::from_millis(500),
        };
        let start = Instant::now();
        policy.before_capture().await;
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
        policy.after_capture().await;
        assert_eq!(start.elapsed(), Duration::from_millis(2500));
    }
}
