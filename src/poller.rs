//! Bounded status polling
//!
//! The bank rate-limits status queries, so consecutive polls are never closer
//! than [`MIN_POLL_INTERVAL`], whatever interval the caller asks for.

use crate::client::SbpClient;
use crate::types::{ApiResult, QrStatusQuery, SbpRequest};
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Shortest allowed pause between two status queries
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Default number of status queries
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Attempt budget and pause between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub max_attempts: u32,
    /// Requested pause; raised to [`MIN_POLL_INTERVAL`] if shorter
    pub interval: Duration,
}

impl PollPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
        }
    }

    /// Pause actually used between attempts
    pub fn effective_interval(&self) -> Duration {
        self.interval.max(MIN_POLL_INTERVAL)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, MIN_POLL_INTERVAL)
    }
}

/// Waits between polls
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Polls `GetQRCstatus` until a terminal status or the attempt budget runs out
#[derive(Clone)]
pub struct StatusPoller {
    policy: PollPolicy,
    sleeper: Arc<dyn Sleeper>,
}

impl std::fmt::Debug for StatusPoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusPoller")
            .field("policy", &self.policy)
            .finish()
    }
}

impl StatusPoller {
    pub fn new(policy: PollPolicy) -> Self {
        Self {
            policy,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the sleeper
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Run the polling loop.
    ///
    /// Validation errors abort before the first query. Remote and transport
    /// failures count as a non-terminal attempt. Returns `Ok(None)` when the
    /// budget is spent without `ACWP` or `RJCT`.
    pub async fn poll(
        &self,
        client: &SbpClient,
        query: &QrStatusQuery,
    ) -> Result<Option<ApiResult>> {
        query.validate()?;

        let interval = self.policy.effective_interval();
        let max_attempts = self.policy.max_attempts;

        for attempt in 1..=max_attempts {
            match client.get_qr_status(query).await {
                Ok(result) => match result.status() {
                    Some(status) if status.is_terminal() => {
                        tracing::debug!(attempt, status = %status, "QR status is final");
                        return Ok(Some(result));
                    }
                    status => {
                        tracing::debug!(
                            attempt,
                            status = ?status.as_ref().map(|s| s.as_str()),
                            "QR status is not final yet"
                        );
                    }
                },
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "QR status query failed");
                }
            }

            if attempt < max_attempts {
                self.sleeper.sleep(interval).await;
            }
        }

        tracing::debug!(max_attempts, "QR status polling exhausted");
        Ok(None)
    }
}
