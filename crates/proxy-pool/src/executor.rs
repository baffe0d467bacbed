//! Rotation-aware operation runner
//!
//! Runs a caller-supplied operation against the manager's current client.
//! Rate limits and timeouts both mean the current egress identity is
//! unusable right now, so both recover the same way: rotate and retry, up to
//! a bounded budget. A rate limit is a hard external signal and gets the
//! full backoff; a timeout is ambiguous and gets half of it. Everything else
//! propagates untouched.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use mojang_api::Classification;

use crate::error::{Error, Result};
use crate::manager::ConnectionManager;

/// Bounded retry policy: rotation budget plus per-failure-class backoff.
///
/// Decoupled from the operations so any remote call can run under it.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Rotations allowed per `run` call before giving up.
    pub max_rotations: u32,
    /// Pause after a rate-limit response, before retrying on a fresh proxy.
    pub rate_limit_backoff: Duration,
    /// Pause after a timed-out request.
    pub timeout_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_rotations: 5,
            rate_limit_backoff: Duration::from_secs(1),
            timeout_backoff: Duration::from_millis(500),
        }
    }
}

/// Executes operations with transparent proxy rotation.
#[derive(Debug, Clone)]
pub struct Executor {
    manager: Arc<ConnectionManager>,
    policy: RetryPolicy,
    display_ping: bool,
}

impl Executor {
    pub fn new(manager: Arc<ConnectionManager>) -> Self {
        Self {
            manager,
            policy: RetryPolicy::default(),
            display_ping: false,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Emit a per-request latency line on success.
    pub fn display_ping(mut self, enabled: bool) -> Self {
        self.display_ping = enabled;
        self
    }

    pub fn manager(&self) -> &Arc<ConnectionManager> {
        &self.manager
    }

    /// Run `op`, rotating the proxy on rate limits and timeouts.
    ///
    /// `op` receives the client bound to the current pool entry and is
    /// invoked at most `max_rotations + 1` times. Cancellation is honored
    /// before each attempt, while an attempt is in flight, and during
    /// backoff, without consuming rotation budget.
    pub async fn run<T, F, Fut>(&self, cancel: &CancellationToken, mut op: F) -> Result<T>
    where
        F: FnMut(reqwest::Client) -> Fut,
        Fut: Future<Output = mojang_api::Result<T>>,
    {
        let mut rotations = 0u32;
        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let conn = self.manager.acquire().await?;
            let started = Instant::now();
            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                result = op(conn.client.clone()) => result,
            };

            match result {
                Ok(value) => {
                    if self.display_ping {
                        info!(
                            proxy = %conn.entry,
                            ping_ms = started.elapsed().as_millis() as u64,
                            "request served"
                        );
                    }
                    return Ok(value);
                }
                Err(e) => match e.classification() {
                    Classification::RateLimited => {
                        rotations += 1;
                        if rotations > self.policy.max_rotations {
                            return Err(Error::AllRateLimited(e));
                        }
                        warn!(proxy = %conn.entry, rotations, "rate limited, rotating proxy");
                        self.manager.rotate().await;
                        self.backoff(self.policy.rate_limit_backoff, cancel).await?;
                    }
                    Classification::TimedOut => {
                        rotations += 1;
                        if rotations > self.policy.max_rotations {
                            return Err(Error::AllTimedOut(e));
                        }
                        warn!(proxy = %conn.entry, rotations, "request timed out, rotating proxy");
                        self.manager.rotate().await;
                        self.backoff(self.policy.timeout_backoff, cancel).await?;
                    }
                    Classification::Fatal => return Err(Error::Api(e)),
                },
            }
        }
    }

    async fn backoff(&self, delay: Duration, cancel: &CancellationToken) -> Result<()> {
        tokio::select! {
            _ = cancel.cancelled() => Err(Error::Cancelled),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}
