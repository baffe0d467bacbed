//! Polling runners
//!
//! Two mutually exclusive loops drive the claim. Aggressive fires name
//! changes unconditionally; silent checks availability first and only claims
//! when the name looks free. Both loop until cancelled or a fatal error,
//! pacing each iteration with the configured delay.

pub mod aggressive;
pub mod silent;

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use mojang_api::{Endpoints, Session};
use proxy_pool::Executor;

use crate::config::Mode;
use crate::error::Result;

/// Everything one runner iteration needs, threaded explicitly so independent
/// sessions could run side by side.
#[derive(Clone)]
pub struct RunnerContext {
    pub executor: Executor,
    pub endpoints: Endpoints,
    pub session: Session,
    pub target: String,
    pub delay: Duration,
}

/// The name the account is currently known to hold.
///
/// Owned by the caller, updated by the runners when a claim lands. Purely
/// observability - nothing decides on it.
#[derive(Debug, Default)]
pub struct NameStatus {
    current: Option<String>,
}

impl NameStatus {
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn record(&mut self, name: impl Into<String>) {
        self.current = Some(name.into());
    }
}

/// Run the selected mode until cancellation or a fatal error.
pub async fn run(
    mode: Mode,
    ctx: &RunnerContext,
    status: &mut NameStatus,
    cancel: &CancellationToken,
) -> Result<()> {
    match mode {
        Mode::Aggressive => aggressive::run(ctx, status, cancel).await,
        Mode::Silent => silent::run(ctx, status, cancel).await,
    }
}

/// Cancel-aware inter-iteration sleep. Returns false when cancelled.
pub(crate) async fn pace(delay: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(delay) => true,
    }
}
