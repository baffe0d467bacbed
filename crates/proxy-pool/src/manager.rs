//! Active connection ownership and rotation
//!
//! Owns at most one live HTTP client, bound to the pool entry at the
//! rotation cursor. `acquire` builds the client lazily; `rotate` drops it so
//! the next acquire binds the next pool entry. Both run under one mutex so
//! no caller ever observes a half-rotated connection, and the cursor only
//! moves forward (wrapping).

use std::time::Duration;

use tokio::sync::Mutex;
use tracing::info;

use crate::error::{Error, Result};
use crate::pool::{ProxyEntry, ProxyPool};

/// Network timeout applied to every built client.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The client currently in use, tagged with the pool entry it was built for.
///
/// Cloning is cheap: `reqwest::Client` is a handle over a shared connection
/// pool.
#[derive(Debug, Clone)]
pub struct ActiveConnection {
    pub client: reqwest::Client,
    pub index: usize,
    pub entry: ProxyEntry,
}

#[derive(Debug)]
struct Inner {
    cursor: usize,
    current: Option<ActiveConnection>,
}

/// Owner of the single active client.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: ProxyPool,
    timeout: Duration,
    inner: Mutex<Inner>,
}

impl ConnectionManager {
    pub fn new(pool: ProxyPool) -> Self {
        Self::with_timeout(pool, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(pool: ProxyPool, timeout: Duration) -> Self {
        // Start on the last entry so the first acquire wraps to index 0.
        let cursor = pool.len() - 1;
        Self {
            pool,
            timeout,
            inner: Mutex::new(Inner {
                cursor,
                current: None,
            }),
        }
    }

    /// Return the cached client, building one for the next pool entry if
    /// none is held.
    pub async fn acquire(&self) -> Result<ActiveConnection> {
        let mut inner = self.inner.lock().await;
        if let Some(conn) = &inner.current {
            return Ok(conn.clone());
        }

        let index = (inner.cursor + 1) % self.pool.len();
        let entry = self.pool.get(index).clone();
        info!(proxy = %entry, index, "binding client to egress identity");
        let client = self.build_client(&entry)?;

        let conn = ActiveConnection {
            client,
            index,
            entry,
        };
        inner.cursor = index;
        inner.current = Some(conn.clone());
        Ok(conn)
    }

    /// Drop the active client so the next acquire binds the next pool entry.
    /// Idempotent when no client is held.
    pub async fn rotate(&self) {
        let mut inner = self.inner.lock().await;
        inner.current = None;
    }

    /// Release the active client. Called once at shutdown; everything else
    /// is reclaimed when the manager is dropped.
    pub async fn dispose(&self) {
        let mut inner = self.inner.lock().await;
        inner.current = None;
    }

    /// Current cursor position, for status logging and tests.
    pub async fn cursor(&self) -> usize {
        self.inner.lock().await.cursor
    }

    pub fn pool(&self) -> &ProxyPool {
        &self.pool
    }

    fn build_client(&self, entry: &ProxyEntry) -> Result<reqwest::Client> {
        let builder = reqwest::Client::builder().timeout(self.timeout);
        let builder = match entry {
            ProxyEntry::Direct => builder,
            ProxyEntry::Proxy(addr) => builder.proxy(
                reqwest::Proxy::all(addr)
                    .map_err(|e| Error::ClientBuild(format!("invalid proxy address {addr}: {e}")))?,
            ),
        };
        builder
            .build()
            .map_err(|e| Error::ClientBuild(e.to_string()))
    }
}
