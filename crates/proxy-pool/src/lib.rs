//! Proxy rotation for rate-limited polling
//!
//! Three layers, leaves first:
//! 1. [`ProxyPool`] - the egress identities for this run, shuffled once at
//!    construction and never mutated.
//! 2. [`ConnectionManager`] - owns the single live HTTP client, bound to the
//!    pool entry at the rotation cursor; rotation drops it so the next
//!    acquire binds the next entry.
//! 3. [`Executor`] - runs an operation against the current client and
//!    recovers rate limits and timeouts by rotating, up to a bounded budget.
//!
//! The manager's lock exists so a future second caller never observes a
//! half-applied rotation; the reference deployment runs one runner loop.

pub mod error;
pub mod executor;
pub mod manager;
pub mod pool;

pub use error::{Error, Result};
pub use executor::{Executor, RetryPolicy};
pub use manager::{ActiveConnection, ConnectionManager, DEFAULT_TIMEOUT};
pub use pool::{ProxyEntry, ProxyPool};
