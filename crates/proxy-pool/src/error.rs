//! Error types for rotation and execution

use thiserror::Error;

/// Errors surfaced by the rotation layer.
///
/// `AllRateLimited` and `AllTimedOut` mean the rotation budget ran out; both
/// keep the last triggering API error as their source. `Api` passes through
/// anything rotation cannot fix.
#[derive(Debug, Error)]
pub enum Error {
    #[error("all proxies were rate-limited")]
    AllRateLimited(#[source] mojang_api::Error),

    #[error("all proxies have timed out")]
    AllTimedOut(#[source] mojang_api::Error),

    #[error("operation cancelled")]
    Cancelled,

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error(transparent)]
    Api(#[from] mojang_api::Error),
}

/// Result alias for rotation-layer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn exhaustion_errors_keep_their_source() {
        let err = Error::AllRateLimited(mojang_api::Error::RateLimited);
        assert_eq!(err.to_string(), "all proxies were rate-limited");
        assert!(err.source().is_some(), "source must be preserved");

        let err = Error::AllTimedOut(mojang_api::Error::RateLimited);
        assert_eq!(err.to_string(), "all proxies have timed out");
        assert!(err.source().is_some());
    }

    #[test]
    fn api_errors_pass_through_display() {
        let err = Error::from(mojang_api::Error::NoSuchProfile("Notch".into()));
        assert!(err.to_string().contains("Notch"));
    }
}
