//! Runner-level error types

use thiserror::Error;

/// Fatal conditions that end a runner loop.
///
/// The top level catches these, logs, pauses, and restarts the session -
/// except `CredentialInvalid`, which needs a re-login this binary cannot
/// perform.
#[derive(Debug, Error)]
pub enum Error {
    #[error("session credential rejected, re-authentication required")]
    CredentialInvalid(#[source] mojang_api::Error),

    #[error(transparent)]
    Request(#[from] proxy_pool::Error),
}

/// Result alias for runner operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn credential_invalid_keeps_source() {
        let err = Error::CredentialInvalid(mojang_api::Error::Forbidden("403".into()));
        assert_eq!(
            err.to_string(),
            "session credential rejected, re-authentication required"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn request_errors_pass_through_display() {
        let err = Error::from(proxy_pool::Error::Cancelled);
        assert_eq!(err.to_string(), "operation cancelled");
    }
}
