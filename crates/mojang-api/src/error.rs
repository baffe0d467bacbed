//! Error types and failure classification
//!
//! Every failed call maps to a tagged variant so callers never have to match
//! on message text. `Classification` is the view the retry layer cares
//! about: rotate (rate limit or timeout) or give up.

use thiserror::Error;

/// How the retry layer should treat a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Remote returned 429 - the current egress identity is burned,
    /// rotate to the next one.
    RateLimited,
    /// The request hit the client timeout - rotate, shorter pause.
    TimedOut,
    /// Not recoverable by rotation.
    Fatal,
}

/// Errors from Mojang API calls.
#[derive(Debug, Error)]
pub enum Error {
    #[error("rate limited by remote API")]
    RateLimited,

    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),

    #[error("no profile found with name {0:?}")]
    NoSuchProfile(String),

    #[error("could not change name for this profile: {0}")]
    NameUnavailable(String),

    #[error("access credential rejected: {0}")]
    Forbidden(String),

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl Error {
    /// Map a reqwest send error, splitting timeouts out from everything else.
    pub(crate) fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Error::Timeout(e)
        } else {
            Error::Transport(e)
        }
    }

    /// Classify this error for the rotation/retry layer.
    pub fn classification(&self) -> Classification {
        match self {
            Error::RateLimited => Classification::RateLimited,
            Error::Timeout(_) => Classification::TimedOut,
            _ => Classification::Fatal,
        }
    }
}

/// Result alias for API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_classifies_as_rate_limited() {
        assert_eq!(Error::RateLimited.classification(), Classification::RateLimited);
    }

    #[test]
    fn expected_signals_classify_as_fatal() {
        // NoSuchProfile and NameUnavailable are steady-state signals for the
        // runners, but the rotation layer must pass them through untouched.
        assert_eq!(
            Error::NoSuchProfile("Notch".into()).classification(),
            Classification::Fatal
        );
        assert_eq!(
            Error::NameUnavailable("taken".into()).classification(),
            Classification::Fatal
        );
    }

    #[test]
    fn credential_and_status_errors_classify_as_fatal() {
        assert_eq!(
            Error::Forbidden("401".into()).classification(),
            Classification::Fatal
        );
        assert_eq!(
            Error::Status {
                status: 500,
                body: "internal".into()
            }
            .classification(),
            Classification::Fatal
        );
    }

    #[test]
    fn error_display_is_descriptive() {
        assert_eq!(
            Error::RateLimited.to_string(),
            "rate limited by remote API"
        );
        assert!(
            Error::NoSuchProfile("Notch".into())
                .to_string()
                .contains("Notch")
        );
        let status = Error::Status {
            status: 503,
            body: "unavailable".into(),
        };
        assert!(status.to_string().contains("503"));
        assert!(status.to_string().contains("unavailable"));
    }
}
