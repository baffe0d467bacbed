//! Opaque access credential
//!
//! Produced by whatever login flow the operator uses; this crate only
//! forwards it as a bearer token and never inspects it.

use common::Secret;

/// Bearer credential for the authenticated services endpoints.
#[derive(Debug, Clone)]
pub struct Session {
    access_token: Secret<String>,
}

impl Session {
    pub fn new(access_token: String) -> Self {
        Self {
            access_token: Secret::new(access_token),
        }
    }

    /// The raw token, for the Authorization header only.
    pub fn bearer(&self) -> &str {
        self.access_token.expose()
    }
}
