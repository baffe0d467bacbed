//! Minimal Mojang API client for name lookup and claim
//!
//! Wraps the three endpoints the sniper needs: resolve a profile by name
//! (availability checks), change the active profile's name (the claim), and
//! fetch the authenticated profile (session verification). Responses are
//! mapped to tagged [`Error`] variants per endpoint, so the layers above
//! decide policy from error kinds, never from message text.
//!
//! The client borrows a caller-supplied `reqwest::Client`: the rotation
//! layer hands over a different client per egress identity, so this type is
//! built fresh per attempt and stays trivially cheap to construct.

mod error;
mod model;
mod session;

pub use error::{Classification, Error, Result};
pub use model::Profile;
pub use session::Session;

use tracing::debug;

/// Base URLs for the two Mojang API hosts.
///
/// Overridable so tests can point at a local mock server.
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Host serving the public profile lookup (`api.mojang.com`).
    pub profile_api: String,
    /// Host serving the authenticated profile/name endpoints
    /// (`api.minecraftservices.com`).
    pub services_api: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            profile_api: "https://api.mojang.com".into(),
            services_api: "https://api.minecraftservices.com".into(),
        }
    }
}

/// Thin client over a caller-supplied `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct Mojang {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl Mojang {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_endpoints(client, Endpoints::default())
    }

    pub fn with_endpoints(client: reqwest::Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// Resolve a profile by player name.
    ///
    /// A resolved profile means the name is taken; [`Error::NoSuchProfile`]
    /// means it is unclaimed.
    pub async fn uuid_by_name(&self, name: &str) -> Result<Profile> {
        let url = format!(
            "{}/users/profiles/minecraft/{name}",
            self.endpoints.profile_api
        );
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(Error::from_transport)?;

        match response.status().as_u16() {
            200 => response.json().await.map_err(Error::Decode),
            // Historically 204, nowadays 404: either way, nobody holds the name.
            204 | 404 => Err(Error::NoSuchProfile(name.to_owned())),
            429 => Err(Error::RateLimited),
            status => Err(Error::Status {
                status,
                body: read_body(response).await,
            }),
        }
    }

    /// Change the active profile's name - the claim operation.
    ///
    /// 403 is the expected steady-state answer while the name is held by
    /// someone else, surfaced as [`Error::NameUnavailable`].
    pub async fn change_name(&self, session: &Session, name: &str) -> Result<Profile> {
        let url = format!(
            "{}/minecraft/profile/name/{name}",
            self.endpoints.services_api
        );
        debug!(name, "submitting name change");
        let response = self
            .client
            .put(&url)
            .bearer_auth(session.bearer())
            .send()
            .await
            .map_err(Error::from_transport)?;

        match response.status().as_u16() {
            200 => response.json().await.map_err(Error::Decode),
            401 => Err(Error::Forbidden(read_body(response).await)),
            403 => Err(Error::NameUnavailable(read_body(response).await)),
            429 => Err(Error::RateLimited),
            status => Err(Error::Status {
                status,
                body: read_body(response).await,
            }),
        }
    }

    /// Fetch the profile belonging to the session's account.
    pub async fn profile(&self, session: &Session) -> Result<Profile> {
        let url = format!("{}/minecraft/profile", self.endpoints.services_api);
        let response = self
            .client
            .get(&url)
            .bearer_auth(session.bearer())
            .send()
            .await
            .map_err(Error::from_transport)?;

        match response.status().as_u16() {
            200 => response.json().await.map_err(Error::Decode),
            401 | 403 => Err(Error::Forbidden(read_body(response).await)),
            429 => Err(Error::RateLimited),
            status => Err(Error::Status {
                status,
                body: read_body(response).await,
            }),
        }
    }
}

async fn read_body(response: reqwest::Response) -> String {
    response
        .text()
        .await
        .unwrap_or_else(|_| String::from("<no body>"))
}
