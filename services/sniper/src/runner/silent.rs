//! Silent runner: check availability, then claim
//!
//! One availability lookup per iteration, and a name-change request only
//! when the name looks free. The claim endpoint has a much stricter rate
//! limit than the lookup, so this trades one extra round trip per iteration
//! for far less pressure on the mutating call. Every so often the session
//! itself is re-validated with a direct, un-proxied profile fetch.

use std::time::Duration;

use rand::RngExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use mojang_api::Mojang;

use crate::error::{Error, Result};
use crate::runner::{NameStatus, RunnerContext, pace};

/// One in this many iterations re-validates the session.
const SESSION_CHECK_ODDS: u32 = 5000;

/// Timeout for the direct session-check client.
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn run(
    ctx: &RunnerContext,
    status: &mut NameStatus,
    cancel: &CancellationToken,
) -> Result<()> {
    while !cancel.is_cancelled() {
        if rand::rng().random_range(0..SESSION_CHECK_ODDS) == 0 {
            verify_session(ctx).await?;
        }

        let available = match check_availability(ctx, cancel).await {
            Ok(available) => available,
            Err(Error::Request(proxy_pool::Error::Cancelled)) => return Ok(()),
            Err(e) => {
                error!(error = %e, "availability check failed");
                return Err(e);
            }
        };
        info!(name = %ctx.target, available, "availability checked");

        if available {
            warn!(name = %ctx.target, "name appears available, attempting claim");
            claim(ctx, status, cancel).await;
        }

        if !pace(ctx.delay, cancel).await {
            break;
        }
    }
    Ok(())
}

/// Fetch the authenticated profile without going through the proxy layer.
///
/// Only a rejected credential is fatal; any other failure here is ignored
/// and the next sampled iteration tries again.
pub(crate) async fn verify_session(ctx: &RunnerContext) -> Result<()> {
    let client = match reqwest::Client::builder().timeout(VERIFY_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            debug!(error = %e, "could not build session-check client, skipping");
            return Ok(());
        }
    };
    let api = Mojang::with_endpoints(client, ctx.endpoints.clone());

    match api.profile(&ctx.session).await {
        Ok(profile) => {
            debug!(name = %profile.name, "session still valid");
            Ok(())
        }
        Err(e @ mojang_api::Error::Forbidden(_)) => Err(Error::CredentialInvalid(e)),
        Err(e) => {
            debug!(error = %e, "session check failed, ignoring");
            Ok(())
        }
    }
}

/// Look the target name up through the rotation layer.
///
/// A resolved identifier means the name is taken; a missing profile means it
/// is available. Anything else is fatal.
async fn check_availability(ctx: &RunnerContext, cancel: &CancellationToken) -> Result<bool> {
    let lookup = ctx
        .executor
        .run(cancel, |client| {
            let api = Mojang::with_endpoints(client, ctx.endpoints.clone());
            let target = ctx.target.clone();
            async move { api.uuid_by_name(&target).await }
        })
        .await;

    match lookup {
        Ok(profile) => {
            debug!(id = %profile.id, "name resolved, still taken");
            Ok(false)
        }
        Err(proxy_pool::Error::Api(mojang_api::Error::NoSuchProfile(_))) => Ok(true),
        Err(e) => Err(e.into()),
    }
}

/// Submit the claim. Failures here are logged but never end the loop: the
/// next iteration re-checks availability anyway.
async fn claim(ctx: &RunnerContext, status: &mut NameStatus, cancel: &CancellationToken) {
    let attempt = ctx
        .executor
        .run(cancel, |client| {
            let api = Mojang::with_endpoints(client, ctx.endpoints.clone());
            let session = ctx.session.clone();
            let target = ctx.target.clone();
            async move { api.change_name(&session, &target).await }
        })
        .await;

    match attempt {
        Ok(profile) if profile.name == ctx.target => {
            info!(name = %ctx.target, "name claimed");
            status.record(&ctx.target);
        }
        Ok(profile) => {
            error!(got = %profile.name, want = %ctx.target, "claim landed on a different name");
        }
        Err(e) => {
            error!(error = %e, "failed to claim name");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use mojang_api::{Endpoints, Session};
    use proxy_pool::{ConnectionManager, Executor, ProxyPool};

    fn test_ctx(server: &MockServer, target: &str) -> RunnerContext {
        let manager = Arc::new(ConnectionManager::new(ProxyPool::new(Vec::new())));
        RunnerContext {
            executor: Executor::new(manager),
            endpoints: Endpoints {
                profile_api: server.uri(),
                services_api: server.uri(),
            },
            session: Session::new("tok-123".into()),
            target: target.into(),
            delay: Duration::from_millis(10),
        }
    }

    fn profile_json(name: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "069a79f444e94726a5befca90e38aaf5",
            "name": name
        })
    }

    async fn run_for(
        ctx: RunnerContext,
        running_for: Duration,
    ) -> (Result<()>, NameStatus) {
        let cancel = CancellationToken::new();
        let stopper = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(running_for).await;
            stopper.cancel();
        });
        let handle = tokio::spawn(async move {
            let mut status = NameStatus::default();
            (run(&ctx, &mut status, &cancel).await, status)
        });
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn available_name_triggers_a_claim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profiles/minecraft/Target"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/minecraft/profile/name/Target"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("Target")))
            .expect(1..)
            .mount(&server)
            .await;

        let (result, status) =
            run_for(test_ctx(&server, "Target"), Duration::from_millis(150)).await;

        assert!(result.is_ok(), "got {result:?}");
        assert_eq!(status.current(), Some("Target"));
        server.verify().await;
    }

    #[tokio::test]
    async fn taken_name_skips_the_claim() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profiles/minecraft/Target"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("Target")))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/minecraft/profile/name/Target"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("Target")))
            .expect(0)
            .mount(&server)
            .await;

        let (result, status) =
            run_for(test_ctx(&server, "Target"), Duration::from_millis(150)).await;

        assert!(result.is_ok());
        assert_eq!(status.current(), None);
        server.verify().await;
    }

    #[tokio::test]
    async fn failed_claim_is_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/profiles/minecraft/Target"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let (result, status) =
            run_for(test_ctx(&server, "Target"), Duration::from_millis(150)).await;

        assert!(result.is_ok(), "claim failures must not end the loop");
        assert_eq!(status.current(), None);
    }

    #[tokio::test]
    async fn failed_availability_check_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let ctx = test_ctx(&server, "Target");
        let cancel = CancellationToken::new();
        let mut status = NameStatus::default();
        let result = tokio::time::timeout(
            Duration::from_secs(5),
            run(&ctx, &mut status, &cancel),
        )
        .await
        .unwrap();

        assert!(matches!(result, Err(Error::Request(_))), "got {result:?}");
    }

    #[tokio::test]
    async fn verify_session_rejected_credential_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/minecraft/profile"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
            .mount(&server)
            .await;

        let ctx = test_ctx(&server, "Target");
        let result = verify_session(&ctx).await;
        assert!(matches!(result, Err(Error::CredentialInvalid(_))));
    }

    #[tokio::test]
    async fn verify_session_ignores_other_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/minecraft/profile"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let ctx = test_ctx(&server, "Target");
        assert!(verify_session(&ctx).await.is_ok());
    }

    #[tokio::test]
    async fn verify_session_accepts_valid_session() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/minecraft/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(profile_json("Current")))
            .mount(&server)
            .await;

        let ctx = test_ctx(&server, "Target");
        assert!(verify_session(&ctx).await.is_ok());
    }
}
