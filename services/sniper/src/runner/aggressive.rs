//! Aggressive runner: fire name changes unconditionally
//!
//! Every iteration is a claim attempt, which minimizes latency-to-claim at
//! the cost of hammering the rate-limited name-change endpoint. While the
//! name is held by someone else the endpoint answers with the unavailable
//! signal, which is the expected steady state and gets swallowed; anything
//! else ends the loop.

use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use mojang_api::Mojang;

use crate::error::Result;
use crate::runner::{NameStatus, RunnerContext, pace};

pub async fn run(
    ctx: &RunnerContext,
    status: &mut NameStatus,
    cancel: &CancellationToken,
) -> Result<()> {
    while !cancel.is_cancelled() {
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
                warn!(got = %profile.name, want = %ctx.target, "name change landed on a different name");
            }
            // Steady state while the name is taken.
            Err(proxy_pool::Error::Api(mojang_api::Error::NameUnavailable(_))) => {}
            Err(proxy_pool::Error::Cancelled) => return Ok(()),
            Err(e) => {
                error!(error = %e, "name change failed");
                return Err(e.into());
            }
        }

        if !pace(ctx.delay, cancel).await {
            break;
        }
    }
    Ok(())
}
