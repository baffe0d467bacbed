//! name-sniper
//!
//! Polls the Mojang APIs until a target player name can be claimed, rotating
//! through a pool of HTTP proxies to survive the rate limits. Wires config,
//! session, pool, and the selected runner together, and restarts the whole
//! session (fresh pool shuffle included) after any fatal runner error.

mod config;
mod error;
mod runner;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mojang_api::{Endpoints, Mojang, Profile, Session};
use proxy_pool::{ConnectionManager, Executor, ProxyPool, RetryPolicy};

use crate::config::Config;
use crate::runner::{NameStatus, RunnerContext};

/// Pause before rebuilding the session after a fatal runner error.
const RESTART_PAUSE: Duration = Duration::from_secs(20);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with LOG_LEVEL / RUST_LOG support
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("LOG_LEVEL")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("starting name-sniper");

    // CLI: simple --config flag parsing
    let args: Vec<String> = std::env::args().collect();
    let cli_config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str());

    let config_path = Config::resolve_path(cli_config_path);
    info!(path = %config_path.display(), "loading configuration");

    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    let token = config
        .session
        .access_token
        .as_ref()
        .context("no access token: set NAME_SNIPER_TOKEN or session.token_file")?;
    let session = Session::new(token.expose().clone());

    let proxies = match &config.proxy.list_file {
        Some(path) => {
            let list = config::load_proxy_list(path)
                .with_context(|| format!("failed to read proxy list {}", path.display()))?;
            info!(count = list.len(), "loaded proxy list");
            list
        }
        None => {
            warn!("no proxy list configured, expect harsh rate limits on a single egress address");
            Vec::new()
        }
    };

    info!(
        target = %config.target.name,
        mode = ?config.sniper.mode,
        delay_ms = config.sniper.delay_ms,
        max_rotations = config.sniper.max_rotations,
        "configuration loaded"
    );

    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("received SIGINT, shutting down");
                cancel.cancel();
            }
        });
    }

    let endpoints = Endpoints::default();
    let mut status = NameStatus::default();

    // Seed the current-name marker. Failure is expected for fresh accounts
    // that hold no profile yet.
    match startup_profile(&endpoints, &session).await {
        Ok(profile) => {
            info!(uuid = %profile.id, name = %profile.name, "authenticated profile resolved");
            status.record(profile.name);
        }
        Err(e) => warn!(error = %e, "could not resolve profile, assuming account with no name"),
    }

    while !cancel.is_cancelled() {
        // Fresh pool per session so every restart walks a reshuffled order.
        let pool = ProxyPool::new(proxies.clone());
        let manager = Arc::new(ConnectionManager::with_timeout(
            pool,
            Duration::from_secs(config.sniper.request_timeout_secs),
        ));
        let executor = Executor::new(manager.clone())
            .with_policy(RetryPolicy {
                max_rotations: config.sniper.max_rotations,
                ..RetryPolicy::default()
            })
            .display_ping(config.sniper.display_ping);

        let ctx = RunnerContext {
            executor,
            endpoints: endpoints.clone(),
            session: session.clone(),
            target: config.target.name.clone(),
            delay: Duration::from_millis(config.sniper.delay_ms),
        };

        match runner::run(config.sniper.mode, &ctx, &mut status, &cancel).await {
            Ok(()) => break,
            Err(e @ error::Error::CredentialInvalid(_)) => {
                error!(error = %e, "cannot continue without a new login");
                manager.dispose().await;
                return Err(e.into());
            }
            Err(e) => {
                error!(
                    error = %e,
                    pause_secs = RESTART_PAUSE.as_secs(),
                    "runner stopped, restarting session"
                );
                manager.dispose().await;
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = tokio::time::sleep(RESTART_PAUSE) => {}
                }
            }
        }
    }

    info!(current_name = ?status.current(), "shutdown complete");
    Ok(())
}

/// Fetch the authenticated profile once at startup, directly (no proxy).
async fn startup_profile(endpoints: &Endpoints, session: &Session) -> mojang_api::Result<Profile> {
    let client = reqwest::Client::builder()
        .timeout(proxy_pool::DEFAULT_TIMEOUT)
        .build()
        .map_err(mojang_api::Error::Transport)?;
    Mojang::with_endpoints(client, endpoints.clone())
        .profile(session)
        .await
}
