//! Configuration types and loading
//!
//! Config precedence: CLI `--config` flag > CONFIG_PATH env > default path.
//! The access token is resolved from the NAME_SNIPER_TOKEN env var or a
//! token_file, never stored in the TOML itself.

use std::path::{Path, PathBuf};

use common::Secret;
use serde::Deserialize;

/// Root configuration
#[derive(Debug, Deserialize)]
pub struct Config {
    pub target: TargetConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub sniper: SniperConfig,
    #[serde(default)]
    pub proxy: ProxyConfig,
}

/// The name being claimed
#[derive(Debug, Deserialize)]
pub struct TargetConfig {
    pub name: String,
}

/// Access credential resolution
#[derive(Debug, Default, Deserialize)]
pub struct SessionConfig {
    #[serde(skip)]
    pub access_token: Option<Secret<String>>,
    /// Path to a file containing the token (alternative to NAME_SNIPER_TOKEN)
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

/// Polling behavior
#[derive(Debug, Deserialize)]
pub struct SniperConfig {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_max_rotations")]
    pub max_rotations: u32,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub display_ping: bool,
}

impl Default for SniperConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            delay_ms: default_delay_ms(),
            max_rotations: default_max_rotations(),
            request_timeout_secs: default_timeout_secs(),
            display_ping: false,
        }
    }
}

/// Which runner drives the claim loop.
///
/// Aggressive fires name changes unconditionally (lowest latency, highest
/// rate-limit exposure); silent checks availability first and keeps request
/// volume off the stricter name-change limit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Aggressive,
    #[default]
    Silent,
}

/// Proxy list source
#[derive(Debug, Default, Deserialize)]
pub struct ProxyConfig {
    /// Text file with one proxy address per line; blanks and `#` lines skipped
    #[serde(default)]
    pub list_file: Option<PathBuf>,
}

fn default_delay_ms() -> u64 {
    5000
}

fn default_max_rotations() -> u32 {
    5
}

fn default_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from a TOML file, then overlay the token from the
    /// environment.
    ///
    /// Token resolution order:
    /// 1. NAME_SNIPER_TOKEN env var
    /// 2. token_file path from config
    pub fn load(path: &Path) -> common::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&contents)?;

        let name = &config.target.name;
        if !(3..=16).contains(&name.len())
            || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(common::Error::Config(format!(
                "target name must be 3-16 characters of [A-Za-z0-9_], got: {name:?}"
            )));
        }

        if config.sniper.delay_ms == 0 {
            return Err(common::Error::Config(
                "delay_ms must be greater than 0".into(),
            ));
        }

        if config.sniper.request_timeout_secs == 0 {
            return Err(common::Error::Config(
                "request_timeout_secs must be greater than 0".into(),
            ));
        }

        // Resolve token: env var takes precedence over file
        if let Ok(token) = std::env::var("NAME_SNIPER_TOKEN") {
            config.session.access_token = Some(Secret::new(token));
        } else if let Some(ref token_file) = config.session.token_file {
            let token = std::fs::read_to_string(token_file).map_err(|e| {
                common::Error::Config(format!(
                    "failed to read token_file {}: {e}",
                    token_file.display()
                ))
            })?;
            let token = token.trim().to_owned();
            if !token.is_empty() {
                config.session.access_token = Some(Secret::new(token));
            }
        }

        Ok(config)
    }

    /// Resolve config file path from CLI arg or CONFIG_PATH env var.
    pub fn resolve_path(cli_path: Option<&str>) -> PathBuf {
        if let Some(p) = cli_path {
            return PathBuf::from(p);
        }
        if let Ok(p) = std::env::var("CONFIG_PATH") {
            return PathBuf::from(p);
        }
        PathBuf::from("name-sniper.toml")
    }
}

/// Read a proxy list file: one address per line, blanks and comments skipped.
pub fn load_proxy_list(path: &Path) -> common::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_owned)
        .collect())
}
