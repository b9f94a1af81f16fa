//! Configuration module for the Backyard Eggs backend.
//!
//! All configuration is loaded from environment variables (and an optional
//! `.env` file). Only the repository owner and name have usable defaults;
//! secrets must be supplied externally. `GITHUB_TOKEN` is required unless the
//! in-memory store is selected with `EGGS_STORE=memory`.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// Connection details for the GitHub repository used as document storage.
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// Personal access token, required by the GitHub store
    pub token: Option<String>,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    /// Base URL of the REST API, overridable for GitHub Enterprise and tests
    pub api_url: String,
}

/// Where the JSON documents are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Github,
    /// Process memory, lost on restart. Local development only.
    Memory,
}

impl StoreBackend {
    fn parse(raw: &str) -> Result<Self, AppError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "github" => Ok(Self::Github),
            "memory" => Ok(Self::Memory),
            _ => Err(AppError::Config(format!("Invalid EGGS_STORE: {}", raw))),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub store: StoreBackend,
    pub github: GithubConfig,
    /// Shared secret gating the admin functions
    pub admin_password: Option<String>,
    /// Discord incoming webhook for new reservations
    pub discord_webhook_url: Option<String>,
    /// Directory holding the static front end
    pub site_dir: Option<PathBuf>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines instead of the human-readable format
    pub log_json: bool,
    /// Timeout applied to outbound HTTP requests
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let github = GithubConfig {
            token: non_empty_var("GITHUB_TOKEN"),
            owner: non_empty_var("GITHUB_OWNER").unwrap_or_else(|| "EddieDaGhost".to_string()),
            repo: non_empty_var("GITHUB_REPO").unwrap_or_else(|| "backyard-eggs".to_string()),
            branch: non_empty_var("GITHUB_BRANCH").unwrap_or_else(|| "main".to_string()),
            api_url: non_empty_var("GITHUB_API_URL")
                .unwrap_or_else(|| "https://api.github.com".to_string()),
        };

        let store = match non_empty_var("EGGS_STORE") {
            Some(raw) => StoreBackend::parse(&raw)?,
            None => StoreBackend::Github,
        };
        if store == StoreBackend::Github && github.token.is_none() {
            return Err(AppError::Config(
                "GITHUB_TOKEN is required (set EGGS_STORE=memory for a throwaway in-memory store)"
                    .to_string(),
            ));
        }

        let bind_addr = non_empty_var("EGGS_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8888".to_string());
        let bind_addr: SocketAddr = bind_addr
            .parse()
            .map_err(|_| AppError::Config(format!("Invalid EGGS_BIND_ADDR: {}", bind_addr)))?;

        let http_timeout = match non_empty_var("EGGS_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|_| {
                AppError::Config(format!("Invalid EGGS_HTTP_TIMEOUT_SECS: {}", raw))
            })?,
            None => Duration::from_secs(10),
        };

        let log_json = non_empty_var("EGGS_LOG_FORMAT")
            .map(|format| format.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        Ok(Self {
            store,
            github,
            admin_password: non_empty_var("ADMIN_PASSWORD"),
            discord_webhook_url: non_empty_var("DISCORD_WEBHOOK_URL"),
            site_dir: non_empty_var("EGGS_SITE_DIR").map(PathBuf::from),
            bind_addr,
            log_level: non_empty_var("EGGS_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_json,
            http_timeout,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
