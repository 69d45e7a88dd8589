use std::env;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_ANNUAIRE_BASE_URL: &str = "https://annuaire.culturemap.local/api";
const DEFAULT_NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";
const DEFAULT_USER_AGENT: &str = "culturemap/0.1";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Application configuration loaded from environment variables.
/// Map defaults and cleaning rules live in the TOML FileConfig.
#[derive(Debug, Clone)]
pub struct Config {
    // Contact lookup
    pub annuaire_base_url: String,
    pub annuaire_token: Option<String>,

    // Place search
    pub nominatim_base_url: String,

    // HTTP
    pub user_agent: String,
    pub http_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            annuaire_base_url: DEFAULT_ANNUAIRE_BASE_URL.to_string(),
            annuaire_token: None,
            nominatim_base_url: DEFAULT_NOMINATIM_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, reading `.env` first.
    /// Every variable is optional; only a malformed value is an error.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let http_timeout = match env::var("HTTP_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.trim()
                    .parse()
                    .with_context(|| format!("HTTP_TIMEOUT_SECS must be a whole number, got {raw:?}"))?,
            ),
            Err(_) => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            annuaire_base_url: env::var("ANNUAIRE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_ANNUAIRE_BASE_URL.to_string()),
            annuaire_token: env::var("ANNUAIRE_TOKEN").ok().filter(|t| !t.is_empty()),
            nominatim_base_url: env::var("NOMINATIM_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_NOMINATIM_BASE_URL.to_string()),
            user_agent: env::var("CULTUREMAP_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
            http_timeout,
        })
    }

    /// Every setting as `(variable, value)`, with the token masked.
    pub fn redacted_settings(&self) -> Vec<(&'static str, String)> {
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => {
                    let head: String = v.chars().take(4).collect();
                    format!("{head}...({} chars)", v.chars().count())
                }
                _ => "<not set>".to_string(),
            }
        }

        vec![
            ("ANNUAIRE_BASE_URL", self.annuaire_base_url.clone()),
            ("ANNUAIRE_TOKEN", preview_opt(&self.annuaire_token)),
            ("NOMINATIM_BASE_URL", self.nominatim_base_url.clone()),
            ("HTTP_TIMEOUT_SECS", self.http_timeout.as_secs().to_string()),
            ("CULTUREMAP_USER_AGENT", self.user_agent.clone()),
        ]
    }

    /// Log the effective configuration with secrets masked.
    pub fn log_redacted(&self) {
        tracing::info!("Config loaded:");
        for (name, value) in self.redacted_settings() {
            tracing::info!("  {name}: {value}");
        }
    }
}
