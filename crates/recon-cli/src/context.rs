//! Resolved invocation context: config file, environment, and flags
//! layered into the explicit settings the components take.

use std::path::Path;

use anyhow::Context as _;
use recon_core::config::first_set;
use recon_core::{PollSettings, ReachSettings, ReconConfig, resolve_candidates};
use tracing::debug;

/// Development fallback key, matching the backend's own default.
const DEV_API_KEY: &str = "osint-recon-key-2026";

/// Environment variable overriding the API key.
pub const API_KEY_ENV: &str = "RECON_API_KEY";

/// Environment variable overriding the backend base URL.
pub const BACKEND_URL_ENV: &str = "RECON_BACKEND_URL";

/// Everything a command needs, resolved once at startup and passed down
/// explicitly.
pub struct AppContext {
    pub api_key: String,
    pub candidates: Vec<String>,
    pub explicit_url: Option<String>,
    pub reach: ReachSettings,
    pub poll: PollSettings,
}

impl AppContext {
    /// Layer flag > environment > config file > default.
    pub fn resolve(
        config_path: Option<&Path>,
        api_key_flag: Option<String>,
        url_flag: Option<String>,
        hostname: Option<String>,
    ) -> anyhow::Result<Self> {
        let config = match config_path {
            Some(path) => ReconConfig::from_file(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => {
                let default = Path::new("recon.toml");
                if default.exists() {
                    ReconConfig::from_file(default).context("loading ./recon.toml")?
                } else {
                    debug!("no recon.toml found, using defaults");
                    ReconConfig::default()
                }
            }
        };

        let backend = config.backend.clone().unwrap_or_default();
        let api_key = first_set(vec![
            api_key_flag,
            std::env::var(API_KEY_ENV).ok(),
            backend.api_key,
        ])
        .unwrap_or_else(|| DEV_API_KEY.to_string());

        let explicit_url = first_set(vec![
            url_flag,
            std::env::var(BACKEND_URL_ENV).ok(),
            backend.url,
        ]);

        let candidates = resolve_candidates(explicit_url.as_deref(), hostname.as_deref());

        Ok(Self {
            api_key,
            candidates,
            explicit_url,
            reach: config.reach_settings(),
            poll: config.poll_settings(),
        })
    }
}
