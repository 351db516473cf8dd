//! recon.toml configuration parser.
//!
//! All sections are optional; resolved settings fall back to the defaults
//! the components were tuned for. Configuration is threaded explicitly
//! into constructors; nothing reads ambient globals.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Seconds to keep probing before declaring the backend offline.
///
/// Sized for the cold-start window of the hosted backend, which can take
/// up to two minutes to answer its first request.
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(120);

/// Delay between probe rounds.
const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(4);

/// Per-candidate probe timeout.
const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(8);

/// Delay between job status polls.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Consecutive poll failures tolerated before the job is declared lost.
const DEFAULT_MAX_CONSECUTIVE_ERRORS: u32 = 10;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconConfig {
    pub backend: Option<BackendSection>,
    pub reach: Option<ReachSection>,
    pub poll: Option<PollSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackendSection {
    /// Explicit backend base URL; scheme-less input is coerced to https.
    pub url: Option<String>,
    /// Static API key sent as `X-API-Key` on every request.
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReachSection {
    pub max_wait: Option<String>,
    pub probe_interval: Option<String>,
    pub probe_timeout: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollSection {
    pub interval: Option<String>,
    pub max_consecutive_errors: Option<u32>,
}

impl ReconConfig {
    pub fn from_file(path: &Path) -> CoreResult<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| CoreError::Read(e.to_string()))?;
        toml::from_str(&content).map_err(|e| CoreError::Parse(e.to_string()))
    }

    pub fn to_toml_string(&self) -> CoreResult<String> {
        toml::to_string_pretty(self).map_err(|e| CoreError::Serialize(e.to_string()))
    }

    /// Scaffold a config with every knob spelled out at its default.
    pub fn scaffold() -> Self {
        ReconConfig {
            backend: Some(BackendSection {
                url: None,
                api_key: Some("osint-recon-key-2026".to_string()),
            }),
            reach: Some(ReachSection {
                max_wait: Some("120s".to_string()),
                probe_interval: Some("4s".to_string()),
                probe_timeout: Some("8s".to_string()),
            }),
            poll: Some(PollSection {
                interval: Some("2s".to_string()),
                max_consecutive_errors: Some(DEFAULT_MAX_CONSECUTIVE_ERRORS),
            }),
        }
    }

    /// Resolve the reachability settings, applying defaults.
    pub fn reach_settings(&self) -> ReachSettings {
        let section = self.reach.clone().unwrap_or_default();
        ReachSettings {
            max_wait: section
                .max_wait
                .as_deref()
                .and_then(parse_duration)
                .unwrap_or(DEFAULT_MAX_WAIT),
            probe_interval: section
                .probe_interval
                .as_deref()
                .and_then(parse_duration)
                .unwrap_or(DEFAULT_PROBE_INTERVAL),
            probe_timeout: section
                .probe_timeout
                .as_deref()
                .and_then(parse_duration)
                .unwrap_or(DEFAULT_PROBE_TIMEOUT),
        }
    }

    /// Resolve the polling settings, applying defaults.
    pub fn poll_settings(&self) -> PollSettings {
        let section = self.poll.clone().unwrap_or_default();
        PollSettings {
            interval: section
                .interval
                .as_deref()
                .and_then(parse_duration)
                .unwrap_or(DEFAULT_POLL_INTERVAL),
            max_consecutive_errors: section
                .max_consecutive_errors
                .unwrap_or(DEFAULT_MAX_CONSECUTIVE_ERRORS),
        }
    }
}

/// Resolved reachability monitor settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReachSettings {
    /// Budget before the monitor gives up and reports offline.
    pub max_wait: Duration,
    /// Delay between probe rounds.
    pub probe_interval: Duration,
    /// Per-candidate probe timeout within a round.
    pub probe_timeout: Duration,
}

impl Default for ReachSettings {
    fn default() -> Self {
        Self {
            max_wait: DEFAULT_MAX_WAIT,
            probe_interval: DEFAULT_PROBE_INTERVAL,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

/// Resolved job poller settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    /// Delay between status polls.
    pub interval: Duration,
    /// Consecutive failures tolerated before declaring the job lost.
    pub max_consecutive_errors: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_consecutive_errors: DEFAULT_MAX_CONSECUTIVE_ERRORS,
        }
    }
}

/// Parse a duration string like "5s", "500ms", "2m".
///
/// A bare number is read as seconds.
pub fn parse_duration(s: &str) -> Option<Duration> {
    let s = s.trim();
    if let Some(secs) = s.strip_suffix('s') {
        if let Some(ms) = secs.strip_suffix('m') {
            ms.parse::<u64>().ok().map(Duration::from_millis)
        } else {
            secs.parse::<u64>().ok().map(Duration::from_secs)
        }
    } else if let Some(mins) = s.strip_suffix('m') {
        mins.parse::<u64>().ok().map(|m| Duration::from_secs(m * 60))
    } else {
        s.parse::<u64>().ok().map(Duration::from_secs)
    }
}

/// Pick the first set value when layering flag > env > file > default.
pub fn first_set<T>(layers: Vec<Option<T>>) -> Option<T> {
    layers.into_iter().flatten().next()
}
