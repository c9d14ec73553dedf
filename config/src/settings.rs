//! Typed settings read from the (already layered) process environment.

use std::time::Duration;

use tracing::warn;

/// Chat completions endpoint of the search service.
pub const DEFAULT_BASE_URL: &str = "https://api.perplexity.ai/chat/completions";
/// Per-attempt timeout for one search-service call.
pub const DEFAULT_ATTEMPT_TIMEOUT_SECS: u64 = 45;
/// Attempts per structured retrieval before accepting whatever came back.
pub const DEFAULT_MAX_ATTEMPTS: usize = 10;
/// HTTP listen address for `citypulse serve`.
pub const DEFAULT_ADDR: &str = "127.0.0.1:5001";

const KEY_PERPLEXITY_API_KEY: &str = "PERPLEXITY_API_KEY";
const KEY_MAPS_API_KEY: &str = "GOOGLE_MAPS_API_KEY";
const KEY_BASE_URL: &str = "PERPLEXITY_BASE_URL";
const KEY_ATTEMPT_TIMEOUT: &str = "CITYPULSE_ATTEMPT_TIMEOUT_SECS";
const KEY_MAX_ATTEMPTS: &str = "CITYPULSE_MAX_ATTEMPTS";
const KEY_ADDR: &str = "CITYPULSE_ADDR";

/// Values the server and CLI need at startup.
///
/// The search-service key stays optional here; the gateway decides whether its absence is fatal.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub perplexity_api_key: Option<String>,
    pub maps_api_key: Option<String>,
    pub base_url: String,
    pub attempt_timeout: Duration,
    pub max_attempts: usize,
    pub addr: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            perplexity_api_key: None,
            maps_api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            attempt_timeout: Duration::from_secs(DEFAULT_ATTEMPT_TIMEOUT_SECS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

impl Settings {
    /// Reads settings from the process environment. Call after [`crate::load_and_apply`].
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`; unset, empty or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let default = Self::default();

        let attempt_timeout = parse_or(non_empty(KEY_ATTEMPT_TIMEOUT), KEY_ATTEMPT_TIMEOUT)
            .filter(|secs: &u64| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(default.attempt_timeout);
        let max_attempts = parse_or(non_empty(KEY_MAX_ATTEMPTS), KEY_MAX_ATTEMPTS)
            .filter(|n: &usize| *n > 0)
            .unwrap_or(default.max_attempts);

        Self {
            perplexity_api_key: non_empty(KEY_PERPLEXITY_API_KEY),
            maps_api_key: non_empty(KEY_MAPS_API_KEY),
            base_url: non_empty(KEY_BASE_URL).unwrap_or(default.base_url),
            attempt_timeout,
            max_attempts,
            addr: non_empty(KEY_ADDR).unwrap_or(default.addr),
        }
    }
}

fn parse_or<T: std::str::FromStr>(raw: Option<String>, key: &str) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable setting, using default");
            None
        }
    }
}
