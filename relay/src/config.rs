//! Relay configuration
//!
//! Values come from command line arguments (with environment fallbacks, see
//! `main.rs`); this module holds the validated result and its defaults.

use std::net::SocketAddr;
use std::time::Duration;

use url::Url;

use crate::error::{RelayError, RelayResult};

/// Bucket name of the current deployment
pub const DEFAULT_CACHE_VERSION: &str = "speakerbot-v1";

/// Path prefix reserved for backend calls
pub const DEFAULT_API_PREFIX: &str = "/v1/";

/// Backend endpoint that reports new lines of a watched file
pub const DEFAULT_MONITOR_ENDPOINT: &str = "/v1/monitor/read-file";

/// Timer granularity of the polling loop
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_millis(250);

/// Spacing between effective polls when a start command gives none
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

pub const DEFAULT_LANGUAGE: &str = "pt";

/// Assets stored in the current bucket at install time
pub const DEFAULT_PRECACHE_ASSETS: &[&str] = &["/manifest.json", "/service-worker.js"];

#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub bind_addr: SocketAddr,
    /// Origin of the TTS backend; also the "same origin" for response typing
    pub upstream: Url,
    pub cache_version: String,
    pub api_prefix: String,
    pub monitor_endpoint: String,
    pub tick_period: Duration,
    pub default_interval_ms: u64,
    pub default_language: String,
    pub precache_assets: Vec<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            upstream: Url::parse("http://127.0.0.1:8000/").expect("static upstream URL is valid"),
            cache_version: DEFAULT_CACHE_VERSION.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            monitor_endpoint: DEFAULT_MONITOR_ENDPOINT.to_string(),
            tick_period: DEFAULT_TICK_PERIOD,
            default_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            default_language: DEFAULT_LANGUAGE.to_string(),
            precache_assets: DEFAULT_PRECACHE_ASSETS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl RelayConfig {
    pub fn with_upstream(mut self, upstream: Url) -> Self {
        self.upstream = upstream;
        self
    }

    pub fn with_cache_version(mut self, version: impl Into<String>) -> Self {
        self.cache_version = version.into();
        self
    }

    pub fn with_precache_assets(mut self, assets: Vec<String>) -> Self {
        self.precache_assets = assets;
        self
    }

    pub fn validate(&self) -> RelayResult<()> {
        if self.cache_version.trim().is_empty() {
            return Err(RelayError::config("cache version must not be empty"));
        }
        if !self.api_prefix.starts_with('/') {
            return Err(RelayError::config(format!(
                "API prefix must start with '/': {}",
                self.api_prefix
            )));
        }
        if !self.monitor_endpoint.starts_with('/') {
            return Err(RelayError::config(format!(
                "monitor endpoint must start with '/': {}",
                self.monitor_endpoint
            )));
        }
        if self.tick_period.is_zero() {
            return Err(RelayError::config("tick period must be greater than zero"));
        }
        if self.upstream.cannot_be_a_base() {
            return Err(RelayError::config(format!("upstream is not a base URL: {}", self.upstream)));
        }
        Ok(())
    }

    /// Absolute upstream URL for a path (and query) as seen by the page
    pub fn upstream_url(&self, path_and_query: &str) -> RelayResult<Url> {
        Ok(self.upstream.join(path_and_query)?)
    }

    pub fn monitor_url(&self) -> RelayResult<Url> {
        self.upstream_url(&self.monitor_endpoint)
    }
}
