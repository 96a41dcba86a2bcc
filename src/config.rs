// src/config.rs
// =============================================================================
// Engine configuration.
//
// Everything here is decided once (from the command line) and then handed to
// the Engine, which keeps it for the whole run. Nothing mutates it afterwards.
// =============================================================================

use reqwest::header::HeaderMap;
use std::time::Duration;

use crate::error::EngineError;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default pause between probes of a multi-identity or multi-URL run
pub const DEFAULT_DELAY_SECS: f64 = 1.0;

/// Redirect hops followed before a probe is reported as failed
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Path segment that marks a regional variant of a site
pub const DEFAULT_REGION_SEGMENT: &str = "/uk/";

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on one HTTP call, redirect hops included
    pub timeout: Duration,
    /// Courtesy pause between probes
    pub delay: Duration,
    pub max_redirects: usize,
    /// Final URLs containing this segment count as regionally redirected
    pub region_segment: String,
    /// Headers sent with every probe, overriding identity headers
    pub extra_headers: HeaderMap,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            delay: Duration::from_secs_f64(DEFAULT_DELAY_SECS),
            max_redirects: DEFAULT_MAX_REDIRECTS,
            region_segment: DEFAULT_REGION_SEGMENT.to_string(),
            extra_headers: HeaderMap::new(),
        }
    }
}

impl EngineConfig {
    // Builds a config from the raw numbers the CLI accepts.
    // Rejects values that can't become a Duration (negative, NaN, infinite).
    pub fn from_secs(timeout_secs: f64, delay_secs: f64) -> Result<Self, EngineError> {
        Ok(Self {
            timeout: seconds("timeout", timeout_secs)?,
            delay: seconds("delay", delay_secs)?,
            ..Self::default()
        })
    }
}

fn seconds(name: &'static str, value: f64) -> Result<Duration, EngineError> {
    Duration::try_from_secs_f64(value).map_err(|_| EngineError::InvalidDuration { name, value })
}
