// src/error.rs
// =============================================================================
// Error types for the probe engine.
//
// Two families:
// - TransportError: something went wrong on the wire during one probe. These
//   never leave the engine; the executor turns them into a Failure outcome.
// - EngineError: the caller handed us something unusable (bad URL, unknown
//   plan, impossible duration). These are returned to the caller.
// =============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("could not resolve hostname: {0}")]
    Dns(String),

    #[error("SSL/TLS error: {0}")]
    Tls(String),

    #[error("too many redirects (stopped after {0} hops)")]
    TooManyRedirects(usize),

    #[error("invalid redirect target '{0}'")]
    InvalidRedirect(String),

    #[error("invalid URL '{0}'")]
    InvalidUrl(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    // Sorts reqwest failures into our categories.
    // reqwest only exposes a few predicates, so DNS and TLS problems are
    // recognised from the message text.
    fn from(error: reqwest::Error) -> Self {
        let message = error.to_string();
        let detail = full_chain(&error);
        let lowered = detail.to_lowercase();

        if error.is_timeout() {
            TransportError::Timeout
        } else if lowered.contains("dns") || lowered.contains("resolve") {
            TransportError::Dns(message)
        } else if lowered.contains("certificate") || lowered.contains("tls") || lowered.contains("ssl") {
            TransportError::Tls(message)
        } else if error.is_connect() {
            TransportError::Connect(message)
        } else if error.is_builder() {
            TransportError::InvalidUrl(message)
        } else {
            TransportError::Other(detail)
        }
    }
}

// reqwest's Display only shows the outermost error; the cause chain is where
// "dns error" or "invalid peer certificate" shows up.
fn full_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid target URL '{url}': {reason}")]
    InvalidTarget { url: String, reason: String },

    #[error("no test plan for site '{0}'")]
    UnknownPlan(String),

    #[error("invalid {name} value {value}: must be a finite, non-negative number of seconds")]
    InvalidDuration { name: &'static str, value: f64 },

    #[error("could not build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
