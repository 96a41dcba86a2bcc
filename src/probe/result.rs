// src/probe/result.rs
// =============================================================================
// The record of one probe.
//
// A ProbeResult is built exactly once, right after the request completes (or
// fails), and is never changed afterwards. All derived fields (accessibility,
// cache layer, geo redirect, ...) are computed at construction so the JSON
// report carries them and aggregation never has to re-derive anything.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::classify;
use super::transport::TransportResponse;
use crate::policy::PolicyDocument;

/// Which of the two probe types produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeKind {
    /// GET of the site's robots.txt
    Policy,
    /// GET of the target URL itself
    Availability,
}

/// Everything observed from a response that arrived
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub status_code: u16,
    /// Wall-clock time around the whole call, rounded to milliseconds
    pub elapsed_seconds: f64,
    pub response_headers: BTreeMap<String, String>,
    pub body_byte_length: usize,
    pub final_url: String,
    pub redirect_chain: Vec<String>,

    // Derived fields
    pub is_accessible: bool,
    pub redirected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    pub is_cache_layer: bool,
    pub is_geo_redirected: bool,
    pub cache_headers: BTreeMap<String, String>,
}

/// Success or failure of one probe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeOutcome {
    Success(Observation),
    Failure { error_description: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    pub target_url: String,
    pub identity_name: String,
    pub kind: ProbeKind,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: ProbeOutcome,
    /// Parsed robots.txt; present on policy probes only (empty unless HTTP 200)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicyDocument>,
}

impl Observation {
    // Classifies a transport response
    pub fn from_response(
        response: &TransportResponse,
        elapsed_seconds: f64,
        region_segment: &str,
    ) -> Self {
        let response_headers = classify::header_table(&response.headers);
        let server_fingerprint = response_headers.get("server").cloned();
        let content_type = response_headers.get("content-type").cloned();

        Self {
            status_code: response.status,
            elapsed_seconds: (elapsed_seconds * 1000.0).round() / 1000.0,
            body_byte_length: response.body.len(),
            final_url: response.final_url.clone(),
            redirect_chain: response.history.clone(),
            is_accessible: classify::is_accessible(response.status),
            redirected: !response.history.is_empty(),
            is_cache_layer: classify::is_cache_layer(server_fingerprint.as_deref()),
            is_geo_redirected: classify::is_geo_redirected(
                response.status,
                &response.final_url,
                region_segment,
            ),
            cache_headers: classify::cache_headers(&response_headers),
            server_fingerprint,
            content_type,
            response_headers,
        }
    }
}

impl ProbeResult {
    pub fn success(
        target_url: impl Into<String>,
        identity_name: impl Into<String>,
        kind: ProbeKind,
        observation: Observation,
    ) -> Self {
        Self {
            target_url: target_url.into(),
            identity_name: identity_name.into(),
            kind,
            timestamp: Utc::now(),
            outcome: ProbeOutcome::Success(observation),
            policy: None,
        }
    }

    pub fn failure(
        target_url: impl Into<String>,
        identity_name: impl Into<String>,
        kind: ProbeKind,
        error_description: impl Into<String>,
    ) -> Self {
        Self {
            target_url: target_url.into(),
            identity_name: identity_name.into(),
            kind,
            timestamp: Utc::now(),
            outcome: ProbeOutcome::Failure {
                error_description: error_description.into(),
            },
            policy: None,
        }
    }

    pub fn with_policy(mut self, policy: PolicyDocument) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn observation(&self) -> Option<&Observation> {
        match &self.outcome {
            ProbeOutcome::Success(observation) => Some(observation),
            ProbeOutcome::Failure { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            ProbeOutcome::Success(_) => None,
            ProbeOutcome::Failure { error_description } => Some(error_description),
        }
    }

    // Failures count as inaccessible and as "nothing detected" everywhere

    pub fn is_accessible(&self) -> bool {
        self.observation().is_some_and(|o| o.is_accessible)
    }

    pub fn is_policy_file_accessible(&self) -> bool {
        self.kind == ProbeKind::Policy && self.status_code() == Some(200)
    }

    pub fn is_cache_layer(&self) -> bool {
        self.observation().is_some_and(|o| o.is_cache_layer)
    }

    pub fn is_geo_redirected(&self) -> bool {
        self.observation().is_some_and(|o| o.is_geo_redirected)
    }

    pub fn status_code(&self) -> Option<u16> {
        self.observation().map(|o| o.status_code)
    }

    pub fn final_url(&self) -> Option<&str> {
        self.observation().map(|o| o.final_url.as_str())
    }

    pub fn server_fingerprint(&self) -> Option<&str> {
        self.observation().and_then(|o| o.server_fingerprint.as_deref())
    }
}
