// src/probe/executor.rs
// =============================================================================
// The two probes: robots.txt and availability.
//
// Both follow the same pattern:
// 1. Build the identity's headers (plus any configured extras)
// 2. One GET through the transport, timed, bounded by the configured timeout
// 3. Success -> classify the response; error -> Failure outcome, logged
//
// Nothing in here returns an error. A probe that couldn't reach the server
// is still a result, and the run carries on with the next probe.
// =============================================================================

use std::time::Instant;

use super::result::{Observation, ProbeKind, ProbeResult};
use super::transport::{TransportRequest, TransportResponse};
use crate::engine::Engine;
use crate::error::TransportError;
use crate::identity::headers_for;
use crate::policy::{policy_url_for, PolicyDocument};

impl Engine {
    /// Fetches `scheme://host/robots.txt` for `base_url` and parses it.
    ///
    /// The policy document is only filled in on HTTP 200; any other status or
    /// a transport failure gives an empty one.
    pub async fn probe_policy_file(&self, base_url: &str, identity: &str) -> ProbeResult {
        let policy_url = match policy_url_for(base_url) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::warn!("Cannot derive robots.txt location: {}", e);
                return ProbeResult::failure(base_url, identity, ProbeKind::Policy, e.to_string())
                    .with_policy(PolicyDocument::empty());
            }
        };

        tracing::info!("Checking robots.txt at {} as {}", policy_url, identity);

        match self.fetch(&policy_url, identity).await {
            Ok((response, elapsed)) => {
                let policy = if response.status == 200 {
                    PolicyDocument::parse(&String::from_utf8_lossy(&response.body))
                } else {
                    PolicyDocument::empty()
                };
                let observation =
                    Observation::from_response(&response, elapsed, &self.config.region_segment);

                ProbeResult::success(policy_url, identity, ProbeKind::Policy, observation)
                    .with_policy(policy)
            }
            Err(e) => {
                tracing::warn!("Error checking robots.txt at {}: {}", policy_url, e);
                ProbeResult::failure(policy_url, identity, ProbeKind::Policy, e.to_string())
                    .with_policy(PolicyDocument::empty())
            }
        }
    }

    /// Fetches `url` and records status, timing, headers, redirects and the
    /// cache/geo classification.
    pub async fn probe_availability(&self, url: &str, identity: &str) -> ProbeResult {
        self.probe_availability_in_region(url, identity, &self.config.region_segment)
            .await
    }

    // Same as probe_availability(), with the geo check against `region_segment`
    pub(crate) async fn probe_availability_in_region(
        &self,
        url: &str,
        identity: &str,
        region_segment: &str,
    ) -> ProbeResult {
        tracing::info!("Testing availability of {} as {}", url, identity);

        match self.fetch(url, identity).await {
            Ok((response, elapsed)) => {
                let observation = Observation::from_response(&response, elapsed, region_segment);
                tracing::debug!(
                    "{} -> HTTP {} in {:.3}s (final URL {})",
                    url,
                    observation.status_code,
                    observation.elapsed_seconds,
                    observation.final_url
                );
                ProbeResult::success(url, identity, ProbeKind::Availability, observation)
            }
            Err(e) => {
                tracing::warn!("Error testing {}: {}", url, e);
                ProbeResult::failure(url, identity, ProbeKind::Availability, e.to_string())
            }
        }
    }

    // One timed GET under an identity
    async fn fetch(
        &self,
        url: &str,
        identity: &str,
    ) -> Result<(TransportResponse, f64), TransportError> {
        let request = TransportRequest {
            url: url.to_string(),
            headers: headers_for(identity, Some(&self.config.extra_headers)),
            timeout: self.config.timeout,
        };

        let start = Instant::now();
        let response = self.transport.get(&request).await?;
        Ok((response, start.elapsed().as_secs_f64()))
    }
}
