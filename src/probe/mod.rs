// src/probe/mod.rs
// =============================================================================
// This module issues single, identity-tagged HTTP probes and classifies them.
//
// Submodules:
// - transport: the HTTP collaborator (trait + reqwest implementation)
// - classify: cache-layer / geo-redirect / header heuristics
// - result: ProbeResult and its outcome types
// - executor: the policy-file and availability probes (methods on Engine)
// =============================================================================

mod classify;
mod executor;
mod result;
mod transport;

#[cfg(test)]
pub(crate) mod fakes;

pub use classify::{CACHE_STATUS_HEADER, CACHE_VARY_HEADER};
pub use result::{Observation, ProbeKind, ProbeOutcome, ProbeResult};
pub use transport::{HttpTransport, Transport, TransportRequest, TransportResponse};
