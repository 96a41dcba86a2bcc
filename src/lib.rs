// src/lib.rs
// =============================================================================
// The probe-and-aggregate engine behind the crawler-probe CLI.
//
// Modules:
// - identity: crawler identities and their request headers
// - policy: robots.txt directive parsing
// - probe: single probes, response classification, HTTP transport
// - report: multi-identity runs and their Summary
// - plan: site-specific URL plans
// - engine / config / error: the caller-owned Engine and its settings
//
// Typical use:
//   let engine = Engine::new(EngineConfig::default())?;
//   let report = engine.run("https://example.com", &IdentitySelection::All).await;
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod identity;
pub mod plan;
pub mod policy;
pub mod probe;
pub mod report;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, TransportError};
pub use plan::{SitePlanReport, TargetPlan};
pub use probe::{ProbeOutcome, ProbeResult};
pub use report::{IdentitySelection, Report, Summary};
