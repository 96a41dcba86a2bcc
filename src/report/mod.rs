// src/report/mod.rs
// =============================================================================
// Multi-identity runs against one target, and what they add up to.
//
// Submodules:
// - summary: the Summary fold over a set of probe results
// - aggregate: Engine::run(), which produces a Report
// =============================================================================

mod aggregate;
mod summary;

pub use aggregate::{IdentitySelection, Report};
pub use summary::Summary;
