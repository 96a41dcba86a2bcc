// src/identity/mod.rs
// =============================================================================
// Crawler identities.
//
// An identity is a named header profile that makes our requests look like a
// particular search-engine crawler (desktop, mobile, image bot, ...).
//
// Submodules:
// - registry: the built-in identities and header assembly
// =============================================================================

mod registry;

pub use registry::{all_names, headers_for, is_known, Identity, DEFAULT_IDENTITY, IDENTITIES};
