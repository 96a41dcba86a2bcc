// src/policy/mod.rs
// =============================================================================
// robots.txt handling.
//
// Only two directives are read: Disallow and Sitemap. The parser does not
// understand User-agent groups, comments or wildcards; a directive anywhere in
// the file counts.
// =============================================================================

mod parser;

pub use parser::{directive_values, policy_url_for, PolicyDocument};
