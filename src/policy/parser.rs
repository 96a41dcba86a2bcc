// src/policy/parser.rs
// =============================================================================
// Line-oriented robots.txt directive extraction.
//
// Grammar, per line:
//   <whitespace> <keyword, any case> ':' <value>
// The value is everything after the FIRST colon (so "Sitemap: https://..."
// keeps its own colon), trimmed. Blank values are dropped. Lines that don't
// start with the keyword are ignored silently.
// =============================================================================

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::EngineError;

const DISALLOW: &str = "disallow:";
const SITEMAP: &str = "sitemap:";

/// What we learned from one robots.txt fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyDocument {
    /// The body as served (None when the file wasn't accessible)
    pub raw_text: Option<String>,
    pub disallow_rules: Vec<String>,
    pub sitemap_urls: Vec<String>,
}

impl PolicyDocument {
    pub fn parse(text: &str) -> Self {
        Self {
            raw_text: Some(text.to_string()),
            disallow_rules: directive_values(text, DISALLOW),
            sitemap_urls: directive_values(text, SITEMAP),
        }
    }

    /// The document for an inaccessible policy file
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Collects the values of one directive, in document order.
///
/// `keyword` must be lowercase and include the trailing colon.
pub fn directive_values(text: &str, keyword: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let line = line.trim();
            let prefix = line.get(..keyword.len())?;
            if !prefix.eq_ignore_ascii_case(keyword) {
                return None;
            }
            let value = line[keyword.len()..].trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        })
        .collect()
}

/// Derives `scheme://host[:port]/robots.txt` from any URL on the site.
///
/// Path, query and fragment of `base_url` are discarded.
pub fn policy_url_for(base_url: &str) -> Result<Url, EngineError> {
    let invalid = |reason: String| EngineError::InvalidTarget {
        url: base_url.to_string(),
        reason,
    };

    let parsed = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }

    parsed.join("/robots.txt").map_err(|e| invalid(e.to_string()))
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why line.get(..keyword.len()) instead of &line[..keyword.len()]?
//    - Slicing panics if the line is shorter or the cut lands inside a
//      multi-byte character; get() returns None instead
//    - The `?` inside filter_map() turns that None into "skip this line"
//
// 2. What does eq_ignore_ascii_case() buy us?
//    - "Disallow:", "DISALLOW:" and "disallow:" all match
//    - No lowercase copy of the line is allocated
//
// 3. Why Url::join("/robots.txt")?
//    - A leading slash replaces the whole path and drops query and fragment
//    - So any page on the site maps to the same robots.txt location
// -----------------------------------------------------------------------------
