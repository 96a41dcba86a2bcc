// src/probe/classify.rs
// =============================================================================
// Response classification: the heuristics applied to every successful probe.
//
// - Server fingerprint: the raw Server header
// - Caching layer: Server mentions LiteSpeed (or its "lsws" short name)
// - Cache headers: Cache-Control plus the LiteSpeed cache/vary headers
// - Geo redirect: final URL contains the regional path segment, OR the final
//   status is itself a redirect code. This is deliberately coarse; an
//   http->https hop left unresolved will also trip it.
// =============================================================================

use reqwest::header::HeaderMap;
use std::collections::BTreeMap;

/// Substrings of the Server header that identify a caching layer
pub const CACHE_LAYER_MARKERS: [&str; 2] = ["litespeed", "lsws"];

/// Caching layer header carrying HIT/MISS status
pub const CACHE_STATUS_HEADER: &str = "x-litespeed-cache";

/// Caching layer header describing cache variation
pub const CACHE_VARY_HEADER: &str = "x-litespeed-vary";

const CACHE_HEADER_NAMES: [&str; 3] = ["cache-control", CACHE_STATUS_HEADER, CACHE_VARY_HEADER];

const REDIRECT_CODES: [u16; 5] = [301, 302, 303, 307, 308];

pub fn is_accessible(status: u16) -> bool {
    (200..400).contains(&status)
}

pub fn is_redirect_status(status: u16) -> bool {
    REDIRECT_CODES.contains(&status)
}

pub fn is_cache_layer(server: Option<&str>) -> bool {
    match server {
        Some(server) => {
            let server = server.to_lowercase();
            CACHE_LAYER_MARKERS.iter().any(|marker| server.contains(marker))
        }
        None => false,
    }
}

pub fn is_geo_redirected(status: u16, final_url: &str, region_segment: &str) -> bool {
    final_url.contains(region_segment) || is_redirect_status(status)
}

// Flattens a HeaderMap into name -> value, joining repeated headers with ", "
pub fn header_table(headers: &HeaderMap) -> BTreeMap<String, String> {
    let mut table: BTreeMap<String, String> = BTreeMap::new();

    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        table
            .entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    table
}

// The caching-related subset of an already flattened header table
pub fn cache_headers(table: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    CACHE_HEADER_NAMES
        .iter()
        .filter_map(|name| table.get(*name).map(|value| (name.to_string(), value.clone())))
        .collect()
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why plain functions instead of methods?
//    - Each check only needs a status code or a string, not a whole response
//    - Observation::from_response() calls them once and stores the answers
//
// 2. What does (200..400).contains(&status) do?
//    - 200..400 is a Range<u16>; contains() takes a reference to the value
//    - It reads the same as 200 <= status && status < 400
//
// 3. Why BTreeMap for header tables?
//    - Keys come out sorted, so the JSON report is the same on every run
//    - .entry().and_modify().or_insert() merges repeated headers in one pass
// -----------------------------------------------------------------------------
