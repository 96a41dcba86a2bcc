// src/plan/site.rs
// =============================================================================
// Named site plans and the plan runner.
//
// Every plan probes the same shape of URLs on a site:
//   root, root + regional segment, /robots.txt, /sitemap.xml, /sitemap_index.xml
// using the desktop identity, pausing after every probe. Afterwards the root
// is probed once more to see where a visitor actually ends up.
//
// Known sites live in BUILTIN_PLANS. Anything else that looks like a host
// name or URL gets a plan derived from the same template.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use url::Url;

use crate::engine::Engine;
use crate::error::EngineError;
use crate::identity::DEFAULT_IDENTITY;
use crate::probe::{ProbeResult, CACHE_STATUS_HEADER, CACHE_VARY_HEADER};
use crate::report::Report;

/// Site used when the caller doesn't name one
pub const DEFAULT_SITE: &str = "tradik.com";

// Paths probed after the root and its regional variant
const PLAN_PATHS: [&str; 3] = ["/robots.txt", "/sitemap.xml", "/sitemap_index.xml"];

/// A site we ship a plan for
#[derive(Debug, Clone, Copy)]
pub struct PlanTemplate {
    pub site: &'static str,
    pub root: &'static str,
    pub region_segment: &'static str,
}

pub const BUILTIN_PLANS: [PlanTemplate; 1] = [PlanTemplate {
    site: "tradik.com",
    root: "https://tradik.com",
    region_segment: "/uk/",
}];

/// The URLs to probe for one site, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPlan {
    pub site: String,
    /// `scheme://host[:port]`, no trailing slash
    pub root: String,
    pub region_segment: String,
    pub urls: Vec<String>,
}

/// Caching-layer headers seen on one URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheLayerDetails {
    pub cache_status: Option<String>,
    pub vary_header: Option<String>,
    pub server_fingerprint: Option<String>,
}

/// Where the site root sends a desktop crawler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionalTest {
    /// The final URL contains the regional segment
    pub redirected_to_region: bool,
    /// The coarse geo heuristic fired (regional segment OR redirect status)
    pub geo_heuristic_triggered: bool,
    /// None when the probe failed
    pub final_destination: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitePlanReport {
    pub site: String,
    pub root: String,
    pub test_timestamp: DateTime<Utc>,
    pub per_url: BTreeMap<String, ProbeResult>,
    pub cache_layer_analysis: BTreeMap<String, CacheLayerDetails>,
    pub regional_test: RegionalTest,
    /// Multi-identity run on the site root, when the caller asked for one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comprehensive_test: Option<Report>,
}

impl TargetPlan {
    /// Builds the standard plan for the site at `root_url` (any URL on it)
    pub fn for_root(site: &str, root_url: &str, region_segment: &str) -> Result<Self, EngineError> {
        let parsed = Url::parse(root_url).map_err(|e| EngineError::InvalidTarget {
            url: root_url.to_string(),
            reason: e.to_string(),
        })?;
        if parsed.host_str().is_none() {
            return Err(EngineError::InvalidTarget {
                url: root_url.to_string(),
                reason: "URL has no host".to_string(),
            });
        }

        let root = parsed.origin().ascii_serialization();
        let mut urls = vec![root.clone(), format!("{}{}", root, region_segment)];
        urls.extend(PLAN_PATHS.iter().map(|path| format!("{}{}", root, path)));

        Ok(Self {
            site: site.to_string(),
            root,
            region_segment: region_segment.to_string(),
            urls,
        })
    }

    /// Looks up a built-in plan, or derives one from a host name / URL.
    ///
    /// `region_segment` only applies to derived plans; built-ins carry their own.
    pub fn named(site_identifier: &str, region_segment: &str) -> Result<Self, EngineError> {
        let site_identifier = site_identifier.trim();

        if let Some(template) = BUILTIN_PLANS
            .iter()
            .find(|plan| plan.site.eq_ignore_ascii_case(site_identifier))
        {
            return Self::for_root(template.site, template.root, template.region_segment);
        }

        if site_identifier.is_empty() || site_identifier.contains(char::is_whitespace) {
            return Err(EngineError::UnknownPlan(site_identifier.to_string()));
        }

        let root_url = if site_identifier.contains("://") {
            site_identifier.to_string()
        } else {
            format!("https://{}", site_identifier)
        };

        Self::for_root(site_identifier, &root_url, region_segment)
            .map_err(|_| EngineError::UnknownPlan(site_identifier.to_string()))
    }
}

impl Engine {
    /// Runs the plan for a named site (see `TargetPlan::named`)
    pub async fn run_named_plan(&self, site_identifier: &str) -> Result<SitePlanReport, EngineError> {
        let plan = TargetPlan::named(site_identifier, &self.config.region_segment)?;
        Ok(self.run_plan(&plan).await)
    }

    pub async fn run_plan(&self, plan: &TargetPlan) -> SitePlanReport {
        tracing::info!("Running site plan for {} ({} URLs)", plan.site, plan.urls.len());

        let test_timestamp = Utc::now();
        let mut per_url = BTreeMap::new();
        let mut cache_layer_analysis = BTreeMap::new();

        for url in &plan.urls {
            let result = self
                .probe_availability_in_region(url, DEFAULT_IDENTITY, &plan.region_segment)
                .await;

            if let Some(details) = cache_layer_details(&result) {
                cache_layer_analysis.insert(url.clone(), details);
            }
            per_url.insert(url.clone(), result);

            self.pause().await;
        }

        let regional_test = self.regional_test(plan).await;

        SitePlanReport {
            site: plan.site.clone(),
            root: plan.root.clone(),
            test_timestamp,
            per_url,
            cache_layer_analysis,
            regional_test,
            comprehensive_test: None,
        }
    }

    // Re-probes the root and checks whether it landed on the regional variant
    async fn regional_test(&self, plan: &TargetPlan) -> RegionalTest {
        let result = self
            .probe_availability_in_region(&plan.root, DEFAULT_IDENTITY, &plan.region_segment)
            .await;
        let final_destination = result.final_url().map(str::to_string);

        RegionalTest {
            redirected_to_region: final_destination
                .as_deref()
                .is_some_and(|url| url.contains(&plan.region_segment)),
            geo_heuristic_triggered: result.is_geo_redirected(),
            final_destination,
        }
    }
}

fn cache_layer_details(result: &ProbeResult) -> Option<CacheLayerDetails> {
    let observation = result.observation().filter(|o| o.is_cache_layer)?;

    Some(CacheLayerDetails {
        cache_status: observation.response_headers.get(CACHE_STATUS_HEADER).cloned(),
        vary_header: observation.response_headers.get(CACHE_VARY_HEADER).cloned(),
        server_fingerprint: result.server_fingerprint().map(str::to_string),
    })
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why is TargetPlan plain data?
//    - Building a plan does no I/O, so it can be tested without an Engine
//    - Engine::run_plan() is the only place that touches the network
//
// 2. What does .filter(|o| o.is_cache_layer)? do in cache_layer_details()?
//    - filter() on an Option keeps Some only when the closure returns true
//    - `?` then returns None early for failures and non-LiteSpeed responses
//
// 3. Why does the plan pass its own region segment to every probe?
//    - A built-in plan knows its site's regional path, whatever the engine
//      default is, so per-URL results and the regional test agree
// -----------------------------------------------------------------------------
