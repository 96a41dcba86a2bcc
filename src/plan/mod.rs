// src/plan/mod.rs
// =============================================================================
// Site-specific test plans.
//
// A plan is plain data: a list of URLs on one site plus the regional path
// segment to look for. Engine::run_named_plan() walks it with the desktop
// identity and reports per-URL results, cache-layer details and whether the
// site root sends visitors to its regional variant.
// =============================================================================

mod site;

pub use site::{
    CacheLayerDetails, PlanTemplate, RegionalTest, SitePlanReport, TargetPlan, BUILTIN_PLANS,
    DEFAULT_SITE,
};
