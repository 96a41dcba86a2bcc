// src/output.rs
// =============================================================================
// Saving and printing results.
//
// - save_report(): pretty JSON to disk (default name carries a timestamp)
// - print_*_summary(): the short human-readable recap shown after a run
// =============================================================================

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crawler_probe::{Report, SitePlanReport};

/// e.g. crawler_probe_results_20250101_120000.json
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "crawler_probe_results_{}.json",
        Local::now().format("%Y%m%d_%H%M%S")
    ))
}

// Writes `value` as pretty-printed JSON and returns where it went
pub fn save_report<T: Serialize>(value: &T, path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_output_path);

    let json = serde_json::to_string_pretty(value).context("Failed to serialize results")?;
    fs::write(&path, json)
        .with_context(|| format!("Failed to write results to {}", path.display()))?;

    tracing::info!("Results saved to {}", path.display());
    Ok(path)
}

pub fn print_report_summary(report: &Report) {
    let summary = &report.summary;

    println!();
    println!("{}", "=".repeat(50));
    println!("TEST SUMMARY: {}", report.target_url);
    println!("{}", "=".repeat(50));
    println!("Total tests: {}", summary.total_probes);
    println!("Successful tests: {}", summary.successful_probes);
    println!("LiteSpeed detected: {}", summary.any_cache_layer_detected);
    println!("Geo-redirection detected: {}", summary.any_geo_redirect_detected);
    println!("Robots.txt accessible: {}", summary.any_policy_accessible);

    // One line per identity so failures are visible without opening the JSON
    for (identity, result) in &report.availability_tests {
        let status = match (result.status_code(), result.error()) {
            (Some(code), _) => format!("HTTP {}", code),
            (None, Some(error)) => format!("ERROR {}", error),
            (None, None) => "unknown".to_string(),
        };
        println!("   {:<15} {}", identity, status);
    }
}

pub fn print_site_summary(report: &SitePlanReport) {
    if let Some(comprehensive) = &report.comprehensive_test {
        print_report_summary(comprehensive);
    }

    println!();
    println!("Site plan for {}: {} URL(s) probed", report.site, report.per_url.len());
    println!("Caching layer seen on {} URL(s)", report.cache_layer_analysis.len());
    println!("Regional redirection: {}", report.regional_test.redirected_to_region);
    println!(
        "Final destination: {}",
        report
            .regional_test
            .final_destination
            .as_deref()
            .unwrap_or("Unknown")
    );
}
