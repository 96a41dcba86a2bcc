// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging and build the probe Engine from the flags
// 3. Dispatch to the requested run (single URL or site plan)
// 4. Save the results as JSON and print a short summary
// 5. Exit with proper code (0 = all reachable, 1 = something unreachable, 2 = error)
// =============================================================================

mod cli;
mod logging;
mod output;

use anyhow::{Context, Result};
use clap::Parser;
use url::Url;

use cli::{Cli, Commands, IdentityArgs};
use crawler_probe::plan::DEFAULT_SITE;
use crawler_probe::{Engine, EngineConfig, EngineError};

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = every availability probe got a 2xx/3xx answer
//   Ok(1) = at least one probe failed or got a 4xx/5xx
//   Err   = bad arguments or the results couldn't be saved
async fn run() -> Result<i32> {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.log_file())?;

    let config = EngineConfig::from_secs(cli.timeout, cli.delay)?;
    let engine = Engine::new(config).context("Failed to set up the probe engine")?;

    match &cli.command {
        Some(Commands::Probe { url, identities }) => handle_probe(&engine, &cli, url, identities).await,
        Some(Commands::Site { site, identities }) => handle_site(&engine, &cli, site, identities).await,
        None => {
            println!("No URL specified. Running default {} tests...", DEFAULT_SITE);
            handle_site(&engine, &cli, DEFAULT_SITE, &IdentityArgs::default()).await
        }
    }
}

// Handles the 'probe' subcommand
async fn handle_probe(engine: &Engine, cli: &Cli, url: &str, identities: &IdentityArgs) -> Result<i32> {
    validate_target(url)?;
    println!("Running comprehensive test on {}...", url);

    warn_unknown_identities(identities);
    let report = engine.run(url, &identities.selection()).await;

    let path = output::save_report(&report, cli.output.as_deref())?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    output::print_report_summary(&report);
    println!("\nDetailed results saved to: {}", path.display());

    Ok(if report.summary.all_accessible() { 0 } else { 1 })
}

// Handles the 'site' subcommand: the site plan, then a run on the site root
async fn handle_site(engine: &Engine, cli: &Cli, site: &str, identities: &IdentityArgs) -> Result<i32> {
    println!("Running {} specific tests...", site);

    warn_unknown_identities(identities);
    let mut report = engine.run_named_plan(site).await?;

    let comprehensive = engine.run(&report.root, &identities.selection()).await;
    let exit_code = if comprehensive.summary.all_accessible() { 0 } else { 1 };
    report.comprehensive_test = Some(comprehensive);

    let path = output::save_report(&report, cli.output.as_deref())?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }
    output::print_site_summary(&report);
    println!("\nDetailed results saved to: {}", path.display());

    Ok(exit_code)
}

fn warn_unknown_identities(identities: &IdentityArgs) {
    for name in identities.unknown_names() {
        tracing::warn!("Unknown identity '{}', sending desktop headers", name);
    }
}

// The only engine input we check up front: a probe target must be an
// absolute http(s) URL
fn validate_target(url: &str) -> Result<(), EngineError> {
    let invalid = |reason: &str| EngineError::InvalidTarget {
        url: url.to_string(),
        reason: reason.to_string(),
    };

    let parsed = Url::parse(url).map_err(|e| invalid(&e.to_string()))?;
    match parsed.scheme() {
        "http" | "https" if parsed.host_str().is_some() => Ok(()),
        "http" | "https" => Err(invalid("URL has no host")),
        _ => Err(invalid("only http and https URLs can be probed")),
    }
}
