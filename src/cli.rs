// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two subcommands:
// - probe: run every requested crawler identity against one URL
// - site:  run the site plan for a named site (the default when no
//          subcommand is given)
//
// Timing, output and logging flags are global so they work with either.
// =============================================================================

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crawler_probe::config::{DEFAULT_DELAY_SECS, DEFAULT_TIMEOUT_SECS};
use crawler_probe::plan::DEFAULT_SITE;
use crawler_probe::identity;
use crawler_probe::IdentitySelection;

// clap needs the default in the argument's own type
const DEFAULT_TIMEOUT: f64 = DEFAULT_TIMEOUT_SECS as f64;

#[derive(Parser, Debug)]
#[command(
    name = "crawler-probe",
    version,
    about = "Probe a website as different search-engine crawlers and report what each one sees",
    long_about = "crawler-probe requests a site under several Googlebot identities, reads its robots.txt, \
                  and records status codes, timing, redirects and caching-layer headers. \
                  Results are written to a JSON file."
)]
pub struct Cli {
    /// What to run (defaults to the site plan for the default site)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT)]
    pub timeout: f64,

    /// Delay between requests in seconds (fractions allowed)
    #[arg(long, global = true, default_value_t = DEFAULT_DELAY_SECS)]
    pub delay: f64,

    /// Output file for results (default: crawler_probe_results_<timestamp>.json)
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Also print the full results as JSON on stdout
    #[arg(long, global = true)]
    pub json: bool,

    /// File that log lines are appended to
    #[arg(long, global = true, default_value = "crawler_probe.log")]
    pub log_file: PathBuf,

    /// Don't write a log file
    #[arg(long, global = true)]
    pub no_log_file: bool,

    /// Show debug-level logs
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe one URL with one or more crawler identities
    ///
    /// Example: crawler-probe probe https://example.com --all-identities
    Probe {
        /// Target URL (e.g., https://example.com)
        url: String,

        #[command(flatten)]
        identities: IdentityArgs,
    },

    /// Run the site-specific plan (root, regional page, robots.txt, sitemaps)
    ///
    /// Example: crawler-probe site tradik.com
    Site {
        /// Site name or URL
        #[arg(default_value = DEFAULT_SITE)]
        site: String,

        #[command(flatten)]
        identities: IdentityArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct IdentityArgs {
    /// Test with every built-in crawler identity
    #[arg(long, conflicts_with = "identity")]
    pub all_identities: bool,

    /// Test with this identity (repeatable); unknown names use the desktop profile
    #[arg(long = "identity", value_name = "NAME")]
    pub identity: Vec<String>,
}

impl IdentityArgs {
    pub fn selection(&self) -> IdentitySelection {
        if self.all_identities {
            IdentitySelection::All
        } else if self.identity.is_empty() {
            IdentitySelection::Default
        } else {
            IdentitySelection::Only(self.identity.clone())
        }
    }

    /// Requested names that aren't built-in identities
    pub fn unknown_names(&self) -> Vec<&str> {
        self.identity
            .iter()
            .map(String::as_str)
            .filter(|name| !identity::is_known(name))
            .collect()
    }
}

impl Cli {
    pub fn log_file(&self) -> Option<&std::path::Path> {
        if self.no_log_file {
            None
        } else {
            Some(self.log_file.as_path())
        }
    }
}
