// src/report/aggregate.rs
// =============================================================================
// Runs both probes for each requested identity against one target.
//
// How it works:
// 1. Resolve which identities to test (default: desktop only)
// 2. For each identity, in order: robots.txt probe, then availability probe
// 3. If more than one identity is tested, pause after each identity's pair
// 4. Fold everything into a Summary
//
// A run always returns a Report; failed probes are recorded, not raised.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::summary::Summary;
use crate::engine::Engine;
use crate::identity::{self, DEFAULT_IDENTITY};
use crate::probe::ProbeResult;

/// Which identities a run uses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySelection {
    /// Just the desktop crawler
    Default,
    /// Every built-in identity, in declaration order
    All,
    /// These names, in this order (duplicates dropped, unknown names kept)
    Only(Vec<String>),
}

impl IdentitySelection {
    pub fn names(&self) -> Vec<String> {
        match self {
            IdentitySelection::Default => vec![DEFAULT_IDENTITY.to_string()],
            IdentitySelection::All => identity::all_names(),
            IdentitySelection::Only(names) => {
                let mut unique: Vec<String> = Vec::with_capacity(names.len());
                for name in names {
                    if !unique.contains(name) {
                        unique.push(name.clone());
                    }
                }
                unique
            }
        }
    }
}

/// Everything one run found out about one target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub target_url: String,
    pub test_timestamp: DateTime<Utc>,
    /// identity -> robots.txt probe
    pub policy_tests: BTreeMap<String, ProbeResult>,
    /// identity -> availability probe
    pub availability_tests: BTreeMap<String, ProbeResult>,
    pub summary: Summary,
}

impl Engine {
    pub async fn run(&self, target_url: &str, identities: &IdentitySelection) -> Report {
        let names = identities.names();
        let paced = names.len() > 1;

        tracing::info!(
            "Starting run for {} with {} identit{}",
            target_url,
            names.len(),
            if names.len() == 1 { "y" } else { "ies" }
        );

        let test_timestamp = Utc::now();
        let mut policy_tests = BTreeMap::new();
        let mut availability_tests = BTreeMap::new();

        for name in names {
            tracing::info!("Testing with {} identity", name);

            let policy = self.probe_policy_file(target_url, &name).await;
            let availability = self.probe_availability(target_url, &name).await;

            policy_tests.insert(name.clone(), policy);
            availability_tests.insert(name, availability);

            if paced {
                self.pause().await;
            }
        }

        let summary = Summary::fold(availability_tests.values(), policy_tests.values());

        Report {
            target_url: target_url.to_string(),
            test_timestamp,
            policy_tests,
            availability_tests,
            summary,
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a BTreeMap for the results?
//    - It keeps keys sorted, so the same run always serializes the same way
//    - HashMap iteration order changes from run to run
//
// 2. Why is there no concurrency here?
//    - Each .await finishes one probe before the next starts
//    - futures' buffer_unordered() would run probes in parallel instead,
//      which is not what you want when pacing requests to one site
// -----------------------------------------------------------------------------
