// src/report/summary.rs
// =============================================================================
// Summary: a fold over the results of one run.
//
// Never built by hand; always computed from the availability and policy
// results. Failed probes count toward total_probes and nothing else.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::probe::ProbeResult;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_probes: usize,
    pub successful_probes: usize,
    pub any_cache_layer_detected: bool,
    pub any_geo_redirect_detected: bool,
    pub any_policy_accessible: bool,
}

impl Summary {
    pub fn fold<'a>(
        availability: impl IntoIterator<Item = &'a ProbeResult>,
        policy: impl IntoIterator<Item = &'a ProbeResult>,
    ) -> Self {
        let mut summary = availability
            .into_iter()
            .fold(Summary::default(), |mut summary, result| {
                summary.total_probes += 1;
                if result.is_accessible() {
                    summary.successful_probes += 1;
                }
                summary.any_cache_layer_detected |= result.is_cache_layer();
                summary.any_geo_redirect_detected |= result.is_geo_redirected();
                summary
            });

        // any() stops at the first accessible robots.txt
        summary.any_policy_accessible = policy
            .into_iter()
            .any(|result| result.is_policy_file_accessible());

        summary
    }

    pub fn all_accessible(&self) -> bool {
        self.successful_probes == self.total_probes
    }
}
