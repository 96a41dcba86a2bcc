// src/engine.rs
// =============================================================================
// The probe engine: configuration plus an HTTP transport, owned by the caller.
//
// There is no global session. Whoever wants to probe something builds an
// Engine, and every probe, aggregator run and site plan is a method on it:
// - probe::executor   -> probe_policy_file(), probe_availability()
// - report::aggregate -> run()
// - plan::site        -> run_named_plan()
//
// Probes run one at a time; the engine never spawns tasks.
// =============================================================================

use std::time::Duration;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::probe::{HttpTransport, Transport};

pub struct Engine {
    pub(crate) config: EngineConfig,
    pub(crate) transport: Box<dyn Transport>,
}

impl Engine {
    /// Builds an engine that talks HTTP through reqwest
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        let transport = HttpTransport::new(config.max_redirects)?;
        Ok(Self::with_transport(config, transport))
    }

    /// Builds an engine on top of any transport (tests use scripted ones)
    pub fn with_transport(config: EngineConfig, transport: impl Transport + 'static) -> Self {
        Self {
            config,
            transport: Box::new(transport),
        }
    }

    // Courtesy pause between probes
    pub(crate) async fn pause(&self) {
        let delay: Duration = self.config.delay;
        if !delay.is_zero() {
            tracing::debug!("Waiting {:.2}s before the next probe", delay.as_secs_f64());
            tokio::time::sleep(delay).await;
        }
    }
}
