//! Batching formatted lines into one payload per tick.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::transport::{StdoutSink, Transport};

/// Joins lines and hands them to the network or, in debug mode, to a local sink.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    network: Arc<dyn Transport>,
    diagnostic: Arc<dyn Transport>,
    debug: bool,
}

impl Dispatcher {
    /// Dispatch to `network`.
    pub fn new(network: Arc<dyn Transport>) -> Self {
        Self {
            network,
            diagnostic: Arc::new(StdoutSink),
            debug: false,
        }
    }

    /// Replace the sink used in debug mode (standard output by default).
    pub fn with_diagnostic(mut self, diagnostic: Arc<dyn Transport>) -> Self {
        self.diagnostic = diagnostic;
        self
    }

    /// Route payloads to the diagnostic sink instead of the network.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Send `lines` as one newline-joined payload.
    ///
    /// Transport failures are logged and swallowed. Empty batches are dropped.
    pub async fn dispatch(&self, lines: &[String]) {
        if lines.is_empty() {
            debug!("Nothing to dispatch");
            return;
        }

        let payload = lines.join("\n");
        let target = if self.debug {
            &self.diagnostic
        } else {
            &self.network
        };

        match target.send(payload.as_bytes()).await {
            Ok(()) => debug!("Dispatched {} lines ({} bytes)", lines.len(), payload.len()),
            Err(e) => warn!("Failed to dispatch {} lines: {}", lines.len(), e),
        }
    }
}
