//! One poll cycle: fetch, flatten, format, dispatch.

use std::sync::Arc;

use tracing::debug;

use crate::flatten::{flatten, parse_document};
use crate::{
    Dispatcher, ExporterError, Formatter, PiholeSource, Settings, StatSource, StdoutSink,
    Transport, UdpTransport,
};

/// Everything a tick needs, shared by all ticks.
#[derive(Debug, Clone)]
pub struct Pipeline {
    source: Arc<dyn StatSource>,
    formatter: Formatter,
    dispatcher: Dispatcher,
}

impl Pipeline {
    /// Create a pipeline reading from `source` and sending through `dispatcher`.
    pub fn new(source: Arc<dyn StatSource>, formatter: Formatter, dispatcher: Dispatcher) -> Self {
        Self {
            source,
            formatter,
            dispatcher,
        }
    }

    /// Wire a pipeline from settings.
    ///
    /// In debug mode no UDP socket is opened, so the aggregator host does not
    /// need to resolve.
    pub async fn from_settings(settings: &Settings) -> Result<Self, ExporterError> {
        let source = PiholeSource::builder().host(&settings.api_host).build()?;

        let network: Arc<dyn Transport> = if settings.debug {
            Arc::new(StdoutSink)
        } else {
            Arc::new(UdpTransport::connect(&settings.metrics_host, settings.metrics_port).await?)
        };

        Ok(Self::new(
            Arc::new(source),
            Formatter::new(settings.tag_prefix.clone()),
            Dispatcher::new(network).debug(settings.debug),
        ))
    }

    /// Run a single tick.
    ///
    /// Returns the number of lines handed to the dispatcher. Fetch and parse
    /// failures abort the tick before anything is dispatched; send failures
    /// do not surface here.
    pub async fn run_once(&self) -> Result<usize, ExporterError> {
        let body = self.source.fetch().await?;
        let document = parse_document(&body)?;

        let lines: Vec<String> = flatten(document)
            .iter()
            .map(|stat| self.formatter.format(&stat.name, &stat.value, stat.kind, &stat.tags))
            .collect();

        debug!("Flattened {} metrics", lines.len());
        self.dispatcher.dispatch(&lines).await;
        Ok(lines.len())
    }
}
