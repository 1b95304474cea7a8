//! Periodic execution of the pipeline.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::Pipeline;

/// Default time between two ticks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Drives a [`Pipeline`] at a fixed cadence.
///
/// The first tick fires as soon as the scheduler starts, then every
/// `interval`. Each tick runs in its own task, so a slow fetch never delays
/// the next tick and ticks may overlap.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use pihole_statsd::{Dispatcher, Formatter, Pipeline, PiholeSource, Scheduler, StdoutSink};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let source = PiholeSource::builder().host("pi.hole").build()?;
///     let dispatcher = Dispatcher::new(Arc::new(StdoutSink));
///     let pipeline = Pipeline::new(Arc::new(source), Formatter::default(), dispatcher);
///
///     let handle = Scheduler::new(pipeline, Duration::from_secs(1)).start();
///     handle.join().await;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct Scheduler {
    pipeline: Arc<Pipeline>,
    interval: Duration,
}

impl Scheduler {
    /// Create a scheduler. A zero `interval` falls back to the default.
    pub fn new(pipeline: Pipeline, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            DEFAULT_POLL_INTERVAL
        } else {
            interval
        };
        Self {
            pipeline: Arc::new(pipeline),
            interval,
        }
    }

    /// The configured tick interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Start ticking in a background task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);
        let pipeline = self.pipeline.clone();
        let interval = self.interval;

        info!("Polling every {:?}", interval);

        let task = tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);

            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        let pipeline = pipeline.clone();
                        tokio::spawn(async move {
                            match pipeline.run_once().await {
                                Ok(count) => debug!("Tick complete, {} lines", count),
                                Err(e) => warn!("Tick aborted: {}", e),
                            }
                        });
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            debug!("Scheduler stopped");
        });

        SchedulerHandle { stop_tx, task }
    }
}

/// Handle for a running scheduler.
///
/// Dropping the handle stops the timer, as does calling [`stop`](Self::stop).
/// Ticks already in flight run to completion.
#[derive(Debug)]
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Stop scheduling new ticks.
    pub fn stop(&self) {
        let _ = self.stop_tx.send(true);
    }

    /// Wait for the timer loop to end. Without [`stop`](Self::stop) this never returns.
    pub async fn join(self) {
        let SchedulerHandle { stop_tx, task } = self;
        let _ = task.await;
        drop(stop_tx);
    }
}
