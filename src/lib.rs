//! # pihole-statsd
//!
//! Polls the Pi-hole status API and forwards its counters to a statsd
//! aggregator over UDP.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌─────────┐   ┌───────────┐   ┌──────────┐
//! │ scheduler │──▶│  source  │──▶│ flatten │──▶│  metric   │──▶│ dispatch │──▶ UDP / stdout
//! │  (ticks)  │   │ (fetch)  │   │ (stats) │   │ (format)  │   │ (batch)  │
//! └───────────┘   └──────────┘   └─────────┘   └───────────┘   └──────────┘
//! ```
//!
//! - **[`source`]**: [`StatSource`] trait and the HTTP-backed [`PiholeSource`]
//! - **[`flatten`]**: turns the status document into counters tagged
//!   `pihole=top` or `pihole=grav`
//! - **[`metric`]**: renders statsd lines with tags folded into the metric path
//! - **[`dispatch`]**: joins one tick's lines into a single payload
//! - **[`transport`]**: UDP, stdout and channel destinations
//! - **[`scheduler`]**: runs a [`Pipeline`] immediately and then on a fixed interval
//!
//! ## Usage
//!
//! ```
//! use pihole_statsd::{Formatter, MetricType, Tag};
//!
//! let formatter = Formatter::default();
//! let line = formatter.format(
//!     "domains_being_blocked",
//!     &123i64.into(),
//!     MetricType::Counter,
//!     &[Tag::new("pihole", "top")],
//! );
//! assert_eq!(line, "domains_being_blocked._t_pihole.top._t_location.pihole:123|c");
//! ```

pub mod dispatch;
pub mod error;
pub mod flatten;
pub mod metric;
pub mod pipeline;
pub mod scheduler;
pub mod settings;
pub mod source;
pub mod tag;
pub mod transport;

pub use dispatch::Dispatcher;
pub use error::ExporterError;
pub use flatten::{flatten, parse_document, Stat};
pub use metric::{Formatter, MetricType, MetricValue};
pub use pipeline::Pipeline;
pub use scheduler::{Scheduler, SchedulerHandle};
pub use settings::Settings;
pub use source::{PiholeSource, StatSource};
pub use tag::{Tag, TagValue};
pub use transport::{ChannelTransport, StdoutSink, Transport, UdpTransport};
