//! Statsd line formatting.
//!
//! Tags are folded into the metric path rather than sent as a separate tag
//! section:
//!
//! ```text
//! <name>.<prefix><tag>.<value>...:<value>|<type>
//! ```
//!
//! Every line carries the `location=pihole` tag after the caller's tags.

use std::fmt;
use std::str::FromStr;

use serde_json::{Number, Value};

use crate::{ExporterError, Tag};

/// Prefix put in front of every tag name unless configured otherwise.
pub const DEFAULT_TAG_PREFIX: &str = "_t_";

/// The four statsd metric semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricType {
    Counter,
    Set,
    Gauge,
    Timer,
}

impl MetricType {
    /// Return the wire code for this metric type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "c",
            MetricType::Set => "s",
            MetricType::Gauge => "g",
            MetricType::Timer => "ms",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricType {
    type Err = ExporterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "c" | "counter" => Self::Counter,
            "s" | "set" => Self::Set,
            "g" | "gauge" => Self::Gauge,
            "ms" | "timer" => Self::Timer,
            _ => return Err(ExporterError::InvalidMetricType(s.to_string())),
        })
    }
}

/// A numeric metric value, rendered exactly as JSON would print it.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricValue(Number);

impl MetricValue {
    /// Extract a value from a status field.
    ///
    /// Numbers pass through. Strings are accepted when they hold a number,
    /// optionally with `,` thousands separators (`"1,234"`), which is how the
    /// status API formats some of its counters. Anything else yields `None`.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(Self(n.clone())),
            Value::String(s) => parse_number(&s.replace(',', "")).map(Self),
            _ => None,
        }
    }

    /// The underlying JSON number.
    pub fn as_number(&self) -> &Number {
        &self.0
    }
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        Self(value.into())
    }
}

impl From<u64> for MetricValue {
    fn from(value: u64) -> Self {
        Self(value.into())
    }
}

impl From<Number> for MetricValue {
    fn from(value: Number) -> Self {
        Self(value)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn parse_number(s: &str) -> Option<Number> {
    let s = s.trim();
    if let Ok(i) = s.parse::<i64>() {
        return Some(i.into());
    }
    if let Ok(u) = s.parse::<u64>() {
        return Some(u.into());
    }
    s.parse::<f64>().ok().and_then(Number::from_f64)
}

/// Renders metrics into statsd lines.
#[derive(Debug, Clone)]
pub struct Formatter {
    prefix: String,
    default_tags: Vec<Tag>,
}

impl Formatter {
    /// Create a formatter using `prefix` in front of every tag name.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            default_tags: vec![Tag::new("location", "pihole")],
        }
    }

    /// The tag prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Format one metric line.
    ///
    /// The caller's tags are left untouched; the default tag is appended to
    /// the rendered line only.
    ///
    /// # Example
    ///
    /// ```
    /// use pihole_statsd::{Formatter, MetricType, Tag};
    ///
    /// let formatter = Formatter::default();
    /// let tags = [Tag::new("pihole", "top")];
    /// let line = formatter.format("foo", &5i64.into(), MetricType::Counter, &tags);
    /// assert_eq!(line, "foo._t_pihole.top._t_location.pihole:5|c");
    /// ```
    pub fn format(
        &self,
        name: &str,
        value: &MetricValue,
        kind: MetricType,
        tags: &[Tag],
    ) -> String {
        let mut line = String::from(name);
        for tag in tags.iter().chain(&self.default_tags) {
            line.push_str(&format!(".{}{}.{}", self.prefix, tag.name(), tag.value()));
        }
        line.push_str(&format!(":{}|{}", value, kind));
        line
    }

    /// Format one metric line from a raw wire code, validating it first.
    pub fn format_code(
        &self,
        name: &str,
        value: &MetricValue,
        code: &str,
        tags: &[Tag],
    ) -> Result<String, ExporterError> {
        let kind = code.parse::<MetricType>()?;
        Ok(self.format(name, value, kind, tags))
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(DEFAULT_TAG_PREFIX)
    }
}
