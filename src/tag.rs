//! Tags attached to metric lines.
//!
//! In the dotted wire format a tag becomes two extra path segments, so any
//! `.` or space inside a tag would split it apart. Both characters are
//! replaced with `-` when the tag is built.

use std::fmt;

use serde_json::{Number, Value};

use crate::ExporterError;

/// The value half of a tag.
///
/// Only strings and numbers are representable. Numbers are kept verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    /// Free text, escaped on construction.
    Text(String),
    /// A JSON number, rendered as-is.
    Number(Number),
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Text(s) => f.write_str(s),
            TagValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Text(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Text(value)
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        TagValue::Number(value.into())
    }
}

impl From<u64> for TagValue {
    fn from(value: u64) -> Self {
        TagValue::Number(value.into())
    }
}

impl From<Number> for TagValue {
    fn from(value: Number) -> Self {
        TagValue::Number(value)
    }
}

impl TryFrom<&Value> for TagValue {
    type Error = ExporterError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(TagValue::Text(s.clone())),
            Value::Number(n) => Ok(TagValue::Number(n.clone())),
            other => Err(ExporterError::InvalidTagValue(other.to_string())),
        }
    }
}

/// A `name`/`value` annotation on a metric line.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    name: String,
    value: TagValue,
}

impl Tag {
    /// Build a tag, replacing `.` and spaces with `-` in string fields.
    ///
    /// # Example
    ///
    /// ```
    /// use pihole_statsd::Tag;
    ///
    /// let tag = Tag::new("host name", "pi.hole");
    /// assert_eq!(tag.name(), "host-name");
    /// assert_eq!(tag.value().to_string(), "pi-hole");
    /// ```
    pub fn new(name: impl AsRef<str>, value: impl Into<TagValue>) -> Self {
        let value = match value.into() {
            TagValue::Text(s) => TagValue::Text(escape(&s)),
            number => number,
        };
        Self {
            name: escape(name.as_ref()),
            value,
        }
    }

    /// The escaped tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag value.
    pub fn value(&self) -> &TagValue {
        &self.value
    }
}

fn escape(input: &str) -> String {
    input.replace(['.', ' '], "-")
}
