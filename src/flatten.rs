//! Turns the status document into a flat list of counters.
//!
//! Top-level fields become `pihole=top` counters. The gravity sub-document is
//! unwrapped one level into `pihole=grav` counters, with its `relative` age
//! collapsed into a single `last_updated` value in minutes.

use serde_json::{Map, Number, Value};
use tracing::{debug, warn};

use crate::{ExporterError, MetricType, MetricValue, Tag};

/// Top-level fields never forwarded.
pub const EXCLUDED_KEYS: [&str; 5] = [
    "status",
    "clients_ever_seen",
    "unique_clients",
    "unique_domains",
    "FTLnotrunning",
];

/// The field holding the block-list refresh state.
pub const GRAVITY_KEY: &str = "gravity_last_updated";

const GRAVITY_SKIPPED: [&str; 2] = ["file_exists", "absolute"];
const GRAVITY_RELATIVE: &str = "relative";
const LAST_UPDATED: &str = "last_updated";

/// One metric ready to be formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct Stat {
    pub name: String,
    pub value: MetricValue,
    pub kind: MetricType,
    pub tags: Vec<Tag>,
}

impl Stat {
    fn counter(name: impl Into<String>, value: MetricValue, group: &str) -> Self {
        Self {
            name: name.into(),
            value,
            kind: MetricType::Counter,
            tags: vec![Tag::new("pihole", group)],
        }
    }
}

/// Parse a fetched body into a status document.
pub fn parse_document(body: &[u8]) -> Result<Map<String, Value>, ExporterError> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ExporterError::MalformedResponse(format!(
            "expected a JSON object, got {}",
            json_kind(&other)
        ))),
        Err(e) => Err(ExporterError::MalformedResponse(e.to_string())),
    }
}

/// Flatten a status document into counters, in document order.
pub fn flatten(mut document: Map<String, Value>) -> Vec<Stat> {
    for key in EXCLUDED_KEYS {
        document.shift_remove(key);
    }

    let mut stats = Vec::with_capacity(document.len());
    for (key, value) in document {
        if key == GRAVITY_KEY {
            flatten_gravity(&value, &mut stats);
            continue;
        }
        match MetricValue::from_json(&value) {
            Some(v) => stats.push(Stat::counter(key, v, "top")),
            None => debug!("Skipping non-numeric field {}: {}", key, value),
        }
    }
    stats
}

fn flatten_gravity(gravity: &Value, stats: &mut Vec<Stat>) {
    let Some(fields) = gravity.as_object() else {
        warn!("Ignoring {}: expected an object, got {}", GRAVITY_KEY, json_kind(gravity));
        return;
    };

    for (key, value) in fields {
        if key == GRAVITY_RELATIVE {
            match relative_minutes(value) {
                Some(total) => stats.push(Stat::counter(LAST_UPDATED, total, "grav")),
                None => warn!("Skipping {}: unusable relative age {}", LAST_UPDATED, value),
            }
        } else if GRAVITY_SKIPPED.contains(&key.as_str()) {
            continue;
        } else {
            match MetricValue::from_json(value) {
                Some(v) => stats.push(Stat::counter(key.as_str(), v, "grav")),
                None => debug!("Skipping non-numeric gravity field {}: {}", key, value),
            }
        }
    }
}

/// `days * 1440 + hours * 60 + minutes`, integral whenever the total is whole.
fn relative_minutes(relative: &Value) -> Option<MetricValue> {
    let parts =
        ["days", "hours", "minutes"].map(|k| relative.get(k).and_then(MetricValue::from_json));
    let [Some(days), Some(hours), Some(minutes)] = parts else {
        return None;
    };
    let (days, hours, minutes) = (days.as_number(), hours.as_number(), minutes.as_number());

    if let (Some(d), Some(h), Some(m)) = (days.as_i64(), hours.as_i64(), minutes.as_i64()) {
        let total = d.checked_mul(1440)?.checked_add(h.checked_mul(60)?)?.checked_add(m)?;
        return Some(total.into());
    }

    let total = days.as_f64()? * 1440.0 + hours.as_f64()? * 60.0 + minutes.as_f64()?;
    if total.fract() == 0.0 && total.abs() < i64::MAX as f64 {
        return Some((total as i64).into());
    }
    Number::from_f64(total).map(MetricValue::from)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test document must be an object"),
        }
    }

    fn find<'a>(stats: &'a [Stat], name: &str) -> &'a Stat {
        stats
            .iter()
            .find(|s| s.name == name)
            .unwrap_or_else(|| panic!("missing stat {}", name))
    }

    #[test]
    fn test_excluded_keys_only() {
        let stats = flatten(doc(json!({
            "status": "enabled",
            "clients_ever_seen": 10,
            "unique_clients": 4,
            "unique_domains": 900,
            "FTLnotrunning": true
        })));
        assert!(stats.is_empty());
    }

    #[test]
    fn test_top_level_counter() {
        let stats = flatten(doc(json!({"domains_blocked": 123})));
        assert_eq!(
            stats,
            vec![Stat {
                name: "domains_blocked".to_string(),
                value: 123i64.into(),
                kind: MetricType::Counter,
                tags: vec![Tag::new("pihole", "top")],
            }]
        );
    }

    #[test]
    fn test_gravity_sub_document() {
        let stats = flatten(doc(json!({
            "gravity_last_updated": {
                "relative": {"days": 1, "hours": 2, "minutes": 3},
                "file_exists": true,
                "absolute": "/x",
                "custom_count": 7
            }
        })));

        assert_eq!(stats.len(), 2);
        let grav = vec![Tag::new("pihole", "grav")];

        let last = find(&stats, "last_updated");
        assert_eq!(last.value, 1563i64.into());
        assert_eq!(last.tags, grav);

        let custom = find(&stats, "custom_count");
        assert_eq!(custom.value, 7i64.into());
        assert_eq!(custom.tags, grav);

        assert!(stats.iter().all(|s| s.name != "file_exists" && s.name != "absolute"));
    }

    #[test]
    fn test_mixed_document() {
        let stats = flatten(doc(json!({
            "domains_being_blocked": 120000,
            "dns_queries_today": "1,234",
            "ads_percentage_today": 12.5,
            "status": "enabled",
            "gravity_last_updated": {
                "file_exists": true,
                "absolute": 1700000000,
                "relative": {"days": 0, "hours": 0, "minutes": 5}
            }
        })));

        assert_eq!(stats.len(), 4);
        assert_eq!(find(&stats, "domains_being_blocked").value, 120000i64.into());
        assert_eq!(find(&stats, "dns_queries_today").value, 1234i64.into());
        assert_eq!(find(&stats, "ads_percentage_today").value.to_string(), "12.5");
        assert_eq!(find(&stats, "last_updated").value, 5i64.into());
        assert!(stats.iter().all(|s| s.kind == MetricType::Counter));
    }

    #[test]
    fn test_top_level_object_not_descended() {
        let stats = flatten(doc(json!({
            "reply_types": {"A": 10, "AAAA": 5},
            "queries_cached": 3
        })));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].name, "queries_cached");
    }

    #[test]
    fn test_relative_missing_part_skipped() {
        let stats = flatten(doc(json!({
            "gravity_last_updated": {"relative": {"days": 1, "hours": 2}}
        })));
        assert!(stats.is_empty());
    }

    #[test]
    fn test_relative_fractional() {
        let stats = flatten(doc(json!({
            "gravity_last_updated": {"relative": {"days": 0, "hours": 1, "minutes": 0.5}}
        })));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].value.to_string(), "60.5");
    }

    #[test]
    fn test_relative_whole_floats_render_as_integer() {
        let stats = flatten(doc(json!({
            "gravity_last_updated": {"relative": {"days": 1.0, "hours": 2, "minutes": 3.0}}
        })));
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].value, 1563i64.into());
        assert_eq!(stats[0].value.to_string(), "1563");
    }

    #[test]
    fn test_document_order_preserved() {
        let stats = flatten(doc(json!({"b": 1, "a": 2, "c": 3})));
        let names: Vec<_> = stats.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["b", "a", "c"]);
    }

    #[test]
    fn test_parse_document() {
        let map = parse_document(br#"{"domains_being_blocked": 5}"#).unwrap();
        assert_eq!(map.get("domains_being_blocked"), Some(&json!(5)));
    }

    #[test]
    fn test_parse_document_malformed() {
        let bodies: [&[u8]; 4] = [b"<html>", b"", b"[1, 2]", b"42"];
        for body in bodies {
            let err = parse_document(body).unwrap_err();
            assert!(matches!(err, ExporterError::MalformedResponse(_)));
        }
    }
}
