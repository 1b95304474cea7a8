#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use pihole_statsd::{ExporterError, StatSource};

pub const SUMMARY: &str = r#"{
    "domains_being_blocked": 120345,
    "dns_queries_today": 5321,
    "ads_blocked_today": 812,
    "ads_percentage_today": 15.26,
    "unique_domains": 901,
    "clients_ever_seen": 12,
    "unique_clients": 8,
    "status": "enabled",
    "gravity_last_updated": {
        "file_exists": true,
        "absolute": 1700000000,
        "relative": {"days": 1, "hours": 2, "minutes": 3}
    }
}"#;

/// Canned status source that counts calls and can fail or stall on demand.
#[derive(Debug)]
pub struct FakeSource {
    body: String,
    calls: AtomicUsize,
    fail_first: usize,
    first_delay: Option<Duration>,
}

impl FakeSource {
    pub fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            calls: AtomicUsize::new(0),
            fail_first: 0,
            first_delay: None,
        }
    }

    /// Fail the first `n` fetches.
    pub fn failing_first(mut self, n: usize) -> Self {
        self.fail_first = n;
        self
    }

    /// Stall the first fetch for `delay`.
    pub fn stalling_first(mut self, delay: Duration) -> Self {
        self.first_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatSource for FakeSource {
    async fn fetch(&self) -> Result<Vec<u8>, ExporterError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == 0 {
            if let Some(delay) = self.first_delay {
                tokio::time::sleep(delay).await;
            }
        }
        if call < self.fail_first {
            return Err(ExporterError::Fetch("connection refused".to_string()));
        }
        Ok(self.body.clone().into_bytes())
    }
}
