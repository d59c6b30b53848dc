//! In-memory ledger for tests and the dev peer.
//!
//! Puts apply immediately (a real peer scopes them to the enclosing
//! transaction). Trait operations are counted so tests can assert that a
//! failed invocation performed zero ledger I/O; the inspection helpers
//! below bypass the counters.

use crate::{Ledger, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// An event published through [`Ledger::set_event`].
#[derive(Debug, Clone, Serialize)]
pub struct RecordedEvent {
    pub name: String,
    pub payload: serde_json::Value,
}

/// Trait-operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpCounts {
    pub gets: u64,
    pub puts: u64,
    pub events: u64,
}

#[derive(Default)]
struct Inner {
    records: HashMap<String, Vec<u8>>,
    events: Vec<RecordedEvent>,
    counts: OpCounts,
}

#[derive(Clone, Default)]
pub struct MemLedger {
    inner: Arc<RwLock<Inner>>,
}

impl MemLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a record without touching the operation counters.
    pub fn record(&self, key: &str) -> Option<Vec<u8>> {
        self.inner.read().unwrap().records.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.read().unwrap().records.contains_key(key)
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.inner.read().unwrap().events.clone()
    }

    pub fn op_counts(&self) -> OpCounts {
        self.inner.read().unwrap().counts
    }
}

#[async_trait]
impl Ledger for MemLedger {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut inner = self.inner.write().unwrap();
        inner.counts.gets += 1;
        Ok(inner.records.get(key).cloned())
    }

    async fn put_state(&self, key: &str, value: &[u8]) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.counts.puts += 1;
        inner.records.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    async fn set_event(&self, name: &str, payload: &[u8]) -> Result<()> {
        let mut inner = self.inner.write().unwrap();
        inner.counts.events += 1;
        let payload = serde_json::from_slice(payload)
            .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(payload).into()));
        inner.events.push(RecordedEvent {
            name: name.to_string(),
            payload,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get_roundtrips() {
        let ledger = MemLedger::new();
        ledger.put_state("k", b"v").await.unwrap();
        assert_eq!(ledger.get_state("k").await.unwrap(), Some(b"v".to_vec()));
        assert_eq!(ledger.get_state("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn put_overwrites() {
        let ledger = MemLedger::new();
        ledger.put_state("k", b"one").await.unwrap();
        ledger.put_state("k", b"two").await.unwrap();
        assert_eq!(ledger.record("k"), Some(b"two".to_vec()));
    }

    #[tokio::test]
    async fn counters_track_trait_operations_only() {
        let ledger = MemLedger::new();
        ledger.put_state("k", b"v").await.unwrap();
        ledger.get_state("k").await.unwrap();
        ledger.set_event("e", b"{}").await.unwrap();
        // inspection helpers do not count
        ledger.record("k");
        ledger.contains("k");
        assert_eq!(
            ledger.op_counts(),
            OpCounts {
                gets: 1,
                puts: 1,
                events: 1
            }
        );
    }

    #[tokio::test]
    async fn events_record_json_payloads() {
        let ledger = MemLedger::new();
        ledger.set_event("C1-t1-Events", br#"[{"a":1}]"#).await.unwrap();
        let events = ledger.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "C1-t1-Events");
        assert_eq!(events[0].payload, serde_json::json!([{"a": 1}]));
    }

    #[tokio::test]
    async fn clones_share_the_same_store() {
        let ledger = MemLedger::new();
        let other = ledger.clone();
        ledger.put_state("k", b"v").await.unwrap();
        assert!(other.contains("k"));
    }
}
