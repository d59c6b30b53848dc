//! Ledger access for contract state.
//!
//! The [`Ledger`] trait is the narrow surface a host runtime provides to
//! chaincode: keyed state reads/writes and event publishing, all scoped
//! to the enclosing host transaction. [`MemLedger`] is the in-memory
//! implementation backing tests and the dev peer.

pub mod keys;
pub mod memory;

pub use memory::{MemLedger, OpCounts, RecordedEvent};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("ledger backend: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Host-provided transactional key-value store with event publishing.
#[async_trait]
pub trait Ledger: Send + Sync {
    async fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>>;
    async fn put_state(&self, key: &str, value: &[u8]) -> Result<()>;
    async fn set_event(&self, name: &str, payload: &[u8]) -> Result<()>;
}
