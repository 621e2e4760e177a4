//! Counters - Per-key sequence state and the stores that hold it.
//!
//! A counter is identified by a [`CounterKey`] (model, field, optional group).
//! Stores expose a single atomic "increment, creating if absent" primitive;
//! callers must never emulate it with a lookup followed by a write.
//!
//! ## Example
//!
//! ```ignore
//! use autonumber_rust::{CounterKey, CounterStore, InMemoryCounterStore};
//!
//! let store = InMemoryCounterStore::new();
//! let key = CounterKey::new("Order", "id");
//! let record = store.increment_or_create(&key, 0, 1)?.unwrap();
//! assert_eq!(record.count, 1);
//! ```

mod in_memory;
mod snapshot;
mod store;

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifies one counter: the owning model, the sequenced field and an
/// optional group discriminator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CounterKey {
    pub model: String,
    pub field: String,
    pub group: Option<String>,
}

impl CounterKey {
    /// Key for a counter shared by every document of `model`.
    pub fn new(model: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            field: field.into(),
            group: None,
        }
    }

    /// Key for a counter scoped to one group value.
    pub fn grouped(
        model: impl Into<String>,
        field: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            field: field.into(),
            group: Some(group.into()),
        }
    }
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.group {
            Some(group) => write!(f, "{}.{}[{}]", self.model, self.field, group),
            None => write!(f, "{}.{}", self.model, self.field),
        }
    }
}

/// Persisted sequence state for one key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterRecord {
    pub model: String,
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default)]
    pub count: i64,
}

impl CounterRecord {
    /// A fresh record for `key` holding `count`.
    pub fn new(key: &CounterKey, count: i64) -> Self {
        Self {
            model: key.model.clone(),
            field: key.field.clone(),
            group: key.group.clone(),
            count,
        }
    }

    /// The key this record belongs to.
    pub fn key(&self) -> CounterKey {
        CounterKey {
            model: self.model.clone(),
            field: self.field.clone(),
            group: self.group.clone(),
        }
    }
}

/// Error type for counter store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    /// A lock guarding counter state was poisoned by a panicking writer.
    #[error("counter store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    /// The backing store could not be reached or refused the operation.
    #[error("counter store unavailable: {0}")]
    Unavailable(String),
    /// Incrementing would overflow the counter.
    #[error("counter {key} would overflow")]
    Overflow { key: CounterKey },
    /// A snapshot could not be encoded or decoded.
    #[error("counter snapshot error: {0}")]
    Snapshot(String),
}

pub use in_memory::InMemoryCounterStore;
pub use snapshot::CounterSnapshot;
pub use store::CounterStore;
