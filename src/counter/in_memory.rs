//! InMemoryCounterStore - HashMap-backed counter store for testing and development.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{CounterError, CounterKey, CounterRecord, CounterSnapshot, CounterStore};

/// In-memory counter store backed by a HashMap.
///
/// `increment_or_create` runs entirely under one write lock, which makes it the
/// atomic upsert the hook relies on. Clone-friendly via Arc.
#[derive(Clone)]
pub struct InMemoryCounterStore {
    storage: Arc<RwLock<HashMap<CounterKey, CounterRecord>>>,
}

impl Default for InMemoryCounterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCounterStore {
    /// Create a new empty counter store.
    pub fn new() -> Self {
        Self {
            storage: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// All records, ordered by key.
    pub fn counters(&self) -> Result<Vec<CounterRecord>, CounterError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| CounterError::LockPoisoned("read"))?;

        let mut records: Vec<_> = storage.values().cloned().collect();
        records.sort_by_key(CounterRecord::key);
        Ok(records)
    }

    /// Number of counters held.
    pub fn len(&self) -> Result<usize, CounterError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| CounterError::LockPoisoned("read"))?;
        Ok(storage.len())
    }

    pub fn is_empty(&self) -> Result<bool, CounterError> {
        Ok(self.len()? == 0)
    }

    /// Capture every counter.
    pub fn snapshot(&self) -> Result<CounterSnapshot, CounterError> {
        let records = self.counters()?;
        CounterSnapshot::encode(&records)
    }

    /// Replace every counter with the contents of `snapshot`.
    pub fn restore(&self, snapshot: &CounterSnapshot) -> Result<(), CounterError> {
        let records = snapshot.records()?;

        let mut storage = self
            .storage
            .write()
            .map_err(|_| CounterError::LockPoisoned("restore"))?;

        storage.clear();
        for record in records {
            storage.insert(record.key(), record);
        }

        Ok(())
    }
}

impl CounterStore for InMemoryCounterStore {
    fn find_counter(&self, key: &CounterKey) -> Result<Option<CounterRecord>, CounterError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| CounterError::LockPoisoned("read"))?;
        Ok(storage.get(key).cloned())
    }

    fn increment_or_create(
        &self,
        key: &CounterKey,
        seed: i64,
        step: i64,
    ) -> Result<Option<CounterRecord>, CounterError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| CounterError::LockPoisoned("increment"))?;

        let current = storage.get(key).map(|record| record.count).unwrap_or(seed);
        let next = current
            .checked_add(step)
            .ok_or_else(|| CounterError::Overflow { key: key.clone() })?;

        let record = storage
            .entry(key.clone())
            .or_insert_with(|| CounterRecord::new(key, seed));
        record.count = next;

        Ok(Some(record.clone()))
    }

    fn delete_counter(&self, key: &CounterKey) -> Result<bool, CounterError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| CounterError::LockPoisoned("delete"))?;
        Ok(storage.remove(key).is_some())
    }
}
