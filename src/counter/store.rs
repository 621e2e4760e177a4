//! CounterStore - Abstract storage for counter records.

use super::{CounterError, CounterKey, CounterRecord};

/// Storage for counter records.
///
/// Implementations back onto whatever holds the records (a MongoDB collection,
/// a SQL table, a KV prefix). The only write the auto-number hook performs is
/// `increment_or_create`, which must be a single atomic round trip.
pub trait CounterStore: Send + Sync {
    /// Get the record for `key`. Returns None if it was never created.
    fn find_counter(&self, key: &CounterKey) -> Result<Option<CounterRecord>, CounterError>;

    /// Atomically add `step` to the record for `key` and return the
    /// post-increment record. A missing record is created as if it held
    /// `seed`, so the first call yields `seed + step`.
    ///
    /// `Ok(None)` means the backend acknowledged the call without returning a
    /// document.
    fn increment_or_create(
        &self,
        key: &CounterKey,
        seed: i64,
        step: i64,
    ) -> Result<Option<CounterRecord>, CounterError>;

    /// Delete the record for `key`. Returns true if it existed.
    ///
    /// Administrative only; the auto-number hook never deletes counters.
    fn delete_counter(&self, key: &CounterKey) -> Result<bool, CounterError>;
}

impl<S: CounterStore + ?Sized> CounterStore for std::sync::Arc<S> {
    fn find_counter(&self, key: &CounterKey) -> Result<Option<CounterRecord>, CounterError> {
        (**self).find_counter(key)
    }

    fn increment_or_create(
        &self,
        key: &CounterKey,
        seed: i64,
        step: i64,
    ) -> Result<Option<CounterRecord>, CounterError> {
        (**self).increment_or_create(key, seed, step)
    }

    fn delete_counter(&self, key: &CounterKey) -> Result<bool, CounterError> {
        (**self).delete_counter(key)
    }
}
