//! AutoNumber - The pre-insert hook that numbers new documents.
//!
//! Per insertion the hook:
//! 1. skips documents that are not new,
//! 2. builds the counter key (reading the group field if configured),
//! 3. resolves the prefix,
//! 4. makes one atomic `increment_or_create` call,
//! 5. formats the count and writes it into the counter field.
//!
//! Steps 2 and 3 can fail, and both run before the counter is touched, so a
//! rejected document never consumes a value.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::collection::{FieldDef, PreInsertHook, Schema};
use crate::counter::{CounterKey, CounterStore};
use crate::document::Document;
use crate::error::{AutoNumberError, Phase};
use crate::format::{format_value, resolve_prefix};
use crate::options::AutoNumberOptions;

/// An auto-numbered field bound to a counter store.
///
/// The store is injected, so installations can share one store or use
/// isolated ones.
pub struct AutoNumber<S> {
    store: S,
    options: AutoNumberOptions,
}

impl<S: CounterStore> AutoNumber<S> {
    /// Validate `options` and bind them to `store`.
    pub fn new(store: S, options: AutoNumberOptions) -> Result<Self, AutoNumberError> {
        options.validate()?;
        Ok(Self { store, options })
    }

    /// Declare the counter field on `schema` and register the hook.
    ///
    /// The field is declared unique when `options.unique` is set; enforcing it
    /// is up to the host.
    pub fn install<D>(
        store: S,
        options: AutoNumberOptions,
        schema: &mut Schema<D>,
    ) -> Result<Arc<Self>, AutoNumberError>
    where
        S: 'static,
        D: Document + 'static,
    {
        let plugin = Arc::new(Self::new(store, options)?);

        schema.add_field(FieldDef::new(&plugin.options.counter_field).unique(plugin.options.unique));
        schema.plugin(plugin.clone());

        Ok(plugin)
    }

    /// The counter key `doc` would be numbered under.
    ///
    /// Any present group value, including the empty string, names a group.
    pub fn key_for<D: Document + ?Sized>(&self, doc: &D) -> Result<CounterKey, AutoNumberError> {
        let Some(group_field) = &self.options.group_field else {
            return Ok(CounterKey::new(&self.options.model, &self.options.counter_field));
        };

        let group = doc
            .field(group_field)
            .ok_or_else(|| AutoNumberError::MissingGroupValue {
                model: self.options.model.clone(),
                field: group_field.clone(),
            })?;

        Ok(CounterKey::grouped(
            &self.options.model,
            &self.options.counter_field,
            group,
        ))
    }

    /// Take the next value for `key`.
    pub fn next_value(&self, key: &CounterKey) -> Result<i64, AutoNumberError> {
        let record = self
            .store
            .increment_or_create(key, self.options.starts_with, self.options.increment_by)
            .map_err(|err| AutoNumberError::from_store(key, Phase::Increment, err))?
            .ok_or_else(|| AutoNumberError::CounterAssignmentFailed {
                key: key.clone(),
                reason: "store returned no counter".into(),
            })?;

        if record.key() != *key {
            return Err(AutoNumberError::CounterAssignmentFailed {
                key: key.clone(),
                reason: format!("store returned counter {}", record.key()),
            });
        }

        Ok(record.count)
    }

    /// The last value handed out for `group`, without incrementing.
    pub fn current_value(&self, group: Option<&str>) -> Result<Option<i64>, AutoNumberError> {
        let key = self.key_for_group(group);
        let record = self
            .store
            .find_counter(&key)
            .map_err(|err| AutoNumberError::from_store(&key, Phase::Lookup, err))?;
        Ok(record.map(|record| record.count))
    }

    /// Drop the counter for `group` so numbering restarts at
    /// `starts_with + increment_by`. Returns true if a counter existed.
    pub fn reset(&self, group: Option<&str>) -> Result<bool, AutoNumberError> {
        let key = self.key_for_group(group);
        self.store
            .delete_counter(&key)
            .map_err(|err| AutoNumberError::from_store(&key, Phase::Delete, err))
    }

    /// Number `doc` if it is new. Returns the assigned value.
    #[instrument(
        name = "autonumber-assign",
        skip_all,
        fields(model = %self.options.model, field = %self.options.counter_field)
    )]
    pub fn assign<D: Document + ?Sized>(
        &self,
        doc: &mut D,
    ) -> Result<Option<String>, AutoNumberError> {
        if !doc.is_new() {
            return Ok(None);
        }

        self.assign_new(doc)
            .map(Some)
            .inspect_err(|err| warn!(error = %err, "auto-number assignment aborted"))
    }

    fn assign_new<D: Document + ?Sized>(&self, doc: &mut D) -> Result<String, AutoNumberError> {
        let key = self.key_for(doc)?;
        let prefix = resolve_prefix(self.options.prefix.as_ref(), &self.options.model, doc)?;

        let count = self.next_value(&key)?;
        let value = format_value(count, prefix.as_ref());

        doc.set_field(&self.options.counter_field, value.clone())
            .map_err(|source| AutoNumberError::Document {
                model: self.options.model.clone(),
                field: self.options.counter_field.clone(),
                source,
            })?;

        debug!(key = %key, count, value = %value, "assigned auto-number");
        Ok(value)
    }

    fn key_for_group(&self, group: Option<&str>) -> CounterKey {
        match group {
            Some(group) => {
                CounterKey::grouped(&self.options.model, &self.options.counter_field, group)
            }
            None => CounterKey::new(&self.options.model, &self.options.counter_field),
        }
    }
}

impl<S, D> PreInsertHook<D> for AutoNumber<S>
where
    S: CounterStore,
    D: Document + ?Sized,
{
    fn pre_insert(&self, doc: &mut D) -> Result<(), AutoNumberError> {
        self.assign(doc).map(|_| ())
    }
}
