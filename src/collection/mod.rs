//! Collections - A minimal in-memory host for documents and their hooks.
//!
//! Real deployments hang [`AutoNumber`](crate::AutoNumber) off their own
//! document framework through [`PreInsertHook`]. `InMemoryCollection` plays
//! that role for tests and development: it runs the schema's hooks on every
//! insert, enforces unique fields, and notifies listeners.
//!
//! ## Example
//!
//! ```ignore
//! let mut schema = Schema::new("Order");
//! AutoNumber::install(store.clone(), AutoNumberOptions::new("Order", "id"), &mut schema)?;
//!
//! let orders = InMemoryCollection::new(schema);
//! let order = orders.insert(JsonDocument::new().with("description", "first"))?;
//! assert_eq!(order.field("id").as_deref(), Some("1"));
//! ```

#[cfg(feature = "emitter")]
mod emitter;
mod schema;

use std::sync::RwLock;

#[cfg(feature = "emitter")]
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::document::Document;
use crate::error::AutoNumberError;

pub use schema::{FieldDef, Schema};

/// Runs once per new document, before it is written.
pub trait PreInsertHook<D: ?Sized>: Send + Sync {
    fn pre_insert(&self, doc: &mut D) -> Result<(), AutoNumberError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A pre-insert hook rejected the document.
    #[error("pre-insert hook failed: {0}")]
    Hook(#[source] AutoNumberError),
    /// A unique field already holds this value.
    #[error("duplicate key: {field} = {value:?}")]
    DuplicateKey { field: String, value: String },
    #[error("collection lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// In-memory document collection driven by a [`Schema`].
///
/// Hooks run outside the storage lock, so concurrent inserts only serialize on
/// the final uniqueness check and write.
pub struct InMemoryCollection<D> {
    schema: Schema<D>,
    documents: RwLock<Vec<D>>,
    #[cfg(feature = "emitter")]
    events: emitter::InsertEvents,
}

impl<D> InMemoryCollection<D>
where
    D: Document + Clone + Send + Sync,
{
    pub fn new(schema: Schema<D>) -> Self {
        Self {
            schema,
            documents: RwLock::new(Vec::new()),
            #[cfg(feature = "emitter")]
            events: emitter::InsertEvents::new(),
        }
    }

    /// Run the hooks, check unique fields and store the document.
    ///
    /// Returns the stored copy, marked persisted.
    pub fn insert(&self, mut doc: D) -> Result<D, CollectionError> {
        for hook in self.schema.hooks() {
            hook.pre_insert(&mut doc).map_err(CollectionError::Hook)?;
        }

        {
            let mut documents = self
                .documents
                .write()
                .map_err(|_| CollectionError::LockPoisoned("insert"))?;

            for field in self.schema.unique_fields() {
                let Some(value) = doc.field(&field.name) else {
                    continue;
                };
                let taken = documents
                    .iter()
                    .any(|existing| existing.field(&field.name).as_deref() == Some(value.as_str()));
                if taken {
                    return Err(CollectionError::DuplicateKey {
                        field: field.name.clone(),
                        value,
                    });
                }
            }

            doc.mark_persisted();
            documents.push(doc.clone());
        }

        debug!(collection = %self.schema.name(), "document inserted");

        #[cfg(feature = "emitter")]
        self.events.emit(self.declared_fields(&doc));

        Ok(doc)
    }

    /// Documents matching a predicate, in insertion order.
    pub fn find(&self, predicate: &dyn Fn(&D) -> bool) -> Result<Vec<D>, CollectionError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| CollectionError::LockPoisoned("find"))?;
        Ok(documents.iter().filter(|doc| predicate(doc)).cloned().collect())
    }

    pub fn all(&self) -> Result<Vec<D>, CollectionError> {
        self.find(&|_| true)
    }

    pub fn len(&self) -> Result<usize, CollectionError> {
        let documents = self
            .documents
            .read()
            .map_err(|_| CollectionError::LockPoisoned("len"))?;
        Ok(documents.len())
    }

    pub fn is_empty(&self) -> Result<bool, CollectionError> {
        Ok(self.len()? == 0)
    }

    /// Remove every document. Counters are untouched.
    pub fn clear(&self) -> Result<(), CollectionError> {
        let mut documents = self
            .documents
            .write()
            .map_err(|_| CollectionError::LockPoisoned("clear"))?;
        documents.clear();
        Ok(())
    }

    /// Register a listener called after every successful insert with a JSON
    /// object of the schema's declared fields. Returns the listener id.
    #[cfg(feature = "emitter")]
    pub fn on_inserted<F>(&self, listener: F) -> Option<String>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        self.events.on(listener)
    }

    #[cfg(feature = "emitter")]
    fn declared_fields(&self, doc: &D) -> String {
        let fields: Map<String, Value> = self
            .schema
            .fields()
            .iter()
            .map(|field| {
                let value = doc.field(&field.name).map_or(Value::Null, Value::String);
                (field.name.clone(), value)
            })
            .collect();
        Value::Object(fields).to_string()
    }
}
