//! Auto-incrementing identifier fields for document stores.
//!
//! Install [`AutoNumber`] on a schema and every new document receives the next
//! value of a counter keyed by model, field and (optionally) a group value,
//! optionally prefixed with literal text or another field's value.
//!
//! ```ignore
//! use autonumber_rust::{
//!     AutoNumber, AutoNumberOptions, InMemoryCollection, InMemoryCounterStore, JsonDocument,
//!     Schema,
//! };
//!
//! let store = InMemoryCounterStore::new();
//! let mut schema = Schema::new("Item");
//! AutoNumber::install(
//!     store.clone(),
//!     AutoNumberOptions::new("Item", "id").group_by("order"),
//!     &mut schema,
//! )?;
//!
//! let items = InMemoryCollection::new(schema);
//! let item = items.insert(JsonDocument::new().with("order", "1"))?;
//! ```

pub mod collection;
pub mod counter;
pub mod document;
mod error;
pub mod format;
mod options;
mod plugin;

pub use collection::{CollectionError, FieldDef, InMemoryCollection, PreInsertHook, Schema};
pub use counter::{
    CounterError, CounterKey, CounterRecord, CounterSnapshot, CounterStore, InMemoryCounterStore,
};
pub use document::{Document, DocumentError, FieldValue, JsonDocument};
pub use error::{AutoNumberError, Phase};
pub use options::{AutoNumberOptions, OptionsError, PrefixKind, PrefixOptions};
pub use plugin::AutoNumber;

// Re-export the derive so `#[derive(Document)]` works with a single import.
pub use autonumber_rust_macros::Document;
