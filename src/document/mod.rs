//! Documents - The host-side view of a record being inserted.
//!
//! The auto-number hook only needs to read other fields (group and prefix
//! sources) and write the counter field, so the contract is string-typed.
//! Plain structs get an implementation from `#[derive(Document)]`; schemaless
//! data can use [`JsonDocument`].
//!
//! ## Example
//!
//! ```ignore
//! use autonumber_rust::Document;
//!
//! #[derive(Clone, Debug, Default, Document)]
//! struct Item {
//!     id: Option<String>,
//!     title: String,
//!     order: u32,
//!     #[document(persisted)]
//!     saved: bool,
//!     #[document(skip)]
//!     tags: Vec<String>,
//! }
//! ```

mod field_value;
mod json;

use thiserror::Error;

/// A document the host is about to persist.
pub trait Document {
    /// The value of `name` rendered as a string, or None if the document has
    /// no such field or it is unset.
    fn field(&self, name: &str) -> Option<String>;

    /// Whether `name` holds a usable value. Unset fields and the falsy
    /// scalars (empty string, zero, `false`) are not set.
    ///
    /// The default works on the string form; implementations that know the
    /// underlying type should override it.
    fn field_is_set(&self, name: &str) -> bool {
        self.field(name)
            .is_some_and(|value| !matches!(value.as_str(), "" | "0" | "false"))
    }

    /// Set `name` to `value`.
    fn set_field(&mut self, name: &str, value: String) -> Result<(), DocumentError>;

    /// Whether the document has not been persisted yet. Only new documents are
    /// numbered.
    fn is_new(&self) -> bool {
        true
    }

    /// Called by the host once the document has been written.
    fn mark_persisted(&mut self) {}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DocumentError {
    /// The document has no field with this name.
    #[error("document has no field {0}")]
    UnknownField(String),
    /// The field exists but cannot hold the value.
    #[error("field {field} cannot hold value {value:?}")]
    InvalidValue { field: String, value: String },
    /// A JSON document must be built from an object.
    #[error("document must be a JSON object")]
    NotAnObject,
}

pub use field_value::FieldValue;
pub use json::JsonDocument;
