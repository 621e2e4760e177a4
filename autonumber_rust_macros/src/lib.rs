mod document;

use proc_macro::TokenStream;

/// Derive macro for the `Document` trait.
///
/// Every named field is exposed under its own name and converted through
/// `FieldValue`. Field attributes:
/// - `#[document(skip)]`: not visible to hooks (use for types without a
///   `FieldValue` impl)
/// - `#[document(rename = "name")]`: expose the field under another name
/// - `#[document(persisted)]`: a `bool` tracking whether the document has been
///   written; drives `is_new` and `mark_persisted`
///
/// # Usage
///
/// ```ignore
/// #[derive(Clone, Document)]
/// struct Order {
///     #[document(rename = "id")]
///     number: Option<String>,
///     description: String,
///     #[document(persisted)]
///     saved: bool,
/// }
/// ```
#[proc_macro_derive(Document, attributes(document))]
pub fn derive_document(input: TokenStream) -> TokenStream {
    document::derive_document(input)
}
