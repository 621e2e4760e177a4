//! Turning a raw count into the value written to the document.
//!
//! Prefix resolution is separate from formatting so it can run before the
//! counter is incremented.

use crate::document::Document;
use crate::error::AutoNumberError;
use crate::options::{PrefixKind, PrefixOptions};

/// Prefix text and delimiter, ready to be joined with a count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrefix {
    pub text: String,
    pub delimiter: String,
}

/// Resolve the configured prefix against `doc`.
///
/// A field-sourced prefix fails with `InvalidPrefixSource` when the field is
/// missing or falsy (see [`Document::field_is_set`]).
pub fn resolve_prefix<D: Document + ?Sized>(
    prefix: Option<&PrefixOptions>,
    model: &str,
    doc: &D,
) -> Result<Option<ResolvedPrefix>, AutoNumberError> {
    let Some(prefix) = prefix else {
        return Ok(None);
    };

    let text = match prefix.kind {
        PrefixKind::Literal => prefix.value.clone(),
        PrefixKind::Field => doc
            .field_is_set(&prefix.value)
            .then(|| doc.field(&prefix.value))
            .flatten()
            .ok_or_else(|| AutoNumberError::InvalidPrefixSource {
                model: model.to_string(),
                field: prefix.value.clone(),
            })?,
    };

    Ok(Some(ResolvedPrefix {
        text,
        delimiter: prefix.delimiter.clone(),
    }))
}

/// `<prefix><delimiter><count>`, or just the count.
pub fn format_value(count: i64, prefix: Option<&ResolvedPrefix>) -> String {
    match prefix {
        Some(prefix) => format!("{}{}{}", prefix.text, prefix.delimiter, count),
        None => count.to_string(),
    }
}
