//! Options - Configuration for one auto-number installation.
//!
//! Options can be built in code or parsed from JSON using the camelCase keys
//! `counterField`, `model`, `groupField`, `startsWith`, `incrementBy`,
//! `unique` and `prefix`.
//!
//! ```ignore
//! let options = AutoNumberOptions::new("Item", "id")
//!     .group_by("order")
//!     .prefix(PrefixOptions::field("sku", "-"));
//!
//! let parsed = AutoNumberOptions::from_json(r#"{ "model": "Order", "counterField": "id" }"#)?;
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where the prefix text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixKind {
    /// `value` is used verbatim.
    Literal,
    /// `value` names a field on the document being inserted.
    Field,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixOptions {
    #[serde(rename = "type")]
    pub kind: PrefixKind,
    pub value: String,
    #[serde(default)]
    pub delimiter: String,
}

impl PrefixOptions {
    pub fn literal(value: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            kind: PrefixKind::Literal,
            value: value.into(),
            delimiter: delimiter.into(),
        }
    }

    pub fn field(field: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            kind: PrefixKind::Field,
            value: field.into(),
            delimiter: delimiter.into(),
        }
    }
}

/// Configuration for an auto-numbered field.
///
/// Defaults: `starts_with = 0`, `increment_by = 1`, `unique = false`, no group,
/// no prefix. The first document for a key receives `starts_with + increment_by`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoNumberOptions {
    /// Field on the document that receives the value.
    pub counter_field: String,
    /// Logical entity name used as the first component of the counter key.
    pub model: String,
    /// Field whose stringified value partitions the sequence.
    #[serde(default)]
    pub group_field: Option<String>,
    #[serde(default)]
    pub starts_with: i64,
    #[serde(default = "default_increment")]
    pub increment_by: i64,
    /// Ask the host to enforce uniqueness on `counter_field`.
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub prefix: Option<PrefixOptions>,
}

fn default_increment() -> i64 {
    1
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptionsError {
    #[error("counterField must be a non-empty field name")]
    MissingCounterField,
    #[error("model must be a non-empty name")]
    MissingModel,
    #[error("groupField must be a non-empty field name when set")]
    EmptyGroupField,
    #[error("incrementBy must be positive, got {0}")]
    NonPositiveIncrement(i64),
    #[error("prefix value must not be empty")]
    EmptyPrefixValue,
    #[error("invalid options: {0}")]
    Parse(String),
}

impl AutoNumberOptions {
    pub fn new(model: impl Into<String>, counter_field: impl Into<String>) -> Self {
        Self {
            counter_field: counter_field.into(),
            model: model.into(),
            group_field: None,
            starts_with: 0,
            increment_by: default_increment(),
            unique: false,
            prefix: None,
        }
    }

    /// Parse and validate options from JSON.
    pub fn from_json(json: &str) -> Result<Self, OptionsError> {
        let options: Self =
            serde_json::from_str(json).map_err(|e| OptionsError::Parse(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn group_by(mut self, field: impl Into<String>) -> Self {
        self.group_field = Some(field.into());
        self
    }

    pub fn starts_with(mut self, start: i64) -> Self {
        self.starts_with = start;
        self
    }

    pub fn increment_by(mut self, step: i64) -> Self {
        self.increment_by = step;
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn prefix(mut self, prefix: PrefixOptions) -> Self {
        self.prefix = Some(prefix);
        self
    }

    /// Check the options describe a usable counter.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.counter_field.trim().is_empty() {
            return Err(OptionsError::MissingCounterField);
        }
        if self.model.trim().is_empty() {
            return Err(OptionsError::MissingModel);
        }
        if matches!(&self.group_field, Some(field) if field.trim().is_empty()) {
            return Err(OptionsError::EmptyGroupField);
        }
        if self.increment_by <= 0 {
            return Err(OptionsError::NonPositiveIncrement(self.increment_by));
        }
        if matches!(&self.prefix, Some(prefix) if prefix.value.is_empty()) {
            return Err(OptionsError::EmptyPrefixValue);
        }
        Ok(())
    }
}
