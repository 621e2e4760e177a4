use std::fmt;

use thiserror::Error;

use crate::counter::{CounterError, CounterKey};
use crate::document::DocumentError;
use crate::options::OptionsError;

/// The counter store call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Lookup,
    Increment,
    Delete,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Lookup => f.write_str("lookup"),
            Phase::Increment => f.write_str("increment"),
            Phase::Delete => f.write_str("delete"),
        }
    }
}

/// Why a value could not be assigned. Every variant aborts the insertion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AutoNumberError {
    #[error("invalid auto-number options: {0}")]
    Options(#[from] OptionsError),

    #[error("counter store unavailable during {phase} of {key}")]
    StorageUnavailable {
        key: CounterKey,
        phase: Phase,
        #[source]
        source: CounterError,
    },

    #[error("prefix source field `{field}` is missing or falsy on {model} document")]
    InvalidPrefixSource { model: String, field: String },

    #[error("group field `{field}` is missing on {model} document")]
    MissingGroupValue { model: String, field: String },

    #[error("counter assignment failed for {key}: {reason}")]
    CounterAssignmentFailed { key: CounterKey, reason: String },

    #[error("could not write `{field}` on {model} document")]
    Document {
        model: String,
        field: String,
        #[source]
        source: DocumentError,
    },
}

impl AutoNumberError {
    pub(crate) fn from_store(key: &CounterKey, phase: Phase, err: CounterError) -> Self {
        match err {
            CounterError::Overflow { .. } => AutoNumberError::CounterAssignmentFailed {
                key: key.clone(),
                reason: err.to_string(),
            },
            source => AutoNumberError::StorageUnavailable {
                key: key.clone(),
                phase,
                source,
            },
        }
    }
}
