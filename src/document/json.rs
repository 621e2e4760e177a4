use serde_json::{Map, Value};

use super::{Document, DocumentError};

/// Schemaless document backed by a JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JsonDocument {
    fields: Map<String, Value>,
    persisted: bool,
}

impl JsonDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a new (unpersisted) document from a JSON object.
    pub fn from_value(value: Value) -> Result<Self, DocumentError> {
        match value {
            Value::Object(fields) => Ok(Self {
                fields,
                persisted: false,
            }),
            _ => Err(DocumentError::NotAnObject),
        }
    }

    /// Set a field, builder style.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    pub fn is_persisted(&self) -> bool {
        self.persisted
    }
}

impl Document for JsonDocument {
    fn field(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            Value::Null | Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn field_is_set(&self, name: &str) -> bool {
        match self.fields.get(name) {
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::Bool(b)) => *b,
            Some(Value::Null | Value::Array(_) | Value::Object(_)) | None => false,
        }
    }

    fn set_field(&mut self, name: &str, value: String) -> Result<(), DocumentError> {
        self.fields.insert(name.to_string(), Value::String(value));
        Ok(())
    }

    fn is_new(&self) -> bool {
        !self.persisted
    }

    fn mark_persisted(&mut self) {
        self.persisted = true;
    }
}
