use std::sync::Arc;

use super::PreInsertHook;

/// A string field declared on a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    pub name: String,
    pub unique: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            unique: false,
        }
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }
}

/// Declared fields and pre-insert hooks for one document type.
pub struct Schema<D: ?Sized> {
    name: String,
    fields: Vec<FieldDef>,
    hooks: Vec<Arc<dyn PreInsertHook<D>>>,
}

impl<D: ?Sized> Schema<D> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
            hooks: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a field. Redeclaring a field can only tighten it to unique.
    pub fn add_field(&mut self, field: FieldDef) -> &mut Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => existing.unique |= field.unique,
            None => self.fields.push(field),
        }
        self
    }

    /// Register a hook. Hooks run in registration order.
    pub fn plugin(&mut self, hook: Arc<dyn PreInsertHook<D>>) -> &mut Self {
        self.hooks.push(hook);
        self
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn unique_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.unique)
    }

    pub(crate) fn hooks(&self) -> &[Arc<dyn PreInsertHook<D>>] {
        &self.hooks
    }
}
