//! Component descriptors
//!
//! A Descriptor is the configuration of one component class. Every field is
//! tagged with its provenance so that two descriptors for the same class can
//! be merged without depending on the order they were discovered in.

use crate::ClassIdentity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Where a field value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Derived from annotations reflected on the class
    Default,
    /// Supplied or overridden by the deployment descriptor
    Explicit,
}

impl Provenance {
    pub fn is_explicit(&self) -> bool {
        matches!(self, Provenance::Explicit)
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provenance::Default => write!(f, "default"),
            Provenance::Explicit => write!(f, "explicit"),
        }
    }
}

/// A configuration value together with its provenance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub value: Value,
    pub provenance: Provenance,
}

impl Field {
    pub fn new(value: impl Into<Value>, provenance: Provenance) -> Self {
        Self {
            value: value.into(),
            provenance,
        }
    }

    pub fn default_value(value: impl Into<Value>) -> Self {
        Self::new(value, Provenance::Default)
    }

    pub fn explicit(value: impl Into<Value>) -> Self {
        Self::new(value, Provenance::Explicit)
    }
}

/// Configuration of one component class
///
/// Descriptors are built once by a descriptor factory and are not mutated
/// afterwards. The `with_*` methods consume the descriptor and are meant for
/// construction only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Descriptor {
    identity: ClassIdentity,
    fields: BTreeMap<String, Field>,
}

impl Descriptor {
    /// Create a descriptor without fields
    pub fn new(identity: ClassIdentity) -> Self {
        Self {
            identity,
            fields: BTreeMap::new(),
        }
    }

    /// Create a descriptor from an already tagged field map
    pub fn from_fields(identity: ClassIdentity, fields: BTreeMap<String, Field>) -> Self {
        Self { identity, fields }
    }

    /// Add a field derived from reflected annotations
    pub fn with_default(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_field(name, Field::default_value(value))
    }

    /// Add a field supplied by the deployment descriptor
    pub fn with_explicit(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with_field(name, Field::explicit(value))
    }

    pub fn with_field(mut self, name: impl Into<String>, field: Field) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn identity(&self) -> &ClassIdentity {
        &self.identity
    }

    pub fn fields(&self) -> &BTreeMap<String, Field> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.fields.get(name).map(|f| &f.value)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether any field was supplied by a deployment descriptor
    pub fn has_explicit_fields(&self) -> bool {
        self.fields.values().any(|f| f.provenance.is_explicit())
    }

    pub fn into_parts(self) -> (ClassIdentity, BTreeMap<String, Field>) {
        (self.identity, self.fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity() -> ClassIdentity {
        ClassIdentity::new("Service\\PaymentBean").unwrap()
    }

    #[test]
    fn test_builder_tags_provenance() {
        let descriptor = Descriptor::new(identity())
            .with_default("scope", "singleton")
            .with_explicit("timeout", 30);

        assert_eq!(descriptor.len(), 2);
        assert_eq!(
            descriptor.field("scope").map(|f| f.provenance),
            Some(Provenance::Default)
        );
        assert_eq!(descriptor.value("timeout"), Some(&json!(30)));
        assert!(descriptor.has_explicit_fields());
    }

    #[test]
    fn test_field_names_sorted() {
        let descriptor = Descriptor::new(identity())
            .with_default("b", 1)
            .with_default("a", 2);
        let names: Vec<_> = descriptor.field_names().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_serializes_provenance_snake_case() {
        let descriptor = Descriptor::new(identity()).with_explicit("name", "Payment");
        let value = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(value["identity"], json!("Service\\PaymentBean"));
        assert_eq!(value["fields"]["name"]["provenance"], json!("explicit"));
    }
}
