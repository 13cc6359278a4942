//! Application attribute store
//!
//! Named values shared by runtime services of one application. The store has
//! no merge semantics: a `set` replaces whatever was there.

use dashmap::DashMap;
use serde_json::Value;

/// Key/value store scoped to one application
pub trait AttributeStore: Send + Sync {
    /// Store a value, replacing any previous one
    fn set(&self, key: &str, value: Value);

    fn has(&self, key: &str) -> bool;

    /// Value for `key`; a missing key is `None`, not an error
    fn get(&self, key: &str) -> Option<Value>;
}

/// In-memory attribute store
#[derive(Debug, Default)]
pub struct InMemoryAttributeStore {
    attributes: DashMap<String, Value>,
}

impl InMemoryAttributeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl AttributeStore for InMemoryAttributeStore {
    fn set(&self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }

    fn has(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.attributes.get(key).map(|entry| entry.value().clone())
    }
}
