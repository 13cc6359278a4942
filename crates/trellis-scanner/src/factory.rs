//! Descriptor factories
//!
//! Turn one discovered unit (a reflected class or a deployment descriptor
//! node) into a descriptor. Reflection yields `Default` fields only, a
//! deployment descriptor node yields `Explicit` fields only.

use crate::error::{MalformedDescriptorError, ReflectionError};
use roxmltree::Node;
use serde_json::{Map, Value};
use trellis_types::{ClassIdentity, Descriptor, ReflectedClass};

/// Element or attribute carrying the class identity of a descriptor node
pub const DEFAULT_IDENTITY_KEY: &str = "class-name";

/// Field holding the names of the annotations found on a class
pub const ANNOTATIONS_FIELD: &str = "annotations";

/// Builds descriptors from discovered units
pub trait DescriptorFactory: Send + Sync {
    /// Build a descriptor from a reflected class, all fields `Default`
    fn from_reflected_class(&self, class: &ReflectedClass) -> Result<Descriptor, ReflectionError>;

    /// Build a descriptor from a deployment descriptor node, all fields `Explicit`
    fn from_declarative_node(
        &self,
        node: Node<'_, '_>,
    ) -> Result<Descriptor, MalformedDescriptorError>;
}

/// Factory mapping annotation arguments and node children to fields by name
///
/// An annotation argument `name` and a descriptor element `<name>` land on
/// the same field, which is what lets the registry merge them.
#[derive(Debug, Clone)]
pub struct DefaultDescriptorFactory {
    identity_key: String,
}

impl DefaultDescriptorFactory {
    pub fn new() -> Self {
        Self {
            identity_key: DEFAULT_IDENTITY_KEY.to_string(),
        }
    }

    /// Use a different element/attribute name for the class identity
    pub fn with_identity_key(mut self, key: impl Into<String>) -> Self {
        self.identity_key = key.into();
        self
    }

    pub fn identity_key(&self) -> &str {
        &self.identity_key
    }

    fn identity_of(&self, node: Node<'_, '_>) -> Option<String> {
        let from_child = node
            .children()
            .find(|c| c.is_element() && c.tag_name().name() == self.identity_key)
            .map(element_text);
        let raw = from_child.or_else(|| node.attribute(self.identity_key.as_str()).map(str::to_string))?;
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }
}

impl Default for DefaultDescriptorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorFactory for DefaultDescriptorFactory {
    fn from_reflected_class(&self, class: &ReflectedClass) -> Result<Descriptor, ReflectionError> {
        let mut descriptor = Descriptor::new(class.name.clone());

        if !class.annotations.is_empty() {
            let names: Vec<Value> = class
                .annotations
                .iter()
                .map(|a| Value::String(a.name.clone()))
                .collect();
            descriptor = descriptor.with_default(ANNOTATIONS_FIELD, names);
        }

        for annotation in &class.annotations {
            for (argument, value) in &annotation.arguments {
                if let Some(previous) = descriptor.value(argument) {
                    if previous != value {
                        return Err(ReflectionError::AmbiguousAnnotation {
                            class: class.name.clone(),
                            argument: argument.clone(),
                        });
                    }
                }
                descriptor = descriptor.with_default(argument.clone(), value.clone());
            }
        }

        Ok(descriptor)
    }

    fn from_declarative_node(
        &self,
        node: Node<'_, '_>,
    ) -> Result<Descriptor, MalformedDescriptorError> {
        let element = node.tag_name().name().to_string();

        let raw = self
            .identity_of(node)
            .ok_or_else(|| MalformedDescriptorError::MissingIdentity {
                element: element.clone(),
                key: self.identity_key.clone(),
            })?;
        let identity = ClassIdentity::new(raw)
            .map_err(|source| MalformedDescriptorError::InvalidIdentity { element, source })?;

        let mut descriptor = Descriptor::new(identity);

        for attribute in node.attributes() {
            if attribute.name() != self.identity_key {
                descriptor = descriptor.with_explicit(attribute.name(), attribute.value().trim());
            }
        }

        for (name, value) in child_values(node, Some(&self.identity_key)) {
            descriptor = descriptor.with_explicit(name, value);
        }

        Ok(descriptor)
    }
}

/// Collect element children into a map, repeated names become arrays
fn child_values(node: Node<'_, '_>, skip: Option<&str>) -> Map<String, Value> {
    let mut values = Map::new();

    for child in node.children().filter(|c| c.is_element()) {
        let name = child.tag_name().name();
        if skip == Some(name) {
            continue;
        }

        let value = element_value(child);
        match values.get_mut(name) {
            Some(Value::Array(items)) => items.push(value),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            None => {
                values.insert(name.to_string(), value);
            }
        }
    }

    values
}

fn element_value(node: Node<'_, '_>) -> Value {
    if node.children().any(|c| c.is_element()) {
        Value::Object(child_values(node, None))
    } else {
        Value::String(element_text(node))
    }
}

fn element_text(node: Node<'_, '_>) -> String {
    node.children()
        .filter(|c| c.is_text())
        .filter_map(|c| c.text())
        .collect::<String>()
        .trim()
        .to_string()
}
