//! Reflection metadata
//!
//! The data a reflection provider hands back for a component class: its
//! declared annotations, constructor signature and members.

use crate::ClassIdentity;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A declarative annotation found on a class or member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation name as written (e.g. `Stateless`)
    pub name: String,

    /// Named arguments of the annotation
    #[serde(default)]
    pub arguments: BTreeMap<String, Value>,
}

impl Annotation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: BTreeMap::new(),
        }
    }

    pub fn with_argument(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.insert(key.into(), value.into());
        self
    }

    pub fn argument(&self, key: &str) -> Option<&Value> {
        self.arguments.get(key)
    }
}

/// A constructor parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstructorParameter {
    pub name: String,

    /// Declared type, if any
    #[serde(default)]
    pub type_hint: Option<String>,

    /// Whether the parameter has a default value
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassMemberKind {
    Property,
    Method,
}

/// A property or method declared on a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMember {
    pub name: String,
    pub kind: ClassMemberKind,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
}

/// Reflection metadata of one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReflectedClass {
    /// Fully-qualified class name
    pub name: ClassIdentity,

    /// Parent class, if the class extends one
    #[serde(default)]
    pub parent: Option<ClassIdentity>,

    /// Annotations declared on the class itself
    #[serde(default)]
    pub annotations: Vec<Annotation>,

    /// Constructor signature
    #[serde(default)]
    pub constructor: Vec<ConstructorParameter>,

    /// Declared members
    #[serde(default)]
    pub members: Vec<ClassMember>,
}

impl ReflectedClass {
    pub fn new(name: ClassIdentity) -> Self {
        Self {
            name,
            parent: None,
            annotations: Vec::new(),
            constructor: Vec::new(),
            members: Vec::new(),
        }
    }

    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotation(name).is_some()
    }

    /// Number of constructor parameters without a default value
    pub fn required_arguments(&self) -> usize {
        self.constructor.iter().filter(|p| !p.optional).count()
    }
}
