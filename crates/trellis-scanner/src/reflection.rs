//! Reflection provider interface
//!
//! Class introspection and instantiation are owned by the runtime. The
//! scanner only reflects classes it found on disk; instantiation goes through
//! the same provider once a caller has looked the class up in the registry.

use crate::error::ReflectionError;
use serde_json::Value;
use std::any::Any;
use std::sync::Arc;
use trellis_types::{ClassIdentity, ReflectedClass};

/// A component instance created by a reflection provider
pub type ComponentInstance = Arc<dyn Any + Send + Sync>;

/// Introspects and instantiates component classes
pub trait ReflectionProvider: Send + Sync {
    /// Reflect a class by name, possibly from a cache
    fn reflect(&self, class_name: &ClassIdentity) -> Result<ReflectedClass, ReflectionError>;

    /// Reflect a class by name, bypassing any cache
    fn new_reflection(&self, class_name: &ClassIdentity) -> Result<ReflectedClass, ReflectionError> {
        self.reflect(class_name)
    }

    /// Reflect the class of an instance this provider created
    fn reflect_instance(
        &self,
        instance: &ComponentInstance,
    ) -> Result<ReflectedClass, ReflectionError>;

    /// Create a new instance of a class
    ///
    /// `session_id` is handed through untouched for session-bound components.
    fn instantiate(
        &self,
        class_name: &ClassIdentity,
        session_id: Option<&str>,
        args: &[Value],
    ) -> Result<ComponentInstance, ReflectionError>;
}
