//! Reflection backed by a JSON manifest
//!
//! Runtimes that reflect their classes ahead of time ship the metadata as a
//! JSON array of [`ReflectedClass`] records. This provider answers
//! `reflect` from that array and instantiates opaque [`ManifestInstance`]
//! records carrying what the runtime needs to build the real object.
//!
//! Classes whose parent chain checked out are cached; `new_reflection`
//! repeats the check.

use crate::error::{ContainerError, Result};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use trellis_scanner::{ComponentInstance, ReflectionError, ReflectionProvider};
use trellis_types::{ClassIdentity, ReflectedClass};
use uuid::Uuid;

/// An instance created from manifest metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestInstance {
    pub instance_id: Uuid,
    pub class: ClassIdentity,
    pub session_id: Option<String>,
    pub args: Vec<Value>,
}

/// Reflection provider over a fixed set of pre-reflected classes
#[derive(Debug, Default)]
pub struct ManifestReflectionProvider {
    classes: HashMap<ClassIdentity, ReflectedClass>,
    resolved: DashMap<ClassIdentity, ReflectedClass>,
}

impl ManifestReflectionProvider {
    pub fn from_classes(classes: impl IntoIterator<Item = ReflectedClass>) -> Self {
        Self {
            classes: classes
                .into_iter()
                .map(|class| (class.name.clone(), class))
                .collect(),
            resolved: DashMap::new(),
        }
    }

    /// Load a manifest file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let manifest_error = |reason: String| ContainerError::Manifest {
            path: path.to_path_buf(),
            reason,
        };

        let text = std::fs::read_to_string(path).map_err(|e| manifest_error(e.to_string()))?;
        let classes: Vec<ReflectedClass> =
            serde_json::from_str(&text).map_err(|e| manifest_error(e.to_string()))?;

        debug!(path = %path.display(), classes = classes.len(), "Loaded reflection manifest");
        Ok(Self::from_classes(classes))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Number of classes reflected through the cache so far
    pub fn cached(&self) -> usize {
        self.resolved.len()
    }

    fn class(&self, class_name: &ClassIdentity) -> std::result::Result<&ReflectedClass, ReflectionError> {
        self.classes
            .get(class_name)
            .ok_or_else(|| ReflectionError::ClassNotFound(class_name.clone()))
    }
}

impl ReflectionProvider for ManifestReflectionProvider {
    fn reflect(&self, class_name: &ClassIdentity) -> std::result::Result<ReflectedClass, ReflectionError> {
        if let Some(class) = self.resolved.get(class_name) {
            return Ok(class.value().clone());
        }

        let class = self.new_reflection(class_name)?;
        self.resolved.insert(class_name.clone(), class.clone());
        Ok(class)
    }

    fn new_reflection(
        &self,
        class_name: &ClassIdentity,
    ) -> std::result::Result<ReflectedClass, ReflectionError> {
        let class = self.class(class_name)?;

        if let Some(parent) = &class.parent {
            if !self.classes.contains_key(parent) {
                return Err(ReflectionError::Unresolvable {
                    class: class_name.clone(),
                    reason: format!("parent class {parent} is unknown"),
                });
            }
        }

        Ok(class.clone())
    }

    fn reflect_instance(
        &self,
        instance: &ComponentInstance,
    ) -> std::result::Result<ReflectedClass, ReflectionError> {
        let instance = instance
            .downcast_ref::<ManifestInstance>()
            .ok_or(ReflectionError::ForeignInstance)?;
        self.reflect(&instance.class)
    }

    fn instantiate(
        &self,
        class_name: &ClassIdentity,
        session_id: Option<&str>,
        args: &[Value],
    ) -> std::result::Result<ComponentInstance, ReflectionError> {
        let class = self.class(class_name)?;

        let required = class.required_arguments();
        let accepted = class.constructor.len();
        if args.len() < required || args.len() > accepted {
            return Err(ReflectionError::Instantiation {
                class: class_name.clone(),
                reason: format!(
                    "expected {required}..={accepted} constructor arguments, got {}",
                    args.len()
                ),
            });
        }

        Ok(Arc::new(ManifestInstance {
            instance_id: Uuid::new_v4(),
            class: class_name.clone(),
            session_id: session_id.map(str::to_string),
            args: args.to_vec(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use trellis_types::ConstructorParameter;

    fn id(name: &str) -> ClassIdentity {
        ClassIdentity::new(name).unwrap()
    }

    fn provider() -> ManifestReflectionProvider {
        let mut bean = ReflectedClass::new(id("Service\\PaymentBean"));
        bean.constructor = vec![
            ConstructorParameter {
                name: "gateway".to_string(),
                type_hint: None,
                optional: false,
            },
            ConstructorParameter {
                name: "timeout".to_string(),
                type_hint: Some("int".to_string()),
                optional: true,
            },
        ];

        let mut orphan = ReflectedClass::new(id("Service\\Orphan"));
        orphan.parent = Some(id("Service\\Missing"));

        ManifestReflectionProvider::from_classes([bean, orphan])
    }

    #[test]
    fn test_reflect_known_and_unknown() {
        let provider = provider();
        assert_eq!(
            provider.reflect(&id("Service\\PaymentBean")).unwrap().name,
            id("Service\\PaymentBean")
        );
        assert!(matches!(
            provider.reflect(&id("Service\\Nope")),
            Err(ReflectionError::ClassNotFound(_))
        ));
        assert!(matches!(
            provider.reflect(&id("Service\\Orphan")),
            Err(ReflectionError::Unresolvable { .. })
        ));
    }

    #[test]
    fn test_instantiate_passes_session_through() {
        let instance = provider()
            .instantiate(&id("Service\\PaymentBean"), Some("sess-1"), &[json!("stripe")])
            .unwrap();
        let instance = instance.downcast_ref::<ManifestInstance>().unwrap();

        assert_eq!(instance.class, id("Service\\PaymentBean"));
        assert_eq!(instance.session_id.as_deref(), Some("sess-1"));
        assert_eq!(instance.args, vec![json!("stripe")]);
    }

    #[test]
    fn test_reflect_is_cached() {
        let provider = provider();
        let bean = id("Service\\PaymentBean");

        assert_eq!(provider.cached(), 0);
        let first = provider.reflect(&bean).unwrap();
        assert_eq!(provider.cached(), 1);
        assert_eq!(provider.reflect(&bean).unwrap(), first);
        assert_eq!(provider.new_reflection(&bean).unwrap(), first);
        assert_eq!(provider.cached(), 1);

        assert!(provider.reflect(&id("Service\\Orphan")).is_err());
        assert_eq!(provider.cached(), 1);
    }

    #[test]
    fn test_reflect_instance() {
        let provider = provider();
        let instance = provider
            .instantiate(&id("Service\\PaymentBean"), None, &[json!("stripe")])
            .unwrap();

        let class = provider.reflect_instance(&instance).unwrap();
        assert_eq!(class.name, id("Service\\PaymentBean"));

        let foreign: ComponentInstance = Arc::new("not a manifest instance");
        assert!(matches!(
            provider.reflect_instance(&foreign),
            Err(ReflectionError::ForeignInstance)
        ));
    }

    #[test]
    fn test_instantiate_checks_arity() {
        let provider = provider();
        let bean = id("Service\\PaymentBean");
        assert!(matches!(
            provider.instantiate(&bean, None, &[]),
            Err(ReflectionError::Instantiation { .. })
        ));
        assert!(matches!(
            provider.instantiate(&bean, None, &[json!(1), json!(2), json!(3)]),
            Err(ReflectionError::Instantiation { .. })
        ));
        assert!(provider.instantiate(&bean, None, &[json!(1), json!(2)]).is_ok());
    }

    #[test]
    fn test_load_manifest_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reflection.json");
        std::fs::write(
            &path,
            r#"[{ "name": "App\\Bean", "annotations": [{ "name": "Stateless" }] }]"#,
        )
        .unwrap();

        let provider = ManifestReflectionProvider::load(&path).unwrap();
        assert_eq!(provider.len(), 1);
        assert!(provider.reflect(&id("App\\Bean")).unwrap().has_annotation("Stateless"));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            ManifestReflectionProvider::load(&path),
            Err(ContainerError::Manifest { .. })
        ));
    }
}
