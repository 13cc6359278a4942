//! Object Manager - Per-application component context
//!
//! One manager exists per deployed application. It owns the descriptor
//! registry the application's scanners write into, and it is the only way
//! the rest of the runtime reaches the reflection provider, so every class
//! handed to the provider has been discovered first.

use crate::attributes::AttributeStore;
use crate::config::ContainerConfig;
use crate::error::{ContainerError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tracing::{info, instrument, warn};
use trellis_registry::DescriptorRegistry;
use trellis_scanner::{
    ComponentInstance, DefaultDescriptorFactory, DescriptorFactory, DeploymentScanner,
    ReflectionProvider, ScanReport,
};
use trellis_types::{ClassIdentity, Descriptor, ReflectedClass};

/// Identifier the manager is registered under in the application context
pub const IDENTIFIER: &str = "ObjectManager";

/// Outcome of deploying one application
#[derive(Debug, Serialize)]
pub struct DeploymentSummary {
    pub application: String,
    pub deployed_at: DateTime<Utc>,
    /// Deployment descriptor pass
    pub descriptor: ScanReport,
    /// Classes directory pass
    pub classes: ScanReport,
    /// Registry size once both passes finished
    pub components: usize,
}

impl DeploymentSummary {
    /// Total items skipped by both passes
    pub fn skipped(&self) -> usize {
        self.descriptor.skipped.len() + self.classes.skipped.len()
    }
}

/// Per-application object manager
pub struct ObjectManager {
    application: String,
    webapp_path: PathBuf,
    registry: Arc<dyn DescriptorRegistry>,
    attributes: Arc<dyn AttributeStore>,
    reflection: Arc<dyn ReflectionProvider>,
    factory: Option<Arc<dyn DescriptorFactory>>,
}

impl ObjectManager {
    pub fn new(
        application: impl Into<String>,
        webapp_path: impl Into<PathBuf>,
        registry: Arc<dyn DescriptorRegistry>,
        attributes: Arc<dyn AttributeStore>,
        reflection: Arc<dyn ReflectionProvider>,
    ) -> Self {
        Self {
            application: application.into(),
            webapp_path: webapp_path.into(),
            registry,
            attributes,
            reflection,
            factory: None,
        }
    }

    /// Replace the descriptor factory built from configuration
    pub fn with_factory(mut self, factory: Arc<dyn DescriptorFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    pub fn identifier(&self) -> &'static str {
        IDENTIFIER
    }

    pub fn application_name(&self) -> &str {
        &self.application
    }

    pub fn webapp_path(&self) -> &Path {
        &self.webapp_path
    }

    pub fn registry(&self) -> &Arc<dyn DescriptorRegistry> {
        &self.registry
    }

    /// Registered descriptor for a class
    pub fn descriptor(&self, class_name: &ClassIdentity) -> Option<Descriptor> {
        self.registry.get(class_name)
    }

    /// Scanner writing into this application's registry
    pub fn scanner(&self, config: &ContainerConfig) -> DeploymentScanner {
        let factory = self.factory.clone().unwrap_or_else(|| {
            Arc::new(DefaultDescriptorFactory::new().with_identity_key(config.identity_key.clone()))
        });
        DeploymentScanner::new(
            self.registry.clone(),
            self.reflection.clone(),
            factory,
            config.scanner.clone(),
        )
    }

    /// Run both discovery passes
    ///
    /// The passes run on separate threads against the shared registry. A
    /// corrupt deployment descriptor fails the deployment once both passes
    /// have finished; the error carries the classes pass report.
    #[instrument(skip(self, config), fields(application = %self.application))]
    pub fn deploy(&self, config: &ContainerConfig) -> Result<DeploymentSummary> {
        let scanner = self.scanner(config);
        let descriptor_path = self.webapp_path.join(&config.deployment_descriptor);
        let classes_path = self.webapp_path.join(&config.classes_directory);

        let (descriptor, classes) = thread::scope(|s| {
            let descriptor = s.spawn(|| {
                scanner.scan_deployment_descriptor(&descriptor_path, &config.descriptor_query)
            });
            let classes = s.spawn(|| scanner.scan_directory(&classes_path));

            let descriptor = descriptor
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            let classes = classes
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (descriptor, classes)
        });

        let descriptor = match descriptor {
            Ok(report) => report,
            Err(source) => {
                warn!(
                    error = %source,
                    registered = classes.registered,
                    skipped = classes.skipped.len(),
                    "Deployment aborted, classes pass registrations kept"
                );
                return Err(ContainerError::Aborted {
                    source,
                    classes: Box::new(classes),
                });
            }
        };

        let summary = DeploymentSummary {
            application: self.application.clone(),
            deployed_at: Utc::now(),
            components: self.registry.len(),
            descriptor,
            classes,
        };

        info!(
            components = summary.components,
            skipped = summary.skipped(),
            "Application deployed"
        );
        Ok(summary)
    }

    pub fn set_attribute(&self, key: &str, value: impl Into<Value>) {
        self.attributes.set(key, value.into());
    }

    /// Attribute value, `None` when the key was never set
    pub fn get_attribute(&self, key: &str) -> Option<Value> {
        self.attributes.get(key)
    }

    /// Reflection metadata of a registered class
    pub fn reflection_class(&self, class_name: &ClassIdentity) -> Result<ReflectedClass> {
        self.ensure_registered(class_name)?;
        Ok(self.reflection.reflect(class_name)?)
    }

    /// Create an instance of a registered class
    ///
    /// `session_id` is handed to the reflection provider as given; no session
    /// is inferred when it is `None`.
    pub fn new_instance(
        &self,
        class_name: &ClassIdentity,
        session_id: Option<&str>,
        args: &[Value],
    ) -> Result<ComponentInstance> {
        self.ensure_registered(class_name)?;
        Ok(self.reflection.instantiate(class_name, session_id, args)?)
    }

    /// Fresh reflection metadata of a registered class, bypassing any
    /// provider cache
    pub fn new_reflection_class(&self, class_name: &ClassIdentity) -> Result<ReflectedClass> {
        self.ensure_registered(class_name)?;
        Ok(self.reflection.new_reflection(class_name)?)
    }

    /// Reflection metadata of the class an instance was created from
    pub fn reflection_class_for_instance(
        &self,
        instance: &ComponentInstance,
    ) -> Result<ReflectedClass> {
        let class = self.reflection.reflect_instance(instance)?;
        self.ensure_registered(&class.name)?;
        Ok(class)
    }

    fn ensure_registered(&self, class_name: &ClassIdentity) -> Result<()> {
        if self.registry.has(class_name) {
            Ok(())
        } else {
            Err(ContainerError::UnknownComponent(class_name.clone()))
        }
    }
}
