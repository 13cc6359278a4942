//! End-to-end deployment of a webapp directory

use serde_json::json;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use trellis_container::{
    ContainerConfig, ContainerError, InMemoryAttributeStore, ManifestReflectionProvider,
    ObjectManager,
};
use trellis_registry::InMemoryDescriptorRegistry;
use trellis_scanner::{ItemError, ReflectionError, ScanError};
use trellis_types::{Annotation, ClassIdentity, Provenance, ReflectedClass};

fn id(name: &str) -> ClassIdentity {
    ClassIdentity::new(name).unwrap()
}

fn write(path: &Path, contents: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn manager(webapp: &Path) -> ObjectManager {
    let payment = ReflectedClass::new(id("Service\\PaymentBean")).with_annotation(
        Annotation::new("Stateless")
            .with_argument("name", "PaymentBean")
            .with_argument("scope", "request"),
    );
    let mailer = ReflectedClass::new(id("Service\\Mailer"))
        .with_annotation(Annotation::new("Singleton").with_argument("name", "Mailer"));

    ObjectManager::new(
        "shop",
        webapp,
        Arc::new(InMemoryDescriptorRegistry::new()),
        Arc::new(InMemoryAttributeStore::new()),
        Arc::new(ManifestReflectionProvider::from_classes([payment, mailer])),
    )
}

fn config() -> ContainerConfig {
    let mut config = ContainerConfig::default();
    config.scanner.class_extensions = vec!["php".to_string()];
    config
}

#[test]
fn test_descriptor_overrides_reflected_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let webapp = dir.path();

    write(
        &webapp.join("META-INF/components.xml"),
        r#"<?xml version="1.0"?>
<components>
  <component>
    <class-name>Service\PaymentBean</class-name>
    <scope>singleton</scope>
  </component>
  <component>
    <description>no identity</description>
  </component>
</components>"#,
    );
    write(&webapp.join("META-INF/classes/Service/PaymentBean.php"), "<?php");
    write(&webapp.join("META-INF/classes/Service/Mailer.php"), "<?php");
    write(&webapp.join("META-INF/classes/Service/Unknown.php"), "<?php");
    write(&webapp.join("META-INF/classes/Service/README.md"), "ignored");

    let manager = manager(webapp);
    let summary = manager.deploy(&config()).unwrap();

    assert_eq!(summary.components, 2);
    assert_eq!(summary.descriptor.registered, 1);
    assert_eq!(summary.descriptor.skipped.len(), 1);
    assert_eq!(summary.classes.registered, 2);
    assert_eq!(summary.classes.skipped.len(), 1);
    assert!(matches!(
        summary.classes.skipped[0].error,
        ItemError::Reflection(ReflectionError::ClassNotFound(_))
    ));

    let payment = manager.descriptor(&id("Service\\PaymentBean")).unwrap();
    let scope = payment.field("scope").unwrap();
    assert_eq!(scope.value, json!("singleton"));
    assert_eq!(scope.provenance, Provenance::Explicit);
    assert_eq!(payment.value("name"), Some(&json!("PaymentBean")));

    assert!(manager.reflection_class(&id("Service\\Mailer")).is_ok());
    assert!(matches!(
        manager.reflection_class(&id("Service\\Unknown")),
        Err(ContainerError::UnknownComponent(_))
    ));
}

#[test]
fn test_repeated_deploys_are_stable() {
    let dir = tempfile::tempdir().unwrap();
    let webapp = dir.path();
    write(
        &webapp.join("META-INF/components.xml"),
        "<components><component class-name=\"Service\\PaymentBean\" scope=\"singleton\"/></components>",
    );
    write(&webapp.join("META-INF/classes/Service/PaymentBean.php"), "<?php");

    let manager = manager(webapp);
    manager.deploy(&config()).unwrap();
    let first = manager.registry().snapshot();

    manager.deploy(&config()).unwrap();
    assert_eq!(manager.registry().snapshot(), first);
}

#[test]
fn test_corrupt_descriptor_fails_deployment() {
    let dir = tempfile::tempdir().unwrap();
    let webapp = dir.path();
    write(&webapp.join("META-INF/components.xml"), "<components><component>");

    let result = manager(webapp).deploy(&config());
    assert!(matches!(
        result,
        Err(ContainerError::Aborted {
            source: ScanError::ConfigCorrupt { .. },
            ..
        })
    ));
}

#[test]
fn test_aborted_deployment_reports_classes_pass() {
    let dir = tempfile::tempdir().unwrap();
    let webapp = dir.path();
    write(&webapp.join("META-INF/components.xml"), "<components><component>");
    write(&webapp.join("META-INF/classes/Service/PaymentBean.php"), "<?php");

    let manager = manager(webapp);
    let Err(ContainerError::Aborted { classes, .. }) = manager.deploy(&config()) else {
        panic!("corrupt descriptor must abort the deployment");
    };

    assert!(classes.present);
    assert_eq!(classes.registered, 1);
    assert!(manager.descriptor(&id("Service\\PaymentBean")).is_some());
}

#[test]
fn test_summary_serializes() {
    let dir = tempfile::tempdir().unwrap();
    let summary = manager(dir.path()).deploy(&config()).unwrap();
    let value = serde_json::to_value(&summary).unwrap();

    assert_eq!(value["application"], json!("shop"));
    assert_eq!(value["descriptor"]["present"], json!(false));
    assert_eq!(value["classes"]["source"]["kind"], json!("directory"));
}
