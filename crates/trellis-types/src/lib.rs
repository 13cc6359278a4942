//! Trellis Types - Core types for the component descriptor registry
//!
//! Trellis is the metadata layer of a dependency-injection container. It
//! discovers deployable component classes, reads their configuration from
//! reflected annotations and from an XML deployment descriptor, and keeps one
//! merged description per class.
//!
//! ## Key Concepts
//!
//! - **ClassIdentity**: Fully-qualified component class name, the registry key
//! - **Provenance**: Whether a field came from reflected defaults or explicit configuration
//! - **Descriptor**: Immutable, provenance-tagged configuration of one component
//! - **ReflectedClass**: What the reflection provider knows about a class
//! - **ProvisionerEntry**: Named/typed provisioner configuration entry

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod descriptor;
pub mod identity;
pub mod provisioner;
pub mod reflection;

// Re-export main types
pub use descriptor::{Descriptor, Field, Provenance};
pub use identity::{ClassIdentity, IdentityError, NAMESPACE_SEPARATOR};
pub use provisioner::ProvisionerEntry;
pub use reflection::{
    Annotation, ClassMember, ClassMemberKind, ConstructorParameter, ReflectedClass,
};
