//! Scanner error types
//!
//! Per-item errors are kept apart from [`ScanError`]: they are recorded in a
//! scan report and never abort a pass.

use std::path::PathBuf;
use thiserror::Error;
use trellis_registry::RegistryError;
use trellis_types::{ClassIdentity, IdentityError};

/// A class file could not be mapped to a class identity
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityResolutionError {
    #[error("{} is not located under {}", .path.display(), .root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    #[error("{} is not valid UTF-8", .path.display())]
    NonUtf8 { path: PathBuf },

    #[error("{} does not name a class", .path.display())]
    Empty { path: PathBuf },

    #[error("invalid class identity derived from {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: IdentityError,
    },
}

/// A class could not be reflected or instantiated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReflectionError {
    #[error("Class not found: {0}")]
    ClassNotFound(ClassIdentity),

    #[error("Class {class} cannot be reflected: {reason}")]
    Unresolvable { class: ClassIdentity, reason: String },

    #[error("Class {class} declares argument {argument:?} in more than one annotation")]
    AmbiguousAnnotation {
        class: ClassIdentity,
        argument: String,
    },

    #[error("Cannot instantiate {class}: {reason}")]
    Instantiation { class: ClassIdentity, reason: String },

    #[error("Instance was not created by this reflection provider")]
    ForeignInstance,
}

/// A deployment descriptor node could not be converted to a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedDescriptorError {
    #[error("<{element}> has no {key:?} identity")]
    MissingIdentity { element: String, key: String },

    #[error("<{element}> has an invalid identity: {source}")]
    InvalidIdentity {
        element: String,
        #[source]
        source: IdentityError,
    },
}

/// Why a single item was skipped during a scan
#[derive(Debug, Error)]
pub enum ItemError {
    #[error(transparent)]
    Identity(#[from] IdentityResolutionError),

    #[error(transparent)]
    Reflection(#[from] ReflectionError),

    #[error(transparent)]
    Malformed(#[from] MalformedDescriptorError),

    #[error("Directory walk failed: {0}")]
    Walk(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors that abort a whole pass
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Deployment descriptor {} is corrupt: {reason}", .path.display())]
    ConfigCorrupt { path: PathBuf, reason: String },

    #[error("Cannot read deployment descriptor {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid node query {query:?}: {reason}")]
    InvalidQuery { query: String, reason: String },
}

/// Result type for scan passes
pub type Result<T> = std::result::Result<T, ScanError>;
