//! Container error types

use std::path::PathBuf;
use thiserror::Error;
use trellis_scanner::{ReflectionError, ScanError, ScanReport};
use trellis_types::ClassIdentity;

/// Container errors
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("Component not registered: {0}")]
    UnknownComponent(ClassIdentity),

    /// The deployment descriptor pass failed. `classes` is the report of the
    /// classes directory pass, whose registrations stay in the registry.
    #[error("Deployment aborted: {source}")]
    Aborted {
        #[source]
        source: ScanError,
        classes: Box<ScanReport>,
    },

    #[error(transparent)]
    Reflection(#[from] ReflectionError),

    #[error("Configuration error: {0}")]
    Config(#[from] ::config::ConfigError),

    #[error("Cannot load reflection manifest {}: {reason}", .path.display())]
    Manifest { path: PathBuf, reason: String },
}

/// Result type for container operations
pub type Result<T> = std::result::Result<T, ContainerError>;
