//! Registry error types

use trellis_types::ClassIdentity;
use thiserror::Error;

/// Registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Cannot merge descriptors of different classes: {existing} and {incoming}")]
    IdentityMismatch {
        existing: ClassIdentity,
        incoming: ClassIdentity,
    },
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
