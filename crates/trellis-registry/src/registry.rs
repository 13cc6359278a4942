//! Descriptor registry trait
//!
//! The DescriptorRegistry maps class identities to their merged descriptors.

use crate::error::Result;
use crate::merge::FieldConflict;
use trellis_types::{ClassIdentity, Descriptor};

/// What a call to [`DescriptorRegistry::register`] did
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    /// No entry existed, the descriptor was stored as is
    Inserted,
    /// An entry existed and was replaced by the merged descriptor
    Merged { conflicts: Vec<FieldConflict> },
}

impl RegisterOutcome {
    pub fn conflicts(&self) -> &[FieldConflict] {
        match self {
            RegisterOutcome::Inserted => &[],
            RegisterOutcome::Merged { conflicts } => conflicts,
        }
    }
}

/// Registry of component descriptors, one per class identity
///
/// Implementations must make `register` atomic per identity: two concurrent
/// registrations of the same class both end up in the stored descriptor.
/// Registrations of different classes need not serialize.
pub trait DescriptorRegistry: Send + Sync {
    /// Insert a descriptor, or merge it into the existing entry
    fn register(&self, descriptor: Descriptor) -> Result<RegisterOutcome>;

    /// Get the descriptor of a class
    fn get(&self, identity: &ClassIdentity) -> Option<Descriptor>;

    /// Check if a class is registered
    fn has(&self, identity: &ClassIdentity) -> bool;

    /// Number of registered classes
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registered identities, sorted
    fn identities(&self) -> Vec<ClassIdentity>;

    /// Copy of all descriptors, sorted by identity
    fn snapshot(&self) -> Vec<Descriptor>;
}
