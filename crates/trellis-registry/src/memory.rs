//! In-memory descriptor registry
//!
//! Backed by a sharded map: a registration locks only the shard that holds
//! its identity, so registrations of different classes proceed in parallel
//! while the read-modify-write of one class is serialized.

use crate::error::Result;
use crate::merge::merge;
use crate::registry::{DescriptorRegistry, RegisterOutcome};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;
use trellis_types::{ClassIdentity, Descriptor};

/// In-memory descriptor registry
pub struct InMemoryDescriptorRegistry {
    descriptors: DashMap<ClassIdentity, Descriptor>,
}

impl InMemoryDescriptorRegistry {
    pub fn new() -> Self {
        Self {
            descriptors: DashMap::new(),
        }
    }
}

impl Default for InMemoryDescriptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorRegistry for InMemoryDescriptorRegistry {
    fn register(&self, descriptor: Descriptor) -> Result<RegisterOutcome> {
        // The entry guard holds the shard lock until the merged value is stored
        match self.descriptors.entry(descriptor.identity().clone()) {
            Entry::Vacant(slot) => {
                debug!(identity = %descriptor.identity(), fields = descriptor.len(), "Descriptor registered");
                slot.insert(descriptor);
                Ok(RegisterOutcome::Inserted)
            }
            Entry::Occupied(mut slot) => {
                let outcome = merge(slot.get(), &descriptor)?;
                debug!(
                    identity = %descriptor.identity(),
                    fields = outcome.descriptor.len(),
                    conflicts = outcome.conflicts.len(),
                    "Descriptor merged"
                );
                slot.insert(outcome.descriptor);
                Ok(RegisterOutcome::Merged {
                    conflicts: outcome.conflicts,
                })
            }
        }
    }

    fn get(&self, identity: &ClassIdentity) -> Option<Descriptor> {
        self.descriptors.get(identity).map(|d| d.clone())
    }

    fn has(&self, identity: &ClassIdentity) -> bool {
        self.descriptors.contains_key(identity)
    }

    fn len(&self) -> usize {
        self.descriptors.len()
    }

    fn identities(&self) -> Vec<ClassIdentity> {
        let mut ids: Vec<_> = self.descriptors.iter().map(|d| d.key().clone()).collect();
        ids.sort();
        ids
    }

    fn snapshot(&self) -> Vec<Descriptor> {
        let mut all: Vec<_> = self.descriptors.iter().map(|d| d.value().clone()).collect();
        all.sort_by(|a, b| a.identity().cmp(b.identity()));
        all
    }
}
