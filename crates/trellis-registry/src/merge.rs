//! Descriptor merge engine
//!
//! Combines two descriptors of the same class field by field:
//!
//! 1. A field defined on one side only is taken as is.
//! 2. When both sides define it and exactly one is `Explicit`, the explicit
//!    value wins, whichever side it is on.
//! 3. When both sides have the same provenance the incoming (later) value
//!    wins. If the values differ this is reported as a [`FieldConflict`] and
//!    logged as a warning.
//!
//! Rule 2 makes the common case (reflected defaults plus deployment
//! descriptor overrides) independent of discovery order.

use crate::error::{RegistryError, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;
use trellis_types::{ClassIdentity, Descriptor, Field, Provenance};

/// Two sources with equal provenance disagreed on a field value
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConflict {
    pub identity: ClassIdentity,
    pub field: String,
    pub provenance: Provenance,
    /// Value that was discarded
    pub discarded: Value,
    /// Value that was kept
    pub kept: Value,
}

/// Result of merging two descriptors
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub descriptor: Descriptor,
    pub conflicts: Vec<FieldConflict>,
}

/// Merge `incoming` into `existing`, producing a new descriptor
///
/// Fails if the two descriptors describe different classes.
pub fn merge(existing: &Descriptor, incoming: &Descriptor) -> Result<MergeOutcome> {
    if existing.identity() != incoming.identity() {
        return Err(RegistryError::IdentityMismatch {
            existing: existing.identity().clone(),
            incoming: incoming.identity().clone(),
        });
    }

    let identity = existing.identity().clone();
    let mut fields: BTreeMap<String, Field> = existing.fields().clone();
    let mut conflicts = Vec::new();

    for (name, theirs) in incoming.fields() {
        let Some(ours) = fields.get(name) else {
            fields.insert(name.clone(), theirs.clone());
            continue;
        };

        match (ours.provenance, theirs.provenance) {
            (Provenance::Explicit, Provenance::Default) => {}
            (Provenance::Default, Provenance::Explicit) => {
                fields.insert(name.clone(), theirs.clone());
            }
            (mine, _) => {
                if ours.value != theirs.value {
                    warn!(
                        identity = %identity,
                        field = %name,
                        provenance = %mine,
                        discarded = %ours.value,
                        kept = %theirs.value,
                        "Conflicting values with equal provenance, last write wins"
                    );
                    conflicts.push(FieldConflict {
                        identity: identity.clone(),
                        field: name.clone(),
                        provenance: mine,
                        discarded: ours.value.clone(),
                        kept: theirs.value.clone(),
                    });
                }
                fields.insert(name.clone(), theirs.clone());
            }
        }
    }

    Ok(MergeOutcome {
        descriptor: Descriptor::from_fields(identity, fields),
        conflicts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn identity(name: &str) -> ClassIdentity {
        ClassIdentity::new(name).unwrap()
    }

    fn reflected() -> Descriptor {
        Descriptor::new(identity("Service\\PaymentBean"))
            .with_default("name", "PaymentBean")
            .with_default("scope", "stateless")
            .with_default("lazy", true)
    }

    fn configured() -> Descriptor {
        Descriptor::new(identity("Service\\PaymentBean"))
            .with_explicit("scope", "singleton")
            .with_explicit("timeout", "30")
    }

    #[test]
    fn test_explicit_wins_in_both_orders() {
        let ab = merge(&reflected(), &configured()).unwrap();
        let ba = merge(&configured(), &reflected()).unwrap();

        assert_eq!(ab.descriptor, ba.descriptor);
        assert_eq!(
            ab.descriptor.field("scope"),
            configured().field("scope")
        );
        assert!(ab.conflicts.is_empty());
        assert!(ba.conflicts.is_empty());
    }

    #[test]
    fn test_one_sided_fields_survive() {
        let merged = merge(&reflected(), &configured()).unwrap().descriptor;

        assert_eq!(merged.field("name"), reflected().field("name"));
        assert_eq!(merged.field("lazy"), reflected().field("lazy"));
        assert_eq!(merged.field("timeout"), configured().field("timeout"));
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_equal_provenance_last_write_wins_with_conflict() {
        let first = Descriptor::new(identity("A")).with_explicit("scope", "session");
        let second = Descriptor::new(identity("A")).with_explicit("scope", "request");

        let outcome = merge(&first, &second).unwrap();
        assert_eq!(outcome.descriptor.value("scope"), Some(&json!("request")));
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].field, "scope");
        assert_eq!(outcome.conflicts[0].provenance, Provenance::Explicit);
        assert_eq!(outcome.conflicts[0].discarded, json!("session"));
    }

    #[test]
    fn test_disagreeing_defaults_last_write_wins_with_conflict() {
        let first = Descriptor::new(identity("A")).with_default("pool-size", 4);
        let second = Descriptor::new(identity("A")).with_default("pool-size", 8);

        let outcome = merge(&first, &second).unwrap();
        let kept = outcome.descriptor.field("pool-size").unwrap();
        assert_eq!(kept.value, json!(8));
        assert_eq!(kept.provenance, Provenance::Default);
        assert_eq!(outcome.conflicts.len(), 1);
        assert_eq!(outcome.conflicts[0].provenance, Provenance::Default);
        assert_eq!(outcome.conflicts[0].discarded, json!(4));
        assert_eq!(outcome.conflicts[0].kept, json!(8));

        let reversed = merge(&second, &first).unwrap();
        assert_eq!(reversed.descriptor.value("pool-size"), Some(&json!(4)));
        assert_eq!(reversed.conflicts.len(), 1);
    }

    #[test]
    fn test_equal_defaults_agreeing_is_not_a_conflict() {
        let first = Descriptor::new(identity("A")).with_default("lazy", true);
        let second = Descriptor::new(identity("A")).with_default("lazy", true);

        let outcome = merge(&first, &second).unwrap();
        assert!(outcome.conflicts.is_empty());
        assert_eq!(outcome.descriptor, first);
    }

    #[test]
    fn test_rejects_identity_mismatch() {
        let a = Descriptor::new(identity("A"));
        let b = Descriptor::new(identity("B"));
        assert!(matches!(
            merge(&a, &b),
            Err(RegistryError::IdentityMismatch { .. })
        ));
    }
}
