//! Provisioner configuration entries

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, typed provisioner declared in the container configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionerEntry {
    /// Generated when the entry is created
    #[serde(default = "Uuid::new_v4")]
    pub uuid: Uuid,

    /// Provisioner name, also its primary key
    #[serde(default)]
    pub name: String,

    /// Provisioner implementation type
    #[serde(default, rename = "type")]
    pub provisioner_type: String,
}

impl ProvisionerEntry {
    pub fn new(name: impl Into<String>, provisioner_type: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            name: name.into(),
            provisioner_type: provisioner_type.into(),
        }
    }

    pub fn primary_key(&self) -> &str {
        &self.name
    }
}

impl Default for ProvisionerEntry {
    fn default() -> Self {
        Self::new("", "")
    }
}
