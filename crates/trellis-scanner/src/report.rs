//! Scan reports

use crate::error::ItemError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which source a pass scanned
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "snake_case")]
pub enum ScanSource {
    DeploymentDescriptor(PathBuf),
    Directory(PathBuf),
}

impl ScanSource {
    pub fn path(&self) -> &Path {
        match self {
            ScanSource::DeploymentDescriptor(path) | ScanSource::Directory(path) => path,
        }
    }
}

impl fmt::Display for ScanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScanSource::DeploymentDescriptor(path) => {
                write!(f, "deployment descriptor {}", path.display())
            }
            ScanSource::Directory(path) => write!(f, "directory {}", path.display()),
        }
    }
}

/// An item that was skipped, and why
#[derive(Debug, Serialize)]
pub struct SkippedItem {
    /// File path or `file:line:column` of the node
    pub location: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: ItemError,
}

/// Outcome of one completed pass
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub source: ScanSource,
    /// False when the source did not exist and the pass did nothing
    pub present: bool,
    /// Descriptors handed to the registry
    pub registered: usize,
    /// Equal-provenance conflicts resolved by last write wins
    pub conflicts: usize,
    pub skipped: Vec<SkippedItem>,
}

impl ScanReport {
    pub fn new(source: ScanSource) -> Self {
        Self {
            source,
            present: true,
            registered: 0,
            conflicts: 0,
            skipped: Vec::new(),
        }
    }

    /// Report for a source that does not exist
    pub fn absent(source: ScanSource) -> Self {
        Self {
            present: false,
            ..Self::new(source)
        }
    }

    pub fn skip(&mut self, location: impl Into<String>, error: impl Into<ItemError>) {
        self.skipped.push(SkippedItem {
            location: location.into(),
            error: error.into(),
        });
    }

    /// True when every discovered item was registered
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

fn serialize_display<S, T>(value: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: fmt::Display,
{
    serializer.collect_str(value)
}
