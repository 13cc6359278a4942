//! Deployment scanner
//!
//! Drives both discovery passes against one registry. A scanner holds no
//! per-scan state, so the two passes (or several scanners) can run on
//! different threads against the same registry.

use crate::error::{ItemError, Result, ScanError};
use crate::factory::DescriptorFactory;
use crate::identity::IdentityResolver;
use crate::query::NodeQuery;
use crate::reflection::ReflectionProvider;
use crate::report::{ScanReport, ScanSource};
use roxmltree::{Document, ParsingOptions};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use trellis_registry::DescriptorRegistry;
use trellis_types::Descriptor;
use walkdir::WalkDir;

/// Scanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Extensions of class files; an empty list accepts every file
    #[serde(default = "default_class_extensions")]
    pub class_extensions: Vec<String>,

    /// Follow symbolic links while walking the classes directory
    #[serde(default)]
    pub follow_links: bool,

    /// Ignore files and directories whose name starts with a dot
    #[serde(default = "default_true")]
    pub skip_hidden: bool,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            class_extensions: default_class_extensions(),
            follow_links: false,
            skip_hidden: true,
        }
    }
}

fn default_class_extensions() -> Vec<String> {
    vec!["php".to_string()]
}

fn default_true() -> bool {
    true
}

/// Discovers components and registers their descriptors
pub struct DeploymentScanner {
    registry: Arc<dyn DescriptorRegistry>,
    reflection: Arc<dyn ReflectionProvider>,
    factory: Arc<dyn DescriptorFactory>,
    config: ScannerConfig,
}

impl DeploymentScanner {
    pub fn new(
        registry: Arc<dyn DescriptorRegistry>,
        reflection: Arc<dyn ReflectionProvider>,
        factory: Arc<dyn DescriptorFactory>,
        config: ScannerConfig,
    ) -> Self {
        Self {
            registry,
            reflection,
            factory,
            config,
        }
    }

    pub fn registry(&self) -> &Arc<dyn DescriptorRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Register every node of a deployment descriptor selected by `query`
    ///
    /// A missing file is not an error. A file that cannot be read or parsed
    /// fails the pass before anything is registered. Nodes that cannot be
    /// converted are skipped.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub fn scan_deployment_descriptor(&self, path: &Path, query: &str) -> Result<ScanReport> {
        let source = ScanSource::DeploymentDescriptor(path.to_path_buf());
        let query = NodeQuery::parse(query).map_err(|e| ScanError::InvalidQuery {
            query: query.to_string(),
            reason: e.to_string(),
        })?;

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No deployment descriptor, skipping");
                return Ok(ScanReport::absent(source));
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                return Err(ScanError::ConfigCorrupt {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
            }
            Err(source) => {
                return Err(ScanError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let options = ParsingOptions {
            allow_dtd: true,
            ..ParsingOptions::default()
        };
        let document = Document::parse_with_options(&text, options).map_err(|e| ScanError::ConfigCorrupt {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let mut report = ScanReport::new(source);
        let nodes = query.select(&document);
        if nodes.is_empty() {
            debug!(query = %query, "Query matched no nodes");
        }

        for node in nodes {
            let pos = document.text_pos_at(node.range().start);
            let location = format!("{}:{}:{}", path.display(), pos.row, pos.col);

            match self.factory.from_declarative_node(node) {
                Ok(descriptor) => self.register(&mut report, descriptor, location),
                Err(e) => {
                    error!(location = %location, error = %e, "Skipping malformed descriptor node");
                    report.skip(location, e);
                }
            }
        }

        info!(
            registered = report.registered,
            skipped = report.skipped.len(),
            conflicts = report.conflicts,
            "Deployment descriptor scanned"
        );
        Ok(report)
    }

    /// Register every class file below a classes directory
    ///
    /// A missing directory is not an error. Files that cannot be resolved to
    /// a class identity or reflected are skipped.
    #[instrument(skip(self, root), fields(root = %root.display()))]
    pub fn scan_directory(&self, root: &Path) -> ScanReport {
        let source = ScanSource::Directory(root.to_path_buf());
        if !root.is_dir() {
            debug!("No classes directory, skipping");
            return ScanReport::absent(source);
        }

        let resolver = IdentityResolver::new(root);
        let mut report = ScanReport::new(source);
        let skip_hidden = self.config.skip_hidden;

        let walker = WalkDir::new(root)
            .follow_links(self.config.follow_links)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !(skip_hidden && is_hidden(entry.path())));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    let location = e
                        .path()
                        .unwrap_or(root)
                        .display()
                        .to_string();
                    error!(location = %location, error = %e, "Skipping unreadable entry");
                    report.skip(location, ItemError::Walk(e.to_string()));
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.is_candidate(entry.path()) {
                continue;
            }

            let location = entry.path().display().to_string();
            match self.describe_class(&resolver, entry.path()) {
                Ok(descriptor) => self.register(&mut report, descriptor, location),
                Err(e) => {
                    error!(location = %location, error = %e, "Skipping class file");
                    report.skip(location, e);
                }
            }
        }

        info!(
            registered = report.registered,
            skipped = report.skipped.len(),
            conflicts = report.conflicts,
            "Classes directory scanned"
        );
        report
    }

    fn describe_class(
        &self,
        resolver: &IdentityResolver,
        path: &Path,
    ) -> std::result::Result<Descriptor, ItemError> {
        let identity = resolver.resolve(path)?;
        let class = self.reflection.reflect(&identity)?;
        Ok(self.factory.from_reflected_class(&class)?)
    }

    fn register(&self, report: &mut ScanReport, descriptor: Descriptor, location: String) {
        let identity = descriptor.identity().clone();
        match self.registry.register(descriptor) {
            Ok(outcome) => {
                report.registered += 1;
                report.conflicts += outcome.conflicts().len();
            }
            Err(e) => {
                error!(identity = %identity, location = %location, error = %e, "Registration failed");
                report.skip(location, e);
            }
        }
    }

    fn is_candidate(&self, path: &Path) -> bool {
        if self.config.class_extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .class_extensions
                    .iter()
                    .any(|wanted| wanted.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}
