//! Configuration for an application container

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trellis_scanner::{ScannerConfig, DEFAULT_IDENTITY_KEY};
use trellis_types::ProvisionerEntry;

/// Main container configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContainerConfig {
    /// Deployment descriptor, relative to the webapp directory
    #[serde(default = "default_deployment_descriptor")]
    pub deployment_descriptor: PathBuf,

    /// Node query selecting component nodes in the deployment descriptor
    #[serde(default = "default_descriptor_query")]
    pub descriptor_query: String,

    /// Classes directory, relative to the webapp directory
    #[serde(default = "default_classes_directory")]
    pub classes_directory: PathBuf,

    /// Element or attribute naming the class of a descriptor node
    #[serde(default = "default_identity_key")]
    pub identity_key: String,

    /// Scanner configuration
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Provisioners declared for the application
    #[serde(default)]
    pub provisioners: Vec<ProvisionerEntry>,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            deployment_descriptor: default_deployment_descriptor(),
            descriptor_query: default_descriptor_query(),
            classes_directory: default_classes_directory(),
            identity_key: default_identity_key(),
            scanner: ScannerConfig::default(),
            logging: LoggingConfig::default(),
            provisioners: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_deployment_descriptor() -> PathBuf {
    PathBuf::from("META-INF/components.xml")
}

fn default_descriptor_query() -> String {
    "/components/component".to_string()
}

fn default_classes_directory() -> PathBuf {
    PathBuf::from("META-INF/classes")
}

fn default_identity_key() -> String {
    DEFAULT_IDENTITY_KEY.to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ContainerConfig {
    /// Load configuration: defaults, then the file if given, then
    /// `TRELLIS__*` environment variables (`TRELLIS__LOGGING__LEVEL=debug`)
    pub fn load(path: Option<&Path>) -> Result<Self, ::config::ConfigError> {
        let mut builder = ::config::Config::builder();

        // Add default configuration
        builder = builder.add_source(::config::Config::try_from(&ContainerConfig::default())?);

        // Add file configuration if provided
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }

        // Add environment variables with TRELLIS prefix
        builder = builder.add_source(
            ::config::Environment::with_prefix("TRELLIS")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }

    /// Look up a provisioner by its primary key
    pub fn provisioner(&self, name: &str) -> Option<&ProvisionerEntry> {
        self.provisioners.iter().find(|p| p.primary_key() == name)
    }
}
