//! Trellis Container - Object manager for one deployed application
//!
//! The [`ObjectManager`] is the per-application entry point of the
//! container. It owns the application's descriptor registry and attribute
//! store, runs both discovery passes at deployment time, and hands validated
//! class identities to the reflection provider afterwards.
//!
//! ## Usage
//!
//! ```no_run
//! use trellis_container::{ContainerConfig, InMemoryAttributeStore, ManifestReflectionProvider, ObjectManager};
//! use trellis_registry::InMemoryDescriptorRegistry;
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ObjectManager::new(
//!     "shop",
//!     "/srv/webapps/shop",
//!     Arc::new(InMemoryDescriptorRegistry::new()),
//!     Arc::new(InMemoryAttributeStore::new()),
//!     Arc::new(ManifestReflectionProvider::load("/srv/webapps/shop/reflection.json")?),
//! );
//!
//! let summary = manager.deploy(&ContainerConfig::default())?;
//! println!("{} components registered", summary.components);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod attributes;
pub mod config;
pub mod error;
pub mod manager;
pub mod manifest;

pub use attributes::{AttributeStore, InMemoryAttributeStore};
pub use config::{ContainerConfig, LoggingConfig};
pub use error::{ContainerError, Result};
pub use manager::{DeploymentSummary, ObjectManager, IDENTIFIER};
pub use manifest::{ManifestInstance, ManifestReflectionProvider};
