//! Trellis Scanner - Component discovery during deployment
//!
//! Feeds descriptors into a [`DescriptorRegistry`](trellis_registry::DescriptorRegistry)
//! from two independent sources:
//!
//! - **Deployment descriptor pass**: XML nodes selected by a path expression,
//!   converted to descriptors whose fields are all `Explicit`
//! - **Directory pass**: class files under a classes directory, resolved to a
//!   class identity, reflected, and converted to descriptors whose fields are
//!   all `Default`
//!
//! ## Failure Model
//!
//! Per-item failures (identity resolution, reflection, malformed nodes) are
//! recorded in the [`ScanReport`] and logged; the pass carries on. Only a
//! deployment descriptor that exists but cannot be read or parsed aborts its
//! pass, before anything is registered. Missing sources are silent no-ops.
//!
//! Neither pass orders its items, and the two passes may run concurrently on
//! the same registry. The registry's merge rule makes the result independent
//! of that order.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod factory;
pub mod identity;
pub mod query;
pub mod reflection;
pub mod report;
pub mod scanner;

// Re-exports
pub use error::{
    IdentityResolutionError, ItemError, MalformedDescriptorError, ReflectionError, Result,
    ScanError,
};
pub use factory::{DefaultDescriptorFactory, DescriptorFactory, DEFAULT_IDENTITY_KEY};
pub use identity::IdentityResolver;
pub use query::{NodeQuery, QueryError};
pub use reflection::{ComponentInstance, ReflectionProvider};
pub use report::{ScanReport, ScanSource, SkippedItem};
pub use scanner::{DeploymentScanner, ScannerConfig};
