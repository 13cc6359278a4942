//! Trellis Registry - Descriptor merging and storage
//!
//! This crate provides the registry infrastructure for Trellis:
//!
//! - **merge**: Provenance-aware, order-independent merge of two descriptors
//! - **DescriptorRegistry**: Identity to descriptor mapping with merge-on-conflict writes
//! - **InMemoryDescriptorRegistry**: Sharded, thread-safe implementation
//!
//! ## Write Path
//!
//! `register` is the only way to write. Registering an identity that is
//! already present merges the two descriptors instead of overwriting, and the
//! read-modify-write is atomic per identity. Entries are never removed; a
//! registry lives exactly as long as the application context that owns it.

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod error;
pub mod memory;
pub mod merge;
pub mod registry;

// Re-exports
pub use error::{RegistryError, Result};
pub use memory::InMemoryDescriptorRegistry;
pub use merge::{merge, FieldConflict, MergeOutcome};
pub use registry::{DescriptorRegistry, RegisterOutcome};
