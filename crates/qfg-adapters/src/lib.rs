//! Infrastructure adapters for qfg.
//!
//! This crate implements the ports defined in `qfg_core::application::ports`.
//! It contains all external dependencies and I/O operations.

pub mod filesystem;
pub mod registry;

// Re-export commonly used adapters
pub use filesystem::{LocalFilesystem, MemoryFilesystem};
pub use registry::{BuiltinRegistry, FilesystemRegistry};
