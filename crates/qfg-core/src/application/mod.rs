//! Application layer for qfg.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (planner, scaffold, mutator, validator, resolver)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! generation rules itself. Those live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

pub use services::{
    AddRequest, CompositionPlanner, IncrementalMutator, InitReport, ProjectHandle,
    ProjectValidator, RenderedFile, ScaffoldService, WorkspaceResolver,
};

// Re-export port traits (for adapter implementation)
pub use ports::{Filesystem, RegistryVersion, TemplateBody, TemplateRegistry};

pub use error::ApplicationError;
