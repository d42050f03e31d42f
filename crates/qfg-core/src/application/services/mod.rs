//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish the
//! engine's operations: compose a plan, generate a project, add a page or
//! test, validate a project and find the project a command applies to.

pub mod mutator;
pub mod planner;
pub mod scaffold_service;
pub mod validator;
pub mod workspace_resolver;

pub use mutator::{AddRequest, IncrementalMutator, resolve_driver};
pub use planner::CompositionPlanner;
pub use scaffold_service::{InitReport, RenderedFile, ScaffoldService};
pub use validator::ProjectValidator;
pub use workspace_resolver::{ProjectHandle, WorkspaceResolver};
