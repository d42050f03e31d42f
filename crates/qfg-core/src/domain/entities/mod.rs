pub mod artifact;
pub mod common;
pub mod config;
pub mod plan;
pub mod registry_file;
pub mod report;
pub mod view;
pub mod workspace;
pub mod write_set;

pub use artifact::Artifact;
pub use config::{CONFIG_FILE_NAME, Config, ConfigBuilder, FeatureFlags, Settings};
pub use plan::{CompositionPlan, PlanEntry};
pub use registry_file::{RegistryAppendError, RegistryFormat};
pub use report::{Severity, ValidationFinding, ValidationReport};
pub use view::{ConfigView, project_slug};
pub use workspace::{WORKSPACE_MARKER, WorkspaceContext};
pub use write_set::{WriteOp, WriteSet};
