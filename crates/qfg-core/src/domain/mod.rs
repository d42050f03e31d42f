//! Core domain layer for qfg.
//!
//! Pure generation rules with no I/O: the Config model, the cluster table,
//! driver fan-out, registry-file parsing and the report types. All
//! filesystem and template access goes through the ports defined in the
//! application layer.
//!
//! - **No I/O**: no filesystem, network or clock access
//! - **Immutable values**: every entity is `Clone + PartialEq`
//! - **No logging**: tracing lives in the application services

pub mod clusters;
pub mod entities;
pub mod error;
pub mod fanout;
pub mod value_objects;

mod validation;

pub use clusters::{CLUSTER_REGISTRY, ClusterDef, ClusterEntry, ClusterId, Seed};
pub use entities::{
    Artifact, CONFIG_FILE_NAME, CompositionPlan, Config, ConfigBuilder, ConfigView, FeatureFlags,
    PlanEntry, RegistryAppendError, RegistryFormat, Settings, Severity, ValidationFinding,
    ValidationReport, WORKSPACE_MARKER, WorkspaceContext, WriteOp, WriteSet, project_slug,
    common::{Permissions, RelativePath},
};
pub use error::{ConfigError, ErrorCategory, MutatorError, PlanError};
pub use fanout::{DriverLayout, fan_out};
pub use validation::DomainValidator;
pub use value_objects::{
    ArtifactKind, Browser, Driver, DriverSelection, Feature, LoggingMode, SchemaVersion,
    TestDataFormat, TestType,
};
