//! qfg Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers of qfg, the
//! generator for pytest test-automation frameworks, following hexagonal
//! (ports and adapters) architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │             qfg-cli (CLI)               │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │  (Planner, Scaffold, Mutator, Validator)│
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │     (Filesystem, TemplateRegistry)      │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      qfg-adapters (Infrastructure)      │
//! │ (LocalFilesystem, BuiltinRegistry, ...) │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Config, clusters, fan-out, registries) │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use qfg_core::prelude::*;
//! # fn run(registry: Box<dyn TemplateRegistry>, filesystem: Box<dyn Filesystem>) -> QfgResult<()> {
//! let config = Config::builder("Shop", "https://shop.example", DriverSelection::Selenium)
//!     .browsers([Browser::Chrome])
//!     .build()?;
//!
//! let service = ScaffoldService::new(registry, filesystem);
//! service.init(&config, "./shop".as_ref(), false)?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        AddRequest, ApplicationError, CompositionPlanner, IncrementalMutator, InitReport,
        ProjectHandle, ProjectValidator, ScaffoldService, WorkspaceResolver,
        ports::{Filesystem, RegistryVersion, TemplateBody, TemplateRegistry},
    };
    pub use crate::domain::{
        Artifact, ArtifactKind, Browser, CONFIG_FILE_NAME, CompositionPlan, Config, ConfigView,
        Driver, DriverSelection, Feature, FeatureFlags, LoggingMode, Settings, Severity,
        TestDataFormat, TestType, ValidationReport, WorkspaceContext, WriteOp, WriteSet,
    };
    pub use crate::error::{ErrorCategory, QfgError, QfgResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
