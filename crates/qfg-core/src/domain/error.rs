// ============================================================================
// domain/error.rs - ENGINE DOMAIN ERRORS
// ============================================================================

use thiserror::Error;

/// Errors produced while reading, checking or writing a project Config.
///
/// All domain errors are:
/// - Cloneable (they travel inside reports and wrappers)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Config schema {found} is newer than the supported schema {supported}")]
    SchemaMismatch { found: String, supported: String },

    #[error("Malformed config field '{field}': {reason}")]
    Malformed { field: String, reason: String },

    #[error("Config invariant violated: {0}")]
    InvariantViolation(String),
}

impl ConfigError {
    pub fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::SchemaMismatch { found, supported } => vec![
                format!("This project was written by a newer generator (schema {found})"),
                format!("Upgrade qfg to a release that supports schema {supported} or later"),
            ],
            Self::Malformed { field, .. } => vec![
                format!("Check the '{field}' entry in .framework-config.yml"),
                "Run 'qfg config show' to see how the file is read".into(),
            ],
            Self::InvariantViolation(_) => vec![
                "Fix the config so its driver, browser and feature choices agree".into(),
                "Run 'qfg validate' for a full report".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::SchemaMismatch { .. } => ErrorCategory::Compatibility,
            Self::Malformed { .. } | Self::InvariantViolation(_) => ErrorCategory::Validation,
        }
    }
}

/// Errors produced while composing a generation plan.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlanError {
    #[error("Template key '{key}' is not provided by registry version {version}")]
    UnknownTemplateKey { key: String, version: String },

    #[error("Duplicate path in plan: {path}")]
    DuplicatePath { path: String },

    #[error("Absolute paths not allowed: {path}")]
    AbsolutePath { path: String },
}

impl PlanError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnknownTemplateKey { key, .. } => vec![
                format!("The template registry has no body for '{key}'"),
                "If you use a custom templates directory, check its registry.toml".into(),
            ],
            Self::DuplicatePath { .. } | Self::AbsolutePath { .. } => vec![
                "This is a bug in the generator, please report it".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnknownTemplateKey { .. } => ErrorCategory::NotFound,
            Self::DuplicatePath { .. } | Self::AbsolutePath { .. } => ErrorCategory::Internal,
        }
    }
}

/// Errors produced while adding a page or test to an existing project.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MutatorError {
    #[error("{kind} '{name}' already exists at {path}")]
    AlreadyExists {
        kind: String,
        name: String,
        path: String,
    },

    #[error("Feature '{feature}' is disabled for this project")]
    FeatureDisabled { feature: String },

    #[error("Driver '{requested}' is not configured (project uses '{configured}')")]
    DriverNotConfigured {
        requested: String,
        configured: String,
    },

    #[error("Project uses both drivers; choose selenium, playwright or both")]
    AmbiguousDriver,

    #[error("Invalid artifact name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

impl MutatorError {
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::AlreadyExists { name, .. } => vec![
                format!("Pick a different name than '{name}'"),
                "Existing artifacts are never overwritten".into(),
            ],
            Self::FeatureDisabled { feature } => vec![
                format!("'{feature}' was not enabled when this project was created"),
                "Create a new project with the feature enabled".into(),
            ],
            Self::DriverNotConfigured { configured, .. } => vec![
                format!("Use --driver {configured}"),
                "The driver selection is fixed at project creation".into(),
            ],
            Self::AmbiguousDriver => vec![
                "Pass --driver selenium, --driver playwright or --driver both".into(),
            ],
            Self::InvalidName { .. } => vec![
                "Use letters, digits, spaces, '-' or '_' (e.g. 'login' or 'Checkout Flow')".into(),
            ],
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AlreadyExists { .. } => ErrorCategory::Conflict,
            Self::FeatureDisabled { .. } | Self::DriverNotConfigured { .. } => {
                ErrorCategory::Compatibility
            }
            Self::AmbiguousDriver | Self::InvalidName { .. } => ErrorCategory::Validation,
        }
    }

    /// Whether the caller can resolve the error by supplying more input.
    pub fn needs_clarification(&self) -> bool {
        matches!(self, Self::AmbiguousDriver)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Conflict,
    NotFound,
    Internal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_mismatch_mentions_both_versions() {
        let err = ConfigError::SchemaMismatch {
            found: "2.0.0".into(),
            supported: "1.1.0".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2.0.0"));
        assert!(msg.contains("1.1.0"));
        assert_eq!(err.category(), ErrorCategory::Compatibility);
    }

    #[test]
    fn only_ambiguous_driver_needs_clarification() {
        assert!(MutatorError::AmbiguousDriver.needs_clarification());
        assert!(
            !MutatorError::FeatureDisabled {
                feature: "api_testing".into()
            }
            .needs_clarification()
        );
    }

    #[test]
    fn every_error_has_suggestions() {
        let errors = [
            ConfigError::malformed("project.name", "missing").suggestions(),
            PlanError::UnknownTemplateKey {
                key: "base/x".into(),
                version: "1".into(),
            }
            .suggestions(),
            MutatorError::AmbiguousDriver.suggestions(),
        ];
        assert!(errors.iter().all(|s| !s.is_empty()));
    }
}
