//! Unified error handling for qfg core.
//!
//! This module provides a unified error type that wraps the domain and
//! application errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::{ConfigError, MutatorError, PlanError};

/// Root error type for qfg core operations.
#[derive(Debug, Error, Clone)]
pub enum QfgError {
    /// The project Config could not be read or is inconsistent.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A generation plan could not be composed.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// A page or test could not be added.
    #[error("{0}")]
    Mutator(#[from] MutatorError),

    /// Orchestration failures (filesystem, rendering, workspace).
    #[error("{0}")]
    Application(#[from] ApplicationError),

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl QfgError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Config(e) => e.suggestions(),
            Self::Plan(e) => e.suggestions(),
            Self::Mutator(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Internal { .. } => vec![
                "This appears to be a bug in qfg".into(),
                "Please report it with the output of 'qfg -vvv'".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Config(e) => e.category().into(),
            Self::Plan(e) => e.category().into(),
            Self::Mutator(e) => e.category().into(),
            Self::Application(e) => e.category(),
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether more input from the caller would resolve the error.
    ///
    /// The CLI treats these as usage errors rather than engine failures.
    pub fn needs_clarification(&self) -> bool {
        match self {
            Self::Mutator(e) => e.needs_clarification(),
            Self::Application(e) => e.needs_clarification(),
            _ => false,
        }
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Compatibility,
    Conflict,
    NotFound,
    Configuration,
    Filesystem,
    Internal,
}

impl From<crate::domain::ErrorCategory> for ErrorCategory {
    fn from(value: crate::domain::ErrorCategory) -> Self {
        use crate::domain::ErrorCategory as D;
        match value {
            D::Validation => Self::Validation,
            D::Compatibility => Self::Compatibility,
            D::Conflict => Self::Conflict,
            D::NotFound => Self::NotFound,
            D::Internal => Self::Internal,
        }
    }
}

/// Convenient result type alias.
pub type QfgResult<T> = Result<T, QfgError>;

/// Extension trait for adding context to foreign errors.
pub trait Context<T> {
    fn context(self, msg: impl Into<String>) -> QfgResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> QfgResult<T> {
        self.map_err(|e| QfgError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ambiguous_driver_needs_clarification() {
        let err: QfgError = MutatorError::AmbiguousDriver.into();
        assert!(err.needs_clarification());
        assert_eq!(err.category(), ErrorCategory::Validation);
    }

    #[test]
    fn conflicts_keep_their_category() {
        let err: QfgError = MutatorError::AlreadyExists {
            kind: "page".into(),
            name: "login".into(),
            path: "pages/login_page.py".into(),
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Conflict);
        assert!(!err.needs_clarification());
    }
}
