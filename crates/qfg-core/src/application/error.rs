//! Application layer errors.
//!
//! These errors represent failures in orchestration, not generation rules.
//! Rule violations are the domain errors in `crate::domain::error`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// A template body could not be rendered.
    #[error("Rendering '{key}' failed: {reason}")]
    RenderingFailed { key: String, reason: String },

    /// A project Config or other files already occupy the target.
    #[error("Project already exists at {path}")]
    ProjectExists { path: PathBuf },

    /// No project Config was found from the start directory upwards.
    #[error("No qfg project found from {start}")]
    NoProjectFound { start: PathBuf },

    /// Inside a workspace root, a member has to be named.
    #[error("{root} is a workspace; choose a member project")]
    WorkspaceMemberRequired { root: PathBuf, members: Vec<String> },

    #[error("'{name}' is not a member of this workspace")]
    UnknownWorkspaceMember { name: String, members: Vec<String> },

    /// A registry file could not be updated safely.
    #[error("Cannot update {path}: {reason}")]
    RegistryUpdateFailed { path: PathBuf, reason: String },

    /// Writing stopped part way. The listed files were already written.
    #[error("Write failed at {failed} after {} file(s): {reason}", written.len())]
    PartialWrite {
        failed: PathBuf,
        reason: String,
        written: Vec<PathBuf>,
        pending: Vec<PathBuf>,
    },

    /// A shared lock inside an adapter was poisoned.
    #[error("Adapter state lock poisoned")]
    LockPoisoned,
}

impl ApplicationError {
    pub fn fs(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::FilesystemError {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
            ],
            Self::RenderingFailed { key, .. } => vec![
                format!("The template '{key}' references a variable qfg does not provide"),
                "If you use a custom templates directory, check that template".into(),
            ],
            Self::ProjectExists { path } => vec![
                format!("Directory is not empty: {}", path.display()),
                "Use --force to regenerate in place (existing files are overwritten)".into(),
                "Or choose a different --directory".into(),
            ],
            Self::NoProjectFound { .. } => vec![
                "Run this command inside a generated project".into(),
                "Or point at one with -C <DIR>".into(),
                "Create a project with 'qfg init'".into(),
            ],
            Self::WorkspaceMemberRequired { members, .. }
            | Self::UnknownWorkspaceMember { members, .. } => vec![
                "Pass --project <NAME> or run inside a member directory".into(),
                format!("Members: {}", members.join(", ")),
            ],
            Self::RegistryUpdateFailed { path, .. } => vec![
                format!("{} was left unchanged", path.display()),
                "Check the file for hand edits that break its layout".into(),
            ],
            Self::PartialWrite { written, pending, .. } => vec![
                format!("{} file(s) were written before the failure", written.len()),
                format!("{} file(s) were not written", pending.len()),
                "Fix the cause and re-run with --force to regenerate".into(),
            ],
            Self::LockPoisoned => vec!["Re-run the command".into()],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::FilesystemError { .. } | Self::PartialWrite { .. } => ErrorCategory::Filesystem,
            Self::RenderingFailed { .. } | Self::LockPoisoned => ErrorCategory::Internal,
            Self::ProjectExists { .. } | Self::RegistryUpdateFailed { .. } => {
                ErrorCategory::Conflict
            }
            Self::NoProjectFound { .. } | Self::UnknownWorkspaceMember { .. } => {
                ErrorCategory::NotFound
            }
            Self::WorkspaceMemberRequired { .. } => ErrorCategory::Validation,
        }
    }

    pub fn needs_clarification(&self) -> bool {
        matches!(self, Self::WorkspaceMemberRequired { .. })
    }
}
