//! Error handling for the qfg CLI.
//!
//! Provides structured errors with:
//! - User-friendly messages
//! - Actionable suggestions
//! - Proper error chaining
//! - Exit code mapping

use std::error::Error;

use owo_colors::OwoColorize;
use thiserror::Error;

use qfg_core::error::{ErrorCategory as CoreCategory, QfgError};

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    /// `--no-interactive` was given but some answers are still missing.
    #[error("Missing answers for: {}", .decisions.join(", "))]
    UnresolvedDecisions { decisions: Vec<String> },

    /// A dotted key that the configuration does not have.
    #[error("Unknown configuration key '{key}'")]
    UnknownKey { key: String },

    /// The tool configuration could not be read or written.
    #[error("Configuration error: {message}")]
    ConfigError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An error propagated from `qfg-core`.
    #[error("{0}")]
    Core(#[from] QfgError),

    /// `qfg validate` finished with failures.
    #[error("Validation failed with {failures} problem(s)")]
    ValidationFailed { failures: usize },

    /// An I/O operation failed.
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// A prompt could not be shown or read.
    #[error("Prompt failed: {message}")]
    Prompt { message: String },

    /// Operation cancelled by user.
    #[error("Operation cancelled")]
    Cancelled,

    /// Feature not available (e.g., prompts without the `interactive` feature).
    #[error("Feature not available: {feature}")]
    FeatureNotAvailable { feature: &'static str },
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::IoError {
            message: err.to_string(),
            source: err,
        }
    }
}

impl CliError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::UnresolvedDecisions { decisions } => {
                let mut out = vec!["Pass these as flags, or drop --no-interactive:".into()];
                out.extend(decisions.iter().map(|d| format!("  • --{d}")));
                out
            }

            Self::UnknownKey { key } => vec![
                format!("'{key}' is not a configuration key"),
                "Run 'qfg config show' to list the available keys".into(),
            ],

            Self::ConfigError { .. } => vec![
                format!(
                    "Check your config file at {}",
                    crate::config::AppConfig::config_path().display()
                ),
                "QFG_* environment variables override the file".into(),
            ],

            Self::Core(core_err) => core_err.suggestions(),

            Self::ValidationFailed { .. } => vec![
                "Restore the reported files, or regenerate with 'qfg init --force'".into(),
                "Warnings alone do not fail validation".into(),
            ],

            Self::IoError { message, .. } => vec![
                format!("I/O operation failed: {message}"),
                "Check file permissions".into(),
                "Ensure the parent directory exists".into(),
            ],

            Self::Prompt { .. } => vec![
                "Run in a terminal, or pass --no-interactive with explicit flags".into(),
            ],

            Self::Cancelled => vec![
                "Operation was cancelled".into(),
                "No changes were made".into(),
            ],

            Self::FeatureNotAvailable { feature } => vec![
                format!("The '{feature}' feature is not available in this build"),
                format!("Install with the feature enabled: cargo install qfg-cli --features {feature}"),
                "Or pass every answer as a flag".into(),
            ],
        }
    }

    /// Get the error category for styling and exit codes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::UnresolvedDecisions { .. }
            | Self::UnknownKey { .. }
            | Self::Cancelled
            | Self::FeatureNotAvailable { .. } => ErrorCategory::Usage,
            Self::ConfigError { .. } => ErrorCategory::Configuration,
            Self::Core(core) if core.needs_clarification() => ErrorCategory::Usage,
            Self::Core(core) => match core.category() {
                CoreCategory::Validation
                | CoreCategory::Compatibility
                | CoreCategory::Conflict
                | CoreCategory::Configuration => ErrorCategory::Engine,
                CoreCategory::NotFound => ErrorCategory::NotFound,
                CoreCategory::Filesystem => ErrorCategory::Filesystem,
                CoreCategory::Internal => ErrorCategory::Internal,
            },
            Self::ValidationFailed { .. } => ErrorCategory::Engine,
            Self::IoError { .. } => ErrorCategory::Filesystem,
            Self::Prompt { .. } => ErrorCategory::Internal,
        }
    }

    /// Exit code to pass to the OS.
    ///
    /// | Category            | Code |
    /// |---------------------|------|
    /// | Usage               |  2   |
    /// | everything else     |  1   |
    pub fn exit_code(&self) -> u8 {
        match self.category() {
            ErrorCategory::Usage => 2,
            _ => 1,
        }
    }

    /// Format the error for display with colors and suggestions.
    pub fn format_colored(&self, verbose: bool) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "\n{} {}\n\n",
            "✗".red().bold(),
            "Error:".red().bold()
        ));
        output.push_str(&format!("  {}\n", self.to_string().red()));

        if verbose {
            let mut source = self.source();
            while let Some(err) = source {
                output.push_str(&format!(
                    "\n  {} {}\n",
                    "→".dimmed(),
                    err.to_string().dimmed()
                ));
                source = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            output.push_str(&format!("\n{}\n", "Suggestions:".yellow().bold()));
            for suggestion in suggestions {
                output.push_str(&format!("  {suggestion}\n"));
            }
        }

        if !verbose {
            output.push('\n');
            output.push_str(&format!(
                "{} {}\n",
                "\u{2139}".blue(), // ℹ
                "Use -v / --verbose for more details.".dimmed(),
            ));
        }

        output
    }

    /// Plain-text version of [`Self::format_colored`], without ANSI codes.
    pub fn format_plain(&self, verbose: bool) -> String {
        let mut out = String::new();
        out.push_str(&format!("\nError: {self}\n"));

        if verbose {
            let mut src = std::error::Error::source(self);
            while let Some(err) = src {
                out.push_str(&format!("  Caused by: {err}\n"));
                src = err.source();
            }
        }

        let suggestions = self.suggestions();
        if !suggestions.is_empty() {
            out.push_str("\nSuggestions:\n");
            for s in &suggestions {
                out.push_str(&format!("  {s}\n"));
            }
        }

        if !verbose {
            out.push_str("\nUse -v / --verbose for more details.\n");
        }

        out
    }

    /// Machine-readable form for `--output-format json`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.to_string(),
            "category": self.category().as_str(),
            "exit_code": self.exit_code(),
            "suggestions": self.suggestions(),
        })
    }

    /// Log the error using tracing.
    pub fn log(&self) {
        match self.category() {
            ErrorCategory::Usage => tracing::warn!("Usage error: {}", self),
            ErrorCategory::NotFound => tracing::warn!("Not found: {}", self),
            ErrorCategory::Engine => tracing::warn!("Generation error: {}", self),
            ErrorCategory::Configuration => tracing::error!("Configuration error: {}", self),
            ErrorCategory::Filesystem => tracing::error!("Filesystem error: {}", self),
            ErrorCategory::Internal => tracing::error!("Internal error: {}", self),
        }

        if let Some(source) = self.source() {
            tracing::debug!("Caused by: {}", source);
        }
    }
}

/// Error categories for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad or missing arguments; more input would fix it.
    Usage,
    /// The engine refused: invalid Config, conflict, unknown template.
    Engine,
    /// Project or workspace member not found.
    NotFound,
    /// Tool configuration error.
    Configuration,
    Filesystem,
    /// Internal/system error.
    Internal,
}

impl ErrorCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Usage => "usage",
            Self::Engine => "engine",
            Self::NotFound => "not_found",
            Self::Configuration => "configuration",
            Self::Filesystem => "filesystem",
            Self::Internal => "internal",
        }
    }
}

// ── IntoCli trait ─────────────────────────────────────────────────────────────

/// Extension trait to convert foreign error types into [`CliError`] at
/// call-sites with a descriptive context message.
pub trait IntoCli<T> {
    /// Convert to `CliResult` attaching a human-readable context message.
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T> IntoCli<T> for Result<T, std::io::Error> {
    fn with_cli_context<F, S>(self, f: F) -> CliResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| CliError::IoError {
            message: f().into(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qfg_core::application::ApplicationError;
    use qfg_core::domain::{ConfigError, MutatorError};
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn clarification_errors_are_usage_errors() {
        let err = CliError::Core(MutatorError::AmbiguousDriver.into());
        assert_eq!(err.category(), ErrorCategory::Usage);
        assert_eq!(err.exit_code(), 2);

        let err = CliError::Core(
            ApplicationError::WorkspaceMemberRequired {
                root: PathBuf::from("/w"),
                members: vec!["web".into()],
            }
            .into(),
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn engine_errors_exit_with_one() {
        let conflict = CliError::Core(
            MutatorError::AlreadyExists {
                kind: "page".into(),
                name: "login".into(),
                path: "pages/login_page.py".into(),
            }
            .into(),
        );
        assert_eq!(conflict.exit_code(), 1);

        let config = CliError::Core(ConfigError::InvariantViolation("bad".into()).into());
        assert_eq!(config.exit_code(), 1);

        assert_eq!(CliError::ValidationFailed { failures: 2 }.exit_code(), 1);
    }

    #[test]
    fn unresolved_decisions_list_flags() {
        let err = CliError::UnresolvedDecisions {
            decisions: vec!["name".into(), "driver".into()],
        };
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("name, driver"));
        assert!(err.suggestions().iter().any(|s| s.contains("--driver")));
    }

    #[test]
    fn project_exists_suggests_force() {
        let err = CliError::Core(
            ApplicationError::ProjectExists {
                path: PathBuf::from("/tmp/test"),
            }
            .into(),
        );
        assert!(err.suggestions().iter().any(|s| s.contains("--force")));
    }

    #[test]
    fn format_plain_contains_error_header() {
        let err = CliError::UnknownKey { key: "x.y".into() };
        let s = err.format_plain(false);
        assert!(s.contains("Error:"));
        assert!(s.contains("Suggestions:"));
        assert!(s.contains("--verbose"));
    }

    #[test]
    fn format_plain_verbose_shows_cause() {
        let err = CliError::IoError {
            message: "reading".into(),
            source: io::Error::other("disk on fire"),
        };
        let s = err.format_plain(true);
        assert!(s.contains("Caused by: disk on fire"));
        assert!(!s.contains("--verbose"));
    }

    #[test]
    fn json_form_carries_exit_code() {
        let json = CliError::Cancelled.to_json();
        assert_eq!(json["exit_code"], 2);
        assert_eq!(json["category"], "usage");
    }

    #[test]
    fn into_cli_io_error() {
        let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
        let cli: CliResult<()> = result.with_cli_context(|| "reading config");
        assert!(matches!(cli, Err(CliError::IoError { .. })));
    }
}
