//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `qfg-adapters` crate provides implementations.

use crate::domain::{ConfigView, PlanError};
use crate::error::QfgResult;
use std::fmt;
use std::path::{Path, PathBuf};

/// Port for filesystem operations.
///
/// Implemented by:
/// - `qfg_adapters::filesystem::LocalFilesystem` (production)
/// - `qfg_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Paths are absolute or relative to the process working directory; the
/// services join project-relative paths onto a root before calling in.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> QfgResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> QfgResult<()>;

    /// Replace a file so readers see either the old or the new content.
    fn write_file_atomic(&self, path: &Path, content: &str) -> QfgResult<()>;

    fn read_to_string(&self, path: &Path) -> QfgResult<String>;

    /// Set file permissions.
    fn set_permissions(&self, path: &Path, executable: bool) -> QfgResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// Direct children of a directory, sorted by path.
    fn list_dir(&self, path: &Path) -> QfgResult<Vec<PathBuf>>;

    /// Whether new entries can be created inside the directory.
    fn is_writable(&self, path: &Path) -> bool;
}

/// Identifies one published set of template bodies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryVersion(String);

impl RegistryVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RegistryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An opaque content unit. The engine never looks inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBody {
    pub key: String,
    pub content: String,
}

impl TemplateBody {
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
        }
    }
}

/// Port for the template registry.
///
/// Implemented by:
/// - `qfg_adapters::registry::BuiltinRegistry` (bodies compiled into the binary)
/// - `qfg_adapters::registry::FilesystemRegistry` (directory + `registry.toml`)
#[cfg_attr(test, mockall::automock)]
pub trait TemplateRegistry: Send + Sync {
    /// The version every key is resolved against.
    fn version(&self) -> RegistryVersion;

    /// Look up a body by key.
    ///
    /// # Errors
    /// `PlanError::UnknownTemplateKey` if the key is not part of `version`.
    fn resolve(&self, key: &str, version: &RegistryVersion) -> Result<TemplateBody, PlanError>;

    /// Substitute the view's variables into a body.
    fn render(&self, body: &TemplateBody, view: &ConfigView) -> QfgResult<String>;
}
