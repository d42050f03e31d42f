use crate::domain::error::PlanError;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// A project-relative path using `/` separators.
///
/// Invariant: never absolute and never escapes the project root. Enforced at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath(String);

impl RelativePath {
    /// Fallible constructor.
    pub fn try_new(path: impl AsRef<str>) -> Result<Self, PlanError> {
        let raw = path.as_ref();
        let as_path = Path::new(raw);

        let escapes = as_path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)));

        if raw.is_empty() || as_path.is_absolute() || raw.starts_with('/') || escapes {
            return Err(PlanError::AbsolutePath {
                path: raw.to_string(),
            });
        }

        Ok(Self(raw.replace('\\', "/")))
    }

    /// Join a segment, maintaining the relative invariant.
    pub fn join(&self, segment: &str) -> Result<Self, PlanError> {
        Self::try_new(format!("{}/{}", self.0, segment.trim_start_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The directory part, if the path has one.
    pub fn parent(&self) -> Option<&str> {
        self.0.rsplit_once('/').map(|(dir, _)| dir)
    }

    pub fn file_name(&self) -> &str {
        self.0.rsplit_once('/').map_or(&self.0, |(_, name)| name)
    }

    /// Resolve against a project root.
    pub fn under(&self, root: &Path) -> PathBuf {
        self.0.split('/').fold(root.to_path_buf(), |acc, seg| acc.join(seg))
    }
}

impl AsRef<str> for RelativePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability-based permissions model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    readable: bool,
    writable: bool,
    executable: bool,
}

impl Permissions {
    pub const fn read_write() -> Self {
        Self {
            readable: true,
            writable: true,
            executable: false,
        }
    }

    pub const fn executable() -> Self {
        Self {
            readable: true,
            writable: true,
            executable: true,
        }
    }

    /// Shell scripts are generated executable, everything else read-write.
    pub fn for_path(path: &RelativePath) -> Self {
        if path.as_str().ends_with(".sh") {
            Self::executable()
        } else {
            Self::read_write()
        }
    }

    pub const fn readable(&self) -> bool {
        self.readable
    }
    pub const fn writable(&self) -> bool {
        self.writable
    }
    pub const fn executable_flag(&self) -> bool {
        self.executable
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self::read_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_absolute_and_escaping_paths() {
        assert!(RelativePath::try_new("/etc/passwd").is_err());
        assert!(RelativePath::try_new("../outside.py").is_err());
        assert!(RelativePath::try_new("pages/../../x").is_err());
        assert!(RelativePath::try_new("").is_err());
    }

    #[test]
    fn splits_parent_and_file_name() {
        let p = RelativePath::try_new("pages_pw/login_page_pw.py").unwrap();
        assert_eq!(p.parent(), Some("pages_pw"));
        assert_eq!(p.file_name(), "login_page_pw.py");

        let root = RelativePath::try_new("pytest.ini").unwrap();
        assert_eq!(root.parent(), None);
        assert_eq!(root.file_name(), "pytest.ini");
    }

    #[test]
    fn scripts_are_executable() {
        let script = RelativePath::try_new("scripts/run_parallel.sh").unwrap();
        assert!(Permissions::for_path(&script).executable_flag());
        let page = RelativePath::try_new("pages/base_page.py").unwrap();
        assert!(!Permissions::for_path(&page).executable_flag());
    }
}
