//! In-memory filesystem adapter for testing.
//!
//! `/` and `.` always exist as directories. Directories can be marked
//! read-only and single paths can be set to fail on write, which lets tests
//! drive the pre-flight and partial-write paths.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use qfg_core::{
    application::{ApplicationError, ports::Filesystem},
    error::QfgResult,
};

/// In-memory filesystem for testing. Clones share state.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: BTreeMap<PathBuf, String>,
    directories: BTreeSet<PathBuf>,
    executables: BTreeSet<PathBuf>,
    read_only: BTreeSet<PathBuf>,
    failing: BTreeSet<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        let mut inner = MemoryFilesystemInner::default();
        inner.directories.insert(PathBuf::from("/"));
        inner.directories.insert(PathBuf::from("."));
        Self {
            inner: Arc::new(RwLock::new(inner)),
        }
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.read().ok()?.files.get(path.as_ref()).cloned()
    }

    /// Seed a file, creating its parents.
    pub fn add_file(&self, path: impl AsRef<Path>, content: &str) -> QfgResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }
        self.write()?
            .files
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    /// Check if a file is marked executable.
    pub fn is_executable(&self, path: impl AsRef<Path>) -> bool {
        self.read()
            .is_ok_and(|inner| inner.executables.contains(path.as_ref()))
    }

    /// All files, sorted.
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.read()
            .map(|inner| inner.files.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Refuse new entries in `dir` and its subdirectories.
    pub fn set_read_only(&self, dir: impl AsRef<Path>) -> QfgResult<()> {
        self.write()?.read_only.insert(dir.as_ref().to_path_buf());
        Ok(())
    }

    /// Make every write to `path` fail.
    pub fn fail_writes_to(&self, path: impl AsRef<Path>) -> QfgResult<()> {
        self.write()?.failing.insert(path.as_ref().to_path_buf());
        Ok(())
    }

    fn read(&self) -> QfgResult<RwLockReadGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .read()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }

    fn write(&self) -> QfgResult<RwLockWriteGuard<'_, MemoryFilesystemInner>> {
        self.inner
            .write()
            .map_err(|_| ApplicationError::LockPoisoned.into())
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryFilesystemInner {
    fn is_read_only(&self, path: &Path) -> bool {
        self.read_only.iter().any(|dir| path.starts_with(dir))
    }

    fn check_write(&self, path: &Path) -> QfgResult<()> {
        if self.failing.contains(path) {
            return Err(ApplicationError::fs(path, "injected write failure").into());
        }
        if self.is_read_only(path) {
            return Err(ApplicationError::fs(path, "Permission denied").into());
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !self.directories.contains(parent) {
                return Err(ApplicationError::fs(path, "Parent directory does not exist").into());
            }
        }
        if self.directories.contains(path) {
            return Err(ApplicationError::fs(path, "Is a directory").into());
        }
        Ok(())
    }
}

impl Filesystem for MemoryFilesystem {
    fn create_dir_all(&self, path: &Path) -> QfgResult<()> {
        let mut inner = self.write()?;

        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            if inner.directories.contains(&current) {
                continue;
            }
            if inner.files.contains_key(&current) {
                return Err(ApplicationError::fs(&current, "Not a directory").into());
            }
            if inner.is_read_only(&current) {
                return Err(ApplicationError::fs(&current, "Permission denied").into());
            }
            inner.directories.insert(current.clone());
        }

        Ok(())
    }

    fn write_file(&self, path: &Path, content: &str) -> QfgResult<()> {
        let mut inner = self.write()?;
        inner.check_write(path)?;
        inner.files.insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn write_file_atomic(&self, path: &Path, content: &str) -> QfgResult<()> {
        // A single map insert is already all-or-nothing.
        self.write_file(path, content)
    }

    fn read_to_string(&self, path: &Path) -> QfgResult<String> {
        self.read()?
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| ApplicationError::fs(path, "No such file").into())
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> QfgResult<()> {
        let mut inner = self.write()?;

        if executable {
            inner.executables.insert(path.to_path_buf());
        } else {
            inner.executables.remove(path);
        }

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.read()
            .is_ok_and(|inner| inner.files.contains_key(path) || inner.directories.contains(path))
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.read()
            .is_ok_and(|inner| inner.directories.contains(path))
    }

    fn list_dir(&self, path: &Path) -> QfgResult<Vec<PathBuf>> {
        let inner = self.read()?;
        if !inner.directories.contains(path) {
            return Err(ApplicationError::fs(path, "No such directory").into());
        }

        let children: BTreeSet<PathBuf> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.parent() == Some(path) && p.as_path() != path)
            .cloned()
            .collect();
        Ok(children.into_iter().collect())
    }

    fn is_writable(&self, path: &Path) -> bool {
        self.read()
            .is_ok_and(|inner| inner.directories.contains(path) && !inner.is_read_only(path))
    }
}
