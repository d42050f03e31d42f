//! Local filesystem adapter using std::fs.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use qfg_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{QfgError, QfgResult},
};
use tracing::debug;

static TMP_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> QfgResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> QfgResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    /// Temp file in the same directory, fsync, then rename over the target.
    fn write_file_atomic(&self, path: &Path, content: &str) -> QfgResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            self.create_dir_all(parent)?;
        }

        let temp = unique_tmp_path(path);
        let result = (|| -> io::Result<()> {
            let mut file = std::fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
            std::fs::rename(&temp, path)
        })();

        if let Err(e) = result {
            let _ = std::fs::remove_file(&temp);
            return Err(map_io_error(path, e, "replace file"));
        }

        debug!(path = %path.display(), "File replaced atomically");
        Ok(())
    }

    fn read_to_string(&self, path: &Path) -> QfgResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> QfgResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let metadata =
                std::fs::metadata(path).map_err(|e| map_io_error(path, e, "get metadata"))?;
            let mut perms = metadata.permissions();
            let mode = perms.mode();
            perms.set_mode(if executable { mode | 0o111 } else { mode & !0o111 });
            std::fs::set_permissions(path, perms)
                .map_err(|e| map_io_error(path, e, "set permissions"))?;
        }
        #[cfg(windows)]
        {
            // No executable bit on Windows
            let _ = (path, executable);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> QfgResult<Vec<PathBuf>> {
        let mut entries = std::fs::read_dir(path)
            .map_err(|e| map_io_error(path, e, "list directory"))?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<io::Result<Vec<_>>>()
            .map_err(|e| map_io_error(path, e, "list directory"))?;
        entries.sort();
        Ok(entries)
    }

    fn is_writable(&self, path: &Path) -> bool {
        std::fs::metadata(path).is_ok_and(|m| m.is_dir() && !m.permissions().readonly())
    }
}

fn unique_tmp_path(target: &Path) -> PathBuf {
    let counter = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let file_name = target
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("qfg");
    target.with_file_name(format!(".{file_name}.qfgtmp.{}.{counter}", std::process::id()))
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> QfgError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atomic_write_replaces_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("pages").join("__init__.py");
        let fs = LocalFilesystem::new();

        fs.write_file_atomic(&target, "old\n").unwrap();
        fs.write_file_atomic(&target, "new\n").unwrap();

        assert_eq!(fs.read_to_string(&target).unwrap(), "new\n");
        let names = fs.list_dir(&dir.path().join("pages")).unwrap();
        assert_eq!(names, vec![target]);
    }

    #[test]
    fn list_dir_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let fs = LocalFilesystem::new();
        for name in ["b", "a", "c"] {
            fs.write_file(&dir.path().join(name), "").unwrap();
        }
        let listed: Vec<_> = fs
            .list_dir(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(listed, vec!["a", "b", "c"]);
    }

    #[cfg(unix)]
    #[test]
    fn executable_bit_is_set() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("run_parallel.sh");
        let fs = LocalFilesystem::new();
        fs.write_file(&script, "#!/bin/sh\n").unwrap();
        fs.set_permissions(&script, true).unwrap();

        let mode = std::fs::metadata(&script).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn missing_file_maps_to_filesystem_error() {
        let err = LocalFilesystem::new()
            .read_to_string(Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(matches!(
            err,
            QfgError::Application(ApplicationError::FilesystemError { .. })
        ));
    }
}
