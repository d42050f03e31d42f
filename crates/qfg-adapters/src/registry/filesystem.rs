//! Template registry backed by a directory of `.tmpl` files.
//!
//! # Directory layout expected
//!
//! ```text
//! my-templates/
//! ├── registry.toml          ← manifest (required)
//! ├── base/
//! │   └── readme.tmpl        ← key "base/readme"
//! └── selenium/
//!     └── page.tmpl          ← key "selenium/page"
//! ```
//!
//! # `registry.toml` format
//!
//! ```toml
//! [registry]
//! version = "acme-2"        # required
//! inherit_builtin = true    # optional; missing keys fall back to built-ins
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, info, instrument};
use walkdir::WalkDir;

use qfg_core::{
    application::{
        ApplicationError,
        ports::{RegistryVersion, TemplateBody, TemplateRegistry},
    },
    domain::{ConfigView, PlanError},
    error::QfgResult,
};

use super::{builtin::BuiltinRegistry, render::render_placeholders};

pub const MANIFEST_FILE: &str = "registry.toml";
const BODY_EXTENSION: &str = "tmpl";

#[derive(Debug, Deserialize)]
struct Manifest {
    registry: RegistrySection,
}

#[derive(Debug, Deserialize)]
struct RegistrySection {
    version: String,
    #[serde(default)]
    inherit_builtin: bool,
}

/// Registry loaded once from a templates directory.
#[derive(Debug, Clone)]
pub struct FilesystemRegistry {
    root: PathBuf,
    version: RegistryVersion,
    bodies: BTreeMap<String, String>,
    fallback: Option<BuiltinRegistry>,
}

impl FilesystemRegistry {
    /// Read the manifest and every body under `root`.
    ///
    /// # Errors
    /// `FilesystemError` if the manifest is missing or malformed, or a body
    /// cannot be read.
    #[instrument(fields(root = %root.as_ref().display()), skip(root))]
    pub fn load(root: impl AsRef<Path>) -> QfgResult<Self> {
        let root = root.as_ref();
        let manifest_path = root.join(MANIFEST_FILE);

        let raw = fs::read_to_string(&manifest_path)
            .map_err(|e| ApplicationError::fs(&manifest_path, format!("Failed to read manifest: {e}")))?;
        let manifest: Manifest = toml::from_str(&raw)
            .map_err(|e| ApplicationError::fs(&manifest_path, format!("Invalid manifest: {e}")))?;

        let mut bodies = BTreeMap::new();
        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::fs(root, format!("directory walk error: {e}")))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some(BODY_EXTENSION)
            {
                continue;
            }

            let Some(key) = key_for(root, path) else {
                continue;
            };
            let content = fs::read_to_string(path)
                .map_err(|e| ApplicationError::fs(path, format!("Failed to read template: {e}")))?;
            debug!(key = %key, "loaded template body");
            bodies.insert(key, content);
        }

        info!(
            version = %manifest.registry.version,
            count = bodies.len(),
            inherit_builtin = manifest.registry.inherit_builtin,
            "templates loaded"
        );

        Ok(Self {
            root: root.to_path_buf(),
            version: RegistryVersion::new(manifest.registry.version),
            bodies,
            fallback: manifest.registry.inherit_builtin.then(BuiltinRegistry::new),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys defined by this directory, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.bodies.keys().map(String::as_str)
    }
}

/// `base/readme.tmpl` → `base/readme`, always with forward slashes.
fn key_for(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?.with_extension("");
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

impl TemplateRegistry for FilesystemRegistry {
    fn version(&self) -> RegistryVersion {
        self.version.clone()
    }

    fn resolve(&self, key: &str, version: &RegistryVersion) -> Result<TemplateBody, PlanError> {
        let unknown = || PlanError::UnknownTemplateKey {
            key: key.to_string(),
            version: version.to_string(),
        };

        if version != &self.version {
            return Err(unknown());
        }

        self.bodies
            .get(key)
            .map(|content| TemplateBody::new(key, content.as_str()))
            .or_else(|| {
                self.fallback
                    .and_then(|b| b.body(key))
                    .map(|content| TemplateBody::new(key, content))
            })
            .ok_or_else(unknown)
    }

    fn render(&self, body: &TemplateBody, view: &ConfigView) -> QfgResult<String> {
        render_placeholders(body, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn loads_bodies_keyed_by_relative_path() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), MANIFEST_FILE, "[registry]\nversion = \"acme-2\"\n");
        write(dir.path(), "base/readme.tmpl", "# {{PROJECT_NAME}}\n");
        write(dir.path(), "base/notes.txt", "ignored");

        let registry = FilesystemRegistry::load(dir.path()).unwrap();
        assert_eq!(registry.version(), RegistryVersion::new("acme-2"));
        assert_eq!(registry.keys().collect::<Vec<_>>(), vec!["base/readme"]);

        let body = registry.resolve("base/readme", &registry.version()).unwrap();
        assert_eq!(body.content, "# {{PROJECT_NAME}}\n");
        assert!(registry.resolve("base/gitignore", &registry.version()).is_err());
    }

    #[test]
    fn inherits_builtin_bodies_when_asked() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            MANIFEST_FILE,
            "[registry]\nversion = \"acme-2\"\ninherit_builtin = true\n",
        );
        write(dir.path(), "base/readme.tmpl", "custom\n");

        let registry = FilesystemRegistry::load(dir.path()).unwrap();
        let version = registry.version();
        assert_eq!(registry.resolve("base/readme", &version).unwrap().content, "custom\n");
        assert!(registry.resolve("base/gitignore", &version).is_ok());
        assert!(registry.resolve("base/readme", &RegistryVersion::new("1")).is_err());
    }

    #[test]
    fn missing_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(FilesystemRegistry::load(dir.path()).is_err());
    }
}
