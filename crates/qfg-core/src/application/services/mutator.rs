//! Incremental Mutator - adds one page or test to an existing project.
//!
//! Work happens in two phases. `plan` resolves the driver, checks features
//! and names, fans the artifact out and checks every target for conflicts.
//! `apply` renders all files and computes every registry update in memory,
//! then writes. A conflict therefore never leaves a byte on disk.

use chrono::Datelike;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRegistry},
    },
    domain::{
        Artifact, ArtifactKind, Config, ConfigView, DomainValidator, DriverSelection, Feature,
        MutatorError, RegistryAppendError, TestType, WriteOp, WriteSet, fan_out,
    },
    error::{QfgError, QfgResult},
};

/// What the caller asked to add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddRequest {
    pub kind: ArtifactKind,
    pub name: String,
    pub url_path: Option<String>,
    pub driver: Option<DriverSelection>,
    pub test_type: TestType,
}

impl AddRequest {
    pub fn page(name: impl Into<String>) -> Self {
        Self {
            kind: ArtifactKind::Page,
            name: name.into(),
            url_path: None,
            driver: None,
            test_type: TestType::Ui,
        }
    }

    pub fn test(name: impl Into<String>, test_type: TestType) -> Self {
        Self {
            kind: ArtifactKind::Test,
            name: name.into(),
            url_path: None,
            driver: None,
            test_type,
        }
    }

    pub fn with_url(mut self, url_path: impl Into<String>) -> Self {
        self.url_path = Some(url_path.into());
        self
    }

    pub fn with_driver(mut self, driver: DriverSelection) -> Self {
        self.driver = Some(driver);
        self
    }
}

/// A staged file change, fully computed before any write.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Staged {
    Create { path: PathBuf, content: String },
    Replace { path: PathBuf, content: String },
}

impl Staged {
    fn path(&self) -> &Path {
        match self {
            Self::Create { path, .. } | Self::Replace { path, .. } => path,
        }
    }
}

pub struct IncrementalMutator {
    registry: Box<dyn TemplateRegistry>,
    filesystem: Box<dyn Filesystem>,
    year: i32,
}

impl IncrementalMutator {
    pub fn new(registry: Box<dyn TemplateRegistry>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            registry,
            filesystem,
            year: chrono::Utc::now().year(),
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// Plan and apply in one step. Returns the write set and the touched
    /// files.
    #[instrument(skip_all, fields(kind = %request.kind, name = %request.name, root = %root.display()))]
    pub fn add_artifact(
        &self,
        config: &Config,
        root: &Path,
        request: &AddRequest,
    ) -> QfgResult<(WriteSet, Vec<PathBuf>)> {
        let set = self.plan(config, root, request)?;
        let written = self.apply(config, root, &set)?;
        info!(files = written.len(), "Artifact added");
        Ok((set, written))
    }

    /// Compute the write set and check it against the project on disk.
    ///
    /// # Errors
    /// - `FeatureDisabled` for an API test without `features.api_testing`
    /// - `InvalidName` if the name normalizes to nothing
    /// - `DriverNotConfigured` / `AmbiguousDriver` from driver resolution
    /// - `AlreadyExists` if a file or registry entry is taken
    pub fn plan(&self, config: &Config, root: &Path, request: &AddRequest) -> QfgResult<WriteSet> {
        let is_api = request.kind == ArtifactKind::Test && request.test_type == TestType::Api;
        if is_api && !config.is_enabled(Feature::ApiTesting) {
            return Err(MutatorError::FeatureDisabled {
                feature: Feature::ApiTesting.as_str().into(),
            }
            .into());
        }

        let artifact = match request.kind {
            ArtifactKind::Page => Artifact::page(&request.name, request.url_path.as_deref())?,
            ArtifactKind::Test => Artifact::test(&request.name, request.test_type)?,
        };

        let drivers = if is_api {
            // Driver-independent, but an explicit driver must still exist.
            if request.driver.is_some() {
                resolve_driver(config.driver_selection(), request.driver)?;
            }
            config.driver_selection()
        } else {
            resolve_driver(config.driver_selection(), request.driver)?
        };
        debug!(%drivers, module = artifact.module(), "Resolved artifact");

        let ops = fan_out(&artifact, drivers, &config.settings())?;
        let set = WriteSet::new(artifact, ops);
        DomainValidator::validate_write_set(&set)?;

        self.check_conflicts(root, &set)?;
        Ok(set)
    }

    /// Render and write a planned set.
    ///
    /// Registry files are rewritten atomically; a missing registry file is
    /// created from the single new entry.
    pub fn apply(&self, config: &Config, root: &Path, set: &WriteSet) -> QfgResult<Vec<PathBuf>> {
        let staged = self.stage(config, root, set)?;

        let mut written = Vec::with_capacity(staged.len());
        for (index, change) in staged.iter().enumerate() {
            let result = match change {
                Staged::Create { path, content } => self.create(path, content),
                Staged::Replace { path, content } => {
                    self.filesystem.write_file_atomic(path, content)
                }
            };

            if let Err(e) = result {
                warn!(path = %change.path().display(), error = %e, "Write failed");
                return Err(ApplicationError::PartialWrite {
                    failed: change.path().to_path_buf(),
                    reason: e.to_string(),
                    written,
                    pending: staged[index + 1..]
                        .iter()
                        .map(|s| s.path().to_path_buf())
                        .collect(),
                }
                .into());
            }
            written.push(change.path().to_path_buf());
        }

        Ok(written)
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn check_conflicts(&self, root: &Path, set: &WriteSet) -> QfgResult<()> {
        let artifact = set.artifact();

        for op in set.ops() {
            let path = op.path().under(root);
            match op {
                WriteOp::Create { .. } => {
                    if self.filesystem.exists(&path) {
                        return Err(MutatorError::AlreadyExists {
                            kind: artifact.kind().to_string(),
                            name: artifact.display_name().to_string(),
                            path: op.path().to_string(),
                        }
                        .into());
                    }
                }
                WriteOp::Append {
                    registry,
                    entry_name,
                    ..
                } => {
                    let current = self.read_registry(&path)?;
                    if registry.contains(&current, entry_name) {
                        return Err(MutatorError::AlreadyExists {
                            kind: format!("{registry} entry"),
                            name: entry_name.clone(),
                            path: op.path().to_string(),
                        }
                        .into());
                    }
                }
            }
        }

        Ok(())
    }

    fn stage(&self, config: &Config, root: &Path, set: &WriteSet) -> QfgResult<Vec<Staged>> {
        let version = self.registry.version();
        let view = ConfigView::for_project(config, self.year).with_artifact(set.artifact(), config);

        set.ops()
            .iter()
            .map(|op| {
                let body = self.registry.resolve(op.template_key(), &version)?;
                let rendered = self.registry.render(&body, &view)?;
                let path = op.path().under(root);

                match op {
                    WriteOp::Create { .. } => Ok(Staged::Create {
                        path,
                        content: rendered,
                    }),
                    WriteOp::Append {
                        registry,
                        entry_name,
                        ..
                    } => {
                        let current = self.read_registry(&path)?;
                        let content = registry
                            .append_entry(&current, entry_name, &rendered)
                            .map_err(|e| registry_error(&path, e))?;
                        Ok(Staged::Replace { path, content })
                    }
                }
            })
            .collect()
    }

    fn read_registry(&self, path: &Path) -> QfgResult<String> {
        if self.filesystem.exists(path) {
            self.filesystem.read_to_string(path)
        } else {
            Ok(String::new())
        }
    }

    fn create(&self, path: &Path, content: &str) -> QfgResult<()> {
        if let Some(parent) = path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(path, content)
    }
}

/// Pick the drivers an artifact targets.
///
/// An explicit request must be covered by the project's selection. Without
/// one, a single-driver project answers for itself and a `both` project
/// needs clarification.
pub fn resolve_driver(
    configured: DriverSelection,
    requested: Option<DriverSelection>,
) -> Result<DriverSelection, MutatorError> {
    match requested {
        Some(requested) if configured.covers(requested) => Ok(requested),
        Some(requested) => Err(MutatorError::DriverNotConfigured {
            requested: requested.to_string(),
            configured: configured.to_string(),
        }),
        None if configured == DriverSelection::Both => Err(MutatorError::AmbiguousDriver),
        None => Ok(configured),
    }
}

fn registry_error(path: &Path, error: RegistryAppendError) -> QfgError {
    ApplicationError::RegistryUpdateFailed {
        path: path.to_path_buf(),
        reason: error.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_driver_must_be_configured() {
        use DriverSelection::*;
        assert_eq!(resolve_driver(Both, Some(Selenium)), Ok(Selenium));
        assert_eq!(resolve_driver(Both, Some(Both)), Ok(Both));
        assert_eq!(resolve_driver(Playwright, Some(Playwright)), Ok(Playwright));
        assert!(matches!(
            resolve_driver(Selenium, Some(Playwright)),
            Err(MutatorError::DriverNotConfigured { .. })
        ));
        assert!(matches!(
            resolve_driver(Playwright, Some(Both)),
            Err(MutatorError::DriverNotConfigured { .. })
        ));
    }

    #[test]
    fn omitted_driver_comes_from_config_unless_both() {
        use DriverSelection::*;
        assert_eq!(resolve_driver(Selenium, None), Ok(Selenium));
        assert_eq!(resolve_driver(Playwright, None), Ok(Playwright));
        assert_eq!(resolve_driver(Both, None), Err(MutatorError::AmbiguousDriver));
    }

    fn mutator() -> IncrementalMutator {
        use crate::application::ports::{MockFilesystem, MockTemplateRegistry};
        IncrementalMutator::new(
            Box::new(MockTemplateRegistry::new()),
            Box::new(MockFilesystem::new()),
        )
    }

    fn selenium_with_api() -> Config {
        Config::builder("Shop", "https://shop.test", DriverSelection::Selenium)
            .browsers([crate::domain::Browser::Chrome])
            .feature(Feature::ApiTesting, true)
            .build()
            .unwrap()
    }

    #[test]
    fn api_test_rejects_unconfigured_driver() {
        let request = AddRequest::test("users", TestType::Api).with_driver(DriverSelection::Playwright);
        let err = mutator()
            .plan(&selenium_with_api(), Path::new("/shop"), &request)
            .unwrap_err();
        assert!(matches!(
            err,
            QfgError::Mutator(MutatorError::DriverNotConfigured { .. })
        ));
    }

    #[test]
    fn api_test_requires_feature_before_anything_else() {
        let config = Config::builder("Shop", "https://shop.test", DriverSelection::Selenium)
            .browsers([crate::domain::Browser::Chrome])
            .build()
            .unwrap();
        let err = mutator()
            .plan(&config, Path::new("/shop"), &AddRequest::test("users", TestType::Api))
            .unwrap_err();
        assert!(matches!(err, QfgError::Mutator(MutatorError::FeatureDisabled { .. })));
    }

    #[test]
    fn request_builders() {
        let req = AddRequest::page("Login")
            .with_url("/login")
            .with_driver(DriverSelection::Selenium);
        assert_eq!(req.kind, ArtifactKind::Page);
        assert_eq!(req.url_path.as_deref(), Some("/login"));
        assert_eq!(req.driver, Some(DriverSelection::Selenium));
        assert_eq!(AddRequest::test("x", TestType::Api).test_type, TestType::Api);
    }
}
