//! Scaffold Service - creates a fresh project from a Config.
//!
//! This service coordinates the whole generation workflow:
//! 1. Validate the Config and compose the plan
//! 2. Refuse an occupied target unless overwriting
//! 3. Render every planned file in memory
//! 4. Pre-flight the target, then write files in plan order and the Config last
//!
//! Nothing touches the disk before step 4. Once writing has started a failure
//! is reported as `PartialWrite`, listing what was and was not written.

use chrono::Datelike;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::{Filesystem, TemplateRegistry},
        services::planner::CompositionPlanner,
    },
    domain::{
        CONFIG_FILE_NAME, CompositionPlan, Config, ConfigView, DomainValidator, Permissions,
    },
    error::{QfgError, QfgResult},
};

/// A rendered file waiting to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: PathBuf,
    pub content: String,
    pub permissions: Permissions,
}

/// Outcome of a successful `init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub root: PathBuf,
    /// Every written file, Config last.
    pub written: Vec<PathBuf>,
}

/// Main scaffolding service.
pub struct ScaffoldService {
    registry: Box<dyn TemplateRegistry>,
    filesystem: Box<dyn Filesystem>,
    year: i32,
}

impl ScaffoldService {
    pub fn new(registry: Box<dyn TemplateRegistry>, filesystem: Box<dyn Filesystem>) -> Self {
        Self {
            registry,
            filesystem,
            year: chrono::Utc::now().year(),
        }
    }

    /// Pin the `{{YEAR}}` variable.
    pub fn with_year(mut self, year: i32) -> Self {
        self.year = year;
        self
    }

    /// The plan `init` would execute, without touching the target.
    pub fn preview(&self, config: &Config) -> QfgResult<CompositionPlan> {
        DomainValidator::validate_config(config)?;
        CompositionPlanner::plan(config, self.registry.as_ref())
    }

    /// Create a project in `target_dir`.
    ///
    /// With `overwrite`, an existing project or non-empty directory is
    /// regenerated in place; without it, either is refused.
    #[instrument(
        skip_all,
        fields(
            project = %config.project_name(),
            driver = %config.driver_selection(),
            target = %target_dir.display()
        )
    )]
    pub fn init(&self, config: &Config, target_dir: &Path, overwrite: bool) -> QfgResult<InitReport> {
        info!("Generating project");

        // 1-2. Config and plan
        DomainValidator::validate_config(config)?;
        let plan = CompositionPlanner::plan(config, self.registry.as_ref())?;
        info!(files = plan.len(), "Plan composed");

        // 3. Occupied target
        self.check_target(target_dir, overwrite)?;

        // 4. Render everything before writing anything
        let files = self.render_plan(config, &plan, target_dir)?;
        let config_path = target_dir.join(CONFIG_FILE_NAME);
        let config_raw = config.serialize()?;

        // 5. Pre-flight
        self.preflight(target_dir)?;

        // 6-7. Write
        let written = self.write_all(target_dir, &files, &config_path, &config_raw)?;

        info!(written = written.len(), "Project generated");
        Ok(InitReport {
            root: target_dir.to_path_buf(),
            written,
        })
    }

    /// Render every plan entry against the Config view.
    pub fn render_plan(
        &self,
        config: &Config,
        plan: &CompositionPlan,
        root: &Path,
    ) -> QfgResult<Vec<RenderedFile>> {
        let version = self.registry.version();
        let project_view = ConfigView::for_project(config, self.year);

        plan.entries()
            .iter()
            .map(|entry| {
                let body = self.registry.resolve(entry.template_key, &version)?;
                let view = match &entry.artifact {
                    Some(artifact) => project_view.clone().with_artifact(artifact, config),
                    None => project_view.clone(),
                };
                let content = self.registry.render(&body, &view)?;
                debug!(path = %entry.path, key = entry.template_key, "Rendered");

                Ok(RenderedFile {
                    path: entry.path.under(root),
                    content,
                    permissions: Permissions::for_path(&entry.path),
                })
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn check_target(&self, target_dir: &Path, overwrite: bool) -> QfgResult<()> {
        let has_config = self.filesystem.exists(&target_dir.join(CONFIG_FILE_NAME));
        let non_empty = self.filesystem.is_dir(target_dir)
            && !self.filesystem.list_dir(target_dir)?.is_empty();

        if has_config || non_empty {
            if overwrite {
                warn!(has_config, "Regenerating over an existing directory");
            } else {
                return Err(ApplicationError::ProjectExists {
                    path: target_dir.to_path_buf(),
                }
                .into());
            }
        }

        if self.filesystem.exists(target_dir) && !self.filesystem.is_dir(target_dir) {
            return Err(ApplicationError::fs(target_dir, "exists and is not a directory").into());
        }

        Ok(())
    }

    /// The nearest existing ancestor of the target must accept new entries.
    fn preflight(&self, target_dir: &Path) -> QfgResult<()> {
        for dir in target_dir.ancestors() {
            let dir = if dir.as_os_str().is_empty() {
                Path::new(".")
            } else {
                dir
            };

            if self.filesystem.exists(dir) {
                return if self.filesystem.is_writable(dir) {
                    Ok(())
                } else {
                    Err(ApplicationError::fs(dir, "directory is not writable").into())
                };
            }
        }

        Err(ApplicationError::fs(target_dir, "no existing ancestor directory").into())
    }

    fn write_all(
        &self,
        root: &Path,
        files: &[RenderedFile],
        config_path: &Path,
        config_raw: &str,
    ) -> QfgResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(files.len() + 1);

        let pending_from = |index: usize| -> Vec<PathBuf> {
            files[index..]
                .iter()
                .map(|f| f.path.clone())
                .chain(std::iter::once(config_path.to_path_buf()))
                .collect()
        };

        if let Err(e) = self.filesystem.create_dir_all(root) {
            return Err(partial(root, e, written, pending_from(0)));
        }

        for (index, file) in files.iter().enumerate() {
            if let Err(e) = self.write_one(file) {
                warn!(path = %file.path.display(), error = %e, "Write failed");
                return Err(partial(&file.path, e, written, pending_from(index + 1)));
            }
            written.push(file.path.clone());
        }

        if let Err(e) = self.filesystem.write_file(config_path, config_raw) {
            return Err(partial(config_path, e, written, Vec::new()));
        }
        written.push(config_path.to_path_buf());

        Ok(written)
    }

    fn write_one(&self, file: &RenderedFile) -> QfgResult<()> {
        if let Some(parent) = file.path.parent() {
            self.filesystem.create_dir_all(parent)?;
        }
        self.filesystem.write_file(&file.path, &file.content)?;
        if file.permissions.executable_flag() {
            self.filesystem.set_permissions(&file.path, true)?;
        }
        Ok(())
    }
}

fn partial(failed: &Path, cause: QfgError, written: Vec<PathBuf>, pending: Vec<PathBuf>) -> QfgError {
    ApplicationError::PartialWrite {
        failed: failed.to_path_buf(),
        reason: cause.to_string(),
        written,
        pending,
    }
    .into()
}
