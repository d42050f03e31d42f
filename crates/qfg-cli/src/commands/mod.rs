//! Command handlers. Each translates parsed arguments into one core service
//! call and renders the result; no generation rules live here.

pub mod add_page;
pub mod completions;
pub mod config;
pub mod init;
pub mod validate;

use qfg_adapters::{LocalFilesystem, registry};
use qfg_core::{
    application::{ProjectHandle, WorkspaceResolver, ports::TemplateRegistry},
    domain::DriverSelection,
};

use crate::{
    cli::{DriverArg, GlobalArgs},
    config::AppConfig,
    error::{CliResult, IntoCli},
    prompt::Prompter,
};

/// Locate the project the command applies to and load its Config.
pub(crate) fn open_project(global: &GlobalArgs) -> CliResult<ProjectHandle> {
    let start = global
        .start_dir()
        .with_cli_context(|| "cannot determine the current directory")?;
    let resolver = WorkspaceResolver::new(Box::new(LocalFilesystem::new()));
    Ok(resolver.load_project(&start, global.project.as_deref())?)
}

/// The template registry configured for this run.
pub(crate) fn open_registry(config: &AppConfig) -> CliResult<Box<dyn TemplateRegistry>> {
    Ok(registry::open(config.templates.dir.as_deref())?)
}

/// The driver an added artifact targets.
///
/// Only a `both` project without `--driver` is open; an interactive run
/// asks, otherwise the mutator reports the ambiguity.
pub(crate) fn clarify_driver(
    configured: DriverSelection,
    requested: Option<DriverArg>,
    prompter: &Prompter,
    prompt: &str,
) -> CliResult<Option<DriverSelection>> {
    match requested {
        Some(driver) => Ok(Some(driver.into())),
        None if configured == DriverSelection::Both && prompter.is_enabled() => {
            let choices = [
                DriverSelection::Selenium,
                DriverSelection::Playwright,
                DriverSelection::Both,
            ];
            Ok(Some(prompter.select(prompt, &choices, 0)?))
        }
        None => Ok(None),
    }
}
