//! `qfg add-page`: add a page object to the current project.

use tracing::instrument;

use qfg_adapters::LocalFilesystem;
use qfg_core::application::{AddRequest, IncrementalMutator};

use crate::{
    cli::{AddPageArgs, GlobalArgs},
    commands::{clarify_driver, open_project, open_registry},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
    prompt::Prompter,
};

#[instrument(skip_all, fields(page = %args.name))]
pub fn execute(
    args: AddPageArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let prompter = Prompter::new(&global);
    let project = open_project(&global)?;

    let driver = clarify_driver(
        project.config.driver_selection(),
        args.driver,
        &prompter,
        "Which driver should this page object target?",
    )?;

    let url = match args.url {
        Some(url) => Some(url),
        None if prompter.is_enabled() => Some(prompter.text("Page URL path", Some("/"))?),
        None => None,
    };

    let mut request = AddRequest::page(&args.name);
    if let Some(url) = url {
        request = request.with_url(url);
    }
    if let Some(driver) = driver {
        request = request.with_driver(driver);
    }

    let mutator = IncrementalMutator::new(open_registry(&config)?, Box::new(LocalFilesystem::new()));
    let (set, written) = mutator.add_artifact(&project.config, &project.root, &request)?;

    output.write_set(&set, &project.root, &written)?;
    output.info(&format!(
        "Page object {} added to {}",
        set.artifact().class_name(),
        project.root.display()
    ))?;
    Ok(())
}
