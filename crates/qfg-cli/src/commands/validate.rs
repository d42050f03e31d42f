//! `qfg validate`: check a project against the generated layout.

use tracing::instrument;

use qfg_adapters::LocalFilesystem;
use qfg_core::application::{ProjectValidator, WorkspaceResolver};

use crate::{
    cli::GlobalArgs,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

/// Warnings are printed but never fail the command.
#[instrument(skip_all)]
pub fn execute(global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let start = global
        .start_dir()
        .with_cli_context(|| "cannot determine the current directory")?;

    // Only the root is needed: a broken Config is the validator's finding,
    // not a load error.
    let root = WorkspaceResolver::new(Box::new(LocalFilesystem::new()))
        .project_root(&start, global.project.as_deref())?;

    let report = ProjectValidator::new(Box::new(LocalFilesystem::new())).validate(&root)?;
    output.report(&report, &root, global.verbose > 0)?;

    let failures = report.failures().count();
    if failures > 0 {
        return Err(CliError::ValidationFailed { failures });
    }

    let warnings = report.warnings().count();
    if warnings > 0 {
        output.success(&format!(
            "{} is valid ({warnings} warning(s))",
            root.display()
        ))?;
    } else {
        output.success(&format!("{} is valid", root.display()))?;
    }
    Ok(())
}
