//! `qfg config`: read the project Config or qfg's own settings.

use serde_json::json;

use crate::{
    cli::{ConfigCommands, GlobalArgs},
    commands::open_project,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Dispatch to the correct config subcommand.
pub fn execute(
    cmd: ConfigCommands,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    match cmd {
        ConfigCommands::Show { tool: true } => {
            output.json(&json!({ "config": &config }))?;
            let serialised = toml::to_string_pretty(&config).map_err(|e| CliError::ConfigError {
                message: format!("Failed to serialise config: {e}"),
                source: Some(Box::new(e)),
            })?;
            output.print(serialised.trim_end())?;
        }

        ConfigCommands::Show { tool: false } => {
            let project = open_project(&global)?;
            let raw = project.config.serialize().map_err(qfg_core::error::QfgError::from)?;
            output.json(&json!({
                "path": project.config_path().display().to_string(),
                "content": raw,
            }))?;
            output.print(raw.trim_end())?;
        }

        ConfigCommands::Get { key, tool } => {
            let value = if tool {
                config.lookup(&key)
            } else {
                open_project(&global)?.config.lookup(&key)
            };
            let value = value.ok_or_else(|| CliError::UnknownKey { key: key.clone() })?;
            output.json(&json!({ "key": key, "value": value }))?;
            output.print(&value)?;
        }

        ConfigCommands::Path { tool: true } => {
            let path = global.config.clone().unwrap_or_else(AppConfig::config_path);
            output.json(&json!({ "path": path.display().to_string() }))?;
            output.print(&path.display().to_string())?;
        }

        ConfigCommands::Path { tool: false } => {
            let path = open_project(&global)?.config_path();
            output.json(&json!({ "path": path.display().to_string() }))?;
            output.print(&path.display().to_string())?;
        }
    }

    Ok(())
}
