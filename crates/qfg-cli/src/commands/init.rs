//! `qfg init`: generate a new framework project.
//!
//! Dispatch sequence:
//! 1. Resolve every decision from flags, tool defaults, or prompts
//! 2. Build and validate the project Config
//! 3. `--dry-run`: print the plan and stop
//! 4. Confirm unless `--yes` (interactive only)
//! 5. Generate via `ScaffoldService`
//! 6. Print next steps

use std::path::Path;
use std::str::FromStr;

use serde_json::json;
use tracing::{debug, instrument};

use qfg_adapters::LocalFilesystem;
use qfg_core::{
    application::ScaffoldService,
    domain::{
        Browser, Config, ConfigError, Driver, DriverSelection, Feature, FeatureFlags, Settings,
        project_slug,
    },
    error::QfgError,
};

use crate::{
    cli::{GlobalArgs, InitArgs},
    commands::open_registry,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
    prompt::Prompter,
};

const SELENIUM_BROWSERS: &[Browser] = &[Browser::Chrome, Browser::Firefox, Browser::Edge];
const DRIVER_CHOICES: &[DriverSelection] = &[
    DriverSelection::Selenium,
    DriverSelection::Playwright,
    DriverSelection::Both,
];

#[instrument(skip_all)]
pub fn execute(
    args: InitArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let prompter = Prompter::new(&global);

    // 1-2. Decisions and Config
    let project = build_config(&args, &config, &prompter)?;
    let base_dir = match &args.directory {
        Some(dir) => dir.clone(),
        None => global
            .start_dir()
            .with_cli_context(|| "cannot determine the current directory")?,
    };
    let target = base_dir.join(project_slug(project.project_name()));
    debug!(target = %target.display(), "Target resolved");

    let service = ScaffoldService::new(open_registry(&config)?, Box::new(LocalFilesystem::new()));

    // 3. Dry run: describe but do not write.
    if args.dry_run {
        let plan = service.preview(&project)?;
        output.info(&format!(
            "Dry run: would create {} files in {}",
            plan.len() + 1,
            target.display()
        ))?;
        output.plan(&plan)?;
        return Ok(());
    }

    // 4. Confirm
    if prompter.is_enabled() && !args.yes {
        show_summary(&project, &target, &output)?;
        if !prompter.confirm("Generate the project?", true)? {
            return Err(CliError::Cancelled);
        }
    }

    // 5. Generate
    output.header(&format!("Creating '{}'...", project.project_name()))?;
    let report = service.init(&project, &target, args.force)?;

    output.json(&json!({
        "root": report.root.display().to_string(),
        "files": report
            .written
            .iter()
            .map(|p| relative(p, &report.root))
            .collect::<Vec<_>>(),
    }))?;
    output.success(&format!(
        "Project '{}' created with {} files",
        project.project_name(),
        report.written.len()
    ))?;

    // 6. Next steps
    if !output.is_quiet() {
        output.print("")?;
        output.print("Next steps:")?;
        output.print(&format!("  cd {}", target.display()))?;
        output.print("  pip install -r requirements.txt")?;
        if project.includes(Driver::Playwright) {
            output.print("  playwright install")?;
        }
        output.print("  qfg add-page login --url /login")?;
        output.print("  qfg add-test login")?;
    }

    Ok(())
}

/// Resolve every init decision, then build the Config.
///
/// Missing answers are prompted for when the prompter is enabled; otherwise
/// they are collected and reported together.
fn build_config(args: &InitArgs, defaults: &AppConfig, prompter: &Prompter) -> CliResult<Config> {
    let mut unresolved = Vec::new();

    let name = match &args.name {
        Some(name) => Some(name.clone()),
        None if prompter.is_enabled() => Some(prompter.text("Project name", None)?),
        None => {
            unresolved.push("name".to_string());
            None
        }
    };

    let base_url = match &args.base_url {
        Some(url) => url.clone(),
        None if prompter.is_enabled() => {
            prompter.text("Base URL", Some(&defaults.defaults.base_url))?
        }
        None => defaults.defaults.base_url.clone(),
    };

    let configured_driver = defaults
        .defaults
        .driver
        .as_deref()
        .map(DriverSelection::from_str)
        .transpose()
        .map_err(config_error)?;
    let driver = match args.driver.map(DriverSelection::from).or(configured_driver) {
        Some(driver) => Some(driver),
        None if prompter.is_enabled() => {
            Some(prompter.select("Which driver(s) do you want to use?", DRIVER_CHOICES, 0)?)
        }
        None => {
            unresolved.push("driver".to_string());
            None
        }
    };

    let (Some(name), Some(driver)) = (name, driver) else {
        return Err(CliError::UnresolvedDecisions {
            decisions: unresolved,
        });
    };

    let browsers = resolve_browsers(args, defaults, driver, prompter)?;
    let features = resolve_features(args, prompter)?;

    let mut settings = Settings {
        playwright_async: !args.playwright_sync,
        ..Settings::default()
    };
    if let Some(mode) = args.logging_mode {
        settings.logging_mode = mode.into();
    }
    if let Some(format) = args.test_data_format {
        settings.test_data_format = format.into();
    }

    Ok(Config::builder(name, base_url, driver)
        .browsers(browsers)
        .features(features)
        .settings(settings)
        .created_at(chrono::Utc::now())
        .build()
        .map_err(QfgError::from)?)
}

/// Browsers only matter to Selenium; a Playwright-only project keeps the
/// explicit list (the validator warns about it) and defaults to none.
fn resolve_browsers(
    args: &InitArgs,
    defaults: &AppConfig,
    driver: DriverSelection,
    prompter: &Prompter,
) -> CliResult<Vec<Browser>> {
    if !args.browsers.is_empty() {
        return Ok(args.browsers.iter().copied().map(Browser::from).collect());
    }
    if driver == DriverSelection::Playwright {
        return Ok(Vec::new());
    }

    let configured = defaults
        .defaults
        .browsers
        .iter()
        .map(|b| Browser::from_str(b))
        .collect::<Result<Vec<_>, _>>()
        .map_err(config_error)?;

    if prompter.is_enabled() {
        let checked: Vec<bool> = SELENIUM_BROWSERS
            .iter()
            .map(|b| configured.contains(b))
            .collect();
        return prompter.multi_select("Select browsers to support", SELENIUM_BROWSERS, &checked);
    }
    Ok(configured)
}

/// Defaults first, then `--feature`, then `--no-feature`. Without any flag,
/// an interactive run asks.
fn resolve_features(args: &InitArgs, prompter: &Prompter) -> CliResult<FeatureFlags> {
    let defaults: FeatureFlags = Feature::ALL
        .iter()
        .copied()
        .filter(Feature::on_by_default)
        .collect();

    let mut flags = if args.features.is_empty() && args.no_features.is_empty() && prompter.is_enabled()
    {
        let checked: Vec<bool> = Feature::ALL.iter().map(|f| defaults.is_enabled(*f)).collect();
        let labels: Vec<FeatureLabel> = Feature::ALL.iter().copied().map(FeatureLabel).collect();
        prompter
            .multi_select("Select features to include", &labels, &checked)?
            .into_iter()
            .map(|l| l.0)
            .collect()
    } else {
        defaults
    };

    for feature in &args.features {
        flags = flags.with(Feature::from(*feature), true);
    }
    for feature in &args.no_features {
        flags = flags.with(Feature::from(*feature), false);
    }
    Ok(flags)
}

/// Prompt label for a feature.
#[derive(Clone, Copy)]
struct FeatureLabel(Feature);

impl std::fmt::Display for FeatureLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0.description())
    }
}

fn config_error(e: ConfigError) -> CliError {
    CliError::ConfigError {
        message: format!("invalid default in qfg configuration: {e}"),
        source: Some(Box::new(e)),
    }
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn show_summary(config: &Config, target: &Path, out: &OutputManager) -> CliResult<()> {
    out.header("Configuration")?;
    out.print(&format!("  Project:   {}", config.project_name()))?;
    out.print(&format!("  Base URL:  {}", config.base_url()))?;
    out.print(&format!("  Driver:    {}", config.driver_selection()))?;
    if !config.browsers().is_empty() {
        let browsers: Vec<&str> = config.browsers().iter().map(|b| b.as_str()).collect();
        out.print(&format!("  Browsers:  {}", browsers.join(", ")))?;
    }
    let features: Vec<&str> = config.features().enabled().map(|f| f.as_str()).collect();
    out.print(&format!("  Features:  {}", features.join(", ")))?;
    out.print(&format!("  Location:  {}", target.display()))?;
    out.print("")?;
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{BrowserArg, DataFormatArg, DriverArg, FeatureArg};
    use qfg_core::domain::TestDataFormat;

    fn args(name: Option<&str>, driver: Option<DriverArg>) -> InitArgs {
        InitArgs {
            name: name.map(str::to_string),
            driver,
            ..InitArgs::default()
        }
    }

    #[test]
    fn missing_answers_are_reported_together() {
        let err = build_config(&args(None, None), &AppConfig::default(), &Prompter::disabled())
            .unwrap_err();
        match err {
            CliError::UnresolvedDecisions { decisions } => {
                assert_eq!(decisions, vec!["name", "driver"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn tool_defaults_answer_the_driver() {
        let mut defaults = AppConfig::default();
        defaults.defaults.driver = Some("playwright".into());

        let config = build_config(&args(Some("Shop"), None), &defaults, &Prompter::disabled())
            .unwrap();
        assert_eq!(config.driver_selection(), DriverSelection::Playwright);
        assert!(config.browsers().is_empty());
        assert_eq!(config.base_url(), "https://www.saucedemo.com");
    }

    #[test]
    fn selenium_takes_default_browsers() {
        let config = build_config(
            &args(Some("Shop"), Some(DriverArg::Selenium)),
            &AppConfig::default(),
            &Prompter::disabled(),
        )
        .unwrap();
        assert_eq!(config.browsers(), &[Browser::Chrome]);
    }

    #[test]
    fn flags_shape_features_and_settings() {
        let init = InitArgs {
            browsers: vec![BrowserArg::Firefox, BrowserArg::Chrome],
            features: vec![FeatureArg::ApiTesting],
            no_features: vec![FeatureArg::Docker, FeatureArg::CiCd],
            test_data_format: Some(DataFormatArg::Json),
            playwright_sync: true,
            ..args(Some("Shop"), Some(DriverArg::Both))
        };
        let config = build_config(&init, &AppConfig::default(), &Prompter::disabled()).unwrap();

        assert_eq!(config.browsers(), &[Browser::Firefox, Browser::Chrome]);
        assert!(config.is_enabled(Feature::ApiTesting));
        assert!(config.is_enabled(Feature::Allure));
        assert!(!config.is_enabled(Feature::Docker));
        assert!(!config.is_enabled(Feature::CiCd));
        assert!(!config.is_enabled(Feature::FlakyRetry));
        assert_eq!(config.settings().test_data_format, TestDataFormat::Json);
        assert!(!config.settings().playwright_async);
        assert!(config.created_at().is_some());
    }

    #[test]
    fn bad_default_driver_is_a_config_error() {
        let mut defaults = AppConfig::default();
        defaults.defaults.driver = Some("cypress".into());
        let err = build_config(&args(Some("Shop"), None), &defaults, &Prompter::disabled())
            .unwrap_err();
        assert!(matches!(err, CliError::ConfigError { .. }));
    }

    #[test]
    fn invalid_url_surfaces_the_core_error() {
        let init = InitArgs {
            base_url: Some("not a url".into()),
            ..args(Some("Shop"), Some(DriverArg::Selenium))
        };
        let err = build_config(&init, &AppConfig::default(), &Prompter::disabled()).unwrap_err();
        assert!(matches!(err, CliError::Core(_)));
        assert_eq!(err.exit_code(), 1);
    }
}
