//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use qfg_core::domain::{Browser, DriverSelection, Feature, LoggingMode, TestDataFormat, TestType};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "qfg",
    bin_name = "qfg",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "QA framework generator for pytest with Selenium and Playwright",
    long_about = "qfg generates pytest test automation frameworks driven by \
                  Selenium, Playwright or both, and grows them one page \
                  object or test at a time.",
    after_help = "EXAMPLES:\n\
        \x20 qfg init --name shop --base-url https://shop.test --driver both\n\
        \x20 qfg add-page login --url /login --driver selenium\n\
        \x20 qfg add-test checkout --type api\n\
        \x20 qfg validate\n\
        \x20 qfg completions bash > /usr/share/bash-completion/completions/qfg",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a new test framework project.
    #[command(
        about = "Create a new test framework project",
        after_help = "EXAMPLES:\n\
            \x20 qfg init --name shop --base-url https://shop.test --driver selenium --browser chrome\n\
            \x20 qfg init --name shop --driver playwright --playwright-sync --no-feature docker\n\
            \x20 qfg init --name shop --driver both -d ~/src --dry-run"
    )]
    Init(InitArgs),

    /// Add a page object to an existing project.
    #[command(
        about = "Add a page object",
        after_help = "EXAMPLES:\n\
            \x20 qfg add-page login --url /login\n\
            \x20 qfg add-page \"Checkout Summary\" --driver playwright"
    )]
    AddPage(AddPageArgs),

    /// Add a test module to an existing project.
    #[command(
        about = "Add a test module",
        after_help = "EXAMPLES:\n\
            \x20 qfg add-test login\n\
            \x20 qfg add-test users --type api"
    )]
    AddTest(AddTestArgs),

    /// Inspect the project configuration.
    #[command(
        about = "Show project configuration",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 qfg config show\n\
            \x20 qfg config get driver.type\n\
            \x20 qfg config path --tool"
    )]
    Config(ConfigCommands),

    /// Check a project against the layout qfg generates.
    #[command(
        about = "Validate project structure",
        after_help = "EXAMPLES:\n\
            \x20 qfg validate\n\
            \x20 qfg validate -C path/to/project --output-format json"
    )]
    Validate,

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 qfg completions bash > ~/.local/share/bash-completion/completions/qfg\n\
            \x20 qfg completions zsh  > ~/.zfunc/_qfg\n\
            \x20 qfg completions fish > ~/.config/fish/completions/qfg.fish"
    )]
    Completions(CompletionsArgs),
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `qfg init`.
#[derive(Debug, Default, Args)]
pub struct InitArgs {
    /// Human-readable project name.
    #[arg(long = "name", value_name = "NAME", help = "Project name")]
    pub name: Option<String>,

    /// Base URL of the application under test.
    #[arg(long = "base-url", value_name = "URL", help = "Base URL under test")]
    pub base_url: Option<String>,

    /// Which browser automation library to generate for.
    #[arg(long = "driver", value_enum, help = "Driver selection")]
    pub driver: Option<DriverArg>,

    /// Browsers to run Selenium tests against.
    #[arg(
        long = "browser",
        value_enum,
        value_name = "BROWSER",
        help = "Browser to support (repeatable)"
    )]
    pub browsers: Vec<BrowserArg>,

    /// Optional features to switch on.
    #[arg(
        long = "feature",
        value_enum,
        value_name = "FEATURE",
        help = "Enable a feature (repeatable)"
    )]
    pub features: Vec<FeatureArg>,

    /// Default-on features to switch off.
    #[arg(
        long = "no-feature",
        value_enum,
        value_name = "FEATURE",
        help = "Disable a feature (repeatable)"
    )]
    pub no_features: Vec<FeatureArg>,

    /// Logging output of the generated framework.
    #[arg(long = "logging-mode", value_enum, help = "Generated logger output")]
    pub logging_mode: Option<LoggingModeArg>,

    /// Test data file format.
    #[arg(long = "test-data-format", value_enum, help = "Test data format")]
    pub test_data_format: Option<DataFormatArg>,

    /// Generate synchronous Playwright code instead of async.
    #[arg(long = "playwright-sync", help = "Use the sync Playwright API")]
    pub playwright_sync: bool,

    /// Parent directory; the project lands in `<DIR>/<project slug>`.
    #[arg(
        short = 'd',
        long = "directory",
        value_name = "DIR",
        help = "Parent directory for the project"
    )]
    pub directory: Option<PathBuf>,

    /// Regenerate over an existing project or non-empty directory.
    #[arg(short = 'f', long = "force", help = "Overwrite existing files")]
    pub force: bool,

    /// Show the plan without writing.
    #[arg(long = "dry-run", help = "Show what would be created without creating")]
    pub dry_run: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long = "yes", help = "Skip confirmation")]
    pub yes: bool,
}

// ── add-page / add-test ───────────────────────────────────────────────────────

/// Arguments for `qfg add-page`.
#[derive(Debug, Args)]
pub struct AddPageArgs {
    /// Page name, e.g. `login` or `"Checkout Summary"`.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// URL path of the page, relative to the base URL.
    #[arg(long = "url", value_name = "PATH", help = "URL path, e.g. /login")]
    pub url: Option<String>,

    /// Driver(s) to generate the page for.
    #[arg(long = "driver", value_enum, help = "Target driver")]
    pub driver: Option<DriverArg>,
}

/// Arguments for `qfg add-test`.
#[derive(Debug, Args)]
pub struct AddTestArgs {
    /// Test name, e.g. `login`.
    #[arg(value_name = "NAME")]
    pub name: String,

    #[arg(long = "type", value_enum, help = "Test type")]
    pub test_type: Option<TestTypeArg>,

    /// Driver(s) for a UI test.
    #[arg(long = "driver", value_enum, help = "Target driver (UI tests)")]
    pub driver: Option<DriverArg>,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `qfg config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the whole configuration.
    Show {
        /// Show qfg's own settings instead of the project's.
        #[arg(long = "tool")]
        tool: bool,
    },
    /// Print the value of a dotted key, e.g. `driver.type`.
    Get {
        key: String,
        /// Read qfg's own settings instead of the project's.
        #[arg(long = "tool")]
        tool: bool,
    },
    /// Print the path of the configuration file.
    Path {
        /// Print qfg's own config path instead of the project's.
        #[arg(long = "tool")]
        tool: bool,
    },
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `qfg completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── value enums ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DriverArg {
    Selenium,
    #[value(alias = "pw")]
    Playwright,
    Both,
}

impl From<DriverArg> for DriverSelection {
    fn from(arg: DriverArg) -> Self {
        match arg {
            DriverArg::Selenium => Self::Selenium,
            DriverArg::Playwright => Self::Playwright,
            DriverArg::Both => Self::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowserArg {
    Chrome,
    Firefox,
    #[value(alias = "msedge")]
    Edge,
    Chromium,
    Webkit,
}

impl From<BrowserArg> for Browser {
    fn from(arg: BrowserArg) -> Self {
        match arg {
            BrowserArg::Chrome => Self::Chrome,
            BrowserArg::Firefox => Self::Firefox,
            BrowserArg::Edge => Self::Edge,
            BrowserArg::Chromium => Self::Chromium,
            BrowserArg::Webkit => Self::Webkit,
        }
    }
}

/// Optional framework features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "snake_case")]
pub enum FeatureArg {
    Docker,
    #[value(alias = "ci")]
    CiCd,
    Allure,
    #[value(alias = "quality")]
    QualityTools,
    PreCommit,
    Parallel,
    #[value(alias = "retry")]
    FlakyRetry,
    #[value(alias = "api")]
    ApiTesting,
}

impl From<FeatureArg> for Feature {
    fn from(arg: FeatureArg) -> Self {
        match arg {
            FeatureArg::Docker => Self::Docker,
            FeatureArg::CiCd => Self::CiCd,
            FeatureArg::Allure => Self::Allure,
            FeatureArg::QualityTools => Self::QualityTools,
            FeatureArg::PreCommit => Self::PreCommit,
            FeatureArg::Parallel => Self::Parallel,
            FeatureArg::FlakyRetry => Self::FlakyRetry,
            FeatureArg::ApiTesting => Self::ApiTesting,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LoggingModeArg {
    Json,
    Console,
    Both,
}

impl From<LoggingModeArg> for LoggingMode {
    fn from(arg: LoggingModeArg) -> Self {
        match arg {
            LoggingModeArg::Json => Self::Json,
            LoggingModeArg::Console => Self::Console,
            LoggingModeArg::Both => Self::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DataFormatArg {
    #[value(alias = "yml")]
    Yaml,
    Json,
}

impl From<DataFormatArg> for TestDataFormat {
    fn from(arg: DataFormatArg) -> Self {
        match arg {
            DataFormatArg::Yaml => Self::Yaml,
            DataFormatArg::Json => Self::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TestTypeArg {
    Ui,
    Api,
}

impl From<TestTypeArg> for TestType {
    fn from(arg: TestTypeArg) -> Self {
        match arg {
            TestTypeArg::Ui => Self::Ui,
            TestTypeArg::Api => Self::Api,
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn init_flags_parse() {
        let cli = Cli::parse_from([
            "qfg",
            "init",
            "--name",
            "Shop",
            "--driver",
            "both",
            "--browser",
            "chrome",
            "--browser",
            "firefox",
            "--feature",
            "api",
            "--no-feature",
            "docker",
            "--playwright-sync",
            "-d",
            "/tmp/work",
        ]);

        let Commands::Init(args) = cli.command else {
            panic!("expected init");
        };
        assert_eq!(args.name.as_deref(), Some("Shop"));
        assert_eq!(args.driver, Some(DriverArg::Both));
        assert_eq!(args.browsers, vec![BrowserArg::Chrome, BrowserArg::Firefox]);
        assert_eq!(args.features, vec![FeatureArg::ApiTesting]);
        assert_eq!(args.no_features, vec![FeatureArg::Docker]);
        assert!(args.playwright_sync);
        assert_eq!(args.directory, Some(PathBuf::from("/tmp/work")));
    }

    #[test]
    fn feature_names_match_config_keys() {
        for feature in Feature::ALL {
            let arg = FeatureArg::from_str(feature.as_str(), false).unwrap();
            assert_eq!(Feature::from(arg), *feature);
        }
    }

    #[test]
    fn global_flags_work_after_the_subcommand() {
        let cli = Cli::parse_from([
            "qfg",
            "add-page",
            "login",
            "--url",
            "/login",
            "-C",
            "/p",
            "--project",
            "web",
            "--no-interactive",
        ]);
        assert_eq!(cli.global.project_dir, Some(PathBuf::from("/p")));
        assert_eq!(cli.global.project.as_deref(), Some("web"));
        assert!(cli.global.no_interactive);

        let Commands::AddPage(args) = cli.command else {
            panic!("expected add-page");
        };
        assert_eq!(args.url.as_deref(), Some("/login"));
    }

    #[test]
    fn add_test_type_parses() {
        let cli = Cli::parse_from(["qfg", "add-test", "users", "--type", "api"]);
        let Commands::AddTest(args) = cli.command else {
            panic!("expected add-test");
        };
        assert_eq!(args.test_type.map(TestType::from), Some(TestType::Api));
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["qfg", "-q", "-v", "validate"]).is_err());
    }
}
