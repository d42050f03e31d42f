//! Static cluster registry.
//!
//! Every generated project is the union of the clusters whose predicate
//! holds for its Config, taken in the order of [`CLUSTER_REGISTRY`]. This
//! table is the single source of truth for which template key lands at which
//! path; the planner and the validator both read it.
//!
//! # Adding a Cluster
//!
//! 1. Add a [`ClusterId`] variant and its `as_str` arm
//! 2. Append a [`ClusterDef`] to [`CLUSTER_REGISTRY`] at its position
//! 3. Ship a body for every new key in each template registry

use crate::domain::entities::config::{Config, Settings};
use crate::domain::value_objects::{Driver, DriverSelection, Feature, LoggingMode, TestDataFormat};
use std::fmt;

// ── Identity ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClusterId {
    Base,
    Selenium,
    Playwright,
    PlaywrightConftest,
    Docker,
    Ci,
    Allure,
    QualityTools,
    PreCommit,
    Parallel,
    FlakyRetry,
    Api,
}

impl ClusterId {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Selenium => "selenium",
            Self::Playwright => "playwright",
            Self::PlaywrightConftest => "playwright-conftest",
            Self::Docker => "docker",
            Self::Ci => "ci",
            Self::Allure => "allure",
            Self::QualityTools => "quality-tools",
            Self::PreCommit => "pre-commit",
            Self::Parallel => "parallel",
            Self::FlakyRetry => "flaky-retry",
            Self::Api => "api",
        }
    }

    /// Structural clusters make up the skeleton every project of a given
    /// driver selection must have. The rest are feature add-ons.
    pub const fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::Base | Self::Selenium | Self::Playwright | Self::PlaywrightConftest
        )
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Definitions ──────────────────────────────────────────────────────────────

/// One `(path, key)` pair of a cluster.
#[derive(Debug, Clone, Copy)]
pub enum ClusterEntry {
    Static {
        path: &'static str,
        key: &'static str,
    },
    /// The key depends on the project settings.
    Variant {
        path: &'static str,
        key: fn(&Settings) -> &'static str,
    },
    /// Path and key both depend on the project settings.
    Derived {
        path: fn(&Settings) -> &'static str,
        key: fn(&Settings) -> &'static str,
    },
}

impl ClusterEntry {
    pub fn path(&self, settings: &Settings) -> &'static str {
        match self {
            Self::Static { path, .. } | Self::Variant { path, .. } => path,
            Self::Derived { path, .. } => path(settings),
        }
    }

    pub fn key(&self, settings: &Settings) -> &'static str {
        match self {
            Self::Static { key, .. } => key,
            Self::Variant { key, .. } | Self::Derived { key, .. } => key(settings),
        }
    }
}

/// Example artifacts a cluster seeds through driver fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seed {
    None,
    /// Example page and UI test for one driver.
    Driver(Driver),
    /// Example API test.
    ApiTest,
}

#[derive(Debug, Clone, Copy)]
pub struct ClusterDef {
    pub id: ClusterId,
    pub predicate: fn(&Config) -> bool,
    pub entries: &'static [ClusterEntry],
    pub seed: Seed,
}

impl ClusterDef {
    pub fn applies_to(&self, config: &Config) -> bool {
        (self.predicate)(config)
    }
}

// ── Predicates ───────────────────────────────────────────────────────────────

fn always(_: &Config) -> bool {
    true
}
fn with_selenium(c: &Config) -> bool {
    c.includes(Driver::Selenium)
}
fn with_playwright(c: &Config) -> bool {
    c.includes(Driver::Playwright)
}
fn playwright_only(c: &Config) -> bool {
    c.driver_selection() == DriverSelection::Playwright
}
fn docker(c: &Config) -> bool {
    c.is_enabled(Feature::Docker)
}
fn ci_cd(c: &Config) -> bool {
    c.is_enabled(Feature::CiCd)
}
fn allure(c: &Config) -> bool {
    c.is_enabled(Feature::Allure)
}
fn quality_tools(c: &Config) -> bool {
    c.is_enabled(Feature::QualityTools)
}
fn pre_commit(c: &Config) -> bool {
    c.is_enabled(Feature::PreCommit)
}
fn parallel(c: &Config) -> bool {
    c.is_enabled(Feature::Parallel)
}
fn flaky_retry(c: &Config) -> bool {
    c.is_enabled(Feature::FlakyRetry)
}
fn api_testing(c: &Config) -> bool {
    c.is_enabled(Feature::ApiTesting)
}

// ── Variant keys ─────────────────────────────────────────────────────────────

fn test_data_key(s: &Settings) -> &'static str {
    match s.test_data_format {
        TestDataFormat::Yaml => "base/test-data-yaml",
        TestDataFormat::Json => "base/test-data-json",
    }
}

fn logger_key(s: &Settings) -> &'static str {
    match s.logging_mode {
        LoggingMode::Json => "base/logger-json",
        LoggingMode::Console => "base/logger-console",
        LoggingMode::Both => "base/logger-both",
    }
}

fn data_loader_key(s: &Settings) -> &'static str {
    match s.test_data_format {
        TestDataFormat::Yaml => "base/data-loader-yaml",
        TestDataFormat::Json => "base/data-loader-json",
    }
}

fn playwright_base_page_key(s: &Settings) -> &'static str {
    if s.playwright_async {
        "playwright/base-page-async"
    } else {
        "playwright/base-page-sync"
    }
}

fn playwright_conftest_key(s: &Settings) -> &'static str {
    if s.playwright_async {
        "playwright-conftest/conftest-async"
    } else {
        "playwright-conftest/conftest-sync"
    }
}

/// Test-data file path; its extension follows `settings.test_data_format`.
pub fn test_data_path(settings: &Settings) -> &'static str {
    match settings.test_data_format {
        TestDataFormat::Yaml => "tests/data/test_data.yaml",
        TestDataFormat::Json => "tests/data/test_data.json",
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

const BASE: &[ClusterEntry] = &[
    ClusterEntry::Static {
        path: ".gitignore",
        key: "base/gitignore",
    },
    ClusterEntry::Static {
        path: "README.md",
        key: "base/readme",
    },
    ClusterEntry::Static {
        path: "__init__.py",
        key: "base/package-init",
    },
    ClusterEntry::Static {
        path: "framework/__init__.py",
        key: "base/framework-init",
    },
    ClusterEntry::Static {
        path: "framework/utils/__init__.py",
        key: "base/utils-init",
    },
    ClusterEntry::Static {
        path: "framework/utils/config_loader.py",
        key: "base/config-loader",
    },
    ClusterEntry::Variant {
        path: "framework/utils/data_loader.py",
        key: data_loader_key,
    },
    ClusterEntry::Variant {
        path: "framework/utils/logger.py",
        key: logger_key,
    },
    ClusterEntry::Static {
        path: "pytest.ini",
        key: "base/pytest-ini",
    },
    ClusterEntry::Static {
        path: "requirements.txt",
        key: "base/requirements",
    },
    ClusterEntry::Derived {
        path: test_data_path,
        key: test_data_key,
    },
];

const SELENIUM: &[ClusterEntry] = &[
    ClusterEntry::Static {
        path: "conftest.py",
        key: "selenium/conftest",
    },
    ClusterEntry::Static {
        path: "framework/models/__init__.py",
        key: "selenium/models-init",
    },
    ClusterEntry::Static {
        path: "framework/models/locator.py",
        key: "selenium/locator-model",
    },
    ClusterEntry::Static {
        path: "pages/__init__.py",
        key: "selenium/page-index",
    },
    ClusterEntry::Static {
        path: "pages/base_page.py",
        key: "selenium/base-page",
    },
    ClusterEntry::Static {
        path: "pages/locators.py",
        key: "selenium/locators",
    },
    ClusterEntry::Static {
        path: "tests/__init__.py",
        key: "selenium/tests-init",
    },
];

const PLAYWRIGHT: &[ClusterEntry] = &[
    ClusterEntry::Static {
        path: "pages_pw/__init__.py",
        key: "playwright/page-index",
    },
    ClusterEntry::Variant {
        path: "pages_pw/base_page_pw.py",
        key: playwright_base_page_key,
    },
    ClusterEntry::Static {
        path: "tests_pw/__init__.py",
        key: "playwright/tests-init",
    },
];

const PLAYWRIGHT_CONFTEST: &[ClusterEntry] = &[ClusterEntry::Variant {
    path: "conftest.py",
    key: playwright_conftest_key,
}];

const DOCKER: &[ClusterEntry] = &[
    ClusterEntry::Static {
        path: "Dockerfile",
        key: "docker/dockerfile",
    },
    ClusterEntry::Static {
        path: "docker-compose.yml",
        key: "docker/compose",
    },
];

const CI: &[ClusterEntry] = &[ClusterEntry::Static {
    path: ".github/workflows/tests.yml",
    key: "ci/github-actions",
}];

const ALLURE: &[ClusterEntry] = &[
    ClusterEntry::Static {
        path: "allure/categories.json",
        key: "allure/categories",
    },
    ClusterEntry::Static {
        path: "allure/environment.properties",
        key: "allure/environment",
    },
];

const QUALITY_TOOLS: &[ClusterEntry] = &[
    ClusterEntry::Static {
        path: ".flake8",
        key: "quality-tools/flake8",
    },
    ClusterEntry::Static {
        path: "pyproject.toml",
        key: "quality-tools/pyproject",
    },
];

const PRE_COMMIT: &[ClusterEntry] = &[ClusterEntry::Static {
    path: ".pre-commit-config.yaml",
    key: "pre-commit/config",
}];

const PARALLEL: &[ClusterEntry] = &[ClusterEntry::Static {
    path: "scripts/run_parallel.sh",
    key: "parallel/run-script",
}];

const FLAKY_RETRY: &[ClusterEntry] = &[ClusterEntry::Static {
    path: "framework/utils/retry.py",
    key: "flaky-retry/retry-helper",
}];

const API: &[ClusterEntry] = &[
    ClusterEntry::Static {
        path: "framework/api/__init__.py",
        key: "api/package-init",
    },
    ClusterEntry::Static {
        path: "framework/api/client.py",
        key: "api/client",
    },
];

/// Every cluster, in generation order.
pub static CLUSTER_REGISTRY: &[ClusterDef] = &[
    ClusterDef {
        id: ClusterId::Base,
        predicate: always,
        entries: BASE,
        seed: Seed::None,
    },
    ClusterDef {
        id: ClusterId::Selenium,
        predicate: with_selenium,
        entries: SELENIUM,
        seed: Seed::Driver(Driver::Selenium),
    },
    ClusterDef {
        id: ClusterId::Playwright,
        predicate: with_playwright,
        entries: PLAYWRIGHT,
        seed: Seed::Driver(Driver::Playwright),
    },
    ClusterDef {
        id: ClusterId::PlaywrightConftest,
        predicate: playwright_only,
        entries: PLAYWRIGHT_CONFTEST,
        seed: Seed::None,
    },
    ClusterDef {
        id: ClusterId::Docker,
        predicate: docker,
        entries: DOCKER,
        seed: Seed::None,
    },
    ClusterDef {
        id: ClusterId::Ci,
        predicate: ci_cd,
        entries: CI,
        seed: Seed::None,
    },
    ClusterDef {
        id: ClusterId::Allure,
        predicate: allure,
        entries: ALLURE,
        seed: Seed::None,
    },
    ClusterDef {
        id: ClusterId::QualityTools,
        predicate: quality_tools,
        entries: QUALITY_TOOLS,
        seed: Seed::None,
    },
    ClusterDef {
        id: ClusterId::PreCommit,
        predicate: pre_commit,
        entries: PRE_COMMIT,
        seed: Seed::None,
    },
    ClusterDef {
        id: ClusterId::Parallel,
        predicate: parallel,
        entries: PARALLEL,
        seed: Seed::None,
    },
    ClusterDef {
        id: ClusterId::FlakyRetry,
        predicate: flaky_retry,
        entries: FLAKY_RETRY,
        seed: Seed::None,
    },
    ClusterDef {
        id: ClusterId::Api,
        predicate: api_testing,
        entries: API,
        seed: Seed::ApiTest,
    },
];

/// Every template key any cluster entry can reference, across all settings.
///
/// Registries use this to check their own completeness.
pub fn all_static_keys() -> Vec<&'static str> {
    let variants: Vec<Settings> = [true, false]
        .into_iter()
        .flat_map(|playwright_async| {
            [LoggingMode::Json, LoggingMode::Console, LoggingMode::Both]
                .into_iter()
                .flat_map(move |logging_mode| {
                    [TestDataFormat::Yaml, TestDataFormat::Json]
                        .into_iter()
                        .map(move |test_data_format| Settings {
                            logging_mode,
                            test_data_format,
                            playwright_async,
                        })
                })
        })
        .collect();

    let mut keys: Vec<&'static str> = CLUSTER_REGISTRY
        .iter()
        .flat_map(|c| c.entries.iter())
        .flat_map(|e| variants.iter().map(move |s| e.key(s)))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_order_is_fixed() {
        let ids: Vec<&str> = CLUSTER_REGISTRY.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(
            ids,
            [
                "base",
                "selenium",
                "playwright",
                "playwright-conftest",
                "docker",
                "ci",
                "allure",
                "quality-tools",
                "pre-commit",
                "parallel",
                "flaky-retry",
                "api"
            ]
        );
    }

    #[test]
    fn variant_keys_follow_settings() {
        let mut settings = Settings::default();
        assert_eq!(test_data_key(&settings), "base/test-data-yaml");
        assert_eq!(test_data_path(&settings), "tests/data/test_data.yaml");
        settings.test_data_format = TestDataFormat::Json;
        settings.playwright_async = false;
        assert_eq!(test_data_key(&settings), "base/test-data-json");
        assert_eq!(test_data_path(&settings), "tests/data/test_data.json");
        assert_eq!(playwright_base_page_key(&settings), "playwright/base-page-sync");
    }

    #[test]
    fn locator_model_ships_with_selenium_only() {
        let paths = |id: ClusterId| -> Vec<&'static str> {
            CLUSTER_REGISTRY
                .iter()
                .filter(|d| d.id == id)
                .flat_map(|d| d.entries.iter())
                .map(|e| e.path(&Settings::default()))
                .collect()
        };
        assert!(paths(ClusterId::Selenium).contains(&"framework/models/locator.py"));
        assert!(paths(ClusterId::Selenium).contains(&"framework/models/__init__.py"));
        assert!(!paths(ClusterId::Playwright).contains(&"framework/models/locator.py"));
    }

    #[test]
    fn conftest_clusters_are_mutually_exclusive() {
        let both = Config::builder("x", "https://x.test", DriverSelection::Both)
            .build()
            .unwrap();
        let pw = Config::builder("x", "https://x.test", DriverSelection::Playwright)
            .build()
            .unwrap();

        let conftest_clusters = |c: &Config| {
            CLUSTER_REGISTRY
                .iter()
                .filter(|d| d.applies_to(c))
                .filter(|d| {
                    d.entries
                        .iter()
                        .any(|e| e.path(&c.settings()) == "conftest.py")
                })
                .count()
        };

        assert_eq!(conftest_clusters(&both), 1);
        assert_eq!(conftest_clusters(&pw), 1);
    }

    #[test]
    fn static_keys_cover_variants() {
        let keys = all_static_keys();
        assert!(keys.contains(&"base/logger-both"));
        assert!(keys.contains(&"playwright-conftest/conftest-sync"));
        assert!(keys.contains(&"base/data-loader-json"));
    }
}
