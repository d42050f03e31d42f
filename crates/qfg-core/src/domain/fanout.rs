//! Driver fan-out: one logical artifact becomes one physical variant per
//! selected driver.
//!
//! Selenium files live in `pages/` and `tests/` with suffix-free names,
//! Playwright files in `pages_pw/` and `tests_pw/` with a `_pw` suffix. The
//! two layouts are kept apart on purpose so a `both` project can grow either
//! side independently. API tests ignore the driver entirely.

use crate::domain::entities::artifact::Artifact;
use crate::domain::entities::common::RelativePath;
use crate::domain::entities::config::Settings;
use crate::domain::entities::registry_file::RegistryFormat;
use crate::domain::entities::write_set::WriteOp;
use crate::domain::error::PlanError;
use crate::domain::value_objects::{ArtifactKind, Driver, DriverSelection, TestType};

/// Directory and file naming for one driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverLayout {
    pub driver: Driver,
    pub pages_dir: &'static str,
    pub tests_dir: &'static str,
    suffix: &'static str,
}

impl DriverLayout {
    pub const fn of(driver: Driver) -> Self {
        match driver {
            Driver::Selenium => Self {
                driver,
                pages_dir: "pages",
                tests_dir: "tests",
                suffix: "",
            },
            Driver::Playwright => Self {
                driver,
                pages_dir: "pages_pw",
                tests_dir: "tests_pw",
                suffix: "_pw",
            },
        }
    }

    pub fn page_path(&self, module: &str) -> String {
        format!("{}/{module}_page{}.py", self.pages_dir, self.suffix)
    }

    pub fn test_path(&self, module: &str) -> String {
        format!("{}/test_{module}{}.py", self.tests_dir, self.suffix)
    }

    pub fn page_index_path(&self) -> String {
        format!("{}/__init__.py", self.pages_dir)
    }

    /// The locator collection; Selenium only.
    pub fn locators_path(&self) -> Option<String> {
        match self.driver {
            Driver::Selenium => Some(format!("{}/locators.py", self.pages_dir)),
            Driver::Playwright => None,
        }
    }

    fn page_key(&self, settings: &Settings) -> &'static str {
        match (self.driver, settings.playwright_async) {
            (Driver::Selenium, _) => "selenium/page",
            (Driver::Playwright, true) => "playwright/page-async",
            (Driver::Playwright, false) => "playwright/page-sync",
        }
    }

    fn test_key(&self, settings: &Settings) -> &'static str {
        match (self.driver, settings.playwright_async) {
            (Driver::Selenium, _) => "selenium/test",
            (Driver::Playwright, true) => "playwright/test-async",
            (Driver::Playwright, false) => "playwright/test-sync",
        }
    }

    fn page_index_entry_key(&self) -> &'static str {
        match self.driver {
            Driver::Selenium => "selenium/page-index-entry",
            Driver::Playwright => "playwright/page-index-entry",
        }
    }
}

pub const API_TEST_KEY: &str = "api/test";
pub const LOCATORS_ENTRY_KEY: &str = "selenium/locators-entry";

/// Path of the driver-independent API test for `module`.
pub fn api_test_path(module: &str) -> String {
    format!("tests/test_{module}_api.py")
}

/// Expand `artifact` into write operations for `drivers`.
///
/// Selenium operations precede Playwright ones. Pages produce a create plus
/// registry appends; UI tests a create per driver; API tests a single create.
pub fn fan_out(
    artifact: &Artifact,
    drivers: DriverSelection,
    settings: &Settings,
) -> Result<Vec<WriteOp>, PlanError> {
    let module = artifact.module();

    if artifact.kind() == ArtifactKind::Test && artifact.test_type() == TestType::Api {
        return Ok(vec![WriteOp::Create {
            path: RelativePath::try_new(api_test_path(module))?,
            template_key: API_TEST_KEY,
        }]);
    }

    let mut ops = Vec::new();
    for driver in drivers.drivers() {
        let layout = DriverLayout::of(*driver);

        match artifact.kind() {
            ArtifactKind::Page => {
                ops.push(WriteOp::Create {
                    path: RelativePath::try_new(layout.page_path(module))?,
                    template_key: layout.page_key(settings),
                });
                ops.push(WriteOp::Append {
                    path: RelativePath::try_new(layout.page_index_path())?,
                    registry: RegistryFormat::PageIndex,
                    entry_name: RegistryFormat::PageIndex.entry_name(artifact.class_name()),
                    template_key: layout.page_index_entry_key(),
                });
                if let Some(locators) = layout.locators_path() {
                    ops.push(WriteOp::Append {
                        path: RelativePath::try_new(locators)?,
                        registry: RegistryFormat::Locators,
                        entry_name: RegistryFormat::Locators.entry_name(artifact.class_name()),
                        template_key: LOCATORS_ENTRY_KEY,
                    });
                }
            }
            ArtifactKind::Test => ops.push(WriteOp::Create {
                path: RelativePath::try_new(layout.test_path(module))?,
                template_key: layout.test_key(settings),
            }),
        }
    }

    Ok(ops)
}
