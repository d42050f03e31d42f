//! Template bodies compiled into the binary.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use qfg_core::{
    application::ports::{RegistryVersion, TemplateBody, TemplateRegistry},
    domain::{ConfigView, PlanError},
    error::QfgResult,
};

use super::render::render_placeholders;

/// Version of the bundled template set. Bump when a body changes meaning.
pub const BUILTIN_VERSION: &str = "1";

macro_rules! bundled {
    ($($key:literal),* $(,)?) => {
        &[$(($key, include_str!(concat!("../../templates/", $key, ".tmpl")))),*]
    };
}

static BODIES: &[(&str, &str)] = bundled![
    // base
    "base/gitignore",
    "base/readme",
    "base/package-init",
    "base/framework-init",
    "base/utils-init",
    "base/config-loader",
    "base/data-loader-yaml",
    "base/data-loader-json",
    "base/logger-json",
    "base/logger-console",
    "base/logger-both",
    "base/pytest-ini",
    "base/requirements",
    "base/test-data-yaml",
    "base/test-data-json",
    // selenium
    "selenium/conftest",
    "selenium/page-index",
    "selenium/base-page",
    "selenium/locators",
    "selenium/tests-init",
    "selenium/models-init",
    "selenium/locator-model",
    "selenium/page",
    "selenium/test",
    "selenium/page-index-entry",
    "selenium/locators-entry",
    // playwright
    "playwright/page-index",
    "playwright/base-page-async",
    "playwright/base-page-sync",
    "playwright/tests-init",
    "playwright/page-async",
    "playwright/page-sync",
    "playwright/test-async",
    "playwright/test-sync",
    "playwright/page-index-entry",
    "playwright-conftest/conftest-async",
    "playwright-conftest/conftest-sync",
    // features
    "docker/dockerfile",
    "docker/compose",
    "ci/github-actions",
    "allure/categories",
    "allure/environment",
    "quality-tools/flake8",
    "quality-tools/pyproject",
    "pre-commit/config",
    "parallel/run-script",
    "flaky-retry/retry-helper",
    "api/package-init",
    "api/client",
    "api/test",
];

static INDEX: LazyLock<BTreeMap<&'static str, &'static str>> =
    LazyLock::new(|| BODIES.iter().copied().collect());

/// The registry every install has.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRegistry;

impl BuiltinRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Every bundled key, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        INDEX.keys().copied()
    }

    pub(crate) fn body(&self, key: &str) -> Option<&'static str> {
        INDEX.get(key).copied()
    }
}

impl TemplateRegistry for BuiltinRegistry {
    fn version(&self) -> RegistryVersion {
        RegistryVersion::new(BUILTIN_VERSION)
    }

    fn resolve(&self, key: &str, version: &RegistryVersion) -> Result<TemplateBody, PlanError> {
        self.body(key)
            .filter(|_| version.as_str() == BUILTIN_VERSION)
            .map(|content| TemplateBody::new(key, content))
            .ok_or_else(|| PlanError::UnknownTemplateKey {
                key: key.to_string(),
                version: version.to_string(),
            })
    }

    fn render(&self, body: &TemplateBody, view: &ConfigView) -> QfgResult<String> {
        render_placeholders(body, view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_against_its_own_version_only() {
        let registry = BuiltinRegistry::new();
        assert!(registry.resolve("base/readme", &registry.version()).is_ok());
        assert!(matches!(
            registry.resolve("base/readme", &RegistryVersion::new("2")),
            Err(PlanError::UnknownTemplateKey { .. })
        ));
        assert!(matches!(
            registry.resolve("base/nope", &registry.version()),
            Err(PlanError::UnknownTemplateKey { .. })
        ));
    }

    #[test]
    fn keys_are_unique() {
        assert_eq!(BuiltinRegistry::new().keys().count(), BODIES.len());
    }

    #[test]
    fn page_indexes_list_the_seeded_example() {
        use qfg_core::domain::RegistryFormat;

        for key in ["selenium/page-index", "playwright/page-index"] {
            let body = BuiltinRegistry::new().body(key).unwrap();
            assert_eq!(
                RegistryFormat::PageIndex.entries(body),
                vec!["BasePage", "ExamplePage"],
                "{key}"
            );
        }
        let locators = BuiltinRegistry::new().body("selenium/locators").unwrap();
        assert_eq!(
            RegistryFormat::Locators.entries(locators),
            vec!["ExamplePageLocators"]
        );
    }

    #[test]
    fn locator_blocks_use_the_typed_model() {
        let registry = BuiltinRegistry::new();
        let collection = registry.body("selenium/locators").unwrap();
        assert!(collection.contains("from framework.models.locator import Locator"));
        assert!(collection.contains("HEADING = Locator(By.TAG_NAME, \"h1\")"));
        assert!(registry.body("selenium/locators-entry").unwrap().contains("Locator("));
        assert!(registry.body("selenium/locator-model").unwrap().contains("class Locator:"));
        assert!(registry.body("selenium/base-page").unwrap().contains("to_locator_tuple"));
    }
}
