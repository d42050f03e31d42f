use super::artifact::Artifact;
use super::config::Config;
use crate::domain::value_objects::{Browser, Driver, DriverSelection, Feature};
use crate::domain::fanout::DriverLayout;
use std::collections::BTreeMap;

/// Variables a template body may reference as `{{NAME}}`.
///
/// Built once per project from the Config, then extended per artifact.
/// Immutable after creation; `with_*` methods return a new view.
///
/// ## Project Variables
///
/// | Variable | Example |
/// |----------|---------|
/// | `PROJECT_NAME` | "Shop Tests" |
/// | `PROJECT_SLUG` | "shop_tests" |
/// | `BASE_URL` | "https://shop.test" |
/// | `DRIVER` | "both" |
/// | `BROWSERS` | "chrome, firefox" |
/// | `DEFAULT_BROWSER` | "chrome" |
/// | `LOGGING_MODE` / `TEST_DATA_FORMAT` | "json" / "yaml" |
/// | `REQUIREMENTS` | one pinned requirement per line |
/// | `TEST_PATHS` | "tests tests_pw" |
/// | `PYTEST_ADDOPTS` | "-v --strict-markers --tb=short -n auto" |
/// | `YEAR` | "2026" |
///
/// ## Artifact Variables
///
/// `MODULE`, `CLASS_NAME`, `DISPLAY_NAME`, `PAGE_URL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigView {
    variables: BTreeMap<String, String>,
}

impl ConfigView {
    pub fn for_project(config: &Config, year: i32) -> Self {
        let mut vars = BTreeMap::new();
        let settings = config.settings();

        vars.insert("PROJECT_NAME".into(), config.project_name().to_string());
        vars.insert("PROJECT_SLUG".into(), project_slug(config.project_name()));
        vars.insert("BASE_URL".into(), config.base_url().to_string());
        vars.insert("DRIVER".into(), config.driver_selection().to_string());
        vars.insert(
            "BROWSERS".into(),
            config
                .browsers()
                .iter()
                .map(Browser::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        );
        vars.insert("DEFAULT_BROWSER".into(), default_browser(config).to_string());
        vars.insert("LOGGING_MODE".into(), settings.logging_mode.to_string());
        vars.insert("TEST_DATA_FORMAT".into(), settings.test_data_format.to_string());
        vars.insert(
            "PLAYWRIGHT_ASYNC".into(),
            if settings.playwright_async { "true" } else { "false" }.into(),
        );
        vars.insert(
            "FEATURES".into(),
            config
                .features()
                .enabled()
                .map(|f| f.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        );
        vars.insert("REQUIREMENTS".into(), requirements(config).join("\n"));
        vars.insert("TEST_PATHS".into(), test_paths(config).join(" "));
        vars.insert("PYTEST_ADDOPTS".into(), pytest_addopts(config));
        vars.insert("YEAR".into(), year.to_string());

        Self { variables: vars }
    }

    /// Add the variables of the artifact being rendered.
    pub fn with_artifact(mut self, artifact: &Artifact, config: &Config) -> Self {
        let url = config.page_url(artifact.url_path().unwrap_or("/"));
        self.variables
            .insert("MODULE".into(), artifact.module().to_string());
        self.variables
            .insert("CLASS_NAME".into(), artifact.class_name().to_string());
        self.variables
            .insert("DISPLAY_NAME".into(), artifact.display_name().to_string());
        self.variables.insert("PAGE_URL".into(), url);
        self
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Importable package name: alphanumeric runs joined by `_`, lowercased.
pub fn project_slug(name: &str) -> String {
    let slug = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_");

    if slug.is_empty() { "project".into() } else { slug }
}

fn default_browser(config: &Config) -> &'static str {
    match (config.browsers().first(), config.driver_selection()) {
        (Some(b), _) => b.as_str(),
        (None, DriverSelection::Playwright) => Browser::Chromium.as_str(),
        (None, _) => Browser::Chrome.as_str(),
    }
}

/// Pinned Python requirements, sorted.
pub fn requirements(config: &Config) -> Vec<&'static str> {
    let mut reqs = vec!["pytest>=7.4,<9", "structlog>=23.1,<25", "pyyaml>=6.0,<7"];

    if config.includes(Driver::Selenium) {
        reqs.push("selenium>=4.14,<5");
    }
    if config.includes(Driver::Playwright) {
        reqs.extend(["playwright>=1.41,<2", "pytest-playwright>=0.4.4,<0.5"]);
        if config.settings().playwright_async {
            reqs.push("pytest-asyncio>=0.23,<1");
        }
    }

    let optional = [
        (Feature::Allure, "allure-pytest>=2.13,<3"),
        (Feature::Parallel, "pytest-xdist>=3.3,<4"),
        (Feature::FlakyRetry, "pytest-retry>=1.5,<2"),
        (Feature::ApiTesting, "requests>=2.31,<3"),
    ];
    reqs.extend(
        optional
            .iter()
            .filter(|(f, _)| config.is_enabled(*f))
            .map(|(_, r)| *r),
    );

    reqs.sort_unstable();
    reqs
}

/// Test directories pytest should collect.
pub fn test_paths(config: &Config) -> Vec<&'static str> {
    let mut paths: Vec<&'static str> = config
        .driver_selection()
        .drivers()
        .iter()
        .map(|d| DriverLayout::of(*d).tests_dir)
        .collect();

    if config.is_enabled(Feature::ApiTesting) && !paths.contains(&"tests") {
        paths.insert(0, "tests");
    }
    paths
}

fn pytest_addopts(config: &Config) -> String {
    let mut opts = vec!["-v", "--strict-markers", "--tb=short"];
    if config.is_enabled(Feature::Parallel) {
        opts.push("-n auto");
    }
    if config.is_enabled(Feature::Allure) {
        opts.push("--alluredir=allure-results");
    }
    if config.is_enabled(Feature::FlakyRetry) {
        opts.push("--retries 2");
    }
    opts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::TestType;

    fn config(driver: DriverSelection) -> Config {
        Config::builder("Shop Tests!", "https://shop.test", driver)
            .browsers([Browser::Firefox, Browser::Chrome])
            .feature(Feature::Parallel, true)
            .feature(Feature::ApiTesting, true)
            .build()
            .unwrap()
    }

    #[test]
    fn project_variables() {
        let view = ConfigView::for_project(&config(DriverSelection::Both), 2026);
        assert_eq!(view.get("PROJECT_SLUG"), Some("shop_tests"));
        assert_eq!(view.get("DRIVER"), Some("both"));
        assert_eq!(view.get("BROWSERS"), Some("firefox, chrome"));
        assert_eq!(view.get("DEFAULT_BROWSER"), Some("firefox"));
        assert_eq!(view.get("TEST_PATHS"), Some("tests tests_pw"));
        assert_eq!(
            view.get("PYTEST_ADDOPTS"),
            Some("-v --strict-markers --tb=short -n auto")
        );
        assert_eq!(view.get("YEAR"), Some("2026"));
    }

    #[test]
    fn playwright_only_collects_api_tests_too() {
        let c = config(DriverSelection::Playwright);
        assert_eq!(test_paths(&c), ["tests", "tests_pw"]);
    }

    #[test]
    fn requirements_follow_drivers_and_features() {
        let reqs = requirements(&config(DriverSelection::Selenium));
        assert!(reqs.contains(&"selenium>=4.14,<5"));
        assert!(reqs.contains(&"pytest-xdist>=3.3,<4"));
        assert!(reqs.contains(&"requests>=2.31,<3"));
        assert!(!reqs.iter().any(|r| r.starts_with("playwright")));
        let mut sorted = reqs.clone();
        sorted.sort_unstable();
        assert_eq!(reqs, sorted);
    }

    #[test]
    fn artifact_variables() {
        let c = config(DriverSelection::Selenium);
        let page = Artifact::page("Login", Some("/login")).unwrap();
        let view = ConfigView::for_project(&c, 2026).with_artifact(&page, &c);
        assert_eq!(view.get("MODULE"), Some("login"));
        assert_eq!(view.get("CLASS_NAME"), Some("LoginPage"));
        assert_eq!(view.get("PAGE_URL"), Some("https://shop.test/login"));

        let test = Artifact::test("Users", TestType::Api).unwrap();
        let view = ConfigView::for_project(&c, 2026).with_artifact(&test, &c);
        assert_eq!(view.get("PAGE_URL"), Some("https://shop.test/"));
    }

    #[test]
    fn slug_falls_back_for_symbol_only_names() {
        assert_eq!(project_slug("***"), "project");
        assert_eq!(project_slug("My-App 2"), "my_app_2");
    }
}
