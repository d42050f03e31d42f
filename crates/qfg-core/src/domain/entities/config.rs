//! The persisted project Config (`.framework-config.yml`).
//!
//! A `Config` is an immutable value: parsed once per invocation, validated,
//! and only ever written at project creation. The on-disk document is a
//! nested YAML mapping (`framework`, `project`, `driver`, `features`,
//! `settings`); [`Config::parse`] and [`Config::serialize`] are exact
//! inverses for any value that came out of `parse`.

use crate::domain::error::ConfigError;
use crate::domain::value_objects::{
    Browser, Driver, DriverSelection, Feature, LoggingMode, SchemaVersion, TestDataFormat,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// File name of the project Config, relative to the project root.
pub const CONFIG_FILE_NAME: &str = ".framework-config.yml";

/// Generator name written into fresh Configs.
pub const DEFAULT_GENERATOR: &str = "qfg";

const HEADER: &str = "\
# Test automation framework configuration.
# Written once by `qfg init`; `qfg add-page` and `qfg add-test` read it.
# Changing driver.type after creation orphans the generated files.
";

// ── Features & settings ──────────────────────────────────────────────────────

/// Per-feature switches. Missing keys read as `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FeatureFlags {
    bits: u16,
}

impl FeatureFlags {
    pub fn none() -> Self {
        Self::default()
    }

    const fn mask(feature: Feature) -> u16 {
        1 << feature as u16
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.bits & Self::mask(feature) != 0
    }

    pub fn with(mut self, feature: Feature, enabled: bool) -> Self {
        if enabled {
            self.bits |= Self::mask(feature);
        } else {
            self.bits &= !Self::mask(feature);
        }
        self
    }

    pub fn enabled(&self) -> impl Iterator<Item = Feature> + '_ {
        Feature::ALL.iter().copied().filter(|f| self.is_enabled(*f))
    }
}

impl FromIterator<Feature> for FeatureFlags {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::none(), |flags, f| flags.with(f, true))
    }
}

/// Recognized `settings.*` options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging_mode: LoggingMode,
    #[serde(default)]
    pub test_data_format: TestDataFormat,
    #[serde(default = "default_true")]
    pub playwright_async: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            logging_mode: LoggingMode::default(),
            test_data_format: TestDataFormat::default(),
            playwright_async: true,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_generator() -> String {
    DEFAULT_GENERATOR.to_string()
}

// ── Config ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    schema_version: SchemaVersion,
    generator: String,
    created_at: Option<String>,
    project_name: String,
    base_url: String,
    driver_selection: DriverSelection,
    browsers: Vec<Browser>,
    features: FeatureFlags,
    settings: Settings,
}

impl Config {
    pub fn builder(
        project_name: impl Into<String>,
        base_url: impl Into<String>,
        driver_selection: DriverSelection,
    ) -> ConfigBuilder {
        ConfigBuilder {
            project_name: project_name.into(),
            base_url: base_url.into(),
            driver_selection,
            browsers: Vec::new(),
            features: FeatureFlags::none(),
            settings: Settings::default(),
            created_at: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn schema_version(&self) -> SchemaVersion {
        self.schema_version
    }
    pub fn generator(&self) -> &str {
        &self.generator
    }
    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }
    pub fn project_name(&self) -> &str {
        &self.project_name
    }
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
    pub fn driver_selection(&self) -> DriverSelection {
        self.driver_selection
    }
    pub fn browsers(&self) -> &[Browser] {
        &self.browsers
    }
    pub fn features(&self) -> FeatureFlags {
        self.features
    }
    pub fn settings(&self) -> Settings {
        self.settings
    }

    pub fn includes(&self, driver: Driver) -> bool {
        self.driver_selection.includes(driver)
    }

    pub fn is_enabled(&self, feature: Feature) -> bool {
        self.features.is_enabled(feature)
    }

    /// Full URL for a page: `base_url + path` for rooted paths, the path
    /// verbatim otherwise.
    pub fn page_url(&self, url_path: &str) -> String {
        if url_path.starts_with('/') {
            format!("{}{}", self.base_url, url_path)
        } else {
            url_path.to_string()
        }
    }

    // ── Parse / validate / serialize ─────────────────────────────────────

    /// Parse a Config document.
    ///
    /// The schema version is checked before the rest of the document so a
    /// Config from a newer generator is reported as such even when its
    /// layout no longer matches.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let value: serde_yaml::Value = serde_yaml::from_str(raw)
            .map_err(|e| ConfigError::malformed("document", e.to_string()))?;

        let schema_version = Self::read_schema_version(&value)?;
        if schema_version.is_newer_than(&SchemaVersion::CURRENT) {
            return Err(ConfigError::SchemaMismatch {
                found: schema_version.to_string(),
                supported: SchemaVersion::CURRENT.to_string(),
            });
        }

        let doc: RawDocument = serde_yaml::from_value(value)
            .map_err(|e| ConfigError::malformed("document", e.to_string()))?;

        doc.into_config(schema_version)
    }

    fn read_schema_version(value: &serde_yaml::Value) -> Result<SchemaVersion, ConfigError> {
        let framework = value
            .get("framework")
            .ok_or_else(|| ConfigError::malformed("framework", "missing section"))?;

        let raw = framework
            .get("schema_version")
            .or_else(|| framework.get("version"))
            .ok_or_else(|| ConfigError::malformed("framework.schema_version", "missing"))?;

        let text = raw.as_str().ok_or_else(|| {
            ConfigError::malformed("framework.schema_version", "expected a quoted version string")
        })?;

        SchemaVersion::parse(text)
            .map_err(|reason| ConfigError::malformed("framework.schema_version", reason))
    }

    /// Check the cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_name.trim().is_empty() {
            return Err(ConfigError::InvariantViolation(
                "project name must not be empty".into(),
            ));
        }

        if self.driver_selection == DriverSelection::Selenium && self.browsers.is_empty() {
            return Err(ConfigError::InvariantViolation(
                "a Selenium project needs at least one browser".into(),
            ));
        }

        check_base_url(&self.base_url)
            .map_err(|reason| ConfigError::InvariantViolation(format!("base URL {reason}")))?;

        Ok(())
    }

    /// Render the Config document, comment header first.
    pub fn serialize(&self) -> Result<String, ConfigError> {
        let body = serde_yaml::to_string(&self.to_document())
            .map_err(|e| ConfigError::malformed("document", e.to_string()))?;
        Ok(format!("{HEADER}{body}"))
    }

    /// Look up a dotted key (`driver.type`, `features.docker`) and render
    /// its value as YAML.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let root = serde_yaml::to_value(self.to_document()).ok()?;
        let node = key
            .split('.')
            .try_fold(&root, |node, segment| node.get(segment))?;

        match node {
            serde_yaml::Value::String(s) => Some(s.clone()),
            serde_yaml::Value::Bool(b) => Some(b.to_string()),
            other => serde_yaml::to_string(other)
                .ok()
                .map(|s| s.trim_end().to_string()),
        }
    }

    fn to_document(&self) -> Document<'_> {
        Document {
            framework: FrameworkSection {
                schema_version: self.schema_version,
                generator: &self.generator,
                created_at: self.created_at.as_deref(),
            },
            project: ProjectSection {
                name: &self.project_name,
                base_url: &self.base_url,
            },
            driver: DriverSection {
                kind: self.driver_selection,
                browsers: &self.browsers,
            },
            features: Feature::ALL
                .iter()
                .map(|f| (f.as_str(), self.features.is_enabled(*f)))
                .collect(),
            settings: self.settings,
        }
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let parsed = url::Url::parse(raw).map_err(|e| format!("'{raw}' is not absolute: {e}"))?;
    if parsed.cannot_be_a_base() || !parsed.has_host() {
        return Err(format!("'{raw}' has no host"));
    }
    Ok(())
}

/// Ordered de-duplication, first occurrence wins.
fn dedup_browsers(browsers: impl IntoIterator<Item = Browser>) -> Vec<Browser> {
    let mut out = Vec::new();
    for browser in browsers {
        if !out.contains(&browser) {
            out.push(browser);
        }
    }
    out
}

// ── Builder ──────────────────────────────────────────────────────────────────

/// Assembles a fresh Config at project creation.
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    project_name: String,
    base_url: String,
    driver_selection: DriverSelection,
    browsers: Vec<Browser>,
    features: FeatureFlags,
    settings: Settings,
    created_at: Option<String>,
}

impl ConfigBuilder {
    pub fn browsers(mut self, browsers: impl IntoIterator<Item = Browser>) -> Self {
        self.browsers = browsers.into_iter().collect();
        self
    }

    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    pub fn feature(mut self, feature: Feature, enabled: bool) -> Self {
        self.features = self.features.with(feature, enabled);
        self
    }

    pub fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Stamp the creation time (RFC 3339).
    pub fn created_at(mut self, at: chrono::DateTime<chrono::Utc>) -> Self {
        self.created_at = Some(at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true));
        self
    }

    /// Normalize and validate. The trailing `/` of the base URL is dropped.
    pub fn build(self) -> Result<Config, ConfigError> {
        let base_url = self.base_url.trim().trim_end_matches('/').to_string();
        check_base_url(&base_url).map_err(|r| ConfigError::malformed("project.base_url", r))?;

        let config = Config {
            schema_version: SchemaVersion::CURRENT,
            generator: default_generator(),
            created_at: self.created_at,
            project_name: self.project_name.trim().to_string(),
            base_url,
            driver_selection: self.driver_selection,
            browsers: dedup_browsers(self.browsers),
            features: self.features,
            settings: self.settings,
        };

        config.validate()?;
        Ok(config)
    }
}

// ── Document shapes ──────────────────────────────────────────────────────────

#[derive(Serialize)]
struct Document<'a> {
    framework: FrameworkSection<'a>,
    project: ProjectSection<'a>,
    driver: DriverSection<'a>,
    features: BTreeMap<&'static str, bool>,
    settings: Settings,
}

#[derive(Serialize)]
struct FrameworkSection<'a> {
    schema_version: SchemaVersion,
    generator: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_at: Option<&'a str>,
}

#[derive(Serialize)]
struct ProjectSection<'a> {
    name: &'a str,
    base_url: &'a str,
}

#[derive(Serialize)]
struct DriverSection<'a> {
    #[serde(rename = "type")]
    kind: DriverSelection,
    browsers: &'a [Browser],
}

/// Lenient read shape: enumerations stay strings so failures can name
/// their field.
#[derive(Deserialize)]
struct RawDocument {
    framework: RawFramework,
    project: Option<RawProject>,
    driver: Option<RawDriver>,
    #[serde(default)]
    features: BTreeMap<String, bool>,
    #[serde(default)]
    settings: RawSettings,
}

#[derive(Deserialize)]
struct RawFramework {
    #[serde(default = "default_generator")]
    generator: String,
    #[serde(default, alias = "created")]
    created_at: Option<String>,
}

#[derive(Deserialize)]
struct RawProject {
    name: Option<String>,
    base_url: Option<String>,
}

#[derive(Deserialize)]
struct RawDriver {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    browsers: Vec<String>,
}

#[derive(Deserialize, Default)]
struct RawSettings {
    logging_mode: Option<String>,
    test_data_format: Option<String>,
    playwright_async: Option<bool>,
}

impl RawDocument {
    fn into_config(self, schema_version: SchemaVersion) -> Result<Config, ConfigError> {
        let project = self
            .project
            .ok_or_else(|| ConfigError::malformed("project", "missing section"))?;
        let driver = self
            .driver
            .ok_or_else(|| ConfigError::malformed("driver", "missing section"))?;

        let project_name = project
            .name
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| ConfigError::malformed("project.name", "missing"))?;

        let base_url = project
            .base_url
            .ok_or_else(|| ConfigError::malformed("project.base_url", "missing"))?;
        check_base_url(&base_url).map_err(|r| ConfigError::malformed("project.base_url", r))?;

        let driver_selection = driver
            .kind
            .ok_or_else(|| ConfigError::malformed("driver.type", "missing"))
            .and_then(|k| DriverSelection::from_str(&k))?;

        let browsers = driver
            .browsers
            .iter()
            .map(|b| Browser::from_str(b))
            .collect::<Result<Vec<_>, _>>()?;

        let mut features = FeatureFlags::none();
        for (key, enabled) in &self.features {
            let feature = Feature::from_str(key)
                .map_err(|_| ConfigError::malformed(format!("features.{key}"), "unknown feature"))?;
            features = features.with(feature, *enabled);
        }

        let settings = Settings {
            logging_mode: parse_setting("settings.logging_mode", self.settings.logging_mode)?,
            test_data_format: parse_setting(
                "settings.test_data_format",
                self.settings.test_data_format,
            )?,
            playwright_async: self.settings.playwright_async.unwrap_or(true),
        };

        Ok(Config {
            schema_version,
            generator: self.framework.generator,
            created_at: self.framework.created_at,
            project_name,
            base_url,
            driver_selection,
            browsers: dedup_browsers(browsers),
            features,
            settings,
        })
    }
}

fn parse_setting<T>(field: &str, raw: Option<String>) -> Result<T, ConfigError>
where
    T: Default + serde::de::DeserializeOwned,
{
    match raw {
        None => Ok(T::default()),
        Some(value) => serde_yaml::from_value(serde_yaml::Value::String(value.clone()))
            .map_err(|_| ConfigError::malformed(field, format!("unrecognized value '{value}'"))),
    }
}
