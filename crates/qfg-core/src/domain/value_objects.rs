//! Domain value objects: drivers, browsers, features, settings enums and the
//! schema version.
//!
//! # Design
//!
//! These are pure value types: `Copy` and compared by value.
//! Cluster membership and path conventions live in `clusters.rs` and
//! `fanout.rs`. This file's only job is to define the types, their string
//! representations, and their `FromStr` parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm and the `FromStr` arm here
//! 3. If it gates artifacts, add a cluster in `clusters.rs`

use crate::domain::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── DriverSelection ───────────────────────────────────────────────────────────

/// The driver choice persisted in a project's Config.
///
/// Immutable after project creation: switching it would orphan every
/// artifact generated for the previous choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DriverSelection {
    Selenium,
    Playwright,
    Both,
}

impl DriverSelection {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Selenium => "selenium",
            Self::Playwright => "playwright",
            Self::Both => "both",
        }
    }

    /// Concrete drivers covered by this selection, Selenium first.
    pub const fn drivers(&self) -> &'static [Driver] {
        match self {
            Self::Selenium => &[Driver::Selenium],
            Self::Playwright => &[Driver::Playwright],
            Self::Both => &[Driver::Selenium, Driver::Playwright],
        }
    }

    pub fn includes(&self, driver: Driver) -> bool {
        self.drivers().contains(&driver)
    }

    /// Whether every driver of `other` is also part of `self`.
    pub fn covers(&self, other: DriverSelection) -> bool {
        other.drivers().iter().all(|d| self.includes(*d))
    }

    /// The selection holding exactly one driver.
    pub const fn single(driver: Driver) -> Self {
        match driver {
            Driver::Selenium => Self::Selenium,
            Driver::Playwright => Self::Playwright,
        }
    }
}

impl fmt::Display for DriverSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DriverSelection {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "selenium" | "selenium-webdriver" => Ok(Self::Selenium),
            "playwright" | "pw" => Ok(Self::Playwright),
            "both" => Ok(Self::Both),
            other => Err(ConfigError::Malformed {
                field: "driver.type".into(),
                reason: format!("unknown driver '{other}', expected selenium, playwright or both"),
            }),
        }
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// A single concrete browser-automation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Selenium,
    Playwright,
}

impl Driver {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Selenium => "selenium",
            Self::Playwright => "playwright",
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Browser ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Browser {
    Chrome,
    Firefox,
    Edge,
    Chromium,
    Webkit,
}

impl Browser {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Firefox => "firefox",
            Self::Edge => "edge",
            Self::Chromium => "chromium",
            Self::Webkit => "webkit",
        }
    }

    /// Browsers Playwright installs by default.
    pub const PLAYWRIGHT_DEFAULTS: &'static [Browser] =
        &[Browser::Chromium, Browser::Firefox, Browser::Webkit];
}

impl fmt::Display for Browser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Browser {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "firefox" => Ok(Self::Firefox),
            "edge" | "msedge" => Ok(Self::Edge),
            "chromium" => Ok(Self::Chromium),
            "webkit" | "safari" => Ok(Self::Webkit),
            other => Err(ConfigError::Malformed {
                field: "driver.browsers".into(),
                reason: format!("unknown browser '{other}'"),
            }),
        }
    }
}

// ── Feature ───────────────────────────────────────────────────────────────────

/// An optional capability that gates one artifact cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Docker,
    CiCd,
    Allure,
    QualityTools,
    PreCommit,
    Parallel,
    FlakyRetry,
    ApiTesting,
}

impl Feature {
    pub const ALL: &'static [Feature] = &[
        Feature::Docker,
        Feature::CiCd,
        Feature::Allure,
        Feature::QualityTools,
        Feature::PreCommit,
        Feature::Parallel,
        Feature::FlakyRetry,
        Feature::ApiTesting,
    ];

    /// The key used under `features.*` in the Config file.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Docker => "docker",
            Self::CiCd => "ci_cd",
            Self::Allure => "allure",
            Self::QualityTools => "quality_tools",
            Self::PreCommit => "pre_commit",
            Self::Parallel => "parallel",
            Self::FlakyRetry => "flaky_retry",
            Self::ApiTesting => "api_testing",
        }
    }

    pub const fn description(&self) -> &'static str {
        match self {
            Self::Docker => "Docker Compose (Selenium Grid)",
            Self::CiCd => "CI/CD (GitHub Actions)",
            Self::Allure => "Allure reporting",
            Self::QualityTools => "Quality tools (black, flake8, mypy, bandit)",
            Self::PreCommit => "Pre-commit hooks",
            Self::Parallel => "Parallel execution (pytest-xdist)",
            Self::FlakyRetry => "Flaky test retry",
            Self::ApiTesting => "API testing support (requests)",
        }
    }

    /// Whether the feature is pre-selected in interactive init.
    pub const fn on_by_default(&self) -> bool {
        !matches!(self, Self::FlakyRetry | Self::ApiTesting)
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "docker" => Ok(Self::Docker),
            "ci_cd" | "ci" => Ok(Self::CiCd),
            "allure" => Ok(Self::Allure),
            "quality_tools" | "quality" => Ok(Self::QualityTools),
            "pre_commit" => Ok(Self::PreCommit),
            "parallel" => Ok(Self::Parallel),
            "flaky_retry" | "retry" => Ok(Self::FlakyRetry),
            "api_testing" | "api" => Ok(Self::ApiTesting),
            _ => Err(ConfigError::Malformed {
                field: "features".into(),
                reason: format!("unknown feature '{s}'"),
            }),
        }
    }
}

// ── Settings enums ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingMode {
    #[default]
    Json,
    Console,
    Both,
}

impl LoggingMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Console => "console",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for LoggingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestDataFormat {
    #[default]
    Yaml,
    Json,
}

impl TestDataFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }

    pub const fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for TestDataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Artifacts ─────────────────────────────────────────────────────────────────

/// The kinds of artifact the Mutator can add to an existing project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Page,
    Test,
}

impl ArtifactKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TestType {
    #[default]
    Ui,
    Api,
}

impl TestType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ui => "ui",
            Self::Api => "api",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SchemaVersion ─────────────────────────────────────────────────────────────

/// `MAJOR.MINOR.PATCH` version of the Config schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SchemaVersion {
    major: u32,
    minor: u32,
    patch: u32,
}

impl SchemaVersion {
    /// The newest schema this engine reads and writes.
    pub const CURRENT: SchemaVersion = SchemaVersion::new(1, 1, 0);

    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    pub const fn major(&self) -> u32 {
        self.major
    }

    pub const fn minor(&self) -> u32 {
        self.minor
    }

    pub const fn patch(&self) -> u32 {
        self.patch
    }

    /// Parse a `MAJOR.MINOR.PATCH` string.
    pub fn parse(s: &str) -> Result<Self, String> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.len() != 3 {
            return Err(format!("'{s}' is not a MAJOR.MINOR.PATCH version"));
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("'{s}' has a non-numeric component '{part}'"))?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }

    pub fn is_newer_than(&self, other: &SchemaVersion) -> bool {
        self > other
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl TryFrom<String> for SchemaVersion {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SchemaVersion> for String {
    fn from(value: SchemaVersion) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_selection_covers() {
        assert!(DriverSelection::Both.covers(DriverSelection::Selenium));
        assert!(DriverSelection::Both.covers(DriverSelection::Both));
        assert!(!DriverSelection::Selenium.covers(DriverSelection::Playwright));
        assert!(!DriverSelection::Playwright.covers(DriverSelection::Both));
    }

    #[test]
    fn both_lists_selenium_first() {
        assert_eq!(
            DriverSelection::Both.drivers(),
            &[Driver::Selenium, Driver::Playwright]
        );
    }

    #[test]
    fn feature_parses_aliases() {
        assert_eq!(Feature::from_str("ci-cd").unwrap(), Feature::CiCd);
        assert_eq!(Feature::from_str("API").unwrap(), Feature::ApiTesting);
        assert!(Feature::from_str("kubernetes").is_err());
    }

    #[test]
    fn schema_version_parses_and_orders() {
        let v = SchemaVersion::parse("1.0.3").unwrap();
        assert_eq!((v.major(), v.minor(), v.patch()), (1, 0, 3));
        assert!(SchemaVersion::CURRENT.is_newer_than(&v));
        assert!(SchemaVersion::parse("2.0.0").unwrap().is_newer_than(&SchemaVersion::CURRENT));
    }

    #[test]
    fn schema_version_rejects_garbage() {
        assert!(SchemaVersion::parse("1.0").is_err());
        assert!(SchemaVersion::parse("1.x.0").is_err());
        assert!(SchemaVersion::parse("").is_err());
    }

    #[test]
    fn unknown_driver_names_the_field() {
        let err = DriverSelection::from_str("cypress").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { ref field, .. } if field == "driver.type"));
    }
}
