//! Project Validator - read-only structural check.
//!
//! Checks run in order and append to one report:
//! 1. the Config parses and validates (a failure here ends the run)
//! 2. schema age and driver/browser consistency (warnings)
//! 3. driver directories exist
//! 4. every planned file exists; structural clusters fail, feature
//!    clusters warn

use std::path::Path;
use tracing::{info, instrument};

use crate::{
    application::{ports::Filesystem, services::planner::CompositionPlanner},
    domain::{
        CONFIG_FILE_NAME, Config, DomainValidator, DriverLayout, DriverSelection, SchemaVersion,
        ValidationReport,
    },
    error::QfgResult,
};

pub struct ProjectValidator {
    filesystem: Box<dyn Filesystem>,
}

impl ProjectValidator {
    pub fn new(filesystem: Box<dyn Filesystem>) -> Self {
        Self { filesystem }
    }

    /// Validate the project rooted at `root`. Never writes.
    #[instrument(skip(self), fields(root = %root.display()))]
    pub fn validate(&self, root: &Path) -> QfgResult<ValidationReport> {
        let mut report = ValidationReport::new();

        let Some(config) = self.check_config(root, &mut report)? else {
            return Ok(report);
        };

        Self::check_consistency(&config, &mut report);
        self.check_directories(root, &config, &mut report);
        self.check_files(root, &config, &mut report)?;

        info!(
            passed = report.passed(),
            failures = report.failures().count(),
            warnings = report.warnings().count(),
            "Validation finished"
        );
        Ok(report)
    }

    fn check_config(&self, root: &Path, report: &mut ValidationReport) -> QfgResult<Option<Config>> {
        let path = root.join(CONFIG_FILE_NAME);
        if !self.filesystem.exists(&path) {
            report.fail("config", CONFIG_FILE_NAME, "project config not found");
            return Ok(None);
        }

        let raw = self.filesystem.read_to_string(&path)?;
        let parsed = Config::parse(&raw).and_then(|c| {
            DomainValidator::validate_config(&c)?;
            Ok(c)
        });

        match parsed {
            Ok(config) => {
                report.ok("config", CONFIG_FILE_NAME, "config parses and validates");
                Ok(Some(config))
            }
            Err(e) => {
                report.fail("config", CONFIG_FILE_NAME, e.to_string());
                Ok(None)
            }
        }
    }

    fn check_consistency(config: &Config, report: &mut ValidationReport) {
        let version = config.schema_version();
        if version < SchemaVersion::CURRENT {
            report.warn(
                "schema",
                version.to_string(),
                format!(
                    "written with schema {version}; the current schema is {}",
                    SchemaVersion::CURRENT
                ),
            );
        }

        if config.driver_selection() == DriverSelection::Playwright && !config.browsers().is_empty()
        {
            report.warn(
                "browsers",
                "driver.browsers",
                "browsers are listed but only Selenium uses them",
            );
        }
    }

    fn check_directories(&self, root: &Path, config: &Config, report: &mut ValidationReport) {
        for driver in config.driver_selection().drivers() {
            let layout = DriverLayout::of(*driver);
            for dir in [layout.pages_dir, layout.tests_dir] {
                if self.filesystem.is_dir(&root.join(dir)) {
                    report.ok("directories", dir, format!("{driver} directory present"));
                } else {
                    report.fail("directories", dir, format!("missing {driver} directory '{dir}'"));
                }
            }
        }
    }

    fn check_files(&self, root: &Path, config: &Config, report: &mut ValidationReport) -> QfgResult<()> {
        let plan = CompositionPlanner::layout(config)?;
        let mut present = 0usize;

        for entry in plan.entries() {
            if self.filesystem.exists(&entry.path.under(root)) {
                present += 1;
            } else if entry.cluster.is_structural() {
                report.fail("files", entry.path.as_str(), format!("missing {} file", entry.cluster));
            } else {
                report.warn(
                    "files",
                    entry.path.as_str(),
                    format!("missing file of enabled feature '{}'", entry.cluster),
                );
            }
        }

        report.ok("files", root.display().to_string(), format!("{present} of {} planned files present", plan.len()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockFilesystem;
    use crate::domain::{Browser, Severity};
    use std::path::PathBuf;

    fn selenium_config() -> Config {
        Config::builder("Shop", "https://shop.test", DriverSelection::Selenium)
            .browsers([Browser::Chrome])
            .build()
            .unwrap()
    }

    /// A project at `/p` lacking `missing`. Only the listed dirs exist.
    fn project(config: &Config, missing: &[&str], dirs: &[&str]) -> MockFilesystem {
        let root = PathBuf::from("/p");
        let mut present: Vec<PathBuf> = CompositionPlanner::layout(config)
            .unwrap()
            .entries()
            .iter()
            .filter(|e| !missing.contains(&e.path.as_str()))
            .map(|e| e.path.under(&root))
            .collect();
        present.push(root.join(CONFIG_FILE_NAME));
        let dirs: Vec<PathBuf> = dirs.iter().map(|d| root.join(d)).collect();

        let raw = config.serialize().unwrap();
        let mut fs = MockFilesystem::new();
        fs.expect_exists()
            .returning(move |p| present.iter().any(|x| x == p));
        fs.expect_read_to_string()
            .returning(move |_| Ok(raw.clone()));
        fs.expect_is_dir()
            .returning(move |p| dirs.iter().any(|x| x == p));
        fs
    }

    #[test]
    fn complete_project_passes() {
        let config = selenium_config();
        let fs = project(&config, &[], &["pages", "tests"]);

        let report = ProjectValidator::new(Box::new(fs))
            .validate(Path::new("/p"))
            .unwrap();
        assert!(report.passed(), "{report:?}");
        assert_eq!(report.warnings().count(), 0);
    }

    #[test]
    fn missing_driver_dir_and_files_are_named() {
        let config = selenium_config();
        let fs = project(&config, &["tests/test_example.py", "Dockerfile"], &["pages"]);

        let report = ProjectValidator::new(Box::new(fs))
            .validate(Path::new("/p"))
            .unwrap();
        assert!(!report.passed());

        let failures: Vec<&str> = report.failures().map(|f| f.subject.as_str()).collect();
        assert_eq!(failures, vec!["tests", "tests/test_example.py"]);
        assert!(report.failures().next().unwrap().message.contains("'tests'"));

        let warnings: Vec<&str> = report.warnings().map(|f| f.subject.as_str()).collect();
        assert_eq!(warnings, vec!["Dockerfile"]);
    }

    #[test]
    fn playwright_project_with_browsers_warns() {
        let config = Config::builder("Shop", "https://shop.test", DriverSelection::Playwright)
            .browsers([Browser::Chromium])
            .build()
            .unwrap();
        let fs = project(&config, &[], &["pages_pw", "tests_pw"]);

        let report = ProjectValidator::new(Box::new(fs))
            .validate(Path::new("/p"))
            .unwrap();
        assert!(report.passed());
        assert!(report.warnings().any(|w| w.check == "browsers"));
    }

    #[test]
    fn unreadable_config_stops_the_checks() {
        let mut fs = MockFilesystem::new();
        fs.expect_exists().returning(|_| true);
        fs.expect_read_to_string()
            .returning(|_| Ok("schema_version: 9.0.0\nproject: {}\n".into()));

        let report = ProjectValidator::new(Box::new(fs))
            .validate(Path::new("/p"))
            .unwrap();
        assert_eq!(report.findings().len(), 1);
        assert_eq!(report.findings()[0].severity, Severity::Failure);
    }
}
