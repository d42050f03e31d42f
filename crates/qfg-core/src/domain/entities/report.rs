use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Warning,
    Failure,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Warning => "warning",
            Self::Failure => "failure",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One validator observation. Report data, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationFinding {
    pub severity: Severity,
    /// Which check produced it (`config`, `schema`, `directories`, ...).
    pub check: &'static str,
    /// The path or key the finding is about.
    pub subject: String,
    pub message: String,
}

/// Ordered validator findings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    findings: Vec<ValidationFinding>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        severity: Severity,
        check: &'static str,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.findings.push(ValidationFinding {
            severity,
            check,
            subject: subject.into(),
            message: message.into(),
        });
    }

    pub fn ok(&mut self, check: &'static str, subject: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Ok, check, subject, message);
    }

    pub fn warn(
        &mut self,
        check: &'static str,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Severity::Warning, check, subject, message);
    }

    pub fn fail(
        &mut self,
        check: &'static str,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.push(Severity::Failure, check, subject, message);
    }

    pub fn findings(&self) -> &[ValidationFinding] {
        &self.findings
    }

    pub fn failures(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Failure)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationFinding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// Passes iff there are no failure entries.
    pub fn passed(&self) -> bool {
        self.failures().next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warnings_do_not_fail_the_report() {
        let mut report = ValidationReport::new();
        report.ok("config", ".framework-config.yml", "parsed");
        report.warn("schema", "1.0.0", "older schema");
        assert!(report.passed());

        report.fail("directories", "pages", "missing");
        assert!(!report.passed());
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.findings().len(), 3);
    }
}
