//! Output management and formatting.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use console::Term;
use owo_colors::OwoColorize;
use serde_json::{Value, json};

use qfg_core::domain::{CompositionPlan, Severity, ValidationReport, WriteOp, WriteSet};

use crate::cli::global::{GlobalArgs, OutputFormat};
use crate::config::AppConfig;

/// Manages CLI output based on configuration.
pub struct OutputManager {
    resolved_format: OutputFormat,
    quiet: bool,
    no_color: bool,
    term: Term,
}

impl OutputManager {
    /// Build an `OutputManager` from parsed CLI flags and loaded config.
    pub fn new(args: &GlobalArgs, config: &AppConfig) -> Self {
        // Resolve Auto → Human (TTY) or Plain (piped/redirected).
        let resolved_format = if args.output_format == OutputFormat::Auto {
            if io::stdout().is_terminal() {
                OutputFormat::Human
            } else {
                OutputFormat::Plain
            }
        } else {
            args.output_format
        };

        Self {
            resolved_format,
            quiet: args.quiet,
            no_color: args.no_color
                || config.output.no_color
                || resolved_format != OutputFormat::Human,
            term: Term::stdout(),
        }
    }

    // ── Public write methods ───────────────────────────────────────────────

    /// Generic message; suppressed in quiet and JSON mode.
    pub fn print(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        self.term.write_line(msg)
    }

    /// Success indicator: `✓ <msg>`.
    pub fn success(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2713} {msg}") // ✓
        } else {
            format!("{} {}", "\u{2713}".green().bold(), msg.green())
        };
        self.term.write_line(&line)
    }

    /// Warning indicator: `⚠ <msg>`.
    pub fn warning(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{26a0} {msg}") // ⚠
        } else {
            format!("{} {}", "\u{26a0}".yellow().bold(), msg.yellow())
        };
        self.term.write_line(&line)
    }

    /// Failure indicator: `✗ <msg>`. Shown even in quiet mode.
    pub fn failure(&self, msg: &str) -> io::Result<()> {
        if self.is_json() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2717} {msg}") // ✗
        } else {
            format!("{} {}", "\u{2717}".red().bold(), msg.red())
        };
        self.term.write_line(&line)
    }

    /// Informational indicator: `ℹ <msg>`.
    pub fn info(&self, msg: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            format!("\u{2139} {msg}") // ℹ
        } else {
            format!("{} {}", "\u{2139}".blue().bold(), msg.blue())
        };
        self.term.write_line(&line)
    }

    /// Bold cyan header line.
    pub fn header(&self, text: &str) -> io::Result<()> {
        if self.silent() {
            return Ok(());
        }
        let line = if self.no_color {
            text.to_owned()
        } else {
            text.cyan().bold().to_string()
        };
        self.term.write_line(&line)
    }

    /// The command's result document. Only written in JSON mode.
    pub fn json(&self, value: &Value) -> io::Result<()> {
        if !self.is_json() {
            return Ok(());
        }
        let text = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        self.term.write_line(&text)
    }

    // ── Domain renderers ──────────────────────────────────────────────────

    /// One line per planned file, grouped by cluster.
    pub fn plan(&self, plan: &CompositionPlan) -> io::Result<()> {
        if self.is_json() {
            let files: Vec<Value> = plan
                .entries()
                .iter()
                .map(|e| {
                    json!({
                        "path": e.path.as_str(),
                        "template": e.template_key,
                        "cluster": e.cluster.to_string(),
                    })
                })
                .collect();
            return self.json(&json!({ "dry_run": true, "files": files }));
        }

        let mut current = None;
        for entry in plan.entries() {
            if current != Some(entry.cluster) {
                self.header(&format!("{}:", entry.cluster))?;
                current = Some(entry.cluster);
            }
            self.print(&format!("  {}", entry.path))?;
        }
        Ok(())
    }

    /// The write set of an add command.
    pub fn write_set(&self, set: &WriteSet, root: &Path, written: &[PathBuf]) -> io::Result<()> {
        if self.is_json() {
            let ops: Vec<Value> = set
                .ops()
                .iter()
                .map(|op| match op {
                    WriteOp::Create { path, .. } => json!({ "op": "create", "path": path.as_str() }),
                    WriteOp::Append {
                        path, entry_name, ..
                    } => json!({ "op": "append", "path": path.as_str(), "entry": entry_name }),
                })
                .collect();
            return self.json(&json!({
                "kind": set.artifact().kind().to_string(),
                "name": set.artifact().display_name(),
                "root": root.display().to_string(),
                "operations": ops,
                "written": written.len(),
            }));
        }

        for op in set.ops() {
            match op {
                WriteOp::Create { path, .. } => self.success(&format!("Created {path}"))?,
                WriteOp::Append {
                    path, entry_name, ..
                } => self.success(&format!("Registered {entry_name} in {path}"))?,
            }
        }
        Ok(())
    }

    /// Findings of `qfg validate`. Ok findings only show with `-v`.
    pub fn report(&self, report: &ValidationReport, root: &Path, verbose: bool) -> io::Result<()> {
        if self.is_json() {
            return self.json(&json!({
                "root": root.display().to_string(),
                "passed": report.passed(),
                "findings": report.findings(),
            }));
        }

        for finding in report.findings() {
            let line = format!("[{}] {}: {}", finding.check, finding.subject, finding.message);
            match finding.severity {
                Severity::Failure => self.failure(&line)?,
                Severity::Warning => self.warning(&line)?,
                Severity::Ok if verbose => self.success(&line)?,
                Severity::Ok => {}
            }
        }
        Ok(())
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// `true` if ANSI colours are enabled.
    pub fn supports_color(&self) -> bool {
        !self.no_color
    }

    /// `true` if quiet mode suppresses most output.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }

    pub fn is_json(&self) -> bool {
        self.resolved_format == OutputFormat::Json
    }

    /// The resolved (non-Auto) output format.
    pub fn format(&self) -> OutputFormat {
        self.resolved_format
    }

    fn silent(&self) -> bool {
        self.quiet || self.is_json()
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_manager(quiet: bool, format: OutputFormat) -> OutputManager {
        let args = GlobalArgs {
            quiet,
            no_color: false,
            output_format: format,
            ..GlobalArgs::default()
        };
        OutputManager::new(&args, &AppConfig::default())
    }

    #[test]
    fn quiet_suppresses_print() {
        let out = make_manager(true, OutputFormat::Plain);
        assert!(out.is_quiet());
        assert!(out.print("hello").is_ok());
    }

    #[test]
    fn plain_format_disables_color() {
        assert!(!make_manager(false, OutputFormat::Plain).supports_color());
        assert!(make_manager(false, OutputFormat::Human).supports_color());
    }

    #[test]
    fn config_no_color_is_honoured() {
        let mut config = AppConfig::default();
        config.output.no_color = true;
        let args = GlobalArgs {
            output_format: OutputFormat::Human,
            ..GlobalArgs::default()
        };
        assert!(!OutputManager::new(&args, &config).supports_color());
    }

    #[test]
    fn format_accessor_returns_resolved() {
        let out = make_manager(false, OutputFormat::Json);
        assert_eq!(out.format(), OutputFormat::Json);
        assert!(out.is_json());
    }
}
