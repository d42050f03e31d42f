//! `{{NAME}}` placeholder substitution.
//!
//! Placeholders are upper-case identifiers in double braces with no inner
//! whitespace, so GitHub Actions expressions like `${{ matrix.os }}` pass
//! through untouched.

use regex::{Captures, Regex};
use std::collections::BTreeSet;
use std::sync::LazyLock;

use qfg_core::{
    application::{ApplicationError, ports::TemplateBody},
    domain::ConfigView,
    error::QfgResult,
};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([A-Z][A-Z0-9_]*)\}\}").expect("static regex"));

/// Substitute every placeholder in `body` from `view`.
///
/// # Errors
/// `RenderingFailed` naming each placeholder the view does not define.
pub fn render_placeholders(body: &TemplateBody, view: &ConfigView) -> QfgResult<String> {
    let missing: BTreeSet<&str> = PLACEHOLDER
        .captures_iter(&body.content)
        .filter_map(|cap| cap.get(1))
        .map(|name| name.as_str())
        .filter(|name| view.get(name).is_none())
        .collect();

    if !missing.is_empty() {
        return Err(ApplicationError::RenderingFailed {
            key: body.key.clone(),
            reason: format!(
                "unresolved placeholder(s): {}",
                missing.into_iter().collect::<Vec<_>>().join(", ")
            ),
        }
        .into());
    }

    Ok(PLACEHOLDER
        .replace_all(&body.content, |cap: &Captures| {
            view.get(&cap[1]).unwrap_or_default().to_string()
        })
        .into_owned())
}

/// Placeholder names a body references, in first-use order.
pub fn placeholders(content: &str) -> Vec<&str> {
    let mut seen = BTreeSet::new();
    PLACEHOLDER
        .captures_iter(content)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}
