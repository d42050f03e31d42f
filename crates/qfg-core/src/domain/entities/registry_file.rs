//! Shared textual containers the mutator appends named entries to.
//!
//! Two formats exist: the page index (`pages/__init__.py`,
//! `pages_pw/__init__.py`) re-exporting every page class, and the Selenium
//! locator collection (`pages/locators.py`) holding one `<Class>Locators`
//! block per page.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static PAGE_INDEX_ENTRY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?m)^from\s+\.[A-Za-z_][A-Za-z0-9_]*\s+import\s+(?:\(([^)]*)\)|([A-Za-z0-9_, \t]+))",
    )
    .expect("static regex")
});

static LOCATOR_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^class\s+([A-Za-z_][A-Za-z0-9_]*)\s*[:(]").expect("static regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegistryFormat {
    PageIndex,
    Locators,
}

impl RegistryFormat {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PageIndex => "page index",
            Self::Locators => "locator collection",
        }
    }

    /// Entry names declared in `content`, in file order.
    pub fn entries(&self, content: &str) -> Vec<String> {
        match self {
            Self::PageIndex => PAGE_INDEX_ENTRY
                .captures_iter(content)
                .filter_map(|cap| cap.get(1).or_else(|| cap.get(2)))
                .flat_map(|names| imported_names(names.as_str()))
                .collect(),
            Self::Locators => LOCATOR_BLOCK
                .captures_iter(content)
                .map(|cap| cap[1].to_string())
                .collect(),
        }
    }

    /// Entry name a page class registers under.
    pub fn entry_name(&self, class_name: &str) -> String {
        match self {
            Self::PageIndex => class_name.to_string(),
            Self::Locators => format!("{class_name}Locators"),
        }
    }

    pub fn contains(&self, content: &str, entry_name: &str) -> bool {
        self.entries(content).iter().any(|e| e == entry_name)
    }

    /// Append a rendered entry to `current` and confirm the result.
    ///
    /// The returned content must parse to the prior entries followed by
    /// exactly `entry_name`; anything else is rejected without touching the
    /// original text.
    pub fn append_entry(
        &self,
        current: &str,
        entry_name: &str,
        rendered: &str,
    ) -> Result<String, RegistryAppendError> {
        let before = self.entries(current);
        if before.iter().any(|e| e == entry_name) {
            return Err(RegistryAppendError::Duplicate {
                entry: entry_name.to_string(),
            });
        }

        let mut updated = String::with_capacity(current.len() + rendered.len() + 2);
        updated.push_str(current);
        if !current.is_empty() && !current.ends_with('\n') {
            updated.push('\n');
        }
        if matches!(self, Self::Locators) && !current.trim().is_empty() {
            // Blocks are separated by two blank lines.
            while !updated.ends_with("\n\n\n") {
                updated.push('\n');
            }
        }
        updated.push_str(rendered.trim_start_matches('\n'));
        if !updated.ends_with('\n') {
            updated.push('\n');
        }

        let after = self.entries(&updated);
        let mut expected = before;
        expected.push(entry_name.to_string());
        if after != expected {
            return Err(RegistryAppendError::Unverified {
                entry: entry_name.to_string(),
                found: after,
            });
        }

        Ok(updated)
    }
}

/// Names bound by an import list, parenthesised or not. `A as B` binds `B`.
fn imported_names(list: &str) -> Vec<String> {
    list.lines()
        .map(|line| line.split_once('#').map_or(line, |(code, _)| code))
        .flat_map(|line| line.split(','))
        .filter_map(|item| item.split_whitespace().last())
        .map(str::to_string)
        .collect()
}

impl fmt::Display for RegistryFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an append was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryAppendError {
    Duplicate { entry: String },
    /// The rendered snippet did not add exactly the expected entry.
    Unverified { entry: String, found: Vec<String> },
}

impl fmt::Display for RegistryAppendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate { entry } => write!(f, "entry '{entry}' is already registered"),
            Self::Unverified { entry, found } => write!(
                f,
                "appending '{entry}' produced entries [{}]",
                found.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = "\
\"\"\"Page objects.\"\"\"
from .base_page import BasePage
from .example_page import ExamplePage
";

    const LOCATORS: &str = "\
from selenium.webdriver.common.by import By


class ExamplePageLocators:
    HEADING = (By.TAG_NAME, \"h1\")
";

    #[test]
    fn reads_page_index_entries() {
        assert_eq!(
            RegistryFormat::PageIndex.entries(INDEX),
            ["BasePage", "ExamplePage"]
        );
        assert_eq!(
            RegistryFormat::PageIndex.entries("from .a import (B, C)\n"),
            ["B", "C"]
        );
        assert!(RegistryFormat::PageIndex.entries("").is_empty());
    }

    #[test]
    fn reads_multi_line_parenthesised_imports() {
        let content = "\
from .base_page import BasePage
from .shop import (
    CartPage,  # checkout flow
    LoginPage,
)
from .search_page import SearchPage as Search
";
        assert_eq!(
            RegistryFormat::PageIndex.entries(content),
            ["BasePage", "CartPage", "LoginPage", "Search"]
        );
        assert!(RegistryFormat::PageIndex.contains(content, "LoginPage"));

        let err = RegistryFormat::PageIndex
            .append_entry(content, "LoginPage", "from .login_page import LoginPage\n")
            .unwrap_err();
        assert!(matches!(err, RegistryAppendError::Duplicate { .. }));
    }

    #[test]
    fn ignores_absolute_imports() {
        let content = "from selenium.webdriver import Chrome\n";
        assert!(RegistryFormat::PageIndex.entries(content).is_empty());
    }

    #[test]
    fn reads_locator_blocks() {
        assert_eq!(
            RegistryFormat::Locators.entries(LOCATORS),
            ["ExamplePageLocators"]
        );
    }

    #[test]
    fn appends_to_page_index() {
        let updated = RegistryFormat::PageIndex
            .append_entry(INDEX, "LoginPage", "from .login_page import LoginPage\n")
            .unwrap();
        assert!(updated.starts_with(INDEX));
        assert_eq!(
            RegistryFormat::PageIndex.entries(&updated),
            ["BasePage", "ExamplePage", "LoginPage"]
        );
    }

    #[test]
    fn appends_locator_block_with_spacing() {
        let block = "class LoginPageLocators:\n    ROOT = (By.TAG_NAME, \"body\")\n";
        let updated = RegistryFormat::Locators
            .append_entry(LOCATORS, "LoginPageLocators", block)
            .unwrap();
        assert!(updated.contains("\n\n\nclass LoginPageLocators:"));
        assert_eq!(
            RegistryFormat::Locators.entries(&updated),
            ["ExamplePageLocators", "LoginPageLocators"]
        );
    }

    #[test]
    fn missing_file_is_an_empty_container() {
        let updated = RegistryFormat::PageIndex
            .append_entry("", "LoginPage", "from .login_page import LoginPage")
            .unwrap();
        assert_eq!(updated, "from .login_page import LoginPage\n");
    }

    #[test]
    fn refuses_duplicates() {
        let err = RegistryFormat::PageIndex
            .append_entry(INDEX, "ExamplePage", "from .example_page import ExamplePage\n")
            .unwrap_err();
        assert!(matches!(err, RegistryAppendError::Duplicate { .. }));
    }

    #[test]
    fn refuses_snippets_that_do_not_register_the_entry() {
        let err = RegistryFormat::PageIndex
            .append_entry(INDEX, "LoginPage", "# nothing here\n")
            .unwrap_err();
        assert!(matches!(err, RegistryAppendError::Unverified { .. }));

        let err = RegistryFormat::PageIndex
            .append_entry(INDEX, "LoginPage", "from .login_page import LoginPage, Extra\n")
            .unwrap_err();
        assert!(matches!(err, RegistryAppendError::Unverified { .. }));
    }
}
