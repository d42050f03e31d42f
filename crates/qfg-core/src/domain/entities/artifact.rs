use crate::domain::error::MutatorError;
use crate::domain::value_objects::{ArtifactKind, TestType};

/// A single named generation target before driver fan-out.
///
/// The driver affinity is not part of the artifact: it is resolved against
/// the project Config each time the artifact is generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    kind: ArtifactKind,
    display_name: String,
    module: String,
    class_name: String,
    url_path: Option<String>,
    test_type: TestType,
}

impl Artifact {
    /// A page object, optionally bound to a URL path.
    pub fn page(name: &str, url_path: Option<&str>) -> Result<Self, MutatorError> {
        let (module, pascal) = normalize(name)?;
        let class_name = if pascal.ends_with("Page") {
            pascal
        } else {
            format!("{pascal}Page")
        };

        Ok(Self {
            kind: ArtifactKind::Page,
            display_name: name.trim().to_string(),
            module,
            class_name,
            url_path: url_path.map(str::to_string),
            test_type: TestType::Ui,
        })
    }

    pub fn test(name: &str, test_type: TestType) -> Result<Self, MutatorError> {
        let (module, class_name) = normalize(name)?;
        Ok(Self {
            kind: ArtifactKind::Test,
            display_name: name.trim().to_string(),
            module,
            class_name,
            url_path: None,
            test_type,
        })
    }

    /// The example page or test every new project is seeded with.
    pub fn example(kind: ArtifactKind, test_type: TestType) -> Self {
        let class_name = match kind {
            ArtifactKind::Page => "ExamplePage",
            ArtifactKind::Test => "Example",
        };
        Self {
            kind,
            display_name: "example".into(),
            module: "example".into(),
            class_name: class_name.into(),
            url_path: (kind == ArtifactKind::Page).then(|| "/".to_string()),
            test_type: match kind {
                ArtifactKind::Page => TestType::Ui,
                ArtifactKind::Test => test_type,
            },
        }
    }

    pub fn kind(&self) -> ArtifactKind {
        self.kind
    }
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
    /// Snake-case module slug, e.g. `checkout_flow`.
    pub fn module(&self) -> &str {
        &self.module
    }
    /// PascalCase class name; pages carry a `Page` suffix.
    pub fn class_name(&self) -> &str {
        &self.class_name
    }
    pub fn url_path(&self) -> Option<&str> {
        self.url_path.as_deref()
    }
    pub fn test_type(&self) -> TestType {
        self.test_type
    }
}

/// Split a user-supplied name into alphanumeric tokens and derive the
/// module slug and the PascalCase class stem.
fn normalize(name: &str) -> Result<(String, String), MutatorError> {
    let tokens: Vec<&str> = name
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .flat_map(split_camel)
        .collect();

    if tokens.is_empty() {
        return Err(MutatorError::InvalidName {
            name: name.to_string(),
            reason: "it contains no letters or digits".into(),
        });
    }

    if tokens[0].starts_with(|c: char| c.is_ascii_digit()) {
        return Err(MutatorError::InvalidName {
            name: name.to_string(),
            reason: "it must start with a letter to be importable".into(),
        });
    }

    let module = tokens
        .iter()
        .map(|t| t.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_");

    let pascal = tokens
        .iter()
        .map(|t| {
            let lower = t.to_ascii_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect();

    Ok((module, pascal))
}

/// `LoginForm` → `Login`, `Form`. Runs of capitals stay together.
fn split_camel(token: &str) -> Vec<&str> {
    let bytes = token.as_bytes();
    let mut parts = Vec::new();
    let mut start = 0;
    for i in 1..bytes.len() {
        let lower_before = bytes[i - 1].is_ascii_lowercase() || bytes[i - 1].is_ascii_digit();
        if lower_before && bytes[i].is_ascii_uppercase() {
            parts.push(&token[start..i]);
            start = i;
        }
    }
    parts.push(&token[start..]);
    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_names_normalize() {
        let page = Artifact::page("Checkout Flow", Some("/checkout")).unwrap();
        assert_eq!(page.module(), "checkout_flow");
        assert_eq!(page.class_name(), "CheckoutFlowPage");
        assert_eq!(page.display_name(), "Checkout Flow");
        assert_eq!(page.url_path(), Some("/checkout"));
    }

    #[test]
    fn examples_match_normalized_names() {
        assert_eq!(
            Artifact::example(ArtifactKind::Page, TestType::Ui),
            Artifact::page("example", Some("/")).unwrap()
        );
        assert_eq!(
            Artifact::example(ArtifactKind::Test, TestType::Api),
            Artifact::test("example", TestType::Api).unwrap()
        );
    }

    #[test]
    fn page_suffix_is_not_doubled() {
        let page = Artifact::page("login-page", None).unwrap();
        assert_eq!(page.module(), "login_page");
        assert_eq!(page.class_name(), "LoginPage");
    }

    #[test]
    fn camel_case_names_split_into_words() {
        let page = Artifact::page("LoginPage", None).unwrap();
        assert_eq!(page.module(), "login_page");
        assert_eq!(page.class_name(), "LoginPage");

        let test = Artifact::test("checkoutAPIFlow", TestType::Ui).unwrap();
        assert_eq!(test.module(), "checkout_apiflow");
    }

    #[test]
    fn separators_collapse() {
        let test = Artifact::test("  user--PROFILE__edit ", TestType::Ui).unwrap();
        assert_eq!(test.module(), "user_profile_edit");
        assert_eq!(test.class_name(), "UserProfileEdit");
    }

    #[test]
    fn empty_or_numeric_names_are_rejected() {
        assert!(matches!(
            Artifact::page("---", None),
            Err(MutatorError::InvalidName { .. })
        ));
        assert!(matches!(
            Artifact::test("", TestType::Api),
            Err(MutatorError::InvalidName { .. })
        ));
        assert!(matches!(
            Artifact::test("1st run", TestType::Ui),
            Err(MutatorError::InvalidName { .. })
        ));
    }
}
