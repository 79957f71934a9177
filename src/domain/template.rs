use std::fmt;

use crate::domain::SemanticVersion;

/// Placeholder replaced by the rendered version
pub const VERSION_PLACEHOLDER: &str = "{version}";

/// Configuration string containing `{version}` placeholders
/// (e.g., "chore: release {version}", "v{version}")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub pattern: String,
}

impl Template {
    pub fn new(pattern: impl Into<String>) -> Self {
        Template {
            pattern: pattern.into(),
        }
    }

    /// Replace every `{version}` occurrence with the version's string form
    pub fn render(&self, version: &SemanticVersion) -> String {
        self.pattern.replace(VERSION_PLACEHOLDER, &version.to_string())
    }

    /// Extract the version part of a tag rendered from this template.
    ///
    /// Only templates with exactly one placeholder can be reversed.
    /// Example: template="release-{version}", tag="release-1.2.3" -> "1.2.3"
    pub fn extract<'a>(&self, rendered: &'a str) -> Option<&'a str> {
        let parts: Vec<&str> = self.pattern.split(VERSION_PLACEHOLDER).collect();
        if parts.len() != 2 {
            return None;
        }

        let (prefix, suffix) = (parts[0], parts[1]);
        if rendered.len() < prefix.len() + suffix.len() {
            return None;
        }

        rendered
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_suffix(suffix))
            .filter(|version| !version.is_empty())
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
