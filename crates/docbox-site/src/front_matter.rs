//! Page front matter support.
//!
//! Provides [`FrontMatter`] for page-level configuration embedded at the top
//! of markdown files between `---` delimiters.
//!
//! # Format
//!
//! ```markdown
//! ---
//! title: Custom Title
//! description: Shown in navigation and meta tags.
//! ---
//!
//! # Heading
//! ```
//!
//! Unknown keys are preserved in [`FrontMatter::extra`] so downstream
//! consumers can read custom fields without schema changes.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Page front matter parsed from a YAML block.
///
/// All known fields are optional. When a field is `None`, it was not
/// explicitly set for this page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrontMatter {
    /// Custom page title (overrides H1 extraction).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Page description for navigation and meta tags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Custom fields not covered by the known schema.
    #[serde(flatten, skip_serializing_if = "HashMap::is_empty")]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front matter from a YAML block body.
    ///
    /// Empty content returns a default instance. Malformed YAML is reported
    /// via a warning and treated as absent, so a single bad file never takes
    /// a page down.
    #[must_use]
    pub fn from_yaml(content: &str) -> Self {
        let trimmed = content.trim();
        if trimmed.is_empty() {
            return Self::default();
        }

        match serde_yaml::from_str(trimmed) {
            Ok(fm) => fm,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed front matter");
                Self::default()
            }
        }
    }

    /// Check if front matter has any values set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.extra.is_empty()
    }
}

/// Split a document into its front matter block body and markdown body.
///
/// The block must open with `---` on the very first line and close with a
/// `---` line. Returns `(None, content)` when no valid block is present.
pub(crate) fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let rest = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"));
    let Some(rest) = rest else {
        return (None, content);
    };

    let Some(end) = rest.find("\n---") else {
        return (None, content);
    };

    let block = &rest[..end];
    let mut body = &rest[end + 4..];
    // Skip the rest of the closing delimiter line
    body = body.strip_prefix('\r').unwrap_or(body);
    body = body.strip_prefix('\n').unwrap_or(body);

    (Some(block), body)
}

/// Parse front matter and return it with the remaining markdown body.
pub(crate) fn parse(content: &str) -> (FrontMatter, &str) {
    match split_front_matter(content) {
        (Some(block), body) => (FrontMatter::from_yaml(block), body),
        (None, body) => (FrontMatter::default(), body),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_with_title_and_description() {
        let content = "---\ntitle: Guide\ndescription: A short guide.\n---\n\n# Heading\n";
        let (fm, body) = parse(content);

        assert_eq!(fm.title.as_deref(), Some("Guide"));
        assert_eq!(fm.description.as_deref(), Some("A short guide."));
        assert_eq!(body, "\n# Heading\n");
    }

    #[test]
    fn test_parse_without_front_matter() {
        let content = "# Heading\n\nBody text.\n";
        let (fm, body) = parse(content);

        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_extra_fields_preserved() {
        let content = "---\ntitle: X\nsidebar_order: 3\n---\nbody";
        let (fm, _) = parse(content);

        assert_eq!(fm.title.as_deref(), Some("X"));
        assert!(fm.extra.contains_key("sidebar_order"));
    }

    #[test]
    fn test_delimiter_must_start_first_line() {
        let content = "\n---\ntitle: X\n---\nbody";
        let (fm, body) = parse(content);

        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unclosed_block_is_not_front_matter() {
        let content = "---\ntitle: X\nbody without closing";
        let (fm, body) = parse(content);

        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_malformed_yaml_is_ignored() {
        let content = "---\ntitle: [unclosed\n---\nbody";
        let (fm, body) = parse(content);

        assert!(fm.is_empty());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_crlf_delimiters() {
        let content = "---\r\ntitle: Windows\r\n---\r\nbody";
        let (fm, body) = parse(content);

        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "body");
    }
}
