//! Client-side search index built from page sources.
//!
//! The index is a flat JSON document served to the browser, one entry per
//! page. Text is extracted from the raw markdown rather than rendered HTML
//! so the index stays free of markup.

use std::sync::LazyLock;

use docbox_storage::Storage;
use regex::Regex;
use serde::Serialize;

use crate::front_matter;
use crate::site_state::SiteState;

/// Index format version, bumped when the JSON shape changes.
const INDEX_VERSION: u32 = 1;

static MD_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap());
static HTML_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());

/// Options controlling index content.
#[derive(Clone, Debug)]
pub struct SearchOptions {
    /// Include fenced code block content in indexed text.
    pub codeblocks: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self { codeblocks: true }
    }
}

/// A single searchable page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    /// Absolute URL path with leading slash.
    pub url: String,
    /// Page title.
    pub title: String,
    /// Extracted plain text.
    pub text: String,
}

/// Search index for the whole site.
#[derive(Clone, Debug, Serialize)]
pub struct SearchIndex {
    /// Index format version.
    pub version: u32,
    /// One entry per page, ordered by URL path.
    pub entries: Vec<SearchEntry>,
}

impl SearchIndex {
    /// Build an index from the site structure and page sources.
    ///
    /// Pages whose source cannot be read are skipped with a warning rather
    /// than failing the whole index.
    #[must_use]
    pub fn build(storage: &dyn Storage, state: &SiteState, options: &SearchOptions) -> Self {
        let mut entries = Vec::with_capacity(state.page_count());

        for path in state.static_paths() {
            let Some(page) = state.get_page(&path) else {
                continue;
            };
            let raw = match storage.read(&path) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!(path, error = %e, "Skipping unreadable page in search index");
                    continue;
                }
            };

            let (_, body) = front_matter::split_front_matter(&raw);
            entries.push(SearchEntry {
                url: format!("/{path}"),
                title: page.title.clone(),
                text: extract_text(body, options.codeblocks),
            });
        }

        Self {
            version: INDEX_VERSION,
            entries,
        }
    }
}

/// Extract searchable plain text from a markdown body.
///
/// Fence delimiter lines are always dropped. Fence content is kept only when
/// `codeblocks` is set.
fn extract_text(body: &str, codeblocks: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut in_fence = false;

    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            if codeblocks {
                let text = line.trim();
                if !text.is_empty() {
                    parts.push(text.to_owned());
                }
            }
            continue;
        }

        let text = clean_line(line);
        if !text.is_empty() {
            parts.push(text);
        }
    }

    parts.join(" ")
}

/// Strip markdown syntax from a prose line.
fn clean_line(line: &str) -> String {
    let trimmed = line
        .trim()
        .trim_start_matches('#')
        .trim_start_matches('>')
        .trim_start();
    let trimmed = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
        .unwrap_or(trimmed);

    let no_links = MD_LINK_RE.replace_all(trimmed, "$1");
    let no_tags = HTML_TAG_RE.replace_all(&no_links, "");

    no_tags
        .chars()
        .filter(|c| *c != '`' && *c != '*')
        .collect::<String>()
        .trim()
        .to_owned()
}
