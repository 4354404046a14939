//! Rendering state trackers and small text utilities.

use std::collections::HashMap;

use serde::Serialize;

/// Table of contents entry collected during rendering.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (2-6; H1 is reserved for the page title).
    pub level: u8,
    /// Plain text of the heading.
    pub title: String,
    /// Anchor ID assigned to the heading.
    pub id: String,
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Convert heading text to an anchor slug.
///
/// Lowercases, keeps alphanumerics, and collapses runs of other characters
/// into single hyphens.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = true;
    for c in text.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("section");
    }
    slug
}

/// Tracks the heading currently being rendered, anchor ID deduplication,
/// title extraction, and ToC collection.
#[derive(Debug, Default)]
pub(crate) struct HeadingState {
    active: bool,
    level: u8,
    text: String,
    html: String,
    extract_title: bool,
    title: Option<String>,
    toc: Vec<TocEntry>,
    seen_ids: HashMap<String, usize>,
}

impl HeadingState {
    pub fn new(extract_title: bool) -> Self {
        Self {
            extract_title,
            ..Self::default()
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self, level: u8) {
        self.active = true;
        self.level = level;
        self.text.clear();
        self.html.clear();
    }

    pub fn push_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    pub fn push_html(&mut self, html: &str) {
        self.html.push_str(html);
    }

    pub fn html_buffer(&mut self) -> &mut String {
        &mut self.html
    }

    /// Finish the current heading, returning `(level, id, html)`.
    ///
    /// Assigns a deduplicated anchor ID, records the entry in the ToC for
    /// levels 2-6, and captures the first H1 as the title when extraction is
    /// enabled.
    pub fn complete(&mut self) -> (u8, String, String) {
        self.active = false;

        let text = self.text.trim().to_string();
        let id = self.dedup_id(slugify(&text));

        if self.level == 1 {
            if self.extract_title && self.title.is_none() {
                self.title = Some(text);
            }
        } else {
            self.toc.push(TocEntry {
                level: self.level,
                title: text,
                id: id.clone(),
            });
        }

        (self.level, id, std::mem::take(&mut self.html))
    }

    /// Append `-1`, `-2`, ... when the slug has been used before.
    fn dedup_id(&mut self, slug: String) -> String {
        let count = self.seen_ids.entry(slug.clone()).or_insert(0);
        let id = if *count == 0 {
            slug.clone()
        } else {
            format!("{slug}-{count}")
        };
        *count += 1;
        id
    }

    pub fn take_title(&mut self) -> Option<String> {
        self.title.take()
    }

    pub fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }
}

/// Tracks the fenced code block currently being collected.
#[derive(Debug, Default)]
pub(crate) struct CodeBlockState {
    active: bool,
    language: Option<String>,
    content: String,
}

impl CodeBlockState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self, language: Option<String>) {
        self.active = true;
        self.language = language;
        self.content.clear();
    }

    pub fn push_str(&mut self, text: &str) {
        self.content.push_str(text);
    }

    pub fn push_newline(&mut self) {
        self.content.push('\n');
    }

    pub fn end(&mut self) -> (Option<String>, String) {
        self.active = false;
        (self.language.take(), std::mem::take(&mut self.content))
    }
}

/// Tracks table rendering position for alignment styles.
#[derive(Debug, Default)]
pub(crate) struct TableState {
    alignments: Vec<pulldown_cmark::Alignment>,
    in_head: bool,
    cell_index: usize,
}

impl TableState {
    pub fn start(&mut self, alignments: Vec<pulldown_cmark::Alignment>) {
        self.alignments = alignments;
        self.in_head = false;
        self.cell_index = 0;
    }

    pub fn start_head(&mut self) {
        self.in_head = true;
        self.cell_index = 0;
    }

    pub fn end_head(&mut self) {
        self.in_head = false;
    }

    pub fn start_row(&mut self) {
        self.cell_index = 0;
    }

    pub fn is_in_head(&self) -> bool {
        self.in_head
    }

    pub fn next_cell(&mut self) {
        self.cell_index += 1;
    }

    /// Style attribute for the current cell, or an empty string.
    pub fn current_alignment_style(&self) -> &'static str {
        use pulldown_cmark::Alignment;
        match self.alignments.get(self.cell_index) {
            Some(Alignment::Left) => r#" style="text-align: left""#,
            Some(Alignment::Center) => r#" style="text-align: center""#,
            Some(Alignment::Right) => r#" style="text-align: right""#,
            _ => "",
        }
    }
}

/// Tracks image alt text collection.
#[derive(Debug, Default)]
pub(crate) struct ImageState {
    active: bool,
    alt: String,
}

impl ImageState {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self) {
        self.active = true;
        self.alt.clear();
    }

    pub fn push_str(&mut self, text: &str) {
        self.alt.push_str(text);
    }

    pub fn end(&mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.alt)
    }
}
