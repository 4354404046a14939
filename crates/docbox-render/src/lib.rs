//! Markdown rendering for the docbox documentation engine.
//!
//! Converts markdown source to HTML with heading anchors, a table of
//! contents, GitHub-style alerts, optional math spans, and copy-to-clipboard
//! affordances on code blocks.

mod links;
mod renderer;
mod state;

pub use links::resolve_link;
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, escape_html, slugify};
