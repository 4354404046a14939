//! Optional wrapper layout around rendered page content.
//!
//! Provides [`PageRenderer`], which either passes page HTML through untouched
//! or wraps it in a layout carrying the page's exported values (title and
//! table of contents). The wrapper reads only [`PageExports`], never raw
//! front matter.

use docbox_render::escape_html;

use crate::site::{ContentUnit, PageExports};

/// Configuration for the wrapper layout.
#[derive(Clone, Debug)]
pub struct WrapperConfig {
    /// Heading shown above the table of contents panel.
    pub toc_title: String,
}

impl Default for WrapperConfig {
    fn default() -> Self {
        Self {
            toc_title: "On this page".to_owned(),
        }
    }
}

/// Renders a resolved page into its final content markup.
#[derive(Clone, Debug, Default)]
pub struct PageRenderer {
    wrapper: Option<WrapperConfig>,
}

impl PageRenderer {
    /// Create a renderer.
    ///
    /// With `wrapper` set to `None`, pages pass through unmodified.
    #[must_use]
    pub fn new(wrapper: Option<WrapperConfig>) -> Self {
        Self { wrapper }
    }

    /// Render a page, applying the wrapper when configured.
    #[must_use]
    pub fn render(&self, unit: &ContentUnit) -> String {
        match &self.wrapper {
            Some(config) => wrap(config, &unit.exports, &unit.html),
            None => unit.html.clone(),
        }
    }
}

fn wrap(config: &WrapperConfig, exports: &PageExports, html: &str) -> String {
    let mut out = String::with_capacity(html.len() + 512);

    out.push_str(&format!(
        "<div class=\"content-wrapper\" data-title=\"{}\">",
        escape_html(&exports.title)
    ));

    if !exports.toc.is_empty() {
        out.push_str("<aside class=\"page-toc\"><p class=\"page-toc-title\">");
        out.push_str(&escape_html(&config.toc_title));
        out.push_str("</p><ul>");
        for entry in &exports.toc {
            out.push_str(&format!(
                "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>",
                entry.level,
                entry.id,
                escape_html(&entry.title)
            ));
        }
        out.push_str("</ul></aside>");
    }

    out.push_str("<article>");
    out.push_str(html);
    out.push_str("</article></div>");

    out
}
