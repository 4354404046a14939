//! Fixed page chrome shared by every composed page.
//!
//! [`Shell::new`] renders the chrome once into a prefix and a suffix string.
//! [`Shell::compose`] concatenates prefix, content slot, and suffix, so the
//! chrome bytes are identical across requests by construction.

use chrono::Datelike;
use docbox_render::escape_html;
use docbox_site::NavItem;

/// Sidebar behavior configuration.
#[derive(Clone, Debug)]
pub struct SidebarConfig {
    /// Tree depth up to which menus start expanded.
    pub default_collapse_level: usize,
    /// Collapse sibling menus when one is opened (client-side behavior).
    pub auto_collapse: bool,
    /// Show the sidebar hide/show toggle.
    pub toggle_button: bool,
}

impl Default for SidebarConfig {
    fn default() -> Self {
        Self {
            default_collapse_level: 1,
            auto_collapse: true,
            toggle_button: true,
        }
    }
}

/// Table of contents presentation configuration.
#[derive(Clone, Debug)]
pub struct TocConfig {
    /// Heading shown above the per-page table of contents.
    pub title: String,
    /// Label for the back-to-top link.
    pub back_to_top: String,
    /// Render the table of contents as a floating panel next to the content.
    pub float: bool,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            title: "On this page".to_owned(),
            back_to_top: "Scroll to top".to_owned(),
            float: true,
        }
    }
}

/// Site-wide shell configuration.
#[derive(Clone, Debug)]
pub struct ShellConfig {
    /// Document title for the `<title>` tag.
    pub title: String,
    /// Site description for the meta description tag.
    pub description: Option<String>,
    /// Logo text shown in the navbar.
    pub logo: String,
    /// Emoji rendered into an inline SVG favicon.
    pub favicon_glyph: Option<String>,
    /// Value for the `lang` attribute on `<html>`.
    pub language: String,
    /// Value for the `dir` attribute on `<html>`.
    pub direction: String,
    /// Footer text. The `{year}` placeholder expands to the current year.
    pub footer: String,
    /// Sidebar behavior.
    pub sidebar: SidebarConfig,
    /// Table of contents presentation.
    pub toc: TocConfig,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            title: "Dannbox Documentation".to_owned(),
            description: Some(
                "Comprehensive documentation for Dannbox - Build amazing applications with ease"
                    .to_owned(),
            ),
            logo: "Dannbox Docs".to_owned(),
            favicon_glyph: Some("\u{1f4e6}".to_owned()),
            language: "es".to_owned(),
            direction: "ltr".to_owned(),
            footer: "MIT {year} \u{a9} Dannbox.".to_owned(),
            sidebar: SidebarConfig::default(),
            toc: TocConfig::default(),
        }
    }
}

/// Precomposed page chrome.
///
/// The prefix ends right before the content slot and the suffix starts right
/// after it. Rebuild the shell when navigation changes.
pub struct Shell {
    prefix: String,
    suffix: String,
}

impl Shell {
    /// Build the chrome from configuration and the navigation tree.
    #[must_use]
    pub fn new(config: &ShellConfig, nav: &[NavItem]) -> Self {
        let mut prefix = String::with_capacity(4096);

        prefix.push_str("<!DOCTYPE html>");
        prefix.push_str(&format!(
            "<html lang=\"{}\" dir=\"{}\">",
            escape_html(&config.language),
            escape_html(&config.direction)
        ));
        prefix.push_str("<head><meta charset=\"utf-8\">");
        prefix.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">");
        prefix.push_str(&format!("<title>{}</title>", escape_html(&config.title)));
        if let Some(description) = &config.description {
            prefix.push_str(&format!(
                "<meta name=\"description\" content=\"{}\">",
                escape_html(description)
            ));
        }
        if let Some(glyph) = &config.favicon_glyph {
            prefix.push_str(&favicon_link(glyph));
        }
        prefix.push_str("<link rel=\"stylesheet\" href=\"/assets/style.css\">");
        prefix.push_str("</head>");

        prefix.push_str("<body>");
        prefix.push_str(&format!(
            "<header class=\"navbar\"><a class=\"navbar-logo\" href=\"/\"><strong>{}</strong></a></header>",
            escape_html(&config.logo)
        ));

        prefix.push_str(&render_sidebar(&config.sidebar, nav));
        prefix.push_str("<div class=\"layout\">");

        let mut suffix = String::with_capacity(512);
        suffix.push_str("</div>");
        suffix.push_str(&format!(
            "<a class=\"back-to-top\" href=\"#\">{}</a>",
            escape_html(&config.toc.back_to_top)
        ));
        let year = chrono::Utc::now().year().to_string();
        let footer = config.footer.replace("{year}", &year);
        suffix.push_str(&format!(
            "<footer class=\"footer\">{}</footer>",
            escape_html(&footer)
        ));
        suffix.push_str("</body></html>");

        Self { prefix, suffix }
    }

    /// Compose a full page around a content slot.
    #[must_use]
    pub fn compose(&self, title: &str, description: Option<&str>, body: &str) -> String {
        let mut out = String::with_capacity(self.prefix.len() + body.len() + self.suffix.len() + 128);

        out.push_str(&self.prefix);
        out.push_str(&format!(
            "<main class=\"content\" data-page-title=\"{}\"",
            escape_html(title)
        ));
        if let Some(description) = description {
            out.push_str(&format!(
                " data-page-description=\"{}\"",
                escape_html(description)
            ));
        }
        out.push('>');
        out.push_str(body);
        out.push_str("</main>");
        out.push_str(&self.suffix);

        out
    }

    /// Compose the not-found page for a path.
    #[must_use]
    pub fn not_found(&self, path: &str) -> String {
        let body = format!(
            "<div class=\"not-found\"><h1>404</h1><p>No page exists at <code>/{}</code>.</p><p><a href=\"/\">Back to the start page</a></p></div>",
            escape_html(path)
        );
        self.compose("404", None, &body)
    }

    /// Chrome bytes preceding the content slot.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Chrome bytes following the content slot.
    #[must_use]
    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

/// Inline SVG favicon carrying a single emoji glyph.
fn favicon_link(glyph: &str) -> String {
    format!(
        "<link rel=\"icon\" href=\"data:image/svg+xml;utf8,<svg xmlns=%22http://www.w3.org/2000/svg%22 viewBox=%220 0 100 100%22><text x=%2250%22 y=%22.9em%22 font-size=%2290%22 text-anchor=%22middle%22>{glyph}</text></svg>\">"
    )
}

fn render_sidebar(config: &SidebarConfig, nav: &[NavItem]) -> String {
    let mut out = String::with_capacity(1024);

    out.push_str(&format!(
        "<nav class=\"sidebar\" data-auto-collapse=\"{}\">",
        config.auto_collapse
    ));
    out.push_str("<ul>");
    for item in nav {
        render_nav_item(config, item, 0, &mut out);
    }
    out.push_str("</ul>");
    if config.toggle_button {
        out.push_str(
            "<button class=\"sidebar-toggle\" type=\"button\" aria-label=\"Toggle sidebar\"></button>",
        );
    }
    out.push_str("</nav>");

    out
}

fn render_nav_item(config: &SidebarConfig, item: &NavItem, depth: usize, out: &mut String) {
    let link = format!(
        "<a href=\"/{}\">{}</a>",
        escape_html(&item.path),
        escape_html(&item.title)
    );

    if item.children.is_empty() {
        out.push_str(&format!("<li>{link}</li>"));
        return;
    }

    let open = if depth < config.default_collapse_level {
        " open"
    } else {
        ""
    };
    out.push_str(&format!("<li><details{open}><summary>{link}</summary><ul>"));
    for child in &item.children {
        render_nav_item(config, child, depth + 1, out);
    }
    out.push_str("</ul></details></li>");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_nav() -> Vec<NavItem> {
        vec![
            NavItem {
                title: "Guide".to_owned(),
                path: "guide".to_owned(),
                children: vec![NavItem {
                    title: "Setup".to_owned(),
                    path: "guide/setup".to_owned(),
                    children: Vec::new(),
                }],
            },
            NavItem {
                title: "API".to_owned(),
                path: "api".to_owned(),
                children: Vec::new(),
            },
        ]
    }

    #[test]
    fn test_chrome_identical_across_compositions() {
        let shell = Shell::new(&ShellConfig::default(), &sample_nav());

        let a = shell.compose("One", None, "<p>first</p>");
        let b = shell.compose("Two", Some("other"), "<p>second</p>");

        assert!(a.starts_with(shell.prefix()));
        assert!(b.starts_with(shell.prefix()));
        assert!(a.ends_with(shell.suffix()));
        assert!(b.ends_with(shell.suffix()));
    }

    #[test]
    fn test_compose_places_content_in_main() {
        let shell = Shell::new(&ShellConfig::default(), &sample_nav());

        let out = shell.compose("Guide", Some("Getting started"), "<p>body</p>");
        assert!(out.contains(
            "<main class=\"content\" data-page-title=\"Guide\" data-page-description=\"Getting started\"><p>body</p></main>"
        ));
    }

    #[test]
    fn test_html_attributes_from_config() {
        let shell = Shell::new(&ShellConfig::default(), &[]);

        assert!(shell.prefix().contains("<html lang=\"es\" dir=\"ltr\">"));
        assert!(shell.prefix().contains("<title>Dannbox Documentation</title>"));
    }

    #[test]
    fn test_default_head_matches_shipped_site() {
        let shell = Shell::new(&ShellConfig::default(), &[]);

        assert!(shell.prefix().contains(
            "<meta name=\"description\" content=\"Comprehensive documentation for Dannbox - Build amazing applications with ease\">"
        ));
        assert!(
            shell
                .prefix()
                .contains("<a class=\"navbar-logo\" href=\"/\"><strong>Dannbox Docs</strong></a>")
        );
    }

    #[test]
    fn test_favicon_glyph_embedded_as_svg() {
        let shell = Shell::new(&ShellConfig::default(), &[]);

        assert!(shell.prefix().contains("data:image/svg+xml;utf8,"));
        assert!(shell.prefix().contains("\u{1f4e6}"));
    }

    #[test]
    fn test_no_favicon_when_glyph_unset() {
        let config = ShellConfig {
            favicon_glyph: None,
            ..Default::default()
        };
        let shell = Shell::new(&config, &[]);

        assert!(!shell.prefix().contains("rel=\"icon\""));
    }

    #[test]
    fn test_sidebar_expansion_depth() {
        let shell = Shell::new(&ShellConfig::default(), &sample_nav());

        // Depth 0 menus start expanded with the default collapse level of 1
        assert!(shell.prefix().contains("<details open><summary>"));
        assert!(shell.prefix().contains("<a href=\"/guide/setup\">Setup</a>"));
    }

    #[test]
    fn test_sidebar_collapsed_at_level_zero() {
        let config = ShellConfig {
            sidebar: SidebarConfig {
                default_collapse_level: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let shell = Shell::new(&config, &sample_nav());

        assert!(shell.prefix().contains("<details><summary>"));
        assert!(!shell.prefix().contains("<details open>"));
    }

    #[test]
    fn test_footer_year_placeholder() {
        let shell = Shell::new(&ShellConfig::default(), &[]);
        let year = chrono::Utc::now().year().to_string();

        assert!(shell.suffix().contains(&year));
        assert!(!shell.suffix().contains("{year}"));
    }

    #[test]
    fn test_not_found_page() {
        let shell = Shell::new(&ShellConfig::default(), &[]);

        let out = shell.not_found("missing/page");
        assert!(out.contains("data-page-title=\"404\""));
        assert!(out.contains("<code>/missing/page</code>"));
    }

    #[test]
    fn test_title_escaped_in_compose() {
        let shell = Shell::new(&ShellConfig::default(), &[]);

        let out = shell.compose("A & B", None, "");
        assert!(out.contains("data-page-title=\"A &amp; B\""));
    }

    #[test]
    fn test_sidebar_path_escaped_in_href() {
        let nav = vec![NavItem {
            title: "Odd".to_owned(),
            path: "a\"b&c".to_owned(),
            children: Vec::new(),
        }];
        let shell = Shell::new(&ShellConfig::default(), &nav);

        assert!(shell.prefix().contains("<a href=\"/a&quot;b&amp;c\">Odd</a>"));
        assert!(!shell.prefix().contains("href=\"/a\"b"));
    }

    #[test]
    fn test_toggle_button_configurable() {
        let shell = Shell::new(&ShellConfig::default(), &[]);
        assert!(shell.prefix().contains("sidebar-toggle"));

        let config = ShellConfig {
            sidebar: SidebarConfig {
                toggle_button: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let shell = Shell::new(&config, &[]);
        assert!(!shell.prefix().contains("sidebar-toggle"));
    }

    #[test]
    fn test_footer_escaped() {
        let config = ShellConfig {
            footer: "<b>raw</b>".to_owned(),
            ..Default::default()
        };
        let shell = Shell::new(&config, &[]);

        assert!(!shell.suffix().contains("<b>raw</b>"));
        assert!(shell.suffix().contains("&lt;b&gt;raw&lt;/b&gt;"));
    }
}
