//! Site state for the document hierarchy.
//!
//! Provides the immutable site structure with efficient path lookups and
//! navigation tree building. This is the pure data representation, separate
//! from [`Site`](crate::Site) which handles loading and rendering.
//!
//! # Architecture
//!
//! Pages are stored in a flat `Vec<Page>` with parent/children relationships
//! tracked by indices. This provides:
//! - O(1) URL path lookups via the `path_index` `HashMap`
//! - O(N) navigation tree building over the whole hierarchy

use std::collections::HashMap;

use serde::Serialize;

/// Navigation item with children for the sidebar tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Display title.
    pub title: String,
    /// Link target path without leading slash ("" for root).
    pub path: String,
    /// Child navigation items.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavItem>,
}

/// Document page data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Page title (from front matter, H1 heading, or filename).
    pub title: String,
    /// URL path without leading slash (e.g., "guide", "guide/setup", "" for root).
    pub path: String,
    /// Optional description from front matter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Immutable site structure with efficient path lookups.
pub struct SiteState {
    pages: Vec<Page>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
    path_index: HashMap<String, usize>,
}

impl SiteState {
    /// Get page by URL path.
    ///
    /// # Arguments
    ///
    /// * `path` - URL path without leading slash (e.g., "guide", "" for root)
    #[must_use]
    pub fn get_page(&self, path: &str) -> Option<&Page> {
        self.path_index.get(path).map(|&i| &self.pages[i])
    }

    /// Number of pages in the site.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All URL paths in the site, sorted.
    ///
    /// Used for static export, where every resolvable path becomes an output
    /// file.
    #[must_use]
    pub fn static_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.pages.iter().map(|p| p.path.clone()).collect();
        paths.sort();
        paths
    }

    /// Build the full navigation tree.
    ///
    /// The root page itself is not a navigation item. Its children form the
    /// top level of the tree. When no root page exists, root-level pages are
    /// used directly.
    #[must_use]
    pub fn navigation(&self) -> Vec<NavItem> {
        let top_level: Vec<usize> = if let Some(&root_idx) = self.path_index.get("") {
            self.children[root_idx].clone()
        } else {
            self.roots.clone()
        };

        top_level
            .iter()
            .map(|&idx| self.build_nav_item(idx))
            .collect()
    }

    fn build_nav_item(&self, idx: usize) -> NavItem {
        let page = &self.pages[idx];
        NavItem {
            title: page.title.clone(),
            path: page.path.clone(),
            children: self.children[idx]
                .iter()
                .map(|&child| self.build_nav_item(child))
                .collect(),
        }
    }

    /// Get root-level pages.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn get_root_pages(&self) -> Vec<&Page> {
        self.roots.iter().map(|&i| &self.pages[i]).collect()
    }
}

/// Builder for constructing [`SiteState`] incrementally.
///
/// Parents must be added before their children so child calls can pass the
/// parent's index.
pub(crate) struct SiteStateBuilder {
    pages: Vec<Page>,
    children: Vec<Vec<usize>>,
    roots: Vec<usize>,
}

impl SiteStateBuilder {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            pages: Vec::new(),
            children: Vec::new(),
            roots: Vec::new(),
        }
    }

    /// Add a page to the site.
    ///
    /// # Arguments
    ///
    /// * `title` - Page title
    /// * `path` - URL path without leading slash ("" for root)
    /// * `description` - Optional description from front matter
    /// * `parent_idx` - Index of parent page, `None` for root-level pages
    ///
    /// # Returns
    ///
    /// Index of the added page.
    pub(crate) fn add_page(
        &mut self,
        title: String,
        path: String,
        description: Option<String>,
        parent_idx: Option<usize>,
    ) -> usize {
        let idx = self.pages.len();

        self.pages.push(Page {
            title,
            path,
            description,
        });
        self.children.push(Vec::new());

        if let Some(parent) = parent_idx {
            self.children[parent].push(idx);
        } else {
            self.roots.push(idx);
        }

        idx
    }

    /// Build the final site state.
    #[must_use]
    pub(crate) fn build(self) -> SiteState {
        let path_index = self
            .pages
            .iter()
            .enumerate()
            .map(|(i, page)| (page.path.clone(), i))
            .collect();

        SiteState {
            pages: self.pages,
            children: self.children,
            roots: self.roots,
            path_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample_state() -> SiteState {
        let mut builder = SiteStateBuilder::new();
        let root = builder.add_page("Home".into(), String::new(), None, None);
        let guide = builder.add_page(
            "Guide".into(),
            "guide".into(),
            Some("Getting started".into()),
            Some(root),
        );
        builder.add_page("Setup".into(), "guide/setup".into(), None, Some(guide));
        builder.add_page("API".into(), "api".into(), None, Some(root));
        builder.build()
    }

    #[test]
    fn test_get_page_by_path() {
        let state = sample_state();

        assert_eq!(state.get_page("").unwrap().title, "Home");
        assert_eq!(state.get_page("guide/setup").unwrap().title, "Setup");
        assert!(state.get_page("missing").is_none());
    }

    #[test]
    fn test_navigation_uses_root_children() {
        let state = sample_state();
        let nav = state.navigation();

        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].title, "Guide");
        assert_eq!(nav[0].children.len(), 1);
        assert_eq!(nav[0].children[0].path, "guide/setup");
        assert_eq!(nav[1].title, "API");
        assert!(nav[1].children.is_empty());
    }

    #[test]
    fn test_navigation_without_root_page_falls_back_to_roots() {
        let mut builder = SiteStateBuilder::new();
        builder.add_page("Guide".into(), "guide".into(), None, None);
        builder.add_page("API".into(), "api".into(), None, None);
        let state = builder.build();

        let nav = state.navigation();
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].path, "guide");
    }

    #[test]
    fn test_static_paths_sorted() {
        let state = sample_state();

        assert_eq!(
            state.static_paths(),
            vec![
                String::new(),
                "api".to_owned(),
                "guide".to_owned(),
                "guide/setup".to_owned()
            ]
        );
    }

    #[test]
    fn test_nav_item_serialization_skips_empty_children() {
        let item = NavItem {
            title: "API".to_owned(),
            path: "api".to_owned(),
            children: Vec::new(),
        };

        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(json, r#"{"title":"API","path":"api"}"#);
    }

    #[test]
    fn test_root_pages() {
        let state = sample_state();

        let roots = state.get_root_pages();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].path, "");
    }
}
