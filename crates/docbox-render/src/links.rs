//! Relative link resolution for markdown sources.

/// Source file extensions that map to routes.
const LINK_EXTENSIONS: [&str; 2] = [".md", ".mdx"];

/// Resolve a markdown link URL relative to a base path.
///
/// Transforms relative `.md`/`.mdx` links to absolute route paths:
/// - `./sibling.md` → `/base/path/sibling`
/// - `../parent.mdx` → `/base/parent`
/// - `subdir/page.md` → `/base/path/subdir/page`
/// - `topic/index.md` → `/base/path/topic`
///
/// External links, fragment-only links, and non-markdown links are returned
/// unchanged.
#[must_use]
pub fn resolve_link(url: &str, base_path: &str) -> String {
    // Skip external links, fragments, and non-local URLs
    if url.starts_with("http://")
        || url.starts_with("https://")
        || url.starts_with("//")
        || url.starts_with("mailto:")
        || url.starts_with("tel:")
        || url.starts_with('#')
    {
        return url.to_owned();
    }

    let is_source_link = LINK_EXTENSIONS
        .iter()
        .any(|ext| url.ends_with(ext) || url.contains(&format!("{ext}#")));
    if !is_source_link {
        return url.to_owned();
    }

    // Split URL into path and fragment
    let (path_part, fragment) = match url.find('#') {
        Some(hash_pos) => (&url[..hash_pos], Some(&url[hash_pos..])),
        None => (url, None),
    };

    let resolved = if let Some(absolute) = path_part.strip_prefix('/') {
        absolute.to_owned()
    } else {
        resolve_relative_path(path_part, base_path)
    };

    // Strip the source extension and /index suffix for clean routes
    let clean = LINK_EXTENSIONS
        .iter()
        .find_map(|ext| resolved.strip_suffix(ext))
        .unwrap_or(&resolved);
    let clean = clean.strip_suffix("/index").unwrap_or(clean);
    let clean = if clean == "index" { "" } else { clean };

    let with_prefix = format!("/{clean}");
    match fragment {
        Some(frag) => format!("{with_prefix}{frag}"),
        None => with_prefix,
    }
}

/// Resolve a relative path against a base path.
///
/// Handles `.` (current), `..` (parent), and plain relative paths. `..` at
/// the root is ignored to prevent traversal.
fn resolve_relative_path(relative: &str, base: &str) -> String {
    let mut segments: Vec<&str> = base.split('/').filter(|s| !s.is_empty()).collect();

    for component in relative.split('/') {
        match component {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            _ => segments.push(component),
        }
    }

    segments.join("/")
}
