//! Bundled stylesheet.
//!
//! Compiled into the binary and served at `/assets/style.css`. During static
//! export the same bytes are written to the output directory.

/// Stylesheet for the composed shell and rendered page content.
pub const STYLESHEET: &str = include_str!("../assets/style.css");
