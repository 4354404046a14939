//! HTML shell composition for Docbox.
//!
//! This crate provides:
//! - [`Shell`]: the fixed page chrome (head, navbar, sidebar, footer)
//! - [`STYLESHEET`]: the bundled stylesheet served at `/assets/style.css`
//!
//! The shell is built once from configuration and navigation. Every composed
//! page shares the exact same chrome bytes, only the content slot differs.

pub(crate) mod shell;
pub(crate) mod style;

pub use shell::{Shell, ShellConfig, SidebarConfig, TocConfig};
pub use style::STYLESHEET;
