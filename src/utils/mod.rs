//! Shared helpers: terminal logging and HTML minification.

pub mod log;
pub mod minify;
