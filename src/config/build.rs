//! `[build]` and `[render]` section configuration.
//!
//! Contains content source, page shell, output paths and rendering options.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[build]` section in deskfolio.toml - build pipeline configuration.
///
/// # Example
/// ```toml
/// [build]
/// data = "site-data.json"  # Content file, or an http(s) URL
/// shell = "index.html"     # Page shell the content is rendered into
/// output = "public"        # Output directory
/// minify = true            # Minify HTML
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BuildConfig {
    /// Site root directory (set from CLI, never read from file).
    #[serde(skip)]
    #[educe(Default = defaults::build::root())]
    pub root: Option<PathBuf>,

    /// Content file: a path relative to the root, or an `http(s)://` URL.
    #[serde(default = "defaults::build::data")]
    #[educe(Default = defaults::build::data())]
    pub data: String,

    /// Page shell HTML. The embedded shell is used when the file is missing.
    #[serde(default = "defaults::build::shell")]
    #[educe(Default = defaults::build::shell())]
    pub shell: PathBuf,

    /// Output directory for the rendered site.
    #[serde(default = "defaults::build::output")]
    #[educe(Default = defaults::build::output())]
    pub output: PathBuf,

    /// Static assets copied verbatim into the output directory.
    #[serde(default = "defaults::build::assets")]
    #[educe(Default = defaults::build::assets())]
    pub assets: PathBuf,

    /// Minify the rendered page.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub minify: bool,

    /// Remove the output directory before building.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = false)]
    pub clean: bool,

    /// Timeout in seconds when the content file is fetched over http(s).
    #[serde(default = "defaults::build::fetch_timeout")]
    #[educe(Default = defaults::build::fetch_timeout())]
    pub fetch_timeout: u64,
}

impl BuildConfig {
    /// Whether `data` points at a remote document.
    pub fn data_is_remote(&self) -> bool {
        self.data.starts_with("http://") || self.data.starts_with("https://")
    }
}

/// `[render]` section in deskfolio.toml.
///
/// Text fields of the content file are inserted as markup unless
/// `escape_text` is set. Attribute values are always escaped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RenderConfig {
    #[serde(default)]
    pub escape_text: bool,
}
