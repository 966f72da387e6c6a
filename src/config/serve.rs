//! `[serve]` section configuration.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[serve]` section in deskfolio.toml - preview server settings.
///
/// `/` is bootstrapped from the shell and content on every request, so
/// content edits show without a rebuild. `?viewport=N` picks the layout and
/// each `?click=ACTION` (e.g. `window:about`, `project:proj1`) is replayed
/// in order before the page is returned. Other paths are served from the
/// output directory.
///
/// # Example
/// ```toml
/// [serve]
/// interface = "127.0.0.1"
/// port = 5277
/// watch = false          # Serve the output as built at startup
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ServeConfig {
    /// Network interface to bind.
    #[serde(default = "defaults::serve::interface")]
    #[educe(Default = defaults::serve::interface())]
    pub interface: String,

    /// HTTP port number (default: 5277). Next free port is tried on conflict.
    #[serde(default = "defaults::serve::port")]
    #[educe(Default = defaults::serve::port())]
    pub port: u16,

    /// Watch the config, page sources and assets: a config change is reloaded,
    /// then the page is rebuilt and assets are copied into the output.
    #[serde(default = "defaults::r#true")]
    #[educe(Default = true)]
    pub watch: bool,
}
