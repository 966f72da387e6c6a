//! `[desktop]` section configuration.
//!
//! Window set, pre-opened windows and the viewport breakpoint that disables
//! window navigation and dragging.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};

/// `[desktop]` section in deskfolio.toml.
///
/// # Example
/// ```toml
/// [desktop]
/// windows = ["readme", "about", "projects", "contact"]
/// open = ["readme"]          # Shown and stacked in this order
/// narrow_breakpoint = 850    # Viewports this wide or narrower are "narrow"
/// viewport_width = 1280      # Assumed width for build output
/// z_floor = 10               # Stack order base for bring-to-front
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DesktopConfig {
    /// Fixed window ids populated from the content file.
    #[serde(default = "defaults::desktop::windows")]
    #[educe(Default = defaults::desktop::windows())]
    pub windows: Vec<String>,

    /// Windows opened at startup, in stacking order.
    #[serde(default)]
    pub open: Vec<String>,

    #[serde(default = "defaults::desktop::narrow_breakpoint")]
    #[educe(Default = defaults::desktop::narrow_breakpoint())]
    pub narrow_breakpoint: u32,

    #[serde(default = "defaults::desktop::viewport_width")]
    #[educe(Default = defaults::desktop::viewport_width())]
    pub viewport_width: u32,

    #[serde(default = "defaults::desktop::z_floor")]
    #[educe(Default = defaults::desktop::z_floor())]
    pub z_floor: u32,
}
