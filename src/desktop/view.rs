//! Main view state machine.
//!
//! ```text
//!            open-project(id)
//!   Desktop ──────────────────▶ ProjectDetail(id)
//!      ▲                               │
//!      └──────────── back ─────────────┘
//! ```
//!
//! Nothing else moves the view; a project cannot be opened from another
//! project's page.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MainView {
    #[default]
    Desktop,
    ProjectDetail(String),
}

impl MainView {
    pub fn is_desktop(&self) -> bool {
        matches!(self, Self::Desktop)
    }

    pub fn project(&self) -> Option<&str> {
        match self {
            Self::ProjectDetail(id) => Some(id),
            Self::Desktop => None,
        }
    }

    /// `Desktop → ProjectDetail(id)`. Returns whether the view changed.
    pub fn open_project(&mut self, id: &str) -> bool {
        if !self.is_desktop() {
            return false;
        }
        *self = Self::ProjectDetail(id.to_string());
        true
    }

    /// `ProjectDetail → Desktop`. Returns whether the view changed.
    pub fn back(&mut self) -> bool {
        if self.is_desktop() {
            return false;
        }
        *self = Self::Desktop;
        true
    }
}
