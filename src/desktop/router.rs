//! Click routing by event delegation.
//!
//! One resolver for the whole document: a click walks up from the clicked
//! node to the nearest element carrying a known control class, so controls
//! inserted after startup route the same as the shell's own.

use super::Layout;
use crate::dom::{Document, NodeId};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// `.nav-link[data-window-target]`
    OpenWindow(String),
    /// `.project-link[data-project-target]`
    OpenProject(String),
    /// `.close-btn` inside a `.window`
    CloseWindow(String),
    /// `.back-button`
    Back,
}

impl Action {
    fn kind(&self) -> &'static str {
        match self {
            Self::OpenWindow(_) => "open-window",
            Self::OpenProject(_) => "open-project",
            Self::CloseWindow(_) => "close-window",
            Self::Back => "back",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpenWindow(id) | Self::OpenProject(id) | Self::CloseWindow(id) => {
                write!(f, "{} {id}", self.kind())
            }
            Self::Back => f.write_str(self.kind()),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Router {
    layout: Layout,
}

impl Router {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    /// Resolve a click on `node` to an action.
    ///
    /// On a narrow layout navigation links route to nothing; every other
    /// control keeps working.
    pub fn route(&self, doc: &Document, node: NodeId) -> Option<Action> {
        let mut current = Some(node);
        while let Some(node) = current {
            if let Some(action) = self.control(doc, node) {
                return action;
            }
            current = doc.parent(node);
        }
        None
    }

    /// `Some` when `node` is a control; the inner value is what it does.
    fn control(&self, doc: &Document, node: NodeId) -> Option<Option<Action>> {
        if doc.has_class(node, "nav-link") {
            let target = doc.attr(node, "data-window-target");
            return Some(match (self.layout, target) {
                (Layout::Wide, Some(id)) => Some(Action::OpenWindow(id.into_owned())),
                _ => None,
            });
        }
        if doc.has_class(node, "project-link") {
            let target = doc.attr(node, "data-project-target");
            return Some(target.map(|id| Action::OpenProject(id.into_owned())));
        }
        if doc.has_class(node, "close-btn") {
            let window = doc
                .closest(node, "window")
                .and_then(|w| doc.attr(w, "id"))
                .map(|id| Action::CloseWindow(id.into_owned()));
            return Some(window);
        }
        if doc.has_class(node, "back-button") {
            return Some(Some(Action::Back));
        }
        None
    }
}
