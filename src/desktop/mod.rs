//! Desktop session: windows, main view and input routing over one page.
//!
//! A [`Desktop`] is built from a populated [`Document`], takes clicks and
//! drags, and writes its state back with [`Desktop::sync`]. Layout is fixed
//! when the session starts; a later resize does not re-enable or disable
//! anything.

mod drag;
mod gesture;
mod router;
mod view;
mod window;

pub use drag::Draggable;
pub use gesture::{Gesture, GestureError};
pub use router::{Action, Router};
pub use view::MainView;
pub use window::{WindowManager, WindowState};

use crate::{
    config::DesktopConfig,
    dom::{Document, NodeId},
    log,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Viewport at or below the breakpoint: no window navigation, no dragging.
    Narrow,
    Wide,
}

impl Layout {
    pub fn from_width(width: u32, breakpoint: u32) -> Self {
        if width <= breakpoint {
            Self::Narrow
        } else {
            Self::Wide
        }
    }
}

/// What an input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Changed,
    /// Changed, and the page is scrolled back to the top.
    ScrolledToTop,
}

impl Outcome {
    pub fn changed(self) -> bool {
        self != Self::Ignored
    }
}

#[derive(Debug, Clone)]
pub struct Desktop {
    layout: Layout,
    windows: WindowManager,
    view: MainView,
    router: Router,
    drag: Draggable,
}

impl Desktop {
    /// Adopt every `.window` in `doc`, then show `config.open` in order.
    ///
    /// A window counts as open unless the page hides it inline; its stack
    /// order and drag offset come from `z-index` and `data-x`/`data-y`.
    pub fn start(doc: &Document, config: &DesktopConfig, viewport_width: u32) -> Self {
        let layout = Layout::from_width(viewport_width, config.narrow_breakpoint);
        let mut windows = WindowManager::new(Vec::<String>::new(), config.z_floor);

        for node in doc.elements_by_class("window") {
            let Some(id) = doc.attr(node, "id") else {
                continue;
            };
            let number = |name: &str| doc.attr(node, name).and_then(|v| v.trim().parse().ok());
            let state = WindowState {
                visible: doc.style(node, "display").as_deref() != Some("none"),
                order: doc.style(node, "z-index").and_then(|v| v.parse().ok()),
                offset_x: number("data-x").unwrap_or_default(),
                offset_y: number("data-y").unwrap_or_default(),
            };
            windows.insert(id.into_owned(), state);
        }

        for id in &config.open {
            if windows.show(id).is_none() {
                log!("desktop"; "window `{id}` is not in the page, not opened");
            }
        }

        Self {
            layout,
            windows,
            view: MainView::default(),
            router: Router::new(layout),
            drag: Draggable::new(layout),
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn view(&self) -> &MainView {
        &self.view
    }

    pub fn windows(&self) -> &WindowManager {
        &self.windows
    }

    /// Pointer click on `node`.
    ///
    /// On wide layouts pressing anywhere inside a window raises it before
    /// the click is routed.
    pub fn click(&mut self, doc: &Document, node: NodeId) -> Outcome {
        let mut outcome = Outcome::Ignored;
        if self.drag.enabled()
            && let Some(id) = doc.closest(node, "window").and_then(|w| doc.attr(w, "id"))
            && self.windows.bring_to_front(&id).is_some()
        {
            outcome = Outcome::Changed;
        }

        match self.router.route(doc, node) {
            Some(action) => match self.dispatch(doc, &action) {
                Outcome::Ignored => outcome,
                done => done,
            },
            None => outcome,
        }
    }

    /// Run a resolved action.
    pub fn dispatch(&mut self, doc: &Document, action: &Action) -> Outcome {
        let changed = match action {
            Action::OpenWindow(id) => self.windows.show(id).is_some(),
            Action::CloseWindow(id) => self.windows.close(id),
            Action::OpenProject(id) => {
                let exists = doc
                    .get_element_by_id(id)
                    .is_some_and(|page| doc.has_class(page, "project-page"));
                if exists && self.view.open_project(id) {
                    return Outcome::ScrolledToTop;
                }
                false
            }
            Action::Back => self.view.back(),
        };
        if changed {
            Outcome::Changed
        } else {
            Outcome::Ignored
        }
    }

    /// Drag `window` by its title bar.
    pub fn drag(&mut self, doc: &Document, window: &str, dx: f64, dy: f64) -> Outcome {
        if !self.drag.has_handle(doc, window) || self.drag.start(&mut self.windows, window).is_none()
        {
            return Outcome::Ignored;
        }
        match self.drag.drag_move(&mut self.windows, window, dx, dy) {
            Some(_) => Outcome::Changed,
            None => Outcome::Ignored,
        }
    }

    /// Replay one scripted input.
    pub fn perform(&mut self, doc: &Document, gesture: &Gesture) -> Outcome {
        if let Gesture::Drag { window, dx, dy } = gesture {
            return self.drag(doc, window, *dx, *dy);
        }
        match gesture.target(doc) {
            Some(node) => self.click(doc, node),
            None => Outcome::Ignored,
        }
    }

    /// Write session state into `doc`.
    pub fn sync(&self, doc: &mut Document) {
        for (id, state) in self.windows.iter() {
            let Some(node) = doc.get_element_by_id(id) else {
                continue;
            };
            doc.set_style(node, "display", if state.visible { "block" } else { "none" });
            if let Some(order) = state.order {
                doc.set_style(node, "z-index", &order.to_string());
            }
            if state.offset_x != 0.0 || state.offset_y != 0.0 {
                doc.set_style(node, "transform", &drag::translate(state.offset_x, state.offset_y));
                doc.set_attr(node, "data-x", &state.offset_x.to_string());
                doc.set_attr(node, "data-y", &state.offset_y.to_string());
            }
        }

        let (desktop, project) = match &self.view {
            MainView::Desktop => ("block", "none"),
            MainView::ProjectDetail(_) => ("none", "block"),
        };
        if let Some(node) = doc.get_element_by_id("desktop-view") {
            doc.set_style(node, "display", desktop);
        }
        if let Some(node) = doc.get_element_by_id("project-view") {
            doc.set_style(node, "display", project);
        }

        if let MainView::ProjectDetail(target) = &self.view {
            for page in doc.elements_by_class("project-page") {
                let shown = doc.attr(page, "id").as_deref() == Some(target.as_str());
                doc.set_style(page, "display", if shown { "block" } else { "none" });
            }
        }
    }
}
