//! Window dragging.
//!
//! A drag may only start from a window's `.title-bar`. Starting raises the
//! window; each move adds its delta to the stored offset, which
//! [`Desktop::sync`](super::Desktop::sync) writes back as a `translate`
//! transform plus `data-x`/`data-y`.

use super::{Layout, window::WindowManager};
use crate::dom::Document;

#[derive(Debug, Clone, Copy)]
pub struct Draggable {
    enabled: bool,
}

impl Draggable {
    /// Dragging only exists on wide layouts.
    pub fn new(layout: Layout) -> Self {
        Self {
            enabled: layout == Layout::Wide,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Whether `window` in `doc` has a handle a drag can start from.
    pub fn has_handle(&self, doc: &Document, window: &str) -> bool {
        doc.get_element_by_id(window)
            .filter(|&node| doc.has_class(node, "window"))
            .is_some_and(|node| !doc.elements_by_class_in(node, "title-bar").is_empty())
    }

    /// Pointer down on the handle. Returns the window's new order.
    pub fn start(&self, windows: &mut WindowManager, window: &str) -> Option<u32> {
        if !self.enabled {
            return None;
        }
        windows.bring_to_front(window)
    }

    /// Pointer moved by `(dx, dy)`. Returns the accumulated offset.
    pub fn drag_move(
        &self,
        windows: &mut WindowManager,
        window: &str,
        dx: f64,
        dy: f64,
    ) -> Option<(f64, f64)> {
        if !self.enabled {
            return None;
        }
        windows.translate(window, dx, dy)
    }
}

/// CSS value for an offset.
pub fn translate(x: f64, y: f64) -> String {
    format!("translate({x}px, {y}px)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn windows() -> WindowManager {
        WindowManager::new(["about", "readme"], 10)
    }

    #[test]
    fn test_start_raises_window() {
        let mut wm = windows();
        let drag = Draggable::new(Layout::Wide);
        wm.bring_to_front("readme");
        assert_eq!(drag.start(&mut wm, "about"), Some(12));
    }

    #[test]
    fn test_moves_accumulate() {
        let mut wm = windows();
        let drag = Draggable::new(Layout::Wide);
        drag.start(&mut wm, "about");
        drag.drag_move(&mut wm, "about", 10.0, 4.0);
        assert_eq!(drag.drag_move(&mut wm, "about", 20.0, -4.0), Some((30.0, 0.0)));
    }

    #[test]
    fn test_disabled_on_narrow() {
        let mut wm = windows();
        let drag = Draggable::new(Layout::Narrow);
        assert_eq!(drag.start(&mut wm, "about"), None);
        assert_eq!(drag.drag_move(&mut wm, "about", 5.0, 5.0), None);
        assert_eq!(wm.get("about").unwrap().order, None);
    }

    #[test]
    fn test_handle_required() {
        let doc = Document::parse(
            r#"<div class="window" id="about"><div class="title-bar">t</div></div><div class="window" id="bare"></div>"#,
        )
        .unwrap();
        let drag = Draggable::new(Layout::Wide);
        assert!(drag.has_handle(&doc, "about"));
        assert!(!drag.has_handle(&doc, "bare"));
        assert!(!drag.has_handle(&doc, "missing"));
    }

    #[test]
    fn test_translate_value() {
        assert_eq!(translate(30.0, -2.5), "translate(30px, -2.5px)");
    }
}
