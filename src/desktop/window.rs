//! Window Manager: visibility, stacking order and drag offsets per window.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowState {
    pub visible: bool,
    /// Stack order (`z-index`); `None` until the window is first raised.
    pub order: Option<u32>,
    pub offset_x: f64,
    pub offset_y: f64,
}

#[derive(Debug, Clone)]
pub struct WindowManager {
    windows: BTreeMap<String, WindowState>,
    floor: u32,
}

impl WindowManager {
    /// Every window hidden and unordered.
    pub fn new<I, S>(ids: I, floor: u32) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            windows: ids
                .into_iter()
                .map(|id| (id.into(), WindowState::default()))
                .collect(),
            floor,
        }
    }

    /// Track a window with state taken from the page.
    pub fn insert(&mut self, id: impl Into<String>, state: WindowState) {
        self.windows.insert(id.into(), state);
    }

    pub fn get(&self, id: &str) -> Option<&WindowState> {
        self.windows.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &WindowState)> {
        self.windows.iter().map(|(id, state)| (id.as_str(), state))
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.get(id).is_some_and(|w| w.visible)
    }

    /// Make `id` visible and raise it. Returns the new order.
    pub fn show(&mut self, id: &str) -> Option<u32> {
        self.windows.get_mut(id)?.visible = true;
        self.bring_to_front(id)
    }

    /// Hide `id`. Returns `false` for unknown windows.
    pub fn close(&mut self, id: &str) -> bool {
        match self.windows.get_mut(id) {
            Some(window) => {
                window.visible = false;
                true
            }
            None => false,
        }
    }

    /// Give `id` an order one above every other window, never below
    /// `floor + 1`. Saturates at `u32::MAX`.
    pub fn bring_to_front(&mut self, id: &str) -> Option<u32> {
        if !self.windows.contains_key(id) {
            return None;
        }
        let max = self
            .windows
            .values()
            .map(|w| w.order.unwrap_or(self.floor))
            .fold(self.floor, u32::max);
        let order = max.saturating_add(1);
        self.windows.get_mut(id)?.order = Some(order);
        Some(order)
    }

    /// Add a drag delta to the window's offset. Returns the new offset.
    pub fn translate(&mut self, id: &str, dx: f64, dy: f64) -> Option<(f64, f64)> {
        let window = self.windows.get_mut(id)?;
        window.offset_x += dx;
        window.offset_y += dy;
        Some((window.offset_x, window.offset_y))
    }

    /// Visible window with the highest order.
    pub fn topmost(&self) -> Option<&str> {
        self.iter()
            .filter(|(_, w)| w.visible)
            .max_by_key(|(_, w)| w.order.unwrap_or(0))
            .map(|(id, _)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> WindowManager {
        WindowManager::new(["readme", "about", "projects", "contact"], 10)
    }

    #[test]
    fn test_first_raise_uses_floor() {
        let mut wm = manager();
        assert_eq!(wm.bring_to_front("about"), Some(11));
    }

    #[test]
    fn test_bring_to_front_is_strictly_monotonic() {
        let mut wm = manager();
        let sequence = ["about", "readme", "about", "contact", "contact", "projects", "readme"];
        let mut last = 0;
        for id in sequence {
            let order = wm.bring_to_front(id).unwrap();
            assert!(order > last, "{order} should exceed {last}");
            let others_max = wm
                .iter()
                .filter(|(other, _)| *other != id)
                .filter_map(|(_, w)| w.order)
                .max()
                .unwrap_or(0);
            assert!(order > others_max);
            last = order;
        }
        assert_eq!(last, 10 + sequence.len() as u32);
    }

    #[test]
    fn test_existing_order_above_floor_is_respected() {
        let mut wm = manager();
        wm.insert(
            "about",
            WindowState {
                visible: true,
                order: Some(40),
                ..WindowState::default()
            },
        );
        assert_eq!(wm.bring_to_front("readme"), Some(41));
    }

    #[test]
    fn test_raise_saturates_at_max_order() {
        let mut wm = manager();
        wm.insert(
            "about",
            WindowState {
                visible: true,
                order: Some(u32::MAX),
                ..WindowState::default()
            },
        );
        assert_eq!(wm.bring_to_front("about"), Some(u32::MAX));
        assert_eq!(wm.show("readme"), Some(u32::MAX));

        let mut wm = WindowManager::new(["a"], u32::MAX);
        assert_eq!(wm.bring_to_front("a"), Some(u32::MAX));
    }

    #[test]
    fn test_show_then_close() {
        let mut wm = manager();
        assert_eq!(wm.show("contact"), Some(11));
        assert!(wm.is_visible("contact"));
        assert_eq!(wm.topmost(), Some("contact"));

        assert!(wm.close("contact"));
        assert!(!wm.is_visible("contact"));
        // closing keeps the order
        assert_eq!(wm.get("contact").unwrap().order, Some(11));
        assert_eq!(wm.topmost(), None);
    }

    #[test]
    fn test_unknown_window_is_ignored() {
        let mut wm = manager();
        assert_eq!(wm.show("games"), None);
        assert!(!wm.close("games"));
        assert_eq!(wm.bring_to_front("games"), None);
        assert_eq!(wm.translate("games", 1.0, 1.0), None);
    }

    #[test]
    fn test_translate_accumulates() {
        let mut wm = manager();
        wm.translate("about", 30.0, -5.0);
        assert_eq!(wm.translate("about", 2.5, 5.0), Some((32.5, 0.0)));
    }
}
