//! Pointer position in normalized device coordinates.

/// Where an input event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputSource {
    Mouse,
    Touch,
}

/// Tracks the pointer and whether the last gesture was a touch.
///
/// Touch devices emit `touchend` followed by a synthesized click. The touch
/// path resolves the gesture itself, so the click that follows must be
/// dropped until the mouse moves again.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerTracker {
    ndc: (f32, f32),
    viewport: (f32, f32),
    last_input_was_touch: bool,
}

impl PointerTracker {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            ndc: (0.0, 0.0),
            viewport: (width.max(1.0), height.max(1.0)),
            last_input_was_touch: false,
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = (width.max(1.0), height.max(1.0));
    }

    /// Current position, x right and y up, both in [-1, 1]
    pub fn ndc(&self) -> (f32, f32) {
        self.ndc
    }

    pub fn last_input_was_touch(&self) -> bool {
        self.last_input_was_touch
    }

    fn locate(&mut self, x: f32, y: f32) {
        let (width, height) = self.viewport;
        self.ndc = ((x / width) * 2.0 - 1.0, -(y / height) * 2.0 + 1.0);
    }

    /// Mouse movement in window pixels; re-arms click handling
    pub fn on_move(&mut self, x: f32, y: f32) {
        self.last_input_was_touch = false;
        self.locate(x, y);
    }

    pub fn on_touch_start(&mut self, x: f32, y: f32) {
        self.locate(x, y);
    }

    /// Records the lift-off point; the caller resolves it like a click
    pub fn on_touch_end(&mut self, x: f32, y: f32) {
        self.last_input_was_touch = true;
        self.locate(x, y);
    }

    /// Marks a touch gesture that did not move the pointer, such as a tap
    /// on the overlay or an exit button
    pub fn mark_touch(&mut self) {
        self.last_input_was_touch = true;
    }

    /// Whether an event from `source` should be acted on
    pub fn accepts(&self, source: InputSource) -> bool {
        match source {
            InputSource::Touch => true,
            InputSource::Mouse => !self.last_input_was_touch,
        }
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners() {
        let mut pointer = PointerTracker::new(800.0, 600.0);

        pointer.on_move(0.0, 0.0);
        assert_eq!(pointer.ndc(), (-1.0, 1.0));

        pointer.on_move(800.0, 600.0);
        assert_eq!(pointer.ndc(), (1.0, -1.0));

        pointer.on_move(400.0, 300.0);
        assert_eq!(pointer.ndc(), (0.0, 0.0));
    }

    #[test]
    fn test_click_after_touch_is_dropped_until_mouse_moves() {
        let mut pointer = PointerTracker::new(100.0, 100.0);
        assert!(pointer.accepts(InputSource::Mouse));

        pointer.on_touch_start(10.0, 10.0);
        assert!(pointer.accepts(InputSource::Mouse));

        pointer.on_touch_end(10.0, 10.0);
        assert!(pointer.last_input_was_touch());
        assert!(!pointer.accepts(InputSource::Mouse));
        assert!(pointer.accepts(InputSource::Touch));

        pointer.on_move(50.0, 50.0);
        assert!(pointer.accepts(InputSource::Mouse));
    }

    #[test]
    fn test_resize_changes_mapping() {
        let mut pointer = PointerTracker::new(100.0, 100.0);
        pointer.resize(200.0, 100.0);
        pointer.on_move(100.0, 50.0);
        assert_eq!(pointer.ndc(), (0.0, 0.0));
    }
}
