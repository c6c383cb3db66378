//! In-memory display topology for tests and headless runs.
//!
//! [`MockTopology`] is a cheap, cloneable handle over shared state: hand one
//! clone to the overlay engine and keep another to rearrange displays or move
//! the pointer from the test body, exactly as the OS would.

use std::sync::{Arc, Mutex, MutexGuard};

use outline_core::{display_under_point, DisplayDescriptor, DisplayId, Point, Rect};

use super::DisplayTopology;

#[derive(Debug, Default)]
struct MockTopologyState {
    displays: Vec<DisplayDescriptor>,
    pointer: Option<Point>,
    /// When set, reported as the pointer display regardless of `displays`.
    pointer_display_override: Option<DisplayDescriptor>,
}

/// A [`DisplayTopology`] whose answers are set by the caller.
#[derive(Debug, Clone, Default)]
pub struct MockTopology {
    state: Arc<Mutex<MockTopologyState>>,
}

impl MockTopology {
    pub fn new(displays: Vec<DisplayDescriptor>, pointer: Option<Point>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockTopologyState {
                displays,
                pointer,
                pointer_display_override: None,
            })),
        }
    }

    /// One 1920×1080 main display with the pointer at its center.
    pub fn single_1080p() -> Self {
        Self::new(
            vec![DisplayDescriptor::new(DisplayId(1), Rect::new(0.0, 0.0, 1920.0, 1080.0)).main(true)],
            Some(Point::new(960.0, 540.0)),
        )
    }

    /// Display 1 at `(0,0,1920,1080)` (main) and display 2 at
    /// `(1920,0,1920,1080)`, neither mirrored, pointer at `(100,100)`.
    pub fn dual_1080p() -> Self {
        Self::new(
            vec![
                DisplayDescriptor::new(DisplayId(1), Rect::new(0.0, 0.0, 1920.0, 1080.0)).main(true),
                DisplayDescriptor::new(DisplayId(2), Rect::new(1920.0, 0.0, 1920.0, 1080.0)),
            ],
            Some(Point::new(100.0, 100.0)),
        )
    }

    pub fn set_displays(&self, displays: Vec<DisplayDescriptor>) {
        self.lock().displays = displays;
    }

    pub fn set_pointer(&self, pointer: Option<Point>) {
        self.lock().pointer = pointer;
    }

    /// Simulates a disconnect.  Returns `false` if no such display was live.
    pub fn remove_display(&self, id: DisplayId) -> bool {
        let mut state = self.lock();
        let before = state.displays.len();
        state.displays.retain(|d| d.id != id);
        state.displays.len() != before
    }

    /// Moves or resizes a live display.  Returns `false` if it is not live.
    pub fn set_bounds(&self, id: DisplayId, bounds: Rect) -> bool {
        let mut state = self.lock();
        match state.displays.iter_mut().find(|d| d.id == id) {
            Some(d) => {
                d.bounds = bounds;
                true
            }
            None => false,
        }
    }

    /// Forces the pointer display report, simulating an OS answer that lags
    /// behind the display list during a topology transition.
    pub fn set_pointer_display_override(&self, display: Option<DisplayDescriptor>) {
        self.lock().pointer_display_override = display;
    }

    fn lock(&self) -> MutexGuard<'_, MockTopologyState> {
        // A panic in another test thread must not cascade into this one.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl DisplayTopology for MockTopology {
    fn current_displays(&self) -> Vec<DisplayDescriptor> {
        self.lock().displays.clone()
    }

    fn pointer_location(&self) -> Option<Point> {
        self.lock().pointer
    }

    fn display_under_pointer(&self) -> Option<DisplayDescriptor> {
        let state = self.lock();
        if let Some(d) = state.pointer_display_override {
            return Some(d);
        }
        let pointer = state.pointer?;
        display_under_point(&state.displays, pointer).copied()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_1080p_is_not_multi_display() {
        let topology = MockTopology::single_1080p();
        assert_eq!(topology.current_displays().len(), 1);
        assert!(!topology.is_multi_display_active());
    }

    #[test]
    fn test_dual_1080p_is_multi_display_with_pointer_on_first() {
        // Arrange
        let topology = MockTopology::dual_1080p();

        // Act
        let display = topology.display_under_pointer();

        // Assert
        assert!(topology.is_multi_display_active());
        assert_eq!(display.map(|d| d.id), Some(DisplayId(1)));
    }

    #[test]
    fn test_clones_share_state() {
        // Arrange
        let topology = MockTopology::dual_1080p();
        let engine_side = topology.clone();

        // Act
        topology.set_pointer(Some(Point::new(2000.0, 100.0)));

        // Assert
        assert_eq!(engine_side.display_under_pointer().map(|d| d.id), Some(DisplayId(2)));
    }

    #[test]
    fn test_remove_display_reports_whether_it_was_live() {
        let topology = MockTopology::dual_1080p();
        assert!(topology.remove_display(DisplayId(2)));
        assert!(!topology.remove_display(DisplayId(2)));
        assert_eq!(topology.current_displays().len(), 1);
    }

    #[test]
    fn test_set_bounds_moves_live_display_only() {
        let topology = MockTopology::single_1080p();
        let bigger = Rect::new(0.0, 0.0, 2560.0, 1440.0);

        assert!(topology.set_bounds(DisplayId(1), bigger));
        assert!(!topology.set_bounds(DisplayId(9), bigger));
        assert_eq!(topology.current_displays()[0].bounds, bigger);
    }

    #[test]
    fn test_pointer_display_override_wins_over_hit_test() {
        // Arrange
        let topology = MockTopology::dual_1080p();
        let stale = DisplayDescriptor::new(DisplayId(7), Rect::new(3840.0, 0.0, 100.0, 100.0));

        // Act
        topology.set_pointer_display_override(Some(stale));

        // Assert
        assert_eq!(topology.display_under_pointer(), Some(stale));
        topology.set_pointer_display_override(None);
        assert_eq!(topology.display_under_pointer().map(|d| d.id), Some(DisplayId(1)));
    }
}
