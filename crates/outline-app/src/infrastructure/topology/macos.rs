//! macOS display topology via Core Graphics.
//!
//! Uses `CGGetActiveDisplayList` to enumerate displays, `CGDisplayBounds` for
//! their geometry, and `CGDisplayMirrorsDisplay` to flag displays that mirror
//! another.  The pointer location comes from a synthetic `CGEvent`.
//!
//! The Core Graphics global display space already has its origin at the
//! top-left of the main display with y growing downward, so bounds and pointer
//! positions are used as reported.

use core_graphics::display::{CGDisplay, CGDirectDisplayID};
use core_graphics::event::CGEvent;
use core_graphics::event_source::{CGEventSource, CGEventSourceStateID};
use outline_core::{DisplayDescriptor, DisplayId, Point, Rect};

use super::{degraded, DisplayTopology};

/// `kCGNullDirectDisplay`: returned by `CGDisplayMirrorsDisplay` for a display
/// that does not mirror another.
const NULL_DISPLAY: CGDirectDisplayID = 0;

/// macOS implementation of [`DisplayTopology`] via Core Graphics.
pub struct MacosTopology;

impl MacosTopology {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MacosTopology {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayTopology for MacosTopology {
    fn current_displays(&self) -> Vec<DisplayDescriptor> {
        let ids = match CGDisplay::active_displays() {
            Ok(ids) => ids,
            Err(e) => return degraded("CGGetActiveDisplayList", format!("CGError {e}")),
        };

        ids.into_iter()
            .map(|id| {
                let display = CGDisplay::new(id);
                let b = display.bounds();
                DisplayDescriptor::new(
                    DisplayId(u64::from(id)),
                    Rect::new(b.origin.x, b.origin.y, b.size.width, b.size.height),
                )
                .mirrored(display.mirrors_display() != NULL_DISPLAY)
                .main(display.is_main())
            })
            .collect()
    }

    fn pointer_location(&self) -> Option<Point> {
        let source = CGEventSource::new(CGEventSourceStateID::CombinedSessionState).ok()?;
        let event = CGEvent::new(source).ok()?;
        let p = event.location();
        Some(Point::new(p.x, p.y))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Smoke test: on a Mac with a display attached exactly one is main.
    #[test]
    fn test_macos_topology_reports_at_most_one_main_display() {
        let topology = MacosTopology::new();
        let displays = topology.current_displays();
        assert!(displays.iter().filter(|d| d.is_main).count() <= 1);
    }

    #[test]
    fn test_macos_main_display_is_never_flagged_mirrored_alone() {
        let topology = MacosTopology::new();
        let displays = topology.current_displays();
        if displays.len() == 1 {
            assert!(!displays[0].is_mirrored);
        }
    }
}
