//! Platform-specific display topology readers.
//!
//! A topology reader answers two questions for the overlay engine: which
//! displays are live right now, and where the pointer is.  Everything else
//! (which display is under the pointer, whether the setup counts as
//! multi-display) is policy and lives in `outline_core::domain::topology`.
//!
//! # Failure semantics
//!
//! Queries never fail.  A reader that cannot talk to the OS logs a warning and
//! reports an empty display list; the engine then degrades to "no surfaces,
//! nothing to show" instead of erroring.
//!
//! # Platform implementations
//!
//! Each platform implements [`DisplayTopology`]; the correct one is selected at
//! compile time via `#[cfg(target_os = ...)]` and re-exported as
//! `NativeTopology`:
//!
//! | Module    | OS      | API used                                                   |
//! |-----------|---------|------------------------------------------------------------|
//! | `windows` | Windows | `EnumDisplayMonitors` + `GetMonitorInfoW` + `GetCursorPos` |
//! | `macos`   | macOS   | `CGGetActiveDisplayList` + `CGDisplayMirrorsDisplay`       |
//!
//! Other platforms have no native reader and fall back to [`MockTopology`].
//! A [`MockTopology`] is always compiled (not guarded by `#[cfg]`) so tests on
//! any platform can use it without a physical display.

use outline_core::{display_under_point, is_multi_display_active, DisplayDescriptor, Point};
use tracing::warn;

pub mod mock;

pub use mock::MockTopology;

/// Read-only view of the live display topology.
#[cfg_attr(test, mockall::automock)]
pub trait DisplayTopology: Send {
    /// Queries the live displays.  Order is not significant.
    fn current_displays(&self) -> Vec<DisplayDescriptor>;

    /// Current pointer position in global coordinates, if the OS reports one.
    fn pointer_location(&self) -> Option<Point>;

    /// The display containing the pointer, falling back to the main display.
    fn display_under_pointer(&self) -> Option<DisplayDescriptor> {
        let pointer = self.pointer_location()?;
        display_under_point(&self.current_displays(), pointer).copied()
    }

    /// `true` iff at least two distinct, non-mirrored displays are live.
    fn is_multi_display_active(&self) -> bool {
        is_multi_display_active(&self.current_displays())
    }
}

// ── Windows implementation ────────────────────────────────────────────────────

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "windows")]
pub use windows::WindowsTopology as NativeTopology;

// ── macOS implementation ──────────────────────────────────────────────────────

#[cfg(target_os = "macos")]
pub mod macos;

#[cfg(target_os = "macos")]
pub use macos::MacosTopology as NativeTopology;

// ── Fallback ──────────────────────────────────────────────────────────────────

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
pub use mock::MockTopology as NativeTopology;

/// Builds the reader for this platform.
///
/// Platforms without a native reader get a single simulated 1080p display so
/// the rest of the application still runs.
pub fn native_topology() -> Box<dyn DisplayTopology> {
    #[cfg(any(target_os = "windows", target_os = "macos"))]
    {
        Box::new(NativeTopology::new())
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        warn!("no native display reader on this platform; simulating a single display");
        Box::new(NativeTopology::single_1080p())
    }
}

/// Logs a failed OS query and returns the empty topology.
#[cfg_attr(not(any(target_os = "windows", target_os = "macos")), allow(dead_code))]
pub(crate) fn degraded(api: &str, reason: impl std::fmt::Display) -> Vec<DisplayDescriptor> {
    warn!(api, %reason, "display query failed; reporting no displays");
    Vec::new()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
