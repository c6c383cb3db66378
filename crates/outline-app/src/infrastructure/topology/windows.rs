//! Windows display topology via `EnumDisplayMonitors` / `GetMonitorInfoW`.
//!
//! Display ids are the `HMONITOR` values, which Windows reissues whenever the
//! desktop is reconfigured.  Windows merges cloned outputs into one monitor and
//! never reports mirroring, so the distinct-bounds heuristic always decides
//! multi-display here.

use outline_core::{DisplayDescriptor, DisplayId, Point, Rect};
use windows::{
    Win32::Foundation::{BOOL, LPARAM, POINT, RECT},
    Win32::Graphics::Gdi::{EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFO},
    Win32::UI::WindowsAndMessaging::GetCursorPos,
};

use super::{degraded, DisplayTopology};

/// Windows implementation of [`DisplayTopology`] using Win32 APIs.
pub struct WindowsTopology;

impl WindowsTopology {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WindowsTopology {
    fn default() -> Self {
        Self::new()
    }
}

impl DisplayTopology for WindowsTopology {
    fn current_displays(&self) -> Vec<DisplayDescriptor> {
        let mut displays: Vec<DisplayDescriptor> = Vec::new();

        // SAFETY: `lParam` points at `displays`, which outlives this call.  The
        // callback runs synchronously inside `EnumDisplayMonitors`.
        // `HDC::default()` (null) enumerates every monitor on the virtual desktop.
        let ok = unsafe {
            EnumDisplayMonitors(
                HDC::default(),
                None,
                Some(monitor_enum_proc),
                LPARAM(&mut displays as *mut Vec<DisplayDescriptor> as isize),
            )
        };

        if !ok.as_bool() {
            return degraded("EnumDisplayMonitors", "call returned FALSE");
        }
        displays
    }

    fn pointer_location(&self) -> Option<Point> {
        let mut pt = POINT::default();
        // SAFETY: `pt` is a valid, writable POINT.
        match unsafe { GetCursorPos(&mut pt) } {
            Ok(()) => Some(Point::new(pt.x as f64, pt.y as f64)),
            Err(e) => {
                tracing::debug!(error = %e, "GetCursorPos failed");
                None
            }
        }
    }
}

/// Win32 monitor enumeration callback.
///
/// # Safety
///
/// Called by Win32 inside `EnumDisplayMonitors`.  `lparam` must be a valid
/// pointer to `Vec<DisplayDescriptor>` for the duration of the enumeration.
unsafe extern "system" fn monitor_enum_proc(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _lprc_clip: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let displays = &mut *(lparam.0 as *mut Vec<DisplayDescriptor>);

    let mut info = MONITORINFO {
        cbSize: std::mem::size_of::<MONITORINFO>() as u32,
        ..Default::default()
    };

    if GetMonitorInfoW(hmonitor, &mut info).as_bool() {
        let rc = info.rcMonitor;
        let bounds = Rect::new(
            rc.left as f64,
            rc.top as f64,
            (rc.right - rc.left) as f64,
            (rc.bottom - rc.top) as f64,
        );
        let is_main = (info.dwFlags & 1) != 0; // MONITORINFOF_PRIMARY = 1

        displays.push(DisplayDescriptor::new(DisplayId(hmonitor.0 as u64), bounds).main(is_main));
    }

    BOOL(1) // continue enumeration
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    /// Smoke test: the count depends on the machine, so only the invariants
    /// that hold on every desktop are asserted.
    #[test]
    fn test_windows_topology_reports_at_most_one_main_display() {
        let topology = WindowsTopology::new();
        let displays = topology.current_displays();
        assert!(displays.iter().filter(|d| d.is_main).count() <= 1);
        assert!(displays.iter().all(|d| !d.is_mirrored));
    }

    #[test]
    fn test_windows_topology_bounds_are_non_negative_sized() {
        let topology = WindowsTopology::new();
        for d in topology.current_displays() {
            assert!(d.bounds.width >= 0.0 && d.bounds.height >= 0.0);
        }
    }
}
