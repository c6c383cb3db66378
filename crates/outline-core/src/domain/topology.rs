//! Display topology policy.
//!
//! These functions operate on a snapshot of [`DisplayDescriptor`]s and never
//! touch the OS.  The topology readers in the application crate call them after
//! each query, and the overlay engine calls them on every loop tick, so they are
//! on the hot path and allocate as little as possible.
//!
//! # Multi-display detection
//!
//! The outline is only useful when the user has more than one *distinct* screen
//! to lose the pointer on.  A display that mirrors another does not count.
//!
//! Some platforms never report mirroring (Windows merges cloned outputs into a
//! single monitor; some macOS configurations report every display as a
//! primary).  When **no** display in the snapshot is flagged as mirrored, the
//! policy falls back to counting displays with distinct bounds rectangles.
//!
//! **Heuristic caveat:** the fallback treats two displays whose bounds are
//! literally identical (same origin *and* size) as one.  Genuinely separate
//! side-by-side displays always have different origins, so the only false
//! negative is two unmirrored displays reported at the very same position,
//! which the fallback cannot tell apart from a mirror set.
//!
//! A snapshot in which *every* display is flagged mirrored counts zero
//! displays under the flags rule; the fallback is not consulted.

use std::collections::BTreeSet;

use super::display::{DisplayDescriptor, DisplayId};
use super::geometry::{Point, Rect};

/// Which rule produced a [`MultiDisplayAssessment`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiDisplayRule {
    /// At least one display was reported as mirrored; non-mirrored displays
    /// were counted.
    MirroringFlags,
    /// No display was reported as mirrored; displays with distinct bounds were
    /// counted.  See the module docs for the known false negative.
    DistinctBoundsHeuristic,
}

/// The outcome of the multi-display check, including how it was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiDisplayAssessment {
    /// `true` iff `counted >= 2`.
    pub active: bool,
    pub rule: MultiDisplayRule,
    /// Number of displays that counted as distinct under `rule`.
    pub counted: usize,
}

/// Returns the first display whose bounds contain `point`.
pub fn display_containing(displays: &[DisplayDescriptor], point: Point) -> Option<&DisplayDescriptor> {
    displays.iter().find(|d| d.bounds.contains(point))
}

/// Returns the display under `point`, falling back to the main display.
///
/// The fallback covers pointer positions just outside every display (edge
/// rounding, or a topology transition in progress).  Returns `None` only when
/// no display contains the point and none is flagged `is_main`.
pub fn display_under_point(displays: &[DisplayDescriptor], point: Point) -> Option<&DisplayDescriptor> {
    display_containing(displays, point).or_else(|| displays.iter().find(|d| d.is_main))
}

/// Decides whether at least two distinct, non-mirrored displays are active.
pub fn assess_multi_display(displays: &[DisplayDescriptor]) -> MultiDisplayAssessment {
    let any_mirrored = displays.iter().any(|d| d.is_mirrored);

    let (rule, counted) = if any_mirrored {
        let primaries = displays.iter().filter(|d| !d.is_mirrored).count();
        (MultiDisplayRule::MirroringFlags, primaries)
    } else {
        // f64 rectangles are not `Eq`/`Hash`; display counts are tiny, so a
        // linear distinctness scan is cheaper than any set.
        let mut distinct: Vec<Rect> = Vec::with_capacity(displays.len());
        for d in displays {
            if !distinct.iter().any(|r| *r == d.bounds) {
                distinct.push(d.bounds);
            }
        }
        (MultiDisplayRule::DistinctBoundsHeuristic, distinct.len())
    };

    MultiDisplayAssessment {
        active: counted >= 2,
        rule,
        counted,
    }
}

/// `true` iff the count of non-mirrored displays is at least two.
pub fn is_multi_display_active(displays: &[DisplayDescriptor]) -> bool {
    assess_multi_display(displays).active
}

/// The set of display ids present in a snapshot.
pub fn live_ids(displays: &[DisplayDescriptor]) -> BTreeSet<DisplayId> {
    displays.iter().map(|d| d.id).collect()
}

/// Detects whether two snapshots describe a different topology.
///
/// Order-insensitive: the OS may enumerate displays in any order.  Returns
/// `true` if any id appeared or vanished, or if any display's bounds or
/// mirroring flag changed.
pub fn topology_changed(old: &[DisplayDescriptor], new: &[DisplayDescriptor]) -> bool {
    if old.len() != new.len() {
        return true;
    }
    old.iter().any(|o| {
        match new.iter().find(|n| n.id == o.id) {
            Some(n) => n.bounds != o.bounds || n.is_mirrored != o.is_mirrored,
            None => true,
        }
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
