//! Display identity and descriptors.
//!
//! A [`DisplayDescriptor`] is produced fresh by every topology query and is
//! never mutated in place.  A [`DisplayId`] is only meaningful for the current
//! session: operating systems invalidate and reissue identifiers across
//! hot-plug events, so callers must treat an id as "currently live" or
//! "previously known", never as a permanent key.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::geometry::Rect;

/// Opaque identifier of a physical display for the current session.
///
/// Wraps whatever the platform hands out: an `HMONITOR` value on Windows, a
/// `CGDirectDisplayID` on macOS, or a synthetic number in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DisplayId(pub u64);

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One display as reported by a single topology query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayDescriptor {
    pub id: DisplayId,
    /// Bounds in global desktop coordinates.
    pub bounds: Rect,
    /// `true` if the OS reports this display as mirroring another display.
    pub is_mirrored: bool,
    /// `true` for the designated main display, used when the pointer lies
    /// outside every display's bounds.
    pub is_main: bool,
}

impl DisplayDescriptor {
    /// Creates a non-mirrored, non-main descriptor.
    pub fn new(id: DisplayId, bounds: Rect) -> Self {
        Self {
            id,
            bounds,
            is_mirrored: false,
            is_main: false,
        }
    }

    pub fn mirrored(mut self, is_mirrored: bool) -> Self {
        self.is_mirrored = is_mirrored;
        self
    }

    pub fn main(mut self, is_main: bool) -> Self {
        self.is_main = is_main;
        self
    }
}
