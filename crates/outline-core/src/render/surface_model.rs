//! The complete render state of one overlay surface.

use tracing::trace;

use crate::domain::appearance::OutlineStyle;
use crate::domain::geometry::Rect;
use crate::render::outline::OutlineLayer;
use crate::render::spotlight::SpotlightLayer;

/// What one overlay surface shows, independent of how it is drawn.
///
/// `frame` is in global coordinates; both layers work in the surface's local
/// space, whose origin is `frame`'s top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceModel {
    frame: Rect,
    shown: bool,
    pub outline: OutlineLayer,
    pub spotlight: SpotlightLayer,
}

impl SurfaceModel {
    /// A hidden surface with a hidden outline and a hidden spotlight.
    pub fn new(frame: Rect, style: OutlineStyle) -> Self {
        let local = frame.local_bounds();
        Self {
            frame,
            shown: false,
            outline: OutlineLayer::new(local, style),
            spotlight: SpotlightLayer::new(local),
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn local_bounds(&self) -> Rect {
        self.frame.local_bounds()
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    /// Returns `true` if the flag actually changed.
    pub fn set_shown(&mut self, shown: bool) -> bool {
        let changed = self.shown != shown;
        self.shown = shown;
        changed
    }

    /// Moves the surface to `bounds`.  Returns `false` if the bounds are
    /// unchanged and nothing was touched.
    ///
    /// Visibility flags are preserved.  A remembered spotlight center is
    /// carried through global space into the new local space; if it no longer
    /// lies on the surface the spotlight forgets it.
    pub fn resize(&mut self, bounds: Rect) -> bool {
        if bounds == self.frame {
            return false;
        }

        let old = self.frame;
        let local = bounds.local_bounds();
        let center = self
            .spotlight
            .center()
            .map(|c| bounds.to_local(old.to_global(c)))
            .filter(|c| local.contains(*c));

        if self.spotlight.center().is_some() && center.is_none() {
            trace!(?old, ?bounds, "spotlight center fell off the resized surface");
        }

        self.frame = bounds;
        self.outline.layout(local);
        self.spotlight.layout(local, center);
        true
    }
}
