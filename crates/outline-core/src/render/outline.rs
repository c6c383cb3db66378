//! The stroked rectangle drawn around the active display.

use crate::domain::appearance::OutlineStyle;
use crate::domain::geometry::Rect;

/// Render state of a surface's outline.
///
/// The stroke path is the surface's local bounds inset by exactly half the
/// stroke thickness, so the full stroke width lies inside the surface and
/// nothing is clipped at the screen edge.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineLayer {
    visible: bool,
    style: OutlineStyle,
    local_bounds: Rect,
    path: Rect,
}

impl OutlineLayer {
    /// Creates a hidden outline laid out for `local_bounds`.
    pub fn new(local_bounds: Rect, style: OutlineStyle) -> Self {
        let mut layer = Self {
            visible: false,
            style,
            local_bounds,
            path: Rect::default(),
        };
        layer.recompute_path();
        layer
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn style(&self) -> &OutlineStyle {
        &self.style
    }

    /// The rectangle the stroke is centred on, in local coordinates.
    pub fn path(&self) -> Rect {
        self.path
    }

    pub fn set_style(&mut self, style: OutlineStyle) {
        self.style = style;
        self.recompute_path();
    }

    /// Re-lays out the path for new surface bounds.
    pub fn layout(&mut self, local_bounds: Rect) {
        self.local_bounds = local_bounds;
        self.recompute_path();
    }

    fn recompute_path(&mut self) {
        let inset = self.style.thickness() / 2.0;
        self.path = self.local_bounds.inset_by(inset, inset);
    }
}
