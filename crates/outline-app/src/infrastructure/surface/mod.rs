//! Overlay surfaces: one borderless, click-through, topmost drawing surface
//! per physical display.
//!
//! # Model and backend
//!
//! An [`OverlaySurface`] pairs two things:
//!
//! - a [`SurfaceModel`] from `outline-core`, which holds everything the surface
//!   shows (frame, visibility, outline path, spotlight mask and fade), and
//! - a [`SurfaceBackend`], the OS object that puts the model on screen.
//!
//! Every operation mutates the model first and only calls into the backend
//! when something observable changed, so repeated `show()`/`hide()` calls and
//! unchanged outline styles cost nothing.
//!
//! # Input passthrough
//!
//! Backends must never accept pointer or keyboard input and must never take
//! focus.  This is a hard invariant of every implementation, not a tuning knob.
//!
//! | Module     | Backend                                              |
//! |------------|------------------------------------------------------|
//! | `headless` | In-memory recorder (always compiled)                 |
//! | `windows`  | Two layered `WS_EX_TRANSPARENT` windows per display  |

use std::time::Instant;

use outline_core::{DisplayDescriptor, DisplayId, OutlineStyle, Point, Rect, SurfaceModel};
use thiserror::Error;

pub mod headless;

pub use headless::{HeadlessSurfaceFactory, SurfaceLog};

#[cfg(target_os = "windows")]
pub mod windows;

/// Error type for surface allocation.
#[derive(Debug, Error)]
pub enum SurfaceError {
    /// The OS refused to allocate a surface for one display.
    #[error("could not allocate an overlay surface for display {display}: {reason}")]
    Allocation { display: DisplayId, reason: String },

    /// This platform has no way to draw overlay surfaces.
    #[error("overlay surfaces are not supported: {0}")]
    Unsupported(String),
}

/// The OS side of one overlay surface.
pub trait SurfaceBackend: Send {
    /// Moves the surface to `frame` (global coordinates).
    fn set_frame(&mut self, frame: Rect);
    /// Puts the surface on screen above every other window, without activating it.
    fn order_front(&mut self);
    /// Takes the surface off screen without destroying it.
    fn order_out(&mut self);
    /// Redraws the surface from `model`.
    fn present(&mut self, model: &SurfaceModel);
    /// Releases every OS resource.  No other method is called afterwards.
    fn close(&mut self);
}

/// Allocates backends.  Owned by the overlay engine, which is the only
/// component that creates surfaces.
pub trait SurfaceFactory: Send {
    fn create_backend(&mut self, display: &DisplayDescriptor) -> Result<Box<dyn SurfaceBackend>, SurfaceError>;

    /// Services pending OS work (window messages).  Called once per loop tick
    /// on the thread that owns the surfaces.
    fn pump(&mut self) {}
}

/// One overlay surface pinned to one display.
pub struct OverlaySurface {
    display: DisplayId,
    model: SurfaceModel,
    backend: Box<dyn SurfaceBackend>,
}

impl OverlaySurface {
    /// Allocates a surface at the display's bounds.  The surface, its outline
    /// and its spotlight all start hidden.
    pub fn create(
        display: &DisplayDescriptor,
        style: OutlineStyle,
        factory: &mut dyn SurfaceFactory,
    ) -> Result<Self, SurfaceError> {
        let mut backend = factory.create_backend(display)?;
        backend.set_frame(display.bounds);
        backend.order_out();
        Ok(Self {
            display: display.id,
            model: SurfaceModel::new(display.bounds, style),
            backend,
        })
    }

    pub fn display(&self) -> DisplayId {
        self.display
    }

    pub fn model(&self) -> &SurfaceModel {
        &self.model
    }

    pub fn frame(&self) -> Rect {
        self.model.frame()
    }

    pub fn is_shown(&self) -> bool {
        self.model.is_shown()
    }

    pub fn is_outline_visible(&self) -> bool {
        self.model.outline.is_visible()
    }

    /// `true` if the spotlight currently puts a mask on screen.
    pub fn is_spotlight_presenting(&self) -> bool {
        self.model.spotlight.is_presenting()
    }

    pub fn is_animating(&self) -> bool {
        self.model.spotlight.is_animating()
    }

    /// Follows a display whose geometry changed.  Visibility is untouched; a
    /// live spotlight center is carried into the new local space or dropped.
    /// Returns `false` when the bounds were already current.
    pub fn resize(&mut self, bounds: Rect) -> bool {
        if !self.model.resize(bounds) {
            return false;
        }
        self.backend.set_frame(bounds);
        self.backend.present(&self.model);
        true
    }

    pub fn show(&mut self) {
        if self.model.set_shown(true) {
            self.backend.order_front();
            self.backend.present(&self.model);
        }
    }

    pub fn hide(&mut self) {
        if self.model.set_shown(false) {
            self.backend.order_out();
        }
    }

    pub fn set_outline_visible(&mut self, visible: bool) {
        if self.model.outline.is_visible() != visible {
            self.model.outline.set_visible(visible);
            self.backend.present(&self.model);
        }
    }

    /// Restyles the outline; the inset path follows the new thickness.
    pub fn update_outline(&mut self, style: OutlineStyle) {
        if *self.model.outline.style() != style {
            self.model.outline.set_style(style);
            self.backend.present(&self.model);
        }
    }

    pub fn set_spotlight_visible(&mut self, visible: bool, animated: bool, now: Instant) {
        let before = self.spotlight_state();
        self.model.spotlight.set_visible(visible, animated, now);
        if self.spotlight_state() != before {
            self.backend.present(&self.model);
        }
    }

    /// Cuts the spotlight hole at `center` (local coordinates).
    pub fn update_spotlight(&mut self, center: Point, radius: f64) {
        let spotlight = &self.model.spotlight;
        if spotlight.center() == Some(center) && spotlight.radius() == Some(radius) {
            return;
        }
        self.model.spotlight.update(center, radius);
        self.backend.present(&self.model);
    }

    /// Steps any running fade.  Returns `true` while one is still running.
    pub fn advance_animations(&mut self, now: Instant) -> bool {
        if !self.model.spotlight.is_animating() {
            return false;
        }
        let running = self.model.spotlight.advance(now);
        self.backend.present(&self.model);
        running
    }

    /// Hides and releases the surface.
    pub fn destroy(mut self) {
        self.hide();
        self.backend.close();
    }

    fn spotlight_state(&self) -> (bool, f64, bool) {
        let s = &self.model.spotlight;
        (s.is_hidden(), s.opacity(), s.is_animating())
    }
}

impl std::fmt::Debug for OverlaySurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlaySurface")
            .field("display", &self.display)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
