//! # outline-core
//!
//! Shared library for Cursor Outline containing display geometry, the display
//! topology policy, appearance values, and the render primitives drawn by each
//! overlay surface.
//!
//! This crate is used by the application crate (`outline-app`).  It has zero
//! dependencies on OS APIs, windowing toolkits, timers, or async runtimes, so
//! everything in it can be unit-tested on any machine without a display.
//!
//! # Architecture overview (for beginners)
//!
//! Cursor Outline draws a highlighted border around whichever display holds the
//! mouse pointer when more than one (non-mirrored) display is connected, and a
//! "spotlight" vignette that follows the pointer while a trigger is held.
//!
//! This crate (`outline-core`) is the shared foundation.  It defines:
//!
//! - **`domain`** – What the world looks like: points and rectangles in the
//!   global desktop coordinate space, display descriptors as reported by the OS,
//!   the policy that decides "which display is under the pointer" and "is this a
//!   multi-display setup", and the clamped appearance settings.
//!
//! - **`render`** – What an overlay surface draws: the inset outline rectangle,
//!   the even-odd spotlight mask with a circular hole, the spotlight fade
//!   animation, and the [`SurfaceModel`] that aggregates the full render state of
//!   one surface.

// Declare the two top-level modules.  Rust will look for each in a
// subdirectory with the same name (e.g., src/domain/mod.rs).
pub mod domain;
pub mod render;

// Re-export the most-used types at the crate root so callers can write
// `outline_core::Rect` instead of `outline_core::domain::geometry::Rect`.
pub use domain::appearance::{
    Appearance, OutlineStyle, Rgba, SpotlightStyle, DEFAULT_OUTLINE_THICKNESS,
    DEFAULT_SPOTLIGHT_RADIUS, OUTLINE_THICKNESS_RANGE, SPOTLIGHT_RADIUS_RANGE,
};
pub use domain::display::{DisplayDescriptor, DisplayId};
pub use domain::geometry::{Point, Rect, Size};
pub use domain::topology::{
    assess_multi_display, display_containing, display_under_point, is_multi_display_active,
    live_ids, topology_changed, MultiDisplayAssessment, MultiDisplayRule,
};
pub use render::outline::OutlineLayer;
pub use render::path::{FillRule, Path, PathElement};
pub use render::spotlight::{Fade, SpotlightLayer, SPOTLIGHT_APPEAR, SPOTLIGHT_DISAPPEAR};
pub use render::surface_model::SurfaceModel;
