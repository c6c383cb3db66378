//! Render primitives drawn by every overlay surface.
//!
//! Nothing here knows how pixels reach the screen.  Each primitive is a value
//! derived from its inputs (bounds, style, pointer position) and recomputed
//! whenever an input changes; no path is ever edited incrementally.  Surface
//! backends read the resulting [`SurfaceModel`](surface_model::SurfaceModel)
//! and translate it into layers, regions, or draw calls.

pub mod outline;
pub mod path;
pub mod spotlight;
pub mod surface_model;
