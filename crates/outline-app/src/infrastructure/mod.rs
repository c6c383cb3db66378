//! Infrastructure layer for Cursor Outline.
//!
//! Contains the OS-facing adapters: display topology readers, overlay surface
//! backends, trigger sources, configuration storage, and the event loop that
//! owns the engine at runtime.

pub mod event_loop;
pub mod storage;
pub mod surface;
pub mod topology;
pub mod trigger;
