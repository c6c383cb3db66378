//! Application layer for Cursor Outline.
//!
//! # What lives here (for beginners)
//!
//! The application layer sits between the pure policy in `outline_core` and
//! the OS adapters in `infrastructure`.  It orchestrates them without making
//! any OS calls itself: display queries, surface allocation and drawing all go
//! through traits injected at construction time, so everything here can be
//! driven from unit tests with in-memory fakes.
//!
//! # Sub-modules
//!
//! - **`overlay_engine`** – The state machine that owns one overlay surface per
//!   display, reconciles that set against the live topology, and decides on
//!   every tick which surface shows the outline and the spotlight.
//!
//! - **`loops`** – Run flags and pacing for the engine's two independent timed
//!   loops (outline and spotlight).
//!
//! - **`status`** – The human-readable status wording and the serializable
//!   status report published to the shell.

pub mod loops;
pub mod overlay_engine;
pub mod status;

pub use loops::{LoopKind, LoopState, LoopTiming};
pub use overlay_engine::{Clock, OverlayEngine, ReconcileReport};
pub use status::{OutlineStatus, StatusReport};
