//! Spotlight trigger sources.
//!
//! A trigger source turns some physical signal (a held hotkey, a console
//! command, a test) into two edge callbacks, `on_pressed` and `on_released`,
//! delivered through a [`TriggerSink`].  The sink marshals each edge onto the
//! engine task via the [`EngineHandle`], so a source may call it from any
//! thread, including an OS hook callback.
//!
//! | Module    | Source                                       |
//! |-----------|----------------------------------------------|
//! | `mock`    | Test double driven by `press()`/`release()`  |
//! | `console` | Line commands read from stdin                |

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::infrastructure::event_loop::EngineHandle;

pub mod console;
pub mod mock;

pub use console::{parse_console_command, ConsoleCommand, ConsoleTriggerSource};
pub use mock::MockTriggerSource;

/// A trigger transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEdge {
    Pressed,
    Released,
}

/// Error type for trigger sources.
#[derive(Debug, Error)]
pub enum TriggerError {
    /// `start` was called on a source that is already running.
    #[error("trigger source already started")]
    AlreadyStarted,

    /// The source could not attach to its input.
    #[error("failed to start trigger source: {0}")]
    Start(String),
}

/// The callbacks a [`TriggerSource`] reports edges to.
///
/// Repeated presses without an intervening release (key auto-repeat) and
/// releases without a press are swallowed, so the engine sees at most one
/// edge per physical press and release.
#[derive(Debug, Clone)]
pub struct TriggerSink {
    handle: EngineHandle,
    pressed: Arc<AtomicBool>,
}

impl TriggerSink {
    pub fn new(handle: EngineHandle) -> Self {
        Self {
            handle,
            pressed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn on_pressed(&self) {
        if !self.pressed.swap(true, Ordering::SeqCst) {
            self.deliver(TriggerEdge::Pressed);
        }
    }

    pub fn on_released(&self) {
        if self.pressed.swap(false, Ordering::SeqCst) {
            self.deliver(TriggerEdge::Released);
        }
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::SeqCst)
    }

    /// The engine handle, for sources that also carry non-trigger commands.
    pub fn handle(&self) -> &EngineHandle {
        &self.handle
    }

    fn deliver(&self, edge: TriggerEdge) {
        if let Err(e) = self.handle.trigger(edge) {
            debug!(?edge, error = %e, "trigger edge dropped");
        }
    }
}

/// Produces trigger edges.
pub trait TriggerSource: Send {
    /// Begins reporting edges to `sink`.
    ///
    /// # Errors
    ///
    /// [`TriggerError::AlreadyStarted`] if running, or [`TriggerError::Start`]
    /// if the input cannot be attached.
    fn start(&mut self, sink: TriggerSink) -> Result<(), TriggerError>;

    /// Stops reporting.  Stopping a stopped source is a no-op.
    fn stop(&mut self);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
