//! Mock trigger source for unit testing.
//!
//! Lets tests fire press and release edges without any OS hotkey plumbing.

use std::sync::{Arc, Mutex};

use super::{TriggerError, TriggerSink, TriggerSource};

/// A [`TriggerSource`] driven by explicit `press()` / `release()` calls.
#[derive(Debug, Clone, Default)]
pub struct MockTriggerSource {
    sink: Arc<Mutex<Option<TriggerSink>>>,
}

impl MockTriggerSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fires a press edge.  Ignored unless started.
    pub fn press(&self) {
        if let Some(sink) = self.current() {
            sink.on_pressed();
        }
    }

    /// Fires a release edge.  Ignored unless started.
    pub fn release(&self) {
        if let Some(sink) = self.current() {
            sink.on_released();
        }
    }

    pub fn is_started(&self) -> bool {
        self.current().is_some()
    }

    fn current(&self) -> Option<TriggerSink> {
        self.sink
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl TriggerSource for MockTriggerSource {
    fn start(&mut self, sink: TriggerSink) -> Result<(), TriggerError> {
        let mut slot = self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.is_some() {
            return Err(TriggerError::AlreadyStarted);
        }
        *slot = Some(sink);
        Ok(())
    }

    fn stop(&mut self) {
        *self.sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}
