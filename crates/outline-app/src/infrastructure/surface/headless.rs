//! In-memory surface backend for tests and `--headless` runs.
//!
//! Nothing is drawn.  Every backend call is recorded into a shared
//! [`SurfaceLog`] so tests can assert how often surfaces were created,
//! destroyed, moved, ordered on screen, and redrawn, and can inject creation
//! failures for chosen displays.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use outline_core::{DisplayDescriptor, DisplayId, Rect, SurfaceModel};

use super::{SurfaceBackend, SurfaceError, SurfaceFactory};

/// How many recent creation and destruction ids the log remembers.  The
/// counts keep growing; the id histories are capped.
pub const ID_HISTORY_LIMIT: usize = 256;

#[derive(Debug, Default)]
struct SurfaceLogState {
    created: VecDeque<DisplayId>,
    created_total: usize,
    destroyed: VecDeque<DisplayId>,
    destroyed_total: usize,
    frames: BTreeMap<DisplayId, Rect>,
    on_screen: BTreeSet<DisplayId>,
    last_presented: BTreeMap<DisplayId, SurfaceModel>,
    presents: u64,
    failing: BTreeSet<DisplayId>,
}

/// Shared record of every headless backend call.
#[derive(Debug, Clone, Default)]
pub struct SurfaceLog {
    state: Arc<Mutex<SurfaceLogState>>,
}

impl SurfaceLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn created_count(&self) -> usize {
        self.lock().created_total
    }

    pub fn destroyed_count(&self) -> usize {
        self.lock().destroyed_total
    }

    /// The most recent [`ID_HISTORY_LIMIT`] created display ids, oldest first
    /// (a display recreated later appears twice).
    pub fn created_ids(&self) -> Vec<DisplayId> {
        self.lock().created.iter().copied().collect()
    }

    /// The most recent [`ID_HISTORY_LIMIT`] destroyed display ids, oldest first.
    pub fn destroyed_ids(&self) -> Vec<DisplayId> {
        self.lock().destroyed.iter().copied().collect()
    }

    /// Total number of redraws across all surfaces.
    pub fn present_count(&self) -> u64 {
        self.lock().presents
    }

    pub fn frame(&self, display: DisplayId) -> Option<Rect> {
        self.lock().frames.get(&display).copied()
    }

    pub fn is_on_screen(&self, display: DisplayId) -> bool {
        self.lock().on_screen.contains(&display)
    }

    /// The model most recently presented for `display`.
    pub fn last_presented(&self, display: DisplayId) -> Option<SurfaceModel> {
        self.lock().last_presented.get(&display).cloned()
    }

    /// Makes every future creation for `display` fail until
    /// [`allow_creation_for`](Self::allow_creation_for) is called.
    pub fn fail_creation_for(&self, display: DisplayId) {
        self.lock().failing.insert(display);
    }

    pub fn allow_creation_for(&self, display: DisplayId) {
        self.lock().failing.remove(&display);
    }

    fn lock(&self) -> MutexGuard<'_, SurfaceLogState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Creates [`HeadlessBackend`]s that record into one [`SurfaceLog`].
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurfaceFactory {
    log: SurfaceLog,
}

impl HeadlessSurfaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: SurfaceLog) -> Self {
        Self { log }
    }

    /// A handle to the shared log.
    pub fn log(&self) -> SurfaceLog {
        self.log.clone()
    }
}

impl SurfaceFactory for HeadlessSurfaceFactory {
    fn create_backend(&mut self, display: &DisplayDescriptor) -> Result<Box<dyn SurfaceBackend>, SurfaceError> {
        let mut state = self.log.lock();
        if state.failing.contains(&display.id) {
            return Err(SurfaceError::Allocation {
                display: display.id,
                reason: "creation failure injected by test".to_string(),
            });
        }
        state.created_total += 1;
        push_bounded(&mut state.created, display.id);
        drop(state);

        Ok(Box::new(HeadlessBackend {
            display: display.id,
            log: self.log.clone(),
        }))
    }
}

/// A backend that records instead of drawing.
#[derive(Debug)]
pub struct HeadlessBackend {
    display: DisplayId,
    log: SurfaceLog,
}

impl SurfaceBackend for HeadlessBackend {
    fn set_frame(&mut self, frame: Rect) {
        self.log.lock().frames.insert(self.display, frame);
    }

    fn order_front(&mut self) {
        self.log.lock().on_screen.insert(self.display);
    }

    fn order_out(&mut self) {
        self.log.lock().on_screen.remove(&self.display);
    }

    fn present(&mut self, model: &SurfaceModel) {
        let mut state = self.log.lock();
        state.presents += 1;
        state.last_presented.insert(self.display, model.clone());
    }

    fn close(&mut self) {
        let mut state = self.log.lock();
        state.on_screen.remove(&self.display);
        state.frames.remove(&self.display);
        state.last_presented.remove(&self.display);
        state.destroyed_total += 1;
        push_bounded(&mut state.destroyed, self.display);
    }
}

fn push_bounded(history: &mut VecDeque<DisplayId>, id: DisplayId) {
    if history.len() == ID_HISTORY_LIMIT {
        history.pop_front();
    }
    history.push_back(id);
}

// ── Tests ─────────────────────────────────────────────────────────────────────
