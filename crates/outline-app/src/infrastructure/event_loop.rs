//! The single task that owns the overlay engine.
//!
//! # Concurrency model (for beginners)
//!
//! All engine state lives on one task.  Nothing else holds a reference to the
//! engine; the rest of the program talks to it through an [`EngineHandle`],
//! which pushes [`EngineCommand`]s into an unbounded channel.  The driver
//! `select!`s over that channel and its timers, so every state change happens
//! in one place, one at a time, and no locks are needed.
//!
//! Timed sources:
//!
//! | Source     | Runs                                   | Calls                          |
//! |------------|----------------------------------------|--------------------------------|
//! | outline    | for the engine's whole lifetime        | `tick_outline`                 |
//! | spotlight  | only while the spotlight loop is on    | `tick_spotlight`               |
//! | animation  | only while a fade is in flight         | `advance_animations`           |
//! | poll       | when a poll interval is configured     | `handle_topology_changed`      |
//! | test timer | 2 s after a `TestSpotlight` command    | `end_spotlight`                |
//!
//! Intervals that are not needed are dropped, so stopping a loop is immediate
//! and there is never queued work to drain.  All intervals skip missed ticks
//! instead of bursting to catch up.

use std::time::Duration;

use outline_core::{topology_changed, Appearance, DisplayDescriptor};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::{interval_at, sleep_until, Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::application::{LoopKind, LoopTiming, OverlayEngine, StatusReport};
use crate::infrastructure::trigger::TriggerEdge;

/// How long a `TestSpotlight` command keeps the spotlight on.
pub const TEST_SPOTLIGHT_DURATION: Duration = Duration::from_secs(2);

/// Everything that can happen to the engine from outside its task.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    /// The OS reported a display configuration change.
    TopologyChanged,
    /// The spotlight trigger was pressed or released.
    Trigger(TriggerEdge),
    SetEnabled(bool),
    ToggleEnabled,
    ApplyAppearance(Appearance),
    /// Show the spotlight for [`TEST_SPOTLIGHT_DURATION`].
    TestSpotlight,
    /// Tear down every surface and exit the driver.
    Shutdown,
}

/// Error type for [`EngineHandle`] operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    /// The driver task has exited; commands can no longer be delivered.
    #[error("the overlay engine has stopped")]
    Stopped,
}

/// Cloneable, `Send` handle used to reach the engine from any thread or task.
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<EngineCommand>,
    status: watch::Receiver<StatusReport>,
}

impl EngineHandle {
    /// A handle plus the driver-side ends of its two channels.
    pub(crate) fn channel(
        initial: StatusReport,
    ) -> (Self, mpsc::UnboundedReceiver<EngineCommand>, watch::Sender<StatusReport>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(initial);
        let handle = Self {
            commands: command_tx,
            status: status_rx,
        };
        (handle, command_rx, status_tx)
    }

    /// Queues `command` for the driver.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Stopped`] once the driver has exited.
    pub fn send(&self, command: EngineCommand) -> Result<(), EngineError> {
        self.commands.send(command).map_err(|_| EngineError::Stopped)
    }

    pub fn topology_changed(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::TopologyChanged)
    }

    pub fn trigger(&self, edge: TriggerEdge) -> Result<(), EngineError> {
        self.send(EngineCommand::Trigger(edge))
    }

    pub fn set_enabled(&self, enabled: bool) -> Result<(), EngineError> {
        self.send(EngineCommand::SetEnabled(enabled))
    }

    pub fn toggle_enabled(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::ToggleEnabled)
    }

    pub fn apply_appearance(&self, appearance: Appearance) -> Result<(), EngineError> {
        self.send(EngineCommand::ApplyAppearance(appearance))
    }

    pub fn test_spotlight(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::TestSpotlight)
    }

    pub fn shutdown(&self) -> Result<(), EngineError> {
        self.send(EngineCommand::Shutdown)
    }

    /// The most recently published status.
    pub fn status(&self) -> StatusReport {
        self.status.borrow().clone()
    }

    /// A receiver that is notified whenever the status changes.
    pub fn subscribe(&self) -> watch::Receiver<StatusReport> {
        self.status.clone()
    }
}

/// Fade timestamps follow the tokio clock so paused-time tests stay in step.
fn tokio_now() -> std::time::Instant {
    Instant::now().into_std()
}

/// Owns the engine and runs its loops.
pub struct EngineDriver {
    engine: OverlayEngine,
    timing: LoopTiming,
    commands: mpsc::UnboundedReceiver<EngineCommand>,
    status: watch::Sender<StatusReport>,
    last_topology: Vec<DisplayDescriptor>,
    test_deadline: Option<Instant>,
}

impl EngineDriver {
    pub fn new(mut engine: OverlayEngine, timing: LoopTiming) -> (Self, EngineHandle) {
        engine.set_clock(tokio_now);
        let (handle, commands, status) = EngineHandle::channel(engine.status_report());

        let driver = Self {
            engine,
            timing,
            commands,
            status,
            last_topology: Vec::new(),
            test_deadline: None,
        };
        (driver, handle)
    }

    /// Starts the engine and runs until `Shutdown` arrives or every handle is
    /// dropped.  All surfaces are destroyed before the engine is returned.
    pub async fn run(mut self) -> OverlayEngine {
        self.engine.start();
        self.last_topology = self.engine.displays();
        self.publish();

        let mut outline = interval_after(self.timing.outline_period);
        let mut poll = self.timing.topology_poll.map(interval_after);
        let mut spotlight: Option<Interval> = None;
        let mut animation: Option<Interval> = None;

        info!(
            outline_period = ?self.timing.outline_period,
            spotlight_period = ?self.timing.spotlight_period,
            topology_poll = ?self.timing.topology_poll,
            "engine driver running"
        );

        loop {
            sync_interval(
                &mut spotlight,
                self.engine.is_loop_running(LoopKind::Spotlight),
                self.timing.spotlight_period,
            );
            sync_interval(
                &mut animation,
                self.engine.has_active_animations(),
                self.timing.animation_period,
            );

            tokio::select! {
                command = self.commands.recv() => match command {
                    None | Some(EngineCommand::Shutdown) => break,
                    Some(command) => self.handle(command),
                },
                _ = outline.tick() => self.engine.tick_outline(),
                _ = tick_opt(&mut spotlight) => self.engine.tick_spotlight(),
                _ = tick_opt(&mut animation) => {
                    let now = self.engine.now();
                    self.engine.advance_animations(now);
                }
                _ = tick_opt(&mut poll) => self.poll_topology(),
                _ = sleep_opt(self.test_deadline) => {
                    self.test_deadline = None;
                    debug!("test spotlight elapsed");
                    self.engine.end_spotlight();
                }
            }

            self.publish();
        }

        self.engine.shutdown();
        self.publish();
        info!("engine driver stopped");
        self.engine
    }

    fn handle(&mut self, command: EngineCommand) {
        debug!(?command, "engine command");
        match command {
            EngineCommand::TopologyChanged => {
                self.engine.handle_topology_changed();
                self.last_topology = self.engine.displays();
            }
            EngineCommand::Trigger(TriggerEdge::Pressed) => self.engine.begin_spotlight(),
            EngineCommand::Trigger(TriggerEdge::Released) => {
                self.test_deadline = None;
                self.engine.end_spotlight();
            }
            EngineCommand::SetEnabled(enabled) => self.set_enabled(enabled),
            EngineCommand::ToggleEnabled => self.set_enabled(!self.engine.enabled()),
            EngineCommand::ApplyAppearance(appearance) => self.engine.apply_appearance(appearance),
            EngineCommand::TestSpotlight => {
                self.engine.begin_spotlight();
                if self.engine.spotlight_active() {
                    self.test_deadline = Some(Instant::now() + TEST_SPOTLIGHT_DURATION);
                }
            }
            EngineCommand::Shutdown => {}
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.test_deadline = None;
        }
        self.engine.set_enabled(enabled);
    }

    fn poll_topology(&mut self) {
        let displays = self.engine.displays();
        if topology_changed(&self.last_topology, &displays) {
            debug!(count = displays.len(), "display topology change detected by poll");
            self.engine.handle_topology_changed();
        }
        self.last_topology = displays;
    }

    fn publish(&self) {
        let report = self.engine.status_report();
        self.status.send_if_modified(|current| {
            if *current == report {
                false
            } else {
                *current = report;
                true
            }
        });
    }
}

/// An interval whose first tick is one period from now.
fn interval_after(period: Duration) -> Interval {
    let mut interval = interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

fn sync_interval(slot: &mut Option<Interval>, wanted: bool, period: Duration) {
    match (wanted, slot.is_some()) {
        (true, false) => *slot = Some(interval_after(period)),
        (false, true) => *slot = None,
        _ => {}
    }
}

async fn tick_opt(interval: &mut Option<Interval>) -> Instant {
    match interval {
        Some(interval) => interval.tick().await,
        None => std::future::pending().await,
    }
}

async fn sleep_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::surface::HeadlessSurfaceFactory;
    use crate::infrastructure::topology::MockTopology;

    fn driver() -> (EngineDriver, EngineHandle) {
        let engine = OverlayEngine::new(
            Box::new(MockTopology::dual_1080p()),
            Box::new(HeadlessSurfaceFactory::new()),
            Appearance::default(),
        );
        EngineDriver::new(engine, LoopTiming::default())
    }

    #[test]
    fn test_send_after_driver_dropped_returns_stopped() {
        // Arrange
        let (driver, handle) = driver();

        // Act
        drop(driver);

        // Assert
        assert_eq!(handle.toggle_enabled(), Err(EngineError::Stopped));
    }

    #[test]
    fn test_initial_status_is_published_before_run() {
        let (_driver, handle) = driver();
        let status = handle.status();
        assert!(status.enabled);
        assert_eq!(status.windows, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_returns_engine_without_surfaces() {
        // Arrange
        let (driver, handle) = driver();
        let task = tokio::spawn(driver.run());
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(handle.status().windows, 2);

        // Act
        handle.shutdown().expect("send");
        let engine = task.await.expect("driver task");

        // Assert
        assert_eq!(engine.surface_count(), 0);
        assert!(!engine.is_loop_running(LoopKind::Outline));
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_every_handle_stops_driver() {
        let (driver, handle) = driver();
        let task = tokio::spawn(driver.run());

        drop(handle);

        let engine = task.await.expect("driver task");
        assert_eq!(engine.surface_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_trigger_edges_start_and_stop_spotlight() {
        // Arrange
        let (driver, handle) = driver();
        let task = tokio::spawn(driver.run());

        // Act
        handle.trigger(TriggerEdge::Pressed).expect("send");
        tokio::time::sleep(Duration::from_millis(50)).await;
        let during = handle.status().spotlight_active;
        handle.trigger(TriggerEdge::Released).expect("send");
        tokio::time::sleep(Duration::from_millis(50)).await;
        let after = handle.status().spotlight_active;

        // Assert
        assert!(during);
        assert!(!after);
        handle.shutdown().expect("send");
        task.await.expect("driver task");
    }
}
