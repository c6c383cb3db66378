//! OverlayEngine: keeps one overlay surface per live display and decides, tick
//! by tick, which surface shows the outline and which shows the spotlight.
//!
//! # State
//!
//! The engine has two orthogonal axes:
//!
//! - **Enablement.**  Disabling ends the spotlight, hides every outline and
//!   spotlight, then hides the surfaces themselves.  Surfaces are kept so that
//!   re-enabling is instant.
//! - **Spotlight activity.**  `begin_spotlight` starts the spotlight loop (only
//!   while enabled); `end_spotlight` always stops it and fades every spotlight
//!   out.
//!
//! # Surface arena
//!
//! Surfaces live in a `BTreeMap<DisplayId, OverlaySurface>` owned by the engine.
//! Only [`OverlayEngine::reconcile`] inserts or removes entries, using a set
//! reconciliation against the live topology: live displays with a surface are
//! resized in place, new ones get a surface, vanished ones are destroyed, and
//! untouched ones are left alone so nothing flickers.
//!
//! Both loop ticks first check whether the arena still matches the live
//! topology and reconcile when it does not, so a missed topology notification
//! heals within one tick.
//!
//! # Threading
//!
//! The engine is not shared.  It is owned by the driver task, and every
//! external event reaches it as a command on that task.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Instant;

use outline_core::{
    is_multi_display_active, live_ids, Appearance, DisplayDescriptor, DisplayId,
};
use tracing::{debug, info, warn};

use crate::application::loops::{LoopKind, LoopState};
use crate::application::status::{OutlineStatus, StatusReport};
use crate::infrastructure::surface::{OverlaySurface, SurfaceFactory};
use crate::infrastructure::topology::DisplayTopology;

/// Source of "now" for fade animations.
pub type Clock = fn() -> Instant;

/// What the last outline pass applied.  An identical snapshot on the next tick
/// means there is nothing to redraw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OutlineSnapshot {
    show_outline: bool,
    active_display: Option<DisplayId>,
    surface_count: usize,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub created: Vec<DisplayId>,
    pub resized: Vec<DisplayId>,
    pub removed: Vec<DisplayId>,
    /// Displays whose surface could not be allocated; retried next pass.
    pub failed: Vec<DisplayId>,
}

impl ReconcileReport {
    /// `true` if the arena was not touched.
    pub fn is_unchanged(&self) -> bool {
        self.created.is_empty() && self.resized.is_empty() && self.removed.is_empty()
    }
}

/// The multi-display overlay engine.
pub struct OverlayEngine {
    topology: Box<dyn DisplayTopology>,
    factory: Box<dyn SurfaceFactory>,
    surfaces: BTreeMap<DisplayId, OverlaySurface>,
    enabled: bool,
    spotlight_active: bool,
    last_outline: Option<OutlineSnapshot>,
    appearance: Appearance,
    loops: LoopState,
    /// Displays whose last creation attempt failed; keeps retries at `debug`.
    creation_failures: BTreeSet<DisplayId>,
    clock: Clock,
}

impl OverlayEngine {
    /// Creates an enabled, not yet started engine with no surfaces.
    pub fn new(
        topology: Box<dyn DisplayTopology>,
        factory: Box<dyn SurfaceFactory>,
        appearance: Appearance,
    ) -> Self {
        Self {
            topology,
            factory,
            surfaces: BTreeMap::new(),
            enabled: true,
            spotlight_active: false,
            last_outline: None,
            appearance,
            loops: LoopState::default(),
            creation_failures: BTreeSet::new(),
            clock: Instant::now,
        }
    }

    /// Replaces the animation clock.
    pub fn set_clock(&mut self, clock: Clock) {
        self.clock = clock;
    }

    pub fn now(&self) -> Instant {
        (self.clock)()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Reconciles against the live topology and starts the outline loop.
    /// Calling it again is a no-op.
    pub fn start(&mut self) {
        if !self.loops.start(LoopKind::Outline) {
            return;
        }
        info!(enabled = self.enabled, "overlay engine started");
        let displays = self.topology.current_displays();
        self.reconcile_with(&displays);
        self.last_outline = None;
        self.update_outline(&displays);
    }

    /// Stops both loops and destroys every surface.
    pub fn shutdown(&mut self) {
        self.loops.stop(LoopKind::Outline);
        self.loops.stop(LoopKind::Spotlight);
        self.spotlight_active = false;
        let count = self.surfaces.len();
        for (_, surface) in std::mem::take(&mut self.surfaces) {
            surface.destroy();
        }
        self.last_outline = None;
        info!(count, "overlay engine shut down");
    }

    // ── Enablement ────────────────────────────────────────────────────────────

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling clears every surface regardless of prior state; enabling
    /// brings the surfaces back and forces an outline pass.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            info!(enabled, "overlay enablement changed");
        }
        self.enabled = enabled;

        if enabled {
            for surface in self.surfaces.values_mut() {
                surface.show();
            }
            self.last_outline = None;
            if self.loops.is_running(LoopKind::Outline) {
                let displays = self.topology.current_displays();
                self.update_outline(&displays);
            }
        } else {
            self.loops.stop(LoopKind::Spotlight);
            self.spotlight_active = false;
            let now = self.now();
            for surface in self.surfaces.values_mut() {
                surface.set_outline_visible(false);
                surface.set_spotlight_visible(false, false, now);
                surface.hide();
            }
            self.last_outline = None;
        }
    }

    // ── Spotlight ─────────────────────────────────────────────────────────────

    pub fn spotlight_active(&self) -> bool {
        self.spotlight_active
    }

    /// Starts the spotlight loop and runs its first tick.  No-op while
    /// disabled or already active.
    pub fn begin_spotlight(&mut self) {
        if !self.enabled || self.spotlight_active {
            return;
        }
        self.spotlight_active = true;
        self.loops.start(LoopKind::Spotlight);
        debug!("spotlight began");
        self.tick_spotlight();
    }

    /// Stops the spotlight loop and fades every spotlight out.
    pub fn end_spotlight(&mut self) {
        self.loops.stop(LoopKind::Spotlight);
        if std::mem::replace(&mut self.spotlight_active, false) {
            debug!("spotlight ended");
        }
        let now = self.now();
        for surface in self.surfaces.values_mut() {
            surface.set_spotlight_visible(false, true, now);
        }
    }

    // ── Loop ticks ────────────────────────────────────────────────────────────

    /// One outline-loop tick.  Does nothing before [`start`](Self::start).
    pub fn tick_outline(&mut self) {
        if !self.loops.is_running(LoopKind::Outline) {
            return;
        }
        self.factory.pump();
        let displays = self.refresh();
        self.update_outline(&displays);
    }

    /// One spotlight-loop tick: cut the hole under the pointer on its display
    /// and hide the spotlight everywhere else.  When the pointer display has
    /// no surface every spotlight is hidden and no hole is cut.
    pub fn tick_spotlight(&mut self) {
        if !self.spotlight_active || !self.loops.is_running(LoopKind::Spotlight) {
            return;
        }
        self.factory.pump();
        self.refresh();

        let Some(target) = self.topology.display_under_pointer() else {
            debug!("spotlight tick skipped: no display under pointer");
            return;
        };
        let Some(pointer) = self.topology.pointer_location() else {
            debug!("spotlight tick skipped: pointer location unavailable");
            return;
        };
        let now = self.now();
        if !self.surfaces.contains_key(&target.id) {
            debug!(display = %target.id, "spotlight tick skipped: display has no surface");
            for surface in self.surfaces.values_mut() {
                surface.set_spotlight_visible(false, false, now);
            }
            return;
        }

        let radius = self.appearance.spotlight.radius();
        for (id, surface) in self.surfaces.iter_mut() {
            if *id == target.id {
                let center = surface.frame().to_local(pointer);
                surface.update_spotlight(center, radius);
                surface.set_spotlight_visible(true, false, now);
            } else {
                surface.set_spotlight_visible(false, false, now);
            }
        }
    }

    /// Steps running fades.  Returns `true` while any is still running.
    pub fn advance_animations(&mut self, now: Instant) -> bool {
        let mut running = false;
        for surface in self.surfaces.values_mut() {
            running |= surface.advance_animations(now);
        }
        running
    }

    pub fn has_active_animations(&self) -> bool {
        self.surfaces.values().any(OverlaySurface::is_animating)
    }

    pub fn is_loop_running(&self, kind: LoopKind) -> bool {
        self.loops.is_running(kind)
    }

    // ── Topology ──────────────────────────────────────────────────────────────

    /// Topology-change notification: reconcile, then re-apply the outline.
    pub fn handle_topology_changed(&mut self) {
        let displays = self.topology.current_displays();
        let report = self.reconcile_with(&displays);
        debug!(
            created = report.created.len(),
            resized = report.resized.len(),
            removed = report.removed.len(),
            failed = report.failed.len(),
            "topology changed"
        );
        self.last_outline = None;
        if self.loops.is_running(LoopKind::Outline) {
            self.update_outline(&displays);
        }
    }

    /// Brings the surface arena in line with the live topology.
    pub fn reconcile(&mut self) -> ReconcileReport {
        let displays = self.topology.current_displays();
        self.reconcile_with(&displays)
    }

    fn reconcile_with(&mut self, displays: &[DisplayDescriptor]) -> ReconcileReport {
        let mut report = ReconcileReport::default();
        let mut live = BTreeSet::new();

        for descriptor in displays {
            if !live.insert(descriptor.id) {
                debug!(display = %descriptor.id, "duplicate display id in topology; ignoring");
                continue;
            }

            if let Some(surface) = self.surfaces.get_mut(&descriptor.id) {
                if surface.resize(descriptor.bounds) {
                    debug!(display = %descriptor.id, bounds = ?descriptor.bounds, "overlay surface resized");
                    report.resized.push(descriptor.id);
                }
                continue;
            }

            match OverlaySurface::create(descriptor, self.appearance.outline, self.factory.as_mut()) {
                Ok(mut surface) => {
                    if self.enabled {
                        surface.show();
                    }
                    info!(display = %descriptor.id, bounds = ?descriptor.bounds, "overlay surface created");
                    self.creation_failures.remove(&descriptor.id);
                    self.surfaces.insert(descriptor.id, surface);
                    report.created.push(descriptor.id);
                }
                Err(e) => {
                    if self.creation_failures.insert(descriptor.id) {
                        warn!(display = %descriptor.id, error = %e, "overlay surface creation failed; will retry");
                    } else {
                        debug!(display = %descriptor.id, error = %e, "overlay surface creation still failing");
                    }
                    report.failed.push(descriptor.id);
                }
            }
        }

        let stale: Vec<DisplayId> = self
            .surfaces
            .keys()
            .filter(|id| !live.contains(*id))
            .copied()
            .collect();
        for id in stale {
            if let Some(surface) = self.surfaces.remove(&id) {
                surface.destroy();
                info!(display = %id, "overlay surface removed");
                report.removed.push(id);
            }
        }
        self.creation_failures.retain(|id| live.contains(id));

        if !report.is_unchanged() {
            self.last_outline = None;
        }
        report
    }

    /// Queries the topology and reconciles when the arena has drifted from it.
    fn refresh(&mut self) -> Vec<DisplayDescriptor> {
        let displays = self.topology.current_displays();
        if self.needs_reconcile(&displays) {
            self.reconcile_with(&displays);
        }
        displays
    }

    fn needs_reconcile(&self, displays: &[DisplayDescriptor]) -> bool {
        live_ids(displays) != self.known_ids()
            || displays.iter().any(|d| {
                self.surfaces
                    .get(&d.id)
                    .is_some_and(|surface| surface.frame() != d.bounds)
            })
    }

    fn known_ids(&self) -> BTreeSet<DisplayId> {
        self.surfaces.keys().copied().collect()
    }

    // ── Outline ───────────────────────────────────────────────────────────────

    fn update_outline(&mut self, displays: &[DisplayDescriptor]) {
        let show_outline = self.enabled && is_multi_display_active(displays);
        let active_display = if show_outline {
            self.topology.display_under_pointer().map(|d| d.id)
        } else {
            None
        };

        let snapshot = OutlineSnapshot {
            show_outline,
            active_display,
            surface_count: self.surfaces.len(),
        };
        if self.last_outline == Some(snapshot) {
            return;
        }
        self.last_outline = Some(snapshot);

        let style = self.appearance.outline;
        for (id, surface) in self.surfaces.iter_mut() {
            if show_outline && active_display == Some(*id) {
                surface.update_outline(style);
                surface.set_outline_visible(true);
            } else {
                surface.set_outline_visible(false);
            }
        }
    }

    // ── Appearance ────────────────────────────────────────────────────────────

    pub fn appearance(&self) -> Appearance {
        self.appearance
    }

    /// Uses `appearance` from now on.  The active outline is restyled at once;
    /// the spotlight radius applies from the next spotlight tick.
    pub fn apply_appearance(&mut self, appearance: Appearance) {
        self.appearance = appearance;
        self.last_outline = None;
        if self.loops.is_running(LoopKind::Outline) {
            let displays = self.topology.current_displays();
            self.update_outline(&displays);
        }
    }

    // ── Introspection ─────────────────────────────────────────────────────────

    pub fn displays(&self) -> Vec<DisplayDescriptor> {
        self.topology.current_displays()
    }

    pub fn surface(&self, display: DisplayId) -> Option<&OverlaySurface> {
        self.surfaces.get(&display)
    }

    pub fn surface_ids(&self) -> Vec<DisplayId> {
        self.surfaces.keys().copied().collect()
    }

    pub fn surface_count(&self) -> usize {
        self.surfaces.len()
    }

    pub fn outline_status(&self) -> OutlineStatus {
        self.outline_status_for(&self.topology.current_displays(), self.pointer_display())
    }

    /// e.g. `"Outline: hidden, single display"`.
    pub fn outline_status_text(&self) -> String {
        format!("Outline: {}", self.outline_status())
    }

    /// e.g. `"Diag: screens=2 windows=2 cursor=1"`.
    pub fn diagnostics_text(&self) -> String {
        self.diagnostics_for(self.topology.current_displays().len(), self.pointer_display())
    }

    pub fn status_report(&self) -> StatusReport {
        let displays = self.topology.current_displays();
        let pointer_display = self.pointer_display();
        let outline = self.outline_status_for(&displays, pointer_display);
        StatusReport {
            enabled: self.enabled,
            spotlight_active: self.spotlight_active,
            outline,
            outline_text: format!("Outline: {outline}"),
            diagnostics: self.diagnostics_for(displays.len(), pointer_display),
            screens: displays.len(),
            windows: self.surfaces.len(),
            pointer_display: pointer_display.map(|id| id.0),
            multi_display: is_multi_display_active(&displays),
        }
    }

    fn pointer_display(&self) -> Option<DisplayId> {
        self.topology.display_under_pointer().map(|d| d.id)
    }

    fn outline_status_for(
        &self,
        displays: &[DisplayDescriptor],
        pointer_display: Option<DisplayId>,
    ) -> OutlineStatus {
        if !self.enabled {
            return OutlineStatus::Off;
        }
        if !is_multi_display_active(displays) {
            return OutlineStatus::HiddenSingleDisplay;
        }
        let pointer_unsurfaced =
            pointer_display.is_some_and(|id| !self.surfaces.contains_key(&id));
        if live_ids(displays) != self.known_ids() || pointer_unsurfaced {
            return OutlineStatus::SyncingDisplays;
        }
        OutlineStatus::ActiveMultiDisplay
    }

    fn diagnostics_for(&self, screens: usize, pointer_display: Option<DisplayId>) -> String {
        let cursor = pointer_display.map_or_else(|| "nil".to_string(), |id| id.to_string());
        format!(
            "Diag: screens={screens} windows={} cursor={cursor}",
            self.surfaces.len()
        )
    }
}

impl std::fmt::Debug for OverlayEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayEngine")
            .field("surfaces", &self.surfaces)
            .field("enabled", &self.enabled)
            .field("spotlight_active", &self.spotlight_active)
            .field("loops", &self.loops)
            .finish_non_exhaustive()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use outline_core::{Point, Rect, Rgba, SPOTLIGHT_DISAPPEAR};

    use super::*;
    use crate::infrastructure::surface::{HeadlessSurfaceFactory, SurfaceLog};
    use crate::infrastructure::topology::{MockDisplayTopology, MockTopology};

    fn engine_with(topology: MockTopology) -> (OverlayEngine, SurfaceLog) {
        let factory = HeadlessSurfaceFactory::new();
        let log = factory.log();
        let engine = OverlayEngine::new(Box::new(topology), Box::new(factory), Appearance::default());
        (engine, log)
    }

    fn outlined(engine: &OverlayEngine) -> Vec<DisplayId> {
        engine
            .surface_ids()
            .into_iter()
            .filter(|id| engine.surface(*id).is_some_and(OverlaySurface::is_outline_visible))
            .collect()
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    #[test]
    fn test_start_creates_one_shown_surface_per_display() {
        // Arrange
        let (mut engine, log) = engine_with(MockTopology::dual_1080p());

        // Act
        engine.start();

        // Assert
        assert_eq!(engine.surface_ids(), vec![DisplayId(1), DisplayId(2)]);
        assert!(log.is_on_screen(DisplayId(1)));
        assert!(log.is_on_screen(DisplayId(2)));
        assert!(engine.is_loop_running(LoopKind::Outline));
    }

    #[test]
    fn test_start_is_idempotent() {
        let (mut engine, log) = engine_with(MockTopology::dual_1080p());
        engine.start();
        engine.start();
        assert_eq!(log.created_count(), 2);
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let (mut engine, log) = engine_with(MockTopology::dual_1080p());
        engine.tick_outline();
        assert_eq!(log.created_count(), 0);
    }

    #[test]
    fn test_shutdown_destroys_every_surface() {
        // Arrange
        let (mut engine, log) = engine_with(MockTopology::dual_1080p());
        engine.start();

        // Act
        engine.shutdown();

        // Assert
        assert_eq!(engine.surface_count(), 0);
        assert_eq!(log.destroyed_count(), 2);
        assert!(!engine.is_loop_running(LoopKind::Outline));
    }

    // ── Outline ───────────────────────────────────────────────────────────────

    #[test]
    fn test_outline_follows_pointer_across_displays() {
        // Arrange
        let topology = MockTopology::dual_1080p();
        let (mut engine, _log) = engine_with(topology.clone());
        engine.start();
        assert_eq!(outlined(&engine), vec![DisplayId(1)]);

        // Act
        topology.set_pointer(Some(Point::new(2000.0, 100.0)));
        engine.tick_outline();

        // Assert
        assert_eq!(outlined(&engine), vec![DisplayId(2)]);
    }

    #[test]
    fn test_unchanged_tick_does_not_redraw() {
        // Arrange
        let (mut engine, log) = engine_with(MockTopology::dual_1080p());
        engine.start();
        let presents = log.present_count();

        // Act
        engine.tick_outline();
        engine.tick_outline();

        // Assert
        assert_eq!(log.present_count(), presents);
    }

    #[test]
    fn test_apply_appearance_restyles_active_outline() {
        // Arrange
        let (mut engine, _log) = engine_with(MockTopology::dual_1080p());
        engine.start();

        // Act
        engine.apply_appearance(Appearance::new(Rgba::new(1.0, 0.0, 0.0, 1.0), 10.0, 200.0));

        // Assert
        let surface = engine.surface(DisplayId(1)).expect("surface");
        assert_eq!(surface.model().outline.style().thickness(), 10.0);
        assert_eq!(surface.model().outline.path(), Rect::new(5.0, 5.0, 1910.0, 1070.0));
    }

    // ── Enablement ────────────────────────────────────────────────────────────

    #[test]
    fn test_disable_then_enable_restores_outline() {
        // Arrange
        let (mut engine, log) = engine_with(MockTopology::dual_1080p());
        engine.start();

        // Act
        engine.set_enabled(false);
        let hidden = outlined(&engine).is_empty() && !log.is_on_screen(DisplayId(1));
        engine.set_enabled(true);

        // Assert
        assert!(hidden);
        assert_eq!(outlined(&engine), vec![DisplayId(1)]);
        assert!(log.is_on_screen(DisplayId(1)));
        assert_eq!(log.destroyed_count(), 0, "disabling must not destroy surfaces");
    }

    #[test]
    fn test_begin_spotlight_is_ignored_while_disabled() {
        let (mut engine, _log) = engine_with(MockTopology::dual_1080p());
        engine.start();
        engine.set_enabled(false);

        engine.begin_spotlight();

        assert!(!engine.spotlight_active());
        assert!(!engine.is_loop_running(LoopKind::Spotlight));
    }

    // ── Spotlight ─────────────────────────────────────────────────────────────

    #[test]
    fn test_spotlight_center_is_local_to_target_display() {
        // Arrange
        let topology = MockTopology::dual_1080p();
        topology.set_pointer(Some(Point::new(2000.0, 300.0)));
        let (mut engine, _log) = engine_with(topology);
        engine.start();

        // Act
        engine.begin_spotlight();

        // Assert
        let target = engine.surface(DisplayId(2)).expect("surface");
        assert!(target.is_spotlight_presenting());
        assert_eq!(target.model().spotlight.center(), Some(Point::new(80.0, 300.0)));
        assert_eq!(target.model().spotlight.radius(), Some(120.0));
        assert!(!engine.surface(DisplayId(1)).expect("surface").is_spotlight_presenting());
    }

    #[test]
    fn test_end_spotlight_fades_out_and_forgets_center() {
        // Arrange
        let (mut engine, _log) = engine_with(MockTopology::dual_1080p());
        engine.start();
        engine.begin_spotlight();

        // Act
        engine.end_spotlight();
        let animating = engine.has_active_animations();
        let later = engine.now() + SPOTLIGHT_DISAPPEAR + Duration::from_millis(5);
        let still_running = engine.advance_animations(later);

        // Assert
        assert!(animating);
        assert!(!still_running);
        let surface = engine.surface(DisplayId(1)).expect("surface");
        assert!(!surface.is_spotlight_presenting());
        assert!(surface.model().spotlight.center().is_none());
        assert!(!engine.is_loop_running(LoopKind::Spotlight));
    }

    #[test]
    fn test_end_spotlight_when_inactive_is_harmless() {
        let (mut engine, _log) = engine_with(MockTopology::dual_1080p());
        engine.start();
        engine.end_spotlight();
        assert!(!engine.has_active_animations());
    }

    // ── Reconciliation ────────────────────────────────────────────────────────

    #[test]
    fn test_duplicate_display_ids_create_one_surface() {
        // Arrange
        let d = DisplayDescriptor::new(DisplayId(7), Rect::new(0.0, 0.0, 800.0, 600.0));
        let (mut engine, log) = engine_with(MockTopology::new(vec![d, d], None));

        // Act
        let report = engine.reconcile();

        // Assert
        assert_eq!(report.created, vec![DisplayId(7)]);
        assert_eq!(log.created_count(), 1);
    }

    #[test]
    fn test_failed_creation_is_retried_on_next_reconcile() {
        // Arrange
        let (mut engine, log) = engine_with(MockTopology::dual_1080p());
        log.fail_creation_for(DisplayId(2));
        let first = engine.reconcile();

        // Act
        log.allow_creation_for(DisplayId(2));
        let second = engine.reconcile();

        // Assert
        assert_eq!(first.failed, vec![DisplayId(2)]);
        assert_eq!(second.created, vec![DisplayId(2)]);
        assert_eq!(engine.surface_count(), 2);
    }

    #[test]
    fn test_tick_heals_missed_topology_notification() {
        // Arrange
        let topology = MockTopology::dual_1080p();
        let (mut engine, _log) = engine_with(topology.clone());
        engine.start();

        // Act
        topology.remove_display(DisplayId(2));
        engine.tick_outline();

        // Assert
        assert_eq!(engine.surface_ids(), vec![DisplayId(1)]);
    }

    // ── Status ────────────────────────────────────────────────────────────────

    #[test]
    fn test_status_texts_for_dual_display() {
        let (mut engine, _log) = engine_with(MockTopology::dual_1080p());
        engine.start();

        assert_eq!(engine.outline_status_text(), "Outline: active on multi-display");
        assert_eq!(engine.diagnostics_text(), "Diag: screens=2 windows=2 cursor=1");
    }

    #[test]
    fn test_status_reports_syncing_before_reconcile() {
        let (engine, _log) = engine_with(MockTopology::dual_1080p());
        assert_eq!(engine.outline_status(), OutlineStatus::SyncingDisplays);
    }

    #[test]
    fn test_disabled_engine_reports_off() {
        let (mut engine, _log) = engine_with(MockTopology::dual_1080p());
        engine.start();
        engine.set_enabled(false);
        assert_eq!(engine.outline_status_text(), "Outline: off");
    }

    // ── Degraded topology (mockall) ───────────────────────────────────────────

    #[test]
    fn test_empty_topology_degrades_to_no_surfaces() {
        // Arrange
        let mut topology = MockDisplayTopology::new();
        topology.expect_current_displays().returning(Vec::new);
        topology.expect_pointer_location().returning(|| None);
        topology.expect_display_under_pointer().returning(|| None);
        let mut engine = OverlayEngine::new(
            Box::new(topology),
            Box::new(HeadlessSurfaceFactory::new()),
            Appearance::default(),
        );

        // Act
        engine.start();
        engine.tick_outline();
        engine.begin_spotlight();

        // Assert
        assert_eq!(engine.surface_count(), 0);
        assert_eq!(engine.outline_status(), OutlineStatus::HiddenSingleDisplay);
        assert_eq!(engine.diagnostics_text(), "Diag: screens=0 windows=0 cursor=nil");
    }

    #[test]
    fn test_spotlight_tick_without_pointer_is_skipped() {
        // Arrange
        let displays = vec![
            DisplayDescriptor::new(DisplayId(1), Rect::new(0.0, 0.0, 1920.0, 1080.0)).main(true),
            DisplayDescriptor::new(DisplayId(2), Rect::new(1920.0, 0.0, 1920.0, 1080.0)),
        ];
        let mut topology = MockDisplayTopology::new();
        topology.expect_current_displays().returning(move || displays.clone());
        topology.expect_pointer_location().returning(|| None);
        topology.expect_display_under_pointer().returning(|| None);
        let mut engine = OverlayEngine::new(
            Box::new(topology),
            Box::new(HeadlessSurfaceFactory::new()),
            Appearance::default(),
        );
        engine.start();

        // Act
        engine.begin_spotlight();

        // Assert
        assert!(engine.spotlight_active());
        assert!(engine
            .surface_ids()
            .into_iter()
            .all(|id| !engine.surface(id).is_some_and(OverlaySurface::is_spotlight_presenting)));
    }
}
