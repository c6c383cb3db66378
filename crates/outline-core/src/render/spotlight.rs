//! The spotlight vignette: a dimmed full-surface rectangle with a circular hole
//! around the pointer.
//!
//! # Fade timing
//!
//! Showing and hiding can be animated.  The durations are deliberately
//! asymmetric: the spotlight should appear at once when the trigger is pressed
//! ([`SPOTLIGHT_APPEAR`]) and ease out when it is released
//! ([`SPOTLIGHT_DISAPPEAR`]).
//!
//! Time is passed in explicitly (`now: Instant`) so the animation is driven by
//! whoever owns the frame clock and can be stepped deterministically in tests.

use std::time::{Duration, Instant};

use crate::domain::geometry::{Point, Rect};
use crate::render::path::{FillRule, Path};

pub const SPOTLIGHT_APPEAR: Duration = Duration::from_millis(80);
pub const SPOTLIGHT_DISAPPEAR: Duration = Duration::from_millis(180);

/// A linear opacity transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fade {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

impl Fade {
    pub fn new(from: f64, to: f64, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started,
            duration,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.started) >= self.duration
    }

    pub fn opacity_at(&self, now: Instant) -> f64 {
        if self.is_finished(now) || self.duration.is_zero() {
            return self.to;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * t
    }
}

/// Render state of a surface's spotlight.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotlightLayer {
    hidden: bool,
    opacity: f64,
    center: Option<Point>,
    radius: Option<f64>,
    mask: Option<Path>,
    fade: Option<Fade>,
    local_bounds: Rect,
}

impl SpotlightLayer {
    /// Creates a hidden, fully transparent spotlight with no remembered center.
    pub fn new(local_bounds: Rect) -> Self {
        Self {
            hidden: true,
            opacity: 0.0,
            center: None,
            radius: None,
            mask: None,
            fade: None,
            local_bounds,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn center(&self) -> Option<Point> {
        self.center
    }

    pub fn radius(&self) -> Option<f64> {
        self.radius
    }

    pub fn mask(&self) -> Option<&Path> {
        self.mask.as_ref()
    }

    pub fn is_animating(&self) -> bool {
        self.fade.is_some()
    }

    /// `true` if the layer would currently put a mask on screen.
    pub fn is_presenting(&self) -> bool {
        !self.hidden && self.mask.is_some() && (self.opacity > 0.0 || self.is_animating())
    }

    /// Shows or hides the spotlight.
    ///
    /// Without animation the change is immediate and cancels any fade in
    /// flight, so a pending fade-out can never complete later and wipe a
    /// freshly set center.  With animation the layer is un-hidden and its
    /// opacity fades toward the target; see [`advance`](Self::advance).
    pub fn set_visible(&mut self, visible: bool, animated: bool, now: Instant) {
        let target = if visible { 1.0 } else { 0.0 };

        if !animated {
            self.fade = None;
            self.hidden = !visible;
            self.opacity = target;
            return;
        }

        match self.fade {
            Some(f) if f.target() == target => return,
            None if self.opacity == target && (self.hidden != visible) => return,
            _ => {}
        }

        let from = self.fade.map(|f| f.opacity_at(now)).unwrap_or(self.opacity);
        let duration = if visible {
            SPOTLIGHT_APPEAR
        } else {
            SPOTLIGHT_DISAPPEAR
        };
        self.hidden = false;
        self.opacity = from;
        self.fade = Some(Fade::new(from, target, now, duration));
    }

    /// Steps the fade to `now`.  Returns `true` while a fade is still running.
    ///
    /// When an animated disappearance completes, the layer hides itself and
    /// forgets its center, radius and mask so stale state cannot reappear.
    pub fn advance(&mut self, now: Instant) -> bool {
        let Some(fade) = self.fade else {
            return false;
        };

        if !fade.is_finished(now) {
            self.opacity = fade.opacity_at(now);
            return true;
        }

        self.fade = None;
        self.opacity = fade.target();
        if fade.target() == 0.0 {
            self.hidden = true;
            self.forget();
        }
        false
    }

    /// Rebuilds the mask: the full local bounds minus a circle, filled
    /// even-odd so the circle is a genuine hole.
    pub fn update(&mut self, center: Point, radius: f64) {
        self.center = Some(center);
        self.radius = Some(radius);
        self.rebuild_mask();
    }

    /// Re-lays out the layer for new local bounds.  A remembered center is
    /// replaced by `center` (already converted into the new local space), or
    /// forgotten when `center` is `None`.
    pub fn layout(&mut self, local_bounds: Rect, center: Option<Point>) {
        self.local_bounds = local_bounds;
        match (center, self.radius) {
            (Some(c), Some(_)) => {
                self.center = Some(c);
                self.rebuild_mask();
            }
            _ => self.forget(),
        }
    }

    /// Drops the remembered center, radius and mask.
    pub fn forget(&mut self) {
        self.center = None;
        self.radius = None;
        self.mask = None;
    }

    fn rebuild_mask(&mut self) {
        if let (Some(center), Some(radius)) = (self.center, self.radius) {
            let mut path = Path::new(FillRule::EvenOdd);
            path.add_rect(self.local_bounds)
                .add_ellipse(Rect::around(center, radius));
            self.mask = Some(path);
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn layer() -> SpotlightLayer {
        SpotlightLayer::new(Rect::new(0.0, 0.0, 1920.0, 1080.0))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_new_layer_is_hidden_and_transparent() {
        let l = layer();
        assert!(l.is_hidden());
        assert_eq!(l.opacity(), 0.0);
        assert!(l.center().is_none());
        assert!(!l.is_presenting());
    }

    #[test]
    fn test_update_builds_even_odd_mask_with_hole_at_center() {
        // Arrange
        let mut l = layer();

        // Act
        l.update(Point::new(500.0, 500.0), 120.0);

        // Assert
        let mask = l.mask().expect("mask");
        assert_eq!(mask.fill_rule(), FillRule::EvenOdd);
        assert!(!mask.contains(Point::new(500.0, 500.0)), "center must be a hole");
        assert!(!mask.contains(Point::new(600.0, 500.0)), "inside radius must be a hole");
        assert!(mask.contains(Point::new(700.0, 500.0)), "outside radius must be dimmed");
    }

    #[test]
    fn test_non_animated_show_is_immediate() {
        let mut l = layer();
        l.update(Point::new(10.0, 10.0), 60.0);

        l.set_visible(true, false, Instant::now());

        assert!(!l.is_hidden());
        assert_eq!(l.opacity(), 1.0);
        assert!(!l.is_animating());
        assert!(l.is_presenting());
    }

    #[test]
    fn test_animated_show_reaches_full_opacity_after_appear_duration() {
        // Arrange
        let t0 = Instant::now();
        let mut l = layer();

        // Act
        l.set_visible(true, true, t0);
        let midway = l.advance(t0 + ms(40));
        let mid_opacity = l.opacity();
        let running = l.advance(t0 + SPOTLIGHT_APPEAR);

        // Assert
        assert!(midway);
        assert!((mid_opacity - 0.5).abs() < 1e-9);
        assert!(!running);
        assert_eq!(l.opacity(), 1.0);
        assert!(!l.is_hidden());
    }

    #[test]
    fn test_animated_hide_clears_center_on_completion() {
        // Arrange
        let t0 = Instant::now();
        let mut l = layer();
        l.update(Point::new(300.0, 300.0), 120.0);
        l.set_visible(true, false, t0);

        // Act
        l.set_visible(false, true, t0);
        assert!(l.advance(t0 + ms(90)), "fade must still run halfway through");
        assert!(l.center().is_some(), "center kept until the fade completes");
        l.advance(t0 + SPOTLIGHT_DISAPPEAR);

        // Assert
        assert!(l.is_hidden());
        assert_eq!(l.opacity(), 0.0);
        assert!(l.center().is_none());
        assert!(l.radius().is_none());
        assert!(l.mask().is_none());
    }

    #[test]
    fn test_non_animated_show_cancels_pending_fade_out() {
        // A fade-out that is interrupted must not wipe a center set afterwards.
        let t0 = Instant::now();
        let mut l = layer();
        l.update(Point::new(300.0, 300.0), 120.0);
        l.set_visible(true, false, t0);
        l.set_visible(false, true, t0);

        l.set_visible(true, false, t0 + ms(50));
        l.update(Point::new(400.0, 400.0), 120.0);
        let running = l.advance(t0 + ms(500));

        assert!(!running);
        assert_eq!(l.center(), Some(Point::new(400.0, 400.0)));
        assert!(l.is_presenting());
    }

    #[test]
    fn test_non_animated_hide_keeps_center_but_stops_presenting() {
        let mut l = layer();
        l.update(Point::new(300.0, 300.0), 120.0);
        l.set_visible(true, false, Instant::now());

        l.set_visible(false, false, Instant::now());

        assert!(l.is_hidden());
        assert!(!l.is_presenting());
    }

    #[test]
    fn test_animated_hide_of_hidden_layer_is_noop() {
        let mut l = layer();
        l.set_visible(false, true, Instant::now());
        assert!(!l.is_animating());
        assert!(l.is_hidden());
    }

    #[test]
    fn test_repeated_animated_hide_does_not_restart_fade() {
        let t0 = Instant::now();
        let mut l = layer();
        l.update(Point::new(1.0, 1.0), 60.0);
        l.set_visible(true, false, t0);

        l.set_visible(false, true, t0);
        l.set_visible(false, true, t0 + ms(170));
        l.advance(t0 + SPOTLIGHT_DISAPPEAR);

        assert!(l.is_hidden(), "second hide must not have extended the fade");
    }

    #[test]
    fn test_reversing_fade_starts_from_current_opacity() {
        let t0 = Instant::now();
        let mut l = layer();
        l.update(Point::new(1.0, 1.0), 60.0);
        l.set_visible(true, false, t0);
        l.set_visible(false, true, t0);

        // Halfway through the fade-out, fade back in.
        l.set_visible(true, true, t0 + ms(90));

        assert!((l.opacity() - 0.5).abs() < 1e-9);
        l.advance(t0 + ms(90) + SPOTLIGHT_APPEAR);
        assert_eq!(l.opacity(), 1.0);
        assert!(l.center().is_some());
    }

    #[test]
    fn test_layout_without_center_forgets_spotlight() {
        let mut l = layer();
        l.update(Point::new(10.0, 10.0), 60.0);

        l.layout(Rect::new(0.0, 0.0, 100.0, 100.0), None);

        assert!(l.center().is_none());
        assert!(l.mask().is_none());
    }
}
