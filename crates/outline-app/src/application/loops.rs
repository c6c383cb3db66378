//! Run state and pacing of the engine's two timed loops.
//!
//! The outline loop tracks *which display* holds the pointer and runs for the
//! engine's whole lifetime once started.  The spotlight loop tracks the pointer
//! itself and only runs while a spotlight is active.  They never share a tick:
//! each has its own [`LoopKind`] flag here and its own interval in the driver.

use std::time::Duration;

/// Outline loop rate bounds and default, in Hz.
pub const OUTLINE_HZ_RANGE: (u32, u32) = (10, 60);
pub const DEFAULT_OUTLINE_HZ: u32 = 60;

/// Spotlight loop rate bounds and default, in Hz.
pub const SPOTLIGHT_HZ_RANGE: (u32, u32) = (30, 120);
pub const DEFAULT_SPOTLIGHT_HZ: u32 = 60;

/// Fade animations are stepped at a fixed frame rate.
pub const ANIMATION_HZ: u32 = 60;

/// Topology poll interval bounds and default, in milliseconds.  `0` disables polling.
pub const TOPOLOGY_POLL_MS_RANGE: (u64, u64) = (250, 10_000);
pub const DEFAULT_TOPOLOGY_POLL_MS: u64 = 1_000;

/// One of the engine's independently paced loops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    Outline,
    Spotlight,
}

/// Which loops are running.  Starting a running loop or stopping a stopped
/// one is a no-op.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopState {
    outline: bool,
    spotlight: bool,
}

impl LoopState {
    /// Returns `true` if the loop was stopped before this call.
    pub fn start(&mut self, kind: LoopKind) -> bool {
        !std::mem::replace(self.flag(kind), true)
    }

    /// Returns `true` if the loop was running before this call.
    pub fn stop(&mut self, kind: LoopKind) -> bool {
        std::mem::replace(self.flag(kind), false)
    }

    pub fn is_running(&self, kind: LoopKind) -> bool {
        match kind {
            LoopKind::Outline => self.outline,
            LoopKind::Spotlight => self.spotlight,
        }
    }

    fn flag(&mut self, kind: LoopKind) -> &mut bool {
        match kind {
            LoopKind::Outline => &mut self.outline,
            LoopKind::Spotlight => &mut self.spotlight,
        }
    }
}

/// Periods used by the driver for each timed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTiming {
    pub outline_period: Duration,
    pub spotlight_period: Duration,
    pub animation_period: Duration,
    /// `None` relies on `TopologyChanged` commands and the per-tick check alone.
    pub topology_poll: Option<Duration>,
}

impl LoopTiming {
    /// Builds periods from configured rates, clamping each into its range.
    pub fn from_rates(outline_hz: u32, spotlight_hz: u32, topology_poll_ms: u64) -> Self {
        let outline_hz = outline_hz.clamp(OUTLINE_HZ_RANGE.0, OUTLINE_HZ_RANGE.1);
        let spotlight_hz = spotlight_hz.clamp(SPOTLIGHT_HZ_RANGE.0, SPOTLIGHT_HZ_RANGE.1);
        let topology_poll = match topology_poll_ms {
            0 => None,
            ms => Some(Duration::from_millis(
                ms.clamp(TOPOLOGY_POLL_MS_RANGE.0, TOPOLOGY_POLL_MS_RANGE.1),
            )),
        };

        Self {
            outline_period: period(outline_hz),
            spotlight_period: period(spotlight_hz),
            animation_period: period(ANIMATION_HZ),
            topology_poll,
        }
    }
}

impl Default for LoopTiming {
    fn default() -> Self {
        Self::from_rates(DEFAULT_OUTLINE_HZ, DEFAULT_SPOTLIGHT_HZ, DEFAULT_TOPOLOGY_POLL_MS)
    }
}

fn period(hz: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(hz.max(1)))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
