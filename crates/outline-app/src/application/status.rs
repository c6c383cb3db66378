//! Human-readable and serializable engine status.

use std::fmt;

use serde::Serialize;

/// What the outline is doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutlineStatus {
    /// The engine is disabled.
    Off,
    /// Enabled, but fewer than two distinct displays are live.
    HiddenSingleDisplay,
    /// The surface set lags the live topology (or the pointer's display has no
    /// surface yet); the next tick reconciles.
    SyncingDisplays,
    /// Enabled with two or more displays; one outline follows the pointer.
    ActiveMultiDisplay,
}

impl fmt::Display for OutlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutlineStatus::Off => "off",
            OutlineStatus::HiddenSingleDisplay => "hidden, single display",
            OutlineStatus::SyncingDisplays => "syncing displays",
            OutlineStatus::ActiveMultiDisplay => "active on multi-display",
        })
    }
}

/// Snapshot of the engine published to the shell after every event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub enabled: bool,
    pub spotlight_active: bool,
    pub outline: OutlineStatus,
    /// e.g. `"Outline: active on multi-display"`.
    pub outline_text: String,
    /// e.g. `"Diag: screens=2 windows=2 cursor=1"`.
    pub diagnostics: String,
    pub screens: usize,
    pub windows: usize,
    /// Display id under the pointer, if one resolved.
    pub pointer_display: Option<u64>,
    pub multi_display: bool,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
