//! TOML-based configuration for Cursor Outline.
//!
//! Reads `AppConfig` from the platform-appropriate config file:
//! - Windows:  `%APPDATA%\CursorOutline\config.toml`
//! - Linux:    `~/.config/cursor-outline/config.toml`
//! - macOS:    `~/Library/Application Support/CursorOutline/config.toml`
//!
//! Example:
//!
//! ```toml
//! [general]
//! enabled = true
//! log_level = "info"
//!
//! [appearance]
//! outline_thickness = 4.0
//! spotlight_radius = 120.0
//!
//! [appearance.outline_color]
//! red = 0.0
//! green = 0.478
//! blue = 1.0
//! alpha = 1.0
//!
//! [timing]
//! outline_hz = 60
//! spotlight_hz = 60
//! topology_poll_ms = 1000
//! ```
//!
//! Every field has a serde default, so a missing file, a missing section, or
//! a config written by an older version all load.  Out-of-range values are
//! clamped by [`AppConfig::sanitized`] rather than rejected.

use std::path::{Path, PathBuf};

use outline_core::{Appearance, Rgba, DEFAULT_OUTLINE_THICKNESS, DEFAULT_SPOTLIGHT_RADIUS};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::application::loops::{
    LoopTiming, DEFAULT_OUTLINE_HZ, DEFAULT_SPOTLIGHT_HZ, DEFAULT_TOPOLOGY_POLL_MS,
    OUTLINE_HZ_RANGE, SPOTLIGHT_HZ_RANGE, TOPOLOGY_POLL_MS_RANGE,
};

/// Failures while locating, reading or writing the config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Neither `APPDATA` nor `HOME` (or `XDG_CONFIG_HOME`) is set.
    #[error("no platform config directory available")]
    NoPlatformConfigDir,

    #[error("cannot access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot encode config as TOML: {0}")]
    Serialize(#[from] toml::ser::Error),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level application configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub timing: TimingConfig,
}

/// Startup behaviour.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneralConfig {
    /// Whether the overlay starts enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// `tracing` log level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Outline and spotlight look.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppearanceConfig {
    /// Stroke thickness in points, clamped to 1–12.
    #[serde(default = "default_outline_thickness")]
    pub outline_thickness: f64,
    /// Spotlight hole radius in points, clamped to 60–280.
    #[serde(default = "default_spotlight_radius")]
    pub spotlight_radius: f64,
    /// Stroke color; defaults to the system-style accent blue.
    #[serde(default = "Rgba::accent")]
    pub outline_color: Rgba,
}

/// Loop rates.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingConfig {
    /// Outline loop rate, clamped to 10–60 Hz.
    #[serde(default = "default_outline_hz")]
    pub outline_hz: u32,
    /// Spotlight loop rate, clamped to 30–120 Hz.
    #[serde(default = "default_spotlight_hz")]
    pub spotlight_hz: u32,
    /// Topology poll interval; `0` turns polling off, otherwise clamped to 250–10000 ms.
    #[serde(default = "default_topology_poll_ms")]
    pub topology_poll_ms: u64,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_outline_thickness() -> f64 {
    DEFAULT_OUTLINE_THICKNESS
}
fn default_spotlight_radius() -> f64 {
    DEFAULT_SPOTLIGHT_RADIUS
}
fn default_outline_hz() -> u32 {
    DEFAULT_OUTLINE_HZ
}
fn default_spotlight_hz() -> u32 {
    DEFAULT_SPOTLIGHT_HZ
}
fn default_topology_poll_ms() -> u64 {
    DEFAULT_TOPOLOGY_POLL_MS
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            log_level: default_log_level(),
        }
    }
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            outline_thickness: default_outline_thickness(),
            spotlight_radius: default_spotlight_radius(),
            outline_color: Rgba::accent(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            outline_hz: default_outline_hz(),
            spotlight_hz: default_spotlight_hz(),
            topology_poll_ms: default_topology_poll_ms(),
        }
    }
}

impl AppConfig {
    /// A copy with every value clamped into its supported range.
    pub fn sanitized(&self) -> Self {
        let appearance = self.to_appearance();
        let c = appearance.outline.color;
        let poll = match self.timing.topology_poll_ms {
            0 => 0,
            ms => ms.clamp(TOPOLOGY_POLL_MS_RANGE.0, TOPOLOGY_POLL_MS_RANGE.1),
        };

        Self {
            general: self.general.clone(),
            appearance: AppearanceConfig {
                outline_thickness: appearance.outline.thickness(),
                spotlight_radius: appearance.spotlight.radius(),
                outline_color: c,
            },
            timing: TimingConfig {
                outline_hz: self.timing.outline_hz.clamp(OUTLINE_HZ_RANGE.0, OUTLINE_HZ_RANGE.1),
                spotlight_hz: self
                    .timing
                    .spotlight_hz
                    .clamp(SPOTLIGHT_HZ_RANGE.0, SPOTLIGHT_HZ_RANGE.1),
                topology_poll_ms: poll,
            },
        }
    }

    /// The appearance handed to the engine.  Values are clamped on the way.
    pub fn to_appearance(&self) -> Appearance {
        let c = self.appearance.outline_color;
        Appearance::new(
            Rgba::new(c.red, c.green, c.blue, c.alpha),
            self.appearance.outline_thickness,
            self.appearance.spotlight_radius,
        )
    }

    pub fn to_timing(&self) -> LoopTiming {
        LoopTiming::from_rates(
            self.timing.outline_hz,
            self.timing.spotlight_hz,
            self.timing.topology_poll_ms,
        )
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// The directory holding `config.toml` on this platform.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from the platform path, returning defaults if the file
/// does not exist yet.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from(&config_file_path()?)
}

/// Loads `AppConfig` from `path`, returning defaults if the file is absent.
///
/// # Errors
///
/// [`ConfigError::Io`] when the file exists but cannot be read, and
/// [`ConfigError::Parse`] when it is not valid config TOML.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file; using defaults");
            Ok(AppConfig::default())
        }
        Err(e) => Err(ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// [`ConfigError::Io`] if the directory or file cannot be written.
pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), "config written");
    Ok(())
}

fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("CursorOutline"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("cursor-outline"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("CursorOutline")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
