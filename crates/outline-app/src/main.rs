//! Cursor Outline entry point.
//!
//! Draws a highlighted border around whichever display holds the mouse
//! pointer when two or more displays are connected, and a dimming spotlight
//! around the pointer while the trigger is held.
//!
//! # Usage
//!
//! ```text
//! cursor-outline [OPTIONS]
//!
//! Options:
//!   --config <PATH>          Config file [default: platform config dir]
//!   --log-level <LEVEL>      Log level (error, warn, info, debug, trace)
//!   --disabled               Start with the overlay turned off
//!   --headless               Track displays without drawing anything
//!   --test-spotlight         Show the spotlight for two seconds after startup
//!   --print-status           Start, print the status report as JSON, and exit
//!   --write-default-config   Write a default config file and exit
//!   --no-console             Do not read control commands from stdin
//! ```
//!
//! # Log level precedence
//!
//! `RUST_LOG` wins when set; otherwise `--log-level` (or `CURSOR_OUTLINE_LOG`);
//! otherwise `log_level` from the config file.
//!
//! # Threading
//!
//! The runtime is single-threaded.  Overlay windows belong to the thread that
//! created them, so the engine driver, its timers and the window message pump
//! all run on the main thread.  The Ctrl+C listener and the stdin console only
//! send commands through an `EngineHandle`.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use outline_app::application::OverlayEngine;
use outline_app::infrastructure::event_loop::EngineDriver;
use outline_app::infrastructure::storage::config::{
    config_file_path, load_config, load_config_from, save_config_to, AppConfig, ConfigError,
};
use outline_app::infrastructure::surface::{HeadlessSurfaceFactory, SurfaceFactory};
use outline_app::infrastructure::topology::native_topology;
use outline_app::infrastructure::trigger::{ConsoleTriggerSource, TriggerSink, TriggerSource};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Multi-display pointer outline and spotlight.
#[derive(Debug, Parser)]
#[command(
    name = "cursor-outline",
    about = "Outlines the display under the pointer and spotlights the pointer on demand",
    version
)]
struct Cli {
    /// Path to the TOML config file.
    ///
    /// Defaults to `config.toml` in the platform config directory.
    #[arg(long, env = "CURSOR_OUTLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Log level used when `RUST_LOG` is not set.
    #[arg(long, env = "CURSOR_OUTLINE_LOG")]
    log_level: Option<String>,

    /// Start with the overlay disabled, regardless of the config file.
    #[arg(long)]
    disabled: bool,

    /// Track displays and run the engine without drawing any surfaces.
    #[arg(long)]
    headless: bool,

    /// Show the spotlight for two seconds once the engine is running.
    #[arg(long)]
    test_spotlight: bool,

    /// Start the engine, print its status report as JSON, then exit.
    #[arg(long)]
    print_status: bool,

    /// Write a default config file (to `--config` or the platform path) and exit.
    #[arg(long)]
    write_default_config: bool,

    /// Do not read control commands from stdin.
    #[arg(long)]
    no_console: bool,
}

impl Cli {
    fn config_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => config_file_path(),
        }
    }

    /// Loads the config file named on the command line, or the platform one.
    fn load_config(&self) -> anyhow::Result<AppConfig> {
        let config = match &self.config {
            Some(path) => load_config_from(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => match load_config() {
                Ok(config) => config,
                Err(ConfigError::NoPlatformConfigDir) => AppConfig::default(),
                Err(e) => return Err(e).context("failed to load config"),
            },
        };
        Ok(config.sanitized())
    }

    /// Filter directive: `--log-level`, else the config file's level.
    fn log_directive(&self, config: &AppConfig) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config.general.log_level.clone())
    }
}

fn surface_factory(headless: bool) -> Box<dyn SurfaceFactory> {
    if headless {
        return Box::new(HeadlessSurfaceFactory::new());
    }

    #[cfg(target_os = "windows")]
    {
        use outline_app::infrastructure::surface::windows::Win32SurfaceFactory;
        match Win32SurfaceFactory::new() {
            Ok(factory) => return Box::new(factory),
            Err(e) => warn!(error = %e, "overlay windows unavailable; running headless"),
        }
    }

    #[cfg(not(target_os = "windows"))]
    warn!("no overlay surface backend on this platform; running headless");

    Box::new(HeadlessSurfaceFactory::new())
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.write_default_config {
        let path = cli.config_path().context("no config path available")?;
        save_config_to(&path, &AppConfig::default())
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("{}", path.display());
        return Ok(());
    }

    let config = cli.load_config()?;

    // ── Logging setup ─────────────────────────────────────────────────────────
    let directive = cli.log_directive(&config);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&directive))
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let enabled = config.general.enabled && !cli.disabled;
    info!(enabled, headless = cli.headless, "Cursor Outline starting");

    // ── Engine ────────────────────────────────────────────────────────────────
    let mut engine = OverlayEngine::new(
        native_topology(),
        surface_factory(cli.headless),
        config.to_appearance(),
    );
    engine.set_enabled(enabled);

    let (driver, handle) = EngineDriver::new(engine, config.to_timing());
    let driver_task = tokio::spawn(driver.run());

    if cli.print_status {
        tokio::time::sleep(Duration::from_millis(100)).await;
        let json = serde_json::to_string_pretty(&handle.status())
            .context("failed to render status report")?;
        println!("{json}");
        handle.shutdown().ok();
        driver_task.await.context("engine task failed")?;
        return Ok(());
    }

    if cli.test_spotlight {
        handle.test_spotlight().ok();
    }

    // ── Graceful shutdown ─────────────────────────────────────────────────────
    let ctrl_c_handle = handle.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C; shutting down");
                ctrl_c_handle.shutdown().ok();
            }
            Err(e) => tracing::error!("failed to listen for Ctrl+C signal: {e}"),
        }
    });

    let mut console = ConsoleTriggerSource::new();
    if !cli.no_console {
        console
            .start(TriggerSink::new(handle.clone()))
            .context("failed to start control console")?;
        info!("control console ready; type 'help' for commands");
    }

    let engine = driver_task.await.context("engine task failed")?;
    console.stop();
    info!(surfaces = engine.surface_count(), "Cursor Outline stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_leave_everything_off() {
        // Arrange / Act
        let cli = Cli::parse_from(["cursor-outline"]);

        // Assert
        assert!(!cli.disabled);
        assert!(!cli.headless);
        assert!(!cli.print_status);
        assert!(!cli.no_console);
    }

    #[test]
    fn test_cli_parses_flags_and_paths() {
        let cli = Cli::parse_from([
            "cursor-outline",
            "--config",
            "/tmp/outline.toml",
            "--log-level",
            "debug",
            "--headless",
            "--test-spotlight",
            "--no-console",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("/tmp/outline.toml")));
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(cli.headless);
        assert!(cli.test_spotlight);
        assert!(cli.no_console);
    }

    #[test]
    fn test_log_directive_prefers_cli_over_config() {
        // Arrange
        let mut config = AppConfig::default();
        config.general.log_level = "warn".to_string();
        let with_flag = Cli::parse_from(["cursor-outline", "--log-level", "trace"]);
        let without_flag = Cli::parse_from(["cursor-outline"]);

        // Act / Assert
        assert_eq!(with_flag.log_directive(&config), "trace");
        if std::env::var_os("CURSOR_OUTLINE_LOG").is_none() {
            assert_eq!(without_flag.log_directive(&config), "warn");
        }
    }

    #[test]
    fn test_explicit_missing_config_path_loads_defaults() {
        let cli = Cli::parse_from(["cursor-outline", "--config", "/nonexistent/dir/outline.toml"]);
        let config = cli.load_config().expect("defaults");
        assert_eq!(config, AppConfig::default());
    }
}
