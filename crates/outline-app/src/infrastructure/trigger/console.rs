//! Control console on stdin.
//!
//! Stands in for the tray menu and the global hotkey when running from a
//! terminal.  Each line is one command:
//!
//! ```text
//! press | p       begin the spotlight (as if the trigger went down)
//! release | r     end the spotlight
//! enable          turn the overlay on
//! disable         turn the overlay off
//! toggle | t      flip enablement
//! test            show the spotlight for two seconds
//! status | s      print the status report as JSON
//! quit | q        shut down
//! help | ?        list commands
//! ```

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::{TriggerError, TriggerSink, TriggerSource};

const HELP: &str = "commands: press, release, enable, disable, toggle, test, status, quit, help";

/// A parsed console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Press,
    Release,
    Enable,
    Disable,
    Toggle,
    Test,
    Status,
    Quit,
    Help,
}

/// Parses one console line.  Returns `None` for blank or unknown input.
pub fn parse_console_command(line: &str) -> Option<ConsoleCommand> {
    let command = match line.trim().to_ascii_lowercase().as_str() {
        "press" | "p" => ConsoleCommand::Press,
        "release" | "r" => ConsoleCommand::Release,
        "enable" | "on" => ConsoleCommand::Enable,
        "disable" | "off" => ConsoleCommand::Disable,
        "toggle" | "t" => ConsoleCommand::Toggle,
        "test" => ConsoleCommand::Test,
        "status" | "s" => ConsoleCommand::Status,
        "quit" | "q" | "exit" => ConsoleCommand::Quit,
        "help" | "?" | "h" => ConsoleCommand::Help,
        _ => return None,
    };
    Some(command)
}

/// Reads commands from stdin on a background task.
#[derive(Debug, Default)]
pub struct ConsoleTriggerSource {
    task: Option<JoinHandle<()>>,
}

impl ConsoleTriggerSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TriggerSource for ConsoleTriggerSource {
    fn start(&mut self, sink: TriggerSink) -> Result<(), TriggerError> {
        if self.task.is_some() {
            return Err(TriggerError::AlreadyStarted);
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| TriggerError::Start(format!("no tokio runtime: {e}")))?;

        self.task = Some(runtime.spawn(async move {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if !dispatch(&sink, &line) {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("console input closed");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "console read failed");
                        break;
                    }
                }
            }
        }));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ConsoleTriggerSource {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Executes one line.  Returns `false` once the console should stop reading.
fn dispatch(sink: &TriggerSink, line: &str) -> bool {
    if line.trim().is_empty() {
        return true;
    }
    let Some(command) = parse_console_command(line) else {
        println!("unknown command {:?}; {HELP}", line.trim());
        return true;
    };

    let handle = sink.handle();
    let sent = match command {
        ConsoleCommand::Press => {
            sink.on_pressed();
            Ok(())
        }
        ConsoleCommand::Release => {
            sink.on_released();
            Ok(())
        }
        ConsoleCommand::Enable => handle.set_enabled(true),
        ConsoleCommand::Disable => handle.set_enabled(false),
        ConsoleCommand::Toggle => handle.toggle_enabled(),
        ConsoleCommand::Test => handle.test_spotlight(),
        ConsoleCommand::Status => {
            match serde_json::to_string_pretty(&handle.status()) {
                Ok(json) => println!("{json}"),
                Err(e) => warn!(error = %e, "could not render status"),
            }
            Ok(())
        }
        ConsoleCommand::Help => {
            println!("{HELP}");
            Ok(())
        }
        ConsoleCommand::Quit => {
            let _ = handle.shutdown();
            return false;
        }
    };

    if let Err(e) = sent {
        debug!(?command, error = %e, "console command dropped");
        return false;
    }
    true
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use outline_core::Appearance;

    use super::*;
    use crate::application::OverlayEngine;
    use crate::infrastructure::event_loop::{EngineCommand, EngineHandle};
    use crate::infrastructure::surface::HeadlessSurfaceFactory;
    use crate::infrastructure::topology::MockTopology;

    fn sink() -> (TriggerSink, tokio::sync::mpsc::UnboundedReceiver<EngineCommand>) {
        let engine = OverlayEngine::new(
            Box::new(MockTopology::single_1080p()),
            Box::new(HeadlessSurfaceFactory::new()),
            Appearance::default(),
        );
        let (handle, commands, _status) = EngineHandle::channel(engine.status_report());
        (TriggerSink::new(handle), commands)
    }

    #[test]
    fn test_parse_accepts_names_aliases_and_case() {
        assert_eq!(parse_console_command("press"), Some(ConsoleCommand::Press));
        assert_eq!(parse_console_command("  R \n"), Some(ConsoleCommand::Release));
        assert_eq!(parse_console_command("Toggle"), Some(ConsoleCommand::Toggle));
        assert_eq!(parse_console_command("exit"), Some(ConsoleCommand::Quit));
        assert_eq!(parse_console_command("?"), Some(ConsoleCommand::Help));
    }

    #[test]
    fn test_parse_rejects_blank_and_unknown() {
        assert_eq!(parse_console_command(""), None);
        assert_eq!(parse_console_command("spin"), None);
    }

    #[test]
    fn test_dispatch_maps_commands_onto_engine() {
        // Arrange
        let (sink, mut commands) = sink();

        // Act
        assert!(dispatch(&sink, "press"));
        assert!(dispatch(&sink, "disable"));
        assert!(dispatch(&sink, "test"));
        assert!(!dispatch(&sink, "quit"));

        // Assert
        let mut seen = Vec::new();
        while let Ok(c) = commands.try_recv() {
            seen.push(c);
        }
        assert_eq!(
            seen,
            vec![
                EngineCommand::Trigger(crate::infrastructure::trigger::TriggerEdge::Pressed),
                EngineCommand::SetEnabled(false),
                EngineCommand::TestSpotlight,
                EngineCommand::Shutdown,
            ]
        );
    }

    #[test]
    fn test_dispatch_keeps_reading_after_unknown_input() {
        let (sink, mut commands) = sink();
        assert!(dispatch(&sink, "bogus"));
        assert!(commands.try_recv().is_err());
    }

    #[test]
    fn test_start_without_runtime_fails() {
        let (sink, _commands) = sink();
        let mut source = ConsoleTriggerSource::new();
        assert!(matches!(source.start(sink), Err(TriggerError::Start(_))));
    }
}
