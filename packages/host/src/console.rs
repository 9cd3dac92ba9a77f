//! Console commands and the readline input thread.

use std::{str::FromStr, thread};

use rustyline::{DefaultEditor, error::ReadlineError};
use thiserror::Error;
use tokio::sync::mpsc;

const PROMPT: &str = "wheel> ";

/// Commands typed on the host console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostCommand {
    /// Open joins
    Open,
    /// Close joins
    Close,
    /// Flip joins between open and closed
    Toggle,
    Spin,
    /// Start holding the reset input
    Hold,
    /// Let go of the reset input
    Release,
    Status,
    List,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsoleError {
    #[error("Unknown command '{0}' (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("Empty command")]
    Empty,
}

impl FromStr for HostCommand {
    type Err = ConsoleError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let word = input.trim().to_lowercase();
        let command = match word.as_str() {
            "" => return Err(ConsoleError::Empty),
            "open" => Self::Open,
            "close" => Self::Close,
            "toggle" | "t" => Self::Toggle,
            "spin" | "s" => Self::Spin,
            "hold" | "r" => Self::Hold,
            "release" => Self::Release,
            "status" => Self::Status,
            "list" | "ls" => Self::List,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => return Err(ConsoleError::UnknownCommand(word)),
        };
        Ok(command)
    }
}

pub const HELP_TEXT: &str = "\
Commands:
  open, close, toggle (t)   open or close joins
  spin (s)                  spin the wheel
  hold (r) / release        hold the reset input for one second to start the next round
  status                    show the wheel
  list (ls)                 list participants
  help (?)                  show this help
  quit (q)                  exit
";

/// Spawn a blocking thread for rustyline and forward each entered line.
///
/// The channel closes when the console ends (Ctrl+C, Ctrl+D or a readline error).
pub fn spawn_console() -> mpsc::UnboundedReceiver<String> {
    let (input_tx, input_rx) = mpsc::unbounded_channel::<String>();

    let spawned = thread::Builder::new()
        .name("console".to_string())
        .spawn(move || {
            let mut rl = match DefaultEditor::new() {
                Ok(rl) => rl,
                Err(e) => {
                    tracing::error!("Failed to initialize readline: {}", e);
                    return;
                }
            };

            loop {
                match rl.readline(PROMPT) {
                    Ok(line) => {
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Tick loop gone
                            break;
                        }
                    }
                    Err(ReadlineError::Interrupted) => {
                        tracing::info!("Interrupted");
                        break;
                    }
                    Err(ReadlineError::Eof) => {
                        tracing::info!("EOF");
                        break;
                    }
                    Err(err) => {
                        tracing::error!("Readline error: {}", err);
                        break;
                    }
                }
            }
        });

    if let Err(e) = spawned {
        tracing::error!("Failed to spawn console thread: {}", e);
    }

    input_rx
}
