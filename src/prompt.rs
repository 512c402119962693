//! PromptInput - line-oriented command input.
//!
//! Each line typed on stdin becomes a [`SessionCommand`]. Slash commands
//! drive the capture workflow; any other text is taken as the caption.

use std::io::{self, BufRead, Write};
use std::thread;

use tokio::sync::mpsc::UnboundedSender;

use crate::session::Event;

/// Commands the user can issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    /// Snapshot the live feed.
    Capture,
    /// Replace the caption of the open capture.
    Caption(String),
    /// Upload the open capture with its caption.
    Post,
    /// Close the confirmation view without uploading.
    Close,
    /// Show the command list.
    Help,
    /// End the session.
    Quit,
}

pub const HELP_TEXT: &str = "\
Commands:
  /snap              capture a still from the camera
  <text>             set the caption of the captured still
  /caption [text]    set (or clear) the caption
  /post              upload the still with its caption
  /close             discard the confirmation view
  /help              show this help
  /quit              exit";

/// Reads stdin on a background thread and forwards parsed commands.
pub struct PromptInput;

impl PromptInput {
    /// Start listening on stdin.
    ///
    /// Parsed commands are sent as [`Event::Command`]. End of input is
    /// turned into [`SessionCommand::Quit`]. The thread exits when the
    /// receiving side is gone.
    pub fn spawn_listener(tx: UnboundedSender<Event>) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let stdin = io::stdin();
            let handle = stdin.lock();

            Self::print_prompt();

            for line in handle.lines() {
                let Ok(input) = line else { break };
                if let Some(cmd) = Self::parse_input(&input) {
                    if tx.send(Event::Command(cmd)).is_err() {
                        return;
                    }
                }
                Self::print_prompt();
            }

            let _ = tx.send(Event::Command(SessionCommand::Quit));
        })
    }

    /// Parse one line of input.
    ///
    /// Returns `None` for blank lines and unknown slash commands.
    pub fn parse_input(input: &str) -> Option<SessionCommand> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.starts_with('/') {
            return Self::parse_command(trimmed);
        }

        Some(SessionCommand::Caption(trimmed.to_string()))
    }

    fn parse_command(input: &str) -> Option<SessionCommand> {
        let (name, rest) = match input.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (input, ""),
        };

        match name.to_lowercase().as_str() {
            "/snap" | "/s" => Some(SessionCommand::Capture),
            "/caption" | "/c" => Some(SessionCommand::Caption(rest.to_string())),
            "/post" | "/p" => Some(SessionCommand::Post),
            "/close" | "/cancel" => Some(SessionCommand::Close),
            "/help" | "/h" => Some(SessionCommand::Help),
            "/quit" | "/exit" | "/q" => Some(SessionCommand::Quit),
            _ => {
                Self::print_status(&format!("Unknown command: {}", name));
                Self::print_status("Type /help for the list of commands");
                None
            }
        }
    }

    /// Print the input prompt.
    pub fn print_prompt() {
        print!("> ");
        let _ = io::stdout().flush();
    }

    /// Print a status message on its own line.
    pub fn print_status(message: &str) {
        println!("{}", message);
    }
}
