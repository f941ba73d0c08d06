//! Terminal implementations of the notification and confirmation hooks.

use popup_core::notify::{ConfirmPrompt, Notifier, Severity};
use std::io::{self, BufRead, Write};

/// Prints notifications to the terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Success | Severity::Info => println!("{message}"),
            Severity::Warning | Severity::Error => eprintln!("{severity}: {message}"),
        }
    }
}

/// Asks yes/no questions on stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt {
    /// Answer yes without asking.
    pub assume_yes: bool,
}

impl ConsolePrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    fn ask(&self, message: &str) -> io::Result<bool> {
        print!("{message} [y/N] ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

impl ConfirmPrompt for ConsolePrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match self.ask(message) {
            Ok(answer) => answer,
            Err(e) => {
                log::warn!("Failed to read confirmation: {e}");
                false
            }
        }
    }
}

/// Whether a typed answer means yes. Anything unrecognised is a no.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
