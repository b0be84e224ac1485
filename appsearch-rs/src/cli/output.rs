//! Output formatting for CLI commands.

use serde::Serialize;

use crate::error::Result;

/// Helper for printing command output as JSON.
pub struct Output {
    quiet: bool,
}

impl Output {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }

    /// Print a serializable value as pretty JSON.
    pub fn print<T: Serialize>(&self, value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }

    /// Print a message to stderr unless quiet.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }
}
