//! User interface abstraction
//!
//! This module provides the UI trait for command input/output.

use crate::error::Result;
use std::io::{self, BufRead, Write};

#[cfg(test)]
pub mod test_ui;

/// Abstract UI trait for command interaction
pub trait UI {
    /// Output a message to the user
    fn output(&mut self, message: &str) -> Result<()>;

    /// Output an error message
    fn error(&mut self, message: &str) -> Result<()>;

    /// Output a warning message
    fn warning(&mut self, message: &str) -> Result<()>;

    /// Ask the user a yes/no question, defaulting to no
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Returns true if the answer is an affirmative `y` or `yes`.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Command-line UI implementation
pub struct CliUI {
    stdout: Box<dyn Write>,
    stderr: Box<dyn Write>,
    stdin: Box<dyn BufRead>,
}

impl CliUI {
    /// Creates a new command-line UI instance using stdout, stderr and stdin.
    pub fn new() -> Self {
        CliUI {
            stdout: Box::new(io::stdout()),
            stderr: Box::new(io::stderr()),
            stdin: Box::new(io::BufReader::new(io::stdin())),
        }
    }
}

impl Default for CliUI {
    fn default() -> Self {
        Self::new()
    }
}

impl UI for CliUI {
    fn output(&mut self, message: &str) -> Result<()> {
        writeln!(self.stdout, "{}", message)?;
        Ok(())
    }

    fn error(&mut self, message: &str) -> Result<()> {
        writeln!(self.stderr, "Error: {}", message)?;
        Ok(())
    }

    fn warning(&mut self, message: &str) -> Result<()> {
        writeln!(self.stderr, "Warning: {}", message)?;
        Ok(())
    }

    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        write!(self.stdout, "{} ", prompt)?;
        self.stdout.flush()?;

        let mut answer = String::new();
        // EOF counts as "no"
        if self.stdin.read_line(&mut answer)? == 0 {
            return Ok(false);
        }
        Ok(is_affirmative(&answer))
    }
}
