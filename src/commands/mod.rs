//! Command system for colcon-test-result
//!
//! Each verb is a type implementing the Command trait.

use crate::error::Result;
use crate::ui::UI;

pub mod test_result;
mod utils;

pub use test_result::TestResultCommand;

/// Trait that all commands must implement
pub trait Command {
    /// Execute the command
    fn execute(&self, ui: &mut dyn UI) -> Result<i32>;

    /// Get the command name
    fn name(&self) -> &str;

    /// Get command help text
    fn help(&self) -> &str;
}

/// Names of the verbs this crate registers
pub fn verb_names() -> Vec<&'static str> {
    vec![test_result::VERB_NAME]
}
