//! colcon-test-result - Collect and summarize test results of a build
//!
//! After a build has run its tests, the build directory holds result files
//! written by the various test frameworks. This crate crawls such a directory,
//! reads every result file it understands and reports the number of tests,
//! errors, failures and skipped tests per file and in total.
//!
//! # Architecture
//!
//! - [`test_result`]: the result extension point, the [`TestResult`] statistics
//!   and the registry of providers
//! - [`test_result::xunit`]: the xUnit / JUnit XML provider
//! - [`commands`]: the `test-result` verb
//! - [`entry_points`]: registration table of the provided extensions
//! - [`config`]: defaults file parsing
//! - [`ui`]: User interface abstraction for output
//! - [`error`]: Error types and Result alias
//!
//! # Example
//!
//! ```no_run
//! use colcon_test_result::test_result::get_test_results;
//! use std::path::Path;
//!
//! let results = get_test_results(Path::new("build"), false, None);
//! for result in results.iter().filter(|r| r.has_errors_or_failures()) {
//!     println!("{}", result);
//! }
//! ```

pub mod commands;
pub mod config;
pub mod entry_points;
pub mod error;
pub mod test_result;
pub mod ui;

pub use error::{Error, Result};
pub use test_result::TestResult;
