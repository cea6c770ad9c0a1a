//! Test result extension point
//!
//! A test result provider crawls a directory for result files of one format
//! and turns each file into a [`TestResult`]. Providers are registered under a
//! name; [`get_test_results`] asks every registered provider in name order and
//! merges what they found.

use crate::error::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, trace};

pub mod xml;
pub mod xunit;

pub use xunit::XunitTestResult;

/// Name under which the extension point itself is registered
pub const EXTENSION_POINT_NAME: &str = "colcon_test_result.test_result";

/// The version of the test result extension interface
pub const EXTENSION_POINT_VERSION: &str = "1.0";

/// Statistics from a set of tests
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestResult {
    pub path: String,
    pub test_count: u64,
    pub error_count: u64,
    pub failure_count: u64,
    pub skipped_count: u64,
    /// One rendered entry per test case with errors or failures
    pub details: Vec<String>,
}

impl TestResult {
    pub fn new(path: impl Into<String>) -> Self {
        TestResult {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Add the statistics from another result to this one.
    ///
    /// The `path` is not changed. Counts saturate instead of overflowing.
    pub fn add_result(&mut self, other: &TestResult) {
        self.test_count = self.test_count.saturating_add(other.test_count);
        self.error_count = self.error_count.saturating_add(other.error_count);
        self.failure_count = self.failure_count.saturating_add(other.failure_count);
        self.skipped_count = self.skipped_count.saturating_add(other.skipped_count);
        self.details.extend(other.details.iter().cloned());
    }

    pub fn has_errors_or_failures(&self) -> bool {
        self.error_count > 0 || self.failure_count > 0
    }
}

fn is_line_boundary(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into lines at every line boundary, `\r\n` counting as one.
///
/// A trailing boundary does not produce an empty last line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if !is_line_boundary(c) {
            continue;
        }
        lines.push(&text[start..i]);
        start = i + c.len_utf8();
        if c == '\r' {
            if let Some(&(j, '\n')) = chars.peek() {
                chars.next();
                start = j + 1;
            }
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn plural(count: u64) -> &'static str {
    if count != 1 {
        "s"
    } else {
        ""
    }
}

impl fmt::Display for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} test{}, {} error{}, {} failure{}, {} skipped",
            self.path,
            self.test_count,
            plural(self.test_count),
            self.error_count,
            plural(self.error_count),
            self.failure_count,
            plural(self.failure_count),
            self.skipped_count,
        )
    }
}

/// The interface for test result extensions.
///
/// A test result extension provides information about previously run tests.
pub trait TestResultProvider {
    /// Get all test results under the given basepath.
    ///
    /// When `collect_details` is set, details for errors and failures are
    /// gathered into [`TestResult::details`]. When `files` is passed it is
    /// populated with every file providing result information.
    fn get_test_results(
        &self,
        basepath: &Path,
        collect_details: bool,
        files: Option<&mut BTreeSet<PathBuf>>,
    ) -> Result<Vec<TestResult>>;
}

/// Check that the extension point version satisfies a caret requirement
/// like `^1.0`: same major version and at least the requested minor.
pub fn satisfies_version(version: &str, requirement: &str) -> Result<()> {
    let parse = |s: &str| -> Option<(u64, u64)> {
        let mut parts = s.split('.');
        let major = parts.next()?.parse().ok()?;
        let minor = parts.next().unwrap_or("0").parse().ok()?;
        Some((major, minor))
    };
    let required = requirement
        .strip_prefix('^')
        .and_then(parse)
        .ok_or_else(|| Error::Other(format!("Invalid version requirement '{}'", requirement)))?;
    let actual = parse(version)
        .ok_or_else(|| Error::Other(format!("Invalid version '{}'", version)))?;

    if actual.0 != required.0 || actual.1 < required.1 {
        return Err(Error::Other(format!(
            "Extension point version '{}' does not satisfy '{}'",
            version, requirement
        )));
    }
    Ok(())
}

type ProviderFactory = fn() -> Result<Box<dyn TestResultProvider>>;

/// Built-in providers by registration name
const PROVIDERS: &[(&str, ProviderFactory)] = &[("xunit", xunit)];

fn xunit() -> Result<Box<dyn TestResultProvider>> {
    Ok(Box::new(XunitTestResult::new()?))
}

/// Names of all registered test result extensions, ordered by name
pub fn provider_names() -> Vec<&'static str> {
    let mut names: Vec<_> = PROVIDERS.iter().map(|(name, _)| *name).collect();
    names.sort_unstable();
    names
}

/// Get the available test result extensions, ordered by name.
///
/// Extensions failing to instantiate are logged and left out.
pub fn get_test_result_extensions(
    exclude_names: &[&str],
) -> BTreeMap<String, Box<dyn TestResultProvider>> {
    let mut extensions = BTreeMap::new();
    for (name, factory) in PROVIDERS {
        if exclude_names.contains(name) {
            continue;
        }
        match factory() {
            Ok(extension) => {
                extensions.insert(name.to_string(), extension);
            }
            Err(e) => {
                error!("Failed to instantiate test result extension '{}': {}", name, e);
            }
        }
    }
    extensions
}

/// Get the test results from all registered extensions.
pub fn get_test_results(
    basepath: &Path,
    collect_details: bool,
    files: Option<&mut BTreeSet<PathBuf>>,
) -> Vec<TestResult> {
    collect_from(&get_test_result_extensions(&[]), basepath, collect_details, files)
}

/// Ask each extension in order and merge the results.
///
/// A failing extension is logged and skipped; the others still run.
pub fn collect_from(
    extensions: &BTreeMap<String, Box<dyn TestResultProvider>>,
    basepath: &Path,
    collect_details: bool,
    mut files: Option<&mut BTreeSet<PathBuf>>,
) -> Vec<TestResult> {
    let mut all_test_results = Vec::new();
    for (name, extension) in extensions {
        trace!("get_test_results({})", name);

        match extension.get_test_results(basepath, collect_details, files.as_deref_mut()) {
            Ok(results) => all_test_results.extend(results),
            Err(e) => {
                let e = Error::Extension {
                    name: name.clone(),
                    message: e.to_string(),
                };
                error!("{}", e);
            }
        }
    }
    all_test_results
}
