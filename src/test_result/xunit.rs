//! xUnit test result extension
//!
//! Recursively crawls for XML files under the passed base path. Each XML file
//! is parsed and, if it has the structure of an xUnit result file, the
//! statistics are extracted. See the googletest documentation on "Generating
//! an XML Report" for an example of the format.

use crate::error::{Error, Result};
use crate::test_result::xml::{self, Element};
use crate::test_result::{
    satisfies_version, split_lines, TestResult, TestResultProvider, EXTENSION_POINT_VERSION,
};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};
use walkdir::{DirEntry, WalkDir};

/// Collect the xUnit results generated when testing a set of packages.
#[derive(Debug)]
pub struct XunitTestResult;

impl XunitTestResult {
    pub fn new() -> Result<Self> {
        satisfies_version(EXTENSION_POINT_VERSION, "^1.0")?;
        Ok(XunitTestResult)
    }
}

fn is_hidden_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_string_lossy().starts_with('.')
}

impl TestResultProvider for XunitTestResult {
    fn get_test_results(
        &self,
        basepath: &Path,
        collect_details: bool,
        mut files: Option<&mut BTreeSet<PathBuf>>,
    ) -> Result<Vec<TestResult>> {
        let mut results = Vec::new();

        let walker = WalkDir::new(basepath)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !is_hidden_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_name().to_string_lossy().ends_with(".xml") || !entry.path().is_file() {
                continue;
            }

            let path = entry.path();
            match parse_xunit_xml(path, collect_details) {
                Ok(result) => {
                    results.push(result);
                    if let Some(files) = files.as_deref_mut() {
                        files.insert(path.to_path_buf());
                    }
                }
                Err(e) if e.is_parse_error() => {
                    warn!("Skipping '{}': {}", path.display(), e);
                }
                Err(e) if e.is_invalid_result() => {
                    debug!("Skipping '{}': {}", path.display(), e);
                }
                Err(e) => {
                    error!("Skipping '{}': {}", path.display(), e);
                }
            }
        }
        Ok(results)
    }
}

/// Parse an XML file and interpret it as an xUnit result file.
///
/// When `get_testcases` is set, every test case with errors or failures is
/// rendered into the result's details.
pub fn parse_xunit_xml(path: &Path, get_testcases: bool) -> Result<TestResult> {
    let root = xml::parse_file(path)?;
    let mut result = TestResult::new(path.display().to_string());

    match root.tag.as_str() {
        "testsuites" => {
            for suite in root.children_named("testsuite") {
                add_counts(&mut result, testsuite_result(suite, get_testcases)?)?;
            }
        }
        "testsuite" => {
            add_counts(&mut result, testsuite_result(&root, get_testcases)?)?;
        }
        _ => {
            return Err(Error::InvalidResult(
                "the root tag is neither 'testsuite' nor 'testsuites'".to_string(),
            ))
        }
    }

    Ok(result)
}

/// Add the counts of one test suite, failing instead of overflowing.
fn add_counts(result: &mut TestResult, suite: TestResult) -> Result<()> {
    let overflow = || Error::InvalidResult("the test counts are too large".to_string());
    result.test_count = result.test_count.checked_add(suite.test_count).ok_or_else(overflow)?;
    result.error_count = result.error_count.checked_add(suite.error_count).ok_or_else(overflow)?;
    result.failure_count = result
        .failure_count
        .checked_add(suite.failure_count)
        .ok_or_else(overflow)?;
    result.skipped_count = result
        .skipped_count
        .checked_add(suite.skipped_count)
        .ok_or_else(overflow)?;
    result.details.extend(suite.details);
    Ok(())
}

#[derive(Clone, Copy)]
enum Slot {
    Tests,
    Errors,
    Failures,
    Skipped,
}

/// (slot, attribute, default) - attributes without a default are required
const COUNT_ATTRIBUTES: &[(Slot, &str, Option<u64>)] = &[
    (Slot::Tests, "tests", None),
    (Slot::Errors, "errors", Some(0)),
    (Slot::Failures, "failures", None),
    (Slot::Skipped, "skip", Some(0)),
    (Slot::Skipped, "skipped", Some(0)),
    (Slot::Skipped, "disabled", Some(0)),
];

fn count_attribute(node: &Element, attribute: &str, default: Option<u64>) -> Result<u64> {
    let value = match (node.attr(attribute), default) {
        (Some(value), _) => value,
        (None, Some(default)) => return Ok(default),
        (None, None) => {
            return Err(Error::InvalidResult(format!(
                "the '{}' attribute is required",
                attribute
            )))
        }
    };

    let value: i64 = value.trim().parse().map_err(|_| {
        Error::InvalidResult(format!(
            "the '{}' attribute should be an integer",
            attribute
        ))
    })?;
    u64::try_from(value).map_err(|_| {
        Error::InvalidResult(format!(
            "the '{}' attribute should be a positive integer",
            attribute
        ))
    })
}

fn testsuite_result(node: &Element, get_testcases: bool) -> Result<TestResult> {
    let mut result = TestResult::new("");
    for (slot, attribute, default) in COUNT_ATTRIBUTES {
        let value = count_attribute(node, attribute, *default)?;
        let count = match slot {
            Slot::Tests => &mut result.test_count,
            Slot::Errors => &mut result.error_count,
            Slot::Failures => &mut result.failure_count,
            Slot::Skipped => &mut result.skipped_count,
        };
        *count = count.checked_add(value).ok_or_else(|| {
            Error::InvalidResult(format!("the '{}' attribute is too large", attribute))
        })?;
    }

    if get_testcases {
        result.details.extend(parse_testcases(node)?);
    }

    Ok(result)
}

/// Parse information about test cases with errors and failures.
///
/// Returns one rendered string per such test case. A `testsuites` node is
/// processed recursively.
pub fn parse_testcases(node: &Element) -> Result<Vec<String>> {
    let mut testcases = Vec::new();
    match node.tag.as_str() {
        "testsuites" => {
            for child in &node.children {
                testcases.extend(parse_testcases(child)?);
            }
            return Ok(testcases);
        }
        "testsuite" => {}
        _ => return Ok(testcases),
    }

    for child in node.children_named("testcase") {
        let testcase = Testcase::from_element(child)?;
        if testcase.has_errors_or_failures() {
            testcases.push(testcase.to_string());
        }
    }
    Ok(testcases)
}

/// Information from a `testcase` tag
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Testcase {
    pub classname: Option<String>,
    pub file: Option<String>,
    pub line: Option<String>,
    pub name: Option<String>,
    pub time: Option<f64>,
    pub error_messages: Vec<String>,
    pub failure_messages: Vec<String>,
    pub system_outs: Vec<String>,
    pub system_errs: Vec<String>,
}

impl Testcase {
    fn from_element(node: &Element) -> Result<Self> {
        let owned = |name: &str| node.attr(name).map(str::to_string);
        let time = match node.attr("time") {
            Some(time) => Some(time.trim().parse::<f64>().map_err(|_| {
                Error::InvalidResult(format!("could not convert string to float: '{}'", time))
            })?),
            None => None,
        };

        let mut testcase = Testcase {
            classname: owned("classname"),
            file: owned("file"),
            line: owned("line"),
            name: owned("name"),
            time,
            ..Default::default()
        };

        for child in &node.children {
            let message = || child.attr("message").unwrap_or_default().to_string();
            let text = || child.text.clone().unwrap_or_default();
            match child.tag.as_str() {
                "error" => testcase.error_messages.push(message()),
                "failure" => testcase.failure_messages.push(message()),
                "system-out" => testcase.system_outs.push(text()),
                "system-err" => testcase.system_errs.push(text()),
                _ => {}
            }
        }
        Ok(testcase)
    }

    pub fn has_errors_or_failures(&self) -> bool {
        !self.error_messages.is_empty() || !self.failure_messages.is_empty()
    }

    fn label(&self) -> String {
        let mut parts = Vec::new();
        if let Some(classname) = self.classname.as_deref().filter(|s| !s.is_empty()) {
            parts.push(classname.to_string());
        }
        if let Some(name) = self.name.as_deref().filter(|s| !s.is_empty()) {
            parts.push(name.to_string());
        }
        if let Some(file) = self.file.as_deref().filter(|s| !s.is_empty()) {
            match self.line.as_deref().filter(|s| !s.is_empty()) {
                Some(line) => parts.push(format!("({}:{})", file, line)),
                None => parts.push(format!("({})", file)),
            }
        }
        parts.join(" ")
    }
}

fn message_lines(message: &str) -> Vec<&str> {
    split_lines(message.trim_matches(|c: char| c == '\n' || c == '\r'))
}

fn message_block(label: &str, messages: &[String]) -> Vec<String> {
    let mut lines = Vec::new();
    if !messages.is_empty() {
        lines.push(format!("<<< {}", label));
        for message in messages {
            lines.extend(message_lines(message).into_iter().map(|line| format!("  {}", line)));
        }
        lines.push(">>>".to_string());
    }
    lines
}

impl fmt::Display for Testcase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut lines = vec![self.label()];
        lines.extend(message_block("error message", &self.error_messages));
        lines.extend(message_block("failure message", &self.failure_messages));
        lines.extend(message_block("stdout output", &self.system_outs));
        lines.extend(message_block("stderr output", &self.system_errs));
        write!(f, "{}", lines.join("\n"))
    }
}
