//! Defaults file parsing and handling
//!
//! The defaults file uses INI format. Each verb reads its own section, named
//! after the verb (e.g. `[test-result]`). Values given on the command line
//! take precedence over the file.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Environment variable naming the defaults file
pub const DEFAULTS_FILE_ENV: &str = "COLCON_TEST_RESULT_DEFAULTS_FILE";

/// Section holding the `test-result` verb's defaults
pub const TEST_RESULT_SECTION: &str = "test-result";

/// Defaults for the `test-result` verb
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TestResultDefaults {
    /// The base path for all test results
    pub test_result_base: Option<String>,

    /// Show all test result files, even without errors / failures
    pub all: Option<bool>,

    /// Show additional information for errors / failures
    pub verbose: Option<bool>,
}

impl TestResultDefaults {
    /// Load defaults from a file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read defaults file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&contents)
    }

    /// Parse defaults from a string
    ///
    /// A file without a `[test-result]` section yields empty defaults.
    pub fn parse(contents: &str) -> Result<Self> {
        let ini: HashMap<String, HashMap<String, String>> = serde_ini::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse defaults file: {}", e)))?;

        let section = match ini.get(TEST_RESULT_SECTION) {
            Some(section) => section,
            None => return Ok(Self::default()),
        };

        if let Some(unknown) = section
            .keys()
            .find(|key| !matches!(key.as_str(), "test_result_base" | "all" | "verbose"))
        {
            return Err(Error::Config(format!(
                "Unknown option '{}' in [{}]",
                unknown, TEST_RESULT_SECTION
            )));
        }

        let test_result_base = section.get("test_result_base").cloned();
        if test_result_base.as_deref() == Some("") {
            return Err(Error::Config("test_result_base cannot be empty".to_string()));
        }

        Ok(TestResultDefaults {
            test_result_base,
            all: section.get("all").map(|v| parse_bool("all", v)).transpose()?,
            verbose: section
                .get("verbose")
                .map(|v| parse_bool("verbose", v))
                .transpose()?,
        })
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::Config(format!(
            "Option '{}' expects a boolean, got '{}'",
            key, value
        ))),
    }
}
