//! Collect and summarize the test results of a build

use crate::commands::utils::existing_dir;
use crate::commands::Command;
use crate::error::Result;
use crate::test_result::{get_test_results, split_lines, TestResult};
use crate::ui::UI;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tracing::debug;

/// Name of the verb
pub const VERB_NAME: &str = "test-result";

/// Base path used when none is configured
pub const DEFAULT_TEST_RESULT_BASE: &str = "build";

/// What the command should do with the collected results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Print per-file statistics and a summary
    #[default]
    Summary,
    /// Only print the paths of the result files
    ResultFilesOnly,
    /// Delete the result files, asking first unless `assume_yes`
    Delete { assume_yes: bool },
}

pub struct TestResultCommand {
    test_result_base: Option<String>,
    all: bool,
    verbose: bool,
    mode: Mode,
}

impl TestResultCommand {
    pub fn new(test_result_base: Option<String>) -> Self {
        TestResultCommand {
            test_result_base,
            all: false,
            verbose: false,
            mode: Mode::Summary,
        }
    }

    pub fn with_all_options(
        test_result_base: Option<String>,
        all: bool,
        verbose: bool,
        mode: Mode,
    ) -> Self {
        TestResultCommand {
            test_result_base,
            all,
            verbose,
            mode,
        }
    }

    fn show_summary(&self, ui: &mut dyn UI, mut results: Vec<TestResult>) -> Result<i32> {
        results.sort_by(|a, b| a.path.cmp(&b.path));

        // stats from individual result files
        for result in &results {
            if !result.has_errors_or_failures() && !self.all {
                continue;
            }
            ui.output(&result.to_string())?;
            if !self.verbose {
                continue;
            }
            for detail in &result.details {
                for (i, line) in split_lines(detail).into_iter().enumerate() {
                    let prefix = if i == 0 { "-" } else { " " };
                    ui.output(&format!("{} {}", prefix, line))?;
                }
            }
        }

        if results.iter().any(TestResult::has_errors_or_failures) || (self.all && !results.is_empty())
        {
            ui.output("")?;
        }

        let mut summary = TestResult::new("Summary");
        for result in &results {
            summary.add_result(result);
        }
        ui.output(&summary.to_string())?;

        Ok(if summary.has_errors_or_failures() { 1 } else { 0 })
    }

    fn delete_files(&self, ui: &mut dyn UI, files: &[PathBuf], assume_yes: bool) -> Result<i32> {
        if files.is_empty() {
            ui.output("No test result files found")?;
            return Ok(0);
        }

        for path in files {
            ui.output(&path.display().to_string())?;
        }

        let prompt = format!("Delete {} test result file(s)? [y/N]", files.len());
        if !assume_yes && !ui.confirm(&prompt)? {
            ui.output("No files deleted")?;
            return Ok(0);
        }

        for path in files {
            debug!("Deleting '{}'", path.display());
            fs::remove_file(path)?;
        }
        ui.output(&format!("Deleted {} test result file(s)", files.len()))?;
        Ok(0)
    }
}

/// Order paths the way they are printed, as plain strings
fn sorted_by_display(paths: BTreeSet<PathBuf>) -> Vec<PathBuf> {
    let mut paths: Vec<_> = paths.into_iter().collect();
    paths.sort_by_cached_key(|path| path.display().to_string());
    paths
}

impl Command for TestResultCommand {
    fn execute(&self, ui: &mut dyn UI) -> Result<i32> {
        let base = existing_dir(
            self.test_result_base
                .as_deref()
                .unwrap_or(DEFAULT_TEST_RESULT_BASE),
        )?;

        let mut found = BTreeSet::new();
        let results = get_test_results(&base, self.verbose, Some(&mut found));
        let files = sorted_by_display(found);

        match self.mode {
            Mode::Summary => self.show_summary(ui, results),
            Mode::ResultFilesOnly => {
                for path in &files {
                    ui.output(&path.display().to_string())?;
                }
                Ok(0)
            }
            Mode::Delete { assume_yes } => self.delete_files(ui, &files, assume_yes),
        }
    }

    fn name(&self) -> &str {
        VERB_NAME
    }

    fn help(&self) -> &str {
        "Summarize the results of previously run tests"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::ui::test_ui::TestUI;
    use std::path::Path;
    use tempfile::TempDir;

    const PASSING: &str = r#"<testsuite tests="2" failures="0" skipped="1"/>"#;
    const FAILING: &str = r#"<testsuite tests="3" failures="1" errors="1">
  <testcase classname="pkg.Test" name="ok"/>
  <testcase classname="pkg.Test" name="bad" file="t.py" line="7">
    <failure message="expected 1&#10;got 2"/>
  </testcase>
  <testcase name="crash">
    <error message="boom"/>
  </testcase>
</testsuite>"#;

    fn write(dir: &Path, relative: &str, contents: &str) -> PathBuf {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, contents).unwrap();
        path
    }

    fn base(temp: &TempDir) -> Option<String> {
        Some(temp.path().to_string_lossy().to_string())
    }

    #[test]
    fn test_missing_base() {
        let temp = TempDir::new().unwrap();
        let mut ui = TestUI::new();
        let cmd = TestResultCommand::new(Some(
            temp.path().join("build").to_string_lossy().to_string(),
        ));

        let result = cmd.execute(&mut ui);
        assert!(matches!(result, Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_no_results() {
        let temp = TempDir::new().unwrap();
        let mut ui = TestUI::new();
        let cmd = TestResultCommand::new(base(&temp));

        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);
        assert_eq!(
            ui.output,
            vec!["Summary: 0 tests, 0 errors, 0 failures, 0 skipped"]
        );
    }

    #[test]
    fn test_only_passing_results() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "pkg/results.xml", PASSING);

        let mut ui = TestUI::new();
        let cmd = TestResultCommand::new(base(&temp));

        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);
        assert_eq!(
            ui.output,
            vec!["Summary: 2 tests, 0 errors, 0 failures, 1 skipped"]
        );
    }

    #[test]
    fn test_failing_results() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "a/results.xml", PASSING);
        let failing = write(temp.path(), "b/results.xml", FAILING);

        let mut ui = TestUI::new();
        let cmd = TestResultCommand::new(base(&temp));

        assert_eq!(cmd.execute(&mut ui).unwrap(), 1);
        assert_eq!(
            ui.output,
            vec![
                format!("{}: 3 tests, 1 error, 1 failure, 0 skipped", failing.display()),
                String::new(),
                "Summary: 5 tests, 1 error, 1 failure, 1 skipped".to_string(),
            ]
        );
    }

    #[test]
    fn test_all_shows_passing_results() {
        let temp = TempDir::new().unwrap();
        let passing = write(temp.path(), "a/results.xml", PASSING);

        let mut ui = TestUI::new();
        let cmd = TestResultCommand::with_all_options(base(&temp), true, false, Mode::Summary);

        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);
        assert_eq!(
            ui.output,
            vec![
                format!("{}: 2 tests, 0 errors, 0 failures, 1 skipped", passing.display()),
                String::new(),
                "Summary: 2 tests, 0 errors, 0 failures, 1 skipped".to_string(),
            ]
        );
    }

    #[test]
    fn test_verbose_shows_details() {
        let temp = TempDir::new().unwrap();
        let failing = write(temp.path(), "b/results.xml", FAILING);

        let mut ui = TestUI::new();
        let cmd = TestResultCommand::with_all_options(base(&temp), false, true, Mode::Summary);

        assert_eq!(cmd.execute(&mut ui).unwrap(), 1);
        assert_eq!(
            ui.output,
            vec![
                format!("{}: 3 tests, 1 error, 1 failure, 0 skipped", failing.display()),
                "- pkg.Test bad (t.py:7)".to_string(),
                "  <<< failure message".to_string(),
                "    expected 1".to_string(),
                "    got 2".to_string(),
                "  >>>".to_string(),
                "- crash".to_string(),
                "  <<< error message".to_string(),
                "    boom".to_string(),
                "  >>>".to_string(),
                String::new(),
                "Summary: 3 tests, 1 error, 1 failure, 0 skipped".to_string(),
            ]
        );
    }

    #[test]
    fn test_result_files_only() {
        let temp = TempDir::new().unwrap();
        let b = write(temp.path(), "b/results.xml", FAILING);
        let a = write(temp.path(), "a/results.xml", PASSING);
        write(temp.path(), "a/package.xml", "<package/>");

        let mut ui = TestUI::new();
        let cmd =
            TestResultCommand::with_all_options(base(&temp), false, false, Mode::ResultFilesOnly);

        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);
        assert_eq!(
            ui.output,
            vec![a.display().to_string(), b.display().to_string()]
        );
    }

    #[test]
    fn test_result_files_sorted_as_strings() {
        let temp = TempDir::new().unwrap();
        let nested = write(temp.path(), "a/b.xml", PASSING);
        let flat = write(temp.path(), "a-c.xml", PASSING);

        let mut ui = TestUI::new();
        let cmd =
            TestResultCommand::with_all_options(base(&temp), false, false, Mode::ResultFilesOnly);

        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);
        assert_eq!(
            ui.output,
            vec![flat.display().to_string(), nested.display().to_string()]
        );
    }

    #[test]
    fn test_verbose_splits_unicode_line_boundaries() {
        let temp = TempDir::new().unwrap();
        write(
            temp.path(),
            "r.xml",
            "<testsuite tests=\"1\" failures=\"1\">\
             <testcase name=\"t\"><failure message=\"first\u{2028}second\u{2029}third\"/></testcase>\
             </testsuite>",
        );

        let mut ui = TestUI::new();
        let cmd = TestResultCommand::with_all_options(base(&temp), false, true, Mode::Summary);

        assert_eq!(cmd.execute(&mut ui).unwrap(), 1);
        assert_eq!(
            ui.output[1..7],
            [
                "- t",
                "  <<< failure message",
                "    first",
                "    second",
                "    third",
                "  >>>",
            ]
        );
    }

    #[test]
    fn test_delete_declined() {
        let temp = TempDir::new().unwrap();
        let a = write(temp.path(), "a/results.xml", PASSING);

        let mut ui = TestUI::answering(false);
        let cmd = TestResultCommand::with_all_options(
            base(&temp),
            false,
            false,
            Mode::Delete { assume_yes: false },
        );

        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);
        assert_eq!(ui.prompts, vec!["Delete 1 test result file(s)? [y/N]"]);
        assert_eq!(ui.output.last().unwrap(), "No files deleted");
        assert!(a.exists());
    }

    #[test]
    fn test_delete_confirmed() {
        let temp = TempDir::new().unwrap();
        let a = write(temp.path(), "a/results.xml", PASSING);
        let other = write(temp.path(), "a/package.xml", "<package/>");

        let mut ui = TestUI::answering(true);
        let cmd = TestResultCommand::with_all_options(
            base(&temp),
            false,
            false,
            Mode::Delete { assume_yes: false },
        );

        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);
        assert_eq!(ui.output.last().unwrap(), "Deleted 1 test result file(s)");
        assert!(!a.exists());
        assert!(other.exists());
    }

    #[test]
    fn test_delete_yes_does_not_ask() {
        let temp = TempDir::new().unwrap();
        let a = write(temp.path(), "a/results.xml", FAILING);

        let mut ui = TestUI::new();
        let cmd = TestResultCommand::with_all_options(
            base(&temp),
            false,
            false,
            Mode::Delete { assume_yes: true },
        );

        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);
        assert!(ui.prompts.is_empty());
        assert!(!a.exists());
    }

    #[test]
    fn test_delete_nothing_found() {
        let temp = TempDir::new().unwrap();

        let mut ui = TestUI::new();
        let cmd = TestResultCommand::with_all_options(
            base(&temp),
            false,
            false,
            Mode::Delete { assume_yes: true },
        );

        assert_eq!(cmd.execute(&mut ui).unwrap(), 0);
        assert_eq!(ui.output, vec!["No test result files found"]);
    }
}
