//! Run logging and suite reporting.
//!
//! Every run appends timestamped plain-text lines to a fresh file under the
//! log directory and echoes each line to the `log` facade for console output.
//! Scenario outcomes are collected into a [`SuiteReport`] so the overall
//! pass/fail verdict reflects every scenario, not just the connectivity probe.

use crate::error::TesterResult;
use chrono::Local;
use std::fs::{self, File, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Append-only per-run log file.
///
/// The file is created eagerly so that a run that dies early still leaves a
/// log behind. Appends are best-effort: a write failure is reported through
/// the `log` facade but never aborts the run.
pub struct RunLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl RunLog {
    /// Create the log directory if needed and open a fresh per-run file named
    /// with the current timestamp, e.g. `scim_test_20260825_143000.log`.
    pub fn create(dir: impl AsRef<Path>) -> TesterResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let name = format!("scim_test_{}.log", Local::now().format("%Y%m%d_%H%M%S"));
        let path = dir.join(name);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Append one timestamped line, echoing it to the console logger.
    pub fn line(&self, message: impl AsRef<str>) {
        let message = message.as_ref();
        log::info!("{message}");
        let stamped = format!("[{}] {message}\n", Local::now().format("%Y-%m-%d %H:%M:%S"));
        if let Ok(mut file) = self.file.lock() {
            if let Err(e) = file.write_all(stamped.as_bytes()) {
                log::warn!("failed to append to {}: {e}", self.path.display());
            }
        }
    }

    /// Path of the per-run log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Result of one named scenario.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioOutcome {
    /// Stable scenario name, e.g. `crud-lifecycle`
    pub name: &'static str,
    /// Whether every step of the scenario succeeded
    pub passed: bool,
}

/// Aggregate result of a full suite run.
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    /// Whether the initial connectivity probe succeeded
    pub connected: bool,
    /// One outcome per scenario, in execution order. Empty when the probe
    /// failed and the suite was aborted.
    pub outcomes: Vec<ScenarioOutcome>,
}

impl SuiteReport {
    /// Record the outcome of one scenario.
    pub(crate) fn record(&mut self, name: &'static str, passed: bool) {
        self.outcomes.push(ScenarioOutcome { name, passed });
    }

    /// True when the probe and every scenario passed.
    pub fn passed(&self) -> bool {
        self.connected && self.outcomes.iter().all(|outcome| outcome.passed)
    }

    /// Names of failed scenarios, in execution order.
    pub fn failures(&self) -> Vec<&'static str> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.passed)
            .map(|outcome| outcome.name)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_dir() -> PathBuf {
        std::env::temp_dir().join(format!("scim-tester-{}", uuid::Uuid::new_v4().simple()))
    }

    #[test]
    fn run_log_appends_timestamped_lines() {
        let dir = temp_log_dir();
        let log = RunLog::create(&dir).expect("create run log");
        log.line("first line");
        log.line("second line");

        let contents = fs::read_to_string(log.path()).expect("read log file");
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("first line"));
        assert!(lines[1].ends_with("second line"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn run_log_file_name_has_prefix() {
        let dir = temp_log_dir();
        let log = RunLog::create(&dir).expect("create run log");
        let name = log
            .path()
            .file_name()
            .and_then(|n| n.to_str())
            .expect("file name");
        assert!(name.starts_with("scim_test_"));
        assert!(name.ends_with(".log"));
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn report_requires_connectivity() {
        let report = SuiteReport::default();
        assert!(!report.passed());
    }

    #[test]
    fn report_fails_on_any_scenario_failure() {
        let mut report = SuiteReport {
            connected: true,
            ..SuiteReport::default()
        };
        report.record("crud-lifecycle", true);
        report.record("bulk-operations", false);
        assert!(!report.passed());
        assert_eq!(report.failures(), vec!["bulk-operations"]);
    }

    #[test]
    fn report_passes_when_all_scenarios_pass() {
        let mut report = SuiteReport {
            connected: true,
            ..SuiteReport::default()
        };
        report.record("crud-lifecycle", true);
        report.record("filtered-search", true);
        assert!(report.passed());
        assert!(report.failures().is_empty());
    }
}
