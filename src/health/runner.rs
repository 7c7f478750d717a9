//! Test runner for orchestrating health checks

use std::time::Instant;

use tracing::{debug, warn};

use super::check::{CheckResult, CheckStatus, SystemCheck};

/// One check's outcome, labelled with the system it covers
#[derive(Debug)]
pub struct CheckRecord {
    pub name: &'static str,
    pub description: Option<&'static str>,
    pub result: CheckResult,
}

/// Results from running a health check suite
#[derive(Debug)]
pub struct HealthCheckReport {
    /// Individual results in the order the checks were added
    pub records: Vec<CheckRecord>,
    /// Total number of checks run
    pub total: usize,
    /// Number of passing checks
    pub passed: usize,
    /// Number of checks with warnings
    pub warned: usize,
    /// Number of failing checks
    pub failed: usize,
}

impl HealthCheckReport {
    fn from_records(records: Vec<CheckRecord>) -> Self {
        let count = |status| records.iter().filter(|r| r.result.status == status).count();
        Self {
            total: records.len(),
            passed: count(CheckStatus::Pass),
            warned: count(CheckStatus::Warn),
            failed: count(CheckStatus::Fail),
            records,
        }
    }

    /// Returns true if all checks passed (no failures)
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    /// Returns true if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// Worst status across all checks. An empty report is a pass.
    pub fn status(&self) -> CheckStatus {
        self.records
            .iter()
            .map(|r| r.result.status)
            .max()
            .unwrap_or(CheckStatus::Pass)
    }

    /// Records of checks that failed
    pub fn failures(&self) -> impl Iterator<Item = &CheckRecord> {
        self.records.iter().filter(|r| r.result.status.is_fail())
    }

    /// Returns the appropriate exit code for this report
    /// 0 = all pass, 1 = any fail, 2 = any warn (but no fail)
    pub fn exit_code(&self) -> i32 {
        match self.status() {
            CheckStatus::Pass => 0,
            CheckStatus::Fail => 1,
            CheckStatus::Warn => 2,
        }
    }
}

/// Orchestrates running health checks and collecting results
#[derive(Default)]
pub struct HealthCheckRunner {
    checks: Vec<Box<dyn SystemCheck>>,
}

impl HealthCheckRunner {
    /// Creates a new runner with no checks
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a check to the runner
    pub fn add_check<C: SystemCheck + 'static>(mut self, check: C) -> Self {
        self.checks.push(Box::new(check));
        self
    }

    /// Runs all registered checks in order and returns a report
    pub fn run(self) -> HealthCheckReport {
        let records = self
            .checks
            .into_iter()
            .map(|check| {
                let start = Instant::now();
                let result = check.check().with_duration(start.elapsed());

                if result.status.is_fail() {
                    warn!(check = check.name(), message = %result.message, "health check failed");
                } else {
                    debug!(check = check.name(), status = %result.status, duration = ?result.duration, "health check");
                }

                CheckRecord {
                    name: check.name(),
                    description: check.description(),
                    result,
                }
            })
            .collect();

        HealthCheckReport::from_records(records)
    }
}
