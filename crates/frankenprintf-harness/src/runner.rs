//! Test execution engine.

use std::io::Write;
use std::time::Instant;

use frankenprintf_core::format_to;
use serde::{Deserialize, Serialize};

use crate::fixtures::{FixtureCase, FixtureSet};
use crate::structured_log::{LogEmitter, LogLevel, Outcome, StreamKind};

/// Result of verifying one fixture case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResult {
    pub case_name: String,
    pub mode: String,
    pub passed: bool,
    /// Expected bytes (lossy UTF-8) or expected error kind.
    pub expected: String,
    /// Actual bytes (lossy UTF-8) or actual error kind.
    pub actual: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_len: Option<usize>,
    /// Count returned, or accumulated before an error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_len: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs a fixture set and collects verification results.
pub struct TestRunner {
    /// Name of the test campaign.
    pub campaign: String,
}

impl TestRunner {
    /// Create a new test runner.
    #[must_use]
    pub fn new(campaign: impl Into<String>) -> Self {
        Self {
            campaign: campaign.into(),
        }
    }

    /// Run all fixtures in a set and return results.
    #[must_use]
    pub fn run(&self, fixture_set: &FixtureSet) -> Vec<VerificationResult> {
        fixture_set
            .cases
            .iter()
            .map(|case| execute_case(case).0)
            .collect()
    }

    /// Run all fixtures, logging one JSONL entry per case.
    pub fn run_logged<W: Write>(
        &self,
        fixture_set: &FixtureSet,
        log: &mut LogEmitter<W>,
    ) -> std::io::Result<Vec<VerificationResult>> {
        let start = log
            .entry(LogLevel::Info, "suite_start")
            .with_stream(StreamKind::Conformance)
            .with_details(serde_json::json!({
                "campaign": self.campaign,
                "family": fixture_set.family,
                "cases": fixture_set.cases.len(),
            }));
        log.emit_entry(start)?;

        let mut results = Vec::with_capacity(fixture_set.cases.len());
        for case in &fixture_set.cases {
            let (result, latency_ns) = execute_case(case);
            let (level, outcome) = if result.passed {
                (LogLevel::Info, Outcome::Pass)
            } else {
                (LogLevel::Error, Outcome::Fail)
            };
            let mut entry = log
                .entry(level, "case_result")
                .with_stream(StreamKind::Conformance)
                .with_mode(&result.mode)
                .with_case(&case.name, &case.template)
                .with_outcome(outcome)
                .with_latency_ns(latency_ns);
            if !result.passed {
                entry = entry.with_comparison(&result.expected, &result.actual);
            }
            if let Some(n) = result.actual_len {
                entry = entry.with_written(n);
            }
            if let Some(kind) = &result.error {
                entry = entry.with_error_kind(kind);
            }
            log.emit_entry(entry)?;
            results.push(result);
        }

        let failed = results.iter().filter(|r| !r.passed).count();
        let end = log
            .entry(
                if failed == 0 {
                    LogLevel::Info
                } else {
                    LogLevel::Warn
                },
                "suite_end",
            )
            .with_stream(StreamKind::Conformance)
            .with_details(serde_json::json!({
                "passed": results.len() - failed,
                "failed": failed,
            }));
        log.emit_entry(end)?;
        log.flush()?;
        Ok(results)
    }
}

fn execute_case(case: &FixtureCase) -> (VerificationResult, u64) {
    let config = case.config();
    let mut result = VerificationResult {
        case_name: case.name.clone(),
        mode: config.unknown_directive.as_str().to_string(),
        passed: false,
        expected: String::new(),
        actual: String::new(),
        expected_len: None,
        actual_len: None,
        error: None,
    };

    let args = match case.format_args() {
        Ok(args) => args,
        Err(err) => {
            result.actual = err.to_string();
            result.error = Some("invalid_case".to_string());
            return (result, 0);
        }
    };

    let mut out = Vec::new();
    let started = Instant::now();
    let outcome = format_to(&mut out, case.template.as_bytes(), &args, &config);
    let latency_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);

    match (&case.expected_error, outcome) {
        (Some(expected_kind), Ok(n)) => {
            result.expected = expected_kind.clone();
            result.actual = String::from_utf8_lossy(&out).into_owned();
            result.actual_len = Some(n);
        }
        (Some(expected_kind), Err(err)) => {
            result.expected = expected_kind.clone();
            result.actual = err.kind_name().to_string();
            result.actual_len = Some(err.written);
            result.error = Some(err.kind_name().to_string());
            result.passed = err.kind_name() == expected_kind;
        }
        (None, outcome) => {
            let expected = case.expected_bytes().unwrap_or_default();
            let expected_len = case.expected_len.unwrap_or(expected.len());
            result.expected = String::from_utf8_lossy(&expected).into_owned();
            result.expected_len = Some(expected_len);
            match outcome {
                Ok(n) => {
                    result.actual = String::from_utf8_lossy(&out).into_owned();
                    result.actual_len = Some(n);
                    result.passed = out == expected && n == expected_len;
                }
                Err(err) => {
                    result.actual = err.to_string();
                    result.actual_len = Some(err.written);
                    result.error = Some(err.kind_name().to_string());
                }
            }
        }
    }

    (result, latency_ns)
}

/// Machine-readable summary of one verification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConformanceReport {
    pub campaign: String,
    pub family: String,
    /// SHA-256 of the fixture file the cases came from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixture_sha256: Option<String>,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub results: Vec<VerificationResult>,
}

impl ConformanceReport {
    #[must_use]
    pub fn new(
        campaign: impl Into<String>,
        family: impl Into<String>,
        fixture_sha256: Option<String>,
        results: Vec<VerificationResult>,
    ) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            campaign: campaign.into(),
            family: family.into(),
            fixture_sha256,
            total: results.len(),
            passed,
            failed: results.len() - passed,
            results,
        }
    }

    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
