//! Runs the checked-in fixture set end to end.

use std::path::PathBuf;

use frankenprintf_harness::fixtures::fixture_digest;
use frankenprintf_harness::structured_log::{LogEmitter, validate_log_line};
use frankenprintf_harness::{ConformanceReport, FixtureSet, TestRunner};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/printf_core.json")
}

#[test]
fn checked_in_fixtures_all_pass() {
    let set = FixtureSet::from_file(&fixture_path()).unwrap();
    assert!(!set.cases.is_empty());

    let results = TestRunner::new("fixture-test").run(&set);
    let failures: Vec<_> = results.iter().filter(|r| !r.passed).collect();
    assert!(failures.is_empty(), "failing cases: {failures:#?}");
    assert_eq!(results.len(), set.cases.len());
}

#[test]
fn logged_run_emits_valid_jsonl() {
    let set = FixtureSet::from_file(&fixture_path()).unwrap();
    let runner = TestRunner::new("fixture-test");
    let mut emitter = LogEmitter::to_buffer(&runner.campaign, "run-1");
    let results = runner.run_logged(&set, &mut emitter).unwrap();

    let text = String::from_utf8(emitter.into_inner()).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    // suite_start + one per case + suite_end
    assert_eq!(lines.len(), results.len() + 2);

    let mut case_lines = 0;
    for (i, line) in lines.iter().enumerate() {
        let entry = validate_log_line(line, i + 1).unwrap_or_else(|errs| {
            panic!(
                "line {} invalid: {:?}",
                i + 1,
                errs.iter().map(ToString::to_string).collect::<Vec<_>>()
            )
        });
        if entry.event == "case_result" {
            case_lines += 1;
            assert!(entry.case.is_some());
            assert!(entry.mode.is_some());
            assert!(entry.latency_ns.is_some());
        }
    }
    assert_eq!(case_lines, set.cases.len());
}

#[test]
fn error_cases_log_their_kind() {
    let set = FixtureSet::from_file(&fixture_path()).unwrap();
    let runner = TestRunner::new("fixture-test");
    let mut emitter = LogEmitter::to_buffer(&runner.campaign, "run-2");
    runner.run_logged(&set, &mut emitter).unwrap();

    let text = String::from_utf8(emitter.into_inner()).unwrap();
    let mismatch = text
        .lines()
        .map(|line| serde_json::from_str::<serde_json::Value>(line).unwrap())
        .find(|v| v["case"] == "argument_kind_mismatch")
        .unwrap();
    assert_eq!(mismatch["error_kind"], "argument_mismatch");
    assert_eq!(mismatch["written"], 3);
    assert_eq!(mismatch["outcome"], "pass");
}

#[test]
fn report_carries_fixture_digest() {
    let path = fixture_path();
    let set = FixtureSet::from_file(&path).unwrap();
    let digest = fixture_digest(&path).unwrap();
    assert_eq!(digest.len(), 64);
    assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    assert_eq!(digest, fixture_digest(&path).unwrap());

    let results = TestRunner::new("fixture-test").run(&set);
    let report = ConformanceReport::new("fixture-test", &set.family, Some(digest.clone()), results);
    assert!(report.all_passed());
    let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
    assert_eq!(json["fixture_sha256"], digest.as_str());
    assert_eq!(json["family"], "printf");
    assert_eq!(json["total"], set.cases.len());
}

#[test]
fn fixture_set_round_trips_through_json() {
    let set = FixtureSet::from_file(&fixture_path()).unwrap();
    let again = FixtureSet::from_json(&set.to_json().unwrap()).unwrap();
    assert_eq!(again.cases.len(), set.cases.len());
    assert_eq!(again.cases[0].template, set.cases[0].template);
}
