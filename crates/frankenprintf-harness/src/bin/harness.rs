//! CLI entrypoint for the frankenprintf conformance harness.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use frankenprintf_core::{FdSink, NullStrPolicy, PrintfConfig, UnknownDirectivePolicy, format_to};
use frankenprintf_harness::fixtures::{fixture_digest, parse_arg_spec};
use frankenprintf_harness::structured_log::{LogEmitter, validate_log_file};
use frankenprintf_harness::{ConformanceReport, FixtureSet, TestRunner};

/// Conformance tooling for frankenprintf.
#[derive(Debug, Parser)]
#[command(name = "frankenprintf-harness")]
#[command(about = "Conformance testing harness for frankenprintf")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render one template to stdout and report the count on stderr.
    Render {
        /// Template; `\n`, `\t` and `\\` escapes are expanded.
        template: String,
        /// Typed argument, e.g. `int:-4`, `uint:7`, `hex:ff`, `char:A`, `str:hi`, `str`, `ptr:0x10`.
        #[arg(long = "arg")]
        args: Vec<String>,
        /// Unsupported-directive policy (compat, echo, strict).
        #[arg(long)]
        mode: Option<String>,
        /// Null-string policy (placeholder, omit).
        #[arg(long)]
        null_str: Option<String>,
    },
    /// Verify the engine against a fixture file.
    Verify {
        /// Fixture JSON path.
        #[arg(long)]
        fixture: PathBuf,
        /// Structured JSONL log output path.
        #[arg(long)]
        log: Option<PathBuf>,
        /// JSON report output path (if omitted, prints to stdout).
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Validate a structured JSONL log file.
    ValidateLog {
        #[arg(long)]
        log: PathBuf,
    },
}

fn unescape(template: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(template.len());
    let mut bytes = template.bytes();
    while let Some(b) = bytes.next() {
        if b != b'\\' {
            out.push(b);
            continue;
        }
        match bytes.next() {
            Some(b'n') => out.push(b'\n'),
            Some(b't') => out.push(b'\t'),
            Some(b'\\') => out.push(b'\\'),
            Some(other) => out.extend_from_slice(&[b'\\', other]),
            None => out.push(b'\\'),
        }
    }
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Render {
            template,
            args,
            mode,
            null_str,
        } => {
            let mut config = PrintfConfig::global();
            if let Some(mode) = mode {
                config = config.with_unknown_directive(UnknownDirectivePolicy::from_str_loose(&mode));
            }
            if let Some(null_str) = null_str {
                config = config.with_null_str(NullStrPolicy::from_str_loose(&null_str));
            }
            let fixture_args = args
                .iter()
                .map(|spec| parse_arg_spec(spec))
                .collect::<Result<Vec<_>, _>>()?;
            let format_args = fixture_args
                .iter()
                .map(|arg| arg.to_format_arg("render"))
                .collect::<Result<Vec<_>, _>>()?;

            let template = unescape(&template);
            let n = format_to(&mut FdSink::stdout(), &template, &format_args, &config)?;
            eprintln!("\nwrote {n} bytes");
        }
        Command::Verify {
            fixture,
            log,
            report,
        } => {
            eprintln!("Verifying against fixture {}", fixture.display());
            let set = FixtureSet::from_file(&fixture)?;
            let digest = fixture_digest(&fixture)?;
            let runner = TestRunner::new("fixture-verify");

            let results = match log {
                Some(log_path) => {
                    let run_id = format!("{}-{}", set.family, &digest[..12]);
                    let mut emitter = LogEmitter::to_file(&log_path, &runner.campaign, &run_id)?;
                    let results = runner.run_logged(&set, &mut emitter)?;
                    eprintln!("Wrote structured log to {}", log_path.display());
                    results
                }
                None => runner.run(&set),
            };

            for failure in results.iter().filter(|r| !r.passed) {
                eprintln!(
                    "FAIL [{}] {}: expected {:?}, got {:?}",
                    failure.mode, failure.case_name, failure.expected, failure.actual
                );
            }

            let summary = ConformanceReport::new(&runner.campaign, &set.family, Some(digest), results);
            let json = summary.to_json()?;
            match report {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    eprintln!("Report written to {}", path.display());
                }
                None => println!("{json}"),
            }

            eprintln!(
                "{}: {} passed, {} failed ({} total)",
                summary.family, summary.passed, summary.failed, summary.total
            );
            if !summary.all_passed() {
                std::process::exit(1);
            }
        }
        Command::ValidateLog { log } => {
            let (lines, errors) = validate_log_file(&log)?;
            for error in &errors {
                eprintln!("{error}");
            }
            eprintln!("{lines} lines checked, {} errors", errors.len());
            if !errors.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
