//! Conformance testing harness for frankenprintf.
//!
//! This crate provides:
//! - Fixture sets: JSON cases pairing a template and typed arguments with the
//!   expected bytes, count, or error kind
//! - A runner that renders every case under its policy mode and compares
//! - Structured JSONL logging of each verification step
//! - Report generation with a SHA-256 digest of the fixture input

#![forbid(unsafe_code)]

pub mod error;
pub mod fixtures;
pub mod runner;
pub mod structured_log;

pub use error::HarnessError;
pub use fixtures::{FixtureArg, FixtureCase, FixtureSet};
pub use runner::{ConformanceReport, TestRunner, VerificationResult};
