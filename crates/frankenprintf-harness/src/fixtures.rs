//! Fixture loading and management.

use std::path::Path;

use frankenprintf_core::stdio::printf::{FormatArg, NULL_POINTER_SENTINEL};
use frankenprintf_core::{NullStrPolicy, PrintfConfig, UnknownDirectivePolicy};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::HarnessError;

/// Placeholder in `expected_output` for the platform's null `%p` text.
pub const NULL_POINTER_TOKEN: &str = "${NULL_POINTER}";

/// A typed argument as written in fixture JSON.
///
/// `{"kind": "int", "value": -3}`, `{"kind": "str", "value": null}`, ...
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum FixtureArg {
    Char(char),
    Str(Option<String>),
    Int(i32),
    Uint(u32),
    Pointer(usize),
}

impl FixtureArg {
    /// Borrow as an engine argument. `case` names the owner for errors.
    pub fn to_format_arg(&self, case: &str) -> Result<FormatArg<'_>, HarnessError> {
        Ok(match self {
            Self::Char(c) => FormatArg::Char(u8::try_from(*c).map_err(|_| {
                HarnessError::WideChar {
                    case: case.to_string(),
                    value: *c,
                }
            })?),
            Self::Str(s) => FormatArg::Str(s.as_deref().map(str::as_bytes)),
            Self::Int(n) => FormatArg::Int(*n),
            Self::Uint(n) => FormatArg::Uint(*n),
            Self::Pointer(addr) => FormatArg::Pointer(*addr),
        })
    }
}

/// Parse a command-line argument spec: `int:-4`, `uint:7`, `hex:ff`,
/// `char:A`, `str:text`, `str` (null string), `ptr:0x10`, `ptr` (null).
pub fn parse_arg_spec(spec: &str) -> Result<FixtureArg, HarnessError> {
    let invalid = |reason: &str| HarnessError::InvalidArgSpec {
        spec: spec.to_string(),
        reason: reason.to_string(),
    };
    let (kind, value) = match spec.split_once(':') {
        Some((kind, value)) => (kind, Some(value)),
        None => (spec, None),
    };
    match (kind, value) {
        ("str", value) => Ok(FixtureArg::Str(value.map(str::to_string))),
        ("ptr", None) => Ok(FixtureArg::Pointer(0)),
        ("ptr", Some(v)) => {
            let digits = v
                .strip_prefix("0x")
                .or_else(|| v.strip_prefix("0X"))
                .unwrap_or(v);
            usize::from_str_radix(digits, 16)
                .map(FixtureArg::Pointer)
                .map_err(|e| invalid(&e.to_string()))
        }
        ("int", Some(v)) => v
            .parse()
            .map(FixtureArg::Int)
            .map_err(|e| invalid(&e.to_string())),
        ("uint", Some(v)) => v
            .parse()
            .map(FixtureArg::Uint)
            .map_err(|e| invalid(&e.to_string())),
        ("hex", Some(v)) => u32::from_str_radix(v.trim_start_matches("0x"), 16)
            .map(FixtureArg::Uint)
            .map_err(|e| invalid(&e.to_string())),
        ("char", Some(v)) => {
            let mut chars = v.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(FixtureArg::Char(c)),
                _ => Err(invalid("expected exactly one character")),
            }
        }
        (_, None) => Err(invalid("missing ':<value>'")),
        _ => Err(invalid("unknown kind")),
    }
}

/// A single fixture test case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureCase {
    /// Case identifier.
    pub name: String,
    pub template: String,
    #[serde(default)]
    pub args: Vec<FixtureArg>,
    /// Unsupported-directive policy name (`compat`, `echo`, `strict`).
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Null-string policy name (`placeholder`, `omit`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_str: Option<String>,
    /// Expected bytes, with `${NULL_POINTER}` standing for the platform sentinel.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    /// Expected return count; defaults to the length of `expected_output`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_len: Option<usize>,
    /// Expected error kind name (e.g. `argument_mismatch`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_error: Option<String>,
}

fn default_mode() -> String {
    UnknownDirectivePolicy::Drop.as_str().to_string()
}

impl FixtureCase {
    /// The policy set this case runs under.
    #[must_use]
    pub fn config(&self) -> PrintfConfig {
        let mut config = PrintfConfig::default()
            .with_unknown_directive(UnknownDirectivePolicy::from_str_loose(&self.mode));
        if let Some(null_str) = &self.null_str {
            config = config.with_null_str(NullStrPolicy::from_str_loose(null_str));
        }
        config
    }

    /// Engine arguments borrowed from this case.
    pub fn format_args(&self) -> Result<Vec<FormatArg<'_>>, HarnessError> {
        self.args
            .iter()
            .map(|arg| arg.to_format_arg(&self.name))
            .collect()
    }

    /// Expected output bytes with placeholders expanded.
    #[must_use]
    pub fn expected_bytes(&self) -> Option<Vec<u8>> {
        self.expected_output.as_deref().map(expand_expected)
    }

    /// Check that the case states exactly one kind of expectation.
    pub fn validate(&self) -> Result<(), HarnessError> {
        let invalid = |reason: &str| HarnessError::InvalidCase {
            case: self.name.clone(),
            reason: reason.to_string(),
        };
        match (&self.expected_output, &self.expected_error) {
            (Some(_), Some(_)) => Err(invalid(
                "expected_output and expected_error are mutually exclusive",
            )),
            (None, None) => Err(invalid("needs expected_output or expected_error")),
            (None, Some(_)) if self.expected_len.is_some() => {
                Err(invalid("expected_len only applies to expected_output"))
            }
            _ => Ok(()),
        }
    }
}

fn expand_expected(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut rest = s;
    while let Some(idx) = rest.find(NULL_POINTER_TOKEN) {
        out.extend_from_slice(rest[..idx].as_bytes());
        out.extend_from_slice(NULL_POINTER_SENTINEL);
        rest = &rest[idx + NULL_POINTER_TOKEN.len()..];
    }
    out.extend_from_slice(rest.as_bytes());
    out
}

/// A collection of fixture cases for a directive family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureSet {
    /// Schema version.
    pub version: String,
    pub family: String,
    pub cases: Vec<FixtureCase>,
}

impl FixtureSet {
    /// Load fixture set from JSON string.
    pub fn from_json(json: &str) -> Result<Self, HarnessError> {
        let set: Self = serde_json::from_str(json)?;
        for case in &set.cases {
            case.validate()?;
        }
        Ok(set)
    }

    /// Serialize fixture set to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load fixture set from a file path.
    pub fn from_file(path: &Path) -> Result<Self, HarnessError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Lowercase hex SHA-256 of a fixture file.
pub fn fixture_digest(path: &Path) -> Result<String, HarnessError> {
    let bytes = std::fs::read(path)?;
    Ok(sha256_hex(&bytes))
}

/// Lowercase hex SHA-256 of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().map(|b| format!("{b:02x}")).collect()
}
