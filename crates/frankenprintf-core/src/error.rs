//! Errors reported by the format engine.
//!
//! Every failure aborts the scan. The bytes already handed to the sink stay
//! written, and [`PrintfError::written`] reports how many there were.

use thiserror::Error;

/// A failed formatting call.
#[derive(Debug, Error)]
#[error("{kind} (after {written} bytes written)")]
pub struct PrintfError {
    /// Length accumulator value when the scan aborted.
    pub written: usize,
    #[source]
    pub kind: PrintfErrorKind,
}

/// What went wrong.
#[derive(Debug, Error)]
pub enum PrintfErrorKind {
    #[error("argument {index} for %{directive} is {found}, expected {expected}")]
    ArgumentMismatch {
        index: usize,
        directive: char,
        expected: &'static str,
        found: &'static str,
    },
    #[error("missing argument {index} for %{directive}")]
    MissingArgument { index: usize, directive: char },
    #[error("unsupported directive code {code:#04x} at offset {offset}")]
    UnsupportedDirective { code: u8, offset: usize },
    #[error("dangling '%' at offset {offset}")]
    DanglingTrigger { offset: usize },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl PrintfError {
    #[must_use]
    pub fn new(written: usize, kind: PrintfErrorKind) -> Self {
        Self { written, kind }
    }

    /// Stable short name of the error kind (used by fixtures and logs).
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

impl PrintfErrorKind {
    /// Stable short name of the error kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ArgumentMismatch { .. } => "argument_mismatch",
            Self::MissingArgument { .. } => "missing_argument",
            Self::UnsupportedDirective { .. } => "unsupported_directive",
            Self::DanglingTrigger { .. } => "dangling_trigger",
            Self::Io(_) => "io",
        }
    }
}
