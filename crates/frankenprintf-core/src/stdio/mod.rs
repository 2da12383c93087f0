//! Standard I/O operations.
//!
//! Implements the `<stdio.h>` formatted-output entry points over the fixed
//! directive set, plus the unbuffered descriptor sink they write through.

pub mod printf;
#[allow(unsafe_code)]
pub mod sink;

pub use printf::{FormatArg, format_to, printf, render};
pub use sink::FdSink;
