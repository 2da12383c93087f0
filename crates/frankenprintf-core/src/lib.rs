//! # frankenprintf-core
//!
//! Safe Rust implementation of a printf-family formatted-output function for
//! a fixed directive set: `%c %s %d %i %u %x %X %p %%`.
//!
//! This crate provides the format interpreter (scanner, dispatcher, directive
//! formatters and length accumulator) together with the text primitives it
//! consumes. No `unsafe` code is permitted at the crate level; the only
//! exception is the raw file-descriptor output sink.

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod stdio;
pub mod stdlib;
pub mod string;

pub use config::{NullStrPolicy, PrintfConfig, UnknownDirectivePolicy};
pub use error::{PrintfError, PrintfErrorKind};
pub use stdio::{FdSink, FormatArg, format_to, printf, render};
