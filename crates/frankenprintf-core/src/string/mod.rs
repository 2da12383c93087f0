//! String operations.
//!
//! Implements the `<string.h>` primitives the format engine consumes, as safe
//! Rust operating on slices.

pub mod str;

pub use self::str::{strdup, strlen, until_nul};
