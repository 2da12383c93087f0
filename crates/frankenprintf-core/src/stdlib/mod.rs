//! Standard library utilities.
//!
//! Implements the integer-to-text conversions (`itoa` family) used by the
//! numeric directive formatters.

pub mod conversion;

pub use conversion::{HexCase, IntText, itoa, utoa, xtoa};
