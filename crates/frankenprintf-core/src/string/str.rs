//! String operations: strlen, strdup.
//!
//! Safe Rust implementations operating on byte slices that represent
//! NUL-terminated C strings. A NUL byte (`0x00`) marks the logical end of the
//! string; a slice without one ends at its last byte.

/// Returns the length of a NUL-terminated byte string (not counting the NUL).
///
/// Equivalent to C `strlen`. Scans `s` for the first `0x00` byte and returns
/// its index. If no NUL is found, returns the full slice length.
pub fn strlen(s: &[u8]) -> usize {
    s.iter().position(|&b| b == 0).unwrap_or(s.len())
}

/// The logical string content of `s`: everything before the first NUL.
pub fn until_nul(s: &[u8]) -> &[u8] {
    &s[..strlen(s)]
}

/// Owned copy of the string content of `s` (up to its first NUL).
///
/// Equivalent to C `strdup` minus the terminator, which `Vec<u8>` does not need.
#[must_use]
pub fn strdup(s: &[u8]) -> Vec<u8> {
    until_nul(s).to_vec()
}
