//! Integer-to-text conversions (itoa, utoa, xtoa).
//!
//! Digits are rendered right-aligned into a fixed stack buffer, so no
//! conversion can allocate or fail. Output is always the minimal digit
//! sequence: no padding, no grouping, no radix prefix.

/// Capacity of an [`IntText`] buffer. Large enough for a sign plus the 20
/// decimal digits of `u64::MAX`, or a `0x` prefix plus 16 hex digits.
pub const INT_TEXT_CAPACITY: usize = 24;

/// Letter case for hexadecimal digits above 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexCase {
    Lower,
    Upper,
}

/// Rendered integer text, stored right-aligned in a fixed buffer.
///
/// Invariant: `start <= INT_TEXT_CAPACITY` and `buf[start..]` is the text.
#[derive(Clone, Copy)]
pub struct IntText {
    buf: [u8; INT_TEXT_CAPACITY],
    start: usize,
}

impl IntText {
    const fn empty() -> Self {
        Self {
            buf: [0; INT_TEXT_CAPACITY],
            start: INT_TEXT_CAPACITY,
        }
    }

    /// The rendered bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[self.start..]
    }

    /// Number of rendered bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        INT_TEXT_CAPACITY - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Prepend `prefix` in front of the current text.
    ///
    /// Silently keeps only what fits; callers stay well inside capacity.
    pub(crate) fn prepend(&mut self, prefix: &[u8]) {
        for &b in prefix.iter().rev() {
            if self.start == 0 {
                break;
            }
            self.start -= 1;
            self.buf[self.start] = b;
        }
    }

    fn push_digits(&mut self, mut value: u64, base: u64, case: HexCase) {
        if value == 0 {
            self.prepend(b"0");
            return;
        }
        let alpha = match case {
            HexCase::Lower => b'a',
            HexCase::Upper => b'A',
        };
        while value > 0 && self.start > 0 {
            let digit = (value % base) as u8;
            self.start -= 1;
            self.buf[self.start] = if digit < 10 {
                b'0' + digit
            } else {
                alpha + (digit - 10)
            };
            value /= base;
        }
    }
}

impl core::fmt::Debug for IntText {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_tuple("IntText")
            .field(&String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}

impl AsRef<[u8]> for IntText {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Signed decimal text, with a leading `-` for negative values.
///
/// Equivalent to the classic `itoa`. `i32::MIN` is handled through its
/// unsigned magnitude.
#[must_use]
pub fn itoa(value: i32) -> IntText {
    let mut text = IntText::empty();
    text.push_digits(u64::from(value.unsigned_abs()), 10, HexCase::Lower);
    if value < 0 {
        text.prepend(b"-");
    }
    text
}

/// Unsigned decimal text.
#[must_use]
pub fn utoa(value: u32) -> IntText {
    let mut text = IntText::empty();
    text.push_digits(u64::from(value), 10, HexCase::Lower);
    text
}

/// Hexadecimal text without a `0x` prefix.
#[must_use]
pub fn xtoa(value: u64, case: HexCase) -> IntText {
    let mut text = IntText::empty();
    text.push_digits(value, 16, case);
    text
}
