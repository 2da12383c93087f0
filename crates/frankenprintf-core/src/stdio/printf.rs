//! printf formatting engine.
//!
//! Interprets a template of literal bytes and `%` directives against an
//! explicit, typed argument list. Supported directives:
//!
//! ```text
//! %c  one byte            %u  unsigned decimal
//! %s  text                %x  unsigned hex (lowercase)
//! %d  signed decimal      %X  unsigned hex (uppercase)
//! %i  signed decimal      %p  address (0x-prefixed hex)
//! %%  literal '%'
//! ```
//!
//! No flags, widths, precisions or length modifiers are recognized.
//!
//! The template ends at its first NUL byte or at the end of the slice. It is
//! walked once, left to right. Literal bytes go to the sink one at a time;
//! each directive's text goes out in a single write. The returned count is
//! the number of bytes the sink accepted.

use std::io::{self, Write};

use crate::config::{NullStrPolicy, PrintfConfig, UnknownDirectivePolicy};
use crate::error::{PrintfError, PrintfErrorKind};
use crate::stdio::sink::FdSink;
use crate::stdlib::conversion::{HexCase, IntText, itoa, utoa, xtoa};
use crate::string::until_nul;

/// The byte that opens a directive.
pub const TRIGGER: u8 = b'%';

/// Text emitted by `%p` for a null address.
#[cfg(target_vendor = "apple")]
pub const NULL_POINTER_SENTINEL: &[u8] = b"0x0";
/// Text emitted by `%p` for a null address.
#[cfg(not(target_vendor = "apple"))]
pub const NULL_POINTER_SENTINEL: &[u8] = b"(nil)";

// ---------------------------------------------------------------------------
// Directives and argument kinds
// ---------------------------------------------------------------------------

/// A supported conversion, identified by its code byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    Char,     // 'c'
    Str,      // 's'
    Signed,   // 'd', 'i'
    Unsigned, // 'u'
    HexLower, // 'x'
    HexUpper, // 'X'
    Pointer,  // 'p'
}

impl Directive {
    /// Look up the directive for a code byte. `%%` is not a directive.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            b'c' => Some(Self::Char),
            b's' => Some(Self::Str),
            b'd' | b'i' => Some(Self::Signed),
            b'u' => Some(Self::Unsigned),
            b'x' => Some(Self::HexLower),
            b'X' => Some(Self::HexUpper),
            b'p' => Some(Self::Pointer),
            _ => None,
        }
    }

    /// The argument kind this directive consumes.
    #[must_use]
    pub const fn arg_kind(self) -> ArgKind {
        match self {
            Self::Char => ArgKind::Char,
            Self::Str => ArgKind::Str,
            Self::Signed => ArgKind::Int,
            Self::Unsigned | Self::HexLower | Self::HexUpper => ArgKind::Uint,
            Self::Pointer => ArgKind::Pointer,
        }
    }
}

/// Kind of value a [`FormatArg`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgKind {
    Char,
    Str,
    Int,
    Uint,
    Pointer,
}

impl ArgKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Char => "char",
            Self::Str => "string",
            Self::Int => "int",
            Self::Uint => "unsigned int",
            Self::Pointer => "pointer",
        }
    }
}

/// Typed argument value, consumed one per directive in template order.
///
/// A `Str(None)` stands in for a null text pointer; `Pointer(0)` is a null
/// address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg<'a> {
    Char(u8),
    Str(Option<&'a [u8]>),
    Int(i32),
    Uint(u32),
    Pointer(usize),
}

impl FormatArg<'_> {
    /// Address argument from a raw pointer. The pointer is never dereferenced.
    #[must_use]
    pub fn pointer<T: ?Sized>(ptr: *const T) -> Self {
        Self::Pointer(ptr.cast::<()>().addr())
    }

    #[must_use]
    pub const fn kind(&self) -> ArgKind {
        match self {
            Self::Char(_) => ArgKind::Char,
            Self::Str(_) => ArgKind::Str,
            Self::Int(_) => ArgKind::Int,
            Self::Uint(_) => ArgKind::Uint,
            Self::Pointer(_) => ArgKind::Pointer,
        }
    }
}

impl From<u8> for FormatArg<'_> {
    fn from(c: u8) -> Self {
        Self::Char(c)
    }
}

impl From<i32> for FormatArg<'_> {
    fn from(n: i32) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for FormatArg<'_> {
    fn from(n: u32) -> Self {
        Self::Uint(n)
    }
}

impl<'a> From<&'a [u8]> for FormatArg<'a> {
    fn from(s: &'a [u8]) -> Self {
        Self::Str(Some(s))
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(s: &'a str) -> Self {
        Self::Str(Some(s.as_bytes()))
    }
}

impl<'a> From<Option<&'a [u8]>> for FormatArg<'a> {
    fn from(s: Option<&'a [u8]>) -> Self {
        Self::Str(s)
    }
}

impl<'a> From<Option<&'a str>> for FormatArg<'a> {
    fn from(s: Option<&'a str>) -> Self {
        Self::Str(s.map(str::as_bytes))
    }
}

// ---------------------------------------------------------------------------
// Scanner
// ---------------------------------------------------------------------------

/// One step of the template walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// A literal byte to emit verbatim.
    Literal(u8),
    /// A `%%` escape (emit a single '%').
    Percent,
    /// A supported directive; `code` is the byte that selected it.
    Directive {
        directive: Directive,
        code: u8,
        offset: usize,
    },
    /// `%` followed by a code byte outside the supported set.
    Unsupported { code: u8, offset: usize },
    /// `%` as the final template byte.
    Dangling { offset: usize },
}

/// Single-pass, non-backtracking tokenizer over a template.
#[derive(Debug, Clone)]
pub struct Scanner<'t> {
    template: &'t [u8],
    pos: usize,
}

impl<'t> Scanner<'t> {
    /// Scan `template` up to its first NUL (or its end).
    #[must_use]
    pub fn new(template: &'t [u8]) -> Self {
        Self {
            template: until_nul(template),
            pos: 0,
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let len = self.template.len();
        let byte = *self.template.get(self.pos)?;
        if byte != TRIGGER {
            self.pos += 1;
            return Some(Token::Literal(byte));
        }

        let offset = self.pos;
        if offset + 1 >= len {
            self.pos = len;
            return Some(Token::Dangling { offset });
        }
        let code = self.template[offset + 1];
        self.pos += 2;

        if code == TRIGGER {
            return Some(Token::Percent);
        }
        Some(match Directive::from_code(code) {
            Some(directive) => Token::Directive {
                directive,
                code,
                offset,
            },
            None => Token::Unsupported { code, offset },
        })
    }
}

/// Number of arguments `template` will consume.
#[must_use]
pub fn count_directives(template: &[u8]) -> usize {
    Scanner::new(template)
        .filter(|t| matches!(t, Token::Directive { .. }))
        .count()
}

// ---------------------------------------------------------------------------
// Renderers
// ---------------------------------------------------------------------------

/// Text produced by one directive formatter.
#[derive(Debug, Clone, Copy)]
pub enum Rendered<'a> {
    Byte(u8),
    Text(&'a [u8]),
    Number(IntText),
}

impl Rendered<'_> {
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Byte(b) => core::slice::from_ref(b),
            Self::Text(s) => s,
            Self::Number(n) => n.as_bytes(),
        }
    }
}

/// `%c`: exactly one byte, NUL included.
#[must_use]
pub fn format_char(c: u8) -> Rendered<'static> {
    Rendered::Byte(c)
}

/// `%s`: the text up to its first NUL; a null argument follows `policy`.
#[must_use]
pub fn format_str(s: Option<&[u8]>, policy: NullStrPolicy) -> Rendered<'_> {
    match s {
        Some(s) => Rendered::Text(until_nul(s)),
        None => Rendered::Text(policy.text()),
    }
}

/// `%d` / `%i`.
#[must_use]
pub fn format_signed(value: i32) -> Rendered<'static> {
    Rendered::Number(itoa(value))
}

/// `%u`.
#[must_use]
pub fn format_unsigned(value: u32) -> Rendered<'static> {
    Rendered::Number(utoa(value))
}

/// `%x` / `%X`.
#[must_use]
pub fn format_hex(value: u32, case: HexCase) -> Rendered<'static> {
    Rendered::Number(xtoa(u64::from(value), case))
}

/// `%p`: `0x` followed by lowercase hex, or the null sentinel.
#[must_use]
pub fn format_pointer(addr: usize) -> Rendered<'static> {
    if addr == 0 {
        return Rendered::Text(NULL_POINTER_SENTINEL);
    }
    let mut text = xtoa(addr as u64, HexCase::Lower);
    text.prepend(b"0x");
    Rendered::Number(text)
}

/// Run the formatter for `directive` on `arg`.
///
/// Returns `Err(found)` with the argument's kind when it does not match the
/// kind the directive consumes.
pub fn render_directive<'a>(
    directive: Directive,
    arg: FormatArg<'a>,
    config: &PrintfConfig,
) -> Result<Rendered<'a>, ArgKind> {
    match (directive, arg) {
        (Directive::Char, FormatArg::Char(c)) => Ok(format_char(c)),
        (Directive::Str, FormatArg::Str(s)) => Ok(format_str(s, config.null_str)),
        (Directive::Signed, FormatArg::Int(n)) => Ok(format_signed(n)),
        (Directive::Unsigned, FormatArg::Uint(n)) => Ok(format_unsigned(n)),
        (Directive::HexLower, FormatArg::Uint(n)) => Ok(format_hex(n, HexCase::Lower)),
        (Directive::HexUpper, FormatArg::Uint(n)) => Ok(format_hex(n, HexCase::Upper)),
        (Directive::Pointer, FormatArg::Pointer(addr)) => Ok(format_pointer(addr)),
        (_, other) => Err(other.kind()),
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Length accumulator bound to a sink for the duration of one call.
struct Written<'w, W: Write + ?Sized> {
    sink: &'w mut W,
    count: usize,
}

impl<W: Write + ?Sized> Written<'_, W> {
    fn emit(&mut self, bytes: &[u8]) -> Result<(), PrintfError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let mut rest = bytes;
        while !rest.is_empty() {
            match self.sink.write(rest) {
                Ok(0) => {
                    return Err(self.fail(io::Error::from(io::ErrorKind::WriteZero).into()));
                }
                Ok(n) => {
                    // Short writes count as they land.
                    self.count += n;
                    rest = &rest[n..];
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(self.fail(e.into())),
            }
        }
        Ok(())
    }

    fn fail(&self, kind: PrintfErrorKind) -> PrintfError {
        PrintfError::new(self.count, kind)
    }
}

/// Format `template` with `args` into `sink`.
///
/// Returns the number of bytes written. Arguments beyond those the template
/// consumes are ignored. On error the scan stops; bytes already written stay
/// written and are reported in [`PrintfError::written`].
pub fn format_to<W: Write + ?Sized>(
    sink: &mut W,
    template: &[u8],
    args: &[FormatArg<'_>],
    config: &PrintfConfig,
) -> Result<usize, PrintfError> {
    let mut out = Written { sink, count: 0 };
    let mut next_arg = 0;

    for token in Scanner::new(template) {
        match token {
            Token::Literal(b) => out.emit(&[b])?,
            Token::Percent => out.emit(&[TRIGGER])?,
            Token::Directive {
                directive, code, ..
            } => {
                let index = next_arg;
                let Some(&arg) = args.get(index) else {
                    return Err(out.fail(PrintfErrorKind::MissingArgument {
                        index,
                        directive: code as char,
                    }));
                };
                next_arg += 1;
                let rendered = render_directive(directive, arg, config).map_err(|found| {
                    out.fail(PrintfErrorKind::ArgumentMismatch {
                        index,
                        directive: code as char,
                        expected: directive.arg_kind().name(),
                        found: found.name(),
                    })
                })?;
                out.emit(rendered.as_bytes())?;
            }
            Token::Unsupported { code, offset } => match config.unknown_directive {
                UnknownDirectivePolicy::Drop => {}
                UnknownDirectivePolicy::Echo => out.emit(&[TRIGGER, code])?,
                UnknownDirectivePolicy::Reject => {
                    return Err(out.fail(PrintfErrorKind::UnsupportedDirective { code, offset }));
                }
            },
            Token::Dangling { offset } => match config.unknown_directive {
                UnknownDirectivePolicy::Drop => {}
                UnknownDirectivePolicy::Echo => out.emit(&[TRIGGER])?,
                UnknownDirectivePolicy::Reject => {
                    return Err(out.fail(PrintfErrorKind::DanglingTrigger { offset }));
                }
            },
        }
    }

    Ok(out.count)
}

/// Format into a fresh buffer.
pub fn render(
    template: &[u8],
    args: &[FormatArg<'_>],
    config: &PrintfConfig,
) -> Result<Vec<u8>, PrintfError> {
    let mut buf = Vec::with_capacity(template.len());
    format_to(&mut buf, template, args, config)?;
    Ok(buf)
}

/// Format to standard output (unbuffered) under the process-wide config.
pub fn printf(template: &[u8], args: &[FormatArg<'_>]) -> Result<usize, PrintfError> {
    format_to(
        &mut FdSink::stdout(),
        template,
        args,
        &PrintfConfig::global(),
    )
}

#[doc(hidden)]
pub fn template_bytes<T: AsRef<[u8]> + ?Sized>(template: &T) -> &[u8] {
    template.as_ref()
}

/// `printf!(template, args...)`: build the argument list with
/// `FormatArg::from` and call [`printf`].
///
/// ```no_run
/// frankenprintf_core::printf!("%s is %d\n", "answer", 42i32).unwrap();
/// ```
#[macro_export]
macro_rules! printf {
    ($template:expr $(, $arg:expr)* $(,)?) => {
        $crate::stdio::printf::printf(
            $crate::stdio::printf::template_bytes(&$template),
            &[$($crate::stdio::printf::FormatArg::from($arg)),*],
        )
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
