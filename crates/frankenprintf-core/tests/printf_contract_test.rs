use std::io::{self, Write};

use frankenprintf_core::stdio::printf::{NULL_POINTER_SENTINEL, count_directives};
use frankenprintf_core::{
    FormatArg, NullStrPolicy, PrintfConfig, PrintfErrorKind, UnknownDirectivePolicy, format_to,
    printf, render,
};

struct Case {
    template: &'static [u8],
    args: Vec<FormatArg<'static>>,
    expected: &'static [u8],
}

fn run(template: &[u8], args: &[FormatArg<'_>]) -> (Vec<u8>, usize) {
    let mut out = Vec::new();
    let n = format_to(&mut out, template, args, &PrintfConfig::default()).unwrap();
    (out, n)
}

fn contract_cases() -> Vec<Case> {
    vec![
        Case {
            template: b"%d",
            args: vec![FormatArg::Int(42)],
            expected: b"42",
        },
        Case {
            template: b"%d",
            args: vec![FormatArg::Int(-17)],
            expected: b"-17",
        },
        Case {
            template: b"%i",
            args: vec![FormatArg::Int(0)],
            expected: b"0",
        },
        Case {
            template: b"%x",
            args: vec![FormatArg::Uint(255)],
            expected: b"ff",
        },
        Case {
            template: b"%X",
            args: vec![FormatArg::Uint(255)],
            expected: b"FF",
        },
        Case {
            template: b"%u",
            args: vec![FormatArg::Uint(u32::MAX)],
            expected: b"4294967295",
        },
        Case {
            template: b"%%",
            args: vec![],
            expected: b"%",
        },
        Case {
            template: b"%q",
            args: vec![FormatArg::Int(1)],
            expected: b"",
        },
        Case {
            template: b"%c%c",
            args: vec![FormatArg::Char(b'o'), FormatArg::Char(b'k')],
            expected: b"ok",
        },
        Case {
            template: b"<%s>",
            args: vec![FormatArg::Str(Some(b"text"))],
            expected: b"<text>",
        },
        Case {
            template: b"<%s>",
            args: vec![FormatArg::Str(Some(b""))],
            expected: b"<>",
        },
        Case {
            template: b"%s",
            args: vec![FormatArg::Str(None)],
            expected: b"(null)",
        },
        Case {
            template: b"%p",
            args: vec![FormatArg::Pointer(0x1000)],
            expected: b"0x1000",
        },
        Case {
            template: b"%d%%",
            args: vec![FormatArg::Int(100)],
            expected: b"100%",
        },
        Case {
            template: b"trailing %",
            args: vec![],
            expected: b"trailing ",
        },
    ]
}

#[test]
fn contract_matrix() {
    for case in contract_cases() {
        let (out, n) = run(case.template, &case.args);
        assert_eq!(
            out,
            case.expected,
            "template {:?}",
            String::from_utf8_lossy(case.template)
        );
        assert_eq!(n, case.expected.len(), "count for {:?}", case.template);
    }
}

#[test]
fn literal_only_template_is_echoed() {
    let templates: [&[u8]; 4] = [b"", b"hello", b"line one\nline two\n", "caf\u{e9}".as_bytes()];
    for template in templates {
        let (out, n) = run(template, &[]);
        assert_eq!(out, template);
        assert_eq!(n, template.len());
    }
}

#[test]
fn null_pointer_renders_sentinel() {
    let (out, n) = run(b"%p", &[FormatArg::Pointer(0)]);
    assert_eq!(out, NULL_POINTER_SENTINEL);
    assert_eq!(n, NULL_POINTER_SENTINEL.len());
    #[cfg(not(target_vendor = "apple"))]
    assert_eq!(out, b"(nil)");
}

#[test]
fn unsupported_directive_does_not_consume_argument() {
    let (out, n) = run(b"%q%d", &[FormatArg::Int(7)]);
    assert_eq!(out, b"7");
    assert_eq!(n, 1);

    let (out, _) = run(
        b"%s %y %d",
        &[FormatArg::from("a"), FormatArg::Int(2)],
    );
    assert_eq!(out, b"a  2");
}

#[test]
fn arguments_are_consumed_in_directive_order() {
    let args = [FormatArg::Int(1), FormatArg::Int(2), FormatArg::Int(3)];
    assert_eq!(run(b"%d-%d-%d", &args).0, b"1-2-3");
    let args = [FormatArg::from("x"), FormatArg::Int(9)];
    assert_eq!(run(b"%s=%d", &args).0, b"x=9");
    let args = [FormatArg::Int(9), FormatArg::from("x")];
    assert_eq!(run(b"%d=%s", &args).0, b"9=x");
}

#[test]
fn repeated_calls_are_identical() {
    let args = [
        FormatArg::Char(b'#'),
        FormatArg::from("id"),
        FormatArg::Int(-300),
        FormatArg::Uint(48879),
        FormatArg::Pointer(0xabc),
    ];
    let template = b"%c %s %d %X %p %q %%";
    let first = run(template, &args);
    let second = run(template, &args);
    assert_eq!(first, second);
    assert_eq!(first.0, b"# id -300 BEEF 0xabc  %");
}

#[test]
fn extra_arguments_are_ignored() {
    let (out, n) = run(b"%d", &[FormatArg::Int(1), FormatArg::Int(2)]);
    assert_eq!(out, b"1");
    assert_eq!(n, 1);
}

#[test]
fn kind_mismatch_fails_fast() {
    let err = render(b"ok %d!", &[FormatArg::Uint(3)], &PrintfConfig::default()).unwrap_err();
    assert_eq!(err.written, 3);
    match err.kind {
        PrintfErrorKind::ArgumentMismatch {
            index,
            directive,
            expected,
            found,
        } => {
            assert_eq!(index, 0);
            assert_eq!(directive, 'd');
            assert_eq!(expected, "int");
            assert_eq!(found, "unsigned int");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn missing_argument_reports_position() {
    let err = render(b"%d %d", &[FormatArg::Int(5)], &PrintfConfig::default()).unwrap_err();
    assert_eq!(err.written, 2);
    assert!(matches!(
        err.kind,
        PrintfErrorKind::MissingArgument {
            index: 1,
            directive: 'd'
        }
    ));
    assert_eq!(err.kind_name(), "missing_argument");
}

#[test]
fn policies_are_substitutable() {
    let echo = PrintfConfig::default().with_unknown_directive(UnknownDirectivePolicy::Echo);
    assert_eq!(render(b"a%qb", &[], &echo).unwrap(), b"a%qb");
    assert_eq!(render(b"a%", &[], &echo).unwrap(), b"a%");

    let strict = PrintfConfig::strict();
    assert_eq!(render(b"a%qb", &[], &strict).unwrap_err().kind_name(), "unsupported_directive");
    assert_eq!(render(b"a%", &[], &strict).unwrap_err().kind_name(), "dangling_trigger");
    // Supported directives behave the same under every policy.
    assert_eq!(render(b"%d%%", &[FormatArg::Int(1)], &strict).unwrap(), b"1%");

    let omit = PrintfConfig::default().with_null_str(NullStrPolicy::Omit);
    assert_eq!(render(b"[%s]", &[FormatArg::Str(None)], &omit).unwrap(), b"[]");
}

#[test]
fn template_ends_at_nul() {
    let (out, n) = run(b"abc\0%d", &[]);
    assert_eq!(out, b"abc");
    assert_eq!(n, 3);
    assert_eq!(count_directives(b"%d\0%d"), 1);
}

/// Accepts `limit` bytes, then fails every write.
struct FailingSink {
    accepted: Vec<u8>,
    limit: usize,
}

impl Write for FailingSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.accepted.len() + buf.len() > self.limit {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        self.accepted.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn sink_failure_aborts_with_accumulated_count() {
    let mut sink = FailingSink {
        accepted: Vec::new(),
        limit: 4,
    };
    let err = format_to(
        &mut sink,
        b"ab %d tail",
        &[FormatArg::Int(12345)],
        &PrintfConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.written, 3);
    assert_eq!(sink.accepted, b"ab ");
    assert!(matches!(err.kind, PrintfErrorKind::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
}

/// Accepts at most `budget` bytes in total, short-writing the chunk that
/// crosses it, then fails every write. `interrupt_first` injects one EINTR.
struct ShortWriteSink {
    accepted: Vec<u8>,
    budget: usize,
    interrupt_first: bool,
}

impl Write for ShortWriteSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if std::mem::take(&mut self.interrupt_first) {
            return Err(io::Error::from(io::ErrorKind::Interrupted));
        }
        let room = self.budget - self.accepted.len();
        if room == 0 {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
        }
        let n = room.min(buf.len());
        self.accepted.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn short_write_then_failure_counts_partial_directive_text() {
    let mut sink = ShortWriteSink {
        accepted: Vec::new(),
        budget: 5,
        interrupt_first: false,
    };
    let err = format_to(
        &mut sink,
        b"ab %d",
        &[FormatArg::Int(12345)],
        &PrintfConfig::default(),
    )
    .unwrap_err();
    assert_eq!(sink.accepted, b"ab 12");
    assert_eq!(err.written, sink.accepted.len());
    assert!(matches!(err.kind, PrintfErrorKind::Io(ref e) if e.kind() == io::ErrorKind::BrokenPipe));
}

#[test]
fn interrupted_write_is_retried() {
    let mut sink = ShortWriteSink {
        accepted: Vec::new(),
        budget: 64,
        interrupt_first: true,
    };
    let n = format_to(&mut sink, b"x=%d", &[FormatArg::Int(-9)], &PrintfConfig::default()).unwrap();
    assert_eq!(sink.accepted, b"x=-9");
    assert_eq!(n, 4);
}

/// Reports success without taking any bytes.
struct ZeroSink;

impl Write for ZeroSink {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Ok(0)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn zero_length_write_is_an_error() {
    let err = format_to(&mut ZeroSink, b"a", &[], &PrintfConfig::default()).unwrap_err();
    assert_eq!(err.written, 0);
    assert!(matches!(err.kind, PrintfErrorKind::Io(ref e) if e.kind() == io::ErrorKind::WriteZero));
}

#[test]
fn from_conversions_build_arguments() {
    let value = 5u8;
    let args = [
        FormatArg::from(b'z'),
        FormatArg::from(-1i32),
        FormatArg::from(1u32),
        FormatArg::from(None::<&str>),
        FormatArg::pointer(&value as *const u8),
    ];
    let out = render(b"%c %d %u %s", &args, &PrintfConfig::default()).unwrap();
    assert_eq!(out, b"z -1 1 (null)");
}

#[test]
fn stdout_entry_points_use_the_engine() {
    // None of these calls emits a byte.
    assert_eq!(printf(b"%s", &[FormatArg::Str(Some(b""))]).unwrap(), 0);
    assert_eq!(printf(b"\0ignored", &[]).unwrap(), 0);

    let err = frankenprintf_core::printf!("%d", "not a number").unwrap_err();
    assert_eq!(err.written, 0);
    assert_eq!(err.kind_name(), "argument_mismatch");

    let err = frankenprintf_core::printf!(b"%u").unwrap_err();
    assert_eq!(err.kind_name(), "missing_argument");
}
