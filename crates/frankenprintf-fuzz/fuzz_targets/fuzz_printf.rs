#![no_main]
use frankenprintf_core::stdio::printf::{ArgKind, Scanner, Token};
use frankenprintf_core::{
    FormatArg, NullStrPolicy, PrintfConfig, PrintfErrorKind, UnknownDirectivePolicy, format_to,
};
use libfuzzer_sys::fuzz_target;

fn word(bytes: &[u8], i: usize) -> u32 {
    let mut le = [0u8; 4];
    for (k, slot) in le.iter_mut().enumerate() {
        *slot = bytes.get(i * 4 + k).copied().unwrap_or(0);
    }
    u32::from_le_bytes(le)
}

fuzz_target!(|data: &[u8]| {
    // [policy byte][split byte][template ...][argument words ...]
    if data.len() < 2 {
        return;
    }
    let policy = data[0];
    let body = &data[2..];
    let split = (data[1] as usize).min(body.len());
    let (template, arg_bytes) = body.split_at(split);

    let config = PrintfConfig::default()
        .with_unknown_directive(match policy % 3 {
            0 => UnknownDirectivePolicy::Drop,
            1 => UnknownDirectivePolicy::Echo,
            _ => UnknownDirectivePolicy::Reject,
        })
        .with_null_str(if policy & 0x80 == 0 {
            NullStrPolicy::Placeholder
        } else {
            NullStrPolicy::Omit
        });

    // One well-typed argument per directive. An even word makes `%s` null.
    let args: Vec<FormatArg<'_>> = Scanner::new(template)
        .filter_map(|t| match t {
            Token::Directive { directive, .. } => Some(directive.arg_kind()),
            _ => None,
        })
        .enumerate()
        .map(|(i, kind)| {
            let w = word(arg_bytes, i);
            match kind {
                ArgKind::Char => FormatArg::Char(w as u8),
                ArgKind::Str if w & 1 == 0 => FormatArg::Str(None),
                ArgKind::Str => FormatArg::Str(Some(arg_bytes)),
                ArgKind::Int => FormatArg::Int(w as i32),
                ArgKind::Uint => FormatArg::Uint(w),
                ArgKind::Pointer => FormatArg::Pointer(w as usize),
            }
        })
        .collect();

    let mut out = Vec::new();
    match format_to(&mut out, template, &args, &config) {
        Ok(n) => assert_eq!(n, out.len()),
        Err(err) => {
            assert_eq!(err.written, out.len());
            assert!(matches!(
                err.kind,
                PrintfErrorKind::UnsupportedDirective { .. } | PrintfErrorKind::DanglingTrigger { .. }
            ));
            assert_eq!(config.unknown_directive, UnknownDirectivePolicy::Reject);
        }
    }

    // Missing trailing arguments must fail cleanly, never panic.
    if let Some((_, fewer)) = args.split_last() {
        let mut out = Vec::new();
        if let Err(err) = format_to(&mut out, template, fewer, &config) {
            assert_eq!(err.written, out.len());
        }
    }
});
