//! Shared workloads for the frankenprintf benchmarks.

use frankenprintf_core::FormatArg;

/// A template of `len` literal bytes with no directives.
#[must_use]
pub fn literal_template(len: usize) -> Vec<u8> {
    (0..len).map(|i| b'a' + (i % 26) as u8).collect()
}

/// A template repeating one record of every directive `records` times.
#[must_use]
pub fn mixed_workload(records: usize) -> (Vec<u8>, Vec<FormatArg<'static>>) {
    const RECORD: &[u8] = b"[%c] %s=%d/%u 0x%x %X %p %%\n";
    let mut template = Vec::with_capacity(RECORD.len() * records);
    let mut args = Vec::with_capacity(7 * records);
    for i in 0..records {
        let n = i as u32;
        template.extend_from_slice(RECORD);
        args.extend([
            FormatArg::Char(b'A' + (i % 26) as u8),
            FormatArg::Str(Some(b"field")),
            FormatArg::Int(-(n as i32) * 7919),
            FormatArg::Uint(n.wrapping_mul(2_654_435_761)),
            FormatArg::Uint(n << 8),
            FormatArg::Uint(!n),
            FormatArg::Pointer(0x7f00_0000 + i * 16),
        ]);
    }
    (template, args)
}
