//! Brace-driven re-indentation scan.
//!
//! The formatter makes two passes over a file: a measuring pass that
//! computes the exact output size, and a writing pass that fills a buffer
//! sized from that measurement. Both run the same [`scan`], parameterized
//! over an emit sink, so they are identical by construction.
//!
//! The scan replaces every whitespace run that follows a newline (blank
//! lines keep their newline bytes) with `indent * depth` spaces, where
//! depth is the count of unmatched `{` seen so far. A line whose first
//! non-whitespace byte is `}` is indented at the enclosing depth instead.
//!
//! Depth policy for unbalanced input: the running depth is signed and may
//! go negative when `}` outnumbers `{`; the emitted indentation clamps the
//! effective depth at zero.

use crate::buffer::GrowableBuffer;

/// Pre-allocated run of spaces for indent emission.
const SPACES: &[u8; 256] = &[b' '; 256];

/// Byte sink for one scan over the input.
trait Emit {
    fn byte(&mut self, b: u8);
    fn spaces(&mut self, n: usize);
}

/// Measuring sink: counts bytes, writes nothing.
struct ByteCount {
    total: usize,
}

impl Emit for ByteCount {
    fn byte(&mut self, _b: u8) {
        self.total += 1;
    }

    fn spaces(&mut self, n: usize) {
        self.total += n;
    }
}

/// Writing sink: appends into a pre-sized buffer.
///
/// The caller ensures capacity for the measured size up front, so no append
/// here reallocates.
struct BufferWriter<'a> {
    out: &'a mut GrowableBuffer,
}

impl Emit for BufferWriter<'_> {
    fn byte(&mut self, b: u8) {
        self.out.push(b);
    }

    fn spaces(&mut self, mut n: usize) {
        while n > 0 {
            let chunk = n.min(SPACES.len());
            self.out.extend_from_slice(&SPACES[..chunk]);
            n -= chunk;
        }
    }
}

/// Single forward scan over `input`, emitting the reformatted bytes.
///
/// Whitespace before the first newline of the file is left untouched; only
/// runs that follow a newline are replaced. Newlines inside a run are not
/// skipped, so every blank line keeps its newline byte and gets its own
/// indentation.
#[allow(clippy::cast_sign_loss)]
fn scan<E: Emit>(input: &[u8], indent: usize, emit: &mut E) {
    let mut depth: isize = 0;
    let mut i = 0;

    while i < input.len() {
        let b = input[i];
        if b == b'\n' {
            emit.byte(b'\n');
            i += 1;
            while i < input.len() && input[i] != b'\n' && input[i].is_ascii_whitespace() {
                i += 1;
            }
            // A closing brace sits at the depth of the block it closes
            let effective = if input.get(i) == Some(&b'}') {
                depth - 1
            } else {
                depth
            };
            emit.spaces(indent * (effective.max(0) as usize));
        } else {
            if b == b'{' {
                depth += 1;
            }
            if b == b'}' {
                depth -= 1;
            }
            emit.byte(b);
            i += 1;
        }
    }
}

/// Measuring pass: the exact byte count the writing pass will produce.
#[must_use]
pub fn measure(input: &[u8], indent: usize) -> usize {
    let mut count = ByteCount { total: 0 };
    scan(input, indent, &mut count);
    count.total
}

/// Writing pass: append the reformatted bytes to `out`.
///
/// `out` must have capacity ensured for the [`measure`]d size; the pass
/// appends exactly that many bytes and never reallocates.
pub fn write_into(input: &[u8], indent: usize, out: &mut GrowableBuffer) {
    let mut writer = BufferWriter { out };
    scan(input, indent, &mut writer);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reformat(input: &str) -> String {
        let bytes = input.as_bytes();
        let mut out = GrowableBuffer::new();
        out.ensure_capacity(measure(bytes, 2)).unwrap();
        write_into(bytes, 2, &mut out);
        String::from_utf8(out.as_slice().to_vec()).unwrap()
    }

    #[test]
    fn test_no_newlines_no_braces_unchanged() {
        let input = "color: red;";
        assert_eq!(measure(input.as_bytes(), 2), input.len());
        assert_eq!(reformat(input), input);
    }

    #[test]
    fn test_simple_rule() {
        assert_eq!(reformat("a {\n  b;\n}\n"), "a {\n  b;\n}\n");
        assert_eq!(reformat("a {\nb;\n}\n"), "a {\n  b;\n}\n");
    }

    #[test]
    fn test_nested_rules() {
        assert_eq!(
            reformat("a{\nb{\nc:1;\n}\n}\n"),
            "a{\n  b{\n    c:1;\n  }\n}\n"
        );
    }

    #[test]
    fn test_over_indented_input_flattened() {
        assert_eq!(
            reformat("a {\n        color: red;\n      }\n"),
            "a {\n  color: red;\n}\n"
        );
    }

    #[test]
    fn test_tabs_replaced() {
        assert_eq!(reformat("a {\n\t\tb: 1;\n}\n"), "a {\n  b: 1;\n}\n");
    }

    #[test]
    fn test_leading_whitespace_at_file_start_untouched() {
        assert_eq!(reformat("   a { b; }"), "   a { b; }");
    }

    #[test]
    fn test_blank_lines_keep_their_newlines() {
        // Each newline is preserved; the blank line collapses to the
        // indentation for the current depth.
        assert_eq!(reformat("a{\n\nb:1;\n}\n"), "a{\n  \n  b:1;\n}\n");
    }

    #[test]
    fn test_closing_brace_uses_enclosing_depth() {
        assert_eq!(reformat("a{\nb:1;\n}\n"), "a{\n  b:1;\n}\n");
        assert_eq!(reformat("a{\nb{\nc{\nd:1;\n}\n}\n}\n"),
            "a{\n  b{\n    c{\n      d:1;\n    }\n  }\n}\n");
    }

    #[test]
    fn test_measure_equals_written_length() {
        let inputs = [
            "",
            "a",
            "a{\nb{\nc:1;\n}\n}\n",
            "no braces\nat all\n",
            "}\n}\nunbalanced {\n",
            "   \n \t \n",
        ];
        for input in inputs {
            let bytes = input.as_bytes();
            let measured = measure(bytes, 2);
            let mut out = GrowableBuffer::new();
            out.ensure_capacity(measured).unwrap();
            write_into(bytes, 2, &mut out);
            assert_eq!(out.len(), measured, "input: {input:?}");
        }
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "a {\nb;\n}\n",
            "a{\nb{\nc:1;\n}\n}\n",
            "a{\n\n\nb:1;\n}\n",
            "}\nx {\ny;\n}\n",
        ];
        for input in inputs {
            let once = reformat(input);
            let twice = reformat(&once);
            assert_eq!(once, twice, "input: {input:?}");
        }
    }

    #[test]
    fn test_unbalanced_close_clamps_at_zero() {
        // Depth goes negative after the stray closer; indentation clamps
        // at zero and recovers once braces rebalance.
        assert_eq!(reformat("}\na;\nb {\nc;\n}\n"), "}\na;\nb {\nc;\n}\n");
    }

    #[test]
    fn test_depth_tracks_brace_difference() {
        // Four opens, one close: the trailing line sits at depth 3.
        assert_eq!(
            reformat("a{b{c{d{\nx;\n}\ny;\n"),
            "a{b{c{d{\n        x;\n      }\n      y;\n"
        );
    }

    #[test]
    fn test_indent_width_respected() {
        let bytes = b"a{\nb:1;\n}\n";
        let mut out = GrowableBuffer::new();
        out.ensure_capacity(measure(bytes, 4)).unwrap();
        write_into(bytes, 4, &mut out);
        assert_eq!(out.as_slice(), b"a{\n    b:1;\n}\n");
    }

    #[test]
    fn test_crlf_carriage_return_in_run_is_collapsed() {
        // The \r before a newline is ordinary content; the \r after a
        // newline is part of the replaced whitespace run.
        assert_eq!(reformat("a{\r\nb:1;\r\n}\n"), "a{\r\n  b:1;\r\n}\n");
    }
}
