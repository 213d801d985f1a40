//! Measure-then-write orchestration and per-file I/O.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};

use crate::buffer::GrowableBuffer;
use crate::error::Result;
use crate::format::{measure, write_into};

/// Before/after byte counts for one reformatted file.
#[derive(Debug, Clone, Copy)]
pub struct FormatStats {
    /// Size of the original contents
    pub bytes_in: usize,
    /// Size of the reformatted output
    pub bytes_out: usize,
}

impl fmt::Display for FormatStats {
    /// Renders as `N -> M, +D bytes`, matching the per-file diagnostic line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        #[allow(clippy::cast_possible_wrap)]
        let delta = self.bytes_out as i64 - self.bytes_in as i64;
        write!(f, "{} -> {}, {:+} bytes", self.bytes_in, self.bytes_out, delta)
    }
}

/// Reformat one file's contents into a freshly sized output buffer.
///
/// Runs the measuring pass, sizes the buffer to exactly the measured count,
/// then runs the writing pass. The output is independent of the input's
/// storage; nothing is mutated in place.
pub fn reformat_source(input: &[u8], indent: usize) -> Result<(GrowableBuffer, FormatStats)> {
    let measured = measure(input, indent);

    let mut out = GrowableBuffer::new();
    out.ensure_capacity(measured)
        .context("sizing output buffer")?;
    write_into(input, indent, &mut out);
    debug_assert_eq!(out.len(), measured, "writing pass diverged from measure");

    let stats = FormatStats {
        bytes_in: input.len(),
        bytes_out: measured,
    };
    Ok((out, stats))
}

/// Read a file whose size is known up front into a pre-sized buffer.
///
/// The buffer is cleared, grown once to `expected` bytes, and filled with a
/// read loop. Reading fewer bytes than expected (the file changed size
/// concurrently, or an I/O error truncated the read) is an error; the caller
/// skips the file and continues.
pub fn read_file_into(path: &Path, buf: &mut GrowableBuffer, expected: usize) -> Result<()> {
    buf.clear();
    buf.ensure_capacity(expected)
        .with_context(|| format!("preparing read buffer for {}", path.display()))?;
    buf.grow_zeroed(expected);

    let mut file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let mut filled = 0;
    while filled < expected {
        let n = file
            .read(&mut buf.as_mut_slice()[filled..])
            .with_context(|| format!("reading {}", path.display()))?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);

    if filled != expected {
        bail!(
            "short read on {}: got {filled} of {expected} bytes",
            path.display()
        );
    }
    Ok(())
}

/// Persist the reformatted output, replacing the original file's contents.
///
/// Not atomic: a failure partway through may leave the file truncated.
pub fn write_back(path: &Path, output: &GrowableBuffer) -> Result<()> {
    std::fs::write(path, output.as_slice())
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reformat_source_stats() {
        let input = b"a {\nb;\n}\n";
        let (out, stats) = reformat_source(input, 2).unwrap();
        assert_eq!(out.as_slice(), b"a {\n  b;\n}\n");
        assert_eq!(stats.bytes_in, input.len());
        assert_eq!(stats.bytes_out, out.len());
    }

    #[test]
    fn test_stats_display() {
        let grew = FormatStats {
            bytes_in: 10,
            bytes_out: 14,
        };
        assert_eq!(grew.to_string(), "10 -> 14, +4 bytes");

        let shrank = FormatStats {
            bytes_in: 20,
            bytes_out: 15,
        };
        assert_eq!(shrank.to_string(), "20 -> 15, -5 bytes");
    }

    #[test]
    fn test_empty_input() {
        let (out, stats) = reformat_source(b"", 2).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats.bytes_out, 0);
    }

    #[test]
    fn test_writing_pass_does_not_grow_buffer() {
        let input = b"a{\nb{\nc:1;\n}\n}\n";
        let (out, stats) = reformat_source(input, 2).unwrap();
        // Exact fill: length equals the measured count and stays within the
        // single up-front allocation.
        assert_eq!(out.len(), stats.bytes_out);
        assert!(out.len() <= out.capacity());
    }
}
