//! File processing pipeline.
//!
//! Orchestrates the two-pass reformatting of one file:
//!
//! **Pass 1 - Measure:**
//! - Scan the input once to compute the exact output byte count
//!
//! **Pass 2 - Write:**
//! - Ensure the output buffer holds exactly that many bytes
//! - Re-run the identical scan, this time copying bytes into the buffer
//!
//! Also provides the pre-sized file read (with short-read detection) and the
//! in-place write-back used by the binary. Every failure here is local to a
//! single file; callers report it and move on to the next file.

pub mod pipeline;

pub use pipeline::{read_file_into, reformat_source, write_back, FormatStats};
