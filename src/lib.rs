//! scssfmt - Brace-driven re-indenting formatter for SCSS stylesheets
//!
//! Normalizes line-leading whitespace to a depth-based indentation derived
//! from brace nesting. Purely structural: no selector, string, or comment
//! awareness.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod buffer;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod process;

// Re-export commonly used types
pub use buffer::GrowableBuffer;
pub use cli::{build_cli, parse_args, parse_args_from, CliArgs};
pub use config::Config;
pub use error::Result;
pub use process::{reformat_source, FormatStats};
