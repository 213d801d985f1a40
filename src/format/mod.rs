//! Stylesheet re-indentation.
//!
//! This module contains the core formatting logic:
//! - [`reformat`]: the brace-depth scan, in a measuring and a writing flavor
//!
//! The scan is shared between the two flavors so the measured size and the
//! written size cannot diverge.

pub mod reformat;

pub use reformat::{measure, write_into};
