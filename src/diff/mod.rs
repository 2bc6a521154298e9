//! Diff processing and parsing utilities.
//!
//! This module turns unified-diff text into structured [`FileDiff`]
//! records and provides helpers for reading diff text from disk or stdin.

pub mod model;
pub mod parser;
pub mod traits;

pub use model::{FileDiff, Hunk, HunkRange, Line, LineKind};
pub use parser::{parse, ParseError};
pub use traits::{DiffFile, Utf8String};
