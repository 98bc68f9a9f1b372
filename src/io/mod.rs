//! I/O module
//!
//! Handles the fixed-width upload file format.
//!
//! # Components
//!
//! - `line_format` - fixed-width line parsing, encoding, and whole-file
//!   parsing with per-line failure recovery

pub mod line_format;

pub use line_format::{encode_line, parse_content, parse_line, ParsedFile, LINE_WIDTH};
