//! Decoder for Suntech tracker ASCII frames.
//!
//! Frames are `;`-separated fields closed by a carriage return. Decoding is
//! layered: the `lexer` cuts tokens by fixed width or delimiter, `fields`
//! turns one token into one typed value, and `frame` drives a per-type table
//! of field steps and seals the result into a `Message`. The tables for each
//! device family live in `protocols`. Nothing below `report` does I/O.
//!
//! Invariants:
//! - A message's `frame` holds exactly the bytes consumed, up to and
//!   including the token that failed.
//! - Decoding stops at the first failing field; the payload keeps what
//!   decoded before it.
//! - One bad frame never stops the stream; only a missing terminator does.
//!
//! # Examples
//! ```no_run
//! use std::path::Path;
//!
//! use stframe_core::protocols::Family;
//! use stframe_core::{ScanOptions, decode_file};
//!
//! let report = decode_file(Path::new("capture.txt"), Family::St300, ScanOptions::default())?;
//! println!("decoded {} frames", report.summary.frames_total);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod fields;
pub mod frame;
pub mod lexer;
pub mod protocols;
mod report;

pub use frame::{DecodeError, Message, MsgType, Payload, ScanOptions, Scanner, StreamError};
pub use report::{
    DEFAULT_GENERATED_AT, InputInfo, REPORT_VERSION, Report, ReportError, Summary, ToolInfo,
    decode_bytes, decode_file,
};
