//! Frame-level dispatch.
//!
//! `Registry` holds the per-message-type decoder tables and seals one frame
//! into a `Message`; `Scanner` walks a buffer frame by frame. The frame
//! state machine is header, then fields in table order, then sealed: the
//! first field error stops decoding and becomes the message's error, and
//! `Message::frame` holds exactly the bytes consumed up to that point.

pub mod error;
pub mod message;
pub mod registry;
pub mod report;
pub mod scanner;

pub use error::{DecodeError, StreamError};
pub use message::{Message, MsgType};
pub use registry::{FieldStep, FrameCursor, Pipeline, Registry, ReportDecoder};
pub use report::{
    AlertReport, AliveReport, CellInfo, CellTower, CommonReport, EmergencyReport, EventReport,
    Payload, StatusReport, UnitStatus,
};
pub use scanner::{DEFAULT_MAX_FRAME_LEN, ScanOptions, Scanner, parse_bytes};
