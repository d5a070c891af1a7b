use thiserror::Error;

use super::message::MsgType;
use crate::fields::{FieldError, FieldId};

/// Why decoding of a single frame stopped early.
///
/// A message carrying one of these is still yielded; scanning continues with
/// the next frame.
///
/// # Examples
/// ```
/// use stframe_core::fields::{FieldError, FieldId};
/// use stframe_core::frame::DecodeError;
///
/// let err = DecodeError::from(FieldError::Separator { field: FieldId::SwVer });
/// assert_eq!(err.field(), Some(FieldId::SwVer));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Field(#[from] FieldError),
    #[error("unknown header {header:?}")]
    UnknownHeader { header: String },
    #[error("no decoder registered for {msg_type} frames")]
    Unsupported { msg_type: MsgType },
    #[error("{count} unexpected bytes after the last field")]
    TrailingData { count: usize },
}

impl DecodeError {
    pub fn field(&self) -> Option<FieldId> {
        match self {
            DecodeError::Field(err) => Some(err.field()),
            DecodeError::UnknownHeader { .. } | DecodeError::Unsupported { .. } => {
                Some(FieldId::Header)
            }
            DecodeError::TrailingData { .. } => None,
        }
    }
}

/// Terminal error for a whole buffer; no further messages follow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    #[error("truncated frame at offset {offset}: {remaining} bytes without a terminator")]
    TruncatedFrame { offset: usize, remaining: usize },
    #[error("frame at offset {offset} exceeds {max_len} bytes without a terminator")]
    FrameTooLong { offset: usize, max_len: usize },
}
