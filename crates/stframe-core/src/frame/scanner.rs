use std::iter::FusedIterator;

use tracing::{trace, warn};

use super::error::StreamError;
use super::message::Message;
use super::registry::Registry;
use crate::fields::layout::END_OF_FRAME;

pub const DEFAULT_MAX_FRAME_LEN: usize = 1024;

/// Stream-level scanning limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Longest frame accepted, terminator included.
    pub max_frame_len: usize,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            max_frame_len: DEFAULT_MAX_FRAME_LEN,
        }
    }
}

/// Single-pass sequence of sealed messages over a buffer of frames.
///
/// Each pull decodes exactly one terminator-delimited frame. A bad frame
/// still yields a message (with its error set); only a stream-level problem
/// ends the sequence early, and it is then available from [`Scanner::error`].
///
/// # Examples
/// ```
/// use stframe_core::protocols::Family;
/// use stframe_core::frame::Scanner;
///
/// let registry = Family::St300.registry();
/// let mut scanner = Scanner::new(b"ST300ALV;205951725\rST300ALV;205951726\r", &registry);
/// assert_eq!(scanner.by_ref().count(), 2);
/// assert!(scanner.error().is_none());
/// ```
pub struct Scanner<'a> {
    buf: &'a [u8],
    offset: usize,
    registry: &'a Registry,
    options: ScanOptions,
    error: Option<StreamError>,
    done: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(buf: &'a [u8], registry: &'a Registry) -> Self {
        Self::with_options(buf, registry, ScanOptions::default())
    }

    pub fn with_options(buf: &'a [u8], registry: &'a Registry, options: ScanOptions) -> Self {
        Self {
            buf,
            offset: 0,
            registry,
            options,
            error: None,
            done: false,
        }
    }

    /// Stream-level error that ended the sequence, if any.
    pub fn error(&self) -> Option<&StreamError> {
        self.error.as_ref()
    }

    /// Byte offset of the next frame.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn next_frame(&mut self) -> Option<&'a [u8]> {
        if self.done {
            return None;
        }
        let rest = &self.buf[self.offset..];
        if rest.is_empty() {
            self.done = true;
            return None;
        }
        let window = &rest[..rest.len().min(self.options.max_frame_len)];
        match window.iter().position(|b| *b == END_OF_FRAME) {
            Some(end) => {
                let frame = &rest[..=end];
                trace!(offset = self.offset, len = frame.len(), "frame boundary");
                self.offset += frame.len();
                Some(frame)
            }
            None => {
                let error = if rest.len() > self.options.max_frame_len {
                    StreamError::FrameTooLong {
                        offset: self.offset,
                        max_len: self.options.max_frame_len,
                    }
                } else {
                    StreamError::TruncatedFrame {
                        offset: self.offset,
                        remaining: rest.len(),
                    }
                };
                warn!(error = %error, "stopping frame scan");
                self.error = Some(error);
                self.done = true;
                None
            }
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Message;

    fn next(&mut self) -> Option<Message> {
        let frame = self.next_frame()?;
        Some(self.registry.decode_frame(frame))
    }
}

impl FusedIterator for Scanner<'_> {}

/// Start scanning `buf` with default options.
pub fn parse_bytes<'a>(buf: &'a [u8], registry: &'a Registry) -> Scanner<'a> {
    Scanner::new(buf, registry)
}

#[cfg(test)]
mod tests {
    use super::{ScanOptions, Scanner, parse_bytes};
    use crate::frame::{MsgType, StreamError};
    use crate::protocols::Family;

    const ALIVE: &[u8] = b"ST300ALV;205951725\r";

    #[test]
    fn empty_buffer_yields_nothing() {
        let registry = Family::St300.registry();
        let mut scanner = parse_bytes(b"", &registry);
        assert!(scanner.next().is_none());
        assert!(scanner.error().is_none());
    }

    #[test]
    fn bad_frame_does_not_stop_the_stream() {
        let registry = Family::St300.registry();
        let mut buf = b"ST300ALV;20595172x\r".to_vec();
        buf.extend_from_slice(ALIVE);
        let messages: Vec<_> = parse_bytes(&buf, &registry).collect();
        assert_eq!(messages.len(), 2);
        assert!(!messages[0].is_ok());
        assert!(messages[1].is_ok());
        assert_eq!(messages[1].frame, ALIVE);
    }

    #[test]
    fn unknown_header_skips_to_next_terminator() {
        let registry = Family::St300.registry();
        let mut buf = b"XX999ABC;whatever;1;2;3\r".to_vec();
        buf.extend_from_slice(ALIVE);
        let messages: Vec<_> = parse_bytes(&buf, &registry).collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].msg_type, MsgType::Unknown);
        assert_eq!(messages[1].msg_type, MsgType::Alive);
    }

    #[test]
    fn truncated_tail_is_stream_error() {
        let registry = Family::St300.registry();
        let mut buf = ALIVE.to_vec();
        buf.extend_from_slice(b"ST300ALV;2059");
        let mut scanner = parse_bytes(&buf, &registry);
        assert!(scanner.next().is_some());
        assert!(scanner.next().is_none());
        assert_eq!(
            scanner.error(),
            Some(&StreamError::TruncatedFrame {
                offset: ALIVE.len(),
                remaining: 13
            })
        );
        assert!(scanner.next().is_none());
        assert_eq!(scanner.offset(), ALIVE.len());
    }

    #[test]
    fn overlong_frame_is_stream_error() {
        let registry = Family::St300.registry();
        let options = ScanOptions { max_frame_len: 8 };
        let mut scanner = Scanner::with_options(ALIVE, &registry, options);
        assert!(scanner.next().is_none());
        assert_eq!(
            scanner.error(),
            Some(&StreamError::FrameTooLong {
                offset: 0,
                max_len: 8
            })
        );
    }

    #[test]
    fn frame_at_exact_limit_is_accepted() {
        let registry = Family::St300.registry();
        let options = ScanOptions {
            max_frame_len: ALIVE.len(),
        };
        let messages: Vec<_> = Scanner::with_options(ALIVE, &registry, options).collect();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].is_ok());
    }
}
