//! Per-message-type decoder tables.
//!
//! A `Registry` maps each `MsgType` to a `Pipeline`: the ordered field steps
//! for that report plus the constructor that wraps the finished report into
//! a `Payload`. The dispatcher only walks the table; it never knows which
//! fields a report has.

use std::collections::HashMap;

use tracing::debug;

use super::error::DecodeError;
use super::message::{Message, MsgType};
use super::report::Payload;
use crate::fields::decode::{self, Decoded};
use crate::fields::FieldError;
use crate::lexer::Lexer;

/// Lexer plus the running copy of every byte consumed from the frame.
#[derive(Debug)]
pub struct FrameCursor<'a> {
    lexer: Lexer<'a>,
    frame: Vec<u8>,
}

impl<'a> FrameCursor<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self {
            lexer: Lexer::new(input),
            frame: Vec::with_capacity(input.len()),
        }
    }

    /// Run one field decoder, recording its bytes whatever the outcome.
    pub fn field<T>(
        &mut self,
        decoder: impl FnOnce(&mut Lexer<'a>) -> Decoded<'a, T>,
    ) -> Result<T, FieldError> {
        let (raw, value) = decoder(&mut self.lexer).into_parts();
        self.frame.extend_from_slice(raw);
        value
    }

    pub fn consumed(&self) -> &[u8] {
        &self.frame
    }

    pub fn remaining(&self) -> usize {
        self.lexer.remaining()
    }

    fn into_frame(self) -> Vec<u8> {
        self.frame
    }
}

/// One field of a report layout: decode it and store it in the report.
pub type FieldStep<R> = fn(&mut FrameCursor<'_>, &mut R) -> Result<(), FieldError>;

/// Decodes one report body from a cursor positioned after the header.
pub trait ReportDecoder: Send + Sync {
    /// Returns the (possibly partial) payload and the error that stopped it.
    fn decode(&self, cursor: &mut FrameCursor<'_>) -> (Payload, Option<FieldError>);

    fn field_count(&self) -> usize;
}

/// Ordered field steps for report type `R` and its payload constructor.
///
/// # Examples
/// ```
/// use stframe_core::fields::decode;
/// use stframe_core::frame::{AliveReport, FrameCursor, Payload, Pipeline, ReportDecoder};
///
/// let pipeline = Pipeline::new(Payload::Alive).step(|cursor, report: &mut AliveReport| {
///     report.dev_id = cursor.field(decode::dev_id_at_end)?;
///     Ok(())
/// });
/// let mut cursor = FrameCursor::new(b"205951725\r");
/// let (payload, error) = pipeline.decode(&mut cursor);
/// assert!(error.is_none());
/// assert_eq!(payload.dev_id(), Some("205951725"));
/// ```
pub struct Pipeline<R> {
    steps: Vec<FieldStep<R>>,
    seal: fn(R) -> Payload,
}

impl<R: Default> Pipeline<R> {
    pub fn new(seal: fn(R) -> Payload) -> Self {
        Self {
            steps: Vec::new(),
            seal,
        }
    }

    pub fn step(mut self, step: FieldStep<R>) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(mut self, steps: impl IntoIterator<Item = FieldStep<R>>) -> Self {
        self.steps.extend(steps);
        self
    }
}

impl<R: Default> ReportDecoder for Pipeline<R> {
    fn decode(&self, cursor: &mut FrameCursor<'_>) -> (Payload, Option<FieldError>) {
        let mut report = R::default();
        let error = self
            .steps
            .iter()
            .find_map(|step| step(cursor, &mut report).err());
        ((self.seal)(report), error)
    }

    fn field_count(&self) -> usize {
        self.steps.len()
    }
}

/// Decoder tables for one device family, keyed by message type.
pub struct Registry {
    prefix: &'static str,
    tables: HashMap<MsgType, Box<dyn ReportDecoder>>,
}

impl Registry {
    /// `prefix` is the family part of the header, e.g. `ST300`.
    pub fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            tables: HashMap::new(),
        }
    }

    pub fn register<R: Default + 'static>(
        &mut self,
        msg_type: MsgType,
        pipeline: Pipeline<R>,
    ) -> &mut Self {
        self.tables.insert(msg_type, Box::new(pipeline));
        self
    }

    pub fn prefix(&self) -> &'static str {
        self.prefix
    }

    pub fn supports(&self, msg_type: MsgType) -> bool {
        self.tables.contains_key(&msg_type)
    }

    /// Registered message types in stable order.
    pub fn msg_types(&self) -> Vec<MsgType> {
        let mut types: Vec<MsgType> = self.tables.keys().copied().collect();
        types.sort();
        types
    }

    /// Decode a complete frame, header included.
    pub fn decode_frame(&self, frame: &[u8]) -> Message {
        let mut cursor = FrameCursor::new(frame);
        let header = match cursor.field(decode::header) {
            Ok(header) => header,
            Err(err) => return seal(MsgType::Unknown, Payload::Empty, cursor, Some(err.into())),
        };
        let msg_type = MsgType::from_code(&header.code).filter(|_| header.family == self.prefix);
        match msg_type {
            Some(msg_type) => self.decode_body(msg_type, cursor),
            None => {
                let error = DecodeError::UnknownHeader {
                    header: format!("{}{}", header.family, header.code),
                };
                seal(MsgType::Unknown, Payload::Empty, cursor, Some(error))
            }
        }
    }

    /// Decode a frame body (no header) through the table for `msg_type`.
    pub fn decode_report(&self, msg_type: MsgType, frame: &[u8]) -> Message {
        self.decode_body(msg_type, FrameCursor::new(frame))
    }

    fn decode_body(&self, msg_type: MsgType, mut cursor: FrameCursor<'_>) -> Message {
        let Some(table) = self.tables.get(&msg_type) else {
            return seal(
                msg_type,
                Payload::Empty,
                cursor,
                Some(DecodeError::Unsupported { msg_type }),
            );
        };
        let (payload, error) = table.decode(&mut cursor);
        let error = match error {
            Some(err) => Some(DecodeError::from(err)),
            None if cursor.remaining() > 0 => Some(DecodeError::TrailingData {
                count: cursor.remaining(),
            }),
            None => None,
        };
        seal(msg_type, payload, cursor, error)
    }
}

fn seal(
    msg_type: MsgType,
    payload: Payload,
    cursor: FrameCursor<'_>,
    error: Option<DecodeError>,
) -> Message {
    let frame = cursor.into_frame();
    match &error {
        Some(err) => debug!(%msg_type, bytes = frame.len(), error = %err, "frame decode stopped"),
        None => debug!(%msg_type, bytes = frame.len(), "frame decoded"),
    }
    Message {
        model: payload.model(),
        msg_type,
        payload,
        frame,
        error,
    }
}
