use std::fmt;

use thiserror::Error;

use crate::lexer::LexError;

/// Identifies which field of a frame a decoder was reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldId {
    Header,
    DevId,
    Model,
    SwVer,
    Date,
    Time,
    Cell,
    CellId,
    Mcc,
    Mnc,
    Lac,
    SignalLevel,
    Latitude,
    Longitude,
    Speed,
    Course,
    Satellites,
    Fix,
    Distance,
    PowerVolt,
    Io,
    Mode,
    MsgNum,
    HourMeter,
    BackupVolt,
    MsgType,
    EmergencyId,
    EventId,
    AlertId,
    Tail,
}

impl FieldId {
    pub fn name(self) -> &'static str {
        match self {
            FieldId::Header => "Header",
            FieldId::DevId => "DevID",
            FieldId::Model => "Model",
            FieldId::SwVer => "SwVer",
            FieldId::Date => "Date",
            FieldId::Time => "Time",
            FieldId::Cell => "Cell",
            FieldId::CellId => "CellID",
            FieldId::Mcc => "MCC",
            FieldId::Mnc => "MNC",
            FieldId::Lac => "LAC",
            FieldId::SignalLevel => "SignalLevel",
            FieldId::Latitude => "Latitude",
            FieldId::Longitude => "Longitude",
            FieldId::Speed => "Speed",
            FieldId::Course => "Course",
            FieldId::Satellites => "Satt",
            FieldId::Fix => "Fix",
            FieldId::Distance => "Dist",
            FieldId::PowerVolt => "PowerVolt",
            FieldId::Io => "IO",
            FieldId::Mode => "Mode",
            FieldId::MsgNum => "MsgNum",
            FieldId::HourMeter => "HMeter",
            FieldId::BackupVolt => "BackupVolt",
            FieldId::MsgType => "MsgType",
            FieldId::EmergencyId => "EmgID",
            FieldId::EventId => "EvtID",
            FieldId::AlertId => "AltID",
            FieldId::Tail => "Tail",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Character class a field's content must satisfy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Digits,
    Hex,
    Decimal,
    BinaryDigit,
    Data,
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Shape::Digits => "decimal digits",
            Shape::Hex => "hexadecimal digits",
            Shape::Decimal => "a decimal number",
            Shape::BinaryDigit => "a single 0 or 1",
            Shape::Data => "free text",
        };
        f.write_str(label)
    }
}

/// A field decoder's failure, keyed by the field and the violated contract.
///
/// # Examples
/// ```
/// use stframe_core::fields::{FieldError, FieldId};
///
/// let err = FieldError::Separator { field: FieldId::SwVer };
/// assert_eq!(err.field(), FieldId::SwVer);
/// assert!(err.to_string().contains("a ';' was expected"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("{field}: {source}")]
    Lex {
        field: FieldId,
        #[source]
        source: LexError,
    },
    #[error("invalid separator after {field}, a ';' was expected")]
    Separator { field: FieldId },
    #[error("invalid end of frame after {field}, a CR was expected")]
    EndOfFrame { field: FieldId },
    #[error("invalid {field}: expected {expected}")]
    Shape { field: FieldId, expected: Shape },
    #[error("invalid {field}: value does not fit in {bits} bits")]
    Range { field: FieldId, bits: u32 },
    #[error("invalid {field} value: {value:?}")]
    Unrecognized { field: FieldId, value: String },
    /// Date and time tokens that do not combine into a calendar instant.
    /// `field` is the half that made the combination fail.
    #[error("invalid timestamp ({field}): {value:?}")]
    Timestamp { field: FieldId, value: String },
}

impl FieldError {
    pub fn field(&self) -> FieldId {
        match self {
            FieldError::Lex { field, .. }
            | FieldError::Separator { field }
            | FieldError::EndOfFrame { field }
            | FieldError::Shape { field, .. }
            | FieldError::Range { field, .. }
            | FieldError::Unrecognized { field, .. }
            | FieldError::Timestamp { field, .. } => *field,
        }
    }

    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FieldError::Lex { .. } | FieldError::Separator { .. } | FieldError::EndOfFrame { .. }
        )
    }
}
