use std::fmt;

use serde::{Serialize, Serializer};

use super::error::DecodeError;
use super::report::Payload;

/// Closed set of report kinds, keyed on the wire by a three-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum MsgType {
    #[serde(rename = "UNKNOWN")]
    Unknown,
    #[serde(rename = "STT")]
    Status,
    #[serde(rename = "EMG")]
    Emergency,
    #[serde(rename = "EVT")]
    Event,
    #[serde(rename = "ALT")]
    Alert,
    #[serde(rename = "ALV")]
    Alive,
}

impl MsgType {
    pub const ALL: [MsgType; 5] = [
        MsgType::Status,
        MsgType::Emergency,
        MsgType::Event,
        MsgType::Alert,
        MsgType::Alive,
    ];

    pub fn code(self) -> &'static str {
        match self {
            MsgType::Unknown => "UNKNOWN",
            MsgType::Status => "STT",
            MsgType::Emergency => "EMG",
            MsgType::Event => "EVT",
            MsgType::Alert => "ALT",
            MsgType::Alive => "ALV",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        MsgType::ALL.into_iter().find(|msg_type| msg_type.code() == code)
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One sealed frame: whatever decoded, the bytes consumed, and where it
/// stopped if it did not finish.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    /// Unit model code; `None` for reports without one or when it failed.
    pub model: Option<u8>,
    pub msg_type: MsgType,
    pub payload: Payload,
    /// Bytes consumed, up to and including the failing token.
    #[serde(serialize_with = "serialize_frame")]
    pub frame: Vec<u8>,
    #[serde(
        serialize_with = "serialize_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<DecodeError>,
}

impl Message {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

fn serialize_frame<S: Serializer>(frame: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(frame))
}

fn serialize_error<S: Serializer>(
    error: &Option<DecodeError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.collect_str(err),
        None => serializer.serialize_none(),
    }
}

#[cfg(test)]
mod tests {
    use super::{Message, MsgType};
    use crate::fields::{FieldError, FieldId};
    use crate::frame::{DecodeError, Payload};

    #[test]
    fn codes_round_trip() {
        for msg_type in MsgType::ALL {
            assert_eq!(MsgType::from_code(msg_type.code()), Some(msg_type));
        }
        assert_eq!(MsgType::from_code("CMD"), None);
        assert_eq!(MsgType::from_code("UNKNOWN"), None);
    }

    #[test]
    fn message_json_uses_text_frame_and_error_message() {
        let message = Message {
            model: None,
            msg_type: MsgType::Status,
            payload: Payload::Empty,
            frame: b"205951725;2X".to_vec(),
            error: Some(DecodeError::Field(FieldError::Separator {
                field: FieldId::Model,
            })),
        };
        let value = serde_json::to_value(&message).expect("message json");
        assert_eq!(value["msg_type"], "STT");
        assert_eq!(value["frame"], "205951725;2X");
        assert_eq!(
            value["error"],
            "invalid separator after Model, a ';' was expected"
        );
        assert!(!message.is_ok());
    }

    #[test]
    fn message_json_omits_missing_error() {
        let message = Message {
            model: Some(1),
            msg_type: MsgType::Alive,
            payload: Payload::Empty,
            frame: Vec::new(),
            error: None,
        };
        let value = serde_json::to_value(&message).expect("message json");
        assert!(value.get("error").is_none());
    }
}
