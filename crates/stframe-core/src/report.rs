use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::frame::{Message, ScanOptions, Scanner, StreamError};
use crate::protocols::Family;

/// Current report schema version.
pub const REPORT_VERSION: u32 = 1;
/// Used when no message carries a device timestamp.
pub const DEFAULT_GENERATED_AT: &str = "1970-01-01T00:00:00Z";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("stream error: {0}")]
    Stream(#[from] StreamError),
}

/// Decoded capture with deterministic ordering.
///
/// # Examples
/// ```
/// use stframe_core::{ScanOptions, decode_bytes};
/// use stframe_core::protocols::Family;
///
/// let report = decode_bytes("inline", b"ST300ALV;205951725\r", Family::St300, ScanOptions::default());
/// assert_eq!(report.report_version, stframe_core::REPORT_VERSION);
/// assert_eq!(report.summary.decoded, 1);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    /// Report schema version (not the binary version).
    pub report_version: u32,
    pub tool: ToolInfo,
    /// Latest device timestamp seen, RFC3339.
    pub generated_at: String,
    pub input: InputInfo,
    pub family: Family,
    pub summary: Summary,
    /// One entry per frame, in input order.
    pub messages: Vec<Message>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_stream_error"
    )]
    pub stream_error: Option<StreamError>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct InputInfo {
    /// Input path as provided to the decoder.
    pub path: String,
    pub bytes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub frames_total: u64,
    pub decoded: u64,
    pub failed: u64,
    /// Frame count per message-type code, sorted by code.
    pub by_type: BTreeMap<String, u64>,
}

impl Summary {
    fn add(&mut self, message: &Message) {
        self.frames_total += 1;
        if message.is_ok() {
            self.decoded += 1;
        } else {
            self.failed += 1;
        }
        *self
            .by_type
            .entry(message.msg_type.code().to_string())
            .or_default() += 1;
    }
}

impl Report {
    /// Failed messages, in input order.
    pub fn failures(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|message| !message.is_ok())
    }

    /// Err if the scan stopped before the end of the input.
    pub fn check_stream(&self) -> Result<(), ReportError> {
        match &self.stream_error {
            Some(err) => Err(ReportError::Stream(err.clone())),
            None => Ok(()),
        }
    }
}

fn serialize_stream_error<S: serde::Serializer>(
    error: &Option<StreamError>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match error {
        Some(err) => serializer.collect_str(err),
        None => serializer.serialize_none(),
    }
}

pub fn decode_bytes(path_label: &str, bytes: &[u8], family: Family, options: ScanOptions) -> Report {
    let registry = family.registry();
    let mut scanner = Scanner::with_options(bytes, &registry, options);
    let mut summary = Summary::default();
    let messages: Vec<Message> = scanner
        .by_ref()
        .inspect(|message| summary.add(message))
        .collect();
    let stream_error = scanner.error().cloned();
    debug!(
        frames = summary.frames_total,
        failed = summary.failed,
        "capture decoded"
    );

    Report {
        report_version: REPORT_VERSION,
        tool: ToolInfo {
            name: "stframe".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        generated_at: latest_timestamp(&messages)
            .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string()),
        input: InputInfo {
            path: path_label.to_string(),
            bytes: bytes.len() as u64,
        },
        family,
        summary,
        messages,
        stream_error,
    }
}

pub fn decode_file(path: &Path, family: Family, options: ScanOptions) -> Result<Report, ReportError> {
    let bytes = std::fs::read(path)?;
    Ok(decode_bytes(
        &path.display().to_string(),
        &bytes,
        family,
        options,
    ))
}

fn latest_timestamp(messages: &[Message]) -> Option<String> {
    messages
        .iter()
        .filter_map(|message| message.payload.common()?.timestamp)
        .max()
        .and_then(|ts: OffsetDateTime| ts.format(&Rfc3339).ok())
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_GENERATED_AT, ReportError, decode_bytes};
    use crate::frame::{ScanOptions, StreamError};
    use crate::protocols::Family;

    const STATUS: &[u8] = b"ST300STT;205951725;01;325;20151223;13:32:30;00100;-33.363867;-070.670218;000.122;000.00;5;1;190269102;12.89;000000;2;0072;183230;4.5;1\r";

    #[test]
    fn summary_counts_by_type() {
        let mut buf = STATUS.to_vec();
        buf.extend_from_slice(b"ST300ALV;205951725\r");
        buf.extend_from_slice(b"ST300ALV;2059517x5\r");
        let report = decode_bytes("mem", &buf, Family::St300, ScanOptions::default());
        assert_eq!(report.summary.frames_total, 3);
        assert_eq!(report.summary.decoded, 2);
        assert_eq!(report.summary.failed, 1);
        assert_eq!(report.summary.by_type.get("ALV"), Some(&2));
        assert_eq!(report.summary.by_type.get("STT"), Some(&1));
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.generated_at, "2015-12-23T13:32:30Z");
        assert_eq!(report.input.bytes, buf.len() as u64);
        assert!(report.check_stream().is_ok());
    }

    #[test]
    fn no_timestamps_falls_back_to_epoch() {
        let report = decode_bytes("mem", b"ST300ALV;205951725\r", Family::St300, ScanOptions::default());
        assert_eq!(report.generated_at, DEFAULT_GENERATED_AT);
    }

    #[test]
    fn truncated_capture_keeps_stream_error() {
        let report = decode_bytes("mem", b"ST300ALV;2059", Family::St300, ScanOptions::default());
        assert!(report.messages.is_empty());
        assert_eq!(
            report.stream_error,
            Some(StreamError::TruncatedFrame {
                offset: 0,
                remaining: 13
            })
        );
        assert!(matches!(report.check_stream(), Err(ReportError::Stream(_))));

        let json = serde_json::to_value(&report).unwrap();
        assert!(json["stream_error"].as_str().unwrap().contains("offset 0"));
    }

    #[test]
    fn report_serializes_messages_in_order() {
        let mut buf = b"ST300ALV;205951725\r".to_vec();
        buf.extend_from_slice(STATUS);
        let report = decode_bytes("mem", &buf, Family::St300, ScanOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["family"], "st300");
        assert_eq!(json["messages"][0]["msg_type"], "ALV");
        assert_eq!(json["messages"][1]["msg_type"], "STT");
        assert_eq!(json["messages"][1]["payload"]["report"], "status");
        assert!(json.get("stream_error").is_none());
    }
}
