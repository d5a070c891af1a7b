//! Report payload shapes.
//!
//! Every attribute starts at its zero value and is filled field by field; a
//! frame that fails part way leaves the rest untouched.

use serde::Serialize;
use time::OffsetDateTime;

use crate::fields::{EmergencyKind, Mode};

/// Serving cell as reported by the unit.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CellInfo {
    #[default]
    Unknown,
    /// Single hex cell id (ST300 family).
    Serving { id: String },
    /// Full cell-tower record (ST600 family).
    Tower(CellTower),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CellTower {
    pub cell_id: String,
    pub mcc: String,
    pub mnc: String,
    pub lac: String,
    pub signal_level: u8,
}

/// Fields shared by status, emergency, event and alert reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CommonReport {
    pub dev_id: String,
    pub model: Option<u8>,
    pub sw_ver: u16,
    #[serde(with = "time::serde::rfc3339::option")]
    pub timestamp: Option<OffsetDateTime>,
    pub cell: CellInfo,
    pub latitude: f32,
    pub longitude: f32,
    pub speed: f32,
    pub course: f32,
    pub satellites: u8,
    pub gps_fixed: bool,
    pub distance: u32,
    pub power_volt: f32,
    pub io: String,
}

/// Unit counters closing most reports.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitStatus {
    pub hour_meter: u32,
    pub backup_volt: f32,
    /// `true` for live reports, `false` for reports replayed from storage.
    pub real_time: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatusReport {
    #[serde(flatten)]
    pub common: CommonReport,
    pub mode: Option<Mode>,
    pub msg_num: u16,
    #[serde(flatten)]
    pub unit: UnitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EmergencyReport {
    #[serde(flatten)]
    pub common: CommonReport,
    pub emergency: Option<EmergencyKind>,
    #[serde(flatten)]
    pub unit: UnitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EventReport {
    #[serde(flatten)]
    pub common: CommonReport,
    pub event_id: u8,
    #[serde(flatten)]
    pub unit: UnitStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AlertReport {
    #[serde(flatten)]
    pub common: CommonReport,
    pub alert_id: u8,
    #[serde(flatten)]
    pub unit: UnitStatus,
}

/// Keep-alive: identifies the unit and nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AliveReport {
    pub dev_id: String,
}

/// Decoded body of a frame, one variant per message type.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Payload {
    /// Nothing was decoded: the header was not understood.
    #[default]
    Empty,
    Status(StatusReport),
    Emergency(EmergencyReport),
    Event(EventReport),
    Alert(AlertReport),
    Alive(AliveReport),
}

impl Payload {
    pub fn common(&self) -> Option<&CommonReport> {
        match self {
            Payload::Status(report) => Some(&report.common),
            Payload::Emergency(report) => Some(&report.common),
            Payload::Event(report) => Some(&report.common),
            Payload::Alert(report) => Some(&report.common),
            Payload::Empty | Payload::Alive(_) => None,
        }
    }

    /// Model code, when the report carries one and it decoded.
    pub fn model(&self) -> Option<u8> {
        self.common().and_then(|common| common.model)
    }

    pub fn dev_id(&self) -> Option<&str> {
        let dev_id = match self {
            Payload::Alive(report) => Some(report.dev_id.as_str()),
            _ => self.common().map(|common| common.dev_id.as_str()),
        };
        dev_id.filter(|id| !id.is_empty())
    }
}
