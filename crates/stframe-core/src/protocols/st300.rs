//! ST300 family tables.
//!
//! The serving cell is a single hex id. Every positioned report closes with
//! the real-time flag.

use super::common::{self, Positioned};
use crate::fields::FieldError;
use crate::fields::decode;
use crate::frame::{
    AlertReport, AliveReport, CellInfo, EmergencyReport, EventReport, FrameCursor, MsgType,
    Payload, Pipeline, Registry, StatusReport,
};

pub const PREFIX: &str = "ST300";

pub fn registry() -> Registry {
    let mut registry = Registry::new(PREFIX);
    registry
        .register(MsgType::Status, status())
        .register(MsgType::Emergency, emergency())
        .register(MsgType::Event, event())
        .register(MsgType::Alert, alert())
        .register(MsgType::Alive, alive());
    registry
}

fn cell<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> Result<(), FieldError> {
    let id = cursor.field(decode::cell)?;
    report.common_mut().cell = CellInfo::Serving { id };
    Ok(())
}

fn positioned<R: Positioned>(seal: fn(R) -> Payload) -> Pipeline<R> {
    Pipeline::new(seal)
        .steps(common::identity())
        .step(cell::<R>)
        .steps(common::position())
}

fn status() -> Pipeline<StatusReport> {
    positioned(Payload::Status)
        .step(common::mode)
        .step(common::msg_num)
        .steps(common::unit_closing())
}

fn emergency() -> Pipeline<EmergencyReport> {
    positioned(Payload::Emergency)
        .step(common::emergency)
        .steps(common::unit_closing())
}

fn event() -> Pipeline<EventReport> {
    positioned(Payload::Event)
        .step(common::event_id)
        .steps(common::unit_closing())
}

fn alert() -> Pipeline<AlertReport> {
    positioned(Payload::Alert)
        .step(common::alert_id)
        .steps(common::unit_closing())
}

fn alive() -> Pipeline<AliveReport> {
    Pipeline::new(Payload::Alive).step(common::alive)
}
