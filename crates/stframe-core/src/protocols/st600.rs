//! ST600 family tables.
//!
//! The serving cell is a five-field tower record. Status and emergency
//! reports carry an analog tail after the real-time flag.

use super::common::{self, Positioned};
use crate::fields::decode;
use crate::fields::{FieldError, FieldId};
use crate::frame::{
    AliveReport, CellInfo, CellTower, EmergencyReport, FrameCursor, MsgType, Payload, Pipeline,
    Registry, StatusReport,
};

pub const PREFIX: &str = "ST600";

const CELL_ID_MAX: usize = 9;
const MCC_MAX: usize = 4;
const MNC_MAX: usize = 4;
const LAC_MAX: usize = 5;
const SIGNAL_LEVEL_MAX: usize = 4;

pub fn registry() -> Registry {
    let mut registry = Registry::new(PREFIX);
    registry
        .register(MsgType::Status, status())
        .register(MsgType::Emergency, emergency())
        .register(MsgType::Alive, alive());
    registry
}

type StepResult = Result<(), FieldError>;

// The cell-id step installs the tower record; the following steps fill it in.
fn cell_id<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    let cell_id = cursor.field(|lex| decode::hex_string(lex, CELL_ID_MAX, FieldId::CellId))?;
    report.common_mut().cell = CellInfo::Tower(CellTower {
        cell_id,
        ..CellTower::default()
    });
    Ok(())
}

fn with_tower<R: Positioned>(report: &mut R, update: impl FnOnce(&mut CellTower)) {
    if let CellInfo::Tower(tower) = &mut report.common_mut().cell {
        update(tower);
    }
}

fn mcc<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    let mcc = cursor.field(|lex| decode::digit_string(lex, MCC_MAX, FieldId::Mcc))?;
    with_tower(report, |tower| tower.mcc = mcc);
    Ok(())
}

fn mnc<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    let mnc = cursor.field(|lex| decode::digit_string(lex, MNC_MAX, FieldId::Mnc))?;
    with_tower(report, |tower| tower.mnc = mnc);
    Ok(())
}

fn lac<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    let lac = cursor.field(|lex| decode::hex_string(lex, LAC_MAX, FieldId::Lac))?;
    with_tower(report, |tower| tower.lac = lac);
    Ok(())
}

fn signal_level<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    let level =
        cursor.field(|lex| decode::small_count(lex, SIGNAL_LEVEL_MAX, FieldId::SignalLevel))?;
    with_tower(report, |tower| tower.signal_level = level);
    Ok(())
}

fn positioned<R: Positioned>(seal: fn(R) -> Payload) -> Pipeline<R> {
    Pipeline::new(seal)
        .steps(common::identity())
        .steps([cell_id::<R>, mcc::<R>, mnc::<R>, lac::<R>, signal_level::<R>])
        .steps(common::position())
}

fn status() -> Pipeline<StatusReport> {
    positioned(Payload::Status)
        .step(common::mode)
        .step(common::msg_num)
        .steps(common::unit_continuing())
        .step(common::status_extra)
}

fn emergency() -> Pipeline<EmergencyReport> {
    positioned(Payload::Emergency)
        .step(common::emergency)
        .steps(common::unit_continuing())
        .step(common::emergency_extra)
}

fn alive() -> Pipeline<AliveReport> {
    Pipeline::new(Payload::Alive).step(common::alive)
}
