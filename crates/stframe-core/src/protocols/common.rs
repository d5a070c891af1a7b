//! Field steps shared by every family's report layouts.

use crate::fields::decode;
use crate::fields::{FieldError, FieldId};
use crate::frame::{
    AlertReport, AliveReport, CommonReport, EmergencyReport, EventReport, FieldStep, FrameCursor,
    StatusReport, UnitStatus,
};

pub(crate) const IO_MAX: usize = 9;
pub(crate) const TAIL_MAX: usize = 11;

/// Reports built on `CommonReport` and closed by `UnitStatus`.
pub(crate) trait Positioned: Default {
    fn common_mut(&mut self) -> &mut CommonReport;
    fn unit_mut(&mut self) -> &mut UnitStatus;
}

impl Positioned for StatusReport {
    fn common_mut(&mut self) -> &mut CommonReport {
        &mut self.common
    }

    fn unit_mut(&mut self) -> &mut UnitStatus {
        &mut self.unit
    }
}

impl Positioned for EmergencyReport {
    fn common_mut(&mut self) -> &mut CommonReport {
        &mut self.common
    }

    fn unit_mut(&mut self) -> &mut UnitStatus {
        &mut self.unit
    }
}

impl Positioned for EventReport {
    fn common_mut(&mut self) -> &mut CommonReport {
        &mut self.common
    }

    fn unit_mut(&mut self) -> &mut UnitStatus {
        &mut self.unit
    }
}

impl Positioned for AlertReport {
    fn common_mut(&mut self) -> &mut CommonReport {
        &mut self.common
    }

    fn unit_mut(&mut self) -> &mut UnitStatus {
        &mut self.unit
    }
}

type StepResult = Result<(), FieldError>;

fn dev_id<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().dev_id = cursor.field(decode::dev_id)?;
    Ok(())
}

fn model<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().model = Some(cursor.field(decode::model)?);
    Ok(())
}

fn sw_ver<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().sw_ver = cursor.field(decode::sw_ver)?;
    Ok(())
}

fn timestamp<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().timestamp = Some(cursor.field(decode::timestamp)?);
    Ok(())
}

fn latitude<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().latitude = cursor.field(decode::latitude)?;
    Ok(())
}

fn longitude<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().longitude = cursor.field(decode::longitude)?;
    Ok(())
}

fn speed<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().speed = cursor.field(decode::speed)?;
    Ok(())
}

fn course<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().course = cursor.field(decode::course)?;
    Ok(())
}

fn satellites<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().satellites = cursor.field(decode::satellites)?;
    Ok(())
}

fn fix<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().gps_fixed = cursor.field(decode::fix)?;
    Ok(())
}

fn distance<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().distance = cursor.field(decode::distance)?;
    Ok(())
}

fn power_volt<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().power_volt = cursor.field(decode::power_volt)?;
    Ok(())
}

fn io<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.common_mut().io = cursor.field(|lex| decode::io(lex, IO_MAX))?;
    Ok(())
}

fn hour_meter<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.unit_mut().hour_meter = cursor.field(decode::hour_meter)?;
    Ok(())
}

fn backup_volt<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.unit_mut().backup_volt = cursor.field(decode::backup_volt)?;
    Ok(())
}

fn real_time_last<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.unit_mut().real_time = cursor.field(|lex| decode::msg_type(lex, true))?;
    Ok(())
}

fn real_time<R: Positioned>(cursor: &mut FrameCursor<'_>, report: &mut R) -> StepResult {
    report.unit_mut().real_time = cursor.field(|lex| decode::msg_type(lex, false))?;
    Ok(())
}

/// DevID, Model, SwVer, Date+Time.
pub(crate) fn identity<R: Positioned>() -> [FieldStep<R>; 4] {
    [dev_id::<R>, model::<R>, sw_ver::<R>, timestamp::<R>]
}

/// Lat through IO, the block following the cell fields.
pub(crate) fn position<R: Positioned>() -> [FieldStep<R>; 9] {
    [
        latitude::<R>,
        longitude::<R>,
        speed::<R>,
        course::<R>,
        satellites::<R>,
        fix::<R>,
        distance::<R>,
        power_volt::<R>,
        io::<R>,
    ]
}

/// HMeter, BckVolt and a real-time flag that closes the frame.
pub(crate) fn unit_closing<R: Positioned>() -> [FieldStep<R>; 3] {
    [hour_meter::<R>, backup_volt::<R>, real_time_last::<R>]
}

/// HMeter, BckVolt and a real-time flag followed by more fields.
pub(crate) fn unit_continuing<R: Positioned>() -> [FieldStep<R>; 3] {
    [hour_meter::<R>, backup_volt::<R>, real_time::<R>]
}

pub(crate) fn mode(cursor: &mut FrameCursor<'_>, report: &mut StatusReport) -> StepResult {
    report.mode = Some(cursor.field(decode::mode)?);
    Ok(())
}

pub(crate) fn msg_num(cursor: &mut FrameCursor<'_>, report: &mut StatusReport) -> StepResult {
    report.msg_num = cursor.field(decode::msg_num)?;
    Ok(())
}

pub(crate) fn status_extra(cursor: &mut FrameCursor<'_>, report: &mut StatusReport) -> StepResult {
    report.extra = Some(cursor.field(|lex| decode::unknown_tail(lex, TAIL_MAX))?);
    Ok(())
}

pub(crate) fn emergency(cursor: &mut FrameCursor<'_>, report: &mut EmergencyReport) -> StepResult {
    report.emergency = Some(cursor.field(decode::emergency_id)?);
    Ok(())
}

pub(crate) fn emergency_extra(
    cursor: &mut FrameCursor<'_>,
    report: &mut EmergencyReport,
) -> StepResult {
    report.extra = Some(cursor.field(|lex| decode::unknown_tail(lex, TAIL_MAX))?);
    Ok(())
}

pub(crate) fn event_id(cursor: &mut FrameCursor<'_>, report: &mut EventReport) -> StepResult {
    report.event_id = cursor.field(|lex| decode::report_id(lex, FieldId::EventId))?;
    Ok(())
}

pub(crate) fn alert_id(cursor: &mut FrameCursor<'_>, report: &mut AlertReport) -> StepResult {
    report.alert_id = cursor.field(|lex| decode::report_id(lex, FieldId::AlertId))?;
    Ok(())
}

pub(crate) fn alive(cursor: &mut FrameCursor<'_>, report: &mut AliveReport) -> StepResult {
    report.dev_id = cursor.field(decode::dev_id_at_end)?;
    Ok(())
}
