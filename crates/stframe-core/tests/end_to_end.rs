use stframe_core::fields::{FieldError, FieldId};
use stframe_core::protocols::Family;
use stframe_core::{DecodeError, Message, MsgType, Payload};
use time::macros::datetime;

const EMERGENCY: &[u8] = b"205951725;20;325;20151223;13:32:30;001cbf75;730;2;4e39;33;-33.363867;-070.670218;000.122;000.00;5;1;190269102;12.89;000000;1;183230;4.5;0;0.00\r";

fn decode_emergency(frame: &[u8]) -> Message {
    Family::St600
        .registry()
        .decode_report(MsgType::Emergency, frame)
}

#[test]
fn emergency_report_decodes_completely() {
    let message = decode_emergency(EMERGENCY);
    assert_eq!(message.error, None);
    assert_eq!(message.msg_type, MsgType::Emergency);
    assert_eq!(message.model, Some(20));
    assert_eq!(message.frame, EMERGENCY);

    let Payload::Emergency(report) = message.payload else {
        panic!("expected emergency payload, got {:?}", message.payload);
    };
    let common = &report.common;
    assert_eq!(common.dev_id, "205951725");
    assert_eq!(common.model, Some(20));
    assert_eq!(common.sw_ver, 325);
    assert_eq!(common.timestamp, Some(datetime!(2015-12-23 13:32:30 UTC)));
    assert_eq!(common.latitude, -33.363867);
    assert_eq!(common.longitude, -70.670218);
    assert_eq!(common.satellites, 5);
    assert!(common.gps_fixed);
    assert_eq!(common.distance, 190269102);
    assert_eq!(common.power_volt, 12.89);
    assert_eq!(report.unit.hour_meter, 183230);
    assert_eq!(report.unit.backup_volt, 4.5);
}

#[test]
fn broken_separator_stops_at_software_version() {
    let mut frame = EMERGENCY.to_vec();
    frame[16] = b'X';
    let message = decode_emergency(&frame);

    assert_eq!(
        message.error,
        Some(DecodeError::Field(FieldError::Separator {
            field: FieldId::SwVer
        }))
    );
    assert_eq!(message.frame, b"205951725;20;325X");
    let Payload::Emergency(report) = message.payload else {
        panic!("expected emergency payload");
    };
    assert_eq!(report.common.dev_id, "205951725");
    assert_eq!(report.common.model, Some(20));
    assert_eq!(report.common.sw_ver, 0);
    assert_eq!(report.common.timestamp, None);
}

#[test]
fn every_separator_is_checked() {
    let separators: Vec<usize> = EMERGENCY
        .iter()
        .enumerate()
        .filter(|(_, byte)| **byte == b';')
        .map(|(index, _)| index)
        .collect();

    for index in separators {
        let mut frame = EMERGENCY.to_vec();
        frame[index] = b'#';
        let message = decode_emergency(&frame);
        assert!(!message.is_ok(), "separator at {index} was not checked");
        assert!(
            message.frame.len() <= frame.len(),
            "frame overran the input at {index}"
        );
        assert_eq!(message.frame, frame[..message.frame.len()]);
    }
}

#[test]
fn consumed_bytes_round_trip_the_frame() {
    let frames: [&[u8]; 3] = [
        b"ST300STT;205951725;01;325;20151223;13:32:30;00100;+37.478519;-070.670218;000.122;000.00;5;1;190269102;12.89;000000;2;0072;183230;4.5;1\r",
        b"ST300ALT;205951725;01;325;20151223;13:32:30;00100;-33.363867;-070.670218;000.122;000.00;5;1;190269102;12.89;000000;3;183230;4.5;0\r",
        b"ST300ALV;205951725\r",
    ];
    let registry = Family::St300.registry();
    for frame in frames {
        let message = registry.decode_frame(frame);
        assert!(message.is_ok(), "{:?}", message.error);
        assert_eq!(message.frame, frame);
    }
}

#[test]
fn decoding_is_idempotent() {
    let first = decode_emergency(EMERGENCY);
    let second = decode_emergency(EMERGENCY);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn real_time_flag_terminator_depends_on_position() {
    // ST300 closes on the flag, so a separator there is wrong.
    let frame = b"ST300EMG;205951725;01;325;20151223;13:32:30;00100;-33.363867;-070.670218;000.122;000.00;5;1;190269102;12.89;000000;1;183230;4.5;1;\r";
    let message = Family::St300.registry().decode_frame(frame);
    assert_eq!(
        message.error,
        Some(DecodeError::Field(FieldError::EndOfFrame {
            field: FieldId::MsgType
        }))
    );
    assert!(message.frame.ends_with(b";1;"));

    // ST600 continues after the flag, so a terminator there is wrong.
    let mut frame = EMERGENCY.to_vec();
    let flag = frame.len() - 6;
    assert_eq!(frame[flag], b';');
    frame[flag] = b'\r';
    let message = decode_emergency(&frame);
    assert_eq!(
        message.error,
        Some(DecodeError::Field(FieldError::Separator {
            field: FieldId::MsgType
        }))
    );
}

#[test]
fn impossible_time_is_invalid_timestamp() {
    let frame = b"205951725;20;325;20151223;25:32:30;001cbf75\r";
    let message = decode_emergency(frame);
    assert_eq!(
        message.error,
        Some(DecodeError::Field(FieldError::Timestamp {
            field: FieldId::Time,
            value: "20151223 25:32:30".to_string()
        }))
    );
    assert_eq!(message.frame, b"205951725;20;325;20151223;25:32:30;");
    let Payload::Emergency(report) = message.payload else {
        panic!("expected emergency payload");
    };
    assert_eq!(report.common.sw_ver, 325);
    assert_eq!(report.common.timestamp, None);
}
