use serde::{Deserialize, Serialize};

/// Leading `<FAMILY><TYPE>;` token of every frame, e.g. `ST300EMG;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub family: String,
    pub code: String,
}

/// Reporting mode carried in status frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Idle,
    Active,
    Distance,
    Angle,
}

impl Mode {
    pub fn from_digit(digit: u8) -> Option<Self> {
        match digit {
            b'1' => Some(Mode::Idle),
            b'2' => Some(Mode::Active),
            b'4' => Some(Mode::Distance),
            b'5' => Some(Mode::Angle),
            _ => None,
        }
    }
}

/// Cause reported by an emergency frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergencyKind {
    PanicButton,
    ParkingLock,
    MainPowerRemoved,
    AntiTheft,
    AntiTheftDoor,
    Motion,
    AntiTheftShock,
}

impl EmergencyKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(EmergencyKind::PanicButton),
            2 => Some(EmergencyKind::ParkingLock),
            3 => Some(EmergencyKind::MainPowerRemoved),
            5 => Some(EmergencyKind::AntiTheft),
            6 => Some(EmergencyKind::AntiTheftDoor),
            7 => Some(EmergencyKind::Motion),
            8 => Some(EmergencyKind::AntiTheftShock),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EmergencyKind, Mode};

    #[test]
    fn mode_skips_reserved_digit() {
        assert_eq!(Mode::from_digit(b'1'), Some(Mode::Idle));
        assert_eq!(Mode::from_digit(b'3'), None);
        assert_eq!(Mode::from_digit(b'5'), Some(Mode::Angle));
    }

    #[test]
    fn emergency_code_four_is_unassigned() {
        assert_eq!(EmergencyKind::from_code(4), None);
        assert_eq!(EmergencyKind::from_code(8), Some(EmergencyKind::AntiTheftShock));
    }
}
