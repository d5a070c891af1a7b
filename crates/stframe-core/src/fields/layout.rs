//! Wire constants: delimiters and per-field extraction widths.
//!
//! Fixed widths include the trailing separator; delimited maxima bound the
//! scan, delimiter included.

pub const SEPARATOR: u8 = b';';
pub const END_OF_FRAME: u8 = b'\r';

pub const HEADER_WIDTH: usize = 9;
pub const FAMILY_LEN: usize = 5;

pub const DEV_ID_WIDTH: usize = 10;
pub const MODEL_WIDTH: usize = 3;
pub const SW_VER_WIDTH: usize = 4;
pub const DATE_WIDTH: usize = 9;
pub const TIME_WIDTH: usize = 9;
pub const MODE_WIDTH: usize = 2;
pub const MSG_NUM_WIDTH: usize = 5;
pub const MSG_TYPE_WIDTH: usize = 2;

pub const CELL_MAX: usize = 7;
pub const LATITUDE_MAX: usize = 11;
pub const LONGITUDE_MAX: usize = 12;
pub const SPEED_MAX: usize = 8;
pub const COURSE_MAX: usize = 7;
pub const SATELLITES_MAX: usize = 3;
pub const FIX_MAX: usize = 3;
pub const DISTANCE_MAX: usize = 11;
pub const POWER_VOLT_MAX: usize = 11;
pub const HOUR_METER_MAX: usize = 8;
pub const BACKUP_VOLT_MAX: usize = 11;
pub const EMERGENCY_ID_MAX: usize = 3;
pub const REPORT_ID_MAX: usize = 4;

/// Content length of `YYYYMMDD` + `HH:MM:SS`.
pub const DATE_LEN: usize = 8;
pub const TIME_LEN: usize = 8;
