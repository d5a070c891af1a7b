//! Field decoders.
//!
//! Every decoder pulls its own token(s) from the lexer, checks the field's
//! character class and trailing byte, then parses the content. The bytes
//! consumed are returned alongside the outcome so callers can account for
//! them whether or not the field decoded.

use std::num::{IntErrorKind, ParseIntError};
use std::str::FromStr;

use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use super::error::{FieldError, FieldId, Shape};
use super::layout::{self, END_OF_FRAME, SEPARATOR};
use super::types::{EmergencyKind, Header, Mode};
use crate::lexer::{Lexer, Token, TokenKind};

/// Outcome of one field decode plus the raw bytes it consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<'a, T> {
    pub raw: &'a [u8],
    pub value: Result<T, FieldError>,
}

impl<'a, T> Decoded<'a, T> {
    pub fn into_parts(self) -> (&'a [u8], Result<T, FieldError>) {
        (self.raw, self.value)
    }
}

fn decode<'a, T>(
    lex: &mut Lexer<'a>,
    read: impl FnOnce(&mut Lexer<'a>) -> Result<T, FieldError>,
) -> Decoded<'a, T> {
    let start = lex.position();
    let value = read(lex);
    Decoded {
        raw: lex.consumed_since(start),
        value,
    }
}

fn fixed<'a>(lex: &mut Lexer<'a>, width: usize, field: FieldId) -> Result<Token<'a>, FieldError> {
    lex.read_fixed(width)
        .map_err(|source| FieldError::Lex { field, source })
}

fn delimited<'a>(
    lex: &mut Lexer<'a>,
    max_width: usize,
    delimiter: u8,
    field: FieldId,
) -> Result<Token<'a>, FieldError> {
    lex.read_until(max_width, delimiter)
        .map_err(|source| FieldError::Lex { field, source })
}

fn expect_shape(ok: bool, field: FieldId, expected: Shape) -> Result<(), FieldError> {
    if ok {
        Ok(())
    } else {
        Err(FieldError::Shape { field, expected })
    }
}

fn expect_separator(token: &Token<'_>, field: FieldId) -> Result<(), FieldError> {
    if token.ends_with(SEPARATOR) {
        Ok(())
    } else {
        Err(FieldError::Separator { field })
    }
}

fn expect_end_of_frame(token: &Token<'_>, field: FieldId) -> Result<(), FieldError> {
    if token.ends_with(END_OF_FRAME) {
        Ok(())
    } else {
        Err(FieldError::EndOfFrame { field })
    }
}

fn content_str<'a>(
    token: &Token<'a>,
    field: FieldId,
    expected: Shape,
) -> Result<&'a str, FieldError> {
    std::str::from_utf8(token.content()).map_err(|_| FieldError::Shape { field, expected })
}

fn parse_uint<T>(token: &Token<'_>, field: FieldId, bits: u32) -> Result<T, FieldError>
where
    T: FromStr<Err = ParseIntError>,
{
    let text = content_str(token, field, Shape::Digits)?;
    text.parse::<T>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow => FieldError::Range { field, bits },
        _ => FieldError::Shape {
            field,
            expected: Shape::Digits,
        },
    })
}

fn parse_f32(token: &Token<'_>, field: FieldId) -> Result<f32, FieldError> {
    let shape_err = FieldError::Shape {
        field,
        expected: Shape::Decimal,
    };
    let text = content_str(token, field, Shape::Decimal)?;
    match text.parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(shape_err),
    }
}

fn digits_field<'a>(
    lex: &mut Lexer<'a>,
    max_width: usize,
    field: FieldId,
) -> Result<Token<'a>, FieldError> {
    let token = delimited(lex, max_width, SEPARATOR, field)?;
    expect_shape(token.is_digits(), field, Shape::Digits)?;
    Ok(token)
}

fn decimal_field(lex: &mut Lexer<'_>, max_width: usize, field: FieldId) -> Result<f32, FieldError> {
    let token = delimited(lex, max_width, SEPARATOR, field)?;
    expect_shape(token.is_decimal(), field, Shape::Decimal)?;
    parse_f32(&token, field)
}

/// Frame header: five-byte family prefix, three-byte type code, separator.
pub fn header<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, Header> {
    decode(lex, |lex| {
        let token = fixed(lex, layout::HEADER_WIDTH, FieldId::Header)?;
        let content = token.content();
        expect_shape(
            content.iter().all(u8::is_ascii_alphanumeric),
            FieldId::Header,
            Shape::Data,
        )?;
        expect_separator(&token, FieldId::Header)?;
        let (family, code) = content.split_at(layout::FAMILY_LEN);
        Ok(Header {
            family: String::from_utf8_lossy(family).into_owned(),
            code: String::from_utf8_lossy(code).into_owned(),
        })
    })
}

/// Nine-digit unit identifier followed by a separator.
pub fn dev_id<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, String> {
    decode(lex, |lex| {
        let token = fixed(lex, layout::DEV_ID_WIDTH, FieldId::DevId)?;
        expect_shape(token.is_digits(), FieldId::DevId, Shape::Digits)?;
        expect_separator(&token, FieldId::DevId)?;
        Ok(token.text())
    })
}

/// Unit identifier closing a frame, as sent by keep-alive reports.
pub fn dev_id_at_end<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, String> {
    decode(lex, |lex| {
        let token = fixed(lex, layout::DEV_ID_WIDTH, FieldId::DevId)?;
        expect_shape(token.is_digits(), FieldId::DevId, Shape::Digits)?;
        expect_end_of_frame(&token, FieldId::DevId)?;
        Ok(token.text())
    })
}

pub fn model<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, u8> {
    decode(lex, |lex| {
        let token = fixed(lex, layout::MODEL_WIDTH, FieldId::Model)?;
        expect_shape(token.is_digits(), FieldId::Model, Shape::Digits)?;
        expect_separator(&token, FieldId::Model)?;
        parse_uint(&token, FieldId::Model, 8)
    })
}

pub fn sw_ver<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, u16> {
    decode(lex, |lex| {
        let token = fixed(lex, layout::SW_VER_WIDTH, FieldId::SwVer)?;
        expect_shape(token.is_digits(), FieldId::SwVer, Shape::Digits)?;
        expect_separator(&token, FieldId::SwVer)?;
        parse_uint(&token, FieldId::SwVer, 16)
    })
}

/// `YYYYMMDD;HH:MM:SS;` read as two fixed tokens and combined in UTC.
pub fn timestamp<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, OffsetDateTime> {
    decode(lex, |lex| {
        let date = fixed(lex, layout::DATE_WIDTH, FieldId::Date)?;
        expect_shape(date.is_digits(), FieldId::Date, Shape::Digits)?;
        expect_separator(&date, FieldId::Date)?;

        let time = fixed(lex, layout::TIME_WIDTH, FieldId::Time)?;
        expect_shape(time.kind() == TokenKind::Data, FieldId::Time, Shape::Data)?;
        expect_separator(&time, FieldId::Time)?;

        combine_timestamp(date.content(), time.content())
    })
}

fn combine_timestamp(date: &[u8], time: &[u8]) -> Result<OffsetDateTime, FieldError> {
    let joined = format!(
        "{} {}",
        String::from_utf8_lossy(date),
        String::from_utf8_lossy(time)
    );
    let invalid = |field| FieldError::Timestamp {
        field,
        value: joined.clone(),
    };
    if date.len() != layout::DATE_LEN {
        return Err(invalid(FieldId::Date));
    }
    if time.len() != layout::TIME_LEN {
        return Err(invalid(FieldId::Time));
    }
    let date_format = format_description!("[year][month][day]");
    if Date::parse(&String::from_utf8_lossy(date), date_format).is_err() {
        return Err(invalid(FieldId::Date));
    }
    let format = format_description!("[year][month][day] [hour]:[minute]:[second]");
    match PrimitiveDateTime::parse(&joined, format) {
        Ok(parsed) => Ok(parsed.assume_utc()),
        Err(_) => Err(invalid(FieldId::Time)),
    }
}

/// Serving cell identifier (ST300 style, a single hex token).
pub fn cell<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, String> {
    hex_string(lex, layout::CELL_MAX, FieldId::Cell)
}

pub fn latitude<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, f32> {
    decode(lex, |lex| decimal_field(lex, layout::LATITUDE_MAX, FieldId::Latitude))
}

pub fn longitude<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, f32> {
    decode(lex, |lex| decimal_field(lex, layout::LONGITUDE_MAX, FieldId::Longitude))
}

pub fn speed<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, f32> {
    decode(lex, |lex| decimal_field(lex, layout::SPEED_MAX, FieldId::Speed))
}

pub fn course<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, f32> {
    decode(lex, |lex| decimal_field(lex, layout::COURSE_MAX, FieldId::Course))
}

pub fn satellites<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, u8> {
    small_count(lex, layout::SATELLITES_MAX, FieldId::Satellites)
}

pub fn fix<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, bool> {
    decode(lex, |lex| {
        let token = delimited(lex, layout::FIX_MAX, SEPARATOR, FieldId::Fix)?;
        expect_shape(
            token.kind() == TokenKind::Bit,
            FieldId::Fix,
            Shape::BinaryDigit,
        )?;
        Ok(token.content() == b"1")
    })
}

pub fn distance<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, u32> {
    decode(lex, |lex| {
        let token = digits_field(lex, layout::DISTANCE_MAX, FieldId::Distance)?;
        parse_uint(&token, FieldId::Distance, 32)
    })
}

pub fn power_volt<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, f32> {
    decode(lex, |lex| decimal_field(lex, layout::POWER_VOLT_MAX, FieldId::PowerVolt))
}

/// Input/output state bitmap, kept as the digit string the unit sent.
pub fn io<'a>(lex: &mut Lexer<'a>, max_width: usize) -> Decoded<'a, String> {
    digit_string(lex, max_width, FieldId::Io)
}

pub fn mode<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, Mode> {
    decode(lex, |lex| {
        let token = fixed(lex, layout::MODE_WIDTH, FieldId::Mode)?;
        expect_shape(token.is_digits(), FieldId::Mode, Shape::Digits)?;
        expect_separator(&token, FieldId::Mode)?;
        token
            .content()
            .first()
            .copied()
            .and_then(Mode::from_digit)
            .ok_or_else(|| FieldError::Unrecognized {
                field: FieldId::Mode,
                value: token.text(),
            })
    })
}

/// Four hex digits, parsed base 16.
pub fn msg_num<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, u16> {
    decode(lex, |lex| {
        let token = fixed(lex, layout::MSG_NUM_WIDTH, FieldId::MsgNum)?;
        expect_shape(token.is_hex(), FieldId::MsgNum, Shape::Hex)?;
        expect_separator(&token, FieldId::MsgNum)?;
        let text = content_str(&token, FieldId::MsgNum, Shape::Hex)?;
        u16::from_str_radix(text, 16).map_err(|_| FieldError::Range {
            field: FieldId::MsgNum,
            bits: 16,
        })
    })
}

pub fn hour_meter<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, u32> {
    decode(lex, |lex| {
        let token = digits_field(lex, layout::HOUR_METER_MAX, FieldId::HourMeter)?;
        parse_uint(&token, FieldId::HourMeter, 32)
    })
}

pub fn backup_volt<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, f32> {
    decode(lex, |lex| decimal_field(lex, layout::BACKUP_VOLT_MAX, FieldId::BackupVolt))
}

/// Real-time (`1`) or stored (`0`) flag.
///
/// When `last` is set the field closes the frame and must end with the
/// terminator; otherwise it must end with a separator.
pub fn msg_type<'a>(lex: &mut Lexer<'a>, last: bool) -> Decoded<'a, bool> {
    decode(lex, |lex| {
        let token = fixed(lex, layout::MSG_TYPE_WIDTH, FieldId::MsgType)?;
        expect_shape(
            token.kind() == TokenKind::Bit,
            FieldId::MsgType,
            Shape::BinaryDigit,
        )?;
        if last {
            expect_end_of_frame(&token, FieldId::MsgType)?;
        } else {
            expect_separator(&token, FieldId::MsgType)?;
        }
        Ok(token.content() == b"1")
    })
}

pub fn emergency_id<'a>(lex: &mut Lexer<'a>) -> Decoded<'a, EmergencyKind> {
    decode(lex, |lex| {
        let token = digits_field(lex, layout::EMERGENCY_ID_MAX, FieldId::EmergencyId)?;
        let code: u8 = parse_uint(&token, FieldId::EmergencyId, 8)?;
        EmergencyKind::from_code(code).ok_or_else(|| FieldError::Unrecognized {
            field: FieldId::EmergencyId,
            value: token.text(),
        })
    })
}

/// Numeric event or alert code.
pub fn report_id<'a>(lex: &mut Lexer<'a>, field: FieldId) -> Decoded<'a, u8> {
    small_count(lex, layout::REPORT_ID_MAX, field)
}

pub fn hex_string<'a>(lex: &mut Lexer<'a>, max_width: usize, field: FieldId) -> Decoded<'a, String> {
    decode(lex, |lex| {
        let token = delimited(lex, max_width, SEPARATOR, field)?;
        expect_shape(token.is_hex(), field, Shape::Hex)?;
        Ok(token.text())
    })
}

pub fn digit_string<'a>(
    lex: &mut Lexer<'a>,
    max_width: usize,
    field: FieldId,
) -> Decoded<'a, String> {
    decode(lex, |lex| Ok(digits_field(lex, max_width, field)?.text()))
}

pub fn small_count<'a>(lex: &mut Lexer<'a>, max_width: usize, field: FieldId) -> Decoded<'a, u8> {
    decode(lex, |lex| {
        let token = digits_field(lex, max_width, field)?;
        parse_uint(&token, field, 8)
    })
}

/// Rest of the frame up to the terminator, uninterpreted.
pub fn unknown_tail<'a>(lex: &mut Lexer<'a>, max_width: usize) -> Decoded<'a, String> {
    decode(lex, |lex| {
        let token = delimited(lex, max_width, END_OF_FRAME, FieldId::Tail)?;
        Ok(token.text())
    })
}
