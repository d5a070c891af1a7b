//! Per-family decoder tables.
//!
//! The core (`lexer`, `fields`, `frame`) knows how to decode individual
//! fields and how to drive a table; this module supplies the tables. Each
//! family module exposes a `registry()` that maps its message types to
//! pipelines built from the shared steps in `common`.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

use crate::frame::Registry;

pub(crate) mod common;
pub mod st300;
pub mod st600;

/// Supported device families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    St300,
    St600,
}

impl Family {
    pub const ALL: [Family; 2] = [Family::St300, Family::St600];

    /// Header prefix identifying the family, e.g. `ST300`.
    pub fn prefix(self) -> &'static str {
        match self {
            Family::St300 => st300::PREFIX,
            Family::St600 => st600::PREFIX,
        }
    }

    pub fn registry(self) -> Registry {
        match self {
            Family::St300 => st300::registry(),
            Family::St600 => st600::registry(),
        }
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown device family '{0}' (expected st300 or st600)")]
pub struct UnknownFamily(pub String);

impl FromStr for Family {
    type Err = UnknownFamily;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Family::ALL
            .into_iter()
            .find(|family| family.prefix().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFamily(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{Family, UnknownFamily};
    use crate::frame::MsgType;

    #[test]
    fn family_names_parse_case_insensitively() {
        assert_eq!("st300".parse::<Family>(), Ok(Family::St300));
        assert_eq!("ST600".parse::<Family>(), Ok(Family::St600));
        assert_eq!(
            "st900".parse::<Family>(),
            Err(UnknownFamily("st900".to_string()))
        );
    }

    #[test]
    fn display_matches_header_prefix() {
        assert_eq!(Family::St300.to_string(), "ST300");
        assert_eq!(Family::St600.registry().prefix(), "ST600");
    }

    #[test]
    fn registries_cover_their_message_types() {
        assert_eq!(Family::St300.registry().msg_types(), MsgType::ALL.to_vec());
        assert_eq!(
            Family::St600.registry().msg_types(),
            vec![MsgType::Status, MsgType::Emergency, MsgType::Alive]
        );
    }
}
