//! Semantic field decoders shared by every report layout.
//!
//! Decoders are type-agnostic: they know a field's width, character class
//! and trailing byte, never where the field sits in a particular report.

pub mod decode;
pub mod error;
pub mod layout;
pub mod types;

pub use decode::Decoded;
pub use error::{FieldError, FieldId, Shape};
pub use types::{EmergencyKind, Header, Mode};
