//! Tokenizer over a single frame.
//!
//! The `Lexer` is a forward-only cursor: every successful read advances it,
//! and nothing is ever rolled back. Tokens borrow from the frame buffer and
//! are classified at extraction time so field decoders only check shapes.

pub mod error;
pub mod reader;
pub mod token;

pub use error::LexError;
pub use reader::Lexer;
pub use token::{Token, TokenKind};
