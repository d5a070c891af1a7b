use thiserror::Error;

/// Structural errors raised while slicing a frame into tokens.
///
/// # Examples
/// ```
/// use stframe_core::lexer::LexError;
///
/// let err = LexError::UnexpectedEndOfInput { needed: 10, remaining: 4 };
/// assert!(err.to_string().contains("unexpected end of input"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unexpected end of input: need {needed} bytes, {remaining} remaining")]
    UnexpectedEndOfInput { needed: usize, remaining: usize },
    #[error("delimiter {delimiter:#04x} not found within {max_width} bytes")]
    DelimiterNotFound { delimiter: u8, max_width: usize },
}
