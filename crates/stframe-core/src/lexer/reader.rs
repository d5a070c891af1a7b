use super::error::LexError;
use super::token::Token;

/// Forward-only cursor over one frame's bytes.
///
/// # Examples
/// ```
/// use stframe_core::lexer::Lexer;
///
/// let mut lexer = Lexer::new(b"205951725;20;");
/// let id = lexer.read_fixed(10).unwrap();
/// assert_eq!(id.content(), b"205951725");
/// let model = lexer.read_until(4, b';').unwrap();
/// assert_eq!(model.literal(), b"20;");
/// assert!(lexer.is_at_end());
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    /// Bytes consumed since `start`, a position previously read from this lexer.
    pub fn consumed_since(&self, start: usize) -> &'a [u8] {
        self.input.get(start..self.position).unwrap_or_default()
    }

    /// Bytes not consumed yet.
    pub fn rest(&self) -> &'a [u8] {
        &self.input[self.position..]
    }

    /// Consume exactly `width` bytes.
    ///
    /// # Errors
    /// Returns `LexError::UnexpectedEndOfInput` when fewer than `width` bytes
    /// remain; the cursor does not move in that case.
    pub fn read_fixed(&mut self, width: usize) -> Result<Token<'a>, LexError> {
        let literal = self
            .position
            .checked_add(width)
            .and_then(|end| self.input.get(self.position..end))
            .ok_or(LexError::UnexpectedEndOfInput {
                needed: width,
                remaining: self.remaining(),
            })?;
        let end = self.position + literal.len();
        self.position = end;
        Ok(Token::new(literal))
    }

    /// Consume bytes up to and including `delimiter`, scanning at most
    /// `max_width` bytes.
    ///
    /// # Errors
    /// Returns `LexError::DelimiterNotFound` when the delimiter does not occur
    /// within the window; the cursor does not move in that case.
    pub fn read_until(&mut self, max_width: usize, delimiter: u8) -> Result<Token<'a>, LexError> {
        let window_end = self.position.saturating_add(max_width).min(self.input.len());
        let window = &self.input[self.position..window_end];
        let found = window
            .iter()
            .position(|b| *b == delimiter)
            .ok_or(LexError::DelimiterNotFound {
                delimiter,
                max_width,
            })?;
        let end = self.position + found + 1;
        let literal = &self.input[self.position..end];
        self.position = end;
        Ok(Token::new(literal))
    }
}

#[cfg(test)]
mod tests {
    use super::Lexer;
    use crate::lexer::{LexError, TokenKind};

    #[test]
    fn read_fixed_advances_by_width() {
        let mut lexer = Lexer::new(b"20151223;13:32:30;");
        let date = lexer.read_fixed(9).unwrap();
        assert_eq!(date.literal(), b"20151223;");
        assert_eq!(lexer.position(), 9);
        let time = lexer.read_fixed(9).unwrap();
        assert_eq!(time.kind(), TokenKind::Data);
        assert!(lexer.is_at_end());
    }

    #[test]
    fn read_fixed_truncated_does_not_advance() {
        let mut lexer = Lexer::new(b"2059;");
        let err = lexer.read_fixed(10).unwrap_err();
        assert_eq!(
            err,
            LexError::UnexpectedEndOfInput {
                needed: 10,
                remaining: 5
            }
        );
        assert_eq!(lexer.position(), 0);
    }

    #[test]
    fn read_fixed_advances_even_when_content_is_bad() {
        let mut lexer = Lexer::new(b"abc;x");
        let token = lexer.read_fixed(4).unwrap();
        assert!(!token.is_digits());
        assert_eq!(lexer.remaining(), 1);
    }

    #[test]
    fn read_until_includes_delimiter() {
        let mut lexer = Lexer::new(b"-33.363867;-070.670218;");
        let lat = lexer.read_until(11, b';').unwrap();
        assert_eq!(lat.literal(), b"-33.363867;");
        assert_eq!(lat.kind(), TokenKind::Decimal);
        let lon = lexer.read_until(12, b';').unwrap();
        assert_eq!(lon.content(), b"-070.670218");
        assert!(lexer.is_at_end());
    }

    #[test]
    fn read_until_respects_max_width() {
        let mut lexer = Lexer::new(b"123456789;");
        let err = lexer.read_until(9, b';').unwrap_err();
        assert_eq!(
            err,
            LexError::DelimiterNotFound {
                delimiter: b';',
                max_width: 9
            }
        );
        assert_eq!(lexer.position(), 0);
        assert!(lexer.read_until(10, b';').is_ok());
    }

    #[test]
    fn oversized_widths_fail_without_overflow() {
        let mut lexer = Lexer::new(b"a;0.00\r");
        lexer.read_fixed(2).unwrap();
        assert_eq!(
            lexer.read_fixed(usize::MAX),
            Err(LexError::UnexpectedEndOfInput {
                needed: usize::MAX,
                remaining: 5
            })
        );
        assert_eq!(lexer.position(), 2);

        let tail = lexer.read_until(usize::MAX, b'\r').unwrap();
        assert_eq!(tail.content(), b"0.00");
        assert!(lexer.is_at_end());
        assert!(matches!(
            lexer.read_until(usize::MAX, b'\r'),
            Err(LexError::DelimiterNotFound { .. })
        ));
    }

    #[test]
    fn consumed_since_spans_several_tokens() {
        let mut lexer = Lexer::new(b"20151223;13:32:30;rest");
        let start = lexer.position();
        lexer.read_fixed(9).unwrap();
        lexer.read_fixed(9).unwrap();
        assert_eq!(lexer.consumed_since(start), b"20151223;13:32:30;");
        assert_eq!(lexer.rest(), b"rest");
    }

    #[test]
    fn read_until_stops_at_end_of_input() {
        let mut lexer = Lexer::new(b"0.00");
        assert!(matches!(
            lexer.read_until(11, b'\r'),
            Err(LexError::DelimiterNotFound { .. })
        ));
    }
}
