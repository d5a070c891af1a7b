/// Content classification assigned when a token is extracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Anything that is not one of the shapes below.
    Data,
    /// Signed decimal number: `[+-]?digits(.digits)?`.
    Decimal,
    /// Exactly one `0` or `1`.
    Bit,
}

/// Immutable view of one field's bytes, trailing delimiter included.
///
/// # Examples
/// ```
/// use stframe_core::lexer::{Token, TokenKind};
///
/// let token = Token::new(b"-33.363867;");
/// assert_eq!(token.kind(), TokenKind::Decimal);
/// assert_eq!(token.content(), b"-33.363867");
/// assert!(token.ends_with(b';'));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    literal: &'a [u8],
    kind: TokenKind,
}

impl<'a> Token<'a> {
    pub fn new(literal: &'a [u8]) -> Self {
        let kind = classify(content_of(literal));
        Self { literal, kind }
    }

    pub fn literal(&self) -> &'a [u8] {
        self.literal
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.literal.len()
    }

    pub fn is_empty(&self) -> bool {
        self.literal.is_empty()
    }

    /// Token bytes without the trailing delimiter or terminator.
    pub fn content(&self) -> &'a [u8] {
        content_of(self.literal)
    }

    pub fn ends_with(&self, byte: u8) -> bool {
        self.literal.last() == Some(&byte)
    }

    pub fn is_digits(&self) -> bool {
        let content = self.content();
        !content.is_empty() && content.iter().all(u8::is_ascii_digit)
    }

    pub fn is_hex(&self) -> bool {
        let content = self.content();
        !content.is_empty() && content.iter().all(u8::is_ascii_hexdigit)
    }

    /// Decimal-shaped, counting a lone binary digit as a decimal number.
    pub fn is_decimal(&self) -> bool {
        matches!(self.kind, TokenKind::Decimal | TokenKind::Bit)
    }

    /// Content as text; tokens are ASCII on the wire, anything else is replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(self.content()).into_owned()
    }
}

fn content_of(literal: &[u8]) -> &[u8] {
    match literal.split_last() {
        Some((_, content)) => content,
        None => literal,
    }
}

fn classify(content: &[u8]) -> TokenKind {
    if matches!(content, [b'0'] | [b'1']) {
        return TokenKind::Bit;
    }
    if is_decimal_shape(content) {
        return TokenKind::Decimal;
    }
    TokenKind::Data
}

fn is_decimal_shape(content: &[u8]) -> bool {
    let unsigned = match content.first() {
        Some(b'-') | Some(b'+') => &content[1..],
        _ => content,
    };
    let (int_part, frac_part) = match unsigned.iter().position(|b| *b == b'.') {
        Some(dot) => (&unsigned[..dot], Some(&unsigned[dot + 1..])),
        None => (unsigned, None),
    };
    let all_digits = |part: &[u8]| !part.is_empty() && part.iter().all(u8::is_ascii_digit);
    all_digits(int_part) && frac_part.is_none_or(all_digits)
}
