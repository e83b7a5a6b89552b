use std::fmt;
use std::ops::Deref;

use clausal_ir::{Name, Span};

/// Token kinds produced by the lexer.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    /// Unsigned integer literal; a leading `-` is a separate token.
    Int(u64),
    Float(f64),
    /// Cooked string contents, escapes already resolved.
    Str(String),
    Ident(Name),
    True,
    False,
    None,
    Is,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Colon,
    Plus,
    Minus,
    /// Unrecognized input or a string with a bad escape.
    Error,
    Eof,
}

impl TokenKind {
    /// Whether this token can begin a literal value.
    pub fn is_literal_start(&self) -> bool {
        matches!(
            self,
            TokenKind::Int(_)
                | TokenKind::Float(_)
                | TokenKind::Str(_)
                | TokenKind::True
                | TokenKind::False
                | TokenKind::None
                | TokenKind::Minus
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Int(n) => write!(f, "integer `{n}`"),
            TokenKind::Float(x) => write!(f, "float `{x}`"),
            TokenKind::Str(s) => write!(f, "string {s:?}"),
            TokenKind::Ident(name) => write!(f, "identifier `{name}`"),
            TokenKind::True => f.write_str("`True`"),
            TokenKind::False => f.write_str("`False`"),
            TokenKind::None => f.write_str("`None`"),
            TokenKind::Is => f.write_str("`is`"),
            TokenKind::LParen => f.write_str("`(`"),
            TokenKind::RParen => f.write_str("`)`"),
            TokenKind::LBracket => f.write_str("`[`"),
            TokenKind::RBracket => f.write_str("`]`"),
            TokenKind::LBrace => f.write_str("`{`"),
            TokenKind::RBrace => f.write_str("`}`"),
            TokenKind::Comma => f.write_str("`,`"),
            TokenKind::Colon => f.write_str("`:`"),
            TokenKind::Plus => f.write_str("`+`"),
            TokenKind::Minus => f.write_str("`-`"),
            TokenKind::Error => f.write_str("invalid token"),
            TokenKind::Eof => f.write_str("end of pattern"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Lexed tokens of one pattern. Always non-empty: the last token is `Eof`.
#[derive(Clone, Debug, PartialEq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        TokenList { tokens }
    }

    /// Token at `index`, clamped to the trailing `Eof`.
    pub fn get_or_eof(&self, index: usize) -> &Token {
        let last = self.tokens.len().saturating_sub(1);
        &self.tokens[index.min(last)]
    }

    /// Kinds without spans, convenient for assertions.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind.clone()).collect()
    }
}

impl Deref for TokenList {
    type Target = [Token];

    fn deref(&self) -> &[Token] {
        &self.tokens
    }
}
