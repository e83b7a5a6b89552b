//! Lexer for pattern expressions using logos.
//!
//! Pattern text uses the host's literal syntax: numbers, quoted strings,
//! `True`/`False`/`None`, identifiers, brackets, `,` `:` `+` `-` and the
//! `is` keyword. Whitespace (including newlines) is insignificant.

mod escape;
mod token;

use logos::Logos;

use clausal_ir::{Name, Span};

pub use token::{Token, TokenKind, TokenList};

/// Raw token from logos, before string cooking and identifier wrapping.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
enum RawToken {
    #[token("True")]
    True,
    #[token("False")]
    False,
    #[token("None")]
    None,
    #[token("is")]
    Is,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,

    #[regex(r"[0-9][0-9_]*", |lex| lex.slice().replace('_', "").parse::<u64>().ok())]
    Int(u64),

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?", |lex| {
        lex.slice().replace('_', "").parse::<f64>().ok()
    })]
    Float(f64),

    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    DoubleQuoted,

    #[regex(r"'([^'\\\n\r]|\\.)*'")]
    SingleQuoted,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Lex a pattern expression into tokens, always ending with `Eof`.
///
/// Unrecognized input becomes `TokenKind::Error` tokens; the parser reports
/// them, so lexing itself never fails.
pub fn lex(source: &str) -> TokenList {
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::try_from_range(lexer.span()).unwrap_or(Span::DUMMY);
        let kind = match result {
            Ok(raw) => convert_token(raw, lexer.slice()),
            Err(()) => TokenKind::Error,
        };
        tokens.push(Token::new(kind, span));
    }

    let eof = u32::try_from(source.len()).unwrap_or(u32::MAX);
    tokens.push(Token::new(TokenKind::Eof, Span::point(eof)));
    TokenList::new(tokens)
}

fn convert_token(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::None => TokenKind::None,
        RawToken::Is => TokenKind::Is,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Int(n) => TokenKind::Int(n),
        RawToken::Float(f) => TokenKind::Float(f),
        RawToken::DoubleQuoted | RawToken::SingleQuoted => {
            // Both regexes guarantee the surrounding quote characters.
            let content = &slice[1..slice.len() - 1];
            match escape::cook_string(content) {
                Some(text) => TokenKind::Str(text),
                None => TokenKind::Error,
            }
        }
        RawToken::Ident => TokenKind::Ident(Name::new(slice)),
    }
}
