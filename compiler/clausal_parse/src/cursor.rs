//! Token cursor for the pattern parser.

use clausal_ir::{Name, Span};
use clausal_lexer::{Token, TokenKind, TokenList};

use crate::PatternError;

/// Position in a token list. The list always ends with `Eof`, and the
/// cursor never moves past it.
pub(crate) struct Cursor<'a> {
    tokens: &'a TokenList,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(tokens: &'a TokenList) -> Self {
        Cursor { tokens, pos: 0 }
    }

    #[inline]
    pub(crate) fn current(&self) -> &'a Token {
        self.tokens.get_or_eof(self.pos)
    }

    #[inline]
    pub(crate) fn current_kind(&self) -> &'a TokenKind {
        &self.current().kind
    }

    #[inline]
    pub(crate) fn current_span(&self) -> Span {
        self.current().span
    }

    /// Kind of the token after the current one.
    #[inline]
    pub(crate) fn peek_next_kind(&self) -> &'a TokenKind {
        &self.tokens.get_or_eof(self.pos + 1).kind
    }

    #[inline]
    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    #[inline]
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.current_kind() == kind
    }

    /// Move to the next token, returning the one just passed.
    pub(crate) fn advance(&mut self) -> &'a Token {
        let token = self.current();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    /// Consume `kind` if it is current.
    pub(crate) fn eat(&mut self, kind: &TokenKind) -> Option<Span> {
        if self.check(kind) {
            Some(self.advance().span)
        } else {
            None
        }
    }

    /// Consume an identifier, or report what was found instead.
    pub(crate) fn expect_ident(&mut self, what: &str) -> Result<(Name, Span), PatternError> {
        match self.current_kind() {
            TokenKind::Ident(name) => {
                let span = self.advance().span;
                Ok((name.clone(), span))
            }
            _ => Err(self.found(what)),
        }
    }

    /// Error describing the current token as not being `what`.
    pub(crate) fn found(&self, what: &str) -> PatternError {
        let token = self.current();
        match token.kind {
            TokenKind::Error => PatternError::invalid_token(token.span),
            _ => PatternError::malformed(
                format!("expected {what}, found {}", token.kind),
                token.span,
            ),
        }
    }
}
