//! List, tuple and record patterns.

use clausal_ir::{ContainerKind, Pattern, PatternKind, Span, Value};
use clausal_lexer::TokenKind;
use tracing::trace;

use crate::{Parser, PatternError, PatternErrorKind};

impl Parser<'_> {
    /// Items separated by commas up to `close`, trailing comma allowed.
    ///
    /// The opening delimiter has already been consumed. Returns the items,
    /// whether a trailing comma was present, and the span of `close`.
    pub(super) fn comma_separated<T>(
        &mut self,
        close: &TokenKind,
        what: &str,
        mut item: impl FnMut(&mut Self) -> Result<T, PatternError>,
    ) -> Result<(Vec<T>, bool, Span), PatternError> {
        let mut items = Vec::new();
        let mut trailing = false;
        loop {
            if let Some(span) = self.cursor.eat(close) {
                return Ok((items, trailing, span));
            }
            items.push(item(self)?);
            if let Some(span) = self.cursor.eat(close) {
                return Ok((items, false, span));
            }
            if self.cursor.eat(&TokenKind::Comma).is_none() {
                return Err(self.cursor.found(&format!("`,` or {close} after {what}")));
            }
            trailing = true;
        }
    }

    /// `list := '[' (pattern (',' pattern)* ','?)? ']'`
    pub(super) fn parse_list(&mut self) -> Result<Pattern, PatternError> {
        let open = self.cursor.advance().span;
        let (elements, _, close) =
            self.comma_separated(&TokenKind::RBracket, "list element", Self::parse_pattern)?;
        trace!(len = elements.len(), "list pattern");
        Ok(Pattern::new(
            PatternKind::Sequence {
                kind: ContainerKind::List,
                elements,
                rest: None,
            },
            open.merge(close),
        ))
    }

    /// Tuple pattern or parenthesized grouping.
    ///
    /// `()` is the empty tuple, `(p,)` a one-tuple and `(p)` is just `p`.
    pub(super) fn parse_paren(&mut self) -> Result<Pattern, PatternError> {
        let open = self.cursor.advance().span;
        let (mut elements, trailing, close) =
            self.comma_separated(&TokenKind::RParen, "tuple element", Self::parse_pattern)?;
        let span = open.merge(close);

        if elements.len() == 1 && !trailing {
            if let Some(inner) = elements.pop() {
                return Ok(Pattern::new(inner.kind, span));
            }
        }

        trace!(len = elements.len(), "tuple pattern");
        Ok(Pattern::new(
            PatternKind::Sequence {
                kind: ContainerKind::Tuple,
                elements,
                rest: None,
            },
            span,
        ))
    }

    /// `record := '{' (literal ':' pattern (',' literal ':' pattern)* ','?)? '}'`
    pub(super) fn parse_record(&mut self) -> Result<Pattern, PatternError> {
        let open = self.cursor.advance().span;
        let mut seen: Vec<Value> = Vec::new();
        let (fields, _, close) =
            self.comma_separated(&TokenKind::RBrace, "record field", |p| {
                let (key, key_span) = p.parse_record_key()?;
                if seen.contains(&key) {
                    return Err(PatternError::new(
                        PatternErrorKind::DuplicateKey { key: key.repr() },
                        key_span,
                    ));
                }
                seen.push(key.clone());
                if p.cursor.eat(&TokenKind::Colon).is_none() {
                    return Err(p.cursor.found("`:` after record key"));
                }
                let pattern = p.parse_pattern()?;
                Ok((key, pattern))
            })?;
        trace!(len = fields.len(), "record pattern");
        Ok(Pattern::new(
            PatternKind::Record { fields },
            open.merge(close),
        ))
    }

    fn parse_record_key(&mut self) -> Result<(Value, Span), PatternError> {
        if self.cursor.current_kind().is_literal_start() {
            self.parse_literal()
        } else {
            Err(self.cursor.found("a literal record key"))
        }
    }
}
