//! Recursive-descent productions.
//!
//! `parse_pattern` is the entry point for every nested position; it grows the
//! stack as needed, so nesting depth is not limited by the native stack.

mod container;
mod literal;

use clausal_ir::{Name, Pattern, PatternKind, RestBinding, Span, TypeRef};
use clausal_lexer::TokenKind;
use clausal_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::{Parser, PatternError, PatternErrorKind};

impl Parser<'_> {
    /// `pattern := guarded | concat`
    pub(crate) fn parse_pattern(&mut self) -> Result<Pattern, PatternError> {
        ensure_sufficient_stack(|| {
            let is_guard = matches!(self.cursor.current_kind(), TokenKind::Ident(_))
                && matches!(self.cursor.peek_next_kind(), TokenKind::Is);
            if is_guard {
                self.parse_type_guard()
            } else {
                self.parse_concat()
            }
        })
    }

    /// `guarded := IDENT 'is' typeset`
    fn parse_type_guard(&mut self) -> Result<Pattern, PatternError> {
        let (name, name_span) = self.cursor.expect_ident("a name")?;
        self.cursor.advance(); // `is`

        let mut types = Vec::new();
        let end = if let Some(open) = self.cursor.eat(&TokenKind::LParen) {
            let (names, _, close) = self.comma_separated(&TokenKind::RParen, "a type name", |p| {
                p.cursor.expect_ident("a type name")
            })?;
            if names.is_empty() {
                return Err(PatternError::malformed(
                    "type guard needs at least one type",
                    open.merge(close),
                ));
            }
            for (type_name, span) in names {
                types.push(self.resolve_type(&type_name, span)?);
            }
            close
        } else {
            let (type_name, span) = self.cursor.expect_ident("a type name")?;
            types.push(self.resolve_type(&type_name, span)?);
            span
        };

        trace!(%name, count = types.len(), "type guard");
        let name = (!self.is_wildcard(&name)).then_some(name);
        Ok(Pattern::new(
            PatternKind::TypeGuard { name, types },
            name_span.merge(end),
        ))
    }

    fn resolve_type(&self, name: &Name, span: Span) -> Result<TypeRef, PatternError> {
        self.types.lookup(name.as_str()).ok_or_else(|| {
            PatternError::new(PatternErrorKind::UnknownType { name: name.clone() }, span)
        })
    }

    /// `concat := primary ('+' primary)*`
    ///
    /// Every operand but the last must be a list or tuple pattern without a
    /// rest, all of one kind; their elements are flattened into one head. The
    /// last operand is either another such sequence or the rest name.
    fn parse_concat(&mut self) -> Result<Pattern, PatternError> {
        let first = self.parse_primary()?;
        if !self.cursor.check(&TokenKind::Plus) {
            return Ok(first);
        }

        let start = first.span;
        let mut end = first.span;
        let PatternKind::Sequence {
            kind,
            elements: mut head,
            rest: None,
        } = first.kind
        else {
            return Err(PatternError::malformed(
                "left side of `+` must be a list or tuple pattern",
                first.span,
            ));
        };

        let mut rest = None;
        while self.cursor.eat(&TokenKind::Plus).is_some() {
            if rest.is_some() {
                return Err(PatternError::malformed(
                    "rest name must be the last operand of `+`",
                    self.cursor.current_span(),
                ));
            }
            let operand = self.parse_primary()?;
            let span = operand.span;
            end = span;
            match operand.kind {
                PatternKind::Sequence {
                    kind: operand_kind,
                    elements,
                    rest: operand_rest,
                } if operand_kind == kind => {
                    head.extend(elements);
                    rest = operand_rest;
                }
                PatternKind::Sequence {
                    kind: operand_kind, ..
                } => {
                    return Err(PatternError::malformed(
                        format!(
                            "cannot concatenate a {} pattern with a {} pattern",
                            kind.name(),
                            operand_kind.name()
                        ),
                        span,
                    ));
                }
                PatternKind::Capture(name) => rest = Some(RestBinding::Capture(name)),
                PatternKind::Wildcard => rest = Some(RestBinding::Wildcard),
                _ => {
                    return Err(PatternError::malformed(
                        "right side of `+` must be a name or a sequence pattern",
                        span,
                    ));
                }
            }
        }

        trace!(
            kind = kind.name(),
            head = head.len(),
            has_rest = rest.is_some(),
            "head/rest pattern"
        );
        Ok(Pattern::new(
            PatternKind::Sequence {
                kind,
                elements: head,
                rest,
            },
            start.merge(end),
        ))
    }

    /// `primary := literal | IDENT | list | tuple | record`
    fn parse_primary(&mut self) -> Result<Pattern, PatternError> {
        let token = self.cursor.current();
        match &token.kind {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                let kind = if self.is_wildcard(name) {
                    PatternKind::Wildcard
                } else {
                    PatternKind::Capture(name.clone())
                };
                Ok(Pattern::new(kind, token.span))
            }
            TokenKind::LBracket => self.parse_list(),
            TokenKind::LParen => self.parse_paren(),
            TokenKind::LBrace => self.parse_record(),
            kind if kind.is_literal_start() => {
                let (value, span) = self.parse_literal()?;
                Ok(Pattern::new(PatternKind::Literal(value), span))
            }
            _ => Err(self.cursor.found("a pattern")),
        }
    }
}
