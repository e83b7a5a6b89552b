use clausal_ir::{Span, Value};
use clausal_lexer::TokenKind;

use crate::{Parser, PatternError};

impl Parser<'_> {
    /// `literal := INT | FLOAT | '-' (INT | FLOAT) | STRING | 'True' | 'False' | 'None'`
    pub(super) fn parse_literal(&mut self) -> Result<(Value, Span), PatternError> {
        let token = self.cursor.advance();
        let value = match &token.kind {
            TokenKind::Int(n) => Value::int(int_literal(*n, false, token.span)?),
            TokenKind::Float(x) => Value::float(*x),
            TokenKind::Str(s) => Value::string(s.as_str()),
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),
            TokenKind::None => Value::None,
            TokenKind::Minus => return self.parse_negative(token.span),
            TokenKind::Error => return Err(PatternError::invalid_token(token.span)),
            other => {
                return Err(PatternError::malformed(
                    format!("expected a literal, found {other}"),
                    token.span,
                ))
            }
        };
        Ok((value, token.span))
    }

    fn parse_negative(&mut self, minus: Span) -> Result<(Value, Span), PatternError> {
        let token = self.cursor.current();
        let span = minus.merge(token.span);
        let value = match token.kind {
            TokenKind::Int(n) => Value::int(int_literal(n, true, span)?),
            TokenKind::Float(x) => Value::float(-x),
            _ => return Err(self.cursor.found("a number after `-`")),
        };
        self.cursor.advance();
        Ok((value, span))
    }
}

/// Fit a lexed magnitude into `i64`, allowing `-9223372036854775808`.
fn int_literal(magnitude: u64, negative: bool, span: Span) -> Result<i64, PatternError> {
    let value = if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    };
    value.ok_or_else(|| PatternError::malformed("integer literal out of range", span))
}
