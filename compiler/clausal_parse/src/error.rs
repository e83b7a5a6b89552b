//! Definition-time pattern errors.
//!
//! A `PatternError` always points at the offending part of the pattern text,
//! so it can be rendered as a source snippet with [`PatternError::render`].

use std::ops::Range;

use ariadne::{Config, IndexType, Label, Report, ReportKind, Source};

use clausal_ir::{Name, Span};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PatternErrorKind {
    /// The text has a shape the compiler cannot translate into a pattern.
    #[error("malformed pattern: {message}")]
    MalformedPattern { message: String },
    /// A type guard names a type the type table does not know.
    #[error("unknown type `{name}`")]
    UnknownType { name: Name },
    /// A record pattern lists the same key twice.
    #[error("duplicate key {key} in record pattern")]
    DuplicateKey { key: String },
    /// The lexer could not make sense of the input.
    #[error("invalid token")]
    InvalidToken,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} (at {span})")]
pub struct PatternError {
    pub kind: PatternErrorKind,
    pub span: Span,
}

impl PatternError {
    pub fn new(kind: PatternErrorKind, span: Span) -> Self {
        PatternError { kind, span }
    }

    pub(crate) fn malformed(message: impl Into<String>, span: Span) -> Self {
        PatternError::new(
            PatternErrorKind::MalformedPattern {
                message: message.into(),
            },
            span,
        )
    }

    pub(crate) fn invalid_token(span: Span) -> Self {
        PatternError::new(PatternErrorKind::InvalidToken, span)
    }

    /// Short label shown under the highlighted source range.
    fn label(&self) -> String {
        match &self.kind {
            PatternErrorKind::MalformedPattern { message } => message.clone(),
            PatternErrorKind::UnknownType { .. } => "not a known type".to_string(),
            PatternErrorKind::DuplicateKey { .. } => "key already used".to_string(),
            PatternErrorKind::InvalidToken => "not valid here".to_string(),
        }
    }

    /// Render as a source diagnostic, without colour codes.
    ///
    /// `source` must be the pattern text this error came from; `origin`
    /// names it in the report header (a function and clause, say).
    pub fn render(&self, source: &str, origin: &str) -> String {
        let range = highlight_range(source, self.span);
        let origin = origin.to_string();
        let report = Report::build(ReportKind::Error, origin.clone(), range.start)
            .with_config(
                Config::default()
                    .with_color(false)
                    .with_index_type(IndexType::Byte),
            )
            .with_message(&self.kind)
            .with_label(Label::new((origin.clone(), range)).with_message(self.label()))
            .finish();

        let mut out = Vec::new();
        match report.write((origin, Source::from(source.to_string())), &mut out) {
            Ok(()) => String::from_utf8_lossy(&out).into_owned(),
            Err(_) => self.to_string(),
        }
    }
}

/// Byte range to underline. Empty spans (end of input) widen to the
/// neighbouring character so the label has something to point at.
fn highlight_range(source: &str, span: Span) -> Range<usize> {
    let len = source.len();
    let range = span.to_range();
    let start = range.start.min(len);
    let end = range.end.min(len);
    if start < end {
        return start..end;
    }
    if let Some(next) = source[start..].chars().next() {
        return start..start + next.len_utf8();
    }
    match source[..start].chars().next_back() {
        Some(prev) => start - prev.len_utf8()..start,
        None => 0..0,
    }
}
