//! Pattern compiler.
//!
//! Turns the pattern text of one clause into a [`Pattern`] tree. This runs
//! once per clause when a function is defined; the tree is then reused for
//! every call. Every shape the grammar does not accept is rejected here, so
//! a malformed clause can never reach the matcher.
//!
//! ```text
//! pattern  := guarded | concat
//! guarded  := IDENT 'is' typeset
//! typeset  := IDENT | '(' IDENT (',' IDENT)* ','? ')'
//! concat   := primary ('+' primary)*
//! primary  := literal | IDENT | list | tuple | record
//! ```

mod cursor;
mod error;
mod grammar;

use clausal_ir::{Name, Pattern, TypeTable};

use cursor::Cursor;

pub use error::{PatternError, PatternErrorKind};

/// Knobs for pattern compilation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileOptions {
    /// Identifier treated as the non-binding wildcard.
    pub wildcard: Name,
}

impl CompileOptions {
    pub fn with_wildcard(wildcard: &str) -> Self {
        CompileOptions {
            wildcard: Name::new(wildcard),
        }
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        CompileOptions::with_wildcard("_")
    }
}

/// Compile one clause's pattern text.
///
/// Type names in guards are resolved against `types` now, not at call time.
#[tracing::instrument(level = "debug", skip(types, options))]
pub fn compile_pattern(
    source: &str,
    types: &TypeTable,
    options: &CompileOptions,
) -> Result<Pattern, PatternError> {
    let tokens = clausal_lexer::lex(source);
    let mut parser = Parser {
        cursor: Cursor::new(&tokens),
        types,
        options,
    };
    let pattern = parser.parse_clause_pattern()?;
    tracing::debug!(pattern = %pattern, "compiled pattern");
    Ok(pattern)
}

/// Recursive-descent state for one pattern.
struct Parser<'a> {
    cursor: Cursor<'a>,
    types: &'a TypeTable,
    options: &'a CompileOptions,
}

impl Parser<'_> {
    /// A complete pattern followed by end of input.
    fn parse_clause_pattern(&mut self) -> Result<Pattern, PatternError> {
        if self.cursor.is_at_end() {
            return Err(PatternError::malformed(
                "empty pattern",
                self.cursor.current_span(),
            ));
        }
        let pattern = self.parse_pattern()?;
        if !self.cursor.is_at_end() {
            return Err(self.cursor.found("end of pattern"));
        }
        Ok(pattern)
    }

    fn is_wildcard(&self, name: &Name) -> bool {
        *name == self.options.wildcard
    }
}
