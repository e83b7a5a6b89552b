//! Clause dispatcher.
//!
//! A [`PatternFn`] is an ordered list of compiled clauses plus a handle to
//! the scope it was defined in. Calling it tries each clause's pattern in
//! definition order; the first that matches runs its body with the captured
//! bindings and that result is the call's result. When none match the call
//! fails with [`CallError::Mismatch`].
//!
//! # Building
//!
//! ```text
//! let len = PatternFn::builder("len", &types)
//!     .scope(globals.clone())
//!     .clause("[]", |_| Ok(Value::int(0)))
//!     .clause("[_] + xs", |frame| {
//!         let rest = frame.call(frame.get("xs")?)?;
//!         Ok(evaluate_binary(rest, Value::int(1), BinaryOp::Add)?)
//!     })
//!     .build()?;
//! ```
//!
//! All patterns are compiled by `build`, so a malformed clause is reported
//! before the function exists.

mod frame;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use clausal_ir::{Name, Pattern, TypeTable, Value};
use clausal_parse::{compile_pattern, CompileOptions};
use clausal_stack::ensure_sufficient_stack;

use crate::matcher::match_pattern;
use crate::{CallError, DefinitionError, DispatchConfig, Resolver, Scope};

pub use frame::Frame;

/// A clause body. Receives the frame of the call that selected its clause.
pub type Body = Arc<dyn Fn(&Frame<'_>) -> Result<Value, CallError> + Send + Sync>;

/// One compiled clause.
pub struct Clause {
    pattern: Pattern,
    source: String,
    body: Body,
}

impl Clause {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// Pattern text as written at definition.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Clause")
            .field("source", &self.source)
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// A function defined by pattern-matching clauses.
///
/// Cheap to clone; clones share the compiled clause list, which is never
/// mutated after `build`.
#[derive(Clone)]
pub struct PatternFn {
    name: Name,
    clauses: Arc<[Clause]>,
    resolver: Arc<dyn Resolver>,
    config: DispatchConfig,
}

impl PatternFn {
    pub fn builder<'t>(name: &str, types: &'t TypeTable) -> PatternFnBuilder<'t> {
        PatternFnBuilder {
            name: Name::new(name),
            types,
            resolver: None,
            options: CompileOptions::default(),
            config: DispatchConfig::from_env(),
            clauses: Vec::new(),
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn config(&self) -> DispatchConfig {
        self.config
    }

    /// Call the function with `argument`.
    pub fn invoke(&self, argument: Value) -> Result<Value, CallError> {
        self.invoke_at(argument, 0)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(function = %self.name, depth = depth))]
    pub(crate) fn invoke_at(&self, argument: Value, depth: usize) -> Result<Value, CallError> {
        ensure_sufficient_stack(|| {
            debug!(argument = %argument, "invoke");
            for (index, clause) in self.clauses.iter().enumerate() {
                match match_pattern(&clause.pattern, &argument) {
                    Ok(bindings) => {
                        debug!(clause = index, pattern = %clause.source, "selected clause");
                        let frame = Frame::new(self, &argument, bindings, depth);
                        return (clause.body)(&frame);
                    }
                    Err(failure) => {
                        trace!(
                            clause = index,
                            pattern = %clause.source,
                            %failure,
                            "clause rejected"
                        );
                    }
                }
            }
            debug!(argument = %argument, "no clause matched");
            Err(CallError::Mismatch {
                function: self.name.clone(),
                value: argument,
            })
        })
    }

    pub(crate) fn resolve(&self, name: &str) -> Option<Value> {
        self.resolver.resolve(name)
    }
}

impl fmt::Debug for PatternFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternFn")
            .field("name", &self.name)
            .field("clauses", &self.clauses)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Collects clauses for a [`PatternFn`]. Nothing is compiled until `build`.
pub struct PatternFnBuilder<'t> {
    name: Name,
    types: &'t TypeTable,
    resolver: Option<Arc<dyn Resolver>>,
    options: CompileOptions,
    config: DispatchConfig,
    clauses: Vec<(String, Body)>,
}

impl PatternFnBuilder<'_> {
    /// Scope that free names in bodies resolve against, at call time.
    #[must_use]
    pub fn scope(self, scope: Scope) -> Self {
        self.resolver(scope)
    }

    /// Any other name-resolution service.
    #[must_use]
    pub fn resolver(mut self, resolver: impl Resolver + 'static) -> Self {
        self.resolver = Some(Arc::new(resolver));
        self
    }

    #[must_use]
    pub fn options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the dispatch policy. Without this the builder uses
    /// [`DispatchConfig::from_env`].
    #[must_use]
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Append a clause. Clauses are tried in the order they are added.
    #[must_use]
    pub fn clause<F>(mut self, pattern: impl Into<String>, body: F) -> Self
    where
        F: Fn(&Frame<'_>) -> Result<Value, CallError> + Send + Sync + 'static,
    {
        self.clauses.push((pattern.into(), Arc::new(body)));
        self
    }

    /// Compile every clause, failing on the first malformed one.
    #[tracing::instrument(level = "debug", skip_all, fields(function = %self.name))]
    pub fn build(self) -> Result<PatternFn, DefinitionError> {
        let mut clauses = Vec::with_capacity(self.clauses.len());
        for (index, (source, body)) in self.clauses.into_iter().enumerate() {
            match compile_pattern(&source, self.types, &self.options) {
                Ok(pattern) => clauses.push(Clause {
                    pattern,
                    source,
                    body,
                }),
                Err(error) => {
                    return Err(DefinitionError {
                        function: self.name,
                        clause: index,
                        source_text: source,
                        error,
                    });
                }
            }
        }
        debug!(clauses = clauses.len(), "defined");
        Ok(PatternFn {
            name: self.name,
            clauses: clauses.into(),
            resolver: self.resolver.unwrap_or_else(|| Arc::new(Scope::global())),
            config: self.config,
        })
    }
}
