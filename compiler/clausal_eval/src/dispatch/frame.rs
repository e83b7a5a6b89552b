use clausal_ir::{Name, Value};

use crate::{Bindings, CallError, Fault, PatternFn};

/// What a clause body sees: the selected clause's bindings overlaid on the
/// function's defining scope, plus the call itself.
pub struct Frame<'f> {
    function: &'f PatternFn,
    argument: &'f Value,
    bindings: Bindings,
    depth: usize,
}

impl<'f> Frame<'f> {
    pub(super) fn new(
        function: &'f PatternFn,
        argument: &'f Value,
        bindings: Bindings,
        depth: usize,
    ) -> Self {
        Frame {
            function,
            argument,
            bindings,
            depth,
        }
    }

    /// Value of `name`: a capture of this clause, else whatever the
    /// defining scope holds for it right now.
    pub fn lookup(&self, name: &str) -> Option<Value> {
        match self.bindings.get(name) {
            Some(value) => Some(value.clone()),
            None => self.function.resolve(name),
        }
    }

    /// Like [`lookup`](Self::lookup), but an unknown name is a `NameError`
    /// fault raised at the caller's location.
    #[track_caller]
    pub fn get(&self, name: &str) -> Result<Value, Fault> {
        match self.lookup(name) {
            Some(value) => Ok(value),
            None => Err(Fault::name_error(name)),
        }
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// The argument the function was called with.
    pub fn argument(&self) -> &Value {
        self.argument
    }

    /// Nesting of this call: 0 for `invoke`, +1 per `Frame::call`.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn function(&self) -> &'f PatternFn {
        self.function
    }

    pub fn function_name(&self) -> &Name {
        self.function.name()
    }

    /// Call the same function recursively.
    ///
    /// Exceeding the configured depth limit raises a `RecursionLimit` fault
    /// located at this call.
    #[track_caller]
    pub fn call(&self, argument: Value) -> Result<Value, CallError> {
        let depth = self.depth + 1;
        let config = self.function.config();
        if !config.allows_depth(depth) {
            let limit = config.max_depth.unwrap_or(depth);
            return Err(Fault::recursion_limit(self.function.name(), limit).into());
        }
        self.function.invoke_at(argument, depth)
    }
}
