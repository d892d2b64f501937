//! Entry points for hosts.
//!
//! ```text
//! let program = Program::new(arena, root);
//! let bindings = Bindings::new().with("user", "Ada").with("count", 3);
//! let value = evaluate(&program, bindings)?;
//! ```

use std::io;

use quill_ir::{Program, Symbol};

use crate::context::EvalContext;
use crate::errors::EvalResult;
use crate::output::Output;
use crate::Value;

/// Initial named values for an execution. Bound as mutable variables in the
/// innermost root scope; a later binding of the same name wins.
#[derive(Clone, Debug, Default)]
pub struct Bindings(Vec<(Symbol, Value)>);

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.0.push((Symbol::intern(name), value.into()));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Symbol, &Value)> {
        self.0.iter().map(|(name, value)| (name, value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: AsRef<str>, V: Into<Value>> FromIterator<(N, V)> for Bindings {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        Bindings(
            iter.into_iter()
                .map(|(name, value)| (Symbol::intern(name.as_ref()), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Bindings {
    type Item = (Symbol, Value);
    type IntoIter = std::vec::IntoIter<(Symbol, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Evaluate `program` and return its final value. Template output is
/// discarded.
pub fn evaluate(program: &Program, bindings: Bindings) -> EvalResult {
    EvalContext::builder(program)
        .bindings(bindings)
        .build()
        .run()
}

/// Evaluate `program`, writing template text and `${..}` emits to `out` as
/// evaluation proceeds.
pub fn evaluate_streaming(
    program: &Program,
    bindings: Bindings,
    out: &mut dyn io::Write,
) -> EvalResult {
    EvalContext::builder(program)
        .bindings(bindings)
        .output(Output::Writer(out))
        .build()
        .run()
}
