//! Internal, host-facing error types.
//!
//! Script-level exceptions (`TypeError`, `RangeError`, ...) are ordinary
//! heap [`Value`](crate::Value)s threaded through [`crate::exec::Completion::Throw`];
//! they never appear here. `EngineError` is what the public API returns when
//! something prevents a script from running at all: a bad heap capacity, a
//! syntax error surfaced to the host rather than caught by script `eval`, or
//! arena exhaustion.

use std::fmt;

use crate::syntax::lexer::LexError;
use crate::syntax::parser::ParseError;

/// The crate's top-level error type, returned by every fallible entry point
/// in [`crate::Context`] and [`crate::syntax`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Source text could not be tokenized.
    #[error("lexer error: {0}")]
    Lex(#[from] LexError),

    /// Source text tokenized but did not match the ES5 grammar, or violated
    /// an early (strict-mode) error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// A script threw and the exception propagated past the outermost
    /// evaluation boundary uncaught.
    #[error("uncaught exception: {0}")]
    Uncaught(String),

    /// The managed heap could not satisfy an allocation request.
    #[error("heap exhausted: requested {requested} bytes, {available} available")]
    HeapExhausted {
        /// Bytes requested by the failing allocation.
        requested: usize,
        /// Bytes free in the arena at the time of the request.
        available: usize,
    },

    /// `Heap::new` was called with a capacity too small to hold the
    /// bootstrap prototype graph.
    #[error("heap capacity {0} bytes is too small to bootstrap the global object graph")]
    HeapTooSmall(usize),
}

/// Attaches a human-readable stage name to a [`Result`]'s error variant.
pub(crate) trait ErrorContext {
    fn context(self, context: &'static str) -> Self;
}

impl<T> ErrorContext for Result<T, ParseError> {
    fn context(self, context: &'static str) -> Self {
        self.map_err(|e| e.context(context))
    }
}

/// A source span in line/column form, attached to lex/parse errors and AST
/// nodes alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    line: u32,
    column: u32,
}

impl Position {
    /// Creates a new position. Lines and columns are 1-indexed, matching
    /// how editors and the conformance suite's own diagnostics report them.
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// 1-indexed line number.
    pub fn line_number(self) -> u32 {
        self.line
    }

    /// 1-indexed column number.
    pub fn column_number(self) -> u32 {
        self.column
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
