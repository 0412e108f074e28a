//! Parser error type, built on `thiserror` for its `Display` derivation.

use crate::error::Position;
use crate::syntax::lexer::LexError;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("expected {}, found '{found}' at {position}", expected.join(" or "))]
    Expected {
        expected: Box<[&'static str]>,
        found: Box<str>,
        position: Position,
    },
    #[error("unexpected token '{found}' at {position}{}", message.map(|m| format!(", {m}")).unwrap_or_default())]
    Unexpected {
        found: Box<str>,
        position: Position,
        message: Option<&'static str>,
    },
    #[error("unexpected end of input")]
    AbruptEnd,
    #[error(transparent)]
    Lex(#[from] LexError),
    /// A strict-mode or grammar-level early error: duplicate
    /// parameters, `eval`/`arguments` misuse, octal literals in strict
    /// code, `with` in strict code, `delete` of a bare identifier in
    /// strict code, and similar.
    #[error("SyntaxError (strict mode): {message} at {position}")]
    Strict { message: &'static str, position: Position },
    #[error("SyntaxError: {message} at {position}")]
    General { message: &'static str, position: Position },
}

impl ParseError {
    pub(crate) fn expected(expected: &'static [&'static str], found: impl Into<Box<str>>, position: Position) -> Self {
        Self::Expected {
            expected: expected.into(),
            found: found.into(),
            position,
        }
    }

    pub(crate) fn unexpected(found: impl Into<Box<str>>, position: Position, message: Option<&'static str>) -> Self {
        Self::Unexpected {
            found: found.into(),
            position,
            message,
        }
    }

    pub(crate) fn strict(message: &'static str, position: Position) -> Self {
        Self::Strict { message, position }
    }

    pub(crate) fn general(message: &'static str, position: Position) -> Self {
        Self::General { message, position }
    }

    pub(crate) fn context(self, _context: &'static str) -> Self {
        self
    }
}
