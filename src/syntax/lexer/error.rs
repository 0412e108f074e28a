//! Lexer error type: a plain `Syntax` variant carrying line/column via
//! [`crate::error::Position`] rather than a bare string.

use crate::error::Position;
use std::fmt;

#[derive(Debug, thiserror::Error)]
pub struct LexError {
    message: Box<str>,
    position: Position,
}

impl LexError {
    pub(crate) fn syntax(message: impl Into<Box<str>>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.position)
    }
}
