//! Source-to-AST pipeline: [`lexer`] turns source text into a token stream,
//! [`parser`] turns tokens into an [`ast::Program`].

pub mod ast;
pub mod lexer;
pub mod parser;

use crate::context::EsVersion;
use crate::error::EngineError;

/// Lexes and parses `src` for the given edition, producing a [`ast::Program`]
/// ready for [`crate::Context::eval`].
///
/// `version` is threaded through for forward compatibility; ES5 is the only
/// edition implemented today, so every version tag currently runs the same
/// grammar.
pub fn parse(src: &str, _version: EsVersion) -> Result<ast::Program, EngineError> {
    parser::parse_program(src).map_err(EngineError::from)
}
