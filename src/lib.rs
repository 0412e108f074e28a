//! A from-scratch ECMAScript 5 lexer, parser and tree-walking interpreter.
//!
//! The crate is organized leaves-first: [`heap`] owns all garbage-collected
//! storage, [`value`] and [`object`] build the ES5 value/object model on top
//! of it, [`syntax`] turns source text into an [`syntax::ast`], [`environment`]
//! and [`exec`] evaluate that tree, and [`builtins`] wires up the standard
//! library. [`Context`] is the crate's single entry point.
#![deny(
    unused_qualifications,
    clippy::all,
    unused_import_braces,
    unused_lifetimes,
    unreachable_pub,
    trivial_numeric_casts,
    missing_debug_implementations,
    missing_copy_implementations,
    non_ascii_idents,
    rust_2018_idioms,
    future_incompatible,
    nonstandard_style
)]
#![warn(clippy::perf, clippy::single_match_else)]
#![allow(
    clippy::missing_inline_in_public_items,
    clippy::cognitive_complexity,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::as_conversions
)]

pub mod builtins;
pub mod context;
pub mod environment;
pub mod error;
pub mod exec;
pub mod heap;
pub mod object;
pub mod syntax;
pub mod unicode;
pub mod value;

pub use context::{Context, EsVersion};
pub use error::EngineError;
pub use exec::Completion;
pub use heap::Heap;
pub use value::Value;

/// Parses `src` and evaluates it against a fresh global scope in `ctx`.
///
/// This is the convenience surface a test harness typically wants: create a
/// [`Heap`] and a [`Context`], then call this once per test case. Parse
/// errors and uncaught script exceptions are both reported as
/// [`EngineError`]; distinguishing "parsed but threw" from "didn't parse" is
/// available via [`Context::eval`] directly.
pub fn eval(ctx: &mut Context<'_>, src: &str) -> Result<Value, EngineError> {
    let program = syntax::parse(src, ctx.version())?;
    ctx.eval(&program)
}
