//! Standard library bootstrap: `Object`, `Function`, `Array`, `String`,
//! `Boolean`, `Number`, `Math`, `Date`, `RegExp`, the `Error` family,
//! `JSON`, and the global function/value properties.
//!
//! One module per built-in, each built with the `FunctionBuilder`/
//! `ConstructorBuilder` helpers at [`crate::object::builder`]. [`install`]
//! is called once per [`crate::Context::new`], in dependency order:
//! `Object.prototype` and `Function.prototype` already exist by
//! the time this runs (allocated directly in `Context::new` since every
//! other prototype's own `[[Prototype]]` is `Object.prototype`), so this
//! module only needs to hang properties and constructors off prototypes
//! that already exist.

pub mod array;
pub mod boolean;
pub mod date;
pub mod error;
pub mod function;
pub mod global;
pub mod json;
pub mod math;
pub mod number;
pub mod object;
pub mod regexp;
pub mod string;

use crate::context::Context;

/// Wires up every intrinsic built-in onto the realm that `ctx` already
/// bootstrapped the bare prototype graph for.
pub fn install(ctx: &mut Context<'_>) {
    object::init(ctx);
    function::init(ctx);
    array::init(ctx);
    string::init(ctx);
    boolean::init(ctx);
    number::init(ctx);
    math::init(ctx);
    date::init(ctx);
    regexp::init(ctx);
    error::init(ctx);
    json::init(ctx);
    global::init(ctx);
}

/// Defines a writable, configurable, non-enumerable own property on the
/// global object — the attribute triple ES5 specifies for every built-in
/// binding.
pub(crate) fn define_global(ctx: &mut Context<'_>, name: &str, value: crate::value::Value) {
    let global = ctx.global_object();
    ctx.heap_mut().object_mut(global).set_own_property(
        name,
        crate::object::PropertyDescriptor::data(value, true, false, true),
    );
}
