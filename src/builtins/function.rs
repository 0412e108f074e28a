//! The `Function` constructor and `Function.prototype`.
//!
//! The dynamic `Function(...)` constructor re-enters [`crate::syntax::parse`]
//! via the normal lexer/parser pipeline, parsing a synthesized function
//! expression source string rather than building an AST by hand.

use crate::context::Context;
use crate::object::{Callable, Class, Object, PropertyDescriptor};
use crate::value::Value;

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

/// `Function.prototype` itself is callable and returns `undefined`
/// unconditionally (ES5 §15.3.4).
fn prototype_call(_ctx: &mut Context<'_>, _this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    Ok(Value::Undefined)
}

/// `Function(p1, ..., pn, body)` (ES5 §15.3.2.1): joins the parameter
/// strings with commas and parses `function anonymous(params) { body }` as
/// ordinary source text, so every normal early-error and strict-mode rule
/// applies to dynamically-constructed functions exactly as to literal ones.
fn constructor(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let mut params = Vec::new();
    let mut body = String::new();
    if !args.is_empty() {
        for a in &args[..args.len() - 1] {
            params.push(ctx.to_js_string(*a)?.as_str().into_owned());
        }
        body = ctx.to_js_string(args[args.len() - 1])?.as_str().into_owned();
    }
    let source = format!("(function anonymous({}\n) {{\n{}\n}})", params.join(","), body);
    let program = crate::syntax::parse(&source, ctx.version()).map_err(|e| ctx.throw_syntax_error(&e.to_string()))?;
    let env = ctx.global_env();
    let this = Value::Object(ctx.global_object());
    crate::exec::execute_statements(ctx, &program.body, &env, this, program.strict)
}

fn to_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = this.as_object().ok_or_else(|| ctx.throw_type_error("Function.prototype.toString called on non-function"))?;
    if !ctx.heap().object(obj).is_callable() {
        return Err(ctx.throw_type_error("Function.prototype.toString called on non-function"));
    }
    let name = ctx.get(obj, "name")?;
    let name = ctx.to_js_string(name)?.as_str().into_owned();
    Ok(ctx.new_string(format!("function {name}() {{ [native or script code] }}")))
}

fn apply(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    if !ctx.is_callable(this) {
        return Err(ctx.throw_type_error("Function.prototype.apply called on non-callable"));
    }
    let this_arg = arg(args, 0);
    let arg_array = arg(args, 1);
    let call_args = match arg_array {
        Value::Undefined | Value::Null => Vec::new(),
        _ => {
            let arr_obj = ctx.to_object(arg_array)?;
            let length_val = ctx.get(arr_obj, "length")?;
            let len = ctx.to_uint32(length_val)?;
            let mut out = Vec::with_capacity(len as usize);
            for i in 0..len {
                out.push(ctx.get(arr_obj, &i.to_string())?);
            }
            out
        }
    };
    ctx.call(this, this_arg, &call_args)
}

fn call(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    if !ctx.is_callable(this) {
        return Err(ctx.throw_type_error("Function.prototype.call called on non-callable"));
    }
    let this_arg = arg(args, 0);
    let rest = if args.is_empty() { &[][..] } else { &args[1..] };
    ctx.call(this, this_arg, rest)
}

/// `Function.prototype.bind` (ES5 §15.3.4.5): produces a new function
/// object whose `[[Call]]`/`[[Construct]]` prepend the bound `this` and
/// argument list, implemented via [`Callable::Bound`] rather than a
/// closure-captured native function.
fn bind(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let target = this
        .as_object()
        .filter(|o| ctx.heap().object(*o).is_callable())
        .ok_or_else(|| ctx.throw_type_error("Function.prototype.bind called on non-callable"))?;
    let bound_this = arg(args, 0);
    let bound_args = if args.is_empty() { Vec::new() } else { args[1..].to_vec() };
    let length_value = ctx.get(target, "length")?;
    let target_length = ctx.to_number(length_value)?;
    let bound_length = (target_length - bound_args.len() as f64).max(0.0);
    let target_name = ctx.get(target, "name")?;
    let target_name = ctx.to_js_string(target_name)?.as_str().into_owned();
    let is_ctor = ctx.heap().object(target).is_constructor();
    let target_prototype = if is_ctor { Some(ctx.get(target, "prototype")?) } else { None };

    let proto = ctx.function_prototype();
    let mut obj = Object::new(Class::Function, Some(proto));
    obj.kind.callable = Some(Callable::Bound { target, bound_this, bound_args });
    obj.kind.is_constructor = is_ctor;
    let handle = ctx.heap_mut().allocate_object(obj);
    let name_value = ctx.new_string(format!("bound {target_name}"));
    let obj = ctx.heap_mut().object_mut(handle);
    obj.set_own_property("length", PropertyDescriptor::data(Value::Number(bound_length), false, false, true));
    obj.set_own_property("name", PropertyDescriptor::data(name_value, false, false, true));
    if let Some(target_prototype) = target_prototype {
        obj.set_own_property("prototype", PropertyDescriptor::data(target_prototype, false, false, false));
    }
    Ok(Value::Object(handle))
}

pub fn init(ctx: &mut Context<'_>) {
    use crate::object::builder::ConstructorBuilder;

    let proto = ctx.function_prototype();
    ctx.heap_mut().object_mut(proto).kind.callable = Some(Callable::Native(prototype_call));
    ctx.heap_mut().object_mut(proto).set_own_property(
        "length",
        PropertyDescriptor::data(Value::Number(0.0), false, false, true),
    );
    let ctor = ConstructorBuilder::new(ctx, constructor, proto)
        .name("Function")
        .length(1)
        .method(to_string, "toString", 0)
        .method(apply, "apply", 2)
        .method(call, "call", 1)
        .method(bind, "bind", 1)
        .build();
    crate::builtins::define_global(ctx, "Function", Value::Object(ctor));
}
