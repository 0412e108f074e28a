//! The `Boolean` constructor and `Boolean.prototype`.

use crate::context::Context;
use crate::value::Value;

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

fn this_boolean(ctx: &mut Context<'_>, this: Value) -> Result<bool, crate::exec::Completion> {
    match this {
        Value::Boolean(b) => Ok(b),
        Value::Object(o) => match ctx.heap().object(o).kind.primitive {
            Some(Value::Boolean(b)) => Ok(b),
            _ => Err(ctx.throw_type_error("Boolean.prototype method called on incompatible receiver")),
        },
        _ => Err(ctx.throw_type_error("Boolean.prototype method called on incompatible receiver")),
    }
}

fn constructor(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let b = arg(args, 0).to_boolean(ctx.heap());
    Ok(Value::Boolean(b))
}

fn to_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let b = this_boolean(ctx, this)?;
    Ok(ctx.new_string(if b { "true" } else { "false" }))
}

fn value_of(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    Ok(Value::Boolean(this_boolean(ctx, this)?))
}

pub fn init(ctx: &mut Context<'_>) {
    use crate::object::builder::ConstructorBuilder;

    let proto = ctx.intrinsics().boolean_prototype;
    {
        let proto_obj = ctx.heap_mut().object_mut(proto);
        proto_obj.kind.primitive = Some(Value::Boolean(false));
    }
    let ctor = ConstructorBuilder::new(ctx, constructor, proto)
        .name("Boolean")
        .length(1)
        .method(to_string, "toString", 0)
        .method(value_of, "valueOf", 0)
        .build();
    crate::builtins::define_global(ctx, "Boolean", Value::Object(ctor));
}
