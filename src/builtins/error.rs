//! The `Error` constructor family: base `Error` plus the five ES5 subtypes,
//! each sharing the same constructor/`toString` shape and differing only in
//! which prototype they hang off of.
//!
//! The six constructors are built from one parameterized `install_error`
//! call per [`crate::context::Intrinsics`] prototype rather than a macro,
//! since there's no shared crate between them worth factoring further.

use crate::context::Context;
use crate::object::{Class, Object, PropertyDescriptor};
use crate::value::Value;

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

fn make_constructor(name: &'static str) -> crate::object::NativeFunction {
    match name {
        "Error" => error_constructor,
        "EvalError" => eval_error_constructor,
        "RangeError" => range_error_constructor,
        "ReferenceError" => reference_error_constructor,
        "SyntaxError" => syntax_error_constructor,
        "TypeError" => type_error_constructor,
        "URIError" => uri_error_constructor,
        _ => unreachable!(),
    }
}

fn build_instance(ctx: &mut Context<'_>, proto: crate::heap::ObjectHandle, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let mut obj = Object::new(Class::Error, Some(proto));
    let message_arg = arg(args, 0);
    if !message_arg.is_undefined() {
        let message = ctx.to_js_string(message_arg)?;
        let msg = ctx.heap_mut().allocate_string(message);
        obj.set_own_property("message", PropertyDescriptor::data(Value::String(msg), true, false, true));
    }
    Ok(Value::Object(ctx.heap_mut().allocate_object(obj)))
}

macro_rules! native_error_constructor {
    ($fn_name:ident, $proto_field:ident) => {
        fn $fn_name(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
            let proto = ctx.intrinsics().$proto_field;
            build_instance(ctx, proto, args)
        }
    };
}

native_error_constructor!(error_constructor, error_prototype);
native_error_constructor!(eval_error_constructor, eval_error_prototype);
native_error_constructor!(range_error_constructor, range_error_prototype);
native_error_constructor!(reference_error_constructor, reference_error_prototype);
native_error_constructor!(syntax_error_constructor, syntax_error_prototype);
native_error_constructor!(type_error_constructor, type_error_prototype);
native_error_constructor!(uri_error_constructor, uri_error_prototype);

/// `Error.prototype.toString` (ES5 §15.11.4.4): `name`, falling back to
/// `"Error"`, joined with `message` by `": "` when both are non-empty.
fn to_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = this.as_object().ok_or_else(|| ctx.throw_type_error("Error.prototype.toString called on non-object"))?;
    let name_value = ctx.get(obj, "name")?;
    let name = if name_value.is_undefined() { "Error".to_string() } else { ctx.to_js_string(name_value)?.as_str().into_owned() };
    let message_value = ctx.get(obj, "message")?;
    let message = if message_value.is_undefined() { String::new() } else { ctx.to_js_string(message_value)?.as_str().into_owned() };
    let result = if name.is_empty() {
        message
    } else if message.is_empty() {
        name
    } else {
        format!("{name}: {message}")
    };
    Ok(ctx.new_string(result))
}

fn install_error(ctx: &mut Context<'_>, name: &'static str, proto: crate::heap::ObjectHandle, is_base: bool) {
    use crate::object::builder::ConstructorBuilder;

    let name_value = ctx.new_string(name);
    ctx.heap_mut().object_mut(proto).set_own_property("name", PropertyDescriptor::data(name_value, true, false, true));
    let message_value = ctx.new_string("");
    ctx.heap_mut().object_mut(proto).set_own_property("message", PropertyDescriptor::data(message_value, true, false, true));

    let mut builder = ConstructorBuilder::new(ctx, make_constructor(name), proto).name(name).length(1);
    if is_base {
        builder = builder.method(to_string, "toString", 0);
    }
    let ctor = builder.build();
    crate::builtins::define_global(ctx, name, Value::Object(ctor));
}

pub fn init(ctx: &mut Context<'_>) {
    let error_proto = ctx.intrinsics().error_prototype;
    install_error(ctx, "Error", error_proto, true);

    let eval_proto = ctx.intrinsics().eval_error_prototype;
    install_error(ctx, "EvalError", eval_proto, false);

    let range_proto = ctx.intrinsics().range_error_prototype;
    install_error(ctx, "RangeError", range_proto, false);

    let ref_proto = ctx.intrinsics().reference_error_prototype;
    install_error(ctx, "ReferenceError", ref_proto, false);

    let syntax_proto = ctx.intrinsics().syntax_error_prototype;
    install_error(ctx, "SyntaxError", syntax_proto, false);

    let type_proto = ctx.intrinsics().type_error_prototype;
    install_error(ctx, "TypeError", type_proto, false);

    let uri_proto = ctx.intrinsics().uri_error_prototype;
    install_error(ctx, "URIError", uri_proto, false);
}
