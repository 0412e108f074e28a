//! The `Object` constructor and `Object.prototype`.
//!
//! Calls [`crate::Context::define_own_property`] directly rather than going
//! through a separate internal-methods trait, and exposes free helpers for
//! `ToPropertyDescriptor`/`FromPropertyDescriptor` (ES5 §8.10), which
//! `Function`, `Array`, and the `Error` family also need when they define
//! non-bootstrap own properties.

use crate::context::Context;
use crate::heap::ObjectHandle;
use crate::object::{Class, Object, PropertyDescriptor};
use crate::value::Value;

pub(crate) fn to_property_descriptor(
    ctx: &mut Context<'_>,
    desc_obj: ObjectHandle,
) -> Result<PropertyDescriptor, crate::exec::Completion> {
    let mut out = PropertyDescriptor::empty();
    if ctx.has_property(desc_obj, "enumerable") {
        let v = ctx.get(desc_obj, "enumerable")?;
        out.enumerable = Some(v.to_boolean(ctx.heap()));
    }
    if ctx.has_property(desc_obj, "configurable") {
        let v = ctx.get(desc_obj, "configurable")?;
        out.configurable = Some(v.to_boolean(ctx.heap()));
    }
    if ctx.has_property(desc_obj, "value") {
        out.value = Some(ctx.get(desc_obj, "value")?);
    }
    if ctx.has_property(desc_obj, "writable") {
        let v = ctx.get(desc_obj, "writable")?;
        out.writable = Some(v.to_boolean(ctx.heap()));
    }
    if ctx.has_property(desc_obj, "get") {
        let v = ctx.get(desc_obj, "get")?;
        if !v.is_undefined() && !ctx.is_callable(v) {
            return Err(ctx.throw_type_error("getter must be a function"));
        }
        out.get = Some(v);
    }
    if ctx.has_property(desc_obj, "set") {
        let v = ctx.get(desc_obj, "set")?;
        if !v.is_undefined() && !ctx.is_callable(v) {
            return Err(ctx.throw_type_error("setter must be a function"));
        }
        out.set = Some(v);
    }
    if (out.get.is_some() || out.set.is_some()) && (out.value.is_some() || out.writable.is_some()) {
        return Err(ctx.throw_type_error("property descriptor cannot be both a data and an accessor descriptor"));
    }
    Ok(out)
}

pub(crate) fn from_property_descriptor(ctx: &mut Context<'_>, desc: &PropertyDescriptor) -> ObjectHandle {
    let proto = ctx.object_prototype();
    let mut obj = Object::new(Class::Object, Some(proto));
    if desc.is_accessor_descriptor() {
        obj.set_own_property(
            "get",
            PropertyDescriptor::data(desc.get.clone().unwrap_or(Value::Undefined), true, true, true),
        );
        obj.set_own_property(
            "set",
            PropertyDescriptor::data(desc.set.clone().unwrap_or(Value::Undefined), true, true, true),
        );
    } else {
        obj.set_own_property(
            "value",
            PropertyDescriptor::data(desc.value.clone().unwrap_or(Value::Undefined), true, true, true),
        );
        obj.set_own_property("writable", PropertyDescriptor::data(Value::Boolean(desc.writable()), true, true, true));
    }
    obj.set_own_property("enumerable", PropertyDescriptor::data(Value::Boolean(desc.enumerable()), true, true, true));
    obj.set_own_property(
        "configurable",
        PropertyDescriptor::data(Value::Boolean(desc.configurable()), true, true, true),
    );
    ctx.heap_mut().allocate_object(obj)
}

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

fn require_object(ctx: &mut Context<'_>, v: Value, who: &str) -> Result<ObjectHandle, crate::exec::Completion> {
    v.as_object().ok_or_else(|| ctx.throw_type_error(&format!("{who} called on non-object")))
}

/// `Object([value])` (ES5 §15.2.1/§15.2.2): both the function call and
/// `new` forms produce the same result — a passed-through object, a boxed
/// primitive, or a fresh plain object for `undefined`/`null`/no argument.
fn constructor(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let v = arg(args, 0);
    if v.is_nullish() {
        let proto = ctx.object_prototype();
        let obj = ctx.heap_mut().allocate_object(Object::new(Class::Object, Some(proto)));
        return Ok(Value::Object(obj));
    }
    Ok(Value::Object(ctx.to_object(v)?))
}

fn get_prototype_of(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.getPrototypeOf")?;
    Ok(ctx.heap().object(obj).prototype.map(Value::Object).unwrap_or(Value::Null))
}

fn get_own_property_descriptor(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.getOwnPropertyDescriptor")?;
    let key = ctx.to_js_string(arg(args, 1))?;
    let key = key.as_str().into_owned();
    match ctx.heap().object(obj).get_own_property(&key).cloned() {
        None => Ok(Value::Undefined),
        Some(desc) => Ok(Value::Object(from_property_descriptor(ctx, &desc))),
    }
}

fn get_own_property_names(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.getOwnPropertyNames")?;
    let keys: Vec<String> = ctx.heap().object(obj).own_keys().map(String::from).collect();
    let elements: Vec<Value> = keys.into_iter().map(|k| ctx.new_string(k)).collect();
    Ok(Value::Object(crate::builtins::array::new_array(ctx, elements)))
}

fn create(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let proto_arg = arg(args, 0);
    let proto = match proto_arg {
        Value::Object(o) => Some(o),
        Value::Null => None,
        _ => return Err(ctx.throw_type_error("Object.create: prototype must be an object or null")),
    };
    let obj = ctx.heap_mut().allocate_object(Object::new(Class::Object, proto));
    let props = arg(args, 1);
    if !props.is_undefined() {
        define_properties(ctx, Value::Object(obj), &[Value::Object(obj), props])?;
    }
    Ok(Value::Object(obj))
}

fn define_property(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.defineProperty")?;
    let key = ctx.to_js_string(arg(args, 1))?.as_str().into_owned();
    let desc_obj = require_object(ctx, arg(args, 2), "Object.defineProperty")?;
    let desc = to_property_descriptor(ctx, desc_obj)?;
    ctx.define_own_property(obj, &key, desc, true)?;
    Ok(Value::Object(obj))
}

fn define_properties(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.defineProperties")?;
    let props = require_object(ctx, arg(args, 1), "Object.defineProperties")?;
    let keys: Vec<String> = ctx
        .heap()
        .object(props)
        .own_enumerable_keys()
        .map(String::from)
        .collect();
    for key in keys {
        let desc_value = ctx.get(props, &key)?;
        let desc_obj = require_object(ctx, desc_value, "Object.defineProperties")?;
        let desc = to_property_descriptor(ctx, desc_obj)?;
        ctx.define_own_property(obj, &key, desc, true)?;
    }
    Ok(Value::Object(obj))
}

fn keys(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.keys")?;
    let keys: Vec<String> = ctx.heap().object(obj).own_enumerable_keys().map(String::from).collect();
    let elements: Vec<Value> = keys.into_iter().map(|k| ctx.new_string(k)).collect();
    Ok(Value::Object(crate::builtins::array::new_array(ctx, elements)))
}

fn prevent_extensions(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.preventExtensions")?;
    ctx.heap_mut().object_mut(obj).extensible = false;
    Ok(Value::Object(obj))
}

fn is_extensible(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.isExtensible")?;
    Ok(Value::Boolean(ctx.heap().object(obj).extensible))
}

fn seal(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.seal")?;
    let keys: Vec<String> = ctx.heap().object(obj).own_keys().map(String::from).collect();
    for key in keys {
        let mut desc = PropertyDescriptor::empty();
        desc.configurable = Some(false);
        ctx.define_own_property(obj, &key, desc, true)?;
    }
    ctx.heap_mut().object_mut(obj).extensible = false;
    Ok(Value::Object(obj))
}

fn is_sealed(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.isSealed")?;
    if ctx.heap().object(obj).extensible {
        return Ok(Value::Boolean(false));
    }
    let keys: Vec<String> = ctx.heap().object(obj).own_keys().map(String::from).collect();
    for key in &keys {
        if ctx.heap().object(obj).get_own_property(key).unwrap().configurable() {
            return Ok(Value::Boolean(false));
        }
    }
    Ok(Value::Boolean(true))
}

fn freeze(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.freeze")?;
    let keys: Vec<String> = ctx.heap().object(obj).own_keys().map(String::from).collect();
    for key in keys {
        let mut desc = PropertyDescriptor::empty();
        desc.configurable = Some(false);
        let is_data = ctx.heap().object(obj).get_own_property(&key).unwrap().is_data_descriptor();
        if is_data {
            desc.writable = Some(false);
        }
        ctx.define_own_property(obj, &key, desc, true)?;
    }
    ctx.heap_mut().object_mut(obj).extensible = false;
    Ok(Value::Object(obj))
}

fn is_frozen(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = require_object(ctx, arg(args, 0), "Object.isFrozen")?;
    if ctx.heap().object(obj).extensible {
        return Ok(Value::Boolean(false));
    }
    let keys: Vec<String> = ctx.heap().object(obj).own_keys().map(String::from).collect();
    for key in &keys {
        let d = ctx.heap().object(obj).get_own_property(key).unwrap().clone();
        if d.configurable() || (d.is_data_descriptor() && d.writable()) {
            return Ok(Value::Boolean(false));
        }
    }
    Ok(Value::Boolean(true))
}

// ---- Object.prototype ----

fn to_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let class = match this {
        Value::Undefined => "Undefined",
        Value::Null => "Null",
        _ => {
            let obj = ctx.to_object(this)?;
            ctx.heap().object(obj).class.as_str()
        }
    };
    Ok(ctx.new_string(format!("[object {class}]")))
}

fn to_locale_string(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = ctx.to_object(this)?;
    let method = ctx.get(obj, "toString")?;
    ctx.call(method, Value::Object(obj), args)
}

fn value_of(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    Ok(Value::Object(ctx.to_object(this)?))
}

fn has_own_property(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = ctx.to_object(this)?;
    let key = ctx.to_js_string(arg(args, 0))?.as_str().into_owned();
    Ok(Value::Boolean(ctx.heap().object(obj).get_own_property(&key).is_some()))
}

fn is_prototype_of(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let Some(mut current) = arg(args, 0).as_object().and_then(|o| ctx.heap().object(o).prototype) else {
        return Ok(Value::Boolean(false));
    };
    let this_obj = ctx.to_object(this)?;
    loop {
        if current == this_obj {
            return Ok(Value::Boolean(true));
        }
        match ctx.heap().object(current).prototype {
            Some(p) => current = p,
            None => return Ok(Value::Boolean(false)),
        }
    }
}

fn property_is_enumerable(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = ctx.to_object(this)?;
    let key = ctx.to_js_string(arg(args, 0))?.as_str().into_owned();
    let enumerable = ctx
        .heap()
        .object(obj)
        .get_own_property(&key)
        .map(|d| d.enumerable())
        .unwrap_or(false);
    Ok(Value::Boolean(enumerable))
}

pub fn init(ctx: &mut Context<'_>) {
    use crate::object::builder::ConstructorBuilder;

    let proto = ctx.object_prototype();
    let ctor = ConstructorBuilder::new(ctx, constructor, proto)
        .name("Object")
        .length(1)
        .method(to_string, "toString", 0)
        .method(to_locale_string, "toLocaleString", 0)
        .method(value_of, "valueOf", 0)
        .method(has_own_property, "hasOwnProperty", 1)
        .method(is_prototype_of, "isPrototypeOf", 1)
        .method(property_is_enumerable, "propertyIsEnumerable", 1)
        .static_method(get_prototype_of, "getPrototypeOf", 1)
        .static_method(get_own_property_descriptor, "getOwnPropertyDescriptor", 2)
        .static_method(get_own_property_names, "getOwnPropertyNames", 1)
        .static_method(create, "create", 2)
        .static_method(define_property, "defineProperty", 3)
        .static_method(define_properties, "defineProperties", 2)
        .static_method(keys, "keys", 1)
        .static_method(prevent_extensions, "preventExtensions", 1)
        .static_method(is_extensible, "isExtensible", 1)
        .static_method(seal, "seal", 1)
        .static_method(is_sealed, "isSealed", 1)
        .static_method(freeze, "freeze", 1)
        .static_method(is_frozen, "isFrozen", 1)
        .build();
    crate::builtins::define_global(ctx, "Object", Value::Object(ctor));
}
