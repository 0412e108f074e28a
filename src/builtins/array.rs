//! The `Array` constructor and `Array.prototype`.
//!
//! The higher-order methods (`forEach`/`map`/`filter`/`every`/`some`/
//! `reduce`/`reduceRight`) all forward a caller-supplied `thisArg` straight
//! into [`crate::Context::call`] unchanged — [`crate::exec::call_ordinary_function`]
//! already does the non-strict boxing/global-object substitution per the
//! *callee's own* strictness, so this module never needs to know whether
//! the callback is strict.

use crate::context::Context;
use crate::heap::ObjectHandle;
use crate::object::{Class, Object, PropertyDescriptor};
use crate::value::Value;

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

/// Allocates a fresh array object with a dense `length`-many own indices.
pub(crate) fn new_array(ctx: &mut Context<'_>, elements: impl IntoIterator<Item = Value>) -> ObjectHandle {
    let proto = ctx.intrinsics().array_prototype;
    let mut obj = Object::new(Class::Array, Some(proto));
    let mut len: u32 = 0;
    for v in elements {
        obj.set_own_property(len.to_string(), PropertyDescriptor::data(v, true, true, true));
        len += 1;
    }
    obj.set_own_property("length", PropertyDescriptor::data(Value::Number(len as f64), true, false, false));
    ctx.heap_mut().allocate_object(obj)
}

fn to_object_and_length(ctx: &mut Context<'_>, this: Value) -> Result<(ObjectHandle, u32), crate::exec::Completion> {
    let obj = ctx.to_object(this)?;
    let len_value = ctx.get(obj, "length")?;
    let len = ctx.to_uint32(len_value)?;
    Ok((obj, len))
}

fn constructor(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    if args.len() == 1 {
        if let Value::Number(n) = args[0] {
            let len = Value::number_to_uint32(n);
            if len as f64 != n {
                return Err(ctx.throw_range_error("invalid array length"));
            }
            let proto = ctx.intrinsics().array_prototype;
            let mut obj = Object::new(Class::Array, Some(proto));
            obj.set_own_property("length", PropertyDescriptor::data(Value::Number(len as f64), true, false, false));
            return Ok(Value::Object(ctx.heap_mut().allocate_object(obj)));
        }
    }
    Ok(Value::Object(new_array(ctx, args.iter().copied())))
}

fn is_array(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let is_arr = match arg(args, 0) {
        Value::Object(o) => ctx.heap().object(o).class == Class::Array,
        _ => false,
    };
    Ok(Value::Boolean(is_arr))
}

fn to_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = ctx.to_object(this)?;
    let joiner = ctx.get(obj, "join")?;
    if ctx.is_callable(joiner) {
        return ctx.call(joiner, Value::Object(obj), &[]);
    }
    object_to_string_fallback(ctx, obj)
}

fn object_to_string_fallback(ctx: &mut Context<'_>, obj: ObjectHandle) -> Result<Value, crate::exec::Completion> {
    Ok(ctx.new_string(format!("[object {}]", ctx.heap().object(obj).class.as_str())))
}

fn join(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    let sep_arg = arg(args, 0);
    let sep = if sep_arg.is_undefined() {
        ",".to_string()
    } else {
        ctx.to_js_string(sep_arg)?.as_str().into_owned()
    };
    let mut parts = Vec::with_capacity(len as usize);
    for i in 0..len {
        let v = ctx.get(obj, &i.to_string())?;
        if v.is_nullish() {
            parts.push(String::new());
        } else {
            parts.push(ctx.to_js_string(v)?.as_str().into_owned());
        }
    }
    Ok(ctx.new_string(parts.join(&sep)))
}

fn to_locale_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    join(ctx, this, &[])
}

fn concat(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let obj = ctx.to_object(this)?;
    let mut elements = Vec::new();
    let mut items = vec![Value::Object(obj)];
    items.extend_from_slice(args);
    for item in items {
        match item {
            Value::Object(o) if ctx.heap().object(o).class == Class::Array => {
                let length_val = ctx.get(o, "length")?;
                let len = ctx.to_uint32(length_val)?;
                for i in 0..len {
                    elements.push(ctx.get(o, &i.to_string())?);
                }
            }
            other => elements.push(other),
        }
    }
    Ok(Value::Object(new_array(ctx, elements)))
}

fn slice(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    let start = relative_index(ctx, arg(args, 0), len, 0)?;
    let end_arg = arg(args, 1);
    let end = if end_arg.is_undefined() { len } else { relative_index(ctx, end_arg, len, len)? };
    let mut elements = Vec::new();
    let mut i = start;
    while i < end {
        if ctx.has_property(obj, &i.to_string()) {
            elements.push(ctx.get(obj, &i.to_string())?);
        } else {
            elements.push(Value::Undefined);
        }
        i += 1;
    }
    Ok(Value::Object(new_array(ctx, elements)))
}

/// Resolves a `start`/`end`-style argument per ES5's clamp-to-`[0, len]`
/// rule: negative values count back from `len`, `NaN`/unspecified falls
/// back to `default`.
fn relative_index(ctx: &mut Context<'_>, value: Value, len: u32, default: u32) -> Result<u32, crate::exec::Completion> {
    if value.is_undefined() {
        return Ok(default);
    }
    let n = ctx.to_integer(value)?;
    let len = len as f64;
    let idx = if n < 0.0 { (len + n).max(0.0) } else { n.min(len) };
    Ok(idx as u32)
}

fn index_of(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    if len == 0 {
        return Ok(Value::Number(-1.0));
    }
    let target = arg(args, 0);
    let from_arg = arg(args, 1);
    let from = if from_arg.is_undefined() { 0.0 } else { ctx.to_integer(from_arg)? };
    let mut start = if from < 0.0 { (len as f64 + from).max(0.0) as u32 } else { from as u32 };
    if from as i64 > len as i64 {
        return Ok(Value::Number(-1.0));
    }
    while start < len {
        if ctx.has_property(obj, &start.to_string()) {
            let v = ctx.get(obj, &start.to_string())?;
            if crate::exec::strict_equals(ctx, target, v) {
                return Ok(Value::Number(start as f64));
            }
        }
        start += 1;
    }
    Ok(Value::Number(-1.0))
}

fn last_index_of(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    if len == 0 {
        return Ok(Value::Number(-1.0));
    }
    let target = arg(args, 0);
    let from_arg = arg(args, 1);
    let from = if from_arg.is_undefined() { (len - 1) as f64 } else { ctx.to_integer(from_arg)? };
    let mut idx = if from < 0.0 { len as f64 + from } else { from.min((len - 1) as f64) };
    while idx >= 0.0 {
        let key = (idx as u32).to_string();
        if ctx.has_property(obj, &key) {
            let v = ctx.get(obj, &key)?;
            if crate::exec::strict_equals(ctx, target, v) {
                return Ok(Value::Number(idx));
            }
        }
        idx -= 1.0;
    }
    Ok(Value::Number(-1.0))
}

fn push(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    let mut n = len;
    for v in args {
        ctx.put(obj, &n.to_string(), *v, true)?;
        n += 1;
    }
    ctx.put(obj, "length", Value::Number(n as f64), true)?;
    Ok(Value::Number(n as f64))
}

fn pop(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    if len == 0 {
        ctx.put(obj, "length", Value::Number(0.0), true)?;
        return Ok(Value::Undefined);
    }
    let last = len - 1;
    let key = last.to_string();
    let value = ctx.get(obj, &key)?;
    ctx.heap_mut().object_mut(obj).remove_own_property(&key);
    ctx.put(obj, "length", Value::Number(last as f64), true)?;
    Ok(value)
}

fn shift(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    if len == 0 {
        ctx.put(obj, "length", Value::Number(0.0), true)?;
        return Ok(Value::Undefined);
    }
    let first = ctx.get(obj, "0")?;
    for i in 1..len {
        let key = i.to_string();
        if ctx.has_property(obj, &key) {
            let v = ctx.get(obj, &key)?;
            ctx.put(obj, &(i - 1).to_string(), v, true)?;
        } else {
            ctx.heap_mut().object_mut(obj).remove_own_property(&(i - 1).to_string());
        }
    }
    ctx.heap_mut().object_mut(obj).remove_own_property(&(len - 1).to_string());
    ctx.put(obj, "length", Value::Number((len - 1) as f64), true)?;
    Ok(first)
}

fn unshift(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    let shift_by = args.len() as u32;
    if shift_by > 0 {
        let mut i = len;
        while i > 0 {
            i -= 1;
            let from_key = i.to_string();
            let to_key = (i + shift_by).to_string();
            if ctx.has_property(obj, &from_key) {
                let v = ctx.get(obj, &from_key)?;
                ctx.put(obj, &to_key, v, true)?;
            } else {
                ctx.heap_mut().object_mut(obj).remove_own_property(&to_key);
            }
        }
        for (i, v) in args.iter().enumerate() {
            ctx.put(obj, &i.to_string(), *v, true)?;
        }
    }
    let new_len = len + shift_by;
    ctx.put(obj, "length", Value::Number(new_len as f64), true)?;
    Ok(Value::Number(new_len as f64))
}

fn reverse(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    let mut lower = 0u32;
    let mut upper = if len == 0 { 0 } else { len - 1 };
    while lower < upper {
        let lower_key = lower.to_string();
        let upper_key = upper.to_string();
        let lower_exists = ctx.has_property(obj, &lower_key);
        let upper_exists = ctx.has_property(obj, &upper_key);
        let lower_value = if lower_exists { Some(ctx.get(obj, &lower_key)?) } else { None };
        let upper_value = if upper_exists { Some(ctx.get(obj, &upper_key)?) } else { None };
        match (lower_value, upper_value) {
            (Some(l), Some(u)) => {
                ctx.put(obj, &lower_key, u, true)?;
                ctx.put(obj, &upper_key, l, true)?;
            }
            (Some(l), None) => {
                ctx.heap_mut().object_mut(obj).remove_own_property(&lower_key);
                ctx.put(obj, &upper_key, l, true)?;
            }
            (None, Some(u)) => {
                ctx.put(obj, &lower_key, u, true)?;
                ctx.heap_mut().object_mut(obj).remove_own_property(&upper_key);
            }
            (None, None) => {}
        }
        lower += 1;
        upper -= 1;
    }
    Ok(Value::Object(obj))
}

fn sort(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    let comparator = arg(args, 0);
    let mut values = Vec::with_capacity(len as usize);
    for i in 0..len {
        if ctx.has_property(obj, &i.to_string()) {
            values.push(Some(ctx.get(obj, &i.to_string())?));
        } else {
            values.push(None);
        }
    }
    let undefined_count = values.iter().filter(|v| matches!(v, Some(Value::Undefined))).count();
    let missing_count = values.iter().filter(|v| v.is_none()).count();
    let mut present: Vec<Value> = values.into_iter().flatten().filter(|v| !matches!(v, Value::Undefined)).collect();

    // Simple insertion sort: preserves stability and lets the comparator
    // abrupt-complete mid-sort without extra bookkeeping.
    let mut err = None;
    for i in 1..present.len() {
        let mut j = i;
        while j > 0 && err.is_none() {
            let order = compare(ctx, present[j - 1], present[j], comparator);
            match order {
                Ok(ord) if ord > 0.0 => {
                    present.swap(j - 1, j);
                    j -= 1;
                }
                Ok(_) => break,
                Err(e) => {
                    err = Some(e);
                    break;
                }
            }
        }
    }
    if let Some(e) = err {
        return Err(e);
    }

    for (i, v) in present.iter().enumerate() {
        ctx.put(obj, &i.to_string(), *v, true)?;
    }
    let present_len = present.len() as u32;
    for i in 0..undefined_count as u32 {
        ctx.put(obj, &(present_len + i).to_string(), Value::Undefined, true)?;
    }
    for i in 0..missing_count as u32 {
        ctx.heap_mut().object_mut(obj).remove_own_property(&(present_len + undefined_count as u32 + i).to_string());
    }
    Ok(Value::Object(obj))
}

fn compare(ctx: &mut Context<'_>, a: Value, b: Value, comparator: Value) -> Result<f64, crate::exec::Completion> {
    if ctx.is_callable(comparator) {
        let result = ctx.call(comparator, Value::Undefined, &[a, b])?;
        return ctx.to_number(result);
    }
    let sa = ctx.to_js_string(a)?;
    let sb = ctx.to_js_string(b)?;
    Ok(match sa.cmp(&sb) {
        std::cmp::Ordering::Less => -1.0,
        std::cmp::Ordering::Equal => 0.0,
        std::cmp::Ordering::Greater => 1.0,
    })
}

fn splice(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    let start = relative_index(ctx, arg(args, 0), len, 0)?;
    let delete_count = if args.len() < 2 {
        len - start
    } else {
        let dc = ctx.to_integer(arg(args, 1))?;
        dc.max(0.0).min((len - start) as f64) as u32
    };
    let mut removed = Vec::with_capacity(delete_count as usize);
    for i in 0..delete_count {
        let key = (start + i).to_string();
        removed.push(if ctx.has_property(obj, &key) { ctx.get(obj, &key)? } else { Value::Undefined });
    }
    let items: Vec<Value> = if args.len() > 2 { args[2..].to_vec() } else { Vec::new() };
    let item_count = items.len() as u32;

    if item_count < delete_count {
        for i in start..(len - delete_count) {
            let from_key = (i + delete_count).to_string();
            let to_key = (i + item_count).to_string();
            if ctx.has_property(obj, &from_key) {
                let v = ctx.get(obj, &from_key)?;
                ctx.put(obj, &to_key, v, true)?;
            } else {
                ctx.heap_mut().object_mut(obj).remove_own_property(&to_key);
            }
        }
        for i in (len - delete_count + item_count)..len {
            ctx.heap_mut().object_mut(obj).remove_own_property(&i.to_string());
        }
    } else if item_count > delete_count {
        let mut i = len - delete_count;
        while i > start {
            i -= 1;
            let from_key = (i + delete_count).to_string();
            let to_key = (i + item_count).to_string();
            if ctx.has_property(obj, &from_key) {
                let v = ctx.get(obj, &from_key)?;
                ctx.put(obj, &to_key, v, true)?;
            } else {
                ctx.heap_mut().object_mut(obj).remove_own_property(&to_key);
            }
        }
    }
    for (i, v) in items.iter().enumerate() {
        ctx.put(obj, &(start + i as u32).to_string(), *v, true)?;
    }
    let new_len = len - delete_count + item_count;
    ctx.put(obj, "length", Value::Number(new_len as f64), true)?;
    Ok(Value::Object(new_array(ctx, removed)))
}

fn each_loop(
    ctx: &mut Context<'_>,
    this: Value,
    args: &[Value],
    mut visit: impl FnMut(&mut Context<'_>, u32, Value, ObjectHandle) -> Result<bool, crate::exec::Completion>,
) -> Result<(), crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    let callback = arg(args, 0);
    if !ctx.is_callable(callback) {
        return Err(ctx.throw_type_error("callback must be a function"));
    }
    for i in 0..len {
        let key = i.to_string();
        if ctx.has_property(obj, &key) {
            let value = ctx.get(obj, &key)?;
            if !visit(ctx, i, value, obj)? {
                break;
            }
        }
    }
    Ok(())
}

fn for_each(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let callback = arg(args, 0);
    let this_arg = arg(args, 1);
    each_loop(ctx, this, args, |ctx, i, value, obj| {
        ctx.call(callback, this_arg, &[value, Value::Number(i as f64), Value::Object(obj)])?;
        Ok(true)
    })?;
    Ok(Value::Undefined)
}

fn map(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (_, len) = to_object_and_length(ctx, this)?;
    let callback = arg(args, 0);
    let this_arg = arg(args, 1);
    let mut results = vec![Value::Undefined; len as usize];
    each_loop(ctx, this, args, |ctx, i, value, obj| {
        let mapped = ctx.call(callback, this_arg, &[value, Value::Number(i as f64), Value::Object(obj)])?;
        results[i as usize] = mapped;
        Ok(true)
    })?;
    Ok(Value::Object(new_array(ctx, results)))
}

fn filter(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let callback = arg(args, 0);
    let this_arg = arg(args, 1);
    let mut kept = Vec::new();
    each_loop(ctx, this, args, |ctx, i, value, obj| {
        let keep = ctx.call(callback, this_arg, &[value, Value::Number(i as f64), Value::Object(obj)])?;
        if keep.to_boolean(ctx.heap()) {
            kept.push(value);
        }
        Ok(true)
    })?;
    Ok(Value::Object(new_array(ctx, kept)))
}

fn every(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let callback = arg(args, 0);
    let this_arg = arg(args, 1);
    let mut all_true = true;
    each_loop(ctx, this, args, |ctx, i, value, obj| {
        let result = ctx.call(callback, this_arg, &[value, Value::Number(i as f64), Value::Object(obj)])?;
        if !result.to_boolean(ctx.heap()) {
            all_true = false;
            return Ok(false);
        }
        Ok(true)
    })?;
    Ok(Value::Boolean(all_true))
}

fn some(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let callback = arg(args, 0);
    let this_arg = arg(args, 1);
    let mut any_true = false;
    each_loop(ctx, this, args, |ctx, i, value, obj| {
        let result = ctx.call(callback, this_arg, &[value, Value::Number(i as f64), Value::Object(obj)])?;
        if result.to_boolean(ctx.heap()) {
            any_true = true;
            return Ok(false);
        }
        Ok(true)
    })?;
    Ok(Value::Boolean(any_true))
}

fn reduce(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    let callback = arg(args, 0);
    if !ctx.is_callable(callback) {
        return Err(ctx.throw_type_error("Array.prototype.reduce callback must be a function"));
    }
    let mut index = 0u32;
    let mut accumulator = if args.len() > 1 {
        Some(args[1])
    } else {
        None
    };
    while accumulator.is_none() && index < len {
        let key = index.to_string();
        if ctx.has_property(obj, &key) {
            accumulator = Some(ctx.get(obj, &key)?);
        }
        index += 1;
    }
    let Some(mut acc) = accumulator else {
        return Err(ctx.throw_type_error("reduce of empty array with no initial value"));
    };
    while index < len {
        let key = index.to_string();
        if ctx.has_property(obj, &key) {
            let value = ctx.get(obj, &key)?;
            acc = ctx.call(callback, Value::Undefined, &[acc, value, Value::Number(index as f64), Value::Object(obj)])?;
        }
        index += 1;
    }
    Ok(acc)
}

fn reduce_right(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let (obj, len) = to_object_and_length(ctx, this)?;
    let callback = arg(args, 0);
    if !ctx.is_callable(callback) {
        return Err(ctx.throw_type_error("Array.prototype.reduceRight callback must be a function"));
    }
    if len == 0 && args.len() < 2 {
        return Err(ctx.throw_type_error("reduceRight of empty array with no initial value"));
    }
    let mut index = len;
    let mut accumulator = if args.len() > 1 { Some(args[1]) } else { None };
    while accumulator.is_none() && index > 0 {
        index -= 1;
        let key = index.to_string();
        if ctx.has_property(obj, &key) {
            accumulator = Some(ctx.get(obj, &key)?);
        }
    }
    let Some(mut acc) = accumulator else {
        return Err(ctx.throw_type_error("reduceRight of empty array with no initial value"));
    };
    while index > 0 {
        index -= 1;
        let key = index.to_string();
        if ctx.has_property(obj, &key) {
            let value = ctx.get(obj, &key)?;
            acc = ctx.call(callback, Value::Undefined, &[acc, value, Value::Number(index as f64), Value::Object(obj)])?;
        }
    }
    Ok(acc)
}

pub fn init(ctx: &mut Context<'_>) {
    use crate::object::builder::ConstructorBuilder;

    let proto = ctx.intrinsics().array_prototype;
    let ctor = ConstructorBuilder::new(ctx, constructor, proto)
        .name("Array")
        .length(1)
        .static_method(is_array, "isArray", 1)
        .method(to_string, "toString", 0)
        .method(to_locale_string, "toLocaleString", 0)
        .method(join, "join", 1)
        .method(concat, "concat", 1)
        .method(slice, "slice", 2)
        .method(splice, "splice", 2)
        .method(push, "push", 1)
        .method(pop, "pop", 0)
        .method(shift, "shift", 0)
        .method(unshift, "unshift", 1)
        .method(reverse, "reverse", 0)
        .method(sort, "sort", 1)
        .method(index_of, "indexOf", 1)
        .method(last_index_of, "lastIndexOf", 1)
        .method(for_each, "forEach", 1)
        .method(map, "map", 1)
        .method(filter, "filter", 1)
        .method(every, "every", 1)
        .method(some, "some", 1)
        .method(reduce, "reduce", 1)
        .method(reduce_right, "reduceRight", 1)
        .build();
    ctx.heap_mut().object_mut(proto).set_own_property(
        "length",
        PropertyDescriptor::data(Value::Number(0.0), true, false, false),
    );
    crate::builtins::define_global(ctx, "Array", Value::Object(ctor));
}
