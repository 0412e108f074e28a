//! The `String` constructor and `String.prototype`.
//!
//! Every index-taking method operates on UTF-16 code units via
//! [`crate::value::JsString`] directly rather than Rust `char`s, matching
//! ES5 §15.5's "string is a sequence of UTF-16 code units" data model —
//! surrogate pairs split the same way real engines split them.

use crate::context::Context;
use crate::heap::ObjectHandle;
use crate::object::{Class, PropertyDescriptor};
use crate::value::{is_es5_whitespace, JsString, Value};

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

fn this_string(ctx: &mut Context<'_>, this: Value) -> Result<JsString, crate::exec::Completion> {
    match this {
        Value::String(s) => Ok(ctx.heap().string(s).clone()),
        Value::Object(o) => match ctx.heap().object(o).kind.primitive.clone() {
            Some(Value::String(s)) => Ok(ctx.heap().string(s).clone()),
            _ => ctx.to_js_string(this),
        },
        _ => ctx.to_js_string(this),
    }
}

fn constructor(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = if args.is_empty() {
        JsString::from("")
    } else {
        ctx.to_js_string(args[0])?
    };
    Ok(ctx.new_string(s.as_str().into_owned()))
}

fn from_char_code(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let mut units = Vec::with_capacity(args.len());
    for a in args {
        units.push(ctx.to_uint32(*a)? as u16);
    }
    Ok(Value::String(ctx.heap_mut().allocate_string(JsString::from(units))))
}

fn to_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    Ok(ctx.new_string(s.as_str().into_owned()))
}

fn value_of(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    to_string(ctx, this, &[])
}

fn char_at(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let index = ctx.to_integer(arg(args, 0))?;
    if index < 0.0 || index >= s.len() as f64 {
        return Ok(ctx.new_string(""));
    }
    let i = index as usize;
    Ok(Value::String(ctx.heap_mut().allocate_string(s.substring(i, i + 1))))
}

fn char_code_at(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let index = ctx.to_integer(arg(args, 0))?;
    if index < 0.0 || index >= s.len() as f64 {
        return Ok(Value::number(f64::NAN));
    }
    Ok(Value::number(s.char_code_at(index as usize).unwrap() as f64))
}

fn concat(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let mut s = this_string(ctx, this)?;
    for a in args {
        s = s.concat(&ctx.to_js_string(*a)?);
    }
    Ok(Value::String(ctx.heap_mut().allocate_string(s)))
}

fn index_of(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let search = ctx.to_js_string(arg(args, 0))?;
    let pos_arg = arg(args, 1);
    let start = if pos_arg.is_undefined() { 0.0 } else { ctx.to_integer(pos_arg)? };
    let start = (start.max(0.0) as usize).min(s.len());
    Ok(Value::number(find_units(s.units(), search.units(), start).map(|i| i as f64).unwrap_or(-1.0)))
}

fn last_index_of(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let search = ctx.to_js_string(arg(args, 0))?;
    let pos_arg = arg(args, 1);
    let n = ctx.to_number(pos_arg)?;
    let limit = if n.is_nan() { s.len() } else { (n.max(0.0) as usize).min(s.len()) };
    let mut best: Option<usize> = None;
    let mut from = 0;
    while from <= limit {
        match find_units(s.units(), search.units(), from) {
            Some(i) if i <= limit => {
                best = Some(i);
                from = i + 1;
            }
            _ => break,
        }
    }
    Ok(Value::number(best.map(|i| i as f64).unwrap_or(-1.0)))
}

fn find_units(haystack: &[u16], needle: &[u16], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if from > haystack.len() || needle.len() > haystack.len() - from {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| &haystack[i..i + needle.len()] == needle)
}

fn slice(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let len = s.len() as f64;
    let start = resolve_relative(ctx, arg(args, 0), len, 0.0)?;
    let end_arg = arg(args, 1);
    let end = if end_arg.is_undefined() { len } else { resolve_relative(ctx, end_arg, len, len)? };
    let (start, end) = (start as usize, (end.max(start)) as usize);
    Ok(Value::String(ctx.heap_mut().allocate_string(s.substring(start, end))))
}

fn resolve_relative(ctx: &mut Context<'_>, value: Value, len: f64, default: f64) -> Result<f64, crate::exec::Completion> {
    if value.is_undefined() {
        return Ok(default);
    }
    let n = ctx.to_integer(value)?;
    Ok(if n < 0.0 { (len + n).max(0.0) } else { n.min(len) })
}

fn substring(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let len = s.len() as f64;
    let start_arg = arg(args, 0);
    let start = if start_arg.is_undefined() { 0.0 } else { ctx.to_integer(start_arg)?.clamp(0.0, len) };
    let end_arg = arg(args, 1);
    let end = if end_arg.is_undefined() { len } else { ctx.to_integer(end_arg)?.clamp(0.0, len) };
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    Ok(Value::String(ctx.heap_mut().allocate_string(s.substring(start as usize, end as usize))))
}

fn substr(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let len = s.len() as f64;
    let start_arg = arg(args, 0);
    let start_raw = if start_arg.is_undefined() { 0.0 } else { ctx.to_integer(start_arg)? };
    let start = if start_raw < 0.0 { (len + start_raw).max(0.0) } else { start_raw.min(len) };
    let length_arg = arg(args, 1);
    let length = if length_arg.is_undefined() { len - start } else { ctx.to_integer(length_arg)?.max(0.0) };
    let end = (start + length).min(len);
    Ok(Value::String(ctx.heap_mut().allocate_string(s.substring(start as usize, end as usize))))
}

fn to_upper_case(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    Ok(ctx.new_string(s.as_str().to_uppercase()))
}

fn to_lower_case(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    Ok(ctx.new_string(s.as_str().to_lowercase()))
}

fn trim(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    Ok(ctx.new_string(s.as_str().trim_matches(is_es5_whitespace).to_string()))
}

fn locale_compare(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let other = ctx.to_js_string(arg(args, 0))?;
    Ok(Value::number(match s.as_str().cmp(&other.as_str()) {
        std::cmp::Ordering::Less => -1.0,
        std::cmp::Ordering::Equal => 0.0,
        std::cmp::Ordering::Greater => 1.0,
    }))
}

fn split(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let sep_arg = arg(args, 0);
    let limit_arg = arg(args, 1);
    let limit = if limit_arg.is_undefined() { u32::MAX } else { ctx.to_uint32(limit_arg)? };

    if sep_arg.is_undefined() {
        let whole = ctx.new_string(s.as_str().into_owned());
        return Ok(Value::Object(crate::builtins::array::new_array(ctx, [whole])));
    }

    let sep = ctx.to_js_string(sep_arg)?;
    let text = s.as_str().into_owned();
    let sep_str = sep.as_str().into_owned();
    let mut parts: Vec<String> = if sep_str.is_empty() {
        text.chars().map(|c| c.to_string()).collect()
    } else {
        text.split(sep_str.as_str()).map(str::to_string).collect()
    };
    parts.truncate(limit as usize);
    let values: Vec<Value> = parts.into_iter().map(|p| ctx.new_string(p)).collect();
    Ok(Value::Object(crate::builtins::array::new_array(ctx, values)))
}

fn match_fn(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let re_arg = arg(args, 0);
    let re_obj = match re_arg {
        Value::Object(o) if ctx.heap().object(o).class == Class::RegExp => o,
        other => {
            let pattern = if other.is_undefined() { String::new() } else { ctx.to_js_string(other)?.as_str().into_owned() };
            let source: std::rc::Rc<str> = std::rc::Rc::from(pattern.as_str());
            let flags: std::rc::Rc<str> = std::rc::Rc::from("");
            let value = crate::builtins::regexp::construct_literal(ctx, &source, &flags)?;
            value.as_object().unwrap()
        }
    };
    let global = ctx.heap().object(re_obj).kind.regexp_flags.map(|f| f.global).unwrap_or(false);
    let text = ctx.new_string(s.as_str().into_owned());
    if !global {
        let exec = ctx.get(re_obj, "exec")?;
        return ctx.call(exec, Value::Object(re_obj), &[text]);
    }
    ctx.put(re_obj, "lastIndex", Value::Number(0.0), false)?;
    let mut matches = Vec::new();
    loop {
        let exec = ctx.get(re_obj, "exec")?;
        let result = ctx.call(exec, Value::Object(re_obj), &[text])?;
        if result.is_null() {
            break;
        }
        let matched = ctx.get(result.as_object().unwrap(), "0")?;
        matches.push(matched);
        let last_index = ctx.get(re_obj, "lastIndex")?;
        let matched_str = ctx.to_js_string(matched)?;
        if matched_str.is_empty() {
            let li = ctx.to_uint32(last_index)?;
            ctx.put(re_obj, "lastIndex", Value::Number((li + 1) as f64), false)?;
        }
    }
    if matches.is_empty() {
        return Ok(Value::Null);
    }
    Ok(Value::Object(crate::builtins::array::new_array(ctx, matches)))
}

fn search(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let re_arg = arg(args, 0);
    let re_obj = match re_arg {
        Value::Object(o) if ctx.heap().object(o).class == Class::RegExp => o,
        other => {
            let pattern = ctx.to_js_string(other)?.as_str().into_owned();
            let source: std::rc::Rc<str> = std::rc::Rc::from(pattern.as_str());
            let flags: std::rc::Rc<str> = std::rc::Rc::from("");
            crate::builtins::regexp::construct_literal(ctx, &source, &flags)?.as_object().unwrap()
        }
    };
    let text = ctx.new_string(s.as_str().into_owned());
    let saved_last_index = ctx.get(re_obj, "lastIndex")?;
    ctx.put(re_obj, "lastIndex", Value::Number(0.0), false)?;
    let exec = ctx.get(re_obj, "exec")?;
    let result = ctx.call(exec, Value::Object(re_obj), &[text])?;
    ctx.put(re_obj, "lastIndex", saved_last_index, false)?;
    match result {
        Value::Null => Ok(Value::number(-1.0)),
        Value::Object(m) => ctx.get(m, "index"),
        _ => Ok(Value::number(-1.0)),
    }
}

fn replace(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = this_string(ctx, this)?;
    let pattern_arg = arg(args, 0);
    let replacement = arg(args, 1);
    let text = s.as_str().into_owned();

    let (re_obj, global) = match pattern_arg {
        Value::Object(o) if ctx.heap().object(o).class == Class::RegExp => {
            let g = ctx.heap().object(o).kind.regexp_flags.map(|f| f.global).unwrap_or(false);
            (Some(o), g)
        }
        _ => (None, false),
    };

    if let Some(re_obj) = re_obj {
        ctx.put(re_obj, "lastIndex", Value::Number(0.0), false)?;
        let mut out = String::new();
        let mut last_end = 0usize;
        loop {
            let exec = ctx.get(re_obj, "exec")?;
            let text_val = ctx.new_string(text.clone());
            let result = ctx.call(exec, Value::Object(re_obj), &[text_val])?;
            let Value::Object(m) = result else { break };
            let index_val = ctx.get(m, "index")?;
            let index = ctx.to_uint32(index_val)? as usize;
            let matched_val = ctx.get(m, "0")?;
            let matched = ctx.to_js_string(matched_val)?.as_str().into_owned();
            out.push_str(&text[last_end..index.min(text.len())]);
            let rep = apply_replacement(ctx, replacement, &matched, index, &text)?;
            out.push_str(&rep);
            last_end = index + matched.len();
            if matched.is_empty() {
                let last_index_val = ctx.get(re_obj, "lastIndex")?;
                let li = ctx.to_uint32(last_index_val)?;
                ctx.put(re_obj, "lastIndex", Value::Number((li + 1) as f64), false)?;
            }
            if !global {
                break;
            }
        }
        out.push_str(&text[last_end.min(text.len())..]);
        return Ok(ctx.new_string(out));
    }

    let search_str = ctx.to_js_string(pattern_arg)?.as_str().into_owned();
    match text.find(&search_str) {
        None => Ok(ctx.new_string(text)),
        Some(index) => {
            let rep = apply_replacement(ctx, replacement, &search_str, index, &text)?;
            Ok(ctx.new_string(format!("{}{}{}", &text[..index], rep, &text[index + search_str.len()..])))
        }
    }
}

fn apply_replacement(
    ctx: &mut Context<'_>,
    replacement: Value,
    matched: &str,
    index: usize,
    whole: &str,
) -> Result<String, crate::exec::Completion> {
    if ctx.is_callable(replacement) {
        let matched_value = ctx.new_string(matched.to_string());
        let whole_value = ctx.new_string(whole.to_string());
        let result = ctx.call(replacement, Value::Undefined, &[matched_value, Value::Number(index as f64), whole_value])?;
        return Ok(ctx.to_js_string(result)?.as_str().into_owned());
    }
    let template = ctx.to_js_string(replacement)?.as_str().into_owned();
    let mut out = String::new();
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '$' {
            match chars.peek() {
                Some('$') => {
                    out.push('$');
                    chars.next();
                }
                Some('&') => {
                    out.push_str(matched);
                    chars.next();
                }
                Some('`') => {
                    out.push_str(&whole[..index]);
                    chars.next();
                }
                Some('\'') => {
                    out.push_str(&whole[index + matched.len()..]);
                    chars.next();
                }
                _ => out.push('$'),
            }
        } else {
            out.push(c);
        }
    }
    Ok(out)
}

pub fn init(ctx: &mut Context<'_>) {
    use crate::object::builder::ConstructorBuilder;

    let proto = ctx.intrinsics().string_prototype;
    let empty = ctx.heap_mut().allocate_string(JsString::from(""));
    let proto_obj = ctx.heap_mut().object_mut(proto);
    proto_obj.kind.primitive = Some(Value::String(empty));
    proto_obj.set_own_property("length", PropertyDescriptor::data(Value::Number(0.0), false, false, false));
    let ctor = ConstructorBuilder::new(ctx, constructor, proto)
        .name("String")
        .length(1)
        .static_method(from_char_code, "fromCharCode", 1)
        .method(to_string, "toString", 0)
        .method(value_of, "valueOf", 0)
        .method(char_at, "charAt", 1)
        .method(char_code_at, "charCodeAt", 1)
        .method(concat, "concat", 1)
        .method(index_of, "indexOf", 1)
        .method(last_index_of, "lastIndexOf", 1)
        .method(slice, "slice", 2)
        .method(substring, "substring", 2)
        .method(substr, "substr", 2)
        .method(to_upper_case, "toUpperCase", 0)
        .method(to_lower_case, "toLowerCase", 0)
        .method(to_upper_case, "toLocaleUpperCase", 0)
        .method(to_lower_case, "toLocaleLowerCase", 0)
        .method(trim, "trim", 0)
        .method(locale_compare, "localeCompare", 1)
        .method(split, "split", 2)
        .method(match_fn, "match", 1)
        .method(search, "search", 1)
        .method(replace, "replace", 2)
        .build();
    crate::builtins::define_global(ctx, "String", Value::Object(ctor));
}

