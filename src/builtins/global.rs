//! Global function and value properties: `eval` (indirect form only —
//! direct `eval` is special-cased by the evaluator at the call site, see
//! `crate::exec::call_eval`), `parseInt`/`parseFloat`, `isNaN`/`isFinite`,
//! the URI encode/decode family (ES5 §15.1.3), and the `NaN`/`Infinity`/
//! `undefined`/`global` value properties of the global object.
//!
//! The encode half of the URI family is built over `percent_encoding`; the
//! decode half is hand-rolled because ES5's "leave reserved characters
//! escaped" rule for `decodeURI` has no equivalent in that crate's
//! all-or-nothing decode API.

use crate::context::Context;
use crate::object::PropertyDescriptor;
use crate::value::Value;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

const URI_UNRESERVED_EXTRA: &[u8] = b"-_.!~*'()";
const URI_RESERVED: &[u8] = b";/?:@&=+$,#";

fn uri_component_set() -> AsciiSet {
    let mut set = *NON_ALPHANUMERIC;
    for &b in URI_UNRESERVED_EXTRA {
        set = set.remove(b);
    }
    set
}

fn uri_whole_set() -> AsciiSet {
    let mut set = uri_component_set();
    for &b in URI_RESERVED {
        set = set.remove(b);
    }
    set
}

fn decode_uri_impl(s: &str, reserved: &[u8]) -> Result<String, ()> {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            if i + 2 >= bytes.len() {
                return Err(());
            }
            let hi = (bytes[i + 1] as char).to_digit(16).ok_or(())?;
            let lo = (bytes[i + 2] as char).to_digit(16).ok_or(())?;
            let decoded = ((hi as u8) << 4) | (lo as u8);
            if reserved.contains(&decoded) {
                out.extend_from_slice(&bytes[i..i + 3]);
            } else {
                out.push(decoded);
            }
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).map_err(|_| ())
}

fn eval_fn(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let Some(Value::String(s)) = args.first().copied() else {
        return Ok(arg(args, 0));
    };
    let src = ctx.heap().string(s).as_str().into_owned();
    let env = ctx.global_env();
    let global = Value::Object(ctx.global_object());
    ctx.eval_source(&src, &env, global, false)
}

fn is_nan(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let n = ctx.to_number(arg(args, 0))?;
    Ok(Value::Boolean(n.is_nan()))
}

fn is_finite(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let n = ctx.to_number(arg(args, 0))?;
    Ok(Value::Boolean(n.is_finite()))
}

fn parse_int(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let input = ctx.to_js_string(arg(args, 0))?.as_str().into_owned();
    let s = input.trim_start_matches(crate::value::is_es5_whitespace);
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };

    let radix_arg = arg(args, 1);
    let mut radix = if radix_arg.is_undefined() { 0 } else { ctx.to_int32(radix_arg)? };
    let mut s = s;
    let mut strip_prefix = true;
    if radix != 0 {
        if !(2..=36).contains(&radix) {
            return Ok(Value::number(f64::NAN));
        }
        strip_prefix = radix == 16;
    } else {
        radix = 10;
    }
    if strip_prefix {
        if let Some(rest) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            s = rest;
            radix = 16;
        }
    }

    let mut end = 0;
    for c in s.chars() {
        match c.to_digit(radix as u32) {
            Some(_) => end += c.len_utf8(),
            None => break,
        }
    }
    if end == 0 {
        return Ok(Value::number(f64::NAN));
    }
    let digits = &s[..end];
    let mut result = 0.0_f64;
    for c in digits.chars() {
        let digit = c.to_digit(radix as u32).unwrap();
        result = result * radix as f64 + digit as f64;
    }
    Ok(Value::Number(if negative { -result } else { result }))
}

fn parse_float(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let input = ctx.to_js_string(arg(args, 0))?.as_str().into_owned();
    let s = input.trim_start_matches(crate::value::is_es5_whitespace);

    if s.starts_with("Infinity") || s.starts_with("+Infinity") {
        return Ok(Value::Number(f64::INFINITY));
    }
    if s.starts_with("-Infinity") {
        return Ok(Value::Number(f64::NEG_INFINITY));
    }

    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let mut saw_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        saw_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            saw_digit = true;
        }
    }
    if !saw_digit {
        return Ok(Value::number(f64::NAN));
    }
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }
    s[..end].parse::<f64>().map(Value::Number).or(Ok(Value::number(f64::NAN)))
}

fn encode_uri(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = ctx.to_js_string(arg(args, 0))?.as_str().into_owned();
    let set = uri_whole_set();
    Ok(ctx.new_string(utf8_percent_encode(&s, &set).to_string()))
}

fn encode_uri_component(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = ctx.to_js_string(arg(args, 0))?.as_str().into_owned();
    let set = uri_component_set();
    Ok(ctx.new_string(utf8_percent_encode(&s, &set).to_string()))
}

fn decode_uri(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = ctx.to_js_string(arg(args, 0))?.as_str().into_owned();
    let mut reserved = URI_RESERVED.to_vec();
    reserved.push(b'#');
    decode_uri_impl(&s, &reserved).map(|decoded| ctx.new_string(decoded)).map_err(|_| ctx.throw_uri_error("URI malformed"))
}

fn decode_uri_component(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = ctx.to_js_string(arg(args, 0))?.as_str().into_owned();
    decode_uri_impl(&s, &[]).map(|decoded| ctx.new_string(decoded)).map_err(|_| ctx.throw_uri_error("URI malformed"))
}

fn is_escape_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '@' | '*' | '_' | '+' | '-' | '.' | '/')
}

/// ES5 Annex B.2.1, operating on UTF-16 code units.
fn escape(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = ctx.to_js_string(arg(args, 0))?;
    let mut out = String::new();
    for &unit in s.units() {
        if let Some(c) = char::from_u32(unit as u32) {
            if is_escape_safe(c) {
                out.push(c);
                continue;
            }
        }
        if unit <= 0xFF {
            out.push_str(&format!("%{unit:02X}"));
        } else {
            out.push_str(&format!("%u{unit:04X}"));
        }
    }
    Ok(ctx.new_string(out))
}

/// ES5 Annex B.2.2, the inverse of [`escape`].
fn unescape(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = ctx.to_js_string(arg(args, 0))?;
    let units = s.units();
    let mut out = Vec::with_capacity(units.len());
    let mut i = 0;
    while i < units.len() {
        if units[i] == u16::from(b'%') {
            if units.get(i + 1) == Some(&u16::from(b'u')) && units.len() >= i + 6 {
                if let Some(code) = hex_units(&units[i + 2..i + 6]) {
                    out.push(code);
                    i += 6;
                    continue;
                }
            }
            if units.len() >= i + 3 {
                if let Some(code) = hex_units(&units[i + 1..i + 3]) {
                    out.push(code);
                    i += 3;
                    continue;
                }
            }
        }
        out.push(units[i]);
        i += 1;
    }
    Ok(Value::String(ctx.heap_mut().allocate_string(crate::value::JsString::from(out))))
}

fn hex_units(units: &[u16]) -> Option<u16> {
    let mut value = 0u16;
    for &u in units {
        let c = char::from_u32(u as u32)?;
        let digit = c.to_digit(16)?;
        value = value * 16 + digit as u16;
    }
    Some(value)
}

pub fn init(ctx: &mut Context<'_>) {
    use crate::object::builder::FunctionBuilder;

    let eval = FunctionBuilder::native(ctx, eval_fn).name("eval").length(1).build();
    let parse_int_fn = FunctionBuilder::native(ctx, parse_int).name("parseInt").length(2).build();
    let parse_float_fn = FunctionBuilder::native(ctx, parse_float).name("parseFloat").length(1).build();
    let is_nan_fn = FunctionBuilder::native(ctx, is_nan).name("isNaN").length(1).build();
    let is_finite_fn = FunctionBuilder::native(ctx, is_finite).name("isFinite").length(1).build();
    let encode_uri_fn = FunctionBuilder::native(ctx, encode_uri).name("encodeURI").length(1).build();
    let encode_uri_component_fn = FunctionBuilder::native(ctx, encode_uri_component).name("encodeURIComponent").length(1).build();
    let decode_uri_fn = FunctionBuilder::native(ctx, decode_uri).name("decodeURI").length(1).build();
    let decode_uri_component_fn = FunctionBuilder::native(ctx, decode_uri_component).name("decodeURIComponent").length(1).build();
    let escape_fn = FunctionBuilder::native(ctx, escape).name("escape").length(1).build();
    let unescape_fn = FunctionBuilder::native(ctx, unescape).name("unescape").length(1).build();

    crate::builtins::define_global(ctx, "eval", Value::Object(eval));
    crate::builtins::define_global(ctx, "parseInt", Value::Object(parse_int_fn));
    crate::builtins::define_global(ctx, "parseFloat", Value::Object(parse_float_fn));
    crate::builtins::define_global(ctx, "isNaN", Value::Object(is_nan_fn));
    crate::builtins::define_global(ctx, "isFinite", Value::Object(is_finite_fn));
    crate::builtins::define_global(ctx, "encodeURI", Value::Object(encode_uri_fn));
    crate::builtins::define_global(ctx, "encodeURIComponent", Value::Object(encode_uri_component_fn));
    crate::builtins::define_global(ctx, "decodeURI", Value::Object(decode_uri_fn));
    crate::builtins::define_global(ctx, "decodeURIComponent", Value::Object(decode_uri_component_fn));
    crate::builtins::define_global(ctx, "escape", Value::Object(escape_fn));
    crate::builtins::define_global(ctx, "unescape", Value::Object(unescape_fn));

    let global = ctx.global_object();
    {
        let global_obj = ctx.heap_mut().object_mut(global);
        global_obj.set_own_property("NaN", PropertyDescriptor::data(Value::number(f64::NAN), false, false, false));
        global_obj.set_own_property("Infinity", PropertyDescriptor::data(Value::Number(f64::INFINITY), false, false, false));
        global_obj.set_own_property("undefined", PropertyDescriptor::data(Value::Undefined, false, false, false));
    }
    crate::builtins::define_global(ctx, "global", Value::Object(global));
}
