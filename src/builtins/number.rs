//! The `Number` constructor and `Number.prototype`.
//!
//! `toFixed`/`toPrecision`/`toExponential` are implemented directly against
//! Rust's own `{:.*}` formatting and manual exponent assembly rather than
//! `ryu_js`, whose shortest-round-trip output isn't what these want — they
//! need a fixed digit count.

use crate::context::Context;
use crate::value::Value;

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

fn this_number(ctx: &mut Context<'_>, this: Value) -> Result<f64, crate::exec::Completion> {
    match this {
        Value::Number(n) => Ok(n),
        Value::Object(o) => match ctx.heap().object(o).kind.primitive {
            Some(Value::Number(n)) => Ok(n),
            _ => Err(ctx.throw_type_error("Number.prototype method called on incompatible receiver")),
        },
        _ => Err(ctx.throw_type_error("Number.prototype method called on incompatible receiver")),
    }
}

fn constructor(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let n = if args.is_empty() { 0.0 } else { ctx.to_number(args[0])? };
    Ok(Value::Number(n))
}

fn to_string(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let n = this_number(ctx, this)?;
    let radix_arg = arg(args, 0);
    let radix = if radix_arg.is_undefined() { 10 } else { ctx.to_integer(radix_arg)? as u32 };
    if radix == 10 {
        return Ok(ctx.new_string(crate::value::number_to_string(n)));
    }
    if !(2..=36).contains(&radix) {
        return Err(ctx.throw_range_error("toString() radix must be between 2 and 36"));
    }
    Ok(ctx.new_string(number_to_radix_string(n, radix)))
}

fn number_to_radix_string(n: f64, radix: u32) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity".to_string() } else { "-Infinity".to_string() };
    }
    let negative = n.is_sign_negative() && n != 0.0;
    let mut int_part = n.abs().trunc() as u64;
    let mut frac_part = n.abs().fract();
    let digits = "0123456789abcdefghijklmnopqrstuvwxyz".as_bytes();

    let mut int_digits = Vec::new();
    if int_part == 0 {
        int_digits.push(b'0');
    }
    while int_part > 0 {
        int_digits.push(digits[(int_part % radix as u64) as usize]);
        int_part /= radix as u64;
    }
    int_digits.reverse();

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(std::str::from_utf8(&int_digits).unwrap());

    if frac_part > 0.0 {
        out.push('.');
        for _ in 0..20 {
            if frac_part <= 0.0 {
                break;
            }
            frac_part *= radix as f64;
            let digit = frac_part.trunc() as usize;
            out.push(digits[digit] as char);
            frac_part -= digit as f64;
        }
    }
    out
}

fn to_locale_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let n = this_number(ctx, this)?;
    Ok(ctx.new_string(crate::value::number_to_string(n)))
}

fn value_of(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    Ok(Value::Number(this_number(ctx, this)?))
}

fn to_fixed(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let n = this_number(ctx, this)?;
    let digits_arg = arg(args, 0);
    let digits = if digits_arg.is_undefined() { 0 } else { ctx.to_integer(digits_arg)? as i64 };
    if !(0..=20).contains(&digits) {
        return Err(ctx.throw_range_error("toFixed() digits argument must be between 0 and 20"));
    }
    if n.is_nan() {
        return Ok(ctx.new_string("NaN"));
    }
    if n.abs() >= 1e21 {
        return Ok(ctx.new_string(crate::value::number_to_string(n)));
    }
    Ok(ctx.new_string(format!("{:.*}", digits as usize, n)))
}

fn to_exponential(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let n = this_number(ctx, this)?;
    if n.is_nan() {
        return Ok(ctx.new_string("NaN"));
    }
    if n.is_infinite() {
        return Ok(ctx.new_string(crate::value::number_to_string(n)));
    }
    let digits_arg = arg(args, 0);
    let digits = if digits_arg.is_undefined() { None } else { Some(ctx.to_integer(digits_arg)? as i64) };
    if let Some(d) = digits {
        if !(0..=20).contains(&d) {
            return Err(ctx.throw_range_error("toExponential() digits argument must be between 0 and 20"));
        }
    }
    let precision = digits.unwrap_or(6) as usize;
    let formatted = format!("{:.*e}", precision, n);
    Ok(ctx.new_string(normalize_exponential(&formatted)))
}

/// Rust's `{:e}` writes `1e0`; ES5 wants `1e+0`.
fn normalize_exponential(s: &str) -> String {
    if let Some(pos) = s.find('e') {
        let (mantissa, exp) = s.split_at(pos);
        let exp = &exp[1..];
        if let Some(stripped) = exp.strip_prefix('-') {
            format!("{mantissa}e-{stripped}")
        } else {
            format!("{mantissa}e+{exp}")
        }
    } else {
        s.to_string()
    }
}

fn to_precision(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let n = this_number(ctx, this)?;
    let precision_arg = arg(args, 0);
    if precision_arg.is_undefined() {
        return Ok(ctx.new_string(crate::value::number_to_string(n)));
    }
    let precision = ctx.to_integer(precision_arg)? as i64;
    if n.is_nan() || n.is_infinite() {
        return Ok(ctx.new_string(crate::value::number_to_string(n)));
    }
    if !(1..=21).contains(&precision) {
        return Err(ctx.throw_range_error("toPrecision() argument must be between 1 and 21"));
    }
    if n == 0.0 {
        return Ok(ctx.new_string(format!("{:.*}", (precision - 1) as usize, 0.0)));
    }
    let exponent = n.abs().log10().floor() as i64;
    if exponent < -6 || exponent >= precision {
        let formatted = format!("{:.*e}", (precision - 1) as usize, n);
        return Ok(ctx.new_string(normalize_exponential(&formatted)));
    }
    let decimals = (precision - 1 - exponent).max(0) as usize;
    Ok(ctx.new_string(format!("{:.*}", decimals, n)))
}

pub fn init(ctx: &mut Context<'_>) {
    use crate::object::builder::ConstructorBuilder;

    let proto = ctx.intrinsics().number_prototype;
    {
        let proto_obj = ctx.heap_mut().object_mut(proto);
        proto_obj.kind.primitive = Some(Value::Number(0.0));
    }
    let ctor = ConstructorBuilder::new(ctx, constructor, proto)
        .name("Number")
        .length(1)
        .method(to_string, "toString", 1)
        .method(to_locale_string, "toLocaleString", 0)
        .method(value_of, "valueOf", 0)
        .method(to_fixed, "toFixed", 1)
        .method(to_exponential, "toExponential", 1)
        .method(to_precision, "toPrecision", 1)
        .build();
    {
        let ctor_obj = ctx.heap_mut().object_mut(ctor);
        use crate::object::PropertyDescriptor;
        ctor_obj.set_own_property("MAX_VALUE", PropertyDescriptor::data(Value::Number(f64::MAX), false, false, false));
        ctor_obj.set_own_property("MIN_VALUE", PropertyDescriptor::data(Value::Number(5e-324), false, false, false));
        ctor_obj.set_own_property("NaN", PropertyDescriptor::data(Value::number(f64::NAN), false, false, false));
        ctor_obj.set_own_property("POSITIVE_INFINITY", PropertyDescriptor::data(Value::Number(f64::INFINITY), false, false, false));
        ctor_obj.set_own_property("NEGATIVE_INFINITY", PropertyDescriptor::data(Value::Number(f64::NEG_INFINITY), false, false, false));
    }
    crate::builtins::define_global(ctx, "Number", Value::Object(ctor));
}
