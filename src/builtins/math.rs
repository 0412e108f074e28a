//! The `Math` object: a plain (non-constructor) object with constant
//! data properties and native function properties, built directly via
//! [`crate::object::builder::ObjectInitializer`] since there is no
//! constructor/prototype pair to wire up.

use crate::context::Context;
use crate::object::{Class, Object};
use crate::value::Value;
use rand::Rng;

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

fn unary(f: impl Fn(f64) -> f64) -> impl Fn(&mut Context<'_>, Value, &[Value]) -> Result<Value, crate::exec::Completion> {
    move |ctx, _this, args| {
        let x = ctx.to_number(arg(args, 0))?;
        Ok(Value::Number(f(x)))
    }
}

fn abs(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let x = ctx.to_number(arg(args, 0))?;
    Ok(Value::Number(x.abs()))
}

fn floor(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let x = ctx.to_number(arg(args, 0))?;
    Ok(Value::Number(x.floor()))
}

fn ceil(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let x = ctx.to_number(arg(args, 0))?;
    Ok(Value::Number(x.ceil()))
}

fn round(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let x = ctx.to_number(arg(args, 0))?;
    // ES5 §15.8.2.15: round half toward +Infinity, not Rust's round-half-away-from-zero.
    Ok(Value::Number((x + 0.5).floor()))
}

fn sqrt(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let x = ctx.to_number(arg(args, 0))?;
    Ok(Value::Number(x.sqrt()))
}

fn pow(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let base = ctx.to_number(arg(args, 0))?;
    let exp = ctx.to_number(arg(args, 1))?;
    Ok(Value::Number(base.powf(exp)))
}

fn min(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let mut result = f64::INFINITY;
    for a in args {
        let n = ctx.to_number(*a)?;
        if n.is_nan() {
            return Ok(Value::number(f64::NAN));
        }
        if n < result || (n == 0.0 && result == 0.0 && n.is_sign_negative()) {
            result = n;
        }
    }
    Ok(Value::Number(result))
}

fn max(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let mut result = f64::NEG_INFINITY;
    for a in args {
        let n = ctx.to_number(*a)?;
        if n.is_nan() {
            return Ok(Value::number(f64::NAN));
        }
        if n > result || (n == 0.0 && result == 0.0 && n.is_sign_positive()) {
            result = n;
        }
    }
    Ok(Value::Number(result))
}

fn random(_ctx: &mut Context<'_>, _this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    Ok(Value::Number(rand::thread_rng().gen_range(0.0..1.0)))
}

fn atan2(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let y = ctx.to_number(arg(args, 0))?;
    let x = ctx.to_number(arg(args, 1))?;
    Ok(Value::Number(y.atan2(x)))
}

pub fn init(ctx: &mut Context<'_>) {
    use crate::object::builder::{FunctionBuilder, ObjectInitializer};

    let proto = ctx.object_prototype();
    let math = ctx.heap_mut().allocate_object(Object::new(Class::Math, Some(proto)));

    let sin = FunctionBuilder::native(ctx, sin_fn).name("sin").length(1).build();
    let cos = FunctionBuilder::native(ctx, cos_fn).name("cos").length(1).build();
    let tan = FunctionBuilder::native(ctx, tan_fn).name("tan").length(1).build();
    let asin = FunctionBuilder::native(ctx, asin_fn).name("asin").length(1).build();
    let acos = FunctionBuilder::native(ctx, acos_fn).name("acos").length(1).build();
    let atan = FunctionBuilder::native(ctx, atan_fn).name("atan").length(1).build();
    let exp = FunctionBuilder::native(ctx, exp_fn).name("exp").length(1).build();
    let log = FunctionBuilder::native(ctx, log_fn).name("log").length(1).build();

    ObjectInitializer::with_object(ctx, math)
        .readonly_property("E", Value::Number(std::f64::consts::E))
        .readonly_property("LN10", Value::Number(std::f64::consts::LN_10))
        .readonly_property("LN2", Value::Number(std::f64::consts::LN_2))
        .readonly_property("LOG2E", Value::Number(std::f64::consts::LOG2_E))
        .readonly_property("LOG10E", Value::Number(std::f64::consts::LOG10_E))
        .readonly_property("PI", Value::Number(std::f64::consts::PI))
        .readonly_property("SQRT1_2", Value::Number(std::f64::consts::FRAC_1_SQRT_2))
        .readonly_property("SQRT2", Value::Number(std::f64::consts::SQRT_2))
        .function(abs, "abs", 1)
        .function(floor, "floor", 1)
        .function(ceil, "ceil", 1)
        .function(round, "round", 1)
        .function(sqrt, "sqrt", 1)
        .function(pow, "pow", 2)
        .function(min, "min", 2)
        .function(max, "max", 2)
        .function(random, "random", 0)
        .function(atan2, "atan2", 2)
        .property("sin", Value::Object(sin), false)
        .property("cos", Value::Object(cos), false)
        .property("tan", Value::Object(tan), false)
        .property("asin", Value::Object(asin), false)
        .property("acos", Value::Object(acos), false)
        .property("atan", Value::Object(atan), false)
        .property("exp", Value::Object(exp), false)
        .property("log", Value::Object(log), false)
        .build();

    crate::builtins::define_global(ctx, "Math", Value::Object(math));
}

fn sin_fn(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    unary(f64::sin)(ctx, this, args)
}
fn cos_fn(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    unary(f64::cos)(ctx, this, args)
}
fn tan_fn(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    unary(f64::tan)(ctx, this, args)
}
fn asin_fn(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    unary(f64::asin)(ctx, this, args)
}
fn acos_fn(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    unary(f64::acos)(ctx, this, args)
}
fn atan_fn(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    unary(f64::atan)(ctx, this, args)
}
fn exp_fn(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    unary(f64::exp)(ctx, this, args)
}
fn log_fn(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    unary(f64::ln)(ctx, this, args)
}
