//! The `Date` constructor and `Date.prototype`.
//!
//! Implements ES5 §15.9's own Day/Time arithmetic rather than handing the
//! whole thing to `chrono`: `chrono` is used only for wall-clock "now" and
//! for calendar field <-> millisecond-since-epoch conversions, through
//! [`chrono::NaiveDateTime`], so every `MakeTime`/`MakeDay`/`TimeClip` edge
//! case (NaN propagation, year-range clipping) stays under direct control.
//! This implementation treats the local time zone as UTC+0 (`LocalTZA` is
//! always `0`) — no host locale database is consulted, no `Intl`.

use crate::context::Context;
use crate::object::{Class, Object};
use crate::value::Value;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

fn time_clip(t: f64) -> f64 {
    if !t.is_finite() || t.abs() > 8.64e15 {
        f64::NAN
    } else {
        t.trunc() + 0.0
    }
}

fn epoch_to_datetime(t: f64) -> Option<NaiveDateTime> {
    if t.is_nan() {
        return None;
    }
    let millis = t as i64;
    chrono::DateTime::from_timestamp_millis(millis).map(|dt| dt.naive_utc())
}

fn datetime_to_epoch(dt: NaiveDateTime) -> f64 {
    dt.and_utc().timestamp_millis() as f64
}

/// `MakeDate`/`MakeDay`/`MakeTime` collapsed into one calendar-field
/// constructor (ES5 §15.9.1.11-13); any `NaN` input propagates to `NaN`.
#[allow(clippy::too_many_arguments)]
fn make_date(year: f64, month: f64, date: f64, hours: f64, minutes: f64, seconds: f64, ms: f64) -> f64 {
    if [year, month, date, hours, minutes, seconds, ms].iter().any(|n| !n.is_finite()) {
        return f64::NAN;
    }
    let year = if (0.0..=99.0).contains(&year) { 1900.0 + year.trunc() } else { year.trunc() };
    let month = month.trunc();
    let extra_years = (month / 12.0).floor();
    let actual_year = year + extra_years;
    let actual_month = (month - extra_years * 12.0) as i64; // normalized to 0..=11

    let Some(base) = NaiveDate::from_ymd_opt(actual_year as i32, actual_month as u32 + 1, 1) else { return f64::NAN };
    let mut naive = base.and_hms_opt(0, 0, 0).unwrap();
    naive += chrono::Duration::days(date as i64 - 1);
    naive += chrono::Duration::hours(hours as i64);
    naive += chrono::Duration::minutes(minutes as i64);
    naive += chrono::Duration::seconds(seconds as i64);
    naive += chrono::Duration::milliseconds(ms as i64);
    time_clip(datetime_to_epoch(naive))
}

fn parse_date_string(s: &str) -> f64 {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return datetime_to_epoch(dt.naive_utc());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
        return datetime_to_epoch(naive);
    }
    if let Ok(naive) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return datetime_to_epoch(naive.and_hms_opt(0, 0, 0).unwrap());
    }
    if let Ok(dt) = chrono::DateTime::parse_from_rfc2822(s) {
        return datetime_to_epoch(dt.naive_utc());
    }
    f64::NAN
}

fn date_value(ctx: &Context<'_>, this: Value) -> Option<f64> {
    this.as_object().and_then(|o| ctx.heap().object(o).kind.date_value)
}

fn require_date(ctx: &mut Context<'_>, this: Value) -> Result<f64, crate::exec::Completion> {
    match this.as_object().filter(|o| ctx.heap().object(*o).class == Class::Date) {
        Some(o) => Ok(ctx.heap().object(o).kind.date_value.unwrap_or(f64::NAN)),
        None => Err(ctx.throw_type_error("Date.prototype method called on non-Date receiver")),
    }
}

fn set_date_value(ctx: &mut Context<'_>, this: Value, t: f64) -> Result<(), crate::exec::Completion> {
    let obj = this.as_object().filter(|o| ctx.heap().object(*o).class == Class::Date)
        .ok_or_else(|| ctx.throw_type_error("Date.prototype method called on non-Date receiver"))?;
    ctx.heap_mut().object_mut(obj).kind.date_value = Some(time_clip(t));
    Ok(())
}

fn constructor(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = match args.len() {
        0 => datetime_to_epoch(chrono::Utc::now().naive_utc()),
        1 => {
            let v = ctx.to_primitive(args[0], crate::value::Hint::Default)?;
            match v {
                Value::String(_) => parse_date_string(&ctx.to_js_string(v)?.as_str()),
                other => time_clip(ctx.to_number(other)?),
            }
        }
        _ => {
            let mut n = Vec::with_capacity(7);
            for i in 0..7 {
                n.push(if i < args.len() { ctx.to_number(args[i])? } else if i == 2 { 1.0 } else { 0.0 });
            }
            make_date(n[0], n[1], n[2], n[3], n[4], n[5], n[6])
        }
    };
    let proto = ctx.intrinsics().date_prototype;
    let mut obj = Object::new(Class::Date, Some(proto));
    obj.kind.date_value = Some(t);
    Ok(Value::Object(ctx.heap_mut().allocate_object(obj)))
}

fn now(_ctx: &mut Context<'_>, _this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    Ok(Value::Number(datetime_to_epoch(chrono::Utc::now().naive_utc())))
}

fn parse(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let s = ctx.to_js_string(arg(args, 0))?.as_str().into_owned();
    Ok(Value::Number(parse_date_string(&s)))
}

fn utc(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let mut n = Vec::with_capacity(7);
    for i in 0..7 {
        n.push(if i < args.len() { ctx.to_number(args[i])? } else if i == 2 { 1.0 } else { 0.0 });
    }
    Ok(Value::Number(make_date(n[0], n[1], n[2], n[3], n[4], n[5], n[6])))
}

fn get_time(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    Ok(Value::Number(require_date(ctx, this)?))
}

fn value_of(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    Ok(Value::Number(require_date(ctx, this)?))
}

macro_rules! getter {
    ($name:ident, $field:ident) => {
        fn $name(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
            let t = require_date(ctx, this)?;
            match epoch_to_datetime(t) {
                None => Ok(Value::number(f64::NAN)),
                Some(dt) => Ok(Value::Number(dt.$field() as f64)),
            }
        }
    };
}

getter!(get_full_year, year);
getter!(get_date, day);
getter!(get_hours, hour);
getter!(get_minutes, minute);
getter!(get_seconds, second);

fn get_month(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    match epoch_to_datetime(t) {
        None => Ok(Value::number(f64::NAN)),
        Some(dt) => Ok(Value::Number((dt.month() - 1) as f64)),
    }
}

fn get_day(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    match epoch_to_datetime(t) {
        None => Ok(Value::number(f64::NAN)),
        Some(dt) => Ok(Value::Number(dt.weekday().num_days_from_sunday() as f64)),
    }
}

fn get_milliseconds(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    match epoch_to_datetime(t) {
        None => Ok(Value::number(f64::NAN)),
        Some(dt) => Ok(Value::Number((dt.nanosecond() / 1_000_000) as f64)),
    }
}

fn get_year(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    match epoch_to_datetime(t) {
        None => Ok(Value::number(f64::NAN)),
        Some(dt) => Ok(Value::Number((dt.year() - 1900) as f64)),
    }
}

fn get_timezone_offset(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    Ok(if t.is_nan() { Value::number(f64::NAN) } else { Value::Number(0.0) })
}

fn set_time(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = ctx.to_number(arg(args, 0))?;
    set_date_value(ctx, this, t)?;
    Ok(Value::Number(time_clip(t)))
}

fn field_or_current(ctx: &mut Context<'_>, dt: Option<NaiveDateTime>, args: &[Value], index: usize, current: impl Fn(&NaiveDateTime) -> f64) -> Result<f64, crate::exec::Completion> {
    if index < args.len() {
        ctx.to_number(args[index])
    } else {
        Ok(dt.map(|d| current(&d)).unwrap_or(0.0))
    }
}

fn set_full_year(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    let dt = epoch_to_datetime(t);
    let year = ctx.to_number(arg(args, 0))?;
    let month = field_or_current(ctx, dt, args, 1, |d| (d.month() - 1) as f64)?;
    let date = field_or_current(ctx, dt, args, 2, |d| d.day() as f64)?;
    let (h, mi, s, ms) = current_time_fields(dt);
    let new_t = make_date(year, month, date, h, mi, s, ms);
    set_date_value(ctx, this, new_t)?;
    Ok(Value::Number(new_t))
}

fn current_time_fields(dt: Option<NaiveDateTime>) -> (f64, f64, f64, f64) {
    match dt {
        None => (0.0, 0.0, 0.0, 0.0),
        Some(d) => (d.hour() as f64, d.minute() as f64, d.second() as f64, (d.nanosecond() / 1_000_000) as f64),
    }
}

fn set_month(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    let dt = epoch_to_datetime(t);
    let year = dt.map(|d| d.year() as f64).unwrap_or(f64::NAN);
    let month = ctx.to_number(arg(args, 0))?;
    let date = field_or_current(ctx, dt, args, 1, |d| d.day() as f64)?;
    let (h, mi, s, ms) = current_time_fields(dt);
    let new_t = make_date(year, month, date, h, mi, s, ms);
    set_date_value(ctx, this, new_t)?;
    Ok(Value::Number(new_t))
}

fn set_date(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    let dt = epoch_to_datetime(t);
    let year = dt.map(|d| d.year() as f64).unwrap_or(f64::NAN);
    let month = dt.map(|d| (d.month() - 1) as f64).unwrap_or(0.0);
    let date = ctx.to_number(arg(args, 0))?;
    let (h, mi, s, ms) = current_time_fields(dt);
    let new_t = make_date(year, month, date, h, mi, s, ms);
    set_date_value(ctx, this, new_t)?;
    Ok(Value::Number(new_t))
}

fn set_hours(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    let dt = epoch_to_datetime(t);
    let year = dt.map(|d| d.year() as f64).unwrap_or(f64::NAN);
    let month = dt.map(|d| (d.month() - 1) as f64).unwrap_or(0.0);
    let date = dt.map(|d| d.day() as f64).unwrap_or(0.0);
    let hours = ctx.to_number(arg(args, 0))?;
    let minutes = field_or_current(ctx, dt, args, 1, |d| d.minute() as f64)?;
    let seconds = field_or_current(ctx, dt, args, 2, |d| d.second() as f64)?;
    let ms = field_or_current(ctx, dt, args, 3, |d| (d.nanosecond() / 1_000_000) as f64)?;
    let new_t = make_date(year, month, date, hours, minutes, seconds, ms);
    set_date_value(ctx, this, new_t)?;
    Ok(Value::Number(new_t))
}

fn set_minutes(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    let dt = epoch_to_datetime(t);
    let year = dt.map(|d| d.year() as f64).unwrap_or(f64::NAN);
    let month = dt.map(|d| (d.month() - 1) as f64).unwrap_or(0.0);
    let date = dt.map(|d| d.day() as f64).unwrap_or(0.0);
    let hours = dt.map(|d| d.hour() as f64).unwrap_or(0.0);
    let minutes = ctx.to_number(arg(args, 0))?;
    let seconds = field_or_current(ctx, dt, args, 1, |d| d.second() as f64)?;
    let ms = field_or_current(ctx, dt, args, 2, |d| (d.nanosecond() / 1_000_000) as f64)?;
    let new_t = make_date(year, month, date, hours, minutes, seconds, ms);
    set_date_value(ctx, this, new_t)?;
    Ok(Value::Number(new_t))
}

fn set_seconds(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    let dt = epoch_to_datetime(t);
    let year = dt.map(|d| d.year() as f64).unwrap_or(f64::NAN);
    let month = dt.map(|d| (d.month() - 1) as f64).unwrap_or(0.0);
    let date = dt.map(|d| d.day() as f64).unwrap_or(0.0);
    let hours = dt.map(|d| d.hour() as f64).unwrap_or(0.0);
    let minutes = dt.map(|d| d.minute() as f64).unwrap_or(0.0);
    let seconds = ctx.to_number(arg(args, 0))?;
    let ms = field_or_current(ctx, dt, args, 1, |d| (d.nanosecond() / 1_000_000) as f64)?;
    let new_t = make_date(year, month, date, hours, minutes, seconds, ms);
    set_date_value(ctx, this, new_t)?;
    Ok(Value::Number(new_t))
}

fn set_milliseconds(ctx: &mut Context<'_>, this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    let dt = epoch_to_datetime(t);
    let year = dt.map(|d| d.year() as f64).unwrap_or(f64::NAN);
    let month = dt.map(|d| (d.month() - 1) as f64).unwrap_or(0.0);
    let date = dt.map(|d| d.day() as f64).unwrap_or(0.0);
    let hours = dt.map(|d| d.hour() as f64).unwrap_or(0.0);
    let minutes = dt.map(|d| d.minute() as f64).unwrap_or(0.0);
    let seconds = dt.map(|d| d.second() as f64).unwrap_or(0.0);
    let ms = ctx.to_number(arg(args, 0))?;
    let new_t = make_date(year, month, date, hours, minutes, seconds, ms);
    set_date_value(ctx, this, new_t)?;
    Ok(Value::Number(new_t))
}

fn to_iso_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    match epoch_to_datetime(t) {
        None => Err(ctx.throw_range_error("invalid date")),
        Some(dt) => Ok(ctx.new_string(dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())),
    }
}

fn to_json(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = date_value(ctx, this).unwrap_or(f64::NAN);
    if !t.is_finite() {
        return Ok(Value::Null);
    }
    to_iso_string(ctx, this, &[])
}

fn to_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    match epoch_to_datetime(t) {
        None => Ok(ctx.new_string("Invalid Date")),
        Some(dt) => Ok(ctx.new_string(dt.format("%a %b %d %Y %H:%M:%S GMT+0000 (Coordinated Universal Time)").to_string())),
    }
}

fn to_date_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    match epoch_to_datetime(t) {
        None => Ok(ctx.new_string("Invalid Date")),
        Some(dt) => Ok(ctx.new_string(dt.format("%a %b %d %Y").to_string())),
    }
}

fn to_time_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    match epoch_to_datetime(t) {
        None => Ok(ctx.new_string("Invalid Date")),
        Some(dt) => Ok(ctx.new_string(dt.format("%H:%M:%S GMT+0000 (Coordinated Universal Time)").to_string())),
    }
}

fn to_utc_string(ctx: &mut Context<'_>, this: Value, _args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let t = require_date(ctx, this)?;
    match epoch_to_datetime(t) {
        None => Ok(ctx.new_string("Invalid Date")),
        Some(dt) => Ok(ctx.new_string(dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string())),
    }
}

pub fn init(ctx: &mut Context<'_>) {
    use crate::object::builder::ConstructorBuilder;

    let proto = ctx.intrinsics().date_prototype;
    {
        let proto_obj = ctx.heap_mut().object_mut(proto);
        proto_obj.kind.date_value = Some(f64::NAN);
    }
    let ctor = ConstructorBuilder::new(ctx, constructor, proto)
        .name("Date")
        .length(7)
        .static_method(now, "now", 0)
        .static_method(parse, "parse", 1)
        .static_method(utc, "UTC", 7)
        .method(get_time, "getTime", 0)
        .method(value_of, "valueOf", 0)
        .method(get_full_year, "getFullYear", 0)
        .method(get_full_year, "getUTCFullYear", 0)
        .method(get_month, "getMonth", 0)
        .method(get_month, "getUTCMonth", 0)
        .method(get_date, "getDate", 0)
        .method(get_date, "getUTCDate", 0)
        .method(get_day, "getDay", 0)
        .method(get_day, "getUTCDay", 0)
        .method(get_hours, "getHours", 0)
        .method(get_hours, "getUTCHours", 0)
        .method(get_minutes, "getMinutes", 0)
        .method(get_minutes, "getUTCMinutes", 0)
        .method(get_seconds, "getSeconds", 0)
        .method(get_seconds, "getUTCSeconds", 0)
        .method(get_milliseconds, "getMilliseconds", 0)
        .method(get_milliseconds, "getUTCMilliseconds", 0)
        .method(get_year, "getYear", 0)
        .method(get_timezone_offset, "getTimezoneOffset", 0)
        .method(set_time, "setTime", 1)
        .method(set_full_year, "setFullYear", 3)
        .method(set_full_year, "setUTCFullYear", 3)
        .method(set_month, "setMonth", 2)
        .method(set_month, "setUTCMonth", 2)
        .method(set_date, "setDate", 1)
        .method(set_date, "setUTCDate", 1)
        .method(set_hours, "setHours", 4)
        .method(set_hours, "setUTCHours", 4)
        .method(set_minutes, "setMinutes", 3)
        .method(set_minutes, "setUTCMinutes", 3)
        .method(set_seconds, "setSeconds", 2)
        .method(set_seconds, "setUTCSeconds", 2)
        .method(set_milliseconds, "setMilliseconds", 1)
        .method(set_milliseconds, "setUTCMilliseconds", 1)
        .method(to_iso_string, "toISOString", 0)
        .method(to_json, "toJSON", 1)
        .method(to_string, "toString", 0)
        .method(to_date_string, "toDateString", 0)
        .method(to_time_string, "toTimeString", 0)
        .method(to_utc_string, "toUTCString", 0)
        .method(to_utc_string, "toGMTString", 0)
        .build();
    crate::builtins::define_global(ctx, "Date", Value::Object(ctor));
}
