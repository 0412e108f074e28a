//! `JSON.parse`/`JSON.stringify` (ES5 §15.12), implemented directly against
//! this crate's own value model rather than bridged through `serde_json`:
//! `stringify` needs to invoke
//! `toJSON` hooks and walk live heap objects, and `parse` needs to hand back
//! `crate::value::Value`s sharing this realm's heap, so a small recursive-
//! descent parser/printer pair over this crate's own types fits better than
//! round-tripping through an intermediate `serde_json::Value`.

use crate::context::Context;
use crate::object::{Class, Object, PropertyDescriptor};
use crate::value::Value;

fn arg(args: &[Value], i: usize) -> Value {
    args.get(i).copied().unwrap_or(Value::Undefined)
}

// ---- JSON.parse ----

struct Parser<'s> {
    chars: Vec<char>,
    pos: usize,
    _src: std::marker::PhantomData<&'s str>,
}

impl<'s> Parser<'s> {
    fn new(s: &'s str) -> Self {
        Self { chars: s.chars().collect(), pos: 0, _src: std::marker::PhantomData }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\n' | '\r')) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, c: char) -> Result<(), String> {
        if self.bump() == Some(c) {
            Ok(())
        } else {
            Err(format!("expected '{c}'"))
        }
    }

    fn parse_literal(&mut self, lit: &str, value: Value) -> Result<Value, String> {
        for expected in lit.chars() {
            if self.bump() != Some(expected) {
                return Err(format!("invalid JSON literal, expected '{lit}'"));
            }
        }
        Ok(value)
    }

    fn parse_string_raw(&mut self) -> Result<String, String> {
        self.expect('"')?;
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err("unterminated string".to_string()),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('"') => out.push('"'),
                    Some('\\') => out.push('\\'),
                    Some('/') => out.push('/'),
                    Some('b') => out.push('\u{0008}'),
                    Some('f') => out.push('\u{000C}'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some('u') => {
                        let mut code = 0u32;
                        for _ in 0..4 {
                            let d = self.bump().ok_or("unterminated unicode escape")?;
                            code = code * 16 + d.to_digit(16).ok_or("invalid unicode escape")?;
                        }
                        if let Some(c) = char::from_u32(code) {
                            out.push(c);
                        }
                    }
                    _ => return Err("invalid escape".to_string()),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_value(&mut self, ctx: &mut Context<'_>) -> Result<Value, String> {
        self.skip_ws();
        match self.peek() {
            Some('{') => self.parse_object(ctx),
            Some('[') => self.parse_array(ctx),
            Some('"') => {
                let s = self.parse_string_raw()?;
                Ok(ctx.new_string(s))
            }
            Some('t') => self.parse_literal("true", Value::Boolean(true)),
            Some('f') => self.parse_literal("false", Value::Boolean(false)),
            Some('n') => self.parse_literal("null", Value::Null),
            Some(c) if c == '-' || c.is_ascii_digit() => self.parse_number(),
            _ => Err("unexpected token in JSON".to_string()),
        }
    }

    fn parse_number(&mut self) -> Result<Value, String> {
        let start = self.pos;
        if self.peek() == Some('-') {
            self.bump();
        }
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.bump();
        }
        if self.peek() == Some('.') {
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
                self.bump();
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse::<f64>().map(Value::Number).map_err(|_| "invalid number".to_string())
    }

    fn parse_object(&mut self, ctx: &mut Context<'_>) -> Result<Value, String> {
        self.expect('{')?;
        let proto = ctx.object_prototype();
        let obj = ctx.heap_mut().allocate_object(Object::new(Class::Object, Some(proto)));
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Value::Object(obj));
        }
        loop {
            self.skip_ws();
            let key = self.parse_string_raw()?;
            self.skip_ws();
            self.expect(':')?;
            let value = self.parse_value(ctx)?;
            ctx.heap_mut().object_mut(obj).set_own_property(key, PropertyDescriptor::data(value, true, true, true));
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some('}') => break,
                _ => return Err("expected ',' or '}'".to_string()),
            }
        }
        Ok(Value::Object(obj))
    }

    fn parse_array(&mut self, ctx: &mut Context<'_>) -> Result<Value, String> {
        self.expect('[')?;
        self.skip_ws();
        let mut elements = Vec::new();
        if self.peek() == Some(']') {
            self.bump();
            return Ok(Value::Object(crate::builtins::array::new_array(ctx, elements)));
        }
        loop {
            let value = self.parse_value(ctx)?;
            elements.push(value);
            self.skip_ws();
            match self.bump() {
                Some(',') => continue,
                Some(']') => break,
                _ => return Err("expected ',' or ']'".to_string()),
            }
        }
        Ok(Value::Object(crate::builtins::array::new_array(ctx, elements)))
    }
}

fn parse(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let text = ctx.to_js_string(arg(args, 0))?.as_str().into_owned();
    let mut parser = Parser::new(&text);
    let value = parser.parse_value(ctx).map_err(|e| ctx.throw_syntax_error(&e))?;
    parser.skip_ws();
    if parser.pos != parser.chars.len() {
        return Err(ctx.throw_syntax_error("unexpected trailing characters in JSON"));
    }
    let reviver = arg(args, 1);
    if ctx.is_callable(reviver) {
        let proto = ctx.object_prototype();
        let holder = ctx.heap_mut().allocate_object(Object::new(Class::Object, Some(proto)));
        ctx.heap_mut().object_mut(holder).set_own_property("", PropertyDescriptor::data(value, true, true, true));
        return walk(ctx, holder, "", reviver);
    }
    Ok(value)
}

fn walk(ctx: &mut Context<'_>, holder: crate::heap::ObjectHandle, key: &str, reviver: Value) -> Result<Value, crate::exec::Completion> {
    let value = ctx.get(holder, key)?;
    if let Value::Object(obj) = value {
        let is_array = ctx.heap().object(obj).class == Class::Array;
        if is_array {
            let length_val = ctx.get(obj, "length")?;
            let len = ctx.to_uint32(length_val)?;
            for i in 0..len {
                let element_key = i.to_string();
                let revived = walk(ctx, obj, &element_key, reviver)?;
                if revived.is_undefined() {
                    ctx.heap_mut().object_mut(obj).remove_own_property(&element_key);
                } else {
                    ctx.put(obj, &element_key, revived, false)?;
                }
            }
        } else {
            let keys: Vec<String> = ctx.heap().object(obj).own_enumerable_keys().map(String::from).collect();
            for k in keys {
                let revived = walk(ctx, obj, &k, reviver)?;
                if revived.is_undefined() {
                    ctx.heap_mut().object_mut(obj).remove_own_property(&k);
                } else {
                    ctx.put(obj, &k, revived, false)?;
                }
            }
        }
    }
    let key_value = ctx.new_string(key.to_string());
    ctx.call(reviver, Value::Object(holder), &[key_value, value])
}

// ---- JSON.stringify ----

struct Stringifier {
    replacer_fn: Option<Value>,
    property_list: Option<Vec<String>>,
    gap: String,
    stack: Vec<crate::heap::ObjectHandle>,
}

impl Stringifier {
    fn str_value(&mut self, ctx: &mut Context<'_>, key: &str, holder: crate::heap::ObjectHandle) -> Result<Option<String>, crate::exec::Completion> {
        let mut value = ctx.get(holder, key)?;
        if let Value::Object(obj) = value {
            let to_json = ctx.get(obj, "toJSON")?;
            if ctx.is_callable(to_json) {
                let key_value = ctx.new_string(key.to_string());
                value = ctx.call(to_json, Value::Object(obj), &[key_value])?;
            }
        }
        if let Some(replacer) = self.replacer_fn {
            let key_value = ctx.new_string(key.to_string());
            value = ctx.call(replacer, Value::Object(holder), &[key_value, value])?;
        }
        if let Value::Object(obj) = value {
            let class = ctx.heap().object(obj).class;
            if let Some(prim) = ctx.heap().object(obj).kind.primitive {
                value = match class {
                    Class::Number | Class::String | Class::Boolean => prim,
                    _ => value,
                };
            }
        }
        match value {
            Value::Null => Ok(Some("null".to_string())),
            Value::Boolean(b) => Ok(Some(b.to_string())),
            Value::Number(n) => Ok(Some(if n.is_finite() { crate::value::number_to_string(n) } else { "null".to_string() })),
            Value::String(s) => {
                let text = ctx.heap().string(s).as_str().into_owned();
                Ok(Some(quote(&text)))
            }
            Value::Object(obj) if !ctx.heap().object(obj).is_callable() => self.str_object(ctx, obj).map(Some),
            _ => Ok(None),
        }
    }

    fn str_object(&mut self, ctx: &mut Context<'_>, obj: crate::heap::ObjectHandle) -> Result<String, crate::exec::Completion> {
        if self.stack.contains(&obj) {
            return Err(ctx.throw_type_error("converting circular structure to JSON"));
        }
        self.stack.push(obj);
        let is_array = ctx.heap().object(obj).class == Class::Array;
        let result = if is_array {
            self.str_array(ctx, obj)
        } else {
            self.str_plain_object(ctx, obj)
        };
        self.stack.pop();
        result
    }

    fn str_array(&mut self, ctx: &mut Context<'_>, obj: crate::heap::ObjectHandle) -> Result<String, crate::exec::Completion> {
        let length_val = ctx.get(obj, "length")?;
        let len = ctx.to_uint32(length_val)?;
        let mut parts = Vec::with_capacity(len as usize);
        for i in 0..len {
            let rendered = self.str_value(ctx, &i.to_string(), obj)?.unwrap_or_else(|| "null".to_string());
            parts.push(rendered);
        }
        Ok(if parts.is_empty() { "[]".to_string() } else if self.gap.is_empty() {
            format!("[{}]", parts.join(","))
        } else {
            format!("[\n{}\n]", parts.join(",\n"))
        })
    }

    fn str_plain_object(&mut self, ctx: &mut Context<'_>, obj: crate::heap::ObjectHandle) -> Result<String, crate::exec::Completion> {
        let keys = match &self.property_list {
            Some(list) => list.clone(),
            None => ctx.heap().object(obj).own_enumerable_keys().map(String::from).collect(),
        };
        let mut parts = Vec::new();
        for key in keys {
            if let Some(rendered) = self.str_value(ctx, &key, obj)? {
                parts.push(format!("{}:{}", quote(&key), rendered));
            }
        }
        Ok(if parts.is_empty() { "{}".to_string() } else { format!("{{{}}}", parts.join(",")) })
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn stringify(ctx: &mut Context<'_>, _this: Value, args: &[Value]) -> Result<Value, crate::exec::Completion> {
    let value = arg(args, 0);
    let replacer = arg(args, 1);
    let (replacer_fn, property_list) = if ctx.is_callable(replacer) {
        (Some(replacer), None)
    } else if let Value::Object(o) = replacer {
        if ctx.heap().object(o).class == Class::Array {
            let length_val = ctx.get(o, "length")?;
            let len = ctx.to_uint32(length_val)?;
            let mut list = Vec::new();
            for i in 0..len {
                let item = ctx.get(o, &i.to_string())?;
                if let Value::String(s) = item {
                    list.push(ctx.heap().string(s).as_str().into_owned());
                }
            }
            (None, Some(list))
        } else {
            (None, None)
        }
    } else {
        (None, None)
    };

    let space_arg = arg(args, 2);
    let gap = match space_arg {
        Value::Number(n) => " ".repeat((n as usize).min(10)),
        Value::String(s) => {
            let text = ctx.heap().string(s).as_str().into_owned();
            text.chars().take(10).collect()
        }
        _ => String::new(),
    };

    let mut stringifier = Stringifier { replacer_fn, property_list, gap, stack: Vec::new() };
    let proto = ctx.object_prototype();
    let holder = ctx.heap_mut().allocate_object(Object::new(Class::Object, Some(proto)));
    ctx.heap_mut().object_mut(holder).set_own_property("", PropertyDescriptor::data(value, true, true, true));
    match stringifier.str_value(ctx, "", holder)? {
        Some(s) => Ok(ctx.new_string(s)),
        None => Ok(Value::Undefined),
    }
}

pub fn init(ctx: &mut Context<'_>) {
    use crate::object::builder::ObjectInitializer;

    let proto = ctx.object_prototype();
    let json = ctx.heap_mut().allocate_object(Object::new(Class::Json, Some(proto)));
    ObjectInitializer::with_object(ctx, json)
        .function(parse, "parse", 2)
        .function(stringify, "stringify", 3)
        .build();
    crate::builtins::define_global(ctx, "JSON", Value::Object(json));
}
