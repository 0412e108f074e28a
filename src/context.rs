//! The interpreter's single entry point: owns nothing but a borrowed
//! [`Heap`] and the handles needed to bootstrap and run scripts against it.
//!
//! A realm's prototypes plus a `Heap`, but the heap is created separately by
//! the caller and *borrowed* rather than owned — creating a heap and
//! creating an interpreter bound to it are two distinct steps, so a caller
//! that wants to run many independent scripts while periodically checking
//! `use_percentage`/calling `garbage_collect` between them can reuse one
//! heap across many short-lived `Context`s.

use crate::environment::Environment;
use crate::error::EngineError;
use crate::exec::Completion;
use crate::heap::{Heap, ObjectHandle, StringHandle, Trace};
use crate::object::{Class, Object, PropertyDescriptor, ValueResult};
use crate::syntax::ast::Program;
use crate::value::{number_to_string, Hint, JsString, Value};

/// The ES5 edition tag. A single variant today; kept as an enum (rather
/// than a unit struct) so the version is a first-class, explicit setting
/// rather than an implicit constant, and a later edition can be added
/// without changing the public surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EsVersion {
    #[default]
    Es5,
}

/// The well-known prototypes and constructors every realm bootstraps
/// before running any script.
#[derive(Debug, Clone, Copy)]
pub struct Intrinsics {
    pub object_prototype: ObjectHandle,
    pub function_prototype: ObjectHandle,
    pub array_prototype: ObjectHandle,
    pub string_prototype: ObjectHandle,
    pub number_prototype: ObjectHandle,
    pub boolean_prototype: ObjectHandle,
    pub error_prototype: ObjectHandle,
    pub type_error_prototype: ObjectHandle,
    pub range_error_prototype: ObjectHandle,
    pub reference_error_prototype: ObjectHandle,
    pub syntax_error_prototype: ObjectHandle,
    pub eval_error_prototype: ObjectHandle,
    pub uri_error_prototype: ObjectHandle,
    pub date_prototype: ObjectHandle,
    pub regexp_prototype: ObjectHandle,
}

/// A bound interpreter realm: a global object/environment plus the
/// intrinsic prototypes, wired up over a caller-owned [`Heap`].
#[derive(Debug)]
pub struct Context<'h> {
    heap: &'h mut Heap,
    version: EsVersion,
    interner: crate::value::Interner,
    global_object: ObjectHandle,
    global_env: Environment,
    intrinsics: Intrinsics,
}

impl<'h> Context<'h> {
    /// Creates a fresh realm over `heap`: allocates and wires up every
    /// intrinsic prototype and global binding (bootstrap order is
    /// `Object.prototype` first, since every other prototype's own
    /// `[[Prototype]]` is it, then `Function.prototype`, since every
    /// constructor that follows needs it to build native function objects).
    pub fn new(heap: &'h mut Heap, version: EsVersion) -> Self {
        let object_prototype = heap.allocate_object(Object::new(Class::Object, None));
        let function_prototype = heap.allocate_object(Object::new(Class::Function, Some(object_prototype)));
        let array_prototype = heap.allocate_object(Object::new(Class::Array, Some(object_prototype)));
        let string_prototype = heap.allocate_object(Object::new(Class::String, Some(object_prototype)));
        let number_prototype = heap.allocate_object(Object::new(Class::Number, Some(object_prototype)));
        let boolean_prototype = heap.allocate_object(Object::new(Class::Boolean, Some(object_prototype)));
        let error_prototype = heap.allocate_object(Object::new(Class::Error, Some(object_prototype)));
        let type_error_prototype = heap.allocate_object(Object::new(Class::Error, Some(error_prototype)));
        let range_error_prototype = heap.allocate_object(Object::new(Class::Error, Some(error_prototype)));
        let reference_error_prototype = heap.allocate_object(Object::new(Class::Error, Some(error_prototype)));
        let syntax_error_prototype = heap.allocate_object(Object::new(Class::Error, Some(error_prototype)));
        let eval_error_prototype = heap.allocate_object(Object::new(Class::Error, Some(error_prototype)));
        let uri_error_prototype = heap.allocate_object(Object::new(Class::Error, Some(error_prototype)));
        let date_prototype = heap.allocate_object(Object::new(Class::Date, Some(object_prototype)));
        let regexp_prototype = heap.allocate_object(Object::new(Class::RegExp, Some(object_prototype)));

        let global_object = heap.allocate_object(Object::new(Class::Object, Some(object_prototype)));
        let global_env = Environment::new_object(global_object, true, None);

        let intrinsics = Intrinsics {
            object_prototype,
            function_prototype,
            array_prototype,
            string_prototype,
            number_prototype,
            boolean_prototype,
            error_prototype,
            type_error_prototype,
            range_error_prototype,
            reference_error_prototype,
            syntax_error_prototype,
            eval_error_prototype,
            uri_error_prototype,
            date_prototype,
            regexp_prototype,
        };

        let mut ctx = Self {
            heap,
            version,
            interner: crate::value::Interner::default(),
            global_object,
            global_env,
            intrinsics,
        };
        crate::builtins::install(&mut ctx);
        ctx
    }

    pub fn version(&self) -> EsVersion {
        self.version
    }

    pub fn heap(&self) -> &Heap {
        self.heap
    }

    pub fn heap_mut(&mut self) -> &mut Heap {
        self.heap
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    pub fn object_prototype(&self) -> ObjectHandle {
        self.intrinsics.object_prototype
    }

    pub fn function_prototype(&self) -> ObjectHandle {
        self.intrinsics.function_prototype
    }

    pub fn global_object(&self) -> ObjectHandle {
        self.global_object
    }

    pub fn global_env(&self) -> Environment {
        self.global_env.clone()
    }

    /// Interns `s`, allocating a fresh heap string for it. Small strings
    /// (property names, keywords) are re-allocated rather than deduplicated
    /// across the whole run — the interner is used for prototype/constructor
    /// names at bootstrap, not for every runtime string.
    pub fn intern_string(&mut self, s: &str) -> StringHandle {
        let rc = self.interner.intern(s);
        self.heap.allocate_string(JsString::from(&*rc))
    }

    pub fn new_string(&mut self, s: impl Into<String>) -> Value {
        Value::String(self.heap.allocate_string(JsString::from(s.into())))
    }

    // ---- abstract operations that may call back into script ----

    /// `ToPrimitive` (ES5 §9.1 / §8.12.8): objects defer to `valueOf`/
    /// `toString` in hint-dependent order; every other type is already
    /// primitive.
    pub fn to_primitive(&mut self, value: Value, hint: Hint) -> ValueResult {
        let Value::Object(obj) = value else { return Ok(value) };
        let order: [&str; 2] = match hint {
            Hint::String => ["toString", "valueOf"],
            Hint::Number | Hint::Default => ["valueOf", "toString"],
        };
        for method_name in order {
            if let Some(method) = self.get_property(obj, method_name)? {
                if self.is_callable(method) {
                    let result = self.call(method, Value::Object(obj), &[])?;
                    if !result.is_object() {
                        return Ok(result);
                    }
                }
            }
        }
        Err(self.throw_type_error("cannot convert object to primitive value"))
    }

    /// `ToNumber` (ES5 §9.3), calling through `ToPrimitive` for objects.
    pub fn to_number(&mut self, value: Value) -> Result<f64, Completion> {
        match value {
            Value::Object(_) => {
                let prim = self.to_primitive(value, Hint::Number)?;
                Ok(prim.to_number_primitive(self.heap))
            }
            other => Ok(other.to_number_primitive(self.heap)),
        }
    }

    /// `ToString` (ES5 §9.8).
    pub fn to_js_string(&mut self, value: Value) -> Result<JsString, Completion> {
        match value {
            Value::Object(_) => {
                let prim = self.to_primitive(value, Hint::String)?;
                Ok(prim.to_string_primitive(self.heap))
            }
            other => Ok(other.to_string_primitive(self.heap)),
        }
    }

    pub fn to_value_string(&mut self, value: Value) -> Result<Value, Completion> {
        let s = self.to_js_string(value)?;
        Ok(Value::String(self.heap.allocate_string(s)))
    }

    /// `ToObject` (ES5 §9.9): wraps primitives in their boxed form,
    /// throwing on `undefined`/`null`.
    pub fn to_object(&mut self, value: Value) -> Result<ObjectHandle, Completion> {
        match value {
            Value::Object(o) => Ok(o),
            Value::Undefined | Value::Null => Err(self.throw_type_error("cannot convert undefined or null to object")),
            Value::Boolean(b) => {
                let mut obj = Object::new(Class::Boolean, Some(self.intrinsics.boolean_prototype));
                obj.kind.primitive = Some(Value::Boolean(b));
                Ok(self.heap.allocate_object(obj))
            }
            Value::Number(n) => {
                let mut obj = Object::new(Class::Number, Some(self.intrinsics.number_prototype));
                obj.kind.primitive = Some(Value::Number(n));
                Ok(self.heap.allocate_object(obj))
            }
            Value::String(s) => {
                let len = self.heap.string(s).len() as f64;
                let mut obj = Object::new(Class::String, Some(self.intrinsics.string_prototype));
                obj.kind.primitive = Some(Value::String(s));
                let handle = self.heap.allocate_object(obj);
                self.heap.object_mut(handle).set_own_property(
                    "length",
                    PropertyDescriptor::data(Value::Number(len), false, false, false),
                );
                Ok(handle)
            }
        }
    }

    pub fn to_int32(&mut self, value: Value) -> Result<i32, Completion> {
        Ok(Value::number_to_int32(self.to_number(value)?))
    }

    pub fn to_uint32(&mut self, value: Value) -> Result<u32, Completion> {
        Ok(Value::number_to_uint32(self.to_number(value)?))
    }

    pub fn to_integer(&mut self, value: Value) -> Result<f64, Completion> {
        Ok(Value::number_to_integer(self.to_number(value)?))
    }

    pub fn is_callable(&self, value: Value) -> bool {
        matches!(value, Value::Object(o) if self.heap.object(o).is_callable())
    }

    // ---- property access (the internal methods that need to call back
    // into script for getters/valueOf) ----

    /// `[[Get]]` with the full prototype walk and accessor invocation.
    /// Returns `Ok(None)` only when `obj` has no such property anywhere on
    /// its chain — distinguished from `undefined` for `in`/`hasOwnProperty`-
    /// adjacent callers, though most callers just want `unwrap_or(Undefined)`.
    pub fn get_property(&mut self, obj: ObjectHandle, key: &str) -> Result<Option<Value>, Completion> {
        let mut current = Some(obj);
        while let Some(o) = current {
            let desc = self.heap.object(o).get_own_property(key).cloned();
            if let Some(desc) = desc {
                if desc.is_accessor_descriptor() {
                    return match desc.get {
                        Some(getter) => Ok(Some(self.call(getter, Value::Object(obj), &[])?)),
                        None => Ok(Some(Value::Undefined)),
                    };
                }
                return Ok(Some(desc.value.unwrap_or(Value::Undefined)));
            }
            current = self.heap.object(o).prototype;
        }
        Ok(None)
    }

    pub fn get(&mut self, obj: ObjectHandle, key: &str) -> ValueResult {
        Ok(self.get_property(obj, key)?.unwrap_or(Value::Undefined))
    }

    /// `[[Put]]` (ES5 §8.12.5): walks the prototype chain looking for an
    /// inherited accessor/non-writable data property before falling back to
    /// creating/overwriting an own property.
    pub fn put(&mut self, obj: ObjectHandle, key: &str, value: Value, strict: bool) -> Result<(), Completion> {
        let mut current = Some(obj);
        while let Some(o) = current {
            let desc = self.heap.object(o).get_own_property(key).cloned();
            if let Some(desc) = desc {
                if desc.is_accessor_descriptor() {
                    return match desc.set {
                        Some(setter) => {
                            self.call(setter, Value::Object(obj), &[value])?;
                            Ok(())
                        }
                        None => {
                            if strict {
                                Err(self.throw_type_error("cannot set property that has only a getter"))
                            } else {
                                Ok(())
                            }
                        }
                    };
                }
                if o == obj {
                    if !desc.writable() {
                        return if strict {
                            Err(self.throw_type_error("cannot assign to read only property"))
                        } else {
                            Ok(())
                        };
                    }
                    self.heap.object_mut(obj).get_own_property_mut(key).unwrap().value = Some(value);
                    return Ok(());
                } else if !desc.writable() {
                    return if strict {
                        Err(self.throw_type_error("cannot assign to read only property"))
                    } else {
                        Ok(())
                    };
                }
                break;
            }
            current = self.heap.object(o).prototype;
        }
        if !self.heap.object(obj).extensible {
            return if strict { Err(self.throw_type_error("object is not extensible")) } else { Ok(()) };
        }
        self.heap
            .object_mut(obj)
            .set_own_property(key, PropertyDescriptor::data(value, true, true, true));
        Ok(())
    }

    /// `[[DefineOwnProperty]]` (ES5 §8.12.9/§15.4.5.1): validates `desc`
    /// against whatever's already on `obj` via the 10-step compatibility
    /// table, then applies array `length`/index bookkeeping on top for
    /// array-class objects. Returns `Ok(false)` (or throws, if `throw`) on
    /// an incompatible transition; `Ok(true)` otherwise, including the
    /// unchanged-is-a-no-op case.
    pub fn define_own_property(
        &mut self,
        obj: ObjectHandle,
        key: &str,
        desc: PropertyDescriptor,
        throw: bool,
    ) -> Result<bool, Completion> {
        let is_array = self.heap.object(obj).class == crate::object::Class::Array;
        if is_array && key == "length" {
            return self.define_array_length(obj, desc, throw);
        }
        if is_array {
            if let Some(index) = crate::object::as_array_index(key) {
                let old_len = self.heap.object(obj).array_length();
                if index >= old_len {
                    let length_desc = self.heap.object(obj).get_own_property("length").cloned().unwrap();
                    if !length_desc.writable() {
                        return if throw {
                            Err(self.throw_type_error("cannot add index beyond length of a non-writable array"))
                        } else {
                            Ok(false)
                        };
                    }
                    if !self.define_own_property_plain(obj, key, desc, throw)? {
                        return Ok(false);
                    }
                    self.heap.object_mut(obj).set_own_property(
                        "length",
                        PropertyDescriptor::data(Value::Number((index + 1) as f64), length_desc.writable(), false, false),
                    );
                    return Ok(true);
                }
            }
        }
        self.define_own_property_plain(obj, key, desc, throw)
    }

    fn define_own_property_plain(
        &mut self,
        obj: ObjectHandle,
        key: &str,
        desc: PropertyDescriptor,
        throw: bool,
    ) -> Result<bool, Completion> {
        let current = self.heap.object(obj).get_own_property(key).cloned();
        let extensible = self.heap.object(obj).extensible;
        match crate::object::validate_define_own_property(current.as_ref(), &desc, extensible) {
            Err(()) => {
                if throw {
                    Err(self.throw_type_error("cannot redefine property"))
                } else {
                    Ok(false)
                }
            }
            Ok(None) => Ok(true),
            Ok(Some(merged)) => {
                self.heap.object_mut(obj).set_own_property(key, merged);
                Ok(true)
            }
        }
    }

    /// The `length`-specific half of array `[[DefineOwnProperty]]`: a new
    /// length smaller than the current one deletes every element index at
    /// or above it, stopping early (and reporting failure) at the first
    /// non-configurable element it can't remove.
    fn define_array_length(&mut self, obj: ObjectHandle, desc: PropertyDescriptor, throw: bool) -> Result<bool, Completion> {
        let new_len = match &desc.value {
            Some(v) => {
                let n = self.to_number(v.clone())?;
                let len = Value::number_to_uint32(n);
                if len as f64 != Value::number_to_integer(n) || n.is_nan() {
                    return Err(self.throw_range_error("invalid array length"));
                }
                len
            }
            None => self.heap.object(obj).array_length(),
        };
        let old_len = self.heap.object(obj).array_length();
        let mut length_desc = desc.clone();
        length_desc.value = Some(Value::Number(new_len as f64));
        if new_len >= old_len {
            return self.define_own_property_plain(obj, "length", length_desc, throw);
        }
        let length_writable = self
            .heap
            .object(obj)
            .get_own_property("length")
            .map(|d| d.writable())
            .unwrap_or(true);
        if !length_writable {
            length_desc.writable = Some(false);
        }
        if !self.define_own_property_plain(obj, "length", length_desc, throw)? {
            return Ok(false);
        }
        let mut index = old_len;
        while index > new_len {
            index -= 1;
            let key = index.to_string();
            if let Some(elem_desc) = self.heap.object(obj).get_own_property(&key).cloned() {
                if elem_desc.configurable() {
                    self.heap.object_mut(obj).remove_own_property(&key);
                } else {
                    self.heap.object_mut(obj).set_own_property(
                        "length",
                        PropertyDescriptor::data(Value::Number((index + 1) as f64), length_writable, false, false),
                    );
                    return if throw {
                        Err(self.throw_type_error("cannot delete non-configurable array index"))
                    } else {
                        Ok(false)
                    };
                }
            }
        }
        if !length_writable {
            self.heap.object_mut(obj).get_own_property_mut("length").unwrap().writable = Some(false);
        }
        Ok(true)
    }

    pub fn has_property(&self, obj: ObjectHandle, key: &str) -> bool {
        let mut current = Some(obj);
        while let Some(o) = current {
            if self.heap.object(o).get_own_property(key).is_some() {
                return true;
            }
            current = self.heap.object(o).prototype;
        }
        false
    }

    /// `[[Call]]` (ES5 §13.2.1/native). Dispatches on the callee's
    /// [`crate::object::Callable`] slot; throws `TypeError` if it isn't
    /// callable at all.
    pub fn call(&mut self, callee: Value, this: Value, args: &[Value]) -> ValueResult {
        let Value::Object(fn_obj) = callee else {
            return Err(self.throw_type_error("value is not a function"));
        };
        let callable = self.heap.object(fn_obj).kind.callable.clone();
        match callable {
            Some(crate::object::Callable::Native(f)) => f(self, this, args),
            Some(crate::object::Callable::Ordinary { params, body, scope, strict, name }) => {
                crate::exec::call_ordinary_function(self, fn_obj, &params, &body, &scope, strict, name.as_deref(), this, args)
            }
            Some(crate::object::Callable::Bound { target, bound_this, bound_args }) => {
                let mut full_args = bound_args;
                full_args.extend_from_slice(args);
                self.call(Value::Object(target), bound_this, &full_args)
            }
            None => Err(self.throw_type_error("value is not a function")),
        }
    }

    /// `[[Construct]]` (ES5 §13.2.2): allocates a fresh object whose
    /// prototype is the callee's `.prototype` property (or `Object.prototype`
    /// if that isn't itself an object), calls the function with it as
    /// `this`, and uses the function's return value only if it's an object.
    pub fn construct(&mut self, callee: Value, args: &[Value]) -> ValueResult {
        let Value::Object(fn_obj) = callee else {
            return Err(self.throw_type_error("value is not a constructor"));
        };
        if !self.heap.object(fn_obj).is_constructor() {
            return Err(self.throw_type_error("value is not a constructor"));
        }
        // A bound function's `[[Construct]]` (ES5 §15.3.4.5.2) is
        // binding-transparent: it ignores `bound_this` entirely and
        // constructs through `target`, so `target`'s own `prototype`
        // decides the new instance's prototype, not the bound wrapper's.
        if let Some(crate::object::Callable::Bound { target, bound_args, .. }) =
            self.heap.object(fn_obj).kind.callable.clone()
        {
            let mut full_args = bound_args;
            full_args.extend_from_slice(args);
            return self.construct(Value::Object(target), &full_args);
        }
        let proto_value = self.get(fn_obj, "prototype")?;
        let proto = proto_value.as_object().unwrap_or(self.intrinsics.object_prototype);
        let instance = self.heap.allocate_object(Object::new(Class::Object, Some(proto)));
        let result = self.call(callee, Value::Object(instance), args)?;
        Ok(if result.is_object() { result } else { Value::Object(instance) })
    }

    // ---- error construction ----

    fn make_error(&mut self, prototype: ObjectHandle, message: &str) -> Value {
        let mut obj = Object::new(Class::Error, Some(prototype));
        let msg = self.intern_string(message);
        obj.set_own_property("message", PropertyDescriptor::data(Value::String(msg), true, false, true));
        Value::Object(self.heap.allocate_object(obj))
    }

    pub fn throw_type_error(&mut self, message: &str) -> Completion {
        let proto = self.intrinsics.type_error_prototype;
        Completion::Throw(self.make_error(proto, message))
    }

    pub fn throw_range_error(&mut self, message: &str) -> Completion {
        let proto = self.intrinsics.range_error_prototype;
        Completion::Throw(self.make_error(proto, message))
    }

    pub fn throw_reference_error(&mut self, message: &str) -> Completion {
        let proto = self.intrinsics.reference_error_prototype;
        Completion::Throw(self.make_error(proto, message))
    }

    pub fn throw_syntax_error(&mut self, message: &str) -> Completion {
        let proto = self.intrinsics.syntax_error_prototype;
        Completion::Throw(self.make_error(proto, message))
    }

    pub fn throw_uri_error(&mut self, message: &str) -> Completion {
        let proto = self.intrinsics.uri_error_prototype;
        Completion::Throw(self.make_error(proto, message))
    }

    // ---- top-level evaluation ----

    /// Evaluates a parsed program against this realm's global environment,
    /// converting an uncaught `Throw` completion into [`EngineError::Uncaught`]
    /// carrying the thrown value's `ToString` form (host-facing errors don't
    /// carry heap handles past the call that produced them).
    pub fn eval(&mut self, program: &Program) -> Result<Value, EngineError> {
        let env = self.global_env.clone();
        crate::exec::hoist_declarations(self, &program.body, &env, program.strict);
        match crate::exec::execute_statements(self, &program.body, &env, Value::Object(self.global_object), program.strict) {
            Ok(v) => Ok(v),
            Err(Completion::Throw(v)) => {
                let s = self.to_js_string(v).unwrap_or_else(|_| JsString::from("<error converting thrown value>"));
                Err(EngineError::Uncaught(s.as_str().into_owned()))
            }
            Err(_) => Err(EngineError::Uncaught("illegal break/continue/return at top level".to_string())),
        }
    }

    /// Direct `eval` (ES5 §15.1.2.1/§10.4.2): runs in the caller's variable
    /// environment when called as a bare `eval(...)`; indirect calls (any
    /// other call form, e.g. `(0, eval)(...)` or `var e = eval; e(...)`) run
    /// against the global scope instead and are always non-strict unless
    /// the evaluated text itself opts in.
    pub fn eval_source(&mut self, src: &str, env: &Environment, this: Value, inherit_strict: bool) -> ValueResult {
        let program = match crate::syntax::parse(src, self.version) {
            Ok(program) => program,
            // `eval`'s SyntaxErrors are script-visible (ES5 §15.1.2.1), unlike a
            // top-level parse failure, which surfaces as a host-facing `EngineError`.
            Err(e) => return Err(self.throw_syntax_error(&e.to_string())),
        };
        let strict = program.strict || inherit_strict;
        crate::exec::hoist_declarations(self, &program.body, env, strict);
        match crate::exec::execute_statements(self, &program.body, env, this, strict) {
            Ok(v) => Ok(v),
            Err(e) => Err(e),
        }
    }
}

impl Trace for Context<'_> {
    fn trace(&self, heap: &mut Heap) {
        fn mark_value(heap: &mut Heap, value: Value) {
            match value {
                Value::Object(o) => mark_object_graph(heap, o),
                Value::String(s) => {
                    heap.mark_string(s);
                }
                _ => {}
            }
        }

        fn mark_object_graph(heap: &mut Heap, handle: ObjectHandle) {
            if !heap.mark_object(handle) {
                return;
            }
            let (proto, values, scopes) = {
                let obj = heap.object(handle);
                let mut values: Vec<Value> = Vec::new();
                for key in obj.own_keys() {
                    if let Some(d) = obj.get_own_property(key) {
                        values.extend(d.value);
                        values.extend(d.get);
                        values.extend(d.set);
                    }
                }
                values.extend(obj.kind.primitive);
                let mut scopes: Vec<crate::environment::Environment> = Vec::new();
                if let Some(crate::object::Callable::Ordinary { scope, .. }) = &obj.kind.callable {
                    scopes.push(scope.clone());
                }
                if let Some(args) = &obj.kind.arguments {
                    scopes.push(args.scope.clone());
                }
                (obj.prototype, values, scopes)
            };
            if let Some(p) = proto {
                mark_object_graph(heap, p);
            }
            for v in values {
                mark_value(heap, v);
            }
            for scope in scopes {
                scope.trace(&mut |v| mark_value(heap, v));
            }
        }
        mark_object_graph(heap, self.global_object);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bootstraps_global_object_with_prototype_chain() {
        let mut heap = Heap::new(1 << 20);
        let ctx = Context::new(&mut heap, EsVersion::Es5);
        let proto = ctx.heap().object(ctx.global_object()).prototype;
        assert_eq!(proto, Some(ctx.object_prototype()));
    }
}
