//! Builder patterns for constructing built-in objects and functions:
//! `FunctionBuilder` for a single native function, `ObjectInitializer` for a
//! plain object's data/accessor properties, and `ConstructorBuilder` for a
//! constructor plus its `.prototype`, so bootstrap code in `builtins/*` reads
//! uniformly regardless of which built-in it's assembling.

use crate::context::Context;
use crate::heap::ObjectHandle;
use crate::object::{Callable, Class, NativeFunction, Object, PropertyDescriptor};
use crate::value::Value;

/// Builds a single native function object.
pub struct FunctionBuilder<'ctx, 'h> {
    ctx: &'ctx mut Context<'h>,
    name: String,
    length: i32,
    function: NativeFunction,
    constructable: bool,
}

impl<'ctx, 'h> FunctionBuilder<'ctx, 'h> {
    pub fn native(ctx: &'ctx mut Context<'h>, function: NativeFunction) -> Self {
        Self {
            ctx,
            name: String::new(),
            length: 0,
            function,
            constructable: false,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn length(mut self, length: i32) -> Self {
        self.length = length;
        self
    }

    pub fn constructable(mut self, yes: bool) -> Self {
        self.constructable = yes;
        self
    }

    pub fn build(self) -> ObjectHandle {
        let proto = self.ctx.function_prototype();
        let mut object = Object::new(Class::Function, Some(proto));
        object.kind.callable = Some(Callable::Native(self.function));
        object.kind.is_constructor = self.constructable;
        let handle = self.ctx.heap_mut().allocate_object(object);
        let name = self.ctx.intern_string(&self.name);
        let length = self.length as f64;
        let obj = self.ctx.heap_mut().object_mut(handle);
        obj.set_own_property(
            "length",
            PropertyDescriptor::data(Value::Number(length), false, false, true),
        );
        obj.set_own_property(
            "name",
            PropertyDescriptor::data(Value::String(name), false, false, true),
        );
        handle
    }
}

/// Populates an already-allocated plain object with data/native-function
/// properties.
pub struct ObjectInitializer<'ctx, 'h> {
    ctx: &'ctx mut Context<'h>,
    object: ObjectHandle,
}

impl<'ctx, 'h> ObjectInitializer<'ctx, 'h> {
    pub fn new(ctx: &'ctx mut Context<'h>) -> Self {
        let proto = ctx.object_prototype();
        let object = ctx.heap_mut().allocate_object(Object::new(Class::Object, Some(proto)));
        Self { ctx, object }
    }

    pub fn with_object(ctx: &'ctx mut Context<'h>, object: ObjectHandle) -> Self {
        Self { ctx, object }
    }

    pub fn function(self, function: NativeFunction, name: &str, length: i32) -> Self {
        let f = FunctionBuilder::native(self.ctx, function)
            .name(name)
            .length(length)
            .build();
        self.ctx.heap_mut().object_mut(self.object).set_own_property(
            name,
            PropertyDescriptor::data(Value::Object(f), true, false, true),
        );
        self
    }

    pub fn property(self, key: &str, value: Value, enumerable: bool) -> Self {
        self.ctx.heap_mut().object_mut(self.object).set_own_property(
            key,
            PropertyDescriptor::data(value, true, enumerable, true),
        );
        self
    }

    pub fn readonly_property(self, key: &str, value: Value) -> Self {
        self.ctx.heap_mut().object_mut(self.object).set_own_property(
            key,
            PropertyDescriptor::data(value, false, false, false),
        );
        self
    }

    pub fn build(self) -> ObjectHandle {
        self.object
    }
}

/// Builds a constructor function together with its `.prototype` object and
/// the static functions hung off the constructor itself (`Object.keys`,
/// `Array.isArray`, ...).
pub struct ConstructorBuilder<'ctx, 'h> {
    ctx: &'ctx mut Context<'h>,
    name: String,
    length: i32,
    constructor_fn: NativeFunction,
    prototype: ObjectHandle,
    statics: Vec<(String, NativeFunction, i32)>,
    methods: Vec<(String, NativeFunction, i32)>,
}

impl<'ctx, 'h> ConstructorBuilder<'ctx, 'h> {
    pub fn new(
        ctx: &'ctx mut Context<'h>,
        constructor_fn: NativeFunction,
        prototype: ObjectHandle,
    ) -> Self {
        Self {
            ctx,
            name: String::new(),
            length: 0,
            constructor_fn,
            prototype,
            statics: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn length(mut self, length: i32) -> Self {
        self.length = length;
        self
    }

    /// Adds an instance method, hung off `.prototype`, non-enumerable and
    /// writable/configurable (the attribute triple ES5 specifies for every
    /// built-in method).
    pub fn method(mut self, f: NativeFunction, name: impl Into<String>, length: i32) -> Self {
        self.methods.push((name.into(), f, length));
        self
    }

    /// Adds a static method, hung off the constructor function itself.
    pub fn static_method(mut self, f: NativeFunction, name: impl Into<String>, length: i32) -> Self {
        self.statics.push((name.into(), f, length));
        self
    }

    pub fn build(self) -> ObjectHandle {
        let ConstructorBuilder {
            ctx,
            name,
            length,
            constructor_fn,
            prototype,
            statics,
            methods,
        } = self;
        let ctor = FunctionBuilder::native(ctx, constructor_fn)
            .name(name)
            .length(length)
            .constructable(true)
            .build();
        for (mname, f, mlength) in methods {
            let fobj = FunctionBuilder::native(ctx, f).name(&mname).length(mlength).build();
            ctx.heap_mut().object_mut(prototype).set_own_property(
                mname,
                PropertyDescriptor::data(Value::Object(fobj), true, false, true),
            );
        }
        for (sname, f, slength) in statics {
            let fobj = FunctionBuilder::native(ctx, f).name(&sname).length(slength).build();
            ctx.heap_mut().object_mut(ctor).set_own_property(
                sname,
                PropertyDescriptor::data(Value::Object(fobj), true, false, true),
            );
        }
        ctx.heap_mut().object_mut(ctor).set_own_property(
            "prototype",
            PropertyDescriptor::data(Value::Object(prototype), false, false, false),
        );
        ctx.heap_mut().object_mut(prototype).set_own_property(
            "constructor",
            PropertyDescriptor::data(Value::Object(ctor), true, false, true),
        );
        ctor
    }
}
