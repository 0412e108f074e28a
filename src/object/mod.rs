//! Object model: ordered property maps with full property descriptors,
//! prototype chains, `[[Class]]`, `[[Extensible]]`, and the `[[...]]`
//! internal methods.
//!
//! The builder patterns (`FunctionBuilder`/`ObjectInitializer`/
//! `ConstructorBuilder`) live in [`builder`]. Rather than a Rust type per
//! built-in kind, every object carries a single tagged [`ObjectKind`] plus a
//! small optional-callable table, so a built-in's extra state (a `Date`'s
//! time value, a `RegExp`'s source/flags, ...) is just another enum variant.

pub mod builder;
mod internal_methods;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::environment::Environment;
use crate::exec::Completion;
use crate::heap::ObjectHandle;
use crate::syntax::ast::FunctionBody;
use crate::value::{JsString, Value};

pub use internal_methods::{as_array_index, validate_define_own_property, NativeFunction};

/// An ES5 property key. Numeric-looking keys (`"0"`, `"1"`, ...) are still
/// stored as strings — the array fast path recognizes them by parsing, not
/// by a separate representation.
pub type PropertyKey = Box<str>;

/// A property descriptor (ES5 §8.10): either a data descriptor or an
/// accessor descriptor, never both. Plain `Option` fields rather than a
/// packed bitflags struct, so the 10-step compatibility table in
/// `[[DefineOwnProperty]]` can be
/// implemented by matching directly against the literal spec fields.
#[derive(Debug, Clone)]
pub struct PropertyDescriptor {
    pub value: Option<Value>,
    pub get: Option<Value>,
    pub set: Option<Value>,
    pub writable: Option<bool>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl PropertyDescriptor {
    pub fn data(value: Value, writable: bool, enumerable: bool, configurable: bool) -> Self {
        Self {
            value: Some(value),
            get: None,
            set: None,
            writable: Some(writable),
            enumerable: Some(enumerable),
            configurable: Some(configurable),
        }
    }

    pub fn accessor(
        get: Option<Value>,
        set: Option<Value>,
        enumerable: bool,
        configurable: bool,
    ) -> Self {
        Self {
            value: None,
            get,
            set,
            writable: None,
            enumerable: Some(enumerable),
            configurable: Some(configurable),
        }
    }

    pub fn empty() -> Self {
        Self {
            value: None,
            get: None,
            set: None,
            writable: None,
            enumerable: None,
            configurable: None,
        }
    }

    pub fn is_data_descriptor(&self) -> bool {
        self.value.is_some() || self.writable.is_some()
    }

    pub fn is_accessor_descriptor(&self) -> bool {
        self.get.is_some() || self.set.is_some()
    }

    pub fn is_generic_descriptor(&self) -> bool {
        !self.is_data_descriptor() && !self.is_accessor_descriptor()
    }

    pub fn enumerable(&self) -> bool {
        self.enumerable.unwrap_or(false)
    }

    pub fn configurable(&self) -> bool {
        self.configurable.unwrap_or(false)
    }

    pub fn writable(&self) -> bool {
        self.writable.unwrap_or(false)
    }
}

/// The class tag carried by every object (`[[Class]]`, ES5 §8.6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Class {
    Object,
    Array,
    Function,
    String,
    Number,
    Boolean,
    Date,
    RegExp,
    Error,
    Arguments,
    Json,
    Math,
}

impl Class {
    pub fn as_str(self) -> &'static str {
        match self {
            Class::Object => "Object",
            Class::Array => "Array",
            Class::Function => "Function",
            Class::String => "String",
            Class::Number => "Number",
            Class::Boolean => "Boolean",
            Class::Date => "Date",
            Class::RegExp => "RegExp",
            Class::Error => "Error",
            Class::Arguments => "Arguments",
            Class::Json => "JSON",
            Class::Math => "Math",
        }
    }
}

/// The bidirectional arguments/parameter map (ES5 §10.6), kept alongside
/// the activation rather than as magic accessor descriptors.
#[derive(Debug, Clone)]
pub struct ArgumentsMap {
    /// `mapped[i]` is the name bound in `scope` that argument index `i`
    /// aliases, for the first `min(formals, actuals)` indices.
    pub mapped: Vec<Option<std::rc::Rc<str>>>,
    pub scope: Environment,
}

/// Function-specific internal slots.
#[derive(Clone)]
pub enum Callable {
    /// An ordinary script function: body, captured scope, and strictness.
    Ordinary {
        params: Vec<crate::syntax::ast::Param>,
        body: FunctionBody,
        scope: Environment,
        strict: bool,
        name: Option<std::rc::Rc<str>>,
    },
    /// A native (Rust-implemented) built-in function.
    Native(NativeFunction),
    /// A bound function produced by `Function.prototype.bind`.
    Bound {
        target: ObjectHandle,
        bound_this: Value,
        bound_args: Vec<Value>,
    },
}

impl std::fmt::Debug for Callable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Callable::Ordinary { name, .. } => {
                f.debug_struct("Ordinary").field("name", name).finish()
            }
            Callable::Native(_) => f.write_str("Native(..)"),
            Callable::Bound { .. } => f.write_str("Bound"),
        }
    }
}

/// The capability/internal-slot table. Every object has a [`Class`] tag;
/// at most one of these is populated depending on that tag.
#[derive(Debug, Clone, Default)]
pub struct ObjectKind {
    pub callable: Option<Callable>,
    pub is_constructor: bool,
    pub primitive: Option<Value>,
    pub date_value: Option<f64>,
    pub regexp_source: Option<JsString>,
    pub regexp_flags: Option<RegExpFlags>,
    pub arguments: Option<ArgumentsMap>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegExpFlags {
    pub global: bool,
    pub ignore_case: bool,
    pub multiline: bool,
}

/// A heap-resident ES5 object.
#[derive(Debug, Clone)]
pub struct Object {
    properties: IndexMap<PropertyKey, PropertyDescriptor, FxBuildHasher>,
    pub prototype: Option<ObjectHandle>,
    pub class: Class,
    pub extensible: bool,
    pub kind: ObjectKind,
}

impl Object {
    pub fn new(class: Class, prototype: Option<ObjectHandle>) -> Self {
        Self {
            properties: IndexMap::with_hasher(FxBuildHasher::default()),
            prototype,
            class,
            extensible: true,
            kind: ObjectKind::default(),
        }
    }

    /// Own property lookup, `[[GetOwnProperty]]` minus the prototype walk.
    pub fn get_own_property(&self, key: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(key)
    }

    pub fn get_own_property_mut(&mut self, key: &str) -> Option<&mut PropertyDescriptor> {
        self.properties.get_mut(key)
    }

    /// Inserts or overwrites an own property directly, bypassing
    /// `[[DefineOwnProperty]]`'s compatibility checks. Used only during
    /// bootstrap and by internal methods that have already validated the
    /// transition.
    pub fn set_own_property(&mut self, key: impl Into<PropertyKey>, desc: PropertyDescriptor) {
        self.properties.insert(key.into(), desc);
    }

    pub fn remove_own_property(&mut self, key: &str) -> Option<PropertyDescriptor> {
        self.properties.shift_remove(key)
    }

    /// Own keys in insertion order — observable via
    /// `Object.getOwnPropertyNames` and `for-in`.
    pub fn own_keys(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(|k| k.as_ref())
    }

    pub fn own_enumerable_keys(&self) -> impl Iterator<Item = &str> {
        self.properties
            .iter()
            .filter(|(_, d)| d.enumerable())
            .map(|(k, _)| k.as_ref())
    }

    pub fn is_callable(&self) -> bool {
        self.kind.callable.is_some()
    }

    pub fn is_constructor(&self) -> bool {
        self.kind.is_constructor
    }

    /// `length` of an array object, per the `length` data property (always
    /// present on arrays).
    pub fn array_length(&self) -> u32 {
        self.get_own_property("length")
            .and_then(|d| d.value.as_ref())
            .and_then(Value::as_number)
            .map(|n| n as u32)
            .unwrap_or(0)
    }
}

/// Result of evaluating something that may invoke script (a getter, a
/// native function, a `[[Call]]`): either a value or an abrupt completion.
pub type ValueResult = Result<Value, Completion>;
