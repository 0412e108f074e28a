//! Environment records: the lexical-environment chain that resolves
//! identifiers at evaluation time.
//!
//! ES5 has only two environment record kinds — declarative and object —
//! plus the with/catch specializations that sit on top of an object record,
//! so both are collapsed into one [`EnvironmentRecord`] enum rather than a
//! Rust type per kind.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::heap::{Heap, ObjectHandle};
use crate::value::Value;

/// A single mutable binding slot. `mutable = false` models `catch`
/// parameters and (in strict mode) bindings that must not be reassigned.
#[derive(Debug, Clone)]
struct Binding {
    value: Value,
    mutable: bool,
    /// `var`/function declarations are non-deletable; `catch` parameters
    /// and dynamically-created bindings (direct `eval`) are deletable.
    deletable: bool,
    initialized: bool,
}

/// A declarative environment record: the scope introduced by a function
/// call, `catch` block, or (conceptually) a `let`-like form — ES5 doesn't
/// have block scoping, so in practice this is function activations and
/// catch clauses.
#[derive(Debug, Default)]
struct DeclarativeRecord {
    bindings: HashMap<Rc<str>, Binding>,
}

/// An object environment record: bindings are properties of a backing
/// object. Used for the global environment and for `with` statements.
#[derive(Debug)]
struct ObjectRecord {
    bindings: ObjectHandle,
    /// `with` environments lift bindings to the front of identifier
    /// resolution even when shadowed by an outer declarative scope level;
    /// `provide_this` marks the global object record, whose bindings
    /// supply `this` unqualified-call semantics under non-strict mode.
    provide_this: bool,
}

#[derive(Debug)]
enum Record {
    Declarative(DeclarativeRecord),
    Object(ObjectRecord),
}

/// One link in the environment chain.
#[derive(Debug)]
struct EnvironmentNode {
    record: RefCell<Record>,
    outer: Option<Environment>,
}

/// A reference-counted handle to an environment record, cheap to clone
/// and share between a function's captured scope and its activations.
#[derive(Debug, Clone)]
pub struct Environment(Rc<EnvironmentNode>);

/// The result of resolving an identifier: either a concrete binding
/// location, or "unresolvable" (a free reference with no declaration,
/// which is a `ReferenceError` on read but legal, implicit-global-creating
/// on a non-strict assignment).
pub enum Reference {
    Declarative(Environment),
    Object(ObjectHandle),
    Unresolved,
}

impl Environment {
    /// A fresh declarative environment (function activation, catch clause).
    pub fn new_declarative(outer: Option<Environment>) -> Self {
        Self(Rc::new(EnvironmentNode {
            record: RefCell::new(Record::Declarative(DeclarativeRecord::default())),
            outer,
        }))
    }

    /// An object environment (the global scope, or a `with` block).
    pub fn new_object(binding_object: ObjectHandle, provide_this: bool, outer: Option<Environment>) -> Self {
        Self(Rc::new(EnvironmentNode {
            record: RefCell::new(Record::Object(ObjectRecord { bindings: binding_object, provide_this })),
            outer,
        }))
    }

    pub fn outer(&self) -> Option<&Environment> {
        self.0.outer.as_ref()
    }

    /// `true` for object-environment records created for `with` blocks or
    /// the global scope (ES5 §10.2.1.1.6 `ImplicitThisValue`).
    pub fn provides_this(&self) -> bool {
        matches!(&*self.0.record.borrow(), Record::Object(o) if o.provide_this)
    }

    pub fn binding_object(&self) -> Option<ObjectHandle> {
        match &*self.0.record.borrow() {
            Record::Object(o) => Some(o.bindings),
            Record::Declarative(_) => None,
        }
    }

    /// Declares a mutable `var` binding, uninitialized-to-`undefined` if
    /// not already present (ES5 §10.5 variable instantiation is idempotent
    /// across re-entrant `var` statements).
    pub fn create_mutable_binding(&self, heap: &mut Heap, name: &Rc<str>, deletable: bool) {
        match &mut *self.0.record.borrow_mut() {
            Record::Declarative(rec) => {
                rec.bindings.entry(name.clone()).or_insert(Binding {
                    value: Value::Undefined,
                    mutable: true,
                    deletable,
                    initialized: true,
                });
            }
            Record::Object(rec) => {
                let obj = heap.object_mut(rec.bindings);
                if obj.get_own_property(name).is_none() {
                    obj.set_own_property(
                        Box::<str>::from(name.as_ref()),
                        crate::object::PropertyDescriptor::data(Value::Undefined, true, true, deletable),
                    );
                }
            }
        }
    }

    /// Declares an immutable binding for a `catch` parameter or a
    /// function-expression's own name, left uninitialized until
    /// [`Self::initialize_immutable_binding`] is called (ES5 §10.2.1
    /// temporal-dead-zone-free but still a distinct step).
    pub fn create_immutable_binding(&self, name: Rc<str>) {
        if let Record::Declarative(rec) = &mut *self.0.record.borrow_mut() {
            rec.bindings.insert(
                name,
                Binding { value: Value::Undefined, mutable: false, deletable: false, initialized: false },
            );
        }
    }

    pub fn initialize_immutable_binding(&self, name: &Rc<str>, value: Value) {
        if let Record::Declarative(rec) = &mut *self.0.record.borrow_mut() {
            if let Some(b) = rec.bindings.get_mut(name) {
                b.value = value;
                b.initialized = true;
            }
        }
    }

    /// `true` if this record (not an outer one) has a binding for `name`.
    pub fn has_binding(&self, heap: &Heap, name: &str) -> bool {
        match &*self.0.record.borrow() {
            Record::Declarative(rec) => rec.bindings.contains_key(name),
            Record::Object(rec) => heap.object(rec.bindings).get_own_property(name).is_some(),
        }
    }

    /// Sets an existing binding's value (used by assignment). Returns
    /// `Err(())` if the binding is immutable and this isn't a "throw on
    /// failure" context the caller already turned into a TypeError.
    pub fn set_mutable_binding(&self, heap: &mut Heap, name: &str, value: Value, strict: bool) -> Result<(), bool> {
        match &mut *self.0.record.borrow_mut() {
            Record::Declarative(rec) => {
                if let Some(b) = rec.bindings.get_mut(name) {
                    if !b.mutable {
                        return Err(strict);
                    }
                    b.value = value;
                    Ok(())
                } else {
                    Err(true)
                }
            }
            Record::Object(rec) => {
                let obj = heap.object_mut(rec.bindings);
                if let Some(existing) = obj.get_own_property_mut(name) {
                    if !existing.writable() {
                        return Err(strict);
                    }
                    existing.value = Some(value);
                } else {
                    obj.set_own_property(
                        name.into(),
                        crate::object::PropertyDescriptor::data(value, true, true, true),
                    );
                }
                Ok(())
            }
        }
    }

    pub fn get_binding_value(&self, heap: &Heap, name: &str) -> Option<Value> {
        match &*self.0.record.borrow() {
            Record::Declarative(rec) => rec.bindings.get(name).filter(|b| b.initialized).map(|b| b.value.clone()),
            Record::Object(rec) => heap.object(rec.bindings).get_own_property(name).map(|d| d.value.clone().unwrap_or(Value::Undefined)),
        }
    }

    pub fn delete_binding(&self, heap: &mut Heap, name: &str) -> bool {
        match &mut *self.0.record.borrow_mut() {
            Record::Declarative(rec) => match rec.bindings.get(name) {
                Some(b) if b.deletable => {
                    rec.bindings.remove(name);
                    true
                }
                Some(_) => false,
                None => true,
            },
            Record::Object(rec) => {
                let obj = heap.object_mut(rec.bindings);
                match obj.get_own_property(name) {
                    None => true,
                    Some(d) if d.configurable() => {
                        obj.remove_own_property(name);
                        true
                    }
                    Some(_) => false,
                }
            }
        }
    }

    /// Walks the chain from `self` outward looking for a binding, returning
    /// the environment it lives in (declarative or object form).
    pub fn resolve(&self, heap: &Heap, name: &str) -> Reference {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            if env.has_binding(heap, name) {
                return match &*env.0.record.borrow() {
                    Record::Declarative(_) => Reference::Declarative(env.clone()),
                    Record::Object(rec) => Reference::Object(rec.bindings),
                };
            }
            current = env.0.outer.clone();
        }
        Reference::Unresolved
    }
}

impl Environment {
    /// Walks this environment and every outer link, feeding every
    /// binding's value (declarative records) or binding object (object
    /// records) to `f` so the collector can mark whatever a closure's
    /// captured scope chain keeps alive.
    pub fn trace(&self, f: &mut dyn FnMut(Value)) {
        let mut current = Some(self.clone());
        while let Some(env) = current {
            match &*env.0.record.borrow() {
                Record::Declarative(rec) => {
                    for binding in rec.bindings.values() {
                        f(binding.value);
                    }
                }
                Record::Object(rec) => f(Value::Object(rec.bindings)),
            }
            current = env.0.outer.clone();
        }
    }
}

impl PartialEq for Environment {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::Heap;

    #[test]
    fn declarative_binding_round_trips() {
        let mut heap = Heap::new(1 << 20);
        let env = Environment::new_declarative(None);
        let name: Rc<str> = Rc::from("x");
        env.create_mutable_binding(&mut heap, &name, false);
        env.set_mutable_binding(&mut heap, "x", Value::Number(1.0), false).unwrap();
        assert_eq!(env.get_binding_value(&heap, "x"), Some(Value::Number(1.0)));
    }

    #[test]
    fn outer_chain_resolves_shadowed_names() {
        let heap = Heap::new(1 << 20);
        let mut heap = heap;
        let outer = Environment::new_declarative(None);
        let inner = Environment::new_declarative(Some(outer.clone()));
        let name: Rc<str> = Rc::from("x");
        outer.create_mutable_binding(&mut heap, &name, false);
        outer.set_mutable_binding(&mut heap, "x", Value::Number(1.0), false).unwrap();
        assert!(matches!(inner.resolve(&heap, "x"), Reference::Declarative(_)));
        assert!(matches!(inner.resolve(&heap, "missing"), Reference::Unresolved));
    }

    #[test]
    fn trace_visits_bindings_and_outer_chain() {
        let mut heap = Heap::new(1 << 20);
        let outer = Environment::new_declarative(None);
        let inner = Environment::new_declarative(Some(outer.clone()));
        let outer_name: Rc<str> = Rc::from("outer_var");
        let inner_name: Rc<str> = Rc::from("inner_var");
        outer.create_mutable_binding(&mut heap, &outer_name, false);
        outer.set_mutable_binding(&mut heap, "outer_var", Value::Number(1.0), false).unwrap();
        inner.create_mutable_binding(&mut heap, &inner_name, false);
        inner.set_mutable_binding(&mut heap, "inner_var", Value::Number(2.0), false).unwrap();

        let mut seen = Vec::new();
        inner.trace(&mut |v| seen.push(v));
        assert!(seen.contains(&Value::Number(1.0)));
        assert!(seen.contains(&Value::Number(2.0)));
    }

    #[test]
    fn immutable_binding_rejects_reassignment() {
        let mut heap = Heap::new(1 << 20);
        let env = Environment::new_declarative(None);
        let name: Rc<str> = Rc::from("e");
        env.create_immutable_binding(name.clone());
        env.initialize_immutable_binding(&name, Value::Number(1.0));
        assert!(env.set_mutable_binding(&mut heap, "e", Value::Number(2.0), false).is_err());
    }
}
