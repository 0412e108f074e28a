//! The `[[...]]` internal methods. The logic here is the part that
//! never needs to call back into script — validating a descriptor
//! transition, classifying array indices. The parts that *do* need to call
//! script (`[[Get]]`/`[[Put]]` on an accessor, `[[Call]]`) live on
//! [`crate::Context`], since they need the evaluator to invoke getters,
//! setters and native functions.

use super::{Object, PropertyDescriptor};
use crate::context::Context;
use crate::exec::Completion;
use crate::value::Value;

/// A Rust-implemented built-in function body. Takes the call's `this`
/// binding and argument list; returns a value or propagates an abrupt
/// completion (typically a thrown `TypeError`/`RangeError`).
pub type NativeFunction = fn(&mut Context<'_>, Value, &[Value]) -> Result<Value, Completion>;

/// Parses a property key as an ES5 array index (`ToUint32` round-trips and
/// is `< 2^32 - 1`), per the array-specific `[[DefineOwnProperty]]`
/// override (ES5 §15.4.5.1).
pub fn as_array_index(key: &str) -> Option<u32> {
    if key == "0" {
        return Some(0);
    }
    if key.starts_with('0') || key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n: u64 = key.parse().ok()?;
    if n < u32::MAX as u64 {
        Some(n as u32)
    } else {
        None
    }
}

/// The 10-step descriptor-compatibility table from ES5 §8.12.9, applied to
/// an already-resolved current descriptor (or `None` for "absent").
/// Returns `Ok(Some(merged))` when the transition is allowed (producing the
/// descriptor to store), `Ok(None)` when it's a same-value no-op that
/// shouldn't touch the property at all, or `Err(())` when it must throw
/// (the caller decides whether that's a `TypeError` or a silent `false`
/// based on the `Throw` argument).
pub fn validate_define_own_property(
    current: Option<&PropertyDescriptor>,
    desc: &PropertyDescriptor,
    extensible: bool,
) -> Result<Option<PropertyDescriptor>, ()> {
    match current {
        None => {
            if !extensible {
                return Err(());
            }
            Ok(Some(complete_descriptor(desc)))
        }
        Some(current) => {
            if is_no_op(current, desc) {
                return Ok(None);
            }
            if !current.configurable() {
                if desc.configurable() {
                    return Err(());
                }
                if let Some(new_enum) = desc.enumerable {
                    if new_enum != current.enumerable() {
                        return Err(());
                    }
                }
                let switches_kind =
                    current.is_data_descriptor() != desc.is_data_descriptor()
                        && !desc.is_generic_descriptor();
                if switches_kind {
                    return Err(());
                }
                if current.is_data_descriptor() && desc.is_data_descriptor() {
                    if !current.writable() {
                        if desc.writable == Some(true) {
                            return Err(());
                        }
                        if let Some(new_value) = &desc.value {
                            if !same_value(new_value, current.value.as_ref().unwrap()) {
                                return Err(());
                            }
                        }
                    }
                } else if current.is_accessor_descriptor() && desc.is_accessor_descriptor() {
                    if let Some(get) = &desc.get {
                        if !same_opt_value(Some(get), current.get.as_ref()) {
                            return Err(());
                        }
                    }
                    if let Some(set) = &desc.set {
                        if !same_opt_value(Some(set), current.set.as_ref()) {
                            return Err(());
                        }
                    }
                }
            }
            Ok(Some(merge_descriptor(current, desc)))
        }
    }
}

fn same_opt_value(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => same_value(a, b),
        _ => false,
    }
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Object(a), Value::Object(b)) => a == b,
        (Value::String(a), Value::String(b)) => a == b,
        _ => a.strictly_equals_primitive(b),
    }
}

fn is_no_op(current: &PropertyDescriptor, desc: &PropertyDescriptor) -> bool {
    if desc.is_generic_descriptor()
        && desc.enumerable.is_none()
        && desc.configurable.is_none()
    {
        // A completely empty descriptor changes nothing.
        return desc.value.is_none()
            && desc.get.is_none()
            && desc.set.is_none()
            && desc.writable.is_none();
    }
    let enumerable_same = desc.enumerable.map_or(true, |e| e == current.enumerable());
    let configurable_same = desc
        .configurable
        .map_or(true, |c| c == current.configurable());
    if !enumerable_same || !configurable_same {
        return false;
    }
    if current.is_data_descriptor() && desc.is_data_descriptor() {
        let writable_same = desc.writable.map_or(true, |w| w == current.writable());
        let value_same = desc
            .value
            .as_ref()
            .map_or(true, |v| same_value(v, current.value.as_ref().unwrap()));
        writable_same && value_same && (desc.writable.is_some() || desc.value.is_some())
    } else if current.is_accessor_descriptor() && desc.is_accessor_descriptor() {
        let get_same = same_opt_value(desc.get.as_ref(), current.get.as_ref());
        let set_same = same_opt_value(desc.set.as_ref(), current.set.as_ref());
        get_same && set_same && (desc.get.is_some() || desc.set.is_some())
    } else {
        false
    }
}

fn complete_descriptor(desc: &PropertyDescriptor) -> PropertyDescriptor {
    if desc.is_accessor_descriptor() {
        PropertyDescriptor {
            value: None,
            get: desc.get.clone(),
            set: desc.set.clone(),
            writable: None,
            enumerable: Some(desc.enumerable()),
            configurable: Some(desc.configurable()),
        }
    } else {
        PropertyDescriptor {
            value: Some(desc.value.clone().unwrap_or(Value::Undefined)),
            get: None,
            set: None,
            writable: Some(desc.writable()),
            enumerable: Some(desc.enumerable()),
            configurable: Some(desc.configurable()),
        }
    }
}

fn merge_descriptor(current: &PropertyDescriptor, desc: &PropertyDescriptor) -> PropertyDescriptor {
    let switching_to_data = desc.is_data_descriptor() && current.is_accessor_descriptor();
    let switching_to_accessor = desc.is_accessor_descriptor() && current.is_data_descriptor();
    if switching_to_data {
        PropertyDescriptor {
            value: Some(desc.value.clone().unwrap_or(Value::Undefined)),
            get: None,
            set: None,
            writable: Some(desc.writable.unwrap_or(false)),
            enumerable: Some(desc.enumerable.unwrap_or(current.enumerable())),
            configurable: Some(desc.configurable.unwrap_or(current.configurable())),
        }
    } else if switching_to_accessor {
        PropertyDescriptor {
            value: None,
            get: desc.get.clone(),
            set: desc.set.clone(),
            writable: None,
            enumerable: Some(desc.enumerable.unwrap_or(current.enumerable())),
            configurable: Some(desc.configurable.unwrap_or(current.configurable())),
        }
    } else if current.is_data_descriptor() {
        PropertyDescriptor {
            value: Some(desc.value.clone().unwrap_or_else(|| current.value.clone().unwrap())),
            get: None,
            set: None,
            writable: Some(desc.writable.unwrap_or(current.writable())),
            enumerable: Some(desc.enumerable.unwrap_or(current.enumerable())),
            configurable: Some(desc.configurable.unwrap_or(current.configurable())),
        }
    } else {
        PropertyDescriptor {
            value: None,
            get: Some(desc.get.clone().unwrap_or_else(|| current.get.clone().unwrap_or(Value::Undefined))),
            set: Some(desc.set.clone().unwrap_or_else(|| current.set.clone().unwrap_or(Value::Undefined))),
            writable: None,
            enumerable: Some(desc.enumerable.unwrap_or(current.enumerable())),
            configurable: Some(desc.configurable.unwrap_or(current.configurable())),
        }
    }
}

/// `[[CanPut]]`, resolved against a single object's own descriptor —
/// callers walk the prototype chain via [`crate::Context`] when `obj` has
/// no own property named `key`.
pub fn can_put_own(obj: &Object, key: &str) -> Option<bool> {
    obj.get_own_property(key).map(|d| {
        if d.is_accessor_descriptor() {
            d.set.is_some()
        } else {
            d.writable()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_index_parsing() {
        assert_eq!(as_array_index("0"), Some(0));
        assert_eq!(as_array_index("42"), Some(42));
        assert_eq!(as_array_index("01"), None);
        assert_eq!(as_array_index("-1"), None);
        assert_eq!(as_array_index("4294967295"), None);
    }

    #[test]
    fn redefine_unchanged_is_no_op() {
        let current = PropertyDescriptor::data(Value::Number(1.0), true, true, true);
        let desc = PropertyDescriptor::data(Value::Number(1.0), true, true, true);
        assert!(validate_define_own_property(Some(&current), &desc, true)
            .unwrap()
            .is_none());
    }

    #[test]
    fn non_configurable_configurable_flip_throws() {
        let current = PropertyDescriptor::data(Value::Number(1.0), true, true, false);
        let mut desc = PropertyDescriptor::empty();
        desc.configurable = Some(true);
        assert!(validate_define_own_property(Some(&current), &desc, true).is_err());
    }
}
