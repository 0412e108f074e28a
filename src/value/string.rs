//! The string store: interned and non-interned UTF-16 strings with cached
//! length, comparison and concatenation. Strings live in the heap arena
//! behind a [`crate::heap::StringHandle`] rather than behind an `Rc`.

use rustc_hash::FxHashMap;

/// An immutable UTF-16 string. Equality is codepoint-wise; ordering is
/// lexicographic over code units, matching ES5's `<`/`>` on strings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JsString {
    units: Box<[u16]>,
}

impl JsString {
    /// Length in UTF-16 code units (`String.prototype.length`'s unit).
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[u16] {
        &self.units
    }

    /// Lossy UTF-8 view, used for diagnostics, property-key comparisons
    /// against ASCII literals, and conversions that never produce lone
    /// surrogates (identifiers, numeric strings).
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf16_lossy(&self.units).into()
    }

    /// Concatenates two strings, producing a new owned value.
    pub fn concat(&self, other: &JsString) -> JsString {
        let mut units = Vec::with_capacity(self.units.len() + other.units.len());
        units.extend_from_slice(&self.units);
        units.extend_from_slice(&other.units);
        JsString {
            units: units.into_boxed_slice(),
        }
    }

    /// `substring`-style O(n) copy of a code-unit range.
    pub fn substring(&self, start: usize, end: usize) -> JsString {
        let end = end.min(self.units.len());
        let start = start.min(end);
        JsString {
            units: self.units[start..end].to_vec().into_boxed_slice(),
        }
    }

    pub fn char_code_at(&self, index: usize) -> Option<u16> {
        self.units.get(index).copied()
    }
}

impl From<&str> for JsString {
    fn from(s: &str) -> Self {
        JsString {
            units: s.encode_utf16().collect::<Vec<_>>().into_boxed_slice(),
        }
    }
}

impl From<String> for JsString {
    fn from(s: String) -> Self {
        JsString::from(s.as_str())
    }
}

impl From<Vec<u16>> for JsString {
    fn from(units: Vec<u16>) -> Self {
        JsString {
            units: units.into_boxed_slice(),
        }
    }
}

impl std::fmt::Display for JsString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Intern table shared by an interpreter instance for identifiers and
/// property keys, so repeated lookups of the same name don't re-hash a
/// fresh UTF-16 buffer each time. Optional; the object model stores
/// property keys as plain `Box<str>`, but the lexer/parser intern
/// identifiers through this table to avoid re-allocating common names like
/// `"length"` or `"prototype"` for every occurrence in a source file.
#[derive(Debug, Default)]
pub struct Interner {
    table: FxHashMap<Box<str>, std::rc::Rc<str>>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> std::rc::Rc<str> {
        if let Some(existing) = self.table.get(s) {
            return existing.clone();
        }
        let rc: std::rc::Rc<str> = std::rc::Rc::from(s);
        self.table.insert(Box::from(s), rc.clone());
        rc
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concat_produces_new_value() {
        let a = JsString::from("foo");
        let b = JsString::from("bar");
        assert_eq!(a.concat(&b).as_str(), "foobar");
    }

    #[test]
    fn ordering_is_lexicographic_on_units() {
        assert!(JsString::from("a") < JsString::from("b"));
    }

    #[test]
    fn interner_dedupes() {
        let mut interner = Interner::new();
        let a = interner.intern("length");
        let b = interner.intern("length");
        assert!(std::rc::Rc::ptr_eq(&a, &b));
    }
}
