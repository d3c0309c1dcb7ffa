//! String interner producing [`Name`] identifiers.
//!
//! Interning is append-only: a string, once interned, keeps its `Name` for
//! the lifetime of the interner. The empty string is pre-interned as
//! `Name::EMPTY` so `Name::default()` is always valid.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::Name;

/// Shared handle to an [`Interner`].
///
/// The scanner, scope arena, and pipeline passes all hold one of these so
/// generated names and source names land in the same table.
pub type SharedInterner = Arc<Interner>;

struct InternerInner {
    map: FxHashMap<Arc<str>, Name>,
    strings: Vec<Arc<str>>,
}

/// Append-only string interner.
///
/// Interior mutability keeps the common call shape (`&Interner`) ergonomic:
/// every pipeline stage needs to intern, but none of them own the table.
pub struct Interner {
    inner: RwLock<InternerInner>,
}

impl Interner {
    /// Create a new interner with the empty string pre-interned.
    pub fn new() -> Self {
        let empty: Arc<str> = Arc::from("");
        let mut map = FxHashMap::default();
        map.insert(Arc::clone(&empty), Name::EMPTY);
        Interner {
            inner: RwLock::new(InternerInner {
                map,
                strings: vec![empty],
            }),
        }
    }

    /// Create a new shared interner handle.
    pub fn shared() -> SharedInterner {
        Arc::new(Interner::new())
    }

    /// Intern a string, returning its stable `Name`.
    pub fn intern(&self, text: &str) -> Name {
        if let Some(&name) = self.inner.read().map.get(text) {
            return name;
        }
        let mut inner = self.inner.write();
        // Re-check under the write lock: another caller may have won the race.
        if let Some(&name) = inner.map.get(text) {
            return name;
        }
        let name = Name::from_raw(inner.strings.len() as u32);
        let owned: Arc<str> = Arc::from(text);
        inner.strings.push(Arc::clone(&owned));
        inner.map.insert(owned, name);
        name
    }

    /// Resolve a `Name` back to its string.
    ///
    /// Returns the empty string for names this interner never produced;
    /// that only happens on a cross-interner mixup, which is a caller bug.
    pub fn resolve(&self, name: Name) -> Arc<str> {
        let inner = self.inner.read();
        inner
            .strings
            .get(name.raw() as usize)
            .map_or_else(|| Arc::from(""), Arc::clone)
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Check whether only the pre-interned empty string is present.
    pub fn is_empty(&self) -> bool {
        self.len() == 1
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Interner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interner")
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_intern_is_stable() {
        let interner = Interner::new();
        let a = interner.intern("map");
        let b = interner.intern("map");
        assert_eq!(a, b);
        assert_eq!(&*interner.resolve(a), "map");
    }

    #[test]
    fn test_distinct_strings_get_distinct_names() {
        let interner = Interner::new();
        let a = interner.intern("foldr");
        let b = interner.intern("foldl");
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_preinterned() {
        let interner = Interner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert!(interner.is_empty());
    }

    #[test]
    fn test_resolve_unknown_yields_empty() {
        let interner = Interner::new();
        assert_eq!(&*interner.resolve(Name::from_raw(999)), "");
    }
}
