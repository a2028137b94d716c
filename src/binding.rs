//! Typed bindings over store slots.
//!
//! A [`Pref`] declares a single logical value: a key, a default, and the
//! store it reads from and writes to. Reading substitutes the default
//! when the slot is absent or holds a value of the wrong type; writing an
//! optional value's absent variant removes the slot instead of storing a
//! null marker.

use std::sync::Arc;

use crate::error::Result;
use crate::key::{Key, PrefKey};
use crate::store::Prefs;
use crate::value::Value;

/// A type that can live in a preference slot.
///
/// This is the capability seam between a binding's statically typed value
/// and the loosely typed store:
///
/// - [`into_pref`](PrefValue::into_pref) returns `None` for the absent
///   variant of an optional type, which a binding turns into a remove
///   rather than a write.
/// - [`from_pref`](PrefValue::from_pref) returns `None` when the stored
///   value cannot be read as `Self`; a binding treats that exactly like an
///   absent slot and falls back to its default.
pub trait PrefValue: Sized {
    /// Convert into a storable value, or `None` to mean "absent".
    fn into_pref(self) -> Option<Value>;

    /// Read back from a stored value. `None` is a silent coercion failure.
    fn from_pref(value: Value) -> Option<Self>;
}

impl PrefValue for bool {
    fn into_pref(self) -> Option<Value> {
        Some(Value::Bool(self))
    }

    fn from_pref(value: Value) -> Option<Self> {
        value.as_bool()
    }
}

impl PrefValue for i64 {
    fn into_pref(self) -> Option<Value> {
        Some(Value::Int(self))
    }

    fn from_pref(value: Value) -> Option<Self> {
        value.as_int()
    }
}

impl PrefValue for f64 {
    fn into_pref(self) -> Option<Value> {
        Some(Value::Float(self))
    }

    fn from_pref(value: Value) -> Option<Self> {
        value.as_float()
    }
}

impl PrefValue for String {
    fn into_pref(self) -> Option<Value> {
        Some(Value::String(self))
    }

    fn from_pref(value: Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
}

impl PrefValue for Vec<u8> {
    fn into_pref(self) -> Option<Value> {
        Some(Value::Bytes(self))
    }

    fn from_pref(value: Value) -> Option<Self> {
        match value {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }
}

impl PrefValue for Value {
    fn into_pref(self) -> Option<Value> {
        Some(self)
    }

    fn from_pref(value: Value) -> Option<Self> {
        Some(value)
    }
}

/// Optional types support absence: setting `None` removes the slot.
impl<T: PrefValue> PrefValue for Option<T> {
    fn into_pref(self) -> Option<Value> {
        self.and_then(T::into_pref)
    }

    fn from_pref(value: Value) -> Option<Self> {
        T::from_pref(value).map(Some)
    }
}

/// A typed, defaulted, persistent value bound to one store slot.
///
/// The store reference is captured at construction and never re-resolved:
/// replacing the shared store afterwards does not retarget bindings that
/// already exist.
///
/// # Example
///
/// ```ignore
/// use prefstore::prelude::*;
///
/// let launch_count: Pref<i64> = Pref::new("launchCount", 0);
/// assert_eq!(launch_count.get(), 0);
/// launch_count.set(5)?;
/// assert_eq!(launch_count.get(), 5);
///
/// // Optional bindings delete on None instead of storing a null marker.
/// let nickname: Pref<Option<String>> = Pref::new("nickname", None);
/// nickname.set(Some("kit".to_string()))?;
/// nickname.set(None)?; // slot is removed
/// ```
pub struct Pref<V> {
    key: Key,
    default: V,
    store: Arc<Prefs>,
}

impl<V: PrefValue + Clone> Pref<V> {
    /// Bind `key` with `default` against the shared store, captured now.
    pub fn new<K: PrefKey + ?Sized>(key: &K, default: V) -> Self {
        Self::with_store(key, default, Prefs::shared())
    }

    /// Bind `key` with `default` against an explicit store.
    pub fn with_store<K: PrefKey + ?Sized>(key: &K, default: V, store: Arc<Prefs>) -> Self {
        Self {
            key: Key::new(key.key()),
            default,
            store,
        }
    }

    /// Read the bound value.
    ///
    /// Returns the stored value if present and of the expected type,
    /// otherwise a clone of the default. Never an error.
    pub fn get(&self) -> V {
        self.store
            .object(&self.key)
            .and_then(V::from_pref)
            .unwrap_or_else(|| self.default.clone())
    }

    /// Write the bound value.
    ///
    /// An optional type's absent variant removes the slot; everything else
    /// is stored as-is.
    pub fn set(&self, value: V) -> Result<()> {
        match value.into_pref() {
            Some(value) => self.store.set(&self.key, value),
            None => self.store.remove(&self.key),
        }
    }

    /// The key this binding addresses.
    pub fn key(&self) -> &str {
        self.key.key()
    }

    /// The default substituted on absent or mistyped slots.
    pub fn default(&self) -> &V {
        &self.default
    }

    /// The store captured at construction.
    pub fn store(&self) -> &Arc<Prefs> {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::MemoryPersistence;

    fn store() -> Arc<Prefs> {
        Prefs::with_persistence(None, Arc::new(MemoryPersistence::new())).unwrap()
    }

    #[test]
    fn get_unset_returns_default() {
        let launch_count = Pref::with_store("launchCount", 0i64, store());
        assert_eq!(launch_count.get(), 0);
    }

    #[test]
    fn set_then_get_roundtrips() {
        let launch_count = Pref::with_store("launchCount", 0i64, store());
        launch_count.set(5).unwrap();
        assert_eq!(launch_count.get(), 5);
    }

    #[test]
    fn wrong_stored_type_falls_back_to_default() {
        let prefs = store();
        prefs.set("flag", "not a bool").unwrap();

        let flag = Pref::with_store("flag", true, prefs);
        assert!(flag.get());
    }

    #[test]
    fn optional_set_none_removes_slot() {
        let prefs = store();
        let nickname: Pref<Option<String>> =
            Pref::with_store("nickname", None, prefs.clone());

        nickname.set(Some("kit".to_string())).unwrap();
        assert_eq!(prefs.object("nickname"), Some(Value::String("kit".into())));
        assert_eq!(nickname.get(), Some("kit".to_string()));

        nickname.set(None).unwrap();
        // Removed outright, not a stored null marker.
        assert_eq!(prefs.object("nickname"), None);
        assert_eq!(nickname.get(), None);
    }

    #[test]
    fn optional_default_applies_when_absent() {
        let theme: Pref<Option<String>> =
            Pref::with_store("theme", Some("light".to_string()), store());
        assert_eq!(theme.get(), Some("light".to_string()));
    }

    #[test]
    fn bytes_binding_roundtrips() {
        let blob = Pref::with_store("blob", Vec::new(), store());
        blob.set(vec![1u8, 2, 3]).unwrap();
        assert_eq!(blob.get(), vec![1, 2, 3]);
    }
}
