//! Ordered map type for TOON objects.
//!
//! [`ToonMap`] wraps [`IndexMap`] so object entries keep their insertion
//! order through an encode/decode round trip. Equality is map equality:
//! two `ToonMap`s with the same entries in different orders compare equal,
//! which is also the unordered key-set comparison the tabular array
//! classification relies on.

use indexmap::IndexMap;

/// An insertion-ordered map of string keys to TOON values.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{ToonMap, Value};
///
/// let mut map = ToonMap::new();
/// map.insert("name".to_string(), Value::from("Alice"));
/// map.insert("age".to_string(), Value::from(30));
///
/// let keys: Vec<_> = map.keys().cloned().collect();
/// assert_eq!(keys, vec!["name", "age"]);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ToonMap(IndexMap<String, crate::Value>);

impl ToonMap {
    /// Creates an empty `ToonMap`.
    #[must_use]
    pub fn new() -> Self {
        ToonMap(IndexMap::new())
    }

    /// Creates an empty `ToonMap` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        ToonMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair, returning the previous value for the key
    /// if there was one.
    pub fn insert(&mut self, key: String, value: crate::Value) -> Option<crate::Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&crate::Value> {
        self.0.get(key)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, crate::Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, crate::Value> {
        self.0.values()
    }

    /// Returns an iterator over the entries, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, crate::Value> {
        self.0.iter()
    }
}

impl IntoIterator for ToonMap {
    type Item = (String, crate::Value);
    type IntoIter = indexmap::map::IntoIter<String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a ToonMap {
    type Item = (&'a String, &'a crate::Value);
    type IntoIter = indexmap::map::Iter<'a, String, crate::Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, crate::Value)> for ToonMap {
    fn from_iter<T: IntoIterator<Item = (String, crate::Value)>>(iter: T) -> Self {
        ToonMap(IndexMap::from_iter(iter))
    }
}
