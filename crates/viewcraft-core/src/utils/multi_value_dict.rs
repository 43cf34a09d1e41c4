//! A dictionary that can hold multiple values per key.
//!
//! Query strings and submitted form data may repeat a key, and the order in
//! which keys first appeared matters when a URL is rebuilt from them, so
//! [`MultiValueDict`] remembers key insertion order.

use std::collections::HashMap;
use std::hash::Hash;

/// An insertion-ordered dictionary that maps keys to lists of values.
///
/// [`get`](MultiValueDict::get) returns the **last** value for a key while
/// [`get_list`](MultiValueDict::get_list) returns all of them. Iteration
/// yields keys in the order they were first inserted.
///
/// # Examples
///
/// ```
/// use viewcraft_core::utils::MultiValueDict;
///
/// let mut d = MultiValueDict::new();
/// d.append("color".to_string(), "red");
/// d.append("color".to_string(), "blue");
///
/// assert_eq!(d.get(&"color".to_string()), Some(&"blue"));
/// assert_eq!(d.get_list(&"color".to_string()), Some(&vec!["red", "blue"]));
/// ```
#[derive(Debug, Clone)]
pub struct MultiValueDict<K: Eq + Hash + Clone, V> {
    order: Vec<K>,
    inner: HashMap<K, Vec<V>>,
}

impl<K: Eq + Hash + Clone, V> Default for MultiValueDict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash + Clone, V> MultiValueDict<K, V> {
    /// Creates an empty `MultiValueDict`.
    pub fn new() -> Self {
        Self {
            order: Vec::new(),
            inner: HashMap::new(),
        }
    }

    /// Returns the last value associated with the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key).and_then(|v| v.last())
    }

    /// Returns all values associated with the key.
    pub fn get_list(&self, key: &K) -> Option<&Vec<V>> {
        self.inner.get(key)
    }

    /// Sets the value for a key, replacing any existing values.
    ///
    /// A key that already exists keeps its position.
    pub fn set(&mut self, key: K, value: V) {
        if !self.inner.contains_key(&key) {
            self.order.push(key.clone());
        }
        self.inner.insert(key, vec![value]);
    }

    /// Appends a value to the list for the given key.
    pub fn append(&mut self, key: K, value: V) {
        if let Some(values) = self.inner.get_mut(&key) {
            values.push(value);
        } else {
            self.order.push(key.clone());
            self.inner.insert(key, vec![value]);
        }
    }

    /// Removes a key and returns its values.
    pub fn remove(&mut self, key: &K) -> Option<Vec<V>> {
        let removed = self.inner.remove(key)?;
        self.order.retain(|k| k != key);
        Some(removed)
    }

    /// Returns an iterator over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    /// Returns an iterator over (key, value-list) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &Vec<V>)> {
        self.order
            .iter()
            .filter_map(|k| self.inner.get(k).map(|values| (k, values)))
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the dictionary contains no keys.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Returns `true` if the dictionary contains the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }
}
