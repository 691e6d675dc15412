//! Ordered multi-value map used for parameters, headers and cookies

use indexmap::IndexMap;

/// Mapping from key to an ordered list of values.
///
/// Keys keep the order in which they were first inserted and each key keeps
/// its values in insertion order. Keys are case-sensitive. A key only exists
/// once it holds at least one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiMap {
    entries: IndexMap<String, Vec<String>>,
}

impl MultiMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value, creating the key if absent
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries
            .entry(key.into())
            .or_default()
            .push(value.into());
    }

    /// All values for `key`, empty if the key is absent
    pub fn get(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_first(&self, key: &str) -> Option<&str> {
        self.get(key).first().map(String::as_str)
    }

    /// Values for `key` compared ASCII case-insensitively, in store order
    pub fn get_ignore_case(&self, key: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(key))
            .flat_map(|(_, values)| values.iter().map(String::as_str))
            .collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// The full structure, keys in first-insertion order
    pub fn all(&self) -> &IndexMap<String, Vec<String>> {
        &self.entries
    }

    /// Every (key, value) pair in iteration order
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .flat_map(|(k, values)| values.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<K, V> FromIterator<(K, V)> for MultiMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = MultiMap::new();
        for (key, value) in iter {
            map.add(key, value);
        }
        map
    }
}
