use std::iter::Zip;

/// Insertion-ordered map for small collections with unique keys
#[derive(Clone, Debug)]
pub struct KeyedVec<K, V>
where
    K: PartialEq,
{
    keys: Vec<K>,
    values: Vec<V>,
}
impl<K, V> KeyedVec<K, V>
where
    K: PartialEq,
{
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: Vec::new(),
        }
    }
    /// Insert a value, handing it back if the key is already taken
    pub fn add(&mut self, key: K, value: V) -> Result<(), (K, V)> {
        if self.contains(&key) {
            return Err((key, value));
        }
        self.keys.push(key);
        self.values.push(value);
        Ok(())
    }
    pub fn contains(&self, key: &K) -> bool {
        self.keys.iter().any(|k| *k == *key)
    }
    pub fn get(&self, key: &K) -> Option<&V> {
        let idx = self.keys.iter().position(|k| *k == *key)?;
        Some(&self.values[idx])
    }
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.values.iter()
    }
    pub fn len(&self) -> usize {
        self.keys.len()
    }
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
impl<K: PartialEq, V> Default for KeyedVec<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> IntoIterator for KeyedVec<K, V>
where
    K: PartialEq,
{
    type IntoIter = Zip<std::vec::IntoIter<K>, std::vec::IntoIter<V>>;
    type Item = (K, V);
    fn into_iter(self) -> Self::IntoIter {
        self.keys.into_iter().zip(self.values)
    }
}
