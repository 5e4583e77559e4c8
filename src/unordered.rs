use std::slice;

use crate::chain::{self, ChainList};
use crate::hash::bucket_index;

/// Default number of buckets when none is specified.
const DEFAULT_BUCKET_COUNT: usize = 100;

/// Default maximum load factor before the table doubles.
const DEFAULT_MAX_LOAD: f64 = 0.80;

/// A separate chaining hash table from string keys to string values.
///
/// Each bucket is a [`ChainList`]. Whenever an insertion pushes the load
/// factor (elements per bucket) to the configured maximum, the bucket vector
/// is doubled and every entry is redistributed by re-hashing its key.
pub struct UnorderedMap {
    buckets: Vec<ChainList>,
    max_load: f64,
    elements: usize,
}

impl UnorderedMap {
    /// Creates an empty map with the default bucket count and maximum load
    /// factor (100 buckets, 0.80).
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKET_COUNT, DEFAULT_MAX_LOAD)
    }

    /// Creates an empty map with the given bucket count and maximum load
    /// factor. The bucket count must be non-zero and the load factor
    /// positive.
    pub fn with_buckets(bucket_count: usize, max_load: f64) -> Self {
        assert!(bucket_count > 0);
        assert!(max_load > 0.0);
        Self {
            buckets: (0..bucket_count).map(|_| ChainList::new()).collect(),
            max_load,
            elements: 0,
        }
    }

    /// Returns true if the map contains no entries.
    pub fn is_empty(&self) -> bool {
        self.elements == 0
    }

    /// Returns the number of entries in the map.
    pub fn size(&self) -> usize {
        self.elements
    }

    /// Returns the current number of buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Returns the ratio of stored entries to buckets.
    pub fn load_factor(&self) -> f64 {
        self.elements as f64 / self.buckets.len() as f64
    }

    /// Returns a mutable reference to the value stored under the given key,
    /// inserting an entry with an empty value first if the key is absent.
    ///
    /// A fresh insertion bumps the element count and may double the table,
    /// so the slot is re-resolved against the final bucket layout before the
    /// reference is handed out.
    pub fn entry(&mut self, key: &str) -> &mut String {
        let index = bucket_index(key, self.buckets.len());
        if self.buckets[index].get(key).is_none() {
            self.buckets[index].push_head(key.to_string(), String::new());
            self.elements += 1;
            self.rehash();
        }
        // Re-hash in case the bucket count changed
        let index = bucket_index(key, self.buckets.len());
        self.buckets[index].get_mut(key).unwrap()
    }

    /// Stores a value under the given key, overwriting any previous value.
    pub fn insert(&mut self, key: &str, value: &str) {
        let slot = self.entry(key);
        slot.clear();
        slot.push_str(value);
    }

    /// Returns the value stored under the given key without inserting.
    pub fn get(&self, key: &str) -> Option<&str> {
        let index = bucket_index(key, self.buckets.len());
        self.buckets[index].get(key)
    }

    /// Removes the entry with the given key.
    /// Returns whether the key was previously present.
    pub fn remove(&mut self, key: &str) -> bool {
        let index = bucket_index(key, self.buckets.len());
        if self.buckets[index].remove(key) {
            self.elements -= 1;
            return true;
        }
        false
    }

    /// Doubles the bucket count and redistributes every entry if the load
    /// factor has reached the configured maximum, otherwise does nothing.
    /// The old bucket vector is dropped wholesale; order within a bucket is
    /// not preserved across a rehash.
    pub fn rehash(&mut self) {
        if self.load_factor() < self.max_load {
            return;
        }
        let bucket_count = self.buckets.len() * 2;
        let mut buckets: Vec<ChainList> = (0..bucket_count).map(|_| ChainList::new()).collect();
        for bucket in &self.buckets {
            for (key, value) in bucket.iter() {
                let index = bucket_index(key, bucket_count);
                buckets[index].push_head(key.to_string(), value.to_string());
            }
        }
        self.buckets = buckets;
    }

    /// Returns a forward iterator over all entries, bucket by bucket.
    /// An empty map yields nothing.
    pub fn iter(&self) -> Iter<'_> {
        let mut buckets = self.buckets.iter();
        let current = buckets.next().map(|bucket| bucket.iter());
        Iter { buckets, current }
    }
}

impl Default for UnorderedMap {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for UnorderedMap {
    fn clone(&self) -> Self {
        Self {
            buckets: self.buckets.clone(),
            max_load: self.max_load,
            elements: self.elements,
        }
    }
}

/// A forward-only iterator over the entries of an [`UnorderedMap`].
///
/// Holds a cursor of bucket position plus chain position. The borrow on the
/// map keeps it immutable for the iterator's whole lifetime, so entries can
/// neither move nor disappear mid-iteration.
pub struct Iter<'a> {
    buckets: slice::Iter<'a, ChainList>,
    current: Option<chain::Iter<'a>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let current = self.current.as_mut()?;
            if let Some(pair) = current.next() {
                return Some(pair);
            }
            self.current = self.buckets.next().map(|bucket| bucket.iter());
        }
    }
}

impl<'a> IntoIterator for &'a UnorderedMap {
    type Item = (&'a str, &'a str);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
