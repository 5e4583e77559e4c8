use std::num::ParseIntError;

use thiserror::Error;

use crate::tree::AvlTree;

/// The error returned when a map key is not a valid integer id.
///
/// Malformed keys are the one hard failure of the ordered map; a well formed
/// key that is simply absent is reported through the regular return value.
#[derive(Debug, Error)]
#[error("invalid integer key {key:?}")]
pub struct InvalidKey {
    key: String,
    #[source]
    source: ParseIntError,
}

/// An ordered map from integer id strings to names, backed by an [`AvlTree`].
///
/// Keys are decimal strings parsed to `u32` ids; records come back in id
/// order.
#[derive(Clone, Default)]
pub struct OrderedMap {
    tree: AvlTree,
}

impl OrderedMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self {
            tree: AvlTree::new(),
        }
    }

    /// Inserts a record under the given id string.
    /// Returns `Ok(false)` without changing the map if the id is already
    /// present, and an error if the id is not a valid integer.
    pub fn insert(&mut self, id: &str, name: &str) -> Result<bool, InvalidKey> {
        let id = parse_id(id)?;
        Ok(self.tree.insert(name, id))
    }

    /// Returns the name stored under the given id string, or an empty string
    /// if the id is absent.
    pub fn search(&self, id: &str) -> Result<String, InvalidKey> {
        let id = parse_id(id)?;
        Ok(self.tree.search_id(id).unwrap_or_default().to_string())
    }

    /// Returns the preorder traversal of the names, separated by `", "`.
    pub fn traverse(&self) -> String {
        self.tree.preorder_names()
    }

    /// Removes the record stored under the given id string.
    /// Returns whether the id was previously present.
    pub fn remove(&mut self, id: &str) -> Result<bool, InvalidKey> {
        let id = parse_id(id)?;
        Ok(self.tree.remove(id))
    }

    /// Returns the number of live records.
    /// The count is tracked incrementally by the tree: it moves only on a
    /// successful insert or remove.
    pub fn size(&self) -> usize {
        self.tree.len()
    }
}

fn parse_id(id: &str) -> Result<u32, InvalidKey> {
    id.parse().map_err(|source| InvalidKey {
        key: id.to_string(),
        source,
    })
}
