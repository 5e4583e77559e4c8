//! An ordered map and an unordered map implemented from scratch.
//!
//! The ordered map is backed by an AVL tree over integer record ids, the
//! unordered map by a separate chaining hash table over string keys with
//! doubling rehash. Both containers are single-threaded and own their nodes
//! exclusively.
//!
//! ```
//! use duomap::{OrderedMap, UnorderedMap};
//!
//! let mut ordered = OrderedMap::new();
//! ordered.insert("42", "alice").unwrap();
//! assert_eq!(ordered.search("42").unwrap(), "alice");
//! assert_eq!(ordered.search("7").unwrap(), "");
//!
//! let mut unordered = UnorderedMap::new();
//! unordered.insert("alice", "blue");
//! assert_eq!(unordered.get("alice"), Some("blue"));
//! assert_eq!(unordered.size(), 1);
//! ```

mod chain;
mod hash;
mod ordered;
mod tree;
mod unordered;

pub use chain::{ChainList, Iter as ChainIter};
pub use hash::bucket_index;
pub use ordered::{InvalidKey, OrderedMap};
pub use tree::AvlTree;
pub use unordered::{Iter as UnorderedIter, UnorderedMap};
