use std::marker::PhantomData;
use std::ptr::NonNull;

/// A doubly linked list of key-value pairs, used as a hash table bucket.
///
/// The list owns every node; `prev` links are purely navigational. When used
/// as a bucket, keys are unique within a single list.
pub struct ChainList {
    head: Link,
    tail: Link,
    num_nodes: usize,
}

struct Node {
    key: String,
    value: String,
    prev: Link,
    next: Link,
}

type NodePtr = NonNull<Node>;
type Link = Option<NodePtr>;

impl ChainList {
    /// Creates an empty list.
    /// No memory is allocated until the first pair is inserted.
    pub fn new() -> Self {
        Self {
            head: None,
            tail: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the list contains no pairs.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Returns the number of pairs in the list.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Inserts a pair at the front of the list in O(1).
    pub fn push_head(&mut self, key: String, value: String) {
        let mut node_ptr = Node::create(key, value);
        match self.head {
            None => self.tail = Some(node_ptr),
            Some(mut head_ptr) => {
                unsafe {
                    node_ptr.as_mut().next = Some(head_ptr);
                    head_ptr.as_mut().prev = Some(node_ptr);
                }
            }
        }
        self.head = Some(node_ptr);
        self.num_nodes += 1;
    }

    /// Inserts a pair at the back of the list in O(1).
    pub fn push_tail(&mut self, key: String, value: String) {
        let mut node_ptr = Node::create(key, value);
        match self.tail {
            None => self.head = Some(node_ptr),
            Some(mut tail_ptr) => {
                unsafe {
                    node_ptr.as_mut().prev = Some(tail_ptr);
                    tail_ptr.as_mut().next = Some(node_ptr);
                }
            }
        }
        self.tail = Some(node_ptr);
        self.num_nodes += 1;
    }

    /// Returns the value stored under the given key.
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(node_ptr) = self.find(key) {
            return Some(&unsafe { &*node_ptr.as_ptr() }.value);
        }
        None
    }

    /// Returns a mutable reference to the value stored under the given key.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut String> {
        if let Some(node_ptr) = self.find(key) {
            return Some(&mut unsafe { &mut *node_ptr.as_ptr() }.value);
        }
        None
    }

    /// Removes the pair with the given key, re-linking its neighbors.
    /// Returns whether the key was previously present.
    pub fn remove(&mut self, key: &str) -> bool {
        if let Some(node_ptr) = self.find(key) {
            self.unlink_node(node_ptr);
            unsafe { Node::destroy(node_ptr) };
            self.num_nodes -= 1;
            return true;
        }
        false
    }

    /// Returns an iterator over the pairs from head to tail.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            next: self.head,
            marker: PhantomData,
        }
    }

    /// Clears the list, deallocating all nodes.
    pub fn clear(&mut self) {
        let mut current = self.head;
        while let Some(node_ptr) = current {
            current = unsafe { node_ptr.as_ref().next };
            unsafe { Node::destroy(node_ptr) };
        }
        self.head = None;
        self.tail = None;
        self.num_nodes = 0;
    }

    fn find(&self, key: &str) -> Link {
        let mut current = self.head;
        while let Some(node_ptr) = current {
            if unsafe { node_ptr.as_ref() }.key == key {
                break;
            }
            current = unsafe { node_ptr.as_ref().next };
        }
        current
    }

    fn unlink_node(&mut self, node_ptr: NodePtr) {
        unsafe {
            // A sole node has no neighbors to patch
            match node_ptr.as_ref().prev {
                None => self.head = node_ptr.as_ref().next,
                Some(mut prev_ptr) => prev_ptr.as_mut().next = node_ptr.as_ref().next,
            }
            match node_ptr.as_ref().next {
                None => self.tail = node_ptr.as_ref().prev,
                Some(mut next_ptr) => next_ptr.as_mut().prev = node_ptr.as_ref().prev,
            }
        }
    }
}

impl Drop for ChainList {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Default for ChainList {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ChainList {
    /// Produces an independent deep copy with freshly allocated nodes in the
    /// same order.
    fn clone(&self) -> Self {
        let mut list = ChainList::new();
        for (key, value) in self.iter() {
            list.push_tail(key.to_string(), value.to_string());
        }
        list
    }
}

impl Node {
    fn create(key: String, value: String) -> NodePtr {
        let boxed = Box::new(Node {
            key,
            value,
            prev: None,
            next: None,
        });
        unsafe { NodePtr::new_unchecked(Box::into_raw(boxed)) }
    }

    unsafe fn destroy(node_ptr: NodePtr) {
        drop(Box::from_raw(node_ptr.as_ptr()));
    }
}

/// An iterator over the key-value pairs of a list.
pub struct Iter<'a> {
    next: Link,
    marker: PhantomData<&'a ChainList>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        let node_ptr = self.next?;
        let node = unsafe { &*node_ptr.as_ptr() };
        self.next = node.next;
        Some((&node.key, &node.value))
    }
}
