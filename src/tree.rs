use std::cmp;
use std::ptr::NonNull;

/// A self balancing binary search tree over record ids with name payloads.
///
/// Every node caches the height of its subtree, so the balance factor of a
/// node is available in O(1) during bottom-up rebalancing.
pub struct AvlTree {
    root: Link,
    num_nodes: usize,
}

struct Node {
    id: u32,
    name: String,
    left: Link,
    right: Link,
    parent: Link,
    height: usize,
}

type NodePtr = NonNull<Node>;
type Link = Option<NodePtr>;
type LinkPtr = NonNull<Link>;

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl AvlTree {
    /// Creates an empty tree.
    /// No memory is allocated until the first record is inserted.
    pub fn new() -> Self {
        Self {
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree contains no records.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of records in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of levels in the tree.
    /// An empty tree has zero levels, a single node counts as one.
    pub fn level_count(&self) -> usize {
        match self.root {
            None => 0,
            Some(root_ptr) => (unsafe { root_ptr.as_ref().height }) + 1,
        }
    }

    /// Clears the tree, deallocating all nodes.
    pub fn clear(&mut self) {
        self.postorder(|node_ptr| unsafe { Node::destroy(node_ptr) });
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns the name stored under the given id.
    pub fn search_id(&self, id: u32) -> Option<&str> {
        if let Some(node_ptr) = self.find(id) {
            return Some(&unsafe { &*node_ptr.as_ptr() }.name);
        }
        None
    }

    /// Returns the ids of every record with the given name in ascending
    /// id order. Names are not unique, so the whole tree is visited.
    pub fn search_name(&self, name: &str) -> Vec<u32> {
        let mut ids = Vec::new();
        self.traverse(
            |_| {},
            |node_ptr| {
                let node = unsafe { &*node_ptr.as_ptr() };
                if node.name == name {
                    ids.push(node.id);
                }
            },
            |_| {},
        );
        ids
    }

    /// Inserts a record into the tree.
    /// Fails and leaves the tree unchanged if the id is already present.
    pub fn insert(&mut self, name: &str, id: u32) -> bool {
        if let Some((parent, mut link_ptr)) = self.find_insert_pos(id) {
            unsafe {
                *link_ptr.as_mut() = Some(Node::create(parent, id, name.to_string()));
            }
            self.num_nodes += 1;
            self.rebalance_once(parent);
            return true;
        }
        false
    }

    /// Removes the record with the given id from the tree.
    /// Returns whether the id was previously present.
    pub fn remove(&mut self, id: u32) -> bool {
        // Find node to-be-removed
        if let Some(node_ptr) = self.find(id) {
            debug_assert!(self.num_nodes >= 1);
            self.unlink_node(node_ptr);
            unsafe { Node::destroy(node_ptr) };
            self.num_nodes -= 1;
            debug_assert!(self.search_id(id).is_none());
            return true;
        }
        false
    }

    /// Removes the n-th record (1-indexed) in ascending id order.
    /// Fails and leaves the tree unchanged if n is zero or exceeds the
    /// record count.
    pub fn remove_inorder(&mut self, n: usize) -> bool {
        if n == 0 || n > self.num_nodes {
            return false;
        }
        let mut seen = 0;
        let mut nth_id = None;
        self.traverse(
            |_| {},
            |node_ptr| {
                seen += 1;
                if seen == n {
                    nth_id = Some(unsafe { node_ptr.as_ref().id });
                }
            },
            |_| {},
        );
        match nth_id {
            Some(id) => self.remove(id),
            None => false,
        }
    }

    /// Returns the names in ascending id order, separated by `", "`.
    pub fn inorder_names(&self) -> String {
        let mut names = Vec::with_capacity(self.num_nodes);
        self.traverse(
            |_| {},
            |node_ptr| names.push(unsafe { &*node_ptr.as_ptr() }.name.as_str()),
            |_| {},
        );
        names.join(", ")
    }

    /// Returns the names in preorder, separated by `", "`.
    pub fn preorder_names(&self) -> String {
        let mut names = Vec::with_capacity(self.num_nodes);
        self.traverse(
            |node_ptr| names.push(unsafe { &*node_ptr.as_ptr() }.name.as_str()),
            |_| {},
            |_| {},
        );
        names.join(", ")
    }

    /// Returns the names in postorder, separated by `", "`.
    pub fn postorder_names(&self) -> String {
        let mut names = Vec::with_capacity(self.num_nodes);
        self.traverse(
            |_| {},
            |_| {},
            |node_ptr| names.push(unsafe { &*node_ptr.as_ptr() }.name.as_str()),
        );
        names.join(", ")
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        unsafe {
            // Check root link
            if let Some(root_node_ptr) = self.root {
                assert!(root_node_ptr.as_ref().parent.is_none());
            }

            // Check tree nodes
            let mut num_nodes = 0;
            self.preorder(|node_ptr| {
                let mut height = 0;
                let mut left_height = 0;
                let mut right_height = 0;

                // Check link for left child node
                if let Some(left_ptr) = node_ptr.as_ref().left {
                    assert!(left_ptr.as_ref().parent == Some(node_ptr));
                    assert!(left_ptr.as_ref().id < node_ptr.as_ref().id);
                    left_height = left_ptr.as_ref().height + 1;
                    height = cmp::max(height, left_height);
                }

                // Check link for right child node
                if let Some(right_ptr) = node_ptr.as_ref().right {
                    assert!(right_ptr.as_ref().parent == Some(node_ptr));
                    assert!(right_ptr.as_ref().id > node_ptr.as_ref().id);
                    right_height = right_ptr.as_ref().height + 1;
                    height = cmp::max(height, right_height);
                }

                // Check cached height
                assert_eq!(node_ptr.as_ref().height, height);

                // Check AVL condition (near balance)
                assert!(left_height <= right_height + 1);
                assert!(right_height <= left_height + 1);

                num_nodes += 1;
            });

            // Check number of nodes
            assert_eq!(num_nodes, self.num_nodes);
        }
    }

    fn find(&self, id: u32) -> Link {
        let mut current = self.root;
        while let Some(node_ptr) = current {
            current = unsafe {
                match id.cmp(&node_ptr.as_ref().id) {
                    cmp::Ordering::Equal => break,
                    cmp::Ordering::Less => node_ptr.as_ref().left,
                    cmp::Ordering::Greater => node_ptr.as_ref().right,
                }
            }
        }
        current
    }

    fn find_insert_pos(&mut self, id: u32) -> Option<(Link, LinkPtr)> {
        let mut parent: Link = None;
        let mut link_ptr: LinkPtr = unsafe { LinkPtr::new_unchecked(&mut self.root) };
        unsafe {
            while let Some(mut node_ptr) = link_ptr.as_ref() {
                if id == node_ptr.as_ref().id {
                    return None;
                } else {
                    parent = *link_ptr.as_ref();
                    if id < node_ptr.as_ref().id {
                        link_ptr = LinkPtr::new_unchecked(&mut node_ptr.as_mut().left);
                    } else {
                        link_ptr = LinkPtr::new_unchecked(&mut node_ptr.as_mut().right);
                    }
                }
            }
        }
        Some((parent, link_ptr))
    }

    fn unlink_node(&mut self, node_ptr: NodePtr) {
        unsafe {
            // Check if node to-unlink has a right subtree
            if let Some(mut successor_ptr) = node_ptr.as_ref().right {
                // The in-order successor is the leftmost node of the right subtree
                let mut successor_parent_ptr = node_ptr;
                while let Some(left_ptr) = successor_ptr.as_ref().left {
                    successor_parent_ptr = successor_ptr;
                    successor_ptr = left_ptr;
                }

                // Successor is stem or leaf, unlink from tree
                debug_assert!(successor_ptr.as_ref().left.is_none());
                if successor_parent_ptr.as_ref().left == Some(successor_ptr) {
                    successor_parent_ptr.as_mut().left = successor_ptr.as_ref().right;
                } else {
                    successor_parent_ptr.as_mut().right = successor_ptr.as_ref().right;
                }
                if let Some(mut right_ptr) = successor_ptr.as_ref().right {
                    right_ptr.as_mut().parent = successor_ptr.as_ref().parent;
                }

                // Replace node to-unlink by its successor (up to 6 links)
                successor_ptr.as_mut().left = node_ptr.as_ref().left;
                if let Some(mut left_ptr) = node_ptr.as_ref().left {
                    left_ptr.as_mut().parent = Some(successor_ptr);
                }

                successor_ptr.as_mut().right = node_ptr.as_ref().right;
                if let Some(mut right_ptr) = node_ptr.as_ref().right {
                    right_ptr.as_mut().parent = Some(successor_ptr);
                }

                successor_ptr.as_mut().parent = node_ptr.as_ref().parent;
                match node_ptr.as_ref().parent {
                    None => self.root = Some(successor_ptr),
                    Some(mut parent_ptr) => {
                        if parent_ptr.as_ref().left == Some(node_ptr) {
                            parent_ptr.as_mut().left = Some(successor_ptr);
                        } else {
                            parent_ptr.as_mut().right = Some(successor_ptr);
                        }
                    }
                }

                // Parent of successor might be out of balance now
                let mut rebalance_from = successor_parent_ptr;
                if rebalance_from == node_ptr {
                    // Parent is node to-unlink and has been replaced by the successor
                    rebalance_from = successor_ptr;
                }
                self.rebalance(Some(rebalance_from));
            } else {
                // Node to-unlink is stem or leaf, unlink from tree.
                debug_assert!(node_ptr.as_ref().right.is_none());
                if let Some(mut left_ptr) = node_ptr.as_ref().left {
                    left_ptr.as_mut().parent = node_ptr.as_ref().parent;
                }
                match node_ptr.as_ref().parent {
                    None => self.root = node_ptr.as_ref().left,
                    Some(mut parent_ptr) => {
                        if parent_ptr.as_ref().left == Some(node_ptr) {
                            parent_ptr.as_mut().left = node_ptr.as_ref().left;
                        } else {
                            parent_ptr.as_mut().right = node_ptr.as_ref().left
                        }
                        // Parent node might be out of balance now
                        self.rebalance(Some(parent_ptr));
                    }
                }
            }
        }
    }

    fn left_height(node_ptr: NodePtr) -> usize {
        unsafe {
            match node_ptr.as_ref().left {
                None => 0,
                Some(left_ptr) => left_ptr.as_ref().height + 1,
            }
        }
    }

    fn right_height(node_ptr: NodePtr) -> usize {
        unsafe {
            match node_ptr.as_ref().right {
                None => 0,
                Some(right_ptr) => right_ptr.as_ref().height + 1,
            }
        }
    }

    fn adjust_height(mut node_ptr: NodePtr) {
        unsafe {
            node_ptr.as_mut().height = cmp::max(
                match node_ptr.as_ref().left {
                    None => 0,
                    Some(left_ptr) => left_ptr.as_ref().height + 1,
                },
                match node_ptr.as_ref().right {
                    None => 0,
                    Some(right_ptr) => right_ptr.as_ref().height + 1,
                },
            );
        }
    }

    fn rotate_left(&mut self, mut node_ptr: NodePtr) {
        unsafe {
            if let Some(mut right_ptr) = node_ptr.as_ref().right {
                node_ptr.as_mut().right = right_ptr.as_ref().left;
                if let Some(mut right_left_ptr) = right_ptr.as_mut().left {
                    right_left_ptr.as_mut().parent = Some(node_ptr);
                }

                right_ptr.as_mut().parent = node_ptr.as_ref().parent;
                match node_ptr.as_ref().parent {
                    None => self.root = Some(right_ptr),
                    Some(mut parent_ptr) => {
                        if parent_ptr.as_ref().left == Some(node_ptr) {
                            parent_ptr.as_mut().left = Some(right_ptr);
                        } else {
                            parent_ptr.as_mut().right = Some(right_ptr);
                        }
                    }
                }

                right_ptr.as_mut().left = Some(node_ptr);
                node_ptr.as_mut().parent = Some(right_ptr);

                Self::adjust_height(node_ptr);
                Self::adjust_height(right_ptr);
            }
        }
    }

    fn rotate_right(&mut self, mut node_ptr: NodePtr) {
        unsafe {
            if let Some(mut left_ptr) = node_ptr.as_ref().left {
                node_ptr.as_mut().left = left_ptr.as_ref().right;
                if let Some(mut right_ptr) = left_ptr.as_ref().right {
                    right_ptr.as_mut().parent = Some(node_ptr);
                }

                left_ptr.as_mut().parent = node_ptr.as_ref().parent;
                match node_ptr.as_ref().parent {
                    None => self.root = Some(left_ptr),
                    Some(mut parent_ptr) => {
                        if parent_ptr.as_ref().left == Some(node_ptr) {
                            parent_ptr.as_mut().left = Some(left_ptr);
                        } else {
                            parent_ptr.as_mut().right = Some(left_ptr);
                        }
                    }
                }

                left_ptr.as_mut().right = Some(node_ptr);
                node_ptr.as_mut().parent = Some(left_ptr);

                Self::adjust_height(node_ptr);
                Self::adjust_height(left_ptr);
            }
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    fn rebalance(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let parent = unsafe { node_ptr.as_ref().parent };
            self.rebalance_node(node_ptr);
            current = parent;
        }
    }

    /// Rebalances nodes starting from given position up to the root node.
    /// Stops after first rebalance operation.
    /// This is enough to restore balance after a single insert operation.
    fn rebalance_once(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(node_ptr) = current {
            let parent = unsafe { node_ptr.as_ref().parent };
            let did_rebalance = self.rebalance_node(node_ptr);
            if did_rebalance {
                break;
            }
            current = parent;
        }
    }

    /// Restores the AVL condition at the given node if necessary and adjusts
    /// its cached height. A left-left imbalance takes a single right rotation
    /// and right-right a single left rotation, while the mixed left-right and
    /// right-left cases rotate the heavier child into shape first.
    /// Initial imbalance must not exceed two levels, which always holds after
    /// a single update. Returns whether rebalancing had been necessary.
    fn rebalance_node(&mut self, node_ptr: NodePtr) -> bool {
        unsafe {
            let left_height = Self::left_height(node_ptr);
            let right_height = Self::right_height(node_ptr);
            debug_assert!(left_height <= right_height + 2);
            debug_assert!(right_height <= left_height + 2);
            if left_height > right_height + 1 {
                // Rebalance right
                let left_ptr = node_ptr.as_ref().left.unwrap();
                if Self::right_height(left_ptr) > Self::left_height(left_ptr) {
                    self.rotate_left(left_ptr);
                }
                self.rotate_right(node_ptr);
                true
            } else if right_height > left_height + 1 {
                // Rebalance left
                let right_ptr = node_ptr.as_ref().right.unwrap();
                if Self::left_height(right_ptr) > Self::right_height(right_ptr) {
                    self.rotate_right(right_ptr);
                }
                self.rotate_left(node_ptr);
                true
            } else {
                Self::adjust_height(node_ptr);
                false
            }
        }
    }

    #[cfg(any(test, feature = "consistency_check"))]
    fn preorder<F: FnMut(NodePtr)>(&self, f: F) {
        self.traverse(f, |_| {}, |_| {});
    }

    fn postorder<F: FnMut(NodePtr)>(&self, f: F) {
        self.traverse(|_| {}, |_| {}, f);
    }

    fn traverse<Pre, In, Post>(&self, mut preorder: Pre, mut inorder: In, mut postorder: Post)
    where
        Pre: FnMut(NodePtr),
        In: FnMut(NodePtr),
        Post: FnMut(NodePtr),
    {
        if let Some(mut node_ptr) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node_ptr);
                        if let Some(left_ptr) = unsafe { node_ptr.as_ref().left } {
                            node_ptr = left_ptr;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        inorder(node_ptr);
                        if let Some(right_ptr) = unsafe { node_ptr.as_ref().right } {
                            node_ptr = right_ptr;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        // Post order traversal is used for node deletion,
                        // so make sure not to use node pointer after postorder call.
                        if let Some(parent_ptr) = unsafe { node_ptr.as_ref().parent } {
                            if Some(node_ptr) == unsafe { parent_ptr.as_ref().left } {
                                dir = Direction::FromLeft;
                            } else {
                                dir = Direction::FromRight;
                            }
                            postorder(node_ptr);
                            node_ptr = parent_ptr;
                        } else {
                            postorder(node_ptr);
                            break;
                        }
                    }
                }
            }
        }
    }
}

impl Drop for AvlTree {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Default for AvlTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AvlTree {
    fn clone(&self) -> Self {
        let mut tree = AvlTree::new();
        self.traverse(
            |node_ptr| {
                let node = unsafe { &*node_ptr.as_ptr() };
                tree.insert(&node.name, node.id);
            },
            |_| {},
            |_| {},
        );
        tree
    }
}

impl Node {
    fn create(parent: Link, id: u32, name: String) -> NodePtr {
        let boxed = Box::new(Node {
            id,
            name,
            parent,
            left: None,
            right: None,
            height: 0,
        });
        unsafe { NodePtr::new_unchecked(Box::into_raw(boxed)) }
    }

    unsafe fn destroy(node_ptr: NodePtr) {
        drop(Box::from_raw(node_ptr.as_ptr()));
    }
}
