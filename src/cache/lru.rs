//! LRU List Module
//!
//! Recency ordering for cache eviction, stored as an arena-backed doubly
//! linked list.
//!
//! Nodes live in a `Vec` of slots and refer to each other through [`NodeId`]
//! handles instead of pointers. Freed slots are recycled through a free list,
//! so a handle stays valid until its node is removed.

use super::CacheEntry;

// == Node Handle ==
/// Stable handle to a node in an [`LruList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node<V> {
    entry: CacheEntry<V>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

// == LRU List ==
/// Doubly linked list of cache entries ordered by recency.
///
/// - Head = most recently used
/// - Tail = least recently used
#[derive(Debug)]
pub struct LruList<V> {
    /// Node storage; `None` marks a free slot
    slots: Vec<Option<Node<V>>>,
    /// Indices of free slots available for reuse
    free: Vec<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<V> LruList<V> {
    // == Constructor ==
    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    // == Push Front ==
    /// Inserts an entry at the head and returns its handle.
    pub fn push_front(&mut self, entry: CacheEntry<V>) -> NodeId {
        let node = Node {
            entry,
            prev: None,
            next: None,
        };
        let id = match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(node);
                NodeId(index)
            }
            None => {
                self.slots.push(Some(node));
                NodeId(self.slots.len() - 1)
            }
        };
        self.link_front(id);
        self.len += 1;
        id
    }

    // == Move To Front ==
    /// Marks a node as most recently used.
    pub fn move_to_front(&mut self, id: NodeId) {
        if self.head == Some(id) || self.node(id).is_none() {
            return;
        }
        self.unlink(id);
        self.link_front(id);
    }

    // == Remove ==
    /// Unlinks a node and returns its entry.
    pub fn remove(&mut self, id: NodeId) -> Option<CacheEntry<V>> {
        self.node(id)?;
        self.unlink(id);
        let node = self.slots[id.0].take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node.entry)
    }

    // == Pop Back ==
    /// Removes and returns the least recently used entry.
    pub fn pop_back(&mut self) -> Option<CacheEntry<V>> {
        let tail = self.tail?;
        self.remove(tail)
    }

    /// Handle of the least recently used node.
    pub fn back(&self) -> Option<NodeId> {
        self.tail
    }

    /// Borrows the entry behind a handle.
    pub fn get(&self, id: NodeId) -> Option<&CacheEntry<V>> {
        self.node(id).map(|node| &node.entry)
    }

    /// Mutably borrows the entry behind a handle.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CacheEntry<V>> {
        self.slots
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.entry)
    }

    /// Iterates entries from most to least recently used.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            list: self,
            cursor: self.head,
        }
    }

    // == Length ==
    /// Returns the number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn node(&self, id: NodeId) -> Option<&Node<V>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<V>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    fn set_next(&mut self, id: Option<NodeId>, next: Option<NodeId>) {
        match id.and_then(|id| self.node_mut(id)) {
            Some(node) => node.next = next,
            None => self.head = next,
        }
    }

    fn set_prev(&mut self, id: Option<NodeId>, prev: Option<NodeId>) {
        match id.and_then(|id| self.node_mut(id)) {
            Some(node) => node.prev = prev,
            None => self.tail = prev,
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let Some((prev, next)) = self.node(id).map(|node| (node.prev, node.next)) else {
            return;
        };
        self.set_next(prev, next);
        self.set_prev(next, prev);
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = None;
        }
    }

    fn link_front(&mut self, id: NodeId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        self.set_prev(old_head, Some(id));
        self.head = Some(id);
    }
}

// == Iterator ==
/// Head-to-tail iterator over an [`LruList`].
pub struct Iter<'a, V> {
    list: &'a LruList<V>,
    cursor: Option<NodeId>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a CacheEntry<V>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.list.node(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.entry)
    }
}
