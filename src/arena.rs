//! Node storage for the cache lists.
//!
//! Every node the caches link together lives in one [`NodeArena`], addressed by
//! a [`NodeId`]. Lists never own nodes; they only record ids. Removing a node
//! returns its slot to a free list so the arena stops growing once the cache has
//! reached capacity.
//!
//! ```text
//!   slots: Vec<Option<Node<T>>>
//!   ┌────┬──────────────────────────────────────────┐
//!   │ id │ Node { value, prev, next }               │
//!   ├────┼──────────────────────────────────────────┤
//!   │ 0  │ { None,    prev: None,    next: Some(2) }│  head sentinel
//!   │ 1  │ { None,    prev: Some(2), next: None    }│  tail sentinel
//!   │ 2  │ { Some(A), prev: Some(0), next: Some(1) }│
//!   │ 3  │ (vacant, on the free list)               │
//!   └────┴──────────────────────────────────────────┘
//! ```
//!
//! Sentinel nodes carry no value. A data node that is not a member of any list
//! has both links cleared.

/// Most slots reserved up front; larger caches grow on demand.
pub(crate) const PREALLOCATION_LIMIT: usize = 1 << 16;

/// Stable handle to a node stored in a [`NodeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

impl NodeId {
    #[cfg(test)]
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node<T> {
    value: Option<T>,
    prev: Option<NodeId>,
    next: Option<NodeId>,
}

/// Growable table of list nodes with slot reuse.
#[derive(Debug)]
pub(crate) struct NodeArena<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    /// Number of data (non-sentinel) nodes.
    len: usize,
}

impl<T> NodeArena<T> {
    /// Reserves room for `capacity` nodes, up to [`PREALLOCATION_LIMIT`].
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(PREALLOCATION_LIMIT)),
            free: Vec::new(),
            len: 0,
        }
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        if let Some(index) = self.free.pop() {
            self.slots[index] = Some(node);
            NodeId(index)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Stores `value` in a fresh, unlinked node.
    pub(crate) fn insert(&mut self, value: T) -> NodeId {
        self.len += 1;
        self.alloc(Node {
            value: Some(value),
            prev: None,
            next: None,
        })
    }

    /// Allocates a value-less boundary node.
    pub(crate) fn insert_sentinel(&mut self) -> NodeId {
        self.alloc(Node {
            value: None,
            prev: None,
            next: None,
        })
    }

    /// Frees the slot behind `id` and returns its value.
    ///
    /// Returns `None` for sentinels and for ids that are already free. The node
    /// must have been detached from its list first.
    pub(crate) fn remove(&mut self, id: NodeId) -> Option<T> {
        let node = self.slots.get_mut(id.0)?.take()?;
        debug_assert!(
            node.prev.is_none() && node.next.is_none(),
            "node {} freed while still linked",
            id.0
        );
        self.free.push(id.0);
        if node.value.is_some() {
            self.len -= 1;
        }
        node.value
    }

    #[inline]
    fn node(&self, id: NodeId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> Option<&T> {
        self.node(id).and_then(|node| node.value.as_ref())
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.node_mut(id).and_then(|node| node.value.as_mut())
    }

    #[inline]
    pub(crate) fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.prev)
    }

    #[inline]
    pub(crate) fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.next)
    }

    #[inline]
    pub(crate) fn set_prev(&mut self, id: NodeId, prev: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.prev = prev;
        }
    }

    #[inline]
    pub(crate) fn set_next(&mut self, id: NodeId, next: Option<NodeId>) {
        if let Some(node) = self.node_mut(id) {
            node.next = next;
        }
    }

    /// Returns `true` if `id` currently has either link set.
    pub(crate) fn is_linked(&self, id: NodeId) -> bool {
        self.node(id)
            .map(|node| node.prev.is_some() || node.next.is_some())
            .unwrap_or(false)
    }

    /// Number of data nodes; sentinels are not counted.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.len = 0;
    }
}
