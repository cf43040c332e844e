//! Doubly linked list threaded through a [`NodeArena`].
//!
//! A [`List`] is two sentinel ids plus a length. The nodes themselves, including
//! the sentinels, live in the arena that is passed to every operation, so
//! several lists can share one arena (the LFU cache keeps one list per
//! frequency) and a node can be moved between lists without reallocating.
//!
//! ```text
//!   head ──► [a] ◄──► [b] ◄──► [c] ◄── tail
//!   front                        back
//! ```
//!
//! The sentinels mean linking and unlinking never branch on an empty list or on
//! the node being first or last. A list is empty exactly when the head's
//! successor is the tail.

use crate::arena::{NodeArena, NodeId};

/// A sentinel-bounded doubly linked list of arena nodes.
///
/// This list does not own its nodes. Dropping a `List` without calling
/// [`List::release`] leaks its two sentinel slots in the arena until the arena
/// is cleared.
#[derive(Debug)]
pub(crate) struct List {
    head: NodeId,
    tail: NodeId,
    len: usize,
}

impl List {
    /// Allocates the two sentinels in `arena` and links them together.
    pub(crate) fn new<T>(arena: &mut NodeArena<T>) -> Self {
        let head = arena.insert_sentinel();
        let tail = arena.insert_sentinel();
        arena.set_next(head, Some(tail));
        arena.set_prev(tail, Some(head));
        List { head, tail, len: 0 }
    }

    /// Returns the number of data nodes in the list.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` when the head sentinel's successor is the tail sentinel.
    #[inline]
    pub(crate) fn is_empty<T>(&self, arena: &NodeArena<T>) -> bool {
        let empty = arena.next(self.head) == Some(self.tail);
        debug_assert_eq!(empty, self.len == 0, "list length out of sync with links");
        empty
    }

    /// Returns the node right after the head sentinel (the oldest node).
    #[inline]
    pub(crate) fn front<T>(&self, arena: &NodeArena<T>) -> Option<NodeId> {
        arena.next(self.head).filter(|&id| id != self.tail)
    }

    /// Links a detached node in front of the tail sentinel.
    pub(crate) fn push_back<T>(&mut self, arena: &mut NodeArena<T>, id: NodeId) {
        debug_assert!(!arena.is_linked(id), "node pushed while still linked");
        let Some(last) = arena.prev(self.tail) else {
            debug_assert!(false, "tail sentinel lost its predecessor");
            return;
        };
        arena.set_prev(id, Some(last));
        arena.set_next(id, Some(self.tail));
        arena.set_next(last, Some(id));
        arena.set_prev(self.tail, Some(id));
        self.len += 1;
    }

    /// Unlinks `id` from this list and clears both of its links.
    ///
    /// Returns `false` if the node was not linked.
    pub(crate) fn detach<T>(&mut self, arena: &mut NodeArena<T>, id: NodeId) -> bool {
        debug_assert!(id != self.head && id != self.tail, "cannot detach a sentinel");
        let (Some(prev), Some(next)) = (arena.prev(id), arena.next(id)) else {
            return false;
        };
        arena.set_next(prev, Some(next));
        arena.set_prev(next, Some(prev));
        arena.set_prev(id, None);
        arena.set_next(id, None);
        self.len -= 1;
        true
    }

    /// Moves a node already in this list to the back.
    pub(crate) fn move_to_back<T>(&mut self, arena: &mut NodeArena<T>, id: NodeId) {
        if arena.next(id) == Some(self.tail) {
            return;
        }
        if self.detach(arena, id) {
            self.push_back(arena, id);
        }
    }

    /// Frees both sentinels. The list must be empty.
    pub(crate) fn release<T>(self, arena: &mut NodeArena<T>) {
        debug_assert!(self.is_empty(arena), "released a non-empty list");
        arena.set_next(self.head, None);
        arena.set_prev(self.tail, None);
        arena.remove(self.head);
        arena.remove(self.tail);
    }

    /// Iterates node ids from front to back.
    #[cfg(test)]
    pub(crate) fn iter<'a, T>(&self, arena: &'a NodeArena<T>) -> Iter<'a, T> {
        Iter {
            arena,
            current: arena.next(self.head),
            tail: self.tail,
        }
    }

    /// Walks the list and checks every link pair, returning the visited ids.
    pub(crate) fn debug_validate<T>(&self, arena: &NodeArena<T>) -> Vec<NodeId> {
        assert_eq!(arena.prev(self.head), None, "head sentinel has a predecessor");
        assert_eq!(arena.next(self.tail), None, "tail sentinel has a successor");

        let mut ids = Vec::with_capacity(self.len);
        let mut prev = self.head;
        let mut current = arena.next(self.head);
        while let Some(id) = current {
            assert_eq!(arena.prev(id), Some(prev), "broken back link");
            if id == self.tail {
                break;
            }
            assert!(arena.get(id).is_some(), "data node without a value");
            ids.push(id);
            assert!(ids.len() <= self.len, "list longer than its length");
            prev = id;
            current = arena.next(id);
        }
        assert_eq!(current, Some(self.tail), "list does not end at the tail");
        assert_eq!(ids.len(), self.len);
        ids
    }
}

/// Front-to-back iterator over a [`List`]'s node ids.
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct Iter<'a, T> {
    arena: &'a NodeArena<T>,
    current: Option<NodeId>,
    tail: NodeId,
}

#[cfg(test)]
impl<T> Iterator for Iter<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current.filter(|&id| id != self.tail)?;
        self.current = self.arena.next(id);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(list: &List, arena: &NodeArena<u32>) -> Vec<u32> {
        list.iter(arena)
            .map(|id| *arena.get(id).unwrap())
            .collect()
    }

    #[test]
    fn test_new_list_is_empty() {
        let mut arena = NodeArena::<u32>::with_capacity(4);
        let list = List::new(&mut arena);
        assert!(list.is_empty(&arena));
        assert_eq!(list.len(), 0);
        assert_eq!(list.front(&arena), None);
        assert!(list.debug_validate(&arena).is_empty());
    }

    #[test]
    fn test_push_back_keeps_insertion_order() {
        let mut arena = NodeArena::with_capacity(4);
        let mut list = List::new(&mut arena);
        for v in [10, 20, 30] {
            let id = arena.insert(v);
            list.push_back(&mut arena, id);
        }
        assert_eq!(list.len(), 3);
        assert!(!list.is_empty(&arena));
        assert_eq!(values(&list, &arena), vec![10, 20, 30]);
        assert_eq!(arena.get(list.front(&arena).unwrap()), Some(&10));
        list.debug_validate(&arena);
    }

    #[test]
    fn test_detach_clears_links() {
        let mut arena = NodeArena::with_capacity(4);
        let mut list = List::new(&mut arena);
        let a = arena.insert(1);
        let b = arena.insert(2);
        let c = arena.insert(3);
        for id in [a, b, c] {
            list.push_back(&mut arena, id);
        }

        assert!(list.detach(&mut arena, b));
        assert!(!arena.is_linked(b));
        assert_eq!(list.len(), 2);
        assert_eq!(values(&list, &arena), vec![1, 3]);

        // Already detached.
        assert!(!list.detach(&mut arena, b));
        assert_eq!(list.len(), 2);
        list.debug_validate(&arena);
    }

    #[test]
    fn test_detach_last_node_empties_list() {
        let mut arena = NodeArena::with_capacity(2);
        let mut list = List::new(&mut arena);
        let a = arena.insert(1);
        list.push_back(&mut arena, a);
        list.detach(&mut arena, a);
        assert!(list.is_empty(&arena));
        assert_eq!(list.front(&arena), None);
    }

    #[test]
    fn test_move_to_back() {
        let mut arena = NodeArena::with_capacity(4);
        let mut list = List::new(&mut arena);
        let a = arena.insert(1);
        let b = arena.insert(2);
        let c = arena.insert(3);
        for id in [a, b, c] {
            list.push_back(&mut arena, id);
        }

        list.move_to_back(&mut arena, a);
        assert_eq!(values(&list, &arena), vec![2, 3, 1]);

        // Already last: no-op.
        list.move_to_back(&mut arena, a);
        assert_eq!(values(&list, &arena), vec![2, 3, 1]);
        assert_eq!(list.len(), 3);
        list.debug_validate(&arena);
    }

    #[test]
    fn test_node_moves_between_lists_sharing_an_arena() {
        let mut arena = NodeArena::with_capacity(4);
        let mut first = List::new(&mut arena);
        let mut second = List::new(&mut arena);
        let a = arena.insert(7);
        first.push_back(&mut arena, a);

        first.detach(&mut arena, a);
        second.push_back(&mut arena, a);

        assert!(first.is_empty(&arena));
        assert_eq!(values(&second, &arena), vec![7]);
        first.debug_validate(&arena);
        second.debug_validate(&arena);
    }

    #[test]
    fn test_release_frees_sentinels() {
        let mut arena = NodeArena::<u32>::with_capacity(2);
        let list = List::new(&mut arena);
        list.release(&mut arena);

        // Both sentinel slots are reused by the next list.
        let again = List::new(&mut arena);
        assert!(again.is_empty(&arena));
        assert_eq!(arena.len(), 0);
    }
}
