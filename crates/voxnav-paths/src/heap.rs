//! Indexed binary min-heap over arena nodes, keyed by `f`.
//!
//! Unlike `std::collections::BinaryHeap`, every node records its own slot
//! (`Node::heap_idx`), which makes arbitrary removal and key changes
//! O(log n) without stale entries.

use crate::error::HeapError;
use crate::node::{NodeArena, NodeId};

/// The open set of a search.
///
/// The heap stores [`NodeId`]s; keys and slot indices live on the nodes, so
/// every operation takes the arena the ids belong to. Ordering is strict `<`
/// on `f`; ties come out in no particular order.
#[derive(Debug, Default, Clone)]
pub struct NodeHeap {
    heap: Vec<NodeId>,
}

impl NodeHeap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Add a node, keyed by its current `f`.
    pub fn insert(&mut self, nodes: &mut NodeArena, id: NodeId) -> Result<(), HeapError> {
        if nodes[id].in_open_set() {
            return Err(HeapError::AlreadyOpen(nodes[id].pos));
        }
        self.heap.push(id);
        self.up_heap(nodes, self.heap.len() - 1);
        Ok(())
    }

    /// The node with the smallest `f`, without removing it.
    #[inline]
    pub fn peek(&self) -> Option<NodeId> {
        self.heap.first().copied()
    }

    /// Remove and return the node with the smallest `f`.
    pub fn pop(&mut self, nodes: &mut NodeArena) -> Option<NodeId> {
        let last = self.heap.pop()?;
        let top = if self.heap.is_empty() {
            last
        } else {
            let top = std::mem::replace(&mut self.heap[0], last);
            self.down_heap(nodes, 0);
            top
        };
        nodes[top].heap_idx = None;
        Some(top)
    }

    /// Remove an arbitrary open node.
    pub fn remove(&mut self, nodes: &mut NodeArena, id: NodeId) -> Result<(), HeapError> {
        let idx = nodes[id].heap_idx.ok_or(HeapError::NotOpen(nodes[id].pos))?;
        let Some(last) = self.heap.pop() else {
            return Err(HeapError::NotOpen(nodes[id].pos));
        };
        if idx < self.heap.len() {
            self.heap[idx] = last;
            if nodes[last].f < nodes[id].f {
                self.up_heap(nodes, idx);
            } else {
                self.down_heap(nodes, idx);
            }
        }
        nodes[id].heap_idx = None;
        Ok(())
    }

    /// Set a new `f` on an open node and restore the heap order.
    pub fn change_cost(
        &mut self,
        nodes: &mut NodeArena,
        id: NodeId,
        new_f: f64,
    ) -> Result<(), HeapError> {
        let idx = nodes[id].heap_idx.ok_or(HeapError::NotOpen(nodes[id].pos))?;
        let old_f = nodes[id].f;
        nodes[id].f = new_f;
        if new_f < old_f {
            self.up_heap(nodes, idx);
        } else {
            self.down_heap(nodes, idx);
        }
        Ok(())
    }

    /// Empty the heap, marking every node it held as not open.
    pub fn clear(&mut self, nodes: &mut NodeArena) {
        for id in self.heap.drain(..) {
            nodes[id].heap_idx = None;
        }
    }

    /// Forget the contents without touching any nodes. Only valid when the
    /// arena the ids belong to is being discarded.
    pub(crate) fn reset(&mut self) {
        self.heap.clear();
    }

    // -----------------------------------------------------------------------
    // Sifting
    // -----------------------------------------------------------------------

    fn up_heap(&mut self, nodes: &mut NodeArena, mut index: usize) {
        let id = self.heap[index];
        let cost = nodes[id].f;
        while index > 0 {
            let parent_idx = (index - 1) >> 1;
            let parent = self.heap[parent_idx];
            if !(cost < nodes[parent].f) {
                break;
            }
            self.heap[index] = parent;
            nodes[parent].heap_idx = Some(index);
            index = parent_idx;
        }
        self.heap[index] = id;
        nodes[id].heap_idx = Some(index);
    }

    fn down_heap(&mut self, nodes: &mut NodeArena, mut index: usize) {
        let id = self.heap[index];
        let cost = nodes[id].f;
        let size = self.heap.len();
        loop {
            let left = (index << 1) + 1;
            let right = left + 1;
            if left >= size {
                break;
            }
            let mut min_child = left;
            if right < size && nodes[self.heap[right]].f < nodes[self.heap[left]].f {
                min_child = right;
            }
            let child = self.heap[min_child];
            if nodes[child].f >= cost {
                break;
            }
            self.heap[index] = child;
            nodes[child].heap_idx = Some(index);
            index = min_child;
        }
        self.heap[index] = id;
        nodes[id].heap_idx = Some(index);
    }

    #[cfg(test)]
    fn check_invariants(&self, nodes: &NodeArena) {
        for (slot, &id) in self.heap.iter().enumerate() {
            assert_eq!(nodes[id].heap_idx, Some(slot), "slot index out of sync");
            if slot > 0 {
                let parent = self.heap[(slot - 1) >> 1];
                assert!(nodes[parent].f <= nodes[id].f, "heap order violated");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use voxnav_core::BlockPos;

    fn arena_with(costs: &[f64]) -> (NodeArena, Vec<NodeId>) {
        let mut arena = NodeArena::new();
        let ids = costs
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let id = arena.node_at(BlockPos::new(i as i32, 0, 0));
                arena[id].f = f;
                id
            })
            .collect();
        (arena, ids)
    }

    #[test]
    fn pop_in_cost_order() {
        let (mut arena, ids) = arena_with(&[5.0, 1.0, 4.0, 2.0, 3.0]);
        let mut heap = NodeHeap::new();
        for &id in &ids {
            heap.insert(&mut arena, id).unwrap();
        }
        assert_eq!(heap.peek(), Some(ids[1]));
        let mut out = Vec::new();
        while let Some(id) = heap.pop(&mut arena) {
            assert!(!arena[id].in_open_set());
            out.push(arena[id].f);
        }
        assert_eq!(out, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(heap.pop(&mut arena), None);
        assert_eq!(heap.peek(), None);
    }

    #[test]
    fn insert_twice_is_an_error() {
        let (mut arena, ids) = arena_with(&[1.0]);
        let mut heap = NodeHeap::new();
        heap.insert(&mut arena, ids[0]).unwrap();
        assert_eq!(
            heap.insert(&mut arena, ids[0]),
            Err(HeapError::AlreadyOpen(BlockPos::ZERO))
        );
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn remove_and_change_cost_require_open_node() {
        let (mut arena, ids) = arena_with(&[1.0]);
        let mut heap = NodeHeap::new();
        assert_eq!(
            heap.remove(&mut arena, ids[0]),
            Err(HeapError::NotOpen(BlockPos::ZERO))
        );
        assert!(heap.change_cost(&mut arena, ids[0], 0.5).is_err());
    }

    #[test]
    fn change_cost_reorders() {
        let (mut arena, ids) = arena_with(&[1.0, 2.0, 3.0]);
        let mut heap = NodeHeap::new();
        for &id in &ids {
            heap.insert(&mut arena, id).unwrap();
        }
        heap.change_cost(&mut arena, ids[2], 0.5).unwrap();
        assert_eq!(heap.peek(), Some(ids[2]));
        heap.change_cost(&mut arena, ids[2], 10.0).unwrap();
        assert_eq!(heap.peek(), Some(ids[0]));
        heap.check_invariants(&arena);
    }

    #[test]
    fn remove_middle_and_last() {
        let (mut arena, ids) = arena_with(&[1.0, 2.0, 3.0, 4.0]);
        let mut heap = NodeHeap::new();
        for &id in &ids {
            heap.insert(&mut arena, id).unwrap();
        }
        heap.remove(&mut arena, ids[1]).unwrap();
        heap.check_invariants(&arena);
        heap.remove(&mut arena, ids[3]).unwrap();
        heap.check_invariants(&arena);
        assert!(!arena[ids[1]].in_open_set());
        assert_eq!(heap.len(), 2);
        assert_eq!(heap.pop(&mut arena), Some(ids[0]));
        assert_eq!(heap.pop(&mut arena), Some(ids[2]));
    }

    #[test]
    fn clear_marks_nodes_closed_to_heap() {
        let (mut arena, ids) = arena_with(&[1.0, 2.0]);
        let mut heap = NodeHeap::new();
        for &id in &ids {
            heap.insert(&mut arena, id).unwrap();
        }
        heap.clear(&mut arena);
        assert!(heap.is_empty());
        assert!(ids.iter().all(|&id| !arena[id].in_open_set()));
    }

    // ── Property tests ──────────────────────────────────────────

    #[derive(Debug, Clone)]
    enum Op {
        Insert(usize, f64),
        Remove(usize),
        ChangeCost(usize, f64),
        Pop,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0usize..16, 0.0f64..100.0).prop_map(|(i, f)| Op::Insert(i, f)),
            (0usize..16).prop_map(Op::Remove),
            (0usize..16, 0.0f64..100.0).prop_map(|(i, f)| Op::ChangeCost(i, f)),
            Just(Op::Pop),
        ]
    }

    proptest! {
        #[test]
        fn heap_matches_model(ops in prop::collection::vec(arb_op(), 0..200)) {
            let (mut arena, ids) = arena_with(&[0.0; 16]);
            let mut heap = NodeHeap::new();
            let mut open: Vec<Option<f64>> = vec![None; 16];

            for op in ops {
                match op {
                    Op::Insert(i, f) => {
                        if open[i].is_some() {
                            prop_assert!(heap.insert(&mut arena, ids[i]).is_err());
                        } else {
                            arena[ids[i]].f = f;
                            heap.insert(&mut arena, ids[i]).unwrap();
                            open[i] = Some(f);
                        }
                    }
                    Op::Remove(i) => {
                        let res = heap.remove(&mut arena, ids[i]);
                        prop_assert_eq!(res.is_ok(), open[i].is_some());
                        open[i] = None;
                    }
                    Op::ChangeCost(i, f) => {
                        let res = heap.change_cost(&mut arena, ids[i], f);
                        prop_assert_eq!(res.is_ok(), open[i].is_some());
                        if open[i].is_some() {
                            open[i] = Some(f);
                        }
                    }
                    Op::Pop => {
                        let min = open.iter().flatten().copied().reduce(f64::min);
                        match heap.pop(&mut arena) {
                            Some(id) => {
                                prop_assert_eq!(Some(arena[id].f), min);
                                open[id.index()] = None;
                            }
                            None => prop_assert!(min.is_none()),
                        }
                    }
                }
                heap.check_invariants(&arena);
                prop_assert_eq!(heap.len(), open.iter().flatten().count());
                for (i, &id) in ids.iter().enumerate() {
                    prop_assert_eq!(arena[id].in_open_set(), open[i].is_some());
                }
            }
        }
    }
}
