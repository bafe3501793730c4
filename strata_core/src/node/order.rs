// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sibling ordering by local Z-order.
//!
//! Children are kept sorted by the key `(local_z, arrival)`. Since arrival
//! counters are unique, the key is total and the sorted sequence is fully
//! determined by the keys: re-sorting an already sorted vector changes
//! nothing, and all negative-Z children end up before the rest.

use super::id::NodeId;
use super::store::SceneGraph;

impl SceneGraph {
    /// Sorts the children of `id` by `(local_z, arrival)`.
    ///
    /// Clears the node's reorder flag. Calling it again without intervening
    /// mutations leaves the sequence unchanged.
    pub fn sort_all_children(&mut self, id: NodeId) {
        self.validate(id);
        let i = id.idx as usize;
        if !self.reorder_dirty[i] && self.children_sorted(i) {
            return;
        }
        let mut siblings = core::mem::take(&mut self.children[i]);
        siblings.sort_by_key(|&c| (self.local_z[c as usize], self.arrival[c as usize]));
        self.children[i] = siblings;
        self.reorder_dirty[i] = false;
    }

    /// Returns whether the children of `id` are waiting for a sort pass.
    #[must_use]
    pub fn needs_sort(&self, id: NodeId) -> bool {
        self.validate(id);
        self.reorder_dirty[id.idx as usize]
    }

    /// Returns the index of the first child with local Z-order >= 0.
    ///
    /// Only meaningful when the children are sorted.
    pub(crate) fn non_negative_start(&self, i: usize) -> usize {
        self.children[i].partition_point(|&c| self.local_z[c as usize] < 0)
    }

    fn children_sorted(&self, i: usize) -> bool {
        self.children[i].is_sorted_by_key(|&c| (self.local_z[c as usize], self.arrival[c as usize]))
    }
}
