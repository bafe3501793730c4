// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Parent/child mutation and lookup.
//!
//! Every mutation validates its handles and relationships before touching
//! the graph. Lifecycle hooks run synchronously from inside these calls and
//! may themselves mutate the tree, so each step re-checks liveness and
//! parentage instead of trusting indices captured earlier.

use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::SceneGraph;
use super::traverse::Children;
use crate::dirty;
use crate::error::NodeError;

impl SceneGraph {
    /// Inserts `child` under `parent`, keeping the child's current local
    /// Z-order and tag.
    ///
    /// # Errors
    ///
    /// See [`add_child_with`](Self::add_child_with).
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), NodeError> {
        self.check(child)?;
        let i = child.idx as usize;
        let (z, tag) = (self.local_z[i], self.tag[i]);
        self.add_child_with(parent, child, z, tag)
    }

    /// Inserts `child` under `parent` with the given local Z-order and tag.
    ///
    /// The child receives the next arrival counter value and the parent's
    /// children are re-sorted on its next visit. If `parent` is running, the
    /// child's subtree is entered (and, once the parent's transition has
    /// finished, told so) before this returns.
    ///
    /// # Errors
    ///
    /// - [`NodeError::StaleHandle`] if either handle is stale.
    /// - [`NodeError::WouldCreateCycle`] if `child` is `parent` or one of its
    ///   ancestors.
    /// - [`NodeError::AlreadyHasParent`] if `child` is attached elsewhere.
    ///
    /// The graph is unchanged on error.
    pub fn add_child_with(
        &mut self,
        parent: NodeId,
        child: NodeId,
        local_z: i32,
        tag: i32,
    ) -> Result<(), NodeError> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child || self.is_ancestor_of(child, parent) {
            return Err(NodeError::WouldCreateCycle { parent, child });
        }
        let (p, c) = (parent.idx as usize, child.idx as usize);
        if self.parent[c] != INVALID {
            return Err(NodeError::AlreadyHasParent(child));
        }

        self.local_z[c] = local_z;
        self.tag[c] = tag;
        self.arrival[c] = self.next_arrival;
        self.next_arrival += 1;
        self.children[p].push(child.idx);
        self.reorder_dirty[p] = true;
        self.parent[c] = parent.idx;
        // The world transform changes with the new parent.
        self.dirty.mark(child.idx, dirty::TRANSFORM);

        if self.running[p] {
            self.on_enter(child);
            // The enter hooks may have detached or destroyed either node.
            if self.is_alive(child)
                && self.is_alive(parent)
                && self.parent[c] == parent.idx
                && self.transition_finished[p]
            {
                self.on_enter_transition_did_finish(child);
            }
        }
        Ok(())
    }

    /// Detaches `child` from `parent`.
    ///
    /// Returns `Ok(false)` without doing anything if `child` is not a direct
    /// child of `parent`. Otherwise, if `parent` is running the child's
    /// subtree exits first; with `cleanup` its scheduled callbacks, actions
    /// and listeners are also released. The child is then unlinked.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::StaleHandle`] if either handle is stale.
    pub fn remove_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        cleanup: bool,
    ) -> Result<bool, NodeError> {
        self.check(parent)?;
        self.check(child)?;
        if self.parent[child.idx as usize] != parent.idx {
            return Ok(false);
        }
        self.detach(parent, child, cleanup);
        Ok(true)
    }

    /// Detaches `child` from whatever parent it has.
    ///
    /// Returns `Ok(false)` if it had none.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::StaleHandle`] if `child` is stale.
    pub fn remove_from_parent(&mut self, child: NodeId, cleanup: bool) -> Result<bool, NodeError> {
        self.check(child)?;
        match self.parent(child) {
            Some(parent) => self.remove_child(parent, child, cleanup),
            None => Ok(false),
        }
    }

    /// Detaches the first child of `parent` carrying `tag`.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::StaleHandle`] if `parent` is stale.
    pub fn remove_child_by_tag(
        &mut self,
        parent: NodeId,
        tag: i32,
        cleanup: bool,
    ) -> Result<bool, NodeError> {
        self.check(parent)?;
        match self.child_by_tag(parent, tag) {
            Some(child) => self.remove_child(parent, child, cleanup),
            None => Ok(false),
        }
    }

    /// Detaches every child of `parent`.
    ///
    /// Children added by hooks while this runs are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::StaleHandle`] if `parent` is stale.
    pub fn remove_all_children(&mut self, parent: NodeId, cleanup: bool) -> Result<(), NodeError> {
        self.check(parent)?;
        let snapshot: Vec<NodeId> = self.children(parent).collect();
        for child in snapshot {
            if !self.is_alive(parent) {
                break;
            }
            if self.is_alive(child) && self.parent[child.idx as usize] == parent.idx {
                self.detach(parent, child, cleanup);
            }
        }
        Ok(())
    }

    /// Changes the local Z-order of a direct child.
    ///
    /// Marks the parent for re-sorting; the child's arrival order is kept.
    ///
    /// # Errors
    ///
    /// - [`NodeError::StaleHandle`] if either handle is stale.
    /// - [`NodeError::NotAChild`] if `child` is not a direct child of
    ///   `parent`.
    pub fn reorder_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        local_z: i32,
    ) -> Result<(), NodeError> {
        self.check(parent)?;
        self.check(child)?;
        if self.parent[child.idx as usize] != parent.idx {
            return Err(NodeError::NotAChild { parent, child });
        }
        self.local_z[child.idx as usize] = local_z;
        self.reorder_dirty[parent.idx as usize] = true;
        Ok(())
    }

    /// Sets a node's local Z-order, re-sorting its parent if it has one.
    pub fn set_local_z_order(&mut self, id: NodeId, local_z: i32) {
        self.validate(id);
        let i = id.idx as usize;
        if self.local_z[i] == local_z {
            return;
        }
        self.local_z[i] = local_z;
        let p = self.parent[i];
        if p != INVALID {
            self.reorder_dirty[p as usize] = true;
        }
    }

    /// Detaches a node (exiting and cleaning up its subtree) and frees it
    /// together with all of its descendants.
    ///
    /// Behaviors, user data and physics handles of every freed node are
    /// dropped, and all their handles become stale.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::StaleHandle`] if `id` is stale.
    pub fn destroy_node(&mut self, id: NodeId) -> Result<(), NodeError> {
        self.check(id)?;
        if self.parent(id).is_some() {
            self.remove_from_parent(id, true)?;
        } else {
            if self.running[id.idx as usize] {
                self.on_exit_transition_did_start(id);
                if self.is_alive(id) {
                    self.on_exit(id);
                }
            }
            if self.is_alive(id) {
                self.cleanup(id);
            }
        }
        // Hooks may have destroyed the node already.
        if !self.is_alive(id) {
            return Ok(());
        }
        // A hook may also have re-parented it.
        let p = self.parent[id.idx as usize];
        if p != INVALID {
            self.unlink(p, id.idx);
        }

        let mut stack = alloc::vec![id.idx];
        let mut doomed = Vec::new();
        while let Some(idx) = stack.pop() {
            doomed.push(idx);
            stack.extend(self.children[idx as usize].iter().copied());
        }
        for idx in doomed {
            self.free_slot(idx);
        }
        Ok(())
    }

    // -- Lookup --

    /// Returns an iterator over the direct children of a node, in their
    /// current stored order.
    ///
    /// The order reflects local Z-order only after a sort pass.
    #[must_use]
    pub fn children(&self, id: NodeId) -> Children<'_> {
        self.validate(id);
        Children::new(self, &self.children[id.idx as usize])
    }

    /// Returns the number of direct children.
    #[must_use]
    pub fn child_count(&self, id: NodeId) -> usize {
        self.validate(id);
        self.children[id.idx as usize].len()
    }

    /// Returns the node's parent, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns the first direct child carrying `tag`.
    #[must_use]
    pub fn child_by_tag(&self, id: NodeId, tag: i32) -> Option<NodeId> {
        self.children(id).find(|&c| self.tag[c.idx as usize] == tag)
    }

    /// Returns the first direct child called `name`.
    #[must_use]
    pub fn child_by_name(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.children(id).find(|&c| self.name[c.idx as usize] == name)
    }

    /// Returns the topmost ancestor of a node (the node itself if detached).
    #[must_use]
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.validate(id);
        let mut idx = id.idx;
        while self.parent[idx as usize] != INVALID {
            idx = self.parent[idx as usize];
        }
        self.id_at(idx)
    }

    /// Returns whether `ancestor` lies strictly above `node`.
    #[must_use]
    pub fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.validate(ancestor);
        self.validate(node);
        let mut idx = self.parent[node.idx as usize];
        while idx != INVALID {
            if idx == ancestor.idx {
                return true;
            }
            idx = self.parent[idx as usize];
        }
        false
    }

    /// Returns every descendant of a node in pre-order (the node excluded).
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.validate(id);
        let mut out = Vec::new();
        let mut stack: Vec<u32> = self.children[id.idx as usize].iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            out.push(self.id_at(idx));
            stack.extend(self.children[idx as usize].iter().rev().copied());
        }
        out
    }

    // -- Internal helpers --

    /// Exits, optionally cleans up, then unlinks a child whose parentage the
    /// caller has already checked.
    fn detach(&mut self, parent: NodeId, child: NodeId, cleanup: bool) {
        if self.running[parent.idx as usize] {
            self.on_exit_transition_did_start(child);
            if self.is_alive(child) {
                self.on_exit(child);
            }
        }
        if cleanup && self.is_alive(child) {
            self.cleanup(child);
        }
        // Hooks may have moved or destroyed either node.
        if self.is_alive(child)
            && self.is_alive(parent)
            && self.parent[child.idx as usize] == parent.idx
        {
            self.unlink(parent.idx, child.idx);
        }
    }

    /// Removes `child` from the children vector of `parent` and clears its
    /// back-link. Order of the remaining children is preserved.
    fn unlink(&mut self, parent: u32, child: u32) {
        let siblings = &mut self.children[parent as usize];
        if let Some(pos) = siblings.iter().position(|&c| c == child) {
            siblings.remove(pos);
        }
        self.parent[child as usize] = INVALID;
        self.dirty.mark(child, dirty::TRANSFORM);
    }
}
