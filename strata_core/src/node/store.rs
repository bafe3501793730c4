// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays node storage with allocation and property management.

use alloc::boxed::Box;
use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use kurbo::{Point, Size};
use understory_dirty::{CycleHandling, DirtyTracker};

use super::display::DisplayState;
use super::geometry::{TransformCache, TransformState};
use super::id::{BodyId, INVALID, INVALID_TAG, NodeId};
use super::lifecycle::{Hook, NodeBehavior};
use crate::collab::Collaborators;
use crate::dirty;
use crate::error::NodeError;
use crate::transform::Transform3d;

/// Anchor forced onto nodes that carry a physics body.
const PHYSICS_ANCHOR: Point = Point::new(0.5, 0.5);

/// Struct-of-arrays storage for every node of a scene.
///
/// Nodes are addressed by [`NodeId`] handles. Each node occupies a slot in
/// parallel arrays; destroyed nodes are recycled via a free list, and
/// generation counters make old handles fail validation.
///
/// A node's children vector is the only owner of its children. The parent
/// index is a plain back-link used for upward walks and is reset to
/// [`INVALID`] whenever the child leaves the collection.
pub struct SceneGraph {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) children: Vec<Vec<u32>>,
    pub(crate) reorder_dirty: Vec<bool>,

    // -- Ordering keys --
    pub(crate) local_z: Vec<i32>,
    pub(crate) global_z: Vec<f32>,
    pub(crate) arrival: Vec<u64>,
    pub(crate) next_arrival: u64,

    // -- Geometry --
    pub(crate) geometry: Vec<TransformState>,
    pub(crate) cache: Vec<TransformCache>,
    pub(crate) transform_updated: Vec<bool>,

    // -- Display --
    pub(crate) display: Vec<DisplayState>,

    // -- Identity and attachments --
    pub(crate) tag: Vec<i32>,
    pub(crate) name: Vec<String>,
    pub(crate) behavior: Vec<Option<Box<dyn NodeBehavior>>>,
    pub(crate) user_data: Vec<Option<Box<dyn Any>>>,
    pub(crate) physics_body: Vec<Option<BodyId>>,

    // -- Lifecycle --
    pub(crate) running: Vec<bool>,
    pub(crate) transition_finished: Vec<bool>,
    pub(crate) hooks_running: Vec<NodeId>,
    pub(crate) deferred_hooks: Vec<(NodeId, Hook)>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) alive: Vec<bool>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,
    pub(crate) frame_index: u64,

    pub(crate) collab: Collaborators,
}

impl fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneGraph")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .field("frame_index", &self.frame_index)
            .finish_non_exhaustive()
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Creates an empty graph wired to no-op collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self::with_collaborators(Collaborators::default())
    }

    /// Creates an empty graph that drives the given collaborators.
    #[must_use]
    pub fn with_collaborators(collab: Collaborators) -> Self {
        Self {
            parent: Vec::new(),
            children: Vec::new(),
            reorder_dirty: Vec::new(),
            local_z: Vec::new(),
            global_z: Vec::new(),
            arrival: Vec::new(),
            next_arrival: 0,
            geometry: Vec::new(),
            cache: Vec::new(),
            transform_updated: Vec::new(),
            display: Vec::new(),
            tag: Vec::new(),
            name: Vec::new(),
            behavior: Vec::new(),
            user_data: Vec::new(),
            physics_body: Vec::new(),
            running: Vec::new(),
            transition_finished: Vec::new(),
            hooks_running: Vec::new(),
            deferred_hooks: Vec::new(),
            generation: Vec::new(),
            alive: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            frame_index: 0,
            collab,
        }
    }

    /// Returns the collaborators this graph drives.
    #[must_use]
    pub fn collaborators(&self) -> &Collaborators {
        &self.collab
    }

    // -- Allocation API --

    /// Creates a new inert node and returns its handle.
    ///
    /// The node starts detached and not running, with zero position, unit
    /// scale, no rotation, a centred anchor and an empty content size.
    pub fn create_node(&mut self) -> NodeId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot; its generation was bumped on destroy.
            let i = idx as usize;
            self.parent[i] = INVALID;
            self.children[i].clear();
            self.reorder_dirty[i] = false;
            self.local_z[i] = 0;
            self.global_z[i] = 0.0;
            self.arrival[i] = 0;
            self.geometry[i] = TransformState::default();
            self.cache[i].invalidate();
            self.transform_updated[i] = false;
            self.display[i] = DisplayState::default();
            self.tag[i] = INVALID_TAG;
            self.name[i].clear();
            self.running[i] = false;
            self.transition_finished[i] = false;
            self.alive[i] = true;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.children.push(Vec::new());
            self.reorder_dirty.push(false);
            self.local_z.push(0);
            self.global_z.push(0.0);
            self.arrival.push(0);
            self.geometry.push(TransformState::default());
            self.cache.push(TransformCache::default());
            self.transform_updated.push(false);
            self.display.push(DisplayState::default());
            self.tag.push(INVALID_TAG);
            self.name.push(String::new());
            self.behavior.push(None);
            self.user_data.push(None);
            self.physics_body.push(None);
            self.running.push(false);
            self.transition_finished.push(false);
            self.generation.push(0);
            self.alive.push(true);
            idx
        };

        // A fresh node reports its transform as updated on its first visit.
        self.dirty.mark(idx, dirty::TRANSFORM);
        NodeId::new(idx, self.generation[idx as usize])
    }

    /// Creates a node whose lifecycle hooks are provided by `behavior`.
    pub fn create_node_with(&mut self, behavior: Box<dyn NodeBehavior>) -> NodeId {
        let id = self.create_node();
        self.behavior[id.idx as usize] = Some(behavior);
        id
    }

    /// Returns whether the given handle refers to a live node.
    #[must_use]
    pub fn is_alive(&self, id: NodeId) -> bool {
        id.idx < self.len
            && self.alive[id.idx as usize]
            && self.generation[id.idx as usize] == id.generation
    }

    /// Returns the number of live nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.len as usize - self.free_list.len()
    }

    /// Releases a detached slot: drops its attachments, bumps the generation
    /// and returns it to the free list.
    pub(crate) fn free_slot(&mut self, idx: u32) {
        let i = idx as usize;
        self.dirty.remove_key(idx);
        self.behavior[i] = None;
        self.user_data[i] = None;
        self.physics_body[i] = None;
        self.children[i].clear();
        self.parent[i] = INVALID;
        self.running[i] = false;
        self.alive[i] = false;
        self.generation[i] = self.generation[i].wrapping_add(1);
        self.free_list.push(idx);
    }

    // -- Identity --

    /// Returns the node's tag ([`INVALID_TAG`] unless set).
    #[must_use]
    pub fn tag(&self, id: NodeId) -> i32 {
        self.validate(id);
        self.tag[id.idx as usize]
    }

    /// Sets the node's tag.
    pub fn set_tag(&mut self, id: NodeId, tag: i32) {
        self.validate(id);
        self.tag[id.idx as usize] = tag;
    }

    /// Returns the node's name (empty unless set).
    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        self.validate(id);
        &self.name[id.idx as usize]
    }

    /// Sets the node's name.
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) {
        self.validate(id);
        self.name[id.idx as usize] = name.into();
    }

    /// Returns a short human-readable description of the node.
    #[must_use]
    pub fn describe(&self, id: NodeId) -> String {
        self.validate(id);
        let name = &self.name[id.idx as usize];
        if name.is_empty() {
            format!("<Node | Tag = {}>", self.tag[id.idx as usize])
        } else {
            format!("<Node | Tag = {} | Name = {name}>", self.tag[id.idx as usize])
        }
    }

    // -- Ordering keys --

    /// Returns the node's local Z-order among its siblings.
    #[must_use]
    pub fn local_z_order(&self, id: NodeId) -> i32 {
        self.validate(id);
        self.local_z[id.idx as usize]
    }

    /// Returns the node's global Z-order (0 means "use tree order").
    #[must_use]
    pub fn global_z_order(&self, id: NodeId) -> f32 {
        self.validate(id);
        self.global_z[id.idx as usize]
    }

    /// Sets the node's global Z-order.
    pub fn set_global_z_order(&mut self, id: NodeId, z: f32) {
        self.validate(id);
        self.global_z[id.idx as usize] = z;
    }

    /// Returns the arrival counter assigned when the node was last inserted.
    #[must_use]
    pub fn order_of_arrival(&self, id: NodeId) -> u64 {
        self.validate(id);
        self.arrival[id.idx as usize]
    }

    // -- Geometry getters --

    /// Returns the node's full transform state.
    #[must_use]
    pub fn transform_state(&self, id: NodeId) -> &TransformState {
        self.validate(id);
        &self.geometry[id.idx as usize]
    }

    /// Returns the node's 2-D position.
    #[must_use]
    pub fn position(&self, id: NodeId) -> Point {
        self.transform_state(id).position
    }

    /// Returns the node's depth offset.
    #[must_use]
    pub fn position_z(&self, id: NodeId) -> f64 {
        self.transform_state(id).position_z
    }

    /// Returns the position as `[x, y, z]`.
    #[must_use]
    pub fn position_3d(&self, id: NodeId) -> [f64; 3] {
        let s = self.transform_state(id);
        [s.position.x, s.position.y, s.position_z]
    }

    /// Returns the Z rotation in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::NonUniformRotation`] if the rotation-skew
    /// components differ.
    pub fn rotation(&self, id: NodeId) -> Result<f64, NodeError> {
        let s = self.transform_state(id);
        if s.rotation_skew_x == s.rotation_skew_y {
            Ok(s.rotation_skew_x)
        } else {
            Err(NodeError::NonUniformRotation {
                x: s.rotation_skew_x,
                y: s.rotation_skew_y,
            })
        }
    }

    /// Returns the 3-axis rotation `[x, y, z]` in degrees.
    #[must_use]
    pub fn rotation_3d(&self, id: NodeId) -> [f64; 3] {
        let s = self.transform_state(id);
        [s.rotation_x, s.rotation_y, s.rotation_skew_x]
    }

    /// Returns the rotation-skew X component in degrees.
    #[must_use]
    pub fn rotation_skew_x(&self, id: NodeId) -> f64 {
        self.transform_state(id).rotation_skew_x
    }

    /// Returns the rotation-skew Y component in degrees.
    #[must_use]
    pub fn rotation_skew_y(&self, id: NodeId) -> f64 {
        self.transform_state(id).rotation_skew_y
    }

    /// Returns the uniform scale.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::NonUniformScale`] if X and Y scales differ.
    pub fn scale(&self, id: NodeId) -> Result<f64, NodeError> {
        let [x, y, _] = self.transform_state(id).scale;
        if x == y {
            Ok(x)
        } else {
            Err(NodeError::NonUniformScale { x, y })
        }
    }

    /// Returns the scale along X.
    #[must_use]
    pub fn scale_x(&self, id: NodeId) -> f64 {
        self.transform_state(id).scale[0]
    }

    /// Returns the scale along Y.
    #[must_use]
    pub fn scale_y(&self, id: NodeId) -> f64 {
        self.transform_state(id).scale[1]
    }

    /// Returns the scale along Z.
    #[must_use]
    pub fn scale_z(&self, id: NodeId) -> f64 {
        self.transform_state(id).scale[2]
    }

    /// Returns the shear angle along X in degrees.
    #[must_use]
    pub fn skew_x(&self, id: NodeId) -> f64 {
        self.transform_state(id).skew_x
    }

    /// Returns the shear angle along Y in degrees.
    #[must_use]
    pub fn skew_y(&self, id: NodeId) -> f64 {
        self.transform_state(id).skew_y
    }

    /// Returns the normalized anchor point.
    #[must_use]
    pub fn anchor_point(&self, id: NodeId) -> Point {
        self.transform_state(id).anchor
    }

    /// Returns the anchor point in content-space units.
    #[must_use]
    pub fn anchor_point_in_points(&self, id: NodeId) -> Point {
        self.transform_state(id).anchor_in_points()
    }

    /// Returns the untransformed content size.
    #[must_use]
    pub fn content_size(&self, id: NodeId) -> Size {
        self.transform_state(id).content_size
    }

    /// Returns whether position places the origin instead of the anchor.
    #[must_use]
    pub fn is_ignore_anchor_point_for_position(&self, id: NodeId) -> bool {
        self.transform_state(id).ignore_anchor_for_position
    }

    /// Returns the additional transform, if any.
    #[must_use]
    pub fn additional_transform(&self, id: NodeId) -> Option<Transform3d> {
        self.transform_state(id).additional
    }

    // -- Geometry setters (invalidate caches, mark TRANSFORM) --

    /// Sets the 2-D position.
    pub fn set_position(&mut self, id: NodeId, position: Point) {
        self.update_geometry(id, |s| s.position = position);
    }

    /// Sets the X coordinate of the position.
    pub fn set_position_x(&mut self, id: NodeId, x: f64) {
        self.update_geometry(id, |s| s.position.x = x);
    }

    /// Sets the Y coordinate of the position.
    pub fn set_position_y(&mut self, id: NodeId, y: f64) {
        self.update_geometry(id, |s| s.position.y = y);
    }

    /// Sets the depth offset.
    pub fn set_position_z(&mut self, id: NodeId, z: f64) {
        self.update_geometry(id, |s| s.position_z = z);
    }

    /// Sets position and depth together.
    pub fn set_position_3d(&mut self, id: NodeId, [x, y, z]: [f64; 3]) {
        self.update_geometry(id, |s| {
            s.position = Point::new(x, y);
            s.position_z = z;
        });
    }

    /// Sets the Z rotation in degrees (both rotation-skew components).
    pub fn set_rotation(&mut self, id: NodeId, degrees: f64) {
        self.update_geometry(id, |s| {
            s.rotation_skew_x = degrees;
            s.rotation_skew_y = degrees;
        });
    }

    /// Sets the 3-axis rotation in degrees.
    pub fn set_rotation_3d(&mut self, id: NodeId, [x, y, z]: [f64; 3]) {
        self.update_geometry(id, |s| {
            s.rotation_x = x;
            s.rotation_y = y;
            s.rotation_skew_x = z;
            s.rotation_skew_y = z;
        });
    }

    /// Sets the rotation-skew X component in degrees.
    pub fn set_rotation_skew_x(&mut self, id: NodeId, degrees: f64) {
        self.update_geometry(id, |s| s.rotation_skew_x = degrees);
    }

    /// Sets the rotation-skew Y component in degrees.
    pub fn set_rotation_skew_y(&mut self, id: NodeId, degrees: f64) {
        self.update_geometry(id, |s| s.rotation_skew_y = degrees);
    }

    /// Sets X, Y and Z scale to the same factor.
    pub fn set_scale(&mut self, id: NodeId, scale: f64) {
        self.update_geometry(id, |s| s.scale = [scale; 3]);
    }

    /// Sets X and Y scale, leaving Z untouched.
    pub fn set_scale_xy(&mut self, id: NodeId, x: f64, y: f64) {
        self.update_geometry(id, |s| {
            s.scale[0] = x;
            s.scale[1] = y;
        });
    }

    /// Sets the scale along X.
    pub fn set_scale_x(&mut self, id: NodeId, x: f64) {
        self.update_geometry(id, |s| s.scale[0] = x);
    }

    /// Sets the scale along Y.
    pub fn set_scale_y(&mut self, id: NodeId, y: f64) {
        self.update_geometry(id, |s| s.scale[1] = y);
    }

    /// Sets the scale along Z.
    pub fn set_scale_z(&mut self, id: NodeId, z: f64) {
        self.update_geometry(id, |s| s.scale[2] = z);
    }

    /// Sets the shear angle along X in degrees.
    pub fn set_skew_x(&mut self, id: NodeId, degrees: f64) {
        self.update_geometry(id, |s| s.skew_x = degrees);
    }

    /// Sets the shear angle along Y in degrees.
    pub fn set_skew_y(&mut self, id: NodeId, degrees: f64) {
        self.update_geometry(id, |s| s.skew_y = degrees);
    }

    /// Sets the normalized anchor point.
    ///
    /// # Errors
    ///
    /// Returns [`NodeError::AnchorLocked`] if a physics body is attached and
    /// `anchor` differs from the locked centre.
    pub fn set_anchor_point(&mut self, id: NodeId, anchor: Point) -> Result<(), NodeError> {
        self.validate(id);
        let i = id.idx as usize;
        if self.physics_body[i].is_some() && self.geometry[i].anchor != anchor {
            return Err(NodeError::AnchorLocked(id));
        }
        self.update_geometry(id, |s| s.anchor = anchor);
        Ok(())
    }

    /// Sets the untransformed content size.
    pub fn set_content_size(&mut self, id: NodeId, size: Size) {
        self.update_geometry(id, |s| s.content_size = size);
    }

    /// Chooses whether position places the origin instead of the anchor.
    pub fn set_ignore_anchor_point_for_position(&mut self, id: NodeId, ignore: bool) {
        self.update_geometry(id, |s| s.ignore_anchor_for_position = ignore);
    }

    /// Sets or clears the additional transform.
    pub fn set_additional_transform(&mut self, id: NodeId, transform: Option<Transform3d>) {
        self.update_geometry(id, |s| s.additional = transform);
    }

    // -- Physics attach point --

    /// Attaches a physics body, forcing the anchor to the centre and locking
    /// it there.
    pub fn set_physics_body(&mut self, id: NodeId, body: BodyId) {
        self.update_geometry(id, |s| s.anchor = PHYSICS_ANCHOR);
        self.physics_body[id.idx as usize] = Some(body);
    }

    /// Returns the attached physics body, if any.
    #[must_use]
    pub fn physics_body(&self, id: NodeId) -> Option<BodyId> {
        self.validate(id);
        self.physics_body[id.idx as usize]
    }

    /// Writes a simulated pose back into the node.
    pub fn apply_physics_step(&mut self, id: NodeId, position: Point, rotation: f64) {
        self.update_geometry(id, |s| {
            s.position = position;
            s.rotation_skew_x = rotation;
            s.rotation_skew_y = rotation;
        });
    }

    // -- User data --

    /// Attaches arbitrary user data, replacing any previous value.
    pub fn set_user_data(&mut self, id: NodeId, data: Box<dyn Any>) {
        self.validate(id);
        self.user_data[id.idx as usize] = Some(data);
    }

    /// Returns the attached user data.
    #[must_use]
    pub fn user_data(&self, id: NodeId) -> Option<&dyn Any> {
        self.validate(id);
        self.user_data[id.idx as usize].as_deref()
    }

    /// Returns the attached user data mutably.
    pub fn user_data_mut(&mut self, id: NodeId) -> Option<&mut dyn Any> {
        self.validate(id);
        self.user_data[id.idx as usize].as_deref_mut()
    }

    /// Detaches and returns the user data.
    pub fn take_user_data(&mut self, id: NodeId) -> Option<Box<dyn Any>> {
        self.validate(id);
        self.user_data[id.idx as usize].take()
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: NodeId) {
        assert!(
            self.is_alive(id),
            "stale NodeId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    /// Returns `StaleHandle` instead of panicking.
    pub(crate) fn check(&self, id: NodeId) -> Result<(), NodeError> {
        if self.is_alive(id) {
            Ok(())
        } else {
            Err(NodeError::StaleHandle(id))
        }
    }

    pub(crate) fn id_at(&self, idx: u32) -> NodeId {
        NodeId::new(idx, self.generation[idx as usize])
    }

    /// Applies `f` to the node's transform state and, if anything changed,
    /// clears its matrix cache and marks the TRANSFORM channel.
    fn update_geometry(&mut self, id: NodeId, f: impl FnOnce(&mut TransformState)) {
        self.validate(id);
        let i = id.idx as usize;
        let before = self.geometry[i];
        f(&mut self.geometry[i]);
        if self.geometry[i] != before {
            self.mark_transform_dirty(id.idx);
        }
    }

    pub(crate) fn mark_transform_dirty(&mut self, idx: u32) {
        self.cache[idx as usize].invalidate();
        self.dirty.mark(idx, dirty::TRANSFORM);
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn create_and_destroy() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node();
        assert!(graph.is_alive(id));
        assert_eq!(graph.node_count(), 1);
        graph.destroy_node(id).unwrap();
        assert!(!graph.is_alive(id));
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut graph = SceneGraph::new();
        let id1 = graph.create_node();
        graph.destroy_node(id1).unwrap();
        let id2 = graph.create_node();
        assert!(!graph.is_alive(id1));
        assert!(graph.is_alive(id2));
        assert_eq!(id1.index(), id2.index());
        assert_ne!(id1.generation(), id2.generation());
    }

    #[test]
    fn new_node_is_inert_with_identity_transform() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node();
        assert!(!graph.is_running(id));
        assert_eq!(graph.parent(id), None);
        assert_eq!(graph.child_count(id), 0);
        assert_eq!(graph.position(id), Point::ZERO);
        assert_eq!(graph.scale(id), Ok(1.0));
        assert_eq!(graph.rotation(id), Ok(0.0));
        assert_eq!(graph.anchor_point(id), Point::new(0.5, 0.5));
        assert_eq!(graph.tag(id), INVALID_TAG);
        assert_eq!(graph.node_to_parent_transform(id), Transform3d::IDENTITY);
    }

    #[test]
    fn reused_slot_is_reset() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node();
        graph.set_position(a, Point::new(4.0, 4.0));
        graph.set_tag(a, 9);
        graph.set_name(a, "old");
        graph.set_user_data(a, Box::new(1_u8));
        graph.destroy_node(a).unwrap();

        let b = graph.create_node();
        assert_eq!(graph.position(b), Point::ZERO);
        assert_eq!(graph.tag(b), INVALID_TAG);
        assert_eq!(graph.name(b), "");
        assert!(graph.user_data(b).is_none());
    }

    #[test]
    fn non_uniform_scale_is_invalid_state() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node();
        graph.set_scale_x(id, 2.0);
        graph.set_scale_y(id, 3.0);
        let err = graph.scale(id).unwrap_err();
        assert_eq!(err, NodeError::NonUniformScale { x: 2.0, y: 3.0 });
        assert_eq!(err.kind(), ErrorKind::InvalidState);

        graph.set_scale(id, 4.0);
        assert_eq!(graph.scale(id), Ok(4.0));
        assert_eq!(graph.scale_z(id), 4.0);
    }

    #[test]
    fn non_uniform_rotation_is_invalid_state() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node();
        graph.set_rotation(id, 30.0);
        assert_eq!(graph.rotation(id), Ok(30.0));
        graph.set_rotation_skew_y(id, 45.0);
        assert_eq!(
            graph.rotation(id).map_err(|e| e.kind()),
            Err(ErrorKind::InvalidState)
        );
    }

    #[test]
    fn setters_invalidate_only_when_value_changes() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node();
        let _ = graph.node_to_parent_transform(id);
        assert!(graph.cache[id.idx as usize].is_valid());

        graph.set_position(id, Point::ZERO);
        assert!(
            graph.cache[id.idx as usize].is_valid(),
            "unchanged value keeps the cache"
        );

        graph.set_position(id, Point::new(1.0, 0.0));
        assert!(!graph.cache[id.idx as usize].is_valid());
    }

    #[test]
    fn physics_body_locks_anchor() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node();
        graph.set_anchor_point(id, Point::new(0.0, 0.0)).unwrap();

        graph.set_physics_body(id, BodyId(3));
        assert_eq!(graph.physics_body(id), Some(BodyId(3)));
        assert_eq!(graph.anchor_point(id), Point::new(0.5, 0.5));

        let err = graph.set_anchor_point(id, Point::new(1.0, 1.0)).unwrap_err();
        assert_eq!(err, NodeError::AnchorLocked(id));
        assert_eq!(err.kind(), ErrorKind::InvalidState);
        assert_eq!(graph.anchor_point(id), Point::new(0.5, 0.5));
        // Re-asserting the locked value is not a change.
        assert!(graph.set_anchor_point(id, Point::new(0.5, 0.5)).is_ok());
    }

    #[test]
    fn physics_step_writes_pose() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node();
        graph.set_physics_body(id, BodyId(1));
        graph.apply_physics_step(id, Point::new(3.0, 4.0), 15.0);
        assert_eq!(graph.position(id), Point::new(3.0, 4.0));
        assert_eq!(graph.rotation(id), Ok(15.0));
    }

    #[test]
    fn user_data_round_trips() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node();
        graph.set_user_data(id, Box::new(String::from("payload")));
        let data = graph.user_data(id).and_then(|d| d.downcast_ref::<String>());
        assert_eq!(data.map(String::as_str), Some("payload"));
        if let Some(s) = graph.user_data_mut(id).and_then(|d| d.downcast_mut::<String>()) {
            s.push('!');
        }
        let taken = graph.take_user_data(id).expect("data was attached");
        assert_eq!(taken.downcast_ref::<String>().map(String::as_str), Some("payload!"));
        assert!(graph.user_data(id).is_none());
    }

    #[test]
    fn describe_includes_tag_and_name() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node();
        graph.set_tag(id, 5);
        assert_eq!(graph.describe(id), "<Node | Tag = 5>");
        graph.set_name(id, "hud");
        assert_eq!(graph.describe(id), "<Node | Tag = 5 | Name = hud>");
    }

    #[test]
    #[should_panic(expected = "stale NodeId")]
    fn destroyed_handle_panics_on_set_position() {
        let mut graph = SceneGraph::new();
        let id = graph.create_node();
        graph.destroy_node(id).unwrap();
        graph.set_position(id, Point::ZERO);
    }
}
