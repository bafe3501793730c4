// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate-space conversions.
//!
//! The node-to-parent matrix and its inverse are cached per node. World
//! transforms are never stored: they are rebuilt from the cached local
//! matrices along the path to the root on every call, so they cannot go
//! stale when an ancestor moves.

use kurbo::{Point, Rect};

use super::id::{INVALID, NodeId};
use super::store::SceneGraph;
use crate::dirty;
use crate::transform::Transform3d;

impl SceneGraph {
    /// Returns the matrix mapping node space into the parent's space.
    #[must_use]
    pub fn node_to_parent_transform(&self, id: NodeId) -> Transform3d {
        self.validate(id);
        let i = id.idx as usize;
        self.cache[i].forward(&self.geometry[i])
    }

    /// Overrides the node-to-parent matrix.
    ///
    /// The override stands until a geometric setter changes one of the
    /// node's fields, at which point the matrix is rebuilt from them. The
    /// node reports its transform as updated on the next visit.
    pub fn set_node_to_parent_transform(&mut self, id: NodeId, transform: Transform3d) {
        self.validate(id);
        self.cache[id.idx as usize].set_forward(transform);
        self.dirty.mark(id.idx, dirty::TRANSFORM);
    }

    /// Returns the matrix mapping the parent's space into node space.
    ///
    /// A singular node-to-parent matrix yields the identity.
    #[must_use]
    pub fn parent_to_node_transform(&self, id: NodeId) -> Transform3d {
        self.validate(id);
        let i = id.idx as usize;
        self.cache[i].inverse(&self.geometry[i])
    }

    /// Returns the matrix mapping node space into world (root) space.
    #[must_use]
    pub fn node_to_world_transform(&self, id: NodeId) -> Transform3d {
        let mut m = self.node_to_parent_transform(id);
        let mut p = self.parent[id.idx as usize];
        while p != INVALID {
            let i = p as usize;
            m = self.cache[i].forward(&self.geometry[i]) * m;
            p = self.parent[i];
        }
        m
    }

    /// Returns the matrix mapping world space into node space.
    #[must_use]
    pub fn world_to_node_transform(&self, id: NodeId) -> Transform3d {
        let mut m = self.parent_to_node_transform(id);
        let mut p = self.parent[id.idx as usize];
        while p != INVALID {
            let i = p as usize;
            m = m * self.cache[i].inverse(&self.geometry[i]);
            p = self.parent[i];
        }
        m
    }

    /// Maps a world-space point into node space.
    #[must_use]
    pub fn convert_to_node_space(&self, id: NodeId, world: Point) -> Point {
        self.world_to_node_transform(id).transform_point(world)
    }

    /// Maps a node-space point into world space.
    #[must_use]
    pub fn convert_to_world_space(&self, id: NodeId, local: Point) -> Point {
        self.node_to_world_transform(id).transform_point(local)
    }

    /// Maps a world-space point into node space, relative to the anchor.
    #[must_use]
    pub fn convert_to_node_space_ar(&self, id: NodeId, world: Point) -> Point {
        let anchor = self.anchor_point_in_points(id);
        self.convert_to_node_space(id, world) - anchor.to_vec2()
    }

    /// Maps an anchor-relative node-space point into world space.
    #[must_use]
    pub fn convert_to_world_space_ar(&self, id: NodeId, local: Point) -> Point {
        let anchor = self.anchor_point_in_points(id);
        self.convert_to_world_space(id, local + anchor.to_vec2())
    }

    /// Returns the node's position expressed in world space.
    #[must_use]
    pub fn world_position(&self, id: NodeId) -> Point {
        let position = self.position(id);
        match self.parent(id) {
            Some(parent) => self.convert_to_world_space(parent, position),
            None => position,
        }
    }

    /// Returns the bounding box of the node's content in its parent's space.
    #[must_use]
    pub fn bounding_box(&self, id: NodeId) -> Rect {
        let size = self.content_size(id);
        self.node_to_parent_transform(id)
            .transform_rect_bbox(Rect::from_origin_size(Point::ZERO, size))
    }

    /// Returns the bounding box of the node's content in world space.
    #[must_use]
    pub fn world_bounding_box(&self, id: NodeId) -> Rect {
        let size = self.content_size(id);
        self.node_to_world_transform(id)
            .transform_rect_bbox(Rect::from_origin_size(Point::ZERO, size))
    }
}
