// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Draw-call recording and global Z ordering.
//!
//! A visit pass emits draw calls in tree order. [`DrawQueue`] records them
//! and yields them in *render order*: sorted by global Z-order, where 0 keeps
//! the tree position. Negative values render before every tree-ordered node
//! and positive values after.
//!
//! The sort key is `(global_z, sequence)`, with `sequence` the position in
//! tree order, so commands with equal global Z (zero or not) keep their tree
//! order. `-0.0` is treated as `0.0`.

use alloc::vec::Vec;
use core::cmp::Ordering;

use kurbo::{Point, Rect, Size};

use crate::node::{Color3, NodeId, Renderer, SceneGraph};
use crate::transform::Transform3d;

/// One recorded draw call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCommand {
    /// Node being drawn.
    pub node: NodeId,
    /// Resolved world transform.
    pub world: Transform3d,
    /// Whether the world transform changed since the node was last visited.
    pub transform_updated: bool,
    /// Global Z-order at the time of the call.
    pub global_z: f32,
    /// Position of the call in tree order.
    pub sequence: u32,
    /// Untransformed content size.
    pub content_size: Size,
    /// Opacity after cascading.
    pub opacity: u8,
    /// Tint after cascading.
    pub color: Color3,
}

impl DrawCommand {
    /// Returns the world-space bounding box of the node's content.
    #[must_use]
    pub fn world_bounds(&self) -> Rect {
        self.world
            .transform_rect_bbox(Rect::from_origin_size(Point::ZERO, self.content_size))
    }

    fn render_order(&self, other: &Self) -> Ordering {
        self.global_z
            .total_cmp(&other.global_z)
            .then(self.sequence.cmp(&other.sequence))
    }
}

/// A [`Renderer`] that records draw calls and sorts them by global Z.
#[derive(Debug, Default)]
pub struct DrawQueue {
    commands: Vec<DrawCommand>,
    next_sequence: u32,

    sorted_indices: Vec<usize>,
    sorted_dirty: bool,
}

impl DrawQueue {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears recorded commands. Keeps allocated capacity for reuse.
    pub fn clear(&mut self) {
        self.commands.clear();
        self.next_sequence = 0;
        self.sorted_indices.clear();
        self.sorted_dirty = true;
    }

    /// Returns the number of recorded commands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns whether no commands were recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Returns commands in tree order.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Iterates commands in render order.
    pub fn iter_in_render_order(&mut self) -> impl Iterator<Item = &DrawCommand> {
        if self.sorted_dirty {
            self.rebuild_sorted_indices();
        }
        self.sorted_indices.iter().map(|&i| &self.commands[i])
    }

    /// Returns the nodes in render order.
    pub fn nodes_in_render_order(&mut self) -> Vec<NodeId> {
        self.iter_in_render_order().map(|c| c.node).collect()
    }

    fn rebuild_sorted_indices(&mut self) {
        self.sorted_indices.clear();
        self.sorted_indices.extend(0..self.commands.len());
        let commands = &self.commands;
        self.sorted_indices
            .sort_by(|&a, &b| commands[a].render_order(&commands[b]));
        self.sorted_dirty = false;
    }
}

impl Renderer for DrawQueue {
    fn draw(
        &mut self,
        graph: &SceneGraph,
        node: NodeId,
        world: &Transform3d,
        transform_updated: bool,
    ) {
        let sequence = self.next_sequence;
        self.next_sequence = self.next_sequence.wrapping_add(1);
        let z = graph.global_z_order(node);
        self.commands.push(DrawCommand {
            node,
            world: *world,
            transform_updated,
            // Fold -0.0 into 0.0 so it sorts with tree-ordered nodes.
            global_z: if z == 0.0 { 0.0 } else { z },
            sequence,
            content_size: graph.content_size(node),
            opacity: graph.displayed_opacity(node),
            color: graph.displayed_color(node),
        });
        self.sorted_dirty = true;
    }
}
