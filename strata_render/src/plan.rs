// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render plan: an ordered sequence of draw items for one pass.

use alloc::vec::Vec;

use kurbo::Rect;
use strata_core::draw::{DrawCommand, DrawQueue};
use strata_core::node::{NodeId, SceneGraph};
use strata_core::transform::Transform3d;

/// A single draw command in the render plan.
///
/// Items are produced in back-to-front order: global Z first, tree order
/// within equal global Z.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderItem {
    /// The node this item originates from.
    pub node: NodeId,
    /// World-space transform.
    pub world_transform: Transform3d,
    /// World-space bounding box of the node's content.
    pub bounds: Rect,
    /// Displayed opacity (0.0–1.0, accumulated from cascading ancestors).
    pub opacity: f32,
    /// Displayed tint as linear factors (0.0–1.0).
    pub color: [f32; 3],
    /// Whether the world transform changed since the node was last drawn.
    pub transform_updated: bool,
}

impl From<&DrawCommand> for RenderItem {
    fn from(cmd: &DrawCommand) -> Self {
        let unit = |v: u8| f32::from(v) / 255.0;
        Self {
            node: cmd.node,
            world_transform: cmd.world,
            bounds: cmd.world_bounds(),
            opacity: unit(cmd.opacity),
            color: [unit(cmd.color.r), unit(cmd.color.g), unit(cmd.color.b)],
            transform_updated: cmd.transform_updated,
        }
    }
}

/// An ordered list of draw commands for a single visit pass.
///
/// Backends translate this into native compositor operations or GPU draw
/// calls depending on their rendering strategy.
#[derive(Clone, Debug, Default)]
pub struct RenderPlan {
    /// Visit pass this plan was built from.
    pub frame_index: u64,
    /// Draw items in back-to-front order.
    pub items: Vec<RenderItem>,
}

impl RenderPlan {
    /// Creates an empty render plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a plan from the commands recorded during the graph's most
    /// recent visit pass.
    #[must_use]
    pub fn build(graph: &SceneGraph, queue: &mut DrawQueue) -> Self {
        let mut plan = Self::new();
        plan.rebuild(graph, queue);
        plan
    }

    /// Refills this plan in place, reusing its allocation.
    pub fn rebuild(&mut self, graph: &SceneGraph, queue: &mut DrawQueue) {
        self.frame_index = graph.frame_index();
        self.items.clear();
        self.items
            .extend(queue.iter_in_render_order().map(RenderItem::from));
    }

    /// Clears the plan for reuse.
    pub fn clear(&mut self) {
        self.items.clear();
    }
}
