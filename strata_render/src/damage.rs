// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spatial damage tracking for partial re-rendering.

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

use kurbo::Rect;

use crate::plan::{RenderItem, RenderPlan};

type Key = (u32, u32);

fn key(item: &RenderItem) -> Key {
    (item.node.index(), item.node.generation())
}

/// A region of the output that needs re-rendering.
///
/// Backends can use this to minimize GPU work by only redrawing areas
/// that changed since the last pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum DamageRegion {
    /// The entire output needs redrawing.
    #[default]
    Full,
    /// A list of world-space axis-aligned rectangles that need redrawing.
    Rects(Vec<Rect>),
    /// Nothing changed; the previous frame can be reused.
    None,
}

impl DamageRegion {
    /// Returns the area that changed between two consecutive plans.
    ///
    /// For every node drawn in both plans whose transform, bounds, opacity,
    /// tint or relative paint order changed, both its old and new bounds are
    /// damaged. Nodes that appear only in `current` damage their new bounds;
    /// nodes that disappeared (hidden, detached or destroyed) damage their
    /// old bounds. Empty rectangles are dropped.
    #[must_use]
    pub fn between(previous: &RenderPlan, current: &RenderPlan) -> Self {
        let before: BTreeMap<Key, &RenderItem> =
            previous.items.iter().map(|item| (key(item), item)).collect();
        let now: BTreeSet<Key> = current.items.iter().map(key).collect();

        // Nodes whose position in paint order relative to the survivors moved.
        let old_order = previous.items.iter().map(key).filter(|k| now.contains(k));
        let new_order = current
            .items
            .iter()
            .map(key)
            .filter(|k| before.contains_key(k));
        let mut reordered = BTreeSet::new();
        for (a, b) in old_order.zip(new_order) {
            if a != b {
                reordered.insert(a);
                reordered.insert(b);
            }
        }

        let mut rects = Vec::new();
        let mut push = |r: Rect| {
            if r.area() > 0.0 && !rects.contains(&r) {
                rects.push(r);
            }
        };
        for item in &current.items {
            match before.get(&key(item)) {
                None => push(item.bounds),
                Some(old) => {
                    if item.transform_updated
                        || old.bounds != item.bounds
                        || old.opacity != item.opacity
                        || old.color != item.color
                        || reordered.contains(&key(item))
                    {
                        push(old.bounds);
                        push(item.bounds);
                    }
                }
            }
        }
        for item in &previous.items {
            if !now.contains(&key(item)) {
                push(item.bounds);
            }
        }

        if rects.is_empty() {
            Self::None
        } else {
            Self::Rects(rects)
        }
    }

    /// Returns `true` if no region needs redrawing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the smallest rectangle covering the damage, or `None` if the
    /// region is empty or covers the whole output.
    #[must_use]
    pub fn bounding_rect(&self) -> Option<Rect> {
        match self {
            Self::Rects(rects) => rects.iter().copied().reduce(|a, b| a.union(b)),
            Self::Full | Self::None => None,
        }
    }

    /// Merges another damage region into this one.
    pub fn merge(&mut self, other: &Self) {
        match (&*self, other) {
            (Self::Full, _) | (_, Self::Full) => *self = Self::Full,
            (Self::None, _) => *self = other.clone(),
            (_, Self::None) => {}
            (Self::Rects(a), Self::Rects(b)) => {
                let mut merged = a.clone();
                merged.extend_from_slice(b);
                *self = Self::Rects(merged);
            }
        }
    }
}

/// Derives damage by comparing each plan with the one before it.
#[derive(Clone, Debug, Default)]
pub struct DamageTracker {
    previous: Option<RenderPlan>,
}

impl DamageTracker {
    /// Creates a tracker with no history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the damage since the last tracked plan and remembers `plan`.
    ///
    /// With no history the whole output is damaged.
    pub fn track(&mut self, plan: &RenderPlan) -> DamageRegion {
        let damage = match &self.previous {
            Some(previous) => DamageRegion::between(previous, plan),
            None => DamageRegion::Full,
        };
        match &mut self.previous {
            Some(previous) => previous.clone_from(plan),
            None => self.previous = Some(plan.clone()),
        }
        damage
    }

    /// Forgets the previous plan, so the next one damages everything.
    pub fn reset(&mut self) {
        self.previous = None;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use kurbo::{Point, Size};
    use strata_core::draw::DrawQueue;
    use strata_core::node::{Color3, NodeId, SceneGraph};

    use super::*;

    #[test]
    fn merge_rules() {
        let a = Rect::new(0.0, 0.0, 1.0, 1.0);
        let b = Rect::new(2.0, 2.0, 3.0, 3.0);

        let mut r = DamageRegion::None;
        r.merge(&DamageRegion::Rects(vec![a]));
        assert_eq!(r, DamageRegion::Rects(vec![a]));
        r.merge(&DamageRegion::Rects(vec![b]));
        assert_eq!(r, DamageRegion::Rects(vec![a, b]));
        assert_eq!(r.bounding_rect(), Some(Rect::new(0.0, 0.0, 3.0, 3.0)));
        r.merge(&DamageRegion::None);
        assert_eq!(r, DamageRegion::Rects(vec![a, b]));
        r.merge(&DamageRegion::Full);
        assert_eq!(r, DamageRegion::Full);
        assert!(!r.is_empty());
    }

    struct Scene {
        graph: SceneGraph,
        root: NodeId,
        queue: DrawQueue,
        tracker: DamageTracker,
    }

    impl Scene {
        /// A root with `n` children, each 2x2 and centred on the origin.
        fn new(n: usize) -> (Self, Vec<NodeId>) {
            let mut graph = SceneGraph::new();
            let root = graph.create_node();
            let kids = (0..n)
                .map(|_| {
                    let c = graph.create_node();
                    graph.set_content_size(c, Size::new(2.0, 2.0));
                    graph.add_child(root, c).unwrap();
                    c
                })
                .collect();
            let mut scene = Self {
                graph,
                root,
                queue: DrawQueue::new(),
                tracker: DamageTracker::new(),
            };
            assert_eq!(scene.frame(), DamageRegion::Full, "no history yet");
            (scene, kids)
        }

        fn frame(&mut self) -> DamageRegion {
            self.queue.clear();
            self.graph.visit(self.root, &mut self.queue);
            let plan = RenderPlan::build(&self.graph, &mut self.queue);
            self.tracker.track(&plan)
        }
    }

    const ORIGIN: Rect = Rect::new(-1.0, -1.0, 1.0, 1.0);

    #[test]
    fn unchanged_frame_has_no_damage() {
        let (mut scene, _) = Scene::new(2);
        assert!(scene.frame().is_empty());
    }

    #[test]
    fn moved_node_damages_old_and_new_bounds() {
        let (mut scene, kids) = Scene::new(2);
        scene.graph.set_position(kids[1], Point::new(10.0, 0.0));
        assert_eq!(
            scene.frame(),
            DamageRegion::Rects(vec![ORIGIN, Rect::new(9.0, -1.0, 11.0, 1.0)])
        );
        assert!(scene.frame().is_empty());
    }

    #[test]
    fn hidden_node_damages_the_area_it_left() {
        let (mut scene, kids) = Scene::new(1);
        scene.graph.set_position(kids[0], Point::new(5.0, 5.0));
        let _ = scene.frame();

        scene.graph.set_visible(kids[0], false);
        assert_eq!(
            scene.frame(),
            DamageRegion::Rects(vec![Rect::new(4.0, 4.0, 6.0, 6.0)])
        );

        scene.graph.set_visible(kids[0], true);
        assert_eq!(
            scene.frame(),
            DamageRegion::Rects(vec![Rect::new(4.0, 4.0, 6.0, 6.0)])
        );
    }

    #[test]
    fn display_changes_are_damage() {
        let (mut scene, kids) = Scene::new(2);
        scene.graph.set_opacity(kids[0], 128);
        assert_eq!(scene.frame(), DamageRegion::Rects(vec![ORIGIN]));

        scene.graph.set_color(kids[1], Color3::new(255, 0, 0));
        assert_eq!(scene.frame(), DamageRegion::Rects(vec![ORIGIN]));
    }

    #[test]
    fn paint_order_change_is_damage() {
        let (mut scene, kids) = Scene::new(2);
        scene.graph.set_position(kids[1], Point::new(1.0, 0.0));
        let _ = scene.frame();

        scene.graph.set_global_z_order(kids[0], 1.0);
        assert_eq!(
            scene.frame(),
            DamageRegion::Rects(vec![Rect::new(0.0, -1.0, 2.0, 1.0), ORIGIN])
        );
    }

    #[test]
    fn reset_forgets_history() {
        let (mut scene, _) = Scene::new(1);
        scene.tracker.reset();
        assert_eq!(scene.frame(), DamageRegion::Full);
    }
}
