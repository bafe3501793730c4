// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal: child iteration and the visit pass.
//!
//! A visit walks a subtree in painter's order. For each visible node it
//! resolves the world transform from the parent's, sorts the children if
//! their order is stale, visits the negative-Z children, draws the node,
//! then visits the rest:
//!
//! ```text
//!   visit(n, parent_world, parent_updated)
//!     hidden?           ──► return (subtree skipped)
//!     updated = parent_updated | n.transform_updated
//!     world   = parent_world · node_to_parent(n)
//!     sort children if reorder-dirty
//!     visit children with local_z <  0
//!     draw(n, world, updated)
//!     visit children with local_z >= 0
//! ```
//!
//! The children of each node are snapshotted before recursing. A child that
//! is destroyed or moved elsewhere by a hook earlier in the same pass is
//! skipped when its turn comes.

use alloc::vec::Vec;

use super::id::{INVALID, NodeId};
use super::store::SceneGraph;
use crate::dirty;
use crate::trace::{ChildrenSortedEvent, Tracer, VisitBeginEvent, VisitEndEvent};
use crate::transform::Transform3d;

/// Receives one draw call per visible node during a visit pass.
pub trait Renderer {
    /// Draws `node` with its resolved world transform.
    ///
    /// `transform_updated` is true when the node or any ancestor changed its
    /// transform inputs since the node was last visited.
    fn draw(
        &mut self,
        graph: &SceneGraph,
        node: NodeId,
        world: &Transform3d,
        transform_updated: bool,
    );
}

/// An iterator over the direct children of a node.
///
/// Created by [`SceneGraph::children`].
#[derive(Debug)]
pub struct Children<'a> {
    graph: &'a SceneGraph,
    iter: core::slice::Iter<'a, u32>,
}

impl<'a> Children<'a> {
    pub(crate) fn new(graph: &'a SceneGraph, children: &'a [u32]) -> Self {
        Self {
            graph,
            iter: children.iter(),
        }
    }
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        self.iter.next().map(|&idx| self.graph.id_at(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl ExactSizeIterator for Children<'_> {}

/// Counters describing one visit pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VisitStats {
    /// Nodes handed to the renderer.
    pub drawn: usize,
    /// Hidden nodes whose subtrees were skipped.
    pub hidden: usize,
    /// Drawn nodes whose transform was reported as updated.
    pub transform_updated: usize,
}

struct Pass<'r, 't, 'a> {
    renderer: &'r mut dyn Renderer,
    tracer: &'t mut Tracer<'a>,
    frame_index: u64,
    stats: VisitStats,
}

impl SceneGraph {
    /// Visits the subtree rooted at `root`, drawing every visible node.
    ///
    /// If `root` has a parent, the parent's world transform is used as the
    /// starting point, and a change on any ancestor that has not been drawn
    /// yet counts as inherited.
    pub fn visit(&mut self, root: NodeId, renderer: &mut dyn Renderer) -> VisitStats {
        self.visit_traced(root, renderer, &mut Tracer::none())
    }

    /// Like [`visit`](Self::visit), reporting progress to `tracer`.
    pub fn visit_traced(
        &mut self,
        root: NodeId,
        renderer: &mut dyn Renderer,
        tracer: &mut Tracer<'_>,
    ) -> VisitStats {
        self.validate(root);
        self.fold_transform_marks();
        let (parent_world, parent_updated) = match self.parent(root) {
            Some(p) => (self.node_to_world_transform(p), self.ancestors_updated(root)),
            None => (Transform3d::IDENTITY, false),
        };
        self.visit_from(root, &parent_world, parent_updated, renderer, tracer)
    }

    /// Visits the subtree rooted at `root` under an explicit parent world
    /// transform and inherited update flag.
    pub fn visit_from(
        &mut self,
        root: NodeId,
        parent_world: &Transform3d,
        parent_updated: bool,
        renderer: &mut dyn Renderer,
        tracer: &mut Tracer<'_>,
    ) -> VisitStats {
        self.validate(root);
        self.frame_index += 1;
        let frame_index = self.frame_index;
        tracer.visit_begin(&VisitBeginEvent { frame_index, root });

        self.fold_transform_marks();

        let mut pass = Pass {
            renderer,
            tracer,
            frame_index,
            stats: VisitStats::default(),
        };
        self.visit_node(root, parent_world, parent_updated, &mut pass);

        let stats = pass.stats;
        pass.tracer.visit_end(&VisitEndEvent { frame_index, stats });
        stats
    }

    /// Returns the number of visit passes run so far.
    #[must_use]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Folds the marks made since the last pass into the per-node flags.
    fn fold_transform_marks(&mut self) {
        let changed: Vec<u32> = self
            .dirty
            .drain(dirty::TRANSFORM)
            .affected()
            .deterministic()
            .run()
            .collect();
        for idx in changed {
            if self.alive[idx as usize] {
                self.transform_updated[idx as usize] = true;
            }
        }
    }

    /// Returns whether any ancestor holds a change it has not yet handed down.
    fn ancestors_updated(&self, id: NodeId) -> bool {
        let mut p = self.parent[id.idx as usize];
        while p != INVALID {
            if self.transform_updated[p as usize] {
                return true;
            }
            p = self.parent[p as usize];
        }
        false
    }

    fn visit_node(
        &mut self,
        id: NodeId,
        parent_world: &Transform3d,
        parent_updated: bool,
        pass: &mut Pass<'_, '_, '_>,
    ) {
        let i = id.idx as usize;
        if !self.display[i].visible {
            // Keep what the parent handed down for when the node is shown.
            self.transform_updated[i] |= parent_updated;
            pass.stats.hidden += 1;
            return;
        }

        let updated = parent_updated || self.transform_updated[i];
        self.transform_updated[i] = false;
        let world = *parent_world * self.node_to_parent_transform(id);

        if self.reorder_dirty[i] {
            self.sort_all_children(id);
            pass.tracer.children_sorted(&ChildrenSortedEvent {
                frame_index: pass.frame_index,
                node: id,
                child_count: self.children[i].len(),
            });
        }

        let snapshot: Vec<NodeId> = self.children(id).collect();
        let split = self.non_negative_start(i);

        for &child in &snapshot[..split] {
            self.visit_child(id, child, &world, updated, pass);
        }

        if self.is_alive(id) {
            self.draw_node(id, &world, updated, pass);
        }

        for &child in &snapshot[split..] {
            self.visit_child(id, child, &world, updated, pass);
        }
    }

    fn visit_child(
        &mut self,
        parent: NodeId,
        child: NodeId,
        world: &Transform3d,
        updated: bool,
        pass: &mut Pass<'_, '_, '_>,
    ) {
        if self.is_alive(child) && self.parent[child.idx as usize] == parent.idx {
            self.visit_node(child, world, updated, pass);
        }
    }

    fn draw_node(
        &mut self,
        id: NodeId,
        world: &Transform3d,
        updated: bool,
        pass: &mut Pass<'_, '_, '_>,
    ) {
        pass.stats.drawn += 1;
        if updated {
            pass.stats.transform_updated += 1;
        }
        #[cfg(feature = "trace-rich")]
        pass.tracer.node_drawn(&crate::trace::NodeDrawEvent {
            frame_index: pass.frame_index,
            node: id,
            transform_updated: updated,
        });

        if self.behavior[id.idx as usize].is_some() {
            let renderer = &mut *pass.renderer;
            self.with_behavior(id, |b, g| b.draw(g, id, renderer, world, updated));
        } else {
            pass.renderer.draw(self, id, world, updated);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::vec;
    use alloc::vec::Vec;

    use kurbo::Point;

    use super::*;
    use crate::node::NodeBehavior;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(NodeId, bool)>,
        worlds: Vec<(NodeId, Transform3d)>,
    }

    impl Recorder {
        fn order(&self) -> Vec<NodeId> {
            self.calls.iter().map(|c| c.0).collect()
        }

        fn updated(&self, id: NodeId) -> bool {
            self.calls
                .iter()
                .find(|c| c.0 == id)
                .map(|c| c.1)
                .expect("node was drawn")
        }
    }

    impl Renderer for Recorder {
        fn draw(&mut self, _: &SceneGraph, node: NodeId, world: &Transform3d, updated: bool) {
            self.calls.push((node, updated));
            self.worlds.push((node, *world));
        }
    }

    fn visit(graph: &mut SceneGraph, root: NodeId) -> Recorder {
        let mut r = Recorder::default();
        graph.visit(root, &mut r);
        r
    }

    #[test]
    fn negative_z_subtree_draws_before_zero() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        graph.on_enter(root);
        let front = graph.create_node();
        let back = graph.create_node();
        let back_child = graph.create_node();
        graph.add_child(back, back_child).unwrap();
        graph.add_child_with(root, front, 0, 0).unwrap();
        graph.add_child_with(root, back, -1, 0).unwrap();

        let r = visit(&mut graph, root);
        assert_eq!(r.order(), vec![back, back_child, root, front]);
    }

    #[test]
    fn hidden_subtree_is_skipped() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.add_child(root, a).unwrap();
        graph.add_child(a, b).unwrap();
        graph.set_visible(a, false);

        let mut r = Recorder::default();
        let stats = graph.visit(root, &mut r);
        assert_eq!(r.order(), vec![root]);
        assert_eq!(stats.drawn, 1);
        assert_eq!(stats.hidden, 1);
    }

    #[test]
    fn world_transform_composes_down_the_tree() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.add_child(root, a).unwrap();
        graph.add_child(a, b).unwrap();
        graph.set_position(a, Point::new(10.0, 0.0));
        graph.set_scale(a, 2.0);
        graph.set_position(b, Point::new(5.0, 0.0));

        let r = visit(&mut graph, root);
        let world_b = r.worlds.iter().find(|w| w.0 == b).unwrap().1;
        let p = world_b.transform_point(Point::ZERO);
        assert!((p - Point::new(20.0, 0.0)).hypot() < 1e-9, "{p:?}");
    }

    #[test]
    fn leaf_change_does_not_flag_sibling() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let a = graph.create_node();
        let a1 = graph.create_node();
        let b = graph.create_node();
        let b1 = graph.create_node();
        graph.add_child(root, a).unwrap();
        graph.add_child(a, a1).unwrap();
        graph.add_child(root, b).unwrap();
        graph.add_child(b, b1).unwrap();

        let first = visit(&mut graph, root);
        assert!(first.calls.iter().all(|c| c.1), "everything is new on the first pass");

        let quiet = visit(&mut graph, root);
        assert!(quiet.calls.iter().all(|c| !c.1), "nothing changed");

        graph.set_position(a1, Point::new(1.0, 1.0));
        let r = visit(&mut graph, root);
        assert!(r.updated(a1));
        assert!(!r.updated(a));
        assert!(!r.updated(b));
        assert!(!r.updated(b1), "sibling subtree must stay clean");
    }

    #[test]
    fn ancestor_change_flags_whole_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let a = graph.create_node();
        let a1 = graph.create_node();
        let b = graph.create_node();
        graph.add_child(root, a).unwrap();
        graph.add_child(a, a1).unwrap();
        graph.add_child(root, b).unwrap();
        let _ = visit(&mut graph, root);

        graph.set_rotation(a, 45.0);
        let r = visit(&mut graph, root);
        assert!(r.updated(a));
        assert!(r.updated(a1));
        assert!(!r.updated(root));
        assert!(!r.updated(b));
    }

    #[test]
    fn mark_on_hidden_node_survives_until_drawn() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let a = graph.create_node();
        graph.add_child(root, a).unwrap();
        let _ = visit(&mut graph, root);

        graph.set_visible(a, false);
        graph.set_position(a, Point::new(3.0, 0.0));
        let hidden = visit(&mut graph, root);
        assert_eq!(hidden.order(), vec![root]);

        graph.set_visible(a, true);
        let r = visit(&mut graph, root);
        assert!(r.updated(a));
    }

    struct RemoveSibling(NodeId);

    impl NodeBehavior for RemoveSibling {
        fn draw(
            &mut self,
            graph: &mut SceneGraph,
            node: NodeId,
            renderer: &mut dyn Renderer,
            world: &Transform3d,
            updated: bool,
        ) {
            renderer.draw(graph, node, world, updated);
            graph.remove_from_parent(self.0, true).unwrap();
        }
    }

    #[test]
    fn sibling_removed_mid_visit_is_skipped() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let victim = graph.create_node();
        let killer = graph.create_node_with(Box::new(RemoveSibling(victim)));
        let survivor = graph.create_node();
        graph.add_child(root, killer).unwrap();
        graph.add_child(root, victim).unwrap();
        graph.add_child(root, survivor).unwrap();

        let r = visit(&mut graph, root);
        assert_eq!(r.order(), vec![root, killer, survivor]);
        assert_eq!(graph.children(root).collect::<Vec<_>>(), vec![killer, survivor]);
    }

    struct DestroySelf;

    impl NodeBehavior for DestroySelf {
        fn draw(&mut self, graph: &mut SceneGraph, node: NodeId, _: &mut dyn Renderer, _: &Transform3d, _: bool) {
            graph.destroy_node(node).unwrap();
        }
    }

    #[test]
    fn node_destroying_itself_mid_visit_drops_its_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let doomed = graph.create_node_with(Box::new(DestroySelf));
        let orphan = graph.create_node();
        let next = graph.create_node();
        graph.add_child(root, doomed).unwrap();
        graph.add_child(doomed, orphan).unwrap();
        graph.add_child(root, next).unwrap();

        let r = visit(&mut graph, root);
        assert_eq!(r.order(), vec![root, next]);
        assert!(!graph.is_alive(doomed));
        assert!(!graph.is_alive(orphan));
    }

    #[test]
    fn visiting_a_subtree_uses_parent_world() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let a = graph.create_node();
        graph.add_child(root, a).unwrap();
        graph.set_position(root, Point::new(7.0, 0.0));

        let r = visit(&mut graph, a);
        let p = r.worlds[0].1.transform_point(Point::ZERO);
        assert!((p - Point::new(7.0, 0.0)).hypot() < 1e-9, "{p:?}");
        assert_eq!(graph.frame_index(), 1);
    }

    #[test]
    fn ancestor_move_while_hidden_is_reported_when_shown() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let a = graph.create_node();
        let a1 = graph.create_node();
        graph.add_child(root, a).unwrap();
        graph.add_child(a, a1).unwrap();
        let _ = visit(&mut graph, root);

        graph.set_visible(a, false);
        graph.set_position(root, Point::new(50.0, 0.0));
        let hidden = visit(&mut graph, root);
        assert!(hidden.updated(root));
        assert_eq!(hidden.order(), vec![root]);

        graph.set_visible(a, true);
        let r = visit(&mut graph, root);
        assert!(!r.updated(root), "root already reported its move");
        assert!(r.updated(a), "a moved with root while hidden");
        assert!(r.updated(a1), "the change reaches a's subtree");

        let quiet = visit(&mut graph, root);
        assert!(quiet.calls.iter().all(|c| !c.1), "reported once");
    }

    #[test]
    fn subtree_visit_inherits_pending_ancestor_change() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let a = graph.create_node();
        graph.add_child(root, a).unwrap();
        let _ = visit(&mut graph, root);

        graph.set_position(root, Point::new(5.0, 0.0));
        let r = visit(&mut graph, a);
        assert!(r.updated(a), "a's world moved with root");

        let quiet = visit(&mut graph, a);
        assert!(quiet.updated(a), "root has not been drawn since it moved");
        let _ = visit(&mut graph, root);
        let settled = visit(&mut graph, a);
        assert!(!settled.updated(a));
    }

    #[test]
    fn explicit_parent_change_flags_every_drawn_node() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let a = graph.create_node();
        let a1 = graph.create_node();
        graph.add_child(root, a).unwrap();
        graph.add_child(a, a1).unwrap();
        let _ = visit(&mut graph, root);

        let parent_world = Transform3d::from_translation(3.0, 0.0, 0.0);
        let mut r = Recorder::default();
        let stats = graph.visit_from(root, &parent_world, true, &mut r, &mut Tracer::none());
        assert_eq!(stats.drawn, 3);
        assert_eq!(stats.transform_updated, 3);
        assert!(r.calls.iter().all(|c| c.1), "inherited flag reaches every node");
        let p = r.worlds[2].1.transform_point(Point::ZERO);
        assert!((p - Point::new(3.0, 0.0)).hypot() < 1e-9, "{p:?}");

        let mut quiet = Recorder::default();
        graph.visit_from(root, &parent_world, false, &mut quiet, &mut Tracer::none());
        assert!(quiet.calls.iter().all(|c| !c.1), "nothing changed underneath");
    }
}
