// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Enter/exit state machine and collaborator forwarding.
//!
//! A node is either inert or running. It becomes running when it is entered
//! (added under a running parent, or entered explicitly as a scene root) and
//! inert again when it exits. Both transitions propagate top-down: the node
//! itself first, then each of its children.
//!
//! The graph performs the base behavior of every transition itself and calls
//! the node's [`NodeBehavior`] hook from inside it:
//!
//! ```text
//!   on_enter  : running = true, resume collaborators ─► hook ─► children
//!   on_exit   : hook ─► pause collaborators, running = false ─► children
//!   cleanup   : hook ─► stop actions, unschedule, drop listeners ─► children
//! ```
//!
//! A hook therefore cannot skip the pause/resume contract with the scheduler,
//! action runner and event dispatcher.

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::id::NodeId;
use super::store::SceneGraph;
use super::traverse::Renderer;
use crate::collab::{ActionId, CallbackKey, Repeat};
use crate::transform::Transform3d;

/// Overridable per-node hooks.
///
/// Every method has a default. Hooks receive the whole graph and may mutate
/// it, including removing or destroying the node they are called for. While
/// a hook runs the behavior is detached from its node; installing a new
/// behavior from inside a hook replaces the running one.
///
/// A hook that triggers another hook of its own node (for instance `update`
/// removing the node from its parent) does not re-enter the behavior. The
/// nested hooks are queued and delivered, in order, right after the running
/// hook returns. By then the node may have been destroyed, so deferred hooks
/// should check [`SceneGraph::is_alive`] before touching it.
pub trait NodeBehavior {
    /// Called after the node has become running, before its children enter.
    fn on_enter(&mut self, graph: &mut SceneGraph, node: NodeId) {
        _ = (graph, node);
    }

    /// Called when the transition that brought the node in has finished.
    fn on_enter_transition_did_finish(&mut self, graph: &mut SceneGraph, node: NodeId) {
        _ = (graph, node);
    }

    /// Called when the node begins to exit, before its collaborators pause.
    fn on_exit(&mut self, graph: &mut SceneGraph, node: NodeId) {
        _ = (graph, node);
    }

    /// Called when a transition that will remove the node starts.
    fn on_exit_transition_did_start(&mut self, graph: &mut SceneGraph, node: NodeId) {
        _ = (graph, node);
    }

    /// Called before the node's actions and callbacks are released.
    fn on_cleanup(&mut self, graph: &mut SceneGraph, node: NodeId) {
        _ = (graph, node);
    }

    /// Per-frame update tick, `dt` in seconds.
    fn update(&mut self, graph: &mut SceneGraph, node: NodeId, dt: f64) {
        _ = (graph, node, dt);
    }

    /// Emits the node's draw call.
    ///
    /// The default forwards straight to the renderer.
    fn draw(
        &mut self,
        graph: &mut SceneGraph,
        node: NodeId,
        renderer: &mut dyn Renderer,
        world: &Transform3d,
        transform_updated: bool,
    ) {
        renderer.draw(graph, node, world, transform_updated);
    }
}

/// A lifecycle or tick hook, recorded so it can be delivered later.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Hook {
    Enter,
    EnterTransitionDidFinish,
    Exit,
    ExitTransitionDidStart,
    Cleanup,
    Update(f64),
}

impl Hook {
    fn call(self, behavior: &mut dyn NodeBehavior, graph: &mut SceneGraph, node: NodeId) {
        match self {
            Self::Enter => behavior.on_enter(graph, node),
            Self::EnterTransitionDidFinish => behavior.on_enter_transition_did_finish(graph, node),
            Self::Exit => behavior.on_exit(graph, node),
            Self::ExitTransitionDidStart => behavior.on_exit_transition_did_start(graph, node),
            Self::Cleanup => behavior.on_cleanup(graph, node),
            Self::Update(dt) => behavior.update(graph, node, dt),
        }
    }
}

impl SceneGraph {
    /// Installs or replaces the node's behavior.
    pub fn set_behavior(&mut self, id: NodeId, behavior: Box<dyn NodeBehavior>) {
        self.validate(id);
        self.behavior[id.idx as usize] = Some(behavior);
    }

    /// Removes and returns the node's behavior.
    pub fn take_behavior(&mut self, id: NodeId) -> Option<Box<dyn NodeBehavior>> {
        self.validate(id);
        self.behavior[id.idx as usize].take()
    }

    /// Returns whether the node is running.
    #[must_use]
    pub fn is_running(&self, id: NodeId) -> bool {
        self.validate(id);
        self.running[id.idx as usize]
    }

    /// Returns whether the node's enter transition has finished.
    #[must_use]
    pub fn is_transition_finished(&self, id: NodeId) -> bool {
        self.validate(id);
        self.transition_finished[id.idx as usize]
    }

    // -- Transitions --

    /// Marks the node running, resumes its collaborators, runs its hook and
    /// enters its children.
    pub fn on_enter(&mut self, id: NodeId) {
        self.validate(id);
        let i = id.idx as usize;
        self.running[i] = true;
        self.transition_finished[i] = false;
        self.resume(id);
        self.run_hook(id, Hook::Enter);
        self.for_each_child(id, Self::on_enter);
    }

    /// Records that the enter transition finished, then tells the children.
    pub fn on_enter_transition_did_finish(&mut self, id: NodeId) {
        self.validate(id);
        self.transition_finished[id.idx as usize] = true;
        self.run_hook(id, Hook::EnterTransitionDidFinish);
        self.for_each_child(id, Self::on_enter_transition_did_finish);
    }

    /// Announces an upcoming exit to the node and its children.
    pub fn on_exit_transition_did_start(&mut self, id: NodeId) {
        self.validate(id);
        self.run_hook(id, Hook::ExitTransitionDidStart);
        self.for_each_child(id, Self::on_exit_transition_did_start);
    }

    /// Runs the node's hook, pauses its collaborators, marks it inert and
    /// exits its children.
    pub fn on_exit(&mut self, id: NodeId) {
        self.validate(id);
        self.run_hook(id, Hook::Exit);
        if !self.is_alive(id) {
            return;
        }
        self.pause(id);
        self.running[id.idx as usize] = false;
        self.for_each_child(id, Self::on_exit);
    }

    /// Stops the node's actions, unschedules its callbacks and drops its
    /// listeners, for the whole subtree.
    pub fn cleanup(&mut self, id: NodeId) {
        self.validate(id);
        self.run_hook(id, Hook::Cleanup);
        if !self.is_alive(id) {
            return;
        }
        self.collab.actions.stop_all_actions(id);
        self.collab.scheduler.unschedule_all(id);
        self.collab.events.remove_listeners(id);
        self.for_each_child(id, Self::cleanup);
    }

    /// Suspends the node's callbacks, actions and listeners.
    pub fn pause(&mut self, id: NodeId) {
        self.validate(id);
        self.collab.scheduler.pause_target(id);
        self.collab.actions.pause_target(id);
        self.collab.events.pause_listeners(id);
    }

    /// Reactivates the node's callbacks, actions and listeners.
    pub fn resume(&mut self, id: NodeId) {
        self.validate(id);
        self.collab.scheduler.resume_target(id);
        self.collab.actions.resume_target(id);
        self.collab.events.resume_listeners(id);
    }

    /// Delivers one update tick to the node's behavior.
    pub fn update(&mut self, id: NodeId, dt: f64) {
        self.validate(id);
        self.run_hook(id, Hook::Update(dt));
    }

    // -- Scheduler forwarding --

    /// Registers the node's per-frame update.
    pub fn schedule_update(&mut self, id: NodeId, priority: i32) {
        let paused = !self.is_running(id);
        self.collab.scheduler.schedule_update(id, priority, paused);
    }

    /// Removes the node's per-frame update.
    pub fn unschedule_update(&mut self, id: NodeId) {
        self.validate(id);
        self.collab.scheduler.unschedule_update(id);
    }

    /// Registers a periodic callback. `interval` and `delay` are in seconds.
    pub fn schedule(
        &mut self,
        id: NodeId,
        callback: CallbackKey,
        interval: f64,
        repeat: Repeat,
        delay: f64,
    ) {
        let paused = !self.is_running(id);
        self.collab
            .scheduler
            .schedule(id, callback, interval, repeat, delay, paused);
    }

    /// Registers a callback that fires once after `delay` seconds.
    pub fn schedule_once(&mut self, id: NodeId, callback: CallbackKey, delay: f64) {
        self.schedule(id, callback, 0.0, Repeat::Times(0), delay);
    }

    /// Removes one periodic callback.
    pub fn unschedule(&mut self, id: NodeId, callback: CallbackKey) {
        self.validate(id);
        self.collab.scheduler.unschedule(id, callback);
    }

    /// Removes every callback and update registered for the node.
    pub fn unschedule_all(&mut self, id: NodeId) {
        self.validate(id);
        self.collab.scheduler.unschedule_all(id);
    }

    /// Returns whether the callback is registered for the node.
    #[must_use]
    pub fn is_scheduled(&self, id: NodeId, callback: CallbackKey) -> bool {
        self.validate(id);
        self.collab.scheduler.is_scheduled(id, callback)
    }

    // -- Action forwarding --

    /// Starts an action targeting the node.
    pub fn run_action(&mut self, id: NodeId, action: ActionId) {
        let paused = !self.is_running(id);
        self.collab.actions.run_action(id, action, paused);
    }

    /// Stops one action.
    pub fn stop_action(&mut self, id: NodeId, action: ActionId) {
        self.validate(id);
        self.collab.actions.stop_action(id, action);
    }

    /// Stops every action targeting the node.
    pub fn stop_all_actions(&mut self, id: NodeId) {
        self.validate(id);
        self.collab.actions.stop_all_actions(id);
    }

    /// Returns a running action on the node carrying `tag`.
    #[must_use]
    pub fn action_by_tag(&self, id: NodeId, tag: i32) -> Option<ActionId> {
        self.validate(id);
        self.collab.actions.action_by_tag(id, tag)
    }

    /// Stops the first running action on the node carrying `tag`.
    pub fn stop_action_by_tag(&mut self, id: NodeId, tag: i32) {
        self.validate(id);
        self.collab.actions.stop_action_by_tag(id, tag);
    }

    /// Returns how many actions target the node.
    #[must_use]
    pub fn running_action_count(&self, id: NodeId) -> usize {
        self.validate(id);
        self.collab.actions.running_action_count(id)
    }

    // -- Internal helpers --

    /// Delivers `hook` to the node's behavior, or queues it if one of the
    /// node's hooks is already running.
    fn run_hook(&mut self, id: NodeId, hook: Hook) {
        if self.behavior[id.idx as usize].is_none() {
            if self.hooks_running.contains(&id) {
                self.deferred_hooks.push((id, hook));
            }
            return;
        }
        self.with_behavior(id, |b, g| hook.call(b, g, id));
    }

    /// Calls `f` with the node's behavior detached from its slot, then
    /// delivers any hooks of the same node queued meanwhile.
    ///
    /// The behavior is put back only if the node is still alive and no other
    /// behavior was installed meanwhile.
    pub(crate) fn with_behavior(
        &mut self,
        id: NodeId,
        f: impl FnOnce(&mut dyn NodeBehavior, &mut Self),
    ) {
        let i = id.idx as usize;
        let Some(mut behavior) = self.behavior[i].take() else {
            return;
        };
        self.hooks_running.push(id);
        f(behavior.as_mut(), self);
        while let Some(pos) = self.deferred_hooks.iter().position(|&(n, _)| n == id) {
            let (_, hook) = self.deferred_hooks.remove(pos);
            hook.call(behavior.as_mut(), self, id);
        }
        self.hooks_running.pop();
        if self.is_alive(id) && self.behavior[i].is_none() {
            self.behavior[i] = Some(behavior);
        }
    }

    /// Applies `f` to a snapshot of the node's children, skipping any that
    /// were destroyed or moved away by an earlier call.
    fn for_each_child(&mut self, id: NodeId, mut f: impl FnMut(&mut Self, NodeId)) {
        if !self.is_alive(id) {
            return;
        }
        let snapshot: Vec<NodeId> = self.children(id).collect();
        for child in snapshot {
            if self.is_alive(child) && self.parent[child.idx as usize] == id.idx {
                f(self, child);
            }
        }
    }
}
