// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Contracts for the systems a scene graph drives but does not own.
//!
//! A node participates in several engine subsystems that live outside this
//! crate. Each is reached through a narrow trait:
//!
//! - **Scheduler** — periodic callbacks and per-frame updates
//!   ([`Scheduler`]).
//! - **Action runner** — time-based animations that mutate node transforms
//!   ([`ActionRunner`]).
//! - **Event dispatcher** — input and lifecycle listeners
//!   ([`EventDispatcher`]).
//! - **Renderer** — receives one draw call per visible node during a visit
//!   pass ([`Renderer`](crate::node::Renderer), defined next to the
//!   traversal).
//!
//! The graph holds its scheduler, action runner and event dispatcher in a
//! [`Collaborators`] bundle supplied at construction, and calls them
//! symmetrically at the enter/exit boundaries of the node lifecycle:
//!
//! ```text
//!   on_enter ──► resume_target / resume_listeners
//!   on_exit  ──► pause_target  / pause_listeners
//!   cleanup  ──► stop_all_actions / unschedule_all / remove_listeners
//! ```
//!
//! Registrations made for a node that is not running are forwarded with
//! `paused = true`, so nothing ticks until the node enters a running tree.

use alloc::boxed::Box;
use core::fmt;

use crate::node::NodeId;

/// Identifies one periodic callback registered for a node.
///
/// Keys are chosen by the caller; the scheduler treats them as opaque.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CallbackKey(pub u32);

/// Identifies an action handed to the [`ActionRunner`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActionId(pub u32);

/// How many times a scheduled callback fires after its first invocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Repeat {
    /// Fire until unscheduled.
    Forever,
    /// Fire this many additional times.
    Times(u32),
}

/// Periodic-callback scheduler driven by the engine's frame tick.
pub trait Scheduler {
    /// Registers the node's per-frame update with the given priority
    /// (lower runs first).
    fn schedule_update(&mut self, node: NodeId, priority: i32, paused: bool);

    /// Removes the node's per-frame update.
    fn unschedule_update(&mut self, node: NodeId);

    /// Registers a periodic callback. `interval` and `delay` are in seconds.
    fn schedule(
        &mut self,
        node: NodeId,
        callback: CallbackKey,
        interval: f64,
        repeat: Repeat,
        delay: f64,
        paused: bool,
    );

    /// Removes one periodic callback.
    fn unschedule(&mut self, node: NodeId, callback: CallbackKey);

    /// Removes every callback and update registered for the node.
    fn unschedule_all(&mut self, node: NodeId);

    /// Returns whether the callback is currently registered for the node.
    fn is_scheduled(&self, node: NodeId, callback: CallbackKey) -> bool;

    /// Suspends all of the node's callbacks without removing them.
    fn pause_target(&mut self, node: NodeId);

    /// Reactivates callbacks suspended by [`pause_target`](Self::pause_target).
    fn resume_target(&mut self, node: NodeId);
}

/// Runs actions that mutate node properties over time.
pub trait ActionRunner {
    /// Starts an action targeting the node.
    fn run_action(&mut self, node: NodeId, action: ActionId, paused: bool);

    /// Stops one action.
    fn stop_action(&mut self, node: NodeId, action: ActionId);

    /// Stops every action targeting the node.
    fn stop_all_actions(&mut self, node: NodeId);

    /// Returns a running action on the node carrying `tag`.
    fn action_by_tag(&self, node: NodeId, tag: i32) -> Option<ActionId>;

    /// Stops the first running action on the node carrying `tag`.
    fn stop_action_by_tag(&mut self, node: NodeId, tag: i32);

    /// Returns how many actions currently target the node.
    fn running_action_count(&self, node: NodeId) -> usize;

    /// Suspends the node's actions.
    fn pause_target(&mut self, node: NodeId);

    /// Reactivates the node's actions.
    fn resume_target(&mut self, node: NodeId);
}

/// Delivers input and lifecycle events to listeners associated with nodes.
pub trait EventDispatcher {
    /// Stops delivering events to the node's listeners.
    fn pause_listeners(&mut self, node: NodeId);

    /// Resumes delivery to the node's listeners.
    fn resume_listeners(&mut self, node: NodeId);

    /// Drops every listener associated with the node.
    fn remove_listeners(&mut self, node: NodeId);
}

/// A [`Scheduler`] that ignores every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopScheduler;

impl Scheduler for NoopScheduler {
    fn schedule_update(&mut self, _: NodeId, _: i32, _: bool) {}
    fn unschedule_update(&mut self, _: NodeId) {}
    fn schedule(&mut self, _: NodeId, _: CallbackKey, _: f64, _: Repeat, _: f64, _: bool) {}
    fn unschedule(&mut self, _: NodeId, _: CallbackKey) {}
    fn unschedule_all(&mut self, _: NodeId) {}
    fn is_scheduled(&self, _: NodeId, _: CallbackKey) -> bool {
        false
    }
    fn pause_target(&mut self, _: NodeId) {}
    fn resume_target(&mut self, _: NodeId) {}
}

/// An [`ActionRunner`] that ignores every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopActionRunner;

impl ActionRunner for NoopActionRunner {
    fn run_action(&mut self, _: NodeId, _: ActionId, _: bool) {}
    fn stop_action(&mut self, _: NodeId, _: ActionId) {}
    fn stop_all_actions(&mut self, _: NodeId) {}
    fn action_by_tag(&self, _: NodeId, _: i32) -> Option<ActionId> {
        None
    }
    fn stop_action_by_tag(&mut self, _: NodeId, _: i32) {}
    fn running_action_count(&self, _: NodeId) -> usize {
        0
    }
    fn pause_target(&mut self, _: NodeId) {}
    fn resume_target(&mut self, _: NodeId) {}
}

/// An [`EventDispatcher`] that ignores every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopEventDispatcher;

impl EventDispatcher for NoopEventDispatcher {
    fn pause_listeners(&mut self, _: NodeId) {}
    fn resume_listeners(&mut self, _: NodeId) {}
    fn remove_listeners(&mut self, _: NodeId) {}
}

/// The external systems a [`SceneGraph`](crate::node::SceneGraph) talks to.
pub struct Collaborators {
    /// Periodic-callback scheduler.
    pub scheduler: Box<dyn Scheduler>,
    /// Action runner.
    pub actions: Box<dyn ActionRunner>,
    /// Event dispatcher.
    pub events: Box<dyn EventDispatcher>,
}

impl Default for Collaborators {
    fn default() -> Self {
        Self {
            scheduler: Box::new(NoopScheduler),
            actions: Box::new(NoopActionRunner),
            events: Box::new(NoopEventDispatcher),
        }
    }
}

impl fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Recording collaborator doubles shared by the crate's tests.
#[cfg(test)]
pub(crate) mod testing {
    use alloc::boxed::Box;
    use alloc::rc::Rc;
    use alloc::vec::Vec;
    use core::cell::RefCell;

    use super::*;

    /// One observed collaborator call.
    #[derive(Clone, Copy, Debug, PartialEq)]
    pub(crate) enum CollabEvent {
        ScheduleUpdate(NodeId, i32, bool),
        UnscheduleUpdate(NodeId),
        Schedule(NodeId, CallbackKey, bool),
        Unschedule(NodeId, CallbackKey),
        UnscheduleAll(NodeId),
        SchedulerPause(NodeId),
        SchedulerResume(NodeId),
        RunAction(NodeId, ActionId, bool),
        StopAction(NodeId, ActionId),
        StopAllActions(NodeId),
        StopActionByTag(NodeId, i32),
        ActionsPause(NodeId),
        ActionsResume(NodeId),
        ListenersPause(NodeId),
        ListenersResume(NodeId),
        ListenersRemove(NodeId),
    }

    pub(crate) type Log = Rc<RefCell<Vec<CollabEvent>>>;

    struct Recorder(Log);

    impl Recorder {
        fn push(&self, e: CollabEvent) {
            self.0.borrow_mut().push(e);
        }

        /// Replays the log to find the actions still running on `node`.
        fn running(&self, node: NodeId) -> Vec<ActionId> {
            let mut running = Vec::new();
            for e in self.0.borrow().iter() {
                match *e {
                    CollabEvent::RunAction(n, a, _) if n == node => running.push(a),
                    CollabEvent::StopAction(n, a) if n == node => {
                        running.retain(|&r| r != a);
                    }
                    CollabEvent::StopActionByTag(n, tag) if n == node => {
                        if let Some(pos) = running.iter().position(|&r| tag_of(r) == tag) {
                            running.remove(pos);
                        }
                    }
                    CollabEvent::StopAllActions(n) if n == node => running.clear(),
                    _ => {}
                }
            }
            running
        }
    }

    /// Recorded actions are tagged with their id.
    fn tag_of(action: ActionId) -> i32 {
        i32::try_from(action.0).unwrap_or(i32::MAX)
    }

    impl Scheduler for Recorder {
        fn schedule_update(&mut self, node: NodeId, priority: i32, paused: bool) {
            self.push(CollabEvent::ScheduleUpdate(node, priority, paused));
        }
        fn unschedule_update(&mut self, node: NodeId) {
            self.push(CollabEvent::UnscheduleUpdate(node));
        }
        fn schedule(&mut self, node: NodeId, cb: CallbackKey, _: f64, _: Repeat, _: f64, paused: bool) {
            self.push(CollabEvent::Schedule(node, cb, paused));
        }
        fn unschedule(&mut self, node: NodeId, cb: CallbackKey) {
            self.push(CollabEvent::Unschedule(node, cb));
        }
        fn unschedule_all(&mut self, node: NodeId) {
            self.push(CollabEvent::UnscheduleAll(node));
        }
        fn is_scheduled(&self, node: NodeId, cb: CallbackKey) -> bool {
            let log = self.0.borrow();
            let mut scheduled = false;
            for e in log.iter() {
                match *e {
                    CollabEvent::Schedule(n, k, _) if n == node && k == cb => scheduled = true,
                    CollabEvent::Unschedule(n, k) if n == node && k == cb => scheduled = false,
                    CollabEvent::UnscheduleAll(n) if n == node => scheduled = false,
                    _ => {}
                }
            }
            scheduled
        }
        fn pause_target(&mut self, node: NodeId) {
            self.push(CollabEvent::SchedulerPause(node));
        }
        fn resume_target(&mut self, node: NodeId) {
            self.push(CollabEvent::SchedulerResume(node));
        }
    }

    impl ActionRunner for Recorder {
        fn run_action(&mut self, node: NodeId, action: ActionId, paused: bool) {
            self.push(CollabEvent::RunAction(node, action, paused));
        }
        fn stop_action(&mut self, node: NodeId, action: ActionId) {
            self.push(CollabEvent::StopAction(node, action));
        }
        fn stop_all_actions(&mut self, node: NodeId) {
            self.push(CollabEvent::StopAllActions(node));
        }
        fn action_by_tag(&self, node: NodeId, tag: i32) -> Option<ActionId> {
            self.running(node).into_iter().find(|a| tag_of(*a) == tag)
        }
        fn stop_action_by_tag(&mut self, node: NodeId, tag: i32) {
            self.push(CollabEvent::StopActionByTag(node, tag));
        }
        fn running_action_count(&self, node: NodeId) -> usize {
            self.running(node).len()
        }
        fn pause_target(&mut self, node: NodeId) {
            self.push(CollabEvent::ActionsPause(node));
        }
        fn resume_target(&mut self, node: NodeId) {
            self.push(CollabEvent::ActionsResume(node));
        }
    }

    impl EventDispatcher for Recorder {
        fn pause_listeners(&mut self, node: NodeId) {
            self.push(CollabEvent::ListenersPause(node));
        }
        fn resume_listeners(&mut self, node: NodeId) {
            self.push(CollabEvent::ListenersResume(node));
        }
        fn remove_listeners(&mut self, node: NodeId) {
            self.push(CollabEvent::ListenersRemove(node));
        }
    }

    /// Returns collaborators that append every call to a shared log.
    pub(crate) fn recording() -> (Collaborators, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let collab = Collaborators {
            scheduler: Box::new(Recorder(log.clone())),
            actions: Box::new(Recorder(log.clone())),
            events: Box::new(Recorder(log.clone())),
        };
        (collab, log)
    }
}
