// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! Strata records geometric mutations in an [`understory_dirty`] tracker so
//! that a visit pass can tell which nodes changed since the previous pass.
//!
//! # Propagation semantics
//!
//! [`TRANSFORM`] is marked with the default (local-only) policy: only the
//! node whose position, rotation, scale, skew, anchor, content size or
//! additional transform changed is recorded. Propagation to descendants is
//! the traversal's job; the visit pass ORs each node's own mark with the
//! flag handed down by its parent, so a change is paid for once per dirty
//! ancestor and never marks a sibling subtree.
//!
//! # Consumption
//!
//! [`SceneGraph::visit`](crate::node::SceneGraph::visit) drains the channel
//! at the start of each pass. Marks for nodes that are not reached (hidden
//! subtrees, detached nodes) are kept until a later pass does reach them.

use understory_dirty::Channel;

/// Local transform inputs changed; the node's world transform (and that of
/// its descendants) must be reported as updated on the next visit.
pub const TRANSFORM: Channel = Channel::new(0);
