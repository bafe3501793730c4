// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-graph data model.
//!
//! A *node* is an element of a drawable hierarchy. Each node has:
//!
//! - An identity ([`NodeId`]): a generational handle that becomes stale when
//!   the node is destroyed, so a dangling handle is caught at the API instead
//!   of silently aliasing a recycled slot.
//! - Topology: a parent back-link and an owned, ordered child vector.
//! - **Transform state** ([`TransformState`]): position, rotation, scale,
//!   skew, anchor, content size and an optional additional transform. The
//!   node-to-parent matrix and its inverse are cached and recomputed lazily.
//! - **Ordering keys**: a local Z-order among siblings, a global Z-order for
//!   flat render ordering, and an arrival counter used as a stable tie-break.
//! - **Display state**: visibility, opacity and tint with optional cascading
//!   ([`Color3`]).
//! - **Lifecycle**: a running flag driven by enter/exit transitions, with
//!   per-node hooks supplied through [`NodeBehavior`].
//!
//! Nodes are stored in struct-of-arrays layout inside a [`SceneGraph`].
//!
//! # Traversal
//!
//! [`SceneGraph::visit`] walks a subtree in painter's order and hands each
//! visible node to a [`Renderer`] along with its world transform and whether
//! that transform changed since the node was last visited (see
//! [`dirty`](crate::dirty)).

mod display;
mod geometry;
mod hierarchy;
mod id;
mod lifecycle;
mod order;
mod space;
mod store;
mod traverse;

pub use display::Color3;
pub use geometry::TransformState;
pub use id::{BodyId, INVALID, INVALID_TAG, NodeId};
pub use lifecycle::NodeBehavior;
pub use store::SceneGraph;
pub use traverse::{Children, Renderer, VisitStats};
