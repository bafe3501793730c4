// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scene-graph nodes with a transform hierarchy and deterministic draw order.
//!
//! `strata_core` provides the node tree at the heart of a 2D/3D renderer. It
//! is `no_std` compatible (with `alloc`) and stores nodes in struct-of-arrays
//! layout behind generational handles.
//!
//! # Architecture
//!
//! A frame drives the graph from the outside; the graph calls out to the
//! systems it does not own:
//!
//! ```text
//!   setters ──► TransformState ──► TransformCache (lazy)
//!      │
//!      └──► dirty::TRANSFORM ──┐
//!                              ▼
//!   SceneGraph::visit() ──► sort children ──► Renderer::draw()
//!                                                  │
//!                                                  ▼
//!                                   DrawQueue (global Z) ──► backend
//!
//!   add_child / remove_child ──► on_enter / on_exit ──► Scheduler,
//!                                                       ActionRunner,
//!                                                       EventDispatcher
//! ```
//!
//! **[`node`]** — The [`SceneGraph`](node::SceneGraph) arena: hierarchy
//! mutation, local Z-order sorting, coordinate spaces, display state,
//! lifecycle transitions and the visit pass.
//!
//! **[`transform`]** — Column-major 4×4 affine transform used for local and
//! world matrices.
//!
//! **[`dirty`]** — Dirty-channel constants for `understory_dirty`.
//!
//! **[`collab`]** — Traits for the scheduler, action runner and event
//! dispatcher, with no-op implementations.
//!
//! **[`draw`]** — [`DrawQueue`](draw::DrawQueue), a renderer that records
//! draw calls and orders them by global Z.
//!
//! **[`error`]** — [`NodeError`](error::NodeError) and its
//! [`ErrorKind`](error::ErrorKind) classification.
//!
//! **[`trace`]** — [`TraceSink`](trace::TraceSink) trait and event types for
//! visit-pass instrumentation, with a zero-overhead
//! [`Tracer`](trace::Tracer) wrapper.
//!
//! # Crate features
//!
//! - `std` (disabled by default): Enables `std` support in dependencies.
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).
//! - `trace-rich` (disabled by default, implies `trace`): Gates per-node draw
//!   events.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

extern crate alloc;

pub mod collab;
pub mod dirty;
pub mod draw;
pub mod error;
pub mod node;
pub mod trace;
pub mod transform;
