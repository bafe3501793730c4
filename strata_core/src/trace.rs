// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for the visit pass.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! traversal calls at each stage. All method bodies default to no-ops, so
//! implementing only the events you care about is fine.
//!
//! [`Tracer`] wraps an optional `&mut dyn TraceSink`. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! # Crate features
//!
//! - `trace` — enables the `Tracer` method bodies (one branch per call).
//! - `trace-rich` (implies `trace`) — gates [`NodeDrawEvent`] plus the
//!   corresponding `TraceSink` method.

use crate::node::{NodeId, VisitStats};

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when a visit pass starts.
#[derive(Clone, Copy, Debug)]
pub struct VisitBeginEvent {
    /// Pass counter.
    pub frame_index: u64,
    /// Subtree root being visited.
    pub root: NodeId,
}

/// Emitted when a node's children are re-sorted during a pass.
#[derive(Clone, Copy, Debug)]
pub struct ChildrenSortedEvent {
    /// Pass counter.
    pub frame_index: u64,
    /// Node whose children were sorted.
    pub node: NodeId,
    /// Number of children after sorting.
    pub child_count: usize,
}

/// Emitted when a visit pass ends.
#[derive(Clone, Copy, Debug)]
pub struct VisitEndEvent {
    /// Pass counter.
    pub frame_index: u64,
    /// Counters for the pass.
    pub stats: VisitStats,
}

/// Emitted for every node handed to the renderer.
#[cfg(feature = "trace-rich")]
#[derive(Clone, Copy, Debug)]
pub struct NodeDrawEvent {
    /// Pass counter.
    pub frame_index: u64,
    /// Node being drawn.
    pub node: NodeId,
    /// Whether its world transform changed since it was last drawn.
    pub transform_updated: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the visit pass.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a pass starts.
    fn on_visit_begin(&mut self, e: &VisitBeginEvent) {
        _ = e;
    }

    /// Called when a node's children are re-sorted.
    fn on_children_sorted(&mut self, e: &ChildrenSortedEvent) {
        _ = e;
    }

    /// Called when a pass ends.
    fn on_visit_end(&mut self, e: &VisitEndEvent) {
        _ = e;
    }

    /// Called once per drawn node (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    fn on_node_draw(&mut self, e: &NodeDrawEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing. When
/// **on**, each method checks the inner `Option` (one branch) before
/// dispatching to the sink.
pub struct Tracer<'a> {
    #[cfg(feature = "trace")]
    sink: Option<&'a mut dyn TraceSink>,
    #[cfg(not(feature = "trace"))]
    _marker: core::marker::PhantomData<&'a mut dyn TraceSink>,
}

impl core::fmt::Debug for Tracer<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl<'a> Tracer<'a> {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: &'a mut dyn TraceSink) -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: Some(sink) }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        #[cfg(feature = "trace")]
        {
            Self { sink: None }
        }
        #[cfg(not(feature = "trace"))]
        {
            Self {
                _marker: core::marker::PhantomData,
            }
        }
    }

    /// Emits a [`VisitBeginEvent`].
    #[inline]
    pub fn visit_begin(&mut self, e: &VisitBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_visit_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ChildrenSortedEvent`].
    #[inline]
    pub fn children_sorted(&mut self, e: &ChildrenSortedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_children_sorted(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`VisitEndEvent`].
    #[inline]
    pub fn visit_end(&mut self, e: &VisitEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_visit_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`NodeDrawEvent`] (requires `trace-rich` feature).
    #[cfg(feature = "trace-rich")]
    #[inline]
    pub fn node_drawn(&mut self, e: &NodeDrawEvent) {
        if let Some(s) = &mut self.sink {
            s.on_node_draw(e);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
