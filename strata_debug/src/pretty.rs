// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] implements [`TraceSink`] and writes one line per event
//! to a [`Write`](std::io::Write) destination (default: stderr).

use std::io::Write;

use strata_core::trace::{
    ChildrenSortedEvent, NodeDrawEvent, TraceSink, VisitBeginEvent, VisitEndEvent,
};

/// Writes human-readable trace lines to a [`Write`](std::io::Write) destination.
pub struct PrettyPrintSink<W: Write = Box<dyn Write>> {
    writer: W,
    draws: bool,
}

impl<W: Write> std::fmt::Debug for PrettyPrintSink<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrettyPrintSink")
            .field("draws", &self.draws)
            .finish_non_exhaustive()
    }
}

impl PrettyPrintSink {
    /// Creates a sink that writes to stderr.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates a sink that writes to a boxed writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write>) -> Self {
        Self {
            writer,
            draws: false,
        }
    }
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink that writes to the given destination.
    #[must_use]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            draws: false,
        }
    }

    /// Also prints one line per drawn node.
    #[must_use]
    pub fn with_draws(mut self, draws: bool) -> Self {
        self.draws = draws;
        self
    }

    /// Consumes the sink and returns its writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_visit_begin(&mut self, e: &VisitBeginEvent) {
        let _ = writeln!(
            self.writer,
            "[visit:begin] frame={} root={:?}",
            e.frame_index, e.root,
        );
    }

    fn on_children_sorted(&mut self, e: &ChildrenSortedEvent) {
        let _ = writeln!(
            self.writer,
            "[sort] frame={} node={:?} children={}",
            e.frame_index, e.node, e.child_count,
        );
    }

    fn on_visit_end(&mut self, e: &VisitEndEvent) {
        let _ = writeln!(
            self.writer,
            "[visit:end] frame={} drawn={} hidden={} updated={}",
            e.frame_index, e.stats.drawn, e.stats.hidden, e.stats.transform_updated,
        );
    }

    fn on_node_draw(&mut self, e: &NodeDrawEvent) {
        if !self.draws {
            return;
        }
        let updated = if e.transform_updated { "moved" } else { "same" };
        let _ = writeln!(
            self.writer,
            "[draw] frame={} node={:?} {updated}",
            e.frame_index, e.node,
        );
    }
}
