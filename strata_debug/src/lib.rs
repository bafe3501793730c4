// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pretty-printing and JSON scene dumps for strata diagnostics.
//!
//! This crate provides development and post-mortem tooling:
//!
//! - [`pretty::PrettyPrintSink`] — a [`TraceSink`](strata_core::trace::TraceSink)
//!   with human-readable one-line-per-event output.
//! - [`dump::tree_json`] / [`dump::write_tree`] — a JSON snapshot of a
//!   subtree's hierarchy, ordering keys and transform state.

pub mod dump;
pub mod pretty;
