// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render-plan definitions and damage tracking for strata.
//!
//! This crate provides the intermediate representation between a
//! [`strata_core`] visit pass and backend-specific rendering. It defines:
//!
//! - [`RenderItem`] — a single draw command in the render plan
//! - [`RenderPlan`] — draw commands for one pass in global Z render order
//! - [`DamageRegion`] — spatial damage tracking for partial re-rendering
//! - [`DamageTracker`] — damage between consecutive plans

#![no_std]
#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

mod damage;
mod plan;

pub use damage::{DamageRegion, DamageTracker};
pub use plan::{RenderItem, RenderPlan};
