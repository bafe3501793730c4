// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors returned by scene-graph operations.

use core::fmt;

use crate::node::NodeId;

/// Broad classification of a [`NodeError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller passed a handle or relationship the operation cannot accept.
    InvalidArgument,
    /// The node is in a state that does not permit the request.
    InvalidState,
}

/// Errors from hierarchy mutations and contract-checked queries.
///
/// Structural errors are detected before any mutation, so a failed call
/// leaves the graph exactly as it was.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NodeError {
    /// The handle refers to a destroyed node.
    StaleHandle(NodeId),
    /// The child is already attached somewhere in the graph.
    AlreadyHasParent(NodeId),
    /// Inserting `child` under `parent` would make a node its own ancestor.
    WouldCreateCycle {
        /// Node that would receive the child.
        parent: NodeId,
        /// Node being inserted.
        child: NodeId,
    },
    /// `child` is not a direct child of `parent`.
    NotAChild {
        /// Expected parent.
        parent: NodeId,
        /// Node that was expected to be a child.
        child: NodeId,
    },
    /// A uniform scale was requested but the X and Y scales differ.
    NonUniformScale {
        /// Scale along X.
        x: f64,
        /// Scale along Y.
        y: f64,
    },
    /// A single rotation was requested but the rotation-skew components
    /// differ.
    NonUniformRotation {
        /// Rotation-skew X component, in degrees.
        x: f64,
        /// Rotation-skew Y component, in degrees.
        y: f64,
    },
    /// The anchor point is locked by an attached physics body.
    AnchorLocked(NodeId),
}

impl NodeError {
    /// Returns the broad kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::StaleHandle(_)
            | Self::AlreadyHasParent(_)
            | Self::WouldCreateCycle { .. }
            | Self::NotAChild { .. } => ErrorKind::InvalidArgument,
            Self::NonUniformScale { .. }
            | Self::NonUniformRotation { .. }
            | Self::AnchorLocked(_) => ErrorKind::InvalidState,
        }
    }
}

impl fmt::Display for NodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleHandle(id) => write!(f, "stale node handle {id:?}"),
            Self::AlreadyHasParent(id) => write!(f, "{id:?} already has a parent"),
            Self::WouldCreateCycle { parent, child } => {
                write!(f, "adding {child:?} under {parent:?} would create a cycle")
            }
            Self::NotAChild { parent, child } => {
                write!(f, "{child:?} is not a child of {parent:?}")
            }
            Self::NonUniformScale { x, y } => {
                write!(f, "scale is not uniform (x = {x}, y = {y})")
            }
            Self::NonUniformRotation { x, y } => {
                write!(f, "rotation skew is not uniform (x = {x}, y = {y})")
            }
            Self::AnchorLocked(id) => {
                write!(f, "anchor point of {id:?} is locked by a physics body")
            }
        }
    }
}

impl core::error::Error for NodeError {}
