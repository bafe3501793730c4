// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node transform state and its cached node-to-parent matrices.
//!
//! [`TransformState`] holds the primary geometric fields of a node. The
//! node-to-parent matrix is a pure function of those fields
//! ([`TransformState::to_node_to_parent`]); the graph memoizes it, and its
//! inverse, in a [`TransformCache`] that every geometric setter clears.
//!
//! # Composition order
//!
//! Reading from the parent's space inwards:
//!
//! ```text
//!   T(position, z) · additional · R · S(x, y, z) · K(skew) · T(-anchor_in_points)
//! ```
//!
//! `R` is the 3-axis rotation when either X or Y rotation is non-zero, and
//! the rotation-skew Z rotation otherwise. Because the anchor offset is
//! applied innermost, rotation, scale and skew pivot around the anchor.

use core::cell::Cell;

use kurbo::{Point, Size};

use crate::transform::Transform3d;

/// Primary geometric fields of a node.
///
/// Angles are in degrees. Z rotation is clockwise-positive in a Y-up space;
/// X and Y rotations follow the right-hand rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransformState {
    /// Position in the parent's space.
    pub position: Point,
    /// Depth offset applied with the position.
    pub position_z: f64,
    /// Rotation around the X axis (3-axis mode).
    pub rotation_x: f64,
    /// Rotation around the Y axis (3-axis mode).
    pub rotation_y: f64,
    /// Z rotation applied to the Y basis vector.
    pub rotation_skew_x: f64,
    /// Z rotation applied to the X basis vector.
    pub rotation_skew_y: f64,
    /// Scale along X, Y and Z.
    pub scale: [f64; 3],
    /// Shear angle tilting the Y axis towards X.
    pub skew_x: f64,
    /// Shear angle tilting the X axis towards Y.
    pub skew_y: f64,
    /// Pivot as a fraction of the content size.
    pub anchor: Point,
    /// Untransformed size of the node's content.
    pub content_size: Size,
    /// When set, `position` places the node's origin rather than its anchor.
    pub ignore_anchor_for_position: bool,
    /// Extra transform composed right after the translation.
    pub additional: Option<Transform3d>,
}

impl Default for TransformState {
    fn default() -> Self {
        Self {
            position: Point::ZERO,
            position_z: 0.0,
            rotation_x: 0.0,
            rotation_y: 0.0,
            rotation_skew_x: 0.0,
            rotation_skew_y: 0.0,
            scale: [1.0; 3],
            skew_x: 0.0,
            skew_y: 0.0,
            anchor: Point::new(0.5, 0.5),
            content_size: Size::ZERO,
            ignore_anchor_for_position: false,
            additional: None,
        }
    }
}

impl TransformState {
    /// Returns the anchor point in content-space units.
    #[inline]
    #[must_use]
    pub fn anchor_in_points(&self) -> Point {
        Point::new(
            self.anchor.x * self.content_size.width,
            self.anchor.y * self.content_size.height,
        )
    }

    /// Returns whether the 3-axis rotation mode is active.
    #[inline]
    #[must_use]
    pub fn uses_3d_rotation(&self) -> bool {
        self.rotation_x != 0.0 || self.rotation_y != 0.0
    }

    /// Composes the node-to-parent matrix from the current fields.
    #[must_use]
    pub fn to_node_to_parent(&self) -> Transform3d {
        let anchor = self.anchor_in_points();
        let mut x = self.position.x;
        let mut y = self.position.y;
        if self.ignore_anchor_for_position {
            x += anchor.x;
            y += anchor.y;
        }

        let mut m = Transform3d::from_translation(x, y, self.position_z);
        if let Some(additional) = self.additional {
            m = m * additional;
        }
        m = m * self.rotation_matrix();
        let [sx, sy, sz] = self.scale;
        m = m * Transform3d::from_scale(sx, sy, sz);
        if self.skew_x != 0.0 || self.skew_y != 0.0 {
            m = m * Transform3d::from_skew(self.skew_x.to_radians(), self.skew_y.to_radians());
        }
        if anchor != Point::ZERO {
            m = m * Transform3d::from_translation(-anchor.x, -anchor.y, 0.0);
        }
        m
    }

    fn rotation_matrix(&self) -> Transform3d {
        if self.uses_3d_rotation() {
            // The Z component comes from the X rotation-skew, which equals the
            // Y component whenever the rotation was set as a whole.
            Transform3d::from_rotation_z(-self.rotation_skew_x.to_radians())
                * Transform3d::from_rotation_y(self.rotation_y.to_radians())
                * Transform3d::from_rotation_x(self.rotation_x.to_radians())
        } else if self.rotation_skew_x == 0.0 && self.rotation_skew_y == 0.0 {
            Transform3d::IDENTITY
        } else {
            Transform3d::from_rotation_skew(
                -self.rotation_skew_x.to_radians(),
                -self.rotation_skew_y.to_radians(),
            )
        }
    }
}

/// Memoized node-to-parent matrix and its inverse.
///
/// `None` means stale. Both entries are cleared together, so the inverse is
/// never newer than the forward matrix.
#[derive(Debug, Default)]
pub(crate) struct TransformCache {
    forward: Cell<Option<Transform3d>>,
    inverse: Cell<Option<Transform3d>>,
}

impl TransformCache {
    pub(crate) fn invalidate(&self) {
        self.forward.set(None);
        self.inverse.set(None);
    }

    /// Installs a hand-supplied forward matrix; the inverse is rebuilt from
    /// it on demand.
    pub(crate) fn set_forward(&self, m: Transform3d) {
        self.forward.set(Some(m));
        self.inverse.set(None);
    }

    #[cfg(test)]
    pub(crate) fn is_valid(&self) -> bool {
        self.forward.get().is_some()
    }

    pub(crate) fn forward(&self, state: &TransformState) -> Transform3d {
        if let Some(m) = self.forward.get() {
            return m;
        }
        let m = state.to_node_to_parent();
        self.forward.set(Some(m));
        m
    }

    /// A singular forward matrix inverts to identity.
    pub(crate) fn inverse(&self, state: &TransformState) -> Transform3d {
        if let Some(m) = self.inverse.get() {
            return m;
        }
        let m = self
            .forward(state)
            .inverse()
            .unwrap_or(Transform3d::IDENTITY);
        self.inverse.set(Some(m));
        m
    }
}
