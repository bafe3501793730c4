// Copyright 2026 the Strata Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Column-major 4×4 affine transform.
//!
//! Covers the subset of 3-D affine math the scene graph needs: the building
//! blocks of a node-to-parent matrix (translation, the two rotation modes,
//! shear, scale), composition, analytic inversion and point mapping. It does
//! not pull in a full linear-algebra crate.

use core::ops::Mul;

use kurbo::{Affine, Point, Rect};
#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;

/// Determinants smaller than this are treated as singular by
/// [`Transform3d::inverse`].
const SINGULAR_EPSILON: f64 = 1e-12;

/// Returns `(sin, cos)` of `radians`.
#[inline]
pub(crate) fn sin_cos(radians: f64) -> (f64, f64) {
    #[cfg(feature = "std")]
    {
        radians.sin_cos()
    }
    #[cfg(not(feature = "std"))]
    {
        (radians.sin(), radians.cos())
    }
}

/// A column-major 4×4 affine transform stored as `[[f64; 4]; 4]`.
///
/// Each inner array is one *column* of the matrix, matching the memory layout
/// used by GPU APIs. Points are treated as column vectors, so in `a * b` the
/// transform `b` is applied first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform3d {
    /// Four columns, each a 4-element array `[x, y, z, w]`.
    pub cols: [[f64; 4]; 4],
}

impl Transform3d {
    /// The 4×4 identity matrix.
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Creates a transform from four column arrays.
    #[inline]
    #[must_use]
    pub const fn from_cols(col0: [f64; 4], col1: [f64; 4], col2: [f64; 4], col3: [f64; 4]) -> Self {
        Self {
            cols: [col0, col1, col2, col3],
        }
    }

    /// Returns column `i` (0-based).
    ///
    /// # Panics
    ///
    /// Panics if `i >= 4`.
    #[inline]
    #[must_use]
    pub const fn col(self, i: usize) -> [f64; 4] {
        self.cols[i]
    }

    /// Returns the translation component `[x, y, z]`.
    #[inline]
    #[must_use]
    pub const fn translation(self) -> [f64; 3] {
        [self.cols[3][0], self.cols[3][1], self.cols[3][2]]
    }

    /// Creates a pure translation transform.
    #[inline]
    #[must_use]
    pub const fn from_translation(x: f64, y: f64, z: f64) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [x, y, z, 1.0],
            ],
        }
    }

    /// Creates a non-uniform scale transform.
    #[inline]
    #[must_use]
    pub const fn from_scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            cols: [
                [sx, 0.0, 0.0, 0.0],
                [0.0, sy, 0.0, 0.0],
                [0.0, 0.0, sz, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the X axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_x(radians: f64) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, c, s, 0.0],
                [0.0, -s, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Y axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_y(radians: f64) -> Self {
        let (s, c) = sin_cos(radians);
        Self {
            cols: [
                [c, 0.0, -s, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [s, 0.0, c, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a rotation around the Z axis (radians).
    #[inline]
    #[must_use]
    pub fn from_rotation_z(radians: f64) -> Self {
        Self::from_rotation_skew(radians, radians)
    }

    /// Creates a Z rotation whose two basis vectors turn independently.
    ///
    /// The Y basis vector is rotated by `radians_x` and the X basis vector by
    /// `radians_y`, which produces the "rotational skew" used by 2-D
    /// animation tools. Equal angles give a plain Z rotation.
    #[inline]
    #[must_use]
    pub fn from_rotation_skew(radians_x: f64, radians_y: f64) -> Self {
        let (sx, cx) = sin_cos(radians_x);
        let (sy, cy) = sin_cos(radians_y);
        Self {
            cols: [
                [cy, sy, 0.0, 0.0],
                [-sx, cx, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Creates a shear transform from skew angles (radians).
    ///
    /// `skew_x` tilts the Y axis towards X, `skew_y` tilts the X axis
    /// towards Y.
    #[inline]
    #[must_use]
    pub fn from_skew(skew_x: f64, skew_y: f64) -> Self {
        let (sx, cx) = sin_cos(skew_x);
        let (sy, cy) = sin_cos(skew_y);
        Self {
            cols: [
                [1.0, sy / cy, 0.0, 0.0],
                [sx / cx, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Lifts a 2-D [`Affine`] into 3-D, leaving Z untouched.
    #[must_use]
    pub fn from_affine(affine: Affine) -> Self {
        let [a, b, c, d, e, f] = affine.as_coeffs();
        Self {
            cols: [
                [a, b, 0.0, 0.0],
                [c, d, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [e, f, 0.0, 1.0],
            ],
        }
    }

    /// Projects onto the XY plane as a 2-D [`Affine`], dropping Z terms.
    #[must_use]
    pub fn to_affine(self) -> Affine {
        let c = &self.cols;
        Affine::new([c[0][0], c[0][1], c[1][0], c[1][1], c[3][0], c[3][1]])
    }

    /// Maps a point on the Z = 0 plane and returns its XY image.
    #[inline]
    #[must_use]
    pub fn transform_point(self, p: Point) -> Point {
        let c = &self.cols;
        Point::new(
            c[0][0] * p.x + c[1][0] * p.y + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[3][1],
        )
    }

    /// Maps a 3-D point.
    #[inline]
    #[must_use]
    pub fn transform_point3d(self, p: [f64; 3]) -> [f64; 3] {
        let c = &self.cols;
        let mut out = [0.0; 3];
        for (i, o) in out.iter_mut().enumerate() {
            *o = c[0][i] * p[0] + c[1][i] * p[1] + c[2][i] * p[2] + c[3][i];
        }
        out
    }

    /// Maps an axis-aligned rectangle on the Z = 0 plane and returns the
    /// axis-aligned bounding box of its image.
    #[must_use]
    pub fn transform_rect_bbox(self, rect: Rect) -> Rect {
        let p0 = self.transform_point(Point::new(rect.x0, rect.y0));
        let p1 = self.transform_point(Point::new(rect.x1, rect.y0));
        let p2 = self.transform_point(Point::new(rect.x0, rect.y1));
        let p3 = self.transform_point(Point::new(rect.x1, rect.y1));
        Rect::new(
            p0.x.min(p1.x).min(p2.x).min(p3.x),
            p0.y.min(p1.y).min(p2.y).min(p3.y),
            p0.x.max(p1.x).max(p2.x).max(p3.x),
            p0.y.max(p1.y).max(p2.y).max(p3.y),
        )
    }

    /// Returns the determinant of the upper-left 3×3 (linear) block.
    #[must_use]
    pub fn determinant(self) -> f64 {
        let m = |row: usize, col: usize| self.cols[col][row];
        m(0, 0) * (m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1))
            - m(0, 1) * (m(1, 0) * m(2, 2) - m(1, 2) * m(2, 0))
            + m(0, 2) * (m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0))
    }

    /// Returns the analytic inverse, or `None` if the transform is singular.
    ///
    /// The bottom row is assumed to be `(0, 0, 0, 1)`, which holds for every
    /// transform built from the constructors on this type.
    #[must_use]
    pub fn inverse(self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return None;
        }
        let m = |row: usize, col: usize| self.cols[col][row];
        let inv_det = 1.0 / det;

        // Adjugate of the linear block, row-major.
        let l = [
            [
                (m(1, 1) * m(2, 2) - m(1, 2) * m(2, 1)) * inv_det,
                (m(0, 2) * m(2, 1) - m(0, 1) * m(2, 2)) * inv_det,
                (m(0, 1) * m(1, 2) - m(0, 2) * m(1, 1)) * inv_det,
            ],
            [
                (m(1, 2) * m(2, 0) - m(1, 0) * m(2, 2)) * inv_det,
                (m(0, 0) * m(2, 2) - m(0, 2) * m(2, 0)) * inv_det,
                (m(0, 2) * m(1, 0) - m(0, 0) * m(1, 2)) * inv_det,
            ],
            [
                (m(1, 0) * m(2, 1) - m(1, 1) * m(2, 0)) * inv_det,
                (m(0, 1) * m(2, 0) - m(0, 0) * m(2, 1)) * inv_det,
                (m(0, 0) * m(1, 1) - m(0, 1) * m(1, 0)) * inv_det,
            ],
        ];
        let t = self.translation();
        let mut out = Self::IDENTITY;
        for row in 0..3 {
            for col in 0..3 {
                out.cols[col][row] = l[row][col];
            }
            out.cols[3][row] = -(l[row][0] * t[0] + l[row][1] * t[1] + l[row][2] * t[2]);
        }
        Some(out)
    }

    /// Is this transform [finite]?
    ///
    /// [finite]: f64::is_finite
    #[inline]
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.cols.iter().flatten().all(|v| v.is_finite())
    }
}

impl Default for Transform3d {
    #[inline]
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Transform3d {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let a = &self.cols;
        let b = &rhs.cols;
        let mut out = [[0.0_f64; 4]; 4];
        let mut j = 0;
        while j < 4 {
            let mut i = 0;
            while i < 4 {
                out[j][i] =
                    a[0][i] * b[j][0] + a[1][i] * b[j][1] + a[2][i] * b[j][2] + a[3][i] * b[j][3];
                i += 1;
            }
            j += 1;
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn assert_close(a: Transform3d, b: Transform3d) {
        for (ca, cb) in a.cols.iter().zip(b.cols.iter()) {
            for (x, y) in ca.iter().zip(cb.iter()) {
                assert!((x - y).abs() < EPS, "{a:?} != {b:?}");
            }
        }
    }

    #[test]
    fn identity_multiply() {
        let t = Transform3d::from_translation(1.0, 2.0, 3.0);
        assert_eq!(Transform3d::IDENTITY * t, t);
        assert_eq!(t * Transform3d::IDENTITY, t);
        assert_eq!(Transform3d::default(), Transform3d::IDENTITY);
    }

    #[test]
    fn scale_then_translate() {
        let s = Transform3d::from_scale(2.0, 2.0, 2.0);
        let t = Transform3d::from_translation(3.0, 4.0, 0.0);
        let combined = t * s;
        assert_eq!(combined.col(0), [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(combined.col(3), [3.0, 4.0, 0.0, 1.0]);
        let p = combined.transform_point(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(5.0, 6.0));
    }

    #[test]
    fn rotation_z_ninety_degrees() {
        let r = Transform3d::from_rotation_z(core::f64::consts::FRAC_PI_2);
        let p = r.transform_point(Point::new(1.0, 0.0));
        assert!(p.x.abs() < EPS && (p.y - 1.0).abs() < EPS, "got {p:?}");
    }

    #[test]
    fn rotation_skew_with_equal_angles_is_plain_rotation() {
        let a = 0.7;
        assert_close(
            Transform3d::from_rotation_skew(a, a),
            Transform3d::from_rotation_z(a),
        );
    }

    #[test]
    fn rotation_x_and_y_turn_expected_axes() {
        let half_pi = core::f64::consts::FRAC_PI_2;
        let y = Transform3d::from_rotation_x(half_pi).transform_point3d([0.0, 1.0, 0.0]);
        assert!(y[0].abs() < EPS && y[1].abs() < EPS && (y[2] - 1.0).abs() < EPS);
        let x = Transform3d::from_rotation_y(half_pi).transform_point3d([1.0, 0.0, 0.0]);
        assert!(x[0].abs() < EPS && x[1].abs() < EPS && (x[2] + 1.0).abs() < EPS);
    }

    #[test]
    fn skew_shears_axes() {
        let k = Transform3d::from_skew(core::f64::consts::FRAC_PI_4, 0.0);
        let p = k.transform_point(Point::new(0.0, 2.0));
        assert!((p.x - 2.0).abs() < EPS && (p.y - 2.0).abs() < EPS, "got {p:?}");
    }

    #[test]
    fn inverse_undoes_composite() {
        let t = Transform3d::from_translation(4.0, -3.0, 2.0)
            * Transform3d::from_rotation_z(0.4)
            * Transform3d::from_rotation_x(0.2)
            * Transform3d::from_skew(0.3, -0.1)
            * Transform3d::from_scale(2.0, 0.5, 3.0);
        let inv = t.inverse().expect("composite is invertible");
        assert_close(t * inv, Transform3d::IDENTITY);
        assert_close(inv * t, Transform3d::IDENTITY);
    }

    #[test]
    fn zero_scale_is_singular() {
        assert!(Transform3d::from_scale(0.0, 1.0, 1.0).inverse().is_none());
    }

    #[test]
    fn affine_conversion_preserves_xy_mapping() {
        let affine = Affine::translate((3.0, 1.0)) * Affine::rotate(0.5) * Affine::scale(2.0);
        let t = Transform3d::from_affine(affine);
        let p = Point::new(1.5, -2.0);
        let a = affine * p;
        let b = t.transform_point(p);
        assert!((a - b).hypot() < EPS, "{a:?} vs {b:?}");
        assert_eq!(t.to_affine(), affine);
    }

    #[test]
    fn rotated_rect_bbox_grows() {
        let r = Transform3d::from_rotation_z(core::f64::consts::FRAC_PI_4);
        let bbox = r.transform_rect_bbox(Rect::new(0.0, 0.0, 10.0, 10.0));
        let half_diag = 10.0 * core::f64::consts::FRAC_1_SQRT_2;
        assert!((bbox.x0 + half_diag).abs() < EPS, "{bbox:?}");
        assert!((bbox.x1 - half_diag).abs() < EPS, "{bbox:?}");
        assert!(bbox.y0.abs() < EPS, "{bbox:?}");
        assert!((bbox.y1 - 2.0 * half_diag).abs() < EPS, "{bbox:?}");
    }

    #[test]
    fn infinity_detected() {
        let mut t = Transform3d::IDENTITY;
        assert!(t.is_finite());
        t.cols[0][3] = f64::INFINITY;
        assert!(!t.is_finite());
    }
}
