//! 4x4 affine transform math.
//!
//! Matrices use the row-vector convention of the native layer model: a point
//! is transformed as `p' = p * M`, translation lives in `m41..m43` and the
//! perspective term in `m34`. `a.then(b)` therefore applies `a` to the point
//! first, and the builder-style `translated`/`rotated`/`scaled` methods apply
//! the new operation *before* the receiver, matching how native transform
//! stacks accumulate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Substitute for a requested scale factor of exactly zero. The native matrix
/// representation is singular at zero scale and cannot be animated from.
pub const ZERO_SCALE_EPSILON: f64 = 1e-6;

/// A 4x4 transform matrix in native layer layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    pub m11: f64,
    pub m12: f64,
    pub m13: f64,
    pub m14: f64,
    pub m21: f64,
    pub m22: f64,
    pub m23: f64,
    pub m24: f64,
    pub m31: f64,
    pub m32: f64,
    pub m33: f64,
    pub m34: f64,
    pub m41: f64,
    pub m42: f64,
    pub m43: f64,
    pub m44: f64,
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform3D {
    pub const IDENTITY: Self = Self {
        m11: 1.0,
        m12: 0.0,
        m13: 0.0,
        m14: 0.0,
        m21: 0.0,
        m22: 1.0,
        m23: 0.0,
        m24: 0.0,
        m31: 0.0,
        m32: 0.0,
        m33: 1.0,
        m34: 0.0,
        m41: 0.0,
        m42: 0.0,
        m43: 0.0,
        m44: 1.0,
    };

    pub const fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            m41: tx,
            m42: ty,
            m43: tz,
            ..Self::IDENTITY
        }
    }

    pub const fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            m11: sx,
            m22: sy,
            m33: sz,
            ..Self::IDENTITY
        }
    }

    /// Rotation about the x axis, radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m22: c,
            m23: s,
            m32: -s,
            m33: c,
            ..Self::IDENTITY
        }
    }

    /// Rotation about the y axis, radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m11: c,
            m13: -s,
            m31: s,
            m33: c,
            ..Self::IDENTITY
        }
    }

    /// Rotation about the z axis, radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        Self {
            m11: c,
            m12: s,
            m21: -s,
            m22: c,
            ..Self::IDENTITY
        }
    }

    fn row(&self, i: usize) -> [f64; 4] {
        match i {
            0 => [self.m11, self.m12, self.m13, self.m14],
            1 => [self.m21, self.m22, self.m23, self.m24],
            2 => [self.m31, self.m32, self.m33, self.m34],
            _ => [self.m41, self.m42, self.m43, self.m44],
        }
    }

    fn from_rows(rows: [[f64; 4]; 4]) -> Self {
        Self {
            m11: rows[0][0],
            m12: rows[0][1],
            m13: rows[0][2],
            m14: rows[0][3],
            m21: rows[1][0],
            m22: rows[1][1],
            m23: rows[1][2],
            m24: rows[1][3],
            m31: rows[2][0],
            m32: rows[2][1],
            m33: rows[2][2],
            m34: rows[2][3],
            m41: rows[3][0],
            m42: rows[3][1],
            m43: rows[3][2],
            m44: rows[3][3],
        }
    }

    /// The transform that applies `self` first, then `other`.
    pub fn then(&self, other: &Self) -> Self {
        let mut rows = [[0.0; 4]; 4];
        for (i, row) in rows.iter_mut().enumerate() {
            let a = self.row(i);
            for (j, cell) in row.iter_mut().enumerate() {
                *cell = a[0] * other.row(0)[j]
                    + a[1] * other.row(1)[j]
                    + a[2] * other.row(2)[j]
                    + a[3] * other.row(3)[j];
            }
        }
        Self::from_rows(rows)
    }

    /// Prepend a translation: points are translated before `self` applies.
    pub fn translated(&self, tx: f64, ty: f64, tz: f64) -> Self {
        Self::translation(tx, ty, tz).then(self)
    }

    /// Prepend a scale.
    pub fn scaled(&self, sx: f64, sy: f64, sz: f64) -> Self {
        Self::scale(sx, sy, sz).then(self)
    }

    /// Prepend per-axis rotations, applied in x, y, z order. Angles are
    /// degrees.
    pub fn rotated_degrees(&self, x: f64, y: f64, z: f64) -> Self {
        let mut result = Self::rotation_x(x.to_radians()).then(self);
        result = Self::rotation_y(y.to_radians()).then(&result);
        Self::rotation_z(z.to_radians()).then(&result)
    }

    /// Apply the transform to a point, including the perspective divide.
    pub fn apply_point(&self, x: f64, y: f64, z: f64) -> (f64, f64, f64) {
        let out = [
            x * self.m11 + y * self.m21 + z * self.m31 + self.m41,
            x * self.m12 + y * self.m22 + z * self.m32 + self.m42,
            x * self.m13 + y * self.m23 + z * self.m33 + self.m43,
            x * self.m14 + y * self.m24 + z * self.m34 + self.m44,
        ];
        let w = if out[3] == 0.0 { 1.0 } else { out[3] };
        (out[0] / w, out[1] / w, out[2] / w)
    }

    /// Component-wise comparison with tolerance.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (0..4).all(|i| {
            let a = self.row(i);
            let b = other.row(i);
            a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() <= tolerance)
        })
    }

    /// Canonical textual form used for transform diagnostics. Two transforms
    /// are considered equal for diagnostic purposes when these strings match.
    pub fn canonical_string(&self) -> String {
        format!("{self}")
    }
}

impl fmt::Display for Transform3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[")?;
        for i in 0..4 {
            let [a, b, c, d] = self.row(i);
            writeln!(f, "  {a}, {b}, {c}, {d},")?;
        }
        write!(f, "]")
    }
}

/// Replace an exact-zero scale factor with [`ZERO_SCALE_EPSILON`].
///
/// Only the native matrix is guarded; the declarative value keeps the exact
/// zero the caller asked for.
pub fn nonzero_scale(value: f64, epsilon: f64) -> f64 {
    if value == 0.0 { epsilon } else { value }
}

/// Compose translate, rotate and scale into one matrix, in that order.
///
/// Rotation angles are degrees. The perspective term is installed only when
/// rotation involves the x or y axis, so purely 2D transforms stay affine.
pub fn compose_affine(
    translate: Option<(f64, f64)>,
    rotate: Option<(f64, f64, f64)>,
    scale: Option<(f64, f64)>,
    perspective: f64,
    zero_scale_epsilon: f64,
) -> Transform3D {
    let mut result = Transform3D::IDENTITY;
    if let Some((rx, ry, _)) = rotate {
        if rx != 0.0 || ry != 0.0 {
            result.m34 = -1.0 / perspective;
        }
    }
    if let Some((tx, ty)) = translate {
        result = result.translated(tx, ty, 0.0);
    }
    if let Some((rx, ry, rz)) = rotate {
        result = result.rotated_degrees(rx, ry, rz);
    }
    if let Some((sx, sy)) = scale {
        result = result.scaled(
            nonzero_scale(sx, zero_scale_epsilon),
            nonzero_scale(sy, zero_scale_epsilon),
            1.0,
        );
    }
    result
}
