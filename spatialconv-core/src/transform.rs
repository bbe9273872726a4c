//! 3D affine transformation utilities

use crate::error::{Error, Result};
use crate::point::{Point3D, Vector3D};
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// An affine transform stored as a 4x4 homogeneous matrix
///
/// Points are treated as column vectors with `w = 1`, so the translation lives
/// in the last column. Directions use `w = 0` and are never translated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform3D {
    matrix: Matrix4<f64>,
}

impl Transform3D {
    /// Create an identity transformation
    pub fn identity() -> Self {
        Self {
            matrix: Matrix4::identity(),
        }
    }

    /// Build from 16 coefficients listed row by row
    pub fn from_row_major(coefficients: &[f64]) -> Result<Self> {
        if coefficients.len() != 16 {
            return Err(Error::invalid(format!(
                "a 4x4 transform needs exactly 16 coefficients, got {}",
                coefficients.len()
            )));
        }
        Ok(Self {
            matrix: Matrix4::from_row_slice(coefficients),
        })
    }

    /// The 16 coefficients row by row
    pub fn to_row_major(&self) -> [f64; 16] {
        let mut out = [0.0; 16];
        for row in 0..4 {
            for col in 0..4 {
                out[row * 4 + col] = self.matrix[(row, col)];
            }
        }
        out
    }

    pub fn matrix(&self) -> &Matrix4<f64> {
        &self.matrix
    }

    /// Create a translation transformation
    #[rustfmt::skip]
    pub fn translation(tx: f64, ty: f64, tz: f64) -> Self {
        Self {
            matrix: Matrix4::new(
                1.0, 0.0, 0.0, tx,
                0.0, 1.0, 0.0, ty,
                0.0, 0.0, 1.0, tz,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Create a scaling transformation
    #[rustfmt::skip]
    pub fn scale(sx: f64, sy: f64, sz: f64) -> Self {
        Self {
            matrix: Matrix4::new(
                sx, 0.0, 0.0, 0.0,
                0.0, sy, 0.0, 0.0,
                0.0, 0.0, sz, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Create a uniform scaling transformation
    pub fn uniform_scale(factor: f64) -> Self {
        Self::scale(factor, factor, factor)
    }

    /// Right-handed rotation about the X axis by `radians`
    #[rustfmt::skip]
    pub fn rotation_x(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self {
            matrix: Matrix4::new(
                1.0, 0.0, 0.0, 0.0,
                0.0, c, -s, 0.0,
                0.0, s, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Right-handed rotation about the Y axis by `radians`
    #[rustfmt::skip]
    pub fn rotation_y(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self {
            matrix: Matrix4::new(
                c, 0.0, s, 0.0,
                0.0, 1.0, 0.0, 0.0,
                -s, 0.0, c, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Right-handed rotation about the Z axis by `radians`
    #[rustfmt::skip]
    pub fn rotation_z(radians: f64) -> Self {
        let (s, c) = radians.sin_cos();
        Self {
            matrix: Matrix4::new(
                c, -s, 0.0, 0.0,
                s, c, 0.0, 0.0,
                0.0, 0.0, 1.0, 0.0,
                0.0, 0.0, 0.0, 1.0,
            ),
        }
    }

    /// Apply the full affine transform (including translation) to a point
    pub fn apply(&self, point: &Point3D) -> Point3D {
        let linear = self.matrix.fixed_view::<3, 3>(0, 0);
        let translation = self.matrix.fixed_view::<3, 1>(0, 3);
        Point3D::from(linear * point.coords + translation)
    }

    /// Apply only the linear part to a direction; translation is dropped
    pub fn apply_to_vector(&self, vector: &Vector3D) -> Vector3D {
        self.matrix.fixed_view::<3, 3>(0, 0) * vector
    }

    /// Compose: `self` is applied first, then `other`
    pub fn then(&self, other: &Transform3D) -> Transform3D {
        Self {
            matrix: other.matrix * self.matrix,
        }
    }

    /// Get the inverse transformation, `None` if the matrix is singular
    pub fn inverse(&self) -> Option<Self> {
        self.matrix.try_inverse().map(|matrix| Self { matrix })
    }

    /// Check if this is approximately the identity transformation
    pub fn is_identity(&self, epsilon: f64) -> bool {
        (self.matrix - Matrix4::identity()).norm() < epsilon
    }
}

impl Default for Transform3D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Hash for Transform3D {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for value in self.matrix.iter() {
            // -0.0 == 0.0, so both must hash alike
            let value = if *value == 0.0 { 0.0 } else { *value };
            value.to_bits().hash(state);
        }
    }
}

// Coefficients are expected to be finite; NaN would break reflexivity
impl Eq for Transform3D {}

impl From<Matrix4<f64>> for Transform3D {
    fn from(matrix: Matrix4<f64>) -> Self {
        Self { matrix }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashSet;
    use std::f64::consts::FRAC_PI_2;

    fn assert_point_eq(a: Point3D, b: Point3D) {
        assert_relative_eq!(a.x, b.x, epsilon = 1e-10);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-10);
        assert_relative_eq!(a.z, b.z, epsilon = 1e-10);
    }

    #[test]
    fn test_translation_moves_points_not_vectors() {
        let t = Transform3D::translation(1.0, -2.0, 3.0);
        assert_eq!(t.apply(&Point3D::new(1.0, 1.0, 1.0)), Point3D::new(2.0, -1.0, 4.0));

        let v = Vector3D::new(0.0, 0.0, 1.0);
        assert_eq!(t.apply_to_vector(&v), v);
    }

    #[test]
    fn test_rotations_are_right_handed() {
        let p = Point3D::new(1.0, 0.0, 0.0);
        assert_point_eq(Transform3D::rotation_z(FRAC_PI_2).apply(&p), Point3D::new(0.0, 1.0, 0.0));

        let p = Point3D::new(0.0, 1.0, 0.0);
        assert_point_eq(Transform3D::rotation_x(FRAC_PI_2).apply(&p), Point3D::new(0.0, 0.0, 1.0));

        let p = Point3D::new(0.0, 0.0, 1.0);
        assert_point_eq(Transform3D::rotation_y(FRAC_PI_2).apply(&p), Point3D::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_then_applies_self_first() {
        let p = Point3D::new(1.0, 1.0, 1.0);
        let scale = Transform3D::uniform_scale(2.0);
        let shift = Transform3D::translation(1.0, 0.0, 0.0);

        let scale_then_move = scale.then(&shift);
        assert_eq!(scale_then_move.apply(&p), Point3D::new(3.0, 2.0, 2.0));

        let move_then_scale = shift.then(&scale);
        assert_eq!(move_then_scale.apply(&p), Point3D::new(4.0, 2.0, 2.0));
    }

    #[test]
    fn test_rotation_round_trip() {
        let round_trip =
            Transform3D::rotation_x(-FRAC_PI_2).then(&Transform3D::rotation_x(FRAC_PI_2));
        let p = Point3D::new(0.3, -7.5, 12.0);
        assert_point_eq(round_trip.apply(&p), p);
        assert!(round_trip.is_identity(1e-10));
    }

    #[test]
    fn test_row_major_coefficients() {
        let coefficients: Vec<f64> = (0..16).map(|i| i as f64).collect();
        let t = Transform3D::from_row_major(&coefficients).unwrap();
        assert_eq!(t.matrix()[(0, 3)], 3.0);
        assert_eq!(t.matrix()[(1, 0)], 4.0);
        assert_eq!(t.to_row_major().to_vec(), coefficients);

        assert!(matches!(
            Transform3D::from_row_major(&coefficients[..15]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(Transform3D::from_row_major(&[0.0; 17]).is_err());
    }

    #[test]
    #[rustfmt::skip]
    fn test_translation_from_row_major() {
        let t = Transform3D::from_row_major(&[
            1.0, 0.0, 0.0, 5.0,
            0.0, 1.0, 0.0, 6.0,
            0.0, 0.0, 1.0, 7.0,
            0.0, 0.0, 0.0, 1.0,
        ])
        .unwrap();
        assert_eq!(t, Transform3D::translation(5.0, 6.0, 7.0));
    }

    #[test]
    fn test_equality_and_hash_by_contents() {
        let mut set = HashSet::new();
        set.insert(Transform3D::translation(1.0, 2.0, 3.0));
        set.insert(Transform3D::translation(1.0, 2.0, 3.0));
        set.insert(Transform3D::scale(0.0, 1.0, 1.0));
        set.insert(Transform3D::scale(-0.0, 1.0, 1.0));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_inverse() {
        let t = Transform3D::translation(1.0, 2.0, 3.0).then(&Transform3D::rotation_z(0.4));
        let inverse = t.inverse().unwrap();
        let p = Point3D::new(4.0, -1.0, 0.5);
        assert_point_eq(inverse.apply(&t.apply(&p)), p);
        assert!(Transform3D::scale(0.0, 1.0, 1.0).inverse().is_none());
    }
}
