//! Point and vector types and related functionality

use nalgebra::{Point3, Vector3};

/// An affine position in 3D space
pub type Point3D = Point3<f64>;

/// A displacement or direction in 3D space
///
/// Kept distinct from [`Point3D`] so transforms can treat the two differently:
/// translation moves points but never vectors.
pub type Vector3D = Vector3<f64>;

pub const UNIT_X: Vector3D = Vector3::new(1.0, 0.0, 0.0);
pub const UNIT_Y: Vector3D = Vector3::new(0.0, 1.0, 0.0);
pub const UNIT_Z: Vector3D = Vector3::new(0.0, 0.0, 1.0);
pub const ZERO: Vector3D = Vector3::new(0.0, 0.0, 0.0);

/// Zero-safe vector helpers
pub trait VectorExt {
    /// Unit vector in the same direction; the zero vector is returned unchanged
    fn normalized(&self) -> Self;
}

impl VectorExt for Vector3D {
    fn normalized(&self) -> Self {
        let magnitude = self.magnitude();
        if magnitude == 0.0 {
            *self
        } else {
            *self / magnitude
        }
    }
}

/// Point helpers
pub trait PointExt {
    /// Euclidean distance to another point
    fn distance_to(&self, other: &Self) -> f64;
}

impl PointExt for Point3D {
    fn distance_to(&self, other: &Self) -> f64 {
        nalgebra::distance(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vector_addition_commutes() {
        let a = Vector3D::new(1.5, -2.0, 3.25);
        let b = Vector3D::new(-0.5, 4.0, 7.0);
        assert_eq!(a + b, b + a);
    }

    #[test]
    fn test_self_cross_is_zero() {
        let a = Vector3D::new(3.0, -1.0, 2.0);
        assert_eq!(a.cross(&a).magnitude(), 0.0);
    }

    #[test]
    fn test_unit_axes_cross() {
        assert_eq!(UNIT_X.cross(&UNIT_Y), UNIT_Z);
        assert_eq!(UNIT_Y.cross(&UNIT_Z), UNIT_X);
    }

    #[test]
    fn test_normalized() {
        let v = Vector3D::new(3.0, 4.0, 12.0);
        assert_relative_eq!(v.normalized().magnitude(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(v.normalized().x, 3.0 / 13.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalized_zero_is_noop() {
        assert_eq!(ZERO.normalized(), ZERO);
    }

    #[test]
    fn test_point_vector_arithmetic() {
        let p = Point3D::new(1.0, 2.0, 3.0);
        let q = Point3D::new(4.0, 6.0, 3.0);

        let d = q - p;
        assert_eq!(d, Vector3D::new(3.0, 4.0, 0.0));
        assert_eq!(p + d, q);
        assert_relative_eq!(p.distance_to(&q), 5.0);
        assert_eq!(-d, Vector3D::new(-3.0, -4.0, 0.0));
        assert_eq!(d * 2.0, Vector3D::new(6.0, 8.0, 0.0));
        assert_eq!(d.dot(&UNIT_Y), 4.0);
    }
}
