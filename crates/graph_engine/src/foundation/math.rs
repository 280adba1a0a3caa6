//! Math utilities and types
//!
//! Provides the vector and matrix types shared by the geometry kernel and the
//! light transform pipeline. Everything is `f64`: the containment and
//! parallelism predicates compare against an absolute [`EPS`] of `1e-7`,
//! which single precision cannot resolve.

pub use nalgebra::{Matrix3, Matrix4, Unit, Vector3, Vector4};

/// 3D vector type
pub type Vec3 = Vector3<f64>;

/// 4D vector type
pub type Vec4 = Vector4<f64>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f64>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f64>;

/// Absolute tolerance used by every containment and parallelism test.
///
/// There is no relative scaling, so very large or very small coordinates lose
/// precision in the predicates.
pub const EPS: f64 = 1e-7;

/// Returns true when `left` and `right` differ by less than [`EPS`].
pub fn equality(left: f64, right: f64) -> bool {
    (left - right).abs() < EPS
}

/// Sign of `value` with values within [`EPS`] of zero treated as zero.
pub fn sign(value: f64) -> i32 {
    if equality(value, 0.0) {
        0
    } else if value < 0.0 {
        -1
    } else {
        1
    }
}

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f64 = std::f64::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f64 = PI * 0.5;
}

/// Extension trait for [`Vec3`] with the vector predicates the geometry
/// kernel is built on.
pub trait Vec3Ext {
    /// Unit vector orthogonal to `self` lying in the XZ plane.
    ///
    /// Falls back to `+X` when `self` is vertical (or zero), so the result is
    /// always a valid unit vector and is chosen deterministically.
    fn horizontal(&self) -> Vec3;

    /// Wedge test: true when `self` lies angularly between the rays `first`
    /// and `second`, all three treated as directions from a common apex.
    ///
    /// The three vectors must be coplanar. A zero-length ray means the apex
    /// already touches that ray's target and counts as inside.
    fn in_angle(&self, first: &Vec3, second: &Vec3) -> bool;

    /// Two-sided wedge test: true when either `self` or `-self` lies between
    /// `first` and `second`, i.e. the infinite line through the apex along
    /// `self` separates the two targets.
    fn in_two_side_angle(&self, first: &Vec3, second: &Vec3) -> bool;

    /// Point reflection of `self` through `center`.
    fn symmetry(&self, center: &Vec3) -> Vec3;

    /// Single precision copy for shader upload.
    fn to_gpu(&self) -> [f32; 3];

    /// True when no component is NaN or infinite.
    fn all_finite(&self) -> bool;
}

impl Vec3Ext for Vec3 {
    fn horizontal(&self) -> Vec3 {
        Vec3::new(self.z, 0.0, -self.x)
            .try_normalize(EPS)
            .unwrap_or_else(Vec3::x)
    }

    fn in_angle(&self, first: &Vec3, second: &Vec3) -> bool {
        let Some(direction) = self.try_normalize(EPS) else {
            return false;
        };
        let (Some(a), Some(b)) = (first.try_normalize(EPS), second.try_normalize(EPS)) else {
            return true;
        };

        let Some(normal) = a.cross(&b).try_normalize(EPS) else {
            // Opposite rays put the apex between both targets.
            return a.dot(&b) < 0.0
                || (direction.cross(&a).norm() < EPS && direction.dot(&a) > 0.0);
        };

        if direction.dot(&normal).abs() >= EPS {
            return false;
        }

        a.cross(&direction).dot(&normal) > -EPS && direction.cross(&b).dot(&normal) > -EPS
    }

    fn in_two_side_angle(&self, first: &Vec3, second: &Vec3) -> bool {
        self.in_angle(first, second) || (-self).in_angle(first, second)
    }

    fn symmetry(&self, center: &Vec3) -> Vec3 {
        center * 2.0 - self
    }

    #[allow(clippy::cast_possible_truncation)]
    fn to_gpu(&self) -> [f32; 3] {
        [self.x as f32, self.y as f32, self.z as f32]
    }

    fn all_finite(&self) -> bool {
        self.iter().all(|component| component.is_finite())
    }
}

/// Extension trait for Mat4 with the affine constructors used by the light
/// pipeline and the render bundles.
pub trait Mat4Ext {
    /// Translation by `offset`
    fn translation(offset: &Vec3) -> Mat4;

    /// Non-uniform scale by `factors`
    fn scaling(factors: &Vec3) -> Mat4;

    /// Rotation around the Z axis by `angle` radians
    fn rotation_z(angle: f64) -> Mat4;

    /// Matrix whose first three rows are `x`, `y` and `z`.
    ///
    /// For an orthonormal triple this maps world directions into the basis.
    fn from_basis_rows(x: &Vec3, y: &Vec3, z: &Vec3) -> Mat4;

    /// Matrix whose first three columns are `x`, `y` and `z`.
    fn from_basis_columns(x: &Vec3, y: &Vec3, z: &Vec3) -> Mat4;

    /// Transform a point, applying the homogeneous divide when `w` is not zero.
    fn apply_point(&self, point: &Vec3) -> Vec3;

    /// Transform a direction (translation ignored).
    fn apply_vector(&self, vector: &Vec3) -> Vec3;

    /// Column-major single precision copy for shader upload.
    fn to_gpu(&self) -> [[f32; 4]; 4];
}

impl Mat4Ext for Mat4 {
    fn translation(offset: &Vec3) -> Mat4 {
        Mat4::new_translation(offset)
    }

    fn scaling(factors: &Vec3) -> Mat4 {
        Mat4::new_nonuniform_scaling(factors)
    }

    fn rotation_z(angle: f64) -> Mat4 {
        Mat4::from_axis_angle(&Vec3::z_axis(), angle)
    }

    fn from_basis_rows(x: &Vec3, y: &Vec3, z: &Vec3) -> Mat4 {
        Mat4::new(
            x.x, x.y, x.z, 0.0,
            y.x, y.y, y.z, 0.0,
            z.x, z.y, z.z, 0.0,
            0.0, 0.0, 0.0, 1.0,
        )
    }

    fn from_basis_columns(x: &Vec3, y: &Vec3, z: &Vec3) -> Mat4 {
        Mat4::from_basis_rows(x, y, z).transpose()
    }

    fn apply_point(&self, point: &Vec3) -> Vec3 {
        let result = self * Vec4::new(point.x, point.y, point.z, 1.0);
        if equality(result.w, 0.0) {
            result.xyz()
        } else {
            result.xyz() / result.w
        }
    }

    fn apply_vector(&self, vector: &Vec3) -> Vec3 {
        (self * Vec4::new(vector.x, vector.y, vector.z, 0.0)).xyz()
    }

    fn to_gpu(&self) -> [[f32; 4]; 4] {
        let single = self.cast::<f32>();
        let mut columns = [[0.0; 4]; 4];
        for (column, target) in columns.iter_mut().enumerate() {
            for (row, value) in target.iter_mut().enumerate() {
                *value = single[(row, column)];
            }
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_all_finite() {
        assert!(Vec3::new(1.0, -2.0, 1e300).all_finite());
        assert!(!Vec3::new(f64::NAN, 0.0, 0.0).all_finite());
        assert!(!Vec3::new(0.0, f64::NEG_INFINITY, 0.0).all_finite());
    }

    #[test]
    fn test_sign_treats_tiny_values_as_zero() {
        assert_eq!(sign(1e-9), 0);
        assert_eq!(sign(-0.5), -1);
        assert_eq!(sign(2.0), 1);
        assert!(equality(0.1 + 0.2, 0.3));
    }

    #[test]
    fn test_horizontal_is_orthogonal_unit() {
        for direction in [
            Vec3::new(1.0, 2.0, 3.0),
            Vec3::new(0.0, -1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-0.3, -1.0, 0.5),
        ] {
            let horizontal = direction.horizontal();
            assert_relative_eq!(horizontal.norm(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(horizontal.dot(&direction), 0.0, epsilon = 1e-12);
            assert_relative_eq!(horizontal.y, 0.0);
        }
    }

    #[test]
    fn test_vertical_horizontal_falls_back_to_x() {
        assert_eq!(Vec3::new(0.0, 3.0, 0.0).horizontal(), Vec3::x());
    }

    #[test]
    fn test_in_angle_wedge() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        assert!(Vec3::new(1.0, 1.0, 0.0).in_angle(&a, &b));
        assert!(a.in_angle(&a, &b));
        assert!(!Vec3::new(-1.0, -1.0, 0.0).in_angle(&a, &b));
        assert!(!Vec3::new(1.0, -0.1, 0.0).in_angle(&a, &b));
        // Out of the plane of the wedge.
        assert!(!Vec3::new(1.0, 1.0, 1.0).in_angle(&a, &b));
    }

    #[test]
    fn test_in_two_side_angle_accepts_reversed_direction() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 1.0, 0.0);
        let reversed = Vec3::new(-1.0, -1.0, 0.0);
        assert!(!reversed.in_angle(&a, &b));
        assert!(reversed.in_two_side_angle(&a, &b));
    }

    #[test]
    fn test_in_angle_degenerate_rays() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        // Zero ray: apex touches the target.
        assert!(Vec3::new(0.0, 1.0, 0.0).in_angle(&a, &Vec3::zeros()));
        // Opposite rays: the apex lies between the targets.
        assert!(Vec3::new(0.0, 1.0, 0.0).in_angle(&a, &-a));
        // Parallel rays: only the shared direction qualifies.
        assert!(a.in_angle(&a, &(a * 2.0)));
        assert!(!Vec3::new(0.0, 1.0, 0.0).in_angle(&a, &(a * 2.0)));
        // Zero direction never lies inside a wedge.
        assert!(!Vec3::zeros().in_angle(&a, &Vec3::new(0.0, 1.0, 0.0)));
    }

    #[test]
    fn test_symmetry_reflects_through_center() {
        let point = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(point.symmetry(&Vec3::zeros()), -point);
        assert_eq!(point.symmetry(&point), point);
    }

    #[test]
    fn test_basis_rows_and_columns_are_inverse_for_orthonormal() {
        let x = Vec3::new(0.0, 0.0, -1.0);
        let y = Vec3::new(0.0, 1.0, 0.0);
        let z = x.cross(&y);
        let product = Mat4::from_basis_rows(&x, &y, &z) * Mat4::from_basis_columns(&x, &y, &z);
        assert_relative_eq!(product, Mat4::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_apply_point_divides_by_w() {
        let mut projective = Mat4::identity();
        projective[(3, 3)] = 2.0;
        let point = projective.apply_point(&Vec3::new(2.0, 4.0, 6.0));
        assert_relative_eq!(point, Vec3::new(1.0, 2.0, 3.0));

        let translate = Mat4::translation(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(translate.apply_vector(&Vec3::y()), Vec3::y());
    }

    #[test]
    fn test_to_gpu_is_column_major() {
        let translate = Mat4::translation(&Vec3::new(1.0, 2.0, 3.0));
        let gpu = translate.to_gpu();
        assert_eq!(gpu[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(gpu[0], [1.0, 0.0, 0.0, 0.0]);
    }
}
