//! View and projection matrices for shadow mapping
//!
//! Light space looks down `+Z`: the view matrix maps the light direction onto
//! the Z axis, and both projections map the shadow region into the clip cube
//! `[-1, 1]³`.

use crate::error::{GraphError, Result};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec3Ext, EPS};

/// Orthonormal light basis `(horizontal, direction × horizontal, direction)`
///
/// `direction` must be a unit vector.
pub fn light_basis(direction: &Vec3) -> (Vec3, Vec3, Vec3) {
    let horizontal = direction.horizontal();
    (horizontal, direction.cross(&horizontal), *direction)
}

/// World to light space for a light at `position` looking along `direction`
pub fn view_matrix(position: &Vec3, direction: &Vec3) -> Mat4 {
    let (x, y, z) = light_basis(direction);
    Mat4::from_basis_rows(&x, &y, &z) * Mat4::translation(&-position)
}

/// Light space back to world space, the exact inverse of [`view_matrix`]
pub fn view_matrix_inverse(position: &Vec3, direction: &Vec3) -> Mat4 {
    let (x, y, z) = light_basis(direction);
    Mat4::translation(position) * Mat4::from_basis_columns(&x, &y, &z)
}

/// Orthographic box `width × height × depth` starting at the light
///
/// # Errors
/// [`GraphError::DomainError`] when a dimension is zero.
pub fn orthographic_projection(width: f64, height: f64, depth: f64) -> Result<Mat4> {
    if [width, height, depth].iter().any(|dimension| dimension.abs() < EPS) {
        return Err(GraphError::domain(format!(
            "orthographic projection with a zero dimension ({width} x {height} x {depth})"
        )));
    }

    Ok(Mat4::scaling(&Vec3::new(2.0 / width, 2.0 / height, 2.0 / depth))
        * Mat4::translation(&Vec3::new(0.0, 0.0, -depth / 2.0)))
}

/// Perspective cone with half-angle `angle` clipped to `[near, far]`
///
/// `w` receives the light-space depth, so after the divide `near` maps to
/// `-1` and `far` to `1`.
///
/// # Errors
/// [`GraphError::DomainError`] when `tan(angle)` is zero, `near == far` or
/// `near + far == 0`.
pub fn perspective_projection(angle: f64, near: f64, far: f64) -> Result<Mat4> {
    let tangent = angle.tan();
    if tangent.abs() < EPS {
        return Err(GraphError::domain(format!(
            "perspective projection with a degenerate cone angle ({angle})"
        )));
    }
    if (far - near).abs() < EPS || (far + near).abs() < EPS {
        return Err(GraphError::domain(format!(
            "perspective projection with a degenerate depth range ({near}, {far})"
        )));
    }

    let mut projection = Mat4::scaling(&Vec3::new(
        1.0 / tangent,
        1.0 / tangent,
        (far + near) / (far - near),
    )) * Mat4::translation(&Vec3::new(0.0, 0.0, -2.0 * near * far / (near + far)));
    projection[(3, 3)] = 0.0;
    projection[(3, 2)] = 1.0;
    Ok(projection)
}
