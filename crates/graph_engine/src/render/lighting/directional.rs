//! Directional (sun-like) lights with an orthographic shadow box

use crate::error::{GraphError, Result};
use crate::foundation::math::{Mat4, Vec3, Vec3Ext, EPS};
use crate::render::lighting::transform;

/// Parameters of a directional light
///
/// The shadow box is `shadow_width × shadow_height × shadow_depth`, placed
/// at `shadow_position` and extending along the light direction.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    direction: Vec3,
    shadow_position: Vec3,
    shadow_width: f64,
    shadow_height: f64,
    shadow_depth: f64,
    projection: Mat4,
}

impl DirectionalLight {
    /// Default shadow box edge
    pub const DEFAULT_SHADOW_SIZE: f64 = 10.0;

    /// Light shining along `direction`
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when `direction` has zero length.
    pub fn new(direction: Vec3) -> Result<Self> {
        let size = Self::DEFAULT_SHADOW_SIZE;
        let light = Self {
            direction: unit_direction("DirectionalLight::new", &direction)?,
            shadow_position: Vec3::zeros(),
            shadow_width: size,
            shadow_height: size,
            shadow_depth: size,
            projection: transform::orthographic_projection(size, size, size)?,
        };
        log::debug!("Created directional light along {:?}", light.direction.as_slice());
        Ok(light)
    }

    /// Unit light direction
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Origin of the shadow box
    pub fn shadow_position(&self) -> Vec3 {
        self.shadow_position
    }

    /// Shadow box extent as `(width, height, depth)`
    pub fn shadow_size(&self) -> (f64, f64, f64) {
        (self.shadow_width, self.shadow_height, self.shadow_depth)
    }

    /// Cached orthographic projection
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// World to light space
    pub fn view_matrix(&self) -> Mat4 {
        transform::view_matrix(&self.shadow_position, &self.direction)
    }

    /// Light space to world
    pub fn view_matrix_inverse(&self) -> Mat4 {
        transform::view_matrix_inverse(&self.shadow_position, &self.direction)
    }

    /// Set the light direction (normalized)
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when `direction` has zero length.
    pub fn set_direction(&mut self, direction: Vec3) -> Result<&mut Self> {
        self.direction = unit_direction("DirectionalLight::set_direction", &direction)?;
        Ok(self)
    }

    /// Move the shadow box origin
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when a coordinate is not finite.
    pub fn set_shadow_position(&mut self, shadow_position: Vec3) -> Result<&mut Self> {
        self.shadow_position =
            finite_point("DirectionalLight::set_shadow_position", &shadow_position)?;
        Ok(self)
    }

    /// Set the shadow box width
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] unless `shadow_width` is positive.
    pub fn set_shadow_width(&mut self, shadow_width: f64) -> Result<&mut Self> {
        check_positive("DirectionalLight::set_shadow_width", "shadow width", shadow_width)?;
        self.resize(shadow_width, self.shadow_height, self.shadow_depth)
    }

    /// Set the shadow box height
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] unless `shadow_height` is positive.
    pub fn set_shadow_height(&mut self, shadow_height: f64) -> Result<&mut Self> {
        check_positive("DirectionalLight::set_shadow_height", "shadow height", shadow_height)?;
        self.resize(self.shadow_width, shadow_height, self.shadow_depth)
    }

    /// Set the shadow box depth
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] unless `shadow_depth` is positive.
    pub fn set_shadow_depth(&mut self, shadow_depth: f64) -> Result<&mut Self> {
        check_positive("DirectionalLight::set_shadow_depth", "shadow depth", shadow_depth)?;
        self.resize(self.shadow_width, self.shadow_height, shadow_depth)
    }

    fn resize(&mut self, width: f64, height: f64, depth: f64) -> Result<&mut Self> {
        self.projection = transform::orthographic_projection(width, height, depth)?;
        self.shadow_width = width;
        self.shadow_height = height;
        self.shadow_depth = depth;
        log::debug!("Directional shadow box resized to {width} x {height} x {depth}");
        Ok(self)
    }
}

pub(crate) fn unit_direction(context: &str, direction: &Vec3) -> Result<Vec3> {
    if !direction.all_finite() {
        return Err(GraphError::invalid(format!(
            "{context}: the direction vector is not finite ({}, {}, {})",
            direction.x, direction.y, direction.z
        )));
    }
    direction
        .try_normalize(EPS)
        .ok_or_else(|| GraphError::invalid(format!("{context}: the direction vector has zero length")))
}

pub(crate) fn finite_point(context: &str, point: &Vec3) -> Result<Vec3> {
    if point.all_finite() {
        Ok(*point)
    } else {
        Err(GraphError::invalid(format!(
            "{context}: the position is not finite ({}, {}, {})",
            point.x, point.y, point.z
        )))
    }
}

pub(crate) fn check_positive(context: &str, what: &str, value: f64) -> Result<()> {
    if !(value >= EPS && value.is_finite()) {
        return Err(GraphError::invalid(format!("{context}: not a positive {what} ({value})")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_direction_rejected() {
        assert!(matches!(DirectionalLight::new(Vec3::zeros()), Err(GraphError::InvalidArgument(_))));
        let mut light = DirectionalLight::new(Vec3::new(0.0, -2.0, 0.0)).unwrap();
        assert_relative_eq!(light.direction(), Vec3::new(0.0, -1.0, 0.0));
        assert!(light.set_direction(Vec3::zeros()).is_err());
        assert_relative_eq!(light.direction(), Vec3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_shadow_dimensions_validated() {
        let mut light = DirectionalLight::new(Vec3::new(1.0, -1.0, 0.0)).unwrap();
        assert!(matches!(light.set_shadow_width(0.0), Err(GraphError::InvalidArgument(_))));
        assert!(light.set_shadow_height(-1.0).is_err());
        assert!(light.set_shadow_depth(1e-9).is_err());
        assert_eq!(light.shadow_size(), (10.0, 10.0, 10.0));

        light
            .set_shadow_width(4.0)
            .unwrap()
            .set_shadow_height(6.0)
            .unwrap()
            .set_shadow_depth(20.0)
            .unwrap();
        assert_eq!(light.shadow_size(), (4.0, 6.0, 20.0));
        assert_relative_eq!(light.projection_matrix()[(0, 0)], 0.5);
        assert_relative_eq!(light.projection_matrix()[(2, 3)], -1.0);
    }

    #[test]
    fn test_non_finite_values_rejected() {
        assert!(DirectionalLight::new(Vec3::new(f64::NAN, -1.0, 0.0)).is_err());

        let mut light = DirectionalLight::new(Vec3::new(0.0, -1.0, 0.0)).unwrap();
        let before = light.clone();
        assert!(matches!(light.set_shadow_width(f64::NAN), Err(GraphError::InvalidArgument(_))));
        assert!(light.set_shadow_width(f64::INFINITY).is_err());
        assert!(light.set_shadow_height(f64::NAN).is_err());
        assert!(light.set_shadow_depth(f64::INFINITY).is_err());
        assert!(light.set_direction(Vec3::new(0.0, f64::INFINITY, 0.0)).is_err());
        assert!(light.set_shadow_position(Vec3::new(f64::NAN, 0.0, 0.0)).is_err());
        assert_eq!(light, before);
        assert!(light.projection_matrix().iter().all(|value| value.is_finite()));

        light.set_shadow_position(Vec3::new(0.0, 10.0, 0.0)).unwrap();
        assert_eq!(light.shadow_position(), Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_projection_recomputed_eagerly() {
        let mut light = DirectionalLight::new(Vec3::z()).unwrap();
        let before = light.projection_matrix();
        light.set_shadow_width(5.0).unwrap();
        assert_relative_eq!(light.projection_matrix()[(0, 0)], 2.0 / 5.0);
        assert_relative_eq!(light.projection_matrix()[(1, 1)], before[(1, 1)]);
    }
}
