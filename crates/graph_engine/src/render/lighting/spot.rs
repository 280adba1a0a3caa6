//! Spot lights with a perspective shadow cone

use crate::error::{GraphError, Result};
use crate::foundation::math::{constants::HALF_PI, Mat4, Vec3, EPS};
use crate::render::lighting::directional::{check_positive, finite_point, unit_direction};
use crate::render::lighting::transform;

/// Parameters of a spot light
///
/// Light is full strength inside `border_in` and fades out towards
/// `border_out` (half-angles in radians). Shadows are cast between
/// `shadow_min_distance` and `shadow_max_distance` from the light.
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    position: Vec3,
    direction: Vec3,
    border_in: f64,
    border_out: f64,
    constant: f64,
    linear: f64,
    quadratic: f64,
    shadow_min_distance: f64,
    shadow_max_distance: f64,
    projection: Mat4,
}

impl SpotLight {
    /// Default near shadow distance
    pub const DEFAULT_SHADOW_MIN_DISTANCE: f64 = 1.0;
    /// Default far shadow distance
    pub const DEFAULT_SHADOW_MAX_DISTANCE: f64 = 10.0;

    /// Spot light at `position` shining along `direction`
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when `direction` has zero length or
    /// the borders violate `0 <= border_in < border_out < π/2`.
    pub fn new(position: Vec3, direction: Vec3, border_in: f64, border_out: f64) -> Result<Self> {
        check_borders("SpotLight::new", border_in, border_out)?;
        let (near, far) = (Self::DEFAULT_SHADOW_MIN_DISTANCE, Self::DEFAULT_SHADOW_MAX_DISTANCE);

        let light = Self {
            position: finite_point("SpotLight::new", &position)?,
            direction: unit_direction("SpotLight::new", &direction)?,
            border_in,
            border_out,
            constant: 1.0,
            linear: 0.0,
            quadratic: 0.0,
            shadow_min_distance: near,
            shadow_max_distance: far,
            projection: transform::perspective_projection(border_out, near, far)?,
        };
        log::debug!(
            "Created spot light at {:?} with borders ({border_in}, {border_out})",
            position.as_slice()
        );
        Ok(light)
    }

    /// Light position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Unit light direction
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    /// Inner and outer cone half-angles
    pub fn borders(&self) -> (f64, f64) {
        (self.border_in, self.border_out)
    }

    /// Attenuation coefficients `(constant, linear, quadratic)`
    pub fn attenuation(&self) -> (f64, f64, f64) {
        (self.constant, self.linear, self.quadratic)
    }

    /// Shadow depth range `(min, max)`
    pub fn shadow_distance(&self) -> (f64, f64) {
        (self.shadow_min_distance, self.shadow_max_distance)
    }

    /// Cached perspective projection
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// World to light space
    pub fn view_matrix(&self) -> Mat4 {
        transform::view_matrix(&self.position, &self.direction)
    }

    /// Light space to world
    pub fn view_matrix_inverse(&self) -> Mat4 {
        transform::view_matrix_inverse(&self.position, &self.direction)
    }

    /// Move the light
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when a coordinate is not finite.
    pub fn set_position(&mut self, position: Vec3) -> Result<&mut Self> {
        self.position = finite_point("SpotLight::set_position", &position)?;
        Ok(self)
    }

    /// Set the light direction (normalized)
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when `direction` has zero length.
    pub fn set_direction(&mut self, direction: Vec3) -> Result<&mut Self> {
        self.direction = unit_direction("SpotLight::set_direction", &direction)?;
        Ok(self)
    }

    /// Set the inner and outer cone half-angles
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] unless `0 <= border_in < border_out < π/2`.
    pub fn set_borders(&mut self, border_in: f64, border_out: f64) -> Result<&mut Self> {
        check_borders("SpotLight::set_borders", border_in, border_out)?;
        self.projection = transform::perspective_projection(
            border_out,
            self.shadow_min_distance,
            self.shadow_max_distance,
        )?;
        self.border_in = border_in;
        self.border_out = border_out;
        log::debug!("Spot light borders set to ({border_in}, {border_out})");
        Ok(self)
    }

    /// Set the attenuation coefficients
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when a coefficient is negative or not
    /// finite.
    pub fn set_attenuation(&mut self, constant: f64, linear: f64, quadratic: f64) -> Result<&mut Self> {
        let valid = |coefficient: f64| coefficient >= 0.0 && coefficient.is_finite();
        if !(valid(constant) && valid(linear) && valid(quadratic)) {
            return Err(GraphError::invalid(format!(
                "SpotLight::set_attenuation: invalid coefficients ({constant}, {linear}, {quadratic})"
            )));
        }
        self.constant = constant;
        self.linear = linear;
        self.quadratic = quadratic;
        Ok(self)
    }

    /// Set the shadow depth range
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] unless `0 < min < max`.
    pub fn set_shadow_distance(&mut self, min: f64, max: f64) -> Result<&mut Self> {
        check_positive("SpotLight::set_shadow_distance", "shadow distance", min)?;
        if !(max - min >= EPS && max.is_finite()) {
            return Err(GraphError::invalid(format!(
                "SpotLight::set_shadow_distance: invalid shadow distance ({min}, {max})"
            )));
        }

        self.projection = transform::perspective_projection(self.border_out, min, max)?;
        self.shadow_min_distance = min;
        self.shadow_max_distance = max;
        log::debug!("Spot light shadow range set to ({min}, {max})");
        Ok(self)
    }
}

fn check_borders(context: &str, border_in: f64, border_out: f64) -> Result<()> {
    if !(border_in >= 0.0 && border_out - border_in >= EPS && border_out < HALF_PI - EPS) {
        return Err(GraphError::invalid(format!(
            "{context}: invalid values of the inner and outer angles ({border_in}, {border_out})"
        )));
    }
    Ok(())
}
