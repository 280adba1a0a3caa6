//! Surface materials

use crate::error::{GraphError, Result};
use crate::foundation::math::Vec3;
use crate::render::uniforms::UniformSink;

/// Check that every component of `color` lies in `[0, 1]`
pub(crate) fn check_color(context: &str, color: &Vec3) -> Result<()> {
    if color.iter().all(|component| (0.0..=1.0).contains(component)) {
        Ok(())
    } else {
        Err(GraphError::invalid(format!(
            "{context}: color components must lie in [0, 1], got ({}, {}, {})",
            color.x, color.y, color.z
        )))
    }
}

/// Phong material applied to every polygon of a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    ambient: Vec3,
    diffuse: Vec3,
    specular: Vec3,
    emission: Vec3,
    shininess: f64,
    alpha: f64,
    /// Whether the surface is rendered into shadow maps
    pub shadow: bool,
}

impl Material {
    /// Black, opaque, non shadow-casting material
    pub fn new() -> Self {
        Self {
            ambient: Vec3::zeros(),
            diffuse: Vec3::zeros(),
            specular: Vec3::zeros(),
            emission: Vec3::zeros(),
            shininess: 1.0,
            alpha: 1.0,
            shadow: false,
        }
    }

    // Builders for in-crate constant materials. Callers pass values already
    // inside the ranges the `set_*` setters enforce.

    pub(crate) fn with_diffuse(mut self, diffuse: Vec3) -> Self {
        debug_assert!(check_color("Material::with_diffuse", &diffuse).is_ok());
        self.diffuse = diffuse;
        self
    }

    pub(crate) fn with_emission(mut self, emission: Vec3) -> Self {
        debug_assert!(check_color("Material::with_emission", &emission).is_ok());
        self.emission = emission;
        self
    }

    pub(crate) fn with_alpha(mut self, alpha: f64) -> Self {
        debug_assert!((0.0..=1.0).contains(&alpha));
        self.alpha = alpha;
        self
    }

    pub(crate) fn with_shadow(mut self, shadow: bool) -> Self {
        self.shadow = shadow;
        self
    }

    /// Ambient reflectance
    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    /// Diffuse reflectance
    pub fn diffuse(&self) -> Vec3 {
        self.diffuse
    }

    /// Specular reflectance
    pub fn specular(&self) -> Vec3 {
        self.specular
    }

    /// Emitted color
    pub fn emission(&self) -> Vec3 {
        self.emission
    }

    /// Specular exponent
    pub fn shininess(&self) -> f64 {
        self.shininess
    }

    /// Opacity, `1` is fully opaque
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Set the ambient reflectance
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when a component is outside `[0, 1]`.
    pub fn set_ambient(&mut self, ambient: Vec3) -> Result<&mut Self> {
        check_color("Material::set_ambient", &ambient)?;
        self.ambient = ambient;
        Ok(self)
    }

    /// Set the diffuse reflectance
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when a component is outside `[0, 1]`.
    pub fn set_diffuse(&mut self, diffuse: Vec3) -> Result<&mut Self> {
        check_color("Material::set_diffuse", &diffuse)?;
        self.diffuse = diffuse;
        Ok(self)
    }

    /// Set the specular reflectance
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when a component is outside `[0, 1]`.
    pub fn set_specular(&mut self, specular: Vec3) -> Result<&mut Self> {
        check_color("Material::set_specular", &specular)?;
        self.specular = specular;
        Ok(self)
    }

    /// Set the emitted color
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when a component is outside `[0, 1]`.
    pub fn set_emission(&mut self, emission: Vec3) -> Result<&mut Self> {
        check_color("Material::set_emission", &emission)?;
        self.emission = emission;
        Ok(self)
    }

    /// Set the specular exponent
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] unless `shininess` is positive and
    /// finite.
    pub fn set_shininess(&mut self, shininess: f64) -> Result<&mut Self> {
        if !(shininess > 0.0 && shininess.is_finite()) {
            return Err(GraphError::invalid(format!(
                "Material::set_shininess: not a positive exponent ({shininess})"
            )));
        }
        self.shininess = shininess;
        Ok(self)
    }

    /// Set the opacity
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when `alpha` is outside `[0, 1]`.
    pub fn set_alpha(&mut self, alpha: f64) -> Result<&mut Self> {
        if !(0.0..=1.0).contains(&alpha) {
            return Err(GraphError::invalid(format!(
                "Material::set_alpha: alpha must lie in [0, 1], got {alpha}"
            )));
        }
        self.alpha = alpha;
        Ok(self)
    }

    /// Write the material under the `material.` prefix
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_uniforms(&self, sink: &mut dyn UniformSink) {
        sink.set_vector("material.ambient", &self.ambient);
        sink.set_vector("material.diffuse", &self.diffuse);
        sink.set_vector("material.specular", &self.specular);
        sink.set_vector("material.emission", &self.emission);
        sink.set_float("material.shininess", self.shininess as f32);
        sink.set_float("material.alpha", self.alpha as f32);
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::new()
    }
}
