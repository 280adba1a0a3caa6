//! Scene lights and shadow-map transforms
//!
//! A [`Light`] carries the colors shared by every light type plus a
//! [`LightKind`] holding the type-specific parameters. Each kind owns its
//! projection matrix and refreshes it inside the setters that affect it, so
//! queries never mutate. The light-space matrix (`projection × view`) is
//! rebuilt on every call because the view follows position and direction.
//!
//! Supported kinds:
//! - **Directional**: parallel rays, orthographic shadow box
//! - **Spot**: cone with inner/outer borders, perspective shadow frustum

pub mod directional;
pub mod spot;
pub mod transform;

pub use directional::DirectionalLight;
pub use spot::SpotLight;

use crate::error::{GraphError, Result};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};
use crate::render::material::check_color;
use crate::render::object::RenderBundle;
use crate::render::shadow;
use crate::render::uniforms::{light_type, padded, LightUniformData, UniformSink};

/// Type-specific light parameters
#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Directional light (like sunlight)
    Directional(DirectionalLight),
    /// Spot light (like a flashlight)
    Spot(SpotLight),
}

/// Light source
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    ambient: Vec3,
    diffuse: Vec3,
    specular: Vec3,
    shadow: bool,
    kind: LightKind,
}

impl Light {
    /// Wrap type-specific parameters with black colors and no shadow
    pub fn new(kind: LightKind) -> Self {
        Self {
            ambient: Vec3::zeros(),
            diffuse: Vec3::zeros(),
            specular: Vec3::zeros(),
            shadow: false,
            kind,
        }
    }

    /// Create a directional light
    ///
    /// # Errors
    /// See [`DirectionalLight::new`].
    pub fn directional(direction: Vec3) -> Result<Self> {
        Ok(Self::new(LightKind::Directional(DirectionalLight::new(direction)?)))
    }

    /// Create a spot light
    ///
    /// # Errors
    /// See [`SpotLight::new`].
    pub fn spot(position: Vec3, direction: Vec3, border_in: f64, border_out: f64) -> Result<Self> {
        Ok(Self::new(LightKind::Spot(SpotLight::new(
            position, direction, border_in, border_out,
        )?)))
    }

    /// Type-specific parameters
    pub fn kind(&self) -> &LightKind {
        &self.kind
    }

    /// Directional parameters, if this is a directional light
    pub fn as_directional_mut(&mut self) -> Option<&mut DirectionalLight> {
        match &mut self.kind {
            LightKind::Directional(light) => Some(light),
            LightKind::Spot(_) => None,
        }
    }

    /// Spot parameters, if this is a spot light
    pub fn as_spot_mut(&mut self) -> Option<&mut SpotLight> {
        match &mut self.kind {
            LightKind::Spot(light) => Some(light),
            LightKind::Directional(_) => None,
        }
    }

    /// Ambient color
    pub fn ambient(&self) -> Vec3 {
        self.ambient
    }

    /// Diffuse color
    pub fn diffuse(&self) -> Vec3 {
        self.diffuse
    }

    /// Specular color
    pub fn specular(&self) -> Vec3 {
        self.specular
    }

    /// Whether the light casts shadows
    pub fn shadow(&self) -> bool {
        self.shadow
    }

    /// Set the ambient color
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when a component is outside `[0, 1]`.
    pub fn set_ambient(&mut self, ambient: Vec3) -> Result<&mut Self> {
        check_color("Light::set_ambient", &ambient)?;
        self.ambient = ambient;
        Ok(self)
    }

    /// Set the diffuse color
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when a component is outside `[0, 1]`.
    pub fn set_diffuse(&mut self, diffuse: Vec3) -> Result<&mut Self> {
        check_color("Light::set_diffuse", &diffuse)?;
        self.diffuse = diffuse;
        Ok(self)
    }

    /// Set the specular color
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when a component is outside `[0, 1]`.
    pub fn set_specular(&mut self, specular: Vec3) -> Result<&mut Self> {
        check_color("Light::set_specular", &specular)?;
        self.specular = specular;
        Ok(self)
    }

    /// Enable or disable shadow casting
    pub fn set_shadow(&mut self, shadow: bool) -> &mut Self {
        self.shadow = shadow;
        self
    }

    /// Light direction (unit)
    pub fn direction(&self) -> Vec3 {
        match &self.kind {
            LightKind::Directional(light) => light.direction(),
            LightKind::Spot(light) => light.direction(),
        }
    }

    /// World to light space
    pub fn view_matrix(&self) -> Mat4 {
        match &self.kind {
            LightKind::Directional(light) => light.view_matrix(),
            LightKind::Spot(light) => light.view_matrix(),
        }
    }

    /// Light space to world
    pub fn view_matrix_inverse(&self) -> Mat4 {
        match &self.kind {
            LightKind::Directional(light) => light.view_matrix_inverse(),
            LightKind::Spot(light) => light.view_matrix_inverse(),
        }
    }

    /// Cached projection of the light's kind
    pub fn projection_matrix(&self) -> Mat4 {
        match &self.kind {
            LightKind::Directional(light) => light.projection_matrix(),
            LightKind::Spot(light) => light.projection_matrix(),
        }
    }

    /// World to shadow-map clip space (`projection × view`)
    pub fn light_space_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Debug geometry outlining the region the shadow map covers
    pub fn shadow_volume(&self) -> RenderBundle {
        match &self.kind {
            LightKind::Directional(light) => shadow::directional_volume(light),
            LightKind::Spot(light) => shadow::spot_volume(light),
        }
    }

    /// Emissive marker drawn at the light, spot lights only
    pub fn light_object(&self) -> Option<RenderBundle> {
        match &self.kind {
            LightKind::Directional(_) => None,
            LightKind::Spot(light) => Some(shadow::spot_glyph(light)),
        }
    }

    /// Write this light as `lights[draw_id].*`
    ///
    /// `light_space` is only written for shadow casting lights.
    #[allow(clippy::cast_possible_truncation)]
    pub fn set_uniforms(&self, draw_id: usize, sink: &mut dyn UniformSink) {
        let name = |field: &str| format!("lights[{draw_id}].{field}");

        sink.set_int(&name("shadow"), i32::from(self.shadow));
        match &self.kind {
            LightKind::Directional(light) => {
                sink.set_int(&name("type"), light_type::DIRECTIONAL);
                sink.set_vector(&name("direction"), &light.direction());
            }
            LightKind::Spot(light) => {
                let (border_in, border_out) = light.borders();
                let (constant, linear, quadratic) = light.attenuation();
                sink.set_int(&name("type"), light_type::SPOT);
                sink.set_vector(&name("position"), &light.position());
                sink.set_vector(&name("direction"), &light.direction());
                sink.set_float(&name("cut_in"), border_in.cos() as f32);
                sink.set_float(&name("cut_out"), border_out.cos() as f32);
                sink.set_float(&name("constant"), constant as f32);
                sink.set_float(&name("linear"), linear as f32);
                sink.set_float(&name("quadratic"), quadratic as f32);
            }
        }
        sink.set_vector(&name("ambient"), &self.ambient);
        sink.set_vector(&name("diffuse"), &self.diffuse);
        sink.set_vector(&name("specular"), &self.specular);
        if self.shadow {
            sink.set_matrix(&name("light_space"), &self.light_space_matrix());
        }
    }

    /// Packed record for a lights uniform buffer
    #[allow(clippy::cast_possible_truncation)]
    pub fn uniform_data(&self) -> LightUniformData {
        let (kind, position, cut_off, attenuation) = match &self.kind {
            LightKind::Directional(_) => (
                light_type::DIRECTIONAL,
                [0.0; 4],
                [0.0; 4],
                [1.0, 0.0, 0.0, 0.0],
            ),
            LightKind::Spot(light) => {
                let (border_in, border_out) = light.borders();
                let (constant, linear, quadratic) = light.attenuation();
                (
                    light_type::SPOT,
                    padded(&light.position()),
                    [border_in.cos() as f32, border_out.cos() as f32, 0.0, 0.0],
                    [constant as f32, linear as f32, quadratic as f32, 0.0],
                )
            }
        };

        LightUniformData {
            light_space: self.light_space_matrix().to_gpu(),
            position,
            direction: padded(&self.direction()),
            ambient: padded(&self.ambient),
            diffuse: padded(&self.diffuse),
            specular: padded(&self.specular),
            cut_off,
            attenuation,
            flags: [kind, i32::from(self.shadow), 0, 0],
        }
    }
}

/// Maximum number of lights the lighting shader accepts
pub const MAX_LIGHTS: usize = 16;

/// Ordered collection of scene lights
///
/// A light's index is its `draw_id` in the `lights[]` uniform array.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightingEnvironment {
    lights: Vec<Light>,
}

impl LightingEnvironment {
    /// Create a new empty lighting environment
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a light, returning its draw id
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when [`MAX_LIGHTS`] lights are present.
    pub fn add_light(&mut self, light: Light) -> Result<usize> {
        if self.lights.len() >= MAX_LIGHTS {
            return Err(GraphError::invalid(format!(
                "LightingEnvironment::add_light: at most {MAX_LIGHTS} lights are supported"
            )));
        }
        self.lights.push(light);
        Ok(self.lights.len() - 1)
    }

    /// Builder form of [`LightingEnvironment::add_light`]
    ///
    /// # Errors
    /// See [`LightingEnvironment::add_light`].
    pub fn with_light(mut self, light: Light) -> Result<Self> {
        self.add_light(light)?;
        Ok(self)
    }

    /// Remove and return the light with `draw_id`; later lights shift down
    pub fn remove_light(&mut self, draw_id: usize) -> Option<Light> {
        (draw_id < self.lights.len()).then(|| self.lights.remove(draw_id))
    }

    /// Lights in draw order
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Light with `draw_id`
    pub fn light(&self, draw_id: usize) -> Option<&Light> {
        self.lights.get(draw_id)
    }

    /// Mutable light with `draw_id`
    pub fn light_mut(&mut self, draw_id: usize) -> Option<&mut Light> {
        self.lights.get_mut(draw_id)
    }

    /// Number of lights
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    /// True when there are no lights
    pub fn is_empty(&self) -> bool {
        self.lights.is_empty()
    }

    /// Lights that render a shadow map, with their draw ids
    pub fn shadow_casters(&self) -> impl Iterator<Item = (usize, &Light)> {
        self.lights.iter().enumerate().filter(|(_, light)| light.shadow())
    }

    /// Shadow volumes of every shadow casting light
    pub fn shadow_volumes(&self) -> Vec<RenderBundle> {
        self.shadow_casters().map(|(_, light)| light.shadow_volume()).collect()
    }

    /// Write `count_lights` and every light's uniforms
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn set_uniforms(&self, sink: &mut dyn UniformSink) {
        sink.set_int("count_lights", self.lights.len() as i32);
        for (draw_id, light) in self.lights.iter().enumerate() {
            light.set_uniforms(draw_id, sink);
        }
    }

    /// Packed records for every light, in draw order
    pub fn uniform_data(&self) -> Vec<LightUniformData> {
        self.lights.iter().map(Light::uniform_data).collect()
    }
}
