//! Configuration system
//!
//! Scene descriptions are plain serde structs stored as TOML or RON. The
//! [`Config`] trait picks the format from the file extension.

use std::path::Path;

pub use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::foundation::math::Vec3;
use crate::render::lighting::{Light, LightingEnvironment};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = Format::of(path)?;
        let contents = std::fs::read_to_string(path)?;

        match format {
            Format::Toml => toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
            Format::Ron => ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string())),
        }
    }

    /// Load configuration, falling back to the default on any error
    fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        Self::load_from_file(path).unwrap_or_else(|error| {
            log::warn!("Ignoring config {}: {error}; using defaults", path.display());
            Self::default()
        })
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let contents = match Format::of(path)? {
            Format::Toml => {
                toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
            }
            Format::Ron => ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?,
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

enum Format {
    Toml,
    Ron,
}

impl Format {
    fn of(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("ron") => Ok(Self::Ron),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The file parsed but describes an invalid scene
    #[error("Invalid scene: {0}")]
    Invalid(#[from] GraphError),
}

/// Type-specific part of a [`LightConfig`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKindConfig {
    /// Directional light
    Directional {
        /// Light direction, normalized on build
        direction: Vec3,
        /// Shadow box origin
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shadow_position: Option<Vec3>,
        /// Shadow box `[width, height, depth]`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shadow_size: Option<[f64; 3]>,
    },
    /// Spot light
    Spot {
        /// Light position
        position: Vec3,
        /// Light direction, normalized on build
        direction: Vec3,
        /// Inner cone half-angle in radians
        border_in: f64,
        /// Outer cone half-angle in radians
        border_out: f64,
        /// `[constant, linear, quadratic]`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attenuation: Option<[f64; 3]>,
        /// `[min, max]` shadow distance
        #[serde(default, skip_serializing_if = "Option::is_none")]
        shadow_distance: Option<[f64; 2]>,
    },
}

/// One light in a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightConfig {
    /// Ambient color
    #[serde(default = "zero")]
    pub ambient: Vec3,
    /// Diffuse color
    #[serde(default = "zero")]
    pub diffuse: Vec3,
    /// Specular color
    #[serde(default = "zero")]
    pub specular: Vec3,
    /// Whether the light casts shadows
    #[serde(default)]
    pub shadow: bool,
    /// Type-specific parameters
    pub kind: LightKindConfig,
}

fn zero() -> Vec3 {
    Vec3::zeros()
}

impl LightConfig {
    /// Build and validate the light
    ///
    /// # Errors
    /// Any [`GraphError`] raised by the light constructors and setters.
    pub fn build(&self) -> crate::Result<Light> {
        let mut light = match &self.kind {
            LightKindConfig::Directional {
                direction,
                shadow_position,
                shadow_size,
            } => {
                let mut light = Light::directional(*direction)?;
                if let Some(directional) = light.as_directional_mut() {
                    if let Some(position) = shadow_position {
                        directional.set_shadow_position(*position)?;
                    }
                    if let Some([width, height, depth]) = shadow_size {
                        directional
                            .set_shadow_width(*width)?
                            .set_shadow_height(*height)?
                            .set_shadow_depth(*depth)?;
                    }
                }
                light
            }
            LightKindConfig::Spot {
                position,
                direction,
                border_in,
                border_out,
                attenuation,
                shadow_distance,
            } => {
                let mut light = Light::spot(*position, *direction, *border_in, *border_out)?;
                if let Some(spot) = light.as_spot_mut() {
                    if let Some([constant, linear, quadratic]) = attenuation {
                        spot.set_attenuation(*constant, *linear, *quadratic)?;
                    }
                    if let Some([min, max]) = shadow_distance {
                        spot.set_shadow_distance(*min, *max)?;
                    }
                }
                light
            }
        };

        light
            .set_ambient(self.ambient)?
            .set_diffuse(self.diffuse)?
            .set_specular(self.specular)?
            .set_shadow(self.shadow);
        Ok(light)
    }
}

/// Lights of a scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Lights in draw order
    #[serde(default)]
    pub lights: Vec<LightConfig>,
}

impl Default for SceneConfig {
    /// A shadow casting sun and a spot light above the origin
    fn default() -> Self {
        Self {
            lights: vec![
                LightConfig {
                    ambient: Vec3::new(0.2, 0.2, 0.2),
                    diffuse: Vec3::new(0.8, 0.8, 0.8),
                    specular: Vec3::new(0.5, 0.5, 0.5),
                    shadow: true,
                    kind: LightKindConfig::Directional {
                        direction: Vec3::new(-0.2, -1.0, -0.3),
                        shadow_position: Some(Vec3::new(0.0, 10.0, 0.0)),
                        shadow_size: None,
                    },
                },
                LightConfig {
                    ambient: Vec3::zeros(),
                    diffuse: Vec3::new(1.0, 0.9, 0.7),
                    specular: Vec3::new(1.0, 1.0, 1.0),
                    shadow: false,
                    kind: LightKindConfig::Spot {
                        position: Vec3::new(2.0, 3.0, 2.0),
                        direction: Vec3::new(-2.0, -3.0, -2.0),
                        border_in: 0.2,
                        border_out: 0.5,
                        attenuation: Some([1.0, 0.09, 0.032]),
                        shadow_distance: None,
                    },
                },
            ],
        }
    }
}

impl Config for SceneConfig {}

impl SceneConfig {
    /// Build every light into a [`LightingEnvironment`]
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first light that fails validation.
    pub fn build(&self) -> Result<LightingEnvironment, ConfigError> {
        let mut environment = LightingEnvironment::new();
        for (index, light) in self.lights.iter().enumerate() {
            let built = light.build().map_err(|error| annotate(index, error))?;
            environment.add_light(built)?;
        }
        log::debug!("Built lighting environment with {} lights", environment.len());
        Ok(environment)
    }
}

fn annotate(index: usize, error: GraphError) -> GraphError {
    match error {
        GraphError::InvalidArgument(message) => {
            GraphError::InvalidArgument(format!("light {index}: {message}"))
        }
        GraphError::DomainError(message) => GraphError::DomainError(format!("light {index}: {message}")),
    }
}
