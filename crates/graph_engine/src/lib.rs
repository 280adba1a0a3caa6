//! # Graph Engine
//!
//! Geometry kernel and light/shadow transform pipeline for a real-time 3D
//! renderer.
//!
//! ## Features
//!
//! - **Geometry**: lines, segments and planes with intersection, projection
//!   and reflection queries under a shared tolerance
//! - **Lights**: directional and spot lights that keep their shadow-map
//!   projections in sync with every parameter change
//! - **Shadow volumes**: debug geometry outlining what each shadow map covers
//! - **Backend agnostic**: uniforms flow through the [`UniformSink`] trait
//! - **Scene files**: lights described in TOML or RON
//!
//! ## Quick Start
//!
//! ```rust
//! use graph_engine::prelude::*;
//!
//! fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let floor = Plane::from_normal(Vec3::y(), Vec3::zeros())?;
//!     let ray = Line::new(Vec3::new(0.0, 5.0, 0.0), Vec3::new(1.0, 4.0, 0.0))?;
//!     let hit = floor.intersect(&ray);
//!     assert!(floor.on_plane(&hit));
//!
//!     let environment = SceneConfig::default().build()?;
//!     let mut sink = RecordingSink::new();
//!     environment.set_uniforms(&mut sink);
//!     Ok(())
//! }
//! ```
//!
//! [`UniformSink`]: render::UniformSink

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::similar_names,
    clippy::too_many_arguments,
    clippy::many_single_char_names
)]

pub mod config;
pub mod error;
pub mod foundation;
pub mod geometry;
pub mod render;

#[cfg(test)]
mod tests;

pub use error::{GraphError, Result};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, LightConfig, LightKindConfig, SceneConfig},
        error::{GraphError, Result},
        foundation::math::{Mat4, Mat4Ext, Vec3, Vec3Ext, EPS},
        geometry::{Cut, Line, Plane},
        render::{
            DirectionalLight, Light, LightKind, LightingEnvironment, Material, Mesh, RecordingSink,
            RenderBundle, SpotLight, UniformSink,
        },
    };
}
