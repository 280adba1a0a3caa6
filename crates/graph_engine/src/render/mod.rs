//! # Rendering data
//!
//! Backend-agnostic render-side types: meshes and materials, instanced mesh
//! bundles, scene lights with their shadow-map transforms, and the
//! [`UniformSink`] seam through which a renderer receives shader uniforms.
//!
//! Nothing in this module talks to a graphics API. A backend implements
//! [`UniformSink`], calls [`RenderBundle::submit`] and
//! [`LightingEnvironment::set_uniforms`], and owns all GPU resources.

pub mod lighting;
pub mod material;
pub mod mesh;
pub mod object;
pub mod shadow;
pub mod uniforms;

pub use lighting::{DirectionalLight, Light, LightKind, LightingEnvironment, SpotLight, MAX_LIGHTS};
pub use material::Material;
pub use mesh::{Mesh, Vertex};
pub use object::{Model, ModelKey, RenderBundle};
pub use uniforms::{LightUniformData, RecordingSink, UniformSink, UniformValue};
