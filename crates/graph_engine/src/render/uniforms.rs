//! Shader uniform submission
//!
//! The renderer backend is external to this crate. Everything that needs to
//! reach a shader goes through [`UniformSink`], keyed by the uniform's name in
//! the shader source (`lights[0].direction`, `material.diffuse`, `model`, ...).
//! [`RecordingSink`] captures the submitted values for debugging and tests.

use std::collections::HashMap;

use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec3Ext};
use crate::render::mesh::Mesh;

/// Receiver for named shader uniforms
pub trait UniformSink {
    /// Set an integer (or boolean) uniform
    fn set_int(&mut self, name: &str, value: i32);

    /// Set a scalar uniform
    fn set_float(&mut self, name: &str, value: f32);

    /// Set a `vec3` uniform
    fn set_vec3(&mut self, name: &str, value: [f32; 3]);

    /// Set a `mat4` uniform, column-major
    fn set_mat4(&mut self, name: &str, value: [[f32; 4]; 4]);

    /// Issue a draw for `mesh` with the uniforms set so far
    fn draw(&mut self, _mesh: &Mesh) {}

    /// Convenience wrapper converting a double precision vector
    fn set_vector(&mut self, name: &str, value: &Vec3) {
        self.set_vec3(name, value.to_gpu());
    }

    /// Convenience wrapper converting a double precision matrix
    fn set_matrix(&mut self, name: &str, value: &Mat4) {
        self.set_mat4(name, value.to_gpu());
    }
}

/// A captured uniform value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    /// `int` / `bool`
    Int(i32),
    /// `float`
    Float(f32),
    /// `vec3`
    Vec3([f32; 3]),
    /// `mat4`, column-major
    Mat4([[f32; 4]; 4]),
}

/// Sink that records the last value written to every uniform name
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    values: HashMap<String, UniformValue>,
    draw_calls: usize,
}

impl RecordingSink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Last value written under `name`
    pub fn get(&self, name: &str) -> Option<UniformValue> {
        self.values.get(name).copied()
    }

    /// Last integer written under `name`
    pub fn int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            UniformValue::Int(value) => Some(value),
            _ => None,
        }
    }

    /// Last scalar written under `name`
    pub fn float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            UniformValue::Float(value) => Some(value),
            _ => None,
        }
    }

    /// Last `vec3` written under `name`
    pub fn vec3(&self, name: &str) -> Option<[f32; 3]> {
        match self.get(name)? {
            UniformValue::Vec3(value) => Some(value),
            _ => None,
        }
    }

    /// Last `mat4` written under `name`
    pub fn mat4(&self, name: &str) -> Option<[[f32; 4]; 4]> {
        match self.get(name)? {
            UniformValue::Mat4(value) => Some(value),
            _ => None,
        }
    }

    /// Number of distinct uniform names written
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing has been written
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of [`UniformSink::draw`] calls received
    pub fn draw_calls(&self) -> usize {
        self.draw_calls
    }

    /// Forget every recorded value and draw call
    pub fn clear(&mut self) {
        self.values.clear();
        self.draw_calls = 0;
    }
}

impl UniformSink for RecordingSink {
    fn set_int(&mut self, name: &str, value: i32) {
        self.values.insert(name.to_owned(), UniformValue::Int(value));
    }

    fn set_float(&mut self, name: &str, value: f32) {
        self.values.insert(name.to_owned(), UniformValue::Float(value));
    }

    fn set_vec3(&mut self, name: &str, value: [f32; 3]) {
        self.values.insert(name.to_owned(), UniformValue::Vec3(value));
    }

    fn set_mat4(&mut self, name: &str, value: [[f32; 4]; 4]) {
        self.values.insert(name.to_owned(), UniformValue::Mat4(value));
    }

    fn draw(&mut self, _mesh: &Mesh) {
        self.draw_calls += 1;
    }
}

/// Light type codes understood by the lighting shader
pub mod light_type {
    /// Directional light
    pub const DIRECTIONAL: i32 = 0;
    /// Spot light
    pub const SPOT: i32 = 2;
}

/// Packed per-light record for a uniform buffer (std140 compatible)
///
/// Mirrors the per-name uniforms written by
/// [`Light::set_uniforms`](crate::render::lighting::Light::set_uniforms) so a
/// backend can upload all lights with a single buffer write.
#[repr(C, align(16))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightUniformData {
    /// Light-space matrix (projection × view), column-major
    pub light_space: [[f32; 4]; 4],
    /// Position (xyz, unused for directional lights) + padding
    pub position: [f32; 4],
    /// Unit direction + padding
    pub direction: [f32; 4],
    /// Ambient color + padding
    pub ambient: [f32; 4],
    /// Diffuse color + padding
    pub diffuse: [f32; 4],
    /// Specular color + padding
    pub specular: [f32; 4],
    /// Cosines of the inner and outer cone angles, then padding
    pub cut_off: [f32; 4],
    /// Attenuation (constant, linear, quadratic) + padding
    pub attenuation: [f32; 4],
    /// Light type code, shadow flag, then padding
    pub flags: [i32; 4],
}

// Only 4-byte scalars in 16-byte rows: no implicit padding.
unsafe impl bytemuck::Pod for LightUniformData {}
unsafe impl bytemuck::Zeroable for LightUniformData {}

impl LightUniformData {
    /// Raw bytes of a slice of light records
    pub fn as_bytes(lights: &[Self]) -> &[u8] {
        bytemuck::cast_slice(lights)
    }
}

/// Pad a color or vector to a `vec4` row
pub(crate) fn padded(value: &Vec3) -> [f32; 4] {
    let [x, y, z] = value.to_gpu();
    [x, y, z, 0.0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_sink_keeps_last_value() {
        let mut sink = RecordingSink::new();
        assert!(sink.is_empty());

        sink.set_int("lights[0].shadow", 1);
        sink.set_int("lights[0].shadow", 0);
        sink.set_vector("lights[0].direction", &Vec3::new(0.0, -1.0, 0.0));
        sink.set_matrix("model", &Mat4::identity());

        assert_eq!(sink.len(), 3);
        assert_eq!(sink.int("lights[0].shadow"), Some(0));
        assert_eq!(sink.vec3("lights[0].direction"), Some([0.0, -1.0, 0.0]));
        assert_eq!(sink.mat4("model").map(|m| m[3][3]), Some(1.0));
        // Wrong type lookups do not coerce.
        assert_eq!(sink.float("lights[0].shadow"), None);
        assert_eq!(sink.get("missing"), None);

        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_light_uniform_layout() {
        assert_eq!(std::mem::size_of::<LightUniformData>(), 64 + 8 * 16);
        assert_eq!(std::mem::align_of::<LightUniformData>(), 16);

        let records = [<LightUniformData as bytemuck::Zeroable>::zeroed(); 2];
        let bytes = LightUniformData::as_bytes(&records);
        assert_eq!(bytes.len(), 2 * std::mem::size_of::<LightUniformData>());
        assert!(bytes.iter().all(|&b| b == 0));
    }
}
