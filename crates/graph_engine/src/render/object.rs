//! Renderable mesh bundles with per-instance model matrices

use slotmap::{new_key_type, SlotMap};

use crate::error::{GraphError, Result};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3, EPS};
use crate::render::material::Material;
use crate::render::mesh::Mesh;
use crate::render::uniforms::UniformSink;

new_key_type! {
    /// Handle to one instance of a [`RenderBundle`]
    pub struct ModelKey;
}

/// One placed instance of a bundle
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    /// Model-to-world transform
    pub matrix: Mat4,
}

/// A set of meshes drawn once per model instance
///
/// Shadow volumes and light glyphs are returned as bundles; callers hand them
/// to the renderer through [`RenderBundle::submit`].
#[derive(Debug, Clone, Default)]
pub struct RenderBundle {
    meshes: Vec<Mesh>,
    models: SlotMap<ModelKey, Model>,
    /// Draw after opaque geometry with blending enabled
    pub transparent: bool,
}

impl RenderBundle {
    /// Empty bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle holding `meshes` and no instances
    pub fn from_meshes(meshes: Vec<Mesh>) -> Self {
        Self {
            meshes,
            ..Self::default()
        }
    }

    /// Append a mesh, returning its index
    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    /// Meshes in insertion order
    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    /// Mutable access to the meshes
    pub fn meshes_mut(&mut self) -> &mut [Mesh] {
        &mut self.meshes
    }

    /// Apply `material` to every mesh
    pub fn set_material(&mut self, material: &Material) {
        for mesh in &mut self.meshes {
            mesh.material = material.clone();
        }
    }

    /// Add an instance placed by `matrix`
    pub fn add_model(&mut self, matrix: Mat4) -> ModelKey {
        self.models.insert(Model { matrix })
    }

    /// Remove an instance, returning its matrix
    pub fn remove_model(&mut self, key: ModelKey) -> Option<Mat4> {
        self.models.remove(key).map(|model| model.matrix)
    }

    /// True when `key` names a live instance
    pub fn contains_model(&self, key: ModelKey) -> bool {
        self.models.contains_key(key)
    }

    /// Number of live instances
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Live instances
    pub fn models(&self) -> impl Iterator<Item = (ModelKey, &Model)> {
        self.models.iter()
    }

    fn model(&self, key: ModelKey) -> Result<&Model> {
        self.models
            .get(key)
            .ok_or_else(|| GraphError::invalid("RenderBundle: invalid model key"))
    }

    fn model_mut(&mut self, key: ModelKey) -> Result<&mut Model> {
        self.models
            .get_mut(key)
            .ok_or_else(|| GraphError::invalid("RenderBundle: invalid model key"))
    }

    /// Model matrix of an instance
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] for an unknown key.
    pub fn matrix(&self, key: ModelKey) -> Result<Mat4> {
        Ok(self.model(key)?.matrix)
    }

    /// Replace the model matrix of an instance
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] for an unknown key.
    pub fn set_matrix(&mut self, key: ModelKey, matrix: Mat4) -> Result<()> {
        self.model_mut(key)?.matrix = matrix;
        Ok(())
    }

    /// Compose `transform` after the current model matrix (left multiply)
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] for an unknown key.
    pub fn change_matrix(&mut self, key: ModelKey, transform: &Mat4) -> Result<()> {
        let model = self.model_mut(key)?;
        model.matrix = transform * model.matrix;
        Ok(())
    }

    /// Scale an instance about its own model-space origin
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] for an unknown key,
    /// [`GraphError::DomainError`] when the model matrix is singular.
    pub fn central_scaling(&mut self, key: ModelKey, scale: &Vec3) -> Result<()> {
        let matrix = self.matrix(key)?;
        let inverse = matrix.try_inverse().ok_or_else(|| {
            GraphError::domain("RenderBundle::central_scaling: model matrix is singular")
        })?;
        self.change_matrix(key, &(matrix * Mat4::scaling(scale) * inverse))
    }

    /// Center of the distinct mesh corners in model space
    #[allow(clippy::cast_precision_loss)]
    pub fn center(&self) -> Vec3 {
        let mut distinct: Vec<Vec3> = Vec::new();
        for position in self.meshes.iter().flat_map(Mesh::positions) {
            if !distinct.iter().any(|seen| (seen - position).norm() < EPS) {
                distinct.push(*position);
            }
        }

        if distinct.is_empty() {
            return Vec3::zeros();
        }
        distinct.iter().sum::<Vec3>() / distinct.len() as f64
    }

    /// Center of an instance in world space
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] for an unknown key.
    pub fn world_center(&self, key: ModelKey) -> Result<Vec3> {
        Ok(self.model(key)?.matrix.apply_point(&self.center()))
    }

    /// Corners of one mesh of an instance in world space
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] for an unknown key or mesh index.
    pub fn world_positions(&self, key: ModelKey, mesh: usize) -> Result<Vec<Vec3>> {
        let matrix = self.model(key)?.matrix;
        let mesh = self.meshes.get(mesh).ok_or_else(|| {
            GraphError::invalid(format!("RenderBundle: invalid mesh index {mesh}"))
        })?;
        Ok(mesh.positions().iter().map(|p| matrix.apply_point(p)).collect())
    }

    /// Draw every mesh of every instance
    ///
    /// Writes `model` and the mesh material before each draw.
    pub fn submit(&self, sink: &mut dyn UniformSink) {
        for model in self.models.values() {
            sink.set_matrix("model", &model.matrix);
            for mesh in &self.meshes {
                mesh.material.set_uniforms(sink);
                sink.draw(mesh);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::uniforms::RecordingSink;
    use approx::assert_relative_eq;

    fn cube_bundle() -> RenderBundle {
        RenderBundle::from_meshes(Mesh::cube())
    }

    #[test]
    fn test_change_matrix_left_multiplies() {
        let mut bundle = cube_bundle();
        let key = bundle.add_model(Mat4::scaling(&Vec3::new(2.0, 2.0, 2.0)));
        bundle
            .change_matrix(key, &Mat4::translation(&Vec3::new(0.0, 0.0, 5.0)))
            .unwrap();

        // Scale first, then translate.
        let corner = bundle.matrix(key).unwrap().apply_point(&Vec3::new(0.5, 0.5, 0.5));
        assert_relative_eq!(corner, Vec3::new(1.0, 1.0, 6.0));
        assert_relative_eq!(bundle.world_center(key).unwrap(), Vec3::new(0.0, 0.0, 5.0));
    }

    #[test]
    fn test_center_ignores_shared_corners() {
        let bundle = RenderBundle::from_meshes(vec![
            Mesh::triangle(Vec3::zeros(), Vec3::x(), Vec3::y()).unwrap(),
            Mesh::triangle(Vec3::zeros(), Vec3::y(), -Vec3::x()).unwrap(),
        ]);
        // Four distinct corners, not six.
        assert_relative_eq!(bundle.center(), Vec3::new(0.0, 0.25, 0.0));
        assert_relative_eq!(cube_bundle().center(), Vec3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_keys_are_errors() {
        let mut bundle = cube_bundle();
        let key = bundle.add_model(Mat4::identity());
        assert!(bundle.contains_model(key));
        assert_eq!(bundle.remove_model(key), Some(Mat4::identity()));

        assert!(matches!(bundle.matrix(key), Err(GraphError::InvalidArgument(_))));
        assert!(bundle.set_matrix(key, Mat4::identity()).is_err());
        assert!(bundle.world_positions(key, 0).is_err());
        assert_eq!(bundle.model_count(), 0);

        let other = bundle.add_model(Mat4::identity());
        assert!(bundle.world_positions(other, 6).is_err());
        assert_eq!(bundle.world_positions(other, 5).unwrap().len(), 4);
    }

    #[test]
    fn test_central_scaling_keeps_origin() {
        let mut bundle = cube_bundle();
        let key = bundle.add_model(Mat4::translation(&Vec3::new(3.0, 0.0, 0.0)));
        bundle.central_scaling(key, &Vec3::new(2.0, 1.0, 1.0)).unwrap();
        assert_relative_eq!(bundle.world_center(key).unwrap(), Vec3::new(3.0, 0.0, 0.0), epsilon = 1e-12);

        let degenerate = bundle.add_model(Mat4::zeros());
        assert!(matches!(
            bundle.central_scaling(degenerate, &Vec3::new(2.0, 2.0, 2.0)),
            Err(GraphError::DomainError(_))
        ));
    }

    #[test]
    fn test_submit_draws_each_mesh_per_model() {
        let mut bundle = cube_bundle();
        let mut material = Material::new();
        material.set_alpha(0.5).unwrap();
        bundle.set_material(&material);
        bundle.add_model(Mat4::identity());
        bundle.add_model(Mat4::translation(&Vec3::new(1.0, 0.0, 0.0)));

        let mut sink = RecordingSink::new();
        bundle.submit(&mut sink);
        assert_eq!(sink.draw_calls(), 12);
        assert_eq!(sink.float("material.alpha"), Some(0.5));
        assert!(sink.mat4("model").is_some());
    }
}
