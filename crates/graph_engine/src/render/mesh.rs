//! Polygon meshes
//!
//! A [`Mesh`] is one flat convex polygon (drawn as a triangle fan) with its
//! own [`Material`]. Meshes are pure data: positions live in `f64` model
//! space and are converted to the `#[repr(C)]` [`Vertex`] layout only when a
//! backend asks for upload data.

use crate::error::{GraphError, Result};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3, Vec3Ext, EPS};
use crate::render::material::Material;

/// GPU vertex layout: position, normal, texture coordinate
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Unit normal
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

// Safe to implement Pod and Zeroable for Vertex since it only contains f32 arrays
unsafe impl bytemuck::Pod for Vertex {}
unsafe impl bytemuck::Zeroable for Vertex {}

/// Flat convex polygon with a material
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    positions: Vec<Vec3>,
    tex_coords: Vec<[f64; 2]>,
    normal: Vec3,
    /// Material applied to the whole polygon
    pub material: Material,
}

/// Normal of the fan `positions`, or `None` when the first three are collinear
fn face_normal(positions: &[Vec3]) -> Option<Vec3> {
    let [first, second, third, ..] = positions else {
        return None;
    };
    (first - second).cross(&(first - third)).try_normalize(EPS)
}

impl Mesh {
    /// Polygon through `positions`, in fan order
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] with fewer than three positions or
    /// when the first three are collinear.
    pub fn new(positions: Vec<Vec3>) -> Result<Self> {
        if positions.len() < 3 {
            return Err(GraphError::invalid(format!(
                "Mesh: a polygon needs at least three points, got {}",
                positions.len()
            )));
        }
        let normal = face_normal(&positions)
            .ok_or_else(|| GraphError::invalid("Mesh: polygon points are collinear"))?;

        Ok(Self {
            tex_coords: vec![[0.0, 0.0]; positions.len()],
            positions,
            normal,
            material: Material::default(),
        })
    }

    /// Polygon from fixed corners known to be non-degenerate
    pub(crate) fn from_corners<const N: usize>(corners: [Vec3; N]) -> Self {
        let positions = corners.to_vec();
        let normal = face_normal(&positions).unwrap_or_else(|| {
            log::trace!("Mesh::from_corners on a flat polygon, defaulting normal to +Z");
            Vec3::z()
        });
        Self {
            tex_coords: vec![[0.0, 0.0]; N],
            positions,
            normal,
            material: Material::default(),
        }
    }

    /// Triangle `a`, `b`, `c`
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] when the points are collinear.
    pub fn triangle(a: Vec3, b: Vec3, c: Vec3) -> Result<Self> {
        Self::new(vec![a, b, c])
    }

    /// The square with corners `(±1, ±1, 1)`, facing `-Z`
    pub fn unit_quad() -> Self {
        Self {
            positions: vec![
                Vec3::new(1.0, 1.0, 1.0),
                Vec3::new(1.0, -1.0, 1.0),
                Vec3::new(-1.0, -1.0, 1.0),
                Vec3::new(-1.0, 1.0, 1.0),
            ],
            tex_coords: vec![[1.0, 1.0], [1.0, 0.0], [0.0, 0.0], [0.0, 1.0]],
            normal: -Vec3::z(),
            material: Material::default(),
        }
    }

    /// Six outward-facing faces of the unit cube centered at the origin
    pub fn cube() -> Vec<Self> {
        let faces = [
            (Vec3::x(), Vec3::y(), Vec3::z()),
            (-Vec3::x(), Vec3::z(), Vec3::y()),
            (Vec3::y(), Vec3::z(), Vec3::x()),
            (-Vec3::y(), Vec3::x(), Vec3::z()),
            (Vec3::z(), Vec3::x(), Vec3::y()),
            (-Vec3::z(), Vec3::y(), Vec3::x()),
        ];

        faces
            .iter()
            .map(|(normal, u, v)| Self {
                positions: vec![
                    (normal - u - v) * 0.5,
                    (normal + u - v) * 0.5,
                    (normal + u + v) * 0.5,
                    (normal - u + v) * 0.5,
                ],
                tex_coords: vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
                normal: *normal,
                material: Material::default(),
            })
            .collect()
    }

    /// Replace the material, builder style
    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    /// Set per-vertex texture coordinates
    ///
    /// # Errors
    /// [`GraphError::InvalidArgument`] unless there is one pair per position.
    pub fn set_tex_coords(&mut self, tex_coords: Vec<[f64; 2]>) -> Result<&mut Self> {
        if tex_coords.len() != self.positions.len() {
            return Err(GraphError::invalid(format!(
                "Mesh::set_tex_coords: expected {} pairs, got {}",
                self.positions.len(),
                tex_coords.len()
            )));
        }
        self.tex_coords = tex_coords;
        Ok(self)
    }

    /// Polygon corners in fan order
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Unit face normal
    pub fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Mean of the corners
    #[allow(clippy::cast_precision_loss)]
    pub fn center(&self) -> Vec3 {
        self.positions.iter().sum::<Vec3>() / self.positions.len() as f64
    }

    /// Transform every corner by `matrix`
    ///
    /// The normal is rebuilt from the transformed corners; a transform that
    /// flattens the polygon keeps the previous normal.
    pub fn apply_matrix(&mut self, matrix: &Mat4) -> &mut Self {
        for position in &mut self.positions {
            *position = matrix.apply_point(position);
        }
        match face_normal(&self.positions) {
            Some(normal) => self.normal = normal,
            None => log::trace!("Mesh::apply_matrix flattened the polygon, keeping old normal"),
        }
        self
    }

    /// Reverse the winding, flipping the face
    pub fn invert_points_order(&mut self) -> &mut Self {
        self.positions.reverse();
        self.tex_coords.reverse();
        self.normal = -self.normal;
        self
    }

    /// Triangle fan indices into [`Mesh::vertices`]
    #[allow(clippy::cast_possible_truncation)]
    pub fn indices(&self) -> Vec<u32> {
        (1..self.positions.len() as u32 - 1)
            .flat_map(|i| [0, i, i + 1])
            .collect()
    }

    /// Upload-ready vertices
    #[allow(clippy::cast_possible_truncation)]
    pub fn vertices(&self) -> Vec<Vertex> {
        let normal = self.normal.to_gpu();
        self.positions
            .iter()
            .zip(&self.tex_coords)
            .map(|(position, tex_coord)| Vertex {
                position: position.to_gpu(),
                normal,
                tex_coord: [tex_coord[0] as f32, tex_coord[1] as f32],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_degenerate_polygons_rejected() {
        assert!(Mesh::new(vec![Vec3::zeros(), Vec3::x()]).is_err());
        assert!(matches!(
            Mesh::triangle(Vec3::zeros(), Vec3::x(), Vec3::x() * 2.0),
            Err(GraphError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_counter_clockwise_normal() {
        let triangle = Mesh::triangle(Vec3::zeros(), Vec3::x(), Vec3::y()).unwrap();
        assert_relative_eq!(triangle.normal(), Vec3::z());
        assert_eq!(triangle.indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_cube_faces_point_outward() {
        let faces = Mesh::cube();
        assert_eq!(faces.len(), 6);
        for face in &faces {
            let center = face.center();
            assert_relative_eq!(face.normal(), center * 2.0, epsilon = 1e-12);
            assert_relative_eq!(face_normal(face.positions()).unwrap(), face.normal(), epsilon = 1e-12);
            for position in face.positions() {
                assert_relative_eq!(position.amax(), 0.5);
            }
        }
    }

    #[test]
    fn test_unit_quad_normal_matches_winding() {
        let quad = Mesh::unit_quad();
        assert_relative_eq!(face_normal(quad.positions()).unwrap(), quad.normal());
        assert_eq!(quad.indices(), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_apply_matrix_and_invert() {
        let mut quad = Mesh::unit_quad();
        quad.apply_matrix(&Mat4::scaling(&Vec3::new(0.5, 0.5, 0.5)));
        assert_relative_eq!(quad.center(), Vec3::new(0.0, 0.0, 0.5));
        assert_relative_eq!(quad.normal(), -Vec3::z());

        quad.invert_points_order();
        assert_relative_eq!(quad.normal(), Vec3::z());
        assert_relative_eq!(face_normal(quad.positions()).unwrap(), Vec3::z());
        assert_eq!(quad.positions()[0], Vec3::new(-0.5, 0.5, 0.5));
    }

    #[test]
    fn test_vertices_for_upload() {
        let mut triangle = Mesh::triangle(Vec3::zeros(), Vec3::x(), Vec3::y()).unwrap();
        assert!(triangle.set_tex_coords(vec![[0.0, 0.0]]).is_err());
        triangle
            .set_tex_coords(vec![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]])
            .unwrap();

        let vertices = triangle.vertices();
        assert_eq!(vertices.len(), 3);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[2].normal, [0.0, 0.0, 1.0]);
        assert_eq!(vertices[2].tex_coord, [0.0, 1.0]);
        assert_eq!(bytemuck::cast_slice::<Vertex, u8>(&vertices).len(), 3 * 32);
    }
}
