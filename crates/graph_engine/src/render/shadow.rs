//! Shadow volume and light glyph geometry
//!
//! Every function here builds a fresh [`RenderBundle`] from the current light
//! parameters, with one model instance placed into world space by the
//! inverse of the light's view matrix.

use crate::foundation::math::{constants::HALF_PI, Mat4, Mat4Ext, Vec3};
use crate::render::lighting::{DirectionalLight, SpotLight};
use crate::render::material::Material;
use crate::render::mesh::Mesh;
use crate::render::object::RenderBundle;

/// Shrink applied to shadow volumes so they do not z-fight with the
/// geometry bounding the shadow map.
pub const SHADOW_VOLUME_INSET: f64 = 1e-5;

/// Opacity of shadow volume faces
pub const SHADOW_VOLUME_ALPHA: f64 = 0.3;

/// Glyph size relative to the cone at unit distance
pub const SPOT_GLYPH_SCALE: f64 = 0.25;

fn volume_material() -> Material {
    Material::new()
        .with_diffuse(Vec3::new(1.0, 1.0, 1.0))
        .with_alpha(SHADOW_VOLUME_ALPHA)
}

/// Append `mesh` and its three quarter-turn copies around the Z axis
fn push_rotations(meshes: &mut Vec<Mesh>, mut mesh: Mesh) {
    let quarter_turn = Mat4::rotation_z(HALF_PI);
    for _ in 0..4 {
        meshes.push(mesh.clone());
        mesh.apply_matrix(&quarter_turn);
    }
}

/// Transparent box covering the directional shadow map
pub fn directional_volume(light: &DirectionalLight) -> RenderBundle {
    let (width, height, depth) = light.shadow_size();

    let mut volume = RenderBundle::from_meshes(Mesh::cube());
    volume.transparent = true;
    volume.set_material(&volume_material());

    let placement = light.view_matrix_inverse()
        * Mat4::translation(&Vec3::new(0.0, 0.0, (1.0 - SHADOW_VOLUME_INSET) * depth / 2.0))
        * Mat4::scaling(&Vec3::new(width, height, depth));
    volume.add_model(placement);
    volume
}

/// Transparent truncated pyramid covering the spot shadow frustum
///
/// The far cap sits at `shadow_max_distance`, the near cap at
/// `shadow_min_distance`, and the side faces follow the outer cone border.
pub fn spot_volume(light: &SpotLight) -> RenderBundle {
    let (near, far) = light.shadow_distance();
    let (_, border_out) = light.borders();
    let ratio = near / far;
    let material = volume_material();

    let mut meshes = Vec::with_capacity(6);
    let far_cap = Mesh::unit_quad().with_material(material.clone());
    let mut near_cap = far_cap.clone();
    near_cap
        .apply_matrix(&Mat4::scaling(&Vec3::new(ratio, ratio, ratio)))
        .invert_points_order();
    meshes.push(far_cap);
    meshes.push(near_cap);

    // Valid lights keep near < far, so the side quad is never flat.
    push_rotations(&mut meshes, side_quad(ratio).with_material(material));

    let mut volume = RenderBundle::from_meshes(meshes);
    volume.transparent = true;

    let extent = (1.0 - SHADOW_VOLUME_INSET) * far;
    let spread = border_out.tan();
    let placement = light.view_matrix_inverse()
        * Mat4::scaling(&Vec3::new(extent * spread, extent * spread, extent));
    volume.add_model(placement);
    volume
}

fn side_quad(ratio: f64) -> Mesh {
    Mesh::from_corners([
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(ratio, ratio, ratio),
        Vec3::new(ratio, -ratio, ratio),
    ])
}

/// Small emissive pyramid marking a spot light and its cone
pub fn spot_glyph(light: &SpotLight) -> RenderBundle {
    let (_, border_out) = light.borders();

    let material = Material::new()
        .with_emission(Vec3::new(1.0, 1.0, 1.0))
        .with_shadow(true);

    let mut meshes = vec![Mesh::unit_quad().with_material(material.clone())];
    let facet = Mesh::from_corners([
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::zeros(),
    ])
    .with_material(material);
    push_rotations(&mut meshes, facet);

    let mut glyph = RenderBundle::from_meshes(meshes);
    let spread = border_out.tan();
    let placement = light.view_matrix_inverse()
        * Mat4::scaling(&(Vec3::new(spread, spread, 1.0) * SPOT_GLYPH_SCALE));
    glyph.add_model(placement);
    glyph
}
