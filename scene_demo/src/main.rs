//! Scene demo application
//!
//! Loads a light scene from TOML or RON, reports each light's shadow-map
//! transform and debug geometry, then fires random camera rays at the floor
//! and counts which shadow maps cover the points they hit.
//!
//! ```text
//! cargo run -p scene_demo -- scene_demo/scene.ron
//! ```

use graph_engine::foundation::logging;
use graph_engine::prelude::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG: &str = "scene_demo/scene.toml";

/// Demo settings plus the scene to load
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct DemoConfig {
    rays: usize,
    seed: u64,
    camera: Vec3,
    scene: SceneConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            rays: 32,
            seed: 0,
            camera: Vec3::new(0.0, 6.0, 12.0),
            scene: SceneConfig::default(),
        }
    }
}

impl Config for DemoConfig {}

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GraphError),
}

/// Whether `point` lands inside the light's shadow map
fn covered_by(light: &Light, point: &Vec3) -> bool {
    let clip = light.light_space_matrix().apply_point(point);
    clip.iter().all(|component| component.abs() <= 1.0)
}

fn report_lights(environment: &LightingEnvironment) {
    for (draw_id, light) in environment.lights().iter().enumerate() {
        let name = match light.kind() {
            LightKind::Directional(_) => "directional",
            LightKind::Spot(_) => "spot",
        };
        log::info!(
            "Light {draw_id} ({name}): direction {:?}, shadow {}",
            light.direction().as_slice(),
            light.shadow()
        );
        log::debug!("Light {draw_id} light space matrix:{}", light.light_space_matrix());

        if let Some(glyph) = light.light_object() {
            log::info!("Light {draw_id}: glyph with {} faces", glyph.meshes().len());
        }
    }

    for (index, volume) in environment.shadow_volumes().iter().enumerate() {
        for (key, _) in volume.models() {
            if let Ok(center) = volume.world_center(key) {
                log::info!(
                    "Shadow volume {index}: {} faces centered at {:?}",
                    volume.meshes().len(),
                    center.as_slice()
                );
            }
        }
    }
}

fn sample_floor(config: &DemoConfig, environment: &LightingEnvironment) -> std::result::Result<(), DemoError> {
    let floor = Plane::from_normal(Vec3::y(), Vec3::zeros())?;
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut hits = 0;
    let mut coverage = vec![0usize; environment.len()];

    for _ in 0..config.rays {
        let target = Vec3::new(rng.gen_range(-8.0..8.0), rng.gen_range(-2.0..0.5), rng.gen_range(-8.0..8.0));
        let Ok(ray) = Cut::new(config.camera, target) else {
            log::warn!("Skipping ray aimed at the camera position");
            continue;
        };
        if !floor.is_intersect_cut(&ray) {
            continue;
        }

        hits += 1;
        let point = floor.intersect_cut(&ray);
        for (draw_id, light) in environment.shadow_casters() {
            if covered_by(light, &point) {
                coverage[draw_id] += 1;
            }
        }
    }

    log::info!("{hits} of {} rays reached the floor", config.rays);
    for (draw_id, _) in environment.shadow_casters() {
        log::info!("Light {draw_id}: {} floor hits inside its shadow map", coverage[draw_id]);
    }
    Ok(())
}

fn run(path: &str) -> std::result::Result<(), DemoError> {
    let config = DemoConfig::load_or_default(path);
    let environment = config.scene.build()?;
    log::info!("Loaded {} lights from {path}", environment.len());

    report_lights(&environment);

    let mut sink = RecordingSink::new();
    environment.set_uniforms(&mut sink);
    for volume in environment.shadow_volumes() {
        volume.submit(&mut sink);
    }
    log::info!("Uploaded {} uniforms, {} draw calls", sink.len(), sink.draw_calls());

    sample_floor(&config, &environment)
}

fn main() {
    logging::init_with_default("info");

    let path = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    if let Err(error) = run(&path) {
        log::error!("Scene demo failed: {error}");
        std::process::exit(1);
    }
}
