//! Culling demo application
//!
//! Builds a city-block style scene of grouped meshes and labels, orbits a
//! camera around it and logs how much of the scene each frame keeps.

use scene_renderer::config::Config;
use scene_renderer::culling::{CullingConfig, CullingPass};
use scene_renderer::foundation::{logging, math::Vec3};
use scene_renderer::render::Camera;
use scene_renderer::scene::{NodeId, SceneError, SceneGraph, ShapeKind, AABB};

const GRID_SIZE: i32 = 12;
const BLOCK_SPACING: f32 = 8.0;
const ORBIT_RADIUS: f32 = 40.0;
const FRAME_COUNT: u32 = 36;

fn build_scene() -> Result<(SceneGraph, NodeId), SceneError> {
    let mut scene = SceneGraph::new();
    let city = scene.add_root("city", ShapeKind::Group);

    for row in 0..GRID_SIZE {
        for col in 0..GRID_SIZE {
            let center = Vec3::new(
                (col - GRID_SIZE / 2) as f32 * BLOCK_SPACING,
                0.0,
                (row - GRID_SIZE / 2) as f32 * BLOCK_SPACING,
            );
            let block = scene.add_child(city, format!("block_{row}_{col}"), ShapeKind::Group)?;

            let building = scene.add_child(block, format!("building_{row}_{col}"), ShapeKind::Mesh)?;
            let height = 2.0 + ((row * 7 + col * 3) % 5) as f32;
            scene.set_geometry_bounds(
                building,
                Some(AABB::from_center_half_extents(
                    center + Vec3::new(0.0, height, 0.0),
                    Vec3::new(2.0, height, 2.0),
                )),
            )?;

            let label = scene.add_child(block, format!("label_{row}_{col}"), ShapeKind::Text)?;
            scene.set_geometry_bounds(
                label,
                Some(AABB::from_center_half_extents(
                    center + Vec3::new(0.0, 2.0 * height + 1.0, 0.0),
                    Vec3::new(1.5, 0.3, 0.0),
                )),
            )?;
        }
    }

    // Overlay that must always draw
    let hud = scene.add_root("hud", ShapeKind::Group);
    scene.set_culling_enabled(hud, false)?;
    let minimap = scene.add_child(hud, "minimap", ShapeKind::Rect)?;
    scene.set_culling_enabled(minimap, false)?;

    scene.update_render_bounds();
    Ok((scene, city))
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args().nth(1).unwrap_or_else(|| "culling.toml".to_string());
    let config = CullingConfig::load_or_default(&config_path)?;
    log::info!("Culling config: {:?}", config);

    let (mut scene, city) = build_scene()?;
    log::info!("Scene built with {} nodes", scene.len());

    let pass = CullingPass::from_config(&config);
    let mut camera = Camera::perspective(Vec3::new(0.0, 15.0, ORBIT_RADIUS), 60.0, 16.0 / 9.0, 0.5, 60.0);

    let mut total_visible = 0;
    for frame in 0..FRAME_COUNT {
        let angle = frame as f32 / FRAME_COUNT as f32 * std::f32::consts::TAU;
        camera.set_position(Vec3::new(ORBIT_RADIUS * angle.cos(), 15.0, ORBIT_RADIUS * angle.sin()));

        let stats = pass.run(&mut scene, &camera);
        total_visible += stats.visible();
        log::info!(
            "Frame {:2}: {:4}/{} visible, {} culled, {} settled by parent (city mask: {:?})",
            frame,
            stats.visible(),
            stats.visited,
            stats.culled,
            stats.propagated,
            scene.get(city)?.cullable.visibility_plane_mask
        );
    }

    log::info!(
        "Average visible nodes per frame: {:.1} of {}",
        total_visible as f32 / FRAME_COUNT as f32,
        scene.len()
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_with_level(log::LevelFilter::Info);

    log::info!("Starting culling demo");

    match run() {
        Ok(()) => {
            log::info!("Culling demo finished successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Application error: {:?}", e);
            Err(e)
        }
    }
}
