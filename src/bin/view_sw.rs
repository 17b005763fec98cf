//! Interactive viewer for the software camera.
//!
//! ```bash
//! cargo run --release --bin view_sw -- [--config camera.json] [--save-config out.json]
//! ```
//!
//! Arrow keys turn and pitch, WASD moves, Q/E lower and raise the eye,
//! B cycles the background, F1 toggles the per-frame debug line.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use glam::vec3;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

use rastercam::{
    config::{BackgroundType, CameraConfig},
    engine::Camera3D,
    logging::{LoggingConfig, init_logging},
    scene::{Orbit, Scene, Spin, TicRunner},
    world::{Color, Material, Mesh, PointLight, Surface},
};

const MOVE_SPEED: f32 = 4.0; // units / second
const TURN_SPEED: f32 = 90.0; // degrees / second
const RISE_SPEED: f32 = 2.0;

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Camera settings to start from (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the camera settings here on exit
    #[arg(long, value_name = "FILE")]
    save_config: Option<PathBuf>,

    /// Window width
    #[arg(long, default_value_t = 960)]
    width: usize,

    /// Window height
    #[arg(long, default_value_t = 720)]
    height: usize,

    /// Log filter, overrides RUST_LOG
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

fn demo_scene(camera: Camera3D) -> anyhow::Result<Scene> {
    let mut scene = Scene::new();

    let floor = Mesh::quad("floor", 40.0, Surface::Flat(Color::rgb(90, 110, 90)));
    scene.spawn_mesh(floor);

    let shiny = |diffuse: Color| {
        Surface::Material(Material {
            diffuse,
            specular: Color::WHITE,
            shininess: 24.0,
        })
    };

    let cubes = [
        (vec3(8.0, 0.0, 1.0), 2.0, shiny(Color::rgb(200, 60, 50)), 45.0),
        (vec3(12.0, -4.0, 1.5), 3.0, shiny(Color::rgb(60, 90, 210)), -20.0),
        (vec3(10.0, 5.0, 0.75), 1.5, Surface::Flat(Color::rgb(220, 200, 80)), 0.0),
    ];
    for (pos, size, surface, rate) in cubes {
        let mut cube = Mesh::cube("cube", size, surface);
        cube.set_position(pos);
        let e = scene.spawn_mesh(cube);
        if rate != 0.0 {
            scene.world_mut().insert_one(e, Spin {
                degrees_per_second: rate,
            })?;
        }
    }

    let light = scene.spawn_light(PointLight::new(
        vec3(10.0, 0.0, 3.0),
        Color::rgb(255, 200, 140),
        1.5,
        12.0,
    ));
    scene
        .world_mut()
        .insert_one(light, Orbit::new(vec3(10.0, 0.0, 3.0), 5.0, 40.0))?;

    scene.spawn_camera(camera);
    Ok(scene)
}

fn next_background(kind: BackgroundType) -> BackgroundType {
    match kind {
        BackgroundType::Skyfloor => BackgroundType::Solid,
        BackgroundType::Solid => BackgroundType::Transparent,
        BackgroundType::Transparent => BackgroundType::Skyfloor,
    }
}

fn main() -> anyhow::Result<()> {
    let opts = Opts::parse();
    init_logging(LoggingConfig {
        filter: opts.log.clone(),
        ..Default::default()
    });

    let config = match &opts.config {
        Some(path) => CameraConfig::load(path)
            .with_context(|| format!("loading camera config {}", path.display()))?,
        None => CameraConfig::default(),
    };
    let camera = Camera3D::from_config(config)?;
    let mut runner = TicRunner::new(demo_scene(camera)?);

    let mut win = Window::new(
        "rastercam software camera",
        opts.width,
        opts.height,
        WindowOptions::default(),
    )?;
    win.set_target_fps(60);
    let mut frame = vec![0xFF_000000; opts.width * opts.height];

    // ────────────────── benchmarking state ──────────────────────────────
    let mut last = Instant::now();
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let dt = last.elapsed().as_secs_f32();
        last = Instant::now();

        let Some(cam_entity) = runner.scene_mut().active_camera() else {
            anyhow::bail!("scene has no camera");
        };

        /* --------------- input → camera pose ------------------------------ */
        if let Some(mut cam) = runner.scene().camera_mut(cam_entity) {
            let mut view = cam.camera();
            let axis = |pos: Key, neg: Key| -> f32 {
                win.is_key_down(pos) as i32 as f32 - win.is_key_down(neg) as i32 as f32
            };
            view.turn(axis(Key::Left, Key::Right) * TURN_SPEED * dt);
            view.tilt(axis(Key::Up, Key::Down) * TURN_SPEED * dt);
            view.step(
                axis(Key::W, Key::S) * MOVE_SPEED * dt,
                axis(Key::D, Key::A) * MOVE_SPEED * dt,
            );
            view.pos.z += axis(Key::E, Key::Q) * RISE_SPEED * dt;
            cam.set_pose(&view);

            if win.is_key_pressed(Key::B, KeyRepeat::No) {
                let kind = next_background(cam.config().background_type);
                cam.set_background(kind);
            }
            if win.is_key_pressed(Key::F1, KeyRepeat::No) {
                let show = !cam.config().show_debug_info;
                cam.set_show_debug_info(show);
            }
        }

        /* --------------- simulate + render -------------------------------- */
        runner.pump();

        frame.fill(0xFF_202020);
        if let Some(cam) = runner.scene().camera_mut(cam_entity) {
            cam.draw_output(&mut frame, opts.width, opts.height, 0, 0, opts.width, opts.height);
        }
        win.update_with_buffer(&frame, opts.width, opts.height)?;
        acc_frames += 1;

        if last_print.elapsed() >= Duration::from_secs(3) {
            let fps = acc_frames as f64 / last_print.elapsed().as_secs_f64();
            log::info!("{fps:.1} FPS");
            acc_frames = 0;
            last_print = Instant::now();
        }
    }

    if let Some(path) = &opts.save_config {
        let scene = runner.scene_mut();
        if let Some(cam) = scene.active_camera().and_then(|e| scene.camera_mut(e)) {
            cam.config()
                .save(path)
                .with_context(|| format!("saving camera config {}", path.display()))?;
            log::info!("camera config written to {}", path.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scene_attaches_animation() {
        let scene = demo_scene(Camera3D::default()).unwrap();
        let world = scene.world();
        assert_eq!(world.query::<&Spin>().iter().count(), 2);
        assert_eq!(world.query::<&Orbit>().iter().count(), 1);
        assert_eq!(world.query::<&Camera3D>().iter().count(), 1);
    }
}
