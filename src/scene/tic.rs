use std::time::{Duration, Instant};

use super::{Scene, systems};

pub const TIC_RATE: u32 = 35;
pub const DT: f32 = 1.0 / TIC_RATE as f32;
const TIC: Duration = Duration::from_micros(1_000_000 / TIC_RATE as u64);

/// Owns the scene and drives its systems at a fixed rate.
pub struct TicRunner {
    scene: Scene,
    last: Instant,
}

impl Default for TicRunner {
    fn default() -> Self {
        Self::new(Scene::default())
    }
}

impl TicRunner {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Catch up with real time. Runs every due tic, then renders the active
    /// camera once if anything ran. Returns the number of tics.
    pub fn pump(&mut self) -> usize {
        let mut tics = 0;
        while self.last.elapsed() >= TIC {
            self.tick();
            self.last += TIC;
            tics += 1;
        }
        if tics > 0 {
            self.scene.render();
        }
        tics
    }

    /// One tic followed by a render, regardless of the clock.
    pub fn step(&mut self) {
        self.tick();
        self.scene.render();
    }

    /* ---------------------------------------------------------------- */
    /* internal: run one fixed-rate tic                                  */
    /* ---------------------------------------------------------------- */
    fn tick(&mut self) {
        let world = self.scene.world_mut();
        systems::spin(world, DT);
        systems::orbit(world, DT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Camera3D;
    use crate::scene::Spin;
    use crate::world::{Mesh, Surface};

    #[test]
    fn step_animates_and_renders() {
        let mut runner = TicRunner::default();
        let scene = runner.scene_mut();
        let cube = scene.spawn_mesh(Mesh::cube("c", 1.0, Surface::default()));
        scene
            .world_mut()
            .insert_one(cube, Spin {
                degrees_per_second: TIC_RATE as f32,
            })
            .unwrap();
        let cam = scene.spawn_camera(Camera3D::default());

        runner.step();

        let world = runner.scene().world();
        assert!((world.get::<&Mesh>(cube).unwrap().yaw() - 1.0).abs() < 1e-4);
        assert_eq!(world.get::<&Camera3D>(cam).unwrap().stats().meshes, 1);
    }

    #[test]
    fn pump_is_idle_before_first_tic() {
        let mut runner = TicRunner::default();
        assert_eq!(runner.pump(), 0);
    }
}
