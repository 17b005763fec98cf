use hecs::World;

use super::components::{Orbit, Spin};
use crate::world::{Mesh, PointLight};

/* ── Spin: yaw meshes in place ─────────────────────────────────────── */
pub fn spin(world: &mut World, dt: f32) {
    for (_, (mesh, spin)) in world.query_mut::<(&mut Mesh, &Spin)>() {
        mesh.set_yaw(mesh.yaw() + spin.degrees_per_second * dt);
    }
}

/* ── Orbit: carry lights around their centre ──────────────────────── */
pub fn orbit(world: &mut World, dt: f32) {
    for (_, (light, orbit)) in world.query_mut::<(&mut PointLight, &mut Orbit)>() {
        orbit.angle = (orbit.angle + orbit.degrees_per_second * dt).rem_euclid(360.0);
        light.pos = orbit.position();
    }
}
