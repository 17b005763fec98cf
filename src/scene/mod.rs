//! Typed scene registry.
//!
//! Meshes, lights and cameras are plain `hecs` components. Built-in meshes and
//! lights are stored as themselves, anything else behind [`DynMesh`] /
//! [`DynLight`]. The registry gathers both into a [`RenderContext`] and hands
//! it to the one active camera.

mod components;
mod systems;
mod tic;

use hecs::{Entity, World};

use crate::engine::{Camera3D, RenderContext};
use crate::world::{LightSource, Mesh, ParentTransform, PointLight, Renderable3D};

pub use components::{CameraParent, DynLight, DynMesh, Orbit, Spin};
pub use systems::{orbit, spin};
pub use tic::{DT, TIC_RATE, TicRunner};

#[derive(Default)]
pub struct Scene {
    world: World,
    // emptied after each render; only the allocations carry over
    mesh_refs: Vec<&'static (dyn Renderable3D + Sync)>,
    light_refs: Vec<&'static (dyn LightSource + Sync)>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn spawn_mesh(&mut self, mesh: Mesh) -> Entity {
        self.world.spawn((mesh,))
    }

    pub fn spawn_light(&mut self, light: PointLight) -> Entity {
        self.world.spawn((light,))
    }

    pub fn spawn_renderable(&mut self, mesh: impl Renderable3D + Send + Sync + 'static) -> Entity {
        self.world.spawn((DynMesh(Box::new(mesh)),))
    }

    pub fn spawn_light_source(&mut self, light: impl LightSource + Send + Sync + 'static) -> Entity {
        self.world.spawn((DynLight(Box::new(light)),))
    }

    pub fn spawn_camera(&mut self, camera: Camera3D) -> Entity {
        self.world.spawn((camera,))
    }

    /// Attach `camera` to `parent`'s position and yaw. The parent must carry
    /// a [`Mesh`]; otherwise the camera keeps its own pose.
    pub fn attach_camera(&mut self, camera: Entity, parent: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.world.insert_one(camera, CameraParent(parent))
    }

    /// `false` when the entity was already gone.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        self.world.despawn(entity).is_ok()
    }

    pub fn camera_mut(&self, entity: Entity) -> Option<hecs::RefMut<'_, Camera3D>> {
        self.world.get::<&mut Camera3D>(entity).ok()
    }

    /// The camera that renders. Exactly one stays active: with none active
    /// the first camera is switched on, surplus active ones are switched off.
    /// "First" is the lowest entity id.
    pub fn active_camera(&mut self) -> Option<Entity> {
        let mut cameras: Vec<(Entity, bool)> = self
            .world
            .query_mut::<&Camera3D>()
            .into_iter()
            .map(|(e, cam)| (e, cam.is_active()))
            .collect();
        cameras.sort_by_key(|(e, _)| e.id());

        let Some(&(chosen, _)) = cameras.iter().find(|(_, active)| *active) else {
            let &(first, _) = cameras.first()?;
            if let Ok(mut cam) = self.world.get::<&mut Camera3D>(first) {
                cam.set_active(true);
            }
            log::info!("no active camera, activating {first:?}");
            return Some(first);
        };

        for &(e, active) in &cameras {
            if active && e != chosen {
                if let Ok(mut cam) = self.world.get::<&mut Camera3D>(e) {
                    cam.set_active(false);
                }
                log::warn!("deactivating surplus camera {e:?}");
            }
        }
        Some(chosen)
    }

    /// Render every active mesh and light through the active camera.
    /// Returns the camera that drew, if any.
    pub fn render(&mut self) -> Option<Entity> {
        let camera = self.active_camera()?;

        let parent = self
            .world
            .get::<&CameraParent>(camera)
            .ok()
            .and_then(|p| self.world.get::<&Mesh>(p.0).ok())
            .map(|m| ParentTransform {
                pos: m.position(),
                yaw: m.yaw(),
            });

        let mut mesh_q = self.world.query::<&Mesh>();
        let mut dyn_mesh_q = self.world.query::<&DynMesh>();
        let mut meshes: Vec<&dyn Renderable3D> = recycle(std::mem::take(&mut self.mesh_refs));
        meshes.extend(mesh_q.iter().map(|(_, m)| m as &dyn Renderable3D));
        meshes.extend(dyn_mesh_q.iter().map(|(_, m)| &*m.0 as &dyn Renderable3D));

        let mut light_q = self.world.query::<&PointLight>();
        let mut dyn_light_q = self.world.query::<&DynLight>();
        let mut lights: Vec<&dyn LightSource> = recycle(std::mem::take(&mut self.light_refs));
        lights.extend(light_q.iter().map(|(_, l)| l as &dyn LightSource));
        lights.extend(dyn_light_q.iter().map(|(_, l)| &*l.0 as &dyn LightSource));

        if let Ok(mut cam) = self.world.get::<&mut Camera3D>(camera) {
            cam.set_parent(parent);
            cam.render(&RenderContext {
                meshes: &meshes,
                lights: &lights,
            });
        }

        self.mesh_refs = recycle(meshes);
        self.light_refs = recycle(lights);
        Some(camera)
    }
}

/// Empty `v` and hand its allocation to a vector of another borrow.
fn recycle<'a, 'b, T: ?Sized, U: ?Sized>(mut v: Vec<&'a T>) -> Vec<&'b U> {
    v.clear();
    v.into_iter().map(|_| -> &'b U { unreachable!() }).collect()
}
