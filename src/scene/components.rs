use glam::Vec3;
use hecs::Entity;

use crate::world::{LightSource, Renderable3D};

/// Binds a camera to a mesh entity: the camera inherits the mesh's position
/// and yaw every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraParent(pub Entity);

/// Drawable of any type, resolved through its capability.
pub struct DynMesh(pub Box<dyn Renderable3D + Send + Sync>);

/// Light of any type, resolved through its capability.
pub struct DynLight(pub Box<dyn LightSource + Send + Sync>);

/// Constant yaw rotation of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spin {
    pub degrees_per_second: f32,
}

/// Moves a light on a horizontal circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orbit {
    pub centre: Vec3,
    pub radius: f32,
    pub degrees_per_second: f32,
    pub angle: f32, // degrees, advanced by the system
}

impl Orbit {
    pub fn new(centre: Vec3, radius: f32, degrees_per_second: f32) -> Self {
        Self {
            centre,
            radius,
            degrees_per_second,
            angle: 0.0,
        }
    }

    /// Point on the circle at the current angle.
    pub fn position(&self) -> Vec3 {
        let (s, c) = self.angle.to_radians().sin_cos();
        self.centre + Vec3::new(c * self.radius, s * self.radius, 0.0)
    }
}
