mod camera;
mod color;
mod light;
mod mesh;

pub use camera::{Camera, ParentTransform};

pub use color::{Color, ColorError};

pub use light::{LightContribution, LightSource, PointLight, SHADOW_BIAS, ray_triangle_intersect};

pub use mesh::{Face, FaceIndices, Material, Mesh, Renderable3D, Surface};
