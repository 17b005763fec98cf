//! Software 3-D camera for 2-D game engines.
//!
//! A [`engine::Camera3D`] projects a scene of polygonal meshes into its own
//! pixel buffer on the CPU: camera transform, near-plane clipping, fan
//! triangulation with backface culling, painter's-algorithm sorting,
//! directional + dynamic lighting, edge-function rasterization and an additive
//! specular pass, all on top of a procedural sky/floor background.

pub mod config;
pub mod engine;
pub mod logging;
pub mod renderer;
pub mod scene;
pub mod world;
