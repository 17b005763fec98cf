//! Persistent camera settings.
//!
//! [`CameraConfig`] is the serialisable half of a camera: everything a
//! `Camera3D` needs to be rebuilt, nothing it computes per frame. JSON keys
//! are camelCase, vectors are `{x, y, z}` objects and colours are hex
//! strings, so a saved file is readable and hand-editable.

use std::fs;
use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::world::Color;

pub const MIN_FOV: f32 = 1.0;
pub const MAX_FOV: f32 = 179.0;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config I/O: {0}")]
    Io(#[from] std::io::Error),

    #[error("config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("near plane must be > 0 and < far plane (near={near}, far={far})")]
    Planes { near: f32, far: f32 },

    #[error("resolution must be non-zero (got {width}x{height})")]
    Resolution { width: usize, height: usize },
}

/// `{x, y, z}` on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundType {
    #[default]
    Skyfloor,
    Transparent,
    Solid,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CameraConfig {
    pub position: Vector3,
    /// Degrees: `x` pitch, `y` yaw, `z` roll.
    pub rotation: Vector3,
    pub field_of_view: f32,
    pub near_plane: f32,
    pub far_plane: f32,
    pub width: usize,
    pub height: usize,
    pub active: bool,

    pub background_type: BackgroundType,
    pub background_color: Color,
    pub sky_color: Color,
    pub sky_horizon_color: Color,
    pub floor_horizon_color: Color,
    pub floor_color: Color,

    pub enable_backface_culling: bool,

    pub light_direction: Vector3,
    pub light_color: Color,
    pub light_intensity: f32,
    pub ambient_intensity: f32,

    pub use_dynamic_lighting: bool,
    pub max_lights: usize,
    pub light_find_distance: f32,

    pub specular_enabled: bool,
    pub specular_bleeding_enabled: bool,
    pub specular_per_mesh: bool,

    pub show_debug_info: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 1.7),
            rotation: Vector3::default(),
            field_of_view: 60.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            width: 320,
            height: 240,
            active: true,

            background_type: BackgroundType::Skyfloor,
            background_color: Color::rgb(0, 0, 0),
            sky_color: Color::rgb(40, 80, 160),
            sky_horizon_color: Color::rgb(170, 200, 235),
            floor_horizon_color: Color::rgb(110, 100, 85),
            floor_color: Color::rgb(45, 40, 35),

            enable_backface_culling: true,

            light_direction: Vector3::new(0.3, 0.2, -1.0),
            light_color: Color::WHITE,
            light_intensity: 1.0,
            ambient_intensity: 0.3,

            use_dynamic_lighting: true,
            max_lights: 4,
            light_find_distance: 50.0,

            specular_enabled: true,
            specular_bleeding_enabled: false,
            specular_per_mesh: false,

            show_debug_info: false,
        }
    }
}

impl CameraConfig {
    /// Check the planes and the resolution. FOV is not checked here; the
    /// camera clamps it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_planes(self.near_plane, self.far_plane)?;
        validate_resolution(self.width, self.height)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse and validate. Missing keys take their defaults.
    pub fn from_json(s: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let cfg = Self::from_json(&fs::read_to_string(path)?)?;
        log::debug!("loaded camera config from {}", path.display());
        Ok(cfg)
    }
}

pub fn validate_planes(near: f32, far: f32) -> Result<(), ConfigError> {
    // written to reject NaN as well
    if near > 0.0 && far > near {
        Ok(())
    } else {
        Err(ConfigError::Planes { near, far })
    }
}

pub fn validate_resolution(width: usize, height: usize) -> Result<(), ConfigError> {
    if width == 0 || height == 0 {
        return Err(ConfigError::Resolution { width, height });
    }
    Ok(())
}

/// Clamp into `[MIN_FOV, MAX_FOV]`; NaN becomes the default.
pub fn clamp_fov(fov: f32) -> f32 {
    if fov.is_nan() {
        return CameraConfig::default().field_of_view;
    }
    fov.clamp(MIN_FOV, MAX_FOV)
}
