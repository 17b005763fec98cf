//! Dynamic light sources.
//!
//! The camera does not own lights. It borrows whatever implements
//! [`LightSource`] for the duration of one render call, picks the nearest few
//! and asks each of them two questions per triangle: *can you see it?* and
//! *how much do you add?*

use glam::Vec3;

use super::color::Color;
use crate::engine::Triangle;

/// Offset along the surface normal before casting a shadow ray, in world
/// units. Keeps a face from shadowing itself.
pub const SHADOW_BIAS: f32 = 1e-3;

/// Light added to one surface point.
///
/// `r`, `g`, `b` are already scaled by `intensity` and live in
/// `0.0 ..= 255.0`; the camera adds `base * (channel / 255)`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightContribution {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
}

/// A light the camera can query.
pub trait LightSource {
    /// World-space position, used to rank lights by distance to the camera.
    fn position(&self) -> Vec3;

    /// Shadow test. `occluders` is every triangle built this frame,
    /// including back faces the camera culled.
    fn is_triangle_lit(&self, centroid: Vec3, normal: Vec3, occluders: &[Triangle]) -> bool;

    fn contribution(&self, centroid: Vec3, normal: Vec3) -> LightContribution;

    fn is_active(&self) -> bool {
        true
    }
}

/// Omni light with a hard range and quadratic falloff.
#[derive(Clone, Debug, PartialEq)]
pub struct PointLight {
    pub pos: Vec3,
    pub color: Color,
    pub intensity: f32,
    pub radius: f32,
    pub casts_shadows: bool,
    pub active: bool,
}

impl PointLight {
    pub fn new(pos: Vec3, color: Color, intensity: f32, radius: f32) -> Self {
        Self {
            pos,
            color,
            intensity,
            radius,
            casts_shadows: true,
            active: true,
        }
    }

    pub fn without_shadows(mut self) -> Self {
        self.casts_shadows = false;
        self
    }
}

impl LightSource for PointLight {
    fn position(&self) -> Vec3 {
        self.pos
    }

    fn is_triangle_lit(&self, centroid: Vec3, normal: Vec3, occluders: &[Triangle]) -> bool {
        let to_light = self.pos - centroid;
        // facing away from the light is its own shadow
        if normal.dot(to_light) <= 0.0 {
            return false;
        }
        if !self.casts_shadows {
            return true;
        }

        let origin = centroid + normal * SHADOW_BIAS;
        let to_light = self.pos - origin;
        let dist = to_light.length();
        if dist <= f32::EPSILON {
            return true;
        }
        let dir = to_light / dist;

        !occluders.iter().any(|tri| {
            ray_triangle_intersect(origin, dir, tri.world)
                .is_some_and(|t| t < dist - SHADOW_BIAS)
        })
    }

    fn contribution(&self, centroid: Vec3, normal: Vec3) -> LightContribution {
        let to_light = self.pos - centroid;
        let dist = to_light.length();
        if dist > self.radius || dist < 1e-3 {
            return LightContribution::default();
        }
        let attenuation = 1.0 - dist / self.radius;
        let n_dot_l = normal.dot(to_light / dist).max(0.0);
        let k = n_dot_l * self.intensity * attenuation * attenuation;
        let [r, g, b] = self.color.channels();
        LightContribution {
            r: r * k,
            g: g * k,
            b: b * k,
            intensity: k,
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Möller–Trumbore; returns the hit distance along the unit `dir`.
pub fn ray_triangle_intersect(origin: Vec3, dir: Vec3, [v0, v1, v2]: [Vec3; 3]) -> Option<f32> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = dir.cross(edge2);
    let a = edge1.dot(h);
    if a.abs() < EPSILON {
        return None; // parallel
    }

    let f = 1.0 / a;
    let s = origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * dir.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > EPSILON).then_some(t)
}
