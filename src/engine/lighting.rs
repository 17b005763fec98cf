//! Per-triangle colour: one directional light with an ambient floor, plus
//! whatever dynamic lights sit near the camera.

use glam::Vec3;

use super::types::Triangle;
use crate::world::{Color, LightSource};

/// Dynamic contributions at or below this intensity are ignored.
pub const CONTRIBUTION_THRESHOLD: f32 = 0.001;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    /// Direction the light travels (towards the scene), any length.
    pub direction: Vec3,
    pub color: Color,
    pub intensity: f32,
    /// Light floor in `0..=1`.
    pub ambient: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            direction: Vec3::new(0.3, 0.2, -1.0),
            color: Color::WHITE,
            intensity: 1.0,
            ambient: 0.3,
        }
    }
}

impl DirectionalLight {
    /// Unit vector pointing *at* the light, `None` for a zero direction.
    #[inline]
    pub fn to_light(&self) -> Option<Vec3> {
        self.direction.try_normalize().map(|d| -d)
    }

    /// `max(0, -dir·n) * intensity`.
    pub fn diffuse(&self, normal: Vec3) -> f32 {
        match self.to_light() {
            Some(l) => l.dot(normal).max(0.0) * self.intensity,
            None => 0.0,
        }
    }

    /// `ambient + diffuse * (1 - ambient)`.
    #[inline]
    pub fn factor(&self, normal: Vec3) -> f32 {
        self.ambient + self.diffuse(normal) * (1.0 - self.ambient)
    }

    /// Directional term only, unclamped, per channel.
    pub fn shade(&self, base: Color, normal: Vec3) -> [f32; 3] {
        let f = self.factor(normal);
        let [lr, lg, lb] = self.color.channels();
        let [r, g, b] = base.channels();
        [r * f * lr / 255.0, g * f * lg / 255.0, b * f * lb / 255.0]
    }
}

/// Dynamic-light settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DynamicLighting {
    pub enabled: bool,
    pub max_lights: usize,
    /// Search radius around the camera.
    pub find_distance: f32,
}

/// This frame's dynamic lights as indices into the light list, nearest
/// first. Kept on the camera and refilled every frame.
#[derive(Clone, Debug, Default)]
pub struct LightSelection {
    ranked: Vec<(f32, usize)>,
}

impl LightSelection {
    #[inline]
    pub fn len(&self) -> usize {
        self.ranked.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ranked.is_empty()
    }

    /// Selected positions in the light list, nearest first.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.ranked.iter().map(|&(_, i)| i)
    }
}

/// Pick this frame's dynamic lights: active, within `find_distance` of the
/// camera, nearest first, at most `max_lights` of them.
pub fn select_lights(
    lights: &[&dyn LightSource],
    camera_pos: Vec3,
    settings: &DynamicLighting,
    out: &mut LightSelection,
) {
    out.ranked.clear();
    if !settings.enabled || settings.max_lights == 0 {
        return;
    }

    out.ranked.extend(
        lights
            .iter()
            .enumerate()
            .filter(|(_, l)| l.is_active())
            .map(|(i, l)| (l.position().distance(camera_pos), i))
            .filter(|(d, _)| *d <= settings.find_distance),
    );
    out.ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    out.ranked.truncate(settings.max_lights);
}

/// Resolve the packed colour of `tri`. `selection` indexes into `lights`.
///
/// `occluders` is the full triangle set of the frame, culled faces included.
pub fn shade_triangle(
    tri: &Triangle,
    sun: &DirectionalLight,
    lights: &[&dyn LightSource],
    selection: &LightSelection,
    occluders: &[Triangle],
) -> Color {
    let base = tri.surface.base_color();
    let mut rgb = sun.shade(base, tri.normal);

    if !selection.is_empty() {
        let centroid = tri.centroid();
        let [br, bg, bb] = base.channels();
        for light in selection.indices().filter_map(|i| lights.get(i)) {
            if !light.is_triangle_lit(centroid, tri.normal, occluders) {
                continue;
            }
            let c = light.contribution(centroid, tri.normal);
            if c.intensity > CONTRIBUTION_THRESHOLD {
                rgb[0] += br * c.r / 255.0;
                rgb[1] += bg * c.g / 255.0;
                rgb[2] += bb * c.b / 255.0;
            }
        }
    }

    let ch = |v: f32| v.round().clamp(0.0, 255.0) as u8;
    Color::rgba(ch(rgb[0]), ch(rgb[1]), ch(rgb[2]), base.a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{PointLight, Surface};
    use glam::vec3;

    fn lit_tri(base: Color) -> Triangle {
        let mut t = Triangle::blank(Surface::Flat(base));
        t.world = [vec3(0.0, 0.0, 0.0), vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0)];
        t.normal = Vec3::Z;
        t
    }

    #[test]
    fn full_ambient_without_light_is_base_colour() {
        let sun = DirectionalLight {
            direction: vec3(0.0, 0.0, -1.0),
            color: Color::WHITE,
            intensity: 0.0,
            ambient: 1.0,
        };
        let base = Color::rgb(120, 60, 200);
        assert_eq!(shade_triangle(&lit_tri(base), &sun, &[], &LightSelection::default(), &[]), base);
    }

    #[test]
    fn head_on_light_gives_full_intensity() {
        let sun = DirectionalLight {
            direction: vec3(0.0, 0.0, -4.0),
            color: Color::WHITE,
            intensity: 0.6,
            ambient: 0.0,
        };
        assert!((sun.diffuse(Vec3::Z) - 0.6).abs() < 1e-6);
        assert!((sun.factor(Vec3::Z) - 0.6).abs() < 1e-6);
        // light from behind the face adds nothing
        assert_eq!(sun.diffuse(-Vec3::Z), 0.0);
    }

    #[test]
    fn zero_direction_has_no_diffuse() {
        let sun = DirectionalLight {
            direction: Vec3::ZERO,
            ambient: 0.25,
            ..Default::default()
        };
        assert_eq!(sun.diffuse(Vec3::Z), 0.0);
        assert_eq!(sun.factor(Vec3::Z), 0.25);
    }

    #[test]
    fn light_colour_tints_result() {
        let sun = DirectionalLight {
            direction: vec3(0.0, 0.0, -1.0),
            color: Color::rgb(255, 0, 0),
            intensity: 1.0,
            ambient: 0.0,
        };
        let c = shade_triangle(&lit_tri(Color::WHITE), &sun, &[], &LightSelection::default(), &[]);
        assert_eq!((c.r, c.g, c.b), (255, 0, 0));
    }

    fn dark() -> DirectionalLight {
        DirectionalLight {
            direction: vec3(0.0, 0.0, -1.0),
            color: Color::WHITE,
            intensity: 0.0,
            ambient: 0.0,
        }
    }

    #[test]
    fn far_light_is_never_selected() {
        let near = PointLight::new(vec3(0.5, 0.5, 2.0), Color::WHITE, 1.0, 50.0);
        let far = PointLight::new(vec3(0.5, 0.5, 200.0), Color::WHITE, 1.0, 500.0);
        let lights: Vec<&dyn LightSource> = vec![&far, &near];
        let settings = DynamicLighting {
            enabled: true,
            max_lights: 4,
            find_distance: 20.0,
        };

        let mut picked = LightSelection::default();
        select_lights(&lights, Vec3::ZERO, &settings, &mut picked);
        assert_eq!(picked.indices().collect::<Vec<_>>(), vec![1]);

        // only the far light: surface stays black
        let lights: Vec<&dyn LightSource> = vec![&far];
        select_lights(&lights, Vec3::ZERO, &settings, &mut picked);
        assert!(picked.is_empty());
        let c = shade_triangle(&lit_tri(Color::WHITE), &dark(), &lights, &picked, &[]);
        assert_eq!((c.r, c.g, c.b), (0, 0, 0));
    }

    #[test]
    fn nearest_lights_win_when_over_budget() {
        let a = PointLight::new(vec3(3.0, 0.0, 0.0), Color::WHITE, 1.0, 10.0);
        let b = PointLight::new(vec3(1.0, 0.0, 0.0), Color::WHITE, 1.0, 10.0);
        let c = PointLight::new(vec3(2.0, 0.0, 0.0), Color::WHITE, 1.0, 10.0);
        let lights: Vec<&dyn LightSource> = vec![&a, &b, &c];
        let settings = DynamicLighting {
            enabled: true,
            max_lights: 2,
            find_distance: 100.0,
        };
        let mut picked = LightSelection::default();
        select_lights(&lights, Vec3::ZERO, &settings, &mut picked);
        let xs: Vec<f32> = picked.indices().map(|i| lights[i].position().x).collect();
        assert_eq!(xs, vec![1.0, 2.0]);
    }

    #[test]
    fn zero_budget_disables_dynamic_light() {
        let light = PointLight::new(vec3(0.3, 0.3, 1.0), Color::WHITE, 1.0, 50.0);
        let lights: Vec<&dyn LightSource> = vec![&light];
        let mut picked = LightSelection::default();
        let settings = DynamicLighting {
            enabled: true,
            max_lights: 0,
            find_distance: 100.0,
        };
        select_lights(&lights, Vec3::ZERO, &settings, &mut picked);
        assert!(picked.is_empty());

        let settings = DynamicLighting {
            enabled: false,
            max_lights: 4,
            find_distance: 100.0,
        };
        select_lights(&lights, Vec3::ZERO, &settings, &mut picked);
        assert!(picked.is_empty());
    }

    #[test]
    fn dynamic_light_adds_on_top() {
        let light = PointLight::new(vec3(0.3, 0.3, 1.0), Color::WHITE, 1.0, 50.0);
        let lights: Vec<&dyn LightSource> = vec![&light];
        let settings = DynamicLighting {
            enabled: true,
            max_lights: 4,
            find_distance: 100.0,
        };
        let mut picked = LightSelection::default();
        select_lights(&lights, Vec3::ZERO, &settings, &mut picked);
        let tri = lit_tri(Color::rgb(100, 100, 100));
        let sun = DirectionalLight {
            intensity: 0.0,
            ambient: 0.5,
            ..Default::default()
        };
        let without = shade_triangle(&tri, &sun, &lights, &LightSelection::default(), &[]);
        let with = shade_triangle(&tri, &sun, &lights, &picked, std::slice::from_ref(&tri));
        assert_eq!(without.r, 50);
        assert!(with.r > without.r);
    }
}
