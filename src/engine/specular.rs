use glam::Vec3;

use super::lighting::DirectionalLight;
use super::projection::Projector;
use super::types::Triangle;
use crate::renderer::Highlight;
use crate::world::Camera;

/// Phong terms below this produce no blob.
pub const SPECULAR_THRESHOLD: f32 = 0.01;

/// How far along `R` the highlight point sits, as a fraction of the longest
/// world edge.
const REFLECT_OFFSET: f32 = 0.1;

/// Phong highlight of `tri` under the directional light, or `None` when the
/// surface has no specular colour, faces away, or the term is too weak.
pub fn highlight_for(
    tri: &Triangle,
    sun: &DirectionalLight,
    camera: &Camera,
    projector: &Projector,
    bleed: bool,
) -> Option<Highlight> {
    let (spec, shininess) = tri.surface.specular()?;
    let l = sun.to_light()?;
    let n = tri.normal;
    let n_dot_l = n.dot(l);
    if n_dot_l <= 0.0 {
        return None;
    }

    let centroid = tri.centroid();
    let v = (camera.world_pos() - centroid).try_normalize()?;
    let r = reflect(l, n);
    let term = r.dot(v).max(0.0).powf(shininess) * sun.intensity;
    if term < SPECULAR_THRESHOLD {
        return None;
    }

    let offset = REFLECT_OFFSET * tri.world_extent();
    let centre = projector
        .project_point(camera.to_cam(centroid + r * offset))
        .map(|p| p.pos)
        .unwrap_or_else(|| tri.screen_centroid());

    let radius = tri.screen_extent() * 0.3 * (1.0 - shininess / 256.0).max(0.1);
    let [sr, sg, sb] = spec.channels();
    let [lr, lg, lb] = sun.color.channels();

    Some(Highlight {
        centre,
        radius,
        colour: [
            sr * lr / 255.0 * term,
            sg * lg / 255.0 * term,
            sb * lb / 255.0 * term,
        ],
        clip: tri.screen,
        bleed,
        mesh: tri.mesh,
    })
}

/// Mirror the unit vector `l` about the unit normal `n`.
#[inline]
pub fn reflect(l: Vec3, n: Vec3) -> Vec3 {
    2.0 * n.dot(l) * n - l
}
