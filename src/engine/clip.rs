//! Sutherland–Hodgman against the near plane only.
//!
//! Far plane and screen edges are handled by rejection elsewhere; the near
//! plane is the one that must be cut geometrically because the perspective
//! divide blows up behind it.

use glam::Vec3;
use smallvec::SmallVec;

/// Slack on the visible side of the plane.
pub const CLIP_EPSILON: f32 = 1e-5;

/// A polygon corner carried through the clip: camera-space position plus the
/// world-space position it maps back to (interpolated on cut edges).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipVertex {
    pub cam: Vec3,
    pub world: Vec3,
}

/// Clip output. A triangle crossing the plane grows to 4 corners, so 8
/// inline slots cover quads and most n-gons.
pub type ClipPolygon = SmallVec<[ClipVertex; 8]>;

#[inline]
fn visible(v: &ClipVertex, near: f32) -> bool {
    v.cam.x >= near - CLIP_EPSILON
}

/// Point where edge `a → b` meets `depth = near`, pinned onto the plane.
#[inline]
fn intersect(a: &ClipVertex, b: &ClipVertex, near: f32) -> ClipVertex {
    let t = (near - a.cam.x) / (b.cam.x - a.cam.x);
    let mut cam = a.cam.lerp(b.cam, t);
    cam.x = near;
    ClipVertex {
        cam,
        world: a.world.lerp(b.world, t),
    }
}

/// Clip the closed loop `input` against `depth = near` into `out`.
///
/// Edges are walked as `(previous, current)` so an untouched polygon comes
/// back in its original order. `out` ends up empty or with at least three
/// corners.
pub fn clip_near(input: &[ClipVertex], near: f32, out: &mut ClipPolygon) {
    out.clear();
    let n = input.len();
    if n < 3 {
        return;
    }

    for i in 0..n {
        let a = &input[(i + n - 1) % n];
        let b = &input[i];
        match (visible(a, near), visible(b, near)) {
            (true, true) => out.push(*b),
            (true, false) => out.push(intersect(a, b, near)),
            (false, true) => {
                out.push(intersect(a, b, near));
                out.push(*b);
            }
            (false, false) => {}
        }
    }

    if out.len() < 3 {
        out.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec3;

    const NEAR: f32 = 1.0;

    fn loop_of(depths: &[(f32, f32, f32)]) -> Vec<ClipVertex> {
        depths
            .iter()
            .map(|&(d, r, u)| ClipVertex {
                cam: vec3(d, r, u),
                world: vec3(d, -r, u),
            })
            .collect()
    }

    #[test]
    fn fully_in_front_is_unchanged() {
        let tri = loop_of(&[(5.0, 0.0, 0.0), (6.0, 1.0, 0.0), (7.0, 0.0, 1.0)]);
        let mut out = ClipPolygon::new();
        clip_near(&tri, NEAR, &mut out);
        assert_eq!(out.as_slice(), tri.as_slice());
    }

    #[test]
    fn fully_behind_is_empty() {
        let tri = loop_of(&[(0.5, 0.0, 0.0), (-2.0, 1.0, 0.0), (0.0, 0.0, 1.0)]);
        let mut out = ClipPolygon::new();
        clip_near(&tri, NEAR, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn straddling_triangle_becomes_quad() {
        // one corner behind the plane
        let tri = loop_of(&[(0.0, 0.0, 0.0), (4.0, -1.0, 0.0), (4.0, 1.0, 0.0)]);
        let mut out = ClipPolygon::new();
        clip_near(&tri, NEAR, &mut out);
        assert_eq!(out.len(), 4);
        assert!(out.iter().all(|v| v.cam.x >= NEAR));
        // world position follows the same interpolation
        for v in &out {
            assert!((v.world - vec3(v.cam.x, -v.cam.y, v.cam.z)).length() < 1e-5);
        }
    }

    #[test]
    fn two_corners_behind_stays_triangle() {
        let tri = loop_of(&[(0.0, -1.0, 0.0), (3.0, 0.0, 0.0), (0.0, 1.0, 0.0)]);
        let mut out = ClipPolygon::new();
        clip_near(&tri, NEAR, &mut out);
        assert_eq!(out.len(), 3);
        assert!(out.iter().all(|v| v.cam.x >= NEAR));
    }

    #[test]
    fn corner_on_plane_counts_as_visible() {
        let tri = loop_of(&[(NEAR, 0.0, 0.0), (2.0, 1.0, 0.0), (2.0, 0.0, 1.0)]);
        let mut out = ClipPolygon::new();
        clip_near(&tri, NEAR, &mut out);
        assert_eq!(out.len(), 3);
    }
}
