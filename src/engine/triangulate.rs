//! Face → triangles: lookup, cull test, near clip, projection, fan split.

use glam::{Vec2, Vec3};
use smallvec::SmallVec;

use super::clip::{ClipPolygon, ClipVertex, clip_near};
use super::projection::Projector;
use super::types::{FrameStats, Triangle, TriangleArena};
use crate::world::{Camera, Face, Surface};

/// Cull only when the face points away by more than this. Slightly negative
/// so faces seen almost edge-on survive.
pub const BACKFACE_THRESHOLD: f32 = -0.05;

/// Normal used when a face's first three corners are collinear (world up).
pub const DEFAULT_NORMAL: Vec3 = Vec3::Z;

/// Everything about the current view a face needs.
#[derive(Clone, Copy, Debug)]
pub struct FaceView<'a> {
    pub camera: &'a Camera,
    pub projector: &'a Projector,
    pub backface_culling: bool,
}

/// Scratch buffers reused across faces.
#[derive(Default)]
pub struct FaceScratch {
    corners: SmallVec<[ClipVertex; 8]>,
    clipped: ClipPolygon,
    screen: SmallVec<[(Vec2, f32); 8]>,
}

/// Unit normal of `(b - a) × (c - a)` in world space, [`DEFAULT_NORMAL`]
/// when degenerate.
pub fn face_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    (b - a).cross(c - a).try_normalize().unwrap_or(DEFAULT_NORMAL)
}

/// Backface test on camera-space corners.
///
/// Camera space `(depth, right, up)` is left-handed, so the outward normal
/// of a counter-clockwise face is `(c - a) × (b - a)` there. The face is a
/// back face when that normal points away from the eye (at the origin) by
/// more than [`BACKFACE_THRESHOLD`].
pub fn is_backface(a: Vec3, b: Vec3, c: Vec3) -> bool {
    let Some(normal) = (c - a).cross(b - a).try_normalize() else {
        return false;
    };
    let centroid = (a + b + c) / 3.0;
    let Some(to_eye) = (-centroid).try_normalize() else {
        return false;
    };
    normal.dot(to_eye) < BACKFACE_THRESHOLD
}

/// Fan `(0, i, i + 1)` over an `n`-gon.
#[inline]
pub fn fan(n: usize) -> impl Iterator<Item = [usize; 3]> {
    (1..n.saturating_sub(1)).map(|i| [0, i, i + 1])
}

/// Turn one face into triangles and push them into `arena`.
///
/// Degenerate faces (fewer than three valid indices, fully clipped, beyond
/// the far plane, unprojectable) are dropped and counted in `stats.clipped`.
#[allow(clippy::too_many_arguments)]
pub fn triangulate_face(
    face: &Face,
    vertices: &[Vec3],
    surface: Surface,
    mesh: usize,
    view: &FaceView<'_>,
    scratch: &mut FaceScratch,
    arena: &mut TriangleArena,
    stats: &mut FrameStats,
) {
    stats.faces += 1;

    scratch.corners.clear();
    scratch.corners.extend(
        face.indices
            .iter()
            .filter_map(|&i| vertices.get(i))
            .map(|&world| ClipVertex {
                cam: view.camera.to_cam(world),
                world,
            }),
    );
    if scratch.corners.len() < 3 {
        stats.clipped += 1;
        return;
    }

    let [a, b, c] = [&scratch.corners[0], &scratch.corners[1], &scratch.corners[2]];
    let normal = face_normal(a.world, b.world, c.world);
    let culled = view.backface_culling && is_backface(a.cam, b.cam, c.cam);

    // far plane: rejection only
    let far = view.projector.far();
    if scratch.corners.iter().all(|v| v.cam.x >= far) {
        stats.clipped += 1;
        return;
    }

    clip_near(&scratch.corners, view.projector.near(), &mut scratch.clipped);
    if scratch.clipped.is_empty() {
        stats.clipped += 1;
        return;
    }

    scratch.screen.clear();
    for v in &scratch.clipped {
        match view.projector.project_camera_point(v.cam) {
            Some(p) => scratch.screen.push((p.pos, p.depth)),
            None => {
                stats.clipped += 1;
                return;
            }
        }
    }

    if culled {
        stats.culled += 1;
    }

    for [i, j, k] in fan(scratch.clipped.len()) {
        let depths = [scratch.screen[i].1, scratch.screen[j].1, scratch.screen[k].1];
        arena.push(Triangle {
            screen: [scratch.screen[i].0, scratch.screen[j].0, scratch.screen[k].0],
            depths,
            world: [
                scratch.clipped[i].world,
                scratch.clipped[j].world,
                scratch.clipped[k].world,
            ],
            normal,
            surface,
            sort_key: (depths[0] + depths[1] + depths[2]) / 3.0,
            culled,
            colour: 0,
            mesh,
        });
        stats.triangles += 1;
    }
}
