use glam::{Vec2, Vec3};

use crate::renderer::Rgba;
use crate::world::Surface;

/// One triangle built this frame. Discarded when the next frame starts.
#[derive(Clone, Debug, PartialEq)]
pub struct Triangle {
    pub screen: [Vec2; 3],
    /// Camera-space depth of each screen point.
    pub depths: [f32; 3],
    /// World-space corners (pre-projection), used for lighting and shadows.
    pub world: [Vec3; 3],
    /// Face normal in world space, shared by every triangle of the face.
    pub normal: Vec3,
    pub surface: Surface,
    /// Average camera-space depth; larger draws first.
    pub sort_key: f32,
    pub culled: bool,
    /// Lit colour, resolved by the lighting pass.
    pub colour: Rgba,
    /// Index of the owning mesh in the render context.
    pub mesh: usize,
}

impl Triangle {
    /// Zeroed triangle with the given surface.
    pub fn blank(surface: Surface) -> Self {
        Self {
            screen: [Vec2::ZERO; 3],
            depths: [0.0; 3],
            world: [Vec3::ZERO; 3],
            normal: Vec3::Z,
            surface,
            sort_key: 0.0,
            culled: false,
            colour: 0,
            mesh: 0,
        }
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.world[0] + self.world[1] + self.world[2]) / 3.0
    }

    #[inline]
    pub fn screen_centroid(&self) -> Vec2 {
        (self.screen[0] + self.screen[1] + self.screen[2]) / 3.0
    }

    /// Larger side of the screen-space bounding box, in pixels.
    pub fn screen_extent(&self) -> f32 {
        let min = self.screen[0].min(self.screen[1]).min(self.screen[2]);
        let max = self.screen[0].max(self.screen[1]).max(self.screen[2]);
        let size = max - min;
        size.x.max(size.y)
    }

    /// Longest world-space edge.
    pub fn world_extent(&self) -> f32 {
        let [a, b, c] = self.world;
        a.distance(b).max(b.distance(c)).max(c.distance(a))
    }
}

/// Debug counters for the last frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub meshes: usize,
    pub faces: usize,
    /// Triangles produced (culled ones included); the shadow set size.
    pub triangles: usize,
    pub visible: usize,
    /// Visible triangles that wrote at least one pixel.
    pub rendered: usize,
    pub culled: usize,
    /// Faces dropped by the near/far plane or degenerate geometry.
    pub clipped: usize,
    pub lights: usize,
    pub highlights: usize,
}

/// Per-frame triangle storage, cleared and refilled instead of reallocated.
///
/// `all` is the shadow-occluder superset; `visible` indexes the non-culled
/// ones and is what gets sorted and drawn.
#[derive(Default)]
pub struct TriangleArena {
    pub all: Vec<Triangle>,
    pub visible: Vec<usize>,
}

impl TriangleArena {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            all: Vec::with_capacity(n),
            visible: Vec::with_capacity(n),
        }
    }

    pub fn clear(&mut self) {
        self.all.clear();
        self.visible.clear();
    }

    pub fn push(&mut self, tri: Triangle) {
        if !tri.culled {
            self.visible.push(self.all.len());
        }
        self.all.push(tri);
    }

    #[inline]
    pub fn visible(&self) -> impl Iterator<Item = &Triangle> {
        self.visible.iter().map(|&i| &self.all[i])
    }
}
