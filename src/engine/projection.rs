use glam::{Vec2, Vec3, vec2};

/// Depths at or below this are never divided by.
pub const DEPTH_EPSILON: f32 = 1e-5;

/// A projected point: raster position (top-left origin, y down) plus the
/// camera-space depth it came from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenPoint {
    pub pos: Vec2,
    pub depth: f32,
}

/// Camera space `(depth, right, up)` → raster space.
///
/// ```text
/// f    = 1 / tan(fov / 2)
/// ndcX = (right / depth) * (f / aspect)
/// ndcY = (up / depth) * f
/// sx   = (ndcX * 0.5 + 0.5) * W
/// sy   = (0.5 - ndcY * 0.5) * H
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projector {
    focal: f32,
    aspect: f32,
    width: f32,
    height: f32,
    near: f32,
    far: f32,
}

impl Projector {
    pub fn new(fov_deg: f32, near: f32, far: f32, width: usize, height: usize) -> Self {
        let width = width.max(1) as f32;
        let height = height.max(1) as f32;
        Self {
            focal: 1.0 / (fov_deg.to_radians() * 0.5).tan(),
            aspect: width / height,
            width,
            height,
            near,
            far,
        }
    }

    #[inline]
    pub fn near(&self) -> f32 {
        self.near
    }

    #[inline]
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Project with near/far rejection: `None` when `depth <= near`,
    /// `depth >= far` or the depth is too small to divide by.
    #[inline]
    pub fn project_point(&self, c: Vec3) -> Option<ScreenPoint> {
        if c.x <= self.near || c.x >= self.far {
            return None;
        }
        self.project_camera_point(c)
    }

    /// Project a point that already went through the near clip; only
    /// near-zero depths are rejected.
    #[inline]
    pub fn project_camera_point(&self, c: Vec3) -> Option<ScreenPoint> {
        let depth = c.x;
        if depth <= DEPTH_EPSILON {
            return None;
        }
        let ndc_x = (c.y / depth) * (self.focal / self.aspect);
        let ndc_y = (c.z / depth) * self.focal;
        Some(ScreenPoint {
            pos: vec2(
                (ndc_x * 0.5 + 0.5) * self.width,
                (0.5 - ndc_y * 0.5) * self.height,
            ),
            depth,
        })
    }
}
