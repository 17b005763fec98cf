use glam::{Vec3, vec3};

/// World transform of whatever the camera is attached to.
///
/// Only position and heading are inherited; a parent never tilts the view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParentTransform {
    pub pos: Vec3,
    pub yaw: f32, // degrees
}

/// View-point in world space.
///
/// * World is right-handed, **+Z up**; yaw 0 looks along +X and positive yaw
///   turns left (counter-clockwise seen from above).
/// * Positive pitch looks up, roll banks around the forward axis.
/// * All angles are **degrees**.
///
/// Camera space is `(depth, right, up)` stored in a `Vec3` as `x, y, z`.
/// That frame is left-handed, which matters for cross products.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Camera {
    pub pos: Vec3, // local position (relative to the parent, if any)
    pub yaw: f32,
    pub pitch: f32,
    pub roll: f32,
    pub parent: Option<ParentTransform>,
}

impl Camera {
    pub fn new(pos: Vec3, yaw: f32, pitch: f32, roll: f32) -> Self {
        Self {
            pos,
            yaw,
            pitch,
            roll,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: ParentTransform) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Eye position in world space (parent offset applied).
    #[inline]
    pub fn world_pos(&self) -> Vec3 {
        match self.parent {
            None => self.pos,
            Some(p) => {
                let (s, c) = p.yaw.to_radians().sin_cos();
                p.pos
                    + vec3(
                        self.pos.x * c - self.pos.y * s,
                        self.pos.x * s + self.pos.y * c,
                        self.pos.z,
                    )
            }
        }
    }

    /// Heading in world space, degrees.
    #[inline]
    pub fn world_yaw(&self) -> f32 {
        self.yaw + self.parent.map_or(0.0, |p| p.yaw)
    }

    /// Transform a world point into camera space `(depth, right, up)`.
    ///
    /// Undo yaw, then pitch, then roll; each step is a plain 2-D rotation of
    /// one axis pair.
    pub fn to_cam(&self, p: Vec3) -> Vec3 {
        let d = p - self.world_pos();

        // yaw: forward becomes +X, +Y is left
        let (sy, cy) = self.world_yaw().to_radians().sin_cos();
        let fwd = d.x * cy + d.y * sy;
        let left = -d.x * sy + d.y * cy;
        let up = d.z;

        // pitch: forward/up pair
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let depth = fwd * cp + up * sp;
        let up = -fwd * sp + up * cp;

        // roll: left/up pair
        let (sr, cr) = self.roll.to_radians().sin_cos();
        let left_r = left * cr + up * sr;
        let up_r = -left * sr + up * cr;

        vec3(depth, -left_r, up_r)
    }

    /// Inverse of [`Camera::to_cam`].
    pub fn to_world(&self, c: Vec3) -> Vec3 {
        let (depth, left_r, up_r) = (c.x, -c.y, c.z);

        let (sr, cr) = self.roll.to_radians().sin_cos();
        let left = left_r * cr - up_r * sr;
        let up = left_r * sr + up_r * cr;

        let (sp, cp) = self.pitch.to_radians().sin_cos();
        let fwd = depth * cp - up * sp;
        let up = depth * sp + up * cp;

        let (sy, cy) = self.world_yaw().to_radians().sin_cos();
        let dx = fwd * cy - left * sy;
        let dy = fwd * sy + left * cy;

        self.world_pos() + vec3(dx, dy, up)
    }

    /*──────────────────────── derived vectors ───────────────────────*/

    /// Unit view direction in world space.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.to_world(Vec3::X) - self.world_pos()
    }

    /// Unit vector to the camera's right on the ground plane.
    #[inline]
    pub fn right(&self) -> Vec3 {
        let (s, c) = self.world_yaw().to_radians().sin_cos();
        vec3(s, -c, 0.0)
    }

    /*──────────────────────── movement helpers ──────────────────────*/

    /// Move by `forward` units along the heading and `side` units to the right.
    /// Height is preserved.
    pub fn step(&mut self, forward: f32, side: f32) {
        let (s, c) = self.yaw.to_radians().sin_cos();
        self.pos.x += c * forward + s * side;
        self.pos.y += s * forward - c * side;
    }

    /// Rotate around Z (positive = turn left).
    pub fn turn(&mut self, delta_yaw: f32) {
        self.yaw = (self.yaw + delta_yaw).rem_euclid(360.0);
    }

    /// Tilt the view, clamped short of straight up/down.
    pub fn tilt(&mut self, delta_pitch: f32) {
        self.pitch = (self.pitch + delta_pitch).clamp(-89.0, 89.0);
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
