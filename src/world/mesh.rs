use glam::{Vec3, vec3};
use smallvec::SmallVec;

use super::color::Color;

/// Vertex indices of one convex polygon. Quads and triangles stay inline.
pub type FaceIndices = SmallVec<[usize; 4]>;

/// One convex polygon of a mesh, wound counter-clockwise seen from the front.
#[derive(Clone, Debug, PartialEq)]
pub struct Face {
    pub indices: FaceIndices,
}

impl Face {
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
        }
    }

    pub fn tri(a: usize, b: usize, c: usize) -> Self {
        Self::new([a, b, c])
    }

    pub fn quad(a: usize, b: usize, c: usize, d: usize) -> Self {
        Self::new([a, b, c, d])
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Phong-ish surface description.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub diffuse: Color,
    pub specular: Color,
    pub shininess: f32,
}

/// What a face is painted with: a full material or a flat fallback colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Surface {
    Material(Material),
    Flat(Color),
}

impl Surface {
    /// Colour that lighting multiplies into.
    #[inline]
    pub fn base_color(&self) -> Color {
        match self {
            Surface::Material(m) => m.diffuse,
            Surface::Flat(c) => *c,
        }
    }

    /// Specular colour and shininess, `None` when the surface has no highlight.
    #[inline]
    pub fn specular(&self) -> Option<(Color, f32)> {
        match self {
            Surface::Material(m) if !m.specular.is_black() && m.shininess > 0.0 => {
                Some((m.specular, m.shininess))
            }
            _ => None,
        }
    }
}

impl Default for Surface {
    fn default() -> Self {
        Surface::Flat(Color::rgb(200, 200, 200))
    }
}

/// Anything the camera can draw.
///
/// Vertices are in **world space** (the implementor applies its own
/// transform); the camera never mutates them.
pub trait Renderable3D {
    fn world_vertices(&self) -> &[Vec3];
    fn faces(&self) -> &[Face];
    fn surface(&self) -> Surface;

    fn is_active(&self) -> bool {
        true
    }
}

/// Built-in polygon mesh with a position / heading / uniform-scale transform.
#[derive(Clone, Debug)]
pub struct Mesh {
    pub name: String,
    local: Vec<Vec3>,
    world: Vec<Vec3>,
    faces: Vec<Face>,
    surface: Surface,
    pos: Vec3,
    yaw: f32, // degrees
    scale: f32,
    pub active: bool,
}

impl Mesh {
    pub fn new(
        name: impl Into<String>,
        vertices: Vec<Vec3>,
        faces: Vec<Face>,
        surface: Surface,
    ) -> Self {
        let mut mesh = Self {
            name: name.into(),
            world: Vec::with_capacity(vertices.len()),
            local: vertices,
            faces,
            surface,
            pos: Vec3::ZERO,
            yaw: 0.0,
            scale: 1.0,
            active: true,
        };
        mesh.refresh_world();
        mesh
    }

    /// Axis-aligned cube of edge `size` centred on the local origin.
    pub fn cube(name: impl Into<String>, size: f32, surface: Surface) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            vec3(-h, -h, -h),
            vec3(h, -h, -h),
            vec3(h, h, -h),
            vec3(-h, h, -h),
            vec3(-h, -h, h),
            vec3(h, -h, h),
            vec3(h, h, h),
            vec3(-h, h, h),
        ];
        let faces = vec![
            Face::quad(0, 3, 2, 1), // bottom
            Face::quad(4, 5, 6, 7), // top
            Face::quad(0, 1, 5, 4), // -Y
            Face::quad(3, 7, 6, 2), // +Y
            Face::quad(0, 4, 7, 3), // -X
            Face::quad(1, 2, 6, 5), // +X
        ];
        Self::new(name, vertices, faces, surface)
    }

    /// Square in the XY plane facing +Z, edge `size`.
    pub fn quad(name: impl Into<String>, size: f32, surface: Surface) -> Self {
        let h = size * 0.5;
        let vertices = vec![
            vec3(-h, -h, 0.0),
            vec3(h, -h, 0.0),
            vec3(h, h, 0.0),
            vec3(-h, h, 0.0),
        ];
        Self::new(name, vertices, vec![Face::quad(0, 1, 2, 3)], surface)
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn set_transform(&mut self, pos: Vec3, yaw: f32, scale: f32) {
        self.pos = pos;
        self.yaw = yaw;
        self.scale = scale;
        self.refresh_world();
    }

    pub fn set_position(&mut self, pos: Vec3) {
        self.set_transform(pos, self.yaw, self.scale);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.set_transform(self.pos, yaw.rem_euclid(360.0), self.scale);
    }

    pub fn set_surface(&mut self, surface: Surface) {
        self.surface = surface;
    }

    fn refresh_world(&mut self) {
        let (s, c) = self.yaw.to_radians().sin_cos();
        self.world.clear();
        self.world.extend(self.local.iter().map(|v| {
            let v = *v * self.scale;
            self.pos + vec3(v.x * c - v.y * s, v.x * s + v.y * c, v.z)
        }));
    }
}

impl Renderable3D for Mesh {
    fn world_vertices(&self) -> &[Vec3] {
        &self.world
    }

    fn faces(&self) -> &[Face] {
        &self.faces
    }

    fn surface(&self) -> Surface {
        self.surface
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
