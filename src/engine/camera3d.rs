use glam::Vec3;

use super::lighting::{
    DirectionalLight, DynamicLighting, LightSelection, select_lights, shade_triangle,
};
use super::projection::Projector;
use super::sort::sort_back_to_front;
use super::specular::highlight_for;
use super::triangulate::{FaceScratch, FaceView, triangulate_face};
use super::types::{FrameStats, TriangleArena};
use crate::config::{self, BackgroundType, CameraConfig, ConfigError, Vector3, clamp_fov};
use crate::renderer::software::background::horizon_ratio;
use crate::renderer::{Background, Highlight, PixelBuffer, Renderer, Rgba, Software};
use crate::world::{Camera, Color, LightSource, ParentTransform, Renderable3D};

/// What one `render` call draws. Borrowed for the duration of the call only.
#[derive(Clone, Copy, Default)]
pub struct RenderContext<'a> {
    pub meshes: &'a [&'a dyn Renderable3D],
    pub lights: &'a [&'a dyn LightSource],
}

/// A camera that owns its back-end and renders a [`RenderContext`] into it.
pub struct Camera3D<R: Renderer = Software> {
    config: CameraConfig,
    parent: Option<ParentTransform>,
    renderer: R,
    arena: TriangleArena,
    scratch: FaceScratch,
    lights: LightSelection,
    highlights: Vec<Highlight>,
    stats: FrameStats,
}

impl Camera3D<Software> {
    /// Validate `config` and allocate a software surface at its resolution.
    pub fn from_config(config: CameraConfig) -> Result<Self, ConfigError> {
        Self::with_renderer(config, Software::default())
    }
}

impl Default for Camera3D<Software> {
    fn default() -> Self {
        let config = CameraConfig::default();
        let renderer = Software::new(config.width, config.height);
        Self::assemble(config, renderer)
    }
}

impl<R: Renderer> Camera3D<R> {
    pub fn with_renderer(mut config: CameraConfig, mut renderer: R) -> Result<Self, ConfigError> {
        config.validate()?;
        config.field_of_view = clamp_fov(config.field_of_view);
        if let Err(e) = renderer.resize(config.width, config.height) {
            log::error!("camera surface unavailable: {e}");
        }
        Ok(Self::assemble(config, renderer))
    }

    fn assemble(config: CameraConfig, renderer: R) -> Self {
        Self {
            config,
            parent: None,
            renderer,
            arena: TriangleArena::with_capacity(256),
            scratch: FaceScratch::default(),
            lights: LightSelection::default(),
            highlights: Vec::new(),
            stats: FrameStats::default(),
        }
    }

    /*──────────────────────── state ───────────────────────*/

    #[inline]
    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    /// View transform for this frame: local pose plus the parent, if any.
    pub fn camera(&self) -> Camera {
        let Vector3 { x: pitch, y: yaw, z: roll } = self.config.rotation;
        let camera = Camera::new(self.config.position.into(), yaw, pitch, roll);
        match self.parent {
            Some(p) => camera.with_parent(p),
            None => camera,
        }
    }

    #[inline]
    pub fn stats(&self) -> &FrameStats {
        &self.stats
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.config.active
    }

    pub fn sun(&self) -> DirectionalLight {
        DirectionalLight {
            direction: self.config.light_direction.into(),
            color: self.config.light_color,
            intensity: self.config.light_intensity,
            ambient: self.config.ambient_intensity,
        }
    }

    pub fn dynamic_lighting(&self) -> DynamicLighting {
        DynamicLighting {
            enabled: self.config.use_dynamic_lighting,
            max_lights: self.config.max_lights,
            find_distance: self.config.light_find_distance,
        }
    }

    /*──────────────────────── setters ───────────────────────*/

    pub fn set_parent(&mut self, parent: Option<ParentTransform>) {
        self.parent = parent;
    }

    pub fn set_position(&mut self, pos: Vec3) {
        self.config.position = pos.into();
    }

    /// Degrees.
    pub fn set_rotation(&mut self, yaw: f32, pitch: f32, roll: f32) {
        self.config.rotation = Vector3::new(pitch, yaw, roll);
    }

    /// Copy position and angles from a free-standing view.
    pub fn set_pose(&mut self, view: &Camera) {
        self.set_position(view.pos);
        self.set_rotation(view.yaw, view.pitch, view.roll);
    }

    pub fn set_active(&mut self, active: bool) {
        self.config.active = active;
    }

    /// Clamped to `[1, 179]` degrees.
    pub fn set_fov(&mut self, fov: f32) {
        let clamped = clamp_fov(fov);
        if clamped != fov {
            log::warn!("field of view {fov} clamped to {clamped}");
        }
        self.config.field_of_view = clamped;
    }

    pub fn set_planes(&mut self, near: f32, far: f32) -> Result<(), ConfigError> {
        config::validate_planes(near, far)?;
        self.config.near_plane = near;
        self.config.far_plane = far;
        Ok(())
    }

    /// Change the output size. The surface is reallocated here, never during
    /// a frame; if that fails the camera renders nothing until the next
    /// successful call.
    pub fn set_resolution(&mut self, width: usize, height: usize) -> Result<(), ConfigError> {
        config::validate_resolution(width, height)?;
        self.config.width = width;
        self.config.height = height;
        if let Err(e) = self.renderer.resize(width, height) {
            log::error!("camera surface unavailable: {e}");
        }
        Ok(())
    }

    pub fn set_background(&mut self, kind: BackgroundType) {
        self.config.background_type = kind;
    }

    pub fn set_background_color(&mut self, colour: Color) {
        self.config.background_color = colour;
    }

    /// Sky, sky horizon, floor horizon, floor.
    pub fn set_sky_floor(&mut self, sky: Color, sky_horizon: Color, floor_horizon: Color, floor: Color) {
        self.config.sky_color = sky;
        self.config.sky_horizon_color = sky_horizon;
        self.config.floor_horizon_color = floor_horizon;
        self.config.floor_color = floor;
    }

    pub fn set_backface_culling(&mut self, enabled: bool) {
        self.config.enable_backface_culling = enabled;
    }

    pub fn set_sun(&mut self, sun: DirectionalLight) {
        self.config.light_direction = sun.direction.into();
        self.config.light_color = sun.color;
        self.config.light_intensity = sun.intensity;
        self.config.ambient_intensity = sun.ambient.clamp(0.0, 1.0);
    }

    pub fn set_dynamic_lighting(&mut self, settings: DynamicLighting) {
        self.config.use_dynamic_lighting = settings.enabled;
        self.config.max_lights = settings.max_lights;
        self.config.light_find_distance = settings.find_distance.max(0.0);
    }

    pub fn set_specular(&mut self, enabled: bool, bleeding: bool, per_mesh: bool) {
        self.config.specular_enabled = enabled;
        self.config.specular_bleeding_enabled = bleeding;
        self.config.specular_per_mesh = per_mesh;
    }

    pub fn set_show_debug_info(&mut self, show: bool) {
        self.config.show_debug_info = show;
    }

    /*──────────────────────── frame ───────────────────────*/

    fn background(&self, camera: &Camera) -> Background {
        let c = &self.config;
        match c.background_type {
            BackgroundType::Solid => Background::Solid(c.background_color),
            BackgroundType::Transparent => Background::Transparent,
            BackgroundType::Skyfloor => Background::SkyFloor {
                sky: c.sky_color,
                sky_horizon: c.sky_horizon_color,
                floor_horizon: c.floor_horizon_color,
                floor: c.floor_color,
                horizon: horizon_ratio(camera.pitch, c.field_of_view),
            },
        }
    }

    /// Draw one frame. Inactive cameras and cameras without a surface do
    /// nothing.
    pub fn render(&mut self, ctx: &RenderContext<'_>) {
        if !self.config.active {
            return;
        }
        let Some((width, height)) = self.renderer.begin_frame() else {
            return;
        };

        let camera = self.camera();
        let sun = self.sun();
        let dynamic = self.dynamic_lighting();
        let background = self.background(&camera);
        let projector = Projector::new(
            self.config.field_of_view,
            self.config.near_plane,
            self.config.far_plane,
            width,
            height,
        );

        self.stats = FrameStats::default();
        self.arena.clear();
        self.highlights.clear();

        self.renderer.draw_background(&background);

        // 1. geometry
        let view = FaceView {
            camera: &camera,
            projector: &projector,
            backface_culling: self.config.enable_backface_culling,
        };
        for (index, mesh) in ctx.meshes.iter().enumerate() {
            if !mesh.is_active() {
                continue;
            }
            self.stats.meshes += 1;
            let vertices = mesh.world_vertices();
            let surface = mesh.surface();
            for face in mesh.faces() {
                triangulate_face(
                    face,
                    vertices,
                    surface,
                    index,
                    &view,
                    &mut self.scratch,
                    &mut self.arena,
                    &mut self.stats,
                );
            }
        }
        self.stats.visible = self.arena.visible.len();
        sort_back_to_front(&mut self.arena);

        // 2. lighting
        select_lights(ctx.lights, camera.world_pos(), &dynamic, &mut self.lights);
        self.stats.lights = self.lights.len();

        for k in 0..self.arena.visible.len() {
            let i = self.arena.visible[k];
            let colour = shade_triangle(
                &self.arena.all[i],
                &sun,
                ctx.lights,
                &self.lights,
                &self.arena.all,
            );
            self.arena.all[i].colour = colour.pack();
        }

        // 3. raster
        let specular = self.config.specular_enabled;
        let bleed = self.config.specular_bleeding_enabled;
        for tri in self.arena.visible() {
            if self.renderer.draw_triangle(tri.screen, tri.colour) == 0 {
                continue;
            }
            self.stats.rendered += 1;
            if specular {
                if let Some(h) = highlight_for(tri, &sun, &camera, &projector, bleed) {
                    self.highlights.push(h);
                }
            }
        }

        // 4. specular
        self.stats.highlights = self.highlights.len();
        if self.config.specular_per_mesh {
            self.highlights.sort_by_key(|h| h.mesh);
            for group in self.highlights.chunk_by(|a, b| a.mesh == b.mesh) {
                self.renderer.draw_highlights(group, true);
            }
        } else {
            self.renderer.draw_highlights(&self.highlights, false);
        }

        if self.config.show_debug_info {
            let s = &self.stats;
            log::debug!(
                "frame: meshes={} faces={} tris={} visible={} rendered={} culled={} clipped={} lights={} highlights={}",
                s.meshes,
                s.faces,
                s.triangles,
                s.visible,
                s.rendered,
                s.culled,
                s.clipped,
                s.lights,
                s.highlights
            );
        }
    }

    /*──────────────────────── output ───────────────────────*/

    /// The last rendered frame.
    #[inline]
    pub fn output(&self) -> Option<&PixelBuffer> {
        self.renderer.surface()
    }

    /// Scaled, alpha-keyed blit of the last frame into `target`.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_output(
        &self,
        target: &mut [Rgba],
        target_w: usize,
        target_h: usize,
        x: i32,
        y: i32,
        w: usize,
        h: usize,
    ) {
        if let Some(s) = self.output() {
            s.blit_to(target, target_w, target_h, x, y, w, h);
        }
    }

    /// Loan the finished frame to `submit(pixels, w, h)`.
    pub fn present<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.renderer.end_frame(submit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Face, Material, Mesh, PointLight, Surface};
    use glam::vec3;

    const BG: Color = Color::rgb(10, 20, 30);

    fn camera(w: usize, h: usize) -> Camera3D {
        let cfg = CameraConfig {
            position: Vector3::default(),
            field_of_view: 90.0,
            width: w,
            height: h,
            background_type: BackgroundType::Solid,
            background_color: BG,
            ..Default::default()
        };
        Camera3D::from_config(cfg).unwrap()
    }

    // triangle at depth 10 facing the camera
    fn wall_tri() -> Mesh {
        wall_tri_with(Face::tri(0, 1, 2))
    }

    fn wall_tri_with(face: Face) -> Mesh {
        Mesh::new(
            "tri",
            vec![vec3(10.0, 2.0, -2.0), vec3(10.0, -2.0, -2.0), vec3(10.0, 0.0, 2.0)],
            vec![face],
            Surface::Flat(Color::rgb(200, 0, 0)),
        )
    }

    fn render(cam: &mut Camera3D, meshes: &[&dyn Renderable3D], lights: &[&dyn LightSource]) {
        cam.render(&RenderContext { meshes, lights });
    }

    #[test]
    fn end_to_end_triangle_writes_pixels() {
        let cfg = CameraConfig {
            far_plane: 100.0,
            ..camera(100, 100).config().clone()
        };
        let mut cam = Camera3D::from_config(cfg).unwrap();
        // unit triangle centred on (10, 0, 0)
        let mesh = Mesh::new(
            "unit",
            vec![
                vec3(10.0, 0.5, -1.0 / 3.0),
                vec3(10.0, -0.5, -1.0 / 3.0),
                vec3(10.0, 0.0, 2.0 / 3.0),
            ],
            vec![Face::tri(0, 1, 2)],
            Surface::Flat(Color::rgb(200, 0, 0)),
        );
        render(&mut cam, &[&mesh], &[]);

        let out = cam.output().unwrap();
        let bg = BG.pack();
        let lit = out.pixels().iter().filter(|&&px| px != bg).count();
        assert!(lit > 0);

        let c = cam.camera().to_cam(vec3(10.0, 0.0, 0.0));
        let p = Projector::new(90.0, 0.1, 100.0, 100, 100).project_point(c).unwrap();
        assert!((0.0..100.0).contains(&p.pos.x) && (0.0..100.0).contains(&p.pos.y));
        assert_ne!(out.get(p.pos.x as usize, p.pos.y as usize), Some(bg));

        let s = cam.stats();
        assert_eq!((s.meshes, s.faces, s.triangles, s.visible, s.rendered), (1, 1, 1, 1, 1));
    }

    #[test]
    fn back_face_is_not_drawn_unless_culling_is_off() {
        let mut cam = camera(50, 50);
        let mesh = wall_tri_with(Face::tri(0, 2, 1));
        render(&mut cam, &[&mesh], &[]);
        assert_eq!(cam.stats().culled, 1);
        assert!(cam.output().unwrap().pixels().iter().all(|&px| px == BG.pack()));

        cam.set_backface_culling(false);
        render(&mut cam, &[&mesh], &[]);
        assert_eq!(cam.stats().rendered, 1);
    }

    #[test]
    fn nearer_mesh_is_painted_last() {
        let mut cam = camera(40, 40);
        cam.set_sun(DirectionalLight {
            intensity: 0.0,
            ambient: 1.0,
            ..Default::default()
        });
        let far = wall_tri();
        let mut near = wall_tri();
        near.set_surface(Surface::Flat(Color::rgb(0, 0, 255)));
        near.set_position(vec3(-5.0, 0.0, 0.0));

        // submission order near → far; painter's order must still win
        render(&mut cam, &[&near, &far], &[]);
        let out = cam.output().unwrap();
        assert_eq!(out.get(20, 20), Some(Color::rgb(0, 0, 255).pack()));
    }

    #[test]
    fn inactive_camera_and_inactive_mesh_do_nothing() {
        let mut cam = camera(20, 20);
        let mut mesh = wall_tri();
        mesh.active = false;
        render(&mut cam, &[&mesh], &[]);
        assert_eq!(cam.stats().meshes, 0);

        mesh.active = true;
        cam.set_active(false);
        render(&mut cam, &[&mesh], &[]);
        assert_eq!(cam.stats().meshes, 0);
    }

    #[test]
    fn specular_blob_brightens_material() {
        let mut cam = camera(64, 64);
        // light straight along the view axis, reflected back at the eye
        cam.set_sun(DirectionalLight {
            direction: vec3(1.0, 0.0, 0.0),
            color: Color::WHITE,
            intensity: 1.0,
            ambient: 0.0,
        });
        // square at depth 8 facing the camera
        let mesh = Mesh::new(
            "panel",
            vec![
                vec3(8.0, 2.0, -2.0),
                vec3(8.0, -2.0, -2.0),
                vec3(8.0, -2.0, 2.0),
                vec3(8.0, 2.0, 2.0),
            ],
            vec![Face::quad(0, 1, 2, 3)],
            Surface::Material(Material {
                diffuse: Color::rgb(40, 40, 40),
                specular: Color::WHITE,
                shininess: 4.0,
            }),
        );

        render(&mut cam, &[&mesh], &[]);
        assert!(cam.stats().highlights > 0);
        let centre = cam.output().unwrap().get(34, 34).unwrap();
        assert!(Color::unpack(centre).r > 40);

        cam.set_specular(false, false, false);
        render(&mut cam, &[&mesh], &[]);
        assert_eq!(cam.stats().highlights, 0);
    }

    #[test]
    fn point_light_near_camera_adds_light() {
        let mut cam = camera(50, 50);
        cam.set_sun(DirectionalLight {
            intensity: 0.0,
            ambient: 0.0,
            ..Default::default()
        });
        let mesh = wall_tri();
        let light = PointLight::new(vec3(5.0, 0.0, 0.0), Color::WHITE, 1.0, 20.0);

        render(&mut cam, &[&mesh], &[]);
        let dark = cam.output().unwrap().get(25, 27).unwrap();
        render(&mut cam, &[&mesh], &[&light]);
        let lit = cam.output().unwrap().get(25, 27).unwrap();
        assert_eq!(cam.stats().lights, 1);
        assert!(Color::unpack(lit).r > Color::unpack(dark).r);
    }

    #[test]
    fn light_beyond_find_distance_leaves_triangle_unchanged() {
        let mut cam = camera(50, 50);
        cam.set_sun(DirectionalLight {
            intensity: 0.0,
            ambient: 0.0,
            ..Default::default()
        });
        let mut dynamic = DynamicLighting {
            enabled: true,
            max_lights: 4,
            find_distance: 5.0,
        };
        cam.set_dynamic_lighting(dynamic);
        let mesh = wall_tri();
        // one unit in front of the wall, nine from the camera
        let light = PointLight::new(vec3(9.0, 0.0, 0.0), Color::WHITE, 1.0, 20.0);

        render(&mut cam, &[&mesh], &[]);
        let unlit = cam.output().unwrap().get(25, 27).unwrap();
        render(&mut cam, &[&mesh], &[&light]);
        assert_eq!(cam.stats().lights, 0);
        assert_eq!(cam.output().unwrap().get(25, 27), Some(unlit));

        dynamic.find_distance = 20.0;
        cam.set_dynamic_lighting(dynamic);
        render(&mut cam, &[&mesh], &[&light]);
        assert_eq!(cam.stats().lights, 1);
        let lit = cam.output().unwrap().get(25, 27).unwrap();
        assert!(Color::unpack(lit).r > Color::unpack(unlit).r);
    }

    #[test]
    fn resolution_change_reallocates_and_config_round_trips() {
        let mut cam = camera(32, 16);
        cam.set_resolution(64, 48).unwrap();
        assert!(cam.set_resolution(0, 48).is_err());
        assert!(cam.set_planes(2.0, 1.0).is_err());
        cam.set_fov(400.0);
        assert_eq!(cam.config().field_of_view, 179.0);

        let out = cam.output().unwrap();
        assert_eq!((out.width(), out.height()), (64, 48));

        let restored = Camera3D::from_config(cam.config().clone()).unwrap();
        assert_eq!(restored.config(), cam.config());
        let out = restored.output().unwrap();
        assert_eq!((out.width(), out.height()), (64, 48));
    }

    #[test]
    fn draw_output_and_present() {
        let mut cam = camera(4, 4);
        cam.set_background(BackgroundType::Transparent);
        render(&mut cam, &[], &[]);

        let mut target = vec![0xFF_00FF00; 8 * 8];
        cam.draw_output(&mut target, 8, 8, 0, 0, 8, 8);
        assert!(target.iter().all(|&px| px == 0xFF_00FF00));

        let mut size = (0, 0);
        cam.present(|_, w, h| size = (w, h));
        assert_eq!(size, (4, 4));
    }
}
