mod camera3d;
mod clip;
mod lighting;
mod projection;
mod sort;
mod specular;
mod triangulate;
mod types;

pub use camera3d::{Camera3D, RenderContext};
pub use clip::{CLIP_EPSILON, ClipPolygon, ClipVertex, clip_near};
pub use lighting::{
    CONTRIBUTION_THRESHOLD, DirectionalLight, DynamicLighting, LightSelection, select_lights,
    shade_triangle,
};
pub use projection::{DEPTH_EPSILON, Projector, ScreenPoint};
pub use sort::sort_back_to_front;
pub use specular::{SPECULAR_THRESHOLD, highlight_for, reflect};
pub use triangulate::{
    BACKFACE_THRESHOLD, DEFAULT_NORMAL, FaceScratch, FaceView, face_normal, fan, is_backface,
    triangulate_face,
};
pub use types::{FrameStats, Triangle, TriangleArena};
