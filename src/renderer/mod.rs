//! Rendering back-end.
//!
//! *The pipeline never touches a pixel buffer directly.* It resolves every
//! triangle to a screen-space outline plus one packed colour, every specular
//! highlight to a [`Highlight`] blob, and hands them to a type implementing
//! [`Renderer`], back to front.
//!
//! * `begin_frame` reports the surface size, or `None` when there is no
//!   usable surface; the caller then skips the whole frame.
//! * `end_frame` **loans** the finished buffer to a closure.

use std::collections::TryReserveError;

use glam::Vec2;

use crate::world::Color;

pub mod software;

pub use software::Software;

/// Pixel format of the software frame-buffer (`0xAARRGGBB`).
pub type Rgba = u32;

/// Surface errors. Raised when (re)allocating, never while rendering.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("surface {width}x{height} has no pixels")]
    EmptySurface { width: usize, height: usize },

    #[error("surface {width}x{height} is too large")]
    TooLarge { width: usize, height: usize },

    #[error("could not allocate {width}x{height} surface: {source}")]
    Allocation {
        width: usize,
        height: usize,
        source: TryReserveError,
    },
}

/// How the frame is cleared before any triangle lands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Background {
    Solid(Color),
    /// Zero fill, alpha included.
    Transparent,
    /// Vertical gradient split at `horizon` (fraction of the height, 0 = top).
    SkyFloor {
        sky: Color,
        sky_horizon: Color,
        floor_horizon: Color,
        floor: Color,
        horizon: f32,
    },
}

/// One additive specular blob.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Highlight {
    pub centre: Vec2,
    pub radius: f32,
    /// RGB added at the blob centre, `0.0 ..= 255.0` per channel.
    pub colour: [f32; 3],
    /// Screen-space outline of the triangle the blob belongs to.
    pub clip: [Vec2; 3],
    /// Allow the blob to spill outside `clip` (at reduced weight).
    pub bleed: bool,
    /// Index of the mesh that produced it, for per-mesh aggregation.
    pub mesh: usize,
}

/// Row-major `width × height` buffer of packed pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    pixels: Vec<Rgba>,
}

impl PixelBuffer {
    /// Allocate a cleared buffer; fails instead of aborting when memory is
    /// short.
    pub fn new(width: usize, height: usize) -> Result<Self, RenderError> {
        if width == 0 || height == 0 {
            return Err(RenderError::EmptySurface { width, height });
        }
        let len = width
            .checked_mul(height)
            .ok_or(RenderError::TooLarge { width, height })?;

        let mut pixels = Vec::new();
        pixels
            .try_reserve_exact(len)
            .map_err(|source| RenderError::Allocation {
                width,
                height,
                source,
            })?;
        pixels.resize(len, 0);

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.width && y < self.height).then(|| self.pixels[y * self.width + x])
    }

    #[inline]
    pub fn set(&mut self, x: usize, y: usize, px: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = px;
        }
    }

    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [Rgba] {
        let start = y * self.width;
        &mut self.pixels[start..start + self.width]
    }

    pub fn fill(&mut self, px: Rgba) {
        self.pixels.fill(px);
    }

    /// Nearest-neighbour blit into `dst` (`dst_w × dst_h`), scaled to
    /// `w × h` at `(x, y)`. Fully transparent source pixels are skipped so a
    /// transparent background lets the 2-D scene show through.
    pub fn blit_to(
        &self,
        dst: &mut [Rgba],
        dst_w: usize,
        dst_h: usize,
        x: i32,
        y: i32,
        w: usize,
        h: usize,
    ) {
        if w == 0 || h == 0 || dst.len() < dst_w * dst_h {
            return;
        }
        for row in 0..h {
            let dy = y + row as i32;
            if dy < 0 || dy >= dst_h as i32 {
                continue;
            }
            let sy = row * self.height / h;
            let src_row = &self.pixels[sy * self.width..(sy + 1) * self.width];
            let dst_row = &mut dst[dy as usize * dst_w..(dy as usize + 1) * dst_w];
            for col in 0..w {
                let dx = x + col as i32;
                if dx < 0 || dx >= dst_w as i32 {
                    continue;
                }
                let px = src_row[col * self.width / w];
                if px >> 24 != 0 {
                    dst_row[dx as usize] = px;
                }
            }
        }
    }
}

/// A back-end that owns the surface for the whole frame.
pub trait Renderer {
    /// (Re)allocate the surface. Called between frames only.
    fn resize(&mut self, width: usize, height: usize) -> Result<(), RenderError>;

    /// Last finished frame, if there is a surface at all.
    fn surface(&self) -> Option<&PixelBuffer>;

    /// Surface size for this frame, `None` when there is nothing to draw into.
    fn begin_frame(&mut self) -> Option<(usize, usize)>;

    /// Overwrite every pixel.
    fn draw_background(&mut self, background: &Background);

    /// Opaque fill of one screen-space triangle. Returns pixels written.
    fn draw_triangle(&mut self, points: [Vec2; 3], colour: Rgba) -> usize;

    /// Composite highlight blobs additively. With `merge`, overlapping blobs
    /// take the per-channel maximum before compositing (one mesh at a time).
    /// Returns pixels touched.
    fn draw_highlights(&mut self, blobs: &[Highlight], merge: bool) -> usize;

    /// Finish the frame and **loan** the buffer to `submit(pixels, w, h)`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}
