//! ---------------------------------------------------------------------------
//! CPU back-end
//!
//! * Fills a [`PixelBuffer`] in **0xAARRGGBB** format.
//! * Relies on the camera feeding triangles *back-to-front*, so no Z-buffer
//!   is kept (painter's algorithm).
//! * The surface is only (re)allocated by [`Software::resize`], never inside
//!   a frame. A failed allocation leaves no surface and every frame becomes a
//!   no-op until the next successful resize.
//! ---------------------------------------------------------------------------

use glam::Vec2;

use crate::renderer::{Background, Highlight, PixelBuffer, RenderError, Renderer, Rgba};

pub mod background;
pub mod raster;
pub mod specular;

use specular::GlowAccumulator;

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Default)]
pub struct Software {
    surface: Option<PixelBuffer>,
    glow: GlowAccumulator,
}

impl Software {
    /// Back-end with a `width × height` surface. On allocation failure the
    /// error is logged and the back-end starts without a surface.
    pub fn new(width: usize, height: usize) -> Self {
        let mut sw = Self::default();
        if let Err(e) = sw.resize(width, height) {
            log::error!("software surface unavailable: {e}");
        }
        sw
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    /// Reallocate when the resolution differs from the current surface.
    fn resize(&mut self, width: usize, height: usize) -> Result<(), RenderError> {
        if let Some(s) = &self.surface {
            if s.width() == width && s.height() == height {
                return Ok(());
            }
        }
        // drop the old surface first so a failure cannot leave a stale size
        self.surface = None;
        let surface = PixelBuffer::new(width, height)?;
        log::debug!("allocated {width}x{height} software surface");
        self.surface = Some(surface);
        Ok(())
    }

    #[inline]
    fn surface(&self) -> Option<&PixelBuffer> {
        self.surface.as_ref()
    }

    fn begin_frame(&mut self) -> Option<(usize, usize)> {
        let s = self.surface.as_ref()?;
        Some((s.width(), s.height()))
    }

    fn draw_background(&mut self, bg: &Background) {
        if let Some(s) = &mut self.surface {
            background::fill_background(s, bg);
        }
    }

    fn draw_triangle(&mut self, points: [Vec2; 3], colour: Rgba) -> usize {
        match &mut self.surface {
            Some(s) => raster::fill_triangle(s, points, colour),
            None => 0,
        }
    }

    fn draw_highlights(&mut self, blobs: &[Highlight], merge: bool) -> usize {
        let Some(s) = &mut self.surface else {
            return 0;
        };
        if !merge {
            return blobs.iter().map(|b| specular::composite(s, b)).sum();
        }

        self.glow.reset(s.width(), s.height());
        for b in blobs {
            self.glow.accumulate(b, s.height());
        }
        self.glow.flush(s)
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        if let Some(s) = &self.surface {
            submit(s.pixels(), s.width(), s.height());
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
