//! Additive highlight blobs.
//!
//! A blob is a radial gradient: full `colour` at the centre, fading with a
//! smoothstep to nothing at `radius`. Only RGB is touched; alpha stays as the
//! triangle or background left it.

use glam::{Vec2, vec2};

use super::raster::point_in_triangle;
use crate::renderer::{Highlight, PixelBuffer, Rgba};

/// Weight ceiling for blob pixels that fall outside their own triangle when
/// bleeding is enabled.
pub const SPECULAR_BLEED_CAP: f32 = 0.35;

/// Hermite smoothstep of `x` between `e0` and `e1`.
#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = ((x - e0) / (e1 - e0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Weight of `blob` at pixel centre `p`, 0 when nothing should be written.
pub fn blob_weight(blob: &Highlight, p: Vec2) -> f32 {
    if blob.radius <= 0.0 {
        return 0.0;
    }
    let d = p.distance(blob.centre) / blob.radius;
    if d >= 1.0 {
        return 0.0;
    }
    let w = smoothstep(0.0, 1.0, 1.0 - d);
    if point_in_triangle(blob.clip, p) {
        w
    } else if blob.bleed {
        w.min(SPECULAR_BLEED_CAP)
    } else {
        0.0
    }
}

/// Pixel rectangle `(x0, y0, x1, y1)` (inclusive) covered by the blob.
fn blob_bounds(blob: &Highlight, width: usize, height: usize) -> Option<(usize, usize, usize, usize)> {
    let r = blob.radius;
    if !(r > 0.0) || !blob.centre.is_finite() {
        return None;
    }
    let x0 = (blob.centre.x - r).floor().max(0.0) as i64;
    let y0 = (blob.centre.y - r).floor().max(0.0) as i64;
    let x1 = ((blob.centre.x + r).ceil() as i64).min(width as i64 - 1);
    let y1 = ((blob.centre.y + r).ceil() as i64).min(height as i64 - 1);
    (x0 <= x1 && y0 <= y1).then_some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
}

/// Saturating RGB add, alpha preserved.
#[inline]
pub fn add_rgb(px: Rgba, add: [f32; 3]) -> Rgba {
    let ch = |shift: u32, a: f32| -> u32 {
        let base = ((px >> shift) & 0xFF) as f32;
        ((base + a).round().clamp(0.0, 255.0) as u32) << shift
    };
    (px & 0xFF00_0000) | ch(16, add[0]) | ch(8, add[1]) | ch(0, add[2])
}

/// Composite one blob straight into the buffer. Returns pixels touched.
pub fn composite(buf: &mut PixelBuffer, blob: &Highlight) -> usize {
    let Some((x0, y0, x1, y1)) = blob_bounds(blob, buf.width(), buf.height()) else {
        return 0;
    };
    let mut touched = 0;
    for y in y0..=y1 {
        let row = buf.row_mut(y);
        for x in x0..=x1 {
            let w = blob_weight(blob, vec2(x as f32 + 0.5, y as f32 + 0.5));
            if w <= 0.0 {
                continue;
            }
            row[x] = add_rgb(row[x], blob.colour.map(|c| c * w));
            touched += 1;
        }
    }
    touched
}

/// Per-mesh aggregation buffer: blobs are merged with a per-channel max, then
/// flushed additively in one go.
#[derive(Default)]
pub struct GlowAccumulator {
    glow: Vec<[f32; 3]>,
    width: usize,
    dirty: Option<(usize, usize, usize, usize)>,
}

impl GlowAccumulator {
    /// Match the surface size; keeps the allocation when it already fits.
    pub fn reset(&mut self, width: usize, height: usize) {
        if self.width != width || self.glow.len() != width * height {
            self.glow.clear();
            self.glow.resize(width * height, [0.0; 3]);
            self.width = width;
        }
        self.dirty = None;
    }

    pub fn accumulate(&mut self, blob: &Highlight, height: usize) {
        let Some((x0, y0, x1, y1)) = blob_bounds(blob, self.width, height) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let w = blob_weight(blob, vec2(x as f32 + 0.5, y as f32 + 0.5));
                if w <= 0.0 {
                    continue;
                }
                let cell = &mut self.glow[y * self.width + x];
                for (acc, c) in cell.iter_mut().zip(blob.colour) {
                    *acc = acc.max(c * w);
                }
            }
        }
        self.dirty = Some(match self.dirty {
            None => (x0, y0, x1, y1),
            Some((a, b, c, d)) => (a.min(x0), b.min(y0), c.max(x1), d.max(y1)),
        });
    }

    /// Add the merged glow to `buf` and clear it. Returns pixels touched.
    pub fn flush(&mut self, buf: &mut PixelBuffer) -> usize {
        let Some((x0, y0, x1, y1)) = self.dirty.take() else {
            return 0;
        };
        let mut touched = 0;
        for y in y0..=y1 {
            let row = buf.row_mut(y);
            for x in x0..=x1 {
                let cell = &mut self.glow[y * self.width + x];
                if cell.iter().any(|&c| c > 0.0) {
                    row[x] = add_rgb(row[x], *cell);
                    touched += 1;
                }
                *cell = [0.0; 3];
            }
        }
        touched
    }
}
