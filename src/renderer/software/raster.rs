//! Edge-function triangle fill.
//!
//! For an edge `a → b` with `dx = b.x - a.x`, `dy = b.y - a.y`:
//!
//! ```text
//! E(p) = (p.y - a.y) * dx - (p.x - a.x) * dy
//! ```
//!
//! Moving one pixel right changes `E` by `-dy`, so each row evaluates the three
//! functions once at its first sample and then only adds. Samples sit at pixel
//! centres; a pixel is covered when all three values are `>= 0`.

use glam::{Vec2, vec2};

use crate::renderer::{PixelBuffer, Rgba};

/// Triangles with a smaller absolute signed area (pixels²) are skipped.
pub const MIN_AREA: f32 = 0.5;

#[derive(Clone, Copy, Debug)]
struct Edge {
    a: Vec2,
    dx: f32,
    dy: f32,
}

impl Edge {
    #[inline]
    fn new(a: Vec2, b: Vec2) -> Self {
        Self {
            a,
            dx: b.x - a.x,
            dy: b.y - a.y,
        }
    }

    #[inline]
    fn eval(&self, p: Vec2) -> f32 {
        (p.y - self.a.y) * self.dx - (p.x - self.a.x) * self.dy
    }

    #[inline]
    fn step_x(&self) -> f32 {
        -self.dy
    }
}

/// Edge function of `p` against `a → b`.
#[inline]
pub fn edge_function(a: Vec2, b: Vec2, p: Vec2) -> f32 {
    Edge::new(a, b).eval(p)
}

/// Signed area of the triangle in raster space (y down).
#[inline]
pub fn signed_area(pts: [Vec2; 3]) -> f32 {
    0.5 * edge_function(pts[0], pts[1], pts[2])
}

/// True when `p` lies inside (or on) the triangle, either winding.
pub fn point_in_triangle(pts: [Vec2; 3], p: Vec2) -> bool {
    let e0 = edge_function(pts[0], pts[1], p);
    let e1 = edge_function(pts[1], pts[2], p);
    let e2 = edge_function(pts[2], pts[0], p);
    (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0)
}

/// Integer bounding box `(x0, y0, x1, y1)` (inclusive) clipped to the buffer,
/// `None` when nothing is left.
pub fn clipped_bounds(pts: [Vec2; 3], width: usize, height: usize) -> Option<(i32, i32, i32, i32)> {
    let min = pts[0].min(pts[1]).min(pts[2]);
    let max = pts[0].max(pts[1]).max(pts[2]);
    if !min.is_finite() || !max.is_finite() {
        return None;
    }

    let x0 = (min.x.floor() as i32).max(0);
    let y0 = (min.y.floor() as i32).max(0);
    let x1 = (max.x.ceil() as i32).min(width as i32 - 1);
    let y1 = (max.y.ceil() as i32).min(height as i32 - 1);

    (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
}

/// Opaque fill, no blending and no depth test. Returns pixels written.
pub fn fill_triangle(buf: &mut PixelBuffer, pts: [Vec2; 3], colour: Rgba) -> usize {
    let area = signed_area(pts);
    if area.abs() < MIN_AREA {
        return 0;
    }
    let Some((x0, y0, x1, y1)) = clipped_bounds(pts, buf.width(), buf.height()) else {
        return 0;
    };

    // re-wind so "inside" is always all-positive
    let [a, b, c] = if area > 0.0 {
        pts
    } else {
        [pts[0], pts[2], pts[1]]
    };
    let edges = [Edge::new(a, b), Edge::new(b, c), Edge::new(c, a)];
    let steps = edges.map(|e| e.step_x());

    let mut written = 0;
    for y in y0..=y1 {
        let start = vec2(x0 as f32 + 0.5, y as f32 + 0.5);
        let mut w = edges.map(|e| e.eval(start));

        let row = buf.row_mut(y as usize);
        for px in &mut row[x0 as usize..=x1 as usize] {
            if w[0] >= 0.0 && w[1] >= 0.0 && w[2] >= 0.0 {
                *px = colour;
                written += 1;
            }
            w[0] += steps[0];
            w[1] += steps[1];
            w[2] += steps[2];
        }
    }
    written
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    const INK: Rgba = 0xFF_FF00FF;

    /// Direct per-pixel evaluation, no stepping.
    fn reference_coverage(pts: [Vec2; 3], w: usize, h: usize) -> Vec<bool> {
        let [a, b, c] = if signed_area(pts) > 0.0 {
            pts
        } else {
            [pts[0], pts[2], pts[1]]
        };
        let mut out = vec![false; w * h];
        for y in 0..h {
            for x in 0..w {
                let p = vec2(x as f32 + 0.5, y as f32 + 0.5);
                out[y * w + x] = edge_function(a, b, p) >= 0.0
                    && edge_function(b, c, p) >= 0.0
                    && edge_function(c, a, p) >= 0.0;
            }
        }
        out
    }

    #[test]
    fn right_triangle_matches_reference() {
        let pts = [vec2(1.0, 1.0), vec2(9.0, 1.0), vec2(1.0, 9.0)];
        for tri in [pts, [pts[0], pts[2], pts[1]]] {
            let mut buf = PixelBuffer::new(12, 12).unwrap();
            let n = fill_triangle(&mut buf, tri, INK);
            let expected = reference_coverage(tri, 12, 12);
            let got: Vec<bool> = buf.pixels().iter().map(|&p| p == INK).collect();
            assert_eq!(got, expected);
            assert_eq!(n, expected.iter().filter(|&&b| b).count());
            assert!(n > 0);
        }
    }

    #[test]
    fn tiny_triangle_fills_nothing() {
        let mut buf = PixelBuffer::new(8, 8).unwrap();
        // area = 0.5 * 0.9 * 0.9 = 0.405
        let pts = [vec2(2.0, 2.0), vec2(2.9, 2.0), vec2(2.0, 2.9)];
        assert!(signed_area(pts).abs() < MIN_AREA);
        assert_eq!(fill_triangle(&mut buf, pts, INK), 0);
        assert!(buf.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn off_screen_triangle_is_rejected() {
        let mut buf = PixelBuffer::new(8, 8).unwrap();
        let pts = [vec2(-20.0, -20.0), vec2(-10.0, -20.0), vec2(-20.0, -10.0)];
        assert_eq!(fill_triangle(&mut buf, pts, INK), 0);
    }

    #[test]
    fn partially_visible_triangle_is_clipped_to_buffer() {
        let mut buf = PixelBuffer::new(8, 8).unwrap();
        let pts = [vec2(-4.0, -4.0), vec2(20.0, -4.0), vec2(-4.0, 20.0)];
        let n = fill_triangle(&mut buf, pts, INK);
        assert!(n > 0 && n <= 64);
        assert_eq!(buf.get(0, 0), Some(INK));
    }

    #[test]
    fn point_in_triangle_either_winding() {
        let tri = [vec2(0.0, 0.0), vec2(4.0, 0.0), vec2(0.0, 4.0)];
        assert!(point_in_triangle(tri, vec2(1.0, 1.0)));
        assert!(point_in_triangle([tri[0], tri[2], tri[1]], vec2(1.0, 1.0)));
        assert!(!point_in_triangle(tri, vec2(3.0, 3.0)));
    }
}
