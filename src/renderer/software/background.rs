use crate::renderer::{Background, PixelBuffer};
use crate::world::Color;

/// Horizon position as a fraction of the screen height (0 = top row).
///
/// Pitch is normalised over half the vertical FoV: looking up by half the
/// FoV pushes the horizon to the bottom edge, looking down pulls it to the top.
pub fn horizon_ratio(pitch_deg: f32, fov_deg: f32) -> f32 {
    let half = fov_deg * 0.5;
    if half <= f32::EPSILON {
        return 0.5;
    }
    let normalized = (pitch_deg / half).clamp(-1.0, 1.0);
    (0.5 + 0.5 * normalized).clamp(0.0, 1.0)
}

/// Overwrite the whole buffer with `background`.
pub fn fill_background(buf: &mut PixelBuffer, background: &Background) {
    match *background {
        Background::Solid(c) => buf.fill(c.pack()),
        Background::Transparent => buf.fill(0),
        Background::SkyFloor {
            sky,
            sky_horizon,
            floor_horizon,
            floor,
            horizon,
        } => {
            let h = buf.height();
            let horizon_row = (horizon.clamp(0.0, 1.0) * h as f32).round() as usize;
            for y in 0..h {
                let px = sky_floor_row(y, h, horizon_row, sky, sky_horizon, floor_horizon, floor);
                buf.row_mut(y).fill(px.pack());
            }
        }
    }
}

/// Colour of row `y`: sky → sky-horizon above the horizon row,
/// floor-horizon → floor from it downwards.
fn sky_floor_row(
    y: usize,
    h: usize,
    horizon_row: usize,
    sky: Color,
    sky_horizon: Color,
    floor_horizon: Color,
    floor: Color,
) -> Color {
    if y < horizon_row {
        let t = y as f32 / horizon_row as f32;
        sky.lerp(sky_horizon, t)
    } else {
        let span = (h - horizon_row).max(1) as f32;
        let t = (y - horizon_row) as f32 / span;
        floor_horizon.lerp(floor, t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SKY: Color = Color::rgb(0, 0, 200);
    const SKY_H: Color = Color::rgb(100, 100, 255);
    const FLOOR_H: Color = Color::rgb(90, 60, 30);
    const FLOOR: Color = Color::rgb(40, 20, 0);

    fn sky_floor(horizon: f32) -> Background {
        Background::SkyFloor {
            sky: SKY,
            sky_horizon: SKY_H,
            floor_horizon: FLOOR_H,
            floor: FLOOR,
            horizon,
        }
    }

    #[test]
    fn horizon_follows_pitch() {
        assert_eq!(horizon_ratio(0.0, 90.0), 0.5);
        assert_eq!(horizon_ratio(45.0, 90.0), 1.0);
        assert_eq!(horizon_ratio(-45.0, 90.0), 0.0);
        assert_eq!(horizon_ratio(80.0, 90.0), 1.0); // clamped
        assert!((horizon_ratio(22.5, 90.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn sky_floor_splits_at_horizon() {
        let mut buf = PixelBuffer::new(4, 100).unwrap();
        fill_background(&mut buf, &sky_floor(0.5));
        assert_eq!(buf.get(0, 0), Some(SKY.pack()));
        assert_eq!(buf.get(3, 50), Some(FLOOR_H.pack()));
        // every row is uniform
        for y in 0..100 {
            let first = buf.get(0, y);
            assert!((0..4).all(|x| buf.get(x, y) == first));
        }
        // sky approaches its horizon colour just above the split
        let above = Color::unpack(buf.get(0, 49).unwrap());
        assert!(above.r > 90 && above.b > 245);
    }

    #[test]
    fn horizon_at_top_is_all_floor() {
        let mut buf = PixelBuffer::new(2, 10).unwrap();
        fill_background(&mut buf, &sky_floor(0.0));
        assert_eq!(buf.get(0, 0), Some(FLOOR_H.pack()));
    }

    #[test]
    fn transparent_clears_alpha_too() {
        let mut buf = PixelBuffer::new(3, 3).unwrap();
        buf.fill(0xFF_FFFFFF);
        fill_background(&mut buf, &Background::Transparent);
        assert!(buf.pixels().iter().all(|&p| p == 0));

        fill_background(&mut buf, &Background::Solid(Color::rgb(1, 2, 3)));
        assert!(buf.pixels().iter().all(|&p| p == 0xFF_010203));
    }
}
