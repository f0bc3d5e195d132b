//! Rasterizing scene geometry onto a Braille canvas.

use crate::braille::BrailleCanvas;
use crate::map::path::PathData;
use glam::DVec2;

/// Uniform scale + offset placing the fixed-size surface inside a canvas
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceFit {
    pub scale: f64,
    pub offset: DVec2,
}

impl SurfaceFit {
    /// Fit a `surface` sized area into `canvas` pixels, centered, aspect preserved
    pub fn new(surface: DVec2, canvas: DVec2) -> Self {
        let scale = (canvas.x / surface.x).min(canvas.y / surface.y).max(0.0);
        let offset = (canvas - surface * scale) / 2.0;
        Self { scale, offset }
    }

    pub fn to_canvas(&self, p: DVec2) -> DVec2 {
        p * self.scale + self.offset
    }

    pub fn to_surface(&self, p: DVec2) -> DVec2 {
        if self.scale == 0.0 {
            return DVec2::NAN;
        }
        (p - self.offset) / self.scale
    }
}

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Whether a segment's bounding box touches the canvas
fn segment_might_be_visible(canvas: &BrailleCanvas, a: DVec2, b: DVec2) -> bool {
    let min = a.min(b);
    let max = a.max(b);
    max.x >= 0.0
        && min.x < canvas.pixel_width() as f64
        && max.y >= 0.0
        && min.y < canvas.pixel_height() as f64
}

/// Stroke every polyline of a path
pub fn stroke_path(canvas: &mut BrailleCanvas, path: &PathData, fit: &SurfaceFit) {
    for polyline in &path.polylines {
        let points: Vec<DVec2> = polyline.points.iter().map(|p| fit.to_canvas(*p)).collect();
        let closing = match (polyline.closed, points.first(), points.last()) {
            (true, Some(first), Some(last)) if points.len() > 2 => Some((*last, *first)),
            _ => None,
        };

        let segments = points.windows(2).map(|w| (w[0], w[1])).chain(closing);
        for (a, b) in segments {
            if segment_might_be_visible(canvas, a, b) {
                draw_line(
                    canvas,
                    a.x.round() as i32,
                    a.y.round() as i32,
                    b.x.round() as i32,
                    b.y.round() as i32,
                );
            }
        }
    }
}

/// Even-odd scanline fill of a set of closed rings given in canvas pixels
pub fn fill_rings<'a>(canvas: &mut BrailleCanvas, rings: impl Iterator<Item = &'a [DVec2]> + Clone) {
    let height = canvas.pixel_height() as i32;
    let mut crossings: Vec<f64> = Vec::new();

    for y in 0..height {
        let scan = y as f64 + 0.5;
        crossings.clear();

        for ring in rings.clone() {
            let n = ring.len();
            if n < 3 {
                continue;
            }
            for i in 0..n {
                let a = ring[i];
                let b = ring[(i + 1) % n];
                // Half-open rule so shared vertices count once
                if (a.y <= scan) != (b.y <= scan) {
                    let t = (scan - a.y) / (b.y - a.y);
                    crossings.push(a.x + t * (b.x - a.x));
                }
            }
        }

        crossings.sort_by(|a, b| a.total_cmp(b));
        for pair in crossings.chunks_exact(2) {
            let x0 = (pair[0] - 0.5).ceil() as i32;
            let x1 = (pair[1] - 0.5).floor() as i32;
            if x0 <= x1 {
                canvas.fill_span(y, x0, x1);
            }
        }
    }
}

/// Fill the closed rings of a path
pub fn fill_path(canvas: &mut BrailleCanvas, path: &PathData, fit: &SurfaceFit) {
    let rings: Vec<Vec<DVec2>> = path
        .rings()
        .map(|ring| ring.points.iter().map(|p| fit.to_canvas(*p)).collect())
        .collect();
    fill_rings(canvas, rings.iter().map(|r| r.as_slice()));
}

/// Fill a shape given in local units, scaled by `scale` and placed at surface point `origin`
pub fn fill_shape(
    canvas: &mut BrailleCanvas,
    outline: &[DVec2],
    origin: DVec2,
    scale: f64,
    fit: &SurfaceFit,
) {
    if scale <= 0.0 || !origin.is_finite() {
        return;
    }
    let ring: Vec<DVec2> = outline
        .iter()
        .map(|p| fit.to_canvas(origin + *p * scale))
        .collect();
    fill_rings(canvas, std::iter::once(ring.as_slice()));
    // Keep tiny shapes visible once they have any size at all
    let tip = fit.to_canvas(origin);
    canvas.set_pixel_signed(tip.x.round() as i32, tip.y.round() as i32);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::path::Polyline;

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        draw_line(&mut canvas, 0, 0, 9, 0);
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_vertical_line() {
        let mut canvas = BrailleCanvas::new(1, 2);
        draw_line(&mut canvas, 0, 0, 0, 7);
        assert_eq!(canvas.to_string(), "⡇\n⡇");
    }

    #[test]
    fn test_fit_keeps_aspect_and_centers() {
        let fit = SurfaceFit::new(DVec2::new(1400.0, 960.0), DVec2::new(140.0, 192.0));
        assert!((fit.scale - 0.1).abs() < 1e-12);
        assert!((fit.offset.y - 48.0).abs() < 1e-9);
        let p = DVec2::new(700.0, 480.0);
        assert!((fit.to_surface(fit.to_canvas(p)) - p).length() < 1e-9);
    }

    #[test]
    fn test_fill_square() {
        let mut canvas = BrailleCanvas::new(2, 1);
        let square = [
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 4.0),
            DVec2::new(0.0, 4.0),
        ];
        fill_rings(&mut canvas, std::iter::once(&square[..]));
        assert_eq!(canvas.to_string(), "⣿⣿");
    }

    #[test]
    fn test_fill_hole_is_even_odd() {
        let mut canvas = BrailleCanvas::new(3, 2);
        let outer = [
            DVec2::new(0.0, 0.0),
            DVec2::new(6.0, 0.0),
            DVec2::new(6.0, 8.0),
            DVec2::new(0.0, 8.0),
        ];
        let hole = [
            DVec2::new(2.0, 0.0),
            DVec2::new(4.0, 0.0),
            DVec2::new(4.0, 8.0),
            DVec2::new(2.0, 8.0),
        ];
        fill_rings(&mut canvas, [&outer[..], &hole[..]].into_iter());
        assert_eq!(canvas.to_string(), "⣿⠀⣿\n⣿⠀⣿");
    }

    #[test]
    fn test_stroke_closes_rings() {
        let mut canvas = BrailleCanvas::new(2, 1);
        let path = PathData {
            polylines: vec![Polyline {
                points: vec![DVec2::new(0.0, 0.0), DVec2::new(3.0, 0.0), DVec2::new(3.0, 3.0), DVec2::new(0.0, 3.0)],
                closed: true,
            }],
        };
        let fit = SurfaceFit { scale: 1.0, offset: DVec2::ZERO };
        stroke_path(&mut canvas, &path, &fit);
        // Left edge comes from the implied closing segment
        assert_eq!(canvas.to_string(), "⣏⣹");
    }

    #[test]
    fn test_zero_scale_shape_draws_nothing() {
        let mut canvas = BrailleCanvas::new(2, 2);
        let fit = SurfaceFit { scale: 1.0, offset: DVec2::ZERO };
        fill_shape(&mut canvas, &crate::map::pin::pin_outline(), DVec2::new(2.0, 6.0), 0.0, &fit);
        assert_eq!(canvas.to_string(), "⠀⠀\n⠀⠀");
    }
}
