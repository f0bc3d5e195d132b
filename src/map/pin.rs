//! The pin marker shape: a teardrop whose tip sits on the group origin.

use glam::DVec2;

/// SVG path data of the pin at natural size
pub const PIN_PATH: &str = "M0,0l-8.8-17.7C-12.1-24.3-7.4-32,0-32h0c7.4,0,12.1,7.7,8.8,14.3L0,0z";

/// Segments per cubic curve when flattening
const CURVE_STEPS: usize = 8;

enum Segment {
    Line(DVec2),
    Cubic(DVec2, DVec2, DVec2),
}

/// Same outline as `PIN_PATH` with relative commands made absolute
const SEGMENTS: [Segment; 4] = [
    Segment::Line(DVec2::new(-8.8, -17.7)),
    Segment::Cubic(
        DVec2::new(-12.1, -24.3),
        DVec2::new(-7.4, -32.0),
        DVec2::new(0.0, -32.0),
    ),
    Segment::Cubic(
        DVec2::new(7.4, -32.0),
        DVec2::new(12.1, -24.3),
        DVec2::new(8.8, -17.7),
    ),
    Segment::Line(DVec2::ZERO),
];

/// Flattened pin outline at natural size, starting and ending at the tip
pub fn pin_outline() -> Vec<DVec2> {
    let mut points = vec![DVec2::ZERO];
    let mut current = DVec2::ZERO;
    for segment in &SEGMENTS {
        match *segment {
            Segment::Line(to) => {
                points.push(to);
                current = to;
            }
            Segment::Cubic(c1, c2, to) => {
                for i in 1..=CURVE_STEPS {
                    let t = i as f64 / CURVE_STEPS as f64;
                    points.push(cubic(current, c1, c2, to, t));
                }
                current = to;
            }
        }
    }
    points
}

#[inline]
fn cubic(p0: DVec2, p1: DVec2, p2: DVec2, p3: DVec2, t: f64) -> DVec2 {
    let u = 1.0 - t;
    p0 * (u * u * u) + p1 * (3.0 * u * u * t) + p2 * (3.0 * u * t * t) + p3 * (t * t * t)
}

/// Bounding box (min, max) of the outline at `scale`
pub fn pin_bounds(scale: f64) -> (DVec2, DVec2) {
    let outline = pin_outline();
    let min = outline.iter().fold(DVec2::INFINITY, |a, p| a.min(*p));
    let max = outline.iter().fold(DVec2::NEG_INFINITY, |a, p| a.max(*p));
    (min * scale, max * scale)
}
