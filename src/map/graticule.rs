use glam::DVec2;

const EPSILON: f64 = 1e-6;

/// Grid of meridians and parallels.
///
/// Minor lines cover the minor extent at the minor step; major lines cover the
/// major extent at the major step. Minor lines that coincide with a major line
/// are left out.
#[derive(Clone, Debug)]
pub struct Graticule {
    major_extent: [DVec2; 2],
    minor_extent: [DVec2; 2],
    major_step: DVec2,
    minor_step: DVec2,
    /// Sampling interval along each line, in degrees
    precision: f64,
}

impl Graticule {
    /// Ten-degree graticule: minor lines within ±80°, meridians every 90° reach the poles
    pub fn ten() -> Self {
        Self {
            major_extent: [
                DVec2::new(-180.0, -90.0 + EPSILON),
                DVec2::new(180.0, 90.0 - EPSILON),
            ],
            minor_extent: [
                DVec2::new(-180.0, -80.0 - EPSILON),
                DVec2::new(180.0, 80.0 + EPSILON),
            ],
            major_step: DVec2::new(90.0, 360.0),
            minor_step: DVec2::new(10.0, 10.0),
            precision: 2.5,
        }
    }

    /// All lines as (lon, lat) polylines
    pub fn lines(&self) -> Vec<Vec<DVec2>> {
        let [major_min, major_max] = self.major_extent;
        let [minor_min, minor_max] = self.minor_extent;
        let mut lines = Vec::new();

        for x in steps(major_min.x, major_max.x, self.major_step.x) {
            lines.push(self.meridian(x, major_min.y, major_max.y));
        }
        for y in steps(major_min.y, major_max.y, self.major_step.y) {
            lines.push(self.parallel(y, major_min.x, major_max.x));
        }
        for x in steps(minor_min.x, minor_max.x, self.minor_step.x)
            .filter(|x| (x % self.major_step.x).abs() > EPSILON)
        {
            lines.push(self.meridian(x, minor_min.y, minor_max.y));
        }
        for y in steps(minor_min.y, minor_max.y, self.minor_step.y)
            .filter(|y| (y % self.major_step.y).abs() > EPSILON)
        {
            lines.push(self.parallel(y, minor_min.x, minor_max.x));
        }

        lines
    }

    fn meridian(&self, x: f64, y0: f64, y1: f64) -> Vec<DVec2> {
        samples(y0, y1, self.precision)
            .map(|y| DVec2::new(x, y))
            .collect()
    }

    fn parallel(&self, y: f64, x0: f64, x1: f64) -> Vec<DVec2> {
        samples(x0, x1, self.precision)
            .map(|x| DVec2::new(x, y))
            .collect()
    }
}

/// Multiples of `step` in `[ceil(start / step) * step, end)`
fn steps(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let first = (start / step).ceil() * step;
    let count = ((end - first) / step).ceil().max(0.0) as usize;
    (0..count).map(move |i| first + i as f64 * step)
}

/// `start`, `start + step`, ... strictly below `end`, then `end` itself
fn samples(start: f64, end: f64, step: f64) -> impl Iterator<Item = f64> {
    let count = ((end - EPSILON - start) / step).ceil().max(0.0) as usize;
    (0..count)
        .map(move |i| start + i as f64 * step)
        .chain(std::iter::once(end))
}
