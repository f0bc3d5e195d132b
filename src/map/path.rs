//! Projected path generation.
//!
//! Edges between consecutive positions are treated as great-circle arcs and
//! subdivided until the projected curve stays within `precision` pixels of
//! the emitted polyline.

use crate::map::projection::Projection;
use geojson::{Geometry, Value};
use glam::{DVec2, DVec3};
use std::fmt::Write;

/// Maximum subdivision depth for one edge
const MAX_DEPTH: u32 = 16;
/// Edges longer than 30 degrees are always split
const COS_MIN_DISTANCE: f64 = 0.866_025_403_784_438_6;

/// A projected line or ring in pixel space
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Polyline {
    pub points: Vec<DVec2>,
    pub closed: bool,
}

/// Projected geometry ready for drawing
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PathData {
    pub polylines: Vec<Polyline>,
}

impl PathData {
    pub fn is_empty(&self) -> bool {
        self.polylines.iter().all(|p| p.points.is_empty())
    }

    /// Closed rings only (the fillable part)
    pub fn rings(&self) -> impl Iterator<Item = &Polyline> {
        self.polylines.iter().filter(|p| p.closed)
    }

    /// SVG path data: `M x,y L x,y ... Z`
    pub fn to_svg(&self) -> String {
        let mut d = String::new();
        for polyline in &self.polylines {
            for (i, p) in polyline.points.iter().enumerate() {
                let cmd = if i == 0 { 'M' } else { 'L' };
                let _ = write!(d, "{cmd}{},{}", fmt_coord(p.x), fmt_coord(p.y));
            }
            if polyline.closed && !polyline.points.is_empty() {
                d.push('Z');
            }
        }
        d
    }
}

/// Three decimals, trailing zeros trimmed
pub fn fmt_coord(value: f64) -> String {
    let s = format!("{:.3}", value);
    let s = s.trim_end_matches('0').trim_end_matches('.');
    match s {
        "-0" | "" => "0".to_string(),
        _ => s.to_string(),
    }
}

#[derive(Clone, Copy)]
struct Sample {
    /// Unit vector on the sphere
    cartesian: DVec3,
    screen: DVec2,
}

/// Path generator bound to one projection
pub struct GeoPath<'a> {
    projection: &'a Projection,
    delta2: f64,
}

impl<'a> GeoPath<'a> {
    pub fn new(projection: &'a Projection) -> Self {
        let precision = projection.precision();
        Self {
            projection,
            delta2: precision * precision,
        }
    }

    /// Project a GeoJSON geometry. Polygon rings close; lines stay open; points are dropped.
    pub fn geometry(&self, geometry: &Geometry) -> PathData {
        let mut path = PathData::default();
        self.push_value(&geometry.value, &mut path);
        path
    }

    /// Project a set of open lines given as (lon, lat) positions
    pub fn lines(&self, lines: &[Vec<DVec2>]) -> PathData {
        PathData {
            polylines: lines
                .iter()
                .map(|line| self.polyline(line.iter().copied(), false))
                .collect(),
        }
    }

    fn push_value(&self, value: &Value, path: &mut PathData) {
        let positions = |coords: &Vec<Vec<f64>>| {
            coords
                .iter()
                .filter(|c| c.len() >= 2)
                .map(|c| DVec2::new(c[0], c[1]))
                .collect::<Vec<_>>()
        };

        match value {
            Value::LineString(coords) => {
                path.polylines
                    .push(self.polyline(positions(coords).into_iter(), false));
            }
            Value::MultiLineString(lines) => {
                for coords in lines {
                    path.polylines
                        .push(self.polyline(positions(coords).into_iter(), false));
                }
            }
            Value::Polygon(rings) => {
                for coords in rings {
                    path.polylines
                        .push(self.polyline(positions(coords).into_iter(), true));
                }
            }
            Value::MultiPolygon(polygons) => {
                for rings in polygons {
                    for coords in rings {
                        path.polylines
                            .push(self.polyline(positions(coords).into_iter(), true));
                    }
                }
            }
            Value::GeometryCollection(geometries) => {
                for g in geometries {
                    self.push_value(&g.value, path);
                }
            }
            Value::Point(_) | Value::MultiPoint(_) => {}
        }
    }

    fn sample(&self, lonlat: DVec2) -> Sample {
        let (lambda, phi) = (lonlat.x.to_radians(), lonlat.y.to_radians());
        let cos_phi = phi.cos();
        Sample {
            cartesian: DVec3::new(cos_phi * lambda.cos(), cos_phi * lambda.sin(), phi.sin()),
            screen: self.projection.project(lonlat),
        }
    }

    fn polyline(&self, positions: impl Iterator<Item = DVec2>, closed: bool) -> Polyline {
        let mut points = Vec::new();
        let mut prev: Option<Sample> = None;

        for lonlat in positions {
            let sample = self.sample(lonlat);
            if !sample.screen.is_finite() {
                prev = None;
                continue;
            }
            if let Some(a) = prev {
                self.resample(a, sample, MAX_DEPTH, &mut points);
            }
            points.push(sample.screen);
            prev = Some(sample);
        }

        // The closing edge is implied by `Z`
        if closed && points.len() > 1 && points.first() == points.last() {
            points.pop();
        }

        Polyline { points, closed }
    }

    /// Emit the intermediate points of edge a-b (neither endpoint)
    fn resample(&self, a: Sample, b: Sample, depth: u32, out: &mut Vec<DVec2>) {
        let d = b.screen - a.screen;
        let d2 = d.length_squared();
        if depth == 0 || d2 <= 4.0 * self.delta2 {
            return;
        }

        let sum = a.cartesian + b.cartesian;
        let length = sum.length();
        // Antipodal endpoints have no unique midpoint
        if length < 1e-12 {
            return;
        }
        let mid = sum / length;
        let lonlat = DVec2::new(
            mid.y.atan2(mid.x).to_degrees(),
            mid.z.clamp(-1.0, 1.0).asin().to_degrees(),
        );
        let m = Sample {
            cartesian: mid,
            screen: self.projection.project(lonlat),
        };
        if !m.screen.is_finite() {
            return;
        }

        let dm = m.screen - a.screen;
        // Squared distance of the midpoint from the chord, and where along it it falls
        let cross = d.perp_dot(dm);
        let off_chord = cross * cross / d2;
        let along = d.dot(dm) / d2;
        let long_edge = a.cartesian.dot(b.cartesian) < COS_MIN_DISTANCE;

        if off_chord > self.delta2 || (along - 0.5).abs() > 0.3 || long_edge {
            self.resample(a, m, depth - 1, out);
            out.push(m.screen);
            self.resample(m, b, depth - 1, out);
        }
    }
}
