use crate::config::ProjectionConfig;
use glam::DVec2;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// Mercator is unbounded at the poles; latitudes are clamped to the square world extent
pub const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Spherical Mercator projection with d3-style center/scale/translate.
/// Immutable once built; every renderer borrows the same instance.
#[derive(Clone, Debug)]
pub struct Projection {
    /// Pixels per radian
    scale: f64,
    /// Pixel position of (0, 0) in raw Mercator units
    offset: DVec2,
    precision: f64,
}

/// Raw Mercator in radians, y pointing north
#[inline(always)]
fn mercator(lon: f64, lat: f64) -> DVec2 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE);
    let phi = lat.to_radians();
    DVec2::new(lon.to_radians(), (FRAC_PI_4 + phi / 2.0).tan().ln())
}

impl Projection {
    pub fn new(config: &ProjectionConfig) -> Self {
        let center = mercator(config.center.x, config.center.y);
        let offset = DVec2::new(
            config.translate.x - center.x * config.scale,
            config.translate.y + center.y * config.scale,
        );
        Self {
            scale: config.scale,
            offset,
            precision: config.precision,
        }
    }

    /// Project a geographic coordinate (lon, lat) to pixel coordinates
    #[inline]
    pub fn project(&self, lonlat: DVec2) -> DVec2 {
        let raw = mercator(lonlat.x, lonlat.y);
        DVec2::new(
            self.offset.x + raw.x * self.scale,
            self.offset.y - raw.y * self.scale,
        )
    }

    /// Unproject pixel coordinates back to geographic coordinates (lon, lat)
    pub fn invert(&self, point: DVec2) -> DVec2 {
        let x = (point.x - self.offset.x) / self.scale;
        let y = (self.offset.y - point.y) / self.scale;
        let lat = 2.0 * y.exp().atan() - FRAC_PI_2;
        DVec2::new(x.to_degrees(), lat.to_degrees())
    }

    /// Resampling threshold in pixels
    pub fn precision(&self) -> f64 {
        self.precision
    }
}
