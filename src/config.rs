use std::time::Duration;

use glam::DVec2;

use crate::data::Source;

/// Default location of the land topology
pub const DEFAULT_LAND_SOURCE: &str = "data/land-110m.json";
/// Default location of the marker feature collection
pub const DEFAULT_MARKER_SOURCE: &str = "data/merged_locations_extended.geojson";

/// Mercator parameters, d3 style: `center` is the geographic point that lands on `translate`
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectionConfig {
    /// (longitude, latitude) in degrees
    pub center: DVec2,
    /// Pixels per radian
    pub scale: f64,
    /// Pixel position of `center`
    pub translate: DVec2,
    /// Resampling threshold in pixels
    pub precision: f64,
}

/// Pin entrance animation: scale `from` -> `to` after `delay` over `duration`
#[derive(Clone, Debug, PartialEq)]
pub struct PinAnimation {
    pub from: f64,
    pub to: f64,
    pub delay: Duration,
    pub duration: Duration,
}

/// Everything the renderers need, built once and passed by reference.
#[derive(Clone, Debug)]
pub struct MapConfig {
    /// Surface width in pixels
    pub width: u32,
    /// Surface height in pixels
    pub height: u32,
    pub projection: ProjectionConfig,
    /// Jitter per axis is drawn from `[0, jitter_range)`
    pub jitter_range: f64,
    /// Tooltip position relative to the pointer
    pub tooltip_offset: DVec2,
    pub pin: PinAnimation,
    pub land_source: Source,
    pub marker_source: Source,
    /// Draw `objects.countries` from the land topology
    pub boundaries: bool,
}

impl Default for MapConfig {
    fn default() -> Self {
        let width = 1400;
        let height = 960;
        Self {
            width,
            height,
            projection: ProjectionConfig {
                // North America
                center: DVec2::new(-100.0, 40.0),
                scale: 500.0,
                translate: DVec2::new(width as f64 / 2.0, height as f64 / 2.0),
                precision: 0.1,
            },
            jitter_range: 15.0,
            tooltip_offset: DVec2::new(5.0, -30.0),
            pin: PinAnimation {
                from: 0.0,
                to: 0.75,
                delay: Duration::from_millis(400),
                duration: Duration::from_millis(800),
            },
            land_source: Source::parse(DEFAULT_LAND_SOURCE),
            marker_source: Source::parse(DEFAULT_MARKER_SOURCE),
            boundaries: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_center_on_surface() {
        let config = MapConfig::default();
        assert_eq!(config.projection.translate, DVec2::new(700.0, 480.0));
        assert_eq!(config.pin.delay + config.pin.duration, Duration::from_millis(1200));
        assert!(matches!(config.land_source, Source::Path(_)));
    }
}
