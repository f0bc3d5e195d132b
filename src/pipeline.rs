use crate::config::MapConfig;
use crate::data::{self, Documents};
use crate::error::LoadError;
use crate::jitter::JitterSource;
use crate::map::basemap::{add_boundaries, add_graticule, render_base_map};
use crate::map::markers::add_markers;
use crate::map::{Projection, Scene};

/// Draw everything once both documents are available
pub fn ready(
    config: &MapConfig,
    documents: &Documents,
    jitter: &mut dyn JitterSource,
) -> Result<Scene, LoadError> {
    // Fail before anything is appended
    if !documents.land.has_object("land") {
        return Err(LoadError::MissingObject("land".to_string()));
    }

    let projection = Projection::new(&config.projection);
    let mut scene = Scene::new(config);

    add_graticule(&mut scene, &projection);
    render_base_map(&mut scene, &projection, &documents.land)?;
    if config.boundaries {
        add_boundaries(&mut scene, &projection, &documents.land);
    }
    let markers = add_markers(&mut scene, config, &projection, &documents.markers, jitter);

    log::info!(
        "scene ready: {} elements, {} markers",
        scene.elements().len(),
        markers.len()
    );
    Ok(scene)
}

/// Load both documents and build the scene. A failure is logged once here and
/// nothing is drawn.
pub fn run(config: &MapConfig, jitter: &mut dyn JitterSource) -> Result<Scene, LoadError> {
    data::load(&config.land_source, &config.marker_source)
        .and_then(|documents| ready(config, &documents, jitter))
        .inspect_err(|err| log::error!("Error loading data: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{parse_markers, parse_topology, Source};
    use crate::jitter::ScriptedJitter;
    use std::cell::RefCell;
    use std::io::Write;
    use std::path::PathBuf;

    const WORLD: &str = r#"{
        "type": "Topology",
        "transform": {"scale": [0.01, 0.01], "translate": [-130, 20]},
        "objects": {"land": {"type": "MultiPolygon", "arcs": [[[0]]]}},
        "arcs": [[[0, 0], [6000, 0], [0, 3000], [-6000, 0], [0, -3000]]]
    }"#;

    const MARKERS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-77.0, 38.9]},
             "properties": {"countryCode": "US", "Year": 2020, "name": "Report A", "abstract": "Summary text"}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-75.7, 45.4]},
             "properties": {"countryCode": "CA", "Year": "2018", "name": "Report B", "abstract": "Other"}}
        ]
    }"#;

    fn documents() -> Documents {
        Documents {
            land: parse_topology(WORLD.as_bytes().to_vec()).unwrap(),
            markers: parse_markers(MARKERS.as_bytes().to_vec()).unwrap(),
        }
    }

    #[test]
    fn test_ready_draws_graticule_land_then_markers() {
        let config = MapConfig::default();
        let scene = ready(&config, &documents(), &mut ScriptedJitter::none()).unwrap();

        assert_eq!((scene.width, scene.height, scene.class), (1400, 960, "bg"));
        assert_eq!(scene.paths("graticule").count(), 1);
        assert_eq!(scene.paths("land").count(), 1);
        assert_eq!(scene.groups().count(), 2);
        assert!(matches!(scene.elements()[0], crate::map::Element::Path(ref p) if p.class == "graticule"));
    }

    #[test]
    fn test_same_input_same_content() {
        let config = MapConfig::default();
        let docs = documents();
        let a = ready(&config, &docs, &mut crate::jitter::SplitMix::seeded(5)).unwrap();
        let b = ready(&config, &docs, &mut crate::jitter::SplitMix::seeded(6)).unwrap();
        let contents = |scene: &Scene| {
            scene
                .groups()
                .map(|(_, g)| g.datum.tooltip_html())
                .collect::<Vec<_>>()
        };
        assert_eq!(contents(&a), contents(&b));
    }

    #[test]
    fn test_topology_without_land_draws_nothing() {
        let config = MapConfig::default();
        let docs = Documents {
            land: parse_topology(br#"{"objects": {}}"#.to_vec()).unwrap(),
            markers: Vec::new(),
        };
        assert!(matches!(
            ready(&config, &docs, &mut ScriptedJitter::none()),
            Err(LoadError::MissingObject(_))
        ));
    }

    #[test]
    fn test_run_with_demo_data() {
        let demos = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos");
        let config = MapConfig {
            land_source: Source::Path(demos.join("land-coarse.json")),
            marker_source: Source::Path(demos.join("locations.geojson")),
            ..MapConfig::default()
        };
        let scene = run(&config, &mut crate::jitter::SplitMix::seeded(11)).unwrap();
        assert_eq!(scene.groups().count(), 7);
        assert_eq!(scene.paths("land").next().unwrap().data.rings().count(), 5);
    }

    thread_local! {
        static ERRORS: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
    }

    /// Collects error records emitted on the calling thread
    struct ErrorCapture;

    impl log::Log for ErrorCapture {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Error
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                ERRORS.with(|errors| errors.borrow_mut().push(record.args().to_string()));
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: ErrorCapture = ErrorCapture;

    fn errors_logged_by(f: impl FnOnce()) -> Vec<String> {
        // Only the first test to get here installs it; later calls are no-ops
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Error);
        ERRORS.with(|errors| errors.borrow_mut().clear());
        f();
        ERRORS.with(|errors| errors.borrow_mut().drain(..).collect())
    }

    #[test]
    fn test_run_fails_on_missing_file() {
        let config = MapConfig {
            land_source: Source::Path(PathBuf::from("/nonexistent/land.json")),
            marker_source: Source::Path(PathBuf::from("/nonexistent/markers.geojson")),
            ..MapConfig::default()
        };
        let errors = errors_logged_by(|| {
            assert!(run(&config, &mut ScriptedJitter::none()).is_err());
        });
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error loading data: "));
    }

    #[test]
    fn test_unparsable_markers_log_one_error() {
        let mut markers = tempfile::NamedTempFile::new().unwrap();
        markers.write_all(b"{ not json").unwrap();
        let demos = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos");
        let config = MapConfig {
            land_source: Source::Path(demos.join("land-coarse.json")),
            marker_source: Source::Path(markers.path().to_path_buf()),
            ..MapConfig::default()
        };
        let errors = errors_logged_by(|| {
            assert!(matches!(
                run(&config, &mut ScriptedJitter::none()),
                Err(LoadError::GeoJson(_))
            ));
        });
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error loading data: invalid GeoJSON"));
    }
}
