mod markers;
mod topology;

pub use markers::{parse_markers, MarkerFeature};
pub use topology::{parse_topology, Topology};

use crate::error::LoadError;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

/// Where a document comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Source {
    Path(PathBuf),
    Url(String),
}

impl Source {
    /// `http://` and `https://` locations are URLs, anything else is a path
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            Source::Url(location.to_string())
        } else {
            Source::Path(PathBuf::from(location))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Path(path) => write!(f, "{}", path.display()),
            Source::Url(url) => f.write_str(url),
        }
    }
}

/// Both input documents, parsed
pub struct Documents {
    pub land: Topology,
    pub markers: Vec<Arc<MarkerFeature>>,
}

/// Read the raw bytes of a document
pub fn fetch(source: &Source) -> Result<Vec<u8>, LoadError> {
    match source {
        Source::Path(path) => fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        }),
        Source::Url(url) => {
            let wrap = |source: reqwest::Error| LoadError::Http {
                url: url.clone(),
                source,
            };
            let response = reqwest::blocking::get(url)
                .and_then(|r| r.error_for_status())
                .map_err(wrap)?;
            let body = response.bytes().map_err(wrap)?;
            Ok(body.to_vec())
        }
    }
}

/// Fetch and parse the land topology and the marker collection in parallel.
/// Rendering may only start once both have succeeded.
pub fn load(land: &Source, markers: &Source) -> Result<Documents, LoadError> {
    let (land, markers) = rayon::join(
        || fetch(land).and_then(parse_topology),
        || fetch(markers).and_then(parse_markers),
    );

    let documents = Documents {
        land: land?,
        markers: markers?,
    };
    log::info!(
        "loaded {} topology arcs and {} markers",
        documents.land.arc_count(),
        documents.markers.len()
    );
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LAND: &str = r#"{
        "type": "Topology",
        "objects": {"land": {"type": "Polygon", "arcs": [[0]]}},
        "arcs": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]
    }"#;

    const MARKERS: &str = r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": [-77.0, 38.9]},
            "properties": {"countryCode": "US", "Year": 2020, "name": "Report A", "abstract": "Summary text"}
        }]
    }"#;

    fn write_temp(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_source_parse() {
        assert_eq!(
            Source::parse("https://example.com/land.json"),
            Source::Url("https://example.com/land.json".to_string())
        );
        assert_eq!(
            Source::parse("data/land.json"),
            Source::Path(PathBuf::from("data/land.json"))
        );
    }

    #[test]
    fn test_load_both() {
        let land = write_temp(LAND);
        let markers = write_temp(MARKERS);
        let docs = load(
            &Source::Path(land.path().to_path_buf()),
            &Source::Path(markers.path().to_path_buf()),
        )
        .unwrap();
        assert_eq!(docs.markers.len(), 1);
        assert_eq!(docs.markers[0].country_code(), "US");
        assert!(docs.land.feature("land").is_ok());
    }

    #[test]
    fn test_load_fails_when_one_side_missing() {
        let markers = write_temp(MARKERS);
        let result = load(
            &Source::Path(PathBuf::from("/nonexistent/land-110m.json")),
            &Source::Path(markers.path().to_path_buf()),
        );
        assert!(matches!(result, Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_load_fails_on_unparsable_markers() {
        let land = write_temp(LAND);
        let markers = write_temp("{ not json");
        let result = load(
            &Source::Path(land.path().to_path_buf()),
            &Source::Path(markers.path().to_path_buf()),
        );
        assert!(matches!(result, Err(LoadError::GeoJson(_))));
    }
}
