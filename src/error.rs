use thiserror::Error;

/// Failure to fetch or decode one of the input documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Reading a local file failed
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Fetching a remote document failed
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The land document is not a valid topology
    #[error("invalid topology: {0}")]
    Topology(#[from] simd_json::Error),
    /// The marker document is not valid JSON
    #[error("invalid GeoJSON: {0}")]
    GeoJson(#[from] serde_json::Error),
    /// The topology has no object with this name
    #[error("topology has no object named {0:?}")]
    MissingObject(String),
    /// The marker document parsed but is not a feature collection
    #[error("expected a FeatureCollection, found {0}")]
    NotFeatureCollection(&'static str),
}
