use crate::error::LoadError;
use geojson::{JsonObject, JsonValue};
use glam::DVec2;
use serde::Deserialize;
use std::sync::Arc;

/// One location to pin on the map
#[derive(Clone, Debug, PartialEq)]
pub struct MarkerFeature {
    /// (longitude, latitude); NaN when the feature has no point geometry
    pub coordinates: DVec2,
    pub properties: JsonObject,
}

impl MarkerFeature {
    pub fn new(coordinates: DVec2, properties: JsonObject) -> Self {
        Self {
            coordinates,
            properties,
        }
    }

    /// Property rendered the way a browser would print it; absent keys read "undefined"
    pub fn field(&self, key: &str) -> String {
        match self.properties.get(key) {
            Some(value) => display_value(value),
            None => "undefined".to_string(),
        }
    }

    /// Location code shown on the pin label
    pub fn country_code(&self) -> String {
        self.field("countryCode")
    }

    /// Tooltip body: four labelled lines separated by `<br>`
    pub fn tooltip_html(&self) -> String {
        format!(
            "Loc: {}<br>Year: {}<br>Title: {}<br>Abs: {}",
            self.field("countryCode"),
            self.field("Year"),
            self.field("name"),
            self.field("abstract"),
        )
    }
}

fn display_value(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => "null".to_string(),
        JsonValue::Bool(b) => b.to_string(),
        JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            // Whole floats print without a fraction: 2020.0 -> "2020"
            (None, Some(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        JsonValue::String(s) => s.clone(),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| match item {
                JsonValue::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        JsonValue::Object(_) => "[object Object]".to_string(),
    }
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    features: Vec<RawFeature>,
}

/// Features are read loosely: a bad geometry only costs that marker its position
#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<JsonValue>,
    #[serde(default)]
    properties: Option<JsonValue>,
}

impl RawFeature {
    fn coordinates(&self) -> Option<DVec2> {
        let coords = self.geometry.as_ref()?.get("coordinates")?.as_array()?;
        match coords.as_slice() {
            [lon, lat, ..] => Some(DVec2::new(lon.as_f64()?, lat.as_f64()?)),
            _ => None,
        }
    }
}

/// Parse a GeoJSON FeatureCollection of point features, keeping file order
pub fn parse_markers(bytes: Vec<u8>) -> Result<Vec<Arc<MarkerFeature>>, LoadError> {
    let collection: RawCollection = serde_json::from_slice(&bytes)?;

    match collection.kind.as_str() {
        "FeatureCollection" => {}
        "Feature" => return Err(LoadError::NotFeatureCollection("Feature")),
        "" => return Err(LoadError::NotFeatureCollection("an untyped object")),
        _ => return Err(LoadError::NotFeatureCollection("Geometry")),
    }

    let markers = collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let coordinates = feature.coordinates().unwrap_or_else(|| {
                log::warn!("marker feature {index} has no point coordinates");
                DVec2::NAN
            });
            let properties = match feature.properties {
                Some(JsonValue::Object(properties)) => properties,
                _ => JsonObject::new(),
            };
            Arc::new(MarkerFeature::new(coordinates, properties))
        })
        .collect();

    Ok(markers)
}
