//! TopoJSON decoding.
//!
//! Arcs are delta-decoded and dequantized once at load time; objects are turned
//! into GeoJSON features on demand by stitching their arcs back into lines and rings.

use crate::error::LoadError;
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Position, Value};
use glam::DVec2;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

impl Transform {
    #[inline(always)]
    fn apply(&self, x: f64, y: f64) -> DVec2 {
        DVec2::new(
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        )
    }
}

/// One named object (or collection member) of a topology
#[derive(Debug, Deserialize)]
pub struct TopoObject {
    #[serde(flatten)]
    geometry: TopoGeometry,
    #[serde(default)]
    properties: Option<JsonObject>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum TopoGeometry {
    Point { coordinates: Vec<f64> },
    MultiPoint { coordinates: Vec<Vec<f64>> },
    LineString { arcs: Vec<i64> },
    MultiLineString { arcs: Vec<Vec<i64>> },
    Polygon { arcs: Vec<Vec<i64>> },
    MultiPolygon { arcs: Vec<Vec<Vec<i64>>> },
    GeometryCollection { geometries: Vec<TopoObject> },
}

#[derive(Deserialize)]
struct RawTopology {
    #[serde(default)]
    transform: Option<Transform>,
    objects: HashMap<String, TopoObject>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
}

/// A decoded topology: absolute arc coordinates plus the named objects
#[derive(Debug)]
pub struct Topology {
    transform: Option<Transform>,
    objects: HashMap<String, TopoObject>,
    arcs: Vec<Vec<DVec2>>,
}

/// Parse a TopoJSON document. The buffer is used as scratch space by the parser.
pub fn parse_topology(mut bytes: Vec<u8>) -> Result<Topology, LoadError> {
    let raw: RawTopology = simd_json::serde::from_slice(&mut bytes)?;
    Ok(Topology::decode(raw))
}

impl Topology {
    fn decode(raw: RawTopology) -> Self {
        let arcs = raw
            .arcs
            .iter()
            .map(|arc| match raw.transform {
                Some(transform) => {
                    // Quantized arcs store deltas from the previous position
                    let (mut x, mut y) = (0.0, 0.0);
                    arc.iter()
                        .filter(|p| p.len() >= 2)
                        .map(|p| {
                            x += p[0];
                            y += p[1];
                            transform.apply(x, y)
                        })
                        .collect()
                }
                None => arc
                    .iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| DVec2::new(p[0], p[1]))
                    .collect(),
            })
            .collect();

        Self {
            transform: raw.transform,
            objects: raw.objects,
            arcs,
        }
    }

    /// Number of shared arcs
    pub fn arc_count(&self) -> usize {
        self.arcs.len()
    }

    /// Whether the topology has an object with this name
    pub fn has_object(&self, name: &str) -> bool {
        self.objects.contains_key(name)
    }

    /// Convert the named object to GeoJSON features. A geometry collection yields
    /// one feature per member, any other geometry yields a single feature.
    pub fn feature(&self, name: &str) -> Result<FeatureCollection, LoadError> {
        let object = self
            .objects
            .get(name)
            .ok_or_else(|| LoadError::MissingObject(name.to_string()))?;

        let features = match &object.geometry {
            TopoGeometry::GeometryCollection { geometries } => {
                geometries.iter().map(|g| self.to_feature(g)).collect()
            }
            _ => vec![self.to_feature(object)],
        };

        Ok(FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        })
    }

    fn to_feature(&self, object: &TopoObject) -> Feature {
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(self.to_value(&object.geometry))),
            id: None,
            properties: object.properties.clone(),
            foreign_members: None,
        }
    }

    fn to_value(&self, geometry: &TopoGeometry) -> Value {
        match geometry {
            TopoGeometry::Point { coordinates } => Value::Point(self.point(coordinates)),
            TopoGeometry::MultiPoint { coordinates } => {
                Value::MultiPoint(coordinates.iter().map(|c| self.point(c)).collect())
            }
            TopoGeometry::LineString { arcs } => Value::LineString(self.line(arcs)),
            TopoGeometry::MultiLineString { arcs } => {
                Value::MultiLineString(arcs.iter().map(|a| self.line(a)).collect())
            }
            TopoGeometry::Polygon { arcs } => Value::Polygon(self.polygon(arcs)),
            TopoGeometry::MultiPolygon { arcs } => {
                Value::MultiPolygon(arcs.iter().map(|p| self.polygon(p)).collect())
            }
            TopoGeometry::GeometryCollection { geometries } => Value::GeometryCollection(
                geometries
                    .iter()
                    .map(|g| Geometry::new(self.to_value(&g.geometry)))
                    .collect(),
            ),
        }
    }

    /// Points are quantized but not delta-encoded
    fn point(&self, coordinates: &[f64]) -> Position {
        let (x, y) = match coordinates {
            [x, y, ..] => (*x, *y),
            _ => (f64::NAN, f64::NAN),
        };
        let p = match self.transform {
            Some(t) => t.apply(x, y),
            None => DVec2::new(x, y),
        };
        vec![p.x, p.y]
    }

    /// Append arc `index` to `points`. Negative indices (`!i`) walk arc `i` backwards.
    /// The first position of every arc after the first repeats the previous end and is skipped.
    fn push_arc(&self, index: i64, points: &mut Vec<Position>) {
        let (arc_index, reversed) = if index < 0 {
            (!index as usize, true)
        } else {
            (index as usize, false)
        };
        let Some(arc) = self.arcs.get(arc_index) else {
            return;
        };

        let skip = usize::from(!points.is_empty());
        let positions = arc.iter().map(|p| vec![p.x, p.y]);
        if reversed {
            points.extend(positions.rev().skip(skip));
        } else {
            points.extend(positions.skip(skip));
        }
    }

    fn line(&self, arcs: &[i64]) -> Vec<Position> {
        let mut points = Vec::new();
        for &index in arcs {
            self.push_arc(index, &mut points);
        }
        // A degenerate line still needs two positions
        if points.len() == 1 {
            points.push(points[0].clone());
        }
        points
    }

    fn ring(&self, arcs: &[i64]) -> Vec<Position> {
        let mut points = self.line(arcs);
        // A ring needs at least four positions
        if let Some(first) = points.first().cloned() {
            while points.len() < 4 {
                points.push(first.clone());
            }
        }
        points
    }

    fn polygon(&self, rings: &[Vec<i64>]) -> Vec<Vec<Position>> {
        rings.iter().map(|r| self.ring(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topology(json: &str) -> Topology {
        parse_topology(json.as_bytes().to_vec()).unwrap()
    }

    #[test]
    fn test_quantized_arcs_are_delta_decoded() {
        let topo = topology(
            r#"{
                "type": "Topology",
                "transform": {"scale": [2, 0.5], "translate": [-100, 10]},
                "objects": {"land": {"type": "LineString", "arcs": [0]}},
                "arcs": [[[0, 0], [5, 4], [1, -2]]]
            }"#,
        );
        let fc = topo.feature("land").unwrap();
        let value = &fc.features[0].geometry.as_ref().unwrap().value;
        assert_eq!(
            *value,
            Value::LineString(vec![vec![-100.0, 10.0], vec![-90.0, 12.0], vec![-88.0, 11.0]])
        );
    }

    #[test]
    fn test_shared_and_reversed_arcs_stitch_into_ring() {
        let topo = topology(
            r#"{
                "type": "Topology",
                "objects": {
                    "land": {"type": "GeometryCollection", "geometries": [
                        {"type": "Polygon", "arcs": [[0, 1]], "properties": {"name": "a"}},
                        {"type": "Polygon", "arcs": [[-2, 2]]}
                    ]}
                },
                "arcs": [
                    [[0, 0], [1, 0]],
                    [[1, 0], [1, 1], [0, 0]],
                    [[0, 0], [1, 0]]
                ]
            }"#,
        );
        let fc = topo.feature("land").unwrap();
        assert_eq!(fc.features.len(), 2);
        assert_eq!(
            fc.features[0].properties.as_ref().unwrap()["name"],
            serde_json::json!("a")
        );

        let Value::Polygon(rings) = &fc.features[0].geometry.as_ref().unwrap().value else {
            panic!("expected polygon");
        };
        assert_eq!(
            rings[0],
            vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0], vec![0.0, 0.0]]
        );

        let Value::Polygon(rings) = &fc.features[1].geometry.as_ref().unwrap().value else {
            panic!("expected polygon");
        };
        // Arc 1 reversed, then arc 2 without its first point
        assert_eq!(
            rings[0],
            vec![vec![0.0, 0.0], vec![1.0, 1.0], vec![1.0, 0.0], vec![1.0, 0.0]]
        );
    }

    #[test]
    fn test_missing_object() {
        let topo = topology(r#"{"type": "Topology", "objects": {}, "arcs": []}"#);
        assert!(!topo.has_object("countries"));
        assert!(matches!(
            topo.feature("countries"),
            Err(LoadError::MissingObject(name)) if name == "countries"
        ));
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(
            parse_topology(b"[1, 2".to_vec()),
            Err(LoadError::Topology(_))
        ));
    }
}
