use crate::data::Topology;
use crate::error::LoadError;
use crate::map::graticule::Graticule;
use crate::map::path::{GeoPath, PathData};
use crate::map::projection::Projection;
use crate::map::scene::{Element, NodeId, PathElement, Scene};

/// Append the ten-degree graticule. Needs no data.
pub fn add_graticule(scene: &mut Scene, projection: &Projection) -> NodeId {
    let data = GeoPath::new(projection).lines(&Graticule::ten().lines());
    scene.append(Element::Path(PathElement {
        class: "graticule",
        data,
    }))
}

/// Append the topology's `land` object as a single filled path
pub fn render_base_map(
    scene: &mut Scene,
    projection: &Projection,
    world: &Topology,
) -> Result<NodeId, LoadError> {
    let land = world.feature("land")?;
    let path = GeoPath::new(projection);

    let mut data = PathData::default();
    for geometry in land.features.iter().filter_map(|f| f.geometry.as_ref()) {
        data.polylines.extend(path.geometry(geometry).polylines);
    }

    Ok(scene.append(Element::Path(PathElement { class: "land", data })))
}

/// Append one `country` path per feature of the `countries` object, if there is one
pub fn add_boundaries(scene: &mut Scene, projection: &Projection, world: &Topology) -> usize {
    let countries = match world.feature("countries") {
        Ok(countries) => countries,
        Err(err) => {
            log::warn!("skipping country boundaries: {err}");
            return 0;
        }
    };
    let path = GeoPath::new(projection);

    let mut count = 0;
    for geometry in countries.features.iter().filter_map(|f| f.geometry.as_ref()) {
        scene.append(Element::Path(PathElement {
            class: "country",
            data: path.geometry(geometry),
        }));
        count += 1;
    }
    count
}
