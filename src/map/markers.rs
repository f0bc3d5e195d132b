use crate::config::MapConfig;
use crate::data::MarkerFeature;
use crate::jitter::JitterSource;
use crate::map::projection::Projection;
use crate::map::scene::{
    Element, GroupElement, NodeId, PinElement, PointerKind, Scene, TextElement,
};
use crate::map::transition::Transition;
use std::sync::Arc;

/// Append one pin group per feature, in input order.
///
/// Each group sits at the projected coordinate plus a jitter in `[0, jitter_range)`
/// on both axes, carries enter/leave handlers driving the shared tooltip, a pin
/// that grows in after the configured delay, and a label with the location code.
pub fn add_markers(
    scene: &mut Scene,
    config: &MapConfig,
    projection: &Projection,
    features: &[Arc<MarkerFeature>],
    jitter: &mut dyn JitterSource,
) -> Vec<NodeId> {
    features
        .iter()
        .map(|feature| {
            let position = projection.project(feature.coordinates) + jitter.offset(config.jitter_range);

            let mut group = GroupElement::new(position, Arc::clone(feature));

            let datum = Arc::clone(feature);
            let offset = config.tooltip_offset;
            group.on(PointerKind::Enter, move |event, tooltip| {
                tooltip.show(datum.tooltip_html(), event.position + offset);
            });
            group.on(PointerKind::Leave, |_, tooltip| tooltip.hide());

            group.children.push(Element::Pin(PinElement {
                class: "marker",
                scale: Transition::new(&config.pin),
            }));
            group.children.push(Element::Text(TextElement {
                class: "cc",
                text: feature.country_code(),
                dx_em: 0.5,
                dy_em: 0.35,
            }));

            scene.append(Element::Group(group))
        })
        .collect()
}
