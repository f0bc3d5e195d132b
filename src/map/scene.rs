//! Append-only scene graph.
//!
//! Renderers describe what to draw by appending elements to a [`Scene`]; backends
//! (terminal, SVG) read it. Nothing is ever removed or replaced once appended.

use crate::config::MapConfig;
use crate::data::MarkerFeature;
use crate::map::path::PathData;
use crate::map::pin::pin_bounds;
use crate::map::tooltip::Tooltip;
use crate::map::transition::Transition;
use glam::DVec2;
use std::sync::Arc;
use std::time::Duration;

/// Approximate glyph advance of label text, in em
const LABEL_ADVANCE_EM: f64 = 0.6;
/// Font size labels are laid out with
pub const LABEL_FONT_PX: f64 = 10.0;

/// Handle to a top-level element
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    Enter,
    Leave,
}

/// Pointer event delivered to a group
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    /// Pointer position on the surface
    pub position: DVec2,
}

type Handler = Box<dyn Fn(&PointerEvent, &mut Tooltip) + Send + Sync>;

/// A projected geometry drawn as one path
pub struct PathElement {
    pub class: &'static str,
    pub data: PathData,
}

/// The pin shape, scaled by a transition
pub struct PinElement {
    pub class: &'static str,
    pub scale: Transition,
}

/// A short text label offset from the group origin in em units
pub struct TextElement {
    pub class: &'static str,
    pub text: String,
    pub dx_em: f64,
    pub dy_em: f64,
}

pub enum Element {
    Path(PathElement),
    Group(GroupElement),
    Pin(PinElement),
    Text(TextElement),
}

/// A translated group bound to one marker feature
pub struct GroupElement {
    pub translate: DVec2,
    pub datum: Arc<MarkerFeature>,
    pub children: Vec<Element>,
    handlers: Vec<(PointerKind, Handler)>,
}

impl GroupElement {
    pub fn new(translate: DVec2, datum: Arc<MarkerFeature>) -> Self {
        Self {
            translate,
            datum,
            children: Vec::new(),
            handlers: Vec::new(),
        }
    }

    /// Register a handler for one pointer event kind
    pub fn on<F>(&mut self, kind: PointerKind, handler: F)
    where
        F: Fn(&PointerEvent, &mut Tooltip) + Send + Sync + 'static,
    {
        self.handlers.push((kind, Box::new(handler)));
    }

    pub fn handler_count(&self, kind: PointerKind) -> usize {
        self.handlers.iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn pins(&self) -> impl Iterator<Item = &PinElement> {
        self.children.iter().filter_map(|c| match c {
            Element::Pin(pin) => Some(pin),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextElement> {
        self.children.iter().filter_map(|c| match c {
            Element::Text(text) => Some(text),
            _ => None,
        })
    }

    /// Whether a surface point falls on the pin or the label at `elapsed`
    pub fn contains(&self, point: DVec2, elapsed: Duration) -> bool {
        if !self.translate.is_finite() {
            return false;
        }
        let local = point - self.translate;

        let on_pin = self.pins().any(|pin| {
            let (min, max) = pin_bounds(pin.scale.value_at(elapsed));
            local.cmpge(min).all() && local.cmple(max).all() && min != max
        });

        let on_label = self.texts().any(|text| {
            let origin = DVec2::new(text.dx_em, text.dy_em) * LABEL_FONT_PX;
            let width = text.text.chars().count() as f64 * LABEL_ADVANCE_EM * LABEL_FONT_PX;
            // Text sits on its baseline
            let min = origin - DVec2::new(0.0, LABEL_FONT_PX);
            let max = origin + DVec2::new(width, 0.0);
            local.cmpge(min).all() && local.cmple(max).all()
        });

        on_pin || on_label
    }
}

/// The drawing surface and everything appended to it
pub struct Scene {
    pub width: u32,
    pub height: u32,
    pub class: &'static str,
    elements: Vec<Element>,
}

impl Scene {
    pub fn new(config: &MapConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
            class: "bg",
            elements: Vec::new(),
        }
    }

    /// Append a top-level element; later elements draw on top
    pub fn append(&mut self, element: Element) -> NodeId {
        self.elements.push(element);
        NodeId(self.elements.len() - 1)
    }

    /// Append a child to a group. Returns false if `id` is not a group.
    pub fn append_child(&mut self, id: NodeId, child: Element) -> bool {
        match self.elements.get_mut(id.0) {
            Some(Element::Group(group)) => {
                group.children.push(child);
                true
            }
            _ => false,
        }
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn paths(&self, class: &str) -> impl Iterator<Item = &PathElement> + '_ {
        let class = class.to_string();
        self.elements.iter().filter_map(move |e| match e {
            Element::Path(path) if path.class == class => Some(path),
            _ => None,
        })
    }

    pub fn groups(&self) -> impl Iterator<Item = (NodeId, &GroupElement)> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(i, e)| match e {
                Element::Group(group) => Some((NodeId(i), group)),
                _ => None,
            })
    }

    pub fn group(&self, id: NodeId) -> Option<&GroupElement> {
        match self.elements.get(id.0) {
            Some(Element::Group(group)) => Some(group),
            _ => None,
        }
    }

    /// Topmost group under a surface point
    pub fn hit_test(&self, point: DVec2, elapsed: Duration) -> Option<NodeId> {
        self.groups()
            .filter(|(_, group)| group.contains(point, elapsed))
            .last()
            .map(|(id, _)| id)
    }

    /// Run the handlers `id` registered for this event kind. Returns false if none ran.
    pub fn dispatch(&self, id: NodeId, event: &PointerEvent, tooltip: &mut Tooltip) -> bool {
        let Some(group) = self.group(id) else {
            return false;
        };
        let mut handled = false;
        for (kind, handler) in &group.handlers {
            if *kind == event.kind {
                handler(event, tooltip);
                handled = true;
            }
        }
        handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datum(code: &str) -> Arc<MarkerFeature> {
        let mut properties = geojson::JsonObject::new();
        properties.insert("countryCode".to_string(), code.into());
        Arc::new(MarkerFeature::new(DVec2::ZERO, properties))
    }

    fn label(text: &str) -> Element {
        Element::Text(TextElement {
            class: "cc",
            text: text.to_string(),
            dx_em: 0.5,
            dy_em: 0.35,
        })
    }

    #[test]
    fn test_append_only_children() {
        let config = MapConfig::default();
        let mut scene = Scene::new(&config);
        let path = scene.append(Element::Path(PathElement {
            class: "land",
            data: PathData::default(),
        }));
        let group = scene.append(Element::Group(GroupElement::new(DVec2::new(10.0, 10.0), datum("US"))));

        assert!(!scene.append_child(path, label("x")));
        assert!(scene.append_child(group, label("US")));
        assert_eq!(scene.paths("land").count(), 1);
        assert_eq!(scene.group(group).unwrap().texts().count(), 1);
    }

    #[test]
    fn test_hit_test_prefers_topmost() {
        let config = MapConfig::default();
        let mut scene = Scene::new(&config);
        let below = scene.append(Element::Group(GroupElement::new(DVec2::new(100.0, 100.0), datum("A"))));
        let above = scene.append(Element::Group(GroupElement::new(DVec2::new(102.0, 100.0), datum("B"))));
        scene.append_child(below, label("AAA"));
        scene.append_child(above, label("BBB"));

        assert_eq!(scene.hit_test(DVec2::new(108.0, 99.0), Duration::ZERO), Some(above));
        assert_eq!(scene.hit_test(DVec2::new(106.0, 99.0), Duration::ZERO), Some(below));
        assert_eq!(scene.hit_test(DVec2::new(300.0, 300.0), Duration::ZERO), None);
    }

    #[test]
    fn test_dispatch_runs_matching_handlers() {
        let config = MapConfig::default();
        let mut scene = Scene::new(&config);
        let mut group = GroupElement::new(DVec2::ZERO, datum("US"));
        group.on(PointerKind::Enter, |event, tooltip| {
            tooltip.show("hello".to_string(), event.position)
        });
        group.on(PointerKind::Leave, |_, tooltip| tooltip.hide());
        let id = scene.append(Element::Group(group));

        let mut tooltip = Tooltip::new();
        let enter = PointerEvent {
            kind: PointerKind::Enter,
            position: DVec2::new(3.0, 4.0),
        };
        assert!(scene.dispatch(id, &enter, &mut tooltip));
        assert!(tooltip.is_visible());

        let leave = PointerEvent {
            kind: PointerKind::Leave,
            ..enter
        };
        assert!(scene.dispatch(id, &leave, &mut tooltip));
        assert!(!tooltip.is_visible());
    }
}
