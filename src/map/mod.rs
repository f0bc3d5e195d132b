pub mod basemap;
pub mod graticule;
pub mod markers;
pub mod path;
pub mod pin;
pub mod projection;
pub mod raster;
pub mod scene;
pub mod tooltip;
pub mod transition;

pub use projection::Projection;
pub use scene::{Element, NodeId, PointerEvent, PointerKind, Scene};
pub use tooltip::Tooltip;
