use crate::config::MapConfig;
use crate::map::raster::SurfaceFit;
use crate::map::{NodeId, PointerEvent, PointerKind, Projection, Scene, Tooltip};
use glam::DVec2;
use std::time::{Duration, Instant};

/// Application state for the terminal viewer
pub struct App {
    pub scene: Scene,
    pub tooltip: Tooltip,
    pub should_quit: bool,
    /// Braille pixel size of the map area
    canvas_size: DVec2,
    /// When the scene became ready; animations run from here
    started: Instant,
    /// Group currently under the pointer
    hovered: Option<NodeId>,
    /// Last pointer cell
    pub mouse_pos: Option<(u16, u16)>,
}

impl App {
    pub fn new(scene: Scene, width: usize, height: usize) -> Self {
        let mut app = Self {
            scene,
            tooltip: Tooltip::new(),
            should_quit: false,
            canvas_size: DVec2::ZERO,
            started: Instant::now(),
            hovered: None,
            mouse_pos: None,
        };
        app.resize(width, height);
        app
    }

    /// Update canvas size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        // Account for border (2 chars horizontal, 2 chars vertical plus status bar)
        let inner_width = width.saturating_sub(2);
        let inner_height = height.saturating_sub(3);
        // Braille gives 2x4 resolution per character
        self.canvas_size = DVec2::new((inner_width * 2) as f64, (inner_height * 4) as f64);
    }

    /// How the surface maps onto the map area
    pub fn fit(&self) -> SurfaceFit {
        let surface = DVec2::new(self.scene.width as f64, self.scene.height as f64);
        SurfaceFit::new(surface, self.canvas_size)
    }

    /// Time since the scene became ready
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Play the entrance animation again
    pub fn replay(&mut self) {
        self.started = Instant::now();
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Surface position of a terminal cell (column/row including the border)
    pub fn cell_to_surface(&self, col: u16, row: u16) -> DVec2 {
        // Each terminal cell is 2 braille pixels wide, 4 tall; aim at its center
        let px = (col.saturating_sub(1)) as f64 * 2.0 + 1.0;
        let py = (row.saturating_sub(1)) as f64 * 4.0 + 2.0;
        self.fit().to_surface(DVec2::new(px, py))
    }

    /// Track the pointer and deliver leave/enter to the groups it crosses
    pub fn pointer_moved(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        let position = self.cell_to_surface(col, row);
        let target = self.scene.hit_test(position, self.elapsed());
        self.hover(target, position);
    }

    /// The pointer left the map area
    pub fn pointer_left(&mut self) {
        self.mouse_pos = None;
        self.hover(None, DVec2::NAN);
    }

    fn hover(&mut self, target: Option<NodeId>, position: DVec2) {
        if target == self.hovered {
            return;
        }
        // Leave the old group before entering the new one so the newest tooltip wins
        if let Some(previous) = self.hovered.take() {
            let event = PointerEvent {
                kind: PointerKind::Leave,
                position,
            };
            self.scene.dispatch(previous, &event, &mut self.tooltip);
        }
        if let Some(next) = target {
            let event = PointerEvent {
                kind: PointerKind::Enter,
                position,
            };
            self.scene.dispatch(next, &event, &mut self.tooltip);
        }
        self.hovered = target;
    }

    /// Whether any pin is still growing
    pub fn is_animating(&self) -> bool {
        let elapsed = self.elapsed();
        self.scene
            .groups()
            .flat_map(|(_, group)| group.pins())
            .any(|pin| !pin.scale.is_finished(elapsed))
    }

    /// Geographic position under the pointer
    pub fn pointer_lonlat(&self, config: &MapConfig) -> Option<DVec2> {
        let (col, row) = self.mouse_pos?;
        let projection = Projection::new(&config.projection);
        Some(projection.invert(self.cell_to_surface(col, row)))
    }

    pub fn status(&self, config: &MapConfig) -> String {
        let (label, at) = match self.pointer_lonlat(config) {
            Some(lonlat) => ("pointer", lonlat),
            None => ("center", config.projection.center),
        };
        format!(
            "{} markers | {label} {:.0}°{}, {:.0}°{}",
            self.scene.groups().count(),
            at.y.abs(),
            if at.y >= 0.0 { "N" } else { "S" },
            at.x.abs(),
            if at.x >= 0.0 { "E" } else { "W" }
        )
    }
}
