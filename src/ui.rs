use crate::app::App;
use crate::braille::BrailleCanvas;
use crate::config::MapConfig;
use crate::map::pin::pin_outline;
use crate::map::raster::{fill_path, fill_shape, stroke_path, SurfaceFit};
use crate::map::scene::{Element, LABEL_FONT_PX};
use glam::DVec2;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

/// Render the UI
pub fn render(frame: &mut Frame, app: &App, config: &MapConfig) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, config, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " World Map ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let fit = app.fit();
    let layers = MapLayers::rasterize(app, &fit, inner.width as usize, inner.height as usize);
    frame.render_widget(layers, inner);

    if app.tooltip.is_visible() {
        render_tooltip(frame, app, &fit, inner);
    }
}

/// Rasterized scene, one canvas per color
struct MapLayers {
    graticule: BrailleCanvas,
    land: BrailleCanvas,
    countries: BrailleCanvas,
    pins: BrailleCanvas,
    /// (column, row, text) relative to the map area
    labels: Vec<(u16, u16, String)>,
}

impl MapLayers {
    fn rasterize(app: &App, fit: &SurfaceFit, width: usize, height: usize) -> Self {
        let mut layers = Self {
            graticule: BrailleCanvas::new(width, height),
            land: BrailleCanvas::new(width, height),
            countries: BrailleCanvas::new(width, height),
            pins: BrailleCanvas::new(width, height),
            labels: Vec::new(),
        };
        let elapsed = app.elapsed();
        let outline = pin_outline();

        for element in app.scene.elements() {
            match element {
                Element::Path(path) => match path.class {
                    "graticule" => stroke_path(&mut layers.graticule, &path.data, fit),
                    "land" => fill_path(&mut layers.land, &path.data, fit),
                    _ => stroke_path(&mut layers.countries, &path.data, fit),
                },
                Element::Group(group) => {
                    if !group.translate.is_finite() {
                        continue;
                    }
                    for pin in group.pins() {
                        let scale = pin.scale.value_at(elapsed);
                        fill_shape(&mut layers.pins, &outline, group.translate, scale, fit);
                    }
                    for text in group.texts() {
                        let anchor = group.translate
                            + DVec2::new(text.dx_em, text.dy_em) * LABEL_FONT_PX;
                        let p = fit.to_canvas(anchor);
                        if p.x >= 0.0 && p.y >= 0.0 {
                            let col = (p.x / 2.0) as u16;
                            let row = (p.y / 4.0) as u16;
                            layers.labels.push((col, row, text.text.clone()));
                        }
                    }
                }
                Element::Pin(_) | Element::Text(_) => {}
            }
        }

        layers
    }

    /// Copy a canvas layer into the buffer with a specific color
    fn render_layer(canvas: &BrailleCanvas, color: Color, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                if let Some(ch) = canvas.cell(col as usize, row as usize) {
                    buf[(area.x + col, area.y + row)].set_char(ch).set_fg(color);
                }
            }
        }
    }
}

impl Widget for MapLayers {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Back to front, in scene order
        Self::render_layer(&self.graticule, Color::DarkGray, area, buf);
        Self::render_layer(&self.land, Color::Green, area, buf);
        Self::render_layer(&self.countries, Color::Gray, area, buf);
        Self::render_layer(&self.pins, Color::Red, area, buf);

        let label_style = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        for (col, row, text) in &self.labels {
            if *row >= area.height || *col >= area.width {
                continue;
            }
            let max_len = (area.width - col) as usize;
            for (i, ch) in text.chars().take(max_len).enumerate() {
                buf[(area.x + col + i as u16, area.y + row)]
                    .set_char(ch)
                    .set_style(label_style);
            }
        }
    }
}

/// Draw the shared tooltip box at its surface position, kept inside the map area
fn render_tooltip(frame: &mut Frame, app: &App, fit: &SurfaceFit, area: Rect) {
    let lines: Vec<Line> = app.tooltip.lines().map(|l| Line::from(l.to_string())).collect();
    let text_width = app
        .tooltip
        .lines()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);
    let width = u16::try_from(text_width)
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(area.width);
    let height = u16::try_from(lines.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2)
        .min(area.height);

    let anchor = fit.to_canvas(app.tooltip.position());
    let col = if anchor.x.is_finite() { (anchor.x / 2.0).max(0.0) as u16 } else { 0 };
    let row = if anchor.y.is_finite() { (anchor.y / 4.0).max(0.0) as u16 } else { 0 };
    let x = area.x + col.min(area.width.saturating_sub(width));
    let y = area.y + row.min(area.height.saturating_sub(height));
    let popup = Rect::new(x, y, width, height);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        ),
        popup,
    );
}

fn render_status_bar(frame: &mut Frame, app: &App, config: &MapConfig, area: Rect) {
    let status = Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(app.status(config), Style::default().fg(Color::Cyan)),
        Span::styled(
            " | hover a pin for details  r:replay q:quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    frame.render_widget(Paragraph::new(status), area);
}
