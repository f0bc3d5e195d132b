use glam::DVec2;

/// Identifier of the tooltip element in the host document
pub const TOOLTIP_ID: &str = "tooltip";

/// Line separator inside tooltip content
pub const LINE_BREAK: &str = "<br>";

/// The single tooltip shared by every marker. Show and hide are last-writer-wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tooltip {
    visible: bool,
    html: String,
    /// Surface position of the top-left corner
    position: DVec2,
}

impl Tooltip {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, html: String, position: DVec2) {
        self.visible = true;
        self.html = html;
        self.position = position;
    }

    /// Hiding keeps the last content, like setting `display: none`
    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn position(&self) -> DVec2 {
        self.position
    }

    /// Content split into display lines
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.html.split(LINE_BREAK)
    }
}
