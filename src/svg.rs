//! SVG export of a scene.
//!
//! The document keeps the class names of the browser rendition so existing
//! stylesheets apply. The pin entrance is a SMIL `animateTransform` and each
//! marker's tooltip becomes a `<title>`.

use crate::map::path::fmt_coord;
use crate::map::pin::PIN_PATH;
use crate::map::scene::{Element, GroupElement, PinElement, TextElement};
use crate::map::tooltip::{LINE_BREAK, TOOLTIP_ID};
use crate::map::Scene;
use std::io::{self, Write};

/// Control points approximating the cubic in-out ease
const EASE_SPLINE: &str = "0.645 0.045 0.355 1";

const STYLE: &str = "\
.bg { background: #f4f1ea; }
.graticule { fill: none; stroke: #ccc; stroke-width: .5px; }
.land { fill: #d8d2c4; stroke: #aaa; stroke-width: .5px; }
.country { fill: none; stroke: #fff; stroke-width: .5px; }
.marker { fill: #c0392b; stroke: #fff; stroke-width: 1px; }
.cc { font: 10px sans-serif; fill: #222; }
";

/// Escape text for element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

fn seconds(duration: std::time::Duration) -> String {
    format!("{}s", fmt_coord(duration.as_secs_f64()))
}

/// Write the whole scene as a standalone SVG document
pub fn write_svg<W: Write>(scene: &Scene, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" class="{class}">"#,
        w = scene.width,
        h = scene.height,
        class = scene.class,
    )?;
    writeln!(out, "<style>\n{STYLE}</style>")?;

    for element in scene.elements() {
        write_element(element, out)?;
    }
    // Shared tooltip slot; per-marker text lives in each group's <title>
    writeln!(out, r#"<text id="{TOOLTIP_ID}" visibility="hidden"/>"#)?;

    writeln!(out, "</svg>")
}

fn write_element<W: Write>(element: &Element, out: &mut W) -> io::Result<()> {
    match element {
        Element::Path(path) => {
            if path.data.is_empty() {
                return Ok(());
            }
            writeln!(
                out,
                r#"<path class="{}" d="{}"/>"#,
                path.class,
                path.data.to_svg()
            )
        }
        Element::Group(group) => write_group(group, out),
        Element::Pin(pin) => write_pin(pin, out),
        Element::Text(text) => write_text(text, out),
    }
}

fn write_group<W: Write>(group: &GroupElement, out: &mut W) -> io::Result<()> {
    // A marker without coordinates has nowhere to go
    if !group.translate.is_finite() {
        return Ok(());
    }
    writeln!(
        out,
        r#"<g transform="translate({},{})">"#,
        fmt_coord(group.translate.x),
        fmt_coord(group.translate.y)
    )?;
    let title = group.datum.tooltip_html().replace(LINE_BREAK, "\n");
    writeln!(out, "<title>{}</title>", escape(&title))?;
    for child in &group.children {
        write_element(child, out)?;
    }
    writeln!(out, "</g>")
}

fn write_pin<W: Write>(pin: &PinElement, out: &mut W) -> io::Result<()> {
    let t = &pin.scale;
    writeln!(
        out,
        r#"<path class="{}" d="{PIN_PATH}" transform="scale({})"><animateTransform attributeName="transform" type="scale" from="{}" to="{}" begin="{}" dur="{}" fill="freeze" calcMode="spline" keyTimes="0;1" keySplines="{EASE_SPLINE}"/></path>"#,
        pin.class,
        fmt_coord(t.from),
        fmt_coord(t.from),
        fmt_coord(t.to),
        seconds(t.delay),
        seconds(t.duration),
    )
}

fn write_text<W: Write>(text: &TextElement, out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        r#"<text dx="{}em" dy="{}em" class="{}">{}</text>"#,
        text.dx_em,
        text.dy_em,
        text.class,
        escape(&text.text)
    )
}
