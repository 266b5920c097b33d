//! Patch diagram rasterization.
//!
//! Draws the fixed control panel as an SVG string, rasterizes it with
//! `resvg` at 2x scale, PNG-encodes the pixmap and wraps it in a base64
//! data URI so the image embeds directly in the generated page.
//!
//! Output is deterministic: identical (name, values) input produces
//! byte-identical PNG data, so rendered manuals diff cleanly across builds.

use std::fmt::Write as _;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::ImageEncoder as _;
use image::codecs::png::PngEncoder;
use once_cell::sync::Lazy;
use resvg::usvg::fontdb;
use thiserror::Error;

use super::layout::{self, ControlSlot};
use super::{PatchConfig, SwitchPosition, knob_angle, switch_position};
use crate::markdown::inline::escape_html;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("SVG error: {0}")]
    Svg(#[from] resvg::usvg::Error),
    #[error("PNG encoding error: {0}")]
    Png(#[from] image::ImageError),
    #[error("failed to allocate {0}x{1} pixmap")]
    Pixmap(u32, u32),
}

/// Rasterization scale. The panel is drawn in 360x480 user units and
/// rendered at 2x for crisp text on high-density displays.
const SCALE: f32 = 2.0;

const ENCLOSURE: &str = "#20242d";
const ENCLOSURE_EDGE: &str = "#454c5c";
const CONTROL_FACE: &str = "#2b313d";
const CONTROL_EDGE: &str = "#9aa3b2";
const POINTER: &str = "#e8ecf3";
const LABEL: &str = "#c4cad6";
const LED: &str = "#d64541";

static FONTS: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

/// Render a patch to the `<figure>` markup embedded in the manual.
pub fn figure_html(patch: &PatchConfig) -> Result<String, RenderError> {
    let uri = render_data_uri(patch)?;
    let name = escape_html(&patch.name);
    Ok(format!(
        "<figure class=\"patch-diagram\">\n\
         <img src=\"{uri}\" alt=\"{name} patch settings\" width=\"{w}\" height=\"{h}\">\n\
         <figcaption>{name}</figcaption>\n\
         </figure>",
        w = layout::PANEL_WIDTH as u32,
        h = layout::PANEL_HEIGHT as u32,
    ))
}

/// Render a patch to a `data:image/png;base64,...` URI.
pub fn render_data_uri(patch: &PatchConfig) -> Result<String, RenderError> {
    let png = rasterize(&panel_svg(patch))?;
    Ok(format!("data:image/png;base64,{}", BASE64.encode(png)))
}

/// Draw the full panel SVG for a patch.
fn panel_svg(patch: &PatchConfig) -> String {
    let mut svg = String::with_capacity(4096);
    let w = layout::PANEL_WIDTH;
    let h = layout::PANEL_HEIGHT;

    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" \
         viewBox=\"0 0 {w} {h}\">"
    );

    // Enclosure.
    let _ = write!(
        svg,
        "<rect x=\"10\" y=\"10\" width=\"{}\" height=\"{}\" rx=\"18\" \
         fill=\"{ENCLOSURE}\" stroke=\"{ENCLOSURE_EDGE}\" stroke-width=\"3\"/>",
        w - 20.0,
        h - 20.0,
    );
    let _ = write!(
        svg,
        "<text x=\"{}\" y=\"52\" text-anchor=\"middle\" fill=\"{POINTER}\" \
         font-family=\"sans-serif\" font-size=\"22\" font-weight=\"bold\">{}</text>",
        w / 2.0,
        escape_html(&patch.name),
    );

    for (slot, value) in layout::KNOBS.iter().zip(patch.knob_values()) {
        knob_svg(&mut svg, slot, value);
    }
    for (slot, value) in layout::SWITCHES.iter().zip(patch.switch_values()) {
        switch_svg(&mut svg, slot, value);
    }
    for slot in layout::FOOTSWITCHES {
        footswitch_svg(&mut svg, slot);
    }

    svg.push_str("</svg>");
    svg
}

fn knob_svg(svg: &mut String, slot: &ControlSlot, value: f64) {
    let ControlSlot { x, y, label } = *slot;
    let angle = knob_angle(value);
    let percent = (value * 100.0).round();

    let _ = write!(
        svg,
        "<circle cx=\"{x}\" cy=\"{y}\" r=\"28\" fill=\"{CONTROL_FACE}\" \
         stroke=\"{CONTROL_EDGE}\" stroke-width=\"2.5\"/>\
         <line x1=\"{x}\" y1=\"{y}\" x2=\"{x}\" y2=\"{}\" stroke=\"{POINTER}\" \
         stroke-width=\"3.5\" stroke-linecap=\"round\" \
         transform=\"rotate({angle:.1} {x} {y})\"/>\
         <text x=\"{x}\" y=\"{}\" text-anchor=\"middle\" fill=\"{LABEL}\" \
         font-family=\"sans-serif\" font-size=\"12\">{label}</text>\
         <text x=\"{x}\" y=\"{}\" text-anchor=\"middle\" fill=\"{CONTROL_EDGE}\" \
         font-family=\"sans-serif\" font-size=\"10\">{percent:.0}%</text>",
        y - 22.0,
        y + 46.0,
        y + 60.0,
    );
}

fn switch_svg(svg: &mut String, slot: &ControlSlot, value: f64) {
    let ControlSlot { x, y, label } = *slot;
    let offset = match switch_position(value) {
        SwitchPosition::Low => 13.0,
        SwitchPosition::Mid => 0.0,
        SwitchPosition::High => -13.0,
    };

    let _ = write!(
        svg,
        "<rect x=\"{}\" y=\"{}\" width=\"14\" height=\"44\" rx=\"7\" \
         fill=\"{CONTROL_FACE}\" stroke=\"{CONTROL_EDGE}\" stroke-width=\"2\"/>\
         <circle cx=\"{x}\" cy=\"{}\" r=\"5\" fill=\"{POINTER}\"/>\
         <text x=\"{x}\" y=\"{}\" text-anchor=\"middle\" fill=\"{LABEL}\" \
         font-family=\"sans-serif\" font-size=\"12\">{label}</text>",
        x - 7.0,
        y - 22.0,
        y + offset,
        y + 42.0,
    );
}

fn footswitch_svg(svg: &mut String, slot: &ControlSlot) {
    let ControlSlot { x, y, label } = *slot;

    let _ = write!(
        svg,
        "<circle cx=\"{x}\" cy=\"{y}\" r=\"22\" fill=\"{CONTROL_FACE}\" \
         stroke=\"{CONTROL_EDGE}\" stroke-width=\"3\"/>\
         <circle cx=\"{x}\" cy=\"{y}\" r=\"13\" fill=\"{ENCLOSURE}\" \
         stroke=\"{CONTROL_EDGE}\" stroke-width=\"1.5\"/>\
         <circle cx=\"{x}\" cy=\"{}\" r=\"5\" fill=\"{LED}\"/>\
         <text x=\"{x}\" y=\"{}\" text-anchor=\"middle\" fill=\"{LABEL}\" \
         font-family=\"sans-serif\" font-size=\"12\">{label}</text>",
        y - 38.0,
        y + 42.0,
    );
}

/// Rasterize an SVG string to PNG bytes at [`SCALE`].
fn rasterize(svg: &str) -> Result<Vec<u8>, RenderError> {
    let opts = resvg::usvg::Options {
        fontdb: Arc::clone(&FONTS),
        ..Default::default()
    };
    let tree = resvg::usvg::Tree::from_str(svg, &opts)?;
    let size = tree.size();

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let width = (size.width() * SCALE).ceil() as u32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let height = (size.height() * SCALE).ceil() as u32;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or(RenderError::Pixmap(width, height))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(SCALE, SCALE),
        &mut pixmap.as_mut(),
    );

    let mut png = Vec::new();
    let encoder = PngEncoder::new(&mut png);
    encoder.write_image(
        pixmap.data(),
        width,
        height,
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(png)
}
