//! Fixed control-panel layout for patch diagrams.
//!
//! Every patch renders onto the same schematic: a bordered enclosure with
//! six rotary knobs, three three-position switches, and two footswitches.
//! The positions below are plain canvas coordinates on a 360x480 panel and
//! are never mutated; renderer logic reads them so a layout change never
//! touches drawing code.

/// One control on the panel: where it sits and what it is called.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSlot {
    pub x: f64,
    pub y: f64,
    pub label: &'static str,
}

/// Panel canvas size in SVG user units.
pub const PANEL_WIDTH: f64 = 360.0;
pub const PANEL_HEIGHT: f64 = 480.0;

/// Rotary knobs, reading order: top row left to right, then bottom row.
pub const KNOBS: &[ControlSlot] = &[
    ControlSlot { x: 70.0, y: 110.0, label: "MIX" },
    ControlSlot { x: 180.0, y: 110.0, label: "TIME" },
    ControlSlot { x: 290.0, y: 110.0, label: "REPEATS" },
    ControlSlot { x: 70.0, y: 215.0, label: "TONE" },
    ControlSlot { x: 180.0, y: 215.0, label: "MOD" },
    ControlSlot { x: 290.0, y: 215.0, label: "LEVEL" },
];

/// Three-position toggle switches.
pub const SWITCHES: &[ControlSlot] = &[
    ControlSlot { x: 90.0, y: 310.0, label: "MODE" },
    ControlSlot { x: 180.0, y: 310.0, label: "DIV" },
    ControlSlot { x: 270.0, y: 310.0, label: "VOICE" },
];

/// Footswitches along the bottom edge.
pub const FOOTSWITCHES: &[ControlSlot] = &[
    ControlSlot { x: 110.0, y: 415.0, label: "BYPASS" },
    ControlSlot { x: 250.0, y: 415.0, label: "TAP" },
];
