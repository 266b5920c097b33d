//! Patch diagram extraction and rendering.
//!
//! The manual embeds pedal settings as fenced ```` ```json ```` blocks:
//!
//! ```json
//! {
//!   "name": "Slapback",
//!   "knobs": [0.5, 0.2, 0.15, 0.6, 0.0, 0.5],
//!   "switches": [0.0, 0.5, 1.0]
//! }
//! ```
//!
//! A JSON block is treated as a patch only when it parses to an object with
//! both a `"name"` and a `"knobs"` key. Any other JSON block, well-formed or
//! not, passes through byte-for-byte. A block that fails to parse but looks
//! like a patch (both keys present textually) is replaced with a one-line
//! visible error marker; one bad block never stops later blocks from
//! rendering.
//!
//! Rendering replaces each patch block with a placeholder token before
//! markdown conversion; [`substitute_snippets`] swaps the tokens for the
//! final `<figure>` markup afterwards. Tokens survive both converter
//! strategies unchanged. With the `diagrams` feature disabled the whole
//! pass is skipped and blocks stay plain text.

pub mod layout;
#[cfg(feature = "diagrams")]
pub mod render;

use serde::Deserialize;
#[cfg(feature = "diagrams")]
use serde_json::Value;

pub const KNOB_COUNT: usize = 6;
pub const SWITCH_COUNT: usize = 3;

/// Midpoint default for any control the patch leaves unset.
pub const DEFAULT_SETTING: f64 = 0.5;

/// Styling for rendered diagrams, injected into the page head once any
/// patch block renders.
pub const DIAGRAM_CSS: &str = "\
.patch-diagram {
    margin: 2rem auto;
    text-align: center;
}
.patch-diagram img {
    max-width: 360px;
    width: 100%;
    height: auto;
}
.patch-diagram figcaption {
    margin-top: 0.5rem;
    font-size: 0.9rem;
    opacity: 0.75;
}";

/// A named set of control settings parsed from a JSON patch block.
#[derive(Debug, Clone, Deserialize)]
pub struct PatchConfig {
    pub name: String,
    #[serde(default)]
    pub knobs: Vec<f64>,
    #[serde(default)]
    pub switches: Vec<f64>,
}

impl PatchConfig {
    /// Knob settings padded to six entries. Missing values default to the
    /// midpoint, extras are ignored, everything is clamped to [0, 1].
    pub fn knob_values(&self) -> [f64; KNOB_COUNT] {
        padded(&self.knobs)
    }

    /// Switch settings padded to three entries, same rules as knobs.
    pub fn switch_values(&self) -> [f64; SWITCH_COUNT] {
        padded(&self.switches)
    }
}

fn padded<const N: usize>(values: &[f64]) -> [f64; N] {
    let mut out = [DEFAULT_SETTING; N];
    for (slot, value) in out.iter_mut().zip(values) {
        *slot = value.clamp(0.0, 1.0);
    }
    out
}

/// Pointer rotation for a knob setting, in degrees from vertical.
///
/// The sweep is 270 degrees: 0.0 points to -135, 0.5 straight up, 1.0 to
/// +135.
pub fn knob_angle(value: f64) -> f64 {
    value.clamp(0.0, 1.0) * 270.0 - 135.0
}

/// Discrete position of a three-way switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPosition {
    Low,
    Mid,
    High,
}

/// Snap a switch setting to one of three positions.
///
/// Tie convention: `v < 1/3` is low, `v < 2/3` is mid, everything else is
/// high. So 0.33 resolves low and 0.67 resolves high.
pub fn switch_position(value: f64) -> SwitchPosition {
    let v = value.clamp(0.0, 1.0);
    if v < 1.0 / 3.0 {
        SwitchPosition::Low
    } else if v < 2.0 / 3.0 {
        SwitchPosition::Mid
    } else {
        SwitchPosition::High
    }
}

/// Result of the patch-block pass over a document.
#[derive(Debug, Default)]
pub struct PatchPass {
    /// Document text with each rendered patch block replaced by a token.
    pub text: String,
    /// Token to rendered `<figure>` markup, in document order.
    pub snippets: Vec<(String, String)>,
    /// Patch-shaped blocks that failed to parse or render.
    pub errors: usize,
}

impl PatchPass {
    pub fn rendered(&self) -> usize {
        self.snippets.len()
    }
}

/// Scan for ```` ```json ```` fences and replace patch blocks with tokens.
#[cfg(feature = "diagrams")]
pub fn replace_patch_blocks(source: &str) -> PatchPass {
    let lines: Vec<&str> = source.lines().collect();
    let mut out: Vec<String> = Vec::new();
    let mut pass = PatchPass::default();

    let mut i = 0;
    while i < lines.len() {
        if !is_json_fence(lines[i]) {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        }

        // Find the closing fence. An unterminated block is not a block;
        // everything passes through untouched.
        let Some(close) = (i + 1..lines.len()).find(|&j| lines[j].trim() == "```") else {
            out.push(lines[i].to_string());
            i += 1;
            continue;
        };

        let body = lines[i + 1..close].join("\n");
        match classify_block(&body) {
            BlockKind::Patch(patch) => match render::figure_html(&patch) {
                Ok(html) => {
                    let token = format!("@@PEDALPRESS-DIAGRAM-{}@@", pass.snippets.len());
                    out.push(token.clone());
                    pass.snippets.push((token, html));
                }
                Err(e) => {
                    eprintln!("Warning: could not render patch \"{}\": {e}", patch.name);
                    out.push(format!("[patch diagram \"{}\" failed to render]", patch.name));
                    pass.errors += 1;
                }
            },
            BlockKind::Malformed(msg) => {
                out.push(format!("[patch diagram error: {msg}]"));
                pass.errors += 1;
            }
            BlockKind::NotAPatch => {
                for line in &lines[i..=close] {
                    out.push(line.to_string());
                }
            }
        }
        i = close + 1;
    }

    pass.text = out.join("\n");
    pass
}

/// With diagrams compiled out, patch blocks stay plain text.
#[cfg(not(feature = "diagrams"))]
pub fn replace_patch_blocks(source: &str) -> PatchPass {
    PatchPass {
        text: source.to_string(),
        ..PatchPass::default()
    }
}

/// Swap diagram tokens in converted HTML for their rendered markup.
///
/// Both converters wrap a token line in `<p>` tags; the bare form is
/// handled too in case a token lands inside other markup.
pub fn substitute_snippets(html: &str, snippets: &[(String, String)]) -> String {
    let mut out = html.to_string();
    for (token, markup) in snippets {
        let wrapped = format!("<p>{token}</p>");
        if out.contains(&wrapped) {
            out = out.replace(&wrapped, markup);
        } else {
            out = out.replace(token, markup);
        }
    }
    out
}

#[cfg(feature = "diagrams")]
enum BlockKind {
    Patch(PatchConfig),
    Malformed(String),
    NotAPatch,
}

#[cfg(feature = "diagrams")]
fn classify_block(body: &str) -> BlockKind {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) if map.contains_key("name") && map.contains_key("knobs") => {
            match serde_json::from_value::<PatchConfig>(Value::Object(map)) {
                Ok(patch) => BlockKind::Patch(patch),
                Err(e) => BlockKind::Malformed(e.to_string()),
            }
        }
        Ok(_) => BlockKind::NotAPatch,
        // Broken JSON is only our problem when it was clearly meant to be
        // a patch; any other malformed block passes through untouched.
        Err(e) if body.contains("\"name\"") && body.contains("\"knobs\"") => {
            BlockKind::Malformed(e.to_string())
        }
        Err(_) => BlockKind::NotAPatch,
    }
}

#[cfg(feature = "diagrams")]
fn is_json_fence(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed
        .strip_prefix("```")
        .is_some_and(|lang| lang.trim().eq_ignore_ascii_case("json"))
}
