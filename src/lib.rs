//! # Pedalpress
//!
//! A single-file manual builder for effects pedal product pages. One
//! markdown document in, one styled HTML page out: the markdown is
//! converted to HTML, webring button fragments collected from sibling
//! files are spliced in, the favicon SVG is embedded inline, and patch
//! settings written as fenced `json` blocks render into inline
//! control-panel diagrams.
//!
//! # Pipeline
//!
//! Each build is one straight-line pass:
//!
//! ```text
//! manual.md → diagram blocks → markdown → HTML → template merge → index.html
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`markdown`] | Conversion strategy: `pulldown-cmark` when compiled in, hand-rolled fallback otherwise |
//! | [`diagram`] | Patch block extraction, the fixed panel layout, SVG rasterization |
//! | [`fragments`] | Webring button and style collection from `*button*.html` siblings |
//! | [`favicon`] | Favicon SVG cleanup for inline embedding |
//! | [`assemble`] | Placeholder substitution, head style injection, build orchestration |
//!
//! # Degradation Over Failure
//!
//! Only two inputs are required: the markdown file and the template.
//! Everything else degrades with a console warning: a missing favicon
//! becomes a text logo, missing fragments mean no buttons, and a broken
//! patch block becomes a one-line inline error marker while the rest of
//! the manual still renders.
//!
//! # Determinism
//!
//! Rendered diagrams are byte-identical for identical patch input, so a
//! rebuilt page diffs cleanly against the previous build.

pub mod assemble;
pub mod diagram;
pub mod favicon;
pub mod fragments;
pub mod markdown;
