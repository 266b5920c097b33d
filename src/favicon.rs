//! Favicon SVG preparation.
//!
//! The template embeds the favicon SVG inline wherever the logo appears, so
//! the markup has to be ready for that: no `<?xml ?>` declaration, and a
//! `viewBox` so the logo containers can scale it. A missing or unreadable
//! favicon degrades to a plain text logo.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// Text logo substituted when no usable favicon exists.
pub const FALLBACK_LOGO: &str = "LUFS";

static XML_DECL: Lazy<Regex> = Lazy::new(|| Regex::new(r"<\?xml[^>]*\?>").unwrap());
static WIDTH: Lazy<Regex> = Lazy::new(|| Regex::new(r#"width=["']([^"']+)["']"#).unwrap());
static HEIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"height=["']([^"']+)["']"#).unwrap());
static UNITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z%]+").unwrap());
static SVG_OPEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"<svg([^>]*)").unwrap());

/// Load the favicon SVG, cleaned up for inline embedding.
///
/// Returns [`FALLBACK_LOGO`] (with a warning) when the file is missing or
/// unreadable; the build keeps going either way.
pub fn load(path: &Path) -> String {
    if !path.exists() {
        eprintln!(
            "Warning: {} not found, using fallback text logo",
            path.display()
        );
        return FALLBACK_LOGO.to_string();
    }
    match fs::read_to_string(path) {
        Ok(content) => prepare(&content),
        Err(e) => {
            eprintln!("Warning: could not read {}: {e}", path.display());
            FALLBACK_LOGO.to_string()
        }
    }
}

/// Strip the XML declaration and synthesize a `viewBox` when one is missing
/// but `width`/`height` attributes are present (units stripped).
fn prepare(content: &str) -> String {
    let mut svg = XML_DECL.replace(content, "").trim().to_string();

    if !svg.contains("viewBox") && svg.contains("svg") {
        let width = WIDTH.captures(&svg).map(|c| c[1].to_string());
        let height = HEIGHT.captures(&svg).map(|c| c[1].to_string());
        if let (Some(width), Some(height)) = (width, height) {
            let width = UNITS.replace_all(&width, "");
            let height = UNITS.replace_all(&height, "");
            let viewbox = format!(r#"viewBox="0 0 {width} {height}""#);
            svg = SVG_OPEN.replace(&svg, format!("<svg {viewbox}$1")).into_owned();
        }
    }

    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn xml_declaration_is_stripped() {
        let out = prepare("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<svg viewBox=\"0 0 16 16\"></svg>");
        assert!(out.starts_with("<svg"));
        assert!(!out.contains("<?xml"));
    }

    #[test]
    fn viewbox_synthesized_from_width_and_height() {
        let out = prepare(r#"<svg width="24px" height="16px"></svg>"#);
        assert!(out.contains(r#"viewBox="0 0 24 16""#));
        // Original attributes survive.
        assert!(out.contains(r#"width="24px""#));
    }

    #[test]
    fn existing_viewbox_left_alone() {
        let svg = r#"<svg viewBox="0 0 32 32" width="32"></svg>"#;
        assert_eq!(prepare(svg), svg);
    }

    #[test]
    fn no_dimensions_means_no_viewbox() {
        let svg = "<svg><circle r=\"4\"/></svg>";
        assert_eq!(prepare(svg), svg);
    }

    #[test]
    fn missing_file_falls_back_to_text_logo() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(load(&tmp.path().join("favicon.svg")), FALLBACK_LOGO);
    }

    #[test]
    fn present_file_is_loaded_and_prepared() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("favicon.svg");
        fs::write(&path, "<?xml version=\"1.0\"?><svg viewBox=\"0 0 8 8\"/>").unwrap();
        let out = load(&path);
        assert_eq!(out, "<svg viewBox=\"0 0 8 8\"/>");
    }
}
