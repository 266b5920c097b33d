//! Webring button fragment collection.
//!
//! Sibling `*button*.html` files carry reusable webring buttons: an anchor
//! element marked with the `webring-button` class plus the `<style>` blocks
//! that make it look right. This module pulls both out of each file so the
//! assembler can splice the buttons into the page and the styles into the
//! head.
//!
//! Each collected style block is tagged with a comment naming its source
//! file, so a style in the generated page can be traced back to the
//! fragment it came from.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

static BUTTON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)<a[^>]*class=["']webring-button["'][^>]*>.*?</a>"#).unwrap()
});
static STYLE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style>").unwrap());

/// Button markup and styles extracted from one fragment file.
#[derive(Debug, Default)]
pub struct Fragment {
    pub html: String,
    pub styles: String,
}

/// Buttons and styles combined from every fragment file found.
#[derive(Debug, Default)]
pub struct Collected {
    pub html: String,
    pub styles: String,
    pub files: Vec<PathBuf>,
}

/// Collect every `*button*.html` fragment in `dir`, sorted by filename.
///
/// `exclude` holds filenames that must never be read as fragments (the
/// template and the output file). Unreadable fragments and fragments with
/// no button warn and are skipped; an empty directory is not an error.
pub fn collect_buttons(dir: &Path, exclude: &[&str]) -> io::Result<Collected> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && is_button_file(p, exclude))
        .collect();
    files.sort();

    if files.is_empty() {
        println!("No button fragments found (looking for *button*.html)");
        return Ok(Collected::default());
    }

    let mut buttons = Vec::new();
    let mut styles = Vec::new();
    for path in &files {
        match extract_fragment(path) {
            Ok(fragment) => {
                if !fragment.html.is_empty() {
                    buttons.push(fragment.html);
                }
                if !fragment.styles.is_empty() {
                    styles.push(fragment.styles);
                }
            }
            Err(e) => {
                eprintln!("Warning: could not read {}: {e}", path.display());
            }
        }
    }

    Ok(Collected {
        // Indented join keeps the buttons readable in the output HTML.
        html: buttons.join("\n                "),
        styles: styles.join("\n"),
        files,
    })
}

/// Extract the webring button and its styles from one fragment file.
///
/// A file without a recognizable button still contributes its styles; the
/// missing button is a warning, not an error.
pub fn extract_fragment(path: &Path) -> io::Result<Fragment> {
    let content = fs::read_to_string(path)?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let html = BUTTON
        .find(&content)
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();
    if html.is_empty() {
        eprintln!("Warning: no webring-button found in {}", path.display());
    }

    let mut styles = String::new();
    for caps in STYLE.captures_iter(&content) {
        styles.push_str(&format!("\n/* Styles from {name} */\n"));
        styles.push_str(&caps[1]);
    }

    Ok(Fragment { html, styles })
}

fn is_button_file(path: &Path, exclude: &[&str]) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy().to_lowercase()) else {
        return false;
    };
    name.ends_with(".html") && name.contains("button") && !exclude.iter().any(|e| name == e.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const BUTTON_FILE: &str = r#"<!DOCTYPE html>
<html>
<head>
<style>
.webring-button { border: 1px solid red; }
</style>
</head>
<body>
<a href="https://ring.example" class="webring-button">
  <img src="badge.png" alt="ring">
</a>
</body>
</html>"#;

    #[test]
    fn extracts_button_and_styles() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ring-button.html");
        fs::write(&path, BUTTON_FILE).unwrap();

        let fragment = extract_fragment(&path).unwrap();
        assert!(fragment.html.starts_with("<a href="));
        assert!(fragment.html.ends_with("</a>"));
        assert!(fragment.styles.contains("/* Styles from ring-button.html */"));
        assert!(fragment.styles.contains("border: 1px solid red"));
    }

    #[test]
    fn file_without_button_yields_empty_html() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("other-button.html");
        fs::write(&path, "<p>nothing here</p>").unwrap();

        let fragment = extract_fragment(&path).unwrap();
        assert!(fragment.html.is_empty());
        assert!(fragment.styles.is_empty());
    }

    #[test]
    fn collects_sorted_and_skips_excluded() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("b-button.html"),
            r#"<a class="webring-button" href="/b">B</a>"#,
        )
        .unwrap();
        fs::write(
            tmp.path().join("a-button.html"),
            r#"<a class="webring-button" href="/a">A</a>"#,
        )
        .unwrap();
        fs::write(tmp.path().join("template.html"), "{{BUTTON_CONTENT}}").unwrap();
        fs::write(tmp.path().join("notes.html"), "not a fragment").unwrap();

        let collected = collect_buttons(tmp.path(), &["template.html", "index.html"]).unwrap();
        assert_eq!(collected.files.len(), 2);
        let a = collected.html.find(r#"href="/a""#).unwrap();
        let b = collected.html.find(r#"href="/b""#).unwrap();
        assert!(a < b);
    }

    #[test]
    fn excluded_button_named_template_is_skipped() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("button-template.html"),
            r#"<a class="webring-button" href="/x">X</a>"#,
        )
        .unwrap();

        let collected =
            collect_buttons(tmp.path(), &["button-template.html"]).unwrap();
        assert!(collected.files.is_empty());
        assert!(collected.html.is_empty());
    }

    #[test]
    fn empty_directory_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let collected = collect_buttons(tmp.path(), &[]).unwrap();
        assert!(collected.html.is_empty());
        assert!(collected.styles.is_empty());
    }

    #[test]
    fn multiline_button_is_captured_whole() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("big-button.html");
        fs::write(
            &path,
            "<a\n  class='webring-button'\n  href='/r'>\n  <span>ring</span>\n</a>",
        )
        .unwrap();

        let fragment = extract_fragment(&path).unwrap();
        assert!(fragment.html.contains("<span>ring</span>"));
    }
}
