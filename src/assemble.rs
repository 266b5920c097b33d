//! Page assembly: the one-shot build pipeline.
//!
//! One straight-line pass per invocation:
//!
//! ```text
//! manual.md ──▶ patch blocks → tokens ──▶ markdown → HTML ──▶ tokens → figures
//!                                                                 │
//! template.html + buttons + favicon ──▶ placeholder substitution ◀┘
//!                                                                 │
//!                               styles injected before </head> ──▶ index.html
//! ```
//!
//! The template carries three literal placeholder tokens that are replaced
//! verbatim: `{{MARKDOWN_CONTENT}}`, `{{BUTTON_CONTENT}}`, `{{FAVICON_SVG}}`.
//! Collected button styles (and the diagram style block, when any patch
//! rendered) are inserted immediately before the last `</head>`.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::diagram;
use crate::favicon;
use crate::fragments;
use crate::markdown::Converter;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("required input not found: {0}")]
    MissingInput(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Everything the build reads and writes. Paths come from the CLI; only
/// the markdown file and the template are required to exist.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    pub markdown: PathBuf,
    pub template: PathBuf,
    pub output: PathBuf,
    pub css: PathBuf,
    pub favicon: PathBuf,
    /// Directory scanned for `*button*.html` fragments.
    pub site_dir: PathBuf,
}

/// What a successful build produced, for the summary printout.
#[derive(Debug)]
pub struct BuildReport {
    pub converter: Converter,
    pub buttons: usize,
    pub diagrams: usize,
    pub diagram_errors: usize,
    pub favicon_found: bool,
}

/// Run the whole build: read inputs, transform, write the output page.
pub fn build(paths: &BuildPaths) -> Result<BuildReport, BuildError> {
    for required in [&paths.markdown, &paths.template] {
        if !required.exists() {
            return Err(BuildError::MissingInput(required.clone()));
        }
    }
    // The CSS file is referenced by the template, not parsed here; its
    // absence only means an unstyled page.
    if !paths.css.exists() {
        eprintln!(
            "Warning: {} not found, styling won't work",
            paths.css.display()
        );
    }

    let source = fs::read_to_string(&paths.markdown)?;
    let template = fs::read_to_string(&paths.template)?;

    let pass = diagram::replace_patch_blocks(&source);

    let converter = Converter::detect();
    let body = converter.convert(&pass.text);
    let body = diagram::substitute_snippets(&body, &pass.snippets);

    let exclude = [
        filename_of(&paths.template),
        filename_of(&paths.output),
    ];
    let buttons = fragments::collect_buttons(
        &paths.site_dir,
        &[exclude[0].as_str(), exclude[1].as_str()],
    )?;

    let favicon_found = paths.favicon.exists();
    let favicon_svg = favicon::load(&paths.favicon);

    let mut page = template
        .replace("{{MARKDOWN_CONTENT}}", &body)
        .replace("{{BUTTON_CONTENT}}", &buttons.html)
        .replace("{{FAVICON_SVG}}", &favicon_svg);

    page = inject_head_styles(&page, &buttons.styles, "Button Styles");
    if pass.rendered() > 0 {
        page = inject_head_styles(&page, diagram::DIAGRAM_CSS, "Patch Diagram Styles");
    }

    fs::write(&paths.output, page)?;

    Ok(BuildReport {
        converter,
        buttons: buttons.files.len(),
        diagrams: pass.rendered(),
        diagram_errors: pass.errors,
        favicon_found,
    })
}

/// Insert a `<style>` block immediately before the last `</head>`.
///
/// A template without a `</head>` gets a warning and passes through
/// unchanged; the styles simply will not apply.
pub fn inject_head_styles(page: &str, styles: &str, label: &str) -> String {
    if styles.is_empty() {
        return page.to_string();
    }
    let Some(head_close) = page.rfind("</head>") else {
        eprintln!("Warning: no </head> tag in template, {label} dropped");
        return page.to_string();
    };
    let block = format!("\n    <!-- {label} -->\n    <style>\n{styles}\n    </style>\n");
    let mut out = String::with_capacity(page.len() + block.len());
    out.push_str(&page[..head_close]);
    out.push_str(&block);
    out.push_str(&page[head_close..]);
    out
}

fn filename_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<html><head><title>t</title></head>\
                            <body>{{FAVICON_SVG}}<main>{{MARKDOWN_CONTENT}}</main>\
                            {{BUTTON_CONTENT}}</body></html>";

    fn paths_in(dir: &Path) -> BuildPaths {
        BuildPaths {
            markdown: dir.join("manual.md"),
            template: dir.join("template.html"),
            output: dir.join("index.html"),
            css: dir.join("styles.css"),
            favicon: dir.join("favicon.svg"),
            site_dir: dir.to_path_buf(),
        }
    }

    #[test]
    fn minimal_document_builds() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("manual.md"), "# Title\n\nHello **world**.").unwrap();
        fs::write(tmp.path().join("template.html"), TEMPLATE).unwrap();

        let report = build(&paths_in(tmp.path())).unwrap();
        assert_eq!(report.diagrams, 0);
        assert!(!report.favicon_found);

        let page = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(page.contains("<h1>Title</h1>"));
        assert!(page.contains("<strong>world</strong>"));
        // No usable favicon: the text logo stands in.
        assert!(page.contains(crate::favicon::FALLBACK_LOGO));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn missing_markdown_is_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("template.html"), TEMPLATE).unwrap();

        let err = build(&paths_in(tmp.path())).unwrap_err();
        assert!(matches!(err, BuildError::MissingInput(p) if p.ends_with("manual.md")));
    }

    #[test]
    fn missing_template_is_fatal() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("manual.md"), "# T").unwrap();

        let err = build(&paths_in(tmp.path())).unwrap_err();
        assert!(matches!(err, BuildError::MissingInput(p) if p.ends_with("template.html")));
    }

    #[test]
    fn button_styles_injected_before_head_close() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("manual.md"), "hello").unwrap();
        fs::write(tmp.path().join("template.html"), TEMPLATE).unwrap();
        fs::write(
            tmp.path().join("ring-button.html"),
            "<style>.webring-button{color:red}</style>\
             <a class=\"webring-button\" href=\"/r\">R</a>",
        )
        .unwrap();

        let report = build(&paths_in(tmp.path())).unwrap();
        assert_eq!(report.buttons, 1);

        let page = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        let style = page.find("/* Styles from ring-button.html */").unwrap();
        let head_close = page.find("</head>").unwrap();
        assert!(style < head_close);
        assert!(page.contains("<a class=\"webring-button\" href=\"/r\">R</a>"));
    }

    #[cfg(feature = "diagrams")]
    #[test]
    fn diagram_block_renders_and_styles_are_injected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("manual.md"),
            "# Patches\n\n```json\n{\"name\": \"Slapback\", \"knobs\": [0.5, 0.2]}\n```\n",
        )
        .unwrap();
        fs::write(tmp.path().join("template.html"), TEMPLATE).unwrap();

        let report = build(&paths_in(tmp.path())).unwrap();
        assert_eq!(report.diagrams, 1);
        assert_eq!(report.diagram_errors, 0);

        let page = fs::read_to_string(tmp.path().join("index.html")).unwrap();
        assert!(page.contains("data:image/png;base64,"));
        assert!(page.contains("<figcaption>Slapback</figcaption>"));
        let css = page.find(".patch-diagram").unwrap();
        assert!(css < page.find("</head>").unwrap());
        assert!(!page.contains("@@PEDALPRESS-DIAGRAM-0@@"));
    }

    #[test]
    fn inject_into_headless_template_is_a_no_op() {
        let page = "<body>x</body>";
        assert_eq!(inject_head_styles(page, ".a{}", "Test"), page);
    }

    #[test]
    fn empty_styles_change_nothing() {
        let page = "<head></head>";
        assert_eq!(inject_head_styles(page, "", "Test"), page);
    }
}
