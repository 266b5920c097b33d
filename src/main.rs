use clap::Parser;
use pedalpress::assemble::{self, BuildPaths};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pedalpress")]
#[command(about = "Build a styled HTML manual page from a single markdown file")]
#[command(long_about = "\
Build a styled HTML manual page from a single markdown file

The manual directory is the data source. Next to the markdown file live an
HTML template with {{MARKDOWN_CONTENT}}, {{BUTTON_CONTENT}} and
{{FAVICON_SVG}} placeholders, a stylesheet, an SVG favicon, and any number
of *button*.html webring fragments whose markup and styles get spliced into
the page.

Patch settings embedded as ```json blocks (objects with \"name\" and
\"knobs\" keys) render as inline control-panel diagrams.")]
#[command(version)]
struct Cli {
    /// Markdown source file
    #[arg(default_value = "manual.md")]
    markdown: PathBuf,

    /// Output HTML file
    #[arg(default_value = "index.html")]
    output: PathBuf,

    /// HTML template with the three placeholder tokens
    #[arg(long, default_value = "template.html")]
    template: PathBuf,

    /// Stylesheet the template links to (existence-checked only)
    #[arg(long, default_value = "styles.css")]
    css: PathBuf,

    /// Favicon SVG embedded wherever the template places the logo
    #[arg(long, default_value = "favicon.svg")]
    favicon: PathBuf,

    /// Directory scanned for *button*.html fragments
    #[arg(long, default_value = ".")]
    site_dir: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    println!("==> Building manual");
    println!("    Source: {}", cli.markdown.display());
    println!("    Output: {}", cli.output.display());

    let paths = BuildPaths {
        markdown: cli.markdown,
        template: cli.template,
        output: cli.output,
        css: cli.css,
        favicon: cli.favicon,
        site_dir: cli.site_dir,
    };

    let report = assemble::build(&paths)?;

    println!("==> Manual built: {}", paths.output.display());
    println!("    Converter: {}", report.converter.name());
    if report.buttons > 0 {
        println!("    Buttons: {} fragment file(s) spliced in", report.buttons);
    }
    if report.diagrams > 0 {
        println!("    Diagrams: {} patch(es) rendered", report.diagrams);
    }
    if report.diagram_errors > 0 {
        println!(
            "    Diagrams: {} patch block(s) failed, see inline markers",
            report.diagram_errors
        );
    }
    if report.favicon_found {
        println!("    Favicon: {} embedded", paths.favicon.display());
    }

    Ok(())
}
