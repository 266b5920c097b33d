//! Markdown to HTML conversion.
//!
//! Two converter implementations exist: the enhanced path built on
//! `pulldown-cmark` (compiled in with the default `enhanced-markdown`
//! feature) and a hand-rolled [`fallback`] parser covering the subset of
//! markdown the manual uses. Which one runs is a strategy picked once at
//! startup via [`Converter::detect`], not a conditional scattered through
//! the pipeline.

pub mod fallback;
pub mod inline;

/// The markdown conversion strategy for this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// Full CommonMark via `pulldown-cmark`, with the tables extension.
    #[cfg(feature = "enhanced-markdown")]
    Enhanced,
    /// The hand-rolled line scanner in [`fallback`].
    Basic,
}

impl Converter {
    /// Pick the best converter compiled into this binary.
    pub fn detect() -> Self {
        #[cfg(feature = "enhanced-markdown")]
        {
            Converter::Enhanced
        }
        #[cfg(not(feature = "enhanced-markdown"))]
        {
            Converter::Basic
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            #[cfg(feature = "enhanced-markdown")]
            Converter::Enhanced => "pulldown-cmark",
            Converter::Basic => "basic",
        }
    }

    /// Convert a markdown document to HTML.
    pub fn convert(self, source: &str) -> String {
        match self {
            #[cfg(feature = "enhanced-markdown")]
            Converter::Enhanced => enhanced(source),
            Converter::Basic => fallback::render(source),
        }
    }
}

#[cfg(feature = "enhanced-markdown")]
fn enhanced(source: &str) -> String {
    use pulldown_cmark::{Options, Parser, html as md_html};

    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);

    let parser = Parser::new_ext(source, options);
    let mut html = String::new();
    md_html::push_html(&mut html, parser);
    html
}
