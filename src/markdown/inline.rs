//! Inline formatting for the fallback markdown parser.
//!
//! Maps a single line of lightweight markup (bold, italic, inline code,
//! links) to escaped HTML spans. Every text segment is escaped *before* any
//! marker substitution, so literal angle brackets in source text can never
//! leak into output structure.
//!
//! Substitution order matters: bold markers are resolved before italic
//! markers so that `***x***` resolves as bold-then-italic rather than
//! ambiguously. All patterns are non-greedy, so the shortest enclosing span
//! wins for adjacent emphasis runs.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static BOLD_UNDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"__(.+?)__").unwrap());
static ITALIC_STAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static ITALIC_UNDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(.+?)_").unwrap());
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.+?)`").unwrap());
static LINK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]*)\)").unwrap());
// Bare URLs must be preceded by start-of-text, whitespace, or an opening
// paren so the pattern never re-matches a URL inside an href attribute the
// LINK rule just emitted.
static BARE_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(^|[\s(])(https?://[^\s<]+)").unwrap());

/// Escape a text fragment, apply inline markdown formatting, return HTML.
pub fn format_inline(text: &str) -> String {
    let mut out = escape_html(text);

    out = BOLD_STAR.replace_all(&out, "<strong>$1</strong>").into_owned();
    out = BOLD_UNDER.replace_all(&out, "<strong>$1</strong>").into_owned();
    out = ITALIC_STAR.replace_all(&out, "<em>$1</em>").into_owned();
    out = ITALIC_UNDER.replace_all(&out, "<em>$1</em>").into_owned();
    out = CODE.replace_all(&out, "<code>$1</code>").into_owned();
    out = LINK.replace_all(&out, r#"<a href="$2">$1</a>"#).into_owned();
    out = BARE_URL
        .replace_all(&out, r#"$1<a href="$2">$2</a>"#)
        .into_owned();

    out
}

/// HTML-escape `<`, `>`, `"` and `&`.
///
/// Escaping is entity-aware: an `&` that already begins a character reference
/// (`&amp;`, `&#39;`, `&#x2014;`) is left alone, so running the formatter over
/// its own output never produces `&amp;amp;`.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.char_indices() {
        match ch {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '&' if starts_entity(&text[i + 1..]) => out.push('&'),
            '&' => out.push_str("&amp;"),
            c => out.push(c),
        }
    }
    out
}

/// True if `rest` (the text after an `&`) begins with an entity body and a
/// terminating semicolon, e.g. `amp;`, `#39;`, `#x2014;`.
fn starts_entity(rest: &str) -> bool {
    let Some(semi) = rest.find(';') else {
        return false;
    };
    // Entity names are short; anything longer is a plain ampersand.
    if semi == 0 || semi > 32 {
        return false;
    }
    let body = &rest[..semi];
    if let Some(num) = body.strip_prefix('#') {
        let num = num.strip_prefix(['x', 'X']).unwrap_or(num);
        !num.is_empty() && num.chars().all(|c| c.is_ascii_hexdigit())
    } else {
        body.chars().all(|c| c.is_ascii_alphanumeric())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bold_with_asterisks() {
        assert_eq!(format_inline("a **b** c"), "a <strong>b</strong> c");
    }

    #[test]
    fn bold_with_underscores() {
        assert_eq!(format_inline("a __b__ c"), "a <strong>b</strong> c");
    }

    #[test]
    fn italic_with_asterisks() {
        assert_eq!(format_inline("a *b* c"), "a <em>b</em> c");
    }

    #[test]
    fn triple_asterisk_is_bold_then_italic() {
        assert_eq!(format_inline("***x***"), "<strong><em>x</em></strong>");
    }

    #[test]
    fn nongreedy_adjacent_emphasis() {
        assert_eq!(
            format_inline("**a** and **b**"),
            "<strong>a</strong> and <strong>b</strong>"
        );
    }

    #[test]
    fn inline_code() {
        assert_eq!(format_inline("run `cargo`"), "run <code>cargo</code>");
    }

    #[test]
    fn explicit_link() {
        assert_eq!(
            format_inline("[site](https://lufs.audio)"),
            r#"<a href="https://lufs.audio">site</a>"#
        );
    }

    #[test]
    fn bare_url_autolinks() {
        assert_eq!(
            format_inline("see https://lufs.audio today"),
            r#"see <a href="https://lufs.audio">https://lufs.audio</a> today"#
        );
    }

    #[test]
    fn explicit_link_not_mangled_by_autolink() {
        // The autolink pattern must not re-match the href the LINK rule
        // just produced.
        let out = format_inline("[docs](https://lufs.audio/docs)");
        assert_eq!(out, r#"<a href="https://lufs.audio/docs">docs</a>"#);
    }

    #[test]
    fn angle_brackets_escaped() {
        assert_eq!(format_inline("a <b> c"), "a &lt;b&gt; c");
    }

    #[test]
    fn escape_is_idempotent() {
        let once = format_inline("fish & chips");
        assert_eq!(once, "fish &amp; chips");
        let twice = format_inline(&once);
        assert_eq!(twice, "fish &amp; chips");
    }

    #[test]
    fn numeric_entity_not_reescaped() {
        assert_eq!(escape_html("&#x2014; &#39;"), "&#x2014; &#39;");
    }

    #[test]
    fn lone_ampersand_escaped() {
        assert_eq!(escape_html("AT&T"), "AT&amp;T");
        assert_eq!(escape_html("a & b"), "a &amp; b");
    }

    #[test]
    fn ampersand_before_long_run_escaped() {
        // A semicolon 40 chars away does not make this an entity.
        let s = format!("&{};", "z".repeat(40));
        assert!(escape_html(&s).starts_with("&amp;"));
    }
}
