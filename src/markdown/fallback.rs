//! Hand-rolled fallback markdown renderer.
//!
//! Single forward scan over the document lines. Handles the subset of
//! markdown the manual actually uses: `#`..`####` headings, pipe-delimited
//! tables, unordered/ordered lists, and paragraphs for everything else.
//! One-line lookahead/lookback is used only to decide where `<ul>`/`<ol>`
//! wrappers open and close.
//!
//! Table handling is the only stateful part and is carried as an explicit
//! [`TableState`] through the loop, so the parser has no ambient state and
//! can be exercised line-by-line in tests.

use once_cell::sync::Lazy;
use regex::Regex;

use super::inline::{escape_html, format_inline};

static ORDERED_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\. ").unwrap());

/// Whether the scan is currently emitting table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableState {
    Outside,
    InTable,
}

/// Render a markdown document to HTML.
///
/// Never fails: malformed tables simply produce rows with whatever cells
/// were split out, and unknown constructs fall through to paragraphs.
pub fn render(source: &str) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let mut out: Vec<String> = Vec::new();
    let mut state = TableState::Outside;

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i].trim();

        // Blank lines end paragraph context but are suppressed inside a
        // table so a gap between rows does not split the table.
        if line.is_empty() {
            if state == TableState::Outside {
                out.push(String::new());
            }
            i += 1;
            continue;
        }

        // Headings, checked first so a heading containing a pipe still
        // closes an open table and renders as a heading.
        if let Some((level, text)) = heading_of(line) {
            close_table(&mut out, &mut state);
            out.push(format!("<h{level}>{}</h{level}>", escape_html(text)));
            i += 1;
            continue;
        }

        // A non-pipe line ends the table; reprocess it in Outside state so
        // its content is emitted normally rather than dropped.
        if state == TableState::InTable && !line.contains('|') {
            close_table(&mut out, &mut state);
            continue;
        }

        if line.contains('|') {
            match state {
                TableState::Outside => {
                    state = TableState::InTable;
                    out.push("<table>".to_string());
                    out.push("<thead>".to_string());
                    out.push("<tr>".to_string());
                    for cell in split_cells(line) {
                        out.push(format!("<th>{}</th>", escape_html(cell)));
                    }
                    out.push("</tr>".to_string());
                    out.push("</thead>".to_string());
                    out.push("<tbody>".to_string());
                    // The separator row under the header carries no content.
                    // Anything else after the header is a data row and gets
                    // reprocessed as one.
                    i += 1;
                    if lines.get(i).is_some_and(|next| next.contains("---")) {
                        i += 1;
                    }
                }
                TableState::InTable => {
                    out.push("<tr>".to_string());
                    for cell in split_cells(line) {
                        out.push(format!("<td>{}</td>", format_inline(cell)));
                    }
                    out.push("</tr>".to_string());
                    i += 1;
                }
            }
            continue;
        }

        if is_unordered_item(line) {
            if i == 0 || !is_unordered_item(lines[i - 1].trim()) {
                out.push("<ul>".to_string());
            }
            out.push(format!("<li>{}</li>", format_inline(&line[2..])));
            if !lines.get(i + 1).is_some_and(|next| is_unordered_item(next.trim())) {
                out.push("</ul>".to_string());
            }
            i += 1;
            continue;
        }

        if let Some(item) = ordered_item_text(line) {
            if i == 0 || ordered_item_text(lines[i - 1].trim()).is_none() {
                out.push("<ol>".to_string());
            }
            out.push(format!("<li>{}</li>", format_inline(item)));
            if !lines
                .get(i + 1)
                .is_some_and(|next| ordered_item_text(next.trim()).is_some())
            {
                out.push("</ol>".to_string());
            }
            i += 1;
            continue;
        }

        out.push(format!("<p>{}</p>", format_inline(line)));
        i += 1;
    }

    close_table(&mut out, &mut state);

    out.join("\n")
}

fn close_table(out: &mut Vec<String>, state: &mut TableState) {
    if *state == TableState::InTable {
        out.push("</tbody>".to_string());
        out.push("</table>".to_string());
        *state = TableState::Outside;
    }
}

/// Parse `# `..`#### ` prefixes. Returns the heading level and the text.
fn heading_of(line: &str) -> Option<(usize, &str)> {
    for level in (1..=4).rev() {
        let prefix = &"#### "[4 - level..];
        if let Some(text) = line.strip_prefix(prefix) {
            return Some((level, text));
        }
    }
    None
}

/// Split `| a | b | c |` into trimmed cell texts, dropping the empty
/// fragments outside the outer pipes.
fn split_cells(line: &str) -> Vec<&str> {
    let cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.len() <= 2 {
        return Vec::new();
    }
    cells[1..cells.len() - 1].to_vec()
}

fn is_unordered_item(line: &str) -> bool {
    line.starts_with("* ") || line.starts_with("- ")
}

fn ordered_item_text(line: &str) -> Option<&str> {
    ORDERED_ITEM.find(line).map(|m| &line[m.end()..])
}
