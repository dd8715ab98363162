//! Raw response normalization.

use super::IndexedLine;

/// Normalizes line endings, trims every line and removes the Markdown
/// decoration models wrap around structural lines.
///
/// Only presentation markup is touched: leading `#` heading markers, `**`
/// emphasis, a leading `__…__` pair, and `*` bullets (rewritten to `-` so they classify as bullet
/// markers). Blank lines are kept because they close open items.
pub fn normalize_response(raw: &str) -> String {
    let replaced = raw.replace("\r\n", "\n").replace('\r', "\n");

    replaced
        .lines()
        .map(normalize_line)
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_line(line: &str) -> String {
    let mut text = line.trim();

    if text.starts_with('#') {
        let stripped = text.trim_start_matches('#');
        if stripped.is_empty() || stripped.starts_with(char::is_whitespace) {
            text = stripped.trim_start();
        }
    }

    let mut cleaned = text.replace("**", "");
    if let Some(inner) = cleaned.strip_prefix("__") {
        if let Some(end) = inner.find("__") {
            cleaned = format!("{}{}", &inner[..end], &inner[end + 2..]);
        }
    }
    if let Some(rest) = cleaned.strip_prefix("* ") {
        cleaned = format!("- {}", rest.trim_start());
    }

    cleaned.trim().to_string()
}

pub fn to_indexed_lines(normalized: &str) -> Vec<IndexedLine> {
    normalized
        .lines()
        .enumerate()
        .map(|(index, text)| IndexedLine {
            index,
            text: text.to_string(),
        })
        .collect()
}
