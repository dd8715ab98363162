//! Line classification.
//!
//! Decides, one trimmed line at a time, whether a line opens a theme,
//! starts an item, continues the open item, or carries nothing usable. The
//! rules are applied in a fixed priority order:
//!
//! 1. blank line
//! 2. theme header (explicit token, or the short `label:` heuristic)
//! 3. item marker (`1.`, `2)`, `•`, `-`, and `HMW`/`How might we` for
//!    statements)
//! 4. anything else, depending on the current [`LineMode`]
//!
//! The header heuristic accepts any short line with an early colon and no
//! digit before it, so ordinary prose such as `Budget: keep costs low`
//! becomes a theme named `keep costs low`. Because headers outrank markers,
//! `- Tip: go` and `HMW: improve shelter` open themes too. Numbered lines
//! never do, since the digit sits before the colon. Callers tolerate such
//! themes.

use regex::Regex;
use std::sync::LazyLock;

/// A header colon must fall within this many leading characters for the
/// heuristic header rule.
pub const HEADER_COLON_WINDOW: usize = 10;

/// Heuristic headers must be shorter than this many characters.
pub const HEADER_MAX_LEN: usize = 50;

static NUMERIC_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}[.)])(?:\D|$)").expect("static regex must compile"));

const BULLETS: [char; 3] = ['•', '-', '–'];

const STATEMENT_TOKENS: [&str; 2] = ["how might we", "hmw"];

/// Where the scanner currently is, as seen by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineMode {
    /// No theme has been opened and no item is accumulating.
    NoThemeYet,
    /// A theme is open but no item accepts continuation lines.
    InTheme,
    /// An item is open and accepts continuation lines.
    InItemBody,
}

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineClass<'a> {
    /// Opens (or re-opens) the named theme.
    ThemeHeader(&'a str),
    /// Starts a new item; the marker has been stripped.
    ItemStart(&'a str),
    /// Extends the open item.
    ItemContinuation(&'a str),
    /// Empty line; closes the open item.
    Blank,
    /// Non-empty line with nowhere to go (prose before any theme or item).
    Noise,
}

/// Per-kind classification rules.
#[derive(Debug, Clone, Copy)]
pub struct ClassifierRules {
    /// Case-insensitive prefixes that make a `…:` line an explicit header.
    pub header_tokens: &'static [&'static str],
    /// When `false`, header detection is skipped entirely (flat lists).
    pub detect_headers: bool,
    /// Treat `HMW` and `How might we` as item markers.
    pub statement_markers: bool,
}

impl ClassifierRules {
    /// Rules for flat lists: no headers, no statement markers.
    pub const FLAT: ClassifierRules = ClassifierRules {
        header_tokens: &[],
        detect_headers: false,
        statement_markers: false,
    };

    /// Returns a copy with header detection disabled.
    pub fn without_headers(self) -> Self {
        Self {
            detect_headers: false,
            ..self
        }
    }
}

/// Classifies one line (already trimmed) in the given mode.
pub fn classify_line<'a>(line: &'a str, mode: LineMode, rules: &ClassifierRules) -> LineClass<'a> {
    if line.is_empty() {
        return LineClass::Blank;
    }

    if rules.detect_headers {
        if let Some(name) = theme_header(line, rules) {
            return LineClass::ThemeHeader(name);
        }
    }

    if let Some(rest) = strip_item_marker(line, rules.statement_markers) {
        return LineClass::ItemStart(rest);
    }

    match mode {
        LineMode::InItemBody => LineClass::ItemContinuation(line),
        LineMode::InTheme => LineClass::ItemStart(line),
        LineMode::NoThemeYet => LineClass::Noise,
    }
}

/// Returns the theme name if `line` is a theme header.
///
/// The name is the text after the first colon. When nothing follows the
/// colon (`Accessibility:`), the text before it is used instead.
pub fn theme_header<'a>(line: &'a str, rules: &ClassifierRules) -> Option<&'a str> {
    let colon = line.find(':')?;
    let head = &line[..colon];
    let tail = line[colon + 1..].trim();

    let explicit = rules
        .header_tokens
        .iter()
        .any(|token| starts_with_ignore_case(line, token));

    let heuristic = !explicit
        && head.chars().count() < HEADER_COLON_WINDOW
        && !head.chars().any(|ch| ch.is_ascii_digit())
        && line.chars().count() < HEADER_MAX_LEN;

    if !explicit && !heuristic {
        return None;
    }

    let name = if tail.is_empty() { head.trim() } else { tail };
    if name.is_empty() { None } else { Some(name) }
}

/// Strips a leading item marker (and one following colon) from `line`.
///
/// Returns `None` if the line does not start with a recognized marker.
pub fn strip_item_marker(line: &str, statement_markers: bool) -> Option<&str> {
    let rest = if let Some(marker) = NUMERIC_MARKER.captures(line).and_then(|caps| caps.get(1)) {
        &line[marker.end()..]
    } else if let Some(rest) = strip_bullet(line) {
        rest
    } else if statement_markers {
        STATEMENT_TOKENS
            .iter()
            .find_map(|token| strip_token(line, token))?
    } else {
        return None;
    };

    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    Some(rest.trim())
}

fn strip_bullet(line: &str) -> Option<&str> {
    let first = line.chars().next()?;
    if !BULLETS.contains(&first) {
        return None;
    }
    let rest = &line[first.len_utf8()..];
    // "-5 degrees" and "--flag" are text, not bullets
    if first != '•' && !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest)
}

/// Strips `token` (case-insensitive) when it is followed by a word
/// boundary.
pub(crate) fn strip_token<'a>(line: &'a str, token: &str) -> Option<&'a str> {
    if !starts_with_ignore_case(line, token) {
        return None;
    }
    let rest = &line[token.len()..];
    if rest.chars().next().is_some_and(char::is_alphanumeric) {
        return None;
    }
    Some(rest)
}

pub(crate) fn starts_with_ignore_case(line: &str, prefix: &str) -> bool {
    line.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
