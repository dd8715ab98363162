//! Statement normalization.

use ideagen_core::{CANONICAL_LEAD_IN, Statement};

use super::classify::{strip_item_marker, strip_token};

/// Lead-in tokens stripped from the front of a statement, in order.
const LEAD_IN_TOKENS: [&str; 2] = ["how might we", "hmw"];

/// Canonicalizes a raw statement.
///
/// Repeatedly strips numbering, bullets, `HMW` and `How might we` from the
/// front, then one leading colon, and prefixes the remainder with
/// [`CANONICAL_LEAD_IN`]. The remainder keeps its case when the model wrote
/// the full lead-in itself; otherwise it is lower-cased. Returns `None` when
/// nothing is left.
///
/// Normalizing an already-normalized statement returns it unchanged.
pub fn normalize_statement(raw: &str) -> Option<Statement> {
    let mut text = raw.trim();
    let mut had_lead_in = false;

    loop {
        let stripped = strip_item_marker(text, false).or_else(|| {
            LEAD_IN_TOKENS.iter().find_map(|token| {
                let rest = strip_token(text, token)?;
                had_lead_in |= *token == LEAD_IN_TOKENS[0];
                Some(rest.trim())
            })
        });
        match stripped {
            Some(rest) if rest.len() < text.len() => text = rest,
            _ => break,
        }
    }

    let text = text.strip_prefix(':').unwrap_or(text).trim();
    if text.is_empty() {
        return None;
    }

    let remainder = if had_lead_in {
        text.to_string()
    } else {
        text.to_lowercase()
    };
    Some(Statement::new(format!("{CANONICAL_LEAD_IN} {remainder}")))
}
