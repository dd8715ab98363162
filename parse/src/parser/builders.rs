//! Item builders.
//!
//! Every response kind shares one scanning engine; what differs is how the
//! lines of one item turn into a value. A builder receives the stripped lead
//! text of an item, zero or more continuation lines, and a final
//! `finish_item` call that either yields the item or drops it.

use ideagen_core::{FeatureIdea, LayoutIdea, Statement};

use super::statement::normalize_statement;

/// Strategy for turning the lines of one item into a value.
pub trait ItemBuilder {
    type Item;

    /// Opens a new item with its lead text. Any previous item must already
    /// have been finished.
    fn start_item(&mut self, text: &str);

    /// Extends the open item. Ignored when no item is open.
    fn continue_item(&mut self, text: &str);

    /// Closes the open item. Returns `None` when nothing was open or the
    /// item had no usable content.
    fn finish_item(&mut self) -> Option<Self::Item>;

    /// Returns `true` when an item is open and wants continuation lines.
    fn accepts_continuation(&self) -> bool;

    /// Returns `true` when an item is open.
    fn is_open(&self) -> bool;
}

/// Single-line statements. Never accepts continuation lines, so every line
/// inside a theme is its own statement.
#[derive(Debug, Default)]
pub struct StatementBuilder {
    pending: Option<String>,
}

impl ItemBuilder for StatementBuilder {
    type Item = Statement;

    fn start_item(&mut self, text: &str) {
        self.pending = Some(text.to_string());
    }

    fn continue_item(&mut self, _text: &str) {}

    fn finish_item(&mut self) -> Option<Statement> {
        normalize_statement(&self.pending.take()?)
    }

    fn accepts_continuation(&self) -> bool {
        false
    }

    fn is_open(&self) -> bool {
        self.pending.is_some()
    }
}

/// Title plus space-joined body, shared by the multi-field shapes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct Fields {
    title: String,
    body: String,
}

impl Fields {
    fn new(title: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            body: String::new(),
        }
    }

    fn push(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        // A bare marker line ("1.") leaves the title empty; the next line names it
        if self.title.is_empty() {
            self.title = text.to_string();
            return;
        }
        if !self.body.is_empty() {
            self.body.push(' ');
        }
        self.body.push_str(text);
    }
}

/// Title and free-text description.
#[derive(Debug, Default)]
pub struct LayoutBuilder {
    open: Option<Fields>,
}

impl ItemBuilder for LayoutBuilder {
    type Item = LayoutIdea;

    fn start_item(&mut self, text: &str) {
        self.open = Some(Fields::new(text));
    }

    fn continue_item(&mut self, text: &str) {
        if let Some(fields) = self.open.as_mut() {
            fields.push(text);
        }
    }

    fn finish_item(&mut self) -> Option<LayoutIdea> {
        let fields = self.open.take()?;
        if fields.title.is_empty() {
            return None;
        }
        Some(LayoutIdea::new(fields.title, fields.body))
    }

    fn accepts_continuation(&self) -> bool {
        self.open.is_some()
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

/// Feature name and rationale.
///
/// When the rationale was written inline (`Live tracker. Shows wait times`),
/// the first sentence is the name and the rest is the rationale.
#[derive(Debug, Default)]
pub struct FeatureBuilder {
    open: Option<Fields>,
}

impl ItemBuilder for FeatureBuilder {
    type Item = FeatureIdea;

    fn start_item(&mut self, text: &str) {
        self.open = Some(Fields::new(text));
    }

    fn continue_item(&mut self, text: &str) {
        if let Some(fields) = self.open.as_mut() {
            fields.push(text);
        }
    }

    fn finish_item(&mut self) -> Option<FeatureIdea> {
        let Fields { title, body } = self.open.take()?;

        let (name, rationale) = if body.is_empty() {
            match title.split_once(". ") {
                Some((name, rest)) => (name.to_string(), rest.trim().to_string()),
                None => (title, String::new()),
            }
        } else {
            (title, body)
        };

        let name = name.trim().trim_end_matches('.').trim();
        if name.is_empty() {
            return None;
        }
        Some(FeatureIdea::new(name, rationale))
    }

    fn accepts_continuation(&self) -> bool {
        self.open.is_some()
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }
}

/// One string per item (sketch prompts and sketch concepts).
///
/// A multi-line builder joins continuation lines with spaces; a single-line
/// builder closes every item on its own line.
#[derive(Debug)]
pub struct TextBuilder {
    open: Option<String>,
    multi_line: bool,
}

impl TextBuilder {
    pub fn multi_line() -> Self {
        Self {
            open: None,
            multi_line: true,
        }
    }

    pub fn single_line() -> Self {
        Self {
            open: None,
            multi_line: false,
        }
    }
}

impl ItemBuilder for TextBuilder {
    type Item = String;

    fn start_item(&mut self, text: &str) {
        self.open = Some(text.trim().to_string());
    }

    fn continue_item(&mut self, text: &str) {
        let text = text.trim();
        if let Some(open) = self.open.as_mut() {
            if text.is_empty() {
                return;
            }
            if !open.is_empty() {
                open.push(' ');
            }
            open.push_str(text);
        }
    }

    fn finish_item(&mut self) -> Option<String> {
        self.open.take().filter(|text| !text.is_empty())
    }

    fn accepts_continuation(&self) -> bool {
        self.multi_line && self.open.is_some()
    }

    fn is_open(&self) -> bool {
        self.open.is_some()
    }
}
