//! Theme aggregation.

use ideagen_core::ThematicResult;

/// Groups finished items under the active theme.
///
/// Themes are kept in first-seen order and never duplicated: re-opening a
/// known theme makes it active again and later items are appended to it.
/// An item finished before any header opens `implicit_theme`.
#[derive(Debug)]
pub struct ThemeAggregator<T> {
    result: ThematicResult<T>,
    active: Option<String>,
    implicit_theme: &'static str,
}

impl<T> ThemeAggregator<T> {
    pub fn new(implicit_theme: &'static str) -> Self {
        Self {
            result: ThematicResult::new(),
            active: None,
            implicit_theme,
        }
    }

    /// Opens (or re-opens) a theme and makes it active.
    pub fn open_theme(&mut self, name: &str) {
        self.result.open_theme(name);
        self.active = Some(name.to_string());
    }

    pub fn has_active_theme(&self) -> bool {
        self.active.is_some()
    }

    /// Appends an item to the active theme, opening the implicit theme first
    /// if no theme is active yet.
    pub fn add_item(&mut self, item: T) {
        let implicit = self.implicit_theme;
        let theme = self.active.get_or_insert_with(|| implicit.to_string());
        self.result.push(theme, item);
    }

    /// Finishes aggregation, dropping themes that never received an item.
    ///
    /// Returns the result and the number of dropped themes.
    pub fn finish(mut self) -> (ThematicResult<T>, usize) {
        let dropped = self.result.drop_empty_themes();
        (self.result, dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_implicit_theme_opens_on_first_item() {
        let mut aggregator = ThemeAggregator::new("Reframing");
        assert!(!aggregator.has_active_theme());
        aggregator.add_item("a");
        assert!(aggregator.has_active_theme());

        let (result, dropped) = aggregator.finish();
        assert_eq!(dropped, 0);
        assert_eq!(result.get("Reframing"), Some(&["a"][..]));
    }

    #[test]
    fn test_reopened_theme_appends_to_first_occurrence() {
        let mut aggregator = ThemeAggregator::new("Reframing");
        aggregator.open_theme("Access");
        aggregator.add_item("a");
        aggregator.open_theme("Safety");
        aggregator.add_item("b");
        aggregator.open_theme("Access");
        aggregator.add_item("c");

        let (result, _) = aggregator.finish();
        assert_eq!(
            result.theme_names().collect::<Vec<_>>(),
            vec!["Access", "Safety"]
        );
        assert_eq!(result.get("Access"), Some(&["a", "c"][..]));
    }

    #[test]
    fn test_empty_themes_are_dropped() {
        let mut aggregator: ThemeAggregator<&str> = ThemeAggregator::new("Reframing");
        aggregator.open_theme("Empty");
        aggregator.open_theme("Full");
        aggregator.add_item("x");

        let (result, dropped) = aggregator.finish();
        assert_eq!(dropped, 1);
        assert_eq!(result.theme_names().collect::<Vec<_>>(), vec!["Full"]);
    }
}
