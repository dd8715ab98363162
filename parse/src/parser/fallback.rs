//! Fallback synthesis for results that came out empty or mis-sized.

use ideagen_core::{FlatResult, ThematicResult};

use crate::report::FallbackStage;

/// Splits a flat item list into up to three synthetic themes.
///
/// The first two themes take `chunk_size` items each; the third takes the
/// rest. Empty chunks are not emitted.
pub fn repartition<T>(
    items: Vec<T>,
    chunk_size: usize,
    names: [&'static str; 3],
) -> ThematicResult<T> {
    let chunk_size = chunk_size.max(1);
    let mut result = ThematicResult::new();

    for (index, item) in items.into_iter().enumerate() {
        let chunk = (index / chunk_size).min(names.len() - 1);
        result.push(names[chunk], item);
    }

    result
}

/// Builds the last-resort single-theme result.
pub fn floor<T>(theme: &str, items: Vec<T>) -> ThematicResult<T> {
    let mut result = ThematicResult::new();
    for item in items {
        result.push(theme, item);
    }
    result
}

/// Pads with `placeholder` or truncates so the list has exactly `count`
/// items.
pub fn fit_flat(mut items: Vec<String>, count: usize, placeholder: &str) -> (FlatResult, FallbackStage) {
    let stage = if items.len() < count {
        items.resize(count, placeholder.to_string());
        FallbackStage::Padded
    } else if items.len() > count {
        items.truncate(count);
        FallbackStage::Truncated
    } else {
        FallbackStage::None
    };
    (FlatResult::new(items), stage)
}
