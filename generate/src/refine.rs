//! Building new runs on top of selected ideas.

use ideagen_core::{IdeaBundle, ItemText};

use crate::error::{GenerateError, Result};

/// Renders the refinement context for a selection of idea texts.
///
/// # Errors
///
/// Returns [`NoIdeasSelected`](GenerateError::NoIdeasSelected) if `ideas`
/// is empty.
///
/// # Examples
///
/// ```
/// use ideagen_generate::combine_selected_ideas;
///
/// let combined = combine_selected_ideas(&["Map first".into(), "Live board".into()]).unwrap();
/// assert_eq!(combined, "Build upon and expand these ideas:\n- Map first\n- Live board");
/// ```
pub fn combine_selected_ideas(ideas: &[String]) -> Result<String> {
    if ideas.is_empty() {
        return Err(GenerateError::NoIdeasSelected);
    }
    let lines: Vec<String> = ideas.iter().map(|idea| format!("- {idea}")).collect();
    Ok(format!("Build upon and expand these ideas:\n{}", lines.join("\n")))
}

/// Appends refinement context to the original challenge.
pub fn refine_challenge(original: &str, refine_from: &str) -> String {
    format!(
        "{original}\n\nBuild upon and refine this specific idea: {refine_from}\n\n\
         Generate new ideas that expand and deepen this concept, exploring it from different angles and contexts."
    )
}

/// Resolves idea identifiers (see [`IdeaBundle::ideas`]) to their idea
/// texts, in selection order.
///
/// # Errors
///
/// Returns [`UnknownIdea`](GenerateError::UnknownIdea) for the first
/// identifier not present in `bundle`.
pub fn selected_idea_texts(bundle: &IdeaBundle, ids: &[String]) -> Result<Vec<String>> {
    let ideas = bundle.ideas();
    ids.iter()
        .map(|id| {
            ideas
                .iter()
                .find(|(idea_id, _)| idea_id == id)
                .map(|(_, item)| item.idea_text())
                .ok_or_else(|| GenerateError::UnknownIdea(id.clone()))
        })
        .collect()
}
