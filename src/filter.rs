//! Keyword filter reducing scraped stories to the ones of interest.

use crate::models::Story;
use tracing::debug;

/// Keep the stories whose title contains any of the given keywords.
///
/// Matching is a case-insensitive substring test (keyword `"bonus"` matches
/// `"bonuses"`), not a word-boundary match. Relative order of the input is
/// preserved. An empty keyword list matches nothing, so the result is empty.
pub fn filter_stories(stories: &[Story], keywords: &[String]) -> Vec<Story> {
    let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();

    let matched: Vec<Story> = stories
        .iter()
        .filter(|story| {
            let title = story.title.to_lowercase();
            keywords.iter().any(|k| title.contains(k.as_str()))
        })
        .cloned()
        .collect();

    debug!(
        total = stories.len(),
        matched = matched.len(),
        "Filtered stories by keyword"
    );
    matched
}
