//! Data model for extracted news stories.
//!
//! A [`Story`] is the transport record of the whole pipeline: produced by a
//! content source during one scrape, reduced by the keyword filter, and
//! consumed by a notification channel. Stories carry no identity beyond
//! their field values and are discarded once dispatch finishes.

use serde::{Deserialize, Serialize};

/// A single news item extracted from a listing page.
///
/// The `time` field is kept exactly as rendered by the source page (for
/// example `"2 hours ago"` or `"Aug 30, 2026, 09:14 AM IST"`); no parsing
/// or normalization is applied. The `url` is always absolute: the scraper
/// joins the configured base address with the relative link found on the
/// page, so consumers never need to resolve it further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Story {
    /// The headline as displayed on the source page.
    pub title: String,
    /// Free-text timestamp exactly as rendered by the source.
    pub time: String,
    /// Absolute address of the story.
    pub url: String,
}
