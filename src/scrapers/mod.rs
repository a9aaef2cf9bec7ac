//! Content sources that turn a remote page into a sequence of [`Story`] values.
//!
//! A source owns its base address and its retrieval mechanics; callers only
//! see the [`NewsSource`] contract. The one shipped implementation is
//! [`listing::ListingScraper`], which parses an HTML listing page through a
//! configurable selector path.
//!
//! Sources use:
//! - Per-item isolation: a malformed story block is logged and skipped,
//!   the remaining blocks are still extracted
//! - Explicit connect/read timeouts on every retrieval
//! - Propagation of whole-page retrieval failures to the pipeline

use async_trait::async_trait;

use crate::error::Result;
use crate::models::Story;

pub mod listing;

pub use listing::ListingScraper;

/// Pluggable content source for the pipeline.
#[async_trait]
pub trait NewsSource: Send + Sync {
    /// Retrieve the source page once and extract its stories.
    ///
    /// A retrieval failure (transport fault or non-success status) is an
    /// error; malformed individual story blocks are not.
    async fn scrape(&self) -> Result<Vec<Story>>;
}
