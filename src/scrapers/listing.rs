//! HTML listing-page scraper.
//!
//! Extracts stories from a news listing page whose markup nests story blocks
//! under a fixed container path. The path is supplied as configuration (see
//! [`crate::config::DEFAULT_STORY_SELECTOR`]) so a site redesign is a config
//! change, not a rebuild.
//!
//! Each story block is expected to contain a linked headline (`h3 a`) and a
//! `time` label. A block missing any of these is skipped with a warning; the
//! remaining blocks are still extracted. Only whole-page retrieval failures
//! abort the scrape.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, info, instrument, warn};

use crate::error::{NewswatchError, Result};
use crate::models::Story;
use crate::scrapers::NewsSource;

/// Connect/read timeout for the listing page retrieval.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// User-Agent string for scrape requests.
const USER_AGENT: &str = concat!("newswatch/", env!("CARGO_PKG_VERSION"));

/// Scraper for an HTML news listing page.
pub struct ListingScraper {
    page_url: String,
    story_selector: Selector,
    headline_selector: Selector,
    time_selector: Selector,
    client: Client,
}

impl ListingScraper {
    /// Create a scraper for `page_url`, locating story blocks with the given
    /// CSS selector path.
    ///
    /// Fails if the selector path is not valid CSS or the HTTP client cannot
    /// be constructed.
    pub fn new(page_url: &str, story_selector: &str) -> Result<Self> {
        let story_selector = Selector::parse(story_selector).map_err(|e| {
            NewswatchError::extraction(format!("invalid story selector {story_selector:?}: {e}"))
        })?;
        // These are fixed sub-paths within a story block, not configuration.
        let headline_selector = Selector::parse("h3 a")
            .map_err(|e| NewswatchError::extraction(format!("headline selector: {e}")))?;
        let time_selector = Selector::parse("time")
            .map_err(|e| NewswatchError::extraction(format!("time selector: {e}")))?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(FETCH_TIMEOUT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| {
                NewswatchError::source_unavailable(page_url, format!("client build failed: {e}"))
            })?;

        Ok(Self {
            page_url: page_url.to_string(),
            story_selector,
            headline_selector,
            time_selector,
            client,
        })
    }

    /// Extract one story from a block, or `None` if a required sub-element
    /// (linked headline or time label) is absent.
    fn extract_story(&self, block: scraper::ElementRef<'_>) -> Option<Story> {
        let headline = block.select(&self.headline_selector).next()?;
        let title = headline.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            return None;
        }
        let href = headline.value().attr("href")?;

        let time_label = block.select(&self.time_selector).next()?;
        let time = time_label.text().collect::<String>().trim().to_string();

        Some(Story {
            title,
            time,
            url: join_url(&self.page_url, href),
        })
    }
}

#[async_trait]
impl NewsSource for ListingScraper {
    #[instrument(level = "info", skip_all, fields(page_url = %self.page_url))]
    async fn scrape(&self) -> Result<Vec<Story>> {
        let response = self
            .client
            .get(&self.page_url)
            .send()
            .await
            .map_err(|e| NewswatchError::source_unavailable(&self.page_url, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(NewswatchError::source_unavailable(
                &self.page_url,
                format!("HTTP {status}"),
            ));
        }

        let html = response
            .text()
            .await
            .map_err(|e| NewswatchError::source_unavailable(&self.page_url, e.to_string()))?;

        let document = Html::parse_document(&html);
        let mut stories = Vec::new();
        let mut skipped = 0usize;

        for block in document.select(&self.story_selector) {
            match self.extract_story(block) {
                Some(story) => {
                    debug!(title = %story.title, "Extracted story");
                    stories.push(story);
                }
                None => {
                    skipped += 1;
                    warn!("Skipping malformed story block (missing headline, link, or time)");
                }
            }
        }

        info!(
            count = stories.len(),
            skipped,
            "Scraped listing page"
        );
        Ok(stories)
    }
}

/// Join a relative story link onto the base page address.
///
/// One trailing separator is stripped from the base and one leading
/// separator from the path, so the result always has exactly one `/`
/// between them.
fn join_url(base: &str, href: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), href.trim_start_matches('/'))
}
