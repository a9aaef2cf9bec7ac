//! Pipeline orchestrator: scrape, filter, dispatch.
//!
//! One `process` call drives the whole run. The source and channel are
//! injected behind their traits, so the same orchestrator serves every
//! source/channel combination; only the dispatch policy varies behavior.

use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::error::Result;
use crate::filter::filter_stories;
use crate::notify::NotificationChannel;
use crate::scrapers::NewsSource;

/// How the orchestrator walks the filtered stories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DispatchPolicy {
    /// Attempt every filtered story regardless of individual outcomes.
    #[default]
    Exhaustive,
    /// Stop permanently after the first accepted send; remaining stories
    /// are skipped for this run.
    FirstSuccess,
}

/// Counters from one pipeline run, for caller-side logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Stories extracted from the source page.
    pub scraped: usize,
    /// Stories retained by the keyword filter.
    pub matched: usize,
    /// Send attempts made (may be fewer than `matched` under
    /// [`DispatchPolicy::FirstSuccess`]).
    pub attempted: usize,
    /// Send attempts the provider accepted.
    pub accepted: usize,
}

/// Composes a content source, the keyword filter, and a notification
/// channel under a dispatch policy.
pub struct Processor {
    source: Box<dyn NewsSource>,
    channel: Box<dyn NotificationChannel>,
    policy: DispatchPolicy,
}

impl Processor {
    pub fn new(
        source: Box<dyn NewsSource>,
        channel: Box<dyn NotificationChannel>,
        policy: DispatchPolicy,
    ) -> Self {
        Self {
            source,
            channel,
            policy,
        }
    }

    /// Run the pipeline once: scrape, filter with `keywords`, dispatch each
    /// match in order.
    ///
    /// A scrape failure aborts the call before the filter runs and
    /// propagates to the caller so operational monitoring can detect
    /// source-format drift. Channel rejections never abort: each one is
    /// logged and counted.
    #[instrument(level = "info", skip_all, fields(channel = self.channel.name(), policy = ?self.policy))]
    pub async fn process(&self, keywords: &[String]) -> Result<RunSummary> {
        let stories = self.source.scrape().await?;
        let matched = filter_stories(&stories, keywords);
        info!(
            scraped = stories.len(),
            matched = matched.len(),
            "Dispatching matched stories"
        );

        let mut summary = RunSummary {
            scraped: stories.len(),
            matched: matched.len(),
            attempted: 0,
            accepted: 0,
        };

        for story in &matched {
            summary.attempted += 1;
            let accepted = self.channel.send(story).await;
            if accepted {
                summary.accepted += 1;
                info!(title = %story.title, "Story dispatched");
                if self.policy == DispatchPolicy::FirstSuccess {
                    info!(
                        attempted = summary.attempted,
                        remaining = matched.len() - summary.attempted,
                        "First send accepted; stopping for this run"
                    );
                    break;
                }
            } else {
                warn!(title = %story.title, "Story dispatch rejected");
            }
        }

        if summary.matched > 0 && summary.accepted == 0 {
            error!(
                matched = summary.matched,
                "No matched story was accepted by the channel"
            );
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NewswatchError;
    use crate::models::Story;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct StubSource {
        stories: Vec<Story>,
        fail: bool,
    }

    #[async_trait]
    impl NewsSource for StubSource {
        async fn scrape(&self) -> Result<Vec<Story>> {
            if self.fail {
                return Err(NewswatchError::source_unavailable(
                    "https://example.com/news",
                    "connection refused",
                ));
            }
            Ok(self.stories.clone())
        }
    }

    /// Channel that replies from a scripted outcome list and records every
    /// attempted title into a shared log.
    #[derive(Clone)]
    struct ScriptedChannel {
        outcomes: Vec<bool>,
        attempted: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedChannel {
        fn new(outcomes: &[bool]) -> Self {
            Self {
                outcomes: outcomes.to_vec(),
                attempted: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl NotificationChannel for ScriptedChannel {
        async fn send(&self, story: &Story) -> bool {
            let mut attempted = self.attempted.lock().unwrap();
            let n = attempted.len();
            attempted.push(story.title.clone());
            self.outcomes.get(n).copied().unwrap_or(false)
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    fn stories() -> Vec<Story> {
        [
            "Company X declares bonus issue",
            "Company Y quarterly results",
            "Company Z stock split announced",
        ]
        .iter()
        .map(|t| Story {
            title: t.to_string(),
            time: "1 hour ago".to_string(),
            url: format!("https://example.com/{}", t.len()),
        })
        .collect()
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn processor_with(
        stories: Vec<Story>,
        channel: &ScriptedChannel,
        policy: DispatchPolicy,
    ) -> Processor {
        Processor::new(
            Box::new(StubSource {
                stories,
                fail: false,
            }),
            Box::new(channel.clone()),
            policy,
        )
    }

    #[tokio::test]
    async fn test_exhaustive_attempts_every_story() {
        let channel = ScriptedChannel::new(&[true, false, true]);
        let processor = processor_with(stories(), &channel, DispatchPolicy::Exhaustive);

        let summary = processor.process(&kw(&["company"])).await.unwrap();

        assert_eq!(summary.matched, 3);
        assert_eq!(summary.attempted, 3);
        assert_eq!(summary.accepted, 2);
        assert_eq!(channel.attempted.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_first_success_stops_after_first_accepted_send() {
        // First send fails, second succeeds; the third must never be tried.
        let channel = ScriptedChannel::new(&[false, true, true]);
        let processor = processor_with(stories(), &channel, DispatchPolicy::FirstSuccess);

        let summary = processor.process(&kw(&["company"])).await.unwrap();

        assert_eq!(summary.matched, 3);
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.accepted, 1);

        let attempted = channel.attempted.lock().unwrap();
        assert_eq!(attempted.len(), 2);
        assert_eq!(attempted[0], "Company X declares bonus issue");
        assert_eq!(attempted[1], "Company Y quarterly results");
    }

    #[tokio::test]
    async fn test_scrape_failure_aborts_before_dispatch() {
        let channel = ScriptedChannel::new(&[true]);
        let processor = Processor::new(
            Box::new(StubSource {
                stories: vec![],
                fail: true,
            }),
            Box::new(channel.clone()),
            DispatchPolicy::Exhaustive,
        );

        let err = processor.process(&kw(&["company"])).await.unwrap_err();
        assert!(matches!(err, NewswatchError::SourceUnavailable { .. }));
        assert!(channel.attempted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_end_to_end_filtering_through_process() {
        let channel = ScriptedChannel::new(&[true, true]);
        let processor = processor_with(stories(), &channel, DispatchPolicy::Exhaustive);

        let summary = processor.process(&kw(&["bonus", "split"])).await.unwrap();

        assert_eq!(summary.scraped, 3);
        assert_eq!(summary.matched, 2);
        let attempted = channel.attempted.lock().unwrap();
        assert_eq!(
            *attempted,
            vec![
                "Company X declares bonus issue".to_string(),
                "Company Z stock split announced".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_no_keywords_means_no_dispatch() {
        let channel = ScriptedChannel::new(&[true]);
        let processor = processor_with(stories(), &channel, DispatchPolicy::Exhaustive);

        let summary = processor.process(&[]).await.unwrap();
        assert_eq!(summary.matched, 0);
        assert_eq!(summary.attempted, 0);
        assert!(channel.attempted.lock().unwrap().is_empty());
    }
}
