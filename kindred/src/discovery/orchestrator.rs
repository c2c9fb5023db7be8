//! Fan-out search orchestration: one bounded, paged search unit per keyword.

use super::aggregator::ResultAggregator;
use super::outcome::DiscoveryOutcome;
use crate::cancellation::CancellationToken;
use crate::errors::KeywordFailure;
use crate::model::FilterList;
use crate::source::SearchBackend;
use crate::stream::DiscoverySink;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Tunables for the keyword fan-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Hard cap on pages fetched per keyword, bounding runaway pagination
    /// against a backend that always reports more pages.
    #[serde(default = "default_max_pages")]
    pub max_pages_per_keyword: u32,
}

fn default_max_pages() -> u32 {
    2
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            max_pages_per_keyword: default_max_pages(),
        }
    }
}

impl OrchestratorConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-keyword page cap.
    #[must_use]
    pub fn with_max_pages_per_keyword(mut self, max: u32) -> Self {
        self.max_pages_per_keyword = max.max(1);
        self
    }
}

/// Runs one independently scheduled search unit per keyword.
///
/// Failure isolation is the defining property here: a failing keyword
/// reports its error, completes its group with whatever it accumulated,
/// and never aborts its siblings.
#[derive(Debug, Clone, Default)]
pub struct KeywordSearchOrchestrator {
    config: OrchestratorConfig,
}

impl KeywordSearchOrchestrator {
    /// Creates an orchestrator.
    #[must_use]
    pub fn new(config: OrchestratorConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Fans out one search unit per keyword and waits for all of them.
    ///
    /// Updates for a single keyword are strictly ordered by page number;
    /// across keywords there is no ordering guarantee. An empty keyword set
    /// completes immediately with zero groups.
    pub async fn run(
        &self,
        keywords: &[String],
        backend: Arc<dyn SearchBackend>,
        filters: FilterList,
        aggregator: Arc<ResultAggregator>,
        sink: Arc<dyn DiscoverySink>,
        cancel: Arc<CancellationToken>,
    ) -> DiscoveryOutcome {
        if keywords.is_empty() {
            debug!("no keywords to search; completing with zero groups");
            return DiscoveryOutcome::Completed;
        }

        let max_pages = self.config.max_pages_per_keyword;
        let handles: Vec<_> = keywords
            .iter()
            .map(|keyword| {
                let keyword = keyword.clone();
                let backend = backend.clone();
                let filters = filters.clone();
                let aggregator = aggregator.clone();
                let sink = sink.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    search_keyword(&keyword, max_pages, backend, filters, aggregator, sink, cancel)
                        .await;
                })
            })
            .collect();

        for result in futures::future::join_all(handles).await {
            if let Err(join_error) = result {
                // A panicking unit is treated like a failed one; siblings
                // already ran to their own conclusion.
                warn!(error = %join_error, "keyword search unit aborted");
            }
        }

        if cancel.is_cancelled() {
            DiscoveryOutcome::Cancelled
        } else {
            DiscoveryOutcome::Completed
        }
    }
}

/// Pages one keyword's search stream to exhaustion, the page cap, failure
/// or cancellation, whichever comes first.
async fn search_keyword(
    keyword: &str,
    max_pages: u32,
    backend: Arc<dyn SearchBackend>,
    filters: FilterList,
    aggregator: Arc<ResultAggregator>,
    sink: Arc<dyn DiscoverySink>,
    cancel: Arc<CancellationToken>,
) {
    for page in 1..=max_pages {
        // Cancellation is observed before each request, never mid-page.
        if cancel.is_cancelled() {
            debug!(keyword = %keyword, page, "keyword search wound down by cancellation");
            return;
        }

        match backend.search(keyword, page, &filters).await {
            Ok(result) => {
                let capped = page == max_pages && result.has_next_page;
                let final_page = !result.has_next_page || page == max_pages;

                if let Some(update) = aggregator.record_page(keyword, &result.works, final_page) {
                    sink.push_group(update).await;
                }

                if capped {
                    debug!(
                        keyword = %keyword,
                        max_pages,
                        "page cap reached with more pages available"
                    );
                }
                if final_page {
                    return;
                }
            }
            Err(err) => {
                warn!(keyword = %keyword, page, error = %err, "keyword search failed");
                let failure = KeywordFailure::new(keyword, err.to_string()).with_page(page);
                sink.record_error(keyword, &failure);
                if let Some(update) = aggregator.record_failure(keyword, failure) {
                    sink.push_group(update).await;
                }
                return;
            }
        }
    }
}
