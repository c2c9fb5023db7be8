//! Scripted mock collaborators.
//!
//! Unlike generated mocks, these are scriptable per query and page, count
//! their calls, and can trip a cancellation token mid-run, which is what
//! the orchestration tests need.

use crate::cancellation::CancellationToken;
use crate::discovery::DiscoveryOutcome;
use crate::errors::{BackendError, DiscoveryError};
use crate::model::{DiscoveryRequest, FilterList, Work, WorkPage};
use crate::source::{ExtensionList, RelatedOverride, SearchBackend};
use crate::stream::{DiscoverySink, GroupUpdate};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// A search backend scripted per query.
///
/// Each query maps to an ordered list of page results; page N serves the
/// N-th entry. Unscripted queries and pages past the script return an
/// empty terminal page.
#[derive(Default)]
pub struct MockSearchBackend {
    scripts: RwLock<HashMap<String, Vec<Result<WorkPage, BackendError>>>>,
    calls: RwLock<Vec<(String, u32)>>,
    call_count: AtomicUsize,
    cancel_after_first_call: Option<Arc<CancellationToken>>,
}

impl MockSearchBackend {
    /// Creates an unscripted backend (every search returns an empty page).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels the given token once the first search call has been served.
    #[must_use]
    pub fn with_cancel_after_first_call(mut self, token: Arc<CancellationToken>) -> Self {
        self.cancel_after_first_call = Some(token);
        self
    }

    /// Scripts the page results for a query.
    pub fn script(&self, query: &str, pages: Vec<Result<WorkPage, BackendError>>) {
        self.scripts.write().insert(query.to_string(), pages);
    }

    /// Total number of search calls served.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every `(query, page)` pair served, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.read().clone()
    }

    /// Resets call bookkeeping, keeping the scripts.
    pub fn reset(&self) {
        self.call_count.store(0, Ordering::SeqCst);
        self.calls.write().clear();
    }
}

#[async_trait]
impl SearchBackend for MockSearchBackend {
    async fn search(
        &self,
        query: &str,
        page: u32,
        _filters: &FilterList,
    ) -> Result<WorkPage, BackendError> {
        let call_index = self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.write().push((query.to_string(), page));

        let result = self
            .scripts
            .read()
            .get(query)
            .and_then(|pages| pages.get(page as usize - 1).cloned())
            .unwrap_or_else(|| Ok(WorkPage::empty()));

        if call_index == 0 {
            if let Some(ref token) = self.cancel_after_first_call {
                token.cancel("scripted cancellation");
            }
        }

        result
    }
}

/// A custom-override collaborator that pushes one scripted group.
pub struct MockRelatedOverride {
    label: String,
    works: Vec<Work>,
    outcome: DiscoveryOutcome,
    call_count: AtomicUsize,
}

impl MockRelatedOverride {
    /// Creates an override that pushes `works` under `label` and completes.
    #[must_use]
    pub fn new(label: impl Into<String>, works: Vec<Work>) -> Self {
        Self {
            label: label.into(),
            works,
            outcome: DiscoveryOutcome::Completed,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Sets the outcome the override reports.
    #[must_use]
    pub fn with_outcome(mut self, outcome: DiscoveryOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Number of times the override ran.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RelatedOverride for MockRelatedOverride {
    async fn discover(
        &self,
        _request: &DiscoveryRequest,
        sink: Arc<dyn DiscoverySink>,
        _cancel: Arc<CancellationToken>,
    ) -> Result<DiscoveryOutcome, DiscoveryError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        sink.push_group(GroupUpdate::new(
            self.label.clone(),
            self.works.clone(),
            true,
        ))
        .await;
        Ok(self.outcome)
    }
}

/// An extension-provided fixed list, optionally scripted to fail.
#[derive(Default)]
pub struct MockExtensionList {
    works: Vec<Work>,
    error: Option<BackendError>,
    call_count: AtomicUsize,
}

impl MockExtensionList {
    /// Creates a list provider returning `works`.
    #[must_use]
    pub fn new(works: Vec<Work>) -> Self {
        Self {
            works,
            error: None,
            call_count: AtomicUsize::new(0),
        }
    }

    /// Makes the provider fail instead.
    #[must_use]
    pub fn failing(error: BackendError) -> Self {
        Self {
            works: Vec::new(),
            error: Some(error),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Number of times the list was requested.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExtensionList for MockExtensionList {
    async fn related_works(&self, _request: &DiscoveryRequest) -> Result<Vec<Work>, BackendError> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        match self.error {
            Some(ref err) => Err(err.clone()),
            None => Ok(self.works.clone()),
        }
    }
}
