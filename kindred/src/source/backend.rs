//! Collaborator traits implemented by catalogue sources.

use crate::cancellation::CancellationToken;
use crate::discovery::DiscoveryOutcome;
use crate::errors::{BackendError, DiscoveryError};
use crate::model::{DiscoveryRequest, FilterList, Work, WorkPage};
use crate::stream::DiscoverySink;
use async_trait::async_trait;
use std::sync::Arc;

/// A searchable catalogue backend.
///
/// Given a query string and a 1-based page number, returns one page of
/// matching works plus a has-more flag. Transport, retries and response
/// parsing all live behind this trait.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Searches the catalogue for works matching `query`.
    async fn search(
        &self,
        query: &str,
        page: u32,
        filters: &FilterList,
    ) -> Result<WorkPage, BackendError>;
}

/// A source-supplied discovery routine that replaces the engine's keyword
/// search entirely.
///
/// The override drives the caller's sink through the same push protocol the
/// engine uses, so consumers cannot tell the strategies apart.
#[async_trait]
pub trait RelatedOverride: Send + Sync {
    /// Runs the source's own related-title discovery.
    async fn discover(
        &self,
        request: &DiscoveryRequest,
        sink: Arc<dyn DiscoverySink>,
        cancel: Arc<CancellationToken>,
    ) -> Result<DiscoveryOutcome, DiscoveryError>;
}

/// A fixed, ready-made related list provided by the source.
#[async_trait]
pub trait ExtensionList: Send + Sync {
    /// Returns the source's related works for the requested work.
    async fn related_works(&self, request: &DiscoveryRequest) -> Result<Vec<Work>, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_automock_search_backend() {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_search()
            .withf(|query, page, filters| query == "great" && *page == 1 && filters.is_empty())
            .returning(|_, _, _| {
                Ok(WorkPage::new(vec![Work::new("/series/1", "Great")], false))
            });

        let page = backend
            .search("great", 1, &FilterList::new())
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_automock_search_backend_failure() {
        let mut backend = MockSearchBackend::new();
        backend
            .expect_search()
            .returning(|query, page, _| Err(BackendError::new(query, "boom").with_page(page)));

        let err = backend
            .search("adventure", 2, &FilterList::new())
            .await
            .unwrap_err();
        assert_eq!(err.page, 2);
    }
}
