//! The single entry point for related-title discovery.

use super::aggregator::{AggregatingSink, DiscoveryReport, ResultAggregator};
use super::orchestrator::{KeywordSearchOrchestrator, OrchestratorConfig};
use super::outcome::DiscoveryOutcome;
use super::strategy::{select_strategy, EmptyReason, Strategy};
use crate::cancellation::CancellationToken;
use crate::errors::{DiscoveryError, KeywordFailure};
use crate::keywords::{ExtractorConfig, KeywordExtractor};
use crate::model::{DiscoveryRequest, FilterList, Work};
use crate::source::{Capabilities, ExtensionList, RelatedOverride, SearchBackend};
use crate::stream::DiscoverySink;
use std::sync::Arc;
use tracing::{debug, info};

/// Label of the synthetic group emitted by the fixed-list strategy.
pub const EXTENSION_GROUP_LABEL: &str = "extension";

/// Applies the strategy for a source and drives the matching pipeline.
///
/// Stateless per invocation and idempotent: repeated calls with the same
/// work produce independent, uncached results.
#[derive(Clone)]
pub struct DiscoveryEngine {
    backend: Option<Arc<dyn SearchBackend>>,
    override_provider: Option<Arc<dyn RelatedOverride>>,
    extension_list: Option<Arc<dyn ExtensionList>>,
    capabilities: Capabilities,
    filters: FilterList,
    extractor: KeywordExtractor,
    orchestrator: KeywordSearchOrchestrator,
}

impl DiscoveryEngine {
    /// Starts building an engine.
    #[must_use]
    pub fn builder() -> DiscoveryEngineBuilder {
        DiscoveryEngineBuilder::new()
    }

    /// The capabilities the engine actually acts on: a capability flag only
    /// counts when the matching collaborator is attached.
    #[must_use]
    pub fn effective_capabilities(&self) -> Capabilities {
        Capabilities {
            custom_override: self.capabilities.custom_override
                && self.override_provider.is_some(),
            extension_list: self.capabilities.extension_list && self.extension_list.is_some(),
            keyword_fallback_disabled: self.capabilities.keyword_fallback_disabled,
            discovery_disabled: self.capabilities.discovery_disabled,
        }
    }

    /// Discovers works related to `work`, pushing incremental results to
    /// `sink` and returning the terminal outcome.
    ///
    /// The only error a caller ever sees is [`DiscoveryError::Unsupported`],
    /// raised synchronously before any backend call; per-keyword failures
    /// travel on the sink's error side channel.
    pub async fn discover_related(
        &self,
        work: &Work,
        sink: Arc<dyn DiscoverySink>,
        cancel: Arc<CancellationToken>,
    ) -> Result<DiscoveryOutcome, DiscoveryError> {
        let report = self.discover_related_report(work, sink, cancel).await?;
        Ok(report.outcome)
    }

    /// Like [`DiscoveryEngine::discover_related`], but also returns the
    /// final per-group snapshots, the flat cross-group deduplicated view,
    /// and the absorbed failures.
    pub async fn discover_related_report(
        &self,
        work: &Work,
        sink: Arc<dyn DiscoverySink>,
        cancel: Arc<CancellationToken>,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let request = DiscoveryRequest::new(work.clone()).with_filters(self.filters.clone());
        let strategy = select_strategy(&self.effective_capabilities());
        info!(
            run_id = %request.run_id,
            title = %request.work.title,
            strategy = ?strategy,
            "related discovery started"
        );

        let report = match strategy {
            Strategy::Empty {
                reason: EmptyReason::Disabled,
            } => {
                return Err(DiscoveryError::unsupported(
                    "related discovery is disabled for this source",
                ));
            }
            Strategy::Empty {
                reason: EmptyReason::NoCapability,
            } => {
                return Err(DiscoveryError::unsupported(
                    "no related discovery capability remains for this source",
                ));
            }
            Strategy::CustomOverride => self.run_custom_override(&request, sink, cancel).await?,
            Strategy::FixedList => self.run_fixed_list(&request, sink).await?,
            Strategy::KeywordSearch => self.run_keyword_search(&request, sink, cancel).await?,
        };

        debug!(
            run_id = %request.run_id,
            outcome = ?report.outcome,
            groups = report.groups.len(),
            works = report.all_works.len(),
            failures = report.failures.len(),
            "related discovery finished"
        );
        Ok(report)
    }

    /// Delegates to the source's own routine, passing its pushes through
    /// the aggregator unmodified otherwise.
    async fn run_custom_override(
        &self,
        request: &DiscoveryRequest,
        sink: Arc<dyn DiscoverySink>,
        cancel: Arc<CancellationToken>,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let provider = self
            .override_provider
            .as_ref()
            .ok_or_else(|| DiscoveryError::Internal("custom override not attached".to_string()))?;

        let aggregator = Arc::new(ResultAggregator::new(0));
        let wrapped = Arc::new(AggregatingSink::new(aggregator.clone(), sink));
        let outcome = provider.discover(request, wrapped, cancel).await?;
        Ok(aggregator.report(outcome))
    }

    /// Emits the source's fixed related list as one synthetic completed
    /// group. A failing list provider is absorbed like any other branch.
    async fn run_fixed_list(
        &self,
        request: &DiscoveryRequest,
        sink: Arc<dyn DiscoverySink>,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let provider = self
            .extension_list
            .as_ref()
            .ok_or_else(|| DiscoveryError::Internal("extension list not attached".to_string()))?;

        let aggregator = Arc::new(ResultAggregator::new(1));
        match provider.related_works(request).await {
            Ok(works) => {
                if let Some(update) = aggregator.record_page(EXTENSION_GROUP_LABEL, &works, true) {
                    sink.push_group(update).await;
                }
            }
            Err(err) => {
                let failure = KeywordFailure::new(EXTENSION_GROUP_LABEL, err.to_string());
                sink.record_error(EXTENSION_GROUP_LABEL, &failure);
                if let Some(update) = aggregator.record_failure(EXTENSION_GROUP_LABEL, failure) {
                    sink.push_group(update).await;
                }
            }
        }
        Ok(aggregator.report(DiscoveryOutcome::Completed))
    }

    /// Extracts keywords and fans out the bounded per-keyword searches.
    async fn run_keyword_search(
        &self,
        request: &DiscoveryRequest,
        sink: Arc<dyn DiscoverySink>,
        cancel: Arc<CancellationToken>,
    ) -> Result<DiscoveryReport, DiscoveryError> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            DiscoveryError::unsupported("keyword search requires a search backend")
        })?;

        let keywords = self.extractor.extract(&request.work.title);
        if keywords.is_empty() {
            // Not an error: a stripped-down title just has nothing to search.
            debug!(run_id = %request.run_id, "title yields no keywords");
            let aggregator = ResultAggregator::new(0);
            return Ok(aggregator.report(DiscoveryOutcome::Completed));
        }

        let aggregator = Arc::new(ResultAggregator::new(keywords.len()));
        let outcome = self
            .orchestrator
            .run(
                &keywords,
                backend.clone(),
                request.filters.clone(),
                aggregator.clone(),
                sink,
                cancel,
            )
            .await;
        Ok(aggregator.report(outcome))
    }
}

/// Builder for [`DiscoveryEngine`].
///
/// Attaching a collaborator also declares its capability flag, so most
/// callers only need `with_capabilities` for the two opt-out flags.
#[derive(Default)]
pub struct DiscoveryEngineBuilder {
    backend: Option<Arc<dyn SearchBackend>>,
    override_provider: Option<Arc<dyn RelatedOverride>>,
    extension_list: Option<Arc<dyn ExtensionList>>,
    capabilities: Capabilities,
    filters: FilterList,
    extractor_config: ExtractorConfig,
    orchestrator_config: OrchestratorConfig,
}

impl DiscoveryEngineBuilder {
    /// Creates a builder with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches the search backend used by the keyword-search strategy.
    #[must_use]
    pub fn with_backend(mut self, backend: Arc<dyn SearchBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attaches a custom override and declares its capability.
    #[must_use]
    pub fn with_override(mut self, provider: Arc<dyn RelatedOverride>) -> Self {
        self.override_provider = Some(provider);
        self.capabilities.custom_override = true;
        self
    }

    /// Attaches a fixed extension list and declares its capability.
    #[must_use]
    pub fn with_extension_list(mut self, provider: Arc<dyn ExtensionList>) -> Self {
        self.extension_list = Some(provider);
        self.capabilities.extension_list = true;
        self
    }

    /// Merges the opt-out flags of a source descriptor. The provider-backed
    /// flags stay tied to what is actually attached.
    #[must_use]
    pub fn with_capabilities(mut self, caps: Capabilities) -> Self {
        self.capabilities.keyword_fallback_disabled = caps.keyword_fallback_disabled;
        self.capabilities.discovery_disabled = caps.discovery_disabled;
        self
    }

    /// Sets the filters forwarded to every backend search.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterList) -> Self {
        self.filters = filters;
        self
    }

    /// Sets the keyword extraction configuration.
    #[must_use]
    pub fn with_extractor_config(mut self, config: ExtractorConfig) -> Self {
        self.extractor_config = config;
        self
    }

    /// Sets the fan-out configuration.
    #[must_use]
    pub fn with_orchestrator_config(mut self, config: OrchestratorConfig) -> Self {
        self.orchestrator_config = config;
        self
    }

    /// Builds the engine.
    pub fn build(self) -> Result<DiscoveryEngine, DiscoveryError> {
        let extractor = KeywordExtractor::new(self.extractor_config)?;
        Ok(DiscoveryEngine {
            backend: self.backend,
            override_provider: self.override_provider,
            extension_list: self.extension_list,
            capabilities: self.capabilities,
            filters: self.filters,
            extractor,
            orchestrator: KeywordSearchOrchestrator::new(self.orchestrator_config),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::{MockRelatedOverride, MockSearchBackend};
    use crate::stream::CollectingSink;

    #[test]
    fn test_builder_defaults() {
        let engine = DiscoveryEngine::builder().build().unwrap();
        let caps = engine.effective_capabilities();
        assert!(!caps.custom_override);
        assert!(!caps.extension_list);
        assert!(!caps.discovery_disabled);
    }

    #[test]
    fn test_attaching_override_declares_capability() {
        let engine = DiscoveryEngine::builder()
            .with_override(Arc::new(MockRelatedOverride::new("custom", Vec::new())))
            .build()
            .unwrap();
        assert!(engine.effective_capabilities().custom_override);
    }

    #[test]
    fn test_capability_flag_without_provider_is_inert() {
        // with_capabilities only carries the opt-out flags.
        let engine = DiscoveryEngine::builder()
            .with_capabilities(Capabilities::new().with_custom_override())
            .build()
            .unwrap();
        assert!(!engine.effective_capabilities().custom_override);
    }

    #[tokio::test]
    async fn test_disabled_source_is_unsupported() {
        let backend = Arc::new(MockSearchBackend::new());
        let engine = DiscoveryEngine::builder()
            .with_backend(backend.clone())
            .with_capabilities(Capabilities::new().disabled())
            .build()
            .unwrap();

        let err = engine
            .discover_related(
                &Work::new("/x", "Some Title"),
                Arc::new(CollectingSink::new()),
                Arc::new(CancellationToken::new()),
            )
            .await
            .unwrap_err();

        assert!(err.is_unsupported());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_keyword_search_without_backend_is_unsupported() {
        let engine = DiscoveryEngine::builder().build().unwrap();
        let err = engine
            .discover_related(
                &Work::new("/x", "Some Title"),
                Arc::new(CollectingSink::new()),
                Arc::new(CancellationToken::new()),
            )
            .await
            .unwrap_err();
        assert!(err.is_unsupported());
    }

    #[tokio::test]
    async fn test_empty_title_completes_with_zero_groups() {
        let backend = Arc::new(MockSearchBackend::new());
        let engine = DiscoveryEngine::builder()
            .with_backend(backend.clone())
            .build()
            .unwrap();

        let sink = Arc::new(CollectingSink::new());
        let report = engine
            .discover_related_report(
                &Work::new("/x", "Vol. 3"),
                sink.clone(),
                Arc::new(CancellationToken::new()),
            )
            .await
            .unwrap();

        assert!(report.outcome.is_completed());
        assert!(report.groups.is_empty());
        assert_eq!(backend.call_count(), 0);
        assert!(sink.is_empty());
    }
}
