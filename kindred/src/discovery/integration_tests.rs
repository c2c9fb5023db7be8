//! End-to-end scenarios driving the engine through every strategy.

use super::*;
use crate::cancellation::CancellationToken;
use crate::errors::BackendError;
use crate::helpers::{MockExtensionList, MockRelatedOverride, MockSearchBackend};
use crate::model::{Work, WorkPage};
use crate::source::Capabilities;
use crate::stream::{ChannelSink, CollectingSink, StreamEvent};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn works(locators: &[&str]) -> Vec<Work> {
    locators.iter().map(|l| Work::new(*l, *l)).collect()
}

/// The worked example: "great" resolves five works on its only page,
/// "adventure" fails outright. The failed branch is absorbed, the overall
/// call still completes.
#[tokio::test]
async fn failed_keyword_does_not_abort_siblings() {
    let backend = Arc::new(MockSearchBackend::new());
    backend.script(
        "great",
        vec![Ok(WorkPage::new(
            works(&["/1", "/2", "/3", "/4", "/5"]),
            false,
        ))],
    );
    backend.script(
        "adventure",
        vec![Err(BackendError::new("adventure", "connection reset"))],
    );

    let engine = DiscoveryEngine::builder()
        .with_backend(backend.clone())
        .build()
        .unwrap();

    let sink = Arc::new(CollectingSink::new());
    let report = engine
        .discover_related_report(
            &Work::new("/origin", "Great Adventure"),
            sink.clone(),
            Arc::new(CancellationToken::new()),
        )
        .await
        .unwrap();

    assert!(report.outcome.is_completed());
    assert_eq!(report.groups.len(), 2);

    let great = sink.last_update_for("great").unwrap();
    assert!(great.completed);
    assert_eq!(great.works.len(), 5);

    let adventure = sink.last_update_for("adventure").unwrap();
    assert!(adventure.completed);
    assert!(adventure.works.is_empty());

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].keyword, "adventure");
    assert_eq!(report.all_works.len(), 5);
}

#[tokio::test]
async fn flat_view_dedups_across_groups() {
    let backend = Arc::new(MockSearchBackend::new());
    // Both keywords surface "/shared".
    backend.script(
        "great",
        vec![Ok(WorkPage::new(works(&["/shared", "/a"]), false))],
    );
    backend.script(
        "adventure",
        vec![Ok(WorkPage::new(works(&["/shared", "/b"]), false))],
    );

    let engine = DiscoveryEngine::builder()
        .with_backend(backend)
        .build()
        .unwrap();

    let report = engine
        .discover_related_report(
            &Work::new("/origin", "Great Adventure"),
            Arc::new(CollectingSink::new()),
            Arc::new(CancellationToken::new()),
        )
        .await
        .unwrap();

    // Groups keep their own copy; only the flat view merges.
    assert_eq!(report.total_group_works(), 4);
    assert_eq!(report.all_works.len(), 3);
}

#[tokio::test]
async fn custom_override_takes_precedence_over_everything_else() {
    let backend = Arc::new(MockSearchBackend::new());
    let override_provider = Arc::new(MockRelatedOverride::new("custom", works(&["/x"])));
    let extension = Arc::new(MockExtensionList::new(works(&["/y"])));

    let engine = DiscoveryEngine::builder()
        .with_backend(backend.clone())
        .with_override(override_provider.clone())
        .with_extension_list(extension.clone())
        .build()
        .unwrap();

    let sink = Arc::new(CollectingSink::new());
    let outcome = engine
        .discover_related(
            &Work::new("/origin", "Great Adventure"),
            sink.clone(),
            Arc::new(CancellationToken::new()),
        )
        .await
        .unwrap();

    assert!(outcome.is_completed());
    assert_eq!(override_provider.call_count(), 1);
    assert_eq!(extension.call_count(), 0);
    assert_eq!(backend.call_count(), 0);

    let update = sink.last_update_for("custom").unwrap();
    assert!(update.completed);
    assert_eq!(update.works.len(), 1);
}

#[tokio::test]
async fn fixed_list_emits_one_synthetic_completed_group() {
    let backend = Arc::new(MockSearchBackend::new());
    let extension = Arc::new(MockExtensionList::new(works(&["/y", "/z", "/y"])));

    let engine = DiscoveryEngine::builder()
        .with_backend(backend.clone())
        .with_extension_list(extension)
        .build()
        .unwrap();

    let sink = Arc::new(CollectingSink::new());
    let report = engine
        .discover_related_report(
            &Work::new("/origin", "Great Adventure"),
            sink.clone(),
            Arc::new(CancellationToken::new()),
        )
        .await
        .unwrap();

    assert!(report.outcome.is_completed());
    assert_eq!(backend.call_count(), 0);

    let update = sink.last_update_for(EXTENSION_GROUP_LABEL).unwrap();
    assert!(update.completed);
    // The duplicate "/y" entry is deduplicated by locator.
    assert_eq!(update.works.len(), 2);
    assert_eq!(sink.updates().len(), 1);
}

#[tokio::test]
async fn failing_fixed_list_is_absorbed() {
    let extension = Arc::new(MockExtensionList::failing(BackendError::new(
        "",
        "source offline",
    )));
    let engine = DiscoveryEngine::builder()
        .with_extension_list(extension)
        .build()
        .unwrap();

    let sink = Arc::new(CollectingSink::new());
    let report = engine
        .discover_related_report(
            &Work::new("/origin", "Great Adventure"),
            sink.clone(),
            Arc::new(CancellationToken::new()),
        )
        .await
        .unwrap();

    assert!(report.outcome.is_completed());
    assert_eq!(report.failures.len(), 1);
    let update = sink.last_update_for(EXTENSION_GROUP_LABEL).unwrap();
    assert!(update.completed);
    assert!(update.works.is_empty());
}

#[tokio::test]
async fn opted_out_fallback_is_unsupported_with_zero_backend_calls() {
    let backend = Arc::new(MockSearchBackend::new());
    let engine = DiscoveryEngine::builder()
        .with_backend(backend.clone())
        .with_capabilities(Capabilities::new().without_keyword_fallback())
        .build()
        .unwrap();

    let err = engine
        .discover_related(
            &Work::new("/origin", "Great Adventure"),
            Arc::new(CollectingSink::new()),
            Arc::new(CancellationToken::new()),
        )
        .await
        .unwrap_err();

    assert!(err.is_unsupported());
    assert_eq!(DiscoveryOutcome::from(&err), DiscoveryOutcome::Unsupported);
    assert_eq!(backend.call_count(), 0);
}

#[tokio::test]
async fn cancellation_stops_paging_and_reports_cancelled() {
    let cancel = Arc::new(CancellationToken::new());
    let backend = Arc::new(
        MockSearchBackend::new().with_cancel_after_first_call(cancel.clone()),
    );
    backend.script(
        "solo",
        vec![
            Ok(WorkPage::new(works(&["/a"]), true)),
            Ok(WorkPage::new(works(&["/b"]), true)),
        ],
    );

    let engine = DiscoveryEngine::builder()
        .with_backend(backend.clone())
        .with_orchestrator_config(OrchestratorConfig::new().with_max_pages_per_keyword(5))
        .build()
        .unwrap();

    let sink = Arc::new(CollectingSink::new());
    let outcome = engine
        .discover_related(&Work::new("/origin", "Solo"), sink.clone(), cancel)
        .await
        .unwrap();

    assert_eq!(outcome, DiscoveryOutcome::Cancelled);
    // Page 2 was never requested and nothing was pushed after the
    // cancellation point.
    assert_eq!(backend.call_count(), 1);
    assert_eq!(sink.updates().len(), 1);
    assert!(!sink.updates()[0].completed);
}

#[tokio::test]
async fn repeated_calls_are_independent() {
    let backend = Arc::new(MockSearchBackend::new());
    backend.script("solo", vec![Ok(WorkPage::new(works(&["/a"]), false))]);

    let engine = DiscoveryEngine::builder()
        .with_backend(backend.clone())
        .build()
        .unwrap();
    let work = Work::new("/origin", "Solo");

    for _ in 0..2 {
        let sink = Arc::new(CollectingSink::new());
        let report = engine
            .discover_related_report(&work, sink, Arc::new(CancellationToken::new()))
            .await
            .unwrap();
        assert_eq!(report.all_works.len(), 1);
    }
    // No caching: the backend was hit on both calls.
    assert_eq!(backend.call_count(), 2);
}

#[tokio::test]
async fn channel_sink_consumes_discovery_as_a_stream() {
    let backend = Arc::new(MockSearchBackend::new());
    backend.script("solo", vec![Ok(WorkPage::new(works(&["/a"]), false))]);

    let engine = DiscoveryEngine::builder()
        .with_backend(backend)
        .build()
        .unwrap();

    let (sink, mut events) = ChannelSink::new();
    let outcome = engine
        .discover_related(
            &Work::new("/origin", "Solo"),
            Arc::new(sink),
            Arc::new(CancellationToken::new()),
        )
        .await
        .unwrap();
    assert!(outcome.is_completed());

    match events.recv().await.unwrap() {
        StreamEvent::Update(update) => {
            assert_eq!(update.label, "solo");
            assert!(update.completed);
        }
        StreamEvent::Error { .. } => panic!("expected an update"),
    }
}

#[tokio::test]
async fn every_keyword_failing_still_completes_with_empty_groups() {
    let backend = Arc::new(MockSearchBackend::new());
    backend.script("great", vec![Err(BackendError::new("great", "boom"))]);
    backend.script("adventure", vec![Err(BackendError::new("adventure", "boom"))]);

    let engine = DiscoveryEngine::builder()
        .with_backend(backend)
        .build()
        .unwrap();

    let report = engine
        .discover_related_report(
            &Work::new("/origin", "Great Adventure"),
            Arc::new(CollectingSink::new()),
            Arc::new(CancellationToken::new()),
        )
        .await
        .unwrap();

    assert!(report.outcome.is_completed());
    assert_eq!(report.groups.len(), 2);
    assert!(report.groups.iter().all(|g| g.completed && g.works.is_empty()));
    assert_eq!(report.failures.len(), 2);
    assert!(report.all_works.is_empty());
}
