//! Discovery sink trait and implementations.

use crate::errors::KeywordFailure;
use crate::model::Work;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// One incremental push: the works discovered so far for one group.
///
/// A group's updates are strictly ordered by page; once an update arrives
/// with `completed` set, no further updates follow for that label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupUpdate {
    /// The keyword that produced this group, or a synthetic label for
    /// non-keyword strategies.
    pub label: String,
    /// All works discovered for this group so far, deduplicated by locator.
    pub works: Vec<Work>,
    /// Whether this is the final update for the group.
    pub completed: bool,
}

impl GroupUpdate {
    /// Creates an update.
    #[must_use]
    pub fn new(label: impl Into<String>, works: Vec<Work>, completed: bool) -> Self {
        Self {
            label: label.into(),
            works,
            completed,
        }
    }
}

/// Receives incremental discovery results.
///
/// `push_group` delivers partial results as soon as they are available;
/// `record_error` is the side channel for absorbed per-keyword failures.
/// Implementations must never panic on either path.
#[async_trait]
pub trait DiscoverySink: Send + Sync {
    /// Delivers an incremental result for one group.
    async fn push_group(&self, update: GroupUpdate);

    /// Reports an absorbed failure for one group. Does not end the stream.
    fn record_error(&self, label: &str, failure: &KeywordFailure);
}

/// A sink that discards everything. The default when callers only care
/// about the terminal outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpSink;

#[async_trait]
impl DiscoverySink for NoOpSink {
    async fn push_group(&self, _update: GroupUpdate) {
        // Intentionally empty - discards all updates
    }

    fn record_error(&self, _label: &str, _failure: &KeywordFailure) {
        // Intentionally empty - discards all failures
    }
}

/// A sink that logs pushes through the tracing framework.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingSink;

#[async_trait]
impl DiscoverySink for LoggingSink {
    async fn push_group(&self, update: GroupUpdate) {
        debug!(
            label = %update.label,
            works = update.works.len(),
            completed = update.completed,
            "related group update"
        );
    }

    fn record_error(&self, label: &str, failure: &KeywordFailure) {
        warn!(
            label = %label,
            page = failure.page,
            error = %failure.error,
            "related search branch failed"
        );
    }
}

/// A sink that captures everything it receives, for tests.
#[derive(Debug, Default)]
pub struct CollectingSink {
    updates: parking_lot::RwLock<Vec<GroupUpdate>>,
    errors: parking_lot::RwLock<Vec<(String, KeywordFailure)>>,
}

impl CollectingSink {
    /// Creates a new collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all captured updates in arrival order.
    #[must_use]
    pub fn updates(&self) -> Vec<GroupUpdate> {
        self.updates.read().clone()
    }

    /// Returns the captured updates for one label, in arrival order.
    #[must_use]
    pub fn updates_for(&self, label: &str) -> Vec<GroupUpdate> {
        self.updates
            .read()
            .iter()
            .filter(|u| u.label == label)
            .cloned()
            .collect()
    }

    /// Returns the last update captured for a label, if any.
    #[must_use]
    pub fn last_update_for(&self, label: &str) -> Option<GroupUpdate> {
        self.updates_for(label).into_iter().last()
    }

    /// Returns all captured failures.
    #[must_use]
    pub fn errors(&self) -> Vec<(String, KeywordFailure)> {
        self.errors.read().clone()
    }

    /// Number of captured updates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.read().len()
    }

    /// Whether nothing has been captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.read().is_empty() && self.errors.read().is_empty()
    }

    /// Clears all captures.
    pub fn clear(&self) {
        self.updates.write().clear();
        self.errors.write().clear();
    }
}

#[async_trait]
impl DiscoverySink for CollectingSink {
    async fn push_group(&self, update: GroupUpdate) {
        self.updates.write().push(update);
    }

    fn record_error(&self, label: &str, failure: &KeywordFailure) {
        self.errors
            .write()
            .push((label.to_string(), failure.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_sink() {
        let sink = NoOpSink;
        sink.push_group(GroupUpdate::new("great", Vec::new(), true))
            .await;
        sink.record_error("great", &KeywordFailure::new("great", "boom"));
        // Should not panic
    }

    #[tokio::test]
    async fn test_logging_sink() {
        let sink = LoggingSink;
        sink.push_group(GroupUpdate::new(
            "great",
            vec![Work::new("/a", "A")],
            false,
        ))
        .await;
        sink.record_error("great", &KeywordFailure::new("great", "boom"));
        // Should not panic
    }

    #[tokio::test]
    async fn test_collecting_sink() {
        let sink = CollectingSink::new();
        assert!(sink.is_empty());

        sink.push_group(GroupUpdate::new("great", Vec::new(), false))
            .await;
        sink.push_group(GroupUpdate::new("adventure", Vec::new(), true))
            .await;
        sink.record_error("adventure", &KeywordFailure::new("adventure", "boom"));

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.updates_for("great").len(), 1);
        assert_eq!(sink.errors().len(), 1);
        assert_eq!(sink.errors()[0].0, "adventure");
    }

    #[tokio::test]
    async fn test_collecting_sink_last_update() {
        let sink = CollectingSink::new();
        sink.push_group(GroupUpdate::new("great", Vec::new(), false))
            .await;
        sink.push_group(GroupUpdate::new(
            "great",
            vec![Work::new("/a", "A")],
            true,
        ))
        .await;

        let last = sink.last_update_for("great").unwrap();
        assert!(last.completed);
        assert_eq!(last.works.len(), 1);
        assert!(sink.last_update_for("missing").is_none());
    }

    #[tokio::test]
    async fn test_collecting_sink_clear() {
        let sink = CollectingSink::new();
        sink.push_group(GroupUpdate::new("great", Vec::new(), true))
            .await;
        sink.clear();
        assert!(sink.is_empty());
    }

    #[test]
    fn test_sink_usable_from_blocking_context() {
        let sink = CollectingSink::new();
        tokio_test::block_on(sink.push_group(GroupUpdate::new("great", Vec::new(), true)));
        assert_eq!(sink.len(), 1);
    }
}
