//! Per-call aggregation of group updates.
//!
//! One aggregator is owned by exactly one discovery invocation. Parallel
//! keyword units write into it concurrently; the group map and counters are
//! the only shared state of a call.

use super::group::RelatedGroup;
use super::outcome::DiscoveryOutcome;
use crate::errors::KeywordFailure;
use crate::model::Work;
use crate::stream::{DiscoverySink, GroupUpdate};
use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Merges and deduplicates works per group, tracks which groups have
/// completed, and derives overall completion independent of arrival order.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    groups: DashMap<String, RelatedGroup>,
    /// First-seen label order, for stable flat views.
    order: Mutex<Vec<String>>,
    expected_groups: AtomicUsize,
    completed_groups: AtomicUsize,
    failures: Mutex<Vec<KeywordFailure>>,
}

impl ResultAggregator {
    /// Creates an aggregator expecting `expected` groups in total.
    #[must_use]
    pub fn new(expected: usize) -> Self {
        let aggregator = Self::default();
        aggregator.expected_groups.store(expected, Ordering::SeqCst);
        aggregator
    }

    /// Records one page of works for a group, deduplicating against works
    /// already present in that group only.
    ///
    /// Returns the caller-visible snapshot to push, or `None` if the group
    /// had already completed (late arrivals are dropped).
    pub fn record_page(
        &self,
        label: &str,
        works: &[Work],
        completed: bool,
    ) -> Option<GroupUpdate> {
        let mut group = self
            .groups
            .entry(label.to_string())
            .or_insert_with(|| {
                self.order.lock().push(label.to_string());
                RelatedGroup::new(label)
            });

        if group.is_completed() {
            return None;
        }
        group.append(works);
        if completed && group.mark_completed() {
            self.completed_groups.fetch_add(1, Ordering::SeqCst);
        }
        Some(group.snapshot())
    }

    /// Records a failed group branch: the failure is kept for the summary
    /// and the group completes with whatever it had accumulated.
    ///
    /// Returns the final snapshot to push, or `None` if the group had
    /// already completed.
    pub fn record_failure(&self, label: &str, failure: KeywordFailure) -> Option<GroupUpdate> {
        self.failures.lock().push(failure);

        let mut group = self
            .groups
            .entry(label.to_string())
            .or_insert_with(|| {
                self.order.lock().push(label.to_string());
                RelatedGroup::new(label)
            });

        if group.mark_completed() {
            self.completed_groups.fetch_add(1, Ordering::SeqCst);
            Some(group.snapshot())
        } else {
            None
        }
    }

    /// Number of groups seen so far.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of groups that have completed.
    #[must_use]
    pub fn completed_count(&self) -> usize {
        self.completed_groups.load(Ordering::SeqCst)
    }

    /// Number of groups this call expects in total.
    #[must_use]
    pub fn expected_count(&self) -> usize {
        self.expected_groups.load(Ordering::SeqCst)
    }

    /// Whether every expected group has completed. Vacuously true when
    /// nothing is expected.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed_count() >= self.expected_count()
    }

    /// All recorded failures, in arrival order.
    #[must_use]
    pub fn failures(&self) -> Vec<KeywordFailure> {
        self.failures.lock().clone()
    }

    /// Flat view: every discovered work across all groups, deduplicated by
    /// locator, in first-seen group order.
    #[must_use]
    pub fn all_works(&self) -> Vec<Work> {
        let order = self.order.lock().clone();
        let mut seen: HashSet<String> = HashSet::new();
        let mut works = Vec::new();

        for label in order {
            if let Some(group) = self.groups.get(&label) {
                for work in group.works() {
                    if seen.insert(work.locator.clone()) {
                        works.push(work.clone());
                    }
                }
            }
        }
        works
    }

    /// Snapshots of all groups in first-seen order.
    #[must_use]
    pub fn group_snapshots(&self) -> Vec<GroupUpdate> {
        let order = self.order.lock().clone();
        order
            .into_iter()
            .filter_map(|label| self.groups.get(&label).map(|g| g.snapshot()))
            .collect()
    }

    /// Builds the terminal report for a call.
    #[must_use]
    pub fn report(&self, outcome: DiscoveryOutcome) -> DiscoveryReport {
        DiscoveryReport {
            outcome,
            groups: self.group_snapshots(),
            all_works: self.all_works(),
            failures: self.failures(),
        }
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("groups".to_string(), serde_json::json!(self.group_count()));
        map.insert(
            "completed_groups".to_string(),
            serde_json::json!(self.completed_count()),
        );
        map.insert(
            "expected_groups".to_string(),
            serde_json::json!(self.expected_count()),
        );
        map.insert(
            "failures".to_string(),
            serde_json::json!(self.failures.lock().len()),
        );
        map
    }
}

/// The terminal state of one discovery call, with everything the stream
/// pushed along the way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryReport {
    /// How the call ended.
    pub outcome: DiscoveryOutcome,
    /// Final snapshot of every group, in first-seen order.
    pub groups: Vec<GroupUpdate>,
    /// All discovered works deduplicated by locator across every group.
    pub all_works: Vec<Work>,
    /// Absorbed per-keyword failures.
    pub failures: Vec<KeywordFailure>,
}

impl DiscoveryReport {
    /// Total works across groups, before cross-group dedup.
    #[must_use]
    pub fn total_group_works(&self) -> usize {
        self.groups.iter().map(|g| g.works.len()).sum()
    }
}

/// A sink wrapper that routes pushes through an aggregator before they
/// reach the caller.
///
/// Used for the custom-override strategy so that an override's raw pushes
/// get the same dedup and completion bookkeeping as keyword search.
pub struct AggregatingSink {
    aggregator: Arc<ResultAggregator>,
    inner: Arc<dyn DiscoverySink>,
}

impl AggregatingSink {
    /// Wraps a caller sink.
    #[must_use]
    pub fn new(aggregator: Arc<ResultAggregator>, inner: Arc<dyn DiscoverySink>) -> Self {
        Self { aggregator, inner }
    }
}

#[async_trait]
impl DiscoverySink for AggregatingSink {
    async fn push_group(&self, update: GroupUpdate) {
        if let Some(update) =
            self.aggregator
                .record_page(&update.label, &update.works, update.completed)
        {
            self.inner.push_group(update).await;
        }
    }

    fn record_error(&self, label: &str, failure: &KeywordFailure) {
        // Marks the group completed with whatever it had; the error side
        // channel closes the branch.
        self.aggregator.record_failure(label, failure.clone());
        self.inner.record_error(label, failure);
    }
}
