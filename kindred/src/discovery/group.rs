//! A single group of related works under one label.

use crate::model::Work;
use crate::stream::GroupUpdate;
use std::collections::{HashMap, HashSet};

/// The ordered, deduplicated works discovered under one keyword or
/// strategy branch.
///
/// A group completes exactly once; appends after completion are rejected.
#[derive(Debug, Clone)]
pub struct RelatedGroup {
    label: String,
    works: Vec<Work>,
    seen: HashSet<String>,
    completed: bool,
}

impl RelatedGroup {
    /// Creates an empty group for a label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            works: Vec::new(),
            seen: HashSet::new(),
            completed: false,
        }
    }

    /// The group's label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Appends works, skipping any locator already present. Returns the
    /// number actually added; zero if the group is already completed.
    pub fn append(&mut self, works: &[Work]) -> usize {
        if self.completed {
            return 0;
        }
        let mut added = 0;
        for work in works {
            if self.seen.insert(work.locator.clone()) {
                self.works.push(work.clone());
                added += 1;
            }
        }
        added
    }

    /// Marks the group completed. Returns true the first time only.
    pub fn mark_completed(&mut self) -> bool {
        if self.completed {
            false
        } else {
            self.completed = true;
            true
        }
    }

    /// Whether the group has completed.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// The works discovered so far, in discovery order.
    #[must_use]
    pub fn works(&self) -> &[Work] {
        &self.works
    }

    /// Number of works in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.works.len()
    }

    /// Whether the group holds no works.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    /// A caller-visible snapshot of the group's current state.
    #[must_use]
    pub fn snapshot(&self) -> GroupUpdate {
        GroupUpdate::new(self.label.clone(), self.works.clone(), self.completed)
    }

    /// Converts to a dictionary representation.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();
        map.insert("label".to_string(), serde_json::json!(self.label));
        map.insert("works".to_string(), serde_json::json!(self.works.len()));
        map.insert("completed".to_string(), serde_json::json!(self.completed));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_dedups_by_locator() {
        let mut group = RelatedGroup::new("great");
        let added = group.append(&[
            Work::new("/a", "A"),
            Work::new("/b", "B"),
            Work::new("/a", "A again"),
        ]);

        assert_eq!(added, 2);
        assert_eq!(group.len(), 2);
        // First-seen record wins.
        assert_eq!(group.works()[0].title, "A");
    }

    #[test]
    fn test_append_dedups_across_pages() {
        let mut group = RelatedGroup::new("great");
        group.append(&[Work::new("/a", "A")]);
        let added = group.append(&[Work::new("/a", "A"), Work::new("/c", "C")]);

        assert_eq!(added, 1);
        assert_eq!(group.len(), 2);
    }

    #[test]
    fn test_mark_completed_once() {
        let mut group = RelatedGroup::new("great");
        assert!(group.mark_completed());
        assert!(!group.mark_completed());
        assert!(group.is_completed());
    }

    #[test]
    fn test_completed_group_rejects_appends() {
        let mut group = RelatedGroup::new("great");
        group.append(&[Work::new("/a", "A")]);
        group.mark_completed();

        assert_eq!(group.append(&[Work::new("/b", "B")]), 0);
        assert_eq!(group.len(), 1);
    }

    #[test]
    fn test_snapshot() {
        let mut group = RelatedGroup::new("great");
        group.append(&[Work::new("/a", "A")]);

        let snapshot = group.snapshot();
        assert_eq!(snapshot.label, "great");
        assert_eq!(snapshot.works.len(), 1);
        assert!(!snapshot.completed);
    }

    #[test]
    fn test_to_dict() {
        let group = RelatedGroup::new("great");
        let dict = group.to_dict();
        assert_eq!(dict.get("label"), Some(&serde_json::json!("great")));
        assert_eq!(dict.get("completed"), Some(&serde_json::json!(false)));
    }
}
