//! Discovery requests and opaque search filters.

use super::Work;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An opaque, ordered list of filter entries passed through to the search
/// backend untouched. The engine never inspects filter contents.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterList(pub Vec<serde_json::Value>);

impl FilterList {
    /// Creates an empty filter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of filter entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list carries no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The originating work whose related items are sought.
///
/// Immutable for the duration of one discovery call; the run id ties all
/// log lines of the call together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryRequest {
    /// The work to find related items for.
    pub work: Work,
    /// Filters forwarded to every backend search of this call.
    pub filters: FilterList,
    /// Unique id for this invocation.
    pub run_id: Uuid,
}

impl DiscoveryRequest {
    /// Creates a request for a work with a fresh run id.
    #[must_use]
    pub fn new(work: Work) -> Self {
        Self {
            work,
            filters: FilterList::new(),
            run_id: Uuid::new_v4(),
        }
    }

    /// Sets the filters forwarded to the backend.
    #[must_use]
    pub fn with_filters(mut self, filters: FilterList) -> Self {
        self.filters = filters;
        self
    }
}
